pub mod model;
pub mod repo;

pub use model::{DocumentType, NewUser, PublicUser, User};
pub use repo::UserStore;
