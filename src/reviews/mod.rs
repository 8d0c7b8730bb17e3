//! Product reviews, replies and rating summaries.

pub mod dto;
pub mod handlers;
pub mod model;
pub mod repo;

pub use handlers::router;
pub use model::RatingSummary;
pub use repo::ReviewStore;
