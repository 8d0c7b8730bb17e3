//! Per-user shopping cart, checkout and order history.

pub mod dto;
pub mod handlers;
pub mod model;
pub mod repo;

pub use handlers::router;
pub use repo::CartStore;
