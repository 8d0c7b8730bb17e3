//! Student verification: document submission, staff decision and live
//! status updates.

pub mod events;
pub mod handlers;
pub mod model;
pub mod services;

pub use events::VerificationEvents;
pub use handlers::router;
