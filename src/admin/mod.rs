//! Staff endpoints, gated by the `x-admin-token` header.

pub mod handlers;

pub use handlers::router;
