//! CarHub REST API
//!
//! This crate provides the Axum-based HTTP API for CarHub: the public
//! cars resource, the authentication endpoints, and the authorization
//! gate applied to every mutation.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, MetricsHandle};
