//! CarHub Authentication
//!
//! This crate provides salted password hashing, session token issuance,
//! and the login/logout/register service used by the CarHub API.

pub mod error;
pub mod hasher;
pub mod service;
pub mod token;

pub use error::AuthError;
pub use service::{AuthService, LoginOutcome};
pub use token::TokenIssuer;
