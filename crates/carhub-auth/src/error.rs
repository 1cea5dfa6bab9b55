//! Authentication error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    BadRequest(String),

    /// Unknown username and wrong password are deliberately
    /// indistinguishable to prevent username enumeration.
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Username already exists")]
    UsernameTaken,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Invalid or expired token")]
    InvalidSession,

    #[error("Storage error: {0}")]
    Storage(#[from] carhub_db::DbError),
}
