//! CarHub Database Layer
//!
//! This crate provides the database abstraction layer for CarHub,
//! using SQLite via sqlx for persistence. It owns the administrator
//! credentials, session records, and the cars collection.

pub mod error;
pub mod models;
pub mod repository;
pub mod utils;

pub use error::DbError;
pub use models::*;
pub use repository::Database;

/// Re-export sqlx types for convenience
pub use sqlx::SqlitePool;
