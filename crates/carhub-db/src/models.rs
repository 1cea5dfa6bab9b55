//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Administrator account model
///
/// The salt and password hash never leave the service, so both are
/// skipped during serialization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Administrator {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub salt: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// New administrator (for insertion)
#[derive(Debug, Clone)]
pub struct NewAdministrator {
    pub username: String,
    pub salt: String,
    pub password_hash: String,
}

/// Session model
///
/// Binds a bearer token to the administrator that obtained it via login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: i64,
    pub username: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub login_time: DateTime<Utc>,
}

/// Car record model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Car {
    pub id: i64,
    pub brand: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

/// New car (for insertion)
#[derive(Debug, Clone)]
pub struct NewCar {
    pub brand: String,
    pub model: String,
    pub year: Option<i64>,
    pub color: Option<String>,
}

// ==================== TryFrom Implementations ====================

impl TryFrom<&sqlx::sqlite::SqliteRow> for Administrator {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Administrator {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            salt: row.try_get("salt")?,
            password_hash: row.try_get("password_hash")?,
            created_at: parse_datetime_or_now(&row.try_get::<String, _>("created_at")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Session {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Session {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            token: row.try_get("token")?,
            login_time: parse_datetime_or_now(&row.try_get::<String, _>("login_time")?),
        })
    }
}

impl TryFrom<&sqlx::sqlite::SqliteRow> for Car {
    type Error = sqlx::Error;

    fn try_from(row: &sqlx::sqlite::SqliteRow) -> Result<Self, Self::Error> {
        Ok(Car {
            id: row.try_get("id")?,
            brand: row.try_get("brand")?,
            model: row.try_get("model")?,
            year: row.try_get("year")?,
            color: row.try_get("color")?,
        })
    }
}
