//! Request/Response DTOs for the API

use carhub_db::Car;
use serde::{Deserialize, Serialize};

// ==================== Auth Types ====================

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Login response
#[derive(Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub username: String,
}

/// Register request
#[derive(Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Register response
#[derive(Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub username: String,
}

/// Logout response
#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

// ==================== Car Types ====================

/// Create car request
#[derive(Deserialize)]
pub struct CreateCarRequest {
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub year: Option<i64>,
    #[serde(default)]
    pub color: Option<String>,
}

/// List of cars
#[derive(Serialize)]
pub struct CarListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<Car>,
}

/// Single car
#[derive(Serialize)]
pub struct CarResponse {
    pub success: bool,
    pub data: Car,
}

/// Car created, attributed to the acting administrator
#[derive(Serialize)]
pub struct CarCreatedResponse {
    pub success: bool,
    pub message: String,
    pub data: Car,
    #[serde(rename = "addedBy")]
    pub added_by: String,
}

/// Car deleted, attributed to the acting administrator
#[derive(Serialize)]
pub struct CarDeletedResponse {
    pub success: bool,
    pub message: String,
    pub data: Car,
    #[serde(rename = "deletedBy")]
    pub deleted_by: String,
}
