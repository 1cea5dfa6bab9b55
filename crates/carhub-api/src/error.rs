//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Auth error: {0}")]
    Auth(#[from] carhub_auth::AuthError),

    #[error("Database error: {0}")]
    Database(#[from] carhub_db::DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Auth(e) => {
                use carhub_auth::AuthError;
                let status = match e {
                    AuthError::BadRequest(_) | AuthError::UsernameTaken => StatusCode::BAD_REQUEST,
                    AuthError::InvalidCredentials
                    | AuthError::Unauthenticated
                    | AuthError::InvalidSession => StatusCode::UNAUTHORIZED,
                    AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
                };
                // Storage detail stays internal
                let message = match e {
                    AuthError::Storage(_) => "Internal server error".to_string(),
                    other => other.to_string(),
                };
                (status, message)
            }
            ApiError::Database(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = axum::Json(json!({
            "success": false,
            "message": message
        }));

        (status, body).into_response()
    }
}
