//! Cars resource routes
//!
//! Reads are public; mutations sit behind the auth gate and carry an
//! attribution field naming the acting administrator.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use carhub_db::NewCar;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAuth;
use super::types::{
    CarCreatedResponse, CarDeletedResponse, CarListResponse, CarResponse, CreateCarRequest,
};

/// GET /api/cars (public)
async fn list_cars(State(state): State<AppState>) -> Result<Json<CarListResponse>, ApiError> {
    let cars = state.db.list_cars().await?;

    Ok(Json(CarListResponse {
        success: true,
        count: cars.len(),
        data: cars,
    }))
}

/// GET /api/cars/{id} (public)
async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CarResponse>, ApiError> {
    let car = state
        .db
        .get_car_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Car with ID {} not found", id)))?;

    Ok(Json(CarResponse {
        success: true,
        data: car,
    }))
}

/// POST /api/cars (authenticated)
async fn add_car(
    RequireAuth(username): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<CreateCarRequest>,
) -> Result<(StatusCode, Json<CarCreatedResponse>), ApiError> {
    if request.brand.is_empty() || request.model.is_empty() {
        return Err(ApiError::BadRequest(
            "Brand and model are required".to_string(),
        ));
    }

    let car = state
        .db
        .insert_car(NewCar {
            brand: request.brand,
            model: request.model,
            year: request.year,
            color: request.color,
        })
        .await?;

    info!("Car {} {} added by {}", car.brand, car.model, username);
    metrics::counter!("carhub_cars_added_total").increment(1);

    Ok((
        StatusCode::CREATED,
        Json(CarCreatedResponse {
            success: true,
            message: "Car added successfully".to_string(),
            data: car,
            added_by: username,
        }),
    ))
}

/// DELETE /api/cars/{id} (authenticated)
async fn delete_car(
    RequireAuth(username): RequireAuth,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CarDeletedResponse>, ApiError> {
    let car = state
        .db
        .delete_car_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Car with ID {} not found", id)))?;

    info!("Car {} deleted by {}", id, username);
    metrics::counter!("carhub_cars_deleted_total").increment(1);

    Ok(Json(CarDeletedResponse {
        success: true,
        message: "Car deleted successfully".to_string(),
        data: car,
        deleted_by: username,
    }))
}

/// Create cars routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cars", get(list_cars))
        .route("/api/cars", post(add_car))
        .route("/api/cars/{id}", get(get_car))
        .route("/api/cars/{id}", delete(delete_car))
}
