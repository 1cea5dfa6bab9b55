//! Authentication routes and the authorization gate

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use carhub_auth::AuthError;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{
    LoginRequest, LoginResponse, LogoutResponse, RegisterRequest, RegisterResponse,
};

// ==================== Auth Gate ====================

/// Extractor that resolves the bearer token to the acting administrator.
///
/// Placing this in a handler's signature is what gates the operation:
/// a missing Authorization header and an unresolvable token are distinct
/// failures, both rejected before the handler body runs. Resolution is
/// read-only; the gate never touches the session store beyond the lookup.
pub struct RequireAuth(pub String);

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = bearer_token(parts).ok_or(ApiError::Auth(AuthError::Unauthenticated))?;

        let username = app_state.auth.resolve(&token).await?;

        debug!("Authenticated administrator: {}", username);
        Ok(RequireAuth(username))
    }
}

/// Read the session token from the Authorization header.
///
/// Clients send the raw token; a `Bearer ` prefix is also accepted and
/// stripped. The token itself is opaque and never parsed.
fn bearer_token(parts: &Parts) -> Option<String> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}

// ==================== Auth Routes ====================

/// POST /api/login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let outcome = state.auth.login(&request.username, &request.password).await?;

    metrics::counter!("carhub_logins_total").increment(1);

    Ok(Json(LoginResponse {
        success: true,
        token: outcome.token,
        username: outcome.username,
    }))
}

/// POST /api/logout
///
/// Both a missing token and an already-invalid one are client errors
/// here; only the gate on protected resources reports 401 for an
/// unresolvable token.
async fn logout(
    State(state): State<AppState>,
    parts: Parts,
) -> Result<Json<LogoutResponse>, ApiError> {
    let token = bearer_token(&parts)
        .ok_or_else(|| ApiError::BadRequest("No token provided".to_string()))?;

    state.auth.logout(&token).await.map_err(|e| match e {
        AuthError::InvalidSession => {
            ApiError::BadRequest("Invalid token or already logged out".to_string())
        }
        other => other.into(),
    })?;

    Ok(Json(LogoutResponse { success: true }))
}

/// POST /api/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), ApiError> {
    let username = state
        .auth
        .register(&request.username, &request.password)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            success: true,
            username,
        }),
    ))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/logout", post(logout))
        .route("/api/register", post(register))
}
