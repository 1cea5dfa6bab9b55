//! API routes

pub mod auth;
mod cars;
mod health;
pub mod metrics;
pub mod types;

use axum::{Json, Router, routing::get};
use serde_json::json;
use std::sync::Arc;

use crate::state::{AppState, MetricsHandle};

/// Root welcome handler
async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the CarHub API" }))
}

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        .route("/", get(welcome))
        // Health check
        .merge(health::routes())
        // Authentication
        .merge(auth::routes())
        // Cars resource
        .merge(cars::routes())
        .with_state(state);

    // Add metrics endpoint if handle is provided
    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    router
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header::AUTHORIZATION};
    use carhub_auth::{AuthService, TokenIssuer, hasher};
    use carhub_db::Database;
    use serde_json::json;
    use tower::ServiceExt;

    async fn test_router() -> Router {
        let db = Database::new_in_memory().await.unwrap();

        let admin_hash = hasher::digest("admin123", "salt123");
        db.seed_administrators(&[("admin", "salt123", admin_hash.as_str())])
            .await
            .unwrap();

        let auth = Arc::new(AuthService::new(
            db.clone(),
            TokenIssuer::new("test-secret"),
            None,
        ));
        create_router(AppState::new(db, auth), None)
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn login(app: &Router, username: &str, password: &str) -> axum::response::Response {
        app.clone()
            .oneshot(json_request(
                "POST",
                "/api/login",
                json!({ "username": username, "password": password }),
            ))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_full_session_lifecycle() {
        let app = test_router().await;

        // Seeded admin logs in
        let response = login(&app, "admin", "admin123").await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["username"], json!("admin"));
        let token = body["token"].as_str().unwrap().to_string();
        assert!(!token.is_empty());

        // Token authorizes a mutation, attributed to the admin
        let mut request = json_request(
            "POST",
            "/api/cars",
            json!({ "brand": "Tesla", "model": "Model 3" }),
        );
        request.headers_mut().insert(AUTHORIZATION, token.parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["addedBy"], json!("admin"));
        assert_eq!(body["data"]["brand"], json!("Tesla"));
        let car_id = body["data"]["id"].as_i64().unwrap();

        // Logout succeeds once
        let request = Request::builder()
            .method("POST")
            .uri("/api/logout")
            .header(AUTHORIZATION, token.as_str())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Replaying the revoked token fails the gate
        let request = Request::builder()
            .method("DELETE")
            .uri(format!("/api/cars/{}", car_id))
            .header(AUTHORIZATION, token.as_str())
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Invalid or expired token"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_generic_401() {
        let app = test_router().await;

        let response = login(&app, "admin", "wrongpass").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["message"], json!("Invalid username or password"));

        // Unknown username gets the exact same message
        let response = login(&app, "nobody", "whatever").await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Invalid username or password"));
    }

    #[tokio::test]
    async fn test_login_missing_fields() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/login", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_register_then_login() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                json!({ "username": "newadmin", "password": "secret99" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["username"], json!("newadmin"));
        // The password and digest are never echoed
        assert!(body.get("password").is_none());

        let response = login(&app, "newadmin", "secret99").await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_register_existing_username() {
        let app = test_router().await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/register",
                json!({ "username": "admin", "password": "anything" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Username already exists"));
    }

    #[tokio::test]
    async fn test_mutations_require_token_but_reads_do_not() {
        let app = test_router().await;

        // No token at all
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/cars",
                json!({ "brand": "Tesla", "model": "Model 3" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Authentication required"));

        // A made-up token is a distinct failure
        let mut request = json_request(
            "POST",
            "/api/cars",
            json!({ "brand": "Tesla", "model": "Model 3" }),
        );
        request
            .headers_mut()
            .insert(AUTHORIZATION, "bogus-token".parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Invalid or expired token"));

        // Public reads bypass the gate entirely
        let request = Request::builder()
            .uri("/api/cars")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["count"], json!(0));
    }

    #[tokio::test]
    async fn test_logout_without_token() {
        let app = test_router().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/logout")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("No token provided"));
    }

    #[tokio::test]
    async fn test_logout_with_invalid_token() {
        let app = test_router().await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/logout")
            .header(AUTHORIZATION, "never-issued")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Invalid token or already logged out"));
    }

    #[tokio::test]
    async fn test_add_car_missing_fields() {
        let app = test_router().await;

        let response = login(&app, "admin", "admin123").await;
        let token = body_json(response).await["token"]
            .as_str()
            .unwrap()
            .to_string();

        let mut request = json_request("POST", "/api/cars", json!({ "brand": "Tesla" }));
        request.headers_mut().insert(AUTHORIZATION, token.parse().unwrap());
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_car_not_found() {
        let app = test_router().await;

        let request = Request::builder()
            .uri("/api/cars/42")
            .body(Body::empty())
            .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["message"], json!("Car with ID 42 not found"));
    }
}
