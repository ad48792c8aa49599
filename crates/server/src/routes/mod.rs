//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /            - Service info and endpoint map
//! GET    /health      - Liveness check
//!
//! # Users
//! GET    /users       - List all users
//! POST   /users       - Create a user
//! PUT    /users/{id}  - Partially update a user
//! DELETE /users/{id}  - Delete a user
//!
//! Any other path returns the uniform 404 envelope.
//! ```

pub mod users;

use axum::http::StatusCode;
use axum::response::Json;
use axum::{
    Router,
    routing::{get, put},
};
use serde_json::{Value, json};

use crate::state::AppState;

/// Build the complete service router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/users", get(users::list_users).post(users::create_user))
        .route(
            "/users/{id}",
            put(users::update_user).delete(users::delete_user),
        )
        .fallback(route_not_found)
}

/// Service info and endpoint map.
async fn index() -> Json<Value> {
    Json(json!({
        "success": true,
        "service": "userhub",
        "endpoints": {
            "GET /users": "List all users",
            "POST /users": "Create a user",
            "PUT /users/{id}": "Partially update a user",
            "DELETE /users/{id}": "Delete a user",
            "GET /health": "Liveness check",
        },
    }))
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the store.
async fn health() -> &'static str {
    "ok"
}

/// Uniform 404 envelope for unmatched routes.
async fn route_not_found() -> (StatusCode, Json<Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "success": false,
            "message": "Route not found",
        })),
    )
}
