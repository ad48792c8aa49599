//! User CRUD handlers.
//!
//! Handlers are stateless per request: they parse input, delegate to the
//! repository (after validation for writes), and map the outcome onto the
//! response envelope. All side effects live behind the repository call.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use serde::Serialize;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::state::AppState;
use crate::validate::{NewUser, UserDraft, UserPatch};

/// Response for `GET /users`.
#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub success: bool,
    pub count: usize,
    pub data: Vec<User>,
}

/// Response for successful create/update/delete.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: User,
}

/// List all users.
///
/// # Errors
///
/// Returns 500 if the store is unreachable.
pub async fn list_users(State(state): State<AppState>) -> Result<Json<UserListResponse>> {
    let users = state.users().list_all().await?;

    Ok(Json(UserListResponse {
        success: true,
        count: users.len(),
        data: users,
    }))
}

/// Create a user.
///
/// # Errors
///
/// Returns 400 on a malformed body, validation failure, or duplicate
/// email; 500 on store failure.
pub async fn create_user(
    State(state): State<AppState>,
    payload: std::result::Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let Json(input) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;
    let draft = UserDraft::from_new(&input).map_err(RepositoryError::from)?;

    let user = state.users().create(draft).await?;
    tracing::info!(id = %user.id, "user created");

    Ok((
        StatusCode::CREATED,
        Json(UserResponse {
            success: true,
            message: "User created successfully",
            data: user,
        }),
    ))
}

/// Partially update a user.
///
/// Only supplied fields change; the merged record is fully re-validated.
///
/// # Errors
///
/// Returns 400 on a malformed body/id, validation failure, or duplicate
/// email; 404 if no user has the id; 500 on store failure.
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<UserPatch>, JsonRejection>,
) -> Result<Json<UserResponse>> {
    let Json(patch) = payload.map_err(|e| AppError::InvalidBody(e.body_text()))?;

    let user = state.users().update_by_id(&id, patch).await?;
    tracing::info!(id = %user.id, "user updated");

    Ok(Json(UserResponse {
        success: true,
        message: "User updated successfully",
        data: user,
    }))
}

/// Delete a user, returning the removed record.
///
/// # Errors
///
/// Returns 400 on a malformed id; 404 if no user has the id; 500 on store
/// failure.
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<UserResponse>> {
    let user = state.users().delete_by_id(&id).await?;
    tracing::info!(id = %user.id, "user deleted");

    Ok(Json(UserResponse {
        success: true,
        message: "User deleted successfully",
        data: user,
    }))
}
