//! User management handlers
//!
//! HTTP handlers for user CRUD operations and management

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put, delete, Router},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// Create user management routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users))
        .route("/", post(create_user))
        .route("/:id", get(get_user))
        .route("/:id", put(update_user))
        .route("/:id", delete(delete_user))
        .route("/invite", post(invite_user))
}

/// List all users
async fn list_users(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement user listing logic
    Ok(Json(json!({
        "message": "List users endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Create a new user
async fn create_user(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement user creation logic
    Ok(Json(json!({
        "message": "Create user endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Get user by ID
async fn get_user(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement get user logic
    Ok(Json(json!({
        "message": "Get user endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Update user
async fn update_user(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement user update logic
    Ok(Json(json!({
        "message": "Update user endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Delete user
async fn delete_user(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement user deletion logic
    Ok(Json(json!({
        "message": "Delete user endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Invite a new user
async fn invite_user(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement user invitation logic
    Ok(Json(json!({
        "message": "Invite user endpoint - implementation pending",
        "status": "placeholder"
    })))
}