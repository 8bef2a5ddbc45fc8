//! Role management handlers
//!
//! HTTP handlers for role and permission management

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post, put, delete, Router},
};
use serde_json::{json, Value};

use crate::state::AppState;

/// Create role management routes
pub fn role_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles))
        .route("/", post(create_role))
        .route("/:id", get(get_role))
        .route("/:id", put(update_role))
        .route("/:id", delete(delete_role))
        .route("/:id/permissions", get(get_role_permissions))
        .route("/:id/permissions", post(assign_permissions))
}

/// List all roles
async fn list_roles(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement role listing logic
    Ok(Json(json!({
        "message": "List roles endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Create a new role
async fn create_role(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement role creation logic
    Ok(Json(json!({
        "message": "Create role endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Get role by ID
async fn get_role(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement get role logic
    Ok(Json(json!({
        "message": "Get role endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Update role
async fn update_role(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement role update logic
    Ok(Json(json!({
        "message": "Update role endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Delete role
async fn delete_role(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement role deletion logic
    Ok(Json(json!({
        "message": "Delete role endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Get role permissions
async fn get_role_permissions(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement get role permissions logic
    Ok(Json(json!({
        "message": "Get role permissions endpoint - implementation pending",
        "status": "placeholder"
    })))
}

/// Assign permissions to role
async fn assign_permissions(State(_state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    // TODO: Implement assign permissions logic
    Ok(Json(json!({
        "message": "Assign permissions endpoint - implementation pending",
        "status": "placeholder"
    })))
}