//! Catalog-sync operator surface: the storefront bulk-finish webhook, the
//! Kogan export-job download/apply endpoints, and a manual resume
//! endpoint for a full-sync run stuck with pending/failed chunks.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post, Router},
};
use erp_catalog_sync::{export, full_sync};
use erp_core::error::Error;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

pub fn catalog_sync_routes() -> Router<AppState> {
    Router::new()
        .route("/webhooks/bulk-finish", post(storefront_bulk_finish_webhook))
        .route("/sync/full/:run_id/resume", post(resume_full_sync))
        .route("/exports/:job_id/file", get(download_export_job))
        .route("/exports/:job_id/apply", post(apply_export_job))
}

/// Shopify-style `BULK_OPERATIONS_FINISH` webhook. The signature is
/// verified against the *raw* request body before it's parsed as JSON —
/// `axum::body::Bytes` rather than `Json<...>` so the bytes HMAC'd are
/// exactly the bytes that arrived on the wire.
async fn storefront_bulk_finish_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    let signature = headers
        .get("x-shopify-hmac-sha256")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::storefront_webhook_invalid("missing X-Shopify-Hmac-Sha256 header"))?;

    erp_catalog_sync::storefront_client::verify_webhook_signature(
        &state.config.storefront.webhook_secret,
        &body,
        signature,
    )?;

    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| Error::storefront_webhook_invalid(format!("invalid webhook JSON: {e}")))?;

    let repo = state.sync_repository();
    let run = repo
        .latest_running_sync_run()
        .await?
        .ok_or_else(|| Error::storefront_webhook_invalid("no full-sync run is currently awaiting a bulk result"))?;

    let bulk_operation_id = payload
        .get("admin_graphql_api_id")
        .and_then(|v| v.as_str())
        .map(str::to_string)
        .or_else(|| run.shopify_bulk_id.clone());

    let storefront = state.storefront_client()?;
    let bulk_result_url = match &bulk_operation_id {
        Some(id) => storefront.get_bulk_operation_by_id(id).await?.url,
        None => None,
    };

    let supplier = state.supplier_client()?;
    full_sync::finish_full_sync(repo, supplier, storefront, run.id, bulk_result_url.as_deref(), &state.config.sync)
        .await?;

    Ok(Json(json!({ "success": true, "run_id": run.id })))
}

/// Re-dispatches whatever chunks of a full-sync run are still
/// `pending`/`failed`, without re-downloading the bulk export.
async fn resume_full_sync(
    State(state): State<AppState>,
    Path(run_id): Path<Uuid>,
) -> Result<Json<Value>, ApiError> {
    let repo = state.sync_repository();
    let supplier = state.supplier_client()?;

    full_sync::resume_full_sync(repo.clone(), supplier, run_id, &state.config.sync).await?;

    let run = repo.get_sync_run(run_id).await?;
    Ok(Json(json!({ "success": true, "run": run })))
}

/// Streams a previously generated Kogan CSV export job back to the
/// operator for review before it's applied.
async fn download_export_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Response, ApiError> {
    let (file_name, bytes) = export::get_export_job_file(state.sync_repository(), &job_id).await?;

    Ok((
        StatusCode::OK,
        [
            ("content-type", "text/csv".to_string()),
            ("content-disposition", format!("attachment; filename=\"{file_name}\"")),
        ],
        bytes,
    )
        .into_response())
}

/// Applies a reviewed export job's per-SKU payloads back onto the Kogan
/// template tables and clears the dirty flags it covered.
async fn apply_export_job(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let applied = export::apply_export_job(state.sync_repository(), &job_id).await?;
    Ok(Json(json!({ "success": true, "job_id": job_id, "applied": applied })))
}
