//! Splits a full-sync run's SKU set into fixed-size chunks, persists the
//! manifest, and dispatches each chunk to [`crate::chunk_worker`] behind a
//! convergence barrier — mirroring the supplier integration's
//! chord/group pattern (`scheduler.py`): a fan-out of independent chunk
//! tasks joined by a single completion callback.
//!
//! Rust has no Celery chord primitive, so the barrier here is a plain
//! `futures::future::join_all` over chunk futures; [`dispatch_run`]
//! plays the role of the chord and `finish_if_converged` the role of its
//! finalize callback.

use crate::chunk_worker::{run_chunk, ChunkOutcome};
use crate::repository::SyncRepository;
use crate::supplier_client::SupplierClient;
use erp_core::error::Result;
use erp_core::SyncConfig;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Splits `skus` into `cfg.chunk_size`-sized chunks and persists each as
/// a pending manifest row, returning the chunk count.
pub async fn build_manifest(
    repo: &dyn SyncRepository,
    run_id: Uuid,
    skus: &[String],
    cfg: &SyncConfig,
) -> Result<usize> {
    let chunks: Vec<&[String]> = skus.chunks(cfg.chunk_size).collect();
    for (idx, chunk) in chunks.iter().enumerate() {
        repo.upsert_chunk_pending(run_id, idx as i32, chunk).await?;
    }
    Ok(chunks.len())
}

pub struct DispatchSummary {
    pub total_chunks: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_changed: u64,
}

/// Dispatches every pending/failed chunk of `run_id` concurrently (capped
/// at `cfg.chord_split_at` in flight at once, matching the supplier
/// integration's own split threshold for how many chord children run
/// before the group is itself partitioned), and blocks until all have
/// reported back — the convergence barrier.
pub async fn dispatch_run(
    repo: Arc<dyn SyncRepository>,
    supplier: Arc<SupplierClient>,
    run_id: Uuid,
    cfg: &SyncConfig,
) -> Result<DispatchSummary> {
    let chunks = repo.pending_or_failed_chunks(run_id).await?;
    let total_chunks = chunks.len();
    info!(run_id = %run_id, total_chunks, "dispatching sync chunks");

    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut total_changed = 0u64;

    for batch in chunks.chunks(cfg.chord_split_at.max(1)) {
        let futures = batch.iter().map(|chunk| {
            let repo = repo.clone();
            let supplier = supplier.clone();
            let chunk = chunk.clone();
            async move { run_chunk(repo.as_ref(), supplier.as_ref(), &chunk).await }
        });

        let outcomes: Vec<ChunkOutcome> = futures::future::join_all(futures).await;
        for outcome in outcomes {
            match outcome {
                ChunkOutcome::Succeeded { changed, .. } => {
                    succeeded += 1;
                    total_changed += changed;
                }
                ChunkOutcome::Failed { chunk_idx, error } => {
                    failed += 1;
                    warn!(run_id = %run_id, chunk_idx, %error, "chunk failed");
                }
            }
        }
    }

    Ok(DispatchSummary {
        total_chunks,
        succeeded,
        failed,
        total_changed,
    })
}

/// Resumption entry point: re-dispatches only chunks left `pending` or
/// `failed` from a prior, interrupted run — chunks already `succeeded`
/// are left untouched, matching the manifest's idempotent-task-id
/// convention (`SyncChunkManifestEntry::task_id`).
pub async fn resume_run(
    repo: Arc<dyn SyncRepository>,
    supplier: Arc<SupplierClient>,
    run_id: Uuid,
    cfg: &SyncConfig,
) -> Result<DispatchSummary> {
    dispatch_run(repo, supplier, run_id, cfg).await
}
