//! Catalog-sync operator commands: one-off triggers for the full
//! product sync, the price-reset rollback, and Kogan export-job
//! application, run straight from the CLI against the same
//! `erp-catalog-sync` orchestrators the API process uses for its
//! scheduled/webhook-driven runs.

use anyhow::{anyhow, Result};
use colored::*;
use erp_catalog_sync::repository::{PostgresSyncRepository, SyncRepository};
use erp_catalog_sync::supplier_client::SupplierClient;
use erp_catalog_sync::storefront_client::StorefrontClient;
use erp_catalog_sync::{export, freight_calc_orchestrator, full_sync, price_rollback};
use erp_core::config::DatabaseConfig;
use erp_core::rate_limit::{FixedIntervalPacer, RateLimiter};
use erp_core::{Config as CoreConfig, DatabasePool};
use std::sync::Arc;
use uuid::Uuid;

use crate::{config::Config, CatalogSyncCommands};

pub async fn execute_catalog_sync_command(
    cmd: CatalogSyncCommands,
    config: &Config,
    database_url: Option<&str>,
) -> Result<()> {
    let db_url = database_url
        .or(config.database_url.as_deref())
        .ok_or_else(|| anyhow!("Database URL not provided"))?;

    match cmd {
        CatalogSyncCommands::TriggerFullSync => trigger_full_sync(db_url).await,
        CatalogSyncCommands::ResumeFullSync { run_id } => resume_full_sync(db_url, &run_id).await,
        CatalogSyncCommands::TriggerPriceReset => trigger_price_reset(db_url).await,
        CatalogSyncCommands::TriggerFreightRecalc => trigger_freight_recalc(db_url).await,
        CatalogSyncCommands::ApplyExportJob { job_id } => apply_export_job(db_url, &job_id).await,
    }
}

/// Builds the same `SyncRepository` the API process uses, against
/// whatever database URL this invocation resolved (`--database-url`,
/// the deploy config file, or `DATABASE_URL`).
async fn sync_repository(db_url: &str) -> Result<Arc<dyn SyncRepository>> {
    let pool = DatabasePool::new(DatabaseConfig {
        url: db_url.to_string(),
        max_connections: 5,
        min_connections: 1,
    })
    .await?;
    Ok(Arc::new(PostgresSyncRepository::new(pool.main_pool)))
}

/// A CLI invocation is a single operator-driven run, not a
/// long-lived server process sharing a Redis-backed limiter across
/// many workers — a local pacer is enough to stay polite to the
/// supplier without requiring Redis just to run one command.
fn cli_supplier_client(core_cfg: &CoreConfig) -> Result<Arc<SupplierClient>> {
    let limiter = RateLimiter::Local(FixedIntervalPacer::new(core_cfg.supplier.rate_limit_per_minute));
    Ok(Arc::new(SupplierClient::new(core_cfg.supplier.clone(), limiter)?))
}

fn cli_storefront_client(core_cfg: &CoreConfig) -> Result<Arc<StorefrontClient>> {
    Ok(Arc::new(StorefrontClient::new(core_cfg.storefront.clone())?))
}

async fn trigger_full_sync(db_url: &str) -> Result<()> {
    println!("{}", "🔄 Triggering a full product sync...".blue().bold());

    let core_cfg = CoreConfig::load()?;
    let repo = sync_repository(db_url).await?;
    let storefront = cli_storefront_client(&core_cfg)?;
    let supplier = cli_supplier_client(&core_cfg)?;

    let handle = full_sync::start_full_sync(repo.clone(), storefront.clone()).await?;
    println!(
        "  run_id: {}  bulk_operation_id: {}",
        handle.run_id.to_string().cyan(),
        handle.bulk_operation_id.cyan()
    );
    println!("{}", "Waiting for the storefront bulk export to finish...".yellow());

    full_sync::poll_and_finish(repo, supplier, storefront, &handle, &core_cfg.sync).await?;
    println!("{}", "✅ Full sync completed".green().bold());
    Ok(())
}

async fn resume_full_sync(db_url: &str, run_id: &str) -> Result<()> {
    println!("{}", "🔄 Resuming a stalled full sync...".blue().bold());

    let run_id: Uuid = run_id.parse().map_err(|_| anyhow!("invalid run id: {run_id}"))?;
    let core_cfg = CoreConfig::load()?;
    let repo = sync_repository(db_url).await?;
    let supplier = cli_supplier_client(&core_cfg)?;

    full_sync::resume_full_sync(repo, supplier, run_id, &core_cfg.sync).await?;
    println!("{}", "✅ Resume dispatched".green().bold());
    Ok(())
}

async fn trigger_price_reset(db_url: &str) -> Result<()> {
    println!("{}", "🔄 Triggering the price-reset rollback...".blue().bold());

    let core_cfg = CoreConfig::load()?;
    let repo = sync_repository(db_url).await?;
    let storefront = cli_storefront_client(&core_cfg)?;

    let outcome = price_rollback::kick(repo, storefront, core_cfg.freight_calc.clone(), &core_cfg.sync).await?;
    println!(
        "  run_id: {}  processed: {}  changed: {}  storefront ok/failed: {}/{}",
        outcome.run_id.cyan(),
        outcome.processed,
        outcome.changed,
        outcome.storefront_ok,
        outcome.storefront_failed
    );
    println!("{}", "✅ Price reset completed".green().bold());
    Ok(())
}

async fn trigger_freight_recalc(db_url: &str) -> Result<()> {
    println!("{}", "🔄 Triggering a manual freight recalculation...".blue().bold());

    let core_cfg = CoreConfig::load()?;
    let repo = sync_repository(db_url).await?;

    let run_id = freight_calc_orchestrator::kick(repo, None, "manual", core_cfg.freight_calc.clone(), &core_cfg.sync).await?;
    println!("  run_id: {}", run_id.cyan());
    println!("{}", "✅ Freight recalculation completed".green().bold());
    Ok(())
}

async fn apply_export_job(db_url: &str, job_id: &str) -> Result<()> {
    println!("{}", format!("🔄 Applying export job {job_id}...").blue().bold());

    let repo = sync_repository(db_url).await?;
    let applied = export::apply_export_job(repo, job_id).await?;

    println!("  applied: {}", applied.to_string().cyan());
    println!("{}", "✅ Export job applied".green().bold());
    Ok(())
}
