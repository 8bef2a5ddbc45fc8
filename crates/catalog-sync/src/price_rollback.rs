//! Price-rollback orchestrator: every SKU whose special price expires by
//! tomorrow (local date) has its selling price reset to its regular
//! price, and the Kogan/K1/NZ prices recomputed from that reset price —
//! then the result is written back to the storefront as metafield
//! updates, with ok/fail counts aggregated across the write-back batches.
//!
//! Grounded on `price_reset.py` (candidate selection, per-batch
//! recompute, column-level changed-price upsert, run-id generation) and
//! `price_reset_batch.py` (the storefront write-back phase: transient
//! failures retried, business `userErrors` reported not retried, then
//! aggregated).

use crate::pricing::{compute_all, FreightInputs};
use crate::repository::SyncRepository;
use crate::storefront_client::StorefrontClient;
use crate::types::FreightResult;
use chrono::Utc;
use chrono_tz::Australia::Melbourne;
use erp_core::error::Result;
use erp_core::{FreightCalcConfig, SyncConfig};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

pub struct RollbackOutcome {
    pub run_id: String,
    pub processed: u64,
    pub changed: u64,
    pub storefront_ok: u64,
    pub storefront_failed: u64,
}

fn generate_run_id() -> String {
    format!("PR_{}", Utc::now().with_timezone(&Melbourne).timestamp_millis())
}

/// Tomorrow's date in Australia/Melbourne — candidates are SKUs whose
/// `special_price_end_date` is on or before this date, i.e. expiring by
/// tomorrow.
fn tomorrow_local_date() -> chrono::NaiveDate {
    Utc::now().with_timezone(&Melbourne).date_naive() + chrono::Duration::days(1)
}

pub async fn kick(
    repo: Arc<dyn SyncRepository>,
    storefront: Arc<StorefrontClient>,
    cfg: FreightCalcConfig,
    sync_cfg: &SyncConfig,
) -> Result<RollbackOutcome> {
    let run_id = generate_run_id();
    let target_date = tomorrow_local_date();

    let all_skus = repo.all_sku_codes().await?;
    let existing = repo.load_existing_by_skus(&all_skus).await?;

    let candidates: Vec<_> = existing
        .values()
        .filter(|sku| {
            sku.special_price_end_date
                .map(|d| d <= target_date)
                .unwrap_or(false)
        })
        .cloned()
        .collect();

    info!(run_id = %run_id, target_date = %target_date, candidates = candidates.len(), "price rollback candidates selected");

    let mut processed = 0u64;
    let mut changed = 0u64;
    let mut metafields_batch = Vec::new();

    for batch in candidates.chunks(sync_cfg.price_reset_upsert_chunk) {
        for sku in batch {
            processed += 1;
            let Some(reset_price) = sku.price else { continue };

            let inputs = FreightInputs {
                price: Some(reset_price),
                special_price: None, // expired: rolled back to list price
                weight: sku.weight,
                cbm: cubic_volume(sku.length, sku.width, sku.height),
                state_freight: sku.state_freight(),
            };
            let outputs = compute_all(&inputs, &cfg);

            let result = FreightResult {
                sku_code: sku.sku_code.clone(),
                adjust: outputs.adjust,
                same_shipping: outputs.same_shipping,
                shipping_ave: outputs.shipping_ave,
                shipping_ave_m: outputs.shipping_ave_m,
                shipping_ave_r: outputs.shipping_ave_r,
                shipping_med: outputs.shipping_med,
                remote_check: outputs.remote_check,
                rural_ave: outputs.rural_ave,
                weighted_ave_s: outputs.weighted_ave_s,
                shipping_med_dif: outputs.shipping_med_dif,
                weight: outputs.weight,
                cubic_weight: outputs.cubic_weight,
                shipping_type: outputs.shipping_type,
                price_ratio: outputs.price_ratio,
                selling_price: outputs.selling_price,
                shopify_price: outputs.shopify_price,
                kogan_au_price: outputs.kogan_au_price,
                kogan_k1_price: outputs.kogan_k1_price,
                kogan_nz_price: outputs.kogan_nz_price,
                attrs_hash_last_calc: sku.attrs_hash_current.clone(),
                last_changed_run_id: Some(run_id.clone()),
                last_changed_source: Some("price_reset".to_string()),
                last_changed_at: Utc::now(),
                kogan_dirty_au: true,
                kogan_dirty_nz: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };

            repo.upsert_freight_result(&result).await?;
            changed += 1;

            if let Some(variant_id) = &sku.shopify_variant_id {
                metafields_batch.push(json!({
                    "ownerId": variant_id,
                    "namespace": "catalog_sync",
                    "key": "price",
                    "type": "money",
                    "value": outputs.selling_price.map(|p| p.to_string()).unwrap_or_default(),
                }));
            }
        }
    }

    let (storefront_ok, storefront_failed) = write_back(storefront.as_ref(), &metafields_batch).await;

    info!(run_id = %run_id, processed, changed, storefront_ok, storefront_failed, "price rollback finished");

    Ok(RollbackOutcome {
        run_id,
        processed,
        changed,
        storefront_ok,
        storefront_failed,
    })
}

/// Pushes the recomputed prices to the storefront in chunks, aggregating
/// ok/fail counts the way `finalize_price_reset` aggregates its chord's
/// child results.
async fn write_back(storefront: &StorefrontClient, metafields: &[serde_json::Value]) -> (u64, u64) {
    let mut ok = 0u64;
    let mut failed = 0u64;

    for chunk in metafields.chunks(50) {
        match storefront.metafields_set_batch(chunk).await {
            Ok(outcome) => {
                ok += outcome.ok as u64;
                failed += outcome.failed as u64;
            }
            Err(e) => {
                warn!("price rollback write-back chunk failed: {e}");
                failed += chunk.len() as u64;
            }
        }
    }

    (ok, failed)
}

fn cubic_volume(
    length: Option<rust_decimal::Decimal>,
    width: Option<rust_decimal::Decimal>,
    height: Option<rust_decimal::Decimal>,
) -> Option<rust_decimal::Decimal> {
    Some(length? * width? * height? / rust_decimal::Decimal::from(1_000_000))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tomorrow_local_date_is_after_today() {
        let today = Utc::now().with_timezone(&Melbourne).date_naive();
        assert_eq!(tomorrow_local_date(), today + chrono::Duration::days(1));
    }
}
