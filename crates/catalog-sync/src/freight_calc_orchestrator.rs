//! Freight/pricing batch recalculation: `kick` creates a run and selects
//! candidate SKUs (either a product-sync run's own candidates, or —
//! manual trigger — every SKU whose stored attribute hash no longer
//! matches its last-calculated one); `run` computes and persists results
//! in batches, committing after each batch so long recalcs never hold a
//! single long-lived transaction.
//!
//! Grounded on `freight_task.py`'s `kick_freight_calc`/`freight_calc_run`
//! pair and `freight_cal_service.py`'s per-batch compute-and-diff loop
//! (already the basis for [`crate::pricing`]).

use crate::pricing::{compute_all, FreightInputs};
use crate::repository::SyncRepository;
use crate::types::{FreightResult, FreightRunStatus};
use chrono::Utc;
use erp_core::error::Result;
use erp_core::{FreightCalcConfig, SyncConfig};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Creates a freight-calculation run for `product_run_id`'s own
/// candidates (post-sync trigger) or, when `product_run_id` is `None`, a
/// manual/scheduled trigger that recalculates every SKU whose hash has
/// drifted from its last persisted result.
pub async fn kick(
    repo: Arc<dyn SyncRepository>,
    product_run_id: Option<Uuid>,
    trigger: &str,
    cfg: FreightCalcConfig,
    sync_cfg: &SyncConfig,
) -> Result<String> {
    let run = repo.create_freight_run(product_run_id, trigger).await?;
    run_batches(repo, run.id.clone(), product_run_id, cfg, sync_cfg).await?;
    Ok(run.id)
}

async fn candidate_skus(
    repo: &dyn SyncRepository,
    product_run_id: Option<Uuid>,
) -> Result<Vec<String>> {
    match product_run_id {
        Some(run_id) => repo.candidate_skus_for_run(run_id).await,
        None => {
            let all = repo.all_sku_codes().await?;
            repo.skus_needing_recalc(&all).await
        }
    }
}

async fn run_batches(
    repo: Arc<dyn SyncRepository>,
    run_id: String,
    product_run_id: Option<Uuid>,
    cfg: FreightCalcConfig,
    sync_cfg: &SyncConfig,
) -> Result<()> {
    let targets = candidate_skus(repo.as_ref(), product_run_id).await?;
    repo.set_freight_run_candidate_count(&run_id, targets.len() as i64).await?;

    if targets.is_empty() {
        repo.finish_freight_run(&run_id, FreightRunStatus::Completed, 0, Some("no sku to calc"))
            .await?;
        return Ok(());
    }

    let mut changed_total = 0i64;
    let mut had_error: Option<String> = None;

    'batches: for batch in targets.chunks(sync_cfg.freight_batch_size) {
        let existing = repo.load_existing_by_skus(batch).await?;
        let mut batch_changed = 0i64;

        for sku_code in batch {
            let Some(sku) = existing.get(sku_code) else {
                continue;
            };

            let inputs = FreightInputs {
                price: sku.price,
                special_price: sku.special_price,
                weight: sku.weight,
                cbm: cubic_volume(sku.length, sku.width, sku.height),
                state_freight: sku.state_freight(),
            };
            let outputs = compute_all(&inputs, &cfg);

            let prior = match repo.load_freight_result(sku_code).await {
                Ok(p) => p,
                Err(e) => {
                    had_error = Some(e.to_string());
                    break 'batches;
                }
            };

            let changed = prior
                .as_ref()
                .map(|p| {
                    p.selling_price != outputs.selling_price
                        || p.shopify_price != outputs.shopify_price
                        || p.kogan_au_price != outputs.kogan_au_price
                        || p.kogan_k1_price != outputs.kogan_k1_price
                        || p.kogan_nz_price != outputs.kogan_nz_price
                        || p.shipping_type != outputs.shipping_type
                        || p.attrs_hash_last_calc != sku.attrs_hash_current
                })
                .unwrap_or(true);

            if !changed {
                continue;
            }

            let result = FreightResult {
                sku_code: sku_code.clone(),
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
                last_changed_source: Some("freight_calc".to_string()),
                last_changed_at: Utc::now(),
                kogan_dirty_au: true,
                kogan_dirty_nz: true,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            };

            if let Err(e) = repo.upsert_freight_result(&result).await {
                had_error = Some(e.to_string());
                break 'batches;
            }
            batch_changed += 1;
        }

        changed_total += batch_changed;
        if batch_changed > 0 {
            info!(run_id = %run_id, batch_changed, changed_total, "freight calc batch committed");
        }
    }

    match had_error {
        Some(err) => {
            warn!(run_id = %run_id, %err, "freight calc run failed");
            repo.finish_freight_run(&run_id, FreightRunStatus::Failed, changed_total, Some(&err))
                .await?;
        }
        None => {
            repo.finish_freight_run(&run_id, FreightRunStatus::Completed, changed_total, None)
                .await?;
        }
    }

    Ok(())
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
    use rust_decimal_macros::dec;

    #[test]
    fn cubic_volume_requires_all_three_dimensions() {
        assert!(cubic_volume(Some(dec!(10)), Some(dec!(10)), None).is_none());
        assert_eq!(
            cubic_volume(Some(dec!(100)), Some(dec!(100)), Some(dec!(100))),
            Some(dec!(1))
        );
    }
}
