//! Per-chunk unit of work: fetch the chunk's SKUs (and their zone rates)
//! from the supplier, normalize the payload onto `SkuMaster`, diff against
//! the stored row, upsert whatever changed, and report the outcome back
//! to the manifest.

use crate::attrs_hash::calc_attrs_hash_current;
use crate::repository::SyncRepository;
use crate::supplier_client::{self, RawProduct, SupplierClient, ZoneRateRow};
use crate::types::SkuMaster;
use chrono::Utc;
use erp_core::error::Result;
use rust_decimal::Decimal;
use serde_json::Value;
use std::collections::HashMap;
use tracing::{info, warn};
use uuid::Uuid;

pub enum ChunkOutcome {
    Succeeded { chunk_idx: i32, changed: u64 },
    Failed { chunk_idx: i32, error: String },
}

fn dec_field(item: &RawProduct, key: &str) -> Option<Decimal> {
    item.get(key).and_then(|v| {
        if let Some(s) = v.as_str() {
            s.parse().ok()
        } else {
            v.as_f64().and_then(|f| Decimal::try_from(f).ok())
        }
    })
}

fn str_field(item: &RawProduct, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_str()).map(|s| s.to_string())
}

fn int_field(item: &RawProduct, key: &str) -> Option<i32> {
    item.get(key).and_then(|v| v.as_i64()).map(|v| v as i32)
}

/// Merges a raw supplier payload (and, if present, a matching zone-rates
/// row) onto the existing stored SKU (or a fresh shell, for a new SKU),
/// recomputing `attrs_hash_current` last so it reflects the merged state.
pub fn normalize_sku_payload(
    sku_code: &str,
    existing: Option<&SkuMaster>,
    raw: &RawProduct,
    zone: Option<&ZoneRateRow>,
) -> SkuMaster {
    let now = Utc::now();
    let mut merged = existing.cloned().unwrap_or_else(|| SkuMaster {
        id: Uuid::new_v4(),
        sku_code: sku_code.to_string(),
        shopify_variant_id: None,
        stock_qty: None,
        price: None,
        rrp_price: None,
        special_price: None,
        special_price_end_date: None,
        shopify_price: None,
        product_tags: None,
        brand: None,
        weight: None,
        length: None,
        width: None,
        height: None,
        ean_code: None,
        supplier: None,
        freight_act: None,
        freight_nsw_m: None,
        freight_nsw_r: None,
        freight_nt_m: None,
        freight_nt_r: None,
        freight_qld_m: None,
        freight_qld_r: None,
        remote: None,
        freight_sa_m: None,
        freight_sa_r: None,
        freight_tas_m: None,
        freight_tas_r: None,
        freight_vic_m: None,
        freight_vic_r: None,
        freight_wa_m: None,
        freight_wa_r: None,
        freight_nz: None,
        attrs_hash_current: String::new(),
        created_at: now,
        updated_at: now,
        last_changed_at: now,
    });

    merged.price = dec_field(raw, "price").or(merged.price);
    merged.rrp_price = dec_field(raw, "rrp_price").or(merged.rrp_price);
    merged.special_price = dec_field(raw, "special_price").or(merged.special_price);
    merged.special_price_end_date = raw
        .get("special_price_end_date")
        .and_then(|v| v.as_str())
        .and_then(|s| chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
        .or(merged.special_price_end_date);
    merged.stock_qty = int_field(raw, "stock_qty").or(merged.stock_qty);
    merged.weight = dec_field(raw, "weight").or(merged.weight);
    merged.length = dec_field(raw, "length").or(merged.length);
    merged.width = dec_field(raw, "width").or(merged.width);
    merged.height = dec_field(raw, "height").or(merged.height);
    merged.brand = str_field(raw, "brand").or(merged.brand);
    merged.ean_code = str_field(raw, "ean_code").or(merged.ean_code);
    merged.supplier = str_field(raw, "supplier").or(Some("dsz".to_string()));

    if let Some(zone) = zone {
        if let Some(standard) = &zone.standard {
            merged.freight_act = decimal_of(standard, "ACT").or(merged.freight_act);
            merged.freight_nsw_m = decimal_of(standard, "NSW_M").or(merged.freight_nsw_m);
            merged.freight_nsw_r = decimal_of(standard, "NSW_R").or(merged.freight_nsw_r);
            merged.freight_nt_m = decimal_of(standard, "NT_M").or(merged.freight_nt_m);
            merged.freight_nt_r = decimal_of(standard, "NT_R").or(merged.freight_nt_r);
            merged.freight_qld_m = decimal_of(standard, "QLD_M").or(merged.freight_qld_m);
            merged.freight_qld_r = decimal_of(standard, "QLD_R").or(merged.freight_qld_r);
            merged.remote = decimal_of(standard, "REMOTE").or(merged.remote);
            merged.freight_sa_m = decimal_of(standard, "SA_M").or(merged.freight_sa_m);
            merged.freight_sa_r = decimal_of(standard, "SA_R").or(merged.freight_sa_r);
            merged.freight_tas_m = decimal_of(standard, "TAS_M").or(merged.freight_tas_m);
            merged.freight_tas_r = decimal_of(standard, "TAS_R").or(merged.freight_tas_r);
            merged.freight_vic_m = decimal_of(standard, "VIC_M").or(merged.freight_vic_m);
            merged.freight_vic_r = decimal_of(standard, "VIC_R").or(merged.freight_vic_r);
            merged.freight_wa_m = decimal_of(standard, "WA_M").or(merged.freight_wa_m);
            merged.freight_wa_r = decimal_of(standard, "WA_R").or(merged.freight_wa_r);
            merged.freight_nz = decimal_of(standard, "NZ").or(merged.freight_nz);
        }
    }

    merged.attrs_hash_current = calc_attrs_hash_current(&merged);
    merged.updated_at = now;
    if existing.map(|e| e.attrs_hash_current.as_str()) != Some(merged.attrs_hash_current.as_str()) {
        merged.last_changed_at = now;
    }
    merged
}

fn decimal_of(value: &Value, key: &str) -> Option<Decimal> {
    value.get(key).and_then(|v| {
        if let Some(s) = v.as_str() {
            s.parse().ok()
        } else {
            v.as_f64().and_then(|f| Decimal::try_from(f).ok())
        }
    })
}

/// Runs one chunk end to end: fetch -> normalize -> upsert -> report.
/// Never panics on a partial supplier response — missing/extra SKUs are
/// recorded on the manifest row rather than failing the chunk outright;
/// only a hard repository error fails it.
pub async fn run_chunk(
    repo: &dyn SyncRepository,
    supplier: &SupplierClient,
    chunk: &crate::types::SyncChunkManifestEntry,
) -> ChunkOutcome {
    let run_id = chunk.run_id;
    let chunk_idx = chunk.chunk_idx;

    if let Err(e) = repo.mark_chunk_running(run_id, chunk_idx).await {
        return ChunkOutcome::Failed {
            chunk_idx,
            error: e.to_string(),
        };
    }

    let sku_codes: Vec<String> = serde_json::from_value(chunk.sku_codes.clone()).unwrap_or_default();

    match process_chunk(repo, supplier, run_id, chunk_idx, &sku_codes).await {
        Ok(changed) => ChunkOutcome::Succeeded {
            chunk_idx,
            changed,
        },
        Err(e) => {
            let _ = repo.mark_chunk_failed(run_id, chunk_idx, &e.to_string()).await;
            ChunkOutcome::Failed {
                chunk_idx,
                error: e.to_string(),
            }
        }
    }
}

async fn process_chunk(
    repo: &dyn SyncRepository,
    supplier: &SupplierClient,
    run_id: Uuid,
    chunk_idx: i32,
    sku_codes: &[String],
) -> Result<u64> {
    let products = supplier_client::fetch_products_by_skus(supplier, sku_codes).await?;
    let zone_rates = supplier_client::fetch_zone_rates_by_skus(supplier, sku_codes).await?;

    let zone_by_sku: HashMap<&str, &ZoneRateRow> =
        zone_rates.iter().map(|z| (z.sku.as_str(), z)).collect();
    let product_by_sku: HashMap<&str, &RawProduct> = products
        .iter()
        .filter_map(|p| p.get("sku").and_then(|v| v.as_str()).map(|sku| (sku, p)))
        .collect();

    let existing = repo.load_existing_by_skus(sku_codes).await?;

    let returned_skus: std::collections::HashSet<&str> = product_by_sku.keys().copied().collect();
    let requested_skus: std::collections::HashSet<&str> = sku_codes.iter().map(|s| s.as_str()).collect();
    let missing: Vec<String> = requested_skus
        .difference(&returned_skus)
        .map(|s| s.to_string())
        .collect();

    if !missing.is_empty() {
        warn!(run_id = %run_id, chunk_idx, missing = missing.len(), "chunk has missing supplier SKUs");
    }

    let mut normalized = Vec::new();
    for sku_code in sku_codes {
        let Some(raw) = product_by_sku.get(sku_code.as_str()) else {
            continue;
        };
        let zone = zone_by_sku.get(sku_code.as_str()).copied();
        let prior = existing.get(sku_code);
        normalized.push(normalize_sku_payload(sku_code, prior, raw, zone));
    }

    let changed: Vec<SkuMaster> = normalized
        .into_iter()
        .filter(|row| {
            existing
                .get(&row.sku_code)
                .map(|prior| prior.attrs_hash_current != row.attrs_hash_current)
                .unwrap_or(true)
        })
        .collect();

    let changed_count = changed.len() as u64;
    if !changed.is_empty() {
        repo.bulk_upsert_sku_master(&changed).await?;
    }

    repo.mark_chunk_succeeded(
        run_id,
        chunk_idx,
        missing.len() as i32,
        0,
        0,
        sku_codes.len() as i32,
        product_by_sku.len() as i32,
        &missing,
        &[],
        &[],
    )
    .await?;

    info!(run_id = %run_id, chunk_idx, changed = changed_count, "chunk completed");
    Ok(changed_count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_product(sku: &str, price: &str) -> RawProduct {
        json!({ "sku": sku, "price": price, "weight": "1.2" })
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn normalize_assigns_fresh_id_for_new_sku() {
        let raw = raw_product("NEW-1", "19.99");
        let row = normalize_sku_payload("NEW-1", None, &raw, None);
        assert_eq!(row.sku_code, "NEW-1");
        assert_eq!(row.price.unwrap().to_string(), "19.99");
    }

    #[test]
    fn normalize_preserves_identity_and_overlays_changed_fields() {
        let existing = SkuMaster {
            id: Uuid::new_v4(),
            sku_code: "SKU-9".to_string(),
            shopify_variant_id: Some("gid://1".to_string()),
            stock_qty: Some(5),
            price: Some(rust_decimal_macros::dec!(10)),
            rrp_price: None,
            special_price: None,
            special_price_end_date: None,
            shopify_price: None,
            product_tags: None,
            brand: Some("Acme".to_string()),
            weight: Some(rust_decimal_macros::dec!(1)),
            length: None,
            width: None,
            height: None,
            ean_code: None,
            supplier: Some("dsz".to_string()),
            freight_act: None,
            freight_nsw_m: None,
            freight_nsw_r: None,
            freight_nt_m: None,
            freight_nt_r: None,
            freight_qld_m: None,
            freight_qld_r: None,
            remote: None,
            freight_sa_m: None,
            freight_sa_r: None,
            freight_tas_m: None,
            freight_tas_r: None,
            freight_vic_m: None,
            freight_vic_r: None,
            freight_wa_m: None,
            freight_wa_r: None,
            freight_nz: None,
            attrs_hash_current: "old-hash".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_changed_at: Utc::now(),
        };

        let raw = raw_product("SKU-9", "25.00");
        let row = normalize_sku_payload("SKU-9", Some(&existing), &raw, None);

        assert_eq!(row.id, existing.id);
        assert_eq!(row.shopify_variant_id, existing.shopify_variant_id);
        assert_eq!(row.price.unwrap().to_string(), "25.00");
        assert_ne!(row.attrs_hash_current, "old-hash");
    }
}
