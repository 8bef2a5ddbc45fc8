//! Domain models for the catalog sync engine: the SKU master, freight
//! calculation results, sync-run bookkeeping, chunk manifests, change
//! candidates, and export jobs. Field names mirror the schema the
//! repository layer assumes (see `migrations/`).

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// A single SKU's master record: identity, pricing, dimensions, and the
/// 17 zonal freight rate fields supplied by the supplier's zone-rates
/// endpoint (16 AU states/regions + NZ).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SkuMaster {
    pub id: Uuid,
    pub sku_code: String,
    pub shopify_variant_id: Option<String>,
    pub stock_qty: Option<i32>,
    pub price: Option<Decimal>,
    pub rrp_price: Option<Decimal>,
    pub special_price: Option<Decimal>,
    pub special_price_end_date: Option<NaiveDate>,
    pub shopify_price: Option<Decimal>,
    pub product_tags: Option<serde_json::Value>,
    pub brand: Option<String>,
    pub weight: Option<Decimal>,
    pub length: Option<Decimal>,
    pub width: Option<Decimal>,
    pub height: Option<Decimal>,
    pub ean_code: Option<String>,
    pub supplier: Option<String>,

    pub freight_act: Option<Decimal>,
    pub freight_nsw_m: Option<Decimal>,
    pub freight_nsw_r: Option<Decimal>,
    pub freight_nt_m: Option<Decimal>,
    pub freight_nt_r: Option<Decimal>,
    pub freight_qld_m: Option<Decimal>,
    pub freight_qld_r: Option<Decimal>,
    pub remote: Option<Decimal>,
    pub freight_sa_m: Option<Decimal>,
    pub freight_sa_r: Option<Decimal>,
    pub freight_tas_m: Option<Decimal>,
    pub freight_tas_r: Option<Decimal>,
    pub freight_vic_m: Option<Decimal>,
    pub freight_vic_r: Option<Decimal>,
    pub freight_wa_m: Option<Decimal>,
    pub freight_wa_r: Option<Decimal>,
    pub freight_nz: Option<Decimal>,

    pub attrs_hash_current: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_changed_at: DateTime<Utc>,
}

impl SkuMaster {
    /// Field values keyed exactly as the pricing calculator expects
    /// (`ACT`, `NSW_M`, ..., `REMOTE`, `NZ`) — the 12-state `STATES_ALL`
    /// set excludes `WA_R`, and `NT_M`/`NT_R` are carried for the
    /// attribute hash but never enter this map's consumers in `pricing`.
    pub fn state_freight(&self) -> HashMap<&'static str, Option<Decimal>> {
        HashMap::from([
            ("ACT", self.freight_act),
            ("NSW_M", self.freight_nsw_m),
            ("NSW_R", self.freight_nsw_r),
            ("NT_M", self.freight_nt_m),
            ("NT_R", self.freight_nt_r),
            ("QLD_M", self.freight_qld_m),
            ("QLD_R", self.freight_qld_r),
            ("SA_M", self.freight_sa_m),
            ("SA_R", self.freight_sa_r),
            ("TAS_M", self.freight_tas_m),
            ("TAS_R", self.freight_tas_r),
            ("VIC_M", self.freight_vic_m),
            ("VIC_R", self.freight_vic_r),
            ("WA_M", self.freight_wa_m),
            ("WA_R", self.freight_wa_r),
            ("REMOTE", self.remote),
            ("NZ", self.freight_nz),
        ])
    }
}

/// The 23 fields used to derive `attrs_hash_current` — price, size/weight,
/// and every zonal freight field (including NT, kept for backward
/// compatibility though it never feeds the averaging computation).
pub const FREIGHT_HASH_FIELDS: &[&str] = &[
    "price",
    "special_price",
    "special_price_end_date",
    "length",
    "width",
    "height",
    "weight",
    "freight_act",
    "freight_nsw_m",
    "freight_nsw_r",
    "freight_nt_m",
    "freight_nt_r",
    "freight_qld_m",
    "freight_qld_r",
    "remote",
    "freight_sa_m",
    "freight_sa_r",
    "freight_tas_m",
    "freight_tas_r",
    "freight_vic_m",
    "freight_vic_r",
    "freight_wa_m",
    "freight_wa_r",
    "freight_nz",
];

/// Fields from `FREIGHT_HASH_FIELDS` that are also sync-candidate
/// columns, used to decide whether a changed SKU needs freight
/// recalculation (`get_candidate_skus_from_run`).
pub fn freight_relevant_fields() -> &'static [&'static str] {
    FREIGHT_HASH_FIELDS
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum SyncRunType {
    FullSync,
    PriceReset,
    Incremental,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum SyncRunStatus {
    Running,
    Completed,
    CompletedWithGaps,
    Failed,
}

/// A full-sync / price-reset / incremental run, mirroring `ProductSyncRun`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductSyncRun {
    pub id: Uuid,
    pub run_type: SyncRunType,
    pub status: SyncRunStatus,
    pub shopify_bulk_id: Option<String>,
    pub shopify_bulk_status: Option<String>,
    pub shopify_bulk_url: Option<String>,
    pub total_shopify_skus: Option<i64>,
    pub changed_count: Option<i64>,
    pub note: Option<String>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub webhook_received_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum ChunkStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
}

/// A single partition of a full-sync run's SKU set, carrying the
/// supplier-fetch reconciliation counters used for the S5/alerting
/// invariants (P4: missing/failed SKUs never silently vanish).
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SyncChunkManifestEntry {
    pub id: i64,
    pub run_id: Uuid,
    pub chunk_idx: i32,
    pub status: ChunkStatus,
    pub sku_codes: serde_json::Value,
    pub sku_count: i32,
    pub dsz_missing: i32,
    pub dsz_failed_batches: i32,
    pub dsz_failed_skus: i32,
    pub dsz_requested_total: i32,
    pub dsz_returned_total: i32,
    pub dsz_missing_sku_list: serde_json::Value,
    pub dsz_failed_sku_list: serde_json::Value,
    pub dsz_extra_sku_list: serde_json::Value,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl SyncChunkManifestEntry {
    /// Deterministic task id for this chunk's worker, satisfying the
    /// idempotent-task-id convention (`ps:chunk:{run}:{idx}`).
    pub fn task_id(&self) -> String {
        format!("ps:chunk:{}:{}", self.run_id, self.chunk_idx)
    }
}

/// A diffed SKU awaiting persistence as a sync candidate, mirroring
/// `ProductSyncCandidate`: `change_mask` records which fields differed,
/// `new_snapshot` is the full post-change state.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct SyncChangeCandidate {
    pub id: i64,
    pub run_id: Uuid,
    pub sku_code: String,
    pub change_mask: serde_json::Value,
    pub new_snapshot: serde_json::Value,
    pub change_count: i32,
}

/// Builds the rows for `save_candidates`: dedups by `(run_id, sku_code)`
/// (last write wins, matching `build_candidate_rows`), computes the
/// boolean change mask and non-zero change count.
pub fn build_candidate_rows(
    run_id: Uuid,
    diffs: Vec<(String, std::collections::HashSet<String>, serde_json::Value)>,
) -> Vec<SyncChangeCandidate> {
    let mut by_sku: HashMap<String, (std::collections::HashSet<String>, serde_json::Value)> =
        HashMap::new();
    for (sku, changed_fields, snapshot) in diffs {
        by_sku.insert(sku, (changed_fields, snapshot));
    }

    by_sku
        .into_iter()
        .filter_map(|(sku_code, (changed_fields, new_snapshot))| {
            if changed_fields.is_empty() {
                return None;
            }
            let mut mask = serde_json::Map::new();
            for field in &changed_fields {
                mask.insert(field.clone(), serde_json::Value::Bool(true));
            }
            Some(SyncChangeCandidate {
                id: 0,
                run_id,
                sku_code,
                change_count: changed_fields.len() as i32,
                change_mask: serde_json::Value::Object(mask),
                new_snapshot,
            })
        })
        .collect()
}

/// Mirrors `SkuFreightFee` — the computed freight/pricing result row.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FreightResult {
    pub sku_code: String,
    pub adjust: Option<Decimal>,
    pub same_shipping: Option<Decimal>,
    pub shipping_ave: Option<Decimal>,
    pub shipping_ave_m: Option<Decimal>,
    pub shipping_ave_r: Option<Decimal>,
    pub shipping_med: Option<Decimal>,
    pub remote_check: bool,
    pub rural_ave: Option<Decimal>,
    pub weighted_ave_s: Option<Decimal>,
    pub shipping_med_dif: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub cubic_weight: Option<Decimal>,
    pub shipping_type: String,
    pub price_ratio: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub shopify_price: Option<Decimal>,
    pub kogan_au_price: Option<Decimal>,
    pub kogan_k1_price: Option<Decimal>,
    pub kogan_nz_price: Option<Decimal>,
    pub attrs_hash_last_calc: String,
    pub last_changed_run_id: Option<String>,
    pub last_changed_source: Option<String>,
    pub last_changed_at: DateTime<Utc>,
    pub kogan_dirty_au: bool,
    pub kogan_dirty_nz: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum FreightRunStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FreightCalculationRun {
    pub id: String,
    pub status: FreightRunStatus,
    pub triggered_by: String,
    pub product_run_id: Option<Uuid>,
    pub candidate_count: Option<i64>,
    pub changed_count: Option<i64>,
    pub message: Option<String>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Mirrors the `schedules` table: a business-keyed tick trigger.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ScheduleEntry {
    pub key: String,
    pub enabled: bool,
    pub day_of_week: String,
    pub hour: i32,
    pub minute: i32,
    pub every_2_weeks: bool,
    pub timezone: String,
    pub last_run_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum CountryType {
    Au,
    Nz,
}

impl CountryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountryType::Au => "au",
            CountryType::Nz => "nz",
        }
    }
}

impl std::fmt::Display for CountryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
pub enum ExportJobStatus {
    Pending,
    Exported,
    Failed,
    Applied,
    ApplyFailed,
}

/// Mirrors `KoganExportJob`: a generated CSV template plus the child
/// per-SKU payloads needed to replay the write at apply time without
/// re-deriving it from the CSV bytes.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExportJob {
    pub id: String,
    pub country_type: String,
    pub status: ExportJobStatus,
    pub file_name: String,
    pub file_size: i32,
    pub row_count: i32,
    pub file_content: Vec<u8>,
    pub note: Option<String>,
    pub exported_at: Option<DateTime<Utc>>,
    pub applied_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ExportJobSku {
    pub id: i64,
    pub job_id: String,
    pub sku: String,
    pub template_payload: serde_json::Value,
    pub changed_columns: serde_json::Value,
}
