//! Persistence layer: SKU master upserts, sync-run/chunk bookkeeping,
//! freight-result column-level upserts, and the Kogan export-job tables.
//!
//! Mirrors the teacher's repository idiom (`crates/master-data/src/supplier/repository.rs`):
//! an `#[async_trait]` trait plus a `Postgres*` struct wrapping a plain
//! `sqlx::PgPool`, hand-written queries with `.bind(...)`, errors
//! propagated via `sqlx::Error`'s `From` impl into `erp_core::Error`. Per
//! `DESIGN.md`'s OQ-1, this bypasses the teacher's tenant-routed
//! `DatabasePool` entirely — catalog sync has no per-tenant schema.

use crate::types::{
    ChunkStatus, CountryType, ExportJob, ExportJobSku, ExportJobStatus, FreightCalculationRun,
    FreightResult, FreightRunStatus, ProductSyncRun, ScheduleEntry, SkuMaster, SyncChangeCandidate,
    SyncChunkManifestEntry, SyncRunStatus, SyncRunType,
};
use async_trait::async_trait;
use erp_core::error::Result;
use sqlx::{PgPool, Row};
use std::collections::HashMap;
use uuid::Uuid;

/// The full persistence surface the sync engine's orchestrators depend on.
/// Exists as a trait (rather than a bare struct) so orchestrator unit
/// tests can swap in [`InMemorySyncRepository`] without a database.
#[async_trait]
pub trait SyncRepository: Send + Sync {
    async fn load_existing_by_skus(&self, skus: &[String]) -> Result<HashMap<String, SkuMaster>>;

    /// Column-level `COALESCE` upsert: a field present (`Some`) in `rows`
    /// overwrites the stored value, a field absent (left at its prior
    /// value by the caller) is preserved — callers build `rows` from the
    /// supplier payload's own field whitelist, never a full overwrite.
    async fn bulk_upsert_sku_master(&self, rows: &[SkuMaster]) -> Result<u64>;

    async fn create_sync_run(&self, run_type: SyncRunType) -> Result<ProductSyncRun>;
    async fn update_sync_run_bulk_info(
        &self,
        run_id: Uuid,
        bulk_id: Option<&str>,
        bulk_status: Option<&str>,
        bulk_url: Option<&str>,
    ) -> Result<()>;
    async fn finish_sync_run(
        &self,
        run_id: Uuid,
        status: SyncRunStatus,
        changed_count: i64,
        note: Option<&str>,
    ) -> Result<()>;
    async fn get_sync_run(&self, run_id: Uuid) -> Result<Option<ProductSyncRun>>;
    async fn latest_running_sync_run(&self) -> Result<Option<ProductSyncRun>>;

    async fn save_candidates(&self, candidates: &[SyncChangeCandidate]) -> Result<u64>;
    async fn candidate_skus_for_run(&self, run_id: Uuid) -> Result<Vec<String>>;

    async fn upsert_chunk_pending(
        &self,
        run_id: Uuid,
        chunk_idx: i32,
        sku_codes: &[String],
    ) -> Result<SyncChunkManifestEntry>;
    async fn mark_chunk_running(&self, run_id: Uuid, chunk_idx: i32) -> Result<()>;
    async fn mark_chunk_succeeded(
        &self,
        run_id: Uuid,
        chunk_idx: i32,
        dsz_missing: i32,
        dsz_failed_batches: i32,
        dsz_failed_skus: i32,
        dsz_requested_total: i32,
        dsz_returned_total: i32,
        missing_skus: &[String],
        failed_skus: &[String],
        extra_skus: &[String],
    ) -> Result<()>;
    async fn mark_chunk_failed(&self, run_id: Uuid, chunk_idx: i32, error: &str) -> Result<()>;
    async fn chunks_for_run(&self, run_id: Uuid) -> Result<Vec<SyncChunkManifestEntry>>;
    async fn pending_or_failed_chunks(&self, run_id: Uuid) -> Result<Vec<SyncChunkManifestEntry>>;

    /// Column-level upsert of a computed freight result row. Only columns
    /// whose computed value actually changed from the stored row should
    /// be passed non-`None`; the caller (the freight orchestrator) does
    /// the diffing, this just persists whatever it's given.
    async fn upsert_freight_result(&self, result: &FreightResult) -> Result<()>;
    async fn load_freight_result(&self, sku_code: &str) -> Result<Option<FreightResult>>;
    async fn all_sku_codes(&self) -> Result<Vec<String>>;
    async fn skus_needing_recalc(&self, skus: &[String]) -> Result<Vec<String>>;

    async fn create_freight_run(
        &self,
        product_run_id: Option<Uuid>,
        triggered_by: &str,
    ) -> Result<FreightCalculationRun>;
    async fn set_freight_run_candidate_count(&self, run_id: &str, count: i64) -> Result<()>;
    async fn finish_freight_run(
        &self,
        run_id: &str,
        status: FreightRunStatus,
        changed_count: i64,
        message: Option<&str>,
    ) -> Result<()>;

    /// Streams SKUs flagged dirty for the given country in pages of
    /// `batch_size`, ordered by `sku_code` — callers page until an empty
    /// batch is returned.
    async fn iter_changed_skus(
        &self,
        country: CountryType,
        offset: i64,
        batch_size: i64,
    ) -> Result<Vec<String>>;
    async fn load_kogan_baseline_map(
        &self,
        country: CountryType,
        skus: &[String],
    ) -> Result<HashMap<String, serde_json::Value>>;
    async fn clear_kogan_dirty_flags(&self, country: CountryType, skus: &[String]) -> Result<()>;

    async fn create_export_job(
        &self,
        country: CountryType,
        file_name: &str,
        file_content: Vec<u8>,
        row_count: i32,
        sku_records: &[ExportJobSku],
    ) -> Result<ExportJob>;
    async fn get_export_job(&self, job_id: &str) -> Result<Option<ExportJob>>;
    async fn get_export_job_skus(&self, job_id: &str) -> Result<Vec<ExportJobSku>>;
    async fn fetch_latest_export_job(&self, country: CountryType) -> Result<Option<ExportJob>>;
    async fn mark_export_job_status(
        &self,
        job_id: &str,
        status: ExportJobStatus,
        note: Option<&str>,
    ) -> Result<()>;
    /// Column-by-column merge of `{sku: {col: value}}` into the baseline
    /// Kogan template table — never a blind row overwrite.
    async fn apply_kogan_template_updates(
        &self,
        country: CountryType,
        updates: &[(String, serde_json::Value)],
    ) -> Result<()>;

    async fn list_schedules(&self) -> Result<Vec<ScheduleEntry>>;
    async fn get_schedule(&self, key: &str) -> Result<Option<ScheduleEntry>>;
    async fn upsert_schedule(&self, entry: &ScheduleEntry) -> Result<()>;
    async fn record_schedule_run(&self, key: &str) -> Result<()>;
}

pub struct PostgresSyncRepository {
    pool: PgPool,
}

impl PostgresSyncRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn get_pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl SyncRepository for PostgresSyncRepository {
    async fn load_existing_by_skus(&self, skus: &[String]) -> Result<HashMap<String, SkuMaster>> {
        if skus.is_empty() {
            return Ok(HashMap::new());
        }
        let rows: Vec<SkuMaster> = sqlx::query_as(
            "SELECT * FROM sku_master WHERE sku_code = ANY($1)",
        )
        .bind(skus)
        .fetch_all(self.get_pool())
        .await?;

        Ok(rows.into_iter().map(|r| (r.sku_code.clone(), r)).collect())
    }

    async fn bulk_upsert_sku_master(&self, rows: &[SkuMaster]) -> Result<u64> {
        let mut affected = 0u64;
        let mut tx = self.get_pool().begin().await?;
        for row in rows {
            sqlx::query(
                r#"
                INSERT INTO sku_master (
                    id, sku_code, shopify_variant_id, stock_qty, price, rrp_price,
                    special_price, special_price_end_date, shopify_price, product_tags,
                    brand, weight, length, width, height, ean_code, supplier,
                    freight_act, freight_nsw_m, freight_nsw_r, freight_nt_m, freight_nt_r,
                    freight_qld_m, freight_qld_r, remote, freight_sa_m, freight_sa_r,
                    freight_tas_m, freight_tas_r, freight_vic_m, freight_vic_r,
                    freight_wa_m, freight_wa_r, freight_nz, attrs_hash_current,
                    created_at, updated_at, last_changed_at
                ) VALUES (
                    $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
                    $29, $30, $31, $32, $33, $34, $35, $36, $37
                )
                ON CONFLICT (sku_code) DO UPDATE SET
                    shopify_variant_id = COALESCE(EXCLUDED.shopify_variant_id, sku_master.shopify_variant_id),
                    stock_qty = COALESCE(EXCLUDED.stock_qty, sku_master.stock_qty),
                    price = COALESCE(EXCLUDED.price, sku_master.price),
                    rrp_price = COALESCE(EXCLUDED.rrp_price, sku_master.rrp_price),
                    special_price = COALESCE(EXCLUDED.special_price, sku_master.special_price),
                    special_price_end_date = COALESCE(EXCLUDED.special_price_end_date, sku_master.special_price_end_date),
                    shopify_price = COALESCE(EXCLUDED.shopify_price, sku_master.shopify_price),
                    product_tags = COALESCE(EXCLUDED.product_tags, sku_master.product_tags),
                    brand = COALESCE(EXCLUDED.brand, sku_master.brand),
                    weight = COALESCE(EXCLUDED.weight, sku_master.weight),
                    length = COALESCE(EXCLUDED.length, sku_master.length),
                    width = COALESCE(EXCLUDED.width, sku_master.width),
                    height = COALESCE(EXCLUDED.height, sku_master.height),
                    ean_code = COALESCE(EXCLUDED.ean_code, sku_master.ean_code),
                    supplier = COALESCE(EXCLUDED.supplier, sku_master.supplier),
                    freight_act = COALESCE(EXCLUDED.freight_act, sku_master.freight_act),
                    freight_nsw_m = COALESCE(EXCLUDED.freight_nsw_m, sku_master.freight_nsw_m),
                    freight_nsw_r = COALESCE(EXCLUDED.freight_nsw_r, sku_master.freight_nsw_r),
                    freight_nt_m = COALESCE(EXCLUDED.freight_nt_m, sku_master.freight_nt_m),
                    freight_nt_r = COALESCE(EXCLUDED.freight_nt_r, sku_master.freight_nt_r),
                    freight_qld_m = COALESCE(EXCLUDED.freight_qld_m, sku_master.freight_qld_m),
                    freight_qld_r = COALESCE(EXCLUDED.freight_qld_r, sku_master.freight_qld_r),
                    remote = COALESCE(EXCLUDED.remote, sku_master.remote),
                    freight_sa_m = COALESCE(EXCLUDED.freight_sa_m, sku_master.freight_sa_m),
                    freight_sa_r = COALESCE(EXCLUDED.freight_sa_r, sku_master.freight_sa_r),
                    freight_tas_m = COALESCE(EXCLUDED.freight_tas_m, sku_master.freight_tas_m),
                    freight_tas_r = COALESCE(EXCLUDED.freight_tas_r, sku_master.freight_tas_r),
                    freight_vic_m = COALESCE(EXCLUDED.freight_vic_m, sku_master.freight_vic_m),
                    freight_vic_r = COALESCE(EXCLUDED.freight_vic_r, sku_master.freight_vic_r),
                    freight_wa_m = COALESCE(EXCLUDED.freight_wa_m, sku_master.freight_wa_m),
                    freight_wa_r = COALESCE(EXCLUDED.freight_wa_r, sku_master.freight_wa_r),
                    freight_nz = COALESCE(EXCLUDED.freight_nz, sku_master.freight_nz),
                    attrs_hash_current = EXCLUDED.attrs_hash_current,
                    updated_at = EXCLUDED.updated_at,
                    last_changed_at = EXCLUDED.last_changed_at
                "#,
            )
            .bind(row.id)
            .bind(&row.sku_code)
            .bind(&row.shopify_variant_id)
            .bind(row.stock_qty)
            .bind(row.price)
            .bind(row.rrp_price)
            .bind(row.special_price)
            .bind(row.special_price_end_date)
            .bind(row.shopify_price)
            .bind(&row.product_tags)
            .bind(&row.brand)
            .bind(row.weight)
            .bind(row.length)
            .bind(row.width)
            .bind(row.height)
            .bind(&row.ean_code)
            .bind(&row.supplier)
            .bind(row.freight_act)
            .bind(row.freight_nsw_m)
            .bind(row.freight_nsw_r)
            .bind(row.freight_nt_m)
            .bind(row.freight_nt_r)
            .bind(row.freight_qld_m)
            .bind(row.freight_qld_r)
            .bind(row.remote)
            .bind(row.freight_sa_m)
            .bind(row.freight_sa_r)
            .bind(row.freight_tas_m)
            .bind(row.freight_tas_r)
            .bind(row.freight_vic_m)
            .bind(row.freight_vic_r)
            .bind(row.freight_wa_m)
            .bind(row.freight_wa_r)
            .bind(row.freight_nz)
            .bind(&row.attrs_hash_current)
            .bind(row.created_at)
            .bind(row.updated_at)
            .bind(row.last_changed_at)
            .execute(&mut *tx)
            .await?;
            affected += 1;
        }
        tx.commit().await?;
        Ok(affected)
    }

    async fn create_sync_run(&self, run_type: SyncRunType) -> Result<ProductSyncRun> {
        let row: ProductSyncRun = sqlx::query_as(
            r#"INSERT INTO product_sync_runs (id, run_type, status, started_at)
               VALUES ($1, $2, 'running', now())
               RETURNING *"#,
        )
        .bind(Uuid::new_v4())
        .bind(run_type)
        .fetch_one(self.get_pool())
        .await?;
        Ok(row)
    }

    async fn update_sync_run_bulk_info(
        &self,
        run_id: Uuid,
        bulk_id: Option<&str>,
        bulk_status: Option<&str>,
        bulk_url: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"UPDATE product_sync_runs
               SET shopify_bulk_id = COALESCE($2, shopify_bulk_id),
                   shopify_bulk_status = COALESCE($3, shopify_bulk_status),
                   shopify_bulk_url = COALESCE($4, shopify_bulk_url)
               WHERE id = $1"#,
        )
        .bind(run_id)
        .bind(bulk_id)
        .bind(bulk_status)
        .bind(bulk_url)
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn finish_sync_run(
        &self,
        run_id: Uuid,
        status: SyncRunStatus,
        changed_count: i64,
        note: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"UPDATE product_sync_runs
               SET status = $2, changed_count = $3, note = $4, finished_at = now()
               WHERE id = $1"#,
        )
        .bind(run_id)
        .bind(status)
        .bind(changed_count)
        .bind(note)
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn get_sync_run(&self, run_id: Uuid) -> Result<Option<ProductSyncRun>> {
        let row = sqlx::query_as("SELECT * FROM product_sync_runs WHERE id = $1")
            .bind(run_id)
            .fetch_optional(self.get_pool())
            .await?;
        Ok(row)
    }

    async fn latest_running_sync_run(&self) -> Result<Option<ProductSyncRun>> {
        let row = sqlx::query_as(
            "SELECT * FROM product_sync_runs WHERE status = 'running' ORDER BY started_at DESC LIMIT 1",
        )
        .fetch_optional(self.get_pool())
        .await?;
        Ok(row)
    }

    async fn save_candidates(&self, candidates: &[SyncChangeCandidate]) -> Result<u64> {
        let mut affected = 0u64;
        let mut tx = self.get_pool().begin().await?;
        for c in candidates {
            sqlx::query(
                r#"INSERT INTO product_sync_candidates (run_id, sku_code, change_mask, new_snapshot, change_count)
                   VALUES ($1, $2, $3, $4, $5)
                   ON CONFLICT (run_id, sku_code) DO UPDATE SET
                       change_mask = EXCLUDED.change_mask,
                       new_snapshot = EXCLUDED.new_snapshot,
                       change_count = EXCLUDED.change_count"#,
            )
            .bind(c.run_id)
            .bind(&c.sku_code)
            .bind(&c.change_mask)
            .bind(&c.new_snapshot)
            .bind(c.change_count)
            .execute(&mut *tx)
            .await?;
            affected += 1;
        }
        tx.commit().await?;
        Ok(affected)
    }

    async fn candidate_skus_for_run(&self, run_id: Uuid) -> Result<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT sku_code FROM product_sync_candidates WHERE run_id = $1")
                .bind(run_id)
                .fetch_all(self.get_pool())
                .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    async fn upsert_chunk_pending(
        &self,
        run_id: Uuid,
        chunk_idx: i32,
        sku_codes: &[String],
    ) -> Result<SyncChunkManifestEntry> {
        let row: SyncChunkManifestEntry = sqlx::query_as(
            r#"INSERT INTO sync_chunk_manifest (run_id, chunk_idx, status, sku_codes, sku_count,
                    dsz_missing, dsz_failed_batches, dsz_failed_skus, dsz_requested_total, dsz_returned_total,
                    dsz_missing_sku_list, dsz_failed_sku_list, dsz_extra_sku_list)
               VALUES ($1, $2, 'pending', $3, $4, 0, 0, 0, 0, 0, '[]'::jsonb, '[]'::jsonb, '[]'::jsonb)
               ON CONFLICT (run_id, chunk_idx) DO UPDATE SET
                   sku_codes = EXCLUDED.sku_codes, sku_count = EXCLUDED.sku_count
               RETURNING *"#,
        )
        .bind(run_id)
        .bind(chunk_idx)
        .bind(serde_json::to_value(sku_codes).unwrap_or_default())
        .bind(sku_codes.len() as i32)
        .fetch_one(self.get_pool())
        .await?;
        Ok(row)
    }

    async fn mark_chunk_running(&self, run_id: Uuid, chunk_idx: i32) -> Result<()> {
        sqlx::query(
            "UPDATE sync_chunk_manifest SET status = 'running', started_at = now() WHERE run_id = $1 AND chunk_idx = $2",
        )
        .bind(run_id)
        .bind(chunk_idx)
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn mark_chunk_succeeded(
        &self,
        run_id: Uuid,
        chunk_idx: i32,
        dsz_missing: i32,
        dsz_failed_batches: i32,
        dsz_failed_skus: i32,
        dsz_requested_total: i32,
        dsz_returned_total: i32,
        missing_skus: &[String],
        failed_skus: &[String],
        extra_skus: &[String],
    ) -> Result<()> {
        sqlx::query(
            r#"UPDATE sync_chunk_manifest SET
                   status = 'succeeded', finished_at = now(),
                   dsz_missing = $3, dsz_failed_batches = $4, dsz_failed_skus = $5,
                   dsz_requested_total = $6, dsz_returned_total = $7,
                   dsz_missing_sku_list = $8, dsz_failed_sku_list = $9, dsz_extra_sku_list = $10
               WHERE run_id = $1 AND chunk_idx = $2"#,
        )
        .bind(run_id)
        .bind(chunk_idx)
        .bind(dsz_missing)
        .bind(dsz_failed_batches)
        .bind(dsz_failed_skus)
        .bind(dsz_requested_total)
        .bind(dsz_returned_total)
        .bind(serde_json::to_value(missing_skus).unwrap_or_default())
        .bind(serde_json::to_value(failed_skus).unwrap_or_default())
        .bind(serde_json::to_value(extra_skus).unwrap_or_default())
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn mark_chunk_failed(&self, run_id: Uuid, chunk_idx: i32, error: &str) -> Result<()> {
        sqlx::query(
            "UPDATE sync_chunk_manifest SET status = 'failed', finished_at = now(), last_error = $3 WHERE run_id = $1 AND chunk_idx = $2",
        )
        .bind(run_id)
        .bind(chunk_idx)
        .bind(error)
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn chunks_for_run(&self, run_id: Uuid) -> Result<Vec<SyncChunkManifestEntry>> {
        let rows = sqlx::query_as(
            "SELECT * FROM sync_chunk_manifest WHERE run_id = $1 ORDER BY chunk_idx",
        )
        .bind(run_id)
        .fetch_all(self.get_pool())
        .await?;
        Ok(rows)
    }

    async fn pending_or_failed_chunks(&self, run_id: Uuid) -> Result<Vec<SyncChunkManifestEntry>> {
        let rows = sqlx::query_as(
            "SELECT * FROM sync_chunk_manifest WHERE run_id = $1 AND status IN ('pending', 'failed') ORDER BY chunk_idx",
        )
        .bind(run_id)
        .fetch_all(self.get_pool())
        .await?;
        Ok(rows)
    }

    async fn upsert_freight_result(&self, result: &FreightResult) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO sku_freight_results (
                   sku_code, adjust, same_shipping, shipping_ave, shipping_ave_m, shipping_ave_r,
                   shipping_med, remote_check, rural_ave, weighted_ave_s, shipping_med_dif, weight,
                   cubic_weight, shipping_type, price_ratio, selling_price, shopify_price,
                   kogan_au_price, kogan_k1_price, kogan_nz_price, attrs_hash_last_calc,
                   last_changed_run_id, last_changed_source, last_changed_at,
                   kogan_dirty_au, kogan_dirty_nz, created_at, updated_at
               ) VALUES (
                   $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                   $18, $19, $20, $21, $22, $23, now(), $24, $25, now(), now()
               )
               ON CONFLICT (sku_code) DO UPDATE SET
                   adjust = COALESCE(EXCLUDED.adjust, sku_freight_results.adjust),
                   same_shipping = COALESCE(EXCLUDED.same_shipping, sku_freight_results.same_shipping),
                   shipping_ave = COALESCE(EXCLUDED.shipping_ave, sku_freight_results.shipping_ave),
                   shipping_ave_m = COALESCE(EXCLUDED.shipping_ave_m, sku_freight_results.shipping_ave_m),
                   shipping_ave_r = COALESCE(EXCLUDED.shipping_ave_r, sku_freight_results.shipping_ave_r),
                   shipping_med = COALESCE(EXCLUDED.shipping_med, sku_freight_results.shipping_med),
                   remote_check = EXCLUDED.remote_check,
                   rural_ave = COALESCE(EXCLUDED.rural_ave, sku_freight_results.rural_ave),
                   weighted_ave_s = COALESCE(EXCLUDED.weighted_ave_s, sku_freight_results.weighted_ave_s),
                   shipping_med_dif = COALESCE(EXCLUDED.shipping_med_dif, sku_freight_results.shipping_med_dif),
                   weight = COALESCE(EXCLUDED.weight, sku_freight_results.weight),
                   cubic_weight = COALESCE(EXCLUDED.cubic_weight, sku_freight_results.cubic_weight),
                   shipping_type = EXCLUDED.shipping_type,
                   price_ratio = COALESCE(EXCLUDED.price_ratio, sku_freight_results.price_ratio),
                   selling_price = COALESCE(EXCLUDED.selling_price, sku_freight_results.selling_price),
                   shopify_price = COALESCE(EXCLUDED.shopify_price, sku_freight_results.shopify_price),
                   kogan_au_price = COALESCE(EXCLUDED.kogan_au_price, sku_freight_results.kogan_au_price),
                   kogan_k1_price = COALESCE(EXCLUDED.kogan_k1_price, sku_freight_results.kogan_k1_price),
                   kogan_nz_price = COALESCE(EXCLUDED.kogan_nz_price, sku_freight_results.kogan_nz_price),
                   attrs_hash_last_calc = EXCLUDED.attrs_hash_last_calc,
                   last_changed_run_id = EXCLUDED.last_changed_run_id,
                   last_changed_source = EXCLUDED.last_changed_source,
                   last_changed_at = now(),
                   kogan_dirty_au = sku_freight_results.kogan_dirty_au OR EXCLUDED.kogan_dirty_au,
                   kogan_dirty_nz = sku_freight_results.kogan_dirty_nz OR EXCLUDED.kogan_dirty_nz,
                   updated_at = now()
               "#,
        )
        .bind(&result.sku_code)
        .bind(result.adjust)
        .bind(result.same_shipping)
        .bind(result.shipping_ave)
        .bind(result.shipping_ave_m)
        .bind(result.shipping_ave_r)
        .bind(result.shipping_med)
        .bind(result.remote_check)
        .bind(result.rural_ave)
        .bind(result.weighted_ave_s)
        .bind(result.shipping_med_dif)
        .bind(result.weight)
        .bind(result.cubic_weight)
        .bind(&result.shipping_type)
        .bind(result.price_ratio)
        .bind(result.selling_price)
        .bind(result.shopify_price)
        .bind(result.kogan_au_price)
        .bind(result.kogan_k1_price)
        .bind(result.kogan_nz_price)
        .bind(&result.attrs_hash_last_calc)
        .bind(&result.last_changed_run_id)
        .bind(&result.last_changed_source)
        .bind(result.kogan_dirty_au)
        .bind(result.kogan_dirty_nz)
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn load_freight_result(&self, sku_code: &str) -> Result<Option<FreightResult>> {
        let row = sqlx::query_as("SELECT * FROM sku_freight_results WHERE sku_code = $1")
            .bind(sku_code)
            .fetch_optional(self.get_pool())
            .await?;
        Ok(row)
    }

    async fn all_sku_codes(&self) -> Result<Vec<String>> {
        let rows: Vec<(String,)> = sqlx::query_as("SELECT sku_code FROM sku_master")
            .fetch_all(self.get_pool())
            .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    async fn skus_needing_recalc(&self, skus: &[String]) -> Result<Vec<String>> {
        if skus.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"SELECT m.sku_code FROM sku_master m
               LEFT JOIN sku_freight_results r ON r.sku_code = m.sku_code
               WHERE m.sku_code = ANY($1)
                 AND (r.attrs_hash_last_calc IS NULL OR r.attrs_hash_last_calc <> m.attrs_hash_current)"#,
        )
        .bind(skus)
        .fetch_all(self.get_pool())
        .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    async fn create_freight_run(
        &self,
        product_run_id: Option<Uuid>,
        triggered_by: &str,
    ) -> Result<FreightCalculationRun> {
        let row: FreightCalculationRun = sqlx::query_as(
            r#"INSERT INTO freight_calculation_runs (id, status, triggered_by, product_run_id, candidate_count, created_at, updated_at)
               VALUES ($1, 'pending', $2, $3, 0, now(), now())
               RETURNING *"#,
        )
        .bind(generate_freight_run_id())
        .bind(triggered_by)
        .bind(product_run_id)
        .fetch_one(self.get_pool())
        .await?;
        Ok(row)
    }

    async fn set_freight_run_candidate_count(&self, run_id: &str, count: i64) -> Result<()> {
        sqlx::query("UPDATE freight_calculation_runs SET candidate_count = $2, status = 'running', updated_at = now() WHERE id = $1")
            .bind(run_id)
            .bind(count)
            .execute(self.get_pool())
            .await?;
        Ok(())
    }

    async fn finish_freight_run(
        &self,
        run_id: &str,
        status: FreightRunStatus,
        changed_count: i64,
        message: Option<&str>,
    ) -> Result<()> {
        sqlx::query(
            r#"UPDATE freight_calculation_runs
               SET status = $2, changed_count = $3, message = $4, finished_at = now(), updated_at = now()
               WHERE id = $1"#,
        )
        .bind(run_id)
        .bind(status)
        .bind(changed_count)
        .bind(message)
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn iter_changed_skus(
        &self,
        country: CountryType,
        offset: i64,
        batch_size: i64,
    ) -> Result<Vec<String>> {
        let column = match country {
            CountryType::Au => "kogan_dirty_au",
            CountryType::Nz => "kogan_dirty_nz",
        };
        let sql = format!(
            "SELECT sku_code FROM sku_freight_results WHERE {column} IS TRUE ORDER BY sku_code OFFSET $1 LIMIT $2"
        );
        let rows: Vec<(String,)> = sqlx::query_as(&sql)
            .bind(offset)
            .bind(batch_size)
            .fetch_all(self.get_pool())
            .await?;
        Ok(rows.into_iter().map(|(s,)| s).collect())
    }

    async fn load_kogan_baseline_map(
        &self,
        country: CountryType,
        skus: &[String],
    ) -> Result<HashMap<String, serde_json::Value>> {
        if skus.is_empty() {
            return Ok(HashMap::new());
        }
        let table = match country {
            CountryType::Au => "kogan_template_au",
            CountryType::Nz => "kogan_template_nz",
        };
        let sql = format!("SELECT sku, to_jsonb(t) AS payload FROM {table} t WHERE sku = ANY($1)");
        let rows = sqlx::query(&sql)
            .bind(skus)
            .fetch_all(self.get_pool())
            .await?;

        let mut map = HashMap::new();
        for row in rows {
            let sku: String = row.try_get("sku")?;
            let payload: serde_json::Value = row.try_get("payload")?;
            map.insert(sku, payload);
        }
        Ok(map)
    }

    async fn clear_kogan_dirty_flags(&self, country: CountryType, skus: &[String]) -> Result<()> {
        if skus.is_empty() {
            return Ok(());
        }
        let column = match country {
            CountryType::Au => "kogan_dirty_au",
            CountryType::Nz => "kogan_dirty_nz",
        };
        let sql = format!("UPDATE sku_freight_results SET {column} = FALSE WHERE sku_code = ANY($1)");
        sqlx::query(&sql).bind(skus).execute(self.get_pool()).await?;
        Ok(())
    }

    async fn create_export_job(
        &self,
        country: CountryType,
        file_name: &str,
        file_content: Vec<u8>,
        row_count: i32,
        sku_records: &[ExportJobSku],
    ) -> Result<ExportJob> {
        let job_id = generate_export_job_id(country);
        let mut tx = self.get_pool().begin().await?;

        let job: ExportJob = sqlx::query_as(
            r#"INSERT INTO kogan_export_jobs (id, country_type, status, file_name, file_size, row_count, file_content, exported_at, created_at, updated_at)
               VALUES ($1, $2, 'exported', $3, $4, $5, $6, now(), now(), now())
               RETURNING *"#,
        )
        .bind(&job_id)
        .bind(country.as_str())
        .bind(file_name)
        .bind(file_content.len() as i32)
        .bind(row_count)
        .bind(&file_content)
        .fetch_one(&mut *tx)
        .await?;

        for sku_record in sku_records {
            sqlx::query(
                r#"INSERT INTO kogan_export_job_skus (job_id, sku, template_payload, changed_columns)
                   VALUES ($1, $2, $3, $4)"#,
            )
            .bind(&job_id)
            .bind(&sku_record.sku)
            .bind(&sku_record.template_payload)
            .bind(&sku_record.changed_columns)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(job)
    }

    async fn get_export_job(&self, job_id: &str) -> Result<Option<ExportJob>> {
        let row = sqlx::query_as("SELECT * FROM kogan_export_jobs WHERE id = $1")
            .bind(job_id)
            .fetch_optional(self.get_pool())
            .await?;
        Ok(row)
    }

    async fn get_export_job_skus(&self, job_id: &str) -> Result<Vec<ExportJobSku>> {
        let rows = sqlx::query_as("SELECT * FROM kogan_export_job_skus WHERE job_id = $1 ORDER BY sku")
            .bind(job_id)
            .fetch_all(self.get_pool())
            .await?;
        Ok(rows)
    }

    async fn fetch_latest_export_job(&self, country: CountryType) -> Result<Option<ExportJob>> {
        let row = sqlx::query_as(
            "SELECT * FROM kogan_export_jobs WHERE country_type = $1 ORDER BY exported_at DESC LIMIT 1",
        )
        .bind(country.as_str())
        .fetch_optional(self.get_pool())
        .await?;
        Ok(row)
    }

    async fn mark_export_job_status(
        &self,
        job_id: &str,
        status: ExportJobStatus,
        note: Option<&str>,
    ) -> Result<()> {
        let (applied_at_clause, exported_at_clause) = match status {
            ExportJobStatus::Applied => ("now()", "exported_at"),
            ExportJobStatus::Exported => ("applied_at", "now()"),
            _ => ("applied_at", "exported_at"),
        };
        let sql = format!(
            "UPDATE kogan_export_jobs SET status = $2, note = COALESCE($3, note), applied_at = {applied_at_clause}, exported_at = {exported_at_clause}, updated_at = now() WHERE id = $1"
        );
        sqlx::query(&sql)
            .bind(job_id)
            .bind(status)
            .bind(note)
            .execute(self.get_pool())
            .await?;
        Ok(())
    }

    async fn apply_kogan_template_updates(
        &self,
        country: CountryType,
        updates: &[(String, serde_json::Value)],
    ) -> Result<()> {
        let table = match country {
            CountryType::Au => "kogan_template_au",
            CountryType::Nz => "kogan_template_nz",
        };
        let mut tx = self.get_pool().begin().await?;
        for (sku, values) in updates {
            let Some(obj) = values.as_object() else { continue };
            if obj.is_empty() {
                continue;
            }
            let mut columns = Vec::new();
            let mut placeholders = Vec::new();
            let mut set_clauses = Vec::new();
            let mut idx = 2; // $1 is sku
            for key in obj.keys() {
                columns.push(key.clone());
                placeholders.push(format!("${idx}"));
                set_clauses.push(format!("{key} = EXCLUDED.{key}"));
                idx += 1;
            }
            let sql = format!(
                "INSERT INTO {table} (sku, country_type, {cols}) VALUES ($1, '{country_upper}', {placeholders}) \
                 ON CONFLICT (country_type, sku) DO UPDATE SET {set_clauses}, updated_at = now()",
                cols = columns.join(", "),
                country_upper = country.as_str().to_uppercase(),
                placeholders = placeholders.join(", "),
                set_clauses = set_clauses.join(", "),
            );
            let mut query = sqlx::query(&sql).bind(sku);
            for key in &columns {
                query = query.bind(obj.get(key).cloned().unwrap_or(serde_json::Value::Null));
            }
            query.execute(&mut *tx).await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_schedules(&self) -> Result<Vec<ScheduleEntry>> {
        let rows = sqlx::query_as("SELECT * FROM schedules ORDER BY key")
            .fetch_all(self.get_pool())
            .await?;
        Ok(rows)
    }

    async fn get_schedule(&self, key: &str) -> Result<Option<ScheduleEntry>> {
        let row = sqlx::query_as("SELECT * FROM schedules WHERE key = $1")
            .bind(key)
            .fetch_optional(self.get_pool())
            .await?;
        Ok(row)
    }

    async fn upsert_schedule(&self, entry: &ScheduleEntry) -> Result<()> {
        sqlx::query(
            r#"INSERT INTO schedules (key, enabled, day_of_week, hour, minute, every_2_weeks, timezone)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               ON CONFLICT (key) DO UPDATE SET
                   enabled = EXCLUDED.enabled, day_of_week = EXCLUDED.day_of_week,
                   hour = EXCLUDED.hour, minute = EXCLUDED.minute,
                   every_2_weeks = EXCLUDED.every_2_weeks, timezone = EXCLUDED.timezone"#,
        )
        .bind(&entry.key)
        .bind(entry.enabled)
        .bind(&entry.day_of_week)
        .bind(entry.hour)
        .bind(entry.minute)
        .bind(entry.every_2_weeks)
        .bind(&entry.timezone)
        .execute(self.get_pool())
        .await?;
        Ok(())
    }

    async fn record_schedule_run(&self, key: &str) -> Result<()> {
        sqlx::query("UPDATE schedules SET last_run_at = now() WHERE key = $1")
            .bind(key)
            .execute(self.get_pool())
            .await?;
        Ok(())
    }
}

fn generate_freight_run_id() -> String {
    format!(
        "FR_{}_{}",
        chrono::Utc::now().format("%Y%m%dT%H%M%S%3fZ"),
        Uuid::new_v4().simple().to_string().get(..8).unwrap_or("00000000")
    )
}

fn generate_export_job_id(country: CountryType) -> String {
    format!(
        "{}_{}_{}",
        country.as_str().to_uppercase(),
        chrono::Utc::now().format("%Y%m%dT%H%M%SZ"),
        Uuid::new_v4().simple().to_string().get(..8).unwrap_or("00000000")
    )
}

/// In-process, non-persistent implementation used by orchestrator unit
/// tests — avoids standing up Postgres just to exercise a candidate
/// selection or diff-and-upsert path.
pub mod mock {
    use super::*;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct State {
        skus: HashMap<String, SkuMaster>,
        sync_runs: HashMap<Uuid, ProductSyncRun>,
        candidates: Vec<SyncChangeCandidate>,
        chunks: HashMap<(Uuid, i32), SyncChunkManifestEntry>,
        freight_results: HashMap<String, FreightResult>,
        freight_runs: HashMap<String, FreightCalculationRun>,
        export_jobs: HashMap<String, (ExportJob, Vec<ExportJobSku>)>,
        schedules: HashMap<String, ScheduleEntry>,
        kogan_baseline: HashMap<(CountryType, String), serde_json::Value>,
    }

    #[derive(Default)]
    pub struct InMemorySyncRepository {
        state: Mutex<State>,
    }

    impl InMemorySyncRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub async fn seed_sku(&self, sku: SkuMaster) {
            self.state.lock().await.skus.insert(sku.sku_code.clone(), sku);
        }

        pub async fn seed_freight_result(&self, result: FreightResult) {
            self.state
                .lock()
                .await
                .freight_results
                .insert(result.sku_code.clone(), result);
        }
    }

    #[async_trait]
    impl SyncRepository for InMemorySyncRepository {
        async fn load_existing_by_skus(&self, skus: &[String]) -> Result<HashMap<String, SkuMaster>> {
            let state = self.state.lock().await;
            Ok(skus
                .iter()
                .filter_map(|s| state.skus.get(s).map(|v| (s.clone(), v.clone())))
                .collect())
        }

        async fn bulk_upsert_sku_master(&self, rows: &[SkuMaster]) -> Result<u64> {
            let mut state = self.state.lock().await;
            for row in rows {
                state.skus.insert(row.sku_code.clone(), row.clone());
            }
            Ok(rows.len() as u64)
        }

        async fn create_sync_run(&self, run_type: SyncRunType) -> Result<ProductSyncRun> {
            let run = ProductSyncRun {
                id: Uuid::new_v4(),
                run_type,
                status: SyncRunStatus::Running,
                shopify_bulk_id: None,
                shopify_bulk_status: None,
                shopify_bulk_url: None,
                total_shopify_skus: None,
                changed_count: None,
                note: None,
                started_at: chrono::Utc::now(),
                finished_at: None,
                webhook_received_at: None,
            };
            self.state.lock().await.sync_runs.insert(run.id, run.clone());
            Ok(run)
        }

        async fn update_sync_run_bulk_info(
            &self,
            run_id: Uuid,
            bulk_id: Option<&str>,
            bulk_status: Option<&str>,
            bulk_url: Option<&str>,
        ) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(run) = state.sync_runs.get_mut(&run_id) {
                if let Some(v) = bulk_id {
                    run.shopify_bulk_id = Some(v.to_string());
                }
                if let Some(v) = bulk_status {
                    run.shopify_bulk_status = Some(v.to_string());
                }
                if let Some(v) = bulk_url {
                    run.shopify_bulk_url = Some(v.to_string());
                }
            }
            Ok(())
        }

        async fn finish_sync_run(
            &self,
            run_id: Uuid,
            status: SyncRunStatus,
            changed_count: i64,
            note: Option<&str>,
        ) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(run) = state.sync_runs.get_mut(&run_id) {
                run.status = status;
                run.changed_count = Some(changed_count);
                run.note = note.map(|s| s.to_string());
                run.finished_at = Some(chrono::Utc::now());
            }
            Ok(())
        }

        async fn get_sync_run(&self, run_id: Uuid) -> Result<Option<ProductSyncRun>> {
            Ok(self.state.lock().await.sync_runs.get(&run_id).cloned())
        }

        async fn latest_running_sync_run(&self) -> Result<Option<ProductSyncRun>> {
            Ok(self
                .state
                .lock()
                .await
                .sync_runs
                .values()
                .filter(|r| r.status == SyncRunStatus::Running)
                .max_by_key(|r| r.started_at)
                .cloned())
        }

        async fn save_candidates(&self, candidates: &[SyncChangeCandidate]) -> Result<u64> {
            let mut state = self.state.lock().await;
            state.candidates.extend(candidates.iter().cloned());
            Ok(candidates.len() as u64)
        }

        async fn candidate_skus_for_run(&self, run_id: Uuid) -> Result<Vec<String>> {
            Ok(self
                .state
                .lock()
                .await
                .candidates
                .iter()
                .filter(|c| c.run_id == run_id)
                .map(|c| c.sku_code.clone())
                .collect())
        }

        async fn upsert_chunk_pending(
            &self,
            run_id: Uuid,
            chunk_idx: i32,
            sku_codes: &[String],
        ) -> Result<SyncChunkManifestEntry> {
            let entry = SyncChunkManifestEntry {
                id: chunk_idx as i64,
                run_id,
                chunk_idx,
                status: ChunkStatus::Pending,
                sku_codes: serde_json::to_value(sku_codes).unwrap_or_default(),
                sku_count: sku_codes.len() as i32,
                dsz_missing: 0,
                dsz_failed_batches: 0,
                dsz_failed_skus: 0,
                dsz_requested_total: 0,
                dsz_returned_total: 0,
                dsz_missing_sku_list: serde_json::Value::Array(vec![]),
                dsz_failed_sku_list: serde_json::Value::Array(vec![]),
                dsz_extra_sku_list: serde_json::Value::Array(vec![]),
                started_at: None,
                finished_at: None,
                last_error: None,
            };
            self.state
                .lock()
                .await
                .chunks
                .insert((run_id, chunk_idx), entry.clone());
            Ok(entry)
        }

        async fn mark_chunk_running(&self, run_id: Uuid, chunk_idx: i32) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(c) = state.chunks.get_mut(&(run_id, chunk_idx)) {
                c.status = ChunkStatus::Running;
                c.started_at = Some(chrono::Utc::now());
            }
            Ok(())
        }

        async fn mark_chunk_succeeded(
            &self,
            run_id: Uuid,
            chunk_idx: i32,
            dsz_missing: i32,
            dsz_failed_batches: i32,
            dsz_failed_skus: i32,
            dsz_requested_total: i32,
            dsz_returned_total: i32,
            missing_skus: &[String],
            failed_skus: &[String],
            extra_skus: &[String],
        ) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(c) = state.chunks.get_mut(&(run_id, chunk_idx)) {
                c.status = ChunkStatus::Succeeded;
                c.finished_at = Some(chrono::Utc::now());
                c.dsz_missing = dsz_missing;
                c.dsz_failed_batches = dsz_failed_batches;
                c.dsz_failed_skus = dsz_failed_skus;
                c.dsz_requested_total = dsz_requested_total;
                c.dsz_returned_total = dsz_returned_total;
                c.dsz_missing_sku_list = serde_json::to_value(missing_skus).unwrap_or_default();
                c.dsz_failed_sku_list = serde_json::to_value(failed_skus).unwrap_or_default();
                c.dsz_extra_sku_list = serde_json::to_value(extra_skus).unwrap_or_default();
            }
            Ok(())
        }

        async fn mark_chunk_failed(&self, run_id: Uuid, chunk_idx: i32, error: &str) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(c) = state.chunks.get_mut(&(run_id, chunk_idx)) {
                c.status = ChunkStatus::Failed;
                c.finished_at = Some(chrono::Utc::now());
                c.last_error = Some(error.to_string());
            }
            Ok(())
        }

        async fn chunks_for_run(&self, run_id: Uuid) -> Result<Vec<SyncChunkManifestEntry>> {
            let mut rows: Vec<_> = self
                .state
                .lock()
                .await
                .chunks
                .values()
                .filter(|c| c.run_id == run_id)
                .cloned()
                .collect();
            rows.sort_by_key(|c| c.chunk_idx);
            Ok(rows)
        }

        async fn pending_or_failed_chunks(&self, run_id: Uuid) -> Result<Vec<SyncChunkManifestEntry>> {
            Ok(self
                .chunks_for_run(run_id)
                .await?
                .into_iter()
                .filter(|c| matches!(c.status, ChunkStatus::Pending | ChunkStatus::Failed))
                .collect())
        }

        async fn upsert_freight_result(&self, result: &FreightResult) -> Result<()> {
            self.state
                .lock()
                .await
                .freight_results
                .insert(result.sku_code.clone(), result.clone());
            Ok(())
        }

        async fn load_freight_result(&self, sku_code: &str) -> Result<Option<FreightResult>> {
            Ok(self.state.lock().await.freight_results.get(sku_code).cloned())
        }

        async fn all_sku_codes(&self) -> Result<Vec<String>> {
            Ok(self.state.lock().await.skus.keys().cloned().collect())
        }

        async fn skus_needing_recalc(&self, skus: &[String]) -> Result<Vec<String>> {
            let state = self.state.lock().await;
            Ok(skus
                .iter()
                .filter(|sku| {
                    let current_hash = state.skus.get(*sku).map(|s| s.attrs_hash_current.clone());
                    let last_calc = state
                        .freight_results
                        .get(*sku)
                        .map(|r| r.attrs_hash_last_calc.clone());
                    current_hash != last_calc
                })
                .cloned()
                .collect())
        }

        async fn create_freight_run(
            &self,
            product_run_id: Option<Uuid>,
            triggered_by: &str,
        ) -> Result<FreightCalculationRun> {
            let run = FreightCalculationRun {
                id: super::generate_freight_run_id(),
                status: FreightRunStatus::Pending,
                triggered_by: triggered_by.to_string(),
                product_run_id,
                candidate_count: Some(0),
                changed_count: None,
                message: None,
                finished_at: None,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            };
            self.state
                .lock()
                .await
                .freight_runs
                .insert(run.id.clone(), run.clone());
            Ok(run)
        }

        async fn set_freight_run_candidate_count(&self, run_id: &str, count: i64) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(run) = state.freight_runs.get_mut(run_id) {
                run.candidate_count = Some(count);
                run.status = FreightRunStatus::Running;
            }
            Ok(())
        }

        async fn finish_freight_run(
            &self,
            run_id: &str,
            status: FreightRunStatus,
            changed_count: i64,
            message: Option<&str>,
        ) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(run) = state.freight_runs.get_mut(run_id) {
                run.status = status;
                run.changed_count = Some(changed_count);
                run.message = message.map(|s| s.to_string());
                run.finished_at = Some(chrono::Utc::now());
            }
            Ok(())
        }

        async fn iter_changed_skus(
            &self,
            country: CountryType,
            offset: i64,
            batch_size: i64,
        ) -> Result<Vec<String>> {
            let state = self.state.lock().await;
            let mut dirty: Vec<&String> = state
                .freight_results
                .values()
                .filter(|r| match country {
                    CountryType::Au => r.kogan_dirty_au,
                    CountryType::Nz => r.kogan_dirty_nz,
                })
                .map(|r| &r.sku_code)
                .collect();
            dirty.sort();
            Ok(dirty
                .into_iter()
                .skip(offset as usize)
                .take(batch_size as usize)
                .cloned()
                .collect())
        }

        async fn load_kogan_baseline_map(
            &self,
            country: CountryType,
            skus: &[String],
        ) -> Result<HashMap<String, serde_json::Value>> {
            let state = self.state.lock().await;
            Ok(skus
                .iter()
                .filter_map(|s| {
                    state
                        .kogan_baseline
                        .get(&(country, s.clone()))
                        .map(|v| (s.clone(), v.clone()))
                })
                .collect())
        }

        async fn clear_kogan_dirty_flags(&self, country: CountryType, skus: &[String]) -> Result<()> {
            let mut state = self.state.lock().await;
            for sku in skus {
                if let Some(r) = state.freight_results.get_mut(sku) {
                    match country {
                        CountryType::Au => r.kogan_dirty_au = false,
                        CountryType::Nz => r.kogan_dirty_nz = false,
                    }
                }
            }
            Ok(())
        }

        async fn create_export_job(
            &self,
            country: CountryType,
            file_name: &str,
            file_content: Vec<u8>,
            row_count: i32,
            sku_records: &[ExportJobSku],
        ) -> Result<ExportJob> {
            let id = super::generate_export_job_id(country);
            let job = ExportJob {
                id: id.clone(),
                country_type: country.as_str().to_string(),
                status: ExportJobStatus::Exported,
                file_name: file_name.to_string(),
                file_size: file_content.len() as i32,
                row_count,
                file_content,
                note: None,
                exported_at: Some(chrono::Utc::now()),
                applied_at: None,
                created_at: chrono::Utc::now(),
                updated_at: chrono::Utc::now(),
            };
            self.state
                .lock()
                .await
                .export_jobs
                .insert(id, (job.clone(), sku_records.to_vec()));
            Ok(job)
        }

        async fn get_export_job(&self, job_id: &str) -> Result<Option<ExportJob>> {
            Ok(self
                .state
                .lock()
                .await
                .export_jobs
                .get(job_id)
                .map(|(j, _)| j.clone()))
        }

        async fn get_export_job_skus(&self, job_id: &str) -> Result<Vec<ExportJobSku>> {
            Ok(self
                .state
                .lock()
                .await
                .export_jobs
                .get(job_id)
                .map(|(_, skus)| skus.clone())
                .unwrap_or_default())
        }

        async fn fetch_latest_export_job(&self, country: CountryType) -> Result<Option<ExportJob>> {
            Ok(self
                .state
                .lock()
                .await
                .export_jobs
                .values()
                .filter(|(j, _)| j.country_type == country.as_str())
                .max_by_key(|(j, _)| j.exported_at)
                .map(|(j, _)| j.clone()))
        }

        async fn mark_export_job_status(
            &self,
            job_id: &str,
            status: ExportJobStatus,
            note: Option<&str>,
        ) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some((job, _)) = state.export_jobs.get_mut(job_id) {
                job.status = status;
                if let Some(n) = note {
                    job.note = Some(n.to_string());
                }
                if matches!(status, ExportJobStatus::Applied) {
                    job.applied_at = Some(chrono::Utc::now());
                }
            }
            Ok(())
        }

        async fn apply_kogan_template_updates(
            &self,
            country: CountryType,
            updates: &[(String, serde_json::Value)],
        ) -> Result<()> {
            let mut state = self.state.lock().await;
            for (sku, values) in updates {
                state
                    .kogan_baseline
                    .insert((country, sku.clone()), values.clone());
            }
            Ok(())
        }

        async fn list_schedules(&self) -> Result<Vec<ScheduleEntry>> {
            Ok(self.state.lock().await.schedules.values().cloned().collect())
        }

        async fn get_schedule(&self, key: &str) -> Result<Option<ScheduleEntry>> {
            Ok(self.state.lock().await.schedules.get(key).cloned())
        }

        async fn upsert_schedule(&self, entry: &ScheduleEntry) -> Result<()> {
            self.state
                .lock()
                .await
                .schedules
                .insert(entry.key.clone(), entry.clone());
            Ok(())
        }

        async fn record_schedule_run(&self, key: &str) -> Result<()> {
            let mut state = self.state.lock().await;
            if let Some(s) = state.schedules.get_mut(key) {
                s.last_run_at = Some(chrono::Utc::now());
            }
            Ok(())
        }
    }
}
