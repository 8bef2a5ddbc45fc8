//! Rate-limited HTTP client for the supplier's product/zone-rates API.
//!
//! Owns auth (token fetch + single-retry-on-401 refresh), a process-local
//! request pacer layered under the shared distributed token bucket, and
//! exponential backoff on 429/5xx. Mirrors the supplier integration's own
//! client/products split: [`SupplierClient`] is the low-level transport,
//! [`fetch_products_by_skus`]/[`fetch_zone_rates_by_skus`] are the
//! higher-level batch-and-merge entry points callers actually use.

use erp_core::error::{Error, ErrorCode, Result};
use erp_core::{RateLimiter, SupplierConfig};
use rand::Rng;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Deserialize)]
struct AuthResponse {
    token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Low-level transport: one instance per supplier account. Holds the
/// cached bearer token and the rate limiter, neither of which are safe to
/// share across accounts.
pub struct SupplierClient {
    http: reqwest::Client,
    cfg: SupplierConfig,
    token: tokio::sync::Mutex<Option<CachedToken>>,
    limiter: tokio::sync::Mutex<RateLimiter>,
}

impl SupplierClient {
    pub fn new(cfg: SupplierConfig, limiter: RateLimiter) -> Result<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(cfg.connect_timeout_seconds))
            .timeout(Duration::from_secs(cfg.read_timeout_seconds))
            .build()
            .map_err(|e| Error::new(ErrorCode::SupplierClientError, e.to_string()))?;

        Ok(Self {
            http,
            cfg,
            token: tokio::sync::Mutex::new(None),
            limiter: tokio::sync::Mutex::new(limiter),
        })
    }

    async fn ensure_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        let needs_refresh = match &*guard {
            Some(t) => chrono::Utc::now() >= t.expires_at,
            None => true,
        };
        if needs_refresh {
            *guard = Some(self.authenticate().await?);
        }
        Ok(guard.as_ref().unwrap().value.clone())
    }

    async fn force_refresh_token(&self) -> Result<String> {
        let mut guard = self.token.lock().await;
        let fresh = self.authenticate().await?;
        let value = fresh.value.clone();
        *guard = Some(fresh);
        Ok(value)
    }

    async fn authenticate(&self) -> Result<CachedToken> {
        let url = format!("{}/auth", self.cfg.base_url.trim_end_matches('/'));
        let resp = self
            .http
            .post(&url)
            .json(&serde_json::json!({
                "email": self.cfg.email,
                "password": self.cfg.password,
            }))
            .send()
            .await
            .map_err(|e| Error::new(ErrorCode::SupplierAuthFailed, e.to_string()))?;

        if !resp.status().is_success() {
            return Err(Error::supplier_auth_failed(format!(
                "supplier auth failed with status {}",
                resp.status()
            )));
        }

        let body: AuthResponse = resp
            .json()
            .await
            .map_err(|e| Error::new(ErrorCode::SupplierAuthFailed, e.to_string()))?;

        let ttl = body
            .expires_in
            .unwrap_or(self.cfg.token_ttl_fallback_seconds);
        Ok(CachedToken {
            value: body.token,
            expires_at: chrono::Utc::now() + chrono::Duration::seconds(ttl),
        })
    }

    /// Executes one GET/POST, refreshing the token once on 401 and
    /// backing off exponentially (2,4,8,...,60s, +0-25% jitter) on 429/5xx.
    /// Client 4xx errors other than 401/429 are never retried.
    async fn request_json(
        &self,
        method: reqwest::Method,
        path: &str,
        query: Option<&[(&str, String)]>,
        json_body: Option<&Value>,
    ) -> Result<Value> {
        self.limiter.lock().await.acquire().await;

        let url = format!(
            "{}/{}",
            self.cfg.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        );

        let mut token = self.ensure_token().await?;
        let mut already_refreshed = false;
        let max_attempts = 3;

        for attempt in 1..=max_attempts {
            let mut req = self
                .http
                .request(method.clone(), &url)
                .header("Authorization", format!("jwt {token}"))
                .header("Accept", "application/json");
            if let Some(q) = query {
                req = req.query(q);
            }
            if let Some(body) = json_body {
                req = req.json(body);
            }

            let resp = match req.send().await {
                Ok(r) => r,
                Err(e) => {
                    if attempt == max_attempts {
                        return Err(Error::new(ErrorCode::SupplierClientError, e.to_string()));
                    }
                    sleep_backoff(attempt).await;
                    continue;
                }
            };

            let status = resp.status();

            if status.as_u16() == 401 && !already_refreshed {
                info!("supplier API returned 401, refreshing token once");
                token = self.force_refresh_token().await?;
                already_refreshed = true;
                continue;
            }

            if status.as_u16() == 429 {
                if attempt == max_attempts {
                    return Err(Error::new(
                        ErrorCode::SupplierRateLimited,
                        format!("429 after {max_attempts} attempts"),
                    ));
                }
                sleep_backoff(attempt).await;
                continue;
            }

            if status.is_server_error() {
                if attempt == max_attempts {
                    return Err(Error::new(
                        ErrorCode::SupplierServerError,
                        format!("{status} after {max_attempts} attempts"),
                    ));
                }
                sleep_backoff(attempt).await;
                continue;
            }

            if status.is_client_error() {
                let text = resp.text().await.unwrap_or_default();
                return Err(Error::new(
                    ErrorCode::SupplierClientError,
                    format!("{status} client error: {}", &text[..text.len().min(300)]),
                ));
            }

            return resp
                .json::<Value>()
                .await
                .map_err(|e| Error::new(ErrorCode::SupplierPayloadError, e.to_string()));
        }

        Err(Error::new(
            ErrorCode::SupplierClientError,
            "unreachable retry loop",
        ))
    }
}

async fn sleep_backoff(attempt: u32) {
    let base = (2u64.saturating_pow(attempt)).min(60);
    let jitter_ms = rand::thread_rng().gen_range(0..=((base as f64 * 0.25 * 1000.0) as u64).max(1));
    tokio::time::sleep(Duration::from_secs(base) + Duration::from_millis(jitter_ms)).await;
}

/// One product row as returned by the supplier's `/v2/products` endpoint.
/// Kept as a loosely-typed map since the upstream schema carries far more
/// fields than the sync engine tracks — callers normalize the subset they
/// need via the sync-field whitelist.
pub type RawProduct = serde_json::Map<String, Value>;

fn extract_items(payload: &Value) -> Result<Vec<RawProduct>> {
    fn as_dict_list(value: &Value) -> Option<Vec<RawProduct>> {
        let arr = value.as_array()?;
        let mut out = Vec::with_capacity(arr.len());
        for item in arr {
            out.push(item.as_object()?.clone());
        }
        Some(out)
    }

    if let Some(list) = as_dict_list(payload) {
        return Ok(list);
    }

    if let Some(obj) = payload.as_object() {
        for key in ["result", "results", "products", "items", "data", "payload", "response"] {
            if let Some(value) = obj.get(key) {
                if let Some(list) = as_dict_list(value) {
                    return Ok(list);
                }
                if value.is_object() {
                    if let Ok(nested) = extract_items(value) {
                        return Ok(nested);
                    }
                }
            }
        }

        // Breadth-first fallback: first list-of-objects found anywhere.
        let mut queue: Vec<&serde_json::Map<String, Value>> = vec![obj];
        let mut idx = 0;
        while idx < queue.len() {
            let current = queue[idx];
            idx += 1;
            for value in current.values() {
                if let Some(list) = as_dict_list(value) {
                    return Ok(list);
                }
                if let Some(nested) = value.as_object() {
                    queue.push(nested);
                }
            }
        }
    }

    Err(Error::new(
        ErrorCode::SupplierPayloadError,
        "unexpected products payload structure",
    ))
}

fn sku_of(item: &RawProduct) -> Option<String> {
    item.get("sku").and_then(|v| v.as_str()).map(|s| s.to_string())
}

/// Fetches products for an arbitrary number of SKUs, transparently
/// splitting into `products_max_per_req`-sized sub-batches, deduping by
/// SKU, and retrying any request-level failure up to `per_batch_attempts`
/// times before giving up on that sub-batch (degrading, not failing the
/// whole call). Any SKUs still missing after a sub-batch succeeds are
/// retried once more as a single compensating request.
pub async fn fetch_products_by_skus(
    client: &SupplierClient,
    skus: &[String],
) -> Result<Vec<RawProduct>> {
    let cleaned: Vec<String> = skus
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    let mut seen = HashSet::new();

    for chunk in cleaned.chunks(client.cfg.products_max_per_req) {
        let items = fetch_products_chunk_with_retry(client, chunk, 2).await;
        merge_items(&items, &mut results, &mut seen);

        let returned: HashSet<&str> = items.iter().filter_map(|i| i.get("sku").and_then(|v| v.as_str())).collect();
        let requested: HashSet<&str> = chunk.iter().map(|s| s.as_str()).collect();
        let missing: Vec<&str> = requested.difference(&returned).copied().collect();

        if !missing.is_empty() {
            let missing_owned: Vec<String> = missing.iter().map(|s| s.to_string()).collect();
            match fetch_products_chunk(client, &missing_owned).await {
                Ok(retry_items) => {
                    info!(
                        requested = chunk.len(),
                        missing_before = missing.len(),
                        retried = retry_items.len(),
                        "supplier products retry for missing SKUs"
                    );
                    merge_items(&retry_items, &mut results, &mut seen);
                }
                Err(e) => warn!("retry for missing supplier SKUs failed: {e}"),
            }
        }
    }

    Ok(results)
}

fn merge_items(items: &[RawProduct], results: &mut Vec<RawProduct>, seen: &mut HashSet<String>) {
    for item in items {
        match sku_of(item) {
            Some(sku) if seen.contains(&sku) => {}
            Some(sku) => {
                seen.insert(sku);
                results.push(item.clone());
            }
            None => results.push(item.clone()),
        }
    }
}

async fn fetch_products_chunk(client: &SupplierClient, chunk: &[String]) -> Result<Vec<RawProduct>> {
    let query = [
        ("skus", chunk.join(",")),
        ("limit", chunk.len().max(1).to_string()),
    ];
    let payload = client
        .request_json(reqwest::Method::GET, &client.cfg.products_endpoint, Some(&query), None)
        .await?;
    extract_items(&payload)
}

async fn fetch_products_chunk_with_retry(
    client: &SupplierClient,
    chunk: &[String],
    attempts: u32,
) -> Vec<RawProduct> {
    for attempt in 1..=attempts {
        match fetch_products_chunk(client, chunk).await {
            Ok(items) => return items,
            Err(e) if attempt < attempts => {
                debug!("supplier products sub-batch attempt {attempt} failed: {e}");
                tokio::time::sleep(Duration::from_millis(500)).await;
            }
            Err(e) => {
                warn!(
                    size = chunk.len(),
                    "supplier products sub-batch failed after {attempts} attempts: {e}"
                );
                return Vec::new();
            }
        }
    }
    Vec::new()
}

/// One SKU's zone-rates row: just the SKU and its opaque `standard` rate
/// object, which the caller maps onto `SkuMaster`'s freight fields.
#[derive(Debug, Clone)]
pub struct ZoneRateRow {
    pub sku: String,
    pub standard: Option<Value>,
}

/// Fetches zonal freight rates for a set of SKUs, splitting into
/// `zone_rates_limit`-sized sub-batches (the endpoint's hard per-request
/// cap). Unlike products, a short-of-limit batch that returns fewer rows
/// than requested is only logged, not retried — the endpoint's own
/// semantics treat a missing rate as "not yet priced", not a transient gap.
pub async fn fetch_zone_rates_by_skus(
    client: &SupplierClient,
    skus: &[String],
) -> Result<Vec<ZoneRateRow>> {
    let cleaned: Vec<String> = skus
        .iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Ok(Vec::new());
    }

    let mut results = Vec::new();
    let mut seen = HashSet::new();

    for chunk in cleaned.chunks(client.cfg.zone_rates_limit) {
        let body = serde_json::json!({
            "skus": chunk.join(","),
            "page_no": 1,
            "limit": chunk.len(),
        });
        let payload = client
            .request_json(reqwest::Method::POST, &client.cfg.zone_rates_endpoint, None, Some(&body))
            .await?;

        let items = extract_zone_rate_items(&payload)?;
        let returned: HashSet<&str> = items.iter().map(|r| r.sku.as_str()).collect();
        let requested: HashSet<&str> = chunk.iter().map(|s| s.as_str()).collect();
        let missing_count = requested.difference(&returned).count();
        if missing_count > 0 {
            warn!(
                requested = chunk.len(),
                returned = returned.len(),
                missing = missing_count,
                "supplier zone-rates mismatch"
            );
        }

        for row in items {
            if seen.insert(row.sku.clone()) {
                results.push(row);
            }
        }
    }

    Ok(results)
}

fn extract_zone_rate_items(payload: &Value) -> Result<Vec<ZoneRateRow>> {
    let result = payload
        .get("result")
        .and_then(|v| v.as_array())
        .ok_or_else(|| Error::new(ErrorCode::SupplierPayloadError, "zone_rates.result is not a list"))?;

    let mut out = Vec::new();
    for item in result {
        let Some(obj) = item.as_object() else { continue };
        let Some(sku) = obj.get("sku").and_then(|v| v.as_str()) else { continue };
        if sku.trim().is_empty() {
            continue;
        }
        out.push(ZoneRateRow {
            sku: sku.trim().to_string(),
            standard: obj.get("standard").cloned(),
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extract_items_prefers_result_key() {
        let payload = serde_json::json!({"result": [{"sku": "A"}, {"sku": "B"}]});
        let items = extract_items(&payload).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn extract_items_falls_back_to_bfs() {
        let payload = serde_json::json!({"envelope": {"nested": {"products": [{"sku": "X"}]}}});
        let items = extract_items(&payload).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(sku_of(&items[0]).as_deref(), Some("X"));
    }

    #[test]
    fn extract_items_rejects_unrecognized_shape() {
        let payload = serde_json::json!({"unexpected": "shape"});
        assert!(extract_items(&payload).is_err());
    }

    #[test]
    fn extract_zone_rate_items_skips_blank_skus() {
        let payload = serde_json::json!({
            "result": [
                {"sku": "A", "standard": {"ACT": 10}},
                {"sku": "  ", "standard": {}},
            ]
        });
        let rows = extract_zone_rate_items(&payload).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sku, "A");
    }
}
