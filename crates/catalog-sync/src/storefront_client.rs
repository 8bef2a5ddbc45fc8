//! Storefront (Shopify-style) bulk operations client: kicks off and polls
//! bulk product queries by tag, downloads the resulting JSONL, pushes
//! metafield batches back, and verifies inbound webhook signatures.
//!
//! Grounded on the supplier integration's companion storefront client
//! (GraphQL bulk-operation start/poll/download, `metafieldsSet` batch
//! writes, and an HMAC-SHA256 webhook verifier) — the same retry/backoff
//! shape as [`crate::supplier_client`], reused rather than reinvented.

use erp_core::error::{Error, ErrorCode, Result};
use erp_core::StorefrontConfig;
use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use std::time::Duration;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

pub struct StorefrontClient {
    http: reqwest::Client,
    cfg: StorefrontConfig,
}

#[derive(Debug, Clone)]
pub struct BulkOperation {
    pub id: String,
    pub status: String,
    pub url: Option<String>,
    pub error_code: Option<String>,
}

impl StorefrontClient {
    pub fn new(cfg: StorefrontConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| Error::new(ErrorCode::StorefrontBulkFailed, e.to_string()))?;
        Ok(Self { http, cfg })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/admin/api/{}/graphql.json",
            self.cfg.base_url.trim_end_matches('/'),
            self.cfg.api_version
        )
    }

    async fn post_graphql(&self, query: &str, variables: Value) -> Result<Value> {
        let max_attempts = 3;
        for attempt in 1..=max_attempts {
            let resp = self
                .http
                .post(self.endpoint())
                .header("X-Shopify-Access-Token", &self.cfg.access_token)
                .header("Content-Type", "application/json")
                .json(&json!({ "query": query, "variables": variables }))
                .send()
                .await;

            let resp = match resp {
                Ok(r) => r,
                Err(e) if attempt < max_attempts => {
                    warn!("storefront request attempt {attempt} failed: {e}");
                    tokio::time::sleep(Duration::from_secs(attempt as u64)).await;
                    continue;
                }
                Err(e) => return Err(Error::new(ErrorCode::StorefrontBulkFailed, e.to_string())),
            };

            if resp.status().as_u16() == 429 {
                if attempt == max_attempts {
                    return Err(Error::new(
                        ErrorCode::StorefrontBulkThrottled,
                        "storefront API throttled",
                    ));
                }
                tokio::time::sleep(Duration::from_secs(2 * attempt as u64)).await;
                continue;
            }

            if resp.status().is_server_error() {
                if attempt == max_attempts {
                    return Err(Error::new(
                        ErrorCode::StorefrontBulkFailed,
                        format!("storefront server error {}", resp.status()),
                    ));
                }
                tokio::time::sleep(Duration::from_secs(2 * attempt as u64)).await;
                continue;
            }

            let body: Value = resp
                .json()
                .await
                .map_err(|e| Error::new(ErrorCode::StorefrontBulkFailed, e.to_string()))?;

            if let Some(errors) = body.get("errors").and_then(|v| v.as_array()) {
                if !errors.is_empty() {
                    return Err(Error::new(
                        ErrorCode::StorefrontBulkFailed,
                        format!("GraphQL errors: {errors}"),
                    ));
                }
            }

            return Ok(body);
        }
        Err(Error::new(ErrorCode::StorefrontBulkFailed, "unreachable retry loop"))
    }

    pub async fn ping(&self) -> Result<bool> {
        let body = self.post_graphql("{ shop { id } }", json!({})).await?;
        Ok(body.get("data").and_then(|d| d.get("shop")).is_some())
    }

    /// Starts a tag-filtered bulk product export. Idempotent at the
    /// storefront's own level: a second call while one is still running
    /// returns the existing operation's id rather than erroring.
    pub async fn run_bulk_products_by_tag(&self, tag: Option<&str>) -> Result<BulkOperation> {
        let tag_filter = tag.unwrap_or(&self.cfg.bulk_tag_filter);
        let query = format!(
            r#"mutation {{
                bulkOperationRunQuery(
                    query: """
                    {{
                        products(query: "tag:{tag_filter}") {{
                            edges {{ node {{ id variants {{ edges {{ node {{ id sku price }} }} }} }} }}
                        }}
                    }}
                    """
                ) {{
                    bulkOperation {{ id status }}
                    userErrors {{ field message }}
                }}
            }}"#
        );
        let body = self.post_graphql(&query, json!({})).await?;
        let op = body
            .pointer("/data/bulkOperationRunQuery/bulkOperation")
            .ok_or_else(|| Error::new(ErrorCode::StorefrontBulkFailed, "missing bulkOperation in response"))?;

        Ok(BulkOperation {
            id: op.get("id").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
            status: op.get("status").and_then(|v| v.as_str()).unwrap_or("CREATED").to_string(),
            url: None,
            error_code: None,
        })
    }

    pub async fn current_bulk_operation(&self) -> Result<Option<BulkOperation>> {
        let query = r#"{ currentBulkOperation { id status url errorCode } }"#;
        let body = self.post_graphql(query, json!({})).await?;
        let Some(op) = body.pointer("/data/currentBulkOperation") else {
            return Ok(None);
        };
        if op.is_null() {
            return Ok(None);
        }
        Ok(Some(parse_bulk_operation(op)))
    }

    pub async fn get_bulk_operation_by_id(&self, id: &str) -> Result<BulkOperation> {
        let query = r#"query($id: ID!) { node(id: $id) { ... on BulkOperation { id status url errorCode } } }"#;
        let body = self.post_graphql(query, json!({ "id": id })).await?;
        let op = body
            .pointer("/data/node")
            .ok_or_else(|| Error::new(ErrorCode::StorefrontBulkFailed, "bulk operation not found"))?;
        Ok(parse_bulk_operation(op))
    }

    /// Polls until the bulk operation completes, failed, or `max_attempts`
    /// is exceeded, backing off geometrically between polls capped at
    /// `poll_interval_cap_seconds`.
    pub async fn poll_until_complete(&self, operation_id: &str) -> Result<BulkOperation> {
        let mut interval = self.cfg.poll_interval_seconds as f64;
        for _ in 0..self.cfg.poll_max_attempts {
            let op = self.get_bulk_operation_by_id(operation_id).await?;
            match op.status.as_str() {
                "COMPLETED" => return Ok(op),
                "FAILED" | "CANCELED" | "EXPIRED" => {
                    return Err(Error::new(
                        ErrorCode::StorefrontBulkFailed,
                        format!("bulk operation ended with status {}", op.status),
                    ))
                }
                _ => {
                    tokio::time::sleep(Duration::from_secs_f64(interval)).await;
                    interval = (interval * self.cfg.poll_backoff_multiplier)
                        .min(self.cfg.poll_interval_cap_seconds as f64);
                }
            }
        }
        Err(Error::new(
            ErrorCode::StorefrontBulkFailed,
            "bulk operation polling exceeded max attempts",
        ))
    }

    /// Downloads the bulk operation's JSONL result and parses it into
    /// one `Value` per line, skipping blank lines.
    pub async fn download_jsonl(&self, url: &str) -> Result<Vec<Value>> {
        let resp = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| Error::new(ErrorCode::StorefrontBulkFailed, e.to_string()))?;
        let text = resp
            .text()
            .await
            .map_err(|e| Error::new(ErrorCode::StorefrontBulkFailed, e.to_string()))?;

        text.lines()
            .filter(|l| !l.trim().is_empty())
            .map(|l| {
                serde_json::from_str(l)
                    .map_err(|e| Error::new(ErrorCode::StorefrontBulkFailed, format!("bad JSONL line: {e}")))
            })
            .collect()
    }

    /// Writes a batch of metafield values (`{ownerId, namespace, key, type, value}`
    /// objects). Business-level `userErrors` are reported back rather than
    /// retried — only transport failures are.
    pub async fn metafields_set_batch(&self, metafields: &[Value]) -> Result<MetafieldSetOutcome> {
        let query = r#"mutation($metafields: [MetafieldsSetInput!]!) {
            metafieldsSet(metafields: $metafields) {
                metafields { id }
                userErrors { field message }
            }
        }"#;
        let body = self
            .post_graphql(query, json!({ "metafields": metafields }))
            .await?;

        let user_errors = body
            .pointer("/data/metafieldsSet/userErrors")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();

        if !user_errors.is_empty() {
            warn!(count = user_errors.len(), "metafieldsSet returned user errors");
            return Ok(MetafieldSetOutcome {
                ok: metafields.len() - user_errors.len().min(metafields.len()),
                failed: user_errors.len(),
                errors: user_errors.into_iter().take(10).collect(),
            });
        }

        info!(count = metafields.len(), "metafieldsSet batch applied cleanly");
        Ok(MetafieldSetOutcome {
            ok: metafields.len(),
            failed: 0,
            errors: Vec::new(),
        })
    }

    /// Ensures the webhook subscription needed to learn about a bulk
    /// operation's completion exists; a no-op if it's already registered.
    pub async fn ensure_bulk_finish_webhook(&self, callback_url: &str) -> Result<()> {
        let query = r#"mutation($topic: WebhookSubscriptionTopic!, $callbackUrl: URL!) {
            webhookSubscriptionCreate(topic: $topic, webhookSubscription: { callbackUrl: $callbackUrl, format: JSON }) {
                webhookSubscription { id }
                userErrors { field message }
            }
        }"#;
        let _ = self
            .post_graphql(
                query,
                json!({ "topic": "BULK_OPERATIONS_FINISH", "callbackUrl": callback_url }),
            )
            .await?;
        Ok(())
    }
}

fn parse_bulk_operation(op: &Value) -> BulkOperation {
    BulkOperation {
        id: op.get("id").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
        status: op.get("status").and_then(|v| v.as_str()).unwrap_or_default().to_string(),
        url: op.get("url").and_then(|v| v.as_str()).map(|s| s.to_string()),
        error_code: op.get("errorCode").and_then(|v| v.as_str()).map(|s| s.to_string()),
    }
}

#[derive(Debug, Clone)]
pub struct MetafieldSetOutcome {
    pub ok: usize,
    pub failed: usize,
    pub errors: Vec<Value>,
}

/// Verifies a webhook request's `X-Shopify-Hmac-Sha256` header against
/// the raw request body, using the configured webhook secret.
/// Constant-time-compared via `hmac`'s own `verify_slice`.
pub fn verify_webhook_signature(secret: &str, raw_body: &[u8], header_b64: &str) -> Result<()> {
    let expected_bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, header_b64)
        .map_err(|e| Error::new(ErrorCode::StorefrontWebhookInvalid, format!("bad signature encoding: {e}")))?;

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| Error::new(ErrorCode::StorefrontWebhookInvalid, e.to_string()))?;
    mac.update(raw_body);

    mac.verify_slice(&expected_bytes)
        .map_err(|_| Error::storefront_webhook_invalid("webhook signature mismatch"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn webhook_signature_roundtrip() {
        let secret = "shh";
        let body = b"{\"id\":1}";
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(body);
        let sig = base64::Engine::encode(&base64::engine::general_purpose::STANDARD, mac.finalize().into_bytes());

        assert!(verify_webhook_signature(secret, body, &sig).is_ok());
        assert!(verify_webhook_signature(secret, body, "bm90LXZhbGlk").is_err());
    }

    #[test]
    fn parse_bulk_operation_handles_missing_fields() {
        let op = json!({"id": "gid://shopify/BulkOperation/1", "status": "RUNNING"});
        let parsed = parse_bulk_operation(&op);
        assert_eq!(parsed.status, "RUNNING");
        assert!(parsed.url.is_none());
    }
}
