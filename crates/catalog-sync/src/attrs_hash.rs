//! Attribute fingerprinting: derives `attrs_hash_current` for a SKU — a
//! SHA-256 digest over the freight/pricing-relevant field set. Comparing
//! a SKU's stored hash against a freshly computed one is how the chunk
//! worker decides whether a changed row is actually freight-relevant
//! (price/dimension/zone-rate change) or just a cosmetic field update.

use crate::types::{SkuMaster, FREIGHT_HASH_FIELDS};
use chrono::{NaiveDate, Utc};
use chrono_tz::Australia::Melbourne;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

fn opt_decimal(v: Option<Decimal>) -> String {
    match v {
        // Two decimal places avoids floating-point-style noise leaking
        // into the hash across otherwise-equal values like `5` and `5.00`.
        Some(d) => d.round_dp(2).to_string(),
        None => String::new(),
    }
}

fn opt_date(v: Option<NaiveDate>) -> String {
    match v {
        Some(d) => d.format("%Y-%m-%d").to_string(),
        None => String::new(),
    }
}

/// `special_price` falls back to `price` once `special_price_end_date`
/// is strictly before today in Australia/Melbourne — the expiry date
/// itself still counts as valid, so a same-day comparison keeps the
/// special price in effect through its last day.
fn effective_special_price(sku: &SkuMaster) -> Option<Decimal> {
    match sku.special_price_end_date {
        Some(end) => {
            let today = Utc::now().with_timezone(&Melbourne).date_naive();
            if end < today {
                sku.price
            } else {
                sku.special_price
            }
        }
        None => sku.special_price,
    }
}

/// Computes the current attribute hash for a SKU. Deterministic and
/// side-effect-free: no mutation of `sku`, no dependence on anything but
/// its fields and the current wall-clock date.
pub fn calc_attrs_hash_current(sku: &SkuMaster) -> String {
    let special_price = effective_special_price(sku);

    let parts: [(&str, String); 23] = [
        ("price", opt_decimal(sku.price)),
        ("special_price", opt_decimal(special_price)),
        ("special_price_end_date", opt_date(sku.special_price_end_date)),
        ("length", opt_decimal(sku.length)),
        ("width", opt_decimal(sku.width)),
        ("height", opt_decimal(sku.height)),
        ("weight", opt_decimal(sku.weight)),
        ("freight_act", opt_decimal(sku.freight_act)),
        ("freight_nsw_m", opt_decimal(sku.freight_nsw_m)),
        ("freight_nsw_r", opt_decimal(sku.freight_nsw_r)),
        ("freight_nt_m", opt_decimal(sku.freight_nt_m)),
        ("freight_nt_r", opt_decimal(sku.freight_nt_r)),
        ("freight_qld_m", opt_decimal(sku.freight_qld_m)),
        ("freight_qld_r", opt_decimal(sku.freight_qld_r)),
        ("remote", opt_decimal(sku.remote)),
        ("freight_sa_m", opt_decimal(sku.freight_sa_m)),
        ("freight_sa_r", opt_decimal(sku.freight_sa_r)),
        ("freight_tas_m", opt_decimal(sku.freight_tas_m)),
        ("freight_tas_r", opt_decimal(sku.freight_tas_r)),
        ("freight_vic_m", opt_decimal(sku.freight_vic_m)),
        ("freight_vic_r", opt_decimal(sku.freight_vic_r)),
        ("freight_wa_m", opt_decimal(sku.freight_wa_m)),
        ("freight_wa_r", opt_decimal(sku.freight_wa_r)),
        ("freight_nz", opt_decimal(sku.freight_nz)),
    ];
    debug_assert_eq!(parts.len(), FREIGHT_HASH_FIELDS.len());

    let raw = parts
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("|");

    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Whether `sku`'s freshly computed hash differs from its stored one —
/// the gate the chunk worker uses to decide a row is freight-dirty.
pub fn is_freight_dirty(sku: &SkuMaster) -> bool {
    calc_attrs_hash_current(sku) != sku.attrs_hash_current
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn base_sku() -> SkuMaster {
        SkuMaster {
            id: Uuid::new_v4(),
            sku_code: "SKU-1".to_string(),
            shopify_variant_id: None,
            stock_qty: None,
            price: Some(dec!(50)),
            rrp_price: None,
            special_price: None,
            special_price_end_date: None,
            shopify_price: None,
            product_tags: None,
            brand: None,
            weight: Some(dec!(1.5)),
            length: None,
            width: None,
            height: None,
            ean_code: None,
            supplier: None,
            freight_act: Some(dec!(10)),
            freight_nsw_m: Some(dec!(10)),
            freight_nsw_r: Some(dec!(12)),
            freight_nt_m: None,
            freight_nt_r: None,
            freight_qld_m: Some(dec!(10)),
            freight_qld_r: Some(dec!(12)),
            remote: None,
            freight_sa_m: Some(dec!(10)),
            freight_sa_r: Some(dec!(12)),
            freight_tas_m: Some(dec!(10)),
            freight_tas_r: Some(dec!(12)),
            freight_vic_m: Some(dec!(10)),
            freight_vic_r: Some(dec!(12)),
            freight_wa_m: Some(dec!(14)),
            freight_wa_r: Some(dec!(18)),
            freight_nz: Some(dec!(20)),
            attrs_hash_current: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
            last_changed_at: Utc::now(),
        }
    }

    #[test]
    fn hash_is_deterministic() {
        let sku = base_sku();
        assert_eq!(calc_attrs_hash_current(&sku), calc_attrs_hash_current(&sku));
    }

    #[test]
    fn hash_changes_when_a_relevant_field_changes() {
        let mut a = base_sku();
        let mut b = base_sku();
        b.price = Some(dec!(55));
        assert_ne!(calc_attrs_hash_current(&a), calc_attrs_hash_current(&b));

        a.price = Some(dec!(55));
        assert_eq!(calc_attrs_hash_current(&a), calc_attrs_hash_current(&b));
    }

    #[test]
    fn hash_ignores_non_freight_fields() {
        let mut a = base_sku();
        let mut b = base_sku();
        b.sku_code = "SKU-2".to_string();
        b.stock_qty = Some(999);
        b.shopify_price = Some(dec!(123));
        a.attrs_hash_current = "stale".to_string();
        assert_eq!(calc_attrs_hash_current(&a), calc_attrs_hash_current(&b));
    }

    #[test]
    fn expired_special_price_falls_back_to_price() {
        let mut expired = base_sku();
        expired.price = Some(dec!(50));
        expired.special_price = Some(dec!(30));
        expired.special_price_end_date = Some(
            Utc::now().date_naive() - chrono::Duration::days(5),
        );

        let mut fallen_back = base_sku();
        fallen_back.price = Some(dec!(50));
        fallen_back.special_price = Some(dec!(50));
        fallen_back.special_price_end_date = None;

        assert_eq!(
            calc_attrs_hash_current(&expired),
            calc_attrs_hash_current(&fallen_back)
        );
    }

    #[test]
    fn special_price_still_valid_on_its_expiry_date() {
        let mut sku = base_sku();
        sku.special_price = Some(dec!(30));
        sku.special_price_end_date = Some(Utc::now().date_naive());
        assert!(!is_freight_dirty(&{
            let mut stored = sku.clone();
            stored.attrs_hash_current = calc_attrs_hash_current(&sku);
            stored
        }));
    }

    #[test]
    fn is_freight_dirty_detects_mismatch() {
        let mut sku = base_sku();
        sku.attrs_hash_current = "not-the-real-hash".to_string();
        assert!(is_freight_dirty(&sku));
    }
}
