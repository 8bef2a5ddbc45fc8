//! Freight-derived pricing calculator: the pure, side-effect-free core
//! that turns a SKU's dimensions and zonal freight rates into the
//! shipping-type classification and the downstream Kogan/Shopify prices.
//!
//! Every function here is deterministic given its inputs and the active
//! `FreightCalcConfig` — no I/O, no clock reads beyond what callers pass
//! in. This mirrors how the teacher keeps pricing/scoring logic free of
//! repository or network concerns so it can be unit tested in isolation.

use erp_core::FreightCalcConfig;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

/// The 12 states that participate in the national averaging set used by
/// `same_shipping`/`shipping_ave`/`shipping_med`. `WA_R` and both `NT_*`
/// fields are deliberately excluded — they're carried on the SKU master
/// and the attribute hash, but never enter this average.
const STATES_ALL: &[&str] = &[
    "ACT", "NSW_M", "NSW_R", "QLD_M", "QLD_R", "SA_M", "SA_R", "TAS_M", "TAS_R", "VIC_M", "VIC_R",
    "WA_M",
];
const STATES_METRO: &[&str] = &["ACT", "NSW_M", "QLD_M", "SA_M", "TAS_M", "VIC_M", "WA_M"];
const STATES_RURAL: &[&str] = &["NSW_R", "QLD_R", "SA_R", "TAS_R", "VIC_R", "WA_R"];

pub type FreightMap = HashMap<&'static str, Option<Decimal>>;

/// The subset of a SKU's fields this calculator needs, decoupled from
/// the storage row shape so the module can be tested without a `SkuMaster`.
#[derive(Debug, Clone, Default)]
pub struct FreightInputs {
    pub price: Option<Decimal>,
    pub special_price: Option<Decimal>,
    pub weight: Option<Decimal>,
    pub cbm: Option<Decimal>,
    pub state_freight: FreightMap,
}

/// Every computed column destined for the freight result row, mirroring
/// `FreightOutputs` — the shape `process_batch_compute_and_persist`
/// diffs against the previously persisted result.
#[derive(Debug, Clone, PartialEq)]
pub struct FreightOutputs {
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
    pub cubic_weight: Option<Decimal>,
    pub shipping_type: String,
    pub weight: Option<Decimal>,
    pub price_ratio: Option<Decimal>,
    pub selling_price: Option<Decimal>,
    pub shopify_price: Option<Decimal>,
    pub kogan_au_price: Option<Decimal>,
    pub kogan_k1_price: Option<Decimal>,
    pub kogan_nz_price: Option<Decimal>,
}

fn round_dp(val: Decimal, dp: u32) -> Decimal {
    val.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

fn values_for(keys: &[&str], fr: &FreightMap) -> Vec<Decimal> {
    keys.iter()
        .filter_map(|k| fr.get(k).copied().flatten())
        .collect()
}

fn avg(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

fn median_of(mut values: Vec<Decimal>) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    values.sort();
    let n = values.len();
    if n % 2 == 1 {
        Some(values[n / 2])
    } else {
        Some((values[n / 2 - 1] + values[n / 2]) / Decimal::from(2u8))
    }
}

/// `Selling Price < threshold` → `threshold`'s 4% rate, else none.
pub fn compute_adjust(selling_price: Option<Decimal>, cfg: &FreightCalcConfig) -> Option<Decimal> {
    let sp = selling_price?;
    if sp < cfg.adjust_threshold {
        Some(round_dp(sp * cfg.adjust_rate, 2))
    } else {
        None
    }
}

/// Max - min across the 12-state averaging set.
pub fn compute_same_shipping(fr: &FreightMap) -> Option<Decimal> {
    let vals = values_for(STATES_ALL, fr);
    if vals.len() < 2 {
        return None;
    }
    let max = vals.iter().copied().fold(vals[0], Decimal::max);
    let min = vals.iter().copied().fold(vals[0], Decimal::min);
    Some(max - min)
}

pub fn compute_shipping_ave(fr: &FreightMap) -> Option<Decimal> {
    avg(&values_for(STATES_ALL, fr)).map(|v| round_dp(v, 1))
}

pub fn compute_shipping_ave_m(fr: &FreightMap) -> Option<Decimal> {
    avg(&values_for(STATES_METRO, fr)).map(|v| round_dp(v, 1))
}

pub fn compute_shipping_ave_r(fr: &FreightMap) -> Option<Decimal> {
    avg(&values_for(STATES_RURAL, fr)).map(|v| round_dp(v, 1))
}

pub fn compute_shipping_med(fr: &FreightMap) -> Option<Decimal> {
    median_of(values_for(STATES_ALL, fr))
}

/// `REMOTE` in `{remote_1, remote_2}`, or `WA_R == wa_r` sentinel, flags
/// the SKU as unserviceable to rural/remote addresses.
pub fn compute_remote_check(fr: &FreightMap, cfg: &FreightCalcConfig) -> bool {
    let remote = fr.get("REMOTE").copied().flatten();
    let wa_r = fr.get("WA_R").copied().flatten();
    matches!(remote, Some(r) if r == cfg.remote_1 || r == cfg.remote_2)
        || matches!(wa_r, Some(w) if w == cfg.wa_r_sentinel)
}

pub fn compute_rural_ave(
    remote_check: bool,
    fr: &FreightMap,
    shipping_ave: Option<Decimal>,
) -> Option<Decimal> {
    if remote_check {
        return shipping_ave;
    }
    let remote = fr.get("REMOTE").copied().flatten();
    let wa_r = fr.get("WA_R").copied().flatten();
    let vals: Vec<Decimal> = [remote, wa_r].into_iter().flatten().collect();
    avg(&vals).map(|v| round_dp(v, 1))
}

pub fn compute_weighted_ave_s(
    remote_check: bool,
    shipping_ave: Option<Decimal>,
    rural_ave: Option<Decimal>,
    cfg: &FreightCalcConfig,
) -> Option<Decimal> {
    let ave = shipping_ave?;
    if remote_check {
        return Some(ave);
    }
    let rural = rural_ave?;
    Some(round_dp(
        ave * cfg.weighted_ave_shipping_weight + rural * cfg.weighted_ave_rural_weight,
        1,
    ))
}

pub fn compute_shipping_med_dif(fr: &FreightMap, shipping_med: Option<Decimal>) -> Option<Decimal> {
    let med = shipping_med?;
    let remote = fr.get("REMOTE").copied().flatten();
    let wa_m = fr.get("WA_M").copied().flatten();
    let diffs: Vec<Decimal> = [remote, wa_m]
        .into_iter()
        .flatten()
        .map(|v| v - med)
        .collect();
    diffs.into_iter().reduce(Decimal::max)
}

/// `None` if either dimension is missing. `None` if the package is too
/// dense for the cubic-to-deadweight conversion to apply (weight would
/// exceed the cubic allowance). Otherwise `cbm * factor`, 2 dp.
pub fn compute_cubic_weight(
    weight: Option<Decimal>,
    cbm: Option<Decimal>,
    cfg: &FreightCalcConfig,
) -> Option<Decimal> {
    let w = weight?;
    let c = cbm?;
    if w > (c * cfg.cubic_factor - cfg.cubic_headroom) {
        return None;
    }
    Some(round_dp(c * cfg.cubic_factor, 2))
}

/// The shipping-type classification ladder: rural/remote coverage and
/// price-ratio gates decide between the tight bands (`0`/`1`/`10`/`20`)
/// and the widening `Extra2..Extra5` fallback tiers. Returns the
/// classification alongside `price_ratio` (rural_ave / selling price),
/// since both fall out of the same branch.
pub fn compute_shipping_type(
    same_shipping: Option<Decimal>,
    shipping_med_dif: Option<Decimal>,
    rural_ave: Option<Decimal>,
    remote_check: bool,
    price: Option<Decimal>,
    cfg: &FreightCalcConfig,
) -> (String, Option<Decimal>) {
    let price_ratio = match (rural_ave, price) {
        (Some(rural), Some(p)) if p != Decimal::ZERO => Some(rural / p),
        _ => None,
    };

    let (Some(same_shipping), Some(rural_ave)) = (same_shipping, rural_ave) else {
        return ("Extra3".to_string(), price_ratio);
    };

    let meets_rural_condition =
        matches!(shipping_med_dif, Some(d) if d < cfg.med_dif_40) || remote_check;
    let meets_price_ratio = matches!(price_ratio, Some(r) if r < cfg.price_ratio_limit);
    let condition_group1 = matches!(shipping_med_dif, Some(d) if d < cfg.med_dif_10);
    let condition_group2 = matches!(shipping_med_dif, Some(d) if d < cfg.med_dif_20);

    let result = if rural_ave == Decimal::ZERO {
        "0"
    } else if same_shipping == cfg.same_shipping_0 && meets_rural_condition {
        "1"
    } else if same_shipping < cfg.same_shipping_10 && meets_rural_condition && condition_group1 {
        "10"
    } else if same_shipping < cfg.same_shipping_20
        && meets_rural_condition
        && meets_price_ratio
        && condition_group2
    {
        "20"
    } else if same_shipping < cfg.same_shipping_30 && meets_rural_condition && meets_price_ratio {
        "Extra2"
    } else if same_shipping < cfg.same_shipping_50 {
        "Extra3"
    } else if same_shipping < cfg.same_shipping_100 {
        "Extra4"
    } else {
        "Extra5"
    };

    (result.to_string(), price_ratio)
}

/// Only populated for the `Extra3`/`Extra4`/`Extra5` tiers: reconciles
/// the declared weight against the cubic-derived weight and the
/// shipping-median-implied weight, preferring whichever is within
/// `weight_tolerance_ratio` of the other.
pub fn compute_weight(
    shipping_type: &str,
    weight: Option<Decimal>,
    cubic_weight: Option<Decimal>,
    shipping_med: Option<Decimal>,
    cfg: &FreightCalcConfig,
) -> Option<Decimal> {
    let is_extra = ["Extra3", "Extra4", "Extra5"]
        .iter()
        .any(|tag| shipping_type.contains(tag));
    if !is_extra {
        return None;
    }

    let w = weight.unwrap_or(Decimal::ZERO);
    let cw = cubic_weight.unwrap_or(Decimal::ZERO);
    let sm = shipping_med.unwrap_or(Decimal::ZERO);
    let max_weight = w.max(cw);

    if max_weight == Decimal::ZERO || sm == Decimal::ZERO {
        if sm == Decimal::ZERO {
            return None;
        }
        let result = sm / cfg.weight_calc_divisor;
        return if result == Decimal::ZERO {
            None
        } else {
            Some(round_dp(result, 2))
        };
    }

    let calc_weight = sm / cfg.weight_calc_divisor;
    let ratio_diff = (calc_weight - max_weight).abs() / max_weight;
    let result = if ratio_diff <= cfg.weight_tolerance_ratio {
        max_weight
    } else {
        calc_weight
    };

    if result == Decimal::ZERO {
        None
    } else {
        Some(round_dp(result, 2))
    }
}

/// The price actually in effect: special price wins over the regular
/// price whenever present. Special-price-validity-window handling (does
/// the special expire before "today") belongs to `attrs_hash`'s
/// normalization, not here — this is the raw effective-price rule.
pub fn compute_selling_price(
    price: Option<Decimal>,
    special_price: Option<Decimal>,
) -> Option<Decimal> {
    special_price.or(price)
}

pub fn compute_shopify_price(
    selling_price: Option<Decimal>,
    cfg: &FreightCalcConfig,
) -> Option<Decimal> {
    let sp = selling_price?;
    let mult = if sp < cfg.shopify_threshold {
        cfg.shopify_multiplier_low
    } else {
        cfg.shopify_multiplier_high
    };
    Some(round_dp(sp * mult, 2))
}

pub fn compute_kogan_au_price(
    selling_price: Option<Decimal>,
    shipping_type: &str,
    vic_m: Option<Decimal>,
    shipping_med: Option<Decimal>,
    weighted_ave_s: Option<Decimal>,
    cfg: &FreightCalcConfig,
) -> Option<Decimal> {
    let sp = selling_price?;
    let vic = vic_m.unwrap_or(Decimal::ZERO);
    let med = shipping_med.unwrap_or(Decimal::ZERO);
    let was = weighted_ave_s.unwrap_or(Decimal::ZERO);

    let base = match shipping_type {
        "Extra2" => (sp + was) / cfg.kogan_au_normal_high_denom,
        "Extra3" | "Extra4" => {
            if vic == Decimal::ZERO {
                sp / cfg.kogan_au_normal_high_denom
            } else {
                (sp + vic * cfg.kogan_au_vic_half_factor) / cfg.kogan_au_normal_high_denom
            }
        }
        "Extra5" => {
            let pre = if vic == Decimal::ZERO {
                sp / cfg.kogan_au_normal_high_denom
            } else {
                (sp + vic * cfg.kogan_au_vic_half_factor) / cfg.kogan_au_normal_high_denom
            };
            pre / cfg.kogan_au_extra5_discount
        }
        _ => {
            let denom = if sp < cfg.shopify_threshold {
                cfg.kogan_au_normal_low_denom
            } else {
                cfg.kogan_au_normal_high_denom
            };
            (sp + med) / denom
        }
    };

    Some(round_dp(base, 2))
}

pub fn compute_k1_price(kogan_au_price: Option<Decimal>, cfg: &FreightCalcConfig) -> Option<Decimal> {
    let kap = kogan_au_price?;
    if kap > cfg.k1_threshold {
        Some(round_dp(kap * cfg.k1_discount_multiplier, 2))
    } else {
        Some(round_dp(kap - cfg.k1_otherwise_minus, 2))
    }
}

pub fn compute_kogan_nz_price(
    selling_price: Option<Decimal>,
    nz_cost: Option<Decimal>,
    cfg: &FreightCalcConfig,
) -> Option<Decimal> {
    let sp = selling_price?;
    let nz = nz_cost?;
    if nz == cfg.kogan_nz_service_no {
        return None;
    }
    let denom = Decimal::ONE - cfg.kogan_nz_config1 - cfg.kogan_nz_config2;
    if denom == Decimal::ZERO || cfg.kogan_nz_config3 == Decimal::ZERO {
        return None;
    }
    Some(round_dp((sp + nz) / denom / cfg.kogan_nz_config3, 2))
}

/// Runs every computation above for one SKU's inputs, in the dependency
/// order each downstream value needs.
pub fn compute_all(inputs: &FreightInputs, cfg: &FreightCalcConfig) -> FreightOutputs {
    let fr = &inputs.state_freight;

    let selling_price = compute_selling_price(inputs.price, inputs.special_price);
    let adjust = compute_adjust(selling_price, cfg);

    let same_shipping = compute_same_shipping(fr);
    let shipping_ave = compute_shipping_ave(fr);
    let shipping_ave_m = compute_shipping_ave_m(fr);
    let shipping_ave_r = compute_shipping_ave_r(fr);
    let shipping_med = compute_shipping_med(fr);

    let remote_check = compute_remote_check(fr, cfg);
    let rural_ave = compute_rural_ave(remote_check, fr, shipping_ave);
    let weighted_ave_s = compute_weighted_ave_s(remote_check, shipping_ave, rural_ave, cfg);
    let shipping_med_dif = compute_shipping_med_dif(fr, shipping_med);
    let cubic_weight = compute_cubic_weight(inputs.weight, inputs.cbm, cfg);

    let (shipping_type, price_ratio) = compute_shipping_type(
        same_shipping,
        shipping_med_dif,
        rural_ave,
        remote_check,
        inputs.price,
        cfg,
    );

    let weight = compute_weight(&shipping_type, inputs.weight, cubic_weight, shipping_med, cfg);

    let shopify_price = compute_shopify_price(selling_price, cfg);
    let vic_m = fr.get("VIC_M").copied().flatten();
    let kogan_au_price = compute_kogan_au_price(
        selling_price,
        &shipping_type,
        vic_m,
        shipping_med,
        weighted_ave_s,
        cfg,
    );
    let kogan_k1_price = compute_k1_price(kogan_au_price, cfg);
    let nz_cost = fr.get("NZ").copied().flatten();
    let kogan_nz_price = compute_kogan_nz_price(selling_price, nz_cost, cfg);

    FreightOutputs {
        adjust,
        same_shipping,
        shipping_ave,
        shipping_ave_m,
        shipping_ave_r,
        shipping_med,
        remote_check,
        rural_ave,
        weighted_ave_s,
        shipping_med_dif,
        cubic_weight,
        shipping_type,
        weight,
        price_ratio,
        selling_price,
        shopify_price,
        kogan_au_price,
        kogan_k1_price,
        kogan_nz_price,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn freight_map(pairs: &[(&'static str, i64)]) -> FreightMap {
        pairs
            .iter()
            .map(|(k, v)| (*k, Some(Decimal::from(*v))))
            .collect()
    }

    #[test]
    fn same_shipping_ignores_wa_r_and_nt() {
        let mut fr = freight_map(&[
            ("ACT", 10),
            ("NSW_M", 12),
            ("NSW_R", 15),
            ("QLD_M", 11),
            ("QLD_R", 14),
            ("SA_M", 13),
            ("SA_R", 16),
            ("TAS_M", 12),
            ("TAS_R", 15),
            ("VIC_M", 10),
            ("VIC_R", 13),
            ("WA_M", 20),
        ]);
        fr.insert("WA_R", Some(dec!(9999)));
        fr.insert("NT_M", Some(dec!(500)));

        let result = compute_same_shipping(&fr).unwrap();
        assert_eq!(result, dec!(10)); // 20 - 10, WA_R/NT excluded
    }

    #[test]
    fn remote_check_triggers_on_sentinels() {
        let cfg = FreightCalcConfig::default();
        let mut fr = FreightMap::new();
        fr.insert("REMOTE", Some(dec!(9999)));
        assert!(compute_remote_check(&fr, &cfg));

        let mut fr2 = FreightMap::new();
        fr2.insert("WA_R", Some(dec!(9999)));
        assert!(compute_remote_check(&fr2, &cfg));

        let mut fr3 = FreightMap::new();
        fr3.insert("REMOTE", Some(dec!(15)));
        assert!(!compute_remote_check(&fr3, &cfg));
    }

    #[test]
    fn adjust_applies_only_under_threshold() {
        let cfg = FreightCalcConfig::default();
        assert_eq!(compute_adjust(Some(dec!(20)), &cfg), Some(dec!(0.80)));
        assert_eq!(compute_adjust(Some(dec!(30)), &cfg), None);
    }

    #[test]
    fn cubic_weight_none_when_too_dense() {
        let cfg = FreightCalcConfig::default();
        // weight (30) > cbm*250 - 1 (24) -> None
        assert_eq!(
            compute_cubic_weight(Some(dec!(30)), Some(dec!(0.1)), &cfg),
            None
        );
        assert_eq!(
            compute_cubic_weight(Some(dec!(2)), Some(dec!(0.1)), &cfg),
            Some(dec!(25.00))
        );
    }

    #[test]
    fn shipping_type_zero_when_rural_ave_zero() {
        let cfg = FreightCalcConfig::default();
        let (st, _) = compute_shipping_type(
            Some(dec!(5)),
            Some(dec!(1)),
            Some(Decimal::ZERO),
            false,
            Some(dec!(50)),
            &cfg,
        );
        assert_eq!(st, "0");
    }

    #[test]
    fn shipping_type_falls_back_to_extra3_without_inputs() {
        let cfg = FreightCalcConfig::default();
        let (st, ratio) =
            compute_shipping_type(None, None, None, false, Some(dec!(50)), &cfg);
        assert_eq!(st, "Extra3");
        assert_eq!(ratio, None);
    }

    #[test]
    fn weight_only_computed_for_extra_tiers() {
        let cfg = FreightCalcConfig::default();
        assert_eq!(
            compute_weight("10", Some(dec!(5)), Some(dec!(6)), Some(dec!(20)), &cfg),
            None
        );
        let w = compute_weight("Extra4", Some(dec!(5)), Some(dec!(6)), Some(dec!(20)), &cfg);
        assert!(w.is_some());
    }

    #[test]
    fn kogan_nz_price_none_for_unserviceable_sentinel() {
        let cfg = FreightCalcConfig::default();
        assert_eq!(
            compute_kogan_nz_price(Some(dec!(50)), Some(dec!(9999)), &cfg),
            None
        );
        assert!(compute_kogan_nz_price(Some(dec!(50)), Some(dec!(20)), &cfg).is_some());
    }

    #[test]
    fn compute_all_runs_end_to_end() {
        let cfg = FreightCalcConfig::default();
        let mut state_freight = freight_map(&[
            ("ACT", 10),
            ("NSW_M", 12),
            ("NSW_R", 15),
            ("QLD_M", 11),
            ("QLD_R", 14),
            ("SA_M", 13),
            ("SA_R", 16),
            ("TAS_M", 12),
            ("TAS_R", 15),
            ("VIC_M", 10),
            ("VIC_R", 13),
            ("WA_M", 20),
        ]);
        state_freight.insert("WA_R", Some(dec!(18)));
        state_freight.insert("REMOTE", Some(dec!(22)));
        state_freight.insert("NZ", Some(dec!(25)));

        let inputs = FreightInputs {
            price: Some(dec!(40)),
            special_price: None,
            weight: Some(dec!(3)),
            cbm: Some(dec!(0.02)),
            state_freight,
        };

        let out = compute_all(&inputs, &cfg);
        assert_eq!(out.selling_price, Some(dec!(40)));
        assert!(out.shopify_price.is_some());
        assert!(!out.shipping_type.is_empty());
    }
}
