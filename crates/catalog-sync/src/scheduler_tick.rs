//! DB-driven scheduler tick: runs on a fixed interval (`SchedulerConfig::
//! tick_interval_seconds`), and for each known schedule key checks
//! whether "now" (in the schedule's own timezone) falls within the
//! configured day/hour/minute trigger window and, for biweekly entries,
//! whether the current ISO week has the right parity relative to a fixed
//! epoch — then fires the matching action at most once per window.
//!
//! Grounded on `scheduler_tick.py`'s window/biweekly-parity gate and
//! `scheduler_repo.py`'s schedule CRUD.

use crate::repository::SyncRepository;
use crate::types::ScheduleEntry;
use chrono::{Datelike, Timelike, Utc};
use erp_core::error::Result;
use erp_core::SchedulerConfig;
use std::sync::Arc;
use tracing::{info, warn};

pub const PRODUCT_FULL_SYNC_KEY: &str = "product_full_sync";
pub const PRICE_RESET_KEY: &str = "price_reset";

/// A schedule fires this week if the ISO week number shares parity with
/// a fixed epoch week — the same even/odd gate `_pass_biweekly_gate`
/// uses to turn a weekly day/hour/minute trigger into a fortnightly one.
fn passes_biweekly_gate(now: chrono::DateTime<chrono_tz::Tz>) -> bool {
    const EPOCH_ISO_WEEK: u32 = 1; // arbitrary fixed reference week, parity only
    let week = now.iso_week().week();
    (week % 2) == (EPOCH_ISO_WEEK % 2)
}

fn day_name(weekday: chrono::Weekday) -> &'static str {
    match weekday {
        chrono::Weekday::Mon => "MON",
        chrono::Weekday::Tue => "TUE",
        chrono::Weekday::Wed => "WED",
        chrono::Weekday::Thu => "THU",
        chrono::Weekday::Fri => "FRI",
        chrono::Weekday::Sat => "SAT",
        chrono::Weekday::Sun => "SUN",
    }
}

/// Whether `entry` should fire right now: enabled, the local weekday/
/// hour match, the local minute falls within `window_minutes` of the
/// configured minute, the biweekly gate (if set) passes, and it hasn't
/// already run today in this same window.
fn should_fire(entry: &ScheduleEntry, window_minutes: i64) -> bool {
    if !entry.enabled {
        return false;
    }
    let Ok(tz): std::result::Result<chrono_tz::Tz, _> = entry.timezone.parse() else {
        warn!(key = %entry.key, timezone = %entry.timezone, "unparseable schedule timezone");
        return false;
    };
    let now = Utc::now().with_timezone(&tz);

    if day_name(now.weekday()) != entry.day_of_week {
        return false;
    }
    if now.hour() as i32 != entry.hour {
        return false;
    }
    let minute_delta = (now.minute() as i64 - entry.minute as i64).abs();
    if minute_delta > window_minutes {
        return false;
    }
    if entry.every_2_weeks && !passes_biweekly_gate(now) {
        return false;
    }
    if let Some(last_run) = entry.last_run_at {
        let last_local = last_run.with_timezone(&tz);
        if last_local.date_naive() == now.date_naive() {
            return false;
        }
    }
    true
}

pub enum TickAction {
    TriggerFullSync,
    TriggerPriceReset,
}

/// One tick: loads every known schedule, evaluates each against the
/// current time, and returns the set of actions that should fire. The
/// caller is responsible for actually invoking [`crate::full_sync`] /
/// [`crate::price_rollback`] and then calling
/// [`SyncRepository::record_schedule_run`] once the action has started.
pub async fn tick(repo: Arc<dyn SyncRepository>, cfg: &SchedulerConfig) -> Result<Vec<(String, TickAction)>> {
    let schedules = repo.list_schedules().await?;
    let mut fired = Vec::new();

    for entry in schedules {
        if !should_fire(&entry, cfg.window_minutes) {
            continue;
        }
        let action = match entry.key.as_str() {
            PRODUCT_FULL_SYNC_KEY => TickAction::TriggerFullSync,
            PRICE_RESET_KEY => TickAction::TriggerPriceReset,
            other => {
                warn!(key = other, "schedule entry has no known action, skipping");
                continue;
            }
        };
        info!(key = %entry.key, "schedule tick fired");
        repo.record_schedule_run(&entry.key).await?;
        fired.push((entry.key.clone(), action));
    }

    Ok(fired)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(day: &str, hour: i32, minute: i32, every_2_weeks: bool) -> ScheduleEntry {
        ScheduleEntry {
            key: PRODUCT_FULL_SYNC_KEY.to_string(),
            enabled: true,
            day_of_week: day.to_string(),
            hour,
            minute,
            every_2_weeks,
            timezone: "Australia/Melbourne".to_string(),
            last_run_at: None,
        }
    }

    #[test]
    fn disabled_schedule_never_fires() {
        let now = Utc::now().with_timezone(&chrono_tz::Australia::Melbourne);
        let mut e = entry(day_name(now.weekday()), now.hour() as i32, now.minute() as i32, false);
        e.enabled = false;
        assert!(!should_fire(&e, 10));
    }

    #[test]
    fn wrong_day_never_fires() {
        let now = Utc::now().with_timezone(&chrono_tz::Australia::Melbourne);
        let wrong_day = match now.weekday() {
            chrono::Weekday::Mon => "TUE",
            _ => "MON",
        };
        let e = entry(wrong_day, now.hour() as i32, now.minute() as i32, false);
        assert!(!should_fire(&e, 10));
    }

    #[test]
    fn matching_window_fires_when_not_yet_run_today() {
        let now = Utc::now().with_timezone(&chrono_tz::Australia::Melbourne);
        let e = entry(day_name(now.weekday()), now.hour() as i32, now.minute() as i32, false);
        assert!(should_fire(&e, 10));
    }

    #[test]
    fn already_run_today_suppresses_refire() {
        let now = Utc::now().with_timezone(&chrono_tz::Australia::Melbourne);
        let mut e = entry(day_name(now.weekday()), now.hour() as i32, now.minute() as i32, false);
        e.last_run_at = Some(Utc::now());
        assert!(!should_fire(&e, 10));
    }
}
