//! Budget projection as events age out of the trailing window.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::compensation::compensated_target;
use crate::config::BudgetConfig;
use crate::event::IntakeEvent;
use crate::window::{hours_after, remaining_budget, trailing_window_start};

/// Default forecast horizon.
pub const DEFAULT_HORIZON_HOURS: u32 = 12;
/// Longest horizon the CLI accepts (one week).
pub const MAX_HORIZON_HOURS: u32 = 168;
/// Spacing between forecast points.
pub const FORECAST_STEP_HOURS: usize = 2;
/// Default lookahead for [`upcoming_expirations`].
pub const DEFAULT_EXPIRY_HOURS: f64 = 6.0;
/// Default lookback for [`average_daily`].
pub const DEFAULT_AVERAGE_DAYS: u32 = 7;

/// Budget available at a future instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ForecastPoint {
    pub time: DateTime<Utc>,
    pub available_budget: f64,
}

/// An event together with the instant it leaves the trailing window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExpiringEvent {
    pub event: IntakeEvent,
    pub expires_at: DateTime<Utc>,
}

/// Projects available budget every two hours from `now` to `now + horizon_hours`.
///
/// The compensated target is computed once at `now` and held fixed; only the
/// set of events inside each future trailing window changes.
pub fn forecast(
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    config: &BudgetConfig,
    horizon_hours: u32,
) -> Vec<ForecastPoint> {
    let target = compensated_target(events, now, config).adjusted_target;

    (0..=horizon_hours)
        .step_by(FORECAST_STEP_HOURS)
        .map(|h| {
            let time = hours_after(now, f64::from(h));
            ForecastPoint {
                time,
                available_budget: remaining_budget(events, time, target),
            }
        })
        .collect()
}

/// Events that leave the trailing window within the next `within_hours`.
///
/// Sorted by `expires_at`, soonest first.
pub fn upcoming_expirations(
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    within_hours: f64,
) -> Vec<ExpiringEvent> {
    let start = trailing_window_start(now);
    let end = hours_after(start, within_hours);

    let mut expiring: Vec<ExpiringEvent> = events
        .iter()
        .filter(|e| e.occurred_at > start && e.occurred_at < end)
        .map(|e| ExpiringEvent {
            event: *e,
            expires_at: e.expires_at(),
        })
        .collect();
    expiring.sort_by_key(|e| e.expires_at);
    expiring
}

/// Average daily consumption over the `days` before `as_of`.
///
/// Both ends of the lookback are exclusive. Returns 0 when no event
/// qualifies or `days` is 0.
pub fn average_daily(events: &[IntakeEvent], as_of: DateTime<Utc>, days: u32) -> f64 {
    if days == 0 {
        return 0.0;
    }
    let start = as_of
        .checked_sub_signed(TimeDelta::days(i64::from(days)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);

    let (count, total) = events
        .iter()
        .filter(|e| e.occurred_at > start && e.occurred_at < as_of)
        .fold((0_usize, 0.0), |(n, sum), e| (n + 1, sum + e.value));

    if count == 0 {
        return 0.0;
    }
    total / f64::from(days)
}
