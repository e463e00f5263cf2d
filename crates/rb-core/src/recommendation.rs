//! Next-event recommendation.
//!
//! Combines the trailing-24h budget, the compensated target and the spacing
//! rule into a suggested size range for the next event.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::compensation::{CompensationResult, compensated_target};
use crate::config::{BudgetConfig, ConfigError, ConfigOverride};
use crate::event::IntakeEvent;
use crate::window::{consumed_last_24h, hours_after, hours_between, latest_event_at_or_before};

/// Remaining budget at or below this is treated as exhausted.
pub const EXHAUSTED_THRESHOLD: f64 = 50.0;
/// Upper bound on the number of events the remaining budget is spread over.
const MAX_REMAINING_EVENTS: f64 = 4.0;

/// A recommendation for the next event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub consumed_last_24h: f64,
    pub remaining_last_24h: f64,
    /// Compensated target used for every amount below.
    pub effective_target: f64,
    /// Configured target before compensation.
    pub base_target: f64,
    pub recommended_min: f64,
    pub recommended_max: f64,
    /// Earliest time the next event should happen, if spacing requires a wait.
    pub wait_until: Option<DateTime<Utc>>,
    pub reasoning: String,
    pub hours_since_last_event: Option<f64>,
    pub last_event_time: Option<DateTime<Utc>>,
    pub percent_used: f64,
    pub compensation: CompensationResult,
}

#[derive(Debug, Clone, PartialEq)]
struct SizeRange {
    min: f64,
    max: f64,
    reasoning: String,
}

/// Builds a recommendation for `now` using a validated config.
pub fn recommend(
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    config: &BudgetConfig,
) -> Recommendation {
    let compensation = compensated_target(events, now, config);
    let effective_target = compensation.adjusted_target;

    let consumed = consumed_last_24h(events, now);
    let remaining = (effective_target - consumed).min(effective_target).max(0.0);

    let last_event_time = latest_event_at_or_before(events, now);
    let hours_since_last_event = last_event_time.map(|last| hours_between(last, now));

    let wait_until = match (last_event_time, hours_since_last_event) {
        (Some(last), Some(hours)) if hours < config.min_interval_hours() => {
            Some(hours_after(last, config.min_interval_hours()))
        }
        _ => None,
    };

    let size = size_next_event(remaining, consumed, effective_target, config);

    let percent_used = if effective_target > 0.0 {
        consumed / effective_target * 100.0
    } else {
        0.0
    };

    tracing::debug!(
        consumed,
        remaining,
        effective_target,
        min = size.min,
        max = size.max,
        waiting = wait_until.is_some(),
        "built recommendation"
    );

    Recommendation {
        consumed_last_24h: consumed,
        remaining_last_24h: remaining,
        effective_target,
        base_target: config.target_daily_amount(),
        recommended_min: size.min,
        recommended_max: size.max,
        wait_until,
        reasoning: size.reasoning,
        hours_since_last_event,
        last_event_time,
        percent_used,
        compensation,
    }
}

/// Merges `overrides` over the defaults, then builds a recommendation.
pub fn recommend_with(
    events: &[IntakeEvent],
    now: DateTime<Utc>,
    overrides: &ConfigOverride,
) -> Result<Recommendation, ConfigError> {
    let config = BudgetConfig::from_override(overrides)?;
    Ok(recommend(events, now, &config))
}

fn size_next_event(
    remaining: f64,
    consumed: f64,
    target: f64,
    config: &BudgetConfig,
) -> SizeRange {
    if remaining <= EXHAUSTED_THRESHOLD {
        return SizeRange {
            min: 0.0,
            max: 0.0,
            reasoning: "You've reached your 24h target. Budget will free up as time passes."
                .to_string(),
        };
    }

    if remaining < config.min_event_size() {
        return SizeRange {
            min: 0.0,
            max: remaining,
            reasoning: format!(
                "Limited budget remaining ({}). Small amount only if needed.",
                remaining.round()
            ),
        };
    }

    let avg_size = (config.min_event_size() + config.max_event_size()) / 2.0;
    let estimated_count = if avg_size > 0.0 {
        (remaining / avg_size).clamp(1.0, MAX_REMAINING_EVENTS)
    } else {
        MAX_REMAINING_EVENTS
    };
    let ideal = remaining / estimated_count;

    // remaining >= min_event_size here, so the upper bound never sits below the lower.
    let ceiling = config.max_event_size().min(remaining);
    let min = (ideal * 0.7).clamp(config.min_event_size(), ceiling);
    let max = (ideal * 1.3).clamp(min, ceiling);

    let percent_used = if target > 0.0 {
        (consumed / target * 100.0).round()
    } else {
        0.0
    };

    SizeRange {
        min,
        max,
        reasoning: format!(
            "{percent_used}% of 24h budget used. {} available for ~{} more event(s).",
            remaining.round(),
            estimated_count.round()
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CompensationOverride;
    use chrono::{TimeDelta, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 3, 20, 0, 0).unwrap()
    }

    fn hours_ago(h: i64) -> DateTime<Utc> {
        now() - TimeDelta::hours(h)
    }

    /// Base config with compensation switched off.
    fn fixed_target() -> BudgetConfig {
        BudgetConfig::from_override(&ConfigOverride {
            compensation: Some(CompensationOverride {
                strength: Some(0.0),
                ..CompensationOverride::default()
            }),
            ..ConfigOverride::default()
        })
        .unwrap()
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "sums of small integers are exact")]
    fn consumed_and_remaining_before_compensation() {
        let events = [
            IntakeEvent::new(hours_ago(0), 100.0),
            IntakeEvent::new(hours_ago(5), 700.0),
        ];
        let rec = recommend(&events, now(), &fixed_target());
        assert_eq!(rec.consumed_last_24h, 800.0);
        assert_eq!(rec.remaining_last_24h, 1200.0);
        assert_eq!(rec.effective_target, 2000.0);
        assert_eq!(rec.base_target, 2000.0);
        assert_eq!(rec.percent_used, 40.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact amounts")]
    fn empty_log_has_full_budget() {
        let rec = recommend(&[], now(), &BudgetConfig::default());
        assert_eq!(rec.consumed_last_24h, 0.0);
        assert_eq!(rec.effective_target, 2000.0);
        assert_eq!(rec.remaining_last_24h, rec.effective_target);
        assert!(rec.hours_since_last_event.is_none());
        assert!(rec.last_event_time.is_none());
        assert!(rec.wait_until.is_none());
        assert!(!rec.compensation.is_active);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact amounts")]
    fn nearly_exhausted_budget_recommends_nothing() {
        let events = [IntakeEvent::new(hours_ago(3), 1970.0)];
        let rec = recommend(&events, now(), &fixed_target());
        assert_eq!(rec.remaining_last_24h, 30.0);
        assert_eq!((rec.recommended_min, rec.recommended_max), (0.0, 0.0));
        assert!(rec.reasoning.contains("reached your 24h target"), "{}", rec.reasoning);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact amounts")]
    fn small_remainder_allows_optional_snack() {
        let events = [IntakeEvent::new(hours_ago(3), 1940.0)];
        let rec = recommend(&events, now(), &fixed_target());
        assert_eq!(rec.remaining_last_24h, 60.0);
        assert_eq!((rec.recommended_min, rec.recommended_max), (0.0, 60.0));
        assert_eq!(
            rec.reasoning,
            "Limited budget remaining (60). Small amount only if needed."
        );
    }

    #[test]
    fn recent_event_requires_wait() {
        let last = hours_ago(1);
        let events = [IntakeEvent::new(last, 400.0)];
        let rec = recommend(&events, now(), &fixed_target());
        assert_eq!(rec.last_event_time, Some(last));
        assert_eq!(rec.wait_until, Some(last + TimeDelta::hours(2)));
        assert!((rec.hours_since_last_event.unwrap() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn spaced_event_does_not_wait() {
        let events = [IntakeEvent::new(hours_ago(2), 400.0)];
        let rec = recommend(&events, now(), &fixed_target());
        assert!(rec.wait_until.is_none());
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "values chosen to be exact")]
    fn sizes_spread_remaining_budget() {
        // remaining 1100 with avg 550 => 2 events of 550 ideal
        let events = [IntakeEvent::new(hours_ago(4), 900.0)];
        let rec = recommend(&events, now(), &fixed_target());
        assert_eq!(rec.remaining_last_24h, 1100.0);
        assert!((rec.recommended_min - 385.0).abs() < 1e-9);
        assert!((rec.recommended_max - 715.0).abs() < 1e-9);
        assert_eq!(
            rec.reasoning,
            "45% of 24h budget used. 1100 available for ~2 more event(s)."
        );
    }

    #[test]
    fn sizes_never_exceed_configured_maximum() {
        let config = BudgetConfig::from_override(&ConfigOverride {
            target_daily_amount: Some(10_000.0),
            compensation: Some(CompensationOverride {
                strength: Some(0.0),
                ..CompensationOverride::default()
            }),
            ..ConfigOverride::default()
        })
        .unwrap();
        let rec = recommend(&[], now(), &config);
        assert!(rec.recommended_min <= config.max_event_size());
        assert!(rec.recommended_max <= config.max_event_size());
        assert!(rec.recommended_min <= rec.recommended_max);
    }

    #[test]
    fn remaining_stays_within_target_for_any_log() {
        for value in [0.0, 50.0, 800.0, 1999.0, 2000.0, 9000.0] {
            let events = [
                IntakeEvent::new(hours_ago(2), value),
                IntakeEvent::new(hours_ago(30), value),
            ];
            let rec = recommend(&events, now(), &BudgetConfig::default());
            assert!(rec.remaining_last_24h >= 0.0);
            assert!(rec.remaining_last_24h <= rec.effective_target);
            assert!(rec.recommended_max <= rec.remaining_last_24h);
        }
    }

    #[test]
    fn raising_a_value_never_frees_budget() {
        let mut previous: Option<Recommendation> = None;
        for value in [100.0, 300.0, 900.0, 1500.0] {
            let events = [
                IntakeEvent::new(hours_ago(2), value),
                IntakeEvent::new(hours_ago(7), 250.0),
            ];
            let rec = recommend(&events, now(), &fixed_target());
            if let Some(prev) = &previous {
                assert!(rec.consumed_last_24h >= prev.consumed_last_24h);
                assert!(rec.remaining_last_24h <= prev.remaining_last_24h);
            }
            previous = Some(rec);
        }
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let events = [
            IntakeEvent::new(hours_ago(1), 300.0),
            IntakeEvent::new(hours_ago(9), 650.0),
            IntakeEvent::new(hours_ago(40), 1200.0),
        ];
        let first = recommend(&events, now(), &BudgetConfig::default());
        let second = recommend(&events, now(), &BudgetConfig::default());
        assert_eq!(first, second);
    }

    #[test]
    fn recommend_with_rejects_bad_override() {
        let overrides = ConfigOverride {
            max_event_size: Some(50.0),
            ..ConfigOverride::default()
        };
        assert!(matches!(
            recommend_with(&[], now(), &overrides),
            Err(ConfigError::EventSizeBounds { .. })
        ));
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "configured value is copied")]
    fn recommend_with_merges_over_defaults() {
        let overrides = ConfigOverride {
            target_daily_amount: Some(1500.0),
            ..ConfigOverride::default()
        };
        let rec = recommend_with(&[], now(), &overrides).unwrap();
        assert_eq!(rec.base_target, 1500.0);
    }
}
