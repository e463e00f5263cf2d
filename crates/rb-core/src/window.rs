//! Window aggregation over the event log.
//!
//! Every window here is half-open: `(start, end]`. An event exactly at the
//! start is excluded and one exactly at the end is included, so adjacent
//! windows never double count.

use chrono::{DateTime, TimeDelta, Utc};

use crate::event::IntakeEvent;

/// Length of the trailing budget window.
pub const WINDOW_HOURS: i64 = 24;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Converts fractional hours into a `TimeDelta`, saturating at the
/// representable range.
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn hours_to_delta(hours: f64) -> TimeDelta {
    let ms = (hours * MS_PER_HOUR).round();
    if ms.is_nan() {
        return TimeDelta::zero();
    }
    // `as` saturates; try_milliseconds rejects the extremes TimeDelta can't hold.
    TimeDelta::try_milliseconds(ms as i64).unwrap_or(if ms > 0.0 {
        TimeDelta::MAX
    } else {
        TimeDelta::MIN
    })
}

/// Fractional hours between two instants (`later - earlier`).
#[allow(clippy::cast_precision_loss)]
pub(crate) fn hours_between(earlier: DateTime<Utc>, later: DateTime<Utc>) -> f64 {
    (later - earlier).num_milliseconds() as f64 / MS_PER_HOUR
}

/// `at - hours`, clamped to the earliest representable instant.
pub(crate) fn hours_before(at: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    at.checked_sub_signed(hours_to_delta(hours))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// `at + hours`, clamped to the latest representable instant.
pub(crate) fn hours_after(at: DateTime<Utc>, hours: f64) -> DateTime<Utc> {
    at.checked_add_signed(hours_to_delta(hours))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

fn in_window(event: &IntakeEvent, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    event.occurred_at > start && event.occurred_at <= end
}

/// Sum of values for events in `(start, end]`.
pub fn sum_in_window(events: &[IntakeEvent], start: DateTime<Utc>, end: DateTime<Utc>) -> f64 {
    events
        .iter()
        .filter(|e| in_window(e, start, end))
        .map(|e| e.value)
        .sum()
}

/// Events in `(start, end]`, most recent first.
pub fn events_in_window(
    events: &[IntakeEvent],
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<&IntakeEvent> {
    let mut matching: Vec<&IntakeEvent> =
        events.iter().filter(|e| in_window(e, start, end)).collect();
    matching.sort_by(|a, b| b.occurred_at.cmp(&a.occurred_at));
    matching
}

/// Timestamp of the latest event at or before `as_of`.
pub fn latest_event_at_or_before(
    events: &[IntakeEvent],
    as_of: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    events
        .iter()
        .map(|e| e.occurred_at)
        .filter(|t| *t <= as_of)
        .max()
}

/// Start of the trailing 24h window ending at `as_of` (exclusive bound).
pub fn trailing_window_start(as_of: DateTime<Utc>) -> DateTime<Utc> {
    as_of
        .checked_sub_signed(TimeDelta::hours(WINDOW_HOURS))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Total consumed in the trailing 24h window ending at `as_of`.
pub fn consumed_last_24h(events: &[IntakeEvent], as_of: DateTime<Utc>) -> f64 {
    sum_in_window(events, trailing_window_start(as_of), as_of)
}

/// Events in the trailing 24h window, most recent first.
pub fn events_last_24h(events: &[IntakeEvent], as_of: DateTime<Utc>) -> Vec<&IntakeEvent> {
    events_in_window(events, trailing_window_start(as_of), as_of)
}

/// Budget left in the trailing 24h window, clamped to `[0, target]`.
pub fn remaining_budget(events: &[IntakeEvent], as_of: DateTime<Utc>, target: f64) -> f64 {
    let consumed = consumed_last_24h(events, as_of);
    (target - consumed).min(target).max(0.0)
}

/// Hours elapsed since the latest event at or before `as_of`.
pub fn hours_since_last_event(events: &[IntakeEvent], as_of: DateTime<Utc>) -> Option<f64> {
    latest_event_at_or_before(events, as_of).map(|last| hours_between(last, as_of))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 2, h, m, 0).unwrap()
    }

    fn event(ts: DateTime<Utc>, value: f64) -> IntakeEvent {
        IntakeEvent::new(ts, value)
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "sums of small integers are exact")]
    fn window_excludes_start_and_includes_end() {
        let start = at(6, 0);
        let end = at(12, 0);
        let events = [
            event(start, 1.0),
            event(at(9, 0), 10.0),
            event(end, 100.0),
            event(at(12, 1), 1000.0),
        ];
        assert_eq!(sum_in_window(&events, start, end), 110.0);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact zero")]
    fn empty_log_sums_to_zero() {
        assert_eq!(sum_in_window(&[], at(0, 0), at(12, 0)), 0.0);
        assert_eq!(consumed_last_24h(&[], at(12, 0)), 0.0);
    }

    #[test]
    fn events_in_window_are_newest_first() {
        let events = [
            event(at(8, 0), 1.0),
            event(at(11, 0), 2.0),
            event(at(9, 30), 3.0),
        ];
        let found = events_in_window(&events, at(0, 0), at(12, 0));
        let times: Vec<_> = found.iter().map(|e| e.occurred_at).collect();
        assert_eq!(times, vec![at(11, 0), at(9, 30), at(8, 0)]);
    }

    #[test]
    fn latest_event_ignores_future_events() {
        let events = [
            event(at(8, 0), 1.0),
            event(at(13, 0), 2.0),
            event(at(10, 0), 3.0),
        ];
        assert_eq!(latest_event_at_or_before(&events, at(12, 0)), Some(at(10, 0)));
        assert_eq!(latest_event_at_or_before(&events, at(10, 0)), Some(at(10, 0)));
        assert_eq!(latest_event_at_or_before(&events, at(7, 0)), None);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "sums of small integers are exact")]
    fn trailing_window_drops_events_exactly_24h_old() {
        let now = at(12, 0);
        let events = [
            event(now - TimeDelta::hours(24), 500.0),
            event(now - TimeDelta::hours(23), 200.0),
        ];
        assert_eq!(consumed_last_24h(&events, now), 200.0);
    }

    #[test]
    fn events_last_24h_lists_only_the_trailing_window() {
        let now = at(12, 0);
        let events = [
            event(now - TimeDelta::hours(24), 500.0),
            event(now - TimeDelta::hours(3), 100.0),
            event(now + TimeDelta::hours(1), 50.0),
            event(now - TimeDelta::hours(23), 200.0),
            event(now, 25.0),
        ];
        let values: Vec<f64> = events_last_24h(&events, now)
            .iter()
            .map(|e| e.value)
            .collect();
        assert_eq!(values, vec![25.0, 100.0, 200.0]);
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "clamped values are exact")]
    fn remaining_budget_is_clamped() {
        let now = at(12, 0);
        let over = [event(at(10, 0), 2500.0)];
        assert_eq!(remaining_budget(&over, now, 2000.0), 0.0);

        let negative = [event(at(10, 0), -300.0)];
        assert_eq!(remaining_budget(&negative, now, 2000.0), 2000.0);

        let some = [event(at(10, 0), 800.0)];
        assert_eq!(remaining_budget(&some, now, 2000.0), 1200.0);
    }

    #[test]
    fn hours_since_last_event_is_fractional() {
        let events = [event(at(10, 30), 300.0)];
        let hours = hours_since_last_event(&events, at(12, 0)).unwrap();
        assert!((hours - 1.5).abs() < 1e-9);
        assert!(hours_since_last_event(&[], at(12, 0)).is_none());
    }

    #[test]
    fn hour_conversions_saturate() {
        assert_eq!(hours_to_delta(1.5), TimeDelta::minutes(90));
        assert_eq!(hours_before(at(0, 0), 1e300), DateTime::<Utc>::MIN_UTC);
        assert_eq!(hours_after(at(0, 0), 1e300), DateTime::<Utc>::MAX_UTC);
    }
}
