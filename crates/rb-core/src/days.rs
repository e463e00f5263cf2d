//! Per-day grouping for history display.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::event::IntakeEvent;

/// Events recorded on one UTC calendar date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    /// Events of the day, oldest first.
    pub events: Vec<IntakeEvent>,
    pub total: f64,
}

/// Groups events by UTC date, newest day first.
pub fn group_by_day(events: &[IntakeEvent]) -> Vec<DaySummary> {
    let mut by_date: BTreeMap<NaiveDate, Vec<IntakeEvent>> = BTreeMap::new();
    for event in events {
        by_date
            .entry(event.occurred_at.date_naive())
            .or_default()
            .push(*event);
    }

    by_date
        .into_iter()
        .rev()
        .map(|(date, mut events)| {
            events.sort_by_key(|e| e.occurred_at);
            let total = events.iter().map(|e| e.value).sum();
            DaySummary {
                date,
                events,
                total,
            }
        })
        .collect()
}
