//! Intake events and event-log parsing.

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A single recorded intake.
///
/// Events are owned by the caller's store. Nothing in this crate mutates or
/// persists them; `value` is expected to be positive but that is not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntakeEvent {
    /// When the intake happened.
    #[serde(alias = "created_at", alias = "createdAt")]
    pub occurred_at: DateTime<Utc>,
    /// Amount consumed.
    pub value: f64,
}

impl IntakeEvent {
    /// Creates a new event.
    #[must_use]
    pub const fn new(occurred_at: DateTime<Utc>, value: f64) -> Self {
        Self { occurred_at, value }
    }

    /// When this event leaves the trailing 24h window.
    #[must_use]
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.occurred_at
            .checked_add_signed(TimeDelta::hours(24))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Errors from parsing an event log.
#[derive(Debug, Error)]
pub enum EventFileError {
    /// The input looked like a JSON array but did not parse.
    #[error("invalid event array: {0}")]
    Array(#[source] serde_json::Error),
    /// A JSON Lines record did not parse.
    #[error("invalid event on line {line}")]
    Line {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Parses an event log given either as a JSON array or as JSON Lines.
///
/// Blank lines in JSON Lines input are skipped. Order is preserved; callers
/// do not need to sort.
pub fn parse_events(input: &str) -> Result<Vec<IntakeEvent>, EventFileError> {
    let trimmed = input.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(EventFileError::Array);
    }

    let mut events = Vec::new();
    for (idx, line) in input.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let event = serde_json::from_str(line).map_err(|source| EventFileError::Line {
            line: idx + 1,
            source,
        })?;
        events.push(event);
    }

    tracing::trace!(count = events.len(), "parsed JSON Lines event log");
    Ok(events)
}
