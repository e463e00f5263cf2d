//! Shared utilities for CLI commands.

use std::io::Read;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use chrono::{DateTime, Duration, Utc};
use rb_core::IntakeEvent;
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day|week)s?\s+(ago|from now)$").unwrap());

/// Conservative bounds for relative time parsing (~1000 years in minutes).
const MAX_RELATIVE_MINUTES: i64 = 1000 * 365 * 24 * 60;

/// Parse a datetime string as ISO 8601, "now", or a time relative to `now`.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day from now"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z) or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let (max_for_unit, minutes_per_unit) = match &caps[2] {
        "minute" => (MAX_RELATIVE_MINUTES, 1),
        "hour" => (MAX_RELATIVE_MINUTES / 60, 60),
        "day" => (MAX_RELATIVE_MINUTES / (60 * 24), 60 * 24),
        "week" => (MAX_RELATIVE_MINUTES / (60 * 24 * 7), 60 * 24 * 7),
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > max_for_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    let duration = Duration::minutes(n * minutes_per_unit);
    if &caps[3] == "ago" {
        Ok(now - duration)
    } else {
        Ok(now + duration)
    }
}

/// Reads the event log at `path`, or stdin when `path` is "-".
///
/// A missing file is treated as an empty log.
pub fn load_events(path: &Path) -> anyhow::Result<Vec<IntakeEvent>> {
    let content = if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read events from stdin")?;
        buf
    } else if path.exists() {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?
    } else {
        tracing::warn!(path = %path.display(), "event log not found, using an empty log");
        return Ok(Vec::new());
    };

    let events = rb_core::parse_events(&content)
        .with_context(|| format!("failed to parse events from {}", path.display()))?;
    tracing::debug!(count = events.len(), path = %path.display(), "loaded events");
    Ok(events)
}

/// Renders a 10-character bar for a percentage.
/// Non-zero values under 5% get a single block for visibility.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn progress_bar(percent: f64) -> String {
    let filled = if percent > 0.0 && percent < 5.0 {
        1
    } else {
        (percent / 10.0).round().clamp(0.0, 10.0) as usize
    };
    let empty = 10 - filled;
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}
