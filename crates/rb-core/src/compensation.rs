//! Adjusts the daily target from recent over/under consumption.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::BudgetConfig;
use crate::deviation::{DeviationAnalysis, analyze_deviation};
use crate::event::IntakeEvent;

/// Largest reduction applied in one pass, as a fraction of the base target.
pub const MAX_REDUCTION_RATIO: f64 = 0.30;
/// Largest increase applied in one pass, as a fraction of the base target.
pub const MAX_INCREASE_RATIO: f64 = 0.15;
/// The adjusted target never drops below this fraction of the base target.
pub const MIN_TARGET_RATIO: f64 = 0.60;
/// The adjusted target never exceeds this fraction of the base target.
pub const MAX_TARGET_RATIO: f64 = 1.20;
/// Adjustments at or below this many units are reported as "on track".
pub const ACTIVE_THRESHOLD: f64 = 10.0;

const ON_TRACK: &str = "On track with your targets.";

/// The compensated daily target and how it was derived.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompensationResult {
    /// Effective daily target after compensation.
    pub adjusted_target: f64,
    /// Rounded adjustment; negative means the target was reduced.
    pub compensation_amount: f64,
    /// Human-readable explanation.
    pub reason: String,
    /// Rounded unweighted deviation over the whole window.
    pub raw_deviation: f64,
    /// Whether the adjustment is large enough to report.
    pub is_active: bool,
}

/// Computes the compensated target for `as_of`.
///
/// An empty log has no history to compare against, so the base target is
/// returned unchanged. Any other log goes through the full adjustment, even
/// when none of its events fall inside the compensation window.
pub fn compensated_target(
    events: &[IntakeEvent],
    as_of: DateTime<Utc>,
    config: &BudgetConfig,
) -> CompensationResult {
    let analysis = analyze_deviation(events, as_of, config);
    if events.is_empty() {
        tracing::debug!("empty log, keeping base target");
        return CompensationResult {
            adjusted_target: config.target_daily_amount(),
            compensation_amount: 0.0,
            reason: ON_TRACK.to_string(),
            raw_deviation: analysis.raw_deviation().round(),
            is_active: false,
        };
    }
    compensate(&analysis, config)
}

/// Turns a deviation analysis into a bounded target adjustment.
fn compensate(analysis: &DeviationAnalysis, config: &BudgetConfig) -> CompensationResult {
    let base = config.target_daily_amount();
    let strength = config.compensation().strength();

    let normalized = analysis.normalized_deviation();
    let raw_deviation = analysis.raw_deviation();

    let amount = -(normalized * strength);
    let clamped = amount.clamp(-base * MAX_REDUCTION_RATIO, base * MAX_INCREASE_RATIO);

    let adjusted_target = (base + clamped)
        .round()
        .clamp(base * MIN_TARGET_RATIO, base * MAX_TARGET_RATIO);

    let is_active = clamped.abs() > ACTIVE_THRESHOLD;
    let reason = if !is_active {
        ON_TRACK.to_string()
    } else if clamped < 0.0 {
        format!(
            "Compensating for recent over-consumption. Target reduced by {}.",
            (-clamped).round()
        )
    } else {
        format!(
            "Room to catch up from under-consumption. Target increased by {}.",
            clamped.round()
        )
    };

    tracing::debug!(
        base,
        normalized,
        raw_deviation,
        clamped,
        adjusted_target,
        is_active,
        "computed compensated target"
    );

    CompensationResult {
        adjusted_target,
        compensation_amount: clamped.round(),
        reason,
        raw_deviation: raw_deviation.round(),
        is_active,
    }
}
