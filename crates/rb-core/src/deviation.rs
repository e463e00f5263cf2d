//! Time-weighted deviation from the expected consumption rate.
//!
//! The compensation window is cut into 6-hour periods counted backward from
//! `as_of`. Period 0 is the most recent and carries weight 1; each older
//! period is weighted by another factor of `decay_factor`. The oldest period
//! is truncated so the periods cover exactly `window_hours`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::BudgetConfig;
use crate::event::IntakeEvent;
use crate::window::{hours_before, sum_in_window};

/// Length of one analysis period.
pub const PERIOD_HOURS: f64 = 6.0;

/// Consumption analysis for one period of the compensation window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodBreakdown {
    /// Exclusive start of the period.
    pub period_start: DateTime<Utc>,
    /// Inclusive end of the period.
    pub period_end: DateTime<Utc>,
    /// Hours between `period_end` and `as_of`.
    pub hours_ago: f64,
    pub consumed: f64,
    /// Consumption at the target rate over the period's length.
    pub expected: f64,
    /// `consumed - expected`; positive means over-consumed.
    pub deviation: f64,
    pub weight: f64,
    pub weighted_deviation: f64,
}

/// Result of [`analyze_deviation`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeviationAnalysis {
    /// Sum of every period's `weighted_deviation`.
    pub weighted_deviation: f64,
    /// Sum of every period's `weight`.
    pub total_weight: f64,
    /// Per-period records, most recent first.
    pub periods: Vec<PeriodBreakdown>,
}

impl DeviationAnalysis {
    /// Weighted average deviation per period, or 0 when nothing was weighed.
    pub fn normalized_deviation(&self) -> f64 {
        if self.total_weight > 0.0 {
            self.weighted_deviation / self.total_weight
        } else {
            0.0
        }
    }

    /// Unweighted sum of the per-period deviations.
    pub fn raw_deviation(&self) -> f64 {
        self.periods.iter().map(|p| p.deviation).sum()
    }
}

/// Computes per-period deviation over the compensation window ending at `as_of`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn analyze_deviation(
    events: &[IntakeEvent],
    as_of: DateTime<Utc>,
    config: &BudgetConfig,
) -> DeviationAnalysis {
    let window_hours = config.compensation().window_hours();
    let decay = config.compensation().decay_factor();
    let target_per_hour = config.target_daily_amount() / 24.0;

    // window_hours is validated positive and bounded, so this is small.
    let period_count = (window_hours / PERIOD_HOURS).ceil().max(0.0) as usize;

    let mut periods = Vec::with_capacity(period_count);
    let mut weighted_deviation = 0.0;
    let mut total_weight = 0.0;
    let mut weight = 1.0;

    for i in 0..period_count {
        let end_hours_ago = i as f64 * PERIOD_HOURS;
        let start_hours_ago = ((i + 1) as f64 * PERIOD_HOURS).min(window_hours);
        if end_hours_ago >= window_hours {
            break;
        }

        let period_end = hours_before(as_of, end_hours_ago);
        let period_start = hours_before(as_of, start_hours_ago);
        let period_hours = start_hours_ago - end_hours_ago;

        let consumed = sum_in_window(events, period_start, period_end);
        let expected = target_per_hour * period_hours;
        let deviation = consumed - expected;
        let weighted = deviation * weight;

        weighted_deviation += weighted;
        total_weight += weight;

        periods.push(PeriodBreakdown {
            period_start,
            period_end,
            hours_ago: end_hours_ago,
            consumed,
            expected,
            deviation,
            weight,
            weighted_deviation: weighted,
        });

        weight *= decay;
    }

    DeviationAnalysis {
        weighted_deviation,
        total_weight,
        periods,
    }
}
