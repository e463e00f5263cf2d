//! Rolling 24-hour budget engine.
//!
//! This crate contains the budget logic:
//! - Window aggregation over a time-stamped intake log
//! - Time-decayed deviation analysis and target compensation
//! - Next-event recommendation and budget forecasting
//!
//! Every entry point is a pure function of its events, timestamp and
//! [`BudgetConfig`]; nothing is cached between calls.

pub mod compensation;
pub mod config;
pub mod days;
pub mod deviation;
mod event;
pub mod forecast;
pub mod format;
pub mod recommendation;
pub mod window;

pub use compensation::{CompensationResult, compensated_target};
pub use config::{
    BudgetConfig, CompensationConfig, CompensationOverride, ConfigError, ConfigOverride,
};
pub use days::{DaySummary, group_by_day};
pub use deviation::{DeviationAnalysis, PeriodBreakdown, analyze_deviation};
pub use event::{EventFileError, IntakeEvent, parse_events};
pub use forecast::{ExpiringEvent, ForecastPoint, average_daily, forecast, upcoming_expirations};
pub use format::{format_duration, format_time_until};
pub use recommendation::{Recommendation, recommend, recommend_with};
