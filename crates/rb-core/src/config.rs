//! Budget configuration: defaults, partial overrides, validation.
//!
//! A [`BudgetConfig`] is always valid. The only ways to obtain one are
//! [`BudgetConfig::default`] and merging a [`ConfigOverride`] over a valid
//! config, which re-validates the result. Deserialization goes through the
//! same path, so a config file with bad bounds is rejected at load time.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest compensation lookback accepted (one year).
pub const MAX_WINDOW_HOURS: f64 = 24.0 * 365.0;

/// Rejected configuration values.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// A value that must be a finite number was NaN or infinite.
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f64 },

    /// A value that must be strictly positive was not.
    #[error("{field} must be greater than 0, got {value}")]
    NotPositive { field: &'static str, value: f64 },

    /// A value that must be non-negative was negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },

    /// The maximum event size is below the minimum.
    #[error("max_event_size ({max}) must be at least min_event_size ({min})")]
    EventSizeBounds { min: f64, max: f64 },

    /// A value fell outside its allowed interval.
    #[error("{field} must be in {range}, got {value}")]
    OutOfRange {
        field: &'static str,
        range: &'static str,
        value: f64,
    },
}

/// How historical over/under consumption feeds back into the daily target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CompensationConfig {
    strength: f64,
    decay_factor: f64,
    window_hours: f64,
}

impl CompensationConfig {
    /// How aggressively to compensate, in \[0, 1\]. 0 disables compensation.
    #[must_use]
    pub const fn strength(&self) -> f64 {
        self.strength
    }

    /// Per-period weight multiplier, in (0, 1]. Lower values forget faster.
    #[must_use]
    pub const fn decay_factor(&self) -> f64 {
        self.decay_factor
    }

    /// Lookback span analyzed for deviation, in hours.
    #[must_use]
    pub const fn window_hours(&self) -> f64 {
        self.window_hours
    }
}

impl Default for CompensationConfig {
    fn default() -> Self {
        Self {
            strength: 0.2,
            decay_factor: 0.85,
            window_hours: 96.0,
        }
    }
}

/// Validated budget configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ConfigOverride")]
pub struct BudgetConfig {
    target_daily_amount: f64,
    min_event_size: f64,
    max_event_size: f64,
    min_interval_hours: f64,
    compensation: CompensationConfig,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            target_daily_amount: 2000.0,
            min_event_size: 100.0,
            max_event_size: 1000.0,
            min_interval_hours: 2.0,
            compensation: CompensationConfig::default(),
        }
    }
}

impl BudgetConfig {
    /// Nominal amount allowed per trailing 24 hours, before compensation.
    #[must_use]
    pub const fn target_daily_amount(&self) -> f64 {
        self.target_daily_amount
    }

    /// Smallest event size worth recommending.
    #[must_use]
    pub const fn min_event_size(&self) -> f64 {
        self.min_event_size
    }

    /// Largest single event size ever recommended.
    #[must_use]
    pub const fn max_event_size(&self) -> f64 {
        self.max_event_size
    }

    /// Minimum spacing between events, in hours.
    #[must_use]
    pub const fn min_interval_hours(&self) -> f64 {
        self.min_interval_hours
    }

    /// Compensation settings.
    #[must_use]
    pub const fn compensation(&self) -> &CompensationConfig {
        &self.compensation
    }

    /// Merges `overrides` over the defaults and validates the result.
    pub fn from_override(overrides: &ConfigOverride) -> Result<Self, ConfigError> {
        Self::default().merge(overrides)
    }

    /// Returns a copy of `self` with every leaf set in `overrides` replaced.
    ///
    /// Leaves missing from `overrides`, including those of the nested
    /// compensation record, keep the value from `self`.
    pub fn merge(&self, overrides: &ConfigOverride) -> Result<Self, ConfigError> {
        let comp = overrides.compensation.unwrap_or_default();
        let merged = Self {
            target_daily_amount: overrides
                .target_daily_amount
                .unwrap_or(self.target_daily_amount),
            min_event_size: overrides.min_event_size.unwrap_or(self.min_event_size),
            max_event_size: overrides.max_event_size.unwrap_or(self.max_event_size),
            min_interval_hours: overrides
                .min_interval_hours
                .unwrap_or(self.min_interval_hours),
            compensation: CompensationConfig {
                strength: comp.strength.unwrap_or(self.compensation.strength),
                decay_factor: comp.decay_factor.unwrap_or(self.compensation.decay_factor),
                window_hours: comp.window_hours.unwrap_or(self.compensation.window_hours),
            },
        };
        merged.validate()?;
        Ok(merged)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.compensation;
        for (field, value) in [
            ("target_daily_amount", self.target_daily_amount),
            ("min_event_size", self.min_event_size),
            ("max_event_size", self.max_event_size),
            ("min_interval_hours", self.min_interval_hours),
            ("compensation.strength", c.strength),
            ("compensation.decay_factor", c.decay_factor),
            ("compensation.window_hours", c.window_hours),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        if self.target_daily_amount <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "target_daily_amount",
                value: self.target_daily_amount,
            });
        }
        if self.min_event_size < 0.0 {
            return Err(ConfigError::Negative {
                field: "min_event_size",
                value: self.min_event_size,
            });
        }
        if self.max_event_size < self.min_event_size {
            return Err(ConfigError::EventSizeBounds {
                min: self.min_event_size,
                max: self.max_event_size,
            });
        }
        if self.min_interval_hours < 0.0 {
            return Err(ConfigError::Negative {
                field: "min_interval_hours",
                value: self.min_interval_hours,
            });
        }
        if !(0.0..=1.0).contains(&c.strength) {
            return Err(ConfigError::OutOfRange {
                field: "compensation.strength",
                range: "[0, 1]",
                value: c.strength,
            });
        }
        if c.decay_factor <= 0.0 || c.decay_factor > 1.0 {
            return Err(ConfigError::OutOfRange {
                field: "compensation.decay_factor",
                range: "(0, 1]",
                value: c.decay_factor,
            });
        }
        if c.window_hours <= 0.0 {
            return Err(ConfigError::NotPositive {
                field: "compensation.window_hours",
                value: c.window_hours,
            });
        }
        if c.window_hours > MAX_WINDOW_HOURS {
            return Err(ConfigError::OutOfRange {
                field: "compensation.window_hours",
                range: "(0, 8760]",
                value: c.window_hours,
            });
        }
        Ok(())
    }
}

impl TryFrom<ConfigOverride> for BudgetConfig {
    type Error = ConfigError;

    fn try_from(value: ConfigOverride) -> Result<Self, Self::Error> {
        Self::from_override(&value)
    }
}

/// A partial configuration. Every leaf is optional; set leaves win on merge.
///
/// Field aliases accept the meal-tracking names used by older config files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverride {
    #[serde(
        default,
        alias = "target_daily_calories",
        skip_serializing_if = "Option::is_none"
    )]
    pub target_daily_amount: Option<f64>,
    #[serde(
        default,
        alias = "min_meal_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_event_size: Option<f64>,
    #[serde(
        default,
        alias = "max_meal_size",
        skip_serializing_if = "Option::is_none"
    )]
    pub max_event_size: Option<f64>,
    #[serde(
        default,
        alias = "min_hours_between_meals",
        skip_serializing_if = "Option::is_none"
    )]
    pub min_interval_hours: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub compensation: Option<CompensationOverride>,
}

/// Partial compensation settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CompensationOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strength: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decay_factor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window_hours: Option<f64>,
}
