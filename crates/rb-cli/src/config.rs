//! Configuration loading and management.

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use rb_core::{BudgetConfig, ConfigError, ConfigOverride};
use serde::{Deserialize, Serialize};

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the event log.
    pub events_path: PathBuf,

    /// Budget settings; unset fields fall back to the built-in defaults.
    #[serde(default)]
    pub budget: ConfigOverride,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs_data_path().unwrap_or_else(|| PathBuf::from("."));
        Self {
            events_path: data_dir.join("events.jsonl"),
            budget: ConfigOverride::default(),
        }
    }
}

impl Config {
    /// Loads configuration, optionally from a specific file.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load_from(config_path: Option<&Path>) -> Result<Self, figment::Error> {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Load from default config location
        if let Some(config_dir) = dirs_config_path() {
            figment = figment.merge(Toml::file(config_dir.join("config.toml")));
        }

        // Load from specified config file
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Load from environment variables (RB_*, nested with RB_BUDGET__...)
        figment = figment.merge(Env::prefixed("RB_").split("__"));

        figment.extract()
    }

    /// Merges the configured budget settings over the defaults.
    pub fn budget_config(&self) -> Result<BudgetConfig, ConfigError> {
        BudgetConfig::from_override(&self.budget)
    }
}

/// Returns the platform-specific config directory for rb.
fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("rb"))
}

/// Returns the platform-specific data directory for rb.
///
/// On Linux: `~/.local/share/rb`
pub fn dirs_data_path() -> Option<PathBuf> {
    dirs::data_dir().map(|p| p.join("rb"))
}
