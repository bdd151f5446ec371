//! Configuration loading and management.

use std::fmt;
use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use tc_core::category::{default_categories, default_coursework};
use tc_core::{Category, CategoryCode, CategoryTable, ConfigError, Rounding};

/// Application configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    /// Categories in report order.
    pub categories: Vec<Category>,

    /// Codes summed into the coursework subtotal.
    pub coursework: Vec<CategoryCode>,

    /// When event durations are rounded.
    pub rounding: Rounding,

    /// Event list files read when none are given on the command line.
    #[serde(default)]
    pub event_files: Vec<PathBuf>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("categories", &self.categories.len())
            .field("coursework", &self.coursework)
            .field("rounding", &self.rounding)
            .field("event_files", &self.event_files)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            coursework: default_coursework(),
            rounding: Rounding::default(),
            event_files: Vec::new(),
        }
    }
}

impl Config {
    /// Loads configuration from default locations.
    #[expect(
        clippy::result_large_err,
        reason = "figment::Error is large but only returned at startup"
    )]
    pub fn load() -> Result<Self, figment::Error> {
        Self::load_from(None)
    }

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

        // Load from environment variables (TC_*)
        figment = figment.merge(Env::prefixed("TC_"));

        figment.extract()
    }

    /// Validates the category settings into a table.
    pub fn category_table(&self) -> Result<CategoryTable, ConfigError> {
        CategoryTable::new(self.categories.clone(), self.coursework.clone())
    }
}

/// Returns the platform-specific config directory for tc.
///
/// On Linux: `~/.config/tc`
pub fn dirs_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("tc"))
}
