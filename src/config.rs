// Application configuration.
// Loads a TOML file from the platform config dir and applies env/CLI overrides.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{CensusError, Result};

/// Environment variable holding the census API key.
pub const API_KEY_ENV: &str = "CENSUS_API_KEY";

/// Default highlight threshold for speaker shares.
pub const DEFAULT_HIGHLIGHT_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// ACS dataset name (e.g. "acs5").
    pub dataset: String,
    /// ACS vintage year.
    pub year: u16,
    /// Census API key. Requests work without one at a lower daily quota.
    pub api_key: Option<String>,
    /// Overrides the census API host, e.g. for a local mirror.
    pub api_base_url: Option<String>,
    /// USDA WIC coverage workbook, or a CSV export of its "Coverage Rate by State" sheet.
    pub wic_coverage_path: PathBuf,
    /// Speaker shares above this value are highlighted.
    pub highlight_threshold: f64,
    /// Overrides the platform cache directory.
    pub cache_dir: Option<PathBuf>,
    /// Default tracing filter when RUST_LOG is unset.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: "acs5".to_string(),
            year: 2019,
            api_key: None,
            api_base_url: None,
            wic_coverage_path: PathBuf::from("data/wic-coverage-rates-by-state-2018.xlsx"),
            highlight_threshold: DEFAULT_HIGHLIGHT_THRESHOLD,
            cache_dir: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Default config file location (~/.config/censusview/config.toml on Linux).
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "censusview").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Parse a config from TOML text.
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text).map_err(|e| CensusError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from an explicit path, or the default path if it exists.
    /// A missing default file yields the defaults; a missing explicit file is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_toml(&fs::read_to_string(path)?)?,
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_toml(&fs::read_to_string(&path)?)?,
                _ => Self::default(),
            },
        };

        if let Ok(key) = std::env::var(API_KEY_ENV) {
            if !key.trim().is_empty() {
                config.api_key = Some(key);
            }
        }

        Ok(config)
    }

    /// Check values that serde cannot, including after CLI overrides.
    pub fn validate(&self) -> Result<()> {
        if self.dataset.trim().is_empty() {
            return Err(CensusError::Config("dataset must not be empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.highlight_threshold) {
            return Err(CensusError::Config(format!(
                "highlight_threshold must be between 0 and 1, got {}",
                self.highlight_threshold
            )));
        }
        Ok(())
    }
}
