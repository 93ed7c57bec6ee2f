use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LOG_FILE, EPSILON};
use crate::models::amount::FormatOptions;
use crate::utils::currency::{Abbreviations, UsdFormatter};
use crate::utils::formatters::{format_dollar_amount_with, is_equal};

fn default_epsilon() -> f64 {
    EPSILON
}

fn default_abbreviations() -> Abbreviations {
    Abbreviations::dollar()
}

fn default_log_file() -> String {
    DEFAULT_LOG_FILE.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(flatten)]
    pub format: FormatOptions,
    #[serde(default = "default_epsilon")]
    pub epsilon: f64,
    #[serde(default = "default_abbreviations")]
    pub abbreviations: Abbreviations,
    #[serde(default = "default_log_file")]
    pub log_file: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            format: FormatOptions::default(),
            epsilon: default_epsilon(),
            abbreviations: default_abbreviations(),
            log_file: default_log_file(),
        }
    }
}

/// Where a loaded [`Config`] came from.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::File(path) => write!(f, "{}", path.display()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

impl Config {
    pub fn from_json(json: &str) -> Result<Config> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_json(&config_str).with_context(|| format!("Invalid config {}", path.display()))
    }

    /// Like [`Config::load`], but a missing file yields the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<(Config, ConfigSource)> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(config_str) => {
                let config = Self::from_json(&config_str)
                    .with_context(|| format!("Invalid config {}", path.display()))?;
                Ok((config, ConfigSource::File(path.to_path_buf())))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok((Config::default(), ConfigSource::Defaults)),
            Err(e) => Err(e).with_context(|| format!("Failed to read config {}", path.display())),
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.epsilon.is_finite() || self.epsilon <= 0.0 {
            bail!("epsilon must be a positive number, got {}", self.epsilon);
        }
        Ok(())
    }

    /// Formats an amount with the configured precision and suffixes.
    pub fn format_amount(&self, amount: Option<f64>) -> String {
        format_dollar_amount_with(&UsdFormatter, amount, &self.format, &self.abbreviations)
    }

    /// Approximate equality using the configured epsilon.
    pub fn is_equal(&self, a: f64, b: f64) -> bool {
        is_equal(a, b, self.epsilon)
    }
}
