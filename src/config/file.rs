//! Configuration file management
//!
//! Handles finding, loading, and validating configuration files.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::env::EnvConfig;
use crate::error::{Error, Result};
use crate::output::OutputFormat;
use crate::utils::LogLevel;

/// Configuration file locations (in order of precedence)
const CONFIG_LOCATIONS: &[&str] = &[
    "./suitecheck.yaml",
    "./suitecheck.yml",
    "./.suitecheck.yaml",
    "~/.config/suitecheck/config.yaml",
];

/// Persisted run settings
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Regular expression selecting test cases
    pub filter: Option<String>,

    /// Print a line for passing and missed tests
    pub verbose: bool,

    /// Summary format: text, json or json-pretty
    pub format: Option<String>,

    /// Log level for diagnostics on stderr
    pub log_level: Option<String>,

    /// File receiving the report instead of stdout
    pub output: Option<PathBuf>,
}

impl Settings {
    /// Find configuration file in standard locations
    pub fn find() -> Option<PathBuf> {
        CONFIG_LOCATIONS
            .iter()
            .map(|location| expand_path(location))
            .find(|path| path.exists())
    }

    /// Load from an explicit path, the first standard location, or defaults
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path.map(Path::to_path_buf).or_else(Self::find) {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading settings from {}", path.display());
        let content = std::fs::read_to_string(path)?;

        let settings: Self = if is_yaml_file(path) {
            serde_yaml::from_str(&content)?
        } else {
            serde_json::from_str(&content)?
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Save configuration to file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = if is_yaml_file(path) {
            serde_yaml::to_string(self)?
        } else {
            serde_json::to_string_pretty(self)?
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values the runner could not use
    pub fn validate(&self) -> Result<()> {
        self.compile_filter()?;
        self.output_format()?;
        self.log_level()?;
        Ok(())
    }

    pub fn compile_filter(&self) -> Result<Option<Regex>> {
        self.filter
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| Error::InvalidFilter {
                    pattern: pattern.to_string(),
                    source,
                })
            })
            .transpose()
    }

    pub fn output_format(&self) -> Result<OutputFormat> {
        self.format
            .as_deref()
            .map(OutputFormat::parse)
            .unwrap_or(Ok(OutputFormat::Text))
    }

    pub fn log_level(&self) -> Result<LogLevel> {
        match self.log_level.as_deref() {
            None => Ok(LogLevel::default()),
            Some(level) => LogLevel::from_str(level).ok_or_else(|| Error::Unsupported {
                what: "log level",
                value: level.to_string(),
            }),
        }
    }

    /// Environment variables take precedence over file values
    pub fn apply_env(&mut self, env: &EnvConfig) {
        if let Some(filter) = &env.filter {
            self.filter = Some(filter.clone());
        }
        if let Some(verbose) = env.verbose {
            self.verbose = verbose;
        }
        if let Some(format) = &env.format {
            self.format = Some(format.clone());
        }
        if let Some(level) = &env.log_level {
            self.log_level = Some(level.clone());
        }
        if let Some(output) = &env.output {
            self.output = Some(PathBuf::from(output));
        }
    }

    /// Generate example configuration
    pub fn example() -> Self {
        Self {
            filter: Some("^Test".to_string()),
            verbose: true,
            format: Some("text".to_string()),
            log_level: Some("info".to_string()),
            output: None,
        }
    }
}

/// Expand ~ to home directory
fn expand_path(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

/// Check if file is YAML based on extension
fn is_yaml_file(path: &Path) -> bool {
    path.extension()
        .map(|e| e == "yaml" || e == "yml")
        .unwrap_or(false)
}
