use crate::models::{ExportFormat, MatchStrategy};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub export: ExportSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default)]
    pub strategy: MatchStrategy,
    /// Fixes the pool shuffle for every run when set
    pub seed: Option<u64>,
    #[serde(default)]
    pub skip_malformed_rows: bool,
    #[serde(default = "default_max_roster_size")]
    pub max_roster_size: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            strategy: MatchStrategy::default(),
            seed: None,
            skip_malformed_rows: false,
            max_roster_size: default_max_roster_size(),
        }
    }
}

fn default_max_roster_size() -> usize { 2000 }

#[derive(Debug, Clone, Deserialize)]
pub struct ExportSettings {
    /// Download name without extension; the format adds `.xlsx` or `.csv`
    #[serde(default = "default_file_stem")]
    pub file_stem: String,
    /// Format used when a request does not ask for one
    #[serde(default)]
    pub format: ExportFormat,
}

impl ExportSettings {
    pub fn file_name(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.file_stem, format.extension())
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            file_stem: default_file_stem(),
            format: ExportFormat::default(),
        }
    }
}

fn default_file_stem() -> String { "New_Coffee_Matches".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

fn environment() -> Environment {
    // e.g., COFFEE__SERVER__PORT -> server.port
    Environment::with_prefix("COFFEE")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
}

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with COFFEE__)
    pub fn load() -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }

    /// Load configuration from a custom path (still overridable by COFFEE__ variables)
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?
            .try_deserialize()
    }
}
