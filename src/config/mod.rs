use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::{AppError, AppResult};

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub ingestion: IngestionConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Network health-check settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Per-request timeout, applied to the HEAD and to the fallback GET separately
    #[serde(default = "default_probe_timeout", with = "duration_serde::duration")]
    pub timeout: Duration,
    /// Maximum number of probes in flight
    #[serde(default = "default_probe_concurrency")]
    pub concurrency: usize,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
    /// Lower per-stream progress logging from info to debug
    #[serde(default)]
    pub quiet: bool,
}

/// Structured feed ingestion settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestionConfig {
    #[serde(default = "default_feed_folder")]
    pub feed_folder: PathBuf,
    #[serde(default = "default_convert_output")]
    pub output_file: PathBuf,
}

/// Naming of derived artifacts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_backup_suffix")]
    pub backup_suffix: String,
    #[serde(default = "default_working_suffix")]
    pub working_suffix: String,
    #[serde(default = "default_not_working_suffix")]
    pub not_working_suffix: String,
}

fn default_probe_timeout() -> Duration {
    Duration::from_secs(DEFAULT_PROBE_TIMEOUT_SECS)
}

fn default_probe_concurrency() -> usize {
    DEFAULT_PROBE_CONCURRENCY
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_max_redirects() -> usize {
    DEFAULT_MAX_REDIRECTS
}

fn default_feed_folder() -> PathBuf {
    PathBuf::from(DEFAULT_FEED_FOLDER)
}

fn default_convert_output() -> PathBuf {
    PathBuf::from(DEFAULT_CONVERT_OUTPUT)
}

fn default_backup_suffix() -> String {
    DEFAULT_BACKUP_SUFFIX.to_string()
}

fn default_working_suffix() -> String {
    DEFAULT_WORKING_SUFFIX.to_string()
}

fn default_not_working_suffix() -> String {
    DEFAULT_NOT_WORKING_SUFFIX.to_string()
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout: default_probe_timeout(),
            concurrency: default_probe_concurrency(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
            quiet: false,
        }
    }
}

impl ProbeConfig {
    /// Settings used when `convert` checks the playlist it just wrote
    pub fn for_convert() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_CONVERT_TIMEOUT_SECS),
            concurrency: DEFAULT_CONVERT_CONCURRENCY,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> AppResult<()> {
        if self.concurrency == 0 {
            return Err(AppError::configuration("probe.concurrency must be at least 1"));
        }
        if self.timeout.is_zero() {
            return Err(AppError::configuration("probe.timeout must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            feed_folder: default_feed_folder(),
            output_file: default_convert_output(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            backup_suffix: default_backup_suffix(),
            working_suffix: default_working_suffix(),
            not_working_suffix: default_not_working_suffix(),
        }
    }
}

impl OutputConfig {
    /// `list.m3u` -> `list.m3u.backup`
    pub fn backup_path(&self, original: &Path) -> PathBuf {
        let mut name = original.as_os_str().to_owned();
        name.push(&self.backup_suffix);
        PathBuf::from(name)
    }

    /// `dir/list.m3u` -> `dir/list_working.m3u`
    pub fn working_path(&self, original: &Path) -> PathBuf {
        sibling_with_suffix(original, &self.working_suffix)
    }

    /// `dir/list.m3u` -> `dir/list_notworking.m3u`
    pub fn not_working_path(&self, original: &Path) -> PathBuf {
        sibling_with_suffix(original, &self.not_working_suffix)
    }
}

fn sibling_with_suffix(original: &Path, suffix: &str) -> PathBuf {
    let stem = original
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    original.with_file_name(format!("{stem}{suffix}.m3u"))
}

impl Config {
    /// Read the config file if present, otherwise fall back to defaults
    pub fn load_from_file(config_file: &str) -> AppResult<Self> {
        if !Path::new(config_file).exists() {
            info!("Config file {} not found, using defaults", config_file);
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_file)
            .map_err(|e| AppError::configuration(format!("Failed to read {config_file}: {e}")))?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| AppError::configuration(format!("Failed to parse {config_file}: {e}")))?;
        config.probe.validate()?;
        Ok(config)
    }
}
