use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::feed_log::DEFAULT_LOG_CAPACITY;

/// Top-level configuration loaded from `~/.stratos/config.toml`.
///
/// **Security**: This struct NEVER stores API keys. The advisor credential
/// is read from the environment variable named by `advisor.api_key_env`;
/// see [`CredentialProvider`].
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub advisor: AdvisorConfig,
    #[serde(default)]
    pub dashboard: DashboardConfig,
}

impl Config {
    /// Load config from `~/.stratos/config.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(path)
        } else {
            let cfg = Config::default();
            cfg.validate()?;
            Ok(cfg)
        }
    }

    /// Load from a specific path.
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();
        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let cfg: Config = toml::from_str(&text).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize config to TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        self.validate()?;
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Semantic validation for settings that are not fully expressible via type checks.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.feed.validate()?;
        self.advisor.validate()?;
        self.dashboard.validate()?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// `~/.stratos`, or `./.stratos` when no home directory is known.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".stratos")
    }
}

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("io: {0}")]
    Io(String),
    #[error("parse: {0}")]
    Parse(String),
    #[error("validation: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Section structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_json: bool,
    /// Log destination for the dashboard. Defaults to `~/.stratos/stratos.log`.
    #[serde(default)]
    pub log_file: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            log_file: None,
        }
    }
}

impl GeneralConfig {
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| Config::home_dir().join("stratos.log"))
    }
}

fn default_log_level() -> String {
    "info".into()
}

/// Timing and loss parameters of the simulated feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_handshake_ms")]
    pub handshake_ms: u64,
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_base_latency_ms")]
    pub base_latency_ms: u64,
    #[serde(default = "default_jitter_ms")]
    pub jitter_ms: u64,
    #[serde(default = "default_packet_loss_chance")]
    pub packet_loss_chance: f64,
    #[serde(default = "default_dropped_ping_ms")]
    pub dropped_ping_ms: u32,
    /// Fixed seed for a reproducible feed; entropy when unset.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            handshake_ms: default_handshake_ms(),
            tick_interval_ms: default_tick_interval_ms(),
            base_latency_ms: default_base_latency_ms(),
            jitter_ms: default_jitter_ms(),
            packet_loss_chance: default_packet_loss_chance(),
            dropped_ping_ms: default_dropped_ping_ms(),
            seed: None,
        }
    }
}

impl FeedConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.packet_loss_chance) {
            return Err(ConfigError::Validation(format!(
                "feed.packet_loss_chance must be within [0, 1], got {}",
                self.packet_loss_chance
            )));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "feed.tick_interval_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_handshake_ms() -> u64 {
    800
}
fn default_tick_interval_ms() -> u64 {
    3000
}
fn default_base_latency_ms() -> u64 {
    120
}
fn default_jitter_ms() -> u64 {
    200
}
fn default_packet_loss_chance() -> f64 {
    0.05
}
fn default_dropped_ping_ms() -> u32 {
    999
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_advisor_model")]
    pub model: String,
    #[serde(default = "default_advisor_base_url")]
    pub base_url: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AdvisorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            model: default_advisor_model(),
            base_url: default_advisor_base_url(),
            api_key_env: default_api_key_env(),
            debounce_secs: default_debounce_secs(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AdvisorConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::Validation(
                "advisor.model must not be empty".to_string(),
            ));
        }
        if self.debounce_secs == 0 {
            return Err(ConfigError::Validation(
                "advisor.debounce_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}
fn default_advisor_model() -> String {
    "gemini-3-flash-preview".into()
}
fn default_advisor_base_url() -> String {
    "https://generativelanguage.googleapis.com".into()
}
fn default_api_key_env() -> String {
    "API_KEY".into()
}
fn default_debounce_secs() -> u64 {
    15
}
fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_log_capacity")]
    pub log_capacity: usize,
    /// Directory CSV exports are written to. Defaults to the working directory.
    #[serde(default)]
    pub export_dir: Option<String>,
    #[serde(default = "default_true")]
    pub start_live: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            log_capacity: default_log_capacity(),
            export_dir: None,
            start_live: true,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.log_capacity == 0 {
            return Err(ConfigError::Validation(
                "dashboard.log_capacity must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir
            .as_ref()
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

fn default_log_capacity() -> usize {
    DEFAULT_LOG_CAPACITY
}

// ---------------------------------------------------------------------------
// Credential provider
// ---------------------------------------------------------------------------

/// Resolves credentials named in the config to values on demand.
pub struct CredentialProvider;

impl CredentialProvider {
    /// Read the advisor API key from the env var named in `cfg`.
    /// Returns `None` when the variable is unset or empty.
    pub fn advisor_api_key(cfg: &AdvisorConfig) -> Option<String> {
        std::env::var(&cfg.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}
