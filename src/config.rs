//! Application configuration.
//!
//! Configuration is loaded from a TOML file at:
//! 1. `$VKRESCUE_CONFIG` (environment variable)
//! 2. `~/.config/vkrescue/config.toml` (Linux/macOS)
//!    `%APPDATA%\vkrescue\config.toml` (Windows)
//! 3. Built-in defaults

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{RescueError, Result};
use crate::fetch::{FetchPolicy, MimePolicy};

/// Browser identification sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General behavior settings.
    pub general: GeneralConfig,
    /// Network and retry settings.
    pub fetch: FetchConfig,
    /// Accepted content types per mode.
    pub mime: MimeConfig,
}

/// General behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub log_level: String,
    /// Override the directory the log file is written to.
    pub log_dir: Option<PathBuf>,
}

/// Network and retry settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Attempts per attachment before giving up on 5xx/transport errors.
    pub max_attempts: u32,
    /// Fixed wait between attempts, in seconds.
    pub retry_delay_secs: u64,
    /// Connect and per-read timeout, in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Albums or conversations processed at the same time.
    pub concurrent_units: usize,
    /// Attachments fetched at the same time within one album or conversation.
    pub concurrent_fetches: usize,
}

/// Content types accepted from the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MimeConfig {
    pub albums: Vec<String>,
    pub chats: Vec<String>,
}

// ── Default implementations ─────────────────────────────────────

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_secs: 5,
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            concurrent_units: 4,
            concurrent_fetches: 4,
        }
    }
}

impl Default for MimeConfig {
    fn default() -> Self {
        Self {
            albums: vec![
                "image/jpeg".to_string(),
                "image/png".to_string(),
                "image/gif".to_string(),
            ],
            chats: vec!["image/jpeg".to_string(), "image/png".to_string()],
        }
    }
}

impl FetchConfig {
    /// Reject values that would make the pipeline do nothing or hang.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(RescueError::InvalidConfig(
                "fetch.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(RescueError::InvalidConfig(
                "fetch.timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.concurrent_units == 0 || self.concurrent_fetches == 0 {
            return Err(RescueError::InvalidConfig(
                "fetch.concurrent_units and fetch.concurrent_fetches must be at least 1"
                    .to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Retry and skip policy for one mode, built fresh from this config.
    pub fn policy(&self, allowed: MimePolicy, force: bool) -> FetchPolicy {
        FetchPolicy {
            allowed,
            max_attempts: self.max_attempts,
            retry_delay: Duration::from_secs(self.retry_delay_secs),
            force,
        }
    }
}

impl MimeConfig {
    pub fn albums_policy(&self) -> MimePolicy {
        MimePolicy::new(&self.albums)
    }

    pub fn chats_policy(&self) -> MimePolicy {
        MimePolicy::new(&self.chats)
    }
}

// ── Load ────────────────────────────────────────────────────────

/// Load configuration, searching standard locations.
///
/// Returns the default configuration if no file is found or on parse error.
pub fn load_config() -> Config {
    if let Some(path) = config_file_path() {
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(contents) => match toml::from_str::<Config>(&contents) {
                    Ok(cfg) => {
                        tracing::info!(path = %path.display(), "Loaded config");
                        return cfg;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            error = %e,
                            "Failed to parse config, using defaults"
                        );
                    }
                },
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "Failed to read config file, using defaults"
                    );
                }
            }
        }
    }
    Config::default()
}

/// Determine the config file path (checking env var first, then standard dirs).
pub fn config_file_path() -> Option<PathBuf> {
    if let Ok(env_path) = std::env::var("VKRESCUE_CONFIG") {
        return Some(PathBuf::from(env_path));
    }

    dirs::config_dir().map(|d| d.join("vkrescue").join("config.toml"))
}

/// Return the directory the log file is written to.
pub fn log_dir(config: &Config) -> PathBuf {
    if let Some(ref dir) = config.general.log_dir {
        return dir.clone();
    }
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vkrescue")
}
