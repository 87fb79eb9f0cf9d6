use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::FetchOptions;
use crate::retry::RetryPolicy;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per download (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_secs: 0.25,
            max_delay_secs: 30,
        }
    }
}

/// Global configuration loaded from `~/.config/glr/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlrConfig {
    /// Seconds to wait for a TCP/TLS connection.
    pub connect_timeout_secs: u64,
    /// Upper bound in seconds for a whole artifact transfer.
    pub transfer_timeout_secs: u64,
    /// Seconds each `--help` / `--version` invocation may run during a smoke test.
    pub smoke_timeout_secs: u64,
    /// User-Agent sent with HEAD/GET requests.
    pub user_agent: String,
    /// Default install prefix for `glr install` (binary lands in `<prefix>/bin`).
    pub install_prefix: Option<PathBuf>,
    /// Optional retry policy; if missing, built-in defaults are used.
    pub retry: Option<RetryConfig>,
}

impl Default for GlrConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: 30,
            transfer_timeout_secs: 600,
            smoke_timeout_secs: 30,
            user_agent: format!("glr/{}", env!("CARGO_PKG_VERSION")),
            install_prefix: None,
            retry: None,
        }
    }
}

impl GlrConfig {
    pub fn fetch_options(&self) -> FetchOptions {
        FetchOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            timeout: Duration::from_secs(self.transfer_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
            .as_ref()
            .map(RetryPolicy::from)
            .unwrap_or_default()
    }

    pub fn smoke_timeout(&self) -> Duration {
        Duration::from_secs(self.smoke_timeout_secs)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("glr")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from the XDG location, creating a default file if none exists.
pub fn load_or_init() -> Result<GlrConfig> {
    load_or_init_at(&config_path()?)
}

/// Load configuration from `path`, creating it with defaults if missing.
pub fn load_or_init_at(path: &Path) -> Result<GlrConfig> {
    if !path.exists() {
        let default_cfg = GlrConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml).with_context(|| format!("write {}", path.display()))?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: GlrConfig =
        toml::from_str(&data).with_context(|| format!("parse {}", path.display()))?;
    Ok(cfg)
}
