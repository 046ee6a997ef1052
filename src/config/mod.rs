use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::debounce;
use crate::query::DEFAULT_PAGE_SIZE;
use crate::remote::http::DEFAULT_TIMEOUT_SECS;

/// Runtime configuration merged from defaults, the optional config file and
/// environment variables.
///
/// Environment variables take precedence over the config file:
/// - `DFTRACK_BASE_URL`: dataflow collection URL
/// - `DFTRACK_TOKEN_URL`: endpoint that issues plain-text bearer tokens
/// - `DFTRACK_PAGE_SIZE`: records per page
/// - `DFTRACK_DEBOUNCE_MS`: quiet period before a filter edit is applied
/// - `DFTRACK_TIMEOUT_SECS`: HTTP request timeout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    pub base_url: Option<String>,
    pub token_url: Option<String>,
    pub page_size: u32,
    pub debounce_ms: u64,
    pub timeout_secs: u64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            token_url: None,
            page_size: DEFAULT_PAGE_SIZE,
            debounce_ms: u64::try_from(debounce::DEFAULT_DELAY.as_millis()).unwrap_or(500),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DashboardConfig {
    /// Both endpoints, when the remote service is fully configured.
    pub fn remote(&self) -> Option<(&str, &str)> {
        Some((self.base_url.as_deref()?, self.token_url.as_deref()?))
    }

    pub const fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

/// `{config_dir}/dftrack/config.toml` (e.g. `~/.config/dftrack/config.toml`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dftrack").join("config.toml"))
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

fn apply_toml(config: &mut DashboardConfig, table: &toml::Table) {
    let Some(service) = table.get("service").and_then(toml::Value::as_table) else {
        return;
    };
    if let Some(url) = service.get("base_url").and_then(toml::Value::as_str) {
        config.base_url = non_empty(url);
    }
    if let Some(url) = service.get("token_url").and_then(toml::Value::as_str) {
        config.token_url = non_empty(url);
    }
    if let Some(size) = service
        .get("page_size")
        .and_then(toml::Value::as_integer)
        .and_then(|n| u32::try_from(n).ok())
    {
        config.page_size = size.max(1);
    }
    if let Some(ms) = service
        .get("debounce_ms")
        .and_then(toml::Value::as_integer)
        .and_then(|n| u64::try_from(n).ok())
    {
        config.debounce_ms = ms;
    }
    if let Some(secs) = service
        .get("timeout_secs")
        .and_then(toml::Value::as_integer)
        .and_then(|n| u64::try_from(n).ok())
    {
        config.timeout_secs = secs.max(1);
    }
}

fn apply_env(config: &mut DashboardConfig) {
    if let Ok(val) = std::env::var("DFTRACK_BASE_URL") {
        config.base_url = non_empty(&val);
    }
    if let Ok(val) = std::env::var("DFTRACK_TOKEN_URL") {
        config.token_url = non_empty(&val);
    }
    if let Some(size) = env_number::<u32>("DFTRACK_PAGE_SIZE") {
        config.page_size = size.max(1);
    }
    if let Some(ms) = env_number::<u64>("DFTRACK_DEBOUNCE_MS") {
        config.debounce_ms = ms;
    }
    if let Some(secs) = env_number::<u64>("DFTRACK_TIMEOUT_SECS") {
        config.timeout_secs = secs.max(1);
    }
}

fn env_number<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok()?.trim().parse().ok()
}

/// Load configuration from `path` (if it exists and parses) and the environment.
///
/// An unreadable or malformed file is ignored with a warning.
pub fn load_from(path: Option<&Path>) -> DashboardConfig {
    let mut config = DashboardConfig::default();
    if let Some(path) = path
        && path.exists()
    {
        match std::fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|c| c.parse::<toml::Table>().map_err(anyhow::Error::from))
        {
            Ok(table) => apply_toml(&mut config, &table),
            Err(e) => tracing::warn!(path = %path.display(), "ignoring config file: {e:#}"),
        }
    }
    apply_env(&mut config);
    config
}

/// Load configuration from the default config file and the environment.
pub fn load() -> DashboardConfig {
    load_from(default_config_path().as_deref())
}
