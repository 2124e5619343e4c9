//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.devkit/config.json`) and environment.
//! The webhook base URL is resolved once, when a client is built.

use crate::height_sync::{SyncMode, DEFAULT_CORRELATION_PARAM};
use crate::query;
use crate::webhook::{DEVELOPMENT_WEBHOOK_URL, PRODUCTION_WEBHOOK_URL};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level SDK config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Webhook endpoint and credentials.
    #[serde(default)]
    pub webhook: WebhookConfig,

    /// Height-sync poller settings.
    #[serde(default)]
    pub height_sync: HeightSyncConfig,
}

/// Which webhook deployment to talk to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    pub fn base_url(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_WEBHOOK_URL,
            Environment::Development => DEVELOPMENT_WEBHOOK_URL,
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Environment::Production),
            "development" | "dev" => Some(Environment::Development),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookConfig {
    /// "production" (default) or "development". Overridden by DEVKIT_ENV env.
    #[serde(default)]
    pub environment: Environment,
    /// Explicit base URL; when set it wins over `environment`.
    pub base_url: Option<String>,
    /// App token. Overridden by DEVKIT_TOKEN env.
    pub token: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeightSyncConfig {
    /// "oneShot" or "continuous" (default).
    #[serde(default)]
    pub mode: SyncMode,
    /// Poll period in milliseconds (default 500).
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Query parameter holding the correlation id (default "resizeId").
    #[serde(default = "default_correlation_param")]
    pub correlation_param: String,
}

fn default_interval_ms() -> u64 {
    500
}

fn default_correlation_param() -> String {
    DEFAULT_CORRELATION_PARAM.to_string()
}

impl Default for HeightSyncConfig {
    fn default() -> Self {
        Self {
            mode: SyncMode::default(),
            interval_ms: default_interval_ms(),
            correlation_param: default_correlation_param(),
        }
    }
}

impl HeightSyncConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().and_then(|s| {
        let t = s.trim();
        if t.is_empty() {
            None
        } else {
            Some(t.to_string())
        }
    })
}

/// Resolve the app token: env DEVKIT_TOKEN overrides config.
pub fn resolve_token(config: &Config) -> Option<String> {
    non_empty_env("DEVKIT_TOKEN").or_else(|| {
        config
            .webhook
            .token
            .as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    })
}

/// Resolve the environment: env DEVKIT_ENV overrides config. Unknown values fall back to config.
pub fn resolve_environment(config: &Config) -> Environment {
    non_empty_env("DEVKIT_ENV")
        .and_then(|s| Environment::parse(&s))
        .unwrap_or(config.webhook.environment)
}

/// Resolve the webhook base URL: explicit `baseUrl`, else the environment's constant.
pub fn resolve_base_url(config: &Config) -> String {
    config
        .webhook
        .base_url
        .as_ref()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| resolve_environment(config).base_url().to_string())
}

/// Infer the environment from a location search string: `dev=true` (or `1`) selects development.
pub fn environment_from_query(search: &str) -> Environment {
    if query::query_flag(search, "dev") {
        Environment::Development
    } else {
        Environment::Production
    }
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("DEVKIT_CONFIG_PATH").map(PathBuf::from).unwrap_or_else(|_| {
        dirs::home_dir()
            .map(|h| h.join(".devkit").join("config.json"))
            .unwrap_or_else(|| PathBuf::from("config.json"))
    })
}

/// Load config from the given path (or the default path). Missing file => default config.
/// Returns the config and the path that was used.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}
