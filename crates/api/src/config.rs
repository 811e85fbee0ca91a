use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use hub_core::agents::MARKETING_COORDINATOR_ID;
use hub_pipeline::OrchestratorConfig;

/// Log output format selected by `LOG_FORMAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines (default).
    #[default]
    Pretty,
    /// One JSON object per line.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct HubConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`). Applies to the
    /// server layer only; agent calls are not bounded by it.
    pub request_timeout_secs: u64,
    /// Base URL of the agent service (default: `http://localhost:8000`).
    pub agent_api_url: String,
    /// Agent that receives every brief (default: the marketing coordinator).
    pub target_agent_id: String,
    /// Progress tick interval in milliseconds (default: `3000`).
    pub progress_interval_ms: u64,
    pub log_format: LogFormat,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: vec!["http://localhost:5173".to_string()],
            request_timeout_secs: 30,
            agent_api_url: "http://localhost:8000".to_string(),
            target_agent_id: MARKETING_COORDINATOR_ID.to_string(),
            progress_interval_ms: 3000,
            log_format: LogFormat::Pretty,
        }
    }
}

impl HubConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `AGENT_API_URL`        | `http://localhost:8000`    |
    /// | `TARGET_AGENT_ID`      | marketing coordinator id   |
    /// | `PROGRESS_INTERVAL_MS` | `3000`                     |
    /// | `LOG_FORMAT`           | `pretty` (`json` to switch)|
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let string = |key: &str, default: String| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or(default)
        };

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(raw) => raw
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            None => defaults.cors_origins,
        };

        let progress_interval_ms =
            parse_var(&lookup, "PROGRESS_INTERVAL_MS", defaults.progress_interval_ms)?;
        anyhow::ensure!(progress_interval_ms > 0, "PROGRESS_INTERVAL_MS must be positive");

        Ok(Self {
            host: string("HOST", defaults.host),
            port: parse_var(&lookup, "PORT", defaults.port)?,
            cors_origins,
            request_timeout_secs: parse_var(
                &lookup,
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout_secs,
            )?,
            agent_api_url: string("AGENT_API_URL", defaults.agent_api_url),
            target_agent_id: string("TARGET_AGENT_ID", defaults.target_agent_id),
            progress_interval_ms,
            log_format: lookup("LOG_FORMAT")
                .map(|v| LogFormat::parse(&v))
                .unwrap_or_default(),
        })
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            target_agent_id: self.target_agent_id.clone(),
            progress_interval: Duration::from_millis(self.progress_interval_ms),
        }
    }
}

fn parse_var<T, F>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a valid number, got {raw:?}")),
        _ => Ok(default),
    }
}
