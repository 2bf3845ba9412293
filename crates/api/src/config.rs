use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use axum::http::HeaderValue;
use restyle_core::types::{DEFAULT_HISTORY_CAPACITY, DEFAULT_MAX_UPLOAD_BYTES};
use restyle_fal::api::DEFAULT_QUEUE_URL;
use restyle_fal::service::DEFAULT_MODEL;

/// Errors raised while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Credentials and endpoints for the external transform service.
#[derive(Clone)]
pub struct FalConfig {
    /// `FAL_KEY`; never logged.
    pub api_key: String,
    /// Model path submitted to the queue.
    pub model: String,
    /// Queue base URL.
    pub queue_url: String,
    /// Delay between status polls.
    pub poll_interval: Duration,
}

impl std::fmt::Debug for FalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FalConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("queue_url", &self.queue_url)
            .field("poll_interval", &self.poll_interval)
            .finish()
    }
}

/// Server configuration loaded from environment variables.
///
/// Everything except `FAL_KEY` has a default suitable for local use.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins; `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// Asset store root directory.
    pub upload_dir: PathBuf,
    /// History ledger document.
    pub history_file: PathBuf,
    /// Maximum number of ledger entries kept.
    pub history_capacity: usize,
    /// Upload size ceiling in bytes.
    pub max_upload_bytes: usize,
    /// Timeout for downloading a generated image.
    pub download_timeout_secs: u64,
    /// Optional bound on the submit/poll stage of a job. Unbounded when `None`.
    pub job_timeout_secs: Option<u64>,
    /// Static front-end directory served for unmatched paths.
    pub public_dir: PathBuf,
    pub fal: FalConfig,
}

impl ServerConfig {
    /// Load configuration from the process environment.
    ///
    /// | Env Var                 | Default                   |
    /// |-------------------------|---------------------------|
    /// | `FAL_KEY`               | (required)                |
    /// | `FAL_MODEL`             | `fal-ai/flux-pro/kontext` |
    /// | `FAL_QUEUE_URL`         | `https://queue.fal.run`   |
    /// | `FAL_POLL_INTERVAL_MS`  | `500`                     |
    /// | `HOST`                  | `0.0.0.0`                 |
    /// | `PORT`                  | `3000`                    |
    /// | `CORS_ORIGINS`          | `*`                       |
    /// | `UPLOAD_DIR`            | `uploads`                 |
    /// | `HISTORY_FILE`          | `history.json`            |
    /// | `HISTORY_CAPACITY`      | `50`                      |
    /// | `MAX_UPLOAD_BYTES`      | `10485760`                |
    /// | `DOWNLOAD_TIMEOUT_SECS` | `30`                      |
    /// | `JOB_TIMEOUT_SECS`      | unset                     |
    /// | `PUBLIC_DIR`            | `public`                  |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let api_key = var("FAL_KEY").ok_or(ConfigError::Missing("FAL_KEY"))?;

        let cors_origins: Vec<String> = var("CORS_ORIGINS")
            .unwrap_or_else(|| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        for origin in cors_origins.iter().filter(|o| o.as_str() != "*") {
            if HeaderValue::from_str(origin).is_err() {
                return Err(ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.clone(),
                });
            }
        }

        let job_timeout_secs = match var("JOB_TIMEOUT_SECS") {
            Some(raw) => Some(parse("JOB_TIMEOUT_SECS", raw)?),
            None => None,
        };

        let fal = FalConfig {
            api_key,
            model: var("FAL_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into()),
            queue_url: var("FAL_QUEUE_URL").unwrap_or_else(|| DEFAULT_QUEUE_URL.into()),
            poll_interval: Duration::from_millis(parse_or(&var, "FAL_POLL_INTERVAL_MS", 500)?),
        };

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: parse_or(&var, "PORT", 3000)?,
            cors_origins,
            upload_dir: var("UPLOAD_DIR").unwrap_or_else(|| "uploads".into()).into(),
            history_file: var("HISTORY_FILE")
                .unwrap_or_else(|| "history.json".into())
                .into(),
            history_capacity: parse_or(&var, "HISTORY_CAPACITY", DEFAULT_HISTORY_CAPACITY)?,
            max_upload_bytes: parse_or(&var, "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            download_timeout_secs: parse_or(&var, "DOWNLOAD_TIMEOUT_SECS", 30)?,
            job_timeout_secs,
            public_dir: var("PUBLIC_DIR").unwrap_or_else(|| "public".into()).into(),
            fal,
        })
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }

    pub fn job_timeout(&self) -> Option<Duration> {
        self.job_timeout_secs.map(Duration::from_secs)
    }
}

fn parse<T: FromStr>(name: &'static str, raw: String) -> Result<T, ConfigError> {
    let parsed = raw.trim().parse();
    parsed.map_err(|_| ConfigError::Invalid { name, value: raw })
}

fn parse_or<T, F>(var: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match var(name) {
        Some(raw) => parse(name, raw),
        None => Ok(default),
    }
}
