//! Runtime configuration.
//!
//! Everything is read from the process environment (after `.env` is loaded by
//! `main`). Only the OpenAI key and the Threads credentials are optional; the
//! service starts without them and the affected routes report the problem.

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub const THREADS_AUTH_URL: &str = "https://www.threads.net/oauth/authorize";
pub const THREADS_TOKEN_URL: &str = "https://graph.threads.net/oauth/access_token";
pub const THREADS_API_BASE: &str = "https://graph.threads.net/v1.0";

/// Top-level service configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub port: u16,
    pub max_upload_bytes: usize,
    pub openai: OpenAiConfig,
    /// `None` unless client id, secret and redirect URI are all set.
    pub threads: Option<ThreadsConfig>,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    /// Request timeout; `None` keeps the transport default (no timeout).
    pub timeout: Option<Duration>,
}

#[derive(Debug, Clone)]
pub struct ThreadsConfig {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub auth_url: String,
    pub token_url: String,
    pub api_base: String,
}

impl AppConfig {
    /// Build the config from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let openai = OpenAiConfig {
            api_key: get("OPENAI_API_KEY"),
            model: get("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            base_url: get("OPENAI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_OPENAI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            timeout: parse_var::<u64>(&get, "OPENAI_TIMEOUT_SECS")?.map(Duration::from_secs),
        };

        let threads = match (
            get("THREADS_CLIENT_ID"),
            get("THREADS_CLIENT_SECRET"),
            get("THREADS_REDIRECT_URI"),
        ) {
            (Some(client_id), Some(client_secret), Some(redirect_uri)) => Some(ThreadsConfig {
                client_id,
                client_secret,
                redirect_uri,
                auth_url: get("THREADS_AUTH_URL").unwrap_or_else(|| THREADS_AUTH_URL.to_string()),
                token_url: get("THREADS_TOKEN_URL")
                    .unwrap_or_else(|| THREADS_TOKEN_URL.to_string()),
                api_base: get("THREADS_API_BASE")
                    .unwrap_or_else(|| THREADS_API_BASE.to_string())
                    .trim_end_matches('/')
                    .to_string(),
            }),
            _ => None,
        };

        Ok(Self {
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_var(&get, "PORT")?.unwrap_or(5000),
            max_upload_bytes: parse_var(&get, "MAX_UPLOAD_BYTES")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            openai,
            threads,
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))
        })
        .transpose()
}
