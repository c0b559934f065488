//! Portal configuration parsed from environment variables.
//!
//! Runtime environment wins; the wasm build has no process environment, so
//! values baked in at compile time (`option_env!`) come next, then defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::time::Duration;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_REVALIDATE_SECS: u64 = 300;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortalConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Interval between background "who am I" checks while signed in.
    pub revalidate_interval: Duration,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            revalidate_interval: Duration::from_secs(DEFAULT_REVALIDATE_SECS),
        }
    }
}

impl PortalConfig {
    /// Build config from the environment.
    ///
    /// Optional:
    /// - `PORTAL_API_BASE_URL`: default `http://localhost:3000/api`
    /// - `PORTAL_REQUEST_TIMEOUT_SECS`: default 10
    /// - `PORTAL_REVALIDATE_SECS`: default 300
    #[must_use]
    pub fn from_env() -> Self {
        let api_base_url = lookup("PORTAL_API_BASE_URL")
            .map(|v| v.trim().trim_end_matches('/').to_owned())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_owned());
        Self {
            api_base_url,
            request_timeout: Duration::from_secs(env_parse_u64("PORTAL_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)),
            revalidate_interval: Duration::from_secs(env_parse_u64("PORTAL_REVALIDATE_SECS", DEFAULT_REVALIDATE_SECS)),
        }
    }
}

fn lookup(key: &str) -> Option<String> {
    std::env::var(key).ok().or_else(|| compile_time(key).map(str::to_owned))
}

fn compile_time(key: &str) -> Option<&'static str> {
    match key {
        "PORTAL_API_BASE_URL" => option_env!("PORTAL_API_BASE_URL"),
        "PORTAL_REQUEST_TIMEOUT_SECS" => option_env!("PORTAL_REQUEST_TIMEOUT_SECS"),
        "PORTAL_REVALIDATE_SECS" => option_env!("PORTAL_REVALIDATE_SECS"),
        _ => None,
    }
}

/// Parse a positive integer, falling back to `default` on absence or garbage.
fn env_parse_u64(key: &str, default: u64) -> u64 {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(key, value = %raw, default, "ignoring invalid config value");
            default
        }
    }
}
