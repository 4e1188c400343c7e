use std::fmt::Debug;
use std::str::FromStr;

use axum::http::HeaderValue;

use crate::auth::jwt::JwtConfig;

/// Process-wide settings for the Pressroom API, read once at startup.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Dashboard origins allowed by CORS.
    pub cors_origins: Vec<String>,
    pub request_timeout_secs: u64,
    /// Grace period for the approval notifier to flush queued emails after
    /// the listener closes.
    pub shutdown_timeout_secs: u64,
    /// Dashboard URL that stakeholder sign links point at, without a
    /// trailing slash.
    pub app_base_url: String,
    pub jwt: JwtConfig,
}

impl ServerConfig {
    /// Read settings from the environment, falling back to local-dev
    /// defaults.
    ///
    /// | Env Var                 | Default                 |
    /// |-------------------------|-------------------------|
    /// | `HOST`                  | `0.0.0.0`               |
    /// | `PORT`                  | `3000`                  |
    /// | `CORS_ORIGINS`          | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`  | `30`                    |
    /// | `SHUTDOWN_TIMEOUT_SECS` | `30`                    |
    /// | `APP_BASE_URL`          | `http://localhost:5173` |
    ///
    /// Panics on malformed values so a bad deploy fails before binding.
    pub fn from_env() -> Self {
        let cors_origins = parse_origins(&env_string("CORS_ORIGINS", "http://localhost:5173"));

        Self {
            host: env_string("HOST", "0.0.0.0"),
            port: env_parsed("PORT", 3000),
            cors_origins,
            request_timeout_secs: env_parsed("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_parsed("SHUTDOWN_TIMEOUT_SECS", 30),
            app_base_url: env_string("APP_BASE_URL", "http://localhost:5173")
                .trim_end_matches('/')
                .to_string(),
            jwt: JwtConfig::from_env(),
        }
    }
}

fn env_string(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parsed<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Debug,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .unwrap_or_else(|e| panic!("{key} is malformed ({raw:?}): {e:?}")),
        Err(_) => default,
    }
}

/// Split a comma-separated origin list, rejecting entries that are not
/// valid header values.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .inspect(|origin| {
            if HeaderValue::from_str(origin).is_err() {
                panic!("Invalid CORS origin '{origin}'");
            }
        })
        .map(str::to_string)
        .collect()
}
