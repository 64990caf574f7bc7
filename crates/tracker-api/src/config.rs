//! API configuration.
//!
//! Configuration is loaded from environment variables with defaults suitable
//! for local development.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use thiserror::Error;

/// Signing secret used when none is configured. Never valid in production.
pub const DEVELOPMENT_SECRET: &str = "development-secret-do-not-use-in-production";

/// Longest accepted session validity, ten years.
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Configuration of the API server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Address the server binds to.
    pub bind_addr: SocketAddr,

    /// Public base URL used in `Location` headers.
    pub base_url: String,

    /// HMAC secret for session tokens.
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,

    /// Issuer claim of session tokens.
    pub jwt_issuer: String,

    /// Session token validity in seconds.
    pub token_ttl_secs: u64,

    /// Seed the demo user and resources at startup.
    pub seed: bool,

    /// Log output format.
    pub log_format: LogFormat,

    /// Deployment environment name.
    pub environment: String,
}

impl Default for ApiConfig {
    /// Returns default configuration suitable for local development.
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            base_url: "http://localhost:3000".to_string(),
            jwt_secret: None,
            jwt_issuer: "terrible-tracker".to_string(),
            token_ttl_secs: 86_400,
            seed: false,
            log_format: LogFormat::Pretty,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `TRACKER_BIND_ADDR`: listen address (default: 127.0.0.1:3000)
    /// - `TRACKER_BASE_URL`: public base URL (default: http://localhost:3000)
    /// - `TRACKER_JWT_SECRET`: session signing secret
    /// - `TRACKER_JWT_ISSUER`: session token issuer (default: terrible-tracker)
    /// - `TRACKER_TOKEN_TTL_SECS`: session validity in seconds, at most
    ///   [`MAX_TOKEN_TTL_SECS`] (default: 86400)
    /// - `TRACKER_SEED`: seed demo data when `true` or `1` (default: false)
    /// - `TRACKER_LOG_FORMAT`: `json` for JSON logs (default: pretty)
    /// - `TRACKER_ENV`: environment name (default: development)
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidValue`] when a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let default = Self::default();

        Ok(Self {
            bind_addr: match lookup("TRACKER_BIND_ADDR") {
                Some(raw) => parse_value("TRACKER_BIND_ADDR", &raw)?,
                None => default.bind_addr,
            },
            base_url: lookup("TRACKER_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(default.base_url),
            jwt_secret: lookup("TRACKER_JWT_SECRET").filter(|s| !s.is_empty()),
            jwt_issuer: lookup("TRACKER_JWT_ISSUER").unwrap_or(default.jwt_issuer),
            token_ttl_secs: match lookup("TRACKER_TOKEN_TTL_SECS") {
                Some(raw) => parse_ttl(&raw)?,
                None => default.token_ttl_secs,
            },
            seed: lookup("TRACKER_SEED")
                .map(|s| s == "true" || s == "1")
                .unwrap_or(default.seed),
            log_format: match lookup("TRACKER_LOG_FORMAT").as_deref() {
                Some("json") => LogFormat::Json,
                Some(_) | None => default.log_format,
            },
            environment: lookup("TRACKER_ENV").unwrap_or(default.environment),
        })
    }

    /// Check if running in production.
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// The configured secret, or [`DEVELOPMENT_SECRET`].
    pub fn signing_secret(&self) -> &str {
        self.jwt_secret.as_deref().unwrap_or(DEVELOPMENT_SECRET)
    }

    /// Session token validity, capped at [`MAX_TOKEN_TTL_SECS`].
    pub fn token_duration(&self) -> chrono::Duration {
        let secs = self.token_ttl_secs.min(MAX_TOKEN_TTL_SECS);
        i64::try_from(secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or_else(|| chrono::Duration::days(1))
    }

    /// Validate that all required configuration is present for production.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        match self.jwt_secret.as_deref() {
            None => Err(ConfigError::MissingEnvVar("TRACKER_JWT_SECRET".to_string())),
            Some(secret) if secret.len() < 32 => Err(ConfigError::InvalidValue {
                key: "TRACKER_JWT_SECRET".to_string(),
                message: "must be at least 32 characters".to_string(),
            }),
            Some(_) if self.seed => Err(ConfigError::InvalidValue {
                key: "TRACKER_SEED".to_string(),
                message: "demo data must not be seeded in production".to_string(),
            }),
            Some(_) => Ok(()),
        }
    }
}

fn parse_value<T>(key: &str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse().map_err(|e: T::Err| ConfigError::InvalidValue {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn parse_ttl(raw: &str) -> Result<u64, ConfigError> {
    let secs: u64 = parse_value("TRACKER_TOKEN_TTL_SECS", raw)?;
    if secs > MAX_TOKEN_TTL_SECS {
        return Err(ConfigError::InvalidValue {
            key: "TRACKER_TOKEN_TTL_SECS".to_string(),
            message: format!("must be at most {} seconds", MAX_TOKEN_TTL_SECS),
        });
    }
    Ok(secs)
}
