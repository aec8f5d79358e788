//! Runtime configuration read from environment variables.
//!
//! Every setting has a development default except `DATABASE_URL`. The
//! `production` profile flips the secure-cookie flag on, which in turn enables
//! HSTS in the security headers middleware.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

const DEV_DOMAIN: &str = "recipez.local";
const PROD_DOMAIN: &str = "recipez.skribblez.net";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Some(Self::Development),
            "production" | "prod" => Some(Self::Production),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub database_url: String,
    pub bind: SocketAddr,
    pub workers: usize,
    pub domain: String,
    /// HTTPS mode. Mirrors the session-cookie `Secure` flag.
    pub session_cookie_secure: bool,
    pub static_dir: PathBuf,
    pub profile_rate_limit: u32,
    pub profile_rate_window: Duration,
    pub session_ttl: chrono::Duration,
    pub db_pool_size: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let environment = match get("RECIPEZ_ENV") {
            Some(v) => Environment::parse(&v).ok_or(ConfigError::Invalid {
                var: "RECIPEZ_ENV",
                value: v,
                reason: "expected development or production",
            })?,
            None => Environment::Development,
        };

        let database_url = get("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?;

        let bind = match get("RECIPEZ_BIND") {
            Some(v) => v.parse().map_err(|_| ConfigError::Invalid {
                var: "RECIPEZ_BIND",
                value: v,
                reason: "expected host:port",
            })?,
            None => SocketAddr::from(([0, 0, 0, 0], 5000)),
        };

        let workers = match get("RECIPEZ_WORKERS") {
            Some(v) => parse_positive(&v, "RECIPEZ_WORKERS")? as usize,
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        };

        let domain = get("RECIPEZ_DOMAIN").unwrap_or_else(|| match environment {
            Environment::Development => DEV_DOMAIN.to_string(),
            Environment::Production => PROD_DOMAIN.to_string(),
        });

        let session_cookie_secure = match get("SESSION_COOKIE_SECURE") {
            Some(v) => parse_bool(&v, "SESSION_COOKIE_SECURE")?,
            None => environment == Environment::Production,
        };

        let static_dir = get("RECIPEZ_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("static"));

        let profile_rate_limit = match get("RECIPEZ_PROFILE_RATE_LIMIT") {
            Some(v) => parse_positive(&v, "RECIPEZ_PROFILE_RATE_LIMIT")?,
            None => 10,
        };

        let profile_rate_window = match get("RECIPEZ_PROFILE_RATE_WINDOW_SECS") {
            Some(v) => Duration::from_secs(parse_positive(&v, "RECIPEZ_PROFILE_RATE_WINDOW_SECS")?.into()),
            None => Duration::from_secs(60),
        };

        let session_ttl = match get("RECIPEZ_SESSION_TTL_HOURS") {
            Some(v) => chrono::Duration::hours(parse_positive(&v, "RECIPEZ_SESSION_TTL_HOURS")?.into()),
            None => chrono::Duration::hours(12),
        };

        let db_pool_size = match get("RECIPEZ_DB_POOL_SIZE") {
            Some(v) => parse_positive(&v, "RECIPEZ_DB_POOL_SIZE")?,
            None => 10,
        };

        let run_migrations = match get("RECIPEZ_RUN_MIGRATIONS") {
            Some(v) => parse_bool(&v, "RECIPEZ_RUN_MIGRATIONS")?,
            None => true,
        };

        Ok(Self {
            environment,
            database_url,
            bind,
            workers,
            domain,
            session_cookie_secure,
            static_dir,
            profile_rate_limit,
            profile_rate_window,
            session_ttl,
            db_pool_size,
            run_migrations,
        })
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.static_dir.join("uploads")
    }
}

fn parse_bool(value: &str, var: &'static str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "expected a boolean",
        }),
    }
}

fn parse_positive(value: &str, var: &'static str) -> Result<u32, ConfigError> {
    match value.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigError::Invalid {
            var,
            value: value.to_string(),
            reason: "expected a positive integer",
        }),
    }
}
