use std::collections::HashMap;

use thiserror::Error;

use crate::app_config::{AppConfig, Environment};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; AetherBot/1.0)";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Tests drive this with a `HashMap` lookup instead of mutating the process env.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_addr = |var: &str, default: &str| -> Result<SocketAddr, ConfigError> {
        or_default(var, default)
            .parse::<SocketAddr>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("AETHER_ENV", "development"))?;

    let bind_addr = parse_addr("AETHER_BIND_ADDR", "0.0.0.0:3000")?;
    let log_level = or_default("AETHER_LOG_LEVEL", "info");

    let db_max_connections = parse_u32("AETHER_DB_MAX_CONNECTIONS", "10")?;
    let db_min_connections = parse_u32("AETHER_DB_MIN_CONNECTIONS", "1")?;
    let db_acquire_timeout_secs = parse_u64("AETHER_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("AETHER_SCRAPER_TIMEOUT_SECS", "10")?;
    let scraper_user_agent = or_default("AETHER_SCRAPER_USER_AGENT", DEFAULT_USER_AGENT);
    let scraper_max_concurrency = or_default("AETHER_SCRAPER_MAX_CONCURRENCY", "4")
        .parse::<usize>()
        .map_err(|e| invalid("AETHER_SCRAPER_MAX_CONCURRENCY", e.to_string()))?;
    if scraper_max_concurrency == 0 {
        return Err(invalid(
            "AETHER_SCRAPER_MAX_CONCURRENCY",
            "must be at least 1".to_string(),
        ));
    }

    let gemini_api_key = optional("GEMINI_API_KEY");
    let gemini_model = or_default("AETHER_GEMINI_MODEL", DEFAULT_GEMINI_MODEL);
    let gemini_base_url = or_default("AETHER_GEMINI_BASE_URL", DEFAULT_GEMINI_BASE_URL)
        .trim_end_matches('/')
        .to_string();
    let analysis_timeout_secs = parse_u64("AETHER_ANALYSIS_TIMEOUT_SECS", "60")?;
    let youtube_api_key = optional("YOUTUBE_API_KEY");

    let api_keys = parse_api_keys(&or_default("AETHER_API_KEYS", ""))?;
    if api_keys.is_empty() && !env.is_development() {
        return Err(ConfigError::MissingEnvVar("AETHER_API_KEYS".to_string()));
    }

    Ok(AppConfig {
        database_url,
        env,
        bind_addr,
        log_level,
        db_max_connections,
        db_min_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_concurrency,
        gemini_api_key,
        gemini_model,
        gemini_base_url,
        analysis_timeout_secs,
        youtube_api_key,
        api_keys,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "AETHER_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Parse `token=user_id` pairs separated by commas. Blank segments are skipped.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` when a segment lacks `=` or either side
/// is empty.
fn parse_api_keys(raw: &str) -> Result<HashMap<String, String>, ConfigError> {
    let mut keys = HashMap::new();
    for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let Some((token, user_id)) = segment.split_once('=') else {
            return Err(ConfigError::InvalidEnvVar {
                var: "AETHER_API_KEYS".to_string(),
                reason: "expected comma-separated token=user_id pairs".to_string(),
            });
        };
        let (token, user_id) = (token.trim(), user_id.trim());
        if token.is_empty() || user_id.is_empty() {
            return Err(ConfigError::InvalidEnvVar {
                var: "AETHER_API_KEYS".to_string(),
                reason: "token and user id must both be non-empty".to_string(),
            });
        }
        keys.insert(token.to_string(), user_id.to_string());
    }
    Ok(keys)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
