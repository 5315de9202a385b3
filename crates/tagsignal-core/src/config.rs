use std::path::PathBuf;
use std::str::FromStr;

use crate::app_config::{AppConfig, Environment};
use crate::signal_config::{load_signal_config, SignalConfig};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a variable is present but cannot be parsed.
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
/// Returns `ConfigError` if a variable is present but cannot be parsed.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let env = parse_environment(&or_default("TAGSIGNAL_ENV", "development"))?;
    let log_level = or_default("TAGSIGNAL_LOG_LEVEL", "info");
    let signal_config_path = lookup("TAGSIGNAL_SIGNAL_CONFIG")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);

    let worker_threads =
        parse_optional::<usize, _>(&lookup, "TAGSIGNAL_WORKER_THREADS")?.filter(|&n| n > 0);
    let min_item_count = parse_optional::<usize, _>(&lookup, "TAGSIGNAL_MIN_ITEM_COUNT")?;
    let tag_min_confidence = parse_optional::<f64, _>(&lookup, "TAGSIGNAL_TAG_MIN_CONFIDENCE")?;
    let market_min_confidence =
        parse_optional::<f64, _>(&lookup, "TAGSIGNAL_MARKET_MIN_CONFIDENCE")?;

    Ok(AppConfig {
        env,
        log_level,
        signal_config_path,
        worker_threads,
        min_item_count,
        tag_min_confidence,
        market_min_confidence,
    })
}

/// Parse an optional env var; absent means `None`, present-but-garbage is an error.
fn parse_optional<T, F>(lookup: &F, var: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match lookup(var) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            }),
        Err(_) => Ok(None),
    }
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "TAGSIGNAL_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

/// Resolve the effective [`SignalConfig`] for a run.
///
/// Starts from the YAML file named by `signal_config_path` (or the built-in
/// defaults), applies the env overrides carried by `app`, then validates.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read or parsed, or if the
/// resulting configuration fails validation.
pub fn resolve_signal_config(app: &AppConfig) -> Result<SignalConfig, ConfigError> {
    let mut config = match &app.signal_config_path {
        Some(path) => load_signal_config(path)?,
        None => SignalConfig::default(),
    };

    if let Some(n) = app.min_item_count {
        config.tags.min_item_count = n;
    }
    if let Some(c) = app.tag_min_confidence {
        config.tags.min_confidence = c;
    }
    if let Some(c) = app.market_min_confidence {
        config.market.min_confidence = c;
    }

    config.validate()?;
    Ok(config)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
