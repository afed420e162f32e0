use std::path::PathBuf;

use crate::app_config::EngineConfig;
use crate::ConfigError;

/// Load engine configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_engine_config() -> Result<EngineConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_engine_config_from_env()
}

/// Load engine configuration from environment variables already in the process.
///
/// Unlike [`load_engine_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_engine_config_from_env() -> Result<EngineConfig, ConfigError> {
    build_engine_config(|key| std::env::var(key))
}

/// Build engine configuration using the provided env-var lookup function.
///
/// Every variable is optional; defaults come from [`EngineConfig::default`].
fn build_engine_config<F>(lookup: F) -> Result<EngineConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let defaults = EngineConfig::default();

    let parse_usize = |var: &str, default: usize| -> Result<usize, ConfigError> {
        match lookup(var) {
            Ok(raw) => raw
                .trim()
                .parse::<usize>()
                .map_err(|e| ConfigError::InvalidEnvVar {
                    var: var.to_string(),
                    reason: e.to_string(),
                }),
            Err(_) => Ok(default),
        }
    };

    let min_text_len = parse_usize("SENTREND_MIN_TEXT_LEN", defaults.min_text_len)?;
    let trend_window = parse_usize("SENTREND_TREND_WINDOW", defaults.trend_window)?;
    if trend_window == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SENTREND_TREND_WINDOW".to_string(),
            reason: "window must be at least 1".to_string(),
        });
    }
    let sample_size = parse_usize("SENTREND_SAMPLE_SIZE", defaults.sample_size)?;

    let log_level = lookup("SENTREND_LOG_LEVEL").unwrap_or(defaults.log_level);
    let queries_path = lookup("SENTREND_QUERIES_PATH")
        .map(PathBuf::from)
        .unwrap_or(defaults.queries_path);
    let output_dir = lookup("SENTREND_OUTPUT_DIR")
        .map(PathBuf::from)
        .unwrap_or(defaults.output_dir);

    Ok(EngineConfig {
        min_text_len,
        trend_window,
        log_level,
        queries_path,
        output_dir,
        sample_size,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
