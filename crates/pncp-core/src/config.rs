use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_BASE_URL: &str = "https://pncp.gov.br/api/consulta";
pub const DEFAULT_USER_AGENT: &str = "pncp-monitor/0.1 (procurement-transparency)";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a numeric env var holds an unparseable value.
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
/// Returns `ConfigError` if a numeric env var holds an unparseable value.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("PNCP_ENV", "development"));
    let log_level = or_default("PNCP_LOG_LEVEL", "info");
    let data_dir = PathBuf::from(or_default("PNCP_DATA_DIR", "./data"));
    let params_path = PathBuf::from(or_default("PNCP_PARAMS_PATH", "./config/parametros.json"));
    let pncp_base_url = or_default("PNCP_BASE_URL", DEFAULT_BASE_URL);
    let user_agent = or_default("PNCP_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("PNCP_REQUEST_TIMEOUT_SECS", "60")?;
    let max_attempts = parse_u32("PNCP_MAX_ATTEMPTS", "3")?.max(1);
    let backoff_step_secs = parse_u64("PNCP_BACKOFF_STEP_SECS", "2")?;

    Ok(AppConfig {
        env,
        log_level,
        data_dir,
        params_path,
        pncp_base_url,
        request_timeout_secs,
        user_agent,
        max_attempts,
        backoff_step_secs,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
