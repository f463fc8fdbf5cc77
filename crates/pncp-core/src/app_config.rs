use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Process-level settings read from the environment.
///
/// Pipeline parameters (organization filters, query window) live in the
/// separate parameter file at `params_path`; see [`crate::Parametros`].
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    /// Root directory holding `raw/` and `processed/` artifacts.
    pub data_dir: PathBuf,
    pub params_path: PathBuf,
    pub pncp_base_url: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    /// Total attempts per page, including the first. Never zero.
    pub max_attempts: u32,
    /// Delay before retry `n` is `backoff_step_secs * n` seconds.
    pub backoff_step_secs: u64,
}
