pub mod app_config;
pub mod config;
pub mod facts;
pub mod normalize;
pub mod parametros;

use thiserror::Error;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use facts::{CollectionStatus, ContractFact, FlagSet, SupplierAggregate};
pub use normalize::{normalize_text, parse_money, try_parse_money, MoneyParseError};
pub use parametros::{load_parametros, Parametros};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
