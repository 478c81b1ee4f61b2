//! Ledger configuration loaded from environment variables.

use thiserror::Error;

use crate::types::Address;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("configuration error: {0}")]
pub struct ConfigError(pub String);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerConfig {
    /// The single admin address (the initializing identity).
    pub admin: Address,
    /// Matching pool balance to seed at construction.
    pub initial_pool: i128,
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let admin = env_var("QF_ADMIN")
            .map(Address::new)
            .map_err(|_| ConfigError("QF_ADMIN environment variable is required".to_string()))?;

        let initial_pool: i128 = env_var("QF_INITIAL_POOL")
            .unwrap_or_else(|_| "0".to_string())
            .parse()
            .map_err(|_| ConfigError("Invalid QF_INITIAL_POOL".to_string()))?;

        if initial_pool < 0 {
            return Err(ConfigError("QF_INITIAL_POOL must be non-negative".to_string()));
        }

        Ok(LedgerConfig {
            admin,
            initial_pool,
        })
    }
}

fn env_var(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError(format!("Missing env var: {key}")))
}
