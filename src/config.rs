//! Ledger configuration.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::str::FromStr;

use thiserror::Error;

use crate::query::DEFAULT_LIMIT;

pub const DEFAULT_SERVICE_BUFFER: usize = 100;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LedgerConfig {
    /// Capacity of the transaction service's request channel
    pub service_buffer: usize,
    /// Page size used when a listing request does not give one
    pub default_page_limit: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            service_buffer: DEFAULT_SERVICE_BUFFER,
            default_page_limit: DEFAULT_LIMIT,
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables, after an optional `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            service_buffer: load_var("STOCK_LEDGER_SERVICE_BUFFER", DEFAULT_SERVICE_BUFFER)?,
            default_page_limit: load_var("STOCK_LEDGER_DEFAULT_PAGE_LIMIT", DEFAULT_LIMIT)?,
        })
    }

    /// Small buffers so tests exercise back-pressure.
    pub fn test() -> Self {
        Self {
            service_buffer: 8,
            default_page_limit: DEFAULT_LIMIT,
        }
    }
}

fn load_var<T: FromStr + PartialOrd + Default>(
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => parse_positive(name, &raw),
        Err(_) => Ok(default),
    }
}

fn parse_positive<T: FromStr + PartialOrd + Default>(
    name: &'static str,
    raw: &str,
) -> Result<T, ConfigError> {
    let invalid = || ConfigError::Invalid {
        name,
        value: raw.to_string(),
    };
    let value = raw.trim().parse::<T>().map_err(|_| invalid())?;
    if value <= T::default() {
        return Err(invalid());
    }
    Ok(value)
}
