//! Application configuration.
//!
//! Configuration is loaded from environment variables with fallback to defaults.
//!
//! | Variable              | Default          |
//! |-----------------------|------------------|
//! | `FOLIO_DB_PATH`       | `./folio.db`     |
//! | `FOLIO_BUSINESS_NAME` | `KETHU GROUPS`   |
//! | `FOLIO_TAX_RATE`      | `16.5`           |
//! | `FOLIO_CURRENCY`      | `MWK`            |

use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use folio_core::validation::validate_percentage;
use folio_core::{
    CompanyInfo, CurrencyFormat, Percentage, DEFAULT_BUSINESS_NAME, DEFAULT_CURRENCY_CODE,
    DEFAULT_TAX_RATE_PERCENT,
};

use crate::pool::DbConfig;

const DEFAULT_DB_PATH: &str = "./folio.db";

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// SQLite database file
    pub db_path: PathBuf,

    /// Business name used until a company profile is saved
    pub business_name: String,

    /// Tax rate pre-filled on new documents
    pub default_tax_rate: Percentage,

    /// How amounts are displayed
    pub currency: CurrencyFormat,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            business_name: DEFAULT_BUSINESS_NAME.to_string(),
            default_tax_rate: DEFAULT_TAX_RATE_PERCENT.parse().unwrap_or_default(),
            currency: CurrencyFormat::new(DEFAULT_CURRENCY_CODE),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from any key lookup (environment, file, test map).
    ///
    /// Unset or blank values fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = AppConfig::default();

        let default_tax_rate = match get("FOLIO_TAX_RATE") {
            Some(raw) => {
                let rate: Percentage = raw
                    .parse()
                    .map_err(|_| ConfigError::InvalidValue("FOLIO_TAX_RATE".to_string()))?;
                validate_percentage("FOLIO_TAX_RATE", rate)
                    .map_err(|_| ConfigError::InvalidValue("FOLIO_TAX_RATE".to_string()))?;
                rate
            }
            None => defaults.default_tax_rate,
        };

        let currency = match get("FOLIO_CURRENCY") {
            Some(code) if code.chars().all(|c| c.is_ascii_alphabetic()) => {
                CurrencyFormat::new(code.to_ascii_uppercase())
            }
            Some(_) => return Err(ConfigError::InvalidValue("FOLIO_CURRENCY".to_string())),
            None => defaults.currency,
        };

        Ok(AppConfig {
            db_path: get("FOLIO_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.db_path),
            business_name: get("FOLIO_BUSINESS_NAME").unwrap_or(defaults.business_name),
            default_tax_rate,
            currency,
        })
    }

    /// Pool configuration for [`crate::Database::new`].
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(self.db_path.clone())
    }

    /// Company profile to use before one has been saved.
    pub fn default_company(&self) -> CompanyInfo {
        CompanyInfo {
            name: self.business_name.clone(),
            ..CompanyInfo::default()
        }
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}")]
    InvalidValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn load(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();

        assert_eq!(config.db_path, PathBuf::from("./folio.db"));
        assert_eq!(config.business_name, "KETHU GROUPS");
        assert_eq!(config.default_tax_rate, Percentage::from(dec!(16.5)));
        assert_eq!(config.currency.code, "MWK");
        assert_eq!(config.currency.decimals, 2);
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("FOLIO_DB_PATH", "/var/lib/folio/data.db"),
            ("FOLIO_BUSINESS_NAME", "Kethu Groups Ltd"),
            ("FOLIO_TAX_RATE", "17.5"),
            ("FOLIO_CURRENCY", "zar"),
        ])
        .unwrap();

        assert_eq!(config.db_path, PathBuf::from("/var/lib/folio/data.db"));
        assert_eq!(config.default_company().name, "Kethu Groups Ltd");
        assert_eq!(config.default_tax_rate, Percentage::from(dec!(17.5)));
        assert_eq!(config.currency.code, "ZAR");
    }

    #[test]
    fn test_blank_values_use_defaults() {
        let config = load(&[("FOLIO_TAX_RATE", "  "), ("FOLIO_BUSINESS_NAME", "")]).unwrap();
        assert_eq!(config.business_name, "KETHU GROUPS");
        assert_eq!(config.default_tax_rate, Percentage::from(dec!(16.5)));
    }

    #[test]
    fn test_invalid_values() {
        for (key, value) in [
            ("FOLIO_TAX_RATE", "sixteen"),
            ("FOLIO_TAX_RATE", "120"),
            ("FOLIO_TAX_RATE", "-1"),
            ("FOLIO_CURRENCY", "M W K"),
        ] {
            match load(&[(key, value)]) {
                Err(ConfigError::InvalidValue(name)) => assert_eq!(name, key),
                other => panic!("{key}={value} gave {other:?}"),
            }
        }
    }

    #[test]
    fn test_db_config_uses_path() {
        let config = load(&[("FOLIO_DB_PATH", "/tmp/folio-test.db")]).unwrap();
        assert_eq!(
            config.db_config().database_path,
            PathBuf::from("/tmp/folio-test.db")
        );
    }
}
