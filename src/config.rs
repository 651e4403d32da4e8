//! Store Config
//!
//! Settings are read once from YAML (or defaulted) and handed to the store by reference.

use std::{fmt, fs, path::Path};

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    packaging::BoxSize, pricing::PromotionalPricing, services::orders::DEFAULT_PARCEL_WEIGHT_KG,
};

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that was read
        path: String,

        /// Underlying error
        source: std::io::Error,
    },

    /// The YAML could not be parsed.
    #[error("failed to parse config: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// The currency code is not a known ISO currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),

    /// The parcel weight is negative.
    #[error("assumed parcel weight must not be negative, got {0}")]
    NegativeParcelWeight(Decimal),

    /// The promotion percentage is outside 0..=100.
    #[error("promotion percent must be between 0 and 100, got {0}")]
    PromotionPercentOutOfRange(Decimal),

    /// The packaging pool must hold at least one box.
    #[error("packaging capacity must be greater than zero")]
    ZeroPackagingCapacity,
}

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    /// Local development
    #[default]
    Development,

    /// Live store
    Production,

    /// Automated tests
    Test,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Environment::Development => "development",
            Environment::Production => "production",
            Environment::Test => "test",
        })
    }
}

/// Log output format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Compact, human-readable logs.
    #[default]
    Compact,

    /// Structured JSON logs.
    Json,
}

/// Logging settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Level used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    pub level: String,

    /// Output format
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

/// The store-wide promotion priced alongside the regular and bulk strategies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PromotionConfig {
    /// Promotion name
    pub name: String,

    /// Discount in percentage points, e.g. `15` for 15%
    pub percent: Decimal,
}

impl Default for PromotionConfig {
    fn default() -> Self {
        Self {
            name: "Holiday Special".to_string(),
            percent: Decimal::new(15, 0),
        }
    }
}

impl PromotionConfig {
    /// Pricing strategy for this promotion.
    pub fn strategy(&self) -> PromotionalPricing {
        PromotionalPricing::new(
            Percentage::from(self.percent / Decimal::ONE_HUNDRED),
            self.name.clone(),
        )
    }
}

/// Packaging pool settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackagingConfig {
    /// Idle boxes kept for reuse
    pub capacity: usize,

    /// Size handed out
    pub default_size: BoxSize,
}

impl Default for PackagingConfig {
    fn default() -> Self {
        Self {
            capacity: 5,
            default_size: BoxSize::Medium,
        }
    }
}

/// Store configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// ISO 4217 currency code for every price in the store
    pub currency: String,

    /// Deployment environment
    pub environment: Environment,

    /// Parcel weight used when costing shipping, in kilograms
    pub assumed_parcel_weight_kg: Decimal,

    /// Store-wide promotion
    pub promotion: PromotionConfig,

    /// Packaging pool
    pub packaging: PackagingConfig,

    /// Logging
    pub logging: LoggingConfig,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            currency: "USD".to_string(),
            environment: Environment::default(),
            assumed_parcel_weight_kg: DEFAULT_PARCEL_WEIGHT_KG,
            promotion: PromotionConfig::default(),
            packaging: PackagingConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Parse and validate a YAML document. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if the YAML is malformed or a value is out of range.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_norway::from_str(yaml)?;

        config.validate()?;

        Ok(config)
    }

    /// Read and validate a YAML config file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`StoreConfig::from_yaml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();

        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_yaml_str(&contents)
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.currency()?;

        if self.assumed_parcel_weight_kg.is_sign_negative() {
            return Err(ConfigError::NegativeParcelWeight(
                self.assumed_parcel_weight_kg,
            ));
        }

        if self.promotion.percent < Decimal::ZERO || self.promotion.percent > Decimal::ONE_HUNDRED
        {
            return Err(ConfigError::PromotionPercentOutOfRange(
                self.promotion.percent,
            ));
        }

        if self.packaging.capacity == 0 {
            return Err(ConfigError::ZeroPackagingCapacity);
        }

        Ok(())
    }

    /// Store currency.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownCurrency`] if the code is not an ISO currency.
    pub fn currency(&self) -> Result<&'static Currency, ConfigError> {
        iso::find(&self.currency).ok_or_else(|| ConfigError::UnknownCurrency(self.currency.clone()))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::GBP;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn defaults_match_demo_store() -> TestResult {
        let config = StoreConfig::default();

        assert_eq!(config.currency()?.iso_alpha_code, "USD");
        assert_eq!(config.assumed_parcel_weight_kg, Decimal::new(25, 1));
        assert_eq!(config.promotion.name, "Holiday Special");
        assert_eq!(config.packaging.default_size, BoxSize::Medium);
        assert_eq!(config.logging.format, LogFormat::Compact);

        Ok(())
    }

    #[test]
    fn partial_yaml_keeps_other_defaults() -> TestResult {
        let config = StoreConfig::from_yaml_str(
            "currency: GBP\nenvironment: test\npromotion:\n  name: Black Friday Sale\n  percent: 20\n",
        )?;

        assert_eq!(config.currency()?, GBP);
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.promotion.percent, Decimal::new(20, 0));
        assert_eq!(config.packaging, PackagingConfig::default());
        assert_eq!(
            config.promotion.strategy().discount() * Decimal::ONE,
            Decimal::new(20, 2)
        );

        Ok(())
    }

    #[test]
    fn unknown_currency_is_rejected() {
        let result = StoreConfig::from_yaml_str("currency: XYZ\n");

        assert!(matches!(result, Err(ConfigError::UnknownCurrency(code)) if code == "XYZ"));
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(matches!(
            StoreConfig::from_yaml_str("assumed_parcel_weight_kg: -1\n"),
            Err(ConfigError::NegativeParcelWeight(_))
        ));
        assert!(matches!(
            StoreConfig::from_yaml_str("promotion:\n  percent: 120\n"),
            Err(ConfigError::PromotionPercentOutOfRange(_))
        ));
        assert!(matches!(
            StoreConfig::from_yaml_str("packaging:\n  capacity: 0\n"),
            Err(ConfigError::ZeroPackagingCapacity)
        ));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            StoreConfig::from_yaml_str("currencies: USD\n"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
