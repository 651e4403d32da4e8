//! Integration tests for loading store configuration from disk.

use std::fs;

use rust_decimal::Decimal;
use rusty_money::iso::EUR;
use testresult::TestResult;

use pcstore::prelude::*;

#[test]
fn repository_config_matches_defaults() -> TestResult {
    let config = StoreConfig::load("config/store.yml")?;

    assert_eq!(config, StoreConfig::default());

    Ok(())
}

#[test]
fn config_file_drives_store_setup() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("store.yml");

    fs::write(
        &path,
        "currency: EUR\nenvironment: production\nassumed_parcel_weight_kg: 4\npromotion:\n  name: Spring Sale\n  percent: 10\npackaging:\n  capacity: 2\n  default_size: large\nlogging:\n  level: debug\n  format: json\n",
    )?;

    let config = StoreConfig::load(&path)?;

    assert_eq!(config.currency()?, EUR);
    assert_eq!(config.environment, Environment::Production);
    assert_eq!(config.logging.format, LogFormat::Json);
    assert_eq!(config.packaging.default_size, BoxSize::Large);

    let store = Store::from_config(&config)?;

    assert_eq!(store.orders().currency(), EUR);
    assert_eq!(store.orders().parcel_weight_kg(), Decimal::new(4, 0));

    let names: Vec<String> = store
        .orders()
        .pricing_strategies()
        .iter()
        .map(|strategy| strategy.name())
        .collect();

    assert_eq!(
        names,
        [
            "Regular Pricing",
            "Bulk Pricing",
            "Promotional Pricing - Spring Sale"
        ]
    );

    Ok(())
}

#[test]
fn missing_config_file_is_reported() {
    let result = StoreConfig::load("config/does-not-exist.yml");

    assert!(matches!(result, Err(ConfigError::Io { .. })));
}
