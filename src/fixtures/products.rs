//! Product Fixtures

use std::str::FromStr;

use rust_decimal::Decimal;
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Deserialize;

use crate::{
    fixtures::FixtureError,
    ids::ProductId,
    products::{Product, ProductSpecs},
};

/// Wrapper for products in YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductsFixture {
    /// Products in catalogue order
    pub products: Vec<ProductFixture>,
}

/// Product fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductFixture {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Manufacturer
    pub brand: String,

    /// Price with currency, e.g. `2499.00 USD`
    pub price: String,

    /// Units on hand
    pub stock: u32,

    /// Free-text description
    pub description: String,

    /// Category-specific attributes, tagged by `category`
    pub specs: ProductSpecs,
}

impl TryFrom<ProductFixture> for Product<'_> {
    type Error = FixtureError;

    fn try_from(fixture: ProductFixture) -> Result<Self, Self::Error> {
        let (amount, currency) = parse_price(&fixture.price)?;

        Ok(Product {
            id: fixture.id,
            name: fixture.name,
            brand: fixture.brand,
            base_price: Money::from_decimal(amount, currency),
            stock_quantity: fixture.stock,
            description: fixture.description,
            specs: fixture.specs,
        })
    }
}

/// Parse a price string like `2499.00 USD` into an amount and its currency.
///
/// # Errors
///
/// - [`FixtureError::InvalidPrice`]: the string is not `<amount> <code>` or the amount is
///   not a decimal.
/// - [`FixtureError::UnknownCurrency`]: the code is not an ISO currency.
pub fn parse_price(price: &str) -> Result<(Decimal, &'static Currency), FixtureError> {
    let (amount, code) = price
        .trim()
        .split_once(' ')
        .ok_or_else(|| FixtureError::InvalidPrice(price.to_string()))?;

    let amount =
        Decimal::from_str(amount).map_err(|_err| FixtureError::InvalidPrice(price.to_string()))?;

    let currency =
        iso::find(code.trim()).ok_or_else(|| FixtureError::UnknownCurrency(code.to_string()))?;

    Ok((amount, currency))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        assert_eq!(parse_price("2499.00 USD")?, (Decimal::new(249_900, 2), USD));
        assert_eq!(parse_price(" 79.99 GBP ")?, (Decimal::new(7999, 2), GBP));

        Ok(())
    }

    #[test]
    fn parse_price_rejects_malformed_input() {
        assert!(matches!(parse_price("2499.00"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(parse_price("lots USD"), Err(FixtureError::InvalidPrice(_))));
        assert!(matches!(
            parse_price("10.00 ZZZ"),
            Err(FixtureError::UnknownCurrency(code)) if code == "ZZZ"
        ));
    }
}
