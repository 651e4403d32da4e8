//! Pricing
//!
//! Interchangeable policies for turning a product, a customer and a quantity into a line
//! price. Strategies hold no order state, so the same inputs always give the same price.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, RoundingStrategy};
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::{customers::Customer, products::Product};

pub mod bulk;
pub mod promotional;
pub mod regular;

pub use bulk::BulkPricing;
pub use promotional::PromotionalPricing;
pub use regular::RegularPricing;

/// Errors that can occur while pricing a line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PricingError {
    /// Decimal arithmetic overflowed.
    #[error("price calculation overflowed")]
    Overflow,
}

/// A price-computation policy.
pub trait PricingStrategy: fmt::Debug {
    /// Short name shown on order summaries.
    fn name(&self) -> String;

    /// One-line explanation of the policy.
    fn description(&self) -> String;

    /// Price `quantity` units of `product` for `customer`, rounded to cents (half-up).
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the arithmetic cannot be represented.
    fn calculate_price<'a>(
        &self,
        product: &Product<'a>,
        customer: &Customer,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, PricingError>;
}

/// The strategies a store registers by default, in evaluation order.
pub fn default_strategies(promotion: PromotionalPricing) -> Vec<Box<dyn PricingStrategy>> {
    vec![
        Box::new(RegularPricing),
        Box::new(BulkPricing::default()),
        Box::new(promotion),
    ]
}

/// Round to two decimal places, halves away from zero.
pub fn round_to_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// `base_price × quantity`, unrounded.
pub(crate) fn raw_total(product: &Product<'_>, quantity: u32) -> Result<Decimal, PricingError> {
    product
        .base_price
        .amount()
        .checked_mul(Decimal::from(quantity))
        .ok_or(PricingError::Overflow)
}

/// Take `percent` off `amount`, unrounded.
pub(crate) fn less_percent(amount: Decimal, percent: Percentage) -> Result<Decimal, PricingError> {
    let discount = (percent * Decimal::ONE)
        .checked_mul(amount)
        .ok_or(PricingError::Overflow)?;

    amount.checked_sub(discount).ok_or(PricingError::Overflow)
}

/// Take the customer's own discount off `amount`, if they have one.
pub(crate) fn less_customer_discount(
    amount: Decimal,
    customer: &Customer,
) -> Result<Decimal, PricingError> {
    if customer.discount_percent() > Decimal::ZERO {
        less_percent(amount, customer.discount())
    } else {
        Ok(amount)
    }
}

/// Wrap a computed amount in the product's currency, rounded to cents.
pub(crate) fn priced<'a>(product: &Product<'a>, amount: Decimal) -> Money<'a, Currency> {
    Money::from_decimal(round_to_cents(amount), product.base_price.currency())
}


#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn rounding_is_half_up() {
        assert_eq!(round_to_cents(Decimal::new(5_735_205, 3)), Decimal::new(573_521, 2));
        assert_eq!(round_to_cents(Decimal::new(5_735_204, 3)), Decimal::new(573_520, 2));
        assert_eq!(round_to_cents(Decimal::new(100, 2)), Decimal::new(100, 2));
    }

    #[test]
    fn less_percent_takes_fraction_off() -> Result<(), PricingError> {
        let amount = less_percent(Decimal::new(200, 0), Percentage::from(Decimal::new(25, 2)))?;

        assert_eq!(amount, Decimal::new(150, 0));

        Ok(())
    }

    #[test]
    fn default_strategies_are_ordered() {
        let strategies = default_strategies(PromotionalPricing::new(
            Percentage::from(Decimal::new(15, 2)),
            "Holiday Special",
        ));

        let names: Vec<String> = strategies.iter().map(|s| s.name()).collect();

        assert_eq!(
            names,
            [
                "Regular Pricing",
                "Bulk Pricing",
                "Promotional Pricing - Holiday Special"
            ]
        );
    }
}
