//! Shipping
//!
//! Interchangeable shipping options. Each calculator decides for itself which customers it
//! serves and what it charges them, asking the customer about its entitlements rather than
//! its concrete kind where it can.

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::customers::Customer;

pub mod express;
pub mod overnight;
pub mod standard;

pub use express::ExpressShipping;
pub use overnight::OvernightShipping;
pub use standard::StandardShipping;

/// Errors that can occur while costing a shipment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShippingError {
    /// Parcel weights cannot be negative.
    #[error("parcel weight must not be negative, got {0} kg")]
    NegativeWeight(Decimal),

    /// Decimal arithmetic overflowed.
    #[error("shipping cost calculation overflowed")]
    Overflow,
}

/// A shipping option.
pub trait ShippingCalculator: fmt::Debug {
    /// Display name of the method, e.g. `Standard Shipping`.
    fn method(&self) -> &'static str;

    /// Business days until delivery.
    fn estimated_delivery_days(&self) -> u32;

    /// Whether this option may be offered to `customer`.
    fn is_available(&self, customer: &Customer) -> bool;

    /// Cost of shipping an order of `order_total` weighing `weight_kg` to `customer`.
    ///
    /// The result is in the currency of `order_total`.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::NegativeWeight`]: `weight_kg` is negative.
    /// - [`ShippingError::Overflow`]: the arithmetic cannot be represented.
    fn calculate_cost<'a>(
        &self,
        customer: &Customer,
        order_total: &Money<'a, Currency>,
        weight_kg: Decimal,
    ) -> Result<Money<'a, Currency>, ShippingError>;
}

/// The calculators a store registers by default, in evaluation order.
pub fn default_calculators() -> Vec<Box<dyn ShippingCalculator>> {
    vec![
        Box::new(StandardShipping),
        Box::new(ExpressShipping),
        Box::new(OvernightShipping),
    ]
}

/// Pick the first calculator available to `customer`, falling back to the first registered one.
///
/// Returns `None` only when `calculators` is empty.
pub fn select_calculator<'c>(
    calculators: &'c [Box<dyn ShippingCalculator>],
    customer: &Customer,
) -> Option<&'c dyn ShippingCalculator> {
    calculators
        .iter()
        .find(|calculator| calculator.is_available(customer))
        .or_else(|| calculators.first())
        .map(|calculator| &**calculator)
}

/// A priced shipping option offered to a customer.
#[derive(Debug, Clone, PartialEq)]
pub struct ShippingQuote<'a> {
    /// Method name
    pub method: &'static str,

    /// Business days until delivery
    pub estimated_delivery_days: u32,

    /// Cost, or `None` when the option is not available to the customer
    pub cost: Option<Money<'a, Currency>>,
}

/// Quote every calculator for `customer`, marking the ones they cannot use.
///
/// # Errors
///
/// Propagates the first [`ShippingError`] raised by an available calculator.
pub fn quote_all<'a>(
    calculators: &[Box<dyn ShippingCalculator>],
    customer: &Customer,
    order_total: &Money<'a, Currency>,
    weight_kg: Decimal,
) -> Result<Vec<ShippingQuote<'a>>, ShippingError> {
    calculators
        .iter()
        .map(|calculator| -> Result<ShippingQuote<'a>, ShippingError> {
            let cost = if calculator.is_available(customer) {
                Some(calculator.calculate_cost(customer, order_total, weight_kg)?)
            } else {
                None
            };

            Ok(ShippingQuote {
                method: calculator.method(),
                estimated_delivery_days: calculator.estimated_delivery_days(),
                cost,
            })
        })
        .collect()
}

/// `base + weight × rate`, unrounded.
pub(crate) fn weighted_cost(
    base: Decimal,
    rate_per_kg: Decimal,
    weight_kg: Decimal,
) -> Result<Decimal, ShippingError> {
    if weight_kg.is_sign_negative() {
        return Err(ShippingError::NegativeWeight(weight_kg));
    }

    weight_kg
        .checked_mul(rate_per_kg)
        .and_then(|variable| variable.checked_add(base))
        .ok_or(ShippingError::Overflow)
}

pub(crate) fn free<'a>(order_total: &Money<'a, Currency>) -> Money<'a, Currency> {
    Money::from_minor(0, order_total.currency())
}
