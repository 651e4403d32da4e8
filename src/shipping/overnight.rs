//! Overnight Shipping

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    customers::{Customer, CustomerKind},
    shipping::{ShippingCalculator, ShippingError, free},
};

const FLAT_RATE: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const FREE_FROM: Decimal = Decimal::ONE_THOUSAND;

/// Next-day shipping for corporate customers, free on orders of $1000 or more.
#[derive(Debug, Clone, Copy, Default)]
pub struct OvernightShipping;

impl ShippingCalculator for OvernightShipping {
    fn method(&self) -> &'static str {
        "Overnight Shipping"
    }

    fn estimated_delivery_days(&self) -> u32 {
        1
    }

    fn is_available(&self, customer: &Customer) -> bool {
        customer.kind() == CustomerKind::Corporate
    }

    fn calculate_cost<'a>(
        &self,
        customer: &Customer,
        order_total: &Money<'a, Currency>,
        weight_kg: Decimal,
    ) -> Result<Money<'a, Currency>, ShippingError> {
        if weight_kg.is_sign_negative() {
            return Err(ShippingError::NegativeWeight(weight_kg));
        }

        if customer.kind() == CustomerKind::Corporate && *order_total.amount() >= FREE_FROM {
            return Ok(free(order_total));
        }

        Ok(Money::from_decimal(FLAT_RATE, order_total.currency()))
    }
}
