//! Standard Shipping

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    customers::Customer,
    pricing::round_to_cents,
    shipping::{ShippingCalculator, ShippingError, free, weighted_cost},
};

const BASE_COST: Decimal = Decimal::TEN;
const RATE_PER_KG: Decimal = Decimal::from_parts(5, 0, 0, false, 0);

/// Ground shipping, offered to every customer.
///
/// Free when the customer qualifies for free shipping on the order total, otherwise
/// `10 + 5 per kg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardShipping;

impl ShippingCalculator for StandardShipping {
    fn method(&self) -> &'static str {
        "Standard Shipping"
    }

    fn estimated_delivery_days(&self) -> u32 {
        5
    }

    fn is_available(&self, _customer: &Customer) -> bool {
        true
    }

    fn calculate_cost<'a>(
        &self,
        customer: &Customer,
        order_total: &Money<'a, Currency>,
        weight_kg: Decimal,
    ) -> Result<Money<'a, Currency>, ShippingError> {
        if customer.is_eligible_for_free_shipping(order_total) {
            return Ok(free(order_total));
        }

        let cost = weighted_cost(BASE_COST, RATE_PER_KG, weight_kg)?;

        Ok(Money::from_decimal(
            round_to_cents(cost),
            order_total.currency(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::pricing::test_support::{corporate, premium, regular};

    use super::*;

    #[test]
    fn below_threshold_pays_weighted_rate() -> TestResult {
        let cost =
            StandardShipping.calculate_cost(&regular(), &Money::from_major(99, USD), Decimal::new(25, 1))?;

        assert_eq!(cost, Money::from_minor(2_250, USD));

        Ok(())
    }

    #[test]
    fn free_at_customer_threshold() -> TestResult {
        let weight = Decimal::new(25, 1);

        let regular = StandardShipping.calculate_cost(&regular(), &Money::from_major(100, USD), weight)?;
        let premium = StandardShipping.calculate_cost(&premium(), &Money::from_major(50, USD), weight)?;
        let corporate = StandardShipping.calculate_cost(&corporate(), &Money::from_major(1, USD), weight)?;

        assert_eq!(regular, Money::from_minor(0, USD));
        assert_eq!(premium, Money::from_minor(0, USD));
        assert_eq!(corporate, Money::from_minor(0, USD));

        Ok(())
    }
}
