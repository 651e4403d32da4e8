//! Express Shipping

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    customers::{Customer, CustomerKind, FreeShippingTier},
    pricing::round_to_cents,
    shipping::{ShippingCalculator, ShippingError, free, weighted_cost},
};

const BASE_COST: Decimal = Decimal::from_parts(25, 0, 0, false, 0);
const RATE_PER_KG: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// Two-day shipping for premium and corporate customers.
///
/// Customers always entitled to free shipping (corporate accounts) ship free; premium
/// customers get 20% off `25 + 12 per kg`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExpressShipping;

impl ExpressShipping {
    fn premium_discount() -> Percentage {
        Percentage::from(Decimal::new(20, 2))
    }
}

impl ShippingCalculator for ExpressShipping {
    fn method(&self) -> &'static str {
        "Express Shipping"
    }

    fn estimated_delivery_days(&self) -> u32 {
        2
    }

    fn is_available(&self, customer: &Customer) -> bool {
        matches!(
            customer.kind(),
            CustomerKind::Premium | CustomerKind::Corporate
        )
    }

    fn calculate_cost<'a>(
        &self,
        customer: &Customer,
        order_total: &Money<'a, Currency>,
        weight_kg: Decimal,
    ) -> Result<Money<'a, Currency>, ShippingError> {
        if customer.free_shipping_tier() == FreeShippingTier::Always {
            return Ok(free(order_total));
        }

        let mut cost = weighted_cost(BASE_COST, RATE_PER_KG, weight_kg)?;

        if customer.kind() == CustomerKind::Premium {
            let discount = (Self::premium_discount() * Decimal::ONE)
                .checked_mul(cost)
                .ok_or(ShippingError::Overflow)?;

            cost = cost.checked_sub(discount).ok_or(ShippingError::Overflow)?;
        }

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
    fn costs_by_customer_kind() -> TestResult {
        let total = Money::from_major(500, USD);
        let weight = Decimal::new(25, 1);

        // 25 + 2.5 × 12 = 55
        let regular = ExpressShipping.calculate_cost(&regular(), &total, weight)?;
        let premium = ExpressShipping.calculate_cost(&premium(), &total, weight)?;
        let corporate = ExpressShipping.calculate_cost(&corporate(), &total, weight)?;

        assert_eq!(regular, Money::from_minor(5_500, USD));
        assert_eq!(premium, Money::from_minor(4_400, USD));
        assert_eq!(corporate, Money::from_minor(0, USD));

        Ok(())
    }

    #[test]
    fn always_free_tier_ignores_total_and_weight() -> TestResult {
        let customer = corporate();
        let total = Money::from_major(1, USD);

        assert_eq!(customer.free_shipping_tier(), FreeShippingTier::Always);
        assert_eq!(
            ExpressShipping.calculate_cost(&customer, &total, Decimal::new(40, 0))?,
            Money::from_minor(0, USD)
        );

        Ok(())
    }

    #[test]
    fn two_day_delivery() {
        assert_eq!(ExpressShipping.estimated_delivery_days(), 2);
        assert_eq!(ExpressShipping.method(), "Express Shipping");
    }
}
