//! Bulk Pricing
//!
//! Regular pricing, then a further flat percentage off once the quantity reaches the bulk
//! threshold.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::{
    customers::Customer,
    pricing::{
        PricingError, PricingStrategy, less_customer_discount, less_percent, priced, raw_total,
    },
    products::Product,
};

/// Default quantity at which the bulk discount starts.
pub const BULK_THRESHOLD: u32 = 5;

/// Regular pricing with an extra discount for large quantities
#[derive(Debug, Clone, Copy)]
pub struct BulkPricing {
    threshold: u32,
    discount: Percentage,
}

impl BulkPricing {
    /// Bulk pricing with a custom threshold and discount.
    pub fn new(threshold: u32, discount: Percentage) -> Self {
        Self {
            threshold,
            discount,
        }
    }

    /// Minimum quantity for the bulk discount.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

impl Default for BulkPricing {
    /// 5% off orders of 5 or more units.
    fn default() -> Self {
        Self::new(BULK_THRESHOLD, Percentage::from(Decimal::new(5, 2)))
    }
}

impl PricingStrategy for BulkPricing {
    fn name(&self) -> String {
        "Bulk Pricing".to_string()
    }

    fn description(&self) -> String {
        let points = (self.discount * Decimal::ONE_HUNDRED).round_dp(0);

        format!(
            "Regular pricing with additional {points}% discount for orders of {}+ items",
            self.threshold
        )
    }

    fn calculate_price<'a>(
        &self,
        product: &Product<'a>,
        customer: &Customer,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let mut total = less_customer_discount(raw_total(product, quantity)?, customer)?;

        if quantity >= self.threshold {
            total = less_percent(total, self.discount)?;
        }

        Ok(priced(product, total))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::pricing::{
        RegularPricing,
        test_support::{corporate, laptop, premium, regular},
    };

    use super::*;

    #[test]
    fn below_threshold_matches_regular() -> TestResult {
        let product = laptop(249_900);
        let customer = premium();

        let bulk = BulkPricing::default().calculate_price(&product, &customer, 3)?;
        let regular = RegularPricing.calculate_price(&product, &customer, 3)?;

        assert_eq!(bulk, regular);
        assert_eq!(bulk, Money::from_minor(674_730, USD));

        Ok(())
    }

    #[test]
    fn price_does_not_increase_with_customer_discount() -> TestResult {
        let product = laptop(12_345);
        let bulk = BulkPricing::default();

        for quantity in [4, 5, 9] {
            let regular = bulk.calculate_price(&product, &regular(), quantity)?;
            let premium = bulk.calculate_price(&product, &premium(), quantity)?;
            let corporate = bulk.calculate_price(&product, &corporate(), quantity)?;

            assert!(premium.amount() <= regular.amount(), "premium at {quantity}");
            assert!(corporate.amount() <= premium.amount(), "corporate at {quantity}");
        }

        Ok(())
    }

    #[test]
    fn at_threshold_takes_extra_five_percent() -> TestResult {
        // 5 × 1899.00 × 0.85 × 0.95 = 7667.2125
        let price = BulkPricing::default().calculate_price(&laptop(189_900), &corporate(), 5)?;

        assert_eq!(price, Money::from_minor(766_721, USD));

        Ok(())
    }

    #[test]
    fn bulk_never_exceeds_regular_at_threshold() -> TestResult {
        let product = laptop(7_999);

        for customer in [regular(), premium(), corporate()] {
            for quantity in [5, 6, 10, 25] {
                let bulk = BulkPricing::default().calculate_price(&product, &customer, quantity)?;
                let regular = RegularPricing.calculate_price(&product, &customer, quantity)?;

                assert!(
                    bulk.amount() <= regular.amount(),
                    "bulk {bulk} > regular {regular} for quantity {quantity}"
                );
            }
        }

        Ok(())
    }

    #[test]
    fn description_mentions_threshold() {
        assert_eq!(
            BulkPricing::default().description(),
            "Regular pricing with additional 5% discount for orders of 5+ items"
        );
    }
}
