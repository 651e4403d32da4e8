//! Promotional Pricing
//!
//! A named promotion: the promotional percentage comes off the list total first, then the
//! customer's own discount is taken off what remains.

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

/// Named promotional discount stacked with customer discounts
#[derive(Debug, Clone)]
pub struct PromotionalPricing {
    discount: Percentage,
    promotion_name: String,
}

impl PromotionalPricing {
    /// Create a promotion taking `discount` off the list total.
    pub fn new(discount: Percentage, promotion_name: impl Into<String>) -> Self {
        Self {
            discount,
            promotion_name: promotion_name.into(),
        }
    }

    /// Promotional discount as a fraction
    pub fn discount(&self) -> Percentage {
        self.discount
    }

    /// Promotion name
    pub fn promotion_name(&self) -> &str {
        &self.promotion_name
    }
}

impl PricingStrategy for PromotionalPricing {
    fn name(&self) -> String {
        format!("Promotional Pricing - {}", self.promotion_name)
    }

    fn description(&self) -> String {
        let points = (self.discount * Decimal::ONE_HUNDRED).round_dp(0);

        format!(
            "Special promotion '{}' with {points}% discount plus customer discounts",
            self.promotion_name
        )
    }

    fn calculate_price<'a>(
        &self,
        product: &Product<'a>,
        customer: &Customer,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let promoted = less_percent(raw_total(product, quantity)?, self.discount)?;
        let total = less_customer_discount(promoted, customer)?;

        Ok(priced(product, total))
    }
}
