//! Regular Pricing
//!
//! `base_price × quantity` less the customer's own discount.

use rusty_money::{Money, iso::Currency};

use crate::{
    customers::Customer,
    pricing::{PricingError, PricingStrategy, less_customer_discount, priced, raw_total},
    products::Product,
};

/// Standard pricing with customer-specific discounts applied
#[derive(Debug, Clone, Copy, Default)]
pub struct RegularPricing;

impl PricingStrategy for RegularPricing {
    fn name(&self) -> String {
        "Regular Pricing".to_string()
    }

    fn description(&self) -> String {
        "Standard pricing with customer-specific discounts applied".to_string()
    }

    fn calculate_price<'a>(
        &self,
        product: &Product<'a>,
        customer: &Customer,
        quantity: u32,
    ) -> Result<Money<'a, Currency>, PricingError> {
        let total = less_customer_discount(raw_total(product, quantity)?, customer)?;

        Ok(priced(product, total))
    }
}
