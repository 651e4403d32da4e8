//! Customer Fixtures

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{
    customers::{Customer, CustomerProfile},
    ids::CustomerId,
};

/// Wrapper for customers in YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomersFixture {
    /// Customers in registration order
    pub customers: Vec<CustomerFixture>,
}

/// Customer fixture from YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CustomerFixture {
    /// Customer id
    pub id: CustomerId,

    /// Contact details
    pub profile: CustomerProfile,

    /// Tier and its data
    pub tier: TierFixture,
}

/// Tier fixture, tagged by `type`
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum TierFixture {
    /// Regular customer
    Regular,

    /// Premium customer
    Premium {
        /// Starting loyalty points
        #[serde(default)]
        loyalty_points: u32,
    },

    /// Corporate customer
    Corporate {
        /// Company name
        company_name: String,

        /// Company tax id
        tax_id: String,

        /// Credit limit in store currency
        credit_limit: Decimal,
    },
}

impl From<CustomerFixture> for Customer {
    fn from(fixture: CustomerFixture) -> Self {
        match fixture.tier {
            TierFixture::Regular => Customer::regular(fixture.id, fixture.profile),
            TierFixture::Premium { loyalty_points } => {
                Customer::premium(fixture.id, fixture.profile, loyalty_points)
            }
            TierFixture::Corporate {
                company_name,
                tax_id,
                credit_limit,
            } => Customer::corporate(
                fixture.id,
                fixture.profile,
                company_name,
                tax_id,
                credit_limit,
            ),
        }
    }
}
