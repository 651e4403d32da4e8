//! Customers
//!
//! A customer is a shared [`CustomerProfile`] plus a [`CustomerTier`] carrying the data and
//! rules that differ between regular, premium and corporate accounts. Callers ask the customer
//! what it is entitled to (discount, free shipping) instead of inspecting the tier themselves.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::ids::CustomerId;

/// Orders needed before a regular customer may be upgraded.
const PREMIUM_UPGRADE_ORDER_COUNT: usize = 5;

/// Errors raised by tier-specific customer operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerError {
    /// Charging would take used credit past the limit.
    #[error("credit limit exceeded: requested {requested}, available {available}")]
    CreditLimitExceeded {
        /// Amount requested
        requested: Decimal,

        /// Credit still available
        available: Decimal,
    },

    /// A payment larger than the outstanding balance.
    #[error("payment amount {payment} exceeds current credit {balance}")]
    PaymentExceedsBalance {
        /// Amount paid
        payment: Decimal,

        /// Outstanding balance
        balance: Decimal,
    },

    /// Not enough loyalty points to redeem.
    #[error("insufficient loyalty points: requested {requested}, available {available}")]
    InsufficientPoints {
        /// Points requested
        requested: u32,

        /// Points held
        available: u32,
    },

    /// Negative amounts are not accepted for credit operations.
    #[error("amount must not be negative: {0}")]
    NegativeAmount(Decimal),

    /// The operation only applies to another tier.
    #[error("{operation} is not available for {kind}")]
    WrongTier {
        /// Operation attempted
        operation: &'static str,

        /// Actual customer kind
        kind: CustomerKind,
    },
}

/// The closed set of customer kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CustomerKind {
    /// No discount, free shipping over $100
    Regular,

    /// 10% discount, free shipping over $50, loyalty points
    Premium,

    /// 15% discount, free shipping always, credit account
    Corporate,
}

impl CustomerKind {
    /// Display name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            CustomerKind::Regular => "Regular Customer",
            CustomerKind::Premium => "Premium Customer",
            CustomerKind::Corporate => "Corporate Customer",
        }
    }
}

impl fmt::Display for CustomerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a customer qualifies for free shipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeShippingTier {
    /// Never free
    Never,

    /// Free once the order total reaches this amount (major units)
    Threshold(Decimal),

    /// Always free
    Always,
}

impl FreeShippingTier {
    /// Whether an order of `order_total` ships free under this tier.
    pub fn is_free_for(self, order_total: &Money<'_, Currency>) -> bool {
        match self {
            FreeShippingTier::Never => false,
            FreeShippingTier::Threshold(threshold) => *order_total.amount() >= threshold,
            FreeShippingTier::Always => true,
        }
    }
}

/// Corporate credit account. Invariant: `used <= limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditAccount {
    limit: Decimal,
    used: Decimal,
}

impl CreditAccount {
    /// Open an account with nothing drawn.
    pub fn new(limit: Decimal) -> Self {
        Self {
            limit: limit.max(Decimal::ZERO),
            used: Decimal::ZERO,
        }
    }

    /// Credit limit
    pub fn limit(&self) -> Decimal {
        self.limit
    }

    /// Credit currently drawn
    pub fn used(&self) -> Decimal {
        self.used
    }

    /// Credit still available
    pub fn available(&self) -> Decimal {
        self.limit - self.used
    }

    /// Whether `amount` could be charged right now.
    pub fn can_purchase_on_credit(&self, amount: Decimal) -> bool {
        self.available() >= amount
    }

    /// Draw `amount` against the account.
    ///
    /// # Errors
    ///
    /// - [`CustomerError::NegativeAmount`]: `amount` is negative.
    /// - [`CustomerError::CreditLimitExceeded`]: the charge would exceed the limit.
    pub fn charge(&mut self, amount: Decimal) -> Result<(), CustomerError> {
        if amount.is_sign_negative() {
            return Err(CustomerError::NegativeAmount(amount));
        }

        if !self.can_purchase_on_credit(amount) {
            return Err(CustomerError::CreditLimitExceeded {
                requested: amount,
                available: self.available(),
            });
        }

        self.used += amount;

        Ok(())
    }

    /// Pay `amount` back.
    ///
    /// # Errors
    ///
    /// - [`CustomerError::NegativeAmount`]: `amount` is negative.
    /// - [`CustomerError::PaymentExceedsBalance`]: more than the outstanding balance.
    pub fn pay(&mut self, amount: Decimal) -> Result<(), CustomerError> {
        if amount.is_sign_negative() {
            return Err(CustomerError::NegativeAmount(amount));
        }

        if amount > self.used {
            return Err(CustomerError::PaymentExceedsBalance {
                payment: amount,
                balance: self.used,
            });
        }

        self.used -= amount;

        Ok(())
    }
}

/// Tier-specific customer data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomerTier {
    /// Regular customer
    Regular,

    /// Premium customer
    Premium {
        /// Accumulated loyalty points
        loyalty_points: u32,
    },

    /// Corporate customer
    Corporate {
        /// Company name
        company_name: String,

        /// Company tax id
        tax_id: String,

        /// Credit account
        credit: CreditAccount,
    },
}

impl CustomerTier {
    /// Kind tag for this tier.
    pub fn kind(&self) -> CustomerKind {
        match self {
            CustomerTier::Regular => CustomerKind::Regular,
            CustomerTier::Premium { .. } => CustomerKind::Premium,
            CustomerTier::Corporate { .. } => CustomerKind::Corporate,
        }
    }
}

/// Contact details shared by every customer kind.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CustomerProfile {
    /// Given name
    pub first_name: String,

    /// Family name
    pub last_name: String,

    /// Email address, unique across customers (case-insensitive)
    pub email: String,

    /// Phone number
    pub phone: String,

    /// Postal address
    pub address: String,
}

/// Customer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Customer id
    pub id: CustomerId,

    /// Contact details
    pub profile: CustomerProfile,

    /// Tier-specific data
    pub tier: CustomerTier,
}

impl Customer {
    /// Create a regular customer.
    pub fn regular(id: impl Into<CustomerId>, profile: CustomerProfile) -> Self {
        Self {
            id: id.into(),
            profile,
            tier: CustomerTier::Regular,
        }
    }

    /// Create a premium customer with an opening points balance.
    pub fn premium(id: impl Into<CustomerId>, profile: CustomerProfile, loyalty_points: u32) -> Self {
        Self {
            id: id.into(),
            profile,
            tier: CustomerTier::Premium { loyalty_points },
        }
    }

    /// Create a corporate customer with an unused credit account.
    pub fn corporate(
        id: impl Into<CustomerId>,
        profile: CustomerProfile,
        company_name: impl Into<String>,
        tax_id: impl Into<String>,
        credit_limit: Decimal,
    ) -> Self {
        Self {
            id: id.into(),
            profile,
            tier: CustomerTier::Corporate {
                company_name: company_name.into(),
                tax_id: tax_id.into(),
                credit: CreditAccount::new(credit_limit),
            },
        }
    }

    /// Kind tag
    pub fn kind(&self) -> CustomerKind {
        self.tier.kind()
    }

    /// Display name of the customer kind.
    pub fn customer_type(&self) -> &'static str {
        self.kind().as_str()
    }

    /// Discount in percent points (0, 10 or 15).
    pub fn discount_percent(&self) -> Decimal {
        match self.tier {
            CustomerTier::Regular => Decimal::ZERO,
            CustomerTier::Premium { .. } => Decimal::TEN,
            CustomerTier::Corporate { .. } => Decimal::new(15, 0),
        }
    }

    /// Discount as a fraction.
    pub fn discount(&self) -> Percentage {
        Percentage::from(self.discount_percent() / Decimal::ONE_HUNDRED)
    }

    /// Free shipping entitlement.
    pub fn free_shipping_tier(&self) -> FreeShippingTier {
        match self.tier {
            CustomerTier::Regular => FreeShippingTier::Threshold(Decimal::ONE_HUNDRED),
            CustomerTier::Premium { .. } => FreeShippingTier::Threshold(Decimal::new(50, 0)),
            CustomerTier::Corporate { .. } => FreeShippingTier::Always,
        }
    }

    /// Whether an order of `order_total` ships free for this customer.
    pub fn is_eligible_for_free_shipping(&self, order_total: &Money<'_, Currency>) -> bool {
        self.free_shipping_tier().is_free_for(order_total)
    }

    /// `first last`
    pub fn full_name(&self) -> String {
        format!("{} {}", self.profile.first_name, self.profile.last_name)
    }

    /// `Email: ..., Phone: ...`
    pub fn contact_info(&self) -> String {
        format!("Email: {}, Phone: {}", self.profile.email, self.profile.phone)
    }

    /// Regular customers qualify for premium after enough orders.
    pub fn can_upgrade_to_premium(&self, order_count: usize) -> bool {
        matches!(self.tier, CustomerTier::Regular) && order_count >= PREMIUM_UPGRADE_ORDER_COUNT
    }

    /// Loyalty points held, if this is a premium customer.
    pub fn loyalty_points(&self) -> Option<u32> {
        match self.tier {
            CustomerTier::Premium { loyalty_points } => Some(loyalty_points),
            _ => None,
        }
    }

    /// Credit account, if this is a corporate customer.
    pub fn credit(&self) -> Option<&CreditAccount> {
        match &self.tier {
            CustomerTier::Corporate { credit, .. } => Some(credit),
            _ => None,
        }
    }

    /// Mutable credit account, if this is a corporate customer.
    pub fn credit_mut(&mut self) -> Option<&mut CreditAccount> {
        match &mut self.tier {
            CustomerTier::Corporate { credit, .. } => Some(credit),
            _ => None,
        }
    }

    /// Award loyalty points.
    ///
    /// # Errors
    ///
    /// Returns [`CustomerError::WrongTier`] for non-premium customers.
    pub fn add_loyalty_points(&mut self, points: u32) -> Result<(), CustomerError> {
        let kind = self.kind();

        match &mut self.tier {
            CustomerTier::Premium { loyalty_points } => {
                *loyalty_points = loyalty_points.saturating_add(points);
                Ok(())
            }
            _ => Err(CustomerError::WrongTier {
                operation: "loyalty points",
                kind,
            }),
        }
    }

    /// Whether `points` could be redeemed.
    pub fn can_redeem_points(&self, points: u32) -> bool {
        self.loyalty_points().is_some_and(|held| held >= points)
    }

    /// Redeem loyalty points.
    ///
    /// # Errors
    ///
    /// - [`CustomerError::WrongTier`]: not a premium customer.
    /// - [`CustomerError::InsufficientPoints`]: fewer points held than requested.
    pub fn redeem_points(&mut self, points: u32) -> Result<(), CustomerError> {
        let kind = self.kind();

        let CustomerTier::Premium { loyalty_points } = &mut self.tier else {
            return Err(CustomerError::WrongTier {
                operation: "loyalty points",
                kind,
            });
        };

        *loyalty_points = loyalty_points
            .checked_sub(points)
            .ok_or(CustomerError::InsufficientPoints {
                requested: points,
                available: *loyalty_points,
            })?;

        Ok(())
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tier {
            CustomerTier::Corporate { company_name, .. } => write!(
                f,
                "{}{{id='{}', company='{}', contact='{}', email='{}'}}",
                self.customer_type(),
                self.id,
                company_name,
                self.full_name(),
                self.profile.email
            ),
            _ => write!(
                f,
                "{}{{id='{}', name='{}', email='{}'}}",
                self.customer_type(),
                self.id,
                self.full_name(),
                self.profile.email
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            first_name: "Jane".to_string(),
            last_name: "Smith".to_string(),
            email: "jane.smith@email.com".to_string(),
            phone: "+1234567891".to_string(),
            address: "456 Oak Ave, Somewhere, USA".to_string(),
        }
    }

    #[test]
    fn discounts_by_kind() {
        let regular = Customer::regular("REG001", profile());
        let premium = Customer::premium("PREM001", profile(), 500);
        let corporate = Customer::corporate("CORP001", profile(), "TechCorp", "TAX1", Decimal::ONE_THOUSAND);

        assert_eq!(regular.discount_percent(), Decimal::ZERO);
        assert_eq!(premium.discount_percent(), Decimal::TEN);
        assert_eq!(corporate.discount_percent(), Decimal::new(15, 0));
        assert_eq!(premium.discount() * Decimal::ONE_HUNDRED, Decimal::TEN);
    }

    #[test]
    fn free_shipping_thresholds() {
        let regular = Customer::regular("REG001", profile());
        let premium = Customer::premium("PREM001", profile(), 0);
        let corporate = Customer::corporate("CORP001", profile(), "TechCorp", "TAX1", Decimal::ZERO);

        let forty = Money::from_major(40, USD);
        let fifty = Money::from_major(50, USD);
        let hundred = Money::from_major(100, USD);

        assert!(!regular.is_eligible_for_free_shipping(&fifty));
        assert!(regular.is_eligible_for_free_shipping(&hundred));
        assert!(!premium.is_eligible_for_free_shipping(&forty));
        assert!(premium.is_eligible_for_free_shipping(&fifty));
        assert!(corporate.is_eligible_for_free_shipping(&Money::from_major(0, USD)));
        assert!(!FreeShippingTier::Never.is_free_for(&hundred));
    }

    #[test]
    fn credit_account_respects_limit() -> TestResult {
        let customer =
            Customer::corporate("CORP001", profile(), "TechCorp", "TAX1", Decimal::ONE_THOUSAND);

        assert_eq!(customer.credit().map(CreditAccount::limit), Some(Decimal::ONE_THOUSAND));

        let mut credit = CreditAccount::new(Decimal::ONE_THOUSAND);
        credit.charge(Decimal::new(600, 0))?;

        let result = credit.charge(Decimal::new(500, 0));

        assert_eq!(
            result,
            Err(CustomerError::CreditLimitExceeded {
                requested: Decimal::new(500, 0),
                available: Decimal::new(400, 0),
            })
        );
        assert_eq!(credit.used(), Decimal::new(600, 0));
        assert!(credit.used() <= credit.limit());

        credit.pay(Decimal::new(100, 0))?;
        assert_eq!(credit.available(), Decimal::new(500, 0));

        assert!(matches!(
            credit.pay(Decimal::ONE_THOUSAND),
            Err(CustomerError::PaymentExceedsBalance { .. })
        ));

        Ok(())
    }

    #[test]
    fn negative_credit_amounts_are_rejected() {
        let mut credit = CreditAccount::new(Decimal::ONE_HUNDRED);

        assert_eq!(
            credit.charge(Decimal::NEGATIVE_ONE),
            Err(CustomerError::NegativeAmount(Decimal::NEGATIVE_ONE))
        );
    }

    #[test]
    fn loyalty_points_redeem() -> TestResult {
        let mut customer = Customer::premium("PREM001", profile(), 500);

        customer.add_loyalty_points(100)?;
        assert!(customer.can_redeem_points(600));

        customer.redeem_points(250)?;
        assert_eq!(customer.loyalty_points(), Some(350));

        assert_eq!(
            customer.redeem_points(351),
            Err(CustomerError::InsufficientPoints {
                requested: 351,
                available: 350
            })
        );
        assert_eq!(customer.loyalty_points(), Some(350));

        Ok(())
    }

    #[test]
    fn loyalty_points_require_premium() {
        let mut customer = Customer::regular("REG001", profile());

        assert_eq!(
            customer.add_loyalty_points(10),
            Err(CustomerError::WrongTier {
                operation: "loyalty points",
                kind: CustomerKind::Regular
            })
        );
        assert!(!customer.can_redeem_points(0));
    }

    #[test]
    fn upgrade_eligibility() {
        let regular = Customer::regular("REG001", profile());
        let premium = Customer::premium("PREM001", profile(), 0);

        assert!(!regular.can_upgrade_to_premium(4));
        assert!(regular.can_upgrade_to_premium(5));
        assert!(!premium.can_upgrade_to_premium(10));
    }

    #[test]
    fn display_includes_company_for_corporate() {
        let corporate = Customer::corporate("CORP001", profile(), "TechCorp Inc.", "TAX1", Decimal::ZERO);

        assert_eq!(corporate.full_name(), "Jane Smith");
        assert!(corporate.to_string().contains("company='TechCorp Inc.'"));
        assert_eq!(
            corporate.contact_info(),
            "Email: jane.smith@email.com, Phone: +1234567891"
        );
    }
}
