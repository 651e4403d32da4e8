//! Validators
//!
//! Field-level checks run before a record is admitted to a repository. Every failing rule is
//! reported, not just the first, so callers can show the full list at once.

use std::{fmt, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    customers::{Customer, CustomerProfile},
    products::Product,
};

static EMAIL: LazyLock<Result<Regex, regex::Error>> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_+&*-]+(?:\.[a-zA-Z0-9_+&*-]+)*@(?:[a-zA-Z0-9-]+\.)+[a-zA-Z]{2,7}$")
});

static PHONE: LazyLock<Result<Regex, regex::Error>> =
    LazyLock::new(|| Regex::new(r"^[+]?[0-9]{10,15}$"));

/// A single failed rule.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Product id shorter than 3 characters
    #[error("Invalid product ID: must be at least 3 characters.")]
    ProductId,

    /// Product name shorter than 2 characters
    #[error("Invalid product name: must be at least 2 characters.")]
    ProductName,

    /// Blank brand
    #[error("Invalid brand: cannot be empty.")]
    Brand,

    /// Zero or negative price
    #[error("Invalid price: must be greater than 0.")]
    Price,

    /// Blank description
    #[error("Invalid description: cannot be empty.")]
    Description,

    /// Customer id shorter than 3 characters
    #[error("Invalid customer ID: must be at least 3 characters.")]
    CustomerId,

    /// First name shorter than 2 characters
    #[error("Invalid first name: must be at least 2 characters.")]
    FirstName,

    /// Last name shorter than 2 characters
    #[error("Invalid last name: must be at least 2 characters.")]
    LastName,

    /// Malformed email address
    #[error("Invalid email format.")]
    Email,

    /// Malformed phone number
    #[error("Invalid phone number format.")]
    Phone,

    /// Address shorter than 10 characters
    #[error("Invalid address: must be at least 10 characters.")]
    Address,
}

/// Every rule a record failed, in check order.
#[derive(Debug, Error, Clone, Default, PartialEq, Eq)]
#[error("{}", join(.0))]
pub struct ValidationErrors(SmallVec<[ValidationIssue; 4]>);

fn join(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl ValidationErrors {
    /// Failed rules
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.0
    }

    /// Whether `issue` was reported.
    pub fn contains(&self, issue: ValidationIssue) -> bool {
        self.0.contains(&issue)
    }

    /// Whether no rule failed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn check(&mut self, passed: bool, issue: ValidationIssue) {
        if !passed {
            self.0.push(issue);
        }
    }

    fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

/// Validates records of type `T`.
pub trait Validator<T: ?Sized>: fmt::Debug {
    /// Check every rule against `record`.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each failed rule.
    fn validate(&self, record: &T) -> Result<(), ValidationErrors>;
}

/// Product rules
#[derive(Debug, Clone, Copy, Default)]
pub struct ProductValidator;

impl ProductValidator {
    /// Whether `product` has at least `quantity` units on hand.
    pub fn is_stock_sufficient(product: &Product<'_>, quantity: u32) -> bool {
        product.has_stock_for(quantity)
    }

    /// Whether `product` costs no more than `max_price`.
    pub fn is_price_reasonable(product: &Product<'_>, max_price: &Money<'_, Currency>) -> bool {
        product.base_price.amount() <= max_price.amount()
    }
}

impl Validator<Product<'_>> for ProductValidator {
    fn validate(&self, product: &Product<'_>) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(min_chars(product.id.as_str(), 3), ValidationIssue::ProductId);
        errors.check(min_chars(&product.name, 2), ValidationIssue::ProductName);
        errors.check(!is_blank(&product.brand), ValidationIssue::Brand);
        errors.check(
            *product.base_price.amount() > Decimal::ZERO,
            ValidationIssue::Price,
        );
        errors.check(!is_blank(&product.description), ValidationIssue::Description);

        errors.into_result()
    }
}

/// Customer rules
#[derive(Debug, Clone, Copy, Default)]
pub struct CustomerValidator;

impl CustomerValidator {
    /// Check the contact details alone, e.g. before updating them.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] listing each failed rule.
    pub fn validate_profile(&self, profile: &CustomerProfile) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_profile(&mut errors, profile);

        errors.into_result()
    }
}

impl Validator<Customer> for CustomerValidator {
    fn validate(&self, customer: &Customer) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        errors.check(min_chars(customer.id.as_str(), 3), ValidationIssue::CustomerId);
        check_profile(&mut errors, &customer.profile);

        errors.into_result()
    }
}

fn check_profile(errors: &mut ValidationErrors, profile: &CustomerProfile) {
    errors.check(min_chars(&profile.first_name, 2), ValidationIssue::FirstName);
    errors.check(min_chars(&profile.last_name, 2), ValidationIssue::LastName);
    errors.check(is_valid_email(&profile.email), ValidationIssue::Email);
    errors.check(is_valid_phone(&profile.phone), ValidationIssue::Phone);
    errors.check(min_chars(&profile.address, 10), ValidationIssue::Address);
}

/// Whether `email` is a well-formed address.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL
        .as_ref()
        .is_ok_and(|pattern| pattern.is_match(email))
}

/// Whether `phone` is 10 to 15 digits with an optional leading `+`, ignoring spaces and dashes.
pub fn is_valid_phone(phone: &str) -> bool {
    let compact: String = phone
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect();

    PHONE
        .as_ref()
        .is_ok_and(|pattern| pattern.is_match(&compact))
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

fn min_chars(value: &str, min: usize) -> bool {
    !is_blank(value) && value.chars().count() >= min
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{ids::ProductId, products::ProductSpecs};

    use super::*;

    fn profile() -> CustomerProfile {
        CustomerProfile {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: "john.doe@email.com".to_string(),
            phone: "+1234567890".to_string(),
            address: "123 Main St, Anytown, USA".to_string(),
        }
    }

    fn product<'a>() -> Product<'a> {
        Product {
            id: ProductId::new("AC001"),
            name: "Wireless Mouse".to_string(),
            brand: "Logitech".to_string(),
            base_price: Money::from_minor(7_999, USD),
            stock_quantity: 50,
            description: "Ergonomic wireless mouse".to_string(),
            specs: ProductSpecs::Accessory {
                accessory_type: "Mouse".to_string(),
                compatibility: "Universal".to_string(),
                color: "Black".to_string(),
                wireless: true,
            },
        }
    }

    #[test]
    fn valid_records_pass() {
        assert_eq!(ProductValidator.validate(&product()), Ok(()));
        assert_eq!(
            CustomerValidator.validate(&Customer::regular("REG001", profile())),
            Ok(())
        );
    }

    #[test]
    fn product_errors_accumulate_in_order() -> TestResult {
        let mut product = product();
        product.id = ProductId::new("A1");
        product.brand = "   ".to_string();
        product.base_price = Money::from_minor(0, USD);

        let errors = ProductValidator
            .validate(&product)
            .err()
            .ok_or("expected validation to fail")?;

        assert_eq!(
            errors.issues(),
            [
                ValidationIssue::ProductId,
                ValidationIssue::Brand,
                ValidationIssue::Price
            ]
        );
        assert_eq!(
            errors.to_string(),
            "Invalid product ID: must be at least 3 characters. Invalid brand: cannot be empty. Invalid price: must be greater than 0."
        );

        Ok(())
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("alice@techcorp.com"));
        assert!(is_valid_email("first.last+tag@mail.example.org"));
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a@b.c"));
        assert!(!is_valid_email("dot.@example.com"));
    }

    #[test]
    fn phone_ignores_spaces_and_dashes() {
        assert!(is_valid_phone("+1234567890"));
        assert!(is_valid_phone("+1 234-567-8901"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+12345abc890"));
    }

    #[test]
    fn profile_validation_reports_each_field() -> TestResult {
        let bad = CustomerProfile {
            first_name: "J".to_string(),
            last_name: "D".to_string(),
            email: "bad".to_string(),
            phone: "123".to_string(),
            address: "short".to_string(),
        };

        let errors = CustomerValidator
            .validate_profile(&bad)
            .err()
            .ok_or("expected validation to fail")?;

        assert_eq!(errors.issues().len(), 5);
        assert!(errors.contains(ValidationIssue::Address));
        assert!(!errors.contains(ValidationIssue::CustomerId));

        Ok(())
    }

    #[test]
    fn stock_and_price_helpers() {
        let product = product();

        assert!(ProductValidator::is_stock_sufficient(&product, 50));
        assert!(!ProductValidator::is_stock_sufficient(&product, 51));
        assert!(ProductValidator::is_price_reasonable(
            &product,
            &Money::from_major(100, USD)
        ));
    }
}
