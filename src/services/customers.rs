//! Customers Service

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    customers::{Customer, CustomerError, CustomerKind, CustomerProfile},
    ids::CustomerId,
    repositories::CustomerRepository,
    validators::{CustomerValidator, ValidationErrors, Validator},
};

/// Errors raised by customer operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerServiceError {
    /// A customer with this id is already registered.
    #[error("customer {0} already exists")]
    AlreadyExists(CustomerId),

    /// The email is registered to another customer.
    #[error("email {0} is already registered to another customer")]
    EmailTaken(String),

    /// No customer with this id.
    #[error("customer not found: {0}")]
    NotFound(CustomerId),

    /// The customer failed validation.
    #[error("invalid customer: {0}")]
    Invalid(#[from] ValidationErrors),

    /// A tier-specific rule was broken.
    #[error(transparent)]
    Customer(#[from] CustomerError),
}

/// Customer registration and account management.
#[derive(Debug, Default)]
pub struct CustomerService {
    repository: CustomerRepository,
    validator: CustomerValidator,
}

impl CustomerService {
    /// Create an empty customer register.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new customer.
    ///
    /// # Errors
    ///
    /// - [`CustomerServiceError::Invalid`]: the customer failed validation.
    /// - [`CustomerServiceError::AlreadyExists`]: the id is taken.
    /// - [`CustomerServiceError::EmailTaken`]: the email is in use, ignoring case.
    #[tracing::instrument(
        name = "customers.service.register_customer",
        skip(self, customer),
        fields(customer_id = %customer.id, kind = %customer.kind()),
        err
    )]
    pub fn register_customer(&mut self, customer: Customer) -> Result<(), CustomerServiceError> {
        self.validator.validate(&customer)?;

        if self.repository.exists_by_id(customer.id.as_str()) {
            return Err(CustomerServiceError::AlreadyExists(customer.id));
        }

        if self.repository.email_exists(&customer.profile.email) {
            return Err(CustomerServiceError::EmailTaken(customer.profile.email));
        }

        info!(name = %customer.full_name(), "registered customer");

        self.repository.save(customer);

        Ok(())
    }

    /// Look up a customer.
    pub fn get_customer(&self, customer_id: &str) -> Option<&Customer> {
        self.repository.find_by_id(customer_id)
    }

    /// Look up a customer by email, ignoring case.
    pub fn get_customer_by_email(&self, email: &str) -> Option<&Customer> {
        self.repository.find_by_email(email)
    }

    /// Every customer.
    pub fn list_customers(&self) -> Vec<&Customer> {
        self.repository.iter().collect()
    }

    /// Customers of `kind`.
    pub fn customers_by_kind(&self, kind: CustomerKind) -> Vec<&Customer> {
        self.repository.find_by_kind(kind)
    }

    /// Customers whose name contains `query`, ignoring case.
    pub fn search_customers(&self, query: &str) -> Vec<&Customer> {
        self.repository.search_by_name(query)
    }

    /// Number of customers
    pub fn customer_count(&self) -> usize {
        self.repository.len()
    }

    /// Replace a customer's contact details.
    ///
    /// The new details are checked in full before anything is written, so a rejected update
    /// leaves the stored customer untouched.
    ///
    /// # Errors
    ///
    /// - [`CustomerServiceError::NotFound`]: unknown customer.
    /// - [`CustomerServiceError::EmailTaken`]: another customer uses the new email.
    /// - [`CustomerServiceError::Invalid`]: the new details failed validation.
    #[tracing::instrument(
        name = "customers.service.update_contact_info",
        skip(self, profile),
        err
    )]
    pub fn update_contact_info(
        &mut self,
        customer_id: &str,
        profile: CustomerProfile,
    ) -> Result<(), CustomerServiceError> {
        if !self.repository.exists_by_id(customer_id) {
            return Err(CustomerServiceError::NotFound(CustomerId::new(customer_id)));
        }

        let taken = self
            .repository
            .find_by_email(&profile.email)
            .is_some_and(|other| other.id.as_str() != customer_id);

        if taken {
            warn!(email = %profile.email, "email already registered");

            return Err(CustomerServiceError::EmailTaken(profile.email));
        }

        self.validator.validate_profile(&profile)?;

        let customer = self.customer_mut(customer_id)?;
        customer.profile = profile;

        info!(name = %customer.full_name(), "updated customer information");

        Ok(())
    }

    /// Draw on a corporate customer's credit account.
    ///
    /// # Errors
    ///
    /// - [`CustomerServiceError::NotFound`]: unknown customer.
    /// - [`CustomerServiceError::Customer`]: not a corporate customer, or the charge exceeds
    ///   the available credit.
    pub fn charge_credit(
        &mut self,
        customer_id: &str,
        amount: Decimal,
    ) -> Result<Decimal, CustomerServiceError> {
        let customer = self.customer_mut(customer_id)?;
        let kind = customer.kind();

        let credit = customer.credit_mut().ok_or(CustomerError::WrongTier {
            operation: "credit purchases",
            kind,
        })?;

        credit.charge(amount)?;

        Ok(credit.available())
    }

    /// Award loyalty points to a premium customer, returning the new balance.
    ///
    /// # Errors
    ///
    /// - [`CustomerServiceError::NotFound`]: unknown customer.
    /// - [`CustomerServiceError::Customer`]: not a premium customer.
    pub fn award_loyalty_points(
        &mut self,
        customer_id: &str,
        points: u32,
    ) -> Result<u32, CustomerServiceError> {
        let customer = self.customer_mut(customer_id)?;

        customer.add_loyalty_points(points)?;

        Ok(customer.loyalty_points().unwrap_or_default())
    }

    /// Redeem a premium customer's loyalty points, returning the new balance.
    ///
    /// # Errors
    ///
    /// - [`CustomerServiceError::NotFound`]: unknown customer.
    /// - [`CustomerServiceError::Customer`]: not a premium customer, or too few points.
    pub fn redeem_loyalty_points(
        &mut self,
        customer_id: &str,
        points: u32,
    ) -> Result<u32, CustomerServiceError> {
        let customer = self.customer_mut(customer_id)?;

        customer.redeem_points(points)?;

        Ok(customer.loyalty_points().unwrap_or_default())
    }

    /// Underlying repository, for reporting.
    pub fn repository(&self) -> &CustomerRepository {
        &self.repository
    }

    fn customer_mut(&mut self, customer_id: &str) -> Result<&mut Customer, CustomerServiceError> {
        self.repository
            .find_by_id_mut(customer_id)
            .ok_or_else(|| CustomerServiceError::NotFound(CustomerId::new(customer_id)))
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn profile(email: &str) -> CustomerProfile {
        CustomerProfile {
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            phone: "+1234567890".to_string(),
            address: "123 Main St, Anytown, USA".to_string(),
        }
    }

    fn service() -> TestResult<CustomerService> {
        let mut service = CustomerService::new();

        service.register_customer(Customer::regular("REG001", profile("john.doe@email.com")))?;
        service.register_customer(Customer::premium("PREM001", profile("jane@email.com"), 500))?;
        service.register_customer(Customer::corporate(
            "CORP001",
            profile("alice@techcorp.com"),
            "TechCorp Inc.",
            "TAX123456",
            Decimal::new(10_000, 0),
        ))?;

        Ok(service)
    }

    #[test]
    fn duplicate_email_is_rejected_ignoring_case() -> TestResult {
        let mut service = service()?;

        let result =
            service.register_customer(Customer::regular("REG002", profile("JOHN.DOE@EMAIL.COM")));

        assert_eq!(
            result,
            Err(CustomerServiceError::EmailTaken("JOHN.DOE@EMAIL.COM".to_string()))
        );
        assert_eq!(service.customer_count(), 3);

        Ok(())
    }

    #[test]
    fn duplicate_id_is_rejected() -> TestResult {
        let mut service = service()?;

        let result = service.register_customer(Customer::regular("REG001", profile("new@email.com")));

        assert_eq!(
            result,
            Err(CustomerServiceError::AlreadyExists(CustomerId::new("REG001")))
        );

        Ok(())
    }

    #[test]
    fn invalid_update_leaves_customer_unchanged() -> TestResult {
        let mut service = service()?;

        let mut update = profile("john.new@email.com");
        update.address = "short".to_string();

        let result = service.update_contact_info("REG001", update);

        assert!(matches!(result, Err(CustomerServiceError::Invalid(_))));
        assert_eq!(
            service.get_customer("REG001").map(|c| c.profile.email.as_str()),
            Some("john.doe@email.com")
        );

        Ok(())
    }

    #[test]
    fn update_rejects_email_of_another_customer() -> TestResult {
        let mut service = service()?;

        let result = service.update_contact_info("REG001", profile("Jane@Email.com"));

        assert_eq!(
            result,
            Err(CustomerServiceError::EmailTaken("Jane@Email.com".to_string()))
        );

        service.update_contact_info("REG001", profile("John.Doe@Email.com"))?;

        assert!(service.get_customer_by_email("john.doe@email.com").is_some());

        Ok(())
    }

    #[test]
    fn credit_and_points_errors_propagate() -> TestResult {
        let mut service = service()?;

        assert_eq!(
            service.charge_credit("CORP001", Decimal::new(4_000, 0))?,
            Decimal::new(6_000, 0)
        );
        assert!(matches!(
            service.charge_credit("CORP001", Decimal::new(6_001, 0)),
            Err(CustomerServiceError::Customer(CustomerError::CreditLimitExceeded { .. }))
        ));
        assert!(matches!(
            service.charge_credit("REG001", Decimal::ONE),
            Err(CustomerServiceError::Customer(CustomerError::WrongTier { .. }))
        ));

        assert_eq!(service.award_loyalty_points("PREM001", 100)?, 600);
        assert_eq!(service.redeem_loyalty_points("PREM001", 600)?, 0);
        assert!(matches!(
            service.redeem_loyalty_points("PREM001", 1),
            Err(CustomerServiceError::Customer(CustomerError::InsufficientPoints { .. }))
        ));

        Ok(())
    }

    #[test]
    fn queries() -> TestResult {
        let service = service()?;

        assert_eq!(service.customers_by_kind(CustomerKind::Corporate).len(), 1);
        assert_eq!(service.search_customers("john").len(), 3);
        assert_eq!(service.list_customers().len(), 3);

        Ok(())
    }
}
