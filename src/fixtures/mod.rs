//! Fixtures

use std::{fs, path::PathBuf};

use rusty_money::iso::Currency;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::{
    customers::Customer,
    fixtures::{customers::CustomersFixture, orders::OrdersFixture, products::ProductsFixture},
    products::Product,
};

pub mod customers;
pub mod orders;
pub mod products;

pub use orders::{OrderScript, ScriptedItem};

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Product not found
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer not found
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Currency mismatch between products
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No products loaded yet
    #[error("No products loaded yet; currency unknown")]
    NoCurrency,
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Products in file order
    products: Vec<Product<'a>>,

    /// Customers in file order
    customers: Vec<Customer>,

    /// Scripted orders in file order
    orders: Vec<OrderScript>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            products: Vec::new(),
            customers: Vec::new(),
            orders: Vec::new(),
            currency: None,
        }
    }

    fn read<T: DeserializeOwned>(&self, kind: &str, name: &str) -> Result<T, FixtureError> {
        let file_path = self.base_path.join(kind).join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;

        Ok(serde_norway::from_str(&contents)?)
    }

    /// Load products from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if there are currency mismatches.
    pub fn load_products(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: ProductsFixture = self.read("products", name)?;

        for product_fixture in fixture.products {
            let (_amount, currency) = products::parse_price(&product_fixture.price)?;

            if let Some(existing_currency) = self.currency {
                if existing_currency != currency {
                    return Err(FixtureError::CurrencyMismatch(
                        existing_currency.iso_alpha_code.to_string(),
                        currency.iso_alpha_code.to_string(),
                    ));
                }
            } else {
                self.currency = Some(currency);
            }

            self.products.push(product_fixture.try_into()?);
        }

        Ok(self)
    }

    /// Load customers from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_customers(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: CustomersFixture = self.read("customers", name)?;

        self.customers
            .extend(fixture.customers.into_iter().map(Customer::from));

        Ok(self)
    }

    /// Load scripted orders from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if an order references a
    /// customer or product that has not been loaded.
    pub fn load_orders(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let fixture: OrdersFixture = self.read("orders", name)?;

        for script in fixture.orders {
            if self.customer(script.customer.as_str()).is_none() {
                return Err(FixtureError::CustomerNotFound(
                    script.customer.into_string(),
                ));
            }

            if let Some(item) = script
                .items
                .iter()
                .find(|item| self.product(item.product.as_str()).is_none())
            {
                return Err(FixtureError::ProductNotFound(item.product.to_string()));
            }

            self.orders.push(script);
        }

        Ok(self)
    }

    /// Load a complete fixture set (products, customers and orders with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn load_set(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        self.load_products(name)?
            .load_customers(name)?
            .load_orders(name)
    }

    /// Load a complete fixture set from the default base path
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture.load_set(name)?;

        Ok(fixture)
    }

    /// Get a product by id
    pub fn product(&self, id: &str) -> Option<&Product<'a>> {
        self.products.iter().find(|product| product.id.as_str() == id)
    }

    /// Get a customer by id
    pub fn customer(&self, id: &str) -> Option<&Customer> {
        self.customers
            .iter()
            .find(|customer| customer.id.as_str() == id)
    }

    /// Get all products
    pub fn products(&self) -> &[Product<'a>] {
        &self.products
    }

    /// Get all customers
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Get all scripted orders
    pub fn orders(&self) -> &[OrderScript] {
        &self.orders
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no products have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}
