//! Products Service

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    ids::ProductId,
    notifications::{StockNotifier, StockObserver, SubscriptionKey},
    products::{Category, Product, ProductError},
    repositories::ProductRepository,
    validators::{ProductValidator, ValidationErrors, Validator},
};

/// Errors raised by product operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductServiceError {
    /// A product with this id is already registered.
    #[error("product {0} already exists")]
    AlreadyExists(ProductId),

    /// No product with this id.
    #[error("product not found: {0}")]
    NotFound(ProductId),

    /// The product failed validation.
    #[error("invalid product: {0}")]
    Invalid(#[from] ValidationErrors),

    /// Not enough units on hand.
    #[error("insufficient stock for {product_name}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product name
        product_name: String,

        /// Units requested
        requested: u32,

        /// Units on hand
        available: u32,
    },

    /// A stock or price rule was broken.
    #[error(transparent)]
    Product(#[from] ProductError),
}

/// Product catalogue and stock keeping.
#[derive(Debug, Default)]
pub struct ProductService<'a> {
    repository: ProductRepository<'a>,
    validator: ProductValidator,
    notifier: StockNotifier,
}

impl<'a> ProductService<'a> {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new product.
    ///
    /// # Errors
    ///
    /// - [`ProductServiceError::Invalid`]: the product failed validation.
    /// - [`ProductServiceError::AlreadyExists`]: the id is taken.
    #[tracing::instrument(
        name = "products.service.add_product",
        skip(self, product),
        fields(product_id = %product.id),
        err
    )]
    pub fn add_product(&mut self, product: Product<'a>) -> Result<(), ProductServiceError> {
        self.validator.validate(&product)?;

        if self.repository.exists_by_id(product.id.as_str()) {
            return Err(ProductServiceError::AlreadyExists(product.id));
        }

        info!(name = %product.name, "added product");

        self.repository.save(product);

        Ok(())
    }

    /// Look up a product.
    pub fn get_product(&self, product_id: &str) -> Option<&Product<'a>> {
        self.repository.find_by_id(product_id)
    }

    /// Every product.
    pub fn list_products(&self) -> Vec<&Product<'a>> {
        self.repository.iter().collect()
    }

    /// Products in `category`.
    pub fn products_by_category(&self, category: Category) -> Vec<&Product<'a>> {
        self.repository.find_by_category(category)
    }

    /// Products by `brand`, ignoring case.
    pub fn products_by_brand(&self, brand: &str) -> Vec<&Product<'a>> {
        self.repository.find_by_brand(brand)
    }

    /// Products with stock on hand.
    pub fn available_products(&self) -> Vec<&Product<'a>> {
        self.repository.find_in_stock()
    }

    /// Products priced within `min..=max`.
    pub fn products_in_price_range(&self, min: Decimal, max: Decimal) -> Vec<&Product<'a>> {
        self.repository.find_by_price_range(min, max)
    }

    /// Products whose name contains `query`, ignoring case.
    pub fn search_products(&self, query: &str) -> Vec<&Product<'a>> {
        self.repository.search_by_name(query)
    }

    /// Number of products
    pub fn product_count(&self) -> usize {
        self.repository.len()
    }

    /// Number of products with stock on hand
    pub fn in_stock_count(&self) -> usize {
        self.repository.in_stock_count()
    }

    /// Change a product's price. Existing order lines keep the price they were added at.
    ///
    /// # Errors
    ///
    /// - [`ProductServiceError::NotFound`]: unknown product.
    /// - [`ProductServiceError::Product`]: the price is not positive or in another currency.
    pub fn update_price(
        &mut self,
        product_id: &str,
        price: Money<'a, Currency>,
    ) -> Result<(), ProductServiceError> {
        let product = self.product_mut(product_id)?;

        product.set_base_price(price)?;

        info!(product_id, price = %price, "updated price");

        Ok(())
    }

    /// Overwrite a product's stock level, notifying observers if it comes back into stock.
    ///
    /// # Errors
    ///
    /// Returns [`ProductServiceError::NotFound`] for an unknown product.
    pub fn update_stock(
        &mut self,
        product_id: &str,
        stock_quantity: u32,
    ) -> Result<(), ProductServiceError> {
        let product = self
            .repository
            .find_by_id_mut(product_id)
            .ok_or_else(|| ProductServiceError::NotFound(ProductId::new(product_id)))?;

        let previous = product.stock_quantity;
        product.stock_quantity = stock_quantity;

        info!(product_id, previous, stock_quantity, "updated stock");

        self.notifier.notify_if_restocked(product, previous);

        Ok(())
    }

    /// Add `quantity` units to stock, returning the new level.
    ///
    /// # Errors
    ///
    /// - [`ProductServiceError::NotFound`]: unknown product.
    /// - [`ProductServiceError::Product`]: the stock counter would overflow.
    pub fn restock(&mut self, product_id: &str, quantity: u32) -> Result<u32, ProductServiceError> {
        let product = self
            .repository
            .find_by_id_mut(product_id)
            .ok_or_else(|| ProductServiceError::NotFound(ProductId::new(product_id)))?;

        let previous = product.stock_quantity;
        product.add_stock(quantity)?;

        self.notifier.notify_if_restocked(product, previous);

        Ok(product.stock_quantity)
    }

    /// Whether `quantity` units of a known product are on hand.
    pub fn is_product_available(&self, product_id: &str, quantity: u32) -> bool {
        self.repository
            .find_by_id(product_id)
            .is_some_and(|product| ProductValidator::is_stock_sufficient(product, quantity))
    }

    /// Take `quantity` units out of stock, returning a snapshot of the product as it was
    /// before the reservation.
    ///
    /// # Errors
    ///
    /// - [`ProductServiceError::NotFound`]: unknown product.
    /// - [`ProductServiceError::InsufficientStock`]: fewer than `quantity` units on hand; stock
    ///   is unchanged.
    pub fn reserve_stock(
        &mut self,
        product_id: &str,
        quantity: u32,
    ) -> Result<Product<'a>, ProductServiceError> {
        let product = self.product_mut(product_id)?;

        if !product.has_stock_for(quantity) {
            warn!(
                product_id,
                requested = quantity,
                available = product.stock_quantity,
                "insufficient stock"
            );

            return Err(ProductServiceError::InsufficientStock {
                product_name: product.name.clone(),
                requested: quantity,
                available: product.stock_quantity,
            });
        }

        let snapshot = product.clone();
        product.reduce_stock(quantity)?;

        Ok(snapshot)
    }

    /// Register a back-in-stock observer.
    pub fn subscribe(&mut self, observer: impl StockObserver + 'static) -> SubscriptionKey {
        self.notifier.subscribe(observer)
    }

    /// Remove a back-in-stock observer.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.notifier.unsubscribe(key)
    }

    /// Underlying repository, for reporting.
    pub fn repository(&self) -> &ProductRepository<'a> {
        &self.repository
    }

    fn product_mut(&mut self, product_id: &str) -> Result<&mut Product<'a>, ProductServiceError> {
        self.repository
            .find_by_id_mut(product_id)
            .ok_or_else(|| ProductServiceError::NotFound(ProductId::new(product_id)))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{notifications::Inbox, pricing::test_support::laptop, validators::ValidationIssue};

    use super::*;

    fn service<'a>() -> TestResult<ProductService<'a>> {
        let mut service = ProductService::new();
        service.add_product(laptop(249_900))?;

        Ok(service)
    }

    #[test]
    fn duplicate_ids_are_rejected() -> TestResult {
        let mut service = service()?;

        assert_eq!(
            service.add_product(laptop(100)),
            Err(ProductServiceError::AlreadyExists(ProductId::new("LP001")))
        );
        assert_eq!(service.product_count(), 1);

        Ok(())
    }

    #[test]
    fn invalid_products_are_rejected() {
        let mut service = ProductService::new();
        let mut product = laptop(249_900);
        product.description = String::new();

        let result = service.add_product(product);

        assert!(matches!(
            &result,
            Err(ProductServiceError::Invalid(errors)) if errors.contains(ValidationIssue::Description)
        ));
        assert_eq!(service.product_count(), 0);
    }

    #[test]
    fn reserve_stock_decrements_or_leaves_unchanged() -> TestResult {
        let mut service = service()?;

        let snapshot = service.reserve_stock("LP001", 4)?;

        assert_eq!(snapshot.stock_quantity, 10);
        assert_eq!(service.get_product("LP001").map(|p| p.stock_quantity), Some(6));

        let result = service.reserve_stock("LP001", 7);

        assert_eq!(
            result,
            Err(ProductServiceError::InsufficientStock {
                product_name: "MacBook Pro".to_string(),
                requested: 7,
                available: 6
            })
        );
        assert_eq!(service.get_product("LP001").map(|p| p.stock_quantity), Some(6));

        assert!(matches!(
            service.reserve_stock("ZZ999", 1),
            Err(ProductServiceError::NotFound(_))
        ));

        Ok(())
    }

    #[test]
    fn restocking_from_zero_notifies_subscribers() -> TestResult {
        let mut service = service()?;
        let inbox = Inbox::new();
        service.subscribe(inbox.clone());

        service.update_stock("LP001", 0)?;
        assert!(inbox.is_empty());

        assert_eq!(service.restock("LP001", 2)?, 2);
        assert_eq!(inbox.messages(), ["Product 'MacBook Pro' is back in stock!"]);

        service.restock("LP001", 2)?;
        assert_eq!(inbox.len(), 1);

        Ok(())
    }

    #[test]
    fn update_price_validates() -> TestResult {
        let mut service = service()?;

        service.update_price("LP001", Money::from_minor(229_900, USD))?;

        assert_eq!(
            service.get_product("LP001").map(|p| p.base_price),
            Some(Money::from_minor(229_900, USD))
        );
        assert!(matches!(
            service.update_price("LP001", Money::from_minor(-1, USD)),
            Err(ProductServiceError::Product(ProductError::InvalidPrice(_)))
        ));

        Ok(())
    }

    #[test]
    fn availability_checks() -> TestResult {
        let service = service()?;

        assert!(service.is_product_available("LP001", 10));
        assert!(!service.is_product_available("LP001", 11));
        assert!(!service.is_product_available("ZZ999", 1));
        assert_eq!(service.available_products().len(), 1);
        assert_eq!(service.search_products("macbook").len(), 1);
        assert_eq!(service.products_by_brand("APPLE").len(), 1);

        Ok(())
    }
}
