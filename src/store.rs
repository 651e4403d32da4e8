//! Store
//!
//! The services, packaging pool and support desk of one shop, built from a [`StoreConfig`].
//! Order operations are forwarded to [`OrderService`] with the other services lent in.

use thiserror::Error;
use tracing::info;

use crate::{
    config::{ConfigError, StoreConfig},
    fixtures::{Fixture, OrderScript},
    ids::OrderId,
    orders::OrderStatus,
    packaging::{PackagingBox, PackagingBoxPool, PoolError},
    pricing::default_strategies,
    services::{
        CustomerService, CustomerServiceError, OrderService, OrderServiceError, ProcessedOrder,
        ProductService, ProductServiceError,
    },
    shipping::default_calculators,
    support::{Resolution, SupportDesk, SupportTicket},
};

/// Errors raised while building or driving a store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configuration is unusable.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The packaging pool could not be built.
    #[error(transparent)]
    Packaging(#[from] PoolError),

    /// A product operation failed.
    #[error(transparent)]
    Products(#[from] ProductServiceError),

    /// A customer operation failed.
    #[error(transparent)]
    Customers(#[from] CustomerServiceError),

    /// An order operation failed.
    #[error(transparent)]
    Orders(#[from] OrderServiceError),
}

/// Outcome of running an [`OrderScript`].
#[derive(Debug, Clone)]
pub struct ScriptedOrder<'a> {
    /// Id of the created order
    pub order_id: OrderId,

    /// Processing result, if the script asked for it
    pub processed: Option<ProcessedOrder<'a>>,
}

/// A configured shop.
#[derive(Debug)]
pub struct Store<'a> {
    products: ProductService<'a>,
    customers: CustomerService,
    orders: OrderService<'a>,
    packaging: PackagingBoxPool,
    support: SupportDesk,
}

impl<'a> Store<'a> {
    /// Build an empty store from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] or [`StoreError::Packaging`] if the config is unusable.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StoreError> {
        config.validate()?;

        let orders = OrderService::new(
            config.currency()?,
            default_strategies(config.promotion.strategy()),
            default_calculators(),
            config.assumed_parcel_weight_kg,
        );

        info!(
            currency = %config.currency,
            environment = %config.environment,
            promotion = %config.promotion.name,
            "store configured"
        );

        Ok(Self {
            products: ProductService::new(),
            customers: CustomerService::new(),
            orders,
            packaging: PackagingBoxPool::new(
                config.packaging.capacity,
                config.packaging.default_size,
            )?,
            support: SupportDesk::default(),
        })
    }

    /// Stock the catalogue and register the customers of a fixture set.
    ///
    /// # Errors
    ///
    /// Returns the first product or customer the services reject.
    pub fn seed(&mut self, fixture: &Fixture<'a>) -> Result<(), StoreError> {
        for product in fixture.products() {
            self.products.add_product(product.clone())?;
        }

        for customer in fixture.customers() {
            self.customers.register_customer(customer.clone())?;
        }

        Ok(())
    }

    /// Create an order, add its lines and process it if asked.
    ///
    /// # Errors
    ///
    /// Returns the first [`OrderServiceError`] raised. Lines added before the failure stay
    /// on the order.
    pub fn run_script(&mut self, script: &OrderScript) -> Result<ScriptedOrder<'a>, StoreError> {
        let order_id = self.create_order(script.customer.as_str(), &script.shipping_address)?;

        for item in &script.items {
            self.add_item(order_id.as_str(), item.product.as_str(), item.quantity)?;
        }

        let processed = if script.process {
            Some(self.process_order(order_id.as_str())?)
        } else {
            None
        };

        Ok(ScriptedOrder {
            order_id,
            processed,
        })
    }

    /// Open an order for a customer.
    ///
    /// # Errors
    ///
    /// See [`OrderService::create_order`].
    pub fn create_order(
        &mut self,
        customer_id: &str,
        shipping_address: &str,
    ) -> Result<OrderId, StoreError> {
        Ok(self
            .orders
            .create_order(&self.customers, customer_id, shipping_address)?)
    }

    /// Add units of a product to an order, reserving stock.
    ///
    /// # Errors
    ///
    /// See [`OrderService::add_item`].
    pub fn add_item(
        &mut self,
        order_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), StoreError> {
        Ok(self
            .orders
            .add_item(&mut self.products, order_id, product_id, quantity)?)
    }

    /// Remove a product's line from an order, returning its stock.
    ///
    /// # Errors
    ///
    /// See [`OrderService::remove_item`].
    pub fn remove_item(
        &mut self,
        order_id: &str,
        product_id: &str,
    ) -> Result<Option<u32>, StoreError> {
        Ok(self
            .orders
            .remove_item(&mut self.products, order_id, product_id)?)
    }

    /// Price, ship and confirm an order.
    ///
    /// # Errors
    ///
    /// See [`OrderService::process_order`].
    pub fn process_order(&mut self, order_id: &str) -> Result<ProcessedOrder<'a>, StoreError> {
        Ok(self
            .orders
            .process_order(&self.customers, &self.products, order_id)?)
    }

    /// Move a confirmed order to processing and put it in a labelled box.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Orders`] if the order is unknown or not confirmed.
    pub fn pack_order(&mut self, order_id: &str) -> Result<PackagingBox, StoreError> {
        self.orders.update_status(order_id, OrderStatus::Processing)?;

        let address = self
            .orders
            .get_order(order_id)
            .map(|order| order.shipping_address().to_string())
            .unwrap_or_default();

        let mut packaging = self.packaging.acquire();
        packaging.label = Some(format!("{order_id} / {address}"));

        info!(order_id, box_id = %packaging.id(), size = %packaging.size, "packed order");

        Ok(packaging)
    }

    /// Return an emptied box to the pool. Returns whether the pool kept it.
    pub fn return_box(&mut self, packaging: PackagingBox) -> bool {
        self.packaging.release(packaging)
    }

    /// Pass a support ticket along the desk's escalation chain.
    pub fn file_ticket(&self, ticket: &SupportTicket) -> Resolution {
        self.support.handle(ticket)
    }

    /// Product service
    pub fn products(&self) -> &ProductService<'a> {
        &self.products
    }

    /// Product service, for stock and price changes
    pub fn products_mut(&mut self) -> &mut ProductService<'a> {
        &mut self.products
    }

    /// Customer service
    pub fn customers(&self) -> &CustomerService {
        &self.customers
    }

    /// Customer service, for account changes
    pub fn customers_mut(&mut self) -> &mut CustomerService {
        &mut self.customers
    }

    /// Order service
    pub fn orders(&self) -> &OrderService<'a> {
        &self.orders
    }

    /// Packaging pool
    pub fn packaging(&self) -> &PackagingBoxPool {
        &self.packaging
    }
}
