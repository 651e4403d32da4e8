//! Orders Service
//!
//! Order creation, item management and processing. Processing prices the order under every
//! registered strategy and keeps the cheapest, then picks a shipping option and confirms the
//! order.

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    customers::Customer,
    ids::{CustomerId, OrderId, ProductId},
    orders::{Order, OrderError, OrderItem, OrderStatus},
    pricing::{PricingError, PricingStrategy, PromotionalPricing, default_strategies},
    repositories::OrderRepository,
    services::{CustomerService, ProductService, ProductServiceError},
    shipping::{ShippingCalculator, ShippingError, default_calculators, select_calculator},
};

/// Parcel weight assumed when costing shipping, in kilograms.
pub const DEFAULT_PARCEL_WEIGHT_KG: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Errors raised by order operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderServiceError {
    /// No customer with this id.
    #[error("customer not found: {0}")]
    CustomerNotFound(CustomerId),

    /// No order with this id.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// No product with this id.
    #[error("product not found: {0}")]
    ProductNotFound(ProductId),

    /// No pricing strategies are registered.
    #[error("no pricing strategies registered")]
    NoPricingStrategies,

    /// No shipping calculators are registered.
    #[error("no shipping calculators registered")]
    NoShippingCalculators,

    /// The order rejected the change.
    #[error(transparent)]
    Order(#[from] OrderError),

    /// Stock could not be reserved.
    #[error(transparent)]
    Products(#[from] ProductServiceError),

    /// A pricing strategy failed.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A shipping calculator failed.
    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

/// The order total one strategy produced.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingQuote<'a> {
    /// Strategy name
    pub strategy: String,

    /// Sum of the strategy's line prices
    pub total: Money<'a, Currency>,
}

/// Outcome of processing an order.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedOrder<'a> {
    /// Order id
    pub order_id: OrderId,

    /// Customer's full name
    pub customer_name: String,

    /// Customer kind display name
    pub customer_type: &'static str,

    /// Name of the cheapest strategy
    pub pricing_strategy: String,

    /// Every strategy's total, in registration order
    pub pricing_quotes: Vec<PricingQuote<'a>>,

    /// Chosen shipping method
    pub shipping_method: &'static str,

    /// Business days until delivery
    pub estimated_delivery_days: u32,

    /// Order lines
    pub items: Vec<OrderItem<'a>>,

    /// Sum of line totals
    pub subtotal: Money<'a, Currency>,

    /// `subtotal − best strategy total`
    pub discount: Money<'a, Currency>,

    /// Shipping cost
    pub shipping_cost: Money<'a, Currency>,

    /// Amount due
    pub total: Money<'a, Currency>,
}

/// Order management.
#[derive(Debug)]
pub struct OrderService<'a> {
    repository: OrderRepository<'a>,
    pricing: Vec<Box<dyn PricingStrategy>>,
    shipping: Vec<Box<dyn ShippingCalculator>>,
    currency: &'a Currency,
    parcel_weight_kg: Decimal,
    next_order_number: u32,
}

impl<'a> OrderService<'a> {
    /// Create a service with the given strategies and calculators, evaluated in order.
    pub fn new(
        currency: &'a Currency,
        pricing: Vec<Box<dyn PricingStrategy>>,
        shipping: Vec<Box<dyn ShippingCalculator>>,
        parcel_weight_kg: Decimal,
    ) -> Self {
        Self {
            repository: OrderRepository::new(),
            pricing,
            shipping,
            currency,
            parcel_weight_kg,
            next_order_number: 1,
        }
    }

    /// Create a service with the default strategies (including a 15% "Holiday Special"
    /// promotion), the default calculators and a 2.5 kg parcel weight.
    pub fn with_defaults(currency: &'a Currency) -> Self {
        let promotion =
            PromotionalPricing::new(Percentage::from(Decimal::new(15, 2)), "Holiday Special");

        Self::new(
            currency,
            default_strategies(promotion),
            default_calculators(),
            DEFAULT_PARCEL_WEIGHT_KG,
        )
    }

    /// Open an empty pending order for a known customer.
    ///
    /// # Errors
    ///
    /// Returns [`OrderServiceError::CustomerNotFound`] for an unknown customer; no order id
    /// is used up in that case.
    #[tracing::instrument(
        name = "orders.service.create_order",
        skip(self, customers, shipping_address),
        fields(order_id = tracing::field::Empty),
        err
    )]
    pub fn create_order(
        &mut self,
        customers: &CustomerService,
        customer_id: &str,
        shipping_address: &str,
    ) -> Result<OrderId, OrderServiceError> {
        if customers.get_customer(customer_id).is_none() {
            warn!("customer not found");

            return Err(OrderServiceError::CustomerNotFound(CustomerId::new(
                customer_id,
            )));
        }

        let order_id = OrderId::from_sequence(self.next_order_number);
        self.next_order_number = self.next_order_number.saturating_add(1);

        tracing::Span::current().record("order_id", tracing::field::display(&order_id));

        self.repository.save(Order::new(
            order_id.clone(),
            CustomerId::new(customer_id),
            shipping_address,
            self.currency,
        ));

        info!("created order");

        Ok(order_id)
    }

    /// Add `quantity` units of a product to a pending order, reserving the stock.
    ///
    /// Nothing changes unless every check passes.
    ///
    /// # Errors
    ///
    /// - [`OrderServiceError::OrderNotFound`] / [`OrderServiceError::ProductNotFound`]:
    ///   unknown id.
    /// - [`OrderServiceError::Order`]: the order is not pending, the quantity is zero or the
    ///   product is priced in another currency.
    /// - [`OrderServiceError::Products`]: not enough stock.
    #[tracing::instrument(name = "orders.service.add_item", skip(self, products), err)]
    pub fn add_item(
        &mut self,
        products: &mut ProductService<'a>,
        order_id: &str,
        product_id: &str,
        quantity: u32,
    ) -> Result<(), OrderServiceError> {
        let product = products
            .get_product(product_id)
            .ok_or_else(|| OrderServiceError::ProductNotFound(ProductId::new(product_id)))?;

        let mut updated = self.order(order_id)?.clone();
        updated.add_item(product, quantity)?;

        let reserved = products.reserve_stock(product_id, quantity)?;

        self.repository.save(updated);

        info!(product = %reserved.name, "added item");

        Ok(())
    }

    /// Remove a product's line from a pending order, returning its units to stock.
    ///
    /// Returns the quantity removed, or `None` if the product was not in the order.
    ///
    /// # Errors
    ///
    /// - [`OrderServiceError::OrderNotFound`]: unknown order.
    /// - [`OrderServiceError::Order`]: the order is not pending.
    /// - [`OrderServiceError::Products`]: the product no longer exists.
    pub fn remove_item(
        &mut self,
        products: &mut ProductService<'a>,
        order_id: &str,
        product_id: &str,
    ) -> Result<Option<u32>, OrderServiceError> {
        let mut updated = self.order(order_id)?.clone();

        let Some(removed) = updated.remove_item(&ProductId::new(product_id))? else {
            return Ok(None);
        };

        products.restock(product_id, removed.quantity())?;

        self.repository.save(updated);

        info!(order_id, product_id, quantity = removed.quantity(), "removed item");

        Ok(Some(removed.quantity()))
    }

    /// Price, ship and confirm a pending order.
    ///
    /// Every registered strategy prices the order using the current product records; the
    /// cheapest total wins, with ties going to the earliest registered strategy. The discount
    /// is the subtotal minus that total and is not clamped at zero. Shipping uses the first
    /// calculator available to the customer, or the first registered calculator if none is.
    /// Stock is not checked again.
    ///
    /// # Errors
    ///
    /// - [`OrderServiceError::OrderNotFound`] / [`OrderServiceError::CustomerNotFound`] /
    ///   [`OrderServiceError::ProductNotFound`]: a record is missing.
    /// - [`OrderServiceError::Order`]: the order is not pending.
    /// - [`OrderServiceError::NoPricingStrategies`] /
    ///   [`OrderServiceError::NoShippingCalculators`]: nothing registered.
    /// - [`OrderServiceError::Pricing`] / [`OrderServiceError::Shipping`]: a calculation failed.
    #[tracing::instrument(
        name = "orders.service.process_order",
        skip(self, customers, products),
        fields(
            pricing_strategy = tracing::field::Empty,
            shipping_method = tracing::field::Empty
        ),
        err
    )]
    pub fn process_order(
        &mut self,
        customers: &CustomerService,
        products: &ProductService<'a>,
        order_id: &str,
    ) -> Result<ProcessedOrder<'a>, OrderServiceError> {
        let order = self.order(order_id)?;

        if order.status() != OrderStatus::Pending {
            warn!(status = %order.status(), "order is not pending");

            return Err(OrderError::NotPending(order.status()).into());
        }

        let customer = customers
            .get_customer(order.customer_id().as_str())
            .ok_or_else(|| OrderServiceError::CustomerNotFound(order.customer_id().clone()))?;

        let pricing_quotes = self.price_order(order, customer, products)?;

        let best = best_quote(&pricing_quotes).ok_or(OrderServiceError::NoPricingStrategies)?;
        let pricing_strategy = best.strategy.clone();
        let discount = order
            .subtotal()
            .amount()
            .checked_sub(*best.total.amount())
            .map(|amount| Money::from_decimal(amount, self.currency))
            .ok_or(OrderError::AmountOverflow)?;

        let calculator = select_calculator(&self.shipping, customer)
            .ok_or(OrderServiceError::NoShippingCalculators)?;

        let shipping_cost =
            calculator.calculate_cost(customer, &order.subtotal(), self.parcel_weight_kg)?;

        let span = tracing::Span::current();
        span.record("pricing_strategy", tracing::field::display(&pricing_strategy));
        span.record("shipping_method", calculator.method());

        let mut updated = order.clone();
        updated.apply_discount(discount)?;
        updated.set_shipping_cost(shipping_cost)?;
        updated.transition_to(OrderStatus::Confirmed)?;

        let processed = ProcessedOrder {
            order_id: updated.id().clone(),
            customer_name: customer.full_name(),
            customer_type: customer.customer_type(),
            pricing_strategy,
            pricing_quotes,
            shipping_method: calculator.method(),
            estimated_delivery_days: calculator.estimated_delivery_days(),
            items: updated.items().to_vec(),
            subtotal: updated.subtotal(),
            discount: updated.discount_amount(),
            shipping_cost: updated.shipping_cost(),
            total: updated.total(),
        };

        self.repository.save(updated);

        info!(total = %processed.total, "processed order");

        Ok(processed)
    }

    /// Total of `order` under each registered strategy, in registration order.
    ///
    /// # Errors
    ///
    /// - [`OrderServiceError::ProductNotFound`]: a line's product no longer exists.
    /// - [`OrderServiceError::Pricing`]: a strategy failed.
    pub fn price_order(
        &self,
        order: &Order<'a>,
        customer: &Customer,
        products: &ProductService<'a>,
    ) -> Result<Vec<PricingQuote<'a>>, OrderServiceError> {
        let lines = order
            .items()
            .iter()
            .map(|item| {
                products
                    .get_product(item.product_id().as_str())
                    .map(|product| (product, item.quantity()))
                    .ok_or_else(|| OrderServiceError::ProductNotFound(item.product_id().clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        self.pricing
            .iter()
            .map(|strategy| -> Result<PricingQuote<'a>, OrderServiceError> {
                let mut total = Decimal::ZERO;

                for (product, quantity) in &lines {
                    let price = strategy.calculate_price(product, customer, *quantity)?;

                    total = total
                        .checked_add(*price.amount())
                        .ok_or(PricingError::Overflow)?;
                }

                debug!(strategy = %strategy.name(), %total, "priced order");

                Ok(PricingQuote {
                    strategy: strategy.name(),
                    total: Money::from_decimal(total, self.currency),
                })
            })
            .collect()
    }

    /// Move an order along its lifecycle.
    ///
    /// # Errors
    ///
    /// - [`OrderServiceError::OrderNotFound`]: unknown order.
    /// - [`OrderServiceError::Order`]: the transition is not allowed.
    pub fn update_status(
        &mut self,
        order_id: &str,
        status: OrderStatus,
    ) -> Result<(), OrderServiceError> {
        let order = self
            .repository
            .find_by_id_mut(order_id)
            .ok_or_else(|| OrderServiceError::OrderNotFound(OrderId::new(order_id)))?;

        let from = order.status();
        order.transition_to(status)?;

        info!(order_id, %from, to = %status, "updated order status");

        Ok(())
    }

    /// Look up an order.
    pub fn get_order(&self, order_id: &str) -> Option<&Order<'a>> {
        self.repository.find_by_id(order_id)
    }

    /// Orders placed by a customer.
    pub fn orders_for_customer(&self, customer_id: &str) -> Vec<&Order<'a>> {
        self.repository.find_by_customer(customer_id)
    }

    /// Every order.
    pub fn list_orders(&self) -> Vec<&Order<'a>> {
        self.repository.iter().collect()
    }

    /// Orders in `status`.
    pub fn orders_by_status(&self, status: OrderStatus) -> Vec<&Order<'a>> {
        self.repository.find_by_status(status)
    }

    /// Orders whose total is at least `minimum_total`.
    pub fn large_orders(&self, minimum_total: Decimal) -> Vec<&Order<'a>> {
        self.repository.find_large_orders(minimum_total)
    }

    /// Revenue across all orders that were not cancelled.
    pub fn total_revenue(&self) -> Money<'a, Currency> {
        Money::from_decimal(self.repository.total_revenue(), self.currency)
    }

    /// Number of orders
    pub fn order_count(&self) -> usize {
        self.repository.len()
    }

    /// Store currency
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Registered pricing strategies, in evaluation order
    pub fn pricing_strategies(&self) -> &[Box<dyn PricingStrategy>] {
        &self.pricing
    }

    /// Registered shipping calculators, in evaluation order
    pub fn shipping_calculators(&self) -> &[Box<dyn ShippingCalculator>] {
        &self.shipping
    }

    /// Parcel weight assumed for shipping, in kilograms
    pub fn parcel_weight_kg(&self) -> Decimal {
        self.parcel_weight_kg
    }

    /// Underlying repository, for reporting.
    pub fn repository(&self) -> &OrderRepository<'a> {
        &self.repository
    }

    fn order(&self, order_id: &str) -> Result<&Order<'a>, OrderServiceError> {
        self.repository
            .find_by_id(order_id)
            .ok_or_else(|| OrderServiceError::OrderNotFound(OrderId::new(order_id)))
    }
}

/// Cheapest quote; the first one wins a tie.
fn best_quote<'q, 'a>(quotes: &'q [PricingQuote<'a>]) -> Option<&'q PricingQuote<'a>> {
    quotes.iter().fold(None, |best, quote| match best {
        Some(current) if current.total.amount() <= quote.total.amount() => Some(current),
        _ => Some(quote),
    })
}
