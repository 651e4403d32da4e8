//! Orders

use std::fmt;

use jiff::Timestamp;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    ids::{CustomerId, OrderId, ProductId},
    products::Product,
};

/// Errors raised while mutating an order.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OrderError {
    /// Quantities must be at least one.
    #[error("quantity must be greater than zero")]
    InvalidQuantity,

    /// Quantity arithmetic overflowed.
    #[error("quantity overflow for product {0}")]
    QuantityOverflow(ProductId),

    /// A line total, subtotal or total cannot be represented.
    #[error("order amount overflow")]
    AmountOverflow,

    /// The product has no line in this order.
    #[error("product {0} is not in the order")]
    ItemNotFound(ProductId),

    /// An amount in a different currency than the order.
    #[error("currency mismatch: order uses {expected}, got {actual}")]
    CurrencyMismatch {
        /// Order currency
        expected: &'static str,

        /// Offending currency
        actual: &'static str,
    },

    /// Status change not permitted by the order lifecycle.
    #[error("cannot move order from {from} to {to}")]
    InvalidTransition {
        /// Current status
        from: OrderStatus,

        /// Requested status
        to: OrderStatus,
    },

    /// Items can only change while the order is pending.
    #[error("order is {0}; items can only change while pending")]
    NotPending(OrderStatus),
}

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderStatus {
    /// Created, items may change
    Pending,

    /// Priced and shipping fixed
    Confirmed,

    /// Being picked and packed
    Processing,

    /// Handed to the carrier
    Shipped,

    /// Received by the customer
    Delivered,

    /// Abandoned before delivery
    Cancelled,
}

impl OrderStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    /// Delivered and Cancelled orders never change again.
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Whether the lifecycle allows moving from `self` to `next`.
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        match (self, next) {
            (from, OrderStatus::Cancelled) => !from.is_terminal(),
            (OrderStatus::Pending, OrderStatus::Confirmed)
            | (OrderStatus::Confirmed, OrderStatus::Processing)
            | (OrderStatus::Processing, OrderStatus::Shipped)
            | (OrderStatus::Shipped, OrderStatus::Delivered) => true,
            _ => false,
        }
    }

    /// Display name
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A line in an order.
///
/// Name and unit price are copied from the product when the line is created and are not
/// updated if the product changes later.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem<'a> {
    product_id: ProductId,
    product_name: String,
    unit_price: Money<'a, Currency>,
    quantity: u32,
    line_total: Money<'a, Currency>,
}

impl<'a> OrderItem<'a> {
    /// Snapshot `quantity` units of `product`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::AmountOverflow`] if the line total cannot be represented.
    pub fn new(product: &Product<'a>, quantity: u32) -> Result<Self, OrderError> {
        Ok(Self {
            product_id: product.id.clone(),
            product_name: product.name.clone(),
            unit_price: product.base_price,
            quantity,
            line_total: line_total(&product.base_price, quantity)?,
        })
    }

    /// Product the line was taken from
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name at the time the line was added
    pub fn product_name(&self) -> &str {
        &self.product_name
    }

    /// Unit price at the time the line was added
    pub fn unit_price(&self) -> Money<'a, Currency> {
        self.unit_price
    }

    /// Units ordered
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`
    pub fn line_total(&self) -> Money<'a, Currency> {
        self.line_total
    }

    fn with_quantity(&self, quantity: u32) -> Result<Self, OrderError> {
        Ok(Self {
            quantity,
            line_total: line_total(&self.unit_price, quantity)?,
            ..self.clone()
        })
    }
}

fn line_total<'a>(
    unit_price: &Money<'a, Currency>,
    quantity: u32,
) -> Result<Money<'a, Currency>, OrderError> {
    unit_price
        .amount()
        .checked_mul(Decimal::from(quantity))
        .map(|amount| Money::from_decimal(amount, unit_price.currency()))
        .ok_or(OrderError::AmountOverflow)
}

fn order_total(
    subtotal: Decimal,
    discount: Decimal,
    shipping: Decimal,
) -> Result<Decimal, OrderError> {
    subtotal
        .checked_sub(discount)
        .and_then(|amount| amount.checked_add(shipping))
        .ok_or(OrderError::AmountOverflow)
}

/// Order
#[derive(Debug, Clone, PartialEq)]
pub struct Order<'a> {
    id: OrderId,
    customer_id: CustomerId,
    created_at: Timestamp,
    items: SmallVec<[OrderItem<'a>; 4]>,
    status: OrderStatus,
    subtotal: Money<'a, Currency>,
    discount_amount: Money<'a, Currency>,
    shipping_cost: Money<'a, Currency>,
    total: Money<'a, Currency>,
    shipping_address: String,
    currency: &'a Currency,
}

impl<'a> Order<'a> {
    /// Create an empty pending order.
    pub fn new(
        id: OrderId,
        customer_id: CustomerId,
        shipping_address: impl Into<String>,
        currency: &'a Currency,
    ) -> Self {
        let zero = Money::from_minor(0, currency);

        Self {
            id,
            customer_id,
            created_at: Timestamp::now(),
            items: SmallVec::new(),
            status: OrderStatus::Pending,
            subtotal: zero,
            discount_amount: zero,
            shipping_cost: zero,
            total: zero,
            shipping_address: shipping_address.into(),
            currency,
        }
    }

    /// Add `quantity` units of `product`.
    ///
    /// A product already in the order has its line quantity increased; the line keeps the
    /// price it was first added at.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotPending`]: the order has already been confirmed.
    /// - [`OrderError::InvalidQuantity`]: `quantity` is zero.
    /// - [`OrderError::CurrencyMismatch`]: the product is priced in another currency.
    /// - [`OrderError::QuantityOverflow`]: the merged quantity overflows.
    /// - [`OrderError::AmountOverflow`]: the new line total or subtotal cannot be represented.
    ///
    /// The order is unchanged on error.
    pub fn add_item(&mut self, product: &Product<'a>, quantity: u32) -> Result<(), OrderError> {
        self.ensure_pending()?;

        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }

        self.ensure_currency(&product.base_price)?;

        let mut items = self.items.clone();

        if let Some(item) = items.iter_mut().find(|item| item.product_id == product.id) {
            let merged = item
                .quantity
                .checked_add(quantity)
                .ok_or_else(|| OrderError::QuantityOverflow(product.id.clone()))?;

            *item = item.with_quantity(merged)?;
        } else {
            items.push(OrderItem::new(product, quantity)?);
        }

        self.replace_items(items)
    }

    /// Remove the line for `product_id`, returning it if present.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::NotPending`] once the order has been confirmed.
    pub fn remove_item(
        &mut self,
        product_id: &ProductId,
    ) -> Result<Option<OrderItem<'a>>, OrderError> {
        self.ensure_pending()?;

        let Some(position) = self
            .items
            .iter()
            .position(|item| &item.product_id == product_id)
        else {
            return Ok(None);
        };

        let mut items = self.items.clone();
        let removed = items.remove(position);

        self.replace_items(items)?;

        Ok(Some(removed))
    }

    /// Set the quantity of an existing line.
    ///
    /// # Errors
    ///
    /// - [`OrderError::NotPending`]: the order has already been confirmed.
    /// - [`OrderError::InvalidQuantity`]: `quantity` is zero (use [`Order::remove_item`]).
    /// - [`OrderError::ItemNotFound`]: no line for `product_id`.
    /// - [`OrderError::AmountOverflow`]: the new line total or subtotal cannot be represented.
    pub fn update_item_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<(), OrderError> {
        self.ensure_pending()?;

        if quantity == 0 {
            return Err(OrderError::InvalidQuantity);
        }

        let mut items = self.items.clone();

        let item = items
            .iter_mut()
            .find(|item| &item.product_id == product_id)
            .ok_or_else(|| OrderError::ItemNotFound(product_id.clone()))?;

        *item = item.with_quantity(quantity)?;

        self.replace_items(items)
    }

    /// Record the discount and recompute the total. Negative discounts are kept as given.
    ///
    /// # Errors
    ///
    /// - [`OrderError::CurrencyMismatch`]: an amount in another currency.
    /// - [`OrderError::AmountOverflow`]: the total cannot be represented.
    pub fn apply_discount(&mut self, discount: Money<'a, Currency>) -> Result<(), OrderError> {
        self.ensure_currency(&discount)?;

        let total = order_total(
            *self.subtotal.amount(),
            *discount.amount(),
            *self.shipping_cost.amount(),
        )?;

        self.discount_amount = discount;
        self.total = Money::from_decimal(total, self.currency);

        Ok(())
    }

    /// Record the shipping cost and recompute the total.
    ///
    /// # Errors
    ///
    /// - [`OrderError::CurrencyMismatch`]: an amount in another currency.
    /// - [`OrderError::AmountOverflow`]: the total cannot be represented.
    pub fn set_shipping_cost(&mut self, cost: Money<'a, Currency>) -> Result<(), OrderError> {
        self.ensure_currency(&cost)?;

        let total = order_total(
            *self.subtotal.amount(),
            *self.discount_amount.amount(),
            *cost.amount(),
        )?;

        self.shipping_cost = cost;
        self.total = Money::from_decimal(total, self.currency);

        Ok(())
    }

    /// Move the order to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderError::InvalidTransition`] if the lifecycle does not allow it.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<(), OrderError> {
        if !self.status.can_transition_to(next) {
            return Err(OrderError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }

        self.status = next;

        Ok(())
    }

    /// Order id
    pub fn id(&self) -> &OrderId {
        &self.id
    }

    /// Owning customer
    pub fn customer_id(&self) -> &CustomerId {
        &self.customer_id
    }

    /// Creation time
    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    /// Lines in the order they were added
    pub fn items(&self) -> &[OrderItem<'a>] {
        &self.items
    }

    /// Lifecycle status
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Sum of line totals
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Discount applied when the order was processed
    pub fn discount_amount(&self) -> Money<'a, Currency> {
        self.discount_amount
    }

    /// Shipping cost fixed when the order was processed
    pub fn shipping_cost(&self) -> Money<'a, Currency> {
        self.shipping_cost
    }

    /// `subtotal − discount + shipping`
    pub fn total(&self) -> Money<'a, Currency> {
        self.total
    }

    /// Delivery address
    pub fn shipping_address(&self) -> &str {
        &self.shipping_address
    }

    /// Order currency
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }

    /// Number of distinct lines
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all lines
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    fn ensure_pending(&self) -> Result<(), OrderError> {
        if self.status == OrderStatus::Pending {
            Ok(())
        } else {
            Err(OrderError::NotPending(self.status))
        }
    }

    fn ensure_currency(&self, amount: &Money<'_, Currency>) -> Result<(), OrderError> {
        if amount.currency() == self.currency {
            Ok(())
        } else {
            Err(OrderError::CurrencyMismatch {
                expected: self.currency.iso_alpha_code,
                actual: amount.currency().iso_alpha_code,
            })
        }
    }

    fn replace_items(&mut self, items: SmallVec<[OrderItem<'a>; 4]>) -> Result<(), OrderError> {
        let subtotal = items
            .iter()
            .try_fold(Decimal::ZERO, |sum, item| sum.checked_add(*item.line_total.amount()))
            .ok_or(OrderError::AmountOverflow)?;

        let total = order_total(
            subtotal,
            *self.discount_amount.amount(),
            *self.shipping_cost.amount(),
        )?;

        self.items = items;
        self.subtotal = Money::from_decimal(subtotal, self.currency);
        self.total = Money::from_decimal(total, self.currency);

        Ok(())
    }
}

impl fmt::Display for Order<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order{{id='{}', customerId='{}', items={}, total={}, status={}}}",
            self.id,
            self.customer_id,
            self.items.len(),
            self.total,
            self.status
        )
    }
}
