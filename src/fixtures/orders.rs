//! Scripted Order Fixtures

use serde::Deserialize;

use crate::ids::{CustomerId, ProductId};

/// Wrapper for scripted orders in YAML
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrdersFixture {
    /// Orders in creation order
    pub orders: Vec<OrderScript>,
}

/// An order to create, fill and optionally process.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OrderScript {
    /// Ordering customer
    pub customer: CustomerId,

    /// Delivery address
    pub shipping_address: String,

    /// Lines to add, in order
    pub items: Vec<ScriptedItem>,

    /// Whether to process the order once filled
    #[serde(default = "process_by_default")]
    pub process: bool,
}

/// A line of a scripted order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScriptedItem {
    /// Product to add
    pub product: ProductId,

    /// Units to add
    pub quantity: u32,
}

fn process_by_default() -> bool {
    true
}
