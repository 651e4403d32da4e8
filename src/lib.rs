//! PC Store
//!
//! An in-memory computer store: a product catalogue with stock, tiered customers, and an order
//! pipeline that prices each order under every registered strategy, keeps the cheapest, and
//! picks a shipping method the customer is entitled to.

pub mod config;
pub mod customers;
pub mod fixtures;
pub mod ids;
pub mod notifications;
pub mod observability;
pub mod orders;
pub mod packaging;
pub mod prelude;
pub mod pricing;
pub mod products;
pub mod reports;
pub mod repositories;
pub mod services;
pub mod shipping;
pub mod store;
pub mod support;
pub mod validators;
