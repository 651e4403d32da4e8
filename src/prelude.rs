//! PC Store prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    config::{ConfigError, Environment, LogFormat, LoggingConfig, StoreConfig},
    customers::{Customer, CustomerError, CustomerKind, CustomerProfile, CustomerTier},
    fixtures::{Fixture, FixtureError, OrderScript},
    ids::{CustomerId, OrderId, ProductId},
    notifications::{BackInStock, Inbox, StockAlertLog, StockObserver},
    orders::{Order, OrderError, OrderItem, OrderStatus},
    packaging::{BoxSize, ObjectPool, PackagingBox, PackagingBoxPool, PoolError, Reusable},
    pricing::{BulkPricing, PricingError, PricingStrategy, PromotionalPricing, RegularPricing},
    products::{Category, Product, ProductError, ProductSpecs},
    reports::ReportError,
    services::{
        CustomerService, CustomerServiceError, OrderService, OrderServiceError, ProcessedOrder,
        ProductService, ProductServiceError,
    },
    shipping::{
        ExpressShipping, OvernightShipping, ShippingCalculator, ShippingError, StandardShipping,
    },
    store::{ScriptedOrder, Store, StoreError},
    support::{Resolution, SupportDesk, SupportHandler, SupportTicket},
    validators::{ValidationErrors, ValidationIssue, Validator},
};
