//! Reports
//!
//! Plain-text reports over the store's services, written to any [`io::Write`]. Listings are
//! rendered as rounded tables; totals follow as `Label: value` lines.

use std::io;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    settings::{
        Alignment, Style,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    customers::{Customer, CustomerKind, CustomerTier},
    orders::{Order, OrderStatus},
    pricing::{PricingError, PricingStrategy},
    products::{Category, Product},
    services::{CustomerService, OrderService, ProcessedOrder, ProductService},
    shipping::{ShippingCalculator, ShippingError, quote_all},
};

/// Orders listed under "Recent Orders".
pub const RECENT_ORDER_LIMIT: usize = 3;

/// Errors that can occur while writing a report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing to the output failed.
    #[error("failed to write report: {0}")]
    Io(#[from] io::Error),

    /// A strategy could not price a line.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// A shipping quote could not be computed.
    #[error(transparent)]
    Shipping(#[from] ShippingError),
}

/// Stock listing with in/out of stock and per-category counts.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the output cannot be written.
pub fn write_inventory_report(
    mut out: impl io::Write,
    products: &ProductService<'_>,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Category", "Brand", "Price", "Stock"]);

    for product in products.list_products() {
        builder.push_record([
            product.id.to_string(),
            product.name.clone(),
            product.category().to_string(),
            product.brand.clone(),
            product.base_price.to_string(),
            product.stock_quantity.to_string(),
        ]);
    }

    write_heading(&mut out, "INVENTORY REPORT")?;
    write_table(&mut out, builder, 4..6)?;

    let total = products.product_count();
    let in_stock = products.in_stock_count();

    writeln!(out, "Total Products: {total}")?;
    writeln!(out, "In Stock: {in_stock}")?;
    writeln!(out, "Out of Stock: {}", total.saturating_sub(in_stock))?;

    writeln!(out, "By Category:")?;

    for category in [Category::Laptop, Category::Desktop, Category::Accessory] {
        writeln!(
            out,
            "  {category}: {}",
            products.products_by_category(category).len()
        )?;
    }

    writeln!(out)?;

    Ok(())
}

/// Customer listing with per-kind counts and the benefits of each kind.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the output cannot be written.
pub fn write_customer_report(
    mut out: impl io::Write,
    customers: &CustomerService,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["ID", "Name", "Type", "Email", "Discount"]);

    for customer in customers.list_customers() {
        builder.push_record([
            customer.id.to_string(),
            customer.full_name(),
            customer.customer_type().to_string(),
            customer.profile.email.clone(),
            format!("{}%", customer.discount_percent()),
        ]);
    }

    write_heading(&mut out, "CUSTOMER REPORT")?;
    write_table(&mut out, builder, 4..5)?;

    writeln!(out, "Total Customers: {}", customers.customer_count())?;

    for kind in [
        CustomerKind::Regular,
        CustomerKind::Premium,
        CustomerKind::Corporate,
    ] {
        writeln!(
            out,
            "{kind}s: {}",
            customers.repository().count_by_kind(kind)
        )?;
    }

    writeln!(out)?;
    writeln!(out, "Customer Benefits:")?;

    for kind in [
        CustomerKind::Regular,
        CustomerKind::Premium,
        CustomerKind::Corporate,
    ] {
        writeln!(out, "  {}", benefits(kind))?;
    }

    writeln!(out)?;

    Ok(())
}

fn benefits(kind: CustomerKind) -> &'static str {
    match kind {
        CustomerKind::Regular => "Regular Customers: 0% discount, free shipping over $100",
        CustomerKind::Premium => "Premium Customers: 10% discount, free shipping over $50",
        CustomerKind::Corporate => "Corporate Customers: 15% discount, always free shipping",
    }
}

/// Everything known about one customer.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the output cannot be written.
pub fn write_customer_details(
    mut out: impl io::Write,
    customer: &Customer,
) -> Result<(), ReportError> {
    writeln!(out, "Customer ID: {}", customer.id)?;
    writeln!(out, "Name: {}", customer.full_name())?;
    writeln!(out, "Type: {}", customer.customer_type())?;
    writeln!(out, "Contact: {}", customer.contact_info())?;
    writeln!(out, "Address: {}", customer.profile.address)?;
    writeln!(out, "Discount: {}%", customer.discount_percent())?;

    match &customer.tier {
        CustomerTier::Regular => {}
        CustomerTier::Premium { loyalty_points } => {
            writeln!(out, "Loyalty Points: {loyalty_points}")?;
        }
        CustomerTier::Corporate {
            company_name,
            tax_id,
            credit,
        } => {
            writeln!(out, "Company: {company_name}")?;
            writeln!(out, "Tax ID: {tax_id}")?;
            writeln!(
                out,
                "Credit: {} used of {} ({} available)",
                credit.used(),
                credit.limit(),
                credit.available()
            )?;
        }
    }

    writeln!(out)?;

    Ok(())
}

/// Order counts by status, revenue and the most recent orders.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the output cannot be written.
pub fn write_order_report(
    mut out: impl io::Write,
    orders: &OrderService<'_>,
) -> Result<(), ReportError> {
    write_heading(&mut out, "ORDER REPORT")?;

    writeln!(out, "Total Orders: {}", orders.order_count())?;
    writeln!(out, "Total Revenue: {}", orders.total_revenue())?;

    for status in OrderStatus::ALL {
        writeln!(
            out,
            "{status}: {}",
            orders.repository().count_by_status(status)
        )?;
    }

    let mut recent = orders.list_orders();
    recent.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| b.id().cmp(a.id()))
    });

    let mut builder = Builder::default();

    builder.push_record(["ID", "Customer", "Status", "Items", "Total"]);

    for order in recent.into_iter().take(RECENT_ORDER_LIMIT) {
        builder.push_record(order_row(order));
    }

    writeln!(out)?;
    writeln!(out, "Recent Orders:")?;
    write_table(&mut out, builder, 3..5)?;

    Ok(())
}

fn order_row(order: &Order<'_>) -> [String; 5] {
    [
        order.id().to_string(),
        order.customer_id().to_string(),
        order.status().to_string(),
        order.total_quantity().to_string(),
        order.total().to_string(),
    ]
}

/// Summary of a processed order, including every pricing strategy's quote.
///
/// # Errors
///
/// Returns [`ReportError::Io`] if the output cannot be written.
pub fn write_order_summary(
    mut out: impl io::Write,
    processed: &ProcessedOrder<'_>,
) -> Result<(), ReportError> {
    write_heading(&mut out, "ORDER SUMMARY")?;

    writeln!(out, "Order ID: {}", processed.order_id)?;
    writeln!(
        out,
        "Customer: {} ({})",
        processed.customer_name, processed.customer_type
    )?;
    writeln!(out, "Pricing Strategy: {}", processed.pricing_strategy)?;
    writeln!(
        out,
        "Shipping Method: {} ({} days)",
        processed.shipping_method, processed.estimated_delivery_days
    )?;

    let mut items = Builder::default();

    items.push_record(["Product", "Qty", "Unit Price", "Line Total"]);

    for item in &processed.items {
        items.push_record([
            item.product_name().to_string(),
            item.quantity().to_string(),
            item.unit_price().to_string(),
            item.line_total().to_string(),
        ]);
    }

    write_table(&mut out, items, 1..4)?;

    let mut quotes = Builder::default();

    quotes.push_record(["Pricing Option", "Total"]);

    for quote in &processed.pricing_quotes {
        quotes.push_record([quote.strategy.clone(), quote.total.to_string()]);
    }

    write_table(&mut out, quotes, 1..2)?;

    writeln!(out, "Subtotal: {}", processed.subtotal)?;
    writeln!(out, "Discount: -{}", processed.discount)?;
    writeln!(out, "Shipping: {}", shipping_label(&processed.shipping_cost))?;
    writeln!(out, "TOTAL: {}", processed.total)?;
    writeln!(out)?;

    Ok(())
}

/// What each strategy charges `customer` for `quantity` units of `product`.
///
/// # Errors
///
/// - [`ReportError::Pricing`]: a strategy failed.
/// - [`ReportError::Io`]: the output cannot be written.
pub fn write_pricing_comparison(
    mut out: impl io::Write,
    strategies: &[Box<dyn PricingStrategy>],
    product: &Product<'_>,
    customer: &Customer,
    quantity: u32,
) -> Result<(), ReportError> {
    let mut builder = Builder::default();

    builder.push_record(["Strategy", "Description", "Price"]);

    for strategy in strategies {
        builder.push_record([
            strategy.name(),
            strategy.description(),
            strategy
                .calculate_price(product, customer, quantity)?
                .to_string(),
        ]);
    }

    writeln!(
        out,
        "Pricing {quantity} x {} for {}:",
        product.name,
        customer.customer_type()
    )?;
    write_table(&mut out, builder, 2..3)?;

    Ok(())
}

/// Every shipping option for `customer` on an order of `order_total`.
///
/// # Errors
///
/// - [`ReportError::Shipping`]: a calculator failed.
/// - [`ReportError::Io`]: the output cannot be written.
pub fn write_shipping_options(
    mut out: impl io::Write,
    calculators: &[Box<dyn ShippingCalculator>],
    customer: &Customer,
    order_total: &Money<'_, Currency>,
    weight_kg: Decimal,
) -> Result<(), ReportError> {
    let quotes = quote_all(calculators, customer, order_total, weight_kg)?;

    let mut builder = Builder::default();

    builder.push_record(["Method", "Delivery", "Cost"]);

    for quote in quotes {
        builder.push_record([
            quote.method.to_string(),
            format!("{} days", quote.estimated_delivery_days),
            quote
                .cost
                .as_ref()
                .map_or_else(|| "Not available".to_string(), shipping_label),
        ]);
    }

    writeln!(
        out,
        "Shipping options for {} ({}), order {order_total}, {weight_kg} kg:",
        customer.full_name(),
        customer.customer_type()
    )?;
    write_table(&mut out, builder, 2..3)?;

    Ok(())
}

fn shipping_label(cost: &Money<'_, Currency>) -> String {
    if cost.is_zero() {
        "FREE".to_string()
    } else {
        cost.to_string()
    }
}

fn write_heading(out: &mut impl io::Write, title: &str) -> Result<(), ReportError> {
    writeln!(out, "=== {title} ===")?;

    Ok(())
}

fn write_table(
    out: &mut impl io::Write,
    builder: Builder,
    right_aligned: std::ops::Range<usize>,
) -> Result<(), ReportError> {
    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(right_aligned), Alignment::right());
    table.modify(Rows::first(), Alignment::center());

    writeln!(out, "{table}")?;

    Ok(())
}
