//! PC Store Demo
//!
//! Seeds a store from a fixture set, runs its scripted orders and prints the store reports.
//!
//! Use `-c` to load a YAML config file
//! Use `-f` to pick a fixture set by name from `./fixtures`

use std::{io, path::PathBuf};

use anyhow::Result;
use clap::Parser;
use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::Money;

use pcstore::{
    config::{LogFormat, StoreConfig},
    fixtures::Fixture,
    notifications::{Inbox, StockAlertLog},
    observability,
    pricing::{PromotionalPricing, default_strategies},
    reports,
    store::Store,
    support::SupportTicket,
};

/// PC Store Demo
#[derive(Debug, Parser)]
#[command(name = "pcstore", about = "PC store demo", long_about = None)]
struct Args {
    /// YAML config file; built-in defaults are used when omitted
    #[arg(short, long, env = "PCSTORE_CONFIG")]
    config: Option<PathBuf>,

    /// Fixture set name
    #[arg(short, long, default_value = "demo")]
    fixture: String,

    /// Log level, overriding the config (trace, debug, info, warn, error)
    #[arg(short, long)]
    log_level: Option<String>,

    /// Log format, overriding the config
    #[arg(long, value_enum)]
    log_format: Option<LogFormat>,
}

impl Args {
    fn store_config(&self) -> Result<StoreConfig> {
        let mut config = match &self.config {
            Some(path) => StoreConfig::load(path)?,
            None => StoreConfig::default(),
        };

        if let Some(level) = &self.log_level {
            config.logging.level.clone_from(level);
        }

        if let Some(format) = self.log_format {
            config.logging.format = format;
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = args.store_config()?;

    observability::init_subscriber(&config.logging)?;

    let fixture = Fixture::from_set(&args.fixture)?;
    let mut store = Store::from_config(&config)?;

    store.seed(&fixture)?;

    let inbox = Inbox::new();
    store.products_mut().subscribe(StockAlertLog);
    store.products_mut().subscribe(inbox.clone());

    process_orders(&mut store, &fixture)?;
    compare_pricing(&store)?;
    compare_shipping(&store, &config)?;
    restock(&mut store, &inbox)?;
    file_tickets(&store);
    print_reports(&store)?;

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Demo program output to user")]
fn process_orders<'a>(store: &mut Store<'a>, fixture: &Fixture<'a>) -> Result<()> {
    println!("=== PROCESSING ORDERS ===\n");

    for script in fixture.orders() {
        let outcome = store.run_script(script)?;

        if let Some(processed) = &outcome.processed {
            reports::write_order_summary(io::stdout(), processed)?;

            let packaging = store.pack_order(outcome.order_id.as_str())?;
            println!("Packed into {packaging}\n");
            store.return_box(packaging);
        }
    }

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Demo program output to user")]
fn compare_pricing(store: &Store<'_>) -> Result<()> {
    println!("=== PRICING STRATEGIES ===\n");

    let black_friday = default_strategies(PromotionalPricing::new(
        Percentage::from(Decimal::new(20, 2)),
        "Black Friday Sale",
    ));

    if let (Some(laptop), Some(customer)) = (
        store.products().get_product("LP001"),
        store.customers().get_customer("PREM001"),
    ) {
        reports::write_pricing_comparison(io::stdout(), &black_friday, laptop, customer, 3)?;
    }

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Demo program output to user")]
fn compare_shipping(store: &Store<'_>, config: &StoreConfig) -> Result<()> {
    println!("\n=== SHIPPING OPTIONS ===\n");

    let order_total = Money::from_major(500, config.currency()?);

    for customer in store.customers().list_customers() {
        reports::write_shipping_options(
            io::stdout(),
            store.orders().shipping_calculators(),
            customer,
            &order_total,
            store.orders().parcel_weight_kg(),
        )?;
    }

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Demo program output to user")]
fn restock(store: &mut Store<'_>, inbox: &Inbox) -> Result<()> {
    println!("\n=== RESTOCKING ===\n");

    store.products_mut().update_stock("AC002", 0)?;
    store.products_mut().restock("AC002", 20)?;

    for message in inbox.messages() {
        println!("{message}");
    }

    Ok(())
}

#[expect(clippy::print_stdout, reason = "Demo program output to user")]
fn file_tickets(store: &Store<'_>) {
    println!("\n=== SUPPORT DESK ===\n");

    for ticket in [
        SupportTicket::new("Forgot account password", 1),
        SupportTicket::new("Driver crashes on startup", 2),
        SupportTicket::new("Motherboard failure", 3),
        SupportTicket::new("Refund dispute", 4),
    ] {
        let resolution = store.file_ticket(&ticket);

        println!("[severity {}] {}: {resolution}", ticket.severity, ticket.issue);
    }

    println!();
}

fn print_reports(store: &Store<'_>) -> Result<()> {
    reports::write_inventory_report(io::stdout(), store.products())?;
    reports::write_customer_report(io::stdout(), store.customers())?;

    for customer in store.customers().list_customers() {
        reports::write_customer_details(io::stdout(), customer)?;
    }

    reports::write_order_report(io::stdout(), store.orders())?;

    Ok(())
}
