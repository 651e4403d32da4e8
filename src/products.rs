//! Products

use std::fmt;

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use serde::Deserialize;
use thiserror::Error;

use crate::ids::ProductId;

/// Errors raised by product stock operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    /// Not enough units on hand to satisfy the request.
    #[error("insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Units requested
        requested: u32,

        /// Units on hand
        available: u32,
    },

    /// Adding stock would overflow the counter.
    #[error("stock quantity overflow")]
    StockOverflow,

    /// Prices must be greater than zero.
    #[error("price must be greater than zero, got {0}")]
    InvalidPrice(Decimal),

    /// The new price is in a different currency than the product.
    #[error("currency mismatch: product uses {expected}, got {actual}")]
    CurrencyMismatch {
        /// Product currency
        expected: &'static str,

        /// Offending currency
        actual: &'static str,
    },
}

/// Product category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Portable computers
    Laptop,

    /// Desktop towers
    Desktop,

    /// Peripherals and add-ons
    Accessory,
}

impl Category {
    /// Display name of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Laptop => "Laptop",
            Category::Desktop => "Desktop",
            Category::Accessory => "Accessory",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Category-specific product attributes.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum ProductSpecs {
    /// Laptop attributes
    Laptop {
        /// CPU model
        processor: String,

        /// Memory in GB
        ram_gb: u32,

        /// Storage in GB
        storage_gb: u32,

        /// Screen size label, e.g. `14-inch`
        screen_size: String,

        /// Pre-installed operating system
        operating_system: String,
    },

    /// Desktop attributes
    Desktop {
        /// CPU model
        processor: String,

        /// Memory in GB
        ram_gb: u32,

        /// Storage in GB
        storage_gb: u32,

        /// GPU model
        graphics_card: String,

        /// Motherboard model
        motherboard: String,

        /// Built-in Wi-Fi
        has_wifi: bool,
    },

    /// Accessory attributes
    Accessory {
        /// Kind of accessory, e.g. `Mouse`
        accessory_type: String,

        /// Platforms the accessory works with
        compatibility: String,

        /// Colour
        color: String,

        /// Wireless connectivity
        wireless: bool,
    },
}

impl ProductSpecs {
    /// Category the specs belong to.
    pub fn category(&self) -> Category {
        match self {
            ProductSpecs::Laptop { .. } => Category::Laptop,
            ProductSpecs::Desktop { .. } => Category::Desktop,
            ProductSpecs::Accessory { .. } => Category::Accessory,
        }
    }
}

impl fmt::Display for ProductSpecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProductSpecs::Laptop {
                processor,
                ram_gb,
                storage_gb,
                screen_size,
                operating_system,
            } => write!(
                f,
                "Processor: {processor}, RAM: {ram_gb}GB, Storage: {storage_gb}GB, Screen: {screen_size}, OS: {operating_system}"
            ),
            ProductSpecs::Desktop {
                processor,
                ram_gb,
                storage_gb,
                graphics_card,
                motherboard,
                has_wifi,
            } => write!(
                f,
                "Processor: {processor}, RAM: {ram_gb}GB, Storage: {storage_gb}GB, GPU: {graphics_card}, Motherboard: {motherboard}, WiFi: {}",
                yes_no(*has_wifi)
            ),
            ProductSpecs::Accessory {
                accessory_type,
                compatibility,
                color,
                wireless,
            } => write!(
                f,
                "Type: {accessory_type}, Compatibility: {compatibility}, Color: {color}, Wireless: {}",
                yes_no(*wireless)
            ),
        }
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "Yes" } else { "No" }
}

/// Product
#[derive(Debug, Clone, PartialEq)]
pub struct Product<'a> {
    /// Product id
    pub id: ProductId,

    /// Product name
    pub name: String,

    /// Manufacturer
    pub brand: String,

    /// Unit price before any discounts
    pub base_price: Money<'a, Currency>,

    /// Units on hand
    pub stock_quantity: u32,

    /// Free-text description
    pub description: String,

    /// Category-specific attributes
    pub specs: ProductSpecs,
}

impl<'a> Product<'a> {
    /// Product category, derived from its specs.
    pub fn category(&self) -> Category {
        self.specs.category()
    }

    /// One-line specification summary.
    pub fn specifications(&self) -> String {
        self.specs.to_string()
    }

    /// Whether at least one unit is on hand.
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Whether `quantity` units can be taken from stock.
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.stock_quantity >= quantity
    }

    /// Take `quantity` units out of stock.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::InsufficientStock`] if fewer than `quantity` units are on hand.
    /// Stock is left untouched in that case.
    pub fn reduce_stock(&mut self, quantity: u32) -> Result<(), ProductError> {
        self.stock_quantity = self.stock_quantity.checked_sub(quantity).ok_or(
            ProductError::InsufficientStock {
                requested: quantity,
                available: self.stock_quantity,
            },
        )?;

        Ok(())
    }

    /// Put `quantity` units back into stock.
    ///
    /// # Errors
    ///
    /// Returns [`ProductError::StockOverflow`] if the counter would overflow.
    pub fn add_stock(&mut self, quantity: u32) -> Result<(), ProductError> {
        self.stock_quantity = self
            .stock_quantity
            .checked_add(quantity)
            .ok_or(ProductError::StockOverflow)?;

        Ok(())
    }

    /// Change the unit price.
    ///
    /// # Errors
    ///
    /// - [`ProductError::InvalidPrice`]: `price` is zero or negative.
    /// - [`ProductError::CurrencyMismatch`]: `price` is in another currency.
    pub fn set_base_price(&mut self, price: Money<'a, Currency>) -> Result<(), ProductError> {
        if *price.amount() <= Decimal::ZERO {
            return Err(ProductError::InvalidPrice(*price.amount()));
        }

        if price.currency() != self.base_price.currency() {
            return Err(ProductError::CurrencyMismatch {
                expected: self.base_price.currency().iso_alpha_code,
                actual: price.currency().iso_alpha_code,
            });
        }

        self.base_price = price;

        Ok(())
    }
}

impl fmt::Display for Product<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{{id='{}', name='{}', brand='{}', price={}, stock={}}}",
            self.category(),
            self.id,
            self.name,
            self.brand,
            self.base_price,
            self.stock_quantity
        )
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;

    fn mouse<'a>() -> Product<'a> {
        Product {
            id: ProductId::new("AC001"),
            name: "Wireless Mouse".to_string(),
            brand: "Logitech".to_string(),
            base_price: Money::from_minor(7999, USD),
            stock_quantity: 3,
            description: "Ergonomic wireless mouse".to_string(),
            specs: ProductSpecs::Accessory {
                accessory_type: "Mouse".to_string(),
                compatibility: "Universal".to_string(),
                color: "Black".to_string(),
                wireless: true,
            },
        }
    }

    #[test]
    fn category_follows_specs() {
        assert_eq!(mouse().category(), Category::Accessory);
        assert_eq!(Category::Laptop.to_string(), "Laptop");
    }

    #[test]
    fn specifications_render_accessory_fields() {
        assert_eq!(
            mouse().specifications(),
            "Type: Mouse, Compatibility: Universal, Color: Black, Wireless: Yes"
        );
    }

    #[test]
    fn reduce_stock_takes_units() -> TestResult {
        let mut product = mouse();

        product.reduce_stock(2)?;

        assert_eq!(product.stock_quantity, 1);

        Ok(())
    }

    #[test]
    fn reduce_stock_below_zero_is_rejected() {
        let mut product = mouse();

        let result = product.reduce_stock(4);

        assert_eq!(
            result,
            Err(ProductError::InsufficientStock {
                requested: 4,
                available: 3
            })
        );
        assert_eq!(product.stock_quantity, 3, "stock must be unchanged");
    }

    #[test]
    fn add_stock_overflow_is_rejected() {
        let mut product = mouse();
        product.stock_quantity = u32::MAX;

        assert_eq!(product.add_stock(1), Err(ProductError::StockOverflow));
    }

    #[test]
    fn set_base_price_rejects_non_positive() -> TestResult {
        let mut product = mouse();

        assert_eq!(
            product.set_base_price(Money::from_minor(0, USD)),
            Err(ProductError::InvalidPrice(Decimal::ZERO))
        );
        assert_eq!(product.base_price, Money::from_minor(7999, USD));

        product.set_base_price(Money::from_minor(6999, USD))?;

        assert_eq!(product.base_price, Money::from_minor(6999, USD));

        Ok(())
    }

    #[test]
    fn in_stock_checks() -> TestResult {
        let mut product = mouse();

        assert!(product.is_in_stock());
        assert!(product.has_stock_for(3));
        assert!(!product.has_stock_for(4));

        product.reduce_stock(3)?;

        assert!(!product.is_in_stock());

        Ok(())
    }

    #[test]
    fn specs_deserialize_from_tagged_yaml() -> TestResult {
        let specs: ProductSpecs = serde_norway::from_str(
            "category: desktop\nprocessor: AMD Ryzen 9\nram_gb: 32\nstorage_gb: 1000\ngraphics_card: RTX 4070\nmotherboard: ASUS ROG\nhas_wifi: true\n",
        )?;

        assert_eq!(specs.category(), Category::Desktop);
        assert!(specs.to_string().contains("GPU: RTX 4070"));

        Ok(())
    }
}
