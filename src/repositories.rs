//! Repositories
//!
//! In-memory record stores. Records live in a [`SlotMap`] and are found by their string id
//! through an [`FxHashMap`] index, so lookups by id and iteration over every record are both
//! cheap. Iteration follows slot order, which is insertion order until a record is removed.

use std::{borrow::Borrow, fmt, hash::Hash};

use rust_decimal::Decimal;
use rustc_hash::FxHashMap;
use slotmap::{Key, SlotMap, new_key_type};

use crate::{
    customers::{Customer, CustomerKind},
    ids::{CustomerId, OrderId, ProductId},
    orders::{Order, OrderStatus},
    products::{Category, Product},
};

new_key_type! {
    /// Product Key
    pub struct ProductKey;
}

new_key_type! {
    /// Customer Key
    pub struct CustomerKey;
}

new_key_type! {
    /// Order Key
    pub struct OrderKey;
}

/// A record that can be stored in a [`Repository`].
pub trait Record {
    /// Identifier type
    type Id: Clone + Eq + Hash + Borrow<str> + fmt::Debug;

    /// Identifier of this record.
    fn record_id(&self) -> &Self::Id;
}

impl Record for Product<'_> {
    type Id = ProductId;

    fn record_id(&self) -> &ProductId {
        &self.id
    }
}

impl Record for Customer {
    type Id = CustomerId;

    fn record_id(&self) -> &CustomerId {
        &self.id
    }
}

impl Record for Order<'_> {
    type Id = OrderId;

    fn record_id(&self) -> &OrderId {
        self.id()
    }
}

/// Keyed in-memory store.
#[derive(Debug, Clone)]
pub struct Repository<K: Key, V: Record> {
    records: SlotMap<K, V>,
    keys: FxHashMap<V::Id, K>,
}

impl<K: Key, V: Record> Default for Repository<K, V> {
    fn default() -> Self {
        Self {
            records: SlotMap::with_key(),
            keys: FxHashMap::default(),
        }
    }
}

impl<K: Key, V: Record> Repository<K, V> {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record, returning the record it replaced.
    pub fn save(&mut self, record: V) -> Option<V> {
        if let Some(key) = self.keys.get::<V::Id>(record.record_id())
            && let Some(slot) = self.records.get_mut(*key)
        {
            return Some(std::mem::replace(slot, record));
        }

        let id = record.record_id().clone();
        let key = self.records.insert(record);

        self.keys.insert(id, key);

        None
    }

    /// Find a record by id.
    pub fn find_by_id(&self, id: &str) -> Option<&V> {
        self.keys.get(id).and_then(|key| self.records.get(*key))
    }

    /// Find a record by id for in-place mutation.
    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut V> {
        self.keys.get(id).and_then(|key| self.records.get_mut(*key))
    }

    /// Whether a record with `id` exists.
    pub fn exists_by_id(&self, id: &str) -> bool {
        self.keys.contains_key(id)
    }

    /// Remove a record, returning it if it existed.
    pub fn delete_by_id(&mut self, id: &str) -> Option<V> {
        let key = self.keys.remove(id)?;

        self.records.remove(key)
    }

    /// Every record.
    pub fn iter(&self) -> impl Iterator<Item = &V> {
        self.records.values()
    }

    /// Records matching `predicate`.
    pub fn filter(&self, predicate: impl Fn(&V) -> bool) -> Vec<&V> {
        self.iter().filter(|record| predicate(record)).collect()
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the repository holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Product store
pub type ProductRepository<'a> = Repository<ProductKey, Product<'a>>;

/// Customer store
pub type CustomerRepository = Repository<CustomerKey, Customer>;

/// Order store
pub type OrderRepository<'a> = Repository<OrderKey, Order<'a>>;

impl<'a> Repository<ProductKey, Product<'a>> {
    /// Products in `category`.
    pub fn find_by_category(&self, category: Category) -> Vec<&Product<'a>> {
        self.filter(|product| product.category() == category)
    }

    /// Products by `brand`, ignoring case.
    pub fn find_by_brand(&self, brand: &str) -> Vec<&Product<'a>> {
        self.filter(|product| product.brand.eq_ignore_ascii_case(brand))
    }

    /// Products with at least one unit on hand.
    pub fn find_in_stock(&self) -> Vec<&Product<'a>> {
        self.filter(Product::is_in_stock)
    }

    /// Products priced within `min..=max` (major units).
    pub fn find_by_price_range(&self, min: Decimal, max: Decimal) -> Vec<&Product<'a>> {
        self.filter(|product| {
            let price = *product.base_price.amount();

            price >= min && price <= max
        })
    }

    /// Products whose name contains `query`, ignoring case.
    pub fn search_by_name(&self, query: &str) -> Vec<&Product<'a>> {
        let query = query.to_lowercase();

        self.filter(|product| product.name.to_lowercase().contains(&query))
    }

    /// Number of products in stock.
    pub fn in_stock_count(&self) -> usize {
        self.iter().filter(|product| product.is_in_stock()).count()
    }

    /// Overwrite the stock level of a product. Returns `false` if the product is unknown.
    pub fn update_stock(&mut self, id: &str, stock_quantity: u32) -> bool {
        match self.find_by_id_mut(id) {
            Some(product) => {
                product.stock_quantity = stock_quantity;
                true
            }
            None => false,
        }
    }
}

impl Repository<CustomerKey, Customer> {
    /// Find a customer by email, ignoring case.
    pub fn find_by_email(&self, email: &str) -> Option<&Customer> {
        self.iter()
            .find(|customer| customer.profile.email.eq_ignore_ascii_case(email))
    }

    /// Whether any customer uses `email`, ignoring case.
    pub fn email_exists(&self, email: &str) -> bool {
        self.find_by_email(email).is_some()
    }

    /// Customers of `kind`.
    pub fn find_by_kind(&self, kind: CustomerKind) -> Vec<&Customer> {
        self.filter(|customer| customer.kind() == kind)
    }

    /// Customers whose full name contains `query`, ignoring case.
    pub fn search_by_name(&self, query: &str) -> Vec<&Customer> {
        let query = query.to_lowercase();

        self.filter(|customer| customer.full_name().to_lowercase().contains(&query))
    }

    /// Customers with exactly this phone number.
    pub fn find_by_phone(&self, phone: &str) -> Vec<&Customer> {
        self.filter(|customer| customer.profile.phone == phone)
    }

    /// Number of customers of `kind`.
    pub fn count_by_kind(&self, kind: CustomerKind) -> usize {
        self.iter().filter(|customer| customer.kind() == kind).count()
    }
}

impl<'a> Repository<OrderKey, Order<'a>> {
    /// Orders placed by `customer_id`.
    pub fn find_by_customer(&self, customer_id: &str) -> Vec<&Order<'a>> {
        self.filter(|order| order.customer_id().as_str() == customer_id)
    }

    /// Orders in `status`.
    pub fn find_by_status(&self, status: OrderStatus) -> Vec<&Order<'a>> {
        self.filter(|order| order.status() == status)
    }

    /// Orders created within `start..=end`.
    pub fn find_by_date_range(
        &self,
        start: jiff::Timestamp,
        end: jiff::Timestamp,
    ) -> Vec<&Order<'a>> {
        self.filter(|order| order.created_at() >= start && order.created_at() <= end)
    }

    /// Orders whose total is at least `minimum_total` (major units).
    pub fn find_large_orders(&self, minimum_total: Decimal) -> Vec<&Order<'a>> {
        self.filter(|order| *order.total().amount() >= minimum_total)
    }

    /// Number of orders in `status`.
    pub fn count_by_status(&self, status: OrderStatus) -> usize {
        self.iter().filter(|order| order.status() == status).count()
    }

    /// Number of orders placed by `customer_id`.
    pub fn count_by_customer(&self, customer_id: &str) -> usize {
        self.iter()
            .filter(|order| order.customer_id().as_str() == customer_id)
            .count()
    }

    /// Sum of order totals, excluding cancelled orders. Saturates at `Decimal::MAX`.
    pub fn total_revenue(&self) -> Decimal {
        self.iter()
            .filter(|order| order.status() != OrderStatus::Cancelled)
            .map(|order| *order.total().amount())
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::{Money, iso::USD};
    use testresult::TestResult;

    use crate::{customers::CustomerProfile, products::ProductSpecs};

    use super::*;

    fn product<'a>(id: &str, name: &str, brand: &str, minor: i64, stock: u32) -> Product<'a> {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            brand: brand.to_string(),
            base_price: Money::from_minor(minor, USD),
            stock_quantity: stock,
            description: "Test product".to_string(),
            specs: ProductSpecs::Accessory {
                accessory_type: "Mouse".to_string(),
                compatibility: "Universal".to_string(),
                color: "Black".to_string(),
                wireless: true,
            },
        }
    }

    fn profile(first: &str, email: &str) -> CustomerProfile {
        CustomerProfile {
            first_name: first.to_string(),
            last_name: "Doe".to_string(),
            email: email.to_string(),
            phone: "+1234567890".to_string(),
            address: "123 Main St, Anytown, USA".to_string(),
        }
    }

    #[test]
    fn save_replaces_existing_record() {
        let mut products = ProductRepository::new();

        assert!(products.save(product("AC001", "Mouse", "Logitech", 7_999, 5)).is_none());

        let replaced = products.save(product("AC001", "Mouse v2", "Logitech", 8_999, 5));

        assert_eq!(replaced.map(|p| p.name), Some("Mouse".to_string()));
        assert_eq!(products.len(), 1);
        assert_eq!(
            products.find_by_id("AC001").map(|p| p.name.as_str()),
            Some("Mouse v2")
        );
    }

    #[test]
    fn iteration_follows_insertion_order() {
        let mut products = ProductRepository::new();

        for id in ["LP001", "AC001", "DT001"] {
            products.save(product(id, id, "Brand", 100, 1));
        }

        let ids: Vec<&str> = products.iter().map(|p| p.id.as_str()).collect();

        assert_eq!(ids, ["LP001", "AC001", "DT001"]);
    }

    #[test]
    fn delete_removes_index_entry() -> TestResult {
        let mut products = ProductRepository::new();
        products.save(product("AC001", "Mouse", "Logitech", 7_999, 5));

        let removed = products.delete_by_id("AC001").ok_or("missing product")?;

        assert_eq!(removed.id.as_str(), "AC001");
        assert!(!products.exists_by_id("AC001"));
        assert!(products.is_empty());
        assert!(products.delete_by_id("AC001").is_none());

        Ok(())
    }

    #[test]
    fn product_queries() {
        let mut products = ProductRepository::new();
        products.save(product("AC001", "Wireless Mouse", "Logitech", 7_999, 50));
        products.save(product("AC002", "Mechanical Keyboard", "Corsair", 15_999, 0));

        assert_eq!(products.find_by_brand("logitech").len(), 1);
        assert_eq!(products.find_in_stock().len(), 1);
        assert_eq!(products.in_stock_count(), 1);
        assert_eq!(products.search_by_name("KEY").len(), 1);
        assert_eq!(products.find_by_category(Category::Accessory).len(), 2);
        assert_eq!(
            products
                .find_by_price_range(Decimal::new(100, 0), Decimal::new(200, 0))
                .len(),
            1
        );

        assert!(products.update_stock("AC002", 3));
        assert!(!products.update_stock("ZZ999", 3));
        assert_eq!(products.in_stock_count(), 2);
    }

    #[test]
    fn customer_email_lookup_ignores_case() {
        let mut customers = CustomerRepository::new();
        customers.save(Customer::regular("REG001", profile("John", "john.doe@email.com")));
        customers.save(Customer::premium("PREM001", profile("Jane", "jane@email.com"), 0));

        assert!(customers.email_exists("JOHN.DOE@EMAIL.COM"));
        assert_eq!(
            customers.find_by_email("Jane@Email.com").map(|c| c.id.as_str()),
            Some("PREM001")
        );
        assert_eq!(customers.count_by_kind(CustomerKind::Premium), 1);
        assert_eq!(customers.search_by_name("jan").len(), 1);
        assert_eq!(customers.find_by_phone("+1234567890").len(), 2);
    }

    #[test]
    fn revenue_excludes_cancelled_orders() -> TestResult {
        let mut orders = OrderRepository::new();
        let mouse = product("AC001", "Mouse", "Logitech", 10_000, 10);

        let mut kept = Order::new(OrderId::from_sequence(1), CustomerId::new("REG001"), "addr", USD);
        kept.add_item(&mouse, 2)?;

        let mut cancelled =
            Order::new(OrderId::from_sequence(2), CustomerId::new("REG001"), "addr", USD);
        cancelled.add_item(&mouse, 1)?;
        cancelled.transition_to(OrderStatus::Cancelled)?;

        orders.save(kept);
        orders.save(cancelled);

        assert_eq!(orders.total_revenue(), Decimal::new(200, 0));
        assert_eq!(orders.count_by_customer("REG001"), 2);
        assert_eq!(orders.count_by_status(OrderStatus::Cancelled), 1);
        assert_eq!(orders.find_large_orders(Decimal::new(150, 0)).len(), 1);

        Ok(())
    }
}
