//! Typed Ids
//!
//! Store records are keyed by short human-readable codes (`LP001`, `PREM001`, `ORD001`).
//! Wrapping them in a typed id keeps a product code from being passed where an order code
//! is expected.

use std::{
    borrow::Borrow,
    cmp::Ordering,
    fmt::{Debug, Display, Formatter, Result as FmtResult},
    hash::{Hash, Hasher},
    marker::PhantomData,
};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A string identifier tagged with the kind of record it refers to.
pub struct TypedId<T>(String, PhantomData<fn() -> T>);

impl<T> TypedId<T> {
    /// Wrap an identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into(), PhantomData)
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Unwrap into the raw identifier.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl<T> Clone for TypedId<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone(), PhantomData)
    }
}

impl<T> Debug for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Debug::fmt(&self.0, f)
    }
}

impl<T> Display for TypedId<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

impl<T> PartialEq for TypedId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl<T> Eq for TypedId<T> {}

impl<T> Hash for TypedId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl<T> PartialOrd for TypedId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for TypedId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.cmp(&other.0)
    }
}

impl<T> Borrow<str> for TypedId<T> {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl<T> From<&str> for TypedId<T> {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<T> From<String> for TypedId<T> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl<T> Serialize for TypedId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de, T> Deserialize<'de> for TypedId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Product marker
#[derive(Debug)]
pub struct ProductRecord;

/// Customer marker
#[derive(Debug)]
pub struct CustomerRecord;

/// Order marker
#[derive(Debug)]
pub struct OrderRecord;

/// Product Id
pub type ProductId = TypedId<ProductRecord>;

/// Customer Id
pub type CustomerId = TypedId<CustomerRecord>;

/// Order Id
pub type OrderId = TypedId<OrderRecord>;

impl OrderId {
    /// Build the sequential order id for the given order number (`ORD001`, `ORD002`, ...).
    #[must_use]
    pub fn from_sequence(number: u32) -> Self {
        Self::new(format!("ORD{number:03}"))
    }
}

#[cfg(test)]
mod tests {
    use rustc_hash::FxHashMap;

    use super::*;

    #[test]
    fn order_ids_are_zero_padded() {
        assert_eq!(OrderId::from_sequence(1).as_str(), "ORD001");
        assert_eq!(OrderId::from_sequence(42).as_str(), "ORD042");
        assert_eq!(OrderId::from_sequence(1234).as_str(), "ORD1234");
    }

    #[test]
    fn ids_can_be_looked_up_by_str() {
        let mut map = FxHashMap::default();
        map.insert(ProductId::new("LP001"), 1);

        assert_eq!(map.get("LP001"), Some(&1));
        assert_eq!(map.get("LP002"), None);
    }

    #[test]
    fn ids_display_raw_value() {
        let id = CustomerId::from("PREM001");

        assert_eq!(id.to_string(), "PREM001");
        assert_eq!(format!("{id:?}"), "\"PREM001\"");
    }
}
