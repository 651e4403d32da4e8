//! Packaging
//!
//! Shipping boxes are handed out from a bounded pool and returned once an order is packed.
//! Returned boxes are reset and kept for reuse until the pool is full; extras are dropped.

use std::{collections::VecDeque, fmt, num::NonZeroUsize};

use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// Errors raised when building a pool.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PoolError {
    /// A pool must be able to hold at least one object.
    #[error("pool capacity must be greater than zero")]
    ZeroCapacity,
}

/// An object that can be cleaned for reuse.
pub trait Reusable {
    /// Clear any per-use state.
    fn reset(&mut self);
}

/// Bounded pool of reusable objects.
pub struct ObjectPool<T> {
    idle: VecDeque<T>,
    factory: Box<dyn Fn() -> T>,
    capacity: NonZeroUsize,
}

impl<T> fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectPool")
            .field("idle", &self.idle.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<T: Reusable> ObjectPool<T> {
    /// Create a pool keeping at most `capacity` idle objects, building new ones with `factory`.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, factory: impl Fn() -> T + 'static) -> Result<Self, PoolError> {
        let capacity = NonZeroUsize::new(capacity).ok_or(PoolError::ZeroCapacity)?;

        Ok(Self {
            idle: VecDeque::with_capacity(capacity.get()),
            factory: Box::new(factory),
            capacity,
        })
    }

    /// Take the most recently returned object, or build a new one if none are idle.
    pub fn acquire(&mut self) -> T {
        self.idle.pop_front().unwrap_or_else(|| (self.factory)())
    }

    /// Return an object. It is reset and kept if there is room, otherwise dropped.
    ///
    /// Returns whether the object was kept.
    pub fn release(&mut self, mut object: T) -> bool {
        object.reset();

        if self.idle.len() < self.capacity.get() {
            self.idle.push_front(object);
            true
        } else {
            false
        }
    }

    /// Idle objects ready for reuse
    pub fn available(&self) -> usize {
        self.idle.len()
    }

    /// Maximum idle objects kept
    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }
}

/// Box size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxSize {
    /// Accessories
    Small,

    /// Desktops and bundles
    #[default]
    Medium,

    /// Bulk orders
    Large,
}

impl BoxSize {
    /// Short code (`S`, `M`, `L`).
    pub fn code(self) -> &'static str {
        match self {
            BoxSize::Small => "S",
            BoxSize::Medium => "M",
            BoxSize::Large => "L",
        }
    }
}

impl fmt::Display for BoxSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A shipping box
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackagingBox {
    id: Uuid,

    /// Box size
    pub size: BoxSize,

    /// Shipping label, cleared when the box is returned
    pub label: Option<String>,
}

impl PackagingBox {
    /// A new, unlabelled box with a fresh id.
    pub fn new(size: BoxSize) -> Self {
        Self {
            id: Uuid::new_v4(),
            size,
            label: None,
        }
    }

    /// Box id, stable across reuse
    pub fn id(&self) -> Uuid {
        self.id
    }
}

impl Reusable for PackagingBox {
    fn reset(&mut self) {
        self.label = None;
    }
}

impl fmt::Display for PackagingBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.simple().to_string();
        let short: String = id.chars().take(8).collect();

        write!(
            f,
            "Box{{{}, id={short}, label='{}'}}",
            self.size,
            self.label.as_deref().unwrap_or_default()
        )
    }
}

/// Pool of shipping boxes that always hands out boxes of the default size.
#[derive(Debug)]
pub struct PackagingBoxPool {
    pool: ObjectPool<PackagingBox>,
    default_size: BoxSize,
}

impl PackagingBoxPool {
    /// Create a pool keeping up to `capacity` idle boxes.
    ///
    /// # Errors
    ///
    /// Returns [`PoolError::ZeroCapacity`] if `capacity` is zero.
    pub fn new(capacity: usize, default_size: BoxSize) -> Result<Self, PoolError> {
        Ok(Self {
            pool: ObjectPool::new(capacity, move || PackagingBox::new(default_size))?,
            default_size,
        })
    }

    /// Take a clean box of the default size.
    pub fn acquire(&mut self) -> PackagingBox {
        let mut packaging = self.pool.acquire();

        packaging.reset();
        packaging.size = self.default_size;

        packaging
    }

    /// Return a box to the pool. Returns whether it was kept.
    pub fn release(&mut self, packaging: PackagingBox) -> bool {
        self.pool.release(packaging)
    }

    /// Idle boxes
    pub fn available(&self) -> usize {
        self.pool.available()
    }

    /// Size handed out
    pub fn default_size(&self) -> BoxSize {
        self.default_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_capacity_is_rejected() {
        assert_eq!(
            PackagingBoxPool::new(0, BoxSize::Medium).err(),
            Some(PoolError::ZeroCapacity)
        );
    }

    #[test]
    fn released_boxes_are_reused_and_reset() -> Result<(), PoolError> {
        let mut pool = PackagingBoxPool::new(2, BoxSize::Medium)?;

        let mut first = pool.acquire();
        first.label = Some("ORD001".to_string());
        first.size = BoxSize::Large;
        let id = first.id();

        assert!(pool.release(first));
        assert_eq!(pool.available(), 1);

        let reused = pool.acquire();

        assert_eq!(reused.id(), id);
        assert_eq!(reused.label, None);
        assert_eq!(reused.size, BoxSize::Medium);
        assert_eq!(pool.available(), 0);

        Ok(())
    }

    #[test]
    fn full_pool_drops_returned_boxes() -> Result<(), PoolError> {
        let mut pool = PackagingBoxPool::new(1, BoxSize::Small)?;

        let a = pool.acquire();
        let b = pool.acquire();

        assert_ne!(a.id(), b.id());
        assert!(pool.release(a));
        assert!(!pool.release(b));
        assert_eq!(pool.available(), 1);

        Ok(())
    }

    #[test]
    fn most_recently_released_comes_back_first() -> Result<(), PoolError> {
        let mut pool = ObjectPool::new(3, || PackagingBox::new(BoxSize::Small))?;

        let a = pool.acquire();
        let b = pool.acquire();
        let b_id = b.id();

        pool.release(a);
        pool.release(b);

        assert_eq!(pool.acquire().id(), b_id);

        Ok(())
    }

    #[test]
    fn display_shows_short_id_and_label() {
        let mut packaging = PackagingBox::new(BoxSize::Large);
        packaging.label = Some("ORD003".to_string());

        let rendered = packaging.to_string();

        assert!(rendered.starts_with("Box{L, id="));
        assert!(rendered.ends_with("label='ORD003'}"));
    }
}
