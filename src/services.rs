//! Services
//!
//! Business operations over the repositories. Each service owns its repository; the order
//! service borrows the product and customer services it needs for each call.

pub mod customers;
pub mod orders;
pub mod products;

pub use customers::{CustomerService, CustomerServiceError};
pub use orders::{OrderService, OrderServiceError, ProcessedOrder};
pub use products::{ProductService, ProductServiceError};
