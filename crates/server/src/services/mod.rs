//! Business logic services.
//!
//! # Services
//!
//! - `customers` - Customer registry CRUD with CEP address resolution

pub mod customers;

pub use customers::{CustomerService, ServiceError};
