//! Domain models for the customer registry.

pub mod address;
pub mod customer;

pub use address::Address;
pub use customer::{Customer, NewAddress, NewCustomer};
