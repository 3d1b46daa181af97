//! Customer service error types.

use thiserror::Error;

use cadastro_core::{CpfError, CustomerId};

use crate::db::StoreError;
use crate::viacep::LookupError;

/// Errors that can occur during customer registry operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// No customer registered under this id.
    #[error("customer {0} not found")]
    NotFound(CustomerId),

    /// The submitted CPF failed validation.
    #[error("invalid CPF: {0}")]
    InvalidTaxId(#[from] CpfError),

    /// A customer with the same name and CPF is already registered.
    #[error("customer {name} with CPF {tax_id} is already registered")]
    Duplicate { name: String, tax_id: String },

    /// Address resolution failed.
    #[error("address lookup failed: {0}")]
    Lookup(#[from] LookupError),

    /// Database error.
    #[error("database error: {0}")]
    Store(#[from] StoreError),
}
