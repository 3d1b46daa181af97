//! Customer domain types.
//!
//! `Customer` is the stored, validated record; `NewCustomer` is the wire
//! shape accepted by the create and update endpoints, with the CPF and CEP
//! still unvalidated strings.

use serde::{Deserialize, Serialize};

use cadastro_core::{Cpf, CustomerId};

use super::Address;

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    /// Store-assigned identifier.
    pub id: CustomerId,
    /// Customer name, stored exactly as given.
    pub name: String,
    /// Validated CPF, stored in its original spelling.
    pub tax_id: Cpf,
    /// Address resolved from the customer's CEP.
    pub address: Address,
}

/// Registration payload for creating or replacing a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    /// Customer name.
    pub name: String,
    /// CPF as written by the caller, validated by the service.
    pub tax_id: String,
    /// Address input; only the CEP is taken, the rest comes from ViaCEP.
    pub address: NewAddress,
}

/// Address input inside a registration payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAddress {
    /// CEP, bare or hyphenated.
    pub postal_code: String,
}
