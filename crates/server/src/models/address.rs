//! Address domain type.

use serde::{Deserialize, Serialize};

use cadastro_core::Cep;

/// A resolved street address, keyed by its CEP.
///
/// Addresses come from ViaCEP and are cached one row per postal code, so
/// every customer registered at the same CEP shares the same row. The
/// descriptive fields mirror what the provider returns and may be empty for
/// codes that cover a whole town.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Postal code this address was resolved from.
    pub postal_code: Cep,
    /// Street name (ViaCEP `logradouro`).
    pub street: String,
    /// District or neighborhood (ViaCEP `bairro`).
    pub district: String,
    /// City (ViaCEP `localidade`).
    pub city: String,
    /// Two-letter federative unit (ViaCEP `uf`).
    pub state: String,
}
