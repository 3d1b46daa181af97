//! Core types for Cadastro.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cep;
pub mod cpf;
pub mod id;

pub use cep::{Cep, CepError};
pub use cpf::{Cpf, CpfError};
pub use id::CustomerId;
