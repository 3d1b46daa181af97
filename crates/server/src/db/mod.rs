//! Storage for the customer registry.
//!
//! # Tables
//!
//! - `customers` - Registered customers, each pointing at a cached address
//! - `addresses` - One row per CEP, filled from ViaCEP on first use
//!
//! The [`CustomerStore`] and [`AddressStore`] traits are the seams between
//! the registry workflow and storage. [`postgres`] holds the production
//! implementations; [`memory`] holds in-memory ones used by the in-process
//! tests.
//!
//! # Migrations
//!
//! Migrations are stored in `crates/server/migrations/` and run at startup
//! via [`run_migrations`].

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use cadastro_core::{Cep, Cpf, CustomerId};

use crate::models::{Address, Customer};

pub use memory::{MemoryAddressStore, MemoryCustomerStore};
pub use postgres::{PgAddressStore, PgCustomerStore};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,
}

/// Storage for registered customers.
#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// List every customer in insertion order.
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError>;

    /// Fetch one customer by id.
    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Check whether a customer id exists, without loading the row.
    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, StoreError>;

    /// Find a customer by the exact name and CPF spelling.
    ///
    /// Both arguments are compared as raw strings; the CPF is not
    /// normalized, so `111.444.777-35` and `11144477735` are distinct here.
    async fn find_by_name_and_tax_id(
        &self,
        name: &str,
        tax_id: &str,
    ) -> Result<Option<Customer>, StoreError>;

    /// Insert a customer and return it with its assigned id.
    ///
    /// The address row must already exist; [`AddressStore::save`] runs
    /// before any insert.
    async fn insert(
        &self,
        name: &str,
        tax_id: &Cpf,
        address: &Address,
    ) -> Result<Customer, StoreError>;

    /// Replace a customer's registration in full.
    async fn update(&self, customer: &Customer) -> Result<(), StoreError>;

    /// Delete a customer by id.
    async fn delete_by_id(&self, id: CustomerId) -> Result<(), StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Cache of resolved addresses, one per CEP.
#[async_trait]
pub trait AddressStore: Send + Sync {
    /// Fetch the cached address for a postal code.
    async fn find_by_postal_code(&self, cep: &Cep) -> Result<Option<Address>, StoreError>;

    /// Persist a resolved address, replacing any existing row for its CEP.
    async fn save(&self, address: &Address) -> Result<(), StoreError>;
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Apply pending migrations from `crates/server/migrations/`.
///
/// # Errors
///
/// Returns `sqlx::migrate::MigrateError` if a migration fails or the
/// migration history conflicts with the files on disk.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!().run(pool).await
}
