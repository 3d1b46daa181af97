//! Customer registry service.
//!
//! Orchestrates CRUD over the customer store, CPF validation, and
//! address resolution through the postal lookup with a persistent
//! address cache in front of it.

mod error;

pub use error::ServiceError;

use std::sync::Arc;

use tracing::{debug, info, instrument};

use cadastro_core::{Cep, Cpf, CustomerId};

use crate::db::{AddressStore, CustomerStore, StoreError};
use crate::models::{Address, Customer, NewCustomer};
use crate::viacep::{LookupError, PostalLookup};

/// Customer registry service.
///
/// Handles listing, registration, updates, and removal of customers.
pub struct CustomerService {
    customers: Arc<dyn CustomerStore>,
    addresses: Arc<dyn AddressStore>,
    lookup: Arc<dyn PostalLookup>,
}

impl CustomerService {
    /// Create a new customer service.
    #[must_use]
    pub const fn new(
        customers: Arc<dyn CustomerStore>,
        addresses: Arc<dyn AddressStore>,
        lookup: Arc<dyn PostalLookup>,
    ) -> Self {
        Self {
            customers,
            addresses,
            lookup,
        }
    }

    /// List every registered customer in registration order.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>, ServiceError> {
        Ok(self.customers.find_all().await?)
    }

    /// Fetch a single customer by id.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no customer has this id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: CustomerId) -> Result<Customer, ServiceError> {
        self.customers
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound(id))
    }

    /// Register a new customer.
    ///
    /// Validates the CPF, rejects an exact name plus CPF spelling
    /// duplicate, resolves the CEP to a full address, and stores the
    /// customer.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::InvalidTaxId` if the CPF fails validation.
    /// Returns `ServiceError::Duplicate` if the same name and CPF
    /// spelling is already registered.
    /// Returns `ServiceError::Lookup` if the CEP is rejected or cannot
    /// be resolved.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn create(&self, new: NewCustomer) -> Result<Customer, ServiceError> {
        // The duplicate probe runs before validation, but an invalid
        // CPF is still the error reported first.
        let existing = self
            .customers
            .find_by_name_and_tax_id(&new.name, &new.tax_id)
            .await?;

        let tax_id = Cpf::parse(&new.tax_id)?;

        if existing.is_some() {
            return Err(ServiceError::Duplicate {
                name: new.name,
                tax_id: new.tax_id,
            });
        }

        let address = self.resolve_address(&new.address.postal_code).await?;

        let customer = self.customers.insert(&new.name, &tax_id, &address).await?;
        info!(id = %customer.id, "customer created");
        Ok(customer)
    }

    /// Replace every field of an existing customer.
    ///
    /// The id in the path wins; ids carried in the payload are ignored.
    /// Updates skip the duplicate probe, so renaming a customer onto an
    /// existing name and CPF pair is allowed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no customer has this id.
    /// Returns `ServiceError::InvalidTaxId` if the CPF fails validation.
    /// Returns `ServiceError::Lookup` if the CEP is rejected or cannot
    /// be resolved.
    #[instrument(skip(self, new), fields(name = %new.name))]
    pub async fn update(&self, id: CustomerId, new: NewCustomer) -> Result<Customer, ServiceError> {
        if !self.customers.exists_by_id(id).await? {
            return Err(ServiceError::NotFound(id));
        }

        let tax_id = Cpf::parse(&new.tax_id)?;
        let address = self.resolve_address(&new.address.postal_code).await?;

        let customer = Customer {
            id,
            name: new.name,
            tax_id,
            address,
        };
        self.customers
            .update(&customer)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => ServiceError::NotFound(id),
                other => ServiceError::Store(other),
            })?;

        info!(%id, "customer updated");
        Ok(customer)
    }

    /// Remove a customer from the registry.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if no customer has this id.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: CustomerId) -> Result<(), ServiceError> {
        if !self.customers.exists_by_id(id).await? {
            return Err(ServiceError::NotFound(id));
        }

        self.customers
            .delete_by_id(id)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => ServiceError::NotFound(id),
                other => ServiceError::Store(other),
            })?;

        info!(%id, "customer deleted");
        Ok(())
    }

    /// Check that the backing store answers queries.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Store` if the store is unreachable.
    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.customers.ping().await?)
    }

    /// Resolve a raw CEP to a full address.
    ///
    /// Cached addresses are served without touching the lookup; a miss
    /// triggers exactly one lookup and the result is cached before it
    /// is returned.
    async fn resolve_address(&self, raw: &str) -> Result<Address, ServiceError> {
        let cep = Cep::parse(raw).map_err(LookupError::InvalidPostalCode)?;

        if let Some(address) = self.addresses.find_by_postal_code(&cep).await? {
            debug!(%cep, "address cache hit");
            return Ok(address);
        }

        let address = self.lookup.lookup(&cep).await?;
        self.addresses.save(&address).await?;
        info!(%cep, "address fetched and cached");
        Ok(address)
    }
}
