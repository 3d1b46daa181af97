//! In-memory implementations of the store traits.
//!
//! These back the in-process service and router tests. Ids are assigned
//! from 1 upward and never reused, matching a `BIGSERIAL` column.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use tokio::sync::Mutex;

use cadastro_core::{Cep, Cpf, CustomerId};

use super::{AddressStore, CustomerStore, StoreError};
use crate::models::{Address, Customer};

/// Customer storage held in memory.
#[derive(Default)]
pub struct MemoryCustomerStore {
    inner: Mutex<Rows>,
}

#[derive(Default)]
struct Rows {
    // Keyed by id; BTreeMap iteration gives insertion order back.
    customers: BTreeMap<i64, Customer>,
    next_id: i64,
}

impl MemoryCustomerStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for MemoryCustomerStore {
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = self.inner.lock().await;
        Ok(rows.customers.values().cloned().collect())
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let rows = self.inner.lock().await;
        Ok(rows.customers.get(&id.as_i64()).cloned())
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, StoreError> {
        let rows = self.inner.lock().await;
        Ok(rows.customers.contains_key(&id.as_i64()))
    }

    async fn find_by_name_and_tax_id(
        &self,
        name: &str,
        tax_id: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let rows = self.inner.lock().await;
        Ok(rows
            .customers
            .values()
            .find(|c| c.name == name && c.tax_id.as_str() == tax_id)
            .cloned())
    }

    async fn insert(
        &self,
        name: &str,
        tax_id: &Cpf,
        address: &Address,
    ) -> Result<Customer, StoreError> {
        let mut rows = self.inner.lock().await;
        rows.next_id += 1;
        let id = rows.next_id;
        let customer = Customer {
            id: CustomerId::new(id),
            name: name.to_owned(),
            tax_id: tax_id.clone(),
            address: address.clone(),
        };
        rows.customers.insert(id, customer.clone());
        Ok(customer)
    }

    async fn update(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut rows = self.inner.lock().await;
        let id = customer.id.as_i64();
        if !rows.customers.contains_key(&id) {
            return Err(StoreError::NotFound);
        }
        rows.customers.insert(id, customer.clone());
        Ok(())
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), StoreError> {
        let mut rows = self.inner.lock().await;
        rows.customers
            .remove(&id.as_i64())
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

/// Address cache held in memory, keyed by the normalized CEP.
#[derive(Default)]
pub struct MemoryAddressStore {
    rows: Mutex<HashMap<String, Address>>,
}

impl MemoryAddressStore {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddressStore for MemoryAddressStore {
    async fn find_by_postal_code(&self, cep: &Cep) -> Result<Option<Address>, StoreError> {
        let rows = self.rows.lock().await;
        Ok(rows.get(cep.as_str()).cloned())
    }

    async fn save(&self, address: &Address) -> Result<(), StoreError> {
        let mut rows = self.rows.lock().await;
        rows.insert(address.postal_code.as_str().to_owned(), address.clone());
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn address(cep: &str) -> Address {
        Address {
            postal_code: Cep::parse(cep).unwrap(),
            street: "Praça da Sé".to_owned(),
            district: "Sé".to_owned(),
            city: "São Paulo".to_owned(),
            state: "SP".to_owned(),
        }
    }

    fn cpf(s: &str) -> Cpf {
        Cpf::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids() {
        let store = MemoryCustomerStore::new();
        let addr = address("01001000");

        let first = store
            .insert("Ana", &cpf("11144477735"), &addr)
            .await
            .unwrap();
        let second = store
            .insert("Bruno", &cpf("52998224725"), &addr)
            .await
            .unwrap();

        assert_eq!(first.id, CustomerId::new(1));
        assert_eq!(second.id, CustomerId::new(2));
    }

    #[tokio::test]
    async fn test_insert_stores_row_under_returned_id() {
        let store = MemoryCustomerStore::new();

        let created = store
            .insert("Ana", &cpf("11144477735"), &address("01001000"))
            .await
            .unwrap();

        let found = store.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
    }

    #[tokio::test]
    async fn test_ids_are_not_reused_after_delete() {
        let store = MemoryCustomerStore::new();
        let addr = address("01001000");

        let first = store
            .insert("Ana", &cpf("11144477735"), &addr)
            .await
            .unwrap();
        store.delete_by_id(first.id).await.unwrap();

        let second = store
            .insert("Bruno", &cpf("52998224725"), &addr)
            .await
            .unwrap();
        assert_eq!(second.id, CustomerId::new(2));
    }

    #[tokio::test]
    async fn test_find_all_in_insertion_order() {
        let store = MemoryCustomerStore::new();
        let addr = address("01001000");

        store
            .insert("Ana", &cpf("11144477735"), &addr)
            .await
            .unwrap();
        store
            .insert("Bruno", &cpf("52998224725"), &addr)
            .await
            .unwrap();

        let all = store.find_all().await.unwrap();
        let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Ana", "Bruno"]);
    }

    #[tokio::test]
    async fn test_update_missing_customer() {
        let store = MemoryCustomerStore::new();
        let customer = Customer {
            id: CustomerId::new(9),
            name: "Ana".to_owned(),
            tax_id: cpf("11144477735"),
            address: address("01001000"),
        };

        assert!(matches!(
            store.update(&customer).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_address_save_overwrites_per_cep() {
        let store = MemoryAddressStore::new();
        let addr = address("01001000");

        store.save(&addr).await.unwrap();
        let mut replacement = addr.clone();
        replacement.street = "Praça da Sé, lado ímpar".to_owned();
        store.save(&replacement).await.unwrap();

        let found = store
            .find_by_postal_code(&addr.postal_code)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.street, "Praça da Sé, lado ímpar");
    }
}
