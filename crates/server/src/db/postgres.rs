//! `PostgreSQL` implementations of the store traits.
//!
//! Queries use the runtime sqlx API and map rows through small `FromRow`
//! structs. Stored CPFs and CEPs are re-validated on the way out, so a row
//! edited behind the application's back surfaces as
//! [`StoreError::DataCorruption`] instead of an invalid domain value.

use async_trait::async_trait;
use sqlx::PgPool;

use cadastro_core::{Cep, Cpf, CustomerId};

use super::{AddressStore, CustomerStore, StoreError};
use crate::models::{Address, Customer};

/// Customer storage backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgCustomerStore {
    pool: PgPool,
}

impl PgCustomerStore {
    /// Create a customer store on top of a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Row shape shared by every customer query: the customer joined to its
/// cached address.
#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: i64,
    name: String,
    tax_id: String,
    cep: String,
    street: String,
    district: String,
    city: String,
    state: String,
}

impl CustomerRow {
    fn into_customer(self) -> Result<Customer, StoreError> {
        let tax_id = Cpf::parse(&self.tax_id)
            .map_err(|e| StoreError::DataCorruption(format!("invalid cpf in database: {e}")))?;
        let postal_code = Cep::parse(&self.cep)
            .map_err(|e| StoreError::DataCorruption(format!("invalid cep in database: {e}")))?;

        Ok(Customer {
            id: CustomerId::new(self.id),
            name: self.name,
            tax_id,
            address: Address {
                postal_code,
                street: self.street,
                district: self.district,
                city: self.city,
                state: self.state,
            },
        })
    }
}

#[async_trait]
impl CustomerStore for PgCustomerStore {
    async fn find_all(&self) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "
            SELECT c.id, c.name, c.tax_id, a.cep, a.street, a.district, a.city, a.state
            FROM customers c
            JOIN addresses a ON a.cep = c.address_cep
            ORDER BY c.id
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(CustomerRow::into_customer).collect()
    }

    async fn find_by_id(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "
            SELECT c.id, c.name, c.tax_id, a.cep, a.street, a.district, a.city, a.state
            FROM customers c
            JOIN addresses a ON a.cep = c.address_cep
            WHERE c.id = $1
            ",
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_customer).transpose()
    }

    async fn exists_by_id(&self, id: CustomerId) -> Result<bool, StoreError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS (SELECT 1 FROM customers WHERE id = $1)")
                .bind(id.as_i64())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn find_by_name_and_tax_id(
        &self,
        name: &str,
        tax_id: &str,
    ) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query_as::<_, CustomerRow>(
            "
            SELECT c.id, c.name, c.tax_id, a.cep, a.street, a.district, a.city, a.state
            FROM customers c
            JOIN addresses a ON a.cep = c.address_cep
            WHERE c.name = $1 AND c.tax_id = $2
            ",
        )
        .bind(name)
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CustomerRow::into_customer).transpose()
    }

    async fn insert(
        &self,
        name: &str,
        tax_id: &Cpf,
        address: &Address,
    ) -> Result<Customer, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            "INSERT INTO customers (name, tax_id, address_cep) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(name)
        .bind(tax_id.as_str())
        .bind(address.postal_code.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(Customer {
            id: CustomerId::new(id),
            name: name.to_owned(),
            tax_id: tax_id.clone(),
            address: address.clone(),
        })
    }

    async fn update(&self, customer: &Customer) -> Result<(), StoreError> {
        let result =
            sqlx::query("UPDATE customers SET name = $1, tax_id = $2, address_cep = $3 WHERE id = $4")
                .bind(&customer.name)
                .bind(customer.tax_id.as_str())
                .bind(customer.address.postal_code.as_str())
                .bind(customer.id.as_i64())
                .execute(&self.pool)
                .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn delete_by_id(&self, id: CustomerId) -> Result<(), StoreError> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(id.as_i64())
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }

        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_one(&self.pool).await?;
        Ok(())
    }
}

/// Address cache backed by `PostgreSQL`.
#[derive(Clone)]
pub struct PgAddressStore {
    pool: PgPool,
}

impl PgAddressStore {
    /// Create an address store on top of a connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AddressRow {
    cep: String,
    street: String,
    district: String,
    city: String,
    state: String,
}

impl AddressRow {
    fn into_address(self) -> Result<Address, StoreError> {
        let postal_code = Cep::parse(&self.cep)
            .map_err(|e| StoreError::DataCorruption(format!("invalid cep in database: {e}")))?;

        Ok(Address {
            postal_code,
            street: self.street,
            district: self.district,
            city: self.city,
            state: self.state,
        })
    }
}

#[async_trait]
impl AddressStore for PgAddressStore {
    async fn find_by_postal_code(&self, cep: &Cep) -> Result<Option<Address>, StoreError> {
        let row = sqlx::query_as::<_, AddressRow>(
            "SELECT cep, street, district, city, state FROM addresses WHERE cep = $1",
        )
        .bind(cep.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(AddressRow::into_address).transpose()
    }

    async fn save(&self, address: &Address) -> Result<(), StoreError> {
        // Last write wins when two requests resolve the same CEP at once.
        sqlx::query(
            "INSERT INTO addresses (cep, street, district, city, state)
             VALUES ($1, $2, $3, $4, $5)
             ON CONFLICT (cep) DO UPDATE
             SET street = EXCLUDED.street, district = EXCLUDED.district,
                 city = EXCLUDED.city, state = EXCLUDED.state",
        )
        .bind(address.postal_code.as_str())
        .bind(&address.street)
        .bind(&address.district)
        .bind(&address.city)
        .bind(&address.state)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
