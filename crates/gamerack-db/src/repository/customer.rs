//! # Customer Repository
//!
//! Database operations for customers. Plain single-table CRUD; the one
//! business rule is cpf uniqueness, enforced both here (pre-check with a
//! precise error) and by the UNIQUE constraint underneath.

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use gamerack_core::{CoreResult, Customer, CustomerStore, NewCustomer};

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Inserts a new customer.
    ///
    /// ## Returns
    /// * `Ok(Customer)` - Inserted customer with its assigned id
    /// * `Err(DbError::UniqueViolation)` - cpf already registered
    pub async fn insert(&self, customer: &NewCustomer) -> DbResult<Customer> {
        debug!(cpf = %customer.cpf, "Inserting customer");

        if self.find_by_cpf(&customer.cpf).await?.is_some() {
            return Err(DbError::duplicate("cpf", &customer.cpf));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO customers (name, phone, cpf)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(&customer.name)
        .bind(&customer.phone)
        .bind(&customer.cpf)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            id: result.last_insert_rowid(),
            name: customer.name.clone(),
            phone: customer.phone.clone(),
            cpf: customer.cpf.clone(),
        })
    }

    /// Gets a customer by id.
    pub async fn find_by_id(&self, id: i64) -> DbResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, cpf
            FROM customers
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_customer))
    }

    /// Gets a customer by cpf.
    pub async fn find_by_cpf(&self, cpf: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, phone, cpf
            FROM customers
            WHERE cpf = ?
            "#,
        )
        .bind(cpf)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(row_to_customer))
    }

    /// Lists all customers ordered by id.
    pub async fn list(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, phone, cpf
            FROM customers
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(row_to_customer).collect())
    }

    /// Updates an existing customer.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - no customer with this id
    /// * `Err(DbError::UniqueViolation)` - new cpf belongs to another customer
    pub async fn update(&self, id: i64, data: &NewCustomer) -> DbResult<Customer> {
        debug!(id = %id, "Updating customer");

        if self.find_by_id(id).await?.is_none() {
            return Err(DbError::not_found("Customer", id));
        }

        if let Some(existing) = self.find_by_cpf(&data.cpf).await? {
            if existing.id != id {
                return Err(DbError::duplicate("cpf", &data.cpf));
            }
        }

        sqlx::query(
            r#"
            UPDATE customers SET
                name = ?,
                phone = ?,
                cpf = ?
            WHERE id = ?
            "#,
        )
        .bind(&data.name)
        .bind(&data.phone)
        .bind(&data.cpf)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(Customer {
            id,
            name: data.name.clone(),
            phone: data.phone.clone(),
            cpf: data.cpf.clone(),
        })
    }

    /// Counts customers (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

fn row_to_customer(row: SqliteRow) -> Customer {
    Customer {
        id: row.get("id"),
        name: row.get("name"),
        phone: row.get("phone"),
        cpf: row.get("cpf"),
    }
}

// =============================================================================
// Store Trait Implementation
// =============================================================================

#[async_trait]
impl CustomerStore for CustomerRepository {
    async fn find_by_id(&self, id: i64) -> CoreResult<Option<Customer>> {
        Ok(CustomerRepository::find_by_id(self, id).await?)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
