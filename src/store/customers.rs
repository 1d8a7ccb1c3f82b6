use async_trait::async_trait;
use sqlx::SqlitePool;
use tokio::sync::Mutex;

use crate::error::StoreResult;
use crate::models::{ContactInfo, Customer};

/// Provisions placeholder customer records for the couple of a new party.
///
/// Callers treat this as best-effort: an error is logged and party creation
/// carries on without a linked customer.
#[async_trait]
pub trait CustomerDirectory: Send + Sync {
    /// Returns the id of the customer matching `contact`, creating one if
    /// needed.
    async fn ensure_customer(&self, contact: &ContactInfo) -> StoreResult<String>;
}

#[derive(Clone)]
pub struct SqliteCustomerDirectory {
    pool: SqlitePool,
}

impl SqliteCustomerDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CustomerDirectory for SqliteCustomerDirectory {
    async fn ensure_customer(&self, contact: &ContactInfo) -> StoreResult<String> {
        let customer = Customer::placeholder(contact);

        if let Some(email) = &customer.email {
            let existing: Option<(String,)> =
                sqlx::query_as("SELECT id FROM customers WHERE email = ?")
                    .bind(email)
                    .fetch_optional(&self.pool)
                    .await?;
            if let Some((id,)) = existing {
                return Ok(id);
            }
        }

        sqlx::query(
            "INSERT INTO customers (id, name, email, phone, source, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.source)
        .bind(&customer.created_at)
        .execute(&self.pool)
        .await?;

        tracing::debug!("Provisioned customer {} for {}", customer.id, customer.name);
        Ok(customer.id)
    }
}

/// Keeps provisioned customers in memory, keyed by email when one is known.
#[derive(Default)]
pub struct InMemoryCustomerDirectory {
    customers: Mutex<Vec<Customer>>,
}

impl InMemoryCustomerDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.customers.lock().await.clone()
    }
}

#[async_trait]
impl CustomerDirectory for InMemoryCustomerDirectory {
    async fn ensure_customer(&self, contact: &ContactInfo) -> StoreResult<String> {
        let customer = Customer::placeholder(contact);
        let mut customers = self.customers.lock().await;
        if let Some(existing) = customers
            .iter()
            .find(|c| c.email.is_some() && c.email == customer.email)
        {
            return Ok(existing.id.clone());
        }
        let id = customer.id.clone();
        customers.push(customer);
        Ok(id)
    }
}
