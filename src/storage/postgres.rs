//! PostgreSQL storage backend using sqlx.
//!
//! Provides `PostgresStore`, implementing both [`InvoiceStore`] and
//! [`UserStore`] on top of a `sqlx::PgPool`.
//!
//! # Feature flag
//!
//! This module is gated behind the `postgres` feature flag.
//!
//! # Schema
//!
//! Tables are created by the embedded migrations under `migrations/`.
//! Ids are native `UUID` columns; string ids are bound as text and cast with
//! `::uuid`, so a malformed id fails the statement instead of matching nothing.

use crate::config::DatabaseConfig;
use crate::core::error::{ConfigError, StorageError};
use crate::core::invoice::{Invoice, InvoiceChanges, InvoiceStatus, NewInvoice};
use crate::core::store::{InvoiceStore, User, UserStore};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;

const BACKEND: &str = "PostgreSQL";

fn query_error(err: sqlx::Error) -> anyhow::Error {
    anyhow::Error::new(StorageError::Query {
        backend: BACKEND.to_string(),
        message: err.to_string(),
    })
}

/// Invoice and user storage backed by PostgreSQL.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Create a new `PostgresStore` with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Open a pool using the database section of the config
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let url = config.url.as_deref().ok_or_else(|| ConfigError::InvalidValue {
            field: "database.url".to_string(),
            value: String::new(),
            message: "a database url is required for the PostgreSQL store".to_string(),
        })?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect(url)
            .await
            .map_err(|e| StorageError::Connection {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self::new(pool))
    }

    /// Apply the embedded migrations (idempotent).
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| anyhow!("Failed to run migrations: {}", e))?;
        Ok(())
    }
}

#[async_trait]
impl InvoiceStore for PostgresStore {
    async fn insert(&self, invoice: NewInvoice) -> Result<()> {
        sqlx::query(
            "INSERT INTO invoices (customer_id, amount, status, date)
             VALUES ($1::uuid, $2, $3, $4)",
        )
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(())
    }

    async fn update(&self, id: &str, changes: InvoiceChanges) -> Result<u64> {
        let result = sqlx::query(
            "UPDATE invoices
             SET customer_id = $1::uuid, amount = $2, status = $3
             WHERE id = $4::uuid",
        )
        .bind(&changes.customer_id)
        .bind(changes.amount)
        .bind(changes.status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(result.rows_affected())
    }

    async fn delete(&self, id: &str) -> Result<u64> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = $1::uuid")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(query_error)?;

        Ok(result.rows_affected())
    }

    async fn list(&self) -> Result<Vec<Invoice>> {
        let rows = sqlx::query(
            "SELECT id::text AS id, customer_id::text AS customer_id, amount, status, date
             FROM invoices
             ORDER BY date DESC, id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(query_error)?;

        rows.into_iter()
            .map(|row| -> Result<Invoice> {
                let status: String = row.try_get("status")?;
                Ok(Invoice {
                    id: row.try_get("id")?,
                    customer_id: row.try_get("customer_id")?,
                    amount: row.try_get("amount")?,
                    status: status.parse::<InvoiceStatus>().map_err(|e| anyhow!(e))?,
                    date: row.try_get::<NaiveDate, _>("date")?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl UserStore for PostgresStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id::text AS id, name, email, password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(query_error)?;

        row.map(|row| -> Result<User> {
            Ok(User {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                email: row.try_get("email")?,
                password: row.try_get("password")?,
            })
        })
        .transpose()
    }

    async fn insert_user(&self, user: User) -> Result<()> {
        sqlx::query(
            "INSERT INTO users (id, name, email, password)
             VALUES ($1::uuid, $2, $3, $4)
             ON CONFLICT (email) DO NOTHING",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.email)
        .bind(&user.password)
        .execute(&self.pool)
        .await
        .map_err(query_error)?;

        Ok(())
    }
}
