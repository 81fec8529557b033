//! Postgres-backed units of work
//!
//! Each unit of work is one sqlx transaction checked out of the shared pool,
//! so `max_connections` bounds how many requests can hold a session at once.
//! A request that finds the pool exhausted waits up to `acquire_timeout` in
//! `begin` and then fails with a 500 instead of queueing forever.
//! sqlx rolls an unfinished transaction back when it is dropped, which is what
//! releases the connection on error paths and panics.

use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgConnection, PgPool, Postgres, Row, Transaction};

use super::session::{DbError, SessionProvider, UnitOfWork};
use crate::models::{Credential, NewOrder, NewUser, Order, User};

/// Default cap on concurrently open units of work.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 10;

/// Default wait for a free connection in `begin`.
pub const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection pool limits backing the units of work.
#[derive(Debug, Clone, PartialEq)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: DEFAULT_MAX_CONNECTIONS,
            acquire_timeout: DEFAULT_ACQUIRE_TIMEOUT,
        }
    }
}

impl PoolSettings {
    fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .max_connections(self.max_connections)
            .acquire_timeout(self.acquire_timeout)
    }
}

/// Hands out one transaction per request from a shared pool.
#[derive(Clone)]
pub struct PgSessionProvider {
    pool: PgPool,
}

impl PgSessionProvider {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Open a pool for `database_url` and wrap it.
    ///
    /// ```ignore
    /// let sessions = PgSessionProvider::connect(&url, &PoolSettings::default()).await?;
    /// schema::ensure(sessions.pool()).await?;
    /// ```
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<Self, DbError> {
        let pool = settings.pool_options().connect(database_url).await?;
        tracing::debug!(
            max_connections = settings.max_connections,
            acquire_timeout_ms = settings.acquire_timeout.as_millis() as u64,
            "database pool ready"
        );
        Ok(Self::new(pool))
    }

    /// Underlying pool, for schema bootstrap.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SessionProvider for PgSessionProvider {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DbError> {
        let tx = match self.pool.begin().await {
            Ok(tx) => tx,
            Err(sqlx::Error::PoolTimedOut) => {
                tracing::warn!(
                    size = self.pool.size(),
                    "no free connection for a new unit of work"
                );
                return Err(sqlx::Error::PoolTimedOut.into());
            }
            Err(e) => return Err(e.into()),
        };
        Ok(Box::new(PgSession { tx: Some(tx) }))
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

/// One open transaction. `tx` is `None` once committed.
pub struct PgSession {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgSession {
    fn conn(&mut self) -> Result<&mut PgConnection, DbError> {
        self.tx.as_deref_mut().ok_or(DbError::Closed)
    }
}

fn user_from_row(row: &PgRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        email: row.get("email"),
        password_credential: Credential::new(row.get::<String, _>("hashed_password")),
    }
}

#[async_trait]
impl UnitOfWork for PgSession {
    async fn find_user(&mut self, id: i64) -> Result<Option<User>, DbError> {
        let row = sqlx::query(
            r#"
            SELECT id, username, email, hashed_password
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User, DbError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, email, hashed_password)
            VALUES ($1, $2, $3)
            RETURNING id, username, email, hashed_password
            "#,
        )
        .bind(&user.username)
        .bind(&user.email)
        .bind(user.password_credential.expose())
        .fetch_one(self.conn()?)
        .await?;

        Ok(user_from_row(&row))
    }

    async fn list_users(&mut self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, email, hashed_password
            FROM users
            ORDER BY id
            "#,
        )
        .fetch_all(self.conn()?)
        .await?;

        Ok(rows.iter().map(user_from_row).collect())
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, DbError> {
        let result = sqlx::query_as::<_, Order>(
            r#"
            INSERT INTO orders (user_id, amount, status)
            VALUES ($1, $2, $3)
            RETURNING id, user_id, amount, status
            "#,
        )
        .bind(order.user_id)
        .bind(order.amount)
        .bind(&order.status)
        .fetch_one(self.conn()?)
        .await;

        match result {
            Ok(order) => Ok(order),
            // The user vanished between the existence check and the insert
            Err(sqlx::Error::Database(e)) if e.is_foreign_key_violation() => {
                Err(DbError::NotFound {
                    resource: "User",
                    id: order.user_id.to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_order(&mut self, id: i64) -> Result<Option<Order>, DbError> {
        let order = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, amount, status
            FROM orders
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(self.conn()?)
        .await?;

        Ok(order)
    }

    async fn list_orders(&mut self) -> Result<Vec<Order>, DbError> {
        let orders = sqlx::query_as::<_, Order>(
            r#"
            SELECT id, user_id, amount, status
            FROM orders
            ORDER BY id
            "#,
        )
        .fetch_all(self.conn()?)
        .await?;

        Ok(orders)
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        let tx = self.tx.take().ok_or(DbError::Closed)?;
        tx.commit().await?;
        Ok(())
    }
}

impl Drop for PgSession {
    fn drop(&mut self) {
        if self.tx.is_some() {
            tracing::debug!("rolling back uncommitted unit of work");
        }
    }
}
