//! Unit-of-work contract
//!
//! A [`SessionProvider`] is process-wide configuration (a pool, a store);
//! every call to [`SessionProvider::begin`] yields a fresh [`UnitOfWork`]
//! owned by exactly one request. Writes become visible to other units of
//! work only on [`UnitOfWork::commit`]. Dropping a unit of work without
//! committing rolls it back and releases whatever it holds.

use async_trait::async_trait;

use crate::models::{NewOrder, NewUser, Order, User};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("unit of work already committed")]
    Closed,
}

/// Factory for per-request units of work.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Open a new, exclusively owned unit of work.
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DbError>;

    /// Short backend name for logs.
    fn backend(&self) -> &'static str;
}

/// Transactional handle scoped to one request.
#[async_trait]
pub trait UnitOfWork: Send {
    async fn find_user(&mut self, id: i64) -> Result<Option<User>, DbError>;

    async fn insert_user(&mut self, user: NewUser) -> Result<User, DbError>;

    /// All users in creation order.
    async fn list_users(&mut self) -> Result<Vec<User>, DbError>;

    /// Insert an order. Fails with `NotFound("User")` when storage itself
    /// rejects the user reference.
    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, DbError>;

    async fn find_order(&mut self, id: i64) -> Result<Option<Order>, DbError>;

    /// All orders in creation order.
    async fn list_orders(&mut self) -> Result<Vec<Order>, DbError>;

    /// Make staged writes durable. Any further call returns [`DbError::Closed`].
    async fn commit(&mut self) -> Result<(), DbError>;
}
