//! In-process units of work
//!
//! Backs development runs without a database and the HTTP tests. Committed
//! rows live behind one async mutex; each unit of work stages its inserts
//! privately (reads see committed rows plus its own staged ones) and applies
//! them in a single critical section on commit. Ids come from shared counters
//! when a row is staged, so like a database sequence they are never reused and
//! a rolled-back insert leaves a gap.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::session::{DbError, SessionProvider, UnitOfWork};
use crate::models::{NewOrder, NewUser, Order, User};

#[derive(Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    orders: BTreeMap<i64, Order>,
    last_user_id: i64,
    last_order_id: i64,
}

/// Shared in-memory store; clones share the same tables.
#[derive(Clone, Default)]
pub struct MemorySessionProvider {
    tables: Arc<Mutex<Tables>>,
}

impl MemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.tables.lock().await.orders.len()
    }

    /// Number of committed users.
    pub async fn user_count(&self) -> usize {
        self.tables.lock().await.users.len()
    }
}

#[async_trait]
impl SessionProvider for MemorySessionProvider {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, DbError> {
        Ok(Box::new(MemorySession {
            tables: Arc::clone(&self.tables),
            staged_users: BTreeMap::new(),
            staged_orders: BTreeMap::new(),
            closed: false,
        }))
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// Unit of work over [`MemorySessionProvider`]. Dropping it discards staged rows.
pub struct MemorySession {
    tables: Arc<Mutex<Tables>>,
    staged_users: BTreeMap<i64, User>,
    staged_orders: BTreeMap<i64, Order>,
    closed: bool,
}

impl MemorySession {
    fn ensure_open(&self) -> Result<(), DbError> {
        if self.closed {
            return Err(DbError::Closed);
        }
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemorySession {
    async fn find_user(&mut self, id: i64) -> Result<Option<User>, DbError> {
        self.ensure_open()?;
        if let Some(user) = self.staged_users.get(&id) {
            return Ok(Some(user.clone()));
        }
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn insert_user(&mut self, user: NewUser) -> Result<User, DbError> {
        self.ensure_open()?;
        let id = {
            let mut tables = self.tables.lock().await;
            tables.last_user_id += 1;
            tables.last_user_id
        };
        let user = User {
            id,
            username: user.username,
            email: user.email,
            password_credential: user.password_credential,
        };
        self.staged_users.insert(id, user.clone());
        Ok(user)
    }

    async fn list_users(&mut self) -> Result<Vec<User>, DbError> {
        self.ensure_open()?;
        let mut users = self.tables.lock().await.users.clone();
        users.extend(self.staged_users.clone());
        Ok(users.into_values().collect())
    }

    async fn insert_order(&mut self, order: NewOrder) -> Result<Order, DbError> {
        self.ensure_open()?;
        let id = {
            let mut tables = self.tables.lock().await;
            if !tables.users.contains_key(&order.user_id)
                && !self.staged_users.contains_key(&order.user_id)
            {
                return Err(user_not_found(order.user_id));
            }
            tables.last_order_id += 1;
            tables.last_order_id
        };
        let order = Order {
            id,
            user_id: order.user_id,
            amount: order.amount,
            status: order.status,
        };
        self.staged_orders.insert(id, order.clone());
        Ok(order)
    }

    async fn find_order(&mut self, id: i64) -> Result<Option<Order>, DbError> {
        self.ensure_open()?;
        if let Some(order) = self.staged_orders.get(&id) {
            return Ok(Some(order.clone()));
        }
        Ok(self.tables.lock().await.orders.get(&id).cloned())
    }

    async fn list_orders(&mut self) -> Result<Vec<Order>, DbError> {
        self.ensure_open()?;
        let mut orders = self.tables.lock().await.orders.clone();
        orders.extend(self.staged_orders.clone());
        Ok(orders.into_values().collect())
    }

    async fn commit(&mut self) -> Result<(), DbError> {
        self.ensure_open()?;
        let mut tables = self.tables.lock().await;

        // Same guarantee a foreign key gives: nothing is applied if any staged
        // order points at a user that is neither committed nor staged here.
        if let Some(orphan) = self.staged_orders.values().find(|o| {
            !tables.users.contains_key(&o.user_id) && !self.staged_users.contains_key(&o.user_id)
        }) {
            return Err(user_not_found(orphan.user_id));
        }

        tables.users.append(&mut self.staged_users);
        tables.orders.append(&mut self.staged_orders);
        self.closed = true;
        Ok(())
    }
}

impl Drop for MemorySession {
    fn drop(&mut self) {
        if !self.closed && !(self.staged_users.is_empty() && self.staged_orders.is_empty()) {
            tracing::debug!(
                users = self.staged_users.len(),
                orders = self.staged_orders.len(),
                "discarding uncommitted unit of work"
            );
        }
    }
}

fn user_not_found(user_id: i64) -> DbError {
    DbError::NotFound {
        resource: "User",
        id: user_id.to_string(),
    }
}
