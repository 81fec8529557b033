//! Order record

use sqlx::FromRow;

/// Status given to orders created without one.
pub const DEFAULT_ORDER_STATUS: &str = "pending";

/// Persisted order
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Order {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub status: String,
}

/// Order not yet persisted; the id is assigned by storage.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub user_id: i64,
    pub amount: f64,
    pub status: String,
}
