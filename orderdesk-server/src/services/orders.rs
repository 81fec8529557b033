//! Order operations
//!
//! `create_order` checks that the user exists and inserts the order inside
//! the same unit of work, then commits. If the check fails nothing is
//! written. If the user disappears after the check, storage rejects the
//! insert (foreign key) and the caller still sees `NotFound("User")`, so an
//! order never outlives the call referencing a missing user.

use crate::db::UnitOfWork;
use crate::models::{NewOrder, Order, User, DEFAULT_ORDER_STATUS};

use super::{ServiceError, ServiceResult};

/// Look up a user, `None` if absent.
pub async fn get_user_by_id(uow: &mut dyn UnitOfWork, user_id: i64) -> ServiceResult<Option<User>> {
    Ok(uow.find_user(user_id).await?)
}

/// Create an order for an existing user and commit.
///
/// `status` falls back to [`DEFAULT_ORDER_STATUS`]. `amount` is stored as
/// given.
pub async fn create_order(
    uow: &mut dyn UnitOfWork,
    user_id: i64,
    amount: f64,
    status: Option<String>,
) -> ServiceResult<Order> {
    if get_user_by_id(uow, user_id).await?.is_none() {
        tracing::warn!(user_id, "order rejected: user not found");
        return Err(ServiceError::NotFound("User"));
    }

    let order = uow
        .insert_order(NewOrder {
            user_id,
            amount,
            status: status.unwrap_or_else(|| DEFAULT_ORDER_STATUS.to_string()),
        })
        .await?;
    uow.commit().await?;

    tracing::info!(order_id = order.id, user_id, amount, "order created");
    Ok(order)
}

/// All orders in creation order.
pub async fn get_all_orders(uow: &mut dyn UnitOfWork) -> ServiceResult<Vec<Order>> {
    Ok(uow.list_orders().await?)
}

/// A single order, `NotFound("Order")` if absent.
pub async fn get_order_by_id(uow: &mut dyn UnitOfWork, order_id: i64) -> ServiceResult<Order> {
    uow.find_order(order_id)
        .await?
        .ok_or(ServiceError::NotFound("Order"))
}
