//! Order endpoints

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{EntityId, Session, ValidJson};
use crate::http::server::AppState;
use crate::models::Order;
use crate::services::orders as orders_service;

/// Create order request; a missing or null status means "pending"
#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub user_id: i64,
    pub amount: f64,
    pub status: Option<String>,
}

/// Order response
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub status: String,
}

impl From<Order> for OrderResponse {
    fn from(o: Order) -> Self {
        Self {
            id: o.id,
            user_id: o.user_id,
            amount: o.amount,
            status: o.status,
        }
    }
}

/// POST /orders/ - create an order for an existing user
async fn create_order(
    mut session: Session,
    ValidJson(req): ValidJson<CreateOrderRequest>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order =
        orders_service::create_order(&mut *session, req.user_id, req.amount, req.status).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// GET /orders/ - all orders in creation order
async fn list_orders(mut session: Session) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = orders_service::get_all_orders(&mut *session).await?;
    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}

/// GET /orders/{id} - a single order
async fn get_order(
    mut session: Session,
    EntityId(id): EntityId,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = orders_service::get_order_by_id(&mut *session, id).await?;
    Ok(Json(OrderResponse::from(order)))
}

/// Order routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", get(list_orders).post(create_order))
        .route("/orders/", get(list_orders).post(create_order))
        .route("/orders/{id}", get(get_order))
}
