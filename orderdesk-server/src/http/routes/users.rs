//! User endpoints

use std::sync::Arc;

use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use crate::http::error::ApiError;
use crate::http::extractors::{Session, ValidJson};
use crate::http::server::AppState;
use crate::models::{Credential, NewUser, User};
use crate::services::users as users_service;

/// Create user request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// User response; the credential is never part of it
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
        }
    }
}

/// POST /users/ - create a user
async fn create_user(
    mut session: Session,
    ValidJson(req): ValidJson<CreateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = users_service::create_user(
        &mut *session,
        NewUser {
            username: req.username,
            email: req.email,
            password_credential: Credential::new(req.password),
        },
    )
    .await?;

    Ok(Json(UserResponse::from(user)))
}

/// GET /users/ - all users in creation order
async fn list_users(mut session: Session) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = users_service::list_users(&mut *session).await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/", get(list_users).post(create_user))
}
