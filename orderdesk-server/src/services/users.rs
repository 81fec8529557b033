//! User operations

use crate::db::UnitOfWork;
use crate::models::{NewUser, User};

use super::ServiceResult;

/// Persist a user and commit.
pub async fn create_user(uow: &mut dyn UnitOfWork, user: NewUser) -> ServiceResult<User> {
    let user = uow.insert_user(user).await?;
    uow.commit().await?;
    tracing::info!(user_id = user.id, username = %user.username, "user created");
    Ok(user)
}

/// All users in creation order.
pub async fn list_users(uow: &mut dyn UnitOfWork) -> ServiceResult<Vec<User>> {
    Ok(uow.list_users().await?)
}
