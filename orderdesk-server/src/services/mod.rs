//! Business operations, each running inside a caller-supplied unit of work

pub mod orders;
pub mod users;

use crate::db::DbError;

/// Service error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A referenced entity does not exist ("User", "Order")
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error(transparent)]
    Db(DbError),
}

impl From<DbError> for ServiceError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::NotFound { resource, .. } => Self::NotFound(resource),
            other => Self::Db(other),
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
