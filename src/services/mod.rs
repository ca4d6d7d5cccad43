//! Application services orchestrating the repositories for the HTTP layer.

use thiserror::Error;

use crate::repository::errors::RepositoryError;

pub mod activity;
pub mod billing;
pub mod bills;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Not found")]
    NotFound,

    #[error("{0}")]
    Form(String),

    #[error("Type constraint violation: {0}")]
    TypeConstraint(String),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
