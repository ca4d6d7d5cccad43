//! Request payloads accepted by the billing routes.

use thiserror::Error;
use validator::ValidationErrors;

use crate::domain::types::TypeConstraintError;

pub mod activity;
pub mod billing;
pub mod bills;

#[derive(Debug, Error)]
/// Errors that can occur when processing request data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Month and year query required.")]
    MissingPeriod,

    #[error("Invalid billing period: {0}")]
    InvalidPeriod(TypeConstraintError),

    #[error("Contract number is required.")]
    MissingContractNo,

    #[error("No bill files uploaded.")]
    NoFiles,

    #[error("Unknown action type: {0}")]
    UnknownAction(String),
}

/// Drops blank optional text.
pub(crate) fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
