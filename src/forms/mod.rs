//! Form definitions backing the lead pages.

use thiserror::Error;
use validator::ValidationErrors;

pub mod filter;
pub mod lead;

#[derive(Debug, Error)]
/// Errors that can occur when processing form data.
pub enum FormError {
    #[error("validation errors: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("invalid email address")]
    InvalidEmail,

    #[error("invalid lead source")]
    InvalidSource,

    #[error("invalid lead status")]
    InvalidStatus,

    #[error("score must be a whole number between 0 and 100")]
    InvalidScore,

    #[error("lead value must be a non-negative number")]
    InvalidLeadValue,

    #[error("invalid date, expected YYYY-MM-DD")]
    InvalidDate,
}
