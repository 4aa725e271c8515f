//! Business workflows on top of the backend API.

use thiserror::Error;

use crate::api::errors::ApiError;

pub mod auth;
pub mod controller;
pub mod leads;

/// Errors surfaced to the user at the operation boundary.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Input rejected before anything was sent.
    #[error("{0}")]
    Validation(String),

    #[error("Lead not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Transport(String),

    /// Message provided by the backend, shown as is.
    #[error("{0}")]
    ServerReported(String),

    #[error("page {page} is outside 1..={total_pages}")]
    PageOutOfRange { page: usize, total_pages: usize },
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    /// Message for the user: validation and backend messages verbatim,
    /// `fallback` for everything else.
    pub fn message_or(&self, fallback: &str) -> String {
        match self {
            ServiceError::Validation(message) | ServiceError::ServerReported(message) => {
                message.clone()
            }
            _ => fallback.to_string(),
        }
    }
}

impl From<ApiError> for ServiceError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::NotFound => ServiceError::NotFound,
            ApiError::Unauthorized => ServiceError::Unauthorized,
            ApiError::ServerReported { message, .. } => ServiceError::ServerReported(message),
            ApiError::Transport(message) | ApiError::Encoding(message) => {
                ServiceError::Transport(message)
            }
        }
    }
}
