use serde::Deserialize;
use thiserror::Error;

/// Failures of a single call to the leads backend.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Entity not found")]
    NotFound,

    #[error("Unauthorized")]
    Unauthorized,

    /// Non-2xx response carrying an `{error}` body.
    #[error("{message}")]
    ServerReported { status: u16, message: String },

    /// Network failure or a non-2xx response without a structured body.
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Encoding error: {0}")]
    Encoding(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Classifies a non-success response by status and body.
    pub fn from_status(status: u16, body: &[u8]) -> Self {
        match status {
            401 => ApiError::Unauthorized,
            404 => ApiError::NotFound,
            _ => match serde_json::from_slice::<ErrorBody>(body) {
                Ok(body) if !body.error.trim().is_empty() => ApiError::ServerReported {
                    status,
                    message: body.error,
                },
                _ => ApiError::Transport(format!("unexpected response status {status}")),
            },
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::Encoding(format!("Invalid response body: {err}"))
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        ApiError::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_variants() {
        assert!(matches!(ApiError::from_status(401, b""), ApiError::Unauthorized));
        assert!(matches!(ApiError::from_status(404, b"{}"), ApiError::NotFound));
    }

    #[test]
    fn structured_body_is_kept_verbatim() {
        let err = ApiError::from_status(409, br#"{"error":"Email already exists"}"#);

        match err {
            ApiError::ServerReported { status, message } => {
                assert_eq!(status, 409);
                assert_eq!(message, "Email already exists");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn unstructured_body_is_a_transport_failure() {
        assert!(matches!(
            ApiError::from_status(502, b"<html>Bad Gateway</html>"),
            ApiError::Transport(_)
        ));
        assert!(matches!(
            ApiError::from_status(500, br#"{"error":""}"#),
            ApiError::Transport(_)
        ));
    }
}
