//! Error taxonomy for calls to the generation backend

use thiserror::Error;

/// Errors that can occur when talking to the backend
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Transport failure, non-2xx status, or an explicit `error` field in the body
    #[error("{operation}: {message}")]
    Remote {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    /// Success response missing an expected field, or a field of the wrong type
    #[error("{operation}: unexpected response shape ({detail})")]
    InvalidResponseShape {
        operation: &'static str,
        detail: String,
    },

    /// Audio generation reported success without an audio file identifier
    #[error("{operation}: backend returned no audio file")]
    MissingArtifact { operation: &'static str },

    /// The request was aborted through its cancellation token
    #[error("{operation}: cancelled")]
    Cancelled { operation: &'static str },
}

impl ApiError {
    /// Create a remote error that did not carry an HTTP status (transport or body error)
    pub fn remote(operation: &'static str, message: impl Into<String>) -> Self {
        ApiError::Remote {
            operation,
            status: None,
            message: message.into(),
        }
    }

    /// Create a remote error for a non-2xx response
    pub fn http(operation: &'static str, status: u16, message: impl Into<String>) -> Self {
        ApiError::Remote {
            operation,
            status: Some(status),
            message: message.into(),
        }
    }

    pub fn invalid_shape(operation: &'static str, detail: impl Into<String>) -> Self {
        ApiError::InvalidResponseShape {
            operation,
            detail: detail.into(),
        }
    }

    pub fn missing_artifact(operation: &'static str) -> Self {
        ApiError::MissingArtifact { operation }
    }

    pub fn cancelled(operation: &'static str) -> Self {
        ApiError::Cancelled { operation }
    }

    /// Name of the backend operation that failed
    pub fn operation(&self) -> &'static str {
        match self {
            ApiError::Remote { operation, .. }
            | ApiError::InvalidResponseShape { operation, .. }
            | ApiError::MissingArtifact { operation }
            | ApiError::Cancelled { operation } => operation,
        }
    }

    /// HTTP status, when the failure came from a non-2xx response
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => *status,
            _ => None,
        }
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled { .. })
    }

    /// Short text for a notification. Shape errors read like remote errors
    /// to the user; the distinction is kept for logs.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Remote { message, .. } => message.clone(),
            ApiError::InvalidResponseShape { .. } => {
                "The backend returned an unexpected response".to_string()
            }
            ApiError::MissingArtifact { .. } => "No audio file name was returned".to_string(),
            ApiError::Cancelled { .. } => "Request cancelled".to_string(),
        }
    }
}
