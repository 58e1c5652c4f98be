//! Error types for camera session control.
//!
//! Every failure the session can observe falls into one of a few categories,
//! exposed through [`RemoteError::kind`]:
//!
//! - **Network failures**: the request never produced a usable response
//! - **Backend failures**: the backend answered `status: "failure"` with a description
//! - **Validation rejections**: a guard refused the action before any request was made
//! - **Decode errors**: a success envelope was missing data the client needs
//! - **Config errors**: invalid client configuration
//!
//! None of these are fatal to a session. The presentation layer surfaces
//! [`RemoteError::user_message`] and keeps going.
//!
//! ```rust
//! use shutterlink::{ErrorKind, RemoteError};
//!
//! let error = RemoteError::backend("connect", "camera busy");
//! assert_eq!(error.kind(), ErrorKind::BackendFailure);
//! assert_eq!(error.user_message(), "camera busy");
//! assert!(!error.is_retryable());
//! ```

use thiserror::Error;

/// Result type alias for session operations.
pub type Result<T, E = RemoteError> = std::result::Result<T, E>;

/// Coarse classification of a [`RemoteError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkFailure,
    BackendFailure,
    ValidationRejection,
    Decode,
    Config,
}

/// Main error type for session operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RemoteError {
    #[error("{operation}: request failed: {reason}")]
    Network {
        operation: String,
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("{operation}: backend reported failure: {description}")]
    Backend { operation: String, description: String },

    #[error("{action} rejected: {reason}")]
    Rejected { action: String, reason: String },

    #[error("{operation}: unexpected response: {details}")]
    Decode { operation: String, details: String },

    #[error("Invalid configuration: {details}")]
    Config { details: String },
}

impl RemoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RemoteError::Network { .. } => ErrorKind::NetworkFailure,
            RemoteError::Backend { .. } => ErrorKind::BackendFailure,
            RemoteError::Rejected { .. } => ErrorKind::ValidationRejection,
            RemoteError::Decode { .. } => ErrorKind::Decode,
            RemoteError::Config { .. } => ErrorKind::Config,
        }
    }

    /// Returns whether repeating the same request could succeed without user intervention.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteError::Network { .. } => true,
            RemoteError::Backend { .. } => false,
            RemoteError::Rejected { .. } => false,
            RemoteError::Decode { .. } => false,
            RemoteError::Config { .. } => false,
        }
    }

    /// Text suitable for an alert or inline message.
    ///
    /// Backend failures surface the backend's own description verbatim.
    pub fn user_message(&self) -> String {
        match self {
            RemoteError::Backend { description, .. } => description.clone(),
            RemoteError::Network { reason, .. } => format!("Camera server unreachable: {reason}"),
            other => other.to_string(),
        }
    }

    /// Returns suggested recovery actions for this error.
    pub fn recovery_suggestions(&self) -> Vec<&'static str> {
        match self {
            RemoteError::Network { .. } => vec![
                "Check that the camera server is running",
                "Verify the configured backend URL",
                "Check the network connection to the server",
            ],
            RemoteError::Backend { .. } => vec![
                "Check that the camera is powered on and attached",
                "Make sure no other application holds the camera",
                "Refresh the camera list and try again",
            ],
            RemoteError::Rejected { .. } => vec![
                "Wait for the current action to finish",
                "Connect a camera before changing settings or shooting",
            ],
            RemoteError::Decode { .. } => vec![
                "Check that the server version matches this client",
                "Inspect the server logs for malformed responses",
            ],
            RemoteError::Config { .. } => vec![
                "Check the backend URL includes an http:// or https:// scheme",
                "Use a poll interval and request timeout above zero",
            ],
        }
    }

    /// Helper constructor for network errors with a source.
    pub fn network(
        operation: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        RemoteError::Network {
            operation: operation.into(),
            reason: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Helper constructor for network errors without an underlying source.
    pub fn network_failed(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        RemoteError::Network { operation: operation.into(), reason: reason.into(), source: None }
    }

    pub fn backend(operation: impl Into<String>, description: impl Into<String>) -> Self {
        RemoteError::Backend { operation: operation.into(), description: description.into() }
    }

    pub fn rejected(action: impl Into<String>, reason: impl Into<String>) -> Self {
        RemoteError::Rejected { action: action.into(), reason: reason.into() }
    }

    pub fn decode(operation: impl Into<String>, details: impl Into<String>) -> Self {
        RemoteError::Decode { operation: operation.into(), details: details.into() }
    }

    pub fn config(details: impl Into<String>) -> Self {
        RemoteError::Config { details: details.into() }
    }
}

impl From<serde_yaml_ng::Error> for RemoteError {
    fn from(err: serde_yaml_ng::Error) -> Self {
        RemoteError::Config { details: err.to_string() }
    }
}
