//! Error types for the Hemolog API client.
//!
//! # Design
//! Every failure an operation can hit folds into `ApiError`, and
//! [`ApiError::kind`] sorts it into one of three user-facing kinds:
//! a missing form field, a transport or status failure, or a body that did
//! not have the expected shape. All three are terminal for the operation
//! that raised them and none is retried.

use thiserror::Error;

/// Required form fields missing at submission time.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("record type is required")]
    MissingType,

    #[error("date is required")]
    MissingDate,

    #[error("record type and date are required")]
    MissingTypeAndDate,
}

/// Calendar-day normalization failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    /// Shifting the instant by the offset left chrono's representable range.
    #[error("date is outside the supported range")]
    OutOfRange,

    #[error("unrecognized date: {0}")]
    Unparseable(String),
}

/// The host could not complete the HTTP round-trip (DNS, connect, TLS, I/O).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("request failed: {0}")]
pub struct TransportError(pub String);

/// The configuration collaborator could not supply an API key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API key configured")]
    MissingApiKey,
}

/// Errors returned by `HemologClient` and the list/form flows.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The picked date could not be normalized to a calendar day.
    #[error(transparent)]
    Date(#[from] DateError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),
}

/// How a failure is reported to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Transport,
    Parse,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Validation(_) | ApiError::Date(_) => ErrorKind::Validation,
            ApiError::Transport(_) | ApiError::HttpError { .. } => ErrorKind::Transport,
            ApiError::DeserializationError(_) | ApiError::SerializationError(_) => {
                ErrorKind::Parse
            }
        }
    }
}
