// src/error.rs
//! Application error types with structured error handling.
//!
//! Error types form the vocabulary for failure modes in the system.
//! The recovery policy lives with the callers: parse and per-image
//! download failures degrade to documented defaults, remote query
//! failures degrade to empty child lists or fallback records, and no
//! error is ever fatal to a batch.

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Notion API error codes as a typed vocabulary.
///
/// Instead of matching against magic strings like `"rate_limited"`,
/// the domain vocabulary is encoded in the type system.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteErrorCode {
    /// API rate limit exceeded
    RateLimited,
    /// The requested object does not exist or is inaccessible
    ObjectNotFound,
    /// API key is invalid or expired
    Unauthorized,
    /// API key lacks permission for this resource
    RestrictedResource,
    /// Request parameters failed Notion's validation
    ValidationFailed,
    /// Notion internal server error
    InternalError,
    /// Notion is temporarily unavailable
    ServiceUnavailable,
    /// HTTP status code fallback when the error body is unparseable
    HttpStatus(u16),
    /// An error code this client doesn't recognize yet
    Unknown(String),
}

impl RemoteErrorCode {
    /// Parse a Notion API error code string into the typed vocabulary.
    pub fn from_api_response(code: &str) -> Self {
        match code {
            "rate_limited" => Self::RateLimited,
            "object_not_found" => Self::ObjectNotFound,
            "unauthorized" => Self::Unauthorized,
            "restricted_resource" => Self::RestrictedResource,
            "validation_error" => Self::ValidationFailed,
            "internal_server_error" => Self::InternalError,
            "service_unavailable" => Self::ServiceUnavailable,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Create from an HTTP status code when the error body is unparseable.
    pub fn from_http_status(status: u16) -> Self {
        Self::HttpStatus(status)
    }

    /// Whether this error means the resource simply doesn't exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ObjectNotFound)
    }
}

impl fmt::Display for RemoteErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RateLimited => write!(f, "rate_limited"),
            Self::ObjectNotFound => write!(f, "object_not_found"),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::RestrictedResource => write!(f, "restricted_resource"),
            Self::ValidationFailed => write!(f, "validation_error"),
            Self::InternalError => write!(f, "internal_server_error"),
            Self::ServiceUnavailable => write!(f, "service_unavailable"),
            Self::HttpStatus(code) => write!(f, "http_{}", code),
            Self::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// Main application error type.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Missing configuration: {0}")]
    MissingConfiguration(String),

    #[error("Network failure: {0}")]
    NetworkFailure(#[from] reqwest::Error),

    #[error("Remote query against '{collection}' failed: {cause}")]
    RemoteQuery { collection: String, cause: String },

    #[error("Notion API returned an error ({code}): {message}")]
    RemoteService {
        code: RemoteErrorCode,
        message: String,
        status: reqwest::StatusCode,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Failed to parse {field} for {entity}: {cause}")]
    Parse {
        entity: String,
        field: String,
        cause: String,
    },

    #[error("Download of '{url}' to '{filename}' failed: {cause}")]
    Download {
        url: String,
        filename: String,
        #[source]
        cause: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Filesystem IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export to {path:?} failed: {cause}")]
    ExportFailed { path: PathBuf, cause: String },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    ValidationError(#[from] crate::types::ValidationError),
}

impl AppError {
    /// Builds a `Download` error from any transport or filesystem cause.
    pub fn download(
        url: impl Into<String>,
        filename: impl Into<String>,
        cause: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Download {
            url: url.into(),
            filename: filename.into(),
            cause: Box::new(cause),
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::MalformedResponse(err.to_string())
    }
}

/// Result type alias for convenience
pub type Result<T, E = AppError> = std::result::Result<T, E>;
