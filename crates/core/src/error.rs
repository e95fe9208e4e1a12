//! Error types for the fobench domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error variant.

use thiserror::Error;

/// The top-level error type for all fobench operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Provider errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Storage errors ---
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    // --- Prompt template errors ---
    #[error("Template error: {0}")]
    Template(#[from] TemplateError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Caller errors ---
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // --- Generic ---
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

/// How a surfaced error should be reported at the service boundary.
///
/// The core never speaks HTTP; the gateway maps each class to a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// The model endpoint could not be reached (or timed out).
    ServiceUnavailable,
    /// The model endpoint throttled the request.
    RateLimited,
    /// The model endpoint answered with a non-success status.
    BadUpstream(u16),
    /// The caller sent something unusable.
    BadRequest,
    /// Anything else, including configuration faults.
    Internal,
}

impl FailureClass {
    /// The status code the boundary reports for this class.
    pub fn status_code(self) -> u16 {
        match self {
            Self::ServiceUnavailable => 503,
            Self::RateLimited => 429,
            Self::BadUpstream(code) => code,
            Self::BadRequest => 400,
            Self::Internal => 500,
        }
    }
}

impl Error {
    /// Classify this error for the service boundary.
    pub fn class(&self) -> FailureClass {
        match self {
            Error::Provider(e) => e.class(),
            Error::InvalidInput(_) => FailureClass::BadRequest,
            Error::Store(_)
            | Error::Template(_)
            | Error::Config { .. }
            | Error::Serialization(_)
            | Error::Internal(_) => FailureClass::Internal,
        }
    }
}

// --- Bounded context errors ---

#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("Failed to connect to model API: {0}")]
    Connection(String),

    #[error("Model API rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Model API error: {message} (status: {status_code})")]
    Status { status_code: u16, message: String },

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

impl ProviderError {
    pub fn class(&self) -> FailureClass {
        match self {
            ProviderError::Connection(_) | ProviderError::Timeout(_) => {
                FailureClass::ServiceUnavailable
            }
            ProviderError::RateLimited { .. } => FailureClass::RateLimited,
            ProviderError::Status { status_code, .. } => FailureClass::BadUpstream(*status_code),
            ProviderError::NotConfigured(_) => FailureClass::Internal,
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Query failed: {0}")]
    QueryFailed(String),

    #[error("Malformed record for key {key}: {reason}")]
    Malformed { key: String, reason: String },

    #[error("Migration failed: {0}")]
    MigrationFailed(String),
}

#[derive(Debug, Clone, Error)]
pub enum TemplateError {
    #[error("Failed to read prompt file {path}: {reason}")]
    Read { path: String, reason: String },

    #[error("Failed to parse prompt file: {0}")]
    Parse(String),

    #[error("Prompt template has no <message role=\"system\"> block")]
    MissingSystemMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_error_displays_correctly() {
        let err = Error::Provider(ProviderError::Status {
            status_code: 529,
            message: "Overloaded".into(),
        });
        assert!(err.to_string().contains("529"));
        assert!(err.to_string().contains("Overloaded"));
    }

    #[test]
    fn provider_errors_keep_their_status() {
        assert_eq!(
            Error::from(ProviderError::Connection("refused".into())).class().status_code(),
            503
        );
        assert_eq!(
            Error::from(ProviderError::RateLimited { retry_after_secs: 5 })
                .class()
                .status_code(),
            429
        );
        assert_eq!(
            Error::from(ProviderError::Status {
                status_code: 401,
                message: "bad key".into()
            })
            .class(),
            FailureClass::BadUpstream(401)
        );
        assert_eq!(
            Error::from(ProviderError::Timeout("300s".into())).class(),
            FailureClass::ServiceUnavailable
        );
    }

    #[test]
    fn template_and_internal_errors_are_internal() {
        assert_eq!(
            Error::from(TemplateError::MissingSystemMessage).class().status_code(),
            500
        );
        assert_eq!(Error::Internal("boom".into()).class(), FailureClass::Internal);
        assert_eq!(
            Error::InvalidInput("payload".into()).class().status_code(),
            400
        );
    }
}
