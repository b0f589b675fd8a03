//! Unified error type for tracestore.
//!
//! Wraps the errors of the internal crates and presents a single interface to
//! users of the facade.

use thiserror::Error;

/// All tracestore errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The document store rejected or failed a request
    #[error("store error: {0}")]
    Store(String),

    /// The store refused an index template
    #[error("template {name} rejected: {reason}")]
    TemplateRejected {
        /// Template name as sent to the store
        name: String,
        /// Reason reported by the store
        reason: String,
    },

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The span store was closed
    #[error("span store is closed")]
    Closed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for tracestore operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Check if the caller may retry the same call.
    ///
    /// Store failures may be transient; everything else will fail again.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Store(_))
    }

    /// Check if this is a use-after-close error.
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }
}

// Convert from internal core errors
impl From<tracestore_core::Error> for Error {
    fn from(e: tracestore_core::Error) -> Self {
        use tracestore_core::Error as CoreError;
        match e {
            CoreError::Store(msg) => Error::Store(msg),
            CoreError::TemplateRejected { name, reason } => Error::TemplateRejected { name, reason },
            CoreError::Serialization(msg) => Error::Serialization(msg),
            CoreError::Config(msg) => Error::Config(msg),
            CoreError::Closed => Error::Closed,
        }
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
