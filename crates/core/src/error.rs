//! Error types shared by the write path
//!
//! Only the primary span dispatch, template creation and shutdown report
//! errors to callers. The service metadata side-write never surfaces one.

use thiserror::Error;

/// Errors produced by stores, converters and the writer
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

    /// A document could not be encoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid construction-time configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The store client has already been released
    #[error("store client is closed")]
    Closed,
}

/// Result type for write-path operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Whether the failure came from the store rather than from local state
    pub fn is_store_error(&self) -> bool {
        matches!(self, Error::Store(_) | Error::TemplateRejected { .. })
    }

    /// Whether the failure is a use-after-close
    pub fn is_closed(&self) -> bool {
        matches!(self, Error::Closed)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}
