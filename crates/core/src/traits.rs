//! Document store boundary
//!
//! The writer talks to the external store only through [`DocumentStore`].
//! Connection handling, retries and wire encoding belong to implementations.

use crate::document::IndexRequest;
use crate::error::Result;
use std::sync::Arc;

/// Client for an index/template document store
///
/// # Contract
///
/// - `create_template` overwrites an existing template of the same name
/// - `index` may be batched; `Ok(())` then means "accepted for sending"
/// - `close` is called once at shutdown, after all writers are done
///
/// # Thread Safety
///
/// Implementations are shared across all concurrent `write_span` callers.
pub trait DocumentStore: Send + Sync {
    /// Create or replace an index template
    fn create_template(&self, name: &str, body: &str) -> Result<()>;

    /// Submit one document
    fn index(&self, request: IndexRequest) -> Result<()>;

    /// Release the client
    fn close(&self) -> Result<()>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn create_template(&self, name: &str, body: &str) -> Result<()> {
        (**self).create_template(name, body)
    }

    fn index(&self, request: IndexRequest) -> Result<()> {
        (**self).index(request)
    }

    fn close(&self) -> Result<()> {
        (**self).close()
    }
}
