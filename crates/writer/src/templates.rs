//! Index template bootstrap
//!
//! Registers the span and service templates at startup. The store's template
//! API overwrites by name, so running the bootstrap on every start is safe and
//! no local existence check is made.
//!
//! The two calls are sequential and short-circuit: if the span template fails
//! the service template is not attempted.

use crate::index::normalize_prefix;
use crate::metrics::WriterMetrics;
use std::sync::Arc;
use tracestore_core::{DocumentStore, Result};
use tracing::{info, warn};

/// Base name of the span template
pub const SPAN_TEMPLATE: &str = "jaeger-span";
/// Base name of the service template
pub const SERVICE_TEMPLATE: &str = "jaeger-service";

/// Creates the index templates the write path relies on
pub struct TemplateBootstrapper {
    store: Arc<dyn DocumentStore>,
    metrics: Arc<WriterMetrics>,
}

impl TemplateBootstrapper {
    /// Create a bootstrapper against `store`
    pub fn new(store: Arc<dyn DocumentStore>, metrics: Arc<WriterMetrics>) -> Self {
        Self { store, metrics }
    }

    /// Register `<prefix>jaeger-span` then `<prefix>jaeger-service`
    ///
    /// # Errors
    ///
    /// Returns the first store error. The service template is only sent once
    /// the span template succeeded.
    pub fn create_templates(
        &self,
        span_template: &str,
        service_template: &str,
        index_prefix: &str,
    ) -> Result<()> {
        let prefix = normalize_prefix(index_prefix);
        self.create(&format!("{}{}", prefix, SPAN_TEMPLATE), span_template)?;
        self.create(&format!("{}{}", prefix, SERVICE_TEMPLATE), service_template)
    }

    fn create(&self, name: &str, body: &str) -> Result<()> {
        let result = self.store.create_template(name, body);
        self.metrics.index_create(result.is_ok());
        match &result {
            Ok(()) => info!(template = %name, "index template created"),
            Err(e) => warn!(template = %name, error = %e, "index template creation failed"),
        }
        result
    }
}
