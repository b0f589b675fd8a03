//! Span writer
//!
//! Realizes one logical "write a span":
//!
//! ```text
//! write_span(span):
//!   1. resolve(span.start_time)      -> (span index, service index)
//!   2. convert(span)                 -> span document
//!   3. service index non-empty?      -> ServiceIndexWriter::write (outcome ignored)
//!   4. store.index(span index, "span", document)
//!   5. return the dispatch result
//! ```
//!
//! ## Error Handling
//!
//! | Condition | Result |
//! |-----------|--------|
//! | span dispatch rejected | `Err` from the store |
//! | service metadata write failed | `Ok`, logged at `debug` |
//! | writer already closed | `Error::Closed` |
//!
//! With a batching store, `Ok` means the document was accepted into the
//! batch; a later flush failure cannot be reported through this call.
//!
//! ## Thread Safety
//!
//! `SpanWriter` is `Send + Sync`. Calls are independent: index names come from
//! immutable configuration and the span's own timestamp. The caches are the
//! only shared mutable state and are internally locked.

use crate::config::{WriterConfig, INDEX_CACHE_CAPACITY};
use crate::index::{IndexNameResolver, IndexNames, IndexingMode};
use crate::metrics::{WriterMetrics, WriterMetricsSnapshot};
use crate::service::ServiceIndexWriter;
use crate::templates::TemplateBootstrapper;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracestore_core::{
    DocumentKind, DocumentStore, Error, IndexRequest, Result, Span, SpanConverter,
};
use tracestore_storage::{Clock, SystemClock, WriteCache};
use tracing::{debug, info, warn};

/// Write path for spans and their service metadata
pub struct SpanWriter {
    store: Arc<dyn DocumentStore>,
    converter: Arc<dyn SpanConverter>,
    resolver: IndexNameResolver,
    service_writer: ServiceIndexWriter,
    /// Span indices seen within the bookkeeping window
    index_cache: WriteCache,
    templates: TemplateBootstrapper,
    metrics: Arc<WriterMetrics>,
    closed: AtomicBool,
}

impl SpanWriter {
    /// Create a writer on the system clock
    pub fn new(store: Arc<dyn DocumentStore>, config: &WriterConfig) -> Self {
        Self::with_clock(store, config, Arc::new(SystemClock))
    }

    /// Create a writer whose caches read time from `clock`
    pub fn with_clock(
        store: Arc<dyn DocumentStore>,
        config: &WriterConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mode = config.indexing_mode();
        let resolver = IndexNameResolver::new(
            mode,
            &config.index_prefix,
            &config.span_date_layout,
            &config.service_date_layout,
        );
        let service_cache = WriteCache::with_clock(
            config.service_cache_capacity,
            config.service_cache_ttl(),
            clock.clone(),
        );
        let index_cache =
            WriteCache::with_clock(INDEX_CACHE_CAPACITY, config.index_cache_ttl(), clock);
        let metrics = Arc::new(WriterMetrics::new());

        debug!(
            ?mode,
            prefix = %config.index_prefix,
            service_cache_ttl = ?service_cache.ttl(),
            index_cache_ttl = ?index_cache.ttl(),
            "span writer created"
        );

        Self {
            converter: Arc::new(config.converter()),
            resolver,
            service_writer: ServiceIndexWriter::new(store.clone(), service_cache),
            index_cache,
            templates: TemplateBootstrapper::new(store.clone(), metrics.clone()),
            metrics,
            store,
            closed: AtomicBool::new(false),
        }
    }

    /// Replace the converter built from the configuration
    pub fn with_converter(mut self, converter: Arc<dyn SpanConverter>) -> Self {
        self.converter = converter;
        self
    }

    /// Indexing policy of this writer
    pub fn mode(&self) -> IndexingMode {
        self.resolver.mode()
    }

    /// Index names a span would be written to
    pub fn index_names(&self, span: &Span) -> IndexNames {
        self.resolver.resolve(span.start_time)
    }

    /// Write a span and, outside archive mode, its service metadata
    ///
    /// # Errors
    ///
    /// Only the span dispatch is reported. A failed metadata write still
    /// returns `Ok(())`.
    pub fn write_span(&self, span: &Span) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }

        let names = self.resolver.resolve(span.start_time);
        let document = self.converter.convert(span);

        if names.has_service_index() {
            let attempted = self.service_writer.write(&names.service, &document);
            self.metrics.service_write(attempted);
        }

        self.observe_index(&names.span);

        let body = serde_json::to_value(&document)?;
        let result = self
            .store
            .index(IndexRequest::new(names.span, DocumentKind::Span, body));
        self.metrics.span_written(result.is_ok());
        if let Err(e) = &result {
            warn!(
                trace_id = %span.trace_id,
                span_id = %span.span_id,
                error = %e,
                "span write failed"
            );
        }
        result
    }

    /// Register the span and service index templates
    ///
    /// See [`TemplateBootstrapper::create_templates`].
    pub fn create_templates(
        &self,
        span_template: &str,
        service_template: &str,
        index_prefix: &str,
    ) -> Result<()> {
        self.templates
            .create_templates(span_template, service_template, index_prefix)
    }

    /// Release the store client
    ///
    /// Must not race with in-flight `write_span` calls. A second call returns
    /// [`Error::Closed`] without touching the store.
    pub fn close(&self) -> Result<()> {
        if self.closed.swap(true, Ordering::AcqRel) {
            return Err(Error::Closed);
        }
        info!("closing span writer");
        self.store.close()
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Current write-path counters
    pub fn metrics(&self) -> WriterMetricsSnapshot {
        self.metrics.snapshot()
    }

    fn observe_index(&self, index: &str) {
        if self.index_cache.contains(index) {
            return;
        }
        self.index_cache.mark(index);
        self.metrics.index_observed();
        debug!(index = %index, "first span for index in bookkeeping window");
    }
}
