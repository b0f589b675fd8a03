//! Main entry point for tracestore.
//!
//! This module provides the `SpanStore` struct, which owns a configured span
//! writer and the document store client behind it.

use crate::error::{Error, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracestore_core::{DocumentStore, Span, SpanConverter};
use tracestore_storage::{BulkIndexer, BulkStats, Clock, MemoryStore, SystemClock};
use tracestore_writer::{IndexNames, IndexingMode, SpanWriter, WriterConfig, WriterMetricsSnapshot};
use tracing::info;

/// The span store write path.
///
/// Create one with [`SpanStore::builder`] or [`SpanStore::ephemeral`].
///
/// # Example
///
/// ```ignore
/// use tracestore::prelude::*;
///
/// let store = SpanStore::builder()
///     .store(client)
///     .index_prefix("prod")
///     .use_aliases(true)
///     .open()?;
///
/// store.create_templates(SPAN_TEMPLATE, SERVICE_TEMPLATE, "prod")?;
/// store.write_span(&span)?;
///
/// // Graceful shutdown
/// store.close()?;
/// ```
pub struct SpanStore {
    writer: SpanWriter,
    bulk: Option<Arc<BulkIndexer<Arc<dyn DocumentStore>>>>,
}

impl SpanStore {
    /// Create a builder for store configuration.
    pub fn builder() -> SpanStoreBuilder {
        SpanStoreBuilder::new()
    }

    /// Create a store backed by an in-process [`MemoryStore`].
    ///
    /// Returns the memory store as well so callers can inspect what was
    /// written.
    pub fn ephemeral() -> Result<(Self, Arc<MemoryStore>)> {
        let memory = Arc::new(MemoryStore::new());
        let store = Self::builder().store(memory.clone()).open()?;
        Ok((store, memory))
    }

    /// Write a span and its service metadata.
    ///
    /// Only a failed span dispatch is reported; see [`SpanWriter::write_span`].
    pub fn write_span(&self, span: &Span) -> Result<()> {
        self.writer.write_span(span).map_err(Into::into)
    }

    /// Register the span and service index templates.
    pub fn create_templates(
        &self,
        span_template: &str,
        service_template: &str,
        index_prefix: &str,
    ) -> Result<()> {
        self.writer
            .create_templates(span_template, service_template, index_prefix)
            .map_err(Into::into)
    }

    /// Gracefully close the store.
    ///
    /// Releases the document store client. After calling `close()`, the store
    /// should not be used.
    pub fn close(&self) -> Result<()> {
        self.writer.close().map_err(Into::into)
    }

    /// Index names a span would be written to.
    pub fn index_names(&self, span: &Span) -> IndexNames {
        self.writer.index_names(span)
    }

    /// Get the indexing policy.
    pub fn mode(&self) -> IndexingMode {
        self.writer.mode()
    }

    /// Get write-path metrics.
    pub fn metrics(&self) -> WriterMetricsSnapshot {
        self.writer.metrics()
    }

    /// Send a partly filled bulk batch whose oldest document waited `max_age`.
    ///
    /// Returns whether a flush happened; always `false` without bulk mode.
    /// Nothing flushes on a timer, so callers drive this from their own loop.
    pub fn flush_if_older_than(&self, max_age: Duration) -> bool {
        self.bulk
            .as_ref()
            .is_some_and(|bulk| bulk.flush_if_older_than(max_age))
    }

    /// Bulk flush counters, if bulk mode is enabled.
    pub fn bulk_stats(&self) -> Option<BulkStats> {
        self.bulk.as_ref().map(|bulk| bulk.stats())
    }

    /// The underlying writer.
    pub fn writer(&self) -> &SpanWriter {
        &self.writer
    }
}

/// Builder for store configuration.
///
/// # Example
///
/// ```ignore
/// // Daily indices with a prefix
/// let store = SpanStore::builder()
///     .store(client)
///     .index_prefix("prod")
///     .open()?;
///
/// // Archive writes through the rollover alias
/// let archive = SpanStore::builder()
///     .store(client)
///     .archive(true)
///     .use_aliases(true)
///     .open()?;
/// ```
pub struct SpanStoreBuilder {
    config: WriterConfig,
    store: Option<Arc<dyn DocumentStore>>,
    clock: Option<Arc<dyn Clock>>,
    converter: Option<Arc<dyn SpanConverter>>,
    bulk_batch_size: Option<usize>,
}

impl SpanStoreBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self {
            config: WriterConfig::default(),
            store: None,
            clock: None,
            converter: None,
            bulk_batch_size: None,
        }
    }

    /// Replace the whole writer configuration.
    pub fn config(mut self, config: WriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the writer configuration from a TOML file.
    pub fn config_file(mut self, path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        self.config = WriterConfig::from_toml_str(&text)?;
        Ok(self)
    }

    /// Set the document store client.
    pub fn store(mut self, store: Arc<dyn DocumentStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Buffer span and service writes, flushing every `batch_size` documents.
    ///
    /// Flush failures are logged, not returned from `write_span`.
    pub fn bulk(mut self, batch_size: usize) -> Self {
        self.bulk_batch_size = Some(batch_size);
        self
    }

    /// Set the index prefix.
    pub fn index_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.index_prefix = prefix.into();
        self
    }

    /// Set the date layouts of dated span and service indices.
    pub fn date_layouts(mut self, span: impl Into<String>, service: impl Into<String>) -> Self {
        self.config.span_date_layout = span.into();
        self.config.service_date_layout = service.into();
        self
    }

    /// Write to the archive indices.
    pub fn archive(mut self, archive: bool) -> Self {
        self.config.archive = archive;
        self
    }

    /// Write through rollover aliases instead of dated indices.
    pub fn use_aliases(mut self, use_aliases: bool) -> Self {
        self.config.use_read_write_aliases = use_aliases;
        self
    }

    /// Set the service metadata cache TTL.
    ///
    /// Rounded up to whole seconds; a zero TTL selects the default.
    pub fn service_cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.service_cache_ttl_secs = Some(whole_secs_ceil(ttl));
        self
    }

    /// Set the index bookkeeping cache TTL.
    ///
    /// Rounded up to whole seconds; a zero TTL selects the default.
    pub fn index_cache_ttl(mut self, ttl: Duration) -> Self {
        self.config.index_cache_ttl_secs = Some(whole_secs_ceil(ttl));
        self
    }

    /// Configure tag flattening.
    pub fn tags_as_fields<I, S>(mut self, all: bool, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.all_tags_as_fields = all;
        self.config.tag_keys_as_fields = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Set the replacement for `.` in flattened tag keys.
    pub fn tag_dot_replacement(mut self, replacement: impl Into<String>) -> Self {
        self.config.tag_dot_replacement = replacement.into();
        self
    }

    /// Read cache time from `clock` instead of the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Use a custom span converter.
    pub fn converter(mut self, converter: Arc<dyn SpanConverter>) -> Self {
        self.converter = Some(converter);
        self
    }

    /// Build the store.
    ///
    /// # Errors
    ///
    /// `Config` if no document store was set or the configuration is invalid.
    pub fn open(self) -> Result<SpanStore> {
        self.config.validate()?;
        let mut store = self
            .store
            .ok_or_else(|| Error::Config("no document store configured".to_string()))?;
        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let bulk = self.bulk_batch_size.map(|batch_size| {
            Arc::new(BulkIndexer::with_clock(store.clone(), batch_size, clock.clone()))
        });
        if let Some(bulk) = &bulk {
            store = bulk.clone() as Arc<dyn DocumentStore>;
        }

        let mut writer = SpanWriter::with_clock(store, &self.config, clock);
        if let Some(converter) = self.converter {
            writer = writer.with_converter(converter);
        }

        info!(
            mode = ?writer.mode(),
            prefix = %self.config.index_prefix,
            bulk = self.bulk_batch_size.is_some(),
            "span store opened"
        );
        Ok(SpanStore { writer, bulk })
    }
}

impl Default for SpanStoreBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn whole_secs_ceil(ttl: Duration) -> u64 {
    let secs = ttl.as_secs();
    if ttl.subsec_nanos() > 0 {
        secs.saturating_add(1)
    } else {
        secs
    }
}
