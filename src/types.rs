//! Public types for the tracestore facade.
//!
//! This module re-exports types from internal crates with a clean public interface.

// Span model
pub use tracestore_core::{KeyValue, Log, Process, RefType, Span, SpanId, SpanRef, TagValue, TraceId};

// Storage documents and the store boundary
pub use tracestore_core::{
    DocumentKind, DocumentStore, FromDomain, IndexRequest, ServiceDocument, SpanConverter,
    SpanDocument,
};

// Stores and caches
pub use tracestore_storage::{BulkIndexer, BulkStats, Clock, ManualClock, MemoryStore, SystemClock};

// Routing, configuration and metrics
pub use tracestore_writer::{IndexNames, IndexingMode, WriterConfig, WriterMetricsSnapshot};
