//! Convenient imports for tracestore.
//!
//! This module re-exports the most commonly used types so you can get started
//! with a single import:
//!
//! ```ignore
//! use tracestore::prelude::*;
//!
//! let (store, _memory) = SpanStore::ephemeral()?;
//! store.write_span(&span)?;
//! ```

// Main entry point
pub use crate::store::{SpanStore, SpanStoreBuilder};

// Error handling
pub use crate::error::{Error, Result};

// Span model
pub use crate::types::{KeyValue, Log, Process, RefType, Span, SpanId, SpanRef, TagValue, TraceId};

// Configuration and routing
pub use crate::types::{IndexNames, IndexingMode, WriterConfig};

// Store boundary
pub use crate::types::{DocumentKind, DocumentStore, IndexRequest, MemoryStore};
