//! # Tracestore
//!
//! Write path of a distributed-tracing span store.
//!
//! Tracestore routes each span to a physical index in an external document
//! store, writes the span's service/operation pair to a service index at most
//! once per cache window, and registers the index templates at startup.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tracestore::prelude::*;
//!
//! let store = SpanStore::builder()
//!     .store(client)
//!     .index_prefix("prod")
//!     .open()?;
//!
//! store.create_templates(span_template, service_template, "prod")?;
//! store.write_span(&span)?;
//!
//! // Graceful shutdown
//! store.close()?;
//! ```
//!
//! ## Indexing Modes
//!
//! | Mode | Span index | Service index |
//! |------|------------|---------------|
//! | DirectDated (default) | `prod-jaeger-span-2024-05-17` | `prod-jaeger-service-2024-05-17` |
//! | AliasRollover | `prod-jaeger-span-write` | `prod-jaeger-service-write` |
//! | ArchiveDated | `prod-jaeger-span-archive` | none |
//! | ArchiveAlias | `prod-jaeger-span-archive-write` | none |
//!
//! ## Delivery
//!
//! Service metadata writes are best effort: their failures never fail
//! `write_span`. With [`SpanStoreBuilder::bulk`], span writes are batched and a
//! failed flush is logged rather than returned.

#![warn(missing_docs)]

mod error;
mod store;
mod types;

pub mod prelude;

// Re-export main entry points
pub use error::{Error, Result};
pub use store::{SpanStore, SpanStoreBuilder};

// Re-export types
pub use types::*;
