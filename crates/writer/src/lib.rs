//! Span write path for tracestore
//!
//! This crate decides where spans go and what gets written alongside them:
//! - [`IndexNameResolver`]: span start time → span/service index names
//! - [`ServiceIndexWriter`]: cache-gated service/operation metadata writes
//! - [`SpanWriter`]: the per-span write orchestration
//! - [`TemplateBootstrapper`]: index template registration at startup
//! - [`WriterConfig`]: construction-time settings, loadable from TOML

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod index;
pub mod metrics;
pub mod service;
pub mod templates;
pub mod writer;

pub use config::WriterConfig;
pub use index::{normalize_prefix, IndexNameResolver, IndexNames, IndexingMode};
pub use metrics::{WriterMetrics, WriterMetricsSnapshot};
pub use service::ServiceIndexWriter;
pub use templates::TemplateBootstrapper;
pub use writer::SpanWriter;
