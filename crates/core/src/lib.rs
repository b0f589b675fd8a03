//! Core types for tracestore
//!
//! This crate holds everything the write path shares:
//! - [`types`]: the span domain model
//! - [`document`]: JSON documents and index requests sent to the store
//! - [`convert`]: domain → document conversion with tag flattening
//! - [`traits`]: the [`DocumentStore`] client boundary
//! - [`error`]: the shared [`Error`] type

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod convert;
pub mod document;
pub mod error;
pub mod traits;
pub mod types;

pub use convert::{FromDomain, SpanConverter};
pub use document::{DocumentKind, IndexRequest, ServiceDocument, SpanDocument};
pub use error::{Error, Result};
pub use traits::DocumentStore;
pub use types::{KeyValue, Log, Process, RefType, Span, SpanId, SpanRef, TagValue, TraceId};
