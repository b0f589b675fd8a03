//! Storage-side building blocks for tracestore
//!
//! This crate implements:
//! - WriteCache: bounded LRU set with lazy TTL, used to dedupe writes
//! - Clock / SystemClock / ManualClock: time sources for cache expiry
//! - MemoryStore: in-process DocumentStore
//! - BulkIndexer: batching DocumentStore wrapper

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod bulk;
pub mod cache;
pub mod memory;

pub use bulk::{BulkIndexer, BulkStats, DEFAULT_BATCH_SIZE};
pub use cache::{Clock, ManualClock, SystemClock, WriteCache};
pub use memory::MemoryStore;
