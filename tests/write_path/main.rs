//! Write Path Integration Test Suite
//!
//! Exercises the span store facade end to end against in-process stores.
//!
//! ## Modules
//!
//! - `routing`: index names per indexing mode
//! - `dedupe`: service metadata suppression and TTL expiry
//! - `best_effort`: metadata failures never fail span writes
//! - `templates`: template naming and short-circuiting
//! - `concurrency`: many producers against one store
//! - `bulk`: batched dispatch
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test write_path
//! cargo test --test write_path dedupe::
//! ```

use chrono::{DateTime, TimeZone, Utc};
use parking_lot::Mutex;
use std::sync::Arc;
use tracestore::prelude::*;
use tracestore::ManualClock;

mod best_effort;
mod bulk;
mod concurrency;
mod dedupe;
mod routing;
mod templates;

/// Install a test log subscriber once; later calls are no-ops
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Midday UTC on the given date
pub fn day(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 12, 0, 0).unwrap()
}

/// A span of `service`/`operation` starting at `start`
pub fn span_at(service: &str, operation: &str, start: DateTime<Utc>) -> Span {
    let mut span = Span::new(
        TraceId::new(0, 0x1234),
        SpanId(0x42),
        operation,
        start,
        Process::new(service),
    );
    span.tags.push(KeyValue::string("http.method", "GET"));
    span
}

/// A span on a fixed day
pub fn span(service: &str, operation: &str) -> Span {
    span_at(service, operation, day(2024, 5, 17))
}

/// Ephemeral store with a custom builder step
pub fn open_with(
    configure: impl FnOnce(SpanStoreBuilder) -> SpanStoreBuilder,
) -> (SpanStore, Arc<MemoryStore>) {
    init_logging();
    let memory = Arc::new(MemoryStore::new());
    let store = configure(SpanStore::builder().store(memory.clone()))
        .open()
        .unwrap();
    (store, memory)
}

/// Store that records every request and fails the configured document kinds
#[derive(Default)]
pub struct FlakyStore {
    pub fail_kinds: Vec<DocumentKind>,
    pub fail_templates: bool,
    pub requests: Mutex<Vec<IndexRequest>>,
    pub templates: Mutex<Vec<String>>,
}

impl FlakyStore {
    pub fn failing(kinds: &[DocumentKind]) -> Self {
        Self {
            fail_kinds: kinds.to_vec(),
            ..Default::default()
        }
    }

    pub fn count(&self, kind: DocumentKind) -> usize {
        self.requests.lock().iter().filter(|r| r.kind == kind).count()
    }
}

impl DocumentStore for FlakyStore {
    fn create_template(&self, name: &str, _body: &str) -> tracestore_core::Result<()> {
        self.templates.lock().push(name.to_string());
        if self.fail_templates {
            return Err(tracestore_core::Error::Store("template refused".to_string()));
        }
        Ok(())
    }

    fn index(&self, request: IndexRequest) -> tracestore_core::Result<()> {
        let kind = request.kind;
        self.requests.lock().push(request);
        if self.fail_kinds.contains(&kind) {
            return Err(tracestore_core::Error::Store(format!("{} rejected", kind)));
        }
        Ok(())
    }

    fn close(&self) -> tracestore_core::Result<()> {
        Ok(())
    }
}
