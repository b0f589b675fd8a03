//! Service/operation metadata writes
//!
//! Every span carries a (service, operation) pair that readers list from the
//! service index. Writing it once per span would repeat the same tiny
//! document millions of times, so [`ServiceIndexWriter`] gates the write on a
//! [`WriteCache`] keyed by a fingerprint of (index, service, operation).
//!
//! ## Best-effort contract
//!
//! - The write outcome is never returned. A failure is logged at `debug` and
//!   dropped.
//! - The key is marked after every attempt, failed or not, which bounds retries
//!   to one per TTL window per key.
//! - A later span with the same pair heals a lost write once the key expires
//!   or is evicted.

use std::sync::Arc;
use tracestore_core::{
    DocumentKind, DocumentStore, IndexRequest, Result, ServiceDocument, SpanDocument,
};
use tracestore_storage::WriteCache;
use tracing::debug;
use xxhash_rust::xxh3::Xxh3;

const FIELD_SEPARATOR: &[u8] = &[0xff];

/// Cache key for "this pair was written to this index"
pub fn fingerprint(index: &str, service: &ServiceDocument) -> String {
    let mut hasher = Xxh3::new();
    hasher.update(index.as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(service.service_name.as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(service.operation_name.as_bytes());
    format!("{:016x}", hasher.digest())
}

/// Document id of a service document
///
/// Independent of the index so a re-write overwrites instead of duplicating.
pub fn service_document_id(service: &ServiceDocument) -> String {
    let mut hasher = Xxh3::new();
    hasher.update(service.service_name.as_bytes());
    hasher.update(FIELD_SEPARATOR);
    hasher.update(service.operation_name.as_bytes());
    format!("{:016x}", hasher.digest())
}

/// Dedupe gate in front of service index writes
pub struct ServiceIndexWriter {
    store: Arc<dyn DocumentStore>,
    cache: WriteCache,
}

impl ServiceIndexWriter {
    /// Create a writer sending to `store`, deduping through `cache`
    pub fn new(store: Arc<dyn DocumentStore>, cache: WriteCache) -> Self {
        Self { store, cache }
    }

    /// Write the span's service/operation pair to `index` unless recently written
    ///
    /// Returns `true` when a store write was attempted, `false` when the cache
    /// suppressed it. Store errors are not reported.
    pub fn write(&self, index: &str, span: &SpanDocument) -> bool {
        let service = span.service_operation();
        let key = fingerprint(index, &service);
        if self.cache.contains(&key) {
            return false;
        }
        if let Err(e) = self.write_service(index, &service) {
            debug!(
                index = %index,
                service = %service.service_name,
                operation = %service.operation_name,
                error = %e,
                "service metadata write failed"
            );
        }
        self.cache.mark(&key);
        true
    }

    /// The dedupe cache
    pub fn cache(&self) -> &WriteCache {
        &self.cache
    }

    fn write_service(&self, index: &str, service: &ServiceDocument) -> Result<()> {
        let body = serde_json::to_value(service)?;
        let request = IndexRequest::new(index, DocumentKind::Service, body)
            .with_id(service_document_id(service));
        self.store.index(request)
    }
}
