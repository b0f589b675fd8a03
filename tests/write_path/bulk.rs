//! Bulk Dispatch Tests
//!
//! With batching enabled, `write_span` returns once the document is buffered.

use crate::*;
use std::time::Duration;

#[test]
fn test_documents_flushed_at_batch_size() {
    let (store, memory) = open_with(|b| b.use_aliases(true).bulk(4));
    // First span buffers a service document and a span document.
    store.write_span(&span("cart", "a")).unwrap();
    assert_eq!(memory.total_documents(), 0);

    store.write_span(&span("cart", "b")).unwrap();
    assert_eq!(memory.total_documents(), 4);
}

#[test]
fn test_close_flushes_pending() {
    let (store, memory) = open_with(|b| b.bulk(100));
    store.write_span(&span("cart", "a")).unwrap();
    assert_eq!(memory.total_documents(), 0);

    store.close().unwrap();
    assert_eq!(memory.total_documents(), 2);
    assert!(memory.is_closed());
}

#[test]
fn test_flush_failure_not_observable() {
    init_logging();
    let flaky = Arc::new(FlakyStore::failing(&[DocumentKind::Span, DocumentKind::Service]));
    let store = SpanStore::builder().store(flaky.clone()).bulk(1).open().unwrap();

    store.write_span(&span("cart", "a")).unwrap();
    assert_eq!(flaky.count(DocumentKind::Span), 1);
    assert_eq!(store.metrics().span_write_failures, 0);
}

#[test]
fn test_aged_partial_batch_flushed_on_demand() {
    let clock = Arc::new(ManualClock::new());
    let (store, memory) = open_with(|b| b.bulk(100).clock(clock.clone()));
    store.write_span(&span("cart", "a")).unwrap();

    assert!(!store.flush_if_older_than(Duration::from_secs(1)));
    clock.advance(Duration::from_secs(1));
    assert!(store.flush_if_older_than(Duration::from_secs(1)));
    assert_eq!(memory.total_documents(), 2);
    assert_eq!(store.bulk_stats().map(|s| s.sent), Some(2));
}

#[test]
fn test_age_flush_without_bulk_is_noop() {
    let (store, _memory) = open_with(|b| b);
    assert!(!store.flush_if_older_than(Duration::ZERO));
    assert!(store.bulk_stats().is_none());
}
