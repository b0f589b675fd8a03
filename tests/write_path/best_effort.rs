//! Best-Effort Metadata Tests
//!
//! Only the span dispatch decides the result of `write_span`.

use crate::*;

#[test]
fn test_span_write_succeeds_when_metadata_always_fails() {
    init_logging();
    let flaky = Arc::new(FlakyStore::failing(&[DocumentKind::Service]));
    let store = SpanStore::builder().store(flaky.clone()).open().unwrap();

    for op in ["a", "b", "c"] {
        store.write_span(&span("cart", op)).unwrap();
    }
    assert_eq!(flaky.count(DocumentKind::Service), 3);
    assert_eq!(flaky.count(DocumentKind::Span), 3);
    assert_eq!(store.metrics().spans_written, 3);
}

#[test]
fn test_failed_metadata_not_retried_within_ttl() {
    init_logging();
    let flaky = Arc::new(FlakyStore::failing(&[DocumentKind::Service]));
    let store = SpanStore::builder().store(flaky.clone()).open().unwrap();

    for _ in 0..5 {
        store.write_span(&span("cart", "checkout")).unwrap();
    }
    assert_eq!(flaky.count(DocumentKind::Service), 1);
}

#[test]
fn test_span_dispatch_failure_is_returned() {
    init_logging();
    let flaky = Arc::new(FlakyStore::failing(&[DocumentKind::Span]));
    let store = SpanStore::builder().store(flaky.clone()).open().unwrap();

    let err = store.write_span(&span("cart", "checkout")).unwrap_err();
    assert!(matches!(err, Error::Store(_)));
    assert!(err.is_retryable());
    // Metadata went out before the span dispatch failed.
    assert_eq!(flaky.count(DocumentKind::Service), 1);
    assert_eq!(store.metrics().span_write_failures, 1);
}

#[test]
fn test_write_after_close_is_rejected() {
    let (store, memory) = open_with(|b| b);
    store.close().unwrap();
    assert!(memory.is_closed());
    assert!(store.write_span(&span("cart", "checkout")).unwrap_err().is_closed());
    assert!(store.close().unwrap_err().is_closed());
}

#[test]
fn test_open_without_store_is_config_error() {
    let err = SpanStore::builder().open().err().unwrap();
    assert!(matches!(err, Error::Config(_)));
}
