//! Service Metadata Dedupe Tests
//!
//! Identical (index, service, operation) triples reach the store at most once
//! per TTL window.

use crate::*;
use std::time::Duration;

#[test]
fn test_same_pair_written_once() {
    let (store, memory) = open_with(|b| b);
    for _ in 0..10 {
        store.write_span(&span("cart", "checkout")).unwrap();
    }
    assert_eq!(memory.count("jaeger-span-2024-05-17", DocumentKind::Span), 10);
    assert_eq!(memory.count("jaeger-service-2024-05-17", DocumentKind::Service), 1);
}

#[test]
fn test_distinct_operations_each_written() {
    let (store, memory) = open_with(|b| b);
    for op in ["checkout", "add", "remove", "checkout", "add"] {
        store.write_span(&span("cart", op)).unwrap();
    }
    assert_eq!(memory.count("jaeger-service-2024-05-17", DocumentKind::Service), 3);
    assert_eq!(store.metrics().service_writes, 3);
    assert_eq!(store.metrics().service_writes_skipped, 2);
}

#[test]
fn test_new_partition_gets_its_own_metadata() {
    let (store, memory) = open_with(|b| b);
    store.write_span(&span_at("cart", "checkout", day(2024, 5, 17))).unwrap();
    store.write_span(&span_at("cart", "checkout", day(2024, 5, 18))).unwrap();
    assert_eq!(memory.count("jaeger-service-2024-05-17", DocumentKind::Service), 1);
    assert_eq!(memory.count("jaeger-service-2024-05-18", DocumentKind::Service), 1);
}

#[test]
fn test_rewritten_after_ttl_expiry() {
    let clock = Arc::new(ManualClock::new());
    let flaky = Arc::new(FlakyStore::default());
    let store = SpanStore::builder()
        .store(flaky.clone())
        .use_aliases(true)
        .service_cache_ttl(Duration::from_secs(3600))
        .clock(clock.clone())
        .open()
        .unwrap();

    store.write_span(&span("cart", "checkout")).unwrap();
    clock.advance(Duration::from_secs(3599));
    store.write_span(&span("cart", "checkout")).unwrap();
    assert_eq!(flaky.count(DocumentKind::Service), 1);

    clock.advance(Duration::from_secs(1));
    store.write_span(&span("cart", "checkout")).unwrap();
    assert_eq!(flaky.count(DocumentKind::Service), 2);
    assert_eq!(flaky.count(DocumentKind::Span), 3);
}

#[test]
fn test_service_document_overwrites_by_id() {
    let clock = Arc::new(ManualClock::new());
    let (store, memory) = open_with(|b| b.use_aliases(true).clock(clock.clone()));
    store.write_span(&span("cart", "checkout")).unwrap();
    clock.advance(Duration::from_secs(13 * 60 * 60));
    store.write_span(&span("cart", "checkout")).unwrap();

    // Written twice, stored once.
    assert_eq!(store.metrics().service_writes, 2);
    assert_eq!(memory.count("jaeger-service-write", DocumentKind::Service), 1);
}

#[test]
fn test_sub_second_ttl_still_expires() {
    let clock = Arc::new(ManualClock::new());
    let flaky = Arc::new(FlakyStore::default());
    let store = SpanStore::builder()
        .store(flaky.clone())
        .use_aliases(true)
        .service_cache_ttl(Duration::from_millis(500))
        .clock(clock.clone())
        .open()
        .unwrap();

    store.write_span(&span("cart", "checkout")).unwrap();
    clock.advance(Duration::from_secs(60));
    store.write_span(&span("cart", "checkout")).unwrap();

    assert_eq!(store.metrics().service_writes, 2);
    assert_eq!(flaky.count(DocumentKind::Service), 2);
}
