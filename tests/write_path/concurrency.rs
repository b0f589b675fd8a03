//! Concurrency Tests
//!
//! Many producers writing through one store.

use crate::*;
use std::sync::Barrier;
use std::thread;

#[test]
fn test_concurrent_writers_dedupe_metadata() {
    let (store, memory) = open_with(|b| b.use_aliases(true));
    let store = Arc::new(store);

    const NUM_WRITERS: usize = 8;
    const SPANS_PER_WRITER: usize = 200;
    const OPERATIONS: usize = 10;

    let barrier = Arc::new(Barrier::new(NUM_WRITERS));
    let handles: Vec<_> = (0..NUM_WRITERS)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for i in 0..SPANS_PER_WRITER {
                    let op = format!("op_{}", i % OPERATIONS);
                    store.write_span(&span("cart", &op)).unwrap();
                }
            })
        })
        .collect();

    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(
        memory.count("jaeger-span-write", DocumentKind::Span),
        NUM_WRITERS * SPANS_PER_WRITER
    );
    // Racing writers may both miss the cache, but documents overwrite by id.
    assert_eq!(memory.count("jaeger-service-write", DocumentKind::Service), OPERATIONS);
    let m = store.metrics();
    assert_eq!(
        m.service_writes + m.service_writes_skipped,
        (NUM_WRITERS * SPANS_PER_WRITER) as u64
    );
}
