//! Batching store wrapper
//!
//! [`BulkIndexer`] accepts index requests into a buffer and forwards them to
//! the wrapped store in batches. `index` returns as soon as the request is
//! buffered, so a failure while flushing is never seen by the producer that
//! submitted the document. Flush failures are logged and counted instead.
//!
//! | Trigger | Effect |
//! |---------|--------|
//! | buffer reaches `batch_size` | batch sent by the submitting thread |
//! | `flush()` | everything pending is sent |
//! | `flush_if_older_than(age)` | everything pending is sent once the oldest request reached `age` |
//! | `close()` | pending documents flushed, then the inner store closed |
//!
//! There is no background flush thread. A partly filled batch stays buffered
//! until one of the triggers above fires, so long-running producers should
//! call `flush_if_older_than` periodically from their own loop.
//!
//! Templates bypass the buffer.

use crate::cache::{Clock, SystemClock};
use parking_lot::Mutex;
use std::mem;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracestore_core::{DocumentStore, Error, IndexRequest, Result};
use tracing::{debug, warn};

/// Default number of buffered requests that triggers a flush
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Counters describing flush activity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BulkStats {
    /// Requests accepted by the inner store
    pub sent: u64,
    /// Requests the inner store rejected
    pub failed: u64,
    /// Requests still buffered
    pub pending: usize,
}

#[derive(Default)]
struct Pending {
    requests: Vec<IndexRequest>,
    /// Arrival of the oldest buffered request
    since: Option<Instant>,
}

impl Pending {
    fn take(&mut self) -> Vec<IndexRequest> {
        self.since = None;
        mem::take(&mut self.requests)
    }
}

/// Buffers index requests in front of another store
pub struct BulkIndexer<S> {
    inner: S,
    batch_size: usize,
    clock: Arc<dyn Clock>,
    pending: Mutex<Pending>,
    sent: AtomicU64,
    failed: AtomicU64,
    closed: AtomicBool,
}

impl<S: DocumentStore> BulkIndexer<S> {
    /// Wrap `inner` with the default batch size
    pub fn new(inner: S) -> Self {
        Self::with_batch_size(inner, DEFAULT_BATCH_SIZE)
    }

    /// Wrap `inner`, flushing every `batch_size` requests (minimum 1)
    pub fn with_batch_size(inner: S, batch_size: usize) -> Self {
        Self::with_clock(inner, batch_size, Arc::new(SystemClock))
    }

    /// Wrap `inner`, reading batch age from `clock`
    pub fn with_clock(inner: S, batch_size: usize, clock: Arc<dyn Clock>) -> Self {
        let batch_size = batch_size.max(1);
        Self {
            inner,
            batch_size,
            clock,
            pending: Mutex::new(Pending::default()),
            sent: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// The wrapped store
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Send every buffered request now
    pub fn flush(&self) {
        let batch = self.pending.lock().take();
        self.send(batch);
    }

    /// Send every buffered request if the oldest one has waited `max_age`
    ///
    /// Returns whether a flush happened.
    pub fn flush_if_older_than(&self, max_age: Duration) -> bool {
        let now = self.clock.now();
        let batch = {
            let mut pending = self.pending.lock();
            match pending.since.map(|since| now.saturating_duration_since(since)) {
                Some(age) if age >= max_age => pending.take(),
                _ => return false,
            }
        };
        self.send(batch);
        true
    }

    /// Snapshot of the flush counters
    pub fn stats(&self) -> BulkStats {
        BulkStats {
            sent: self.sent.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            pending: self.pending.lock().requests.len(),
        }
    }

    fn send(&self, batch: Vec<IndexRequest>) {
        if batch.is_empty() {
            return;
        }
        debug!(documents = batch.len(), "flushing bulk batch");
        for request in batch {
            let index = request.index.clone();
            match self.inner.index(request) {
                Ok(()) => {
                    self.sent.fetch_add(1, Ordering::Relaxed);
                }
                Err(e) => {
                    self.failed.fetch_add(1, Ordering::Relaxed);
                    warn!(index = %index, error = %e, "bulk index request failed");
                }
            }
        }
    }
}

impl<S: DocumentStore> DocumentStore for BulkIndexer<S> {
    fn create_template(&self, name: &str, body: &str) -> Result<()> {
        self.inner.create_template(name, body)
    }

    fn index(&self, request: IndexRequest) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(Error::Closed);
        }
        let full = {
            let mut pending = self.pending.lock();
            if pending.since.is_none() {
                pending.since = Some(self.clock.now());
            }
            pending.requests.push(request);
            if pending.requests.len() >= self.batch_size {
                Some(pending.take())
            } else {
                None
            }
        };
        // Sent outside the lock so other producers keep buffering.
        if let Some(batch) = full {
            self.send(batch);
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        self.flush();
        self.inner.close()
    }
}
