//! Write-path counters
//!
//! Plain atomics, read through [`WriterMetrics::snapshot`]. Nothing here is
//! exported anywhere; callers forward the snapshot to their own metrics sink.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by the span writer and template bootstrapper
#[derive(Debug, Default)]
pub struct WriterMetrics {
    spans_written: AtomicU64,
    span_write_failures: AtomicU64,
    service_writes: AtomicU64,
    service_writes_skipped: AtomicU64,
    indices_observed: AtomicU64,
    index_create_attempts: AtomicU64,
    index_create_failures: AtomicU64,
}

/// Point-in-time copy of [`WriterMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriterMetricsSnapshot {
    /// Span documents accepted by the store
    pub spans_written: u64,
    /// Span documents the store rejected
    pub span_write_failures: u64,
    /// Service metadata writes attempted
    pub service_writes: u64,
    /// Service metadata writes suppressed by the cache
    pub service_writes_skipped: u64,
    /// Distinct span indices first seen within the bookkeeping window
    pub indices_observed: u64,
    /// Template creation calls issued
    pub index_create_attempts: u64,
    /// Template creation calls that failed
    pub index_create_failures: u64,
}

impl WriterMetrics {
    /// All counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the current values
    pub fn snapshot(&self) -> WriterMetricsSnapshot {
        WriterMetricsSnapshot {
            spans_written: self.spans_written.load(Ordering::Relaxed),
            span_write_failures: self.span_write_failures.load(Ordering::Relaxed),
            service_writes: self.service_writes.load(Ordering::Relaxed),
            service_writes_skipped: self.service_writes_skipped.load(Ordering::Relaxed),
            indices_observed: self.indices_observed.load(Ordering::Relaxed),
            index_create_attempts: self.index_create_attempts.load(Ordering::Relaxed),
            index_create_failures: self.index_create_failures.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn span_written(&self, ok: bool) {
        if ok {
            self.spans_written.fetch_add(1, Ordering::Relaxed);
        } else {
            self.span_write_failures.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn service_write(&self, attempted: bool) {
        if attempted {
            self.service_writes.fetch_add(1, Ordering::Relaxed);
        } else {
            self.service_writes_skipped.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub(crate) fn index_observed(&self) {
        self.indices_observed.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn index_create(&self, ok: bool) {
        self.index_create_attempts.fetch_add(1, Ordering::Relaxed);
        if !ok {
            self.index_create_failures.fetch_add(1, Ordering::Relaxed);
        }
    }
}
