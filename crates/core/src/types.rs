//! Span domain model
//!
//! This module defines the records handed to the write path:
//! - [`TraceId`] / [`SpanId`]: identifiers, rendered as zero-padded hex
//! - [`KeyValue`] / [`TagValue`]: typed span and process attributes
//! - [`Span`]: one timed operation within a trace
//!
//! The model carries no storage concerns; see [`crate::document`] for the
//! shapes actually written to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// 128-bit trace identifier
///
/// Traces produced by 64-bit tracers leave `high` at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct TraceId {
    /// Upper 64 bits
    pub high: u64,
    /// Lower 64 bits
    pub low: u64,
}

impl TraceId {
    /// Create a trace id from its two halves
    pub fn new(high: u64, low: u64) -> Self {
        Self { high, low }
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.high == 0 {
            write!(f, "{:016x}", self.low)
        } else {
            write!(f, "{:016x}{:016x}", self.high, self.low)
        }
    }
}

/// 64-bit span identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SpanId(pub u64);

impl fmt::Display for SpanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Typed attribute value
///
/// `Binary` and `String` are distinct; a binary value is never coerced to
/// text except when rendered for storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TagValue {
    /// UTF-8 string
    String(String),
    /// Boolean
    Bool(bool),
    /// 64-bit signed integer
    Int64(i64),
    /// 64-bit float
    Float64(f64),
    /// Arbitrary bytes
    Binary(Vec<u8>),
}

impl TagValue {
    /// Lower-case type name used by the storage documents
    pub fn type_name(&self) -> &'static str {
        match self {
            TagValue::String(_) => "string",
            TagValue::Bool(_) => "bool",
            TagValue::Int64(_) => "int64",
            TagValue::Float64(_) => "float64",
            TagValue::Binary(_) => "binary",
        }
    }
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::String(s) => f.write_str(s),
            TagValue::Bool(b) => write!(f, "{}", b),
            TagValue::Int64(i) => write!(f, "{}", i),
            TagValue::Float64(v) => write!(f, "{}", v),
            TagValue::Binary(bytes) => {
                for b in bytes {
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// A single attribute on a span, log or process
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Attribute key, may contain dots (`http.method`)
    pub key: String,
    /// Attribute value
    pub value: TagValue,
}

impl KeyValue {
    /// String attribute
    pub fn string(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: TagValue::String(value.into()),
        }
    }

    /// Boolean attribute
    pub fn bool(key: impl Into<String>, value: bool) -> Self {
        Self {
            key: key.into(),
            value: TagValue::Bool(value),
        }
    }

    /// Integer attribute
    pub fn int64(key: impl Into<String>, value: i64) -> Self {
        Self {
            key: key.into(),
            value: TagValue::Int64(value),
        }
    }

    /// Float attribute
    pub fn float64(key: impl Into<String>, value: f64) -> Self {
        Self {
            key: key.into(),
            value: TagValue::Float64(value),
        }
    }

    /// Binary attribute
    pub fn binary(key: impl Into<String>, value: impl Into<Vec<u8>>) -> Self {
        Self {
            key: key.into(),
            value: TagValue::Binary(value.into()),
        }
    }
}

/// Timestamped event attached to a span
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Log {
    /// When the event happened
    pub timestamp: DateTime<Utc>,
    /// Event fields
    pub fields: Vec<KeyValue>,
}

/// Relationship between two spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RefType {
    /// The referenced span is the parent
    ChildOf,
    /// The referenced span caused this one but does not wait for it
    FollowsFrom,
}

impl RefType {
    /// Storage name of the reference type
    pub fn as_str(&self) -> &'static str {
        match self {
            RefType::ChildOf => "CHILD_OF",
            RefType::FollowsFrom => "FOLLOWS_FROM",
        }
    }
}

/// Reference from one span to another
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpanRef {
    /// Trace of the referenced span
    pub trace_id: TraceId,
    /// Referenced span
    pub span_id: SpanId,
    /// Kind of relationship
    pub ref_type: RefType,
}

/// The emitting process
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Process {
    /// Logical service name; the service index is keyed on it
    pub service_name: String,
    /// Process-level attributes (hostname, client version, ...)
    pub tags: Vec<KeyValue>,
}

impl Process {
    /// Create a process with no tags
    pub fn new(service_name: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            tags: Vec::new(),
        }
    }
}

/// One timed operation within a distributed trace
///
/// `start_time` is the only field the index resolver looks at; everything else
/// flows through to the stored document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Span {
    /// Trace this span belongs to
    pub trace_id: TraceId,
    /// Identifier of this span within the trace
    pub span_id: SpanId,
    /// Operation (endpoint, method) name
    pub operation_name: String,
    /// Parent and causal references
    pub references: Vec<SpanRef>,
    /// Sampling and debug flags
    pub flags: u32,
    /// Wall-clock start
    pub start_time: DateTime<Utc>,
    /// Elapsed time
    pub duration: Duration,
    /// Span attributes
    pub tags: Vec<KeyValue>,
    /// Span events
    pub logs: Vec<Log>,
    /// Emitting process
    pub process: Process,
}

impl Span {
    /// Create a span with no references, tags or logs
    pub fn new(
        trace_id: TraceId,
        span_id: SpanId,
        operation_name: impl Into<String>,
        start_time: DateTime<Utc>,
        process: Process,
    ) -> Self {
        Self {
            trace_id,
            span_id,
            operation_name: operation_name.into(),
            references: Vec::new(),
            flags: 0,
            start_time,
            duration: Duration::ZERO,
            tags: Vec::new(),
            logs: Vec::new(),
            process,
        }
    }

    /// Service name of the emitting process
    pub fn service_name(&self) -> &str {
        &self.process.service_name
    }

    /// Parent span, if the span has a `ChildOf` reference within its own trace
    pub fn parent_span_id(&self) -> Option<SpanId> {
        self.references
            .iter()
            .find(|r| r.ref_type == RefType::ChildOf && r.trace_id == self.trace_id)
            .map(|r| r.span_id)
    }
}
