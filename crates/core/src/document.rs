//! Storage documents
//!
//! JSON shapes written to the span and service indices. Field names are part
//! of the stored format and must stay stable for readers of the same indices.
//!
//! Timestamps and durations are stored as integer microseconds, with an extra
//! `startTimeMillis` on spans for date-range queries.

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;
use std::fmt;

/// Discriminator sent with every index request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// A span document
    Span,
    /// A service/operation metadata document
    Service,
}

impl DocumentKind {
    /// Wire name of the kind
    pub fn as_str(&self) -> &'static str {
        match self {
            DocumentKind::Span => "span",
            DocumentKind::Service => "service",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single index call against the document store
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    /// Target index or alias
    pub index: String,
    /// Document kind
    pub kind: DocumentKind,
    /// Explicit document id; `None` lets the store assign one
    pub id: Option<String>,
    /// Encoded document
    pub body: JsonValue,
}

impl IndexRequest {
    /// Request with a store-assigned id
    pub fn new(index: impl Into<String>, kind: DocumentKind, body: JsonValue) -> Self {
        Self {
            index: index.into(),
            kind,
            id: None,
            body,
        }
    }

    /// Set an explicit document id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Stored attribute: value rendered as text plus its original type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyValueDocument {
    /// Attribute key, unmodified
    pub key: String,
    /// Lower-case type name (`string`, `bool`, `int64`, `float64`, `binary`)
    #[serde(rename = "type")]
    pub value_type: String,
    /// Value rendered as a string; binary values are hex-encoded
    pub value: String,
}

/// Stored span reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceDocument {
    /// `CHILD_OF` or `FOLLOWS_FROM`
    #[serde(rename = "refType")]
    pub ref_type: String,
    /// Referenced trace, hex
    #[serde(rename = "traceID")]
    pub trace_id: String,
    /// Referenced span, hex
    #[serde(rename = "spanID")]
    pub span_id: String,
}

/// Stored span log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogDocument {
    /// Microseconds since the epoch
    pub timestamp: u64,
    /// Log fields
    pub fields: Vec<KeyValueDocument>,
}

/// Stored process
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProcessDocument {
    /// Service name
    #[serde(rename = "serviceName")]
    pub service_name: String,
    /// Tags that were not flattened
    pub tags: Vec<KeyValueDocument>,
    /// Flattened tags, keys with dots replaced
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tag: BTreeMap<String, JsonValue>,
}

/// Document written to the span index
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanDocument {
    /// Trace id, hex
    #[serde(rename = "traceID")]
    pub trace_id: String,
    /// Span id, hex
    #[serde(rename = "spanID")]
    pub span_id: String,
    /// Parent span id, hex, when the span has a same-trace `CHILD_OF` reference
    #[serde(
        rename = "parentSpanID",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_span_id: Option<String>,
    /// Sampling and debug flags
    pub flags: u32,
    /// Operation name
    pub operation_name: String,
    /// All references, including the parent
    pub references: Vec<ReferenceDocument>,
    /// Start, microseconds since the epoch
    pub start_time: u64,
    /// Start, milliseconds since the epoch
    pub start_time_millis: u64,
    /// Duration in microseconds
    pub duration: u64,
    /// Tags that were not flattened
    pub tags: Vec<KeyValueDocument>,
    /// Flattened tags, keys with dots replaced
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tag: BTreeMap<String, JsonValue>,
    /// Span logs
    pub logs: Vec<LogDocument>,
    /// Emitting process
    pub process: ProcessDocument,
}

impl SpanDocument {
    /// Service/operation pair this span contributes to the service index
    pub fn service_operation(&self) -> ServiceDocument {
        ServiceDocument {
            service_name: self.process.service_name.clone(),
            operation_name: self.operation_name.clone(),
        }
    }
}

/// Document written to the service index
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServiceDocument {
    /// Service name
    #[serde(rename = "serviceName")]
    pub service_name: String,
    /// Operation name
    #[serde(rename = "operationName")]
    pub operation_name: String,
}
