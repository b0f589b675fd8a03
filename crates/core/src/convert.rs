//! Domain span → storage document conversion
//!
//! [`SpanConverter`] is the seam the writer calls; [`FromDomain`] is the
//! default policy. Tags selected for flattening are moved out of the `tags`
//! list into a `tag` object so the store can map them as individual fields.
//! Dots in flattened keys are replaced because the store would otherwise
//! interpret them as object paths.

use crate::document::{
    KeyValueDocument, LogDocument, ProcessDocument, ReferenceDocument, SpanDocument,
};
use crate::types::{KeyValue, Log, Span, TagValue};
use chrono::{DateTime, Utc};
use rustc_hash::FxHashSet;
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

/// Converts domain spans into storage documents
///
/// Implementations must be pure: the same span always yields the same document.
pub trait SpanConverter: Send + Sync {
    /// Build the document stored for `span`
    fn convert(&self, span: &Span) -> SpanDocument;
}

/// Default converter with configurable tag flattening
#[derive(Debug, Clone, Default)]
pub struct FromDomain {
    all_tags_as_fields: bool,
    tag_keys_as_fields: FxHashSet<String>,
    tag_dot_replacement: String,
}

impl FromDomain {
    /// Create a converter
    ///
    /// # Arguments
    ///
    /// * `all_tags_as_fields` - flatten every non-binary tag
    /// * `tag_keys_as_fields` - keys to flatten when `all_tags_as_fields` is off
    /// * `tag_dot_replacement` - replaces `.` in flattened keys
    pub fn new<I, S>(
        all_tags_as_fields: bool,
        tag_keys_as_fields: I,
        tag_dot_replacement: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            all_tags_as_fields,
            tag_keys_as_fields: tag_keys_as_fields.into_iter().map(Into::into).collect(),
            tag_dot_replacement: tag_dot_replacement.into(),
        }
    }

    fn flattens(&self, kv: &KeyValue) -> bool {
        // Binary values have no useful field mapping.
        if matches!(kv.value, TagValue::Binary(_)) {
            return false;
        }
        self.all_tags_as_fields || self.tag_keys_as_fields.contains(&kv.key)
    }

    fn split_tags(
        &self,
        tags: &[KeyValue],
    ) -> (Vec<KeyValueDocument>, BTreeMap<String, JsonValue>) {
        let mut kept = Vec::new();
        let mut flattened = BTreeMap::new();
        for kv in tags {
            if self.flattens(kv) {
                let key = kv.key.replace('.', &self.tag_dot_replacement);
                flattened.insert(key, typed_json(&kv.value));
            } else {
                kept.push(key_value_document(kv));
            }
        }
        (kept, flattened)
    }
}

impl SpanConverter for FromDomain {
    fn convert(&self, span: &Span) -> SpanDocument {
        let (tags, tag) = self.split_tags(&span.tags);
        let (process_tags, process_tag) = self.split_tags(&span.process.tags);
        let start_time = epoch_micros(&span.start_time);

        SpanDocument {
            trace_id: span.trace_id.to_string(),
            span_id: span.span_id.to_string(),
            parent_span_id: span.parent_span_id().map(|id| id.to_string()),
            flags: span.flags,
            operation_name: span.operation_name.clone(),
            references: span
                .references
                .iter()
                .map(|r| ReferenceDocument {
                    ref_type: r.ref_type.as_str().to_string(),
                    trace_id: r.trace_id.to_string(),
                    span_id: r.span_id.to_string(),
                })
                .collect(),
            start_time,
            start_time_millis: start_time / 1000,
            duration: u64::try_from(span.duration.as_micros()).unwrap_or(u64::MAX),
            tags,
            tag,
            logs: span.logs.iter().map(log_document).collect(),
            process: ProcessDocument {
                service_name: span.process.service_name.clone(),
                tags: process_tags,
                tag: process_tag,
            },
        }
    }
}

fn epoch_micros(t: &DateTime<Utc>) -> u64 {
    t.timestamp_micros().max(0) as u64
}

fn key_value_document(kv: &KeyValue) -> KeyValueDocument {
    KeyValueDocument {
        key: kv.key.clone(),
        value_type: kv.value.type_name().to_string(),
        value: kv.value.to_string(),
    }
}

fn log_document(log: &Log) -> LogDocument {
    LogDocument {
        timestamp: epoch_micros(&log.timestamp),
        fields: log.fields.iter().map(key_value_document).collect(),
    }
}

fn typed_json(value: &TagValue) -> JsonValue {
    match value {
        TagValue::String(s) => JsonValue::String(s.clone()),
        TagValue::Bool(b) => JsonValue::Bool(*b),
        TagValue::Int64(i) => JsonValue::from(*i),
        // NaN and infinities have no JSON number form.
        TagValue::Float64(f) => serde_json::Number::from_f64(*f)
            .map(JsonValue::Number)
            .unwrap_or_else(|| JsonValue::String(f.to_string())),
        TagValue::Binary(_) => JsonValue::String(value.to_string()),
    }
}
