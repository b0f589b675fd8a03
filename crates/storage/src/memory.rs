//! In-memory document store
//!
//! [`MemoryStore`] keeps templates and indexed documents in process. It backs
//! tests and local runs where no external cluster is available, and follows
//! the store contract: templates overwrite, documents with an explicit id
//! replace the previous document with that id in the same index.

use dashmap::DashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use tracestore_core::{DocumentKind, DocumentStore, Error, IndexRequest, Result};

/// Store holding everything in process memory
///
/// # Thread Safety
///
/// Indices live in a [`DashMap`]; writers to different indices never contend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    templates: DashMap<String, String>,
    indices: DashMap<String, Vec<IndexRequest>>,
    closed: AtomicBool,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Body of a stored template
    pub fn template(&self, name: &str) -> Option<String> {
        self.templates.get(name).map(|t| t.value().clone())
    }

    /// Names of all stored templates, sorted
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.templates.iter().map(|t| t.key().clone()).collect();
        names.sort();
        names
    }

    /// Names of all indices that received documents, sorted
    pub fn index_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.indices.iter().map(|i| i.key().clone()).collect();
        names.sort();
        names
    }

    /// Documents in `index`, in arrival order
    pub fn documents(&self, index: &str) -> Vec<IndexRequest> {
        self.indices
            .get(index)
            .map(|docs| docs.value().clone())
            .unwrap_or_default()
    }

    /// Number of documents of `kind` in `index`
    pub fn count(&self, index: &str, kind: DocumentKind) -> usize {
        self.indices
            .get(index)
            .map(|docs| docs.iter().filter(|d| d.kind == kind).count())
            .unwrap_or(0)
    }

    /// Number of documents across all indices
    pub fn total_documents(&self) -> usize {
        self.indices.iter().map(|docs| docs.value().len()).sum()
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::Closed);
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn create_template(&self, name: &str, body: &str) -> Result<()> {
        self.ensure_open()?;
        self.templates.insert(name.to_owned(), body.to_owned());
        Ok(())
    }

    fn index(&self, request: IndexRequest) -> Result<()> {
        self.ensure_open()?;
        let mut docs = self.indices.entry(request.index.clone()).or_default();
        let existing = request
            .id
            .as_ref()
            .and_then(|id| docs.iter().position(|d| d.id.as_ref() == Some(id)));
        match existing {
            Some(pos) => docs[pos] = request,
            None => docs.push(request),
        }
        Ok(())
    }

    fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        Ok(())
    }
}
