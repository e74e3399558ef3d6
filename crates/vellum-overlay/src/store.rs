//! The document store: versioned template snapshots.
//!
//! The host owns document lifecycles; it must upsert a template's text
//! before asking anything about that template. Missing that step is host
//! misuse and surfaces as `BuildError::UnknownTemplate` downstream, not
//! here; the store itself just answers present/absent.

use rustc_hash::FxHashMap;
use vellum_common::{DocumentSnapshot, Uri, content_hash};

/// Versioned snapshots keyed by URI.
#[derive(Debug, Default)]
pub struct DocumentStore {
    documents: FxHashMap<Uri, DocumentSnapshot>,
}

impl DocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or update a document. The version bumps only when the text
    /// actually changed; re-upserting identical text keeps the existing
    /// snapshot untouched.
    pub fn upsert(&mut self, uri: Uri, text: &str) -> &DocumentSnapshot {
        let hash = content_hash(text);
        let version = match self.documents.get(&uri) {
            Some(existing) if existing.content_hash == hash => {
                return &self.documents[&uri];
            }
            Some(existing) => existing.version + 1,
            None => 1,
        };
        let snapshot = DocumentSnapshot::new(uri.clone(), text, version);
        self.documents.insert(uri.clone(), snapshot);
        &self.documents[&uri]
    }

    pub fn get(&self, uri: &Uri) -> Option<&DocumentSnapshot> {
        self.documents.get(uri)
    }

    pub fn remove(&mut self, uri: &Uri) -> Option<DocumentSnapshot> {
        self.documents.remove(uri)
    }

    pub fn contains(&self, uri: &Uri) -> bool {
        self.documents.contains_key(uri)
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod store_tests;
