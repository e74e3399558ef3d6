//! Versioned document snapshots.
//!
//! Both template documents (host-provided) and overlay documents
//! (synthesized) are represented the same way: immutable text plus a
//! version counter and a content hash. A snapshot is cheap to clone; the
//! text is shared.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::hash::content_hash;
use crate::span::TextSpan;
use crate::uri::Uri;

/// One immutable version of a document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSnapshot {
    pub uri: Uri,
    pub text: Arc<str>,
    /// Monotonic per-document version, bumped each time the text changes.
    pub version: u32,
    /// Hash of `text`, used to skip recompiles when an upsert is a no-op.
    pub content_hash: u64,
}

impl DocumentSnapshot {
    pub fn new(uri: Uri, text: impl Into<Arc<str>>, version: u32) -> Self {
        let text = text.into();
        let content_hash = content_hash(&text);
        Self {
            uri,
            text,
            version,
            content_hash,
        }
    }

    /// The text covered by `span`, clamped to the document bounds.
    pub fn text_in(&self, span: TextSpan) -> &str {
        let len = self.text.len() as u32;
        let start = span.start.min(len) as usize;
        let end = span.end().min(len) as usize;
        &self.text[start..end]
    }
}

#[cfg(test)]
#[path = "tests/documents_tests.rs"]
mod documents_tests;
