//! Overlay-coordinate records exchanged with the external service.
//!
//! Everything here is raw: positions are offsets or `(start, length)`
//! spans in the overlay (or in a genuine external file), file identifiers
//! are URIs, and nothing has been through the provenance boundary yet.
//! The `Raw` prefix marks the records that must never reach a host
//! unprojected.

use serde::{Deserialize, Serialize};
use vellum_common::{Severity, TextSpan, Uri};

/// A file/span pair as the external service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLocation {
    pub uri: Uri,
    pub span: TextSpan,
}

/// Related information attached to a raw diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRelatedInformation {
    pub uri: Uri,
    pub span: TextSpan,
    pub message: String,
}

/// One diagnostic as the external service reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDiagnostic {
    pub uri: Uri,
    pub span: TextSpan,
    pub code: u32,
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RawRelatedInformation>,
}

/// Quick-info (hover) for one overlay offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawQuickInfo {
    /// Display string, e.g. `(property) Person.name: string`.
    pub display: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    /// The overlay span the info applies to.
    pub span: TextSpan,
}

/// The kind of a raw completion entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawCompletionKind {
    Property,
    Method,
    Variable,
    Function,
    Class,
    Keyword,
    Other,
}

/// One completion entry in overlay coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCompletion {
    pub label: String,
    pub kind: RawCompletionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    /// The overlay span the completion replaces. Absent when the service
    /// leaves the replacement range to the caller.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replacement_span: Option<TextSpan>,
}

/// One text edit in overlay (or external-file) coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTextEdit {
    pub uri: Uri,
    pub span: TextSpan,
    pub new_text: String,
}

/// One code action with its raw edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawCodeAction {
    pub title: String,
    pub edits: Vec<RawTextEdit>,
}

/// The edits of one rename request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawRenameResult {
    pub edits: Vec<RawTextEdit>,
}
