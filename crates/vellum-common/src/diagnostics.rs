//! The template-space diagnostic model.
//!
//! Every diagnostic the merged language service returns is addressed to a
//! template document (or a genuine external file), never to an overlay,
//! and is tagged with the source that produced it and the pipeline stage
//! it came from. External type-checker diagnostics are converted into this
//! model at the provenance boundary.

use serde::{Deserialize, Serialize};

use crate::span::TextSpan;
use crate::uri::Uri;

/// Diagnostic severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Suggestion,
    Message,
}

/// Which subsystem produced a merged result. Carried by every
/// host-facing record, not only diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticSource {
    /// The template compiler's own pipeline.
    Template,
    /// The external type-checking service, projected through provenance.
    Typechecker,
}

/// The compiler pipeline stage a diagnostic was raised in, plus the
/// external stage for projected type-checker diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticStage {
    /// Markup-to-IR lowering.
    Lower,
    /// Resource/reference linking.
    Link,
    /// Scope binding.
    Bind,
    /// Expression type inference.
    Infer,
    /// Instruction emission.
    Emit,
    /// The external type-checking service.
    Typechecker,
}

/// A "see also" location attached to a diagnostic. Related locations go
/// through the same leak policy as primary locations: a related span that
/// would point into the diagnostic's own overlay is suppressed before it
/// ever reaches this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelatedInformation {
    pub uri: Uri,
    pub span: TextSpan,
    pub message: String,
}

/// A template-space diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    pub uri: Uri,
    pub span: TextSpan,
    pub severity: Severity,
    pub code: u32,
    pub message: String,
    pub source: DiagnosticSource,
    pub stage: DiagnosticStage,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related: Vec<RelatedInformation>,
}

impl Diagnostic {
    /// A diagnostic raised by the template compiler itself.
    pub fn template(
        stage: DiagnosticStage,
        uri: Uri,
        span: TextSpan,
        severity: Severity,
        code: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            uri,
            span,
            severity,
            code,
            message: message.into(),
            source: DiagnosticSource::Template,
            stage,
            related: Vec::new(),
        }
    }

    /// A diagnostic projected from the external type-checking service.
    pub fn typechecker(
        uri: Uri,
        span: TextSpan,
        severity: Severity,
        code: u32,
        message: impl Into<String>,
    ) -> Self {
        Self {
            uri,
            span,
            severity,
            code,
            message: message.into(),
            source: DiagnosticSource::Typechecker,
            stage: DiagnosticStage::Typechecker,
            related: Vec::new(),
        }
    }

    /// Attach a related location to this diagnostic.
    #[must_use]
    pub fn with_related(mut self, uri: Uri, span: TextSpan, message: impl Into<String>) -> Self {
        self.related.push(RelatedInformation {
            uri,
            span,
            message: message.into(),
        });
        self
    }
}

/// Diagnostic codes raised by the template compiler pipeline, grouped by
/// the stage that raises them (thousands digit).
pub mod template_codes {
    /// An attribute or interpolation expression could not be parsed.
    pub const UNPARSEABLE_EXPRESSION: u32 = 1101;
    /// A custom element/attribute/value-converter name resolved to no
    /// registered resource.
    pub const UNKNOWN_RESOURCE: u32 = 1201;
    /// A binding targets a bindable the resource does not declare.
    pub const UNKNOWN_BINDABLE: u32 = 1202;
    /// An expression names a member no enclosing scope frame provides.
    pub const UNDEFINED_SCOPE_MEMBER: u32 = 1301;
    /// The inferred expression type does not match the binding target's
    /// expected type. Subject to cascade suppression and, in lenient
    /// mode, downgraded to a warning.
    pub const EXPR_TYPE_MISMATCH: u32 = 1401;
}

/// Codes of interest among those the external type-checking service
/// reports. The values follow the service's own numbering; the merged
/// service only ever matches on them, it never raises them itself.
pub mod typecheck_codes {
    /// "Property '{0}' does not exist on type '{1}'."
    pub const PROPERTY_DOES_NOT_EXIST: u32 = 2339;
    /// "Property '{0}' does not exist on type '{1}'. Did you mean '{2}'?"
    pub const PROPERTY_DOES_NOT_EXIST_DID_YOU_MEAN: u32 = 2551;

    /// Whether `code` belongs to the missing-member family that gets
    /// rewritten into template vocabulary.
    pub fn is_missing_property(code: u32) -> bool {
        code == PROPERTY_DOES_NOT_EXIST || code == PROPERTY_DOES_NOT_EXIST_DID_YOU_MEAN
    }
}
