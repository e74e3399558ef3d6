//! The synthesis collaborator boundary.
//!
//! One `compile` call takes a template snapshot through the whole
//! external pipeline (lowering, linking, binding, inference, overlay
//! printing) and returns everything the language service consumes: the
//! staged template-space diagnostics, the expected-type map, the overlay
//! artifact with its mapping entries, and the query facade over the IR.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use vellum_common::{Diagnostic, DocumentSnapshot, Uri};
use vellum_provenance::{ExprId, MappingEntry};

use crate::facade::TemplateQuery;

/// The overlay half of one compile: the synthesized source text and the
/// mapping artifact tying it back to the template.
#[derive(Clone)]
pub struct OverlayArtifact {
    pub uri: Uri,
    pub text: Arc<str>,
    pub mapping: Vec<MappingEntry>,
    /// User-facing name of the view-model class the overlay binds to,
    /// used when rewriting missing-member messages.
    pub view_model_display_name: Option<String>,
    /// Synthetic type-alias names printed into the overlay, mapped to
    /// the display names users should see instead.
    pub type_aliases: FxHashMap<String, String>,
}

/// Everything one compile produces.
#[derive(Clone)]
pub struct TemplateCompilation {
    pub template_uri: Uri,
    /// Template-space diagnostics, staged by the pipeline phase that
    /// raised them.
    pub diagnostics: Vec<Diagnostic>,
    /// Expected type per bound expression, as imposed by binding targets.
    pub expected_type_by_expr: FxHashMap<ExprId, String>,
    pub overlay: OverlayArtifact,
    pub query: Arc<dyn TemplateQuery>,
}

/// A compile failure. Distinct from template diagnostics: those are the
/// pipeline working as intended; this is the pipeline unable to produce
/// a compilation at all.
#[derive(Debug, Clone)]
pub struct PipelineError {
    pub uri: Uri,
    pub message: String,
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "template pipeline failed for {}: {}", self.uri, self.message)
    }
}

impl Error for PipelineError {}

/// The external compiler pipeline.
pub trait TemplatePipeline {
    fn compile(&self, template: &DocumentSnapshot) -> Result<TemplateCompilation, PipelineError>;
}
