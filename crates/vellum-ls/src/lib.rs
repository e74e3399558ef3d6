//! The merged template language service.
//!
//! One service instance owns the build service (template snapshots,
//! overlay materialization, the provenance index), the external
//! type-checking service, and the projection policy. Every public
//! method is synchronous request/response and recomputes its answer per
//! call; within one request, overlay materialization always precedes
//! any projection attempt (`get_overlay` opens every request).
//!
//! All positions in the public signatures are template-document
//! offsets/spans; the overlay URI never appears in any returned value.
//! Features:
//! - Diagnostics (compiler + projected external, cascade suppression,
//!   missing-member rewriting)
//! - Hover
//! - Completions
//! - Go to definition / find references
//! - Code actions
//! - Rename (all-or-nothing edit batches)

use tracing::debug;
use vellum_common::Uri;
use vellum_overlay::{BuildError, OverlayAccess, OverlayBuildService, TemplatePipeline};
use vellum_provenance::{ProvenanceHit, ProvenancePolicy};
use vellum_typecheck::TypecheckService;

pub use vellum_common::{
    Diagnostic, DiagnosticSource, DiagnosticStage, RelatedInformation, Severity, TextSpan,
};
pub use vellum_provenance::{Evidence, Location};

// Host-provided options
pub mod options;
pub use options::{LanguageServiceOptions, TypecheckMode};

// Diagnostics merging
pub mod diagnostics;
pub use diagnostics::DiagnosticsResult;

// Hover
pub mod hover;
pub use hover::Hover;

// Completions
pub mod completions;
pub use completions::{CompletionItem, sort_priority};

// Definition and references
pub mod navigation;

// Rename (owns `TextEdit`, reused by code actions)
pub mod rename;
pub use rename::{RenameInfo, TextEdit};

// Code actions
pub mod code_actions;
pub use code_actions::CodeAction;

/// The merged language service for one type-checking workspace.
pub struct TemplateLanguageService {
    build: OverlayBuildService,
    typecheck: Box<dyn TypecheckService>,
    policy: ProvenancePolicy,
    options: LanguageServiceOptions,
}

impl TemplateLanguageService {
    pub fn new(pipeline: Box<dyn TemplatePipeline>, typecheck: Box<dyn TypecheckService>) -> Self {
        Self {
            build: OverlayBuildService::new(pipeline),
            typecheck,
            policy: ProvenancePolicy::STANDARD,
            options: LanguageServiceOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: LanguageServiceOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &LanguageServiceOptions {
        &self.options
    }

    /// Register or update a template's text. Must happen before any
    /// request about that template.
    pub fn upsert_template(&mut self, uri: Uri, text: &str) {
        self.build.upsert_template(uri, text);
    }

    pub fn remove_template(&mut self, uri: &Uri) {
        self.build.remove_template(uri);
    }

    pub fn build(&self) -> &OverlayBuildService {
        &self.build
    }

    /// Whether the external service advertises every capability in `mask`.
    pub(crate) fn supports(&self, mask: u32) -> bool {
        self.typecheck.supports(mask)
    }

    /// Materialize-then-project for a template cursor offset. The
    /// overlay is brought up to date first; a `None` hit means the
    /// offset is outside any bound expression (a tag name, static text)
    /// and the caller must skip the external round trip entirely. The
    /// index's nearest-entry fallback is useful for anchoring but not
    /// here: a hit whose expression does not hold the cursor is a null
    /// hit.
    pub(crate) fn project_template_offset_with_policy(
        &mut self,
        uri: &Uri,
        offset: u32,
    ) -> Result<(OverlayAccess, Option<ProvenanceHit>), BuildError> {
        let access = self.build.get_overlay(uri)?;
        let hit = self
            .build
            .index()
            .lookup_source(uri, offset)
            .filter(|hit| hit.expr_span.touches(offset));
        if hit.is_none() {
            debug!(template = %uri, offset, "no provenance hit; skipping external service");
        }
        Ok((access, hit))
    }

    /// Materialize-then-project for a template span. Null hit unless the
    /// span actually overlaps a bound expression.
    pub(crate) fn project_template_span_with_policy(
        &mut self,
        uri: &Uri,
        span: TextSpan,
    ) -> Result<(OverlayAccess, Option<ProvenanceHit>), BuildError> {
        let access = self.build.get_overlay(uri)?;
        let hit = self
            .build
            .index()
            .lookup_source_span(uri, span)
            .filter(|hit| {
                if span.is_empty() {
                    hit.expr_span.touches(span.start)
                } else {
                    hit.expr_span.intersects(&span)
                }
            });
        if hit.is_none() {
            debug!(template = %uri, start = span.start, "no provenance hit; skipping external service");
        }
        Ok((access, hit))
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
pub(crate) mod support;
