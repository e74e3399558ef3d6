//! Completions: template-domain resource candidates merged with the
//! external service's member completions.
//!
//! External replacement spans are projected through provenance; when the
//! service gives none, the whole bound expression is the replacement
//! range. Results are deduplicated by `(source, label, range)`.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug_span;
use vellum_common::{DiagnosticSource, TextSpan, Uri};
use vellum_overlay::{BuildError, CompletionOrigin, Confidence};
use vellum_typecheck::capabilities;

use crate::TemplateLanguageService;

/// Sort priority categories. Lower strings appear first.
pub mod sort_priority {
    /// Template-domain resource completions.
    pub const RESOURCE: &str = "10";
    /// Member completions from the external service.
    pub const MEMBER: &str = "11";
    /// Everything else the external service offers.
    pub const EXTERNAL: &str = "15";
}

/// One merged completion item in template coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionItem {
    pub label: String,
    /// Which producer contributed this item.
    pub source: DiagnosticSource,
    /// Reliability of a template-domain candidate, derived from the
    /// resource catalog's gap list. Absent for external items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Where a template-domain candidate was discovered. Absent for
    /// external items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<CompletionOrigin>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_text: Option<String>,
    /// The template span the completion replaces.
    pub range: TextSpan,
}

impl TemplateLanguageService {
    pub fn get_completions(
        &mut self,
        uri: &Uri,
        offset: u32,
    ) -> Result<Vec<CompletionItem>, BuildError> {
        let _guard = debug_span!("get_completions", uri = %uri, offset).entered();
        let (access, hit) = self.project_template_offset_with_policy(uri, offset)?;

        let mut items: Vec<CompletionItem> = Vec::new();
        for candidate in access.compilation.query.resource_completions(offset) {
            items.push(CompletionItem {
                label: candidate.label,
                source: DiagnosticSource::Template,
                confidence: Some(candidate.confidence),
                origin: Some(candidate.origin),
                detail: candidate.kind_detail,
                documentation: candidate.documentation,
                sort_text: Some(sort_priority::RESOURCE.to_string()),
                range: candidate.replace_span,
            });
        }

        if let Some(hit) = hit {
            if self.supports(capabilities::COMPLETIONS) {
                let overlay_offset = hit.overlay_offset_for(offset);
                for raw in self.typecheck.completions(&access.overlay, overlay_offset) {
                    let range = raw
                        .replacement_span
                        .and_then(|span| {
                            let back = self
                                .build
                                .index()
                                .project_generated_span(&hit.overlay.uri, span)?;
                            back.overlay.span.contains_span(&span).then(|| {
                                TextSpan::from_bounds(
                                    back.template_offset_for(span.start),
                                    back.template_offset_for(span.end()),
                                )
                            })
                        })
                        .unwrap_or(hit.expr_span);
                    items.push(CompletionItem {
                        label: raw.label,
                        source: DiagnosticSource::Typechecker,
                        confidence: None,
                        origin: None,
                        detail: raw.detail,
                        documentation: None,
                        sort_text: raw
                            .sort_text
                            .or_else(|| Some(sort_priority::MEMBER.to_string())),
                        range,
                    });
                }
            }
        }

        let mut seen: FxHashSet<(DiagnosticSource, String, TextSpan)> = FxHashSet::default();
        items.retain(|item| seen.insert((item.source, item.label.clone(), item.range)));
        items.sort_by(|a, b| {
            let a_key = (a.sort_text.as_deref().unwrap_or(sort_priority::EXTERNAL), &a.label);
            let b_key = (b.sort_text.as_deref().unwrap_or(sort_priority::EXTERNAL), &b.label);
            a_key.cmp(&b_key)
        });
        Ok(items)
    }
}

#[cfg(test)]
#[path = "tests/completions_tests.rs"]
mod completions_tests;
