//! Merged diagnostics.
//!
//! Two producers feed one template-space result: the compiler pipeline
//! (already template-space, staged) and the external type-checking
//! service (overlay-space, projected through the provenance boundary).
//! On the way, three rewrites apply:
//! - cascade suppression: a compiler type-mismatch is dropped when the
//!   external checker's quick-info at the implicated overlay offset
//!   reports exactly the type the compiler expected; the external
//!   checker is the tie-breaker of last resort
//! - lenient mode downgrades surviving type-mismatches to warnings
//! - missing-member diagnostics from the external service are rewritten
//!   into template vocabulary when the member path is resolvable

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use tracing::debug_span;
use vellum_common::{Diagnostic, Severity, TextSpan, Uri, template_codes, typecheck_codes};
use vellum_overlay::{BuildError, OverlayAccess};
use vellum_provenance::{Location, RelatedLocationDecision};
use vellum_typecheck::{RawDiagnostic, capabilities};

use crate::TemplateLanguageService;
use crate::options::TypecheckMode;

/// The merged diagnostics for one template.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticsResult {
    /// Union of both producers, deduplicated and ordered by position.
    pub all: Vec<Diagnostic>,
    /// The compiler's own diagnostics after suppression/strictness.
    pub compiler: Vec<Diagnostic>,
    /// External diagnostics after projection.
    pub external: Vec<Diagnostic>,
}

impl TemplateLanguageService {
    pub fn get_diagnostics(&mut self, uri: &Uri) -> Result<DiagnosticsResult, BuildError> {
        let _guard = debug_span!("get_diagnostics", uri = %uri).entered();
        let access = self.build.get_overlay(uri)?;

        let compiler = self.compiler_diagnostics(uri, &access);
        let external = self.external_diagnostics(&access);

        let mut all: Vec<Diagnostic> = Vec::with_capacity(compiler.len() + external.len());
        let mut seen = FxHashSet::default();
        for diagnostic in compiler.iter().chain(external.iter()) {
            let key = (
                diagnostic.uri.clone(),
                diagnostic.span,
                diagnostic.code,
                diagnostic.message.clone(),
            );
            if seen.insert(key) {
                all.push(diagnostic.clone());
            }
        }
        all.sort_by_key(|d| (d.span.start, d.code));

        Ok(DiagnosticsResult { all, compiler, external })
    }

    fn compiler_diagnostics(&self, uri: &Uri, access: &OverlayAccess) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for diagnostic in &access.compilation.diagnostics {
            let mut diagnostic = diagnostic.clone();
            if diagnostic.code == template_codes::EXPR_TYPE_MISMATCH {
                if self.typecheck_confirms_expected_type(uri, access, diagnostic.span) {
                    continue;
                }
                if self.options.typecheck_mode == TypecheckMode::Lenient
                    && diagnostic.severity == Severity::Error
                {
                    diagnostic.severity = Severity::Warning;
                }
            }
            out.push(diagnostic);
        }
        out
    }

    /// Cascade suppression probe: does external quick-info at the
    /// implicated overlay offset report exactly the type the compiler
    /// expected for this expression?
    fn typecheck_confirms_expected_type(
        &self,
        uri: &Uri,
        access: &OverlayAccess,
        span: TextSpan,
    ) -> bool {
        if !self.supports(capabilities::QUICK_INFO) {
            return false;
        }
        let Some(hit) = self.build.index().lookup_source_span(uri, span) else {
            return false;
        };
        let Some(expected) = access.compilation.expected_type_by_expr.get(&hit.expr_id) else {
            return false;
        };
        let Some(info) = self
            .typecheck
            .quick_info(&access.overlay, hit.overlay.span.start)
        else {
            return false;
        };
        type_text_of_display(&info.display).is_some_and(|reported| reported == expected.trim())
    }

    fn external_diagnostics(&self, access: &OverlayAccess) -> Vec<Diagnostic> {
        self.typecheck
            .diagnostics(&access.overlay)
            .into_iter()
            .map(|raw| self.project_external_diagnostic(access, raw))
            .collect()
    }

    fn project_external_diagnostic(&self, access: &OverlayAccess, raw: RawDiagnostic) -> Diagnostic {
        let index = self.build.index();
        let queried_overlay = &access.overlay.uri;

        let (location, message) = if index.is_overlay_uri(&raw.uri) {
            let owner = index
                .template_uri_for_generated(&raw.uri)
                .cloned()
                .unwrap_or_else(|| access.template.uri.clone());
            let hit = index.project_generated_span(&raw.uri, raw.span);
            let location = self
                .policy
                .resolve_overlay_diagnostic_location(&owner, hit.as_ref());
            let message = rewrite_missing_member(
                &raw,
                hit.as_ref().and_then(|h| h.member_path.as_deref()),
                access,
            );
            (location, message)
        } else {
            // Anchored in a genuine external file already; keep it.
            let location = Location::new(raw.uri.clone(), raw.span);
            let message = rewrite_aliases(&raw.message, &access.compilation.overlay.type_aliases);
            (location, message)
        };

        let mut diagnostic =
            Diagnostic::typechecker(location.uri, location.span, raw.severity, raw.code, message);
        for related in &raw.related {
            let related_location = Location::new(related.uri.clone(), related.span);
            match self.policy.resolve_related_diagnostic_location(
                index,
                queried_overlay,
                &related_location,
            ) {
                RelatedLocationDecision::Suppress => {}
                RelatedLocationDecision::MappedToTemplate(mapped) => {
                    diagnostic =
                        diagnostic.with_related(mapped.uri, mapped.span, related.message.clone());
                }
                RelatedLocationDecision::PassThrough => {
                    diagnostic = diagnostic.with_related(
                        related.uri.clone(),
                        related.span,
                        related.message.clone(),
                    );
                }
            }
        }
        diagnostic
    }
}

/// Rewrite a missing-member diagnostic into template vocabulary when the
/// member path is resolvable; otherwise keep the raw message with
/// synthetic alias names replaced by display names.
fn rewrite_missing_member(
    raw: &RawDiagnostic,
    member_path: Option<&str>,
    access: &OverlayAccess,
) -> String {
    if typecheck_codes::is_missing_property(raw.code) {
        if let (Some(path), Some(display_name)) = (
            member_path,
            access.compilation.overlay.view_model_display_name.as_deref(),
        ) {
            return format!("Property '{path}' does not exist on {display_name}");
        }
    }
    rewrite_aliases(&raw.message, &access.compilation.overlay.type_aliases)
}

/// Replace synthetic type-alias names printed into the overlay with the
/// display names users recognize.
pub(crate) fn rewrite_aliases(message: &str, aliases: &FxHashMap<String, String>) -> String {
    let mut message = message.to_string();
    for (alias, display) in aliases {
        if message.contains(alias.as_str()) {
            message = message.replace(alias.as_str(), display);
        }
    }
    message
}

/// Extract the type text from a quick-info display string such as
/// `(property) Person.name: string`: everything after the last `": "`
/// that sits at top-level nesting depth.
pub(crate) fn type_text_of_display(display: &str) -> Option<&str> {
    let bytes = display.as_bytes();
    let mut depth = 0i32;
    let mut split = None;
    for (i, byte) in bytes.iter().enumerate() {
        match byte {
            b'(' | b'[' | b'{' | b'<' => depth += 1,
            b')' | b']' | b'}' | b'>' => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b' ') => split = Some(i),
            _ => {}
        }
    }
    split.map(|i| display[i + 1..].trim())
}

#[cfg(test)]
#[path = "tests/diagnostics_tests.rs"]
mod diagnostics_tests;
