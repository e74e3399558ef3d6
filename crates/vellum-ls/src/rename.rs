//! Rename: projected rename edits with all-or-nothing batch semantics.
//!
//! The external service is asked for rename edits at the projected
//! overlay offset, and additionally for references at the same offset.
//! The two queries are not guaranteed consistent, so reference locations
//! not already covered by a direct edit are unioned in as replacements.
//! The whole batch is then subject to the policy's rejection rule: one
//! unmappable overlay edit voids everything, a rename is never partially
//! applied.

use rustc_hash::FxHashSet;
use serde::Serialize;
use tracing::debug_span;
use vellum_common::{TextSpan, Uri};
use vellum_overlay::BuildError;
use vellum_provenance::{EditBatchStats, ProvenanceIndex};
use vellum_typecheck::{RawTextEdit, capabilities};

use crate::TemplateLanguageService;

/// A single text edit in template (or genuine external file)
/// coordinates. Also reused by code actions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextEdit {
    pub uri: Uri,
    pub span: TextSpan,
    pub new_text: String,
}

impl TextEdit {
    pub const fn new(uri: Uri, span: TextSpan, new_text: String) -> Self {
        Self { uri, span, new_text }
    }
}

/// Prepare-rename info: the exact range being renamed and the text the
/// editor should pre-fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenameInfo {
    pub span: TextSpan,
    pub placeholder: String,
}

/// Project one overlay edit back into its template, translating the edit
/// bounds inside the matched granularity. `None` when the edit span is
/// not actually covered by any mapping entry; a nearest-match fallback
/// is not good enough to rewrite text with.
pub(crate) fn project_overlay_edit(index: &ProvenanceIndex, raw: &RawTextEdit) -> Option<TextEdit> {
    let hit = index.project_generated_span(&raw.uri, raw.span)?;
    let covered = if raw.span.is_empty() {
        hit.overlay.span.touches(raw.span.start)
    } else {
        hit.overlay.span.contains_span(&raw.span)
    };
    if !covered {
        return None;
    }
    let span = TextSpan::from_bounds(
        hit.template_offset_for(raw.span.start),
        hit.template_offset_for(raw.span.end()),
    );
    Some(TextEdit::new(hit.template.uri, span, raw.new_text.clone()))
}

impl TemplateLanguageService {
    pub fn rename_symbol(
        &mut self,
        uri: &Uri,
        offset: u32,
        new_name: &str,
    ) -> Result<Vec<TextEdit>, BuildError> {
        let _guard = debug_span!("rename_symbol", uri = %uri, offset).entered();
        let (access, hit) = self.project_template_offset_with_policy(uri, offset)?;
        let Some(hit) = hit else {
            return Ok(Vec::new());
        };
        if !self.supports(capabilities::RENAME) {
            return Ok(Vec::new());
        }

        let overlay_offset = hit.overlay_offset_for(offset);
        let Some(result) = self
            .typecheck
            .rename_edits(&access.overlay, overlay_offset, new_name)
        else {
            return Ok(Vec::new());
        };

        let index = self.build.index();
        let mut stats = EditBatchStats::default();
        let mut edits: Vec<TextEdit> = Vec::new();
        // Raw (uri, span) pairs already consumed by a direct edit, so a
        // reference at the same place is not applied twice.
        let mut covered: FxHashSet<(Uri, TextSpan)> = FxHashSet::default();

        for raw in &result.edits {
            covered.insert((raw.uri.clone(), raw.span));
            if index.is_overlay_uri(&raw.uri) {
                match project_overlay_edit(index, raw) {
                    Some(edit) => {
                        stats.record_mapped_overlay();
                        edits.push(edit);
                    }
                    None => stats.record_unmapped_overlay(),
                }
            } else {
                stats.record_external();
                edits.push(TextEdit::new(raw.uri.clone(), raw.span, raw.new_text.clone()));
            }
        }

        if self.supports(capabilities::REFERENCES) {
            for location in self.typecheck.references(&access.overlay, overlay_offset) {
                if covered.contains(&(location.uri.clone(), location.span)) {
                    continue;
                }
                let raw = RawTextEdit {
                    uri: location.uri,
                    span: location.span,
                    new_text: new_name.to_string(),
                };
                if index.is_overlay_uri(&raw.uri) {
                    match project_overlay_edit(index, &raw) {
                        Some(edit) => {
                            stats.record_mapped_overlay();
                            edits.push(edit);
                        }
                        None => stats.record_unmapped_overlay(),
                    }
                } else {
                    stats.record_external();
                    edits.push(TextEdit::new(raw.uri, raw.span, raw.new_text));
                }
            }
        }

        if self.policy.should_reject_overlay_edit_batch(&stats) {
            return Ok(Vec::new());
        }

        let mut seen = FxHashSet::default();
        edits.retain(|edit| seen.insert((edit.uri.clone(), edit.span)));
        edits.sort_by(|a, b| (&a.uri, a.span.start).cmp(&(&b.uri, b.span.start)));
        Ok(edits)
    }

    /// `None` outside any bound expression. The placeholder is the
    /// innermost member-path link at the cursor, or the matched template
    /// text when no path is recorded.
    pub fn prepare_rename(
        &mut self,
        uri: &Uri,
        offset: u32,
    ) -> Result<Option<RenameInfo>, BuildError> {
        let _guard = debug_span!("prepare_rename", uri = %uri, offset).entered();
        let (access, hit) = self.project_template_offset_with_policy(uri, offset)?;
        let Some(hit) = hit else {
            return Ok(None);
        };
        let placeholder = match &hit.member_path {
            Some(path) => path.rsplit('.').next().unwrap_or(path).to_string(),
            None => access.template.text_in(hit.template.span).to_string(),
        };
        Ok(Some(RenameInfo {
            span: hit.template.span,
            placeholder,
        }))
    }
}

#[cfg(test)]
#[path = "tests/rename_tests.rs"]
mod rename_tests;
