//! Code actions: external fixes whose edits survive projection.
//!
//! The requested template range is projected to an overlay range; each
//! edit the service returns is either mapped back to a template edit,
//! passed through untouched when it targets a genuine external file, or
//! dropped when it targets an overlay position no mapping covers. An
//! action left with zero edits is dropped entirely.

use serde::Serialize;
use tracing::debug_span;
use vellum_common::{TextSpan, Uri};
use vellum_overlay::BuildError;
use vellum_typecheck::capabilities;

use crate::TemplateLanguageService;
use crate::rename::{TextEdit, project_overlay_edit};

/// One applicable fix in template coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    pub title: String,
    pub edits: Vec<TextEdit>,
}

impl TemplateLanguageService {
    pub fn get_code_actions(
        &mut self,
        uri: &Uri,
        span: TextSpan,
    ) -> Result<Vec<CodeAction>, BuildError> {
        let _guard = debug_span!("get_code_actions", uri = %uri, start = span.start).entered();
        let (access, hit) = self.project_template_span_with_policy(uri, span)?;
        let Some(hit) = hit else {
            return Ok(Vec::new());
        };
        if !self.supports(capabilities::CODE_ACTIONS) {
            return Ok(Vec::new());
        }

        let start = hit.overlay_offset_for(span.start);
        let end = hit.overlay_offset_for(span.end());
        let index = self.build.index();

        let mut out = Vec::new();
        for action in self.typecheck.code_actions(&access.overlay, start, end) {
            let mut edits = Vec::new();
            for raw in &action.edits {
                if index.is_overlay_uri(&raw.uri) {
                    if let Some(edit) = project_overlay_edit(index, raw) {
                        edits.push(edit);
                    }
                } else {
                    edits.push(TextEdit::new(raw.uri.clone(), raw.span, raw.new_text.clone()));
                }
            }
            if !edits.is_empty() {
                out.push(CodeAction {
                    title: action.title.clone(),
                    edits,
                });
            }
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "tests/code_actions_tests.rs"]
mod code_actions_tests;
