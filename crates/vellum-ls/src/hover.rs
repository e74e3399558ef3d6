//! Hover: the compiler's own type display merged with external
//! quick-info.
//!
//! Range priority: the external quick-info span mapped back through
//! provenance, then the nearest member segment, then the whole bound
//! expression. Outside any bound expression, element/attribute markup
//! hover is served from the query facade instead.

use serde::Serialize;
use tracing::debug_span;
use vellum_common::{TextSpan, Uri};
use vellum_overlay::{BuildError, OverlayAccess};
use vellum_typecheck::capabilities;

use crate::TemplateLanguageService;

/// A hover result in template coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hover {
    pub contents: String,
    pub range: TextSpan,
}

impl TemplateLanguageService {
    pub fn get_hover(&mut self, uri: &Uri, offset: u32) -> Result<Option<Hover>, BuildError> {
        let _guard = debug_span!("get_hover", uri = %uri, offset).entered();
        let (access, hit) = self.project_template_offset_with_policy(uri, offset)?;
        let Some(hit) = hit else {
            return Ok(markup_hover(&access, offset));
        };

        let mut parts: Vec<String> = Vec::new();
        if let Some(info) = access.compilation.query.expr_type_info(offset) {
            parts.push(info.display);
            if let Some(documentation) = info.documentation {
                parts.push(documentation);
            }
        }

        // Segment granularity when a segment matched, whole expression
        // otherwise; an external quick-info span that maps back cleanly
        // takes precedence below.
        let mut range = hit.template.span;
        if self.supports(capabilities::QUICK_INFO) {
            let overlay_offset = hit.overlay_offset_for(offset);
            if let Some(info) = self.typecheck.quick_info(&access.overlay, overlay_offset) {
                if let Some(back) = self
                    .build
                    .index()
                    .project_generated_span(&hit.overlay.uri, info.span)
                {
                    if back.overlay.span.contains_span(&info.span) {
                        range = TextSpan::from_bounds(
                            back.template_offset_for(info.span.start),
                            back.template_offset_for(info.span.end()),
                        );
                    }
                }
                parts.push(info.display);
                if let Some(documentation) = info.documentation {
                    parts.push(documentation);
                }
            }
        }

        if parts.is_empty() {
            return Ok(None);
        }
        Ok(Some(Hover {
            contents: parts.join("\n\n"),
            range,
        }))
    }
}

/// Element/attribute hover outside bound expressions: the controlling
/// resource and, for attributes, the bindable it targets.
fn markup_hover(access: &OverlayAccess, offset: u32) -> Option<Hover> {
    let query = &access.compilation.query;
    let node = query.node_at(offset)?;
    let controller = query.controller_at(offset)?;

    let mut parts = vec![format!(
        "{}: {}",
        controller.resource_name, controller.view_model_display_name
    )];
    if let Some(documentation) = controller.documentation {
        parts.push(documentation);
    }
    if let Some(bindable) = query
        .bindables_for(&node)
        .into_iter()
        .find(|b| node.name.starts_with(&b.name))
    {
        let expected = bindable.expected_type.unwrap_or_else(|| "unknown".to_string());
        parts.push(format!("bindable {}: {}", bindable.name, expected));
        if let Some(documentation) = bindable.documentation {
            parts.push(documentation);
        }
    }

    Some(Hover {
        contents: parts.join("\n\n"),
        range: node.span,
    })
}

#[cfg(test)]
#[path = "tests/hover_tests.rs"]
mod hover_tests;
