//! Go to definition and find references.
//!
//! Both short-circuit to an empty result, without calling the external
//! service, when the cursor has no provenance hit: outside any bound
//! expression the external checker could only answer about overlay
//! scaffolding, which would be pointless or misleading. Every location
//! the service does return is classified by the policy as this/another
//! template, a raw overlay navigation fallback, or a genuine external
//! file.

use rustc_hash::FxHashSet;
use tracing::debug_span;
use vellum_common::Uri;
use vellum_overlay::BuildError;
use vellum_provenance::{Location, ReferenceLocationDecision};
use vellum_typecheck::capabilities;

use crate::TemplateLanguageService;

#[derive(Clone, Copy)]
enum NavigationKind {
    Definition,
    References,
}

impl TemplateLanguageService {
    pub fn get_definition(&mut self, uri: &Uri, offset: u32) -> Result<Vec<Location>, BuildError> {
        let _guard = debug_span!("get_definition", uri = %uri, offset).entered();
        self.navigate(uri, offset, NavigationKind::Definition)
    }

    pub fn get_references(&mut self, uri: &Uri, offset: u32) -> Result<Vec<Location>, BuildError> {
        let _guard = debug_span!("get_references", uri = %uri, offset).entered();
        self.navigate(uri, offset, NavigationKind::References)
    }

    fn navigate(
        &mut self,
        uri: &Uri,
        offset: u32,
        kind: NavigationKind,
    ) -> Result<Vec<Location>, BuildError> {
        let (access, hit) = self.project_template_offset_with_policy(uri, offset)?;
        let Some(hit) = hit else {
            return Ok(Vec::new());
        };
        let capability = match kind {
            NavigationKind::Definition => capabilities::DEFINITION,
            NavigationKind::References => capabilities::REFERENCES,
        };
        if !self.supports(capability) {
            return Ok(Vec::new());
        }

        let overlay_offset = hit.overlay_offset_for(offset);
        let raw = match kind {
            NavigationKind::Definition => self.typecheck.definition(&access.overlay, overlay_offset),
            NavigationKind::References => self.typecheck.references(&access.overlay, overlay_offset),
        };

        let index = self.build.index();
        let mut out: Vec<Location> = Vec::new();
        let mut seen = FxHashSet::default();
        for location in raw {
            let location = Location::new(location.uri, location.span);
            let resolved = match self.policy.resolve_generated_reference_location(
                index,
                &hit.overlay.uri,
                &location,
            ) {
                ReferenceLocationDecision::Template(resolved, _evidence) => resolved,
                ReferenceLocationDecision::RawOverlay(resolved) => resolved,
                ReferenceLocationDecision::External(resolved) => resolved,
                ReferenceLocationDecision::Discard => continue,
            };
            if seen.insert((resolved.uri.clone(), resolved.span)) {
                out.push(resolved);
            }
        }
        out.sort_by(|a, b| (&a.uri, a.span.start).cmp(&(&b.uri, b.span.start)));
        Ok(out)
    }
}

#[cfg(test)]
#[path = "tests/navigation_tests.rs"]
mod navigation_tests;
