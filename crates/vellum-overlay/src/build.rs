//! The template build service.
//!
//! Thin orchestration, no projection logic: given a template URI, make
//! sure the overlay (text + mapping) is current and hand back versioned
//! snapshots of both documents. Recompiles happen only when the template
//! content hash changed since the cached record was built; each
//! rematerialization replaces the template's provenance table wholesale.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use tracing::info;
use vellum_common::{DocumentSnapshot, Uri};
use vellum_provenance::{ProvenanceIndex, TemplateMapping};

use crate::pipeline::{PipelineError, TemplateCompilation, TemplatePipeline};
use crate::store::DocumentStore;

/// Why the build service could not answer.
#[derive(Debug)]
pub enum BuildError {
    /// No template snapshot was ever upserted for this URI. Host misuse:
    /// an edit skipped the required upsert step.
    UnknownTemplate(Uri),
    /// The pipeline failed to compile the template.
    Pipeline(PipelineError),
}

impl fmt::Display for BuildError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTemplate(uri) => {
                write!(f, "no template snapshot registered for {uri}")
            }
            Self::Pipeline(err) => err.fmt(f),
        }
    }
}

impl Error for BuildError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::UnknownTemplate(_) => None,
            Self::Pipeline(err) => Some(err),
        }
    }
}

impl From<PipelineError> for BuildError {
    fn from(err: PipelineError) -> Self {
        Self::Pipeline(err)
    }
}

/// Everything a request needs about one template/overlay pair, cloned
/// out of the cache so no borrow of the service escapes.
#[derive(Clone)]
pub struct OverlayAccess {
    pub template: DocumentSnapshot,
    pub overlay: DocumentSnapshot,
    /// The mapping table; its entries are the overlay call sites.
    pub mapping: Arc<TemplateMapping>,
    pub compilation: Arc<TemplateCompilation>,
}

impl fmt::Debug for OverlayAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayAccess")
            .field("template", &self.template)
            .field("overlay", &self.overlay)
            .field("mapping", &self.mapping)
            .finish_non_exhaustive()
    }
}

struct BuildRecord {
    template_hash: u64,
    overlay: DocumentSnapshot,
    mapping: Arc<TemplateMapping>,
    compilation: Arc<TemplateCompilation>,
}

/// Guarantees overlays are current before anything projects against them.
pub struct OverlayBuildService {
    store: DocumentStore,
    pipeline: Box<dyn TemplatePipeline>,
    index: ProvenanceIndex,
    records: FxHashMap<Uri, BuildRecord>,
}

impl OverlayBuildService {
    pub fn new(pipeline: Box<dyn TemplatePipeline>) -> Self {
        Self {
            store: DocumentStore::new(),
            pipeline,
            index: ProvenanceIndex::new(),
            records: FxHashMap::default(),
        }
    }

    /// Register or update a template's text.
    pub fn upsert_template(&mut self, uri: Uri, text: &str) {
        self.store.upsert(uri, text);
    }

    /// Forget a template: its snapshot, its cached compilation and its
    /// provenance table.
    pub fn remove_template(&mut self, uri: &Uri) {
        self.store.remove(uri);
        self.records.remove(uri);
        self.index.remove_template(uri);
    }

    pub fn has_template(&self, uri: &Uri) -> bool {
        self.store.contains(uri)
    }

    pub fn index(&self) -> &ProvenanceIndex {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut ProvenanceIndex {
        &mut self.index
    }

    /// Ensure the overlay for `uri` is current and return both snapshots
    /// plus the mapping and compilation. Idempotent: calling twice
    /// without an intervening edit returns snapshots with identical
    /// content hashes.
    pub fn get_overlay(&mut self, uri: &Uri) -> Result<OverlayAccess, BuildError> {
        let template = self
            .store
            .get(uri)
            .ok_or_else(|| BuildError::UnknownTemplate(uri.clone()))?
            .clone();

        let current = self
            .records
            .get(uri)
            .is_some_and(|record| record.template_hash == template.content_hash);
        if !current {
            let compilation = Arc::new(self.pipeline.compile(&template)?);
            let overlay_version = self
                .records
                .get(uri)
                .map_or(1, |record| record.overlay.version + 1);
            let overlay = DocumentSnapshot::new(
                compilation.overlay.uri.clone(),
                compilation.overlay.text.clone(),
                overlay_version,
            );
            let mapping = Arc::new(TemplateMapping::new(
                template.uri.clone(),
                overlay.uri.clone(),
                compilation.overlay.mapping.clone(),
            ));
            self.index.replace_template(Arc::clone(&mapping));
            info!(
                template = %uri,
                overlay = %overlay.uri,
                version = overlay.version,
                entries = mapping.entries().len(),
                "materialized overlay"
            );
            self.records.insert(
                uri.clone(),
                BuildRecord {
                    template_hash: template.content_hash,
                    overlay,
                    mapping,
                    compilation,
                },
            );
        }

        let record = &self.records[uri];
        Ok(OverlayAccess {
            template,
            overlay: record.overlay.clone(),
            mapping: Arc::clone(&record.mapping),
            compilation: Arc::clone(&record.compilation),
        })
    }
}

#[cfg(test)]
#[path = "tests/build_tests.rs"]
mod build_tests;
