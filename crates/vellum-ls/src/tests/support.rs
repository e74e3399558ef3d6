//! Shared fixture for the language service tests.
//!
//! One template with a boolean binding and two member interpolations,
//! the overlay a mock pipeline "synthesizes" for it, and a scriptable
//! mock type-checking service whose call offsets the tests can assert
//! on. Spans are located by substring search so the fixture stays
//! readable.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use vellum_common::{
    Diagnostic, DiagnosticStage, DocumentSnapshot, Severity, TextSpan, Uri, template_codes,
};
use vellum_overlay::{
    BindableInfo, ControllerInfo, ExprInfo, ExprTypeInfo, OverlayArtifact, PipelineError,
    ResourceCompletion, TemplateCompilation, TemplateNode, TemplatePipeline, TemplateQuery,
};
use vellum_provenance::{ExprId, MappingEntry};
use vellum_typecheck::{
    RawCodeAction, RawCompletion, RawDiagnostic, RawLocation, RawQuickInfo, RawRenameResult,
    TypecheckService,
};

use crate::options::LanguageServiceOptions;
use crate::TemplateLanguageService;

pub const TEMPLATE: &str =
    "<input disabled.bind=\"'yes'\"><div>${person.name} ${person.age}</div>";

pub const OVERLAY: &str = "\
import { PersonPage } from './page';
const vm = null! as PersonPage;
vm.disabled = ('yes');
vm.person.name;
vm.person.age;
";

pub fn template_uri() -> Uri {
    Uri::from("/app/page.html")
}

pub fn overlay_uri() -> Uri {
    Uri::from("/app/page.html.__overlay.ts")
}

fn find(text: &str, needle: &str) -> u32 {
    text.find(needle)
        .unwrap_or_else(|| panic!("fixture text does not contain {needle:?}")) as u32
}

/// Span of the first occurrence of `needle` in the template.
pub fn t_span(needle: &str) -> TextSpan {
    TextSpan::new(find(TEMPLATE, needle), needle.len() as u32)
}

/// Span of `inner` within the first occurrence of `outer` in the template.
pub fn t_sub(outer: &str, inner: &str) -> TextSpan {
    TextSpan::new(find(TEMPLATE, outer) + find(outer, inner), inner.len() as u32)
}

/// Span of the first occurrence of `needle` in the overlay.
pub fn o_span(needle: &str) -> TextSpan {
    TextSpan::new(find(OVERLAY, needle), needle.len() as u32)
}

/// Span of `inner` within the first occurrence of `outer` in the overlay.
pub fn o_sub(outer: &str, inner: &str) -> TextSpan {
    TextSpan::new(find(OVERLAY, outer) + find(outer, inner), inner.len() as u32)
}

fn mapping_entries() -> Vec<MappingEntry> {
    vec![
        MappingEntry::new(ExprId(1), t_span("'yes'"), o_span("'yes'")),
        MappingEntry::new(ExprId(2), t_span("person.name"), o_span("person.name"))
            .with_segment(
                t_sub("${person.name}", "person"),
                o_sub("vm.person.name", "person"),
                Some("person"),
            )
            .with_segment(
                t_sub("${person.name}", "name"),
                o_sub("vm.person.name", "name"),
                Some("person.name"),
            ),
        MappingEntry::new(ExprId(3), t_span("person.age"), o_span("person.age"))
            .with_segment(
                t_sub("${person.age}", "person"),
                o_sub("vm.person.age", "person"),
                Some("person"),
            )
            .with_segment(
                t_sub("${person.age}", "age"),
                o_sub("vm.person.age", "age"),
                Some("person.age"),
            ),
    ]
}

// ---------------------------------------------------------------------------
// Mock query facade
// ---------------------------------------------------------------------------

/// Query facade with scriptable answers.
#[derive(Default)]
pub struct FixtureQuery {
    pub nodes: Vec<TemplateNode>,
    pub controller: Option<ControllerInfo>,
    pub bindables: Vec<BindableInfo>,
    pub resources: Vec<ResourceCompletion>,
    pub type_infos: Vec<(TextSpan, ExprTypeInfo)>,
}

impl TemplateQuery for FixtureQuery {
    fn node_at(&self, offset: u32) -> Option<TemplateNode> {
        self.nodes.iter().find(|n| n.span.touches(offset)).cloned()
    }

    fn expr_at(&self, _offset: u32) -> Option<ExprInfo> {
        None
    }

    fn expected_type_of(&self, _expr: ExprId) -> Option<String> {
        None
    }

    fn controller_at(&self, _offset: u32) -> Option<ControllerInfo> {
        self.controller.clone()
    }

    fn bindables_for(&self, _node: &TemplateNode) -> Vec<BindableInfo> {
        self.bindables.clone()
    }

    fn resource_completions(&self, offset: u32) -> Vec<ResourceCompletion> {
        self.resources
            .iter()
            .filter(|r| r.replace_span.touches(offset))
            .cloned()
            .collect()
    }

    fn expr_type_info(&self, offset: u32) -> Option<ExprTypeInfo> {
        self.type_infos
            .iter()
            .find(|(span, _)| span.touches(offset))
            .map(|(_, info)| info.clone())
    }
}

// ---------------------------------------------------------------------------
// Mock pipeline
// ---------------------------------------------------------------------------

struct FixturePipeline {
    compilation: TemplateCompilation,
    calls: Rc<Cell<u32>>,
}

impl TemplatePipeline for FixturePipeline {
    fn compile(&self, _template: &DocumentSnapshot) -> Result<TemplateCompilation, PipelineError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.compilation.clone())
    }
}

// ---------------------------------------------------------------------------
// Mock type-checking service
// ---------------------------------------------------------------------------

/// Scripted answers plus call recording, shared with the test through an
/// `Rc` so assertions survive handing the service to the orchestrator.
#[derive(Default)]
pub struct TypecheckState {
    pub capabilities: Cell<u32>,
    pub diagnostics: RefCell<Vec<RawDiagnostic>>,
    /// Quick-info answers keyed by the overlay span they apply to.
    pub quick_infos: RefCell<Vec<(TextSpan, RawQuickInfo)>>,
    pub quick_info_calls: RefCell<Vec<u32>>,
    pub definitions: RefCell<Vec<RawLocation>>,
    pub definition_calls: Cell<u32>,
    pub references: RefCell<Vec<RawLocation>>,
    pub reference_calls: Cell<u32>,
    pub completions: RefCell<Vec<RawCompletion>>,
    pub completion_calls: RefCell<Vec<u32>>,
    pub rename: RefCell<Option<RawRenameResult>>,
    pub rename_calls: Cell<u32>,
    pub code_actions: RefCell<Vec<RawCodeAction>>,
    pub code_action_calls: Cell<u32>,
}

pub struct ScriptedTypecheck(pub Rc<TypecheckState>);

impl TypecheckService for ScriptedTypecheck {
    fn capabilities(&self) -> u32 {
        self.0.capabilities.get()
    }

    fn diagnostics(&self, _overlay: &DocumentSnapshot) -> Vec<RawDiagnostic> {
        self.0.diagnostics.borrow().clone()
    }

    fn quick_info(&self, _overlay: &DocumentSnapshot, offset: u32) -> Option<RawQuickInfo> {
        self.0.quick_info_calls.borrow_mut().push(offset);
        self.0
            .quick_infos
            .borrow()
            .iter()
            .find(|(span, _)| span.touches(offset))
            .map(|(_, info)| info.clone())
    }

    fn definition(&self, _overlay: &DocumentSnapshot, _offset: u32) -> Vec<RawLocation> {
        self.0.definition_calls.set(self.0.definition_calls.get() + 1);
        self.0.definitions.borrow().clone()
    }

    fn references(&self, _overlay: &DocumentSnapshot, _offset: u32) -> Vec<RawLocation> {
        self.0.reference_calls.set(self.0.reference_calls.get() + 1);
        self.0.references.borrow().clone()
    }

    fn completions(&self, _overlay: &DocumentSnapshot, offset: u32) -> Vec<RawCompletion> {
        self.0.completion_calls.borrow_mut().push(offset);
        self.0.completions.borrow().clone()
    }

    fn rename_edits(
        &self,
        _overlay: &DocumentSnapshot,
        _offset: u32,
        _new_name: &str,
    ) -> Option<RawRenameResult> {
        self.0.rename_calls.set(self.0.rename_calls.get() + 1);
        self.0.rename.borrow().clone()
    }

    fn code_actions(&self, _overlay: &DocumentSnapshot, _start: u32, _end: u32) -> Vec<RawCodeAction> {
        self.0.code_action_calls.set(self.0.code_action_calls.get() + 1);
        self.0.code_actions.borrow().clone()
    }
}

// ---------------------------------------------------------------------------
// Fixture assembly
// ---------------------------------------------------------------------------

pub struct Fixture {
    pub service: TemplateLanguageService,
    pub typecheck: Rc<TypecheckState>,
    pub compile_calls: Rc<Cell<u32>>,
}

pub fn fixture() -> Fixture {
    fixture_custom(FixtureQuery::default(), LanguageServiceOptions::default())
}

pub fn fixture_with_query(query: FixtureQuery) -> Fixture {
    fixture_custom(query, LanguageServiceOptions::default())
}

pub fn fixture_custom(query: FixtureQuery, options: LanguageServiceOptions) -> Fixture {
    let compile_calls = Rc::new(Cell::new(0));
    let typecheck = Rc::new(TypecheckState::default());

    let mut expected_type_by_expr = FxHashMap::default();
    expected_type_by_expr.insert(ExprId(1), "boolean".to_string());
    let mut type_aliases = FxHashMap::default();
    type_aliases.insert("__Vellum_PersonPage".to_string(), "PersonPage".to_string());

    let compilation = TemplateCompilation {
        template_uri: template_uri(),
        diagnostics: vec![Diagnostic::template(
            DiagnosticStage::Infer,
            template_uri(),
            t_span("'yes'"),
            Severity::Error,
            template_codes::EXPR_TYPE_MISMATCH,
            "expected boolean but expression has type string",
        )],
        expected_type_by_expr,
        overlay: OverlayArtifact {
            uri: overlay_uri(),
            text: OVERLAY.into(),
            mapping: mapping_entries(),
            view_model_display_name: Some("PersonPage".to_string()),
            type_aliases,
        },
        query: Arc::new(query),
    };

    let pipeline = FixturePipeline {
        compilation,
        calls: Rc::clone(&compile_calls),
    };
    let mut service = TemplateLanguageService::new(
        Box::new(pipeline),
        Box::new(ScriptedTypecheck(Rc::clone(&typecheck))),
    )
    .with_options(options);
    service.upsert_template(template_uri(), TEMPLATE);

    Fixture {
        service,
        typecheck,
        compile_calls,
    }
}
