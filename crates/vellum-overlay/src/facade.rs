//! The template query facade: a position-indexed read API over one
//! template's compiled IR.
//!
//! The pipeline that lowers, links, binds and infers the template is an
//! external collaborator; the language service only ever reads its
//! output through this trait. Everything is keyed by template-space byte
//! offset.

use serde::{Deserialize, Serialize};
use vellum_common::TextSpan;
use vellum_provenance::ExprId;

/// The kind of a template IR node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateNodeKind {
    Element,
    Attribute,
    Interpolation,
    Text,
}

/// One IR node at an offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateNode {
    pub kind: TemplateNodeKind,
    pub name: String,
    pub span: TextSpan,
}

/// One bound expression at an offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprInfo {
    pub id: ExprId,
    pub span: TextSpan,
    pub text: String,
}

/// The resource (custom element / attribute) controlling an offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerInfo {
    pub resource_name: String,
    /// User-facing name of the associated view-model class.
    pub view_model_display_name: String,
    pub documentation: Option<String>,
}

/// One bindable property a resource declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindableInfo {
    pub name: String,
    pub expected_type: Option<String>,
    pub documentation: Option<String>,
}

/// How reliable a template-domain completion is, derived externally from
/// the resource catalog's per-resource gap list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    Exact,
    High,
    Partial,
    Low,
}

/// Where a template-domain completion candidate was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompletionOrigin {
    Builtin,
    Config,
    Source,
    Unknown,
}

/// A template-domain completion candidate (resource name, bindable, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCompletion {
    pub label: String,
    pub kind_detail: Option<String>,
    pub confidence: Confidence,
    pub origin: CompletionOrigin,
    /// Template span the completion replaces.
    pub replace_span: TextSpan,
    pub documentation: Option<String>,
}

/// The compiler's own type display for the expression/member at an
/// offset, used for hover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExprTypeInfo {
    pub display: String,
    pub documentation: Option<String>,
    /// Span of the member the display refers to, when narrower than the
    /// whole expression.
    pub member_span: Option<TextSpan>,
}

/// Position-indexed read API over one template's compiled IR.
pub trait TemplateQuery {
    /// The most specific IR node at `offset`.
    fn node_at(&self, offset: u32) -> Option<TemplateNode>;

    /// The bound expression at `offset`, if the offset is inside one.
    fn expr_at(&self, offset: u32) -> Option<ExprInfo>;

    /// The expected type the binding target imposes on an expression.
    fn expected_type_of(&self, expr: ExprId) -> Option<String>;

    /// The resource controlling `offset`.
    fn controller_at(&self, offset: u32) -> Option<ControllerInfo>;

    /// The bindables declared by the resource behind `node`.
    fn bindables_for(&self, node: &TemplateNode) -> Vec<BindableInfo>;

    /// Template-domain completion candidates at `offset`.
    fn resource_completions(&self, offset: u32) -> Vec<ResourceCompletion>;

    /// The compiler's own type info for hover at `offset`.
    fn expr_type_info(&self, offset: u32) -> Option<ExprTypeInfo>;
}
