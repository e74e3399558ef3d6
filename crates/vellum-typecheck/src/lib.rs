//! The external type-checking service boundary.
//!
//! The merged language service hands overlay snapshots to an external
//! checker and gets back diagnostics, quick-info, navigation results,
//! completions, rename edits and code actions, all in overlay
//! coordinates (`Raw*` records). Only `diagnostics` is mandatory; every
//! other method is an optional capability the host may not implement,
//! advertised through `capabilities()` and checked before each call. An
//! absent capability contributes nothing to a merged result; it never
//! fails a request.

// Overlay-coordinate records returned by the service
pub mod protocol;
pub use protocol::{
    RawCodeAction, RawCompletion, RawCompletionKind, RawDiagnostic, RawLocation, RawQuickInfo,
    RawRelatedInformation, RawRenameResult, RawTextEdit,
};

// The service trait and its capability flags
pub mod service;
pub use service::{TypecheckService, capabilities};
