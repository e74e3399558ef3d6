//! The service trait and its capability flags.

use vellum_common::DocumentSnapshot;

use crate::protocol::{
    RawCodeAction, RawCompletion, RawDiagnostic, RawLocation, RawQuickInfo, RawRenameResult,
};

/// Capability flags advertised by a service implementation. Diagnostics
/// are mandatory and have no flag.
pub mod capabilities {
    pub const NONE: u32 = 0;
    pub const QUICK_INFO: u32 = 1 << 0;
    pub const DEFINITION: u32 = 1 << 1;
    pub const REFERENCES: u32 = 1 << 2;
    pub const COMPLETIONS: u32 = 1 << 3;
    pub const RENAME: u32 = 1 << 4;
    pub const CODE_ACTIONS: u32 = 1 << 5;

    pub const ALL: u32 =
        QUICK_INFO | DEFINITION | REFERENCES | COMPLETIONS | RENAME | CODE_ACTIONS;
}

/// An external type-checking service over overlay snapshots.
///
/// Synchronous from the core's perspective; an asynchronous host wraps
/// the boundary and hands in completed results. Every method but
/// `diagnostics` has a default no-contribution implementation, so a host
/// that only checks types still works. Callers must test the matching
/// capability bit before relying on any optional method.
pub trait TypecheckService {
    /// The capability bits this implementation actually serves.
    fn capabilities(&self) -> u32 {
        capabilities::NONE
    }

    /// Whether every bit in `mask` is served.
    fn supports(&self, mask: u32) -> bool {
        self.capabilities() & mask == mask
    }

    /// Check the overlay. The one mandatory method.
    fn diagnostics(&self, overlay: &DocumentSnapshot) -> Vec<RawDiagnostic>;

    fn quick_info(&self, _overlay: &DocumentSnapshot, _offset: u32) -> Option<RawQuickInfo> {
        None
    }

    fn definition(&self, _overlay: &DocumentSnapshot, _offset: u32) -> Vec<RawLocation> {
        Vec::new()
    }

    fn references(&self, _overlay: &DocumentSnapshot, _offset: u32) -> Vec<RawLocation> {
        Vec::new()
    }

    fn completions(&self, _overlay: &DocumentSnapshot, _offset: u32) -> Vec<RawCompletion> {
        Vec::new()
    }

    fn rename_edits(
        &self,
        _overlay: &DocumentSnapshot,
        _offset: u32,
        _new_name: &str,
    ) -> Option<RawRenameResult> {
        None
    }

    fn code_actions(&self, _overlay: &DocumentSnapshot, _start: u32, _end: u32) -> Vec<RawCodeAction> {
        Vec::new()
    }
}
