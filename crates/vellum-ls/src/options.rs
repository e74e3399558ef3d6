//! Host-provided language service options.

use serde::Deserialize;

/// How strictly template expression type mismatches are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypecheckMode {
    /// Expression type mismatches surface as warnings.
    #[default]
    Lenient,
    /// Expression type mismatches keep their error severity.
    Strict,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageServiceOptions {
    #[serde(default)]
    pub typecheck_mode: TypecheckMode,
}

impl LanguageServiceOptions {
    /// Parse options from the JSON blob a host configuration carries.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

#[cfg(test)]
#[path = "tests/options_tests.rs"]
mod options_tests;
