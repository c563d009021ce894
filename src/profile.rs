//! Partner-specific strictness, modeled as a profile flag set consumed by
//! the Validator rather than by conditionally-loaded code paths.

/// Controls which validator passes run and how a [`crate::validate::ValidationReport`]
/// is treated at the `validate` boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationProfile {
    /// Runs the semantic/HIPAA pass (NPI, Tax ID, ICD-10, CPT/HCPCS, cross-field
    /// checks) in addition to the structural and element-level passes.
    pub semantic_checks: bool,
    /// When set, a report containing an error-severity finding is treated as
    /// terminal by [`crate::validate_strict`] instead of being returned for
    /// the caller to inspect.
    pub strict: bool,
}

impl Default for ValidationProfile {
    fn default() -> Self {
        ValidationProfile {
            semantic_checks: true,
            strict: false,
        }
    }
}

impl ValidationProfile {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn semantic_checks(mut self, enabled: bool) -> Self {
        self.semantic_checks = enabled;
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }
}
