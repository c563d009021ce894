//! Partner configuration: an opaque, external-collaborator mapping from
//! partner identifier to preferred delimiters and validation strictness.
//! The core consumes a [`PartnerProfile`] read-only; it never persists one
//! (partner-registry persistence is out of scope — see `register_partner`
//! in the external interfaces).

use crate::delimiters::Delimiters;
use crate::profile::ValidationProfile;

/// A single trading partner's preferences, supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerProfile {
    pub partner_id: String,
    pub preferred_delimiters: Option<Delimiters>,
    pub validation_profile: ValidationProfile,
}

impl PartnerProfile {
    pub fn new(partner_id: impl Into<String>) -> Self {
        PartnerProfile {
            partner_id: partner_id.into(),
            preferred_delimiters: None,
            validation_profile: ValidationProfile::default(),
        }
    }

    pub fn preferred_delimiters(mut self, delimiters: Delimiters) -> Self {
        self.preferred_delimiters = Some(delimiters);
        self
    }

    pub fn validation_profile(mut self, profile: ValidationProfile) -> Self {
        self.validation_profile = profile;
        self
    }
}
