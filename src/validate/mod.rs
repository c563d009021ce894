//! Validator: three independent passes over a parsed [`Interchange`] that
//! each append to one [`ValidationReport`] instead of aborting on the first
//! finding. Envelope-level invariants are enforced earlier, by the Builder,
//! and are not repeated here.

pub mod primitives;
pub mod semantic;
pub mod structural;

use crate::error::{FindingKind, StructureError};
use crate::model::{Interchange, Location};
use crate::profile::ValidationProfile;
use crate::schema::SchemaRegistry;

/// How strongly a [`Finding`] should be treated by a caller deciding whether
/// to accept, reject, or flag a transaction for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finding {
    pub severity: Severity,
    pub location: Location,
    pub kind: FindingKind,
}

impl Finding {
    pub fn error(location: Location, kind: impl Into<FindingKind>) -> Self {
        Finding {
            severity: Severity::Error,
            location,
            kind: kind.into(),
        }
    }

    pub fn warning(location: Location, kind: impl Into<FindingKind>) -> Self {
        Finding {
            severity: Severity::Warning,
            location,
            kind: kind.into(),
        }
    }
}

/// The accumulated result of validating one [`Interchange`]: every finding
/// from every transaction, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub findings: Vec<Finding>,
}

impl ValidationReport {
    pub fn is_clean(&self) -> bool {
        self.findings.iter().all(|f| f.severity == Severity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.findings.iter().any(|f| f.severity == Severity::Error)
    }

    pub fn for_transaction(&self, group_index: usize, transaction_index: usize) -> Vec<&Finding> {
        self.findings
            .iter()
            .filter(|f| {
                f.location.group_index == Some(group_index)
                    && f.location.transaction_index == Some(transaction_index)
            })
            .collect()
    }

    fn extend(&mut self, findings: Vec<Finding>) {
        self.findings.extend(findings);
    }
}

/// Runs the structural, element-level and semantic passes over every
/// transaction in `interchange`, resolving each transaction's schema from
/// `registry`. The semantic pass is skipped when `profile` disables it.
pub fn validate(
    interchange: &Interchange,
    registry: &SchemaRegistry,
    profile: Option<&ValidationProfile>,
) -> ValidationReport {
    let mut report = ValidationReport::default();
    let semantic_checks = profile.map(|p| p.semantic_checks).unwrap_or(true);

    for (group_index, group) in interchange.functional_groups.iter().enumerate() {
        for (transaction_index, txn) in group.transactions.iter().enumerate() {
            let schema = registry.lookup(&txn.transaction_type, txn.implementation_convention.as_deref());
            let base = Location::transaction(group_index, transaction_index);

            if let Some(st03) = &txn.implementation_convention {
                if !st03.is_empty() && &group.version != st03 {
                    report.findings.push(Finding::warning(
                        base.clone(),
                        FindingKind::Structure(StructureError::ImplementationReferenceDisagreement {
                            gs08: group.version.clone(),
                            st03: st03.clone(),
                        }),
                    ));
                }
            }

            if schema.flat {
                continue;
            }

            report.extend(structural::check(&schema, txn, base.clone()));
            if semantic_checks {
                report.extend(semantic::check(&schema, txn, base));
            }
        }
    }

    report
}

/// As [`validate`], but when `profile.strict` is set, a report containing
/// any error-severity finding is returned as `Err` instead of `Ok` — the
/// terminal behavior spec.md §7 describes for strict mode at the validate
/// boundary.
pub fn validate_strict(
    interchange: &Interchange,
    registry: &SchemaRegistry,
    profile: &ValidationProfile,
) -> Result<ValidationReport, ValidationReport> {
    let report = validate(interchange, registry, Some(profile));
    if profile.strict && report.has_errors() {
        Err(report)
    } else {
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delimiters::Delimiters;
    use crate::model::{FunctionalGroup, Loop, Segment, TransactionSet};

    fn interchange_with(version: &str, implementation_convention: Option<&str>, root: Loop) -> Interchange {
        Interchange {
            sender_qualifier: "01".into(),
            sender_id: "SENDER".into(),
            receiver_qualifier: "01".into(),
            receiver_id: "RECEIVER".into(),
            authorization_qualifier: "00".into(),
            authorization_information: "".into(),
            security_qualifier: "00".into(),
            security_information: "".into(),
            date: "230101".into(),
            time: "1253".into(),
            control_version: "00501".into(),
            control_number: "000000001".into(),
            acknowledgment_requested: "0".into(),
            usage_indicator: "T".into(),
            delimiters: Delimiters::default(),
            functional_groups: vec![FunctionalGroup {
                functional_identifier_code: "HC".into(),
                sender_code: "SENDER".into(),
                receiver_code: "RECEIVER".into(),
                date: "230101".into(),
                time: "1253".into(),
                control_number: "1".into(),
                responsible_agency_code: "X".into(),
                version: version.into(),
                transactions: vec![TransactionSet {
                    transaction_type: "837".into(),
                    implementation_convention: implementation_convention.map(String::from),
                    control_number: "0001".into(),
                    set_identifier: "0001".into(),
                    root,
                }],
            }],
        }
    }

    #[test]
    fn gs08_st03_disagreement_is_a_warning_not_terminal() {
        let registry = SchemaRegistry::new();
        let interchange = interchange_with("005010X222A1", Some("005010X999ZZ"), Loop::root());
        let report = validate(&interchange, &registry, None);
        assert!(!report.has_errors());
        assert!(report
            .findings
            .iter()
            .any(|f| matches!(f.kind, FindingKind::Structure(StructureError::ImplementationReferenceDisagreement { .. }))
                && f.severity == Severity::Warning));
    }

    #[test]
    fn matching_gs08_st03_is_silent() {
        let registry = SchemaRegistry::new();
        let mut root = Loop::root();
        root.push_segment(Segment::from_values("BHT", vec!["0019", "00"]));
        let interchange = interchange_with("005010X222A1", Some("005010X222A1"), root);
        let report = validate(&interchange, &registry, None);
        assert!(!report
            .findings
            .iter()
            .any(|f| matches!(f.kind, FindingKind::Structure(StructureError::ImplementationReferenceDisagreement { .. }))));
    }
}
