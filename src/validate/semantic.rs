//! Element-level and HIPAA semantic pass: per-element data type, length,
//! code-set and conditional-mandatory (`required_if`) checks, plus the
//! format checks in [`super::primitives`] (NPI, ICD-10, CPT/HCPCS, strict
//! date/time) driven off a schema's [`CodeSet`] references.

use super::primitives;
use super::{Finding, Location};
use crate::error::FindingKind;
use crate::model::{Loop, LoopChild, Segment, TransactionSet};
use crate::schema::{CodeSet, DataType, ElementRule, Schema, SchemaNode, SegmentNode, Usage};

/// Monetary tolerance for claim-total-vs-line-item-sum consistency, per
/// spec.md §4.4's "within a profile's tolerance" cross-field check.
const CLAIM_TOTAL_TOLERANCE: f64 = 0.01;

pub fn check(schema: &Schema, txn: &TransactionSet, location: Location) -> Vec<Finding> {
    let mut findings = check_level(&schema.nodes, &txn.root, location.clone());
    if schema.transaction_id == "837" {
        findings.extend(check_claim_totals(&txn.root, location));
    }
    findings
}

/// Walks every 2300 (Claim) loop and compares CLM02 (claim total charge)
/// against the sum of its nested 2400 (Service Line) SV1 monetary amounts,
/// flagging a mismatch beyond [`CLAIM_TOTAL_TOLERANCE`].
fn check_claim_totals(root: &Loop, location: Location) -> Vec<Finding> {
    let mut findings = Vec::new();
    for child in &root.children {
        if let LoopChild::Loop(inner) = child {
            if inner.id.as_deref() == Some("2300") {
                findings.extend(check_claim_loop(inner, location.clone().with_loop("2300")));
            } else {
                findings.extend(check_claim_totals(inner, location.clone()));
            }
        }
    }
    findings
}

fn check_claim_loop(claim_loop: &Loop, location: Location) -> Vec<Finding> {
    let clm = claim_loop.children.iter().find_map(|c| match c {
        LoopChild::Segment(s) if s.id == "CLM" => Some(s),
        _ => None,
    });
    let Some(clm) = clm else { return Vec::new() };
    let Some(claimed_total) = clm.value(2).and_then(|v| v.parse::<f64>().ok()) else {
        return Vec::new();
    };

    let mut line_total = 0.0;
    let mut any_line = false;
    for child in &claim_loop.children {
        if let LoopChild::Loop(service_line) = child {
            if service_line.id.as_deref() == Some("2400") {
                for segment in &service_line.children {
                    if let LoopChild::Segment(sv1) = segment {
                        if sv1.id == "SV1" {
                            if let Some(amount) = sv1.value(2).and_then(|v| v.parse::<f64>().ok()) {
                                line_total += amount;
                                any_line = true;
                            }
                        }
                    }
                }
            }
        }
    }

    if !any_line || (claimed_total - line_total).abs() <= CLAIM_TOTAL_TOLERANCE {
        return Vec::new();
    }

    vec![Finding::error(
        location,
        FindingKind::SemanticError(format!(
            "CLM02 claim total {claimed_total} does not match the sum of SV1 line charges {line_total} within tolerance {CLAIM_TOTAL_TOLERANCE}"
        )),
    )]
}

fn check_level(nodes: &[SchemaNode], body: &Loop, location: Location) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (ordinal, child) in body.children.iter().enumerate() {
        match child {
            LoopChild::Segment(segment) => {
                if let Some(SchemaNode::Segment(def)) = nodes.iter().find(|n| n.id() == segment.id) {
                    findings.extend(check_segment(def, segment, location.clone().with_segment(ordinal)));
                }
            }
            LoopChild::Loop(actual_loop) => {
                let loop_id = actual_loop.id.as_deref().unwrap_or("");
                if let Some(SchemaNode::Loop(def)) = nodes.iter().find(|n| n.id() == loop_id) {
                    let nested_location = location.clone().with_loop(loop_id);
                    findings.extend(check_level(&def.children, actual_loop, nested_location));
                }
            }
        }
    }

    findings
}

fn check_segment(def: &SegmentNode, segment: &Segment, location: Location) -> Vec<Finding> {
    let mut findings = Vec::new();

    for rule in &def.elements {
        findings.extend(check_element(rule, segment, location.clone()));
    }

    findings
}

fn check_element(rule: &ElementRule, segment: &Segment, location: Location) -> Vec<Finding> {
    let mandatory = match &rule.required_if {
        Some(cond) => segment
            .value(cond.position)
            .map(|v| cond.values.iter().any(|allowed| allowed == v))
            .unwrap_or(false),
        None => rule.usage == Usage::Mandatory,
    };

    let value = segment.element(rule.position).and_then(|e| e.as_str());
    let element_location = location.with_element(rule.position);

    let value = match value {
        Some(v) if !v.is_empty() => v,
        _ => {
            if mandatory {
                return vec![Finding::error(element_location, FindingKind::MissingElement(rule.position))];
            }
            return Vec::new();
        }
    };

    let mut findings = Vec::new();

    if let Some(min_len) = rule.min_length {
        if value.len() < min_len {
            findings.push(Finding::error(
                element_location.clone(),
                FindingKind::InvalidElement {
                    position: rule.position,
                    constraint: format!("min_length({min_len})"),
                    detail: format!("{value:?} has length {}", value.len()),
                },
            ));
        }
    }
    if let Some(max_len) = rule.max_length {
        if value.len() > max_len {
            findings.push(Finding::error(
                element_location.clone(),
                FindingKind::InvalidElement {
                    position: rule.position,
                    constraint: format!("max_length({max_len})"),
                    detail: format!("{value:?} has length {}", value.len()),
                },
            ));
        }
    }

    if !matches_data_type(rule.data_type, value) {
        findings.push(Finding::error(
            element_location.clone(),
            FindingKind::InvalidElement {
                position: rule.position,
                constraint: format!("{:?}", rule.data_type),
                detail: format!("{value:?} is not a valid {:?} value", rule.data_type),
            },
        ));
    }

    let code_set_applies = match &rule.code_set_if {
        Some(cond) => segment
            .value(cond.position)
            .map(|v| cond.values.iter().any(|allowed| allowed == v))
            .unwrap_or(false),
        None => true,
    };

    if code_set_applies {
        if let Some(code_set) = &rule.code_set {
            let member = match code_set {
                CodeSet::Inline(values) => values.iter().any(|allowed| allowed == value),
                CodeSet::Named(name) => primitives::named_code_set_member(name, value),
            };
            if !member {
                let code_set_name = match code_set {
                    CodeSet::Inline(_) => rule.name.to_string(),
                    CodeSet::Named(name) => name.to_string(),
                };
                findings.push(Finding::error(
                    element_location.clone(),
                    FindingKind::CodeSetError {
                        code_set: code_set_name,
                        value: value.to_string(),
                    },
                ));
            }
        }
    }

    if let Some(composite) = &rule.composite_code_set {
        if let Some(components) = segment.element(rule.position).and_then(|e| e.value.components()) {
            let qualifier = components.get(composite.qualifier_component - 1).map(String::as_str);
            let applies = qualifier.map(|q| composite.qualifier_values.iter().any(|allowed| allowed == q)).unwrap_or(false);
            if applies {
                if let Some(component_value) = components.get(composite.value_component - 1) {
                    let member = match &composite.code_set {
                        CodeSet::Inline(values) => values.iter().any(|allowed| allowed == component_value),
                        CodeSet::Named(name) => primitives::named_code_set_member(name, component_value),
                    };
                    if !member {
                        let code_set_name = match &composite.code_set {
                            CodeSet::Inline(_) => rule.name.to_string(),
                            CodeSet::Named(name) => name.to_string(),
                        };
                        findings.push(Finding::error(
                            element_location,
                            FindingKind::CodeSetError {
                                code_set: code_set_name,
                                value: component_value.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }

    findings
}

fn matches_data_type(data_type: DataType, value: &str) -> bool {
    match data_type {
        DataType::AN => true,
        DataType::Id => true,
        DataType::N => {
            let stripped = value.strip_prefix('-').unwrap_or(value);
            !stripped.is_empty() && stripped.bytes().all(|b| b.is_ascii_digit())
        }
        DataType::R => value.parse::<f64>().is_ok(),
        DataType::Date => primitives::is_valid_date_ccyymmdd(value),
        DataType::Time => primitives::is_valid_time(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Element;
    use crate::model::element::ElementValue;
    use crate::schema::ElementBuilder;

    fn seg_with(values: Vec<(usize, &str)>) -> Segment {
        let elements = values
            .into_iter()
            .map(|(pos, v)| Element::new(pos, ElementValue::Single(v.to_string())))
            .collect();
        Segment::new("NM1", elements, Default::default())
    }

    #[test]
    fn missing_mandatory_element_is_an_error() {
        let rule = ElementBuilder::new(1, "Entity Identifier Code", Usage::Mandatory, DataType::Id).build();
        let segment = seg_with(vec![]);
        let findings = check_element(&rule, &segment, Location::interchange());
        assert_eq!(findings.len(), 1);
        assert!(matches!(findings[0].kind, FindingKind::MissingElement(1)));
    }

    #[test]
    fn required_if_promotes_optional_to_mandatory() {
        let rule = ElementBuilder::new(2, "NPI", Usage::Optional, DataType::AN)
            .required_if(1, &["XX"])
            .build();
        let segment = seg_with(vec![(1, "XX")]);
        let findings = check_element(&rule, &segment, Location::interchange());
        assert_eq!(findings.len(), 1);
        assert!(matches!(findings[0].kind, FindingKind::MissingElement(2)));
    }

    #[test]
    fn invalid_npi_reported_as_code_set_error() {
        let rule = ElementBuilder::new(2, "NPI", Usage::Mandatory, DataType::AN)
            .named_code_set("npi")
            .build();
        let segment = seg_with(vec![(2, "1234567890")]);
        let findings = check_element(&rule, &segment, Location::interchange());
        assert!(findings
            .iter()
            .any(|f| matches!(&f.kind, FindingKind::CodeSetError { code_set, .. } if code_set == "npi")));
    }

    #[test]
    fn valid_date_passes() {
        let rule = ElementBuilder::new(3, "Date", Usage::Mandatory, DataType::Date).build();
        let segment = seg_with(vec![(3, "20240229")]);
        assert!(check_element(&rule, &segment, Location::interchange()).is_empty());
    }

    fn clm_loop(claim_total: &str, line_amounts: &[&str]) -> Loop {
        let mut claim = Loop::new("2300");
        claim.push_segment(Segment::from_values("CLM", vec!["CLAIM1", claim_total]));
        for amount in line_amounts {
            let mut service_line = Loop::new("2400");
            service_line.push_segment(Segment::from_values("LX", vec!["1"]));
            service_line.push_segment(Segment::from_values("SV1", vec!["HC:99213", amount]));
            claim.push_loop(service_line);
        }
        claim
    }

    #[test]
    fn matching_claim_total_is_clean() {
        let mut root = Loop::root();
        root.push_loop(clm_loop("150", &["100", "50"]));
        assert!(check_claim_totals(&root, Location::interchange()).is_empty());
    }

    #[test]
    fn mismatched_claim_total_is_flagged() {
        let mut root = Loop::root();
        root.push_loop(clm_loop("999", &["100", "50"]));
        let findings = check_claim_totals(&root, Location::interchange());
        assert_eq!(findings.len(), 1);
        assert!(matches!(&findings[0].kind, FindingKind::SemanticError(msg) if msg.contains("999")));
    }
}
