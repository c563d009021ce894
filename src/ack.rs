//! Acknowledgment Synthesizer: derives 997 (Functional Acknowledgment) and
//! 999 (Implementation Acknowledgment, 005010X231) response Interchanges
//! from an input Interchange plus its ValidationReport.

use crate::error::FindingKind;
use crate::model::{FunctionalGroup, Interchange, Loop, Segment, TransactionSet};
use crate::validate::{Finding, ValidationReport};

fn seg(id: &str, values: Vec<&str>) -> Segment {
    Segment::from_values(id, values.into_iter().map(str::to_string).collect())
}

/// `A` accepted, `E` accepted with errors, `R` rejected, per spec.md §4.5's
/// policy: a structural/schema-cardinality violation always rejects; any
/// other finding downgrades to accepted-with-errors unless `strict`
/// escalates it to a rejection.
fn transaction_code(findings: &[&Finding], strict: bool) -> &'static str {
    if findings.iter().any(|f| matches!(f.kind, FindingKind::Schema(_))) {
        return "R";
    }
    if findings.is_empty() {
        "A"
    } else if strict {
        "R"
    } else {
        "E"
    }
}

fn group_code(codes: &[&str]) -> &'static str {
    if codes.iter().all(|c| *c == "A") {
        "A"
    } else if codes.iter().any(|c| *c == "R") {
        "R"
    } else {
        "E"
    }
}

/// One `(AK3|IK3, Option<AK4|IK4>)` pair per finding that reaches
/// segment/element granularity; findings anchored above segment level
/// (e.g. a missing loop) don't produce a detail record.
fn detail_pairs(findings: &[&Finding], extended: bool) -> Vec<(Segment, Option<Segment>)> {
    let segment_level_id = if extended { "IK3" } else { "AK3" };
    let element_level_id = if extended { "IK4" } else { "AK4" };
    findings
        .iter()
        .filter_map(|f| {
            let ordinal = f.location.segment_ordinal?;
            let detail = seg(segment_level_id, vec![&ordinal.to_string()]);
            let element_detail = f
                .location
                .element_position
                .map(|position| seg(element_level_id, vec![&position.to_string()]));
            Some((detail, element_detail))
        })
        .collect()
}

fn build_ak2_loop(txn: &TransactionSet, findings: &[&Finding], code: &str, extended: bool) -> Loop {
    let mut ak2_loop = Loop::new("AK2");
    ak2_loop.push_segment(seg("AK2", vec![&txn.transaction_type, &txn.control_number]));

    let pairs = detail_pairs(findings, extended);
    if extended {
        for (detail, element_detail) in pairs {
            let mut ik3_loop = Loop::new("IK3");
            ik3_loop.push_segment(detail);
            if let Some(element_detail) = element_detail {
                ik3_loop.push_segment(element_detail);
            }
            ak2_loop.push_loop(ik3_loop);
        }
        ak2_loop.push_segment(seg("IK5", vec![code]));
    } else {
        for (detail, element_detail) in pairs {
            ak2_loop.push_segment(detail);
            if let Some(element_detail) = element_detail {
                ak2_loop.push_segment(element_detail);
            }
        }
        ak2_loop.push_segment(seg("AK5", vec![code]));
    }
    ak2_loop
}

fn synthesize(interchange: &Interchange, report: &ValidationReport, transaction_type: &str, extended: bool) -> Interchange {
    let mut functional_groups = Vec::new();

    for (group_index, group) in interchange.functional_groups.iter().enumerate() {
        let mut root = Loop::root();
        root.push_segment(seg("AK1", vec![&group.functional_identifier_code, &group.control_number]));

        let mut group_codes = Vec::new();
        for (transaction_index, txn) in group.transactions.iter().enumerate() {
            let findings = report.for_transaction(group_index, transaction_index);
            let code = transaction_code(&findings, false);
            group_codes.push(code);
            root.push_loop(build_ak2_loop(txn, &findings, code, extended));
        }

        let overall = group_code(&group_codes);
        let accepted = group_codes.iter().filter(|c| **c != "R").count();
        root.push_segment(seg(
            "AK9",
            vec![
                overall,
                &group.transactions.len().to_string(),
                &group.transactions.len().to_string(),
                &accepted.to_string(),
            ],
        ));

        functional_groups.push(FunctionalGroup {
            functional_identifier_code: "FA".to_string(),
            sender_code: group.receiver_code.clone(),
            receiver_code: group.sender_code.clone(),
            date: group.date.clone(),
            time: group.time.clone(),
            control_number: group.control_number.clone(),
            responsible_agency_code: group.responsible_agency_code.clone(),
            version: group.version.clone(),
            transactions: vec![TransactionSet {
                transaction_type: transaction_type.to_string(),
                implementation_convention: if extended {
                    Some("005010X231".to_string())
                } else {
                    None
                },
                control_number: group.control_number.clone(),
                set_identifier: group.control_number.clone(),
                root,
            }],
        });
    }

    Interchange {
        sender_qualifier: interchange.receiver_qualifier.clone(),
        sender_id: interchange.receiver_id.clone(),
        receiver_qualifier: interchange.sender_qualifier.clone(),
        receiver_id: interchange.sender_id.clone(),
        authorization_qualifier: interchange.authorization_qualifier.clone(),
        authorization_information: interchange.authorization_information.clone(),
        security_qualifier: interchange.security_qualifier.clone(),
        security_information: interchange.security_information.clone(),
        date: interchange.date.clone(),
        time: interchange.time.clone(),
        control_version: interchange.control_version.clone(),
        control_number: interchange.control_number.clone(),
        acknowledgment_requested: "0".to_string(),
        usage_indicator: interchange.usage_indicator.clone(),
        delimiters: interchange.delimiters,
        functional_groups,
    }
}

/// Synthesizes a 997 Functional Acknowledgment for `interchange` from
/// `report`.
pub fn ack997(interchange: &Interchange, report: &ValidationReport) -> Interchange {
    synthesize(interchange, report, "997", false)
}

/// Synthesizes a 999 Implementation Acknowledgment (005010X231) for
/// `interchange` from `report`.
pub fn ack999(interchange: &Interchange, report: &ValidationReport) -> Interchange {
    synthesize(interchange, report, "999", true)
}
