//! End-to-end pipeline tests covering the concrete scenarios the public API
//! is meant to handle: parse, control-number mismatch, semantic/HIPAA
//! failures, non-default delimiters, loop nesting, and generate round-trips.

use edi_x12::{ack997, generate, parse, validate, FindingKind, LoopChild, ParseError, StructureError};

const DEFAULT_ISA: &str = "ISA*00*          *00*          *01*SENDERID       *01*RECEIVERID     *230101*1253*^*00501*000000001*0*T*:~";

fn minimal_270() -> String {
    format!(
        "{DEFAULT_ISA}GS*HS*SENDERID*RECEIVERID*20230101*1253*1*X*005010X279A1~\
         ST*270*0001*005010X279A1~BHT*0019*13~SE*3*0001~GE*1*1~IEA*1*000000001~"
    )
}

fn claim_837p(npi: &str) -> String {
    format!(
        "{DEFAULT_ISA}GS*HC*SENDERID*RECEIVERID*20230101*1253*1*X*005010X222A1~\
         ST*837*0001*005010X222A1~\
         BHT*0019*00~\
         NM1*41*2~\
         PER*IC~\
         NM1*40*2~\
         HL*1**20~\
         NM1*85*2*LASTNAME*FIRSTNAME****XX*{npi}~\
         HL*2*1*22~\
         SBR*P~\
         NM1*IL*1~\
         CLM*CLAIM1*150~\
         HI*ABK:A100~\
         LX*1~\
         SV1*HC:99213*100~\
         LX*2~\
         SV1*HC:99214*50~\
         SE*17*0001~\
         GE*1*1~IEA*1*000000001~"
    )
}

#[test]
fn minimal_270_parses_clean_and_acknowledges_accepted() {
    let interchange = parse(minimal_270().as_bytes()).expect("well-formed 270 should parse");
    assert_eq!(interchange.functional_groups.len(), 1);
    assert_eq!(interchange.functional_groups[0].transactions.len(), 1);

    let report = validate(&interchange, None);
    assert!(!report.has_errors(), "unexpected findings: {:?}", report.findings);

    let ack = ack997(&interchange, &report);
    let ak9 = ack.functional_groups[0].transactions[0]
        .root
        .children
        .iter()
        .find_map(|c| match c {
            LoopChild::Segment(s) if s.id == "AK9" => Some(s),
            _ => None,
        })
        .expect("997 should carry an AK9");
    assert_eq!(ak9.value(1), Some("A"));

    let ak2 = ack.functional_groups[0].transactions[0]
        .root
        .children
        .iter()
        .find_map(|c| match c {
            LoopChild::Loop(l) if l.id.as_deref() == Some("AK2") => Some(l),
            _ => None,
        })
        .expect("997 should carry an AK2 loop");
    let ak2_seg = ak2
        .children
        .iter()
        .find_map(|c| match c {
            LoopChild::Segment(s) if s.id == "AK2" => Some(s),
            _ => None,
        })
        .unwrap();
    assert_eq!(ak2_seg.value(2), Some("0001"), "AK2 should echo ST02");
}

#[test]
fn control_number_mismatch_is_terminal_and_builds_no_tree() {
    let mismatched = format!(
        "{DEFAULT_ISA}GS*HS*SENDERID*RECEIVERID*20230101*1253*1*X*005010X279A1~\
         ST*270*0001*005010X279A1~BHT*0019*13~SE*3*0001~GE*1*1~IEA*1*000000002~"
    );
    let err = parse(mismatched.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        ParseError::Structure(StructureError::InterchangeControlMismatch { .. })
    ));
}

#[test]
fn invalid_npi_is_reported_as_code_set_finding() {
    let interchange = parse(claim_837p("1234567890").as_bytes()).expect("structurally valid 837P should still parse");
    let report = validate(&interchange, None);
    assert!(report
        .findings
        .iter()
        .any(|f| matches!(&f.kind, FindingKind::CodeSetError { code_set, value } if code_set == "npi" && value == "1234567890")));
}

#[test]
fn valid_npi_has_no_code_set_finding() {
    let interchange = parse(claim_837p("1234567893").as_bytes()).expect("valid claim should parse");
    let report = validate(&interchange, None);
    assert!(!report.findings.iter().any(|f| matches!(&f.kind, FindingKind::CodeSetError { code_set, .. } if code_set == "npi")));
}

#[test]
fn malformed_diagnosis_code_is_reported_as_code_set_finding() {
    let bad = claim_837p("1234567893").replace("HI*ABK:A100~", "HI*ABK:ZZZZZ~");
    let interchange = parse(bad.as_bytes()).expect("structurally valid 837P should still parse");
    let report = validate(&interchange, None);
    assert!(report
        .findings
        .iter()
        .any(|f| matches!(&f.kind, FindingKind::CodeSetError { code_set, value } if code_set == "icd10cm" && value == "ZZZZZ")));
}

#[test]
fn malformed_procedure_code_is_reported_as_code_set_finding() {
    let bad = claim_837p("1234567893").replace("SV1*HC:99213*100~", "SV1*HC:ABCDE*100~");
    let interchange = parse(bad.as_bytes()).expect("structurally valid 837P should still parse");
    let report = validate(&interchange, None);
    assert!(report
        .findings
        .iter()
        .any(|f| matches!(&f.kind, FindingKind::CodeSetError { code_set, value } if code_set == "procedure_code" && value == "ABCDE")));
}

#[test]
fn tax_id_qualifier_gates_the_ein_check() {
    let with_bad_ein = claim_837p("1234567893").replace(
        "NM1*85*2*LASTNAME*FIRSTNAME****XX*1234567893~",
        "NM1*85*2*LASTNAME*FIRSTNAME****XX*1234567893~REF*EI*NOTANEIN~",
    );
    let interchange = parse(with_bad_ein.as_bytes()).expect("structurally valid 837P should still parse");
    let report = validate(&interchange, None);
    assert!(report
        .findings
        .iter()
        .any(|f| matches!(&f.kind, FindingKind::CodeSetError { code_set, value } if code_set == "ein" && value == "NOTANEIN")));

    let with_unrelated_qualifier = claim_837p("1234567893").replace(
        "NM1*85*2*LASTNAME*FIRSTNAME****XX*1234567893~",
        "NM1*85*2*LASTNAME*FIRSTNAME****XX*1234567893~REF*G2*NOTANEIN~",
    );
    let interchange = parse(with_unrelated_qualifier.as_bytes()).expect("structurally valid 837P should still parse");
    let report = validate(&interchange, None);
    assert!(!report.findings.iter().any(|f| matches!(&f.kind, FindingKind::CodeSetError { code_set, .. } if code_set == "ein")));
}

#[test]
fn detects_nonstandard_delimiters_and_parses_body() {
    let isa = "ISA|00|          |00|          |01|SENDERID       |01|RECEIVERID     |230101|1253|^|00501|000000001|0|T|:\n";
    let input = format!(
        "{isa}GS|PO|SENDERID|RECEIVERID|20230101|1253|1|X|005010\n\
         ST|850|0001\nBEG|00|SA|PO-001||20230101\nSE|3|0001\n\
         GE|1|1\nIEA|1|000000001\n"
    );
    let interchange = parse(input.as_bytes()).expect("non-default delimiters should autodetect");
    assert_eq!(interchange.delimiters.element, b'|');
    assert_eq!(interchange.delimiters.segment, b'\n');

    let txn = &interchange.functional_groups[0].transactions[0];
    assert_eq!(txn.transaction_type, "850");
    let has_beg = txn.root.segments().iter().any(|s| s.id == "BEG");
    assert!(has_beg);
}

#[test]
fn claim_loop_2300_nests_service_line_loops_2400() {
    let interchange = parse(claim_837p("1234567893").as_bytes()).expect("valid claim should parse");
    let txn = &interchange.functional_groups[0].transactions[0];

    let loop_2000b = txn
        .root
        .children
        .iter()
        .find_map(|c| match c {
            LoopChild::Loop(l) if l.id.as_deref() == Some("2000B") => Some(l),
            _ => None,
        })
        .expect("2000B should be present");
    let loop_2300 = loop_2000b
        .children
        .iter()
        .find_map(|c| match c {
            LoopChild::Loop(l) if l.id.as_deref() == Some("2300") => Some(l),
            _ => None,
        })
        .expect("2300 should nest inside 2000B");

    let service_lines: Vec<_> = loop_2300
        .children
        .iter()
        .filter_map(|c| match c {
            LoopChild::Loop(l) if l.id.as_deref() == Some("2400") => Some(l),
            _ => None,
        })
        .collect();
    assert_eq!(service_lines.len(), 2, "expected two nested 2400 service line loops");

    for service_line in &service_lines {
        assert!(service_line.children.iter().any(|c| matches!(c, LoopChild::Segment(s) if s.id == "LX")));
        assert!(service_line.children.iter().any(|c| matches!(c, LoopChild::Segment(s) if s.id == "SV1")));
    }
}

#[test]
fn mismatched_claim_total_is_flagged_at_the_integration_level() {
    let bad_total = claim_837p("1234567893").replace("CLM*CLAIM1*150~", "CLM*CLAIM1*999~");
    let interchange = parse(bad_total.as_bytes()).expect("structurally valid claim should still parse");
    let report = validate(&interchange, None);
    assert!(report
        .findings
        .iter()
        .any(|f| matches!(&f.kind, FindingKind::SemanticError(msg) if msg.contains("999"))));
}

#[test]
fn parse_generate_parse_round_trip_preserves_the_tree() {
    let original = parse(claim_837p("1234567893").as_bytes()).expect("valid claim should parse");
    let bytes = generate(&original, None).expect("a validly-built tree should always regenerate");
    let reparsed = parse(&bytes).expect("generated bytes should themselves parse");

    assert_eq!(original.functional_groups.len(), reparsed.functional_groups.len());
    assert_eq!(
        original.functional_groups[0].transactions[0].root,
        reparsed.functional_groups[0].transactions[0].root
    );
    assert_eq!(original.control_number, reparsed.control_number);
    assert_eq!(
        original.functional_groups[0].transactions[0].control_number,
        reparsed.functional_groups[0].transactions[0].control_number
    );
}

#[test]
fn gs08_st03_disagreement_warns_without_aborting_the_pipeline() {
    let body = format!(
        "{DEFAULT_ISA}GS*HS*SENDERID*RECEIVERID*20230101*1253*1*X*005010X279A1~\
         ST*270*0001*005010X999ZZ~BHT*0019*13~SE*3*0001~GE*1*1~IEA*1*000000001~"
    );
    let interchange = parse(body.as_bytes()).expect("GS08/ST03 disagreement must not be parse-terminal");
    let report = validate(&interchange, None);
    assert!(!report.has_errors());
    assert!(report
        .findings
        .iter()
        .any(|f| matches!(&f.kind, FindingKind::Structure(StructureError::ImplementationReferenceDisagreement { .. }))));
}
