//! Generator: serializes an [`Interchange`] back to X12 bytes, recomputing
//! every control/segment count rather than trusting the tree's trailer
//! fields.

use crate::delimiters::Delimiters;
use crate::error::GenerationError;
use crate::model::{ElementValue, FunctionalGroup, Interchange, Loop, LoopChild, Location, Segment, TransactionSet};

/// ISA is positional and space-padded; each element has a fixed width
/// regardless of content length. Order matches the field order written by
/// [`write_isa`]: ISA01 Authorization Information Qualifier, ISA02
/// Authorization Information, ISA03 Security Information Qualifier, ISA04
/// Security Information, ISA05 Interchange ID Qualifier (sender), ISA06
/// Interchange Sender ID, ISA07 Interchange ID Qualifier (receiver), ISA08
/// Interchange Receiver ID, ISA09 Date, ISA10 Time, ISA11 Repetition
/// Separator, ISA12 Version, ISA13 Control Number, ISA14 Acknowledgment
/// Requested, ISA15 Usage Indicator, ISA16 Component Element Separator.
/// Widths sum to 86; with 16 element separators and "ISA" the terminator
/// lands at byte offset 105, matching `delimiters::ISA_SEGMENT_TERMINATOR_INDEX`.
const ISA_ELEMENT_WIDTHS: [usize; 16] = [2, 10, 2, 10, 2, 15, 2, 15, 6, 4, 1, 5, 9, 1, 1, 1];

/// Serializes `interchange` using its own delimiters, or `delimiters` if
/// given, or the documented default (`*~:^`) if neither specifies one.
pub fn generate(interchange: &Interchange, delimiters: Option<Delimiters>) -> Result<Vec<u8>, GenerationError> {
    let delimiters = delimiters.unwrap_or(interchange.delimiters);
    check_no_collisions(interchange, delimiters)?;

    let mut out = Vec::new();
    write_isa(&mut out, interchange, delimiters);

    for group in &interchange.functional_groups {
        write_group(&mut out, group, delimiters);
    }

    write_segment(
        &mut out,
        "IEA",
        &[
            interchange.functional_groups.len().to_string(),
            interchange.control_number.clone(),
        ],
        delimiters,
    );

    Ok(out)
}

fn check_no_collisions(interchange: &Interchange, delimiters: Delimiters) -> Result<(), GenerationError> {
    let active = delimiters.active_bytes();
    if active.iter().collect::<std::collections::HashSet<_>>().len() != active.len() {
        return Err(GenerationError::DelimiterCollapse);
    }
    for (group_index, group) in interchange.functional_groups.iter().enumerate() {
        for (transaction_index, txn) in group.transactions.iter().enumerate() {
            check_loop_collisions(
                &txn.root,
                Location::transaction(group_index, transaction_index),
                &active,
            )?;
        }
    }
    Ok(())
}

fn check_loop_collisions(body: &Loop, location: Location, active: &[u8]) -> Result<(), GenerationError> {
    for child in &body.children {
        match child {
            LoopChild::Segment(segment) => check_segment_collisions(segment, location.clone(), active)?,
            LoopChild::Loop(nested) => check_loop_collisions(nested, location.clone(), active)?,
        }
    }
    Ok(())
}

fn check_segment_collisions(segment: &Segment, location: Location, active: &[u8]) -> Result<(), GenerationError> {
    for element in &segment.elements {
        check_value_collisions(&element.value, location.clone().with_element(element.position), active)?;
    }
    Ok(())
}

fn check_value_collisions(value: &ElementValue, location: Location, active: &[u8]) -> Result<(), GenerationError> {
    match value {
        ElementValue::Single(s) => {
            if let Some(&byte) = s.bytes().find(|b| active.contains(b)) {
                return Err(GenerationError::DelimiterCollision(location, byte));
            }
        }
        ElementValue::Composite(parts) => {
            for part in parts {
                if let Some(&byte) = part.bytes().find(|b| active.contains(b)) {
                    return Err(GenerationError::DelimiterCollision(location, byte));
                }
            }
        }
        ElementValue::Repeated(reps) => {
            for rep in reps {
                check_value_collisions(rep, location.clone(), active)?;
            }
        }
    }
    Ok(())
}

fn write_isa(out: &mut Vec<u8>, interchange: &Interchange, delimiters: Delimiters) {
    let fields = [
        interchange.authorization_qualifier.clone(),
        interchange.authorization_information.clone(),
        interchange.security_qualifier.clone(),
        interchange.security_information.clone(),
        interchange.sender_qualifier.clone(),
        interchange.sender_id.clone(),
        interchange.receiver_qualifier.clone(),
        interchange.receiver_id.clone(),
        interchange.date.clone(),
        interchange.time.clone(),
        repetition_code(delimiters),
        interchange.control_version.clone(),
        interchange.control_number.clone(),
        interchange.acknowledgment_requested.clone(),
        interchange.usage_indicator.clone(),
        (delimiters.component as char).to_string(),
    ];

    out.extend_from_slice(b"ISA");
    for (field, width) in fields.iter().zip(ISA_ELEMENT_WIDTHS.iter()) {
        out.push(delimiters.element);
        out.extend_from_slice(pad_fixed_width(field, *width).as_bytes());
    }
    out.push(delimiters.segment);
}

fn repetition_code(delimiters: Delimiters) -> String {
    (delimiters.repetition.unwrap_or(b'^') as char).to_string()
}

fn pad_fixed_width(value: &str, width: usize) -> String {
    if value.len() >= width {
        value[..width].to_string()
    } else {
        format!("{value:<width$}", width = width)
    }
}

fn write_group(out: &mut Vec<u8>, group: &FunctionalGroup, delimiters: Delimiters) {
    write_segment(
        out,
        "GS",
        &[
            group.functional_identifier_code.clone(),
            group.sender_code.clone(),
            group.receiver_code.clone(),
            group.date.clone(),
            group.time.clone(),
            group.control_number.clone(),
            group.responsible_agency_code.clone(),
            group.version.clone(),
        ],
        delimiters,
    );

    for txn in &group.transactions {
        write_transaction(out, txn, delimiters);
    }

    write_segment(
        out,
        "GE",
        &[group.transactions.len().to_string(), group.control_number.clone()],
        delimiters,
    );
}

fn write_transaction(out: &mut Vec<u8>, txn: &TransactionSet, delimiters: Delimiters) {
    let mut st_fields = vec![txn.transaction_type.clone(), txn.control_number.clone()];
    if let Some(convention) = &txn.implementation_convention {
        st_fields.push(convention.clone());
    }
    write_segment(out, "ST", &st_fields, delimiters);

    let mut segment_count = 2; // ST and SE themselves.
    write_loop_body(out, &txn.root, delimiters, &mut segment_count);

    write_segment(
        out,
        "SE",
        &[segment_count.to_string(), txn.control_number.clone()],
        delimiters,
    );
}

fn write_loop_body(out: &mut Vec<u8>, body: &Loop, delimiters: Delimiters, segment_count: &mut usize) {
    for child in &body.children {
        match child {
            LoopChild::Segment(segment) => {
                write_element_segment(out, segment, delimiters);
                *segment_count += 1;
            }
            LoopChild::Loop(nested) => write_loop_body(out, nested, delimiters, segment_count),
        }
    }
}

fn write_segment(out: &mut Vec<u8>, id: &str, fields: &[String], delimiters: Delimiters) {
    out.extend_from_slice(id.as_bytes());
    let trimmed = trim_trailing_empty(fields);
    for field in trimmed {
        out.push(delimiters.element);
        out.extend_from_slice(field.as_bytes());
    }
    out.push(delimiters.segment);
}

fn write_element_segment(out: &mut Vec<u8>, segment: &Segment, delimiters: Delimiters) {
    out.extend_from_slice(segment.id.as_bytes());
    let highest = segment.elements.iter().filter(|e| !e.value.is_empty()).map(|e| e.position).max();
    for position in 1..=highest.unwrap_or(0) {
        out.push(delimiters.element);
        if let Some(element) = segment.elements.iter().find(|e| e.position == position) {
            write_element_value(out, &element.value, delimiters);
        }
    }
    out.push(delimiters.segment);
}

fn write_element_value(out: &mut Vec<u8>, value: &ElementValue, delimiters: Delimiters) {
    match value {
        ElementValue::Single(s) => out.extend_from_slice(s.as_bytes()),
        ElementValue::Composite(parts) => {
            for (i, part) in parts.iter().enumerate() {
                if i > 0 {
                    out.push(delimiters.component);
                }
                out.extend_from_slice(part.as_bytes());
            }
        }
        ElementValue::Repeated(reps) => {
            let rep_byte = delimiters.repetition.unwrap_or(b'^');
            for (i, rep) in reps.iter().enumerate() {
                if i > 0 {
                    out.push(rep_byte);
                }
                write_element_value(out, rep, delimiters);
            }
        }
    }
}

fn trim_trailing_empty(fields: &[String]) -> &[String] {
    let mut end = fields.len();
    while end > 0 && fields[end - 1].is_empty() {
        end -= 1;
    }
    &fields[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Element, SourcePosition};

    fn interchange_with_one_empty_transaction() -> Interchange {
        let st_through_se = Loop::root();
        Interchange {
            sender_qualifier: "01".into(),
            sender_id: "SENDER         ".into(),
            receiver_qualifier: "01".into(),
            receiver_id: "RECEIVER       ".into(),
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
                version: "005010X222A1".into(),
                transactions: vec![TransactionSet {
                    transaction_type: "999".into(),
                    implementation_convention: None,
                    control_number: "0001".into(),
                    set_identifier: "0001".into(),
                    root: st_through_se,
                }],
            }],
        }
    }

    #[test]
    fn generates_isa_ending_with_segment_terminator() {
        let interchange = interchange_with_one_empty_transaction();
        let bytes = generate(&interchange, None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("ISA*"));
        assert!(text.ends_with('~'));
    }

    #[test]
    fn isa_segment_is_106_bytes_with_terminator_at_byte_105() {
        let interchange = interchange_with_one_empty_transaction();
        let bytes = generate(&interchange, None).unwrap();
        assert_eq!(bytes[105], b'~');
        assert_eq!(&bytes[0..3], b"ISA");
    }

    #[test]
    fn generated_isa_round_trips_through_delimiter_detection() {
        let interchange = interchange_with_one_empty_transaction();
        let bytes = generate(&interchange, None).unwrap();
        let delimiters = crate::delimiters::Delimiters::detect(&bytes).unwrap();
        assert_eq!(delimiters.element, b'*');
        assert_eq!(delimiters.segment, b'~');
        assert_eq!(delimiters.component, b':');
    }

    #[test]
    fn recomputes_segment_count_for_empty_transaction() {
        let interchange = interchange_with_one_empty_transaction();
        let bytes = generate(&interchange, None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("SE*2*0001~"));
    }

    #[test]
    fn elides_trailing_empty_elements() {
        let mut interchange = interchange_with_one_empty_transaction();
        let mut root = Loop::root();
        root.push_segment(Segment::new(
            "REF",
            vec![
                Element::new(1, ElementValue::Single("XY".into())),
                Element::new(2, ElementValue::Single("".into())),
            ],
            SourcePosition::default(),
        ));
        interchange.functional_groups[0].transactions[0].root = root;
        let bytes = generate(&interchange, None).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains("REF*XY~"));
    }

    #[test]
    fn rejects_data_that_collides_with_delimiters() {
        let mut interchange = interchange_with_one_empty_transaction();
        let mut root = Loop::root();
        root.push_segment(Segment::new(
            "REF",
            vec![Element::new(1, ElementValue::Single("A*B".into()))],
            SourcePosition::default(),
        ));
        interchange.functional_groups[0].transactions[0].root = root;
        let err = generate(&interchange, None).unwrap_err();
        assert!(matches!(err, GenerationError::DelimiterCollision(_, b'*')));
    }
}
