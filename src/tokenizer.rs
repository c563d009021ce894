//! Tokenizer: splits a byte stream into a lazy, finite sequence of raw
//! segments, given an already-detected [`Delimiters`] set.

use crate::delimiters::Delimiters;
use crate::error::TokenError;
use crate::model::{Element, ElementValue, SourcePosition};

/// A segment as produced by the Tokenizer, before the Builder assigns it to
/// a place in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawSegment {
    pub id: String,
    pub elements: Vec<Element>,
    pub position: SourcePosition,
}

fn is_line_wrap_whitespace(b: u8) -> bool {
    matches!(b, b'\r' | b'\n' | b'\t' | b' ')
}

/// Lazily yields [`RawSegment`]s from a byte buffer. Non-restartable: once
/// exhausted (or abandoned) the source position cannot be rewound.
pub struct Tokenizer<'a> {
    bytes: &'a [u8],
    cursor: usize,
    delimiters: Delimiters,
    ordinal: usize,
}

impl<'a> Tokenizer<'a> {
    pub fn new(bytes: &'a [u8], delimiters: Delimiters) -> Self {
        Tokenizer {
            bytes,
            cursor: 0,
            delimiters,
            ordinal: 0,
        }
    }

    fn split_repetitions(&self, field: &str) -> Vec<String> {
        match self.delimiters.repetition {
            Some(rep) => field
                .split(rep as char)
                .map(|s| s.to_string())
                .collect(),
            None => vec![field.to_string()],
        }
    }

    fn split_components(&self, field: &str) -> Vec<String> {
        field
            .split(self.delimiters.component as char)
            .map(|s| s.to_string())
            .collect()
    }

    fn parse_element_value(&self, field: &str) -> ElementValue {
        let repetitions = self.split_repetitions(field);
        if repetitions.len() > 1 {
            let reps = repetitions
                .iter()
                .map(|rep| self.value_without_repetition(rep))
                .collect();
            return ElementValue::Repeated(reps);
        }
        self.value_without_repetition(field)
    }

    fn value_without_repetition(&self, field: &str) -> ElementValue {
        let components = self.split_components(field);
        if components.len() > 1 {
            ElementValue::Composite(components)
        } else {
            ElementValue::Single(field.to_string())
        }
    }

    fn next_raw(&mut self) -> Option<Result<RawSegment, TokenError>> {
        // Skip line-wrap whitespace left after the previous terminator.
        while self.cursor < self.bytes.len() && is_line_wrap_whitespace(self.bytes[self.cursor]) {
            self.cursor += 1;
        }
        if self.cursor >= self.bytes.len() {
            return None;
        }

        let start = self.cursor;
        let terminator_pos = self.bytes[self.cursor..]
            .iter()
            .position(|&b| b == self.delimiters.segment)
            .map(|rel| self.cursor + rel);

        let end = terminator_pos.unwrap_or(self.bytes.len());
        let raw = &self.bytes[start..end];
        self.cursor = terminator_pos.map(|p| p + 1).unwrap_or(self.bytes.len());

        // The grammar forbids component/repetition separators inside a
        // segment id; they're legal everywhere else in the segment body.
        let text = String::from_utf8_lossy(raw).into_owned();
        let mut fields = text.split(self.delimiters.element as char);
        let id_field = fields.next().unwrap_or("").trim().to_string();

        if id_field.is_empty() {
            // Tolerates trailing terminators / blank lines.
            return self.next_raw();
        }

        if id_field
            .bytes()
            .any(|b| b == self.delimiters.component || b == self.delimiters.segment)
        {
            return Some(Err(TokenError::InvalidSegmentId {
                offset: start,
                fragment: id_field,
            }));
        }

        let elements: Vec<Element> = fields
            .enumerate()
            .map(|(idx, field)| Element::new(idx + 1, self.parse_element_value(field)))
            .collect();

        let ordinal = self.ordinal;
        self.ordinal += 1;

        Some(Ok(RawSegment {
            id: id_field,
            elements,
            position: SourcePosition {
                byte_offset: start,
                ordinal,
            },
        }))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<RawSegment, TokenError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_raw()
    }
}

impl<'a> Tokenizer<'a> {
    /// Bytes already consumed from the slice this tokenizer was built over.
    /// Lets a caller that re-tokenizes a growing buffer chunk by chunk
    /// (see [`crate::stream`]) advance its own cursor by exactly as much as
    /// one `next()` call consumed.
    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delims() -> Delimiters {
        Delimiters {
            element: b'*',
            segment: b'~',
            component: b':',
            repetition: Some(b'^'),
        }
    }

    #[test]
    fn splits_segments_and_elements() {
        let input = b"ISA*00*A~GS*PO*B~";
        let tok = Tokenizer::new(input, delims());
        let segs: Vec<_> = tok.map(|r| r.unwrap()).collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[0].id, "ISA");
        assert_eq!(segs[0].elements[0].as_str(), Some("00"));
        assert_eq!(segs[1].id, "GS");
    }

    #[test]
    fn preserves_empty_elements() {
        let input = b"BEG**SA*PO-1~";
        let tok = Tokenizer::new(input, delims());
        let seg = tok.map(|r| r.unwrap()).next().unwrap();
        assert_eq!(seg.elements[0].as_str(), Some(""));
        assert_eq!(seg.elements[1].as_str(), Some("SA"));
    }

    #[test]
    fn splits_composite_elements() {
        let input = b"HI*ABK:A100~";
        let tok = Tokenizer::new(input, delims());
        let seg = tok.map(|r| r.unwrap()).next().unwrap();
        match &seg.elements[0].value {
            ElementValue::Composite(parts) => assert_eq!(parts, &vec!["ABK".to_string(), "A100".to_string()]),
            other => panic!("expected composite, got {other:?}"),
        }
    }

    #[test]
    fn splits_repetitions_before_components() {
        let input = b"REF*XY^ZZ:QQ~";
        let tok = Tokenizer::new(input, delims());
        let seg = tok.map(|r| r.unwrap()).next().unwrap();
        match &seg.elements[0].value {
            ElementValue::Repeated(reps) => {
                assert_eq!(reps.len(), 2);
                assert_eq!(reps[0], ElementValue::Single("XY".to_string()));
                assert_eq!(reps[1], ElementValue::Composite(vec!["ZZ".to_string(), "QQ".to_string()]));
            }
            other => panic!("expected repeated, got {other:?}"),
        }
    }

    #[test]
    fn skips_line_wrap_whitespace() {
        let input = b"ISA*00*A~\r\nGS*PO*B~\n";
        let tok = Tokenizer::new(input, delims());
        let segs: Vec<_> = tok.map(|r| r.unwrap()).collect();
        assert_eq!(segs.len(), 2);
        assert_eq!(segs[1].id, "GS");
    }

    #[test]
    fn drops_empty_trailing_segment() {
        let input = b"ISA*00*A~~";
        let tok = Tokenizer::new(input, delims());
        let segs: Vec<_> = tok.map(|r| r.unwrap()).collect();
        assert_eq!(segs.len(), 1);
    }

    #[test]
    fn rejects_delimiter_in_segment_id() {
        let input = b"IS:A*00*A~";
        let tok = Tokenizer::new(input, delims());
        let first = tok.into_iter().next().unwrap();
        assert!(matches!(first, Err(TokenError::InvalidSegmentId { .. })));
    }
}
