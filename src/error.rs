use thiserror::Error;

use crate::model::Location;

/// Failure to discover or validate the active delimiter set from the ISA segment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DelimiterError {
    #[error("input has only {0} bytes; at least 106 are required to read ISA")]
    TooShort(usize),
    #[error("input does not begin with an ISA segment")]
    MissingIsa,
    #[error("delimiters are not pairwise distinct: {0:?}")]
    NotDistinct(crate::delimiters::Delimiters),
}

/// A grammar violation below the segment level.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("segment id at byte offset {offset} is empty or malformed: {fragment:?}")]
    InvalidSegmentId { offset: usize, fragment: String },
    #[error("delimiter byte 0x{0:02x} appeared where the grammar forbids it")]
    MisplacedDelimiter(u8),
}

/// Envelope framing broken beyond what the Builder can recover from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("document does not start with ISA")]
    MissingIsa,
    #[error("document does not end with IEA")]
    MissingIea,
    #[error("GS at position {0} has no matching GE")]
    UnmatchedGs(usize),
    #[error("GE at position {0} has no matching GS")]
    UnmatchedGe(usize),
    #[error("ST at position {0} has no matching SE")]
    UnmatchedSt(usize),
    #[error("SE at position {0} has no matching ST")]
    UnmatchedSe(usize),
    #[error("ISA13 ({isa13}) does not equal IEA02 ({iea02})")]
    InterchangeControlMismatch { isa13: String, iea02: String },
    #[error("GS06 ({gs06}) does not equal GE02 ({ge02})")]
    GroupControlMismatch { gs06: String, ge02: String },
    #[error("ST02 ({st02}) does not equal SE02 ({se02})")]
    TransactionControlMismatch { st02: String, se02: String },
    #[error("IEA01 ({claimed}) does not equal the number of functional groups ({actual})")]
    GroupCountMismatch { claimed: usize, actual: usize },
    #[error("GE01 ({claimed}) does not equal the number of transaction sets ({actual})")]
    TransactionCountMismatch { claimed: usize, actual: usize },
    #[error("SE01 ({claimed}) does not equal the segment count from ST through SE ({actual})")]
    SegmentCountMismatch { claimed: usize, actual: usize },
    #[error("GS08 ({gs08}) disagrees with ST03 ({st03}); ST03 takes precedence")]
    ImplementationReferenceDisagreement { gs08: String, st03: String },
    #[error("{} envelope-level violation(s) found", .0.len())]
    Multiple(Vec<StructureError>),
}

/// Segment ordering or cardinality violation against a known schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("segment {segment_id} at ordinal {ordinal} is out of schema order")]
    OutOfOrder { segment_id: String, ordinal: usize },
    #[error("required loop {loop_id} did not meet its minimum occurrence of {min}")]
    LoopBelowMinimum { loop_id: String, min: u32 },
    #[error("required segment {segment_id} did not meet its minimum occurrence of {min}")]
    SegmentBelowMinimum { segment_id: String, min: u32 },
    #[error("segment {segment_id} occurs {actual} times, exceeding maximum {max}")]
    TooManyRepetitions {
        segment_id: String,
        actual: u32,
        max: u32,
    },
    #[error("loop {loop_id} occurs {actual} times, exceeding maximum {max}")]
    TooManyLoopRepetitions {
        loop_id: String,
        actual: u32,
        max: u32,
    },
}

/// Top-level parse failure: these stop tree construction entirely.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error(transparent)]
    Delimiter(#[from] DelimiterError),
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// A tree is un-serializable in its current state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    #[error("element at {0:?} contains byte 0x{1:02x} which collides with an active delimiter")]
    DelimiterCollision(Location, u8),
    #[error("component separator, element separator, segment terminator and repetition separator must be pairwise distinct")]
    DelimiterCollapse,
}

/// Severity-tagged, schema/semantic validation findings that accumulate into a
/// `ValidationReport` instead of aborting the pipeline. See [`crate::validate`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FindingKind {
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error(transparent)]
    Structure(#[from] StructureError),
    #[error("required element at position {0} is missing")]
    MissingElement(usize),
    #[error("element at position {position} violates {constraint}: {detail}")]
    InvalidElement {
        position: usize,
        constraint: String,
        detail: String,
    },
    #[error("value {value:?} is not a member of code set {code_set}")]
    CodeSetError { code_set: String, value: String },
    #[error("{0}")]
    SemanticError(String),
}
