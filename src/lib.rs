//! # edi-x12
//!
//! A schema-driven X12 EDI (Electronic Data Interchange) pipeline:
//! tokenize → parse → validate → acknowledge → generate, including the
//! HIPAA 5010 healthcare profile (270/271 eligibility, 837P professional
//! claims, 835 remittance advice, 997/999 acknowledgments).
//!
//! ## Pipeline
//!
//! ```rust
//! use edi_x12::{parse, validate};
//!
//! let edi_data = b"ISA*00*          *00*          *01*SENDERID       *01*RECEIVERID     *230101*1253*U*00501*000000001*0*T*:~GS*PO*SENDERID*RECEIVERID*20230101*1253*1*X*005010~ST*850*0001~BEG*00*SA*PO-001**20230101~SE*3*0001~GE*1*1~IEA*1*000000001~";
//!
//! match parse(edi_data) {
//!     Ok(interchange) => {
//!         let report = validate(&interchange, None);
//!         println!("{} finding(s)", report.findings.len());
//!     }
//!     Err(e) => println!("parse error: {e}"),
//! }
//! ```
//!
//! ## Components
//!
//! - [`delimiters`] — recovers the active delimiter set from a leading ISA.
//! - [`tokenizer`] — lazy raw-segment iterator.
//! - [`schema`] — declarative transaction schemas (850, 810, 270/271, 837P,
//!   835, 997/999).
//! - [`builder`] — schema-driven envelope/loop tree assembly.
//! - [`validate`] — structural, element-level and semantic/HIPAA passes.
//! - [`ack`] — 997/999 acknowledgment synthesis.
//! - [`generate`] — tree-to-bytes serialization.
//! - [`stream`] — bounded-memory, per-transaction pull iterator.

pub mod ack;
pub mod builder;
pub mod delimiters;
pub mod error;
pub mod generate;
pub mod model;
pub mod partner;
pub mod profile;
pub mod schema;
pub mod stream;
pub mod tokenizer;
pub mod validate;

use lazy_static::lazy_static;

pub use ack::{ack997, ack999};
pub use delimiters::Delimiters;
pub use error::{DelimiterError, FindingKind, GenerationError, ParseError, SchemaError, StructureError, TokenError};
pub use generate::generate;
pub use model::{Element, ElementValue, FunctionalGroup, Interchange, Location, Loop, LoopChild, Segment, TransactionSet};
pub use partner::PartnerProfile;
pub use profile::ValidationProfile;
pub use schema::{Schema, SchemaRegistry};
pub use stream::{stream, EnvelopeSummary, StreamError, TransactionStream};
pub use validate::{Finding, Severity, ValidationReport};

lazy_static! {
    static ref DEFAULT_REGISTRY: SchemaRegistry = SchemaRegistry::new();
}

/// Tokenizes, then builds, a complete [`Interchange`] from `bytes`. Fails
/// terminally on delimiter discovery, grammar, or envelope-framing errors;
/// schema and semantic findings don't appear here — call [`validate`] on the
/// returned tree.
pub fn parse(bytes: &[u8]) -> Result<Interchange, ParseError> {
    let delimiters = Delimiters::detect(bytes)?;
    let tokens = tokenizer::Tokenizer::new(bytes, delimiters);
    let interchange = builder::build(tokens, delimiters, &DEFAULT_REGISTRY)?;
    Ok(interchange)
}

/// Runs the three validation passes over `interchange` against the default
/// schema registry, honoring `profile`'s strictness flags when given.
pub fn validate(interchange: &Interchange, profile: Option<&ValidationProfile>) -> ValidationReport {
    validate::validate(interchange, &DEFAULT_REGISTRY, profile)
}

/// As [`validate`], but returns `Err(report)` instead of `Ok(report)` when
/// `profile.strict` is set and the report contains an error-severity
/// finding.
pub fn validate_strict(
    interchange: &Interchange,
    profile: &ValidationProfile,
) -> Result<ValidationReport, ValidationReport> {
    validate::validate_strict(interchange, &DEFAULT_REGISTRY, profile)
}
