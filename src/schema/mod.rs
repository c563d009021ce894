//! Schema Registry: declarative transaction schemas that drive the
//! Envelope/Loop Builder and the Validator. Schemas are data, not code.

pub mod builder;
pub mod transactions;

use std::collections::HashMap;

pub use builder::{ElementBuilder, LoopBuilder, SchemaBuilder, SegmentBuilder};

/// Supported element data types (X12 base types plus the date/time split
/// the validator primitives need).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    AN,
    N,
    R,
    Id,
    Date,
    Time,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    Mandatory,
    Optional,
}

/// A reusable reference to a code set the Validator checks membership
/// against — either an inline list or a named set resolved by the
/// validator primitives (e.g. ICD-10, HCPCS).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodeSet {
    Inline(Vec<String>),
    Named(&'static str),
}

/// `required_if` predicate: the referenced element at `position` must equal
/// one of `values` for this element to become mandatory instead of optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequiredIf {
    pub position: usize,
    pub values: Vec<String>,
}

/// Gates a composite element's own `code_set` on a qualifier that lives in
/// one of its own components — e.g. HI's diagnosis qualifier/code pair
/// (`HI01-1`/`HI01-2`) or SV1's procedure qualifier/code pair
/// (`SV101-1`/`SV101-2`). The code set is only enforced against
/// `value_component` when `qualifier_component` matches one of
/// `qualifier_values`; components are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeCodeSet {
    pub qualifier_component: usize,
    pub value_component: usize,
    pub qualifier_values: Vec<String>,
    pub code_set: CodeSet,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRule {
    pub position: usize,
    pub name: &'static str,
    pub usage: Usage,
    pub data_type: DataType,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub code_set: Option<CodeSet>,
    pub required_if: Option<RequiredIf>,
    /// Gates `code_set` on a qualifier living at a *different* element in
    /// the same segment — e.g. REF02 (Tax ID) is only checked against the
    /// EIN code set when REF01 is `EI` or `SY`.
    pub code_set_if: Option<RequiredIf>,
    pub composite_code_set: Option<CompositeCodeSet>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentNode {
    pub id: String,
    pub usage: Usage,
    pub min: u32,
    pub max: Option<u32>,
    pub elements: Vec<ElementRule>,
}

/// `(segment_id, optional qualifier element position, allowed qualifier
/// values)` per DESIGN NOTES — the only state the Builder's stack discipline
/// needs to disambiguate loop boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopTrigger {
    pub segment_id: String,
    pub qualifier_position: Option<usize>,
    pub qualifier_values: Option<Vec<String>>,
}

impl LoopTrigger {
    pub fn matches(&self, segment: &crate::model::Segment) -> bool {
        if segment.id != self.segment_id {
            return false;
        }
        match (&self.qualifier_position, &self.qualifier_values) {
            (Some(pos), Some(values)) => segment
                .value(*pos)
                .map(|v| values.iter().any(|allowed| allowed == v))
                .unwrap_or(false),
            _ => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopNode {
    pub id: String,
    pub min: u32,
    pub max: Option<u32>,
    pub trigger: LoopTrigger,
    pub children: Vec<SchemaNode>,
}

/// One node in the schema graph: either a leaf Segment or an interior Loop.
/// A sum type per DESIGN NOTES, not a class hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaNode {
    Segment(SegmentNode),
    Loop(LoopNode),
}

impl SchemaNode {
    pub fn id(&self) -> &str {
        match self {
            SchemaNode::Segment(s) => &s.id,
            SchemaNode::Loop(l) => &l.id,
        }
    }
}

/// The ordered graph of schema nodes for one transaction type/version, plus
/// the metadata needed to resolve it from a GS/ST pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub transaction_id: String,
    pub implementation_convention: Option<String>,
    pub description: &'static str,
    pub nodes: Vec<SchemaNode>,
    /// A "flat" schema has no loop structure and performs only envelope
    /// checks; used for unknown transaction types.
    pub flat: bool,
}

impl Schema {
    pub fn flat(transaction_id: impl Into<String>) -> Self {
        Schema {
            transaction_id: transaction_id.into(),
            implementation_convention: None,
            description: "unstructured (unknown transaction type)",
            nodes: Vec::new(),
            flat: true,
        }
    }

    pub fn segment(&self, id: &str) -> Option<&SegmentNode> {
        self.nodes.iter().find_map(|n| match n {
            SchemaNode::Segment(s) if s.id == id => Some(s),
            _ => None,
        })
    }
}

/// Keyed lookup of `(transaction id, implementation convention)` to Schema.
/// Read-only after construction and safe for concurrent readers.
pub struct SchemaRegistry {
    schemas: HashMap<(String, Option<String>), Schema>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        let mut schemas = HashMap::new();
        for schema in transactions::all() {
            schemas.insert(
                (schema.transaction_id.clone(), schema.implementation_convention.clone()),
                schema,
            );
        }
        SchemaRegistry { schemas }
    }

    /// Looks up a schema for an exact `(transaction_id, implementation
    /// convention)` pair, falling back to the transaction id's default
    /// (convention = `None`), and finally to a synthetic flat schema for
    /// unknown pairs.
    pub fn lookup(&self, transaction_id: &str, implementation_convention: Option<&str>) -> Schema {
        if let Some(conv) = implementation_convention {
            if let Some(schema) = self
                .schemas
                .get(&(transaction_id.to_string(), Some(conv.to_string())))
            {
                return schema.clone();
            }
        }
        if let Some(schema) = self.schemas.get(&(transaction_id.to_string(), None)) {
            return schema.clone();
        }
        Schema::flat(transaction_id)
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}
