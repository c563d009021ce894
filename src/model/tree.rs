use super::segment::Segment;

/// A child of a Loop: either a leaf Segment or a nested Loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopChild {
    Segment(Segment),
    Loop(Loop),
}

/// A schema-defined grouping of segments that may repeat. The tree's
/// interior nodes; `id` is `None` for the synthetic root loop of a
/// TransactionSet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub id: Option<String>,
    pub children: Vec<LoopChild>,
}

impl Loop {
    pub fn root() -> Self {
        Loop {
            id: None,
            children: Vec::new(),
        }
    }

    pub fn new(id: impl Into<String>) -> Self {
        Loop {
            id: Some(id.into()),
            children: Vec::new(),
        }
    }

    pub fn push_segment(&mut self, segment: Segment) {
        self.children.push(LoopChild::Segment(segment));
    }

    pub fn push_loop(&mut self, child: Loop) {
        self.children.push(LoopChild::Loop(child));
    }

    /// Depth-first walk over every Segment reachable from this loop, in
    /// document order.
    pub fn segments(&self) -> Vec<&Segment> {
        let mut out = Vec::new();
        self.collect_segments(&mut out);
        out
    }

    fn collect_segments<'a>(&'a self, out: &mut Vec<&'a Segment>) {
        for child in &self.children {
            match child {
                LoopChild::Segment(s) => out.push(s),
                LoopChild::Loop(l) => l.collect_segments(out),
            }
        }
    }
}

/// A single business document: ST through SE.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSet {
    pub transaction_type: String,
    pub implementation_convention: Option<String>,
    pub control_number: String,
    pub set_identifier: String,
    pub root: Loop,
}

impl TransactionSet {
    /// Number of segments from ST through SE inclusive, as SE01 must claim.
    pub fn segment_count(&self) -> usize {
        self.root.segments().len()
    }
}

/// GS/GE envelope grouping like transactions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionalGroup {
    pub functional_identifier_code: String,
    pub sender_code: String,
    pub receiver_code: String,
    pub date: String,
    pub time: String,
    pub control_number: String,
    pub responsible_agency_code: String,
    pub version: String,
    pub transactions: Vec<TransactionSet>,
}

/// ISA/IEA outermost envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interchange {
    pub sender_qualifier: String,
    pub sender_id: String,
    pub receiver_qualifier: String,
    pub receiver_id: String,
    pub authorization_qualifier: String,
    pub authorization_information: String,
    pub security_qualifier: String,
    pub security_information: String,
    pub date: String,
    pub time: String,
    pub control_version: String,
    pub control_number: String,
    pub acknowledgment_requested: String,
    pub usage_indicator: String,
    pub delimiters: crate::delimiters::Delimiters,
    pub functional_groups: Vec<FunctionalGroup>,
}

/// A path into a parsed tree, from Interchange down to (optionally) an
/// element or component. Used to anchor every `Finding`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Location {
    pub group_index: Option<usize>,
    pub transaction_index: Option<usize>,
    pub loop_path: Vec<String>,
    pub segment_ordinal: Option<usize>,
    pub element_position: Option<usize>,
    pub component_index: Option<usize>,
}

impl Location {
    pub fn interchange() -> Self {
        Location::default()
    }

    pub fn group(index: usize) -> Self {
        Location {
            group_index: Some(index),
            ..Default::default()
        }
    }

    pub fn transaction(group_index: usize, transaction_index: usize) -> Self {
        Location {
            group_index: Some(group_index),
            transaction_index: Some(transaction_index),
            ..Default::default()
        }
    }

    pub fn with_segment(mut self, ordinal: usize) -> Self {
        self.segment_ordinal = Some(ordinal);
        self
    }

    pub fn with_element(mut self, position: usize) -> Self {
        self.element_position = Some(position);
        self
    }

    pub fn with_loop(mut self, loop_id: impl Into<String>) -> Self {
        self.loop_path.push(loop_id.into());
        self
    }
}
