//! Structural pass: segment/loop ordering and cardinality against the
//! transaction's schema. Does not look inside elements; see [`super::semantic`]
//! for that.

use std::collections::HashMap;

use super::{Finding, Location};
use crate::error::SchemaError;
use crate::model::{Loop, LoopChild, TransactionSet};
use crate::schema::{Schema, SchemaNode, Usage};

pub fn check(schema: &Schema, txn: &TransactionSet, location: Location) -> Vec<Finding> {
    check_level(&schema.nodes, &txn.root, location)
}

fn check_level(nodes: &[SchemaNode], body: &Loop, location: Location) -> Vec<Finding> {
    let mut findings = Vec::new();
    let mut counts: HashMap<&str, u32> = HashMap::new();
    let mut last_index: Option<usize> = None;

    for (ordinal, child) in body.children.iter().enumerate() {
        let child_id: &str = match child {
            LoopChild::Segment(s) => s.id.as_str(),
            LoopChild::Loop(l) => l.id.as_deref().unwrap_or(""),
        };

        let Some(node_index) = nodes.iter().position(|n| n.id() == child_id) else {
            // Segment/loop with no corresponding schema node at this level;
            // the Builder already placed it by trigger match or fallthrough,
            // nothing further to check structurally.
            continue;
        };

        let count = counts.entry(child_id).or_insert(0);
        *count += 1;

        if let Some(last) = last_index {
            if node_index < last {
                findings.push(Finding::error(
                    location.clone().with_segment(ordinal),
                    SchemaError::OutOfOrder {
                        segment_id: child_id.to_string(),
                        ordinal,
                    },
                ));
            }
        }
        last_index = Some(node_index);

        match (&nodes[node_index], child) {
            (SchemaNode::Segment(def), _) => {
                if let Some(max) = def.max {
                    if *counts.get(child_id).unwrap() > max {
                        findings.push(Finding::error(
                            location.clone().with_segment(ordinal),
                            SchemaError::TooManyRepetitions {
                                segment_id: child_id.to_string(),
                                actual: *counts.get(child_id).unwrap(),
                                max,
                            },
                        ));
                    }
                }
            }
            (SchemaNode::Loop(def), LoopChild::Loop(actual_loop)) => {
                if let Some(max) = def.max {
                    if *counts.get(child_id).unwrap() > max {
                        findings.push(Finding::error(
                            location.clone().with_loop(child_id),
                            SchemaError::TooManyLoopRepetitions {
                                loop_id: child_id.to_string(),
                                actual: *counts.get(child_id).unwrap(),
                                max,
                            },
                        ));
                    }
                }
                let nested_location = location.clone().with_loop(child_id);
                findings.extend(check_level(&def.children, actual_loop, nested_location));
            }
            _ => {}
        }
    }

    for node in nodes {
        let (id, usage, min) = match node {
            SchemaNode::Segment(s) => (s.id.as_str(), s.usage, s.min),
            SchemaNode::Loop(l) => (l.id.as_str(), loop_usage(l.min), l.min),
        };
        if is_envelope_segment(id) {
            // ST/SE are framed separately by the Builder (`TransactionFrame`)
            // and never appear among `body.children`; schemas still declare
            // them for documentation purposes, but their presence is already
            // guaranteed by the envelope framing step, not this pass.
            continue;
        }
        let actual = *counts.get(id).unwrap_or(&0);
        let required_min = match usage {
            Usage::Mandatory => min.max(1),
            Usage::Optional => min,
        };
        if actual < required_min {
            match node {
                SchemaNode::Segment(_) => findings.push(Finding::error(
                    location.clone(),
                    SchemaError::SegmentBelowMinimum {
                        segment_id: id.to_string(),
                        min: required_min,
                    },
                )),
                SchemaNode::Loop(_) => findings.push(Finding::error(
                    location.clone(),
                    SchemaError::LoopBelowMinimum {
                        loop_id: id.to_string(),
                        min: required_min,
                    },
                )),
            }
        }
    }

    findings
}

fn is_envelope_segment(id: &str) -> bool {
    id == "ST" || id == "SE"
}

fn loop_usage(min: u32) -> Usage {
    if min > 0 {
        Usage::Mandatory
    } else {
        Usage::Optional
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Segment;
    use crate::schema::{SchemaBuilder, SegmentBuilder};

    /// Mirrors how every transaction schema declares ST/SE: the Builder
    /// frames them separately from `txn.root`, so `body` below never
    /// contains them even though the schema still lists them.
    fn schema_with_st_se() -> Vec<SchemaNode> {
        SchemaBuilder::new("270", "test")
            .segment(SegmentBuilder::new("ST", Usage::Mandatory).build())
            .segment(SegmentBuilder::new("BHT", Usage::Mandatory).build())
            .segment(SegmentBuilder::new("SE", Usage::Mandatory).build())
            .build()
            .nodes
    }

    #[test]
    fn st_and_se_are_not_flagged_below_minimum() {
        let nodes = schema_with_st_se();
        let mut body = Loop::root();
        body.push_segment(Segment::from_values("BHT", vec!["0019", "13"]));

        let findings = check_level(&nodes, &body, Location::interchange());
        assert!(findings.is_empty(), "unexpected findings: {findings:?}");
    }

    #[test]
    fn a_genuinely_missing_mandatory_segment_is_still_flagged() {
        let nodes = schema_with_st_se();
        let body = Loop::root();

        let findings = check_level(&nodes, &body, Location::interchange());
        assert_eq!(findings.len(), 1);
        assert!(matches!(
            &findings[0].kind,
            crate::error::FindingKind::Schema(SchemaError::SegmentBelowMinimum { segment_id, .. }) if segment_id == "BHT"
        ));
    }
}
