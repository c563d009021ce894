//! 997 Functional Acknowledgment / 999 Implementation Acknowledgment
//! schemas — structural only, since these are synthesized by
//! [`crate::ack`] rather than parsed from partner input in this crate's
//! scope.

use crate::schema::{DataType, LoopBuilder, Schema, SchemaBuilder, SegmentBuilder, Usage, ElementBuilder};

pub fn schema_997() -> Schema {
    SchemaBuilder::new("997", "Functional Acknowledgment")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .codes(&["997"])
                        .build(),
                )
                .build(),
        )
        .segment(SegmentBuilder::new("AK1", Usage::Mandatory).build())
        .looop(
            LoopBuilder::new("AK2", "AK2")
                .max(100_000)
                .segment(SegmentBuilder::new("AK2", Usage::Mandatory).build())
                .segment(SegmentBuilder::new("AK3", Usage::Optional).unbounded().build())
                .segment(SegmentBuilder::new("AK4", Usage::Optional).unbounded().build())
                .segment(SegmentBuilder::new("AK5", Usage::Mandatory).build())
                .build(),
        )
        .segment(SegmentBuilder::new("AK9", Usage::Mandatory).build())
        .segment(SegmentBuilder::new("SE", Usage::Mandatory).build())
        .build()
}

pub fn schema_999() -> Schema {
    SchemaBuilder::new("999", "Implementation Acknowledgment")
        .implementation_convention("005010X231")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .codes(&["999"])
                        .build(),
                )
                .build(),
        )
        .segment(SegmentBuilder::new("AK1", Usage::Mandatory).build())
        .looop(
            LoopBuilder::new("AK2", "AK2")
                .max(100_000)
                .segment(SegmentBuilder::new("AK2", Usage::Mandatory).build())
                .looop(
                    LoopBuilder::new("IK3", "IK3")
                        .max(100_000)
                        .segment(SegmentBuilder::new("IK3", Usage::Mandatory).build())
                        .segment(SegmentBuilder::new("IK4", Usage::Optional).unbounded().build())
                        .build(),
                )
                .segment(SegmentBuilder::new("IK5", Usage::Mandatory).build())
                .build(),
        )
        .segment(SegmentBuilder::new("AK9", Usage::Mandatory).build())
        .segment(SegmentBuilder::new("SE", Usage::Mandatory).build())
        .build()
}
