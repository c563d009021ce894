//! 835 Health Care Claim Payment/Advice, HIPAA 5010 (005010X221A1).
//! Supplemented per spec.md's healthcare scope; used by the round-trip
//! scenario in spec.md §8.

use crate::schema::{DataType, ElementBuilder, LoopBuilder, Schema, SchemaBuilder, SegmentBuilder, Usage};

pub fn schema() -> Schema {
    SchemaBuilder::new("835", "Health Care Claim Payment/Advice")
        .implementation_convention("005010X221A1")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .codes(&["835"])
                        .build(),
                )
                .element(ElementBuilder::new(2, "Transaction Set Control Number", Usage::Mandatory, DataType::AN).build())
                .build(),
        )
        .segment(
            SegmentBuilder::new("BPR", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Handling Code", Usage::Mandatory, DataType::Id)
                        .build(),
                )
                .element(
                    ElementBuilder::new(2, "Monetary Amount", Usage::Mandatory, DataType::R)
                        .build(),
                )
                .build(),
        )
        .segment(SegmentBuilder::new("TRN", Usage::Mandatory).build())
        .looop(
            LoopBuilder::new("1000A", "N1")
                .qualifier(1, &["PR"])
                .min(1)
                .max(1)
                .segment(SegmentBuilder::new("N1", Usage::Mandatory).build())
                .build(),
        )
        .looop(
            LoopBuilder::new("1000B", "N1")
                .qualifier(1, &["PE"])
                .min(1)
                .max(1)
                .segment(SegmentBuilder::new("N1", Usage::Mandatory).build())
                .build(),
        )
        .looop(
            LoopBuilder::new("2000", "LX")
                .max(100_000)
                .segment(SegmentBuilder::new("LX", Usage::Mandatory).build())
                .looop(
                    LoopBuilder::new("2100", "CLP")
                        .segment(
                            SegmentBuilder::new("CLP", Usage::Mandatory)
                                .element(ElementBuilder::new(1, "Claim Submitter's Identifier", Usage::Mandatory, DataType::AN).build())
                                .element(ElementBuilder::new(2, "Claim Status Code", Usage::Mandatory, DataType::Id).build())
                                .element(ElementBuilder::new(3, "Monetary Amount", Usage::Mandatory, DataType::R).build())
                                .element(ElementBuilder::new(4, "Monetary Amount", Usage::Mandatory, DataType::R).build())
                                .build(),
                        )
                        .segment(SegmentBuilder::new("NM1", Usage::Optional).unbounded().build())
                        .looop(
                            LoopBuilder::new("2110", "SVC")
                                .segment(
                                    SegmentBuilder::new("SVC", Usage::Mandatory)
                                        .element(
                                            ElementBuilder::new(1, "Composite Medical Procedure Identifier", Usage::Mandatory, DataType::AN)
                                                .build(),
                                        )
                                        .element(ElementBuilder::new(2, "Monetary Amount", Usage::Mandatory, DataType::R).build())
                                        .element(ElementBuilder::new(3, "Monetary Amount", Usage::Mandatory, DataType::R).build())
                                        .build(),
                                )
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .segment(
            SegmentBuilder::new("SE", Usage::Mandatory)
                .element(ElementBuilder::new(1, "Number of Included Segments", Usage::Mandatory, DataType::N).build())
                .element(ElementBuilder::new(2, "Transaction Set Control Number", Usage::Mandatory, DataType::AN).build())
                .build(),
        )
        .build()
}
