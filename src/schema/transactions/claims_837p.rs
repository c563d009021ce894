//! 837 Professional Health Care Claim, HIPAA 5010 (005010X222A1).
//! Supplemented per spec.md's healthcare scope: demonstrates Loop 2300
//! (Claim) containing nested Loop 2400 (Service Line), the structure spec.md
//! scenario 5 exercises directly.

use crate::schema::{CodeSet, DataType, ElementBuilder, LoopBuilder, Schema, SchemaBuilder, SegmentBuilder, Usage};

pub fn schema() -> Schema {
    SchemaBuilder::new("837", "Health Care Claim: Professional")
        .implementation_convention("005010X222A1")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .codes(&["837"])
                        .build(),
                )
                .element(ElementBuilder::new(2, "Transaction Set Control Number", Usage::Mandatory, DataType::AN).build())
                .element(
                    ElementBuilder::new(3, "Implementation Convention Reference", Usage::Optional, DataType::AN)
                        .build(),
                )
                .build(),
        )
        .segment(
            SegmentBuilder::new("BHT", Usage::Mandatory)
                .element(ElementBuilder::new(1, "Hierarchical Structure Code", Usage::Mandatory, DataType::Id).build())
                .element(ElementBuilder::new(2, "Transaction Set Purpose Code", Usage::Mandatory, DataType::Id).build())
                .build(),
        )
        .looop(
            LoopBuilder::new("1000A", "NM1")
                .qualifier(1, &["41"])
                .min(1)
                .max(1)
                .segment(SegmentBuilder::new("NM1", Usage::Mandatory).build())
                .segment(SegmentBuilder::new("PER", Usage::Mandatory).build())
                .build(),
        )
        .looop(
            LoopBuilder::new("1000B", "NM1")
                .qualifier(1, &["40"])
                .min(1)
                .max(1)
                .segment(SegmentBuilder::new("NM1", Usage::Mandatory).build())
                .build(),
        )
        .looop(
            LoopBuilder::new("2000A", "HL")
                .qualifier(3, &["20"])
                .segment(SegmentBuilder::new("HL", Usage::Mandatory).build())
                .segment(SegmentBuilder::new("PRV", Usage::Optional).build())
                .looop(
                    LoopBuilder::new("2010AA", "NM1")
                        .qualifier(1, &["85"])
                        .segment(
                            SegmentBuilder::new("NM1", Usage::Mandatory)
                                .element(
                                    ElementBuilder::new(8, "Identification Code Qualifier", Usage::Optional, DataType::Id)
                                        .codes(&["XX"])
                                        .build(),
                                )
                                .element(
                                    ElementBuilder::new(9, "NPI", Usage::Optional, DataType::AN)
                                        .length(10, 10)
                                        .required_if(8, &["XX"])
                                        .named_code_set("npi")
                                        .build(),
                                )
                                .build(),
                        )
                        .segment(
                            SegmentBuilder::new("REF", Usage::Optional)
                                .element(
                                    ElementBuilder::new(1, "Reference Identification Qualifier", Usage::Mandatory, DataType::Id)
                                        .build(),
                                )
                                .element(
                                    ElementBuilder::new(2, "Billing Provider Tax Identification Number", Usage::Mandatory, DataType::AN)
                                        .length(9, 11)
                                        .code_set_if(1, &["EI", "SY"])
                                        .named_code_set("ein")
                                        .build(),
                                )
                                .build(),
                        )
                        .build(),
                )
                .build(),
        )
        .looop(
            LoopBuilder::new("2000B", "HL")
                .qualifier(3, &["22"])
                .segment(SegmentBuilder::new("HL", Usage::Mandatory).build())
                .segment(SegmentBuilder::new("SBR", Usage::Mandatory).build())
                .looop(
                    LoopBuilder::new("2010BA", "NM1")
                        .qualifier(1, &["IL"])
                        .segment(SegmentBuilder::new("NM1", Usage::Mandatory).build())
                        .build(),
                )
                .looop(
                    LoopBuilder::new("2300", "CLM")
                        .max(100)
                        .segment(
                            SegmentBuilder::new("CLM", Usage::Mandatory)
                                .element(
                                    ElementBuilder::new(1, "Claim Submitter's Identifier", Usage::Mandatory, DataType::AN)
                                        .length(1, 38)
                                        .build(),
                                )
                                .element(
                                    ElementBuilder::new(2, "Monetary Amount", Usage::Mandatory, DataType::R)
                                        .length(1, 18)
                                        .build(),
                                )
                                .build(),
                        )
                        .segment(SegmentBuilder::new("DTP", Usage::Optional).unbounded().build())
                        .segment(
                            SegmentBuilder::new("HI", Usage::Mandatory)
                                .element(
                                    ElementBuilder::new(1, "Health Care Code Information", Usage::Mandatory, DataType::AN)
                                        .composite_code_set(1, 2, &["ABK", "ABF", "BK", "BF"], CodeSet::Named("icd10cm"))
                                        .build(),
                                )
                                .build(),
                        )
                        .looop(
                            LoopBuilder::new("2400", "LX")
                                .max(50)
                                .segment(
                                    SegmentBuilder::new("LX", Usage::Mandatory)
                                        .element(ElementBuilder::new(1, "Assigned Number", Usage::Mandatory, DataType::N).build())
                                        .build(),
                                )
                                .segment(
                                    SegmentBuilder::new("SV1", Usage::Mandatory)
                                        .element(
                                            ElementBuilder::new(1, "Composite Medical Procedure Identifier", Usage::Mandatory, DataType::AN)
                                                .composite_code_set(1, 2, &["HC"], CodeSet::Named("procedure_code"))
                                                .build(),
                                        )
                                        .element(
                                            ElementBuilder::new(2, "Monetary Amount", Usage::Mandatory, DataType::R)
                                                .build(),
                                        )
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
