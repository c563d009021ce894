//! 270 Eligibility Inquiry / 271 Eligibility Response, HIPAA 5010 (005010X279A1).

use crate::schema::{DataType, ElementBuilder, LoopBuilder, Schema, SchemaBuilder, SegmentBuilder, Usage};

fn hl_loop(id: &str, levels: &[&str]) -> crate::schema::LoopNode {
    LoopBuilder::new(id, "HL")
        .qualifier(3, levels)
        .segment(
            SegmentBuilder::new("HL", Usage::Mandatory)
                .element(ElementBuilder::new(1, "Hierarchical ID Number", Usage::Mandatory, DataType::N).build())
                .element(ElementBuilder::new(2, "Hierarchical Parent ID Number", Usage::Optional, DataType::N).build())
                .element(
                    ElementBuilder::new(3, "Hierarchical Level Code", Usage::Mandatory, DataType::Id)
                        .codes(levels)
                        .build(),
                )
                .build(),
        )
        .segment(
            SegmentBuilder::new("NM1", Usage::Mandatory)
                .element(ElementBuilder::new(1, "Entity Identifier Code", Usage::Mandatory, DataType::Id).build())
                .element(
                    ElementBuilder::new(8, "Identification Code Qualifier", Usage::Optional, DataType::Id)
                        .codes(&["XX", "MI", "34"])
                        .build(),
                )
                .element(
                    ElementBuilder::new(9, "Identification Code", Usage::Optional, DataType::AN)
                        .required_if(8, &["XX", "MI", "34"])
                        .build(),
                )
                .build(),
        )
        .build()
}

pub fn schema_270() -> Schema {
    SchemaBuilder::new("270", "Eligibility, Coverage or Benefit Inquiry")
        .implementation_convention("005010X279A1")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .codes(&["270"])
                        .build(),
                )
                .element(ElementBuilder::new(2, "Transaction Set Control Number", Usage::Mandatory, DataType::AN).build())
                .build(),
        )
        .segment(
            SegmentBuilder::new("BHT", Usage::Mandatory)
                .element(ElementBuilder::new(1, "Hierarchical Structure Code", Usage::Mandatory, DataType::Id).build())
                .element(ElementBuilder::new(2, "Transaction Set Purpose Code", Usage::Mandatory, DataType::Id).build())
                .build(),
        )
        .looop(hl_loop("2000A", &["20"]))
        .looop(hl_loop("2000B", &["21"]))
        .looop(hl_loop("2000C", &["22"]))
        .segment(
            SegmentBuilder::new("SE", Usage::Mandatory)
                .element(ElementBuilder::new(1, "Number of Included Segments", Usage::Mandatory, DataType::N).build())
                .element(ElementBuilder::new(2, "Transaction Set Control Number", Usage::Mandatory, DataType::AN).build())
                .build(),
        )
        .build()
}

pub fn schema_271() -> Schema {
    SchemaBuilder::new("271", "Eligibility, Coverage or Benefit Information")
        .implementation_convention("005010X279A1")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .codes(&["271"])
                        .build(),
                )
                .build(),
        )
        .segment(SegmentBuilder::new("BHT", Usage::Mandatory).build())
        .looop(hl_loop("2000A", &["20"]))
        .looop(hl_loop("2000B", &["21"]))
        .looop(
            LoopBuilder::new("2000C", "HL")
                .qualifier(3, &["22"])
                .segment(SegmentBuilder::new("HL", Usage::Mandatory).build())
                .segment(SegmentBuilder::new("NM1", Usage::Mandatory).build())
                .segment(SegmentBuilder::new("EB", Usage::Optional).unbounded().build())
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
