//! 810 Invoice, HIPAA/X12 4010.

use crate::schema::{DataType, ElementBuilder, Schema, SchemaBuilder, SegmentBuilder, Usage};

pub fn schema() -> Schema {
    SchemaBuilder::new("810", "Invoice")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .length(3, 3)
                        .codes(&["810"])
                        .build(),
                )
                .element(
                    ElementBuilder::new(2, "Transaction Set Control Number", Usage::Mandatory, DataType::AN)
                        .length(4, 9)
                        .build(),
                )
                .build(),
        )
        .segment(
            SegmentBuilder::new("BIG", Usage::Mandatory)
                .element(ElementBuilder::new(1, "Date", Usage::Mandatory, DataType::Date).length(8, 8).build())
                .element(
                    ElementBuilder::new(2, "Invoice Number", Usage::Mandatory, DataType::AN)
                        .length(1, 22)
                        .build(),
                )
                .element(
                    ElementBuilder::new(4, "Purchase Order Number", Usage::Optional, DataType::AN)
                        .length(1, 22)
                        .build(),
                )
                .build(),
        )
        .segment(SegmentBuilder::new("N1", Usage::Optional).max(200).build())
        .segment(SegmentBuilder::new("IT1", Usage::Optional).unbounded().build())
        .segment(
            SegmentBuilder::new("TDS", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Amount", Usage::Mandatory, DataType::N)
                        .length(1, 15)
                        .build(),
                )
                .build(),
        )
        .segment(
            SegmentBuilder::new("SE", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Number of Included Segments", Usage::Mandatory, DataType::N)
                        .length(1, 10)
                        .build(),
                )
                .element(
                    ElementBuilder::new(2, "Transaction Set Control Number", Usage::Mandatory, DataType::AN)
                        .length(4, 9)
                        .build(),
                )
                .build(),
        )
        .build()
}
