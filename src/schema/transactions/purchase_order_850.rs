//! 850 Purchase Order, X12 4010.

use crate::schema::{DataType, ElementBuilder, LoopBuilder, Schema, SchemaBuilder, SegmentBuilder, Usage};

pub fn schema() -> Schema {
    SchemaBuilder::new("850", "Purchase Order")
        .segment(
            SegmentBuilder::new("ST", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Identifier Code", Usage::Mandatory, DataType::Id)
                        .length(3, 3)
                        .codes(&["850"])
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
            SegmentBuilder::new("BEG", Usage::Mandatory)
                .element(
                    ElementBuilder::new(1, "Transaction Set Purpose Code", Usage::Mandatory, DataType::Id)
                        .length(2, 2)
                        .codes(&["00", "01", "04", "05"])
                        .build(),
                )
                .element(
                    ElementBuilder::new(2, "Purchase Order Type Code", Usage::Mandatory, DataType::Id)
                        .length(2, 2)
                        .codes(&["SA", "KA", "NE", "RL"])
                        .build(),
                )
                .element(
                    ElementBuilder::new(3, "Purchase Order Number", Usage::Mandatory, DataType::AN)
                        .length(1, 22)
                        .build(),
                )
                .element(
                    ElementBuilder::new(4, "Release Number", Usage::Optional, DataType::AN)
                        .length(1, 30)
                        .build(),
                )
                .element(
                    ElementBuilder::new(5, "Date", Usage::Mandatory, DataType::Date)
                        .length(8, 8)
                        .build(),
                )
                .build(),
        )
        .looop(
            LoopBuilder::new("N1", "N1")
                .max(200)
                .segment(
                    SegmentBuilder::new("N1", Usage::Mandatory)
                        .element(
                            ElementBuilder::new(1, "Entity Identifier Code", Usage::Mandatory, DataType::Id)
                                .length(2, 3)
                                .codes(&["BY", "ST", "VN", "SU", "BT", "RI"])
                                .build(),
                        )
                        .element(
                            ElementBuilder::new(2, "Name", Usage::Optional, DataType::AN)
                                .length(1, 60)
                                .build(),
                        )
                        .element(
                            ElementBuilder::new(3, "Identification Code Qualifier", Usage::Optional, DataType::Id)
                                .length(1, 2)
                                .codes(&["1", "9", "92"])
                                .build(),
                        )
                        .element(
                            ElementBuilder::new(4, "Identification Code", Usage::Optional, DataType::AN)
                                .length(2, 80)
                                .build(),
                        )
                        .build(),
                )
                .segment(SegmentBuilder::new("N3", Usage::Optional).max(2).build())
                .segment(SegmentBuilder::new("N4", Usage::Optional).build())
                .build(),
        )
        .looop(
            LoopBuilder::new("PO1", "PO1")
                .max(100_000)
                .segment(
                    SegmentBuilder::new("PO1", Usage::Mandatory)
                        .element(
                            ElementBuilder::new(2, "Quantity Ordered", Usage::Optional, DataType::R)
                                .length(1, 15)
                                .build(),
                        )
                        .element(
                            ElementBuilder::new(3, "Unit or Basis for Measurement Code", Usage::Optional, DataType::Id)
                                .length(2, 2)
                                .codes(&["EA", "CA", "LB", "KG", "PC", "BX"])
                                .build(),
                        )
                        .element(
                            ElementBuilder::new(4, "Unit Price", Usage::Optional, DataType::R)
                                .length(1, 17)
                                .build(),
                        )
                        .build(),
                )
                .segment(SegmentBuilder::new("PID", Usage::Optional).unbounded().build())
                .build(),
        )
        .segment(
            SegmentBuilder::new("CTT", Usage::Optional)
                .element(
                    ElementBuilder::new(1, "Number of Line Items", Usage::Mandatory, DataType::N)
                        .length(1, 6)
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
