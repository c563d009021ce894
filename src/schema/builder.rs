//! Builder DSL for declarative schemas: a `SchemaBuilder`/`SegmentBuilder`/
//! `ElementBuilder`/`LoopBuilder` quartet that also expresses loop triggers
//! and qualifier constraints.

use super::{
    CodeSet, CompositeCodeSet, DataType, ElementRule, LoopNode, LoopTrigger, RequiredIf, Schema,
    SchemaNode, SegmentNode, Usage,
};

pub struct SchemaBuilder {
    transaction_id: String,
    implementation_convention: Option<String>,
    description: &'static str,
    nodes: Vec<SchemaNode>,
}

impl SchemaBuilder {
    pub fn new(transaction_id: &str, description: &'static str) -> Self {
        SchemaBuilder {
            transaction_id: transaction_id.to_string(),
            implementation_convention: None,
            description,
            nodes: Vec::new(),
        }
    }

    pub fn implementation_convention(mut self, convention: &str) -> Self {
        self.implementation_convention = Some(convention.to_string());
        self
    }

    pub fn segment(mut self, node: SegmentNode) -> Self {
        self.nodes.push(SchemaNode::Segment(node));
        self
    }

    pub fn looop(mut self, node: LoopNode) -> Self {
        self.nodes.push(SchemaNode::Loop(node));
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            transaction_id: self.transaction_id,
            implementation_convention: self.implementation_convention,
            description: self.description,
            nodes: self.nodes,
            flat: false,
        }
    }
}

pub struct SegmentBuilder {
    id: String,
    usage: Usage,
    min: u32,
    max: Option<u32>,
    elements: Vec<ElementRule>,
}

impl SegmentBuilder {
    pub fn new(id: &str, usage: Usage) -> Self {
        let min = if usage == Usage::Mandatory { 1 } else { 0 };
        SegmentBuilder {
            id: id.to_string(),
            usage,
            min,
            max: Some(1),
            elements: Vec::new(),
        }
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.max = None;
        self
    }

    pub fn element(mut self, rule: ElementRule) -> Self {
        self.elements.push(rule);
        self
    }

    pub fn build(self) -> SegmentNode {
        SegmentNode {
            id: self.id,
            usage: self.usage,
            min: self.min,
            max: self.max,
            elements: self.elements,
        }
    }
}

pub struct ElementBuilder {
    position: usize,
    name: &'static str,
    usage: Usage,
    data_type: DataType,
    min_length: Option<usize>,
    max_length: Option<usize>,
    code_set: Option<CodeSet>,
    required_if: Option<RequiredIf>,
    code_set_if: Option<RequiredIf>,
    composite_code_set: Option<CompositeCodeSet>,
}

impl ElementBuilder {
    pub fn new(position: usize, name: &'static str, usage: Usage, data_type: DataType) -> Self {
        ElementBuilder {
            position,
            name,
            usage,
            data_type,
            min_length: None,
            max_length: None,
            code_set: None,
            required_if: None,
            code_set_if: None,
            composite_code_set: None,
        }
    }

    pub fn length(mut self, min: usize, max: usize) -> Self {
        self.min_length = Some(min);
        self.max_length = Some(max);
        self
    }

    pub fn codes(mut self, codes: &[&str]) -> Self {
        self.code_set = Some(CodeSet::Inline(codes.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn named_code_set(mut self, name: &'static str) -> Self {
        self.code_set = Some(CodeSet::Named(name));
        self
    }

    pub fn required_if(mut self, position: usize, values: &[&str]) -> Self {
        self.required_if = Some(RequiredIf {
            position,
            values: values.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Gates the `code_set`/`named_code_set` check above on a qualifier
    /// element elsewhere in the same segment (e.g. REF01 qualifying
    /// REF02's Tax ID check).
    pub fn code_set_if(mut self, position: usize, values: &[&str]) -> Self {
        self.code_set_if = Some(RequiredIf {
            position,
            values: values.iter().map(|s| s.to_string()).collect(),
        });
        self
    }

    /// Checks a composite element's own `value_component` against
    /// `code_set` when its own `qualifier_component` matches one of
    /// `qualifier_values` (e.g. HI's `ABK:A100` or SV1's `HC:99213`).
    pub fn composite_code_set(
        mut self,
        qualifier_component: usize,
        value_component: usize,
        qualifier_values: &[&str],
        code_set: CodeSet,
    ) -> Self {
        self.composite_code_set = Some(CompositeCodeSet {
            qualifier_component,
            value_component,
            qualifier_values: qualifier_values.iter().map(|s| s.to_string()).collect(),
            code_set,
        });
        self
    }

    pub fn build(self) -> ElementRule {
        ElementRule {
            position: self.position,
            name: self.name,
            usage: self.usage,
            data_type: self.data_type,
            min_length: self.min_length,
            max_length: self.max_length,
            code_set: self.code_set,
            required_if: self.required_if,
            code_set_if: self.code_set_if,
            composite_code_set: self.composite_code_set,
        }
    }
}

pub struct LoopBuilder {
    id: String,
    min: u32,
    max: Option<u32>,
    trigger: LoopTrigger,
    children: Vec<SchemaNode>,
}

impl LoopBuilder {
    pub fn new(id: &str, trigger_segment_id: &str) -> Self {
        LoopBuilder {
            id: id.to_string(),
            min: 0,
            max: None,
            trigger: LoopTrigger {
                segment_id: trigger_segment_id.to_string(),
                qualifier_position: None,
                qualifier_values: None,
            },
            children: Vec::new(),
        }
    }

    pub fn min(mut self, min: u32) -> Self {
        self.min = min;
        self
    }

    pub fn max(mut self, max: u32) -> Self {
        self.max = Some(max);
        self
    }

    pub fn qualifier(mut self, position: usize, values: &[&str]) -> Self {
        self.trigger.qualifier_position = Some(position);
        self.trigger.qualifier_values = Some(values.iter().map(|s| s.to_string()).collect());
        self
    }

    pub fn segment(mut self, node: SegmentNode) -> Self {
        self.children.push(SchemaNode::Segment(node));
        self
    }

    pub fn looop(mut self, node: LoopNode) -> Self {
        self.children.push(SchemaNode::Loop(node));
        self
    }

    pub fn build(self) -> LoopNode {
        LoopNode {
            id: self.id,
            min: self.min,
            max: self.max,
            trigger: self.trigger,
            children: self.children,
        }
    }
}
