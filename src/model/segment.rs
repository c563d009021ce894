use super::element::{Element, ElementValue};

/// Byte offset and ordinal index carried purely for diagnostics; two
/// segments are otherwise compared by id and elements alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub byte_offset: usize,
    pub ordinal: usize,
}

/// A parsed segment: an identifier plus its ordered elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub id: String,
    pub elements: Vec<Element>,
    pub position: SourcePosition,
}

impl Segment {
    pub fn new(id: impl Into<String>, elements: Vec<Element>, position: SourcePosition) -> Self {
        Segment {
            id: id.into(),
            elements,
            position,
        }
    }

    /// Construct a segment from plain strings, for tests and programmatic
    /// tree construction. Each string becomes a `Single` element value.
    pub fn from_values(id: impl Into<String>, values: Vec<impl Into<String>>) -> Self {
        let elements = values
            .into_iter()
            .enumerate()
            .map(|(i, v)| Element::new(i + 1, ElementValue::Single(v.into())))
            .collect();
        Segment::new(id, elements, SourcePosition::default())
    }

    /// 1-based element lookup; absent and out-of-range positions both yield
    /// `None` since the grammar does not distinguish them before generation.
    pub fn element(&self, position: usize) -> Option<&Element> {
        self.elements.iter().find(|e| e.position == position)
    }

    pub fn value(&self, position: usize) -> Option<&str> {
        self.element(position).and_then(Element::as_str)
    }
}
