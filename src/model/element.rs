//! Element values: atomic, composite (component-split) or repeated.

/// The value of one Element, tagged by which separators were found in its
/// raw field. Variant is structural, not declared — any element can turn out
/// to be any shape depending on the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ElementValue {
    /// No component or repetition separators found.
    Single(String),
    /// Split on the component separator, no repetition separator.
    Composite(Vec<String>),
    /// Split on the repetition separator first, each repetition then
    /// split on the component separator if present.
    Repeated(Vec<ElementValue>),
}

impl ElementValue {
    /// The first atomic string this value resolves to, as used by most
    /// schema rules which reference a single position without caring about
    /// repetition (e.g. NM108/NM109 qualifier checks).
    pub fn as_single(&self) -> Option<&str> {
        match self {
            ElementValue::Single(s) => Some(s),
            ElementValue::Composite(parts) => parts.first().map(String::as_str),
            ElementValue::Repeated(reps) => reps.first().and_then(ElementValue::as_single),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            ElementValue::Single(s) => s.is_empty(),
            ElementValue::Composite(parts) => parts.iter().all(|p| p.is_empty()),
            ElementValue::Repeated(reps) => reps.is_empty(),
        }
    }

    /// Component strings, if this is a composite value (or the lone
    /// repetition of one).
    pub fn components(&self) -> Option<&[String]> {
        match self {
            ElementValue::Composite(parts) => Some(parts),
            _ => None,
        }
    }
}

/// An ordered, 1-based Element within a Segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub position: usize,
    pub value: ElementValue,
}

impl Element {
    pub fn new(position: usize, value: ElementValue) -> Self {
        Element { position, value }
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_single()
    }
}
