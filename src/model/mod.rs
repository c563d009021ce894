//! The data model: Elements, Segments and the Interchange -> FunctionalGroup
//! -> TransactionSet -> Loop tree they assemble into.

pub mod element;
pub mod segment;
pub mod tree;

pub use element::{Element, ElementValue};
pub use segment::{Segment, SourcePosition};
pub use tree::{FunctionalGroup, Interchange, Location, Loop, LoopChild, TransactionSet};
