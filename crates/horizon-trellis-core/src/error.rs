//! Error types for the element contract.

use crate::dom::ElementId;

/// Result type alias for element operations.
pub type DomResult<T> = std::result::Result<T, DomError>;

/// Errors raised by [`Dom`](crate::Dom) tree operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// The element handle does not refer to a live element.
    #[error("Unknown element {0:?}")]
    UnknownElement(ElementId),

    /// The requested tree mutation would create a cycle.
    #[error("Cannot insert {child:?} under its own descendant {parent:?}")]
    HierarchyCycle { parent: ElementId, child: ElementId },

    /// The reference node of an insertion is not a child of the parent.
    #[error("Element {reference:?} is not a child of {parent:?}")]
    NotAChild {
        parent: ElementId,
        reference: ElementId,
    },
}

impl DomError {
    /// Create a cycle error.
    pub fn cycle(parent: ElementId, child: ElementId) -> Self {
        Self::HierarchyCycle { parent, child }
    }

    /// Create a not-a-child error.
    pub fn not_a_child(parent: ElementId, reference: ElementId) -> Self {
        Self::NotAChild { parent, reference }
    }
}
