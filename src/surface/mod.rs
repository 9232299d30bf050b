//! Output surface - the retained node tree elements are rendered into.
//!
//! The renderer only needs four operations from a surface. Event-handler
//! properties are passed through like any other property; wiring them to
//! real input is the surface's job.

pub mod memory;

use std::fmt;

use crate::element::PropValue;

/// Node kind requested from a surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Text,
    Tag(&'a str),
}

/// A retained-mode node tree.
pub trait Surface {
    /// Handle to a node owned by the surface.
    type Node: Clone + fmt::Debug + 'static;

    type Error: std::error::Error + 'static;

    /// Create a detached node.
    fn create_node(&mut self, kind: NodeKind<'_>) -> Result<Self::Node, Self::Error>;

    /// Set a named property on a node.
    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue,
    ) -> Result<(), Self::Error>;

    /// Append `child` as the last child of `parent`.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Detach every child of `container`.
    fn clear_children(&mut self, container: &Self::Node) -> Result<(), Self::Error>;
}
