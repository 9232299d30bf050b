//! Error types.
//!
//! The core defines almost no failure modes of its own. Most failures come
//! from the output surface and are carried through [`RenderError::Surface`].

use thiserror::Error;

use crate::surface::memory::NodeId;

/// Errors raised by a render pass or a state setter.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The output surface rejected an operation (unknown kind, bad node, ...).
    #[error("output surface rejected operation: {0}")]
    Surface(#[source] Box<dyn std::error::Error + 'static>),

    /// A setter ran before any render pass completed.
    #[error("no render root is mounted")]
    NotMounted,

    /// A setter ran while a render pass was already in progress.
    #[error("state setter invoked during an active render pass")]
    Reentrant,

    /// The render session that owns the state slot is gone.
    #[error("render session was dropped")]
    SessionDropped,
}

impl RenderError {
    /// Wrap any surface error.
    pub fn surface(err: impl std::error::Error + 'static) -> Self {
        Self::Surface(Box::new(err))
    }
}

/// Errors raised by [`MemorySurface`](crate::surface::memory::MemorySurface).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// Tag name is not a valid element name.
    #[error("invalid tag name `{0}`")]
    InvalidTagName(String),

    /// No node with this id exists.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Text nodes cannot hold children.
    #[error("node {0} is a text node and cannot hold children")]
    NotAContainer(NodeId),

    /// The node would become its own ancestor.
    #[error("node {0} cannot be appended to itself or one of its descendants")]
    HierarchyRequest(NodeId),
}
