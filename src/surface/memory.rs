//! In-memory surface - an arena of nodes with DOM-like rules.
//!
//! Nodes are never freed. Clearing a container only detaches its children,
//! so handles to nodes from earlier passes stay valid and can be inspected.
//!
//! # Example
//!
//! ```ignore
//! let renderer = Renderer::new(MemorySurface::new());
//! let body = renderer.surface().body();
//! renderer.render(app, body)?;
//! assert_eq!(renderer.surface().markup(body), "<body><div>...</div></body>");
//! ```

use std::fmt;
use std::fmt::Write as _;

use bitflags::bitflags;

use crate::element::{EventHandler, NODE_VALUE, PropValue};
use crate::error::{RenderError, SurfaceError};
use crate::pipeline::Renderer;

use super::{NodeKind, Surface};

// =============================================================================
// Node Handles
// =============================================================================

/// Handle to a node in a [`MemorySurface`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

bitflags! {
    /// Node state bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct NodeFlags: u8 {
        /// Text node (cannot hold children).
        const TEXT = 1 << 0;
        /// Currently has a parent.
        const ATTACHED = 1 << 1;
        /// Has at least one handler property.
        const LISTENING = 1 << 2;
    }
}

/// Owned node type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeType {
    Text,
    Element(String),
}

#[derive(Debug)]
struct NodeData {
    node_type: NodeType,
    properties: Vec<(String, PropValue)>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    flags: NodeFlags,
}

impl NodeData {
    fn new(node_type: NodeType) -> Self {
        let flags = match node_type {
            NodeType::Text => NodeFlags::TEXT,
            NodeType::Element(_) => NodeFlags::empty(),
        };
        Self {
            node_type,
            properties: Vec::new(),
            children: Vec::new(),
            parent: None,
            flags,
        }
    }

    fn property(&self, name: &str) -> Option<&PropValue> {
        self.properties.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }
}

// =============================================================================
// Memory Surface
// =============================================================================

/// Retained node tree kept in memory.
#[derive(Debug)]
pub struct MemorySurface {
    nodes: Vec<NodeData>,
    body: NodeId,
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurface {
    /// Create a surface holding a single `body` container.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeType::Element("body".to_string()))],
            body: NodeId(0),
        }
    }

    /// The pre-created top-level container.
    pub fn body(&self) -> NodeId {
        self.body
    }

    /// Total nodes ever created, detached ones included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, SurfaceError> {
        self.nodes.get(id.0).ok_or(SurfaceError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, SurfaceError> {
        self.nodes.get_mut(id.0).ok_or(SurfaceError::UnknownNode(id))
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn node_type(&self, id: NodeId) -> Option<&NodeType> {
        self.node(id).ok().map(|n| &n.node_type)
    }

    /// Children in order. Empty for unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).ok().and_then(|n| n.parent)
    }

    pub fn flags(&self, id: NodeId) -> NodeFlags {
        self.node(id).map(|n| n.flags).unwrap_or_default()
    }

    pub fn property(&self, id: NodeId, name: &str) -> Option<&PropValue> {
        self.node(id).ok()?.property(name)
    }

    /// Handler stored under `name`, cloned so it can run without borrowing the surface.
    pub fn handler(&self, id: NodeId, name: &str) -> Option<EventHandler> {
        self.property(id, name)?.as_handler().cloned()
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<String> {
        let node = self.node(id).ok()?;
        match node.node_type {
            NodeType::Text => {
                let value = node.property(NODE_VALUE);
                Some(value.map(ToString::to_string).unwrap_or_default())
            }
            NodeType::Element(_) => None,
        }
    }

    /// Concatenated text of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        if let Some(text) = self.text(id) {
            out.push_str(&text);
        }
        for &child in self.children(id) {
            self.collect_text(child, out);
        }
    }

    /// Serialize the subtree under `id`.
    ///
    /// Handlers appear as bare attribute names. Unknown ids yield an empty string.
    pub fn markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_markup(id, &mut out);
        out
    }

    fn write_markup(&self, id: NodeId, out: &mut String) {
        let Ok(node) = self.node(id) else { return };
        match &node.node_type {
            NodeType::Text => {
                if let Some(value) = node.property(NODE_VALUE) {
                    escape_into(&value.to_string(), false, out);
                }
            }
            NodeType::Element(tag) => {
                out.push('<');
                out.push_str(tag);
                for (name, value) in &node.properties {
                    out.push(' ');
                    out.push_str(name);
                    if !matches!(value, PropValue::Handler(_)) {
                        out.push_str("=\"");
                        escape_into(&value.to_string(), true, out);
                        out.push('"');
                    }
                }
                out.push('>');
                for &child in &node.children {
                    self.write_markup(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    /// True if `ancestor` is `node` or sits somewhere above it.
    fn is_inclusive_ancestor(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    fn detach(&mut self, child: NodeId) -> Result<(), SurfaceError> {
        let Some(parent) = self.node(child)?.parent else {
            return Ok(());
        };
        self.node_mut(parent)?.children.retain(|&c| c != child);
        let node = self.node_mut(child)?;
        node.parent = None;
        node.flags.remove(NodeFlags::ATTACHED);
        Ok(())
    }
}

fn is_valid_tag(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '-')
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}

impl Surface for MemorySurface {
    type Node = NodeId;
    type Error = SurfaceError;

    fn create_node(&mut self, kind: NodeKind<'_>) -> Result<NodeId, SurfaceError> {
        let node_type = match kind {
            NodeKind::Text => NodeType::Text,
            NodeKind::Tag(tag) if is_valid_tag(tag) => NodeType::Element(tag.to_string()),
            NodeKind::Tag(tag) => return Err(SurfaceError::InvalidTagName(tag.to_string())),
        };
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(node_type));
        Ok(id)
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: &PropValue,
    ) -> Result<(), SurfaceError> {
        let data = self.node_mut(*node)?;
        if matches!(value, PropValue::Handler(_)) {
            data.flags.insert(NodeFlags::LISTENING);
        }
        match data.properties.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value.clone(),
            None => data.properties.push((name.to_string(), value.clone())),
        }
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), SurfaceError> {
        if self.node(*parent)?.flags.contains(NodeFlags::TEXT) {
            return Err(SurfaceError::NotAContainer(*parent));
        }
        if self.is_inclusive_ancestor(*child, *parent) {
            return Err(SurfaceError::HierarchyRequest(*child));
        }
        // Appending an attached node moves it.
        self.detach(*child)?;

        self.node_mut(*parent)?.children.push(*child);
        let node = self.node_mut(*child)?;
        node.parent = Some(*parent);
        node.flags.insert(NodeFlags::ATTACHED);
        Ok(())
    }

    fn clear_children(&mut self, container: &NodeId) -> Result<(), SurfaceError> {
        let children = std::mem::take(&mut self.node_mut(*container)?.children);
        for child in children {
            let node = self.node_mut(child)?;
            node.parent = None;
            node.flags.remove(NodeFlags::ATTACHED);
        }
        Ok(())
    }
}

// =============================================================================
// Event Dispatch
// =============================================================================

impl Renderer<MemorySurface> {
    /// Run the handler stored under `event` on `node`, as a user interaction would.
    ///
    /// The surface is not borrowed while the handler runs, so handlers may
    /// call state setters. Returns `Ok(false)` when there is no such handler.
    pub fn dispatch(&self, node: NodeId, event: &str) -> Result<bool, RenderError> {
        let handler = self.surface().handler(node, event);
        match handler {
            Some(handler) => {
                tracing::trace!(%node, event, "dispatching event");
                handler.call()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
