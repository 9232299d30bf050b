//! # spark-element
//!
//! Minimal declarative element renderer.
//!
//! Describe a UI as a tree of [`Element`]s, render it into an output
//! [`Surface`], and let components keep local state with
//! [`RenderContext::use_state`]. Any state change re-runs every component
//! from the root and rebuilds the whole surface subtree. There is no
//! diffing, no keys and no batching.
//!
//! ## Architecture
//!
//! ```text
//! create_element ──► Element tree ──► Renderer::render ──► Surface nodes
//!                                        ▲                     │
//!                                        └── SetState::set ◄───┘ (event handler)
//! ```
//!
//! ## Modules
//!
//! - [`element`] - Element model (`create_element`, `create_text_element`, props)
//! - [`state`] - Positional state slots and setters
//! - [`pipeline`] - Materializer and render session
//! - [`surface`] - Output surface trait and an in-memory implementation
//!
//! ## Tracing
//!
//! Render passes, node creation and state changes are reported through
//! [`tracing`]. The crate never installs a subscriber.

pub mod element;
pub mod error;
pub mod pipeline;
pub mod state;
pub mod surface;

pub use element::{
    Child, Component, Element, EventHandler, Kind, PropValue, Props, create_element,
    create_text_element,
};
pub use error::{RenderError, SurfaceError};
pub use pipeline::Renderer;
pub use state::{RenderContext, SetState, StateStore};
pub use surface::memory::{MemorySurface, NodeFlags, NodeId, NodeType};
pub use surface::{NodeKind, Surface};
