//! Render session - mounting a root element and re-rendering it.
//!
//! A [`Renderer`] owns the output surface, the state store and, once the
//! first pass completes, the render root (`element` + `container`). Every
//! state change runs the same full pass against that root:
//!
//! 1. clear the container
//! 2. rewind the slot cursor
//! 3. convert the root element (invoking every component again)
//! 4. append the new node to the container
//!
//! There is no diffing. Old nodes are dropped from the container and new
//! ones take their place.
//!
//! # Example
//!
//! ```ignore
//! use spark_element::{MemorySurface, Renderer};
//!
//! let renderer = Renderer::new(MemorySurface::new());
//! let body = renderer.surface().body();
//! renderer.render(app(), body)?;
//!
//! // Click the button under the root div.
//! let div = renderer.surface().children(body)[0];
//! let button = renderer.surface().children(div)[1];
//! renderer.dispatch(button, "onclick")?;
//! ```

use std::any::Any;
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::element::Element;
use crate::error::RenderError;
use crate::state::{RenderContext, StateHost, StateStore};
use crate::surface::Surface;

use super::materialize::create_node;

// =============================================================================
// Session State
// =============================================================================

/// What a resynthesis pass re-renders.
struct RenderRoot<N> {
    element: Element,
    container: N,
}

struct Session<S: Surface> {
    surface: S,
    store: StateStore,
    root: Option<RenderRoot<S::Node>>,
    passes: u64,
    /// Weak handle to this session, given to every setter.
    host: Weak<dyn StateHost>,
}

impl<S: Surface> Session<S> {
    fn resynthesize(&mut self) -> Result<(), RenderError> {
        let Session {
            surface,
            store,
            root,
            passes,
            host,
        } = self;
        let root = root.as_ref().ok_or(RenderError::NotMounted)?;
        run_pass(surface, store, host, *passes, &root.element, &root.container)?;
        *passes += 1;
        Ok(())
    }
}

impl<S: Surface + 'static> StateHost for RefCell<Session<S>> {
    fn set_slot(&self, index: usize, value: Box<dyn Any>) -> Result<(), RenderError> {
        let mut session = self.try_borrow_mut().map_err(|_| RenderError::Reentrant)?;
        // Rejected writes leave the slot untouched.
        if session.root.is_none() {
            return Err(RenderError::NotMounted);
        }
        session.store.write(index, value);
        session.store.begin_pass();
        tracing::debug!(index, "state changed, resynthesizing");
        session.resynthesize()
    }
}

fn run_pass<S: Surface>(
    surface: &mut S,
    store: &mut StateStore,
    host: &Weak<dyn StateHost>,
    pass: u64,
    element: &Element,
    container: &S::Node,
) -> Result<(), RenderError> {
    let _span = tracing::debug_span!("render_pass", pass).entered();

    surface.clear_children(container).map_err(RenderError::surface)?;
    store.begin_pass();

    let mut cx = RenderContext::new(store, host);
    let node = create_node(surface, &mut cx, element)?;
    surface.append_child(container, &node).map_err(RenderError::surface)?;

    tracing::debug!(slots = store.len(), "render pass complete");
    Ok(())
}

// =============================================================================
// Renderer
// =============================================================================

/// A render session bound to one output surface.
pub struct Renderer<S: Surface> {
    session: Rc<RefCell<Session<S>>>,
}

impl<S: Surface + 'static> Renderer<S> {
    pub fn new(surface: S) -> Self {
        let session = Rc::new_cyclic(|weak: &Weak<RefCell<Session<S>>>| {
            let host: Weak<dyn StateHost> = weak.clone();
            RefCell::new(Session {
                surface,
                store: StateStore::new(),
                root: None,
                passes: 0,
                host,
            })
        });
        Self { session }
    }

    /// Render `element` into `container`, replacing whatever it held.
    ///
    /// On success the pair becomes the render root that state changes
    /// re-render. On failure the pass stops where it failed: the container
    /// has already been cleared and may stay empty, and the previous root
    /// (if any) is kept.
    pub fn render(&self, element: Element, container: S::Node) -> Result<(), RenderError> {
        let mut session = self.session.try_borrow_mut().map_err(|_| RenderError::Reentrant)?;
        let Session {
            surface,
            store,
            root,
            passes,
            host,
        } = &mut *session;

        run_pass(surface, store, host, *passes, &element, &container)?;
        *passes += 1;
        *root = Some(RenderRoot { element, container });
        Ok(())
    }

    /// Re-run a full pass against the mounted root.
    pub fn rerender(&self) -> Result<(), RenderError> {
        let mut session = self.session.try_borrow_mut().map_err(|_| RenderError::Reentrant)?;
        session.resynthesize()
    }

    /// Borrow the surface.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a render pass.
    pub fn surface(&self) -> Ref<'_, S> {
        Ref::map(self.session.borrow(), |s| &s.surface)
    }

    /// Mutably borrow the surface, e.g. to create containers before mounting.
    ///
    /// # Panics
    ///
    /// Panics if called from inside a render pass.
    pub fn surface_mut(&self) -> RefMut<'_, S> {
        RefMut::map(self.session.borrow_mut(), |s| &mut s.surface)
    }

    /// Completed render passes, the initial one included.
    pub fn pass_count(&self) -> u64 {
        self.session.borrow().passes
    }

    /// State slots allocated so far.
    pub fn slot_count(&self) -> usize {
        self.session.borrow().store.len()
    }

    pub fn is_mounted(&self) -> bool {
        self.session.borrow().root.is_some()
    }

    /// Container of the mounted root.
    pub fn container(&self) -> Option<S::Node> {
        self.session.borrow().root.as_ref().map(|r| r.container.clone())
    }
}

impl<S: Surface> fmt::Debug for Renderer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.session.try_borrow() {
            Ok(session) => f
                .debug_struct("Renderer")
                .field("passes", &session.passes)
                .field("store", &session.store)
                .field("mounted", &session.root.is_some())
                .finish(),
            Err(_) => f.debug_struct("Renderer").finish_non_exhaustive(),
        }
    }
}
