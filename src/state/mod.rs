//! Local state for components.
//!
//! Components are plain functions called again on every pass. To keep a value
//! between passes they call [`RenderContext::use_state`], which hands out the
//! next positional slot of the session's [`StateStore`] and a [`SetState`]
//! that writes the slot and re-renders from the root.
//!
//! # Example
//!
//! ```ignore
//! let counter = Component::new(|_props, cx| {
//!     let (count, set_count) = cx.use_state(0);
//!     let onclick = EventHandler::new(move || set_count.set(count + 1));
//!     create_element("button", Some(Props::new().with("onclick", onclick)), children![count])
//! });
//! ```
//!
//! Call `use_state` the same number of times, in the same order, on every
//! pass. Slots are matched by position only.

mod store;

use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::rc::Weak;

use crate::error::RenderError;

pub use store::StateStore;

// =============================================================================
// State Host
// =============================================================================

/// The session side of a setter: write a slot, then resynthesize.
pub(crate) trait StateHost {
    fn set_slot(&self, index: usize, value: Box<dyn Any>) -> Result<(), RenderError>;
}

// =============================================================================
// Render Context
// =============================================================================

/// Handed to every component invocation during a pass.
pub struct RenderContext<'a> {
    store: &'a mut StateStore,
    host: &'a Weak<dyn StateHost>,
}

impl<'a> RenderContext<'a> {
    pub(crate) fn new(store: &'a mut StateStore, host: &'a Weak<dyn StateHost>) -> Self {
        Self { store, host }
    }

    /// Claim the next state slot.
    ///
    /// Returns the retained value (or `initial` on the first pass) and a
    /// setter for the slot. The cursor advances by one on every call.
    pub fn use_state<T: Clone + 'static>(&mut self, initial: T) -> (T, SetState<T>) {
        let (index, value) = self.store.claim(initial);
        let setter = SetState {
            index,
            host: self.host.clone(),
            _marker: PhantomData,
        };
        (value, setter)
    }

    /// Slot index the next `use_state` call will get.
    pub fn cursor(&self) -> usize {
        self.store.cursor()
    }
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext").field("store", &self.store).finish()
    }
}

// =============================================================================
// Setter
// =============================================================================

/// Writes one state slot and triggers a full re-render.
pub struct SetState<T> {
    index: usize,
    host: Weak<dyn StateHost>,
    _marker: PhantomData<fn(T)>,
}

impl<T: Clone + 'static> SetState<T> {
    /// Store `value` and synchronously re-render from the mounted root.
    ///
    /// Always re-renders, even when `value` equals the current value.
    ///
    /// # Errors
    ///
    /// - [`RenderError::Reentrant`] when called while a pass is running
    /// - [`RenderError::NotMounted`] when no pass has completed yet
    /// - [`RenderError::SessionDropped`] when the renderer is gone
    /// - any error the re-render itself raises
    pub fn set(&self, value: T) -> Result<(), RenderError> {
        let host = self.host.upgrade().ok_or(RenderError::SessionDropped)?;
        host.set_slot(self.index, Box::new(value))
    }

    /// Position of the slot this setter writes.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl<T> Clone for SetState<T> {
    fn clone(&self) -> Self {
        Self {
            index: self.index,
            host: self.host.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for SetState<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SetState").field("index", &self.index).finish()
    }
}
