//! State Store - positional slots retained across render passes.
//!
//! Slot identity is the order of `use_state` calls inside a pass. Nothing
//! checks that the order is stable between passes: a component that calls
//! `use_state` conditionally will read another slot's value. Slots are never
//! removed.

use std::any::Any;
use std::fmt;

/// Slots and the cursor of the pass in progress.
#[derive(Default)]
pub struct StateStore {
    slots: Vec<Box<dyn Any>>,
    cursor: usize,
}

impl StateStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewind the cursor for a new pass.
    pub fn begin_pass(&mut self) {
        self.cursor = 0;
    }

    /// Index the next `use_state` call will get.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Read the retained value at `index`, if it holds a `T`.
    pub fn get<T: Clone + 'static>(&self, index: usize) -> Option<T> {
        self.slots.get(index)?.downcast_ref::<T>().cloned()
    }

    /// Claim the slot under the cursor and advance it by one.
    ///
    /// A new slot starts at `initial`. An existing slot keeps its value and
    /// `initial` is ignored, unless it holds another type: then it restarts
    /// at `initial`.
    pub(crate) fn claim<T: Clone + 'static>(&mut self, initial: T) -> (usize, T) {
        let index = self.cursor;
        self.cursor += 1;

        let Some(slot) = self.slots.get_mut(index) else {
            tracing::trace!(index, "allocating state slot");
            self.slots.push(Box::new(initial.clone()));
            return (index, initial);
        };

        if let Some(value) = slot.downcast_ref::<T>() {
            return (index, value.clone());
        }

        tracing::warn!(
            index,
            requested = std::any::type_name::<T>(),
            "state slot holds a different type; use_state call order changed between passes"
        );
        *slot = Box::new(initial.clone());
        (index, initial)
    }

    /// Overwrite a slot. Writes past the end are dropped.
    pub(crate) fn write(&mut self, index: usize, value: Box<dyn Any>) {
        match self.slots.get_mut(index) {
            Some(slot) => *slot = value,
            None => tracing::debug!(index, "write to unallocated state slot ignored"),
        }
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("slots", &self.slots.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_claim_uses_initial() {
        let mut store = StateStore::new();
        assert_eq!(store.claim(7), (0, 7));
        assert_eq!(store.claim("x"), (1, "x"));
        assert_eq!(store.len(), 2);
        assert_eq!(store.cursor(), 2);
    }

    #[test]
    fn test_existing_slot_ignores_initial() {
        let mut store = StateStore::new();
        store.claim(1);
        store.write(0, Box::new(5));

        store.begin_pass();
        assert_eq!(store.claim(1), (0, 5));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_same_type_misalignment_is_silent() {
        let mut store = StateStore::new();
        store.claim(10);
        store.claim(20);

        // Second pass skips the first call: it reads the first slot's value.
        store.begin_pass();
        assert_eq!(store.claim(0), (0, 10));
    }

    #[test]
    fn test_type_mismatch_restarts_slot() {
        let mut store = StateStore::new();
        store.claim(3_i32);

        store.begin_pass();
        assert_eq!(store.claim(String::from("s")), (0, String::from("s")));
        assert_eq!(store.get::<String>(0), Some(String::from("s")));
        assert_eq!(store.get::<i32>(0), None);
    }

    #[test]
    fn test_write_past_end_is_dropped() {
        let mut store = StateStore::new();
        store.write(3, Box::new(1));
        assert!(store.is_empty());
    }
}
