//! Row counts of rendered array fields.
use indexmap::IndexMap;

use crate::codec::Identifier;

/// Number of rows an array field currently renders. Never below one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepeatState {
    count: usize,
}

impl Default for RepeatState {
    fn default() -> Self {
        Self { count: 1 }
    }
}

impl RepeatState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn add(&mut self) {
        self.count += 1;
    }

    /// Returns false when already at one row (the count is left as is).
    pub fn remove(&mut self) -> bool {
        if self.count > 1 {
            self.count -= 1;
            true
        } else {
            false
        }
    }
}

/// Every array field's [`RepeatState`] in one form, keyed by the array's
/// identifier (`tags`, `things-1.tags`, ...). Entries appear on first render.
#[derive(Debug, Clone, Default)]
pub struct RepeatStates {
    states: IndexMap<Identifier, RepeatState>,
}

impl RepeatStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, array: &str) -> Option<RepeatState> {
        self.states.get(array).copied()
    }

    pub fn count(&mut self, array: &Identifier) -> usize {
        self.states.entry(array.clone()).or_default().count()
    }

    pub fn add(&mut self, array: &Identifier) -> usize {
        let state = self.states.entry(array.clone()).or_default();
        state.add();
        tracing::debug!(array = %array, rows = state.count(), "row added");
        state.count()
    }

    pub fn remove(&mut self, array: &Identifier) -> usize {
        let state = self.states.entry(array.clone()).or_default();
        if !state.remove() {
            tracing::warn!(array = %array, "remove ignored: array keeps at least one row");
            return state.count();
        }
        let count = state.count();
        tracing::debug!(array = %array, rows = count, "row removed");

        // the vacated row takes its nested arrays with it
        let vacated = array.index(count);
        self.states.retain(|id, _| id != &vacated && !vacated.is_ancestor_of(id.as_str()));
        count
    }

    /// Force a row count; anything below one is raised to one.
    pub fn set(&mut self, array: &Identifier, count: usize) {
        self.states.insert(array.clone(), RepeatState { count: count.max(1) });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_and_remove_clamp_at_one() {
        let mut state = RepeatState::new();
        assert_eq!(state.count(), 1);
        assert!(!state.remove());
        assert_eq!(state.count(), 1);
        state.add();
        state.add();
        assert_eq!(state.count(), 3);
        assert!(state.remove());
        assert_eq!(state.count(), 2);
    }

    #[test]
    fn removing_a_row_drops_arrays_nested_in_it() {
        let things = Identifier::root("things");
        let first_tags = things.index(0).field("tags");
        let second_tags = things.index(1).field("tags");

        let mut states = RepeatStates::new();
        states.add(&things);
        states.set(&first_tags, 3);
        states.set(&second_tags, 2);

        assert_eq!(states.remove(&things), 1);
        assert_eq!(states.get("things-0.tags"), Some(RepeatState { count: 3 }));
        assert_eq!(states.get("things-1.tags"), None);
    }

    #[test]
    fn set_raises_zero_to_one() {
        let tags = Identifier::root("tags");
        let mut states = RepeatStates::new();
        states.set(&tags, 0);
        assert_eq!(states.count(&tags), 1);
    }
}
