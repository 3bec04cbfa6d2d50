//! Bulk-action selection
//!
//! Tracks which pending chunks the reviewer has marked. One store per review
//! session; it is only written by its own operations and by the workflow
//! controller after a successful mutation.

use std::collections::HashSet;

/// State of the "select all" control
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectAllState {
    Checked,
    Indeterminate,
    Unchecked,
}

#[derive(Debug, Clone, Default)]
pub struct SelectionStore {
    selected: HashSet<String>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or remove a single chunk. Callers only pass pending ids.
    pub fn toggle_one(&mut self, chunk_id: &str, selected: bool) {
        if selected {
            self.selected.insert(chunk_id.to_string());
        } else {
            self.selected.remove(chunk_id);
        }
    }

    /// Replace the selection with exactly `pending_ids`, or empty it.
    pub fn toggle_all<S: AsRef<str>>(&mut self, select_all: bool, pending_ids: &[S]) {
        self.selected.clear();
        if select_all {
            self.selected
                .extend(pending_ids.iter().map(|id| id.as_ref().to_string()));
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn remove(&mut self, chunk_id: &str) {
        self.selected.remove(chunk_id);
    }

    /// Drop ids that are no longer pending in the current snapshot
    pub fn retain_pending<S: AsRef<str>>(&mut self, pending_ids: &[S]) {
        let pending: HashSet<&str> = pending_ids.iter().map(|id| id.as_ref()).collect();
        self.selected.retain(|id| pending.contains(id.as_str()));
    }

    pub fn is_selected(&self, chunk_id: &str) -> bool {
        self.selected.contains(chunk_id)
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn all_selected<S: AsRef<str>>(&self, pending_ids: &[S]) -> bool {
        !pending_ids.is_empty() && pending_ids.iter().all(|id| self.is_selected(id.as_ref()))
    }

    pub fn some_selected<S: AsRef<str>>(&self, pending_ids: &[S]) -> bool {
        pending_ids.iter().any(|id| self.is_selected(id.as_ref()))
    }

    pub fn select_all_state<S: AsRef<str>>(&self, pending_ids: &[S]) -> SelectAllState {
        if self.all_selected(pending_ids) {
            SelectAllState::Checked
        } else if self.some_selected(pending_ids) {
            SelectAllState::Indeterminate
        } else {
            SelectAllState::Unchecked
        }
    }

    /// Selected ids in the order they appear in `ordered_ids`
    pub fn selected_in_order<S: AsRef<str>>(&self, ordered_ids: &[S]) -> Vec<String> {
        ordered_ids
            .iter()
            .map(|id| id.as_ref())
            .filter(|id| self.is_selected(id))
            .map(String::from)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PENDING: [&str; 3] = ["doc-a", "doc-b", "doc-c"];

    #[test]
    fn test_toggle_all_round_trip() {
        let mut store = SelectionStore::new();

        store.toggle_all(true, &PENDING);
        assert!(store.all_selected(&PENDING));
        assert!(store.some_selected(&PENDING));
        assert_eq!(store.select_all_state(&PENDING), SelectAllState::Checked);

        store.toggle_all(false, &PENDING);
        assert!(!store.all_selected(&PENDING));
        assert!(!store.some_selected(&PENDING));
        assert_eq!(store.select_all_state(&PENDING), SelectAllState::Unchecked);
    }

    #[test]
    fn test_toggle_all_replaces_stale_ids() {
        let mut store = SelectionStore::new();
        store.toggle_one("old-chunk", true);

        store.toggle_all(true, &PENDING);
        assert!(!store.is_selected("old-chunk"));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_partial_selection_is_indeterminate() {
        let mut store = SelectionStore::new();
        store.toggle_one("doc-b", true);

        assert!(!store.all_selected(&PENDING));
        assert!(store.some_selected(&PENDING));
        assert_eq!(store.select_all_state(&PENDING), SelectAllState::Indeterminate);

        store.toggle_one("doc-b", false);
        assert!(store.is_empty());
    }

    #[test]
    fn test_empty_pending_is_never_all_selected() {
        let store = SelectionStore::new();
        let none: [&str; 0] = [];
        assert!(!store.all_selected(&none));
        assert_eq!(store.select_all_state(&none), SelectAllState::Unchecked);
    }

    #[test]
    fn test_retain_pending() {
        let mut store = SelectionStore::new();
        store.toggle_all(true, &PENDING);

        store.retain_pending(&["doc-a", "doc-c", "doc-d"]);
        assert!(store.is_selected("doc-a"));
        assert!(!store.is_selected("doc-b"));
        assert!(!store.is_selected("doc-d"));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_selected_in_order() {
        let mut store = SelectionStore::new();
        store.toggle_one("doc-c", true);
        store.toggle_one("doc-a", true);

        assert_eq!(store.selected_in_order(&PENDING), vec!["doc-a", "doc-c"]);
    }
}
