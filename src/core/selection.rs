//! # Selection Model
//!
//! The candidate list, the cursor, and which rows are checked.
//!
//! ```text
//! Selection
//! ├── candidates: Vec<Candidate>   // source order, fixed once loaded
//! ├── cursor: usize                // < candidates.len() when non-empty
//! ├── selected: BTreeSet<usize>    // indices into candidates
//! └── loaded: bool                 // source has answered
//! ```
//!
//! Every operation consumes the model and returns the next one, so a
//! transition can never half-apply.
//!
//! Selection is keyed by index, not by identifier. That is only sound because
//! the list is loaded exactly once per session; if the list could ever be
//! refreshed, `selected` has to be re-keyed by `Candidate::id`.

use std::collections::{BTreeSet, HashSet};

/// A selectable Spot instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: String,
    /// Human-readable name; empty when the instance has none.
    pub label: String,
}

impl Candidate {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    candidates: Vec<Candidate>,
    cursor: usize,
    selected: BTreeSet<usize>,
    loaded: bool,
}

impl Selection {
    /// Populate the model from a source response. Resets cursor and selection.
    pub fn loaded(candidates: Vec<Candidate>) -> Self {
        Self {
            candidates,
            cursor: 0,
            selected: BTreeSet::new(),
            loaded: true,
        }
    }

    pub fn move_up(mut self) -> Self {
        self.cursor = self.cursor.saturating_sub(1);
        self
    }

    pub fn move_down(mut self) -> Self {
        if let Some(last) = self.candidates.len().checked_sub(1) {
            self.cursor = (self.cursor + 1).min(last);
        }
        self
    }

    pub fn toggle(mut self) -> Self {
        if self.candidates.is_empty() {
            return self;
        }
        if !self.selected.remove(&self.cursor) {
            self.selected.insert(self.cursor);
        }
        self
    }

    /// Identifiers of every checked row. Order carries no meaning.
    pub fn confirmed(&self) -> HashSet<String> {
        self.selected
            .iter()
            .filter_map(|&i| self.candidates.get(i))
            .map(|c| c.id.clone())
            .collect()
    }

    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected.contains(&index)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}
