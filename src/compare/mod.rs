//! Two-slot version selection for side-by-side comparison.
//!
//! The selector walks through three phases as versions are toggled:
//!
//! ```text
//! Idle --toggle--> OneSelected --toggle--> TwoSelected
//!   ^                 |     ^                  |
//!   +----toggle-------+     +------toggle------+
//! ```
//!
//! A separate `comparing` flag can only be raised from `TwoSelected` and is
//! dropped as soon as either selection is removed. Invalid operations are
//! ignored rather than reported as errors.

use crate::history::{PromptVersion, VersionHistory};
use serde::{Deserialize, Serialize};
use tracing::debug;


/// Maximum number of versions that can be selected at once.
pub const MAX_SELECTED: usize = 2;

/// Selection phase derived from the number of selected versions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    Idle,
    OneSelected,
    TwoSelected,
}

/// What a call to [`ComparisonSelector::toggle`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The version was added to the selection.
    Selected,
    /// The version was removed from the selection.
    Deselected,
    /// Nothing changed: the id is not part of the history.
    UnknownVersion,
    /// Nothing changed: two other versions are already selected.
    SelectionFull,
}

/// Selection owned by the caller between interactions.
///
/// This is plain data so the CLI can persist it per prompt; all transitions
/// go through [`ComparisonSelector`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    /// Selected version ids in the order they were picked.
    #[serde(default)]
    pub selected: Vec<String>,

    /// Whether the comparison view is active.
    #[serde(default)]
    pub comparing: bool,
}

impl SelectionState {
    /// Phase implied by the selection count.
    pub fn phase(&self) -> SelectionPhase {
        match self.selected.len() {
            0 => SelectionPhase::Idle,
            1 => SelectionPhase::OneSelected,
            _ => SelectionPhase::TwoSelected,
        }
    }
}

/// The two versions chosen for display, newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComparisonPair<'h> {
    pub newer: &'h PromptVersion,
    pub older: &'h PromptVersion,
}

/// Selection machine bound to one version history.
#[derive(Debug)]
pub struct ComparisonSelector<'h> {
    history: &'h VersionHistory,
    state: SelectionState,
}

impl<'h> ComparisonSelector<'h> {
    /// Start with nothing selected.
    pub fn new(history: &'h VersionHistory) -> Self {
        Self {
            history,
            state: SelectionState::default(),
        }
    }

    /// Resume from a saved state.
    ///
    /// Ids the history does not contain are dropped, duplicates collapse, and
    /// at most [`MAX_SELECTED`] ids are kept. `comparing` survives only if two
    /// versions remain selected.
    pub fn restore(history: &'h VersionHistory, saved: SelectionState) -> Self {
        let mut selector = Self::new(history);
        for id in &saved.selected {
            selector.toggle_select_only(id);
        }
        if saved.comparing {
            selector.start_comparison();
        }
        debug!(
            kept = selector.state.selected.len(),
            saved = saved.selected.len(),
            "restore: selection reconciled with history"
        );
        selector
    }

    fn toggle_select_only(&mut self, id: &str) {
        if let Some(canonical) = self.canonical_id(id)
            && !self.state.selected.contains(&canonical)
            && self.state.selected.len() < MAX_SELECTED
        {
            self.state.selected.push(canonical);
        }
    }

    fn canonical_id(&self, id: &str) -> Option<String> {
        self.history.get_by_id(id).map(|v| v.id.clone())
    }

    /// Select or deselect a version.
    pub fn toggle(&mut self, id: &str) -> ToggleOutcome {
        let Some(canonical) = self.canonical_id(id) else {
            debug!(%id, "toggle: id not in history, ignoring");
            return ToggleOutcome::UnknownVersion;
        };

        if let Some(pos) = self.state.selected.iter().position(|s| *s == canonical) {
            self.state.selected.remove(pos);
            self.state.comparing = false;
            return ToggleOutcome::Deselected;
        }

        if self.state.selected.len() >= MAX_SELECTED {
            debug!(%id, "toggle: selection full, ignoring");
            return ToggleOutcome::SelectionFull;
        }

        self.state.selected.push(canonical);
        ToggleOutcome::Selected
    }

    /// Enter comparison mode. Returns `false` unless two versions are selected.
    pub fn start_comparison(&mut self) -> bool {
        if self.phase() != SelectionPhase::TwoSelected {
            return false;
        }
        self.state.comparing = true;
        true
    }

    /// Clear the selection and leave comparison mode.
    pub fn cancel_comparison(&mut self) {
        self.state = SelectionState::default();
    }

    pub fn phase(&self) -> SelectionPhase {
        self.state.phase()
    }

    pub fn is_comparing(&self) -> bool {
        self.state.comparing
    }

    /// Selected ids in selection order.
    pub fn selected(&self) -> &[String] {
        &self.state.selected
    }

    /// The selected pair ordered by version number, newest first.
    pub fn comparison_pair(&self) -> Option<ComparisonPair<'h>> {
        let [a, b] = self.state.selected.as_slice() else {
            return None;
        };
        let history: &'h VersionHistory = self.history;
        let a = history.get_by_id(a)?;
        let b = history.get_by_id(b)?;

        if a.version_number >= b.version_number {
            Some(ComparisonPair { newer: a, older: b })
        } else {
            Some(ComparisonPair { newer: b, older: a })
        }
    }

    /// Current state, for persisting between interactions.
    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn into_state(self) -> SelectionState {
        self.state
    }
}
