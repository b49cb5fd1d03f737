//! Pane registry and its reconciliation with the layout tree

use std::collections::{HashMap, HashSet};

use super::entry::{ContentRequest, PaneEntry};
use super::error::{RegistryError, RegistryResult};
use crate::chat::ChatView;
use crate::layout::{LayoutTree, PaneId};

/// Changes made by one [`PaneRegistry::sync`] call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Entries deleted because their leaf left the tree
    pub removed: Vec<PaneId>,
    /// Empty entries created for new leaves, in layout order
    pub created: Vec<PaneId>,
}

impl SyncReport {
    /// Returns true if the registry already matched the tree.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.removed.is_empty() && self.created.is_empty()
    }
}

/// Content of every pane, keyed by pane id.
///
/// After [`Self::sync`] the key set equals the leaf set of the tree it was
/// synced with.
#[derive(Debug, Clone, Default)]
pub struct PaneRegistry {
    entries: HashMap<PaneId, PaneEntry>,
    next_sequence: u64,
}

impl PaneRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reconciles the registry with the tree's leaves.
    ///
    /// Deletes entries whose pane is not a leaf of `tree` and creates empty
    /// entries for leaves without one. Existing entries are left untouched,
    /// so a second call with the same tree changes nothing.
    pub fn sync(&mut self, tree: &LayoutTree) -> SyncReport {
        let leaves = tree.pane_ids();
        let live: HashSet<PaneId> = leaves.iter().copied().collect();

        let mut removed: Vec<PaneId> = self
            .entries
            .keys()
            .filter(|id| !live.contains(id))
            .copied()
            .collect();
        removed.sort();
        for id in &removed {
            self.entries.remove(id);
        }

        let mut created = Vec::new();
        for id in leaves {
            if !self.entries.contains_key(&id) {
                self.insert_empty(id);
                created.push(id);
            }
        }

        let report = SyncReport { removed, created };
        if !report.is_noop() {
            tracing::debug!(
                removed = report.removed.len(),
                created = report.created.len(),
                "Registry synced with layout"
            );
        }
        report
    }

    fn insert_empty(&mut self, id: PaneId) {
        let entry = PaneEntry::empty(self.next_sequence);
        self.next_sequence += 1;
        self.entries.insert(id, entry);
    }

    /// Returns the entry for a pane.
    #[must_use]
    pub fn get(&self, id: PaneId) -> Option<&PaneEntry> {
        self.entries.get(&id)
    }

    /// Returns the entry for a pane mutably.
    pub fn get_mut(&mut self, id: PaneId) -> Option<&mut PaneEntry> {
        self.entries.get_mut(&id)
    }

    /// Returns true if the pane has an entry.
    #[must_use]
    pub fn contains(&self, id: PaneId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Returns the number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if there are no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns all pane ids in creation order.
    #[must_use]
    pub fn ids(&self) -> Vec<PaneId> {
        let mut ids: Vec<(u64, PaneId)> = self
            .entries
            .iter()
            .map(|(id, entry)| (entry.sequence, *id))
            .collect();
        ids.sort_unstable();
        ids.into_iter().map(|(_, id)| id).collect()
    }

    /// Returns the most recently created pane.
    #[must_use]
    pub fn most_recent(&self) -> Option<PaneId> {
        self.entries
            .iter()
            .max_by_key(|(_, entry)| entry.sequence)
            .map(|(id, _)| *id)
    }

    /// Points a pane at new content, resetting its view state.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownPane` if the pane has no entry.
    pub fn load(&mut self, id: PaneId, request: ContentRequest, window_size: usize) -> RegistryResult<&mut PaneEntry> {
        let entry = self
            .entries
            .get_mut(&id)
            .ok_or(RegistryError::UnknownPane(id))?;
        entry.load(request, window_size);
        Ok(entry)
    }

    /// Returns the chat transcript of a pane.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::UnknownPane` if the pane has no entry, or
    /// `RegistryError::NotAChatPane` if it shows other content.
    pub fn chat(&self, id: PaneId) -> RegistryResult<&ChatView> {
        self.entries
            .get(&id)
            .ok_or(RegistryError::UnknownPane(id))?
            .chat()
            .ok_or(RegistryError::NotAChatPane(id))
    }

    /// Returns the chat transcript of a pane mutably.
    ///
    /// # Errors
    ///
    /// Same as [`Self::chat`].
    pub fn chat_mut(&mut self, id: PaneId) -> RegistryResult<&mut ChatView> {
        self.entries
            .get_mut(&id)
            .ok_or(RegistryError::UnknownPane(id))?
            .chat_mut()
            .ok_or(RegistryError::NotAChatPane(id))
    }

    /// Iterates over all entries in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&PaneId, &PaneEntry)> {
        self.entries.iter()
    }
}
