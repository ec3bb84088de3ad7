// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Linear undo/redo history.
//!
//! A single action log with a cursor pointing at the most recently applied
//! action. Recording truncates anything after the cursor, so a new edit
//! after an undo discards the redo branch. The log is bounded; once full,
//! the oldest action is evicted.
//!
//! The manager only stores snapshots. Applying an action (or its inverse)
//! to the feature store is the caller's job.

use crate::model::EditorFeature;
use crate::settings;
use chrono::{DateTime, Utc};

/// What an action did to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Create,
    Update,
    Delete,
}

/// One undoable action
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryAction {
    pub kind: ActionKind,
    /// Created/deleted features, or the post-update state
    pub features: Vec<EditorFeature>,
    /// Pre-update state (updates only)
    pub previous_features: Option<Vec<EditorFeature>>,
    /// Store slots of the features an undo puts back: the deleted features,
    /// or the pre-update state. Parallel to that list.
    pub slots: Vec<usize>,
    pub timestamp: DateTime<Utc>,
}

impl HistoryAction {
    fn new(
        kind: ActionKind,
        features: Vec<EditorFeature>,
        previous_features: Option<Vec<EditorFeature>>,
        slots: Vec<usize>,
    ) -> Self {
        Self {
            kind,
            features,
            previous_features,
            slots,
            timestamp: Utc::now(),
        }
    }

    /// Features an undo puts back, paired with their store slots
    ///
    /// Sorted by slot so inserting them in order rebuilds the original
    /// layout.
    pub fn restore_order(&self) -> Vec<(usize, &EditorFeature)> {
        let restored = match self.kind {
            ActionKind::Create => return Vec::new(),
            ActionKind::Delete => self.features.as_slice(),
            ActionKind::Update => self.previous_features.as_deref().unwrap_or_default(),
        };
        let mut placed: Vec<(usize, &EditorFeature)> = self
            .slots
            .iter()
            .copied()
            .chain(std::iter::repeat(usize::MAX))
            .zip(restored)
            .collect();
        placed.sort_by_key(|(slot, _)| *slot);
        placed
    }
}

#[derive(Debug, Clone)]
pub struct HistoryManager {
    actions: Vec<HistoryAction>,
    /// Index of the last applied action; -1 when nothing is applied
    cursor: isize,
    max_size: usize,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_max_size(settings::history::MAX_SIZE)
    }

    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            actions: Vec::new(),
            cursor: -1,
            max_size: max_size.max(1),
        }
    }

    pub fn record_create(&mut self, features: Vec<EditorFeature>) {
        self.push(HistoryAction::new(ActionKind::Create, features, None, Vec::new()));
    }

    /// `slots` are the store slots `previous` occupied before the update
    pub fn record_update(
        &mut self,
        features: Vec<EditorFeature>,
        previous: Vec<EditorFeature>,
        slots: Vec<usize>,
    ) {
        self.push(HistoryAction::new(
            ActionKind::Update,
            features,
            Some(previous),
            slots,
        ));
    }

    /// `slots` are the store slots `features` occupied before the delete
    pub fn record_delete(&mut self, features: Vec<EditorFeature>, slots: Vec<usize>) {
        self.push(HistoryAction::new(ActionKind::Delete, features, None, slots));
    }

    /// Step back, returning the action whose inverse the caller must apply
    pub fn undo(&mut self) -> Option<HistoryAction> {
        if self.cursor < 0 {
            return None;
        }
        let action = self.actions[self.cursor as usize].clone();
        self.cursor -= 1;
        Some(action)
    }

    /// Step forward, returning the action the caller must re-apply
    pub fn redo(&mut self) -> Option<HistoryAction> {
        let next = self.cursor + 1;
        if next as usize >= self.actions.len() {
            return None;
        }
        self.cursor = next;
        Some(self.actions[next as usize].clone())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor >= 0
    }

    pub fn can_redo(&self) -> bool {
        ((self.cursor + 1) as usize) < self.actions.len()
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn cursor(&self) -> isize {
        self.cursor
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.actions.clear();
        self.cursor = -1;
    }

    fn push(&mut self, action: HistoryAction) {
        self.actions.truncate((self.cursor + 1) as usize);
        tracing::debug!(
            "[history] record {:?} ({} features), cursor was {}",
            action.kind,
            action.features.len(),
            self.cursor
        );
        self.actions.push(action);
        self.cursor += 1;

        if self.actions.len() > self.max_size {
            self.actions.remove(0);
            self.cursor -= 1;
        }
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
