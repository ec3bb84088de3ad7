// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Selection set and named selection groups.
//!
//! The selected ids live in an `Arc<BTreeSet<FeatureId>>` so the set can be
//! handed out as a cheap snapshot (for events and render passes) while the
//! manager keeps mutating its own copy. The `BTreeSet` gives deterministic
//! iteration order.

use crate::model::{EditorFeature, FeatureId, Position};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

/// A box in map coordinates, used for bounds selection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

impl SelectionBounds {
    /// Bounds spanning two corner positions in any order
    pub fn from_corners(a: Position, b: Position) -> Self {
        Self {
            north: a[1].max(b[1]),
            south: a[1].min(b[1]),
            east: a[0].max(b[0]),
            west: a[0].min(b[0]),
        }
    }

    pub fn contains(&self, p: Position) -> bool {
        p[0] >= self.west && p[0] <= self.east && p[1] >= self.south && p[1] <= self.north
    }
}

/// Ids accepted by select/deselect: one id or many
pub trait IntoIds {
    fn into_ids(self) -> Vec<FeatureId>;
}

impl IntoIds for FeatureId {
    fn into_ids(self) -> Vec<FeatureId> {
        vec![self]
    }
}

impl IntoIds for &FeatureId {
    fn into_ids(self) -> Vec<FeatureId> {
        vec![self.clone()]
    }
}

impl IntoIds for Vec<FeatureId> {
    fn into_ids(self) -> Vec<FeatureId> {
        self
    }
}

impl IntoIds for &[FeatureId] {
    fn into_ids(self) -> Vec<FeatureId> {
        self.to_vec()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SelectionManager {
    selected: Arc<BTreeSet<FeatureId>>,
    groups: HashMap<String, BTreeSet<FeatureId>>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_selected(&self, id: &FeatureId) -> bool {
        self.selected.contains(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FeatureId> {
        self.selected.iter()
    }

    /// Snapshot of the selected ids
    pub fn snapshot(&self) -> Arc<BTreeSet<FeatureId>> {
        Arc::clone(&self.selected)
    }

    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.selected.iter().cloned().collect()
    }

    /// Add ids to the selection; returns true if anything changed
    pub fn select(&mut self, ids: impl IntoIds) -> bool {
        let ids = ids.into_ids();
        if ids.iter().all(|id| self.selected.contains(id)) {
            return false;
        }
        Arc::make_mut(&mut self.selected).extend(ids);
        true
    }

    /// Remove ids from the selection; returns true if anything changed
    pub fn deselect(&mut self, ids: impl IntoIds) -> bool {
        let ids = ids.into_ids();
        if !ids.iter().any(|id| self.selected.contains(id)) {
            return false;
        }
        let set = Arc::make_mut(&mut self.selected);
        for id in &ids {
            set.remove(id);
        }
        true
    }

    /// Flip membership of a single id; returns whether it is now selected
    pub fn toggle_select(&mut self, id: &FeatureId) -> bool {
        let set = Arc::make_mut(&mut self.selected);
        if set.remove(id) {
            false
        } else {
            set.insert(id.clone());
            true
        }
    }

    /// Replace the selection; returns true if it changed
    pub fn set(&mut self, ids: impl IntoIds) -> bool {
        let next: BTreeSet<FeatureId> = ids.into_ids().into_iter().collect();
        if *self.selected == next {
            return false;
        }
        self.selected = Arc::new(next);
        true
    }

    /// Clear the selection; returns true if it was non-empty
    pub fn clear(&mut self) -> bool {
        if self.selected.is_empty() {
            return false;
        }
        self.selected = Arc::new(BTreeSet::new());
        true
    }

    /// Drop ids for which `keep` returns false (e.g. deleted features)
    pub fn retain(&mut self, mut keep: impl FnMut(&FeatureId) -> bool) -> bool {
        if self.selected.iter().all(&mut keep) {
            return false;
        }
        Arc::make_mut(&mut self.selected).retain(keep);
        true
    }

    /// Select every candidate with a vertex inside `bounds`
    ///
    /// Polygons are tested on their outer-ring vertices only, so a polygon
    /// that covers the whole box without a vertex inside it is not selected.
    /// Returns the ids that were matched.
    pub fn select_in_bounds<'a>(
        &mut self,
        candidates: impl IntoIterator<Item = &'a EditorFeature>,
        bounds: SelectionBounds,
    ) -> Vec<FeatureId> {
        let matched: Vec<FeatureId> = candidates
            .into_iter()
            .filter(|feature| {
                feature
                    .geometry
                    .selection_positions()
                    .into_iter()
                    .any(|p| bounds.contains(p))
            })
            .map(|feature| feature.id.clone())
            .collect();
        if !matched.is_empty() {
            self.select(matched.clone());
        }
        matched
    }

    // ===== GROUPS =====

    /// Store a named group of ids (replacing any group with that name)
    pub fn create_group(&mut self, group: impl Into<String>, ids: impl IntoIds) {
        self.groups
            .insert(group.into(), ids.into_ids().into_iter().collect());
    }

    pub fn remove_group(&mut self, group: &str) -> bool {
        self.groups.remove(group).is_some()
    }

    pub fn group(&self, group: &str) -> Option<&BTreeSet<FeatureId>> {
        self.groups.get(group)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Add a group's members to the current selection without clearing it
    pub fn select_group(&mut self, group: &str) -> bool {
        let Some(members) = self.groups.get(group) else {
            return false;
        };
        let members: Vec<FeatureId> = members.iter().cloned().collect();
        self.select(members)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Geometry;

    fn id(s: &str) -> FeatureId {
        FeatureId::new(s)
    }

    #[test]
    fn new_selection_is_empty() {
        let sel = SelectionManager::new();
        assert!(sel.is_empty());
        assert_eq!(sel.len(), 0);
    }

    #[test]
    fn select_single_and_many() {
        let mut sel = SelectionManager::new();
        assert!(sel.select(id("a")));
        assert!(sel.select(vec![id("b"), id("c")]));
        assert_eq!(sel.len(), 3);
        // Re-selecting is a no-op
        assert!(!sel.select(&id("a")));
    }

    #[test]
    fn deselect_nonexistent_is_noop() {
        let mut sel = SelectionManager::new();
        assert!(!sel.deselect(id("a")));
        sel.select(id("a"));
        assert!(sel.deselect(id("a")));
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_flips_membership() {
        let mut sel = SelectionManager::new();
        assert!(sel.toggle_select(&id("a")));
        assert!(sel.is_selected(&id("a")));
        assert!(!sel.toggle_select(&id("a")));
        assert!(!sel.is_selected(&id("a")));
    }

    #[test]
    fn snapshot_is_independent() {
        let mut sel = SelectionManager::new();
        sel.select(id("a"));
        let snap = sel.snapshot();
        sel.select(id("b"));

        assert!(!snap.contains(&id("b")));
        assert!(sel.is_selected(&id("b")));
    }

    #[test]
    fn bounds_selection_dispatches_on_geometry() {
        let features = vec![
            EditorFeature::with_id(id("pt"), Geometry::Point([1.0, 1.0])),
            EditorFeature::with_id(id("far"), Geometry::Point([50.0, 50.0])),
            EditorFeature::with_id(
                id("line"),
                Geometry::LineString(vec![[-5.0, -5.0], [1.5, 1.5]]),
            ),
        ];
        let mut sel = SelectionManager::new();
        let matched = sel.select_in_bounds(
            &features,
            SelectionBounds::from_corners([0.0, 0.0], [2.0, 2.0]),
        );
        assert_eq!(matched, vec![id("pt"), id("line")]);
        assert_eq!(sel.len(), 2);
    }

    /// Known boundary case: a polygon enclosing the whole box, with no
    /// outer-ring vertex inside it, is not picked up by bounds selection.
    #[test]
    fn enclosing_polygon_without_vertices_in_box_is_not_selected() {
        let big = EditorFeature::with_id(
            id("big"),
            Geometry::Polygon(vec![vec![
                [-10.0, -10.0],
                [10.0, -10.0],
                [10.0, 10.0],
                [-10.0, 10.0],
                [-10.0, -10.0],
            ]]),
        );
        let mut sel = SelectionManager::new();
        let matched = sel.select_in_bounds(
            [&big],
            SelectionBounds::from_corners([-1.0, -1.0], [1.0, 1.0]),
        );
        assert!(matched.is_empty());
        assert!(sel.is_empty());
    }

    #[test]
    fn groups_add_to_selection_without_clearing() {
        let mut sel = SelectionManager::new();
        sel.create_group("roads", vec![id("a"), id("b")]);
        sel.select(id("z"));

        assert!(sel.select_group("roads"));
        assert_eq!(sel.len(), 3);
        assert!(sel.is_selected(&id("z")));
        assert!(!sel.select_group("missing"));
    }

    #[test]
    fn retain_drops_missing_ids() {
        let mut sel = SelectionManager::new();
        sel.select(vec![id("a"), id("b")]);
        assert!(sel.retain(|i| i.as_str() == "a"));
        assert_eq!(sel.selected_ids(), vec![id("a")]);
        assert!(!sel.retain(|_| true));
    }
}
