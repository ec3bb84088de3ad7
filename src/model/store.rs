// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Insertion-ordered feature store owned by the editor.
//!
//! Rendering order follows insertion order, so the most recently added
//! feature is drawn (and hit) on top. Replacing a feature in place keeps its
//! slot, and undo puts removed features back into the slots they had.

use super::{EditorFeature, FeatureId};

#[derive(Debug, Clone, Default)]
pub struct FeatureStore {
    features: Vec<EditorFeature>,
}

impl FeatureStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn contains(&self, id: &FeatureId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &FeatureId) -> Option<&EditorFeature> {
        self.features.iter().find(|f| &f.id == id)
    }

    pub fn get_mut(&mut self, id: &FeatureId) -> Option<&mut EditorFeature> {
        self.features.iter_mut().find(|f| &f.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditorFeature> {
        self.features.iter()
    }

    /// Insert a feature, replacing any feature with the same id in place
    pub fn insert(&mut self, feature: EditorFeature) {
        match self.position(&feature.id) {
            Some(idx) => self.features[idx] = feature,
            None => self.features.push(feature),
        }
    }

    /// Insert a feature at `slot`, or replace it in place if the id exists
    ///
    /// Slots past the end append.
    pub fn insert_at(&mut self, slot: usize, feature: EditorFeature) {
        match self.position(&feature.id) {
            Some(idx) => self.features[idx] = feature,
            None => {
                let slot = slot.min(self.features.len());
                self.features.insert(slot, feature);
            }
        }
    }

    /// Current slot of each feature; missing features map past the end
    pub fn slots(&self, features: &[EditorFeature]) -> Vec<usize> {
        features
            .iter()
            .map(|f| self.position(&f.id).unwrap_or(self.features.len()))
            .collect()
    }

    /// Remove a feature by id, returning it
    pub fn remove(&mut self, id: &FeatureId) -> Option<EditorFeature> {
        let idx = self.position(id)?;
        Some(self.features.remove(idx))
    }

    /// Deep copies of the features with the given ids, in store order
    pub fn snapshot(&self, ids: &[FeatureId]) -> Vec<EditorFeature> {
        self.features
            .iter()
            .filter(|f| ids.contains(&f.id))
            .cloned()
            .collect()
    }

    /// Deep copies of every feature
    pub fn to_vec(&self) -> Vec<EditorFeature> {
        self.features.clone()
    }

    pub fn clear(&mut self) {
        self.features.clear();
    }

    fn position(&self, id: &FeatureId) -> Option<usize> {
        self.features.iter().position(|f| &f.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Geometry;

    fn point(id: &str, x: f64) -> EditorFeature {
        EditorFeature::with_id(id.into(), Geometry::Point([x, 0.0]))
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut store = FeatureStore::new();
        store.insert(point("a", 0.0));
        store.insert(point("b", 1.0));
        store.insert(point("a", 5.0));

        let ids: Vec<_> = store.iter().map(|f| f.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(
            store.get(&"a".into()).unwrap().geometry,
            Geometry::Point([5.0, 0.0])
        );
    }

    #[test]
    fn snapshot_is_a_deep_copy() {
        let mut store = FeatureStore::new();
        store.insert(point("a", 0.0));
        let snap = store.snapshot(&["a".into()]);

        store.get_mut(&"a".into()).unwrap().geometry = Geometry::Point([9.0, 9.0]);
        assert_eq!(snap[0].geometry, Geometry::Point([0.0, 0.0]));
    }

    #[test]
    fn insert_at_restores_a_slot() {
        let mut store = FeatureStore::new();
        store.insert(point("a", 0.0));
        store.insert(point("b", 1.0));
        store.insert(point("c", 2.0));
        assert_eq!(store.slots(&[point("b", 0.0), point("zz", 0.0)]), vec![1, 3]);

        let b = store.remove(&"b".into()).unwrap();
        store.insert_at(1, b);
        store.insert_at(99, point("d", 3.0));
        store.insert_at(0, point("c", 7.0));

        let ids: Vec<_> = store.iter().map(|f| f.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(
            store.get(&"c".into()).unwrap().geometry,
            Geometry::Point([7.0, 0.0])
        );
    }

    #[test]
    fn remove_missing_is_none() {
        let mut store = FeatureStore::new();
        assert!(store.remove(&"nope".into()).is_none());
    }
}
