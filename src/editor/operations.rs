// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Programmatic mutations: features, modes, history and selection

use super::{EditorEvent, Editor};
use crate::editing::{ActionKind, HistoryAction, transform};
use crate::model::{EditorFeature, FeatureId, Geometry, Meta};
use crate::modes::{ModeBox, ModeId};
use crate::surface::MapSurface;

impl<S: MapSurface> Editor<S> {
    // ============================================================================
    // FEATURES
    // ============================================================================

    /// Add one feature, recording a Create action
    ///
    /// Returns `None` for non-finite geometry or an id already in use.
    pub fn add_feature(&mut self, feature: EditorFeature) -> Option<FeatureId> {
        self.add_features(vec![feature]).into_iter().next()
    }

    /// Add several features as one Create action
    pub fn add_features(&mut self, features: Vec<EditorFeature>) -> Vec<FeatureId> {
        let mut accepted: Vec<EditorFeature> = Vec::new();
        for feature in features {
            if !feature.geometry.is_finite() {
                tracing::warn!("[Editor] rejecting {} with non-finite coordinates", feature.id);
                continue;
            }
            if self.store.contains(&feature.id) || accepted.iter().any(|f| f.id == feature.id) {
                tracing::warn!("[Editor] rejecting duplicate id {}", feature.id);
                continue;
            }
            let mut feature = feature.stripped();
            feature.set_meta(Meta::Feature);
            accepted.push(feature);
        }
        if accepted.is_empty() {
            return Vec::new();
        }

        for feature in &accepted {
            self.store.insert(feature.clone());
        }
        let ids = accepted.iter().map(|f| f.id.clone()).collect();
        tracing::info!("[Editor] added {} features", accepted.len());
        self.history.record_create(accepted.clone());
        self.emit(EditorEvent::Create { features: accepted });
        self.render();
        ids
    }

    /// Replace a feature's geometry, recording an Update action
    pub fn update_feature(&mut self, id: &FeatureId, geometry: Geometry) -> bool {
        if !geometry.is_finite() {
            return false;
        }
        let Some(previous) = self.store.get(id).cloned() else {
            return false;
        };
        let mut updated = previous.clone();
        updated.geometry = geometry;
        self.commit_update(vec![updated], vec![previous]);
        self.render();
        true
    }

    pub fn delete_feature(&mut self, id: &FeatureId) -> bool {
        self.delete_features(std::slice::from_ref(id)) > 0
    }

    /// Delete features as one Delete action; returns how many were removed
    pub fn delete_features(&mut self, ids: &[FeatureId]) -> usize {
        let removed = self.store.snapshot(ids);
        if removed.is_empty() {
            return 0;
        }
        let slots = self.store.slots(&removed);
        for feature in &removed {
            self.store.remove(&feature.id);
        }
        tracing::info!("[Editor] deleted {} features", removed.len());
        self.history.record_delete(removed.clone(), slots);
        self.drop_stale_selection();
        let count = removed.len();
        self.emit(EditorEvent::Delete { features: removed });
        self.render();
        count
    }

    pub fn delete_selected(&mut self) -> usize {
        let ids = self.selection.selected_ids();
        self.delete_features(&ids)
    }

    /// Reset the session to `features`
    ///
    /// Clears the selection and the undo history; no Create action is
    /// recorded.
    pub fn set_features(&mut self, features: Vec<EditorFeature>) {
        self.with_mode(|mode, editor| mode.cancel(editor));
        self.store.clear();
        for feature in features {
            if !feature.geometry.is_finite() {
                tracing::warn!("[Editor] skipping {} with non-finite coordinates", feature.id);
                continue;
            }
            let mut feature = feature.stripped();
            feature.set_meta(Meta::Feature);
            self.store.insert(feature);
        }
        self.history.clear();
        self.update_selection(|selection| selection.clear());
        tracing::info!("[Editor] session reset with {} features", self.store.len());
        self.render();
    }

    /// Apply `op` to every selected feature as one Update action
    ///
    /// If `op` fails for any feature nothing is changed.
    pub fn transform_selected(
        &mut self,
        mut op: impl FnMut(&EditorFeature) -> Option<EditorFeature>,
    ) -> bool {
        let previous = self.selected_snapshot();
        if previous.is_empty() {
            return false;
        }
        let Some(updated) = previous.iter().map(&mut op).collect::<Option<Vec<_>>>() else {
            tracing::debug!("[Editor] transform_selected: operator failed, nothing changed");
            return false;
        };
        if updated.iter().zip(&previous).any(|(a, b)| a.id != b.id) {
            tracing::warn!("[Editor] transform_selected: operator changed feature ids");
            return false;
        }
        self.commit_update(updated, previous);
        self.render();
        true
    }

    // ============================================================================
    // MODES AND SETTINGS
    // ============================================================================

    /// Switch modes, cancelling any in-progress work of the current one
    pub fn set_mode(&mut self, mode: ModeId) -> bool {
        if self.destroyed {
            return false;
        }
        if !self.config.modes.contains(&mode) {
            tracing::warn!("[Editor] mode {mode} is not enabled");
            return false;
        }
        let previous = self.mode.id();
        if previous == mode {
            return true;
        }
        self.with_mode(|current, editor| current.cancel(editor));
        self.mode = ModeBox::for_id(mode);
        self.cursor = None;
        self.surface.set_drag_pan(true);
        tracing::info!("[Editor] mode {previous} -> {mode}");
        self.emit(EditorEvent::ModeChange { mode, previous });
        self.render();
        true
    }

    pub fn set_pan_locked(&mut self, locked: bool) {
        self.pan_locked = locked;
        if !locked && !self.touch_preview.is_empty() {
            self.touch_preview.clear();
            self.render();
        }
    }

    pub fn set_snapping(&mut self, enabled: bool) {
        self.snap.set_enabled(enabled);
        if !enabled && self.cursor.take().is_some() {
            self.render();
        }
    }

    /// Commit the in-progress line or polygon
    ///
    /// Returns a copy of the committed feature, or `None` if the buffer
    /// could not be finished.
    pub fn finish_drawing(&mut self) -> Option<EditorFeature> {
        let finished = self.with_mode(|mode, editor| mode.finish(editor));
        self.render();
        finished.and_then(|id| self.feature(&id))
    }

    // ============================================================================
    // HISTORY
    // ============================================================================

    pub fn undo(&mut self) -> bool {
        self.with_mode(|mode, editor| mode.cancel(editor));
        let Some(action) = self.history.undo() else {
            return false;
        };
        tracing::info!("[Editor] undo {:?}", action.kind);
        self.revert(&action);
        self.drop_stale_selection();
        self.emit(EditorEvent::Undo {
            features: action.features,
        });
        self.render();
        true
    }

    pub fn redo(&mut self) -> bool {
        self.with_mode(|mode, editor| mode.cancel(editor));
        let Some(action) = self.history.redo() else {
            return false;
        };
        tracing::info!("[Editor] redo {:?}", action.kind);
        self.reapply(&action);
        self.drop_stale_selection();
        self.emit(EditorEvent::Redo {
            features: action.features,
        });
        self.render();
        true
    }

    fn revert(&mut self, action: &HistoryAction) {
        match action.kind {
            ActionKind::Create => {
                for feature in &action.features {
                    self.store.remove(&feature.id);
                }
            }
            ActionKind::Delete => self.restore_features(&[], action),
            ActionKind::Update => self.restore_features(&action.features, action),
        }
    }

    fn reapply(&mut self, action: &HistoryAction) {
        match action.kind {
            ActionKind::Create => {
                for feature in &action.features {
                    self.store.insert(feature.clone());
                }
            }
            ActionKind::Delete => {
                for feature in &action.features {
                    self.store.remove(&feature.id);
                }
            }
            ActionKind::Update => {
                let previous = action.previous_features.as_deref().unwrap_or_default();
                self.swap_features(previous, &action.features);
            }
        }
    }

    // ============================================================================
    // COMBINE / SPLIT
    // ============================================================================

    /// At least two selected features sharing a base type
    pub fn can_combine(&self) -> bool {
        let selected = self.selected_snapshot();
        selected.len() >= 2 && transform::same_base_type(&selected).is_some()
    }

    /// Any selected Multi* feature
    pub fn can_split(&self) -> bool {
        self.selected_snapshot()
            .iter()
            .any(|f| f.geometry.geometry_type().is_multi())
    }

    /// Merge the selection into one Multi* feature (one Update action)
    ///
    /// The merged feature keeps the id and store slot of the first selected
    /// feature in store order. Undo puts every original back in its slot.
    pub fn combine_selected_features(&mut self) -> Option<FeatureId> {
        if !self.can_combine() {
            return None;
        }
        let originals = self.selected_snapshot();
        let combined = transform::combine(&originals)?;
        let id = combined.id.clone();
        self.commit_update(vec![combined], originals);
        self.update_selection(|selection| selection.set(id.clone()));
        self.render();
        Some(id)
    }

    /// Explode every selected Multi* feature (one Update action for all)
    ///
    /// Returns the ids of the resulting single-part features.
    pub fn split_selected_features(&mut self) -> Vec<FeatureId> {
        let targets: Vec<EditorFeature> = self
            .selected_snapshot()
            .into_iter()
            .filter(|f| f.geometry.geometry_type().is_multi())
            .collect();
        if targets.is_empty() {
            return Vec::new();
        }
        let parts: Vec<EditorFeature> = targets.iter().flat_map(transform::explode).collect();
        let ids: Vec<FeatureId> = parts.iter().map(|f| f.id.clone()).collect();
        self.commit_update(parts, targets);
        self.update_selection(|selection| selection.set(ids.clone()));
        self.render();
        ids
    }

    // ============================================================================
    // SELECTION
    // ============================================================================

    /// Add features to the selection; unknown ids are ignored
    pub fn select(&mut self, ids: &[FeatureId]) -> bool {
        let known: Vec<FeatureId> = ids.iter().filter(|id| self.store.contains(id)).cloned().collect();
        let changed = self.update_selection(|selection| selection.select(known));
        if changed {
            self.render();
        }
        changed
    }

    pub fn deselect(&mut self, ids: &[FeatureId]) -> bool {
        let changed = self.update_selection(|selection| selection.deselect(ids));
        if changed {
            self.render();
        }
        changed
    }

    pub fn toggle_select(&mut self, id: &FeatureId) -> bool {
        if !self.store.contains(id) {
            return false;
        }
        self.update_selection(|selection| {
            selection.toggle_select(id);
            true
        });
        self.render();
        self.selection.is_selected(id)
    }

    pub fn clear_selection(&mut self) -> bool {
        let changed = self.update_selection(|selection| selection.clear());
        if changed {
            self.render();
        }
        changed
    }

    pub fn create_group(&mut self, name: &str, ids: &[FeatureId]) {
        self.selection.create_group(name, ids);
    }

    pub fn remove_group(&mut self, name: &str) -> bool {
        self.selection.remove_group(name)
    }

    /// Add a group's live members to the selection
    pub fn select_group(&mut self, name: &str) -> bool {
        let Some(members) = self.selection.group(name) else {
            return false;
        };
        let members: Vec<FeatureId> = members.iter().cloned().collect();
        self.select(&members)
    }
}
