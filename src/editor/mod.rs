// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! The editor: mode controller, feature store and public API.
//!
//! One `Editor` owns everything for an editing session: the feature store,
//! the undo history, the selection and the current mode. Hosts forward
//! input through the pointer/keyboard/touch methods and mutate through the
//! operations API; after every change the editor re-renders every data sink
//! on its [`MapSurface`].

pub mod events;
mod keyboard;
mod operations;
mod pointer;
mod render;
mod touch;

#[cfg(test)]
mod tests;

pub use events::{EditorEvent, EventBus, EventKind, SubscriptionId};
pub(crate) use render::{marker_owner, marker_path};

use crate::config::EditorConfig;
use crate::editing::{
    GizmoLayout, HistoryAction, HistoryManager, Modifiers, SelectionManager, SnapEngine,
    SnapResult,
};
use crate::geometry::center_of_mass;
use crate::model::{EditorFeature, FeatureId, FeatureStore, Geometry, Position, keys};
use crate::modes::{ModeBox, ModeId};
use crate::surface::{Layer, MapSurface, SourceId};
use kurbo::Point;

/// Layers queried for a click on a feature body, highest priority first
const FEATURE_LAYERS: [Layer; 3] = [Layer::Fill, Layer::Line, Layer::Point];

pub struct Editor<S: MapSurface> {
    surface: S,
    config: EditorConfig,
    store: FeatureStore,
    history: HistoryManager,
    selection: SelectionManager,
    snap: SnapEngine,
    events: EventBus,
    mode: ModeBox,
    pan_locked: bool,
    /// Snap indicator position, when the pointer is snapped
    cursor: Option<Position>,
    touch_preview: Vec<EditorFeature>,
    destroyed: bool,
}

impl<S: MapSurface> Editor<S> {
    pub fn new(mut surface: S, config: EditorConfig) -> Self {
        if let Err(e) = surface.attach() {
            tracing::warn!("[Editor] failed to attach to surface: {e}");
        }
        let mut editor = Self {
            surface,
            snap: SnapEngine::new(config.snap_options()),
            history: HistoryManager::with_max_size(config.history_size),
            mode: ModeBox::for_id(config.default_mode),
            config,
            store: FeatureStore::new(),
            selection: SelectionManager::new(),
            events: EventBus::new(),
            pan_locked: false,
            cursor: None,
            touch_preview: Vec::new(),
            destroyed: false,
        };
        tracing::info!("[Editor] created in mode {}", editor.mode.id());
        editor.render();
        editor
    }

    /// Release surface bindings and data sinks
    ///
    /// Safe to call when the surface has already gone away; failures are
    /// logged and swallowed. The editor ignores all input afterwards.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.with_mode(|mode, editor| mode.cancel(editor));
        for source in SourceId::ALL {
            if let Err(e) = self.surface.remove_source(source) {
                tracing::debug!("[Editor] destroy: remove_source {}: {e}", source.as_str());
            }
        }
        self.surface.set_drag_pan(true);
        if let Err(e) = self.surface.detach() {
            tracing::debug!("[Editor] destroy: detach: {e}");
        }
        self.events.clear();
        self.destroyed = true;
        tracing::info!("[Editor] destroyed");
    }

    // ============================================================================
    // QUERIES
    // ============================================================================

    pub fn mode(&self) -> ModeId {
        self.mode.id()
    }

    /// Deep copies of every live feature, in store order
    pub fn features(&self) -> Vec<EditorFeature> {
        self.store
            .iter()
            .filter(|f| f.is_live())
            .map(EditorFeature::stripped)
            .collect()
    }

    pub fn feature(&self, id: &FeatureId) -> Option<EditorFeature> {
        self.store.get(id).map(EditorFeature::stripped)
    }

    /// Deep copies of the selected features, in store order
    pub fn selected_features(&self) -> Vec<EditorFeature> {
        self.store
            .iter()
            .filter(|f| self.selection.is_selected(&f.id))
            .map(EditorFeature::stripped)
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<FeatureId> {
        self.selection.selected_ids()
    }

    pub fn can_finish_drawing(&self) -> bool {
        self.mode.can_finish()
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn available_modes(&self) -> &[ModeId] {
        &self.config.modes
    }

    /// "Cmd" or "Ctrl", for hints shown by the host
    pub fn multi_select_modifier_label(&self) -> &'static str {
        self.config.platform.modifier_label()
    }

    pub fn is_pan_locked(&self) -> bool {
        self.pan_locked
    }

    pub fn is_snapping(&self) -> bool {
        self.snap.is_enabled()
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn history(&self) -> &HistoryManager {
        &self.history
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    // ============================================================================
    // NOTIFICATIONS
    // ============================================================================

    /// Subscribe to an event by name (`mode.change`, `create`, `update`,
    /// `delete`, `selection.change`, `undo`, `redo`, `draw.change`)
    pub fn on(
        &mut self,
        name: &str,
        handler: impl FnMut(&EditorEvent) + 'static,
    ) -> Option<SubscriptionId> {
        self.events.on(name, handler)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    // ============================================================================
    // MODE SUPPORT
    // ============================================================================

    /// Run `f` with the current mode taken out of the editor
    fn with_mode<R>(&mut self, f: impl FnOnce(&mut ModeBox, &mut Self) -> R) -> R {
        let mut mode = std::mem::take(&mut self.mode);
        let result = f(&mut mode, self);
        self.mode = mode;
        result
    }

    pub(crate) fn emit(&mut self, event: EditorEvent) {
        self.events.emit(event);
    }

    /// Whether the platform multi-select modifier is held
    pub(crate) fn is_multi_select(&self, modifiers: Modifiers) -> bool {
        self.config.platform.command_held(modifiers)
    }

    /// Snap a position against the live features, ignoring `exclude`
    pub(crate) fn snap_to(&self, position: Position, exclude: &[FeatureId]) -> SnapResult {
        let projection = (!self.destroyed).then_some(&self.surface);
        self.snap.snap(
            projection,
            position,
            self.store.iter().filter(|f| f.is_live()),
            exclude,
        )
    }

    pub(crate) fn set_cursor(&mut self, cursor: Option<Position>) {
        self.cursor = cursor;
    }

    pub(crate) fn set_drag_pan(&mut self, enabled: bool) {
        self.surface.set_drag_pan(enabled);
    }

    /// Topmost live feature under a screen point (fill, then line, then point)
    pub(crate) fn feature_at(&self, screen: Point) -> Option<FeatureId> {
        FEATURE_LAYERS.iter().find_map(|layer| {
            self.surface
                .query_rendered_features(screen, std::slice::from_ref(layer))
                .into_iter()
                .find_map(|hit| {
                    let id = rendered_feature_id(&hit);
                    self.store.contains(&id).then_some(id)
                })
        })
    }

    /// Features whose rendered shape intersects a screen rectangle
    pub(crate) fn features_in(&self, rect: kurbo::Rect) -> Vec<FeatureId> {
        let mut ids: Vec<FeatureId> = Vec::new();
        for hit in self.surface.query_rendered_features_in(rect, &FEATURE_LAYERS) {
            let id = rendered_feature_id(&hit);
            if self.store.contains(&id) && !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Marker of `layer` nearest a screen point, within the click tolerance
    ///
    /// Ties go to the topmost marker.
    pub(crate) fn marker_at(&self, screen: Point, layer: Layer) -> Option<EditorFeature> {
        let tolerance = self.config.click_tolerance;
        let area = kurbo::Rect::from_center_size(screen, (tolerance * 2.0, tolerance * 2.0));
        self.surface
            .query_rendered_features_in(area, &[layer])
            .into_iter()
            .filter_map(|marker| {
                let Geometry::Point(at) = marker.geometry else {
                    return None;
                };
                let dist = self.surface.project(at).distance(screen);
                (dist <= tolerance).then_some((dist, marker))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, marker)| marker)
    }

    pub(crate) fn stored(&self, id: &FeatureId) -> Option<&EditorFeature> {
        self.store.get(id)
    }

    pub(crate) fn is_selected(&self, id: &FeatureId) -> bool {
        self.selection.is_selected(id)
    }

    /// Deep copies of the selected features, properties untouched
    pub(crate) fn selected_snapshot(&self) -> Vec<EditorFeature> {
        self.store.snapshot(&self.selection.selected_ids())
    }

    /// Handle layout around the selection's center of mass
    pub(crate) fn gizmo_layout(&self) -> Option<GizmoLayout> {
        if self.selection.is_empty() {
            return None;
        }
        let selected = self.selected_snapshot();
        let center = center_of_mass(selected.iter().map(|f| &f.geometry))?;
        Some(GizmoLayout::new(&self.surface, center))
    }

    /// Mutate the selection, emitting `selection.change` if it changed
    pub(crate) fn update_selection(
        &mut self,
        f: impl FnOnce(&mut SelectionManager) -> bool,
    ) -> bool {
        let changed = f(&mut self.selection);
        if changed {
            let selected = self.selection.selected_ids();
            tracing::debug!("[Editor] selection now {} features", selected.len());
            self.emit(EditorEvent::SelectionChange { selected });
        }
        changed
    }

    /// Commit a newly drawn geometry as a live feature
    pub(crate) fn commit_create(&mut self, geometry: Geometry) -> FeatureId {
        let feature = EditorFeature::new(geometry);
        let id = feature.id.clone();
        tracing::info!(
            "[Editor] created {} {}",
            feature.geometry.geometry_type().as_str(),
            id
        );
        self.store.insert(feature.clone());
        self.history.record_create(vec![feature.clone()]);
        self.emit(EditorEvent::Create {
            features: vec![feature],
        });
        id
    }

    /// Commit an edit whose live state is already in the store
    pub(crate) fn commit_update(
        &mut self,
        updated: Vec<EditorFeature>,
        previous: Vec<EditorFeature>,
    ) {
        let slots = self.store.slots(&previous);
        self.swap_features(&previous, &updated);
        tracing::info!("[Editor] updated {} features", updated.len());
        self.history.record_update(updated.clone(), previous, slots);
        self.emit(EditorEvent::Update { features: updated });
    }

    /// Write features into the store without recording history
    pub(crate) fn apply_live(&mut self, features: Vec<EditorFeature>) {
        for feature in features {
            self.store.insert(feature);
        }
    }

    /// Replace `remove` with `insert`, keeping store slots of shared ids
    fn swap_features(&mut self, remove: &[EditorFeature], insert: &[EditorFeature]) {
        for feature in insert {
            self.store.insert(feature.clone());
        }
        for feature in remove {
            if !insert.iter().any(|f| f.id == feature.id) {
                self.store.remove(&feature.id);
            }
        }
    }

    /// Invert a recorded action's removals: drop what it added, then put
    /// the features it removed or replaced back into their old slots
    fn restore_features(&mut self, added: &[EditorFeature], action: &HistoryAction) {
        let restored = action.restore_order();
        for feature in added {
            if !restored.iter().any(|(_, f)| f.id == feature.id) {
                self.store.remove(&feature.id);
            }
        }
        for (slot, feature) in restored {
            self.store.insert_at(slot, feature.clone());
        }
    }

    /// Drop selected ids that no longer exist
    fn drop_stale_selection(&mut self) {
        let stale: Vec<FeatureId> = self
            .selection
            .iter()
            .filter(|id| !self.store.contains(id))
            .cloned()
            .collect();
        self.update_selection(|selection| selection.deselect(stale));
    }
}

/// The store id a rendered feature stands for
fn rendered_feature_id(rendered: &EditorFeature) -> FeatureId {
    rendered
        .properties
        .get(keys::FEATURE_ID)
        .and_then(|v| v.as_str())
        .map(FeatureId::from)
        .unwrap_or_else(|| rendered.id.clone())
}

