// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Edit mode: per-vertex dragging, insertion at midpoints, and removal
//!
//! Vertex and midpoint markers are only rendered for selected features, so
//! a feature must be selected (by clicking its body) before its vertices
//! can be edited.

use super::{ClickCooldown, ModeDelegate, ModeId};
use crate::editing::{Key, KeyEvent, PointerEvent};
use crate::editor::{Editor, marker_owner, marker_path};
use crate::model::{CoordPath, EditorFeature, FeatureId, Geometry, Position};
use crate::surface::{Layer, MapSurface};

// ===== Vertex Drag =====

#[derive(Debug, Clone)]
struct VertexDrag {
    id: FeatureId,
    path: CoordPath,
    /// The feature before the drag began
    snapshot: EditorFeature,
    moved: bool,
}

// ===== EditMode Struct =====

#[derive(Debug, Clone, Default)]
pub struct EditMode {
    drag: Option<VertexDrag>,
    /// The click that may end a vertex drag is not a selection click
    cooldown: ClickCooldown,
}

impl EditMode {
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    fn abort_drag<S: MapSurface>(&mut self, editor: &mut Editor<S>) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        tracing::debug!("[EditMode] vertex drag on {} aborted", drag.id);
        editor.apply_live(vec![drag.snapshot]);
        editor.set_drag_pan(true);
        true
    }

    /// The stored feature and path behind a marker under the pointer,
    /// along with the marker's own position
    fn marker_target<S: MapSurface>(
        editor: &Editor<S>,
        event: &PointerEvent,
        layer: Layer,
    ) -> Option<(EditorFeature, CoordPath, Position)> {
        let marker = editor.marker_at(event.screen, layer)?;
        let owner = marker_owner(&marker)?;
        let path = marker_path(&marker)?;
        let Geometry::Point(at) = marker.geometry else {
            return None;
        };
        let feature = editor.stored(&owner)?.clone();
        Some((feature, path, at))
    }
}

// ===== ModeDelegate Implementation =====

impl ModeDelegate for EditMode {
    fn id(&self) -> ModeId {
        ModeId::Edit
    }

    fn click<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        if self.cooldown.suppresses(event.timestamp_ms) {
            return;
        }

        if let Some((feature, _, _)) = Self::marker_target(editor, event, Layer::Vertex) {
            if !editor.is_selected(&feature.id) {
                editor.update_selection(|selection| selection.select(feature.id));
            }
            return;
        }

        if let Some((feature, path, at)) = Self::marker_target(editor, event, Layer::Midpoint) {
            let mut updated = feature.clone();
            if updated.geometry.insert_vertex(path, at) {
                tracing::debug!("[EditMode] inserted vertex into {} at {path:?}", feature.id);
                editor.commit_update(vec![updated], vec![feature]);
            }
            return;
        }

        let additive = editor.is_multi_select(event.modifiers);
        match editor.feature_at(event.screen) {
            Some(id) if additive => {
                editor.update_selection(|selection| {
                    selection.toggle_select(&id);
                    true
                });
            }
            Some(id) => {
                editor.update_selection(|selection| selection.set(id));
            }
            None if !additive => {
                editor.update_selection(|selection| selection.clear());
            }
            None => {}
        }
    }

    fn pointer_down<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        self.cooldown.clear();
        let Some((feature, path, _)) = Self::marker_target(editor, event, Layer::Vertex) else {
            return;
        };
        if !editor.is_selected(&feature.id) {
            return;
        }
        tracing::debug!("[EditMode] begin vertex drag {} {path:?}", feature.id);
        self.drag = Some(VertexDrag {
            id: feature.id.clone(),
            path,
            snapshot: feature,
            moved: false,
        });
        editor.set_drag_pan(false);
    }

    fn pointer_move<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        let Some(drag) = self.drag.as_mut() else {
            return;
        };
        let snapped = editor.snap_to(event.position, std::slice::from_ref(&drag.id));
        let mut live = drag.snapshot.clone();
        if live.geometry.set_vertex(drag.path, snapped.point) {
            drag.moved = true;
            editor.set_cursor(snapped.snapped.then_some(snapped.point));
            editor.apply_live(vec![live]);
        }
    }

    fn pointer_up<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        let Some(drag) = self.drag.take() else {
            return;
        };
        editor.set_drag_pan(true);
        editor.set_cursor(None);
        self.cooldown.start(event.timestamp_ms);
        let Some(live) = editor.stored(&drag.id).cloned() else {
            return;
        };
        if drag.moved && live != drag.snapshot {
            editor.commit_update(vec![live], vec![drag.snapshot]);
        }
    }

    fn context_menu<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        let Some((feature, path, _)) = Self::marker_target(editor, event, Layer::Vertex) else {
            return;
        };
        let mut updated = feature.clone();
        if updated.geometry.remove_vertex(path) {
            tracing::debug!("[EditMode] removed vertex {path:?} from {}", feature.id);
            editor.commit_update(vec![updated], vec![feature]);
        } else {
            tracing::debug!("[EditMode] refusing to remove vertex {path:?} from {}", feature.id);
        }
    }

    fn key_down<S: MapSurface>(&mut self, event: &KeyEvent, editor: &mut Editor<S>) -> bool {
        match event.key {
            Key::Escape => self.abort_drag(editor),
            _ => false,
        }
    }

    fn cancel<S: MapSurface>(&mut self, editor: &mut Editor<S>) {
        self.abort_drag(editor);
        self.cooldown.clear();
    }
}
