// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Select mode: click and box selection plus the rotate/move gizmo

use super::{ClickCooldown, ModeDelegate, ModeId};
use crate::editing::{GizmoDrag, KeyEvent, Key, PointerEvent};
use crate::editor::Editor;
use crate::model::{EditorFeature, Geometry, Meta, Position};
use crate::surface::MapSurface;
use kurbo::{Point, Rect};

// ===== Drag State =====

#[derive(Debug, Clone, Default)]
enum Drag {
    #[default]
    None,
    /// Rubber-band rectangle, map and screen corners
    Box {
        start: Position,
        start_screen: Point,
        current: Position,
    },
    Gizmo(GizmoDrag),
}

// ===== SelectMode Struct =====

#[derive(Debug, Clone, Default)]
pub struct SelectMode {
    drag: Drag,
    /// Swallows the click that may follow a box select or gizmo release
    cooldown: ClickCooldown,
}

impl SelectMode {
    /// Polygon outlining the box selection in progress
    pub fn selection_box(&self) -> Option<EditorFeature> {
        let Drag::Box { start, current, .. } = &self.drag else {
            return None;
        };
        let ring = vec![
            *start,
            [current[0], start[1]],
            *current,
            [start[0], current[1]],
            *start,
        ];
        Some(EditorFeature::marker(
            Meta::SelectionBox,
            Geometry::Polygon(vec![ring]),
        ))
    }

    pub fn is_dragging(&self) -> bool {
        !matches!(self.drag, Drag::None)
    }

    /// Put dragged features back the way they were
    fn abort_drag<S: MapSurface>(&mut self, editor: &mut Editor<S>) -> bool {
        match std::mem::take(&mut self.drag) {
            Drag::None => false,
            Drag::Box { .. } => {
                editor.set_drag_pan(true);
                true
            }
            Drag::Gizmo(drag) => {
                tracing::debug!("[SelectMode] gizmo drag aborted");
                editor.apply_live(drag.into_snapshots());
                editor.set_drag_pan(true);
                true
            }
        }
    }
}

// ===== ModeDelegate Implementation =====

impl ModeDelegate for SelectMode {
    fn id(&self) -> ModeId {
        ModeId::Select
    }

    fn click<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        if self.cooldown.suppresses(event.timestamp_ms) {
            tracing::debug!("[SelectMode] click ignored after drag release");
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
        if let Some(layout) = editor.gizmo_layout()
            && let Some(handle) = layout.hit(event.screen)
        {
            let snapshots = editor.selected_snapshot();
            self.drag = Drag::Gizmo(GizmoDrag::begin(
                handle,
                layout.center,
                event.position,
                snapshots,
            ));
            editor.set_drag_pan(false);
            return;
        }

        if editor.config().box_select && editor.is_multi_select(event.modifiers) {
            self.drag = Drag::Box {
                start: event.position,
                start_screen: event.screen,
                current: event.position,
            };
            editor.set_drag_pan(false);
        }
    }

    fn pointer_move<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        match &mut self.drag {
            Drag::None => {}
            Drag::Box { current, .. } => *current = event.position,
            Drag::Gizmo(drag) => editor.apply_live(drag.update(event.position)),
        }
    }

    fn pointer_up<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        match std::mem::take(&mut self.drag) {
            Drag::None => {}
            Drag::Box { start_screen, .. } => {
                editor.set_drag_pan(true);
                let rect = Rect::from_points(start_screen, event.screen);
                if rect.width() == 0.0 && rect.height() == 0.0 {
                    return;
                }
                let ids = editor.features_in(rect);
                tracing::debug!("[SelectMode] box selected {} features", ids.len());
                editor.update_selection(|selection| selection.select(ids));
                self.cooldown.start(event.timestamp_ms);
            }
            Drag::Gizmo(drag) => {
                editor.set_drag_pan(true);
                self.cooldown.start(event.timestamp_ms);
                let updated = drag.update(event.position);
                let previous = drag.into_snapshots();
                if updated == previous {
                    editor.apply_live(previous);
                } else {
                    editor.commit_update(updated, previous);
                }
            }
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
