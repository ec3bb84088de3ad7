// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Point drawing mode

use super::{ModeDelegate, ModeId};
use crate::editing::PointerEvent;
use crate::editor::{Editor, EditorEvent};
use crate::model::geometry::is_valid_position;
use crate::model::{Geometry, GeometryType};
use crate::surface::MapSurface;

/// Each click commits one Point feature
#[derive(Debug, Clone, Default)]
pub struct DrawPointMode;

impl ModeDelegate for DrawPointMode {
    fn id(&self) -> ModeId {
        ModeId::DrawPoint
    }

    fn click<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        if !editor.config().can_draw(GeometryType::Point) {
            tracing::debug!("[DrawPointMode] points are disabled");
            return;
        }
        let snapped = editor.snap_to(event.position, &[]);
        if !is_valid_position(&snapped.point) {
            return;
        }
        editor.commit_create(Geometry::Point(snapped.point));
        editor.emit(EditorEvent::DrawChange {
            vertices: vec![snapped.point],
        });
    }

    fn pointer_move<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        let snapped = editor.snap_to(event.position, &[]);
        editor.set_cursor(snapped.snapped.then_some(snapped.point));
    }

    fn cancel<S: MapSurface>(&mut self, editor: &mut Editor<S>) {
        editor.set_cursor(None);
    }
}
