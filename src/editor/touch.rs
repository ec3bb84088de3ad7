// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Touch event handlers for Editor
//!
//! Touch is reserved for map panning unless the host has locked panning.
//! With pan lock on, the contact drives a preview that sits
//! `pointer_offset_px` above the finger, and lifting the finger while
//! drawing commits at that offset position, exactly like a click.

use super::Editor;
use crate::editing::{PointerEvent, TouchEvent};
use crate::model::{EditorFeature, Geometry, Meta};
use crate::surface::MapSurface;
use kurbo::Vec2;

impl<S: MapSurface> Editor<S> {
    pub fn touch_start(&mut self, event: TouchEvent) {
        if !self.accepts_touch() {
            return;
        }
        self.update_touch_preview(&event);
        self.render();
    }

    pub fn touch_move(&mut self, event: TouchEvent) {
        if !self.accepts_touch() {
            return;
        }
        self.update_touch_preview(&event);
        self.render();
    }

    pub fn touch_end(&mut self, event: TouchEvent) {
        if !self.accepts_touch() {
            return;
        }
        self.touch_preview.clear();
        if self.mode.id().is_drawing() {
            let pointer = self.offset_pointer(&event);
            tracing::debug!("[Editor::touch_end] committing at {:?}", pointer.position);
            self.with_mode(|mode, editor| mode.click(&pointer, editor));
        }
        self.render();
    }

    fn accepts_touch(&self) -> bool {
        !self.destroyed && self.config.touch_enabled && self.pan_locked
    }

    /// A pointer event lifted above the contact point
    fn offset_pointer(&self, event: &TouchEvent) -> PointerEvent {
        let screen = event.screen - Vec2::new(0.0, self.config.pointer_offset_px);
        PointerEvent::new(self.surface.unproject(screen), screen).at_time(event.timestamp_ms)
    }

    fn update_touch_preview(&mut self, event: &TouchEvent) {
        let pointer = self.offset_pointer(event);
        let snapped = self.snap_to(pointer.position, &[]);
        self.touch_preview = vec![
            EditorFeature::marker(
                Meta::TouchPreview,
                Geometry::LineString(vec![event.position, snapped.point]),
            ),
            EditorFeature::marker(Meta::TouchPreview, Geometry::Point(snapped.point)),
        ];
    }
}
