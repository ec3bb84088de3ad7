// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer event handlers for Editor

use super::Editor;
use crate::editing::PointerEvent;
use crate::surface::MapSurface;

impl<S: MapSurface> Editor<S> {
    // ============================================================================
    // POINTER EVENT HANDLERS
    // ============================================================================

    pub fn click(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        tracing::debug!(
            "[Editor::click] at {:?} ({:?}), mode: {}",
            event.position,
            event.screen,
            self.mode.id()
        );
        self.with_mode(|mode, editor| mode.click(&event, editor));
        self.render();
    }

    pub fn double_click(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        tracing::debug!("[Editor::double_click] at {:?}", event.position);
        self.with_mode(|mode, editor| mode.double_click(&event, editor));
        self.render();
    }

    pub fn pointer_down(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        tracing::debug!(
            "[Editor::pointer_down] at {:?}, button {:?}",
            event.screen,
            event.button
        );
        self.with_mode(|mode, editor| mode.pointer_down(&event, editor));
        self.render();
    }

    pub fn pointer_move(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        self.with_mode(|mode, editor| mode.pointer_move(&event, editor));
        self.render();
    }

    pub fn pointer_up(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        tracing::debug!("[Editor::pointer_up] at {:?}", event.screen);
        self.with_mode(|mode, editor| mode.pointer_up(&event, editor));
        self.render();
    }

    pub fn context_menu(&mut self, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        tracing::debug!("[Editor::context_menu] at {:?}", event.screen);
        self.with_mode(|mode, editor| mode.context_menu(&event, editor));
        self.render();
    }
}
