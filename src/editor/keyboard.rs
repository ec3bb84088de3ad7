// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Keyboard event handlers for Editor
//!
//! Keys are delivered by the host; there is no global listener, so several
//! editors can coexist. Handlers run in order and the first to consume the
//! key wins: undo/redo, then the current mode (finish, cancel, remove last
//! vertex), then deletion of the selection.

use super::Editor;
use crate::editing::{Key, KeyEvent};
use crate::surface::MapSurface;

impl<S: MapSurface> Editor<S> {
    /// Handle a key press; returns true if the key was consumed
    pub fn key_down(&mut self, event: KeyEvent) -> bool {
        if self.destroyed {
            return false;
        }
        tracing::debug!("[Editor::key_down] {:?} {:?}", event.key, event.modifiers);

        if self.handle_undo_redo(&event) {
            return true;
        }

        if self.with_mode(|mode, editor| mode.key_down(&event, editor)) {
            self.render();
            return true;
        }

        self.handle_delete(&event)
    }

    /// Key releases carry no bindings
    pub fn key_up(&mut self, event: KeyEvent) -> bool {
        tracing::trace!("[Editor::key_up] {:?}", event.key);
        false
    }

    /// Cmd/Ctrl+Z undoes; Cmd/Ctrl+Shift+Z and Cmd/Ctrl+Y redo
    fn handle_undo_redo(&mut self, event: &KeyEvent) -> bool {
        if !self.config.platform.command_held(event.modifiers) {
            return false;
        }
        if event.key.is_char('z') {
            if event.modifiers.shift {
                self.redo();
            } else {
                self.undo();
            }
            return true;
        }
        if event.key.is_char('y') {
            self.redo();
            return true;
        }
        false
    }

    /// Delete/Backspace removes the selection when not drawing
    fn handle_delete(&mut self, event: &KeyEvent) -> bool {
        if !matches!(event.key, Key::Delete | Key::Backspace) {
            return false;
        }
        if self.mode.is_actively_drawing() || self.selection.is_empty() {
            return false;
        }
        self.delete_selected() > 0
    }
}
