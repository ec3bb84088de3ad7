// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Input events delivered by the host.
//!
//! The host owns the actual event loop and forwards pointer, touch and key
//! events to the editor. Every pointer event carries both the map position
//! and the screen position it came from, so the editor never has to guess
//! which projection the host used.

use crate::model::Position;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Keyboard modifier state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn meta() -> Self {
        Self {
            meta: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }

    /// Cmd on Apple platforms, Ctrl elsewhere
    pub fn command(self, apple: bool) -> bool {
        if apple { self.meta } else { self.ctrl }
    }
}

/// Pointer buttons
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// A mouse or pen event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Map position under the pointer
    pub position: Position,
    /// Screen position in pixels
    pub screen: Point,
    pub modifiers: Modifiers,
    pub button: PointerButton,
    /// Host timestamp in milliseconds
    pub timestamp_ms: u64,
}

impl PointerEvent {
    pub fn new(position: Position, screen: Point) -> Self {
        Self {
            position,
            screen,
            modifiers: Modifiers::NONE,
            button: PointerButton::Primary,
            timestamp_ms: 0,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn at_time(mut self, timestamp_ms: u64) -> Self {
        self.timestamp_ms = timestamp_ms;
        self
    }

    /// The same event moved to a new location
    pub fn moved_to(mut self, position: Position, screen: Point) -> Self {
        self.position = position;
        self.screen = screen;
        self
    }
}

/// A single-contact touch event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEvent {
    /// Map position under the contact
    pub position: Position,
    /// Screen position of the contact
    pub screen: Point,
    pub timestamp_ms: u64,
}

impl TouchEvent {
    pub fn new(position: Position, screen: Point) -> Self {
        Self {
            position,
            screen,
            timestamp_ms: 0,
        }
    }
}

/// Keys the editor reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Delete,
    Character(char),
}

impl Key {
    /// Case-insensitive character match
    pub fn is_char(self, c: char) -> bool {
        matches!(self, Key::Character(k) if k.eq_ignore_ascii_case(&c))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyEvent {
    pub key: Key,
    #[serde(default)]
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn new(key: Key) -> Self {
        Self {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_modifier_follows_platform() {
        assert!(Modifiers::meta().command(true));
        assert!(!Modifiers::meta().command(false));
        assert!(Modifiers::ctrl().command(false));
    }

    #[test]
    fn character_keys_ignore_case() {
        assert!(Key::Character('Z').is_char('z'));
        assert!(!Key::Enter.is_char('z'));
    }

    #[test]
    fn key_event_deserializes_from_script() {
        let event: KeyEvent =
            serde_json::from_str(r#"{"key":{"character":"z"},"modifiers":{"ctrl":true}}"#).unwrap();
        assert_eq!(event.key, Key::Character('z'));
        assert!(event.modifiers.ctrl);
        assert!(!event.modifiers.shift);
    }
}
