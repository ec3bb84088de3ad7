// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Interaction modes

use crate::editing::{KeyEvent, PointerEvent};
use crate::editor::Editor;
use crate::model::{EditorFeature, FeatureId};
use crate::settings;
use crate::surface::MapSurface;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod draw_path;
pub mod draw_point;
pub mod edit;
pub mod select;

// ===== Mode Identifier =====

/// Mode identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeId {
    /// Inert: input is ignored
    #[default]
    Static,
    /// Click and box selection, transform gizmo
    Select,
    /// Each click commits a point
    DrawPoint,
    /// Clicks build a line until finished
    #[serde(rename = "draw_linestring")]
    DrawLineString,
    /// Clicks build a polygon ring until finished
    DrawPolygon,
    /// Vertex dragging, insertion and removal
    Edit,
}

impl ModeId {
    pub const ALL: [ModeId; 6] = [
        ModeId::Static,
        ModeId::Select,
        ModeId::DrawPoint,
        ModeId::DrawLineString,
        ModeId::DrawPolygon,
        ModeId::Edit,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ModeId::Static => "static",
            ModeId::Select => "select",
            ModeId::DrawPoint => "draw_point",
            ModeId::DrawLineString => "draw_linestring",
            ModeId::DrawPolygon => "draw_polygon",
            ModeId::Edit => "edit",
        }
    }

    /// Whether this mode draws new geometry
    pub fn is_drawing(self) -> bool {
        matches!(
            self,
            ModeId::DrawPoint | ModeId::DrawLineString | ModeId::DrawPolygon
        )
    }
}

impl fmt::Display for ModeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeId::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown mode '{s}'"))
    }
}

// ===== Click Cooldown =====

/// Suppresses the click a host may synthesize from a drag release
///
/// Hosts are free to skip that click, so suppression is bounded: it ends
/// after [`settings::pointer::DRAG_CLICK_COOLDOWN_MS`] or at the next
/// pointer press, whichever comes first.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ClickCooldown {
    until: Option<u64>,
}

impl ClickCooldown {
    /// Start suppressing clicks from a release at `released_at`
    pub(crate) fn start(&mut self, released_at: u64) {
        self.until = Some(released_at + settings::pointer::DRAG_CLICK_COOLDOWN_MS);
    }

    pub(crate) fn clear(&mut self) {
        self.until = None;
    }

    /// Whether a click at `now` belongs to the preceding drag
    pub(crate) fn suppresses(&mut self, now: u64) -> bool {
        match self.until {
            Some(until) if now < until => true,
            _ => {
                self.until = None;
                false
            }
        }
    }
}

// ===== Mode Trait =====

/// Input handling for one mode
///
/// Every handler receives the editor, so a mode can snap, hit-test, commit
/// and render through it. The editor takes the mode out of itself for the
/// duration of the call.
pub trait ModeDelegate {
    fn id(&self) -> ModeId;

    fn click<S: MapSurface>(&mut self, _event: &PointerEvent, _editor: &mut Editor<S>) {}

    fn double_click<S: MapSurface>(&mut self, _event: &PointerEvent, _editor: &mut Editor<S>) {}

    fn pointer_down<S: MapSurface>(&mut self, _event: &PointerEvent, _editor: &mut Editor<S>) {}

    fn pointer_move<S: MapSurface>(&mut self, _event: &PointerEvent, _editor: &mut Editor<S>) {}

    fn pointer_up<S: MapSurface>(&mut self, _event: &PointerEvent, _editor: &mut Editor<S>) {}

    fn context_menu<S: MapSurface>(&mut self, _event: &PointerEvent, _editor: &mut Editor<S>) {}

    /// Returns true if the key was consumed
    fn key_down<S: MapSurface>(&mut self, _event: &KeyEvent, _editor: &mut Editor<S>) -> bool {
        false
    }

    /// Commit any in-progress drawing, returning the created feature's id
    fn finish<S: MapSurface>(&mut self, _editor: &mut Editor<S>) -> Option<FeatureId> {
        None
    }

    fn can_finish(&self) -> bool {
        false
    }

    /// Abandon in-progress state without committing
    fn cancel<S: MapSurface>(&mut self, _editor: &mut Editor<S>) {}

    /// Temporary features drawn alongside the live ones
    fn preview(&self) -> Vec<EditorFeature> {
        Vec::new()
    }
}

// ===== ModeBox Enum =====

/// Enum wrapping all mode types
#[derive(Debug, Clone, Default)]
pub enum ModeBox {
    #[default]
    Static,
    Select(select::SelectMode),
    DrawPoint(draw_point::DrawPointMode),
    DrawPath(draw_path::DrawPathMode),
    Edit(edit::EditMode),
}

macro_rules! dispatch {
    ($self:ident, $mode:ident => $body:expr, $default:expr) => {
        match $self {
            ModeBox::Static => $default,
            ModeBox::Select($mode) => $body,
            ModeBox::DrawPoint($mode) => $body,
            ModeBox::DrawPath($mode) => $body,
            ModeBox::Edit($mode) => $body,
        }
    };
}

impl ModeBox {
    pub fn for_id(id: ModeId) -> Self {
        match id {
            ModeId::Static => ModeBox::Static,
            ModeId::Select => ModeBox::Select(select::SelectMode::default()),
            ModeId::DrawPoint => ModeBox::DrawPoint(draw_point::DrawPointMode::default()),
            ModeId::DrawLineString => {
                ModeBox::DrawPath(draw_path::DrawPathMode::new(draw_path::PathKind::Line))
            }
            ModeId::DrawPolygon => {
                ModeBox::DrawPath(draw_path::DrawPathMode::new(draw_path::PathKind::Polygon))
            }
            ModeId::Edit => ModeBox::Edit(edit::EditMode::default()),
        }
    }

    pub fn id(&self) -> ModeId {
        dispatch!(self, mode => mode.id(), ModeId::Static)
    }

    pub fn click<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        dispatch!(self, mode => mode.click(event, editor), ())
    }

    pub fn double_click<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        dispatch!(self, mode => mode.double_click(event, editor), ())
    }

    pub fn pointer_down<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        dispatch!(self, mode => mode.pointer_down(event, editor), ())
    }

    pub fn pointer_move<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        dispatch!(self, mode => mode.pointer_move(event, editor), ())
    }

    pub fn pointer_up<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        dispatch!(self, mode => mode.pointer_up(event, editor), ())
    }

    pub fn context_menu<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        dispatch!(self, mode => mode.context_menu(event, editor), ())
    }

    pub fn key_down<S: MapSurface>(&mut self, event: &KeyEvent, editor: &mut Editor<S>) -> bool {
        dispatch!(self, mode => mode.key_down(event, editor), false)
    }

    pub fn finish<S: MapSurface>(&mut self, editor: &mut Editor<S>) -> Option<FeatureId> {
        dispatch!(self, mode => mode.finish(editor), None)
    }

    pub fn can_finish(&self) -> bool {
        dispatch!(self, mode => mode.can_finish(), false)
    }

    pub fn cancel<S: MapSurface>(&mut self, editor: &mut Editor<S>) {
        dispatch!(self, mode => mode.cancel(editor), ())
    }

    pub fn preview(&self) -> Vec<EditorFeature> {
        dispatch!(self, mode => mode.preview(), Vec::new())
    }

    /// Rubber-band rectangle, while a box selection is in progress
    pub fn selection_box(&self) -> Option<EditorFeature> {
        match self {
            ModeBox::Select(mode) => mode.selection_box(),
            _ => None,
        }
    }

    /// Whether a vertex or gizmo drag is in progress
    pub fn is_dragging(&self) -> bool {
        match self {
            ModeBox::Select(mode) => mode.is_dragging(),
            ModeBox::Edit(mode) => mode.is_dragging(),
            _ => false,
        }
    }

    /// Whether a line/polygon buffer holds placed vertices
    pub fn is_actively_drawing(&self) -> bool {
        match self {
            ModeBox::DrawPath(mode) => !mode.vertices().is_empty(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_ids_round_trip_through_strings() {
        for mode in ModeId::ALL {
            assert_eq!(mode.as_str().parse::<ModeId>(), Ok(mode));
        }
        assert!("lasso".parse::<ModeId>().is_err());
    }

    #[test]
    fn mode_ids_deserialize_from_config_names() {
        let mode: ModeId = serde_json::from_str("\"draw_linestring\"").unwrap();
        assert_eq!(mode, ModeId::DrawLineString);
        let mode: ModeId = serde_json::from_str("\"draw_polygon\"").unwrap();
        assert_eq!(mode, ModeId::DrawPolygon);
    }

    #[test]
    fn click_cooldown_is_bounded() {
        let mut cooldown = ClickCooldown::default();
        assert!(!cooldown.suppresses(0));
        cooldown.start(1_000);
        assert!(cooldown.suppresses(1_299));
        assert!(!cooldown.suppresses(1_300));
        // Expired cooldowns stay expired
        assert!(!cooldown.suppresses(1_000));

        cooldown.start(2_000);
        cooldown.clear();
        assert!(!cooldown.suppresses(2_000));
    }

    #[test]
    fn mode_box_reports_its_id() {
        for mode in ModeId::ALL {
            assert_eq!(ModeBox::for_id(mode).id(), mode);
        }
    }
}
