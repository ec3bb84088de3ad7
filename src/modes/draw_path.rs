// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Line and polygon drawing mode
//!
//! Clicks append vertices to a buffer that is drawn as a temporary
//! preview. The buffer becomes a feature when the drawing is finished
//! (Enter, double-click, clicking the first vertex of a polygon, or
//! `Editor::finish_drawing`); the mode stays active for the next shape.

use super::{ModeDelegate, ModeId};
use crate::editing::{Key, KeyEvent, PointerEvent};
use crate::editor::{Editor, EditorEvent};
use crate::model::geometry::{close_ring, is_valid_position};
use crate::model::{EditorFeature, FeatureId, Geometry, GeometryType, Meta, Position};
use crate::settings;
use crate::surface::MapSurface;

// ===== Path Kind =====

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathKind {
    Line,
    Polygon,
}

impl PathKind {
    /// Fewest placed vertices that make a valid shape
    pub fn min_vertices(self) -> usize {
        match self {
            PathKind::Line => 2,
            PathKind::Polygon => 3,
        }
    }

    fn geometry_type(self) -> GeometryType {
        match self {
            PathKind::Line => GeometryType::LineString,
            PathKind::Polygon => GeometryType::Polygon,
        }
    }

    fn geometry(self, vertices: Vec<Position>) -> Geometry {
        match self {
            PathKind::Line => Geometry::LineString(vertices),
            PathKind::Polygon => Geometry::Polygon(vec![close_ring(vertices)]),
        }
    }
}

// ===== DrawPathMode Struct =====

#[derive(Debug, Clone)]
pub struct DrawPathMode {
    kind: PathKind,
    /// Placed vertices, in click order
    vertices: Vec<Position>,
    /// Follows the pointer after the last placed vertex
    trailing: Option<Position>,
}

impl DrawPathMode {
    pub fn new(kind: PathKind) -> Self {
        Self {
            kind,
            vertices: Vec::new(),
            trailing: None,
        }
    }

    pub fn kind(&self) -> PathKind {
        self.kind
    }

    pub fn vertices(&self) -> &[Position] {
        &self.vertices
    }

    fn reset(&mut self) {
        self.vertices.clear();
        self.trailing = None;
    }

    /// Whether a click at `screen` lands on the first vertex of a polygon
    fn closes_polygon<S: MapSurface>(&self, screen: kurbo::Point, editor: &Editor<S>) -> bool {
        if self.kind != PathKind::Polygon || self.vertices.len() < 3 {
            return false;
        }
        let first = editor.surface().project(self.vertices[0]);
        first.distance(screen) <= settings::pointer::CLOSE_POLYGON_TOLERANCE_PX
    }

    fn emit_change<S: MapSurface>(&self, editor: &mut Editor<S>) {
        editor.emit(EditorEvent::DrawChange {
            vertices: self.vertices.clone(),
        });
    }
}

// ===== ModeDelegate Implementation =====

impl ModeDelegate for DrawPathMode {
    fn id(&self) -> ModeId {
        match self.kind {
            PathKind::Line => ModeId::DrawLineString,
            PathKind::Polygon => ModeId::DrawPolygon,
        }
    }

    fn click<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        if self.closes_polygon(event.screen, editor) {
            tracing::debug!("[DrawPathMode] first vertex clicked, closing polygon");
            self.finish(editor);
            return;
        }

        let snapped = editor.snap_to(event.position, &[]);
        if !is_valid_position(&snapped.point) {
            return;
        }
        // The clicks leading up to a double-click land on the same spot
        if self.vertices.last() == Some(&snapped.point) {
            return;
        }
        self.vertices.push(snapped.point);
        self.trailing = None;
        tracing::debug!(
            "[DrawPathMode] vertex {} at {:?}",
            self.vertices.len(),
            snapped.point
        );
        self.emit_change(editor);
    }

    fn double_click<S: MapSurface>(&mut self, _event: &PointerEvent, editor: &mut Editor<S>) {
        self.finish(editor);
    }

    fn pointer_move<S: MapSurface>(&mut self, event: &PointerEvent, editor: &mut Editor<S>) {
        let snapped = editor.snap_to(event.position, &[]);
        editor.set_cursor(snapped.snapped.then_some(snapped.point));
        if !self.vertices.is_empty() && is_valid_position(&snapped.point) {
            self.trailing = Some(snapped.point);
        }
    }

    fn key_down<S: MapSurface>(&mut self, event: &KeyEvent, editor: &mut Editor<S>) -> bool {
        match event.key {
            Key::Enter => {
                self.finish(editor);
                true
            }
            Key::Backspace if !self.vertices.is_empty() => {
                self.vertices.pop();
                if self.vertices.is_empty() {
                    self.trailing = None;
                }
                self.emit_change(editor);
                true
            }
            Key::Escape => {
                let had_vertices = !self.vertices.is_empty();
                self.reset();
                if had_vertices {
                    self.emit_change(editor);
                }
                true
            }
            _ => false,
        }
    }

    fn finish<S: MapSurface>(&mut self, editor: &mut Editor<S>) -> Option<FeatureId> {
        if !self.can_finish() {
            tracing::debug!(
                "[DrawPathMode] cannot finish with {} vertices",
                self.vertices.len()
            );
            return None;
        }
        if !editor.config().can_draw(self.kind.geometry_type()) {
            tracing::debug!("[DrawPathMode] {:?} drawing is disabled", self.kind);
            return None;
        }
        let vertices = std::mem::take(&mut self.vertices);
        self.trailing = None;
        let id = editor.commit_create(self.kind.geometry(vertices));
        self.emit_change(editor);
        Some(id)
    }

    fn can_finish(&self) -> bool {
        self.vertices.len() >= self.kind.min_vertices()
    }

    fn cancel<S: MapSurface>(&mut self, editor: &mut Editor<S>) {
        self.reset();
        editor.set_cursor(None);
    }

    fn preview(&self) -> Vec<EditorFeature> {
        let mut positions = self.vertices.clone();
        positions.extend(self.trailing);
        let geometry = match positions.len() {
            0 => return Vec::new(),
            1 => Geometry::Point(positions[0]),
            n if self.kind == PathKind::Polygon && n >= 3 => self.kind.geometry(positions),
            _ => Geometry::LineString(positions),
        };
        vec![EditorFeature::marker(Meta::FeatureTemp, geometry)]
    }
}
