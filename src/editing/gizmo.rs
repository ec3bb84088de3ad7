// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Rotate/move handles for the current selection.
//!
//! Handles sit at fixed pixel offsets from the selection's center of mass:
//! the rotate handle above it, the move handle to its right. A drag keeps
//! the pre-drag snapshots and recomputes every frame from them, so repeated
//! pointer moves never accumulate rounding error.

use super::transform;
use crate::geometry::measure::{angle_delta, bearing};
use crate::model::{EditorFeature, Geometry, Meta, Position};
use crate::settings;
use crate::surface::Projection;
use kurbo::{Point, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GizmoHandle {
    Rotate,
    Move,
}

/// Screen placement of the handles around a center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GizmoLayout {
    pub center: Position,
    pub center_screen: Point,
    pub rotate_screen: Point,
    pub move_screen: Point,
}

impl GizmoLayout {
    pub fn new<P: Projection + ?Sized>(projection: &P, center: Position) -> Self {
        let center_screen = projection.project(center);
        Self {
            center,
            center_screen,
            rotate_screen: center_screen - Vec2::new(0.0, settings::gizmo::ROTATE_OFFSET_PX),
            move_screen: center_screen + Vec2::new(settings::gizmo::MOVE_OFFSET_PX, 0.0),
        }
    }

    /// The handle under a screen point, if any
    pub fn hit(&self, screen: Point) -> Option<GizmoHandle> {
        let radius = settings::gizmo::HANDLE_RADIUS_PX;
        let rotate = self.rotate_screen.distance(screen);
        let mv = self.move_screen.distance(screen);
        tracing::debug!("[gizmo] hit test: rotate {rotate:.1}px, move {mv:.1}px");
        if rotate <= radius && rotate <= mv {
            Some(GizmoHandle::Rotate)
        } else if mv <= radius {
            Some(GizmoHandle::Move)
        } else {
            None
        }
    }

    /// Marker features for the gizmo sink
    pub fn features<P: Projection + ?Sized>(&self, projection: &P) -> Vec<EditorFeature> {
        let rotate = projection.unproject(self.rotate_screen);
        let mv = projection.unproject(self.move_screen);
        vec![
            EditorFeature::marker(
                Meta::GizmoLine,
                Geometry::LineString(vec![self.center, rotate]),
            ),
            EditorFeature::marker(Meta::GizmoCenter, Geometry::Point(self.center)),
            EditorFeature::marker(Meta::GizmoRotate, Geometry::Point(rotate)),
            EditorFeature::marker(Meta::GizmoMove, Geometry::Point(mv)),
        ]
    }
}

/// An in-progress handle drag
#[derive(Debug, Clone)]
pub struct GizmoDrag {
    handle: GizmoHandle,
    center: Position,
    start: Position,
    start_bearing: f64,
    snapshots: Vec<EditorFeature>,
}

impl GizmoDrag {
    pub fn begin(
        handle: GizmoHandle,
        center: Position,
        start: Position,
        snapshots: Vec<EditorFeature>,
    ) -> Self {
        tracing::debug!("[gizmo] begin {handle:?} drag on {} features", snapshots.len());
        Self {
            handle,
            center,
            start,
            start_bearing: bearing(center, start),
            snapshots,
        }
    }

    pub fn handle(&self) -> GizmoHandle {
        self.handle
    }

    /// Pre-drag copies of the dragged features
    pub fn snapshots(&self) -> &[EditorFeature] {
        &self.snapshots
    }

    pub fn into_snapshots(self) -> Vec<EditorFeature> {
        self.snapshots
    }

    /// The dragged features as they should look with the pointer at `live`
    pub fn update(&self, live: Position) -> Vec<EditorFeature> {
        match self.handle {
            GizmoHandle::Rotate => {
                // Bearings run clockwise; rotation angles run counterclockwise
                let angle = -angle_delta(self.start_bearing, bearing(self.center, live));
                self.snapshots
                    .iter()
                    .map(|f| transform::rotate(f, self.center, angle))
                    .collect()
            }
            GizmoHandle::Move => self
                .snapshots
                .iter()
                .map(|f| transform::move_feature(f, self.start, live))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::MemorySurface;

    fn point(id: &str, p: Position) -> EditorFeature {
        EditorFeature::with_id(id.into(), Geometry::Point(p))
    }

    #[test]
    fn handles_sit_at_pixel_offsets() {
        let surface = MemorySurface::new();
        let layout = GizmoLayout::new(&surface, [1.0, 1.0]);
        assert_eq!(layout.center_screen, Point::new(10.0, -10.0));
        assert_eq!(layout.rotate_screen, Point::new(10.0, -70.0));
        assert_eq!(layout.move_screen, Point::new(70.0, -10.0));
    }

    #[test]
    fn hit_test_picks_nearest_handle() {
        let surface = MemorySurface::new();
        let layout = GizmoLayout::new(&surface, [0.0, 0.0]);
        assert_eq!(layout.hit(Point::new(2.0, -58.0)), Some(GizmoHandle::Rotate));
        assert_eq!(layout.hit(Point::new(61.0, 1.0)), Some(GizmoHandle::Move));
        assert_eq!(layout.hit(Point::new(0.0, 0.0)), None);
    }

    #[test]
    fn gizmo_features_are_markers() {
        let surface = MemorySurface::new();
        let features = GizmoLayout::new(&surface, [0.0, 0.0]).features(&surface);
        assert_eq!(features.len(), 4);
        assert!(features.iter().all(|f| !f.is_live()));
    }

    #[test]
    fn rotate_drag_is_recomputed_from_snapshots() {
        let drag = GizmoDrag::begin(
            GizmoHandle::Rotate,
            [0.0, 0.0],
            [0.0, 1.0],
            vec![point("a", [0.0, 0.5])],
        );
        // Pointer swings from north to west: a quarter turn counterclockwise
        let once = drag.update([-1.0, 0.0]);
        let again = drag.update([-1.0, 0.0]);
        assert_eq!(once, again);
        let Geometry::Point(p) = once[0].geometry else {
            panic!("expected point");
        };
        assert!((p[0] + 0.5).abs() < 1e-3, "{p:?}");
        assert!(p[1].abs() < 1e-6, "{p:?}");
    }

    #[test]
    fn move_drag_follows_pointer() {
        let drag = GizmoDrag::begin(
            GizmoHandle::Move,
            [0.0, 0.0],
            [0.0, 0.0],
            vec![point("a", [0.0, 0.0])],
        );
        let moved = drag.update([0.5, 0.0]);
        let Geometry::Point(p) = moved[0].geometry else {
            panic!("expected point");
        };
        assert!((p[0] - 0.5).abs() < 1e-6);
        assert_eq!(drag.snapshots()[0].geometry, Geometry::Point([0.0, 0.0]));
    }
}
