// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! The rendering surface the editor draws onto.
//!
//! The editor never renders anything itself. It pushes whole feature
//! collections into named data sinks and asks the surface to project
//! coordinates and hit-test what it has drawn.

pub mod memory;

pub use memory::MemorySurface;

use crate::error::SurfaceError;
use crate::model::{EditorFeature, FeatureCollection, Geometry, GeometryType, Meta, Position};
use kurbo::{Point, Rect};

/// Conversion between map positions and screen pixels
pub trait Projection {
    /// Map position to screen pixels
    fn project(&self, position: Position) -> Point;

    /// Screen pixels to map position
    fn unproject(&self, point: Point) -> Position;
}

/// A map rendering surface
pub trait MapSurface: Projection {
    /// Rendered features under a screen point, topmost first
    fn query_rendered_features(&self, point: Point, layers: &[Layer]) -> Vec<EditorFeature>;

    /// Rendered features intersecting a screen rectangle
    fn query_rendered_features_in(&self, rect: Rect, layers: &[Layer]) -> Vec<EditorFeature>;

    /// Replace the contents of a data sink
    fn set_source(&mut self, source: SourceId, data: FeatureCollection)
    -> Result<(), SurfaceError>;

    fn remove_source(&mut self, source: SourceId) -> Result<(), SurfaceError>;

    /// Enable or suspend map drag-panning
    fn set_drag_pan(&mut self, enabled: bool);

    /// Bind input delivery to the editor
    fn attach(&mut self) -> Result<(), SurfaceError>;

    /// Release input delivery
    fn detach(&mut self) -> Result<(), SurfaceError>;
}

// ===== Data sinks =====

/// Data sinks the editor renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SourceId {
    /// Live features plus the in-progress drawing preview
    Features,
    /// Vertex and midpoint markers of selected features
    Vertices,
    /// Highlight of selected features
    Selection,
    /// Rubber-band rectangle of a box selection
    SelectionBox,
    /// Rotate/move handles
    Gizmo,
    /// Snap cursor
    Cursor,
    /// Touch offset and snap preview
    TouchPreview,
}

impl SourceId {
    pub const ALL: [SourceId; 7] = [
        SourceId::Features,
        SourceId::Vertices,
        SourceId::Selection,
        SourceId::SelectionBox,
        SourceId::Gizmo,
        SourceId::Cursor,
        SourceId::TouchPreview,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SourceId::Features => "geodraw-features",
            SourceId::Vertices => "geodraw-vertices",
            SourceId::Selection => "geodraw-selection",
            SourceId::SelectionBox => "geodraw-selection-box",
            SourceId::Gizmo => "geodraw-gizmo",
            SourceId::Cursor => "geodraw-cursor",
            SourceId::TouchPreview => "geodraw-touch-preview",
        }
    }
}

// ===== Layers =====

/// Queryable render layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    /// Polygon fills of live features
    Fill,
    /// Line strokes of live features
    Line,
    /// Point circles of live features
    Point,
    /// Vertex markers
    Vertex,
    /// Midpoint markers
    Midpoint,
    /// Gizmo handles
    Gizmo,
}

impl Layer {
    /// The sink this layer draws
    pub fn source(self) -> SourceId {
        match self {
            Layer::Fill | Layer::Line | Layer::Point => SourceId::Features,
            Layer::Vertex | Layer::Midpoint => SourceId::Vertices,
            Layer::Gizmo => SourceId::Gizmo,
        }
    }

    /// Whether this layer draws `feature`
    pub fn draws(self, feature: &EditorFeature) -> bool {
        let base = feature.geometry.base_type();
        match self {
            Layer::Fill => feature.is_live() && base == GeometryType::Polygon,
            Layer::Line => {
                feature.is_live()
                    && matches!(base, GeometryType::LineString | GeometryType::Polygon)
            }
            Layer::Point => feature.is_live() && base == GeometryType::Point,
            Layer::Vertex => feature.meta() == Some(Meta::Vertex),
            Layer::Midpoint => feature.meta() == Some(Meta::Midpoint),
            Layer::Gizmo => matches!(
                feature.meta(),
                Some(Meta::GizmoRotate | Meta::GizmoMove | Meta::GizmoCenter)
            ) && matches!(feature.geometry, Geometry::Point(_)),
        }
    }
}
