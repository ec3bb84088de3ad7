// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! In-memory rendering surface.
//!
//! Keeps the last collection pushed to every sink and hit-tests them with
//! fixed marker sizes. The projection is a plain equirectangular scale, so
//! screen distances are easy to reason about in tests and replays.

use super::{Layer, MapSurface, Projection, SourceId};
use crate::error::SurfaceError;
use crate::geometry::geometry_contains;
use crate::geometry::line::nearest_on_segment;
use crate::model::{EditorFeature, FeatureCollection, Geometry, Position};
use kurbo::{Point, Rect};
use std::collections::HashMap;

/// Hit radius of point-like markers, in pixels
const POINT_HIT_RADIUS_PX: f64 = 6.0;

/// Hit half-width of line strokes, in pixels
const LINE_HIT_WIDTH_PX: f64 = 4.0;

#[derive(Debug, Clone)]
pub struct MemorySurface {
    /// Map position drawn at screen (0, 0)
    origin: Position,
    pixels_per_degree: f64,
    sources: HashMap<SourceId, FeatureCollection>,
    drag_pan: bool,
    attached: bool,
    removed: bool,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::with_view([0.0, 0.0], 10.0)
    }

    pub fn with_view(origin: Position, pixels_per_degree: f64) -> Self {
        Self {
            origin,
            pixels_per_degree,
            sources: HashMap::new(),
            drag_pan: true,
            attached: false,
            removed: false,
        }
    }

    /// Last collection pushed to a sink
    pub fn source(&self, source: SourceId) -> Option<&FeatureCollection> {
        self.sources.get(&source)
    }

    pub fn drag_pan_enabled(&self) -> bool {
        self.drag_pan
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Simulate the host tearing the map down; every later call fails
    pub fn remove(&mut self) {
        self.removed = true;
        self.sources.clear();
        self.attached = false;
    }

    fn layer_features(&self, layer: Layer) -> impl Iterator<Item = &EditorFeature> {
        self.sources
            .get(&layer.source())
            .into_iter()
            .flat_map(|collection| collection.features.iter().rev())
            .filter(move |feature| layer.draws(feature))
    }

    fn hits_point(&self, layer: Layer, feature: &EditorFeature, point: Point) -> bool {
        match layer {
            Layer::Fill => geometry_contains(&feature.geometry, self.unproject(point)),
            Layer::Line => feature.geometry.segments().iter().any(|segment| {
                let (_, _, dist_sq) =
                    nearest_on_segment(self.project(segment.start), self.project(segment.end), point);
                dist_sq.sqrt() <= LINE_HIT_WIDTH_PX
            }),
            _ => point_positions(&feature.geometry)
                .iter()
                .any(|p| self.project(*p).distance(point) <= POINT_HIT_RADIUS_PX),
        }
    }

    fn hits_rect(&self, layer: Layer, feature: &EditorFeature, rect: Rect) -> bool {
        let vertex_inside = feature
            .geometry
            .positions()
            .iter()
            .any(|p| rect.contains(self.project(*p)));
        if vertex_inside {
            return true;
        }
        match layer {
            Layer::Fill | Layer::Line => {
                let crosses = feature.geometry.segments().iter().any(|segment| {
                    segment_crosses_rect(self.project(segment.start), self.project(segment.end), rect)
                });
                crosses
                    || (layer == Layer::Fill
                        && geometry_contains(&feature.geometry, self.unproject(rect.center())))
            }
            _ => false,
        }
    }

    fn check(&self) -> Result<(), SurfaceError> {
        if self.removed {
            Err(SurfaceError::Detached)
        } else {
            Ok(())
        }
    }
}

impl Default for MemorySurface {
    fn default() -> Self {
        Self::new()
    }
}

impl Projection for MemorySurface {
    fn project(&self, position: Position) -> Point {
        Point::new(
            (position[0] - self.origin[0]) * self.pixels_per_degree,
            (self.origin[1] - position[1]) * self.pixels_per_degree,
        )
    }

    fn unproject(&self, point: Point) -> Position {
        [
            self.origin[0] + point.x / self.pixels_per_degree,
            self.origin[1] - point.y / self.pixels_per_degree,
        ]
    }
}

impl MapSurface for MemorySurface {
    fn query_rendered_features(&self, point: Point, layers: &[Layer]) -> Vec<EditorFeature> {
        let mut hits = Vec::new();
        for layer in layers {
            for feature in self.layer_features(*layer) {
                if self.hits_point(*layer, feature, point) {
                    hits.push(feature.clone());
                }
            }
        }
        hits
    }

    fn query_rendered_features_in(&self, rect: Rect, layers: &[Layer]) -> Vec<EditorFeature> {
        let mut hits: Vec<EditorFeature> = Vec::new();
        for layer in layers {
            for feature in self.layer_features(*layer) {
                if !hits.iter().any(|h| h.id == feature.id) && self.hits_rect(*layer, feature, rect) {
                    hits.push(feature.clone());
                }
            }
        }
        hits
    }

    fn set_source(
        &mut self,
        source: SourceId,
        data: FeatureCollection,
    ) -> Result<(), SurfaceError> {
        self.check()?;
        self.sources.insert(source, data);
        Ok(())
    }

    fn remove_source(&mut self, source: SourceId) -> Result<(), SurfaceError> {
        self.check()?;
        self.sources
            .remove(&source)
            .map(|_| ())
            .ok_or_else(|| SurfaceError::UnknownSource(source.as_str().to_string()))
    }

    fn set_drag_pan(&mut self, enabled: bool) {
        self.drag_pan = enabled;
    }

    fn attach(&mut self) -> Result<(), SurfaceError> {
        self.check()?;
        self.attached = true;
        Ok(())
    }

    fn detach(&mut self) -> Result<(), SurfaceError> {
        self.check()?;
        self.attached = false;
        Ok(())
    }
}

fn point_positions(geometry: &Geometry) -> Vec<Position> {
    match geometry {
        Geometry::Point(p) => vec![*p],
        Geometry::MultiPoint(points) => points.clone(),
        _ => Vec::new(),
    }
}

fn segment_crosses_rect(a: Point, b: Point, rect: Rect) -> bool {
    let corners = [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x1, rect.y1),
        Point::new(rect.x0, rect.y1),
    ];
    (0..4).any(|i| segments_intersect(a, b, corners[i], corners[(i + 1) % 4]))
}

fn segments_intersect(p1: Point, p2: Point, q1: Point, q2: Point) -> bool {
    let d1 = (p2 - p1).cross(q1 - p1);
    let d2 = (p2 - p1).cross(q2 - p1);
    let d3 = (q2 - q1).cross(p1 - q1);
    let d4 = (q2 - q1).cross(p2 - q1);
    d1 * d2 <= 0.0 && d3 * d4 <= 0.0 && (d1 != 0.0 || d2 != 0.0)
}
