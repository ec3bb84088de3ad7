// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Pointer snapping to feature vertices and edges.
//!
//! All distances are measured in screen pixels through the surface
//! projection, so the snap radius feels the same at every zoom level.
//! Vertex snaps win over edge snaps.

use crate::geometry::line::nearest_on_segment;
use crate::model::geometry::is_valid_position;
use crate::model::{CoordPath, EditorFeature, FeatureId, Position};
use crate::settings;
use crate::surface::Projection;
use kurbo::Point;

/// Snap behaviour switches
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapOptions {
    pub enabled: bool,
    /// Snap radius in screen pixels
    pub distance_px: f64,
    pub to_vertices: bool,
    pub to_edges: bool,
}

impl Default for SnapOptions {
    fn default() -> Self {
        Self {
            enabled: settings::snap::ENABLED,
            distance_px: settings::snap::DISTANCE_PX,
            to_vertices: settings::snap::TO_VERTICES,
            to_edges: settings::snap::TO_EDGES,
        }
    }
}

/// Outcome of a snap query
///
/// At most one of `vertex_index` / `edge_index` is set.
#[derive(Debug, Clone, PartialEq)]
pub struct SnapResult {
    pub snapped: bool,
    /// The snapped position, or the input position when not snapped
    pub point: Position,
    pub feature: Option<FeatureId>,
    pub vertex_index: Option<CoordPath>,
    /// Path of the segment's start vertex
    pub edge_index: Option<CoordPath>,
}

impl SnapResult {
    fn none(point: Position) -> Self {
        Self {
            snapped: false,
            point,
            feature: None,
            vertex_index: None,
            edge_index: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SnapEngine {
    options: SnapOptions,
}

impl SnapEngine {
    pub fn new(options: SnapOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SnapOptions {
        self.options
    }

    pub fn is_enabled(&self) -> bool {
        self.options.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.options.enabled = enabled;
    }

    /// Snap `position` against `candidates`, ignoring `exclude`
    ///
    /// Returns an unsnapped result when snapping is disabled or no
    /// projection is available.
    pub fn snap<'a, P: Projection + ?Sized>(
        &self,
        projection: Option<&P>,
        position: Position,
        candidates: impl IntoIterator<Item = &'a EditorFeature>,
        exclude: &[FeatureId],
    ) -> SnapResult {
        let Some(projection) = projection else {
            return SnapResult::none(position);
        };
        if !self.options.enabled || !is_valid_position(&position) {
            return SnapResult::none(position);
        }

        let pointer = projection.project(position);
        let candidates: Vec<&EditorFeature> = candidates
            .into_iter()
            .filter(|f| !exclude.contains(&f.id))
            .collect();

        if self.options.to_vertices
            && let Some(result) = self.snap_to_vertex(projection, pointer, &candidates)
        {
            return result;
        }
        if self.options.to_edges
            && let Some(result) = self.snap_to_edge(projection, pointer, &candidates)
        {
            return result;
        }
        SnapResult::none(position)
    }

    fn snap_to_vertex<P: Projection + ?Sized>(
        &self,
        projection: &P,
        pointer: Point,
        candidates: &[&EditorFeature],
    ) -> Option<SnapResult> {
        let mut best: Option<(f64, &FeatureId, CoordPath, Position)> = None;
        for feature in candidates {
            for (path, vertex) in feature.geometry.vertices() {
                if !is_valid_position(&vertex) {
                    continue;
                }
                let dist = projection.project(vertex).distance(pointer);
                if best.is_none_or(|(d, ..)| dist < d) {
                    best = Some((dist, &feature.id, path, vertex));
                }
            }
        }

        let (dist, id, path, vertex) = best?;
        tracing::debug!("[snap] nearest vertex {id} at {dist:.1}px");
        (dist < self.options.distance_px).then(|| SnapResult {
            snapped: true,
            point: vertex,
            feature: Some(id.clone()),
            vertex_index: Some(path),
            edge_index: None,
        })
    }

    fn snap_to_edge<P: Projection + ?Sized>(
        &self,
        projection: &P,
        pointer: Point,
        candidates: &[&EditorFeature],
    ) -> Option<SnapResult> {
        let mut best: Option<(f64, &FeatureId, CoordPath, Point)> = None;
        for feature in candidates {
            for segment in feature.geometry.segments() {
                if !is_valid_position(&segment.start) || !is_valid_position(&segment.end) {
                    continue;
                }
                let (pt, _, dist_sq) = nearest_on_segment(
                    projection.project(segment.start),
                    projection.project(segment.end),
                    pointer,
                );
                let dist = dist_sq.sqrt();
                if best.is_none_or(|(d, ..)| dist < d) {
                    best = Some((dist, &feature.id, segment.path, pt));
                }
            }
        }

        let (dist, id, path, pt) = best?;
        tracing::debug!("[snap] nearest edge of {id} at {dist:.1}px");
        (dist < self.options.distance_px).then(|| SnapResult {
            snapped: true,
            point: projection.unproject(pt),
            feature: Some(id.clone()),
            vertex_index: None,
            edge_index: Some(path),
        })
    }
}
