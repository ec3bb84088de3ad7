// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry buffering.
//!
//! A buffer is the Minkowski sum of the geometry with a disk. We build it in
//! a local metric frame as the union of: a disk per vertex, a rectangle per
//! edge, and (for polygons) the polygon itself. Negative radii shrink
//! polygons by subtracting the same edge pieces instead.

use super::boolean::{self, Rings, append_ring, polygons_to_path};
use super::measure::Units;
use super::projection::{LocalFrame, left_normal};
use crate::error::GeometryError;
use crate::model::{Geometry, Position};
use crate::settings;
use kurbo::{BezPath, Point};
use linesweeper::BinaryOp;
use std::f64::consts::TAU;

/// Buffer a geometry by `radius` in `units`
///
/// A zero radius returns the geometry unchanged. Negative radii are only
/// meaningful for polygons; other geometries yield an empty result.
pub fn buffer(geometry: &Geometry, radius: f64, units: Units) -> Result<Geometry, GeometryError> {
    if !radius.is_finite() || !geometry.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    if radius == 0.0 {
        return Ok(geometry.clone());
    }

    let anchor = geometry
        .positions()
        .first()
        .copied()
        .ok_or(GeometryError::Degenerate("geometry has no positions"))?;
    let frame = LocalFrame::new(anchor);
    let radius_m = units.to_meters(radius);
    let local = |p: &Position| frame.to_local(*p);

    let mut pieces = BezPath::new();
    let mut polygons: Vec<Rings> = Vec::new();
    let mut edges: Vec<(Point, Point)> = Vec::new();
    let mut vertices: Vec<Point> = Vec::new();

    match geometry {
        Geometry::Point(p) => vertices.push(local(p)),
        Geometry::MultiPoint(points) => vertices.extend(points.iter().map(local)),
        Geometry::LineString(_) | Geometry::MultiLineString(_) => {
            for segment in geometry.segments() {
                edges.push((local(&segment.start), local(&segment.end)));
            }
            vertices.extend(geometry.positions().iter().map(local));
        }
        Geometry::Polygon(_) | Geometry::MultiPolygon(_) => {
            for rings in boolean::polygons_of(geometry)? {
                polygons.push(
                    rings
                        .iter()
                        .map(|ring| {
                            ring.iter()
                                .map(|p| {
                                    let pt = local(p);
                                    [pt.x, pt.y]
                                })
                                .collect()
                        })
                        .collect(),
                );
            }
            for segment in geometry.segments() {
                edges.push((local(&segment.start), local(&segment.end)));
            }
            vertices.extend(geometry.positions().iter().map(local));
        }
    }

    let r = radius_m.abs();
    for v in &vertices {
        append_ring(&mut pieces, circle(*v, r));
    }
    for (a, b) in &edges {
        if let Some(ring) = edge_rect(*a, *b, r) {
            append_ring(&mut pieces, ring);
        }
    }

    let rings = if radius_m > 0.0 {
        let mut all = polygons_to_path(&polygons);
        all.extend(pieces);
        boolean::dissolve(&all)?
    } else if polygons.is_empty() {
        return Err(GeometryError::EmptyResult);
    } else {
        boolean::sweep(&polygons_to_path(&polygons), &pieces, BinaryOp::Difference)?
    };

    let local_geometry = boolean::rings_to_geometry(rings)?;
    Ok(local_geometry.map_positions(|p| frame.to_geo(Point::new(p[0], p[1]))))
}

/// Counterclockwise circle approximation (closed)
fn circle(center: Point, radius: f64) -> Vec<Position> {
    let steps = settings::geo::BUFFER_CIRCLE_STEPS;
    let mut ring: Vec<Position> = (0..steps)
        .map(|i| {
            let angle = TAU * i as f64 / steps as f64;
            [center.x + radius * angle.cos(), center.y + radius * angle.sin()]
        })
        .collect();
    ring.push(ring[0]);
    ring
}

/// Counterclockwise rectangle of half-width `radius` around segment `a -> b`
fn edge_rect(a: Point, b: Point, radius: f64) -> Option<Vec<Position>> {
    let n = left_normal(a, b)? * radius;
    let corners = [a - n, b - n, b + n, a + n, a - n];
    Some(corners.iter().map(|p| [p.x, p.y]).collect())
}
