// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Boolean polygon operations backed by `linesweeper`.
//!
//! Polygons are converted to `kurbo::BezPath`s (shells counterclockwise,
//! holes clockwise, so the non-zero fill rule reproduces them), combined by
//! the sweep-line engine, and the output contours are reassembled into
//! GeoJSON-style polygons by nesting depth.

use super::polygon::{point_in_ring, ring_signed_area};
use crate::error::GeometryError;
use crate::model::{Geometry, Position, geometry::close_ring};
use kurbo::{BezPath, PathEl, Point};
use linesweeper::{BinaryOp, FillRule, binary_op};

/// A polygon as a list of rings, outer ring first
pub type Rings = Vec<Vec<Position>>;

/// Polygons of a Polygon/MultiPolygon geometry
pub fn polygons_of(geometry: &Geometry) -> Result<Vec<Rings>, GeometryError> {
    match geometry {
        Geometry::Polygon(rings) => Ok(vec![rings.clone()]),
        Geometry::MultiPolygon(polys) => Ok(polys.clone()),
        other => Err(GeometryError::WrongType {
            expected: "Polygon",
            found: other.geometry_type().as_str(),
        }),
    }
}

/// Union of two polygonal geometries
pub fn union(a: &Geometry, b: &Geometry) -> Result<Geometry, GeometryError> {
    run(a, b, BinaryOp::Union)
}

/// `a` minus `b` for polygonal geometries
pub fn difference(a: &Geometry, b: &Geometry) -> Result<Geometry, GeometryError> {
    run(a, b, BinaryOp::Difference)
}

fn run(a: &Geometry, b: &Geometry, op: BinaryOp) -> Result<Geometry, GeometryError> {
    if !a.is_finite() || !b.is_finite() {
        return Err(GeometryError::NonFinite);
    }
    let path_a = polygons_to_path(&polygons_of(a)?);
    let path_b = polygons_to_path(&polygons_of(b)?);
    let rings = sweep(&path_a, &path_b, op)?;
    rings_to_geometry(rings)
}

/// Union of every subpath in `path` under the non-zero fill rule
///
/// Used by buffering, where overlapping pieces (all counterclockwise) are
/// merged into one outline.
pub fn dissolve(path: &BezPath) -> Result<Vec<Vec<Position>>, GeometryError> {
    sweep(path, &BezPath::new(), BinaryOp::Union)
}

/// Run the sweep and return the raw output rings
pub fn sweep(a: &BezPath, b: &BezPath, op: BinaryOp) -> Result<Vec<Vec<Position>>, GeometryError> {
    let contours = binary_op(a, b, FillRule::NonZero, op)
        .map_err(|e| GeometryError::BooleanOp(format!("{e:?}")))?;
    Ok(contours
        .contours()
        .map(|contour| path_to_ring(&contour.path))
        .filter(|ring| ring.len() >= 4)
        .collect())
}

/// Build a path from polygons, normalising ring orientation
pub fn polygons_to_path(polygons: &[Rings]) -> BezPath {
    let mut path = BezPath::new();
    for rings in polygons {
        for (idx, ring) in rings.iter().enumerate() {
            let ccw = ring_signed_area(ring) > 0.0;
            let want_ccw = idx == 0;
            if ccw == want_ccw {
                append_ring(&mut path, ring.iter().copied());
            } else {
                append_ring(&mut path, ring.iter().rev().copied());
            }
        }
    }
    path
}

/// Append one ring as a closed subpath
pub fn append_ring(path: &mut BezPath, ring: impl IntoIterator<Item = Position>) {
    let mut started = false;
    for p in ring {
        let pt = Point::new(p[0], p[1]);
        if started {
            path.line_to(pt);
        } else {
            path.move_to(pt);
            started = true;
        }
    }
    if started {
        path.close_path();
    }
}

fn path_to_ring(path: &BezPath) -> Vec<Position> {
    let mut ring: Vec<Position> = Vec::new();
    for el in path.elements() {
        let end = match *el {
            PathEl::MoveTo(p) | PathEl::LineTo(p) => p,
            PathEl::QuadTo(_, p) => p,
            PathEl::CurveTo(_, _, p) => p,
            PathEl::ClosePath => continue,
        };
        let pos = [end.x, end.y];
        if ring.last() != Some(&pos) {
            ring.push(pos);
        }
    }
    close_ring(ring)
}

/// Assemble output rings into a Polygon or MultiPolygon
///
/// Rings are nested by containment: even depth rings become shells, odd
/// depth rings become holes of the ring that contains them.
pub fn rings_to_geometry(rings: Vec<Vec<Position>>) -> Result<Geometry, GeometryError> {
    let mut rings: Vec<(Vec<Position>, f64)> = rings
        .into_iter()
        .map(|ring| {
            let area = ring_signed_area(&ring);
            (ring, area)
        })
        .filter(|(_, area)| area.abs() > f64::EPSILON)
        .collect();
    rings.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()));

    // For each ring: depth and the index of its polygon in `polygons`
    let mut placed: Vec<(usize, usize)> = Vec::with_capacity(rings.len());
    let mut polygons: Vec<Rings> = Vec::new();

    for i in 0..rings.len() {
        let sample = sample_point(&rings[i].0);
        let parent = (0..i)
            .rev()
            .find(|&j| point_in_ring(sample, &rings[j].0));

        let (ring, area) = &rings[i];
        match parent.map(|j| placed[j]) {
            Some((depth, poly)) if depth % 2 == 0 => {
                let hole = if *area > 0.0 { reversed(ring) } else { ring.clone() };
                polygons[poly].push(hole);
                placed.push((depth + 1, poly));
            }
            other => {
                let depth = other.map(|(d, _)| d + 1).unwrap_or(0);
                let shell = if *area < 0.0 { reversed(ring) } else { ring.clone() };
                polygons.push(vec![shell]);
                placed.push((depth, polygons.len() - 1));
            }
        }
    }

    match polygons.len() {
        0 => Err(GeometryError::EmptyResult),
        1 => Ok(Geometry::Polygon(polygons.remove(0))),
        _ => Ok(Geometry::MultiPolygon(polygons)),
    }
}

fn reversed(ring: &[Position]) -> Vec<Position> {
    ring.iter().rev().copied().collect()
}

/// A point on the ring's first edge, away from its vertices
fn sample_point(ring: &[Position]) -> Position {
    match ring {
        [a, b, ..] => [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0],
        [a] => *a,
        [] => [f64::NAN, f64::NAN],
    }
}
