// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Douglas-Peucker simplification.
//!
//! Runs the full recursive algorithm without a radial-distance pre-pass.
//! Tolerance is in coordinate units (degrees). Lines never drop below two
//! positions and rings never below four; a ring that would collapse keeps
//! its original positions.

use crate::model::geometry::{MIN_LINE_POSITIONS, MIN_RING_POSITIONS};
use crate::model::{Geometry, Position};

pub fn simplify(geometry: &Geometry, tolerance: f64) -> Geometry {
    if tolerance <= 0.0 || !tolerance.is_finite() {
        return geometry.clone();
    }
    let sq = tolerance * tolerance;
    let line = |l: &Vec<Position>| simplify_line(l, sq);
    let ring = |r: &Vec<Position>| simplify_ring(r, sq);
    match geometry {
        Geometry::Point(_) | Geometry::MultiPoint(_) => geometry.clone(),
        Geometry::LineString(l) => Geometry::LineString(line(l)),
        Geometry::MultiLineString(ls) => Geometry::MultiLineString(ls.iter().map(&line).collect()),
        Geometry::Polygon(rings) => Geometry::Polygon(rings.iter().map(&ring).collect()),
        Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
            polys
                .iter()
                .map(|rings| rings.iter().map(&ring).collect::<Vec<_>>())
                .collect(),
        ),
    }
}

fn simplify_line(points: &[Position], sq_tolerance: f64) -> Vec<Position> {
    if points.len() <= MIN_LINE_POSITIONS {
        return points.to_vec();
    }
    douglas_peucker(points, sq_tolerance)
}

fn simplify_ring(ring: &[Position], sq_tolerance: f64) -> Vec<Position> {
    if ring.len() <= MIN_RING_POSITIONS {
        return ring.to_vec();
    }
    let simplified = douglas_peucker(ring, sq_tolerance);
    if simplified.len() < MIN_RING_POSITIONS {
        ring.to_vec()
    } else {
        simplified
    }
}

fn douglas_peucker(points: &[Position], sq_tolerance: f64) -> Vec<Position> {
    let last = points.len() - 1;
    let mut keep = vec![false; points.len()];
    keep[0] = true;
    keep[last] = true;
    step(points, 0, last, sq_tolerance, &mut keep);
    points
        .iter()
        .zip(keep)
        .filter_map(|(p, k)| k.then_some(*p))
        .collect()
}

fn step(points: &[Position], first: usize, last: usize, sq_tolerance: f64, keep: &mut [bool]) {
    let mut max_sq = sq_tolerance;
    let mut index = None;
    for i in first + 1..last {
        let d = sq_segment_distance(points[i], points[first], points[last]);
        if d > max_sq {
            max_sq = d;
            index = Some(i);
        }
    }
    if let Some(i) = index {
        keep[i] = true;
        if i - first > 1 {
            step(points, first, i, sq_tolerance, keep);
        }
        if last - i > 1 {
            step(points, i, last, sq_tolerance, keep);
        }
    }
}

fn sq_segment_distance(p: Position, a: Position, b: Position) -> f64 {
    let (mut x, mut y) = (a[0], a[1]);
    let (dx, dy) = (b[0] - x, b[1] - y);
    if dx != 0.0 || dy != 0.0 {
        let t = ((p[0] - x) * dx + (p[1] - y) * dy) / (dx * dx + dy * dy);
        if t > 1.0 {
            x = b[0];
            y = b[1];
        } else if t > 0.0 {
            x += dx * t;
            y += dy * t;
        }
    }
    let (ex, ey) = (p[0] - x, p[1] - y);
    ex * ex + ey * ey
}
