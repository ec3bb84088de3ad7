// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Planar polygon predicates and centers.
//!
//! These treat `[lng, lat]` as planar coordinates, which is accurate enough
//! for the feature sizes an interactive editor deals with.

use crate::model::{Geometry, Position};

/// Ray-casting point-in-ring test (ring may be open or closed)
pub fn point_in_ring(p: Position, ring: &[Position]) -> bool {
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (xi, yi) = (ring[i][0], ring[i][1]);
        let (xj, yj) = (ring[j][0], ring[j][1]);
        if (yi > p[1]) != (yj > p[1]) && p[0] < (xj - xi) * (p[1] - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

/// Point inside the outer ring and outside every hole
pub fn point_in_polygon(p: Position, rings: &[Vec<Position>]) -> bool {
    let Some((outer, holes)) = rings.split_first() else {
        return false;
    };
    point_in_ring(p, outer) && !holes.iter().any(|hole| point_in_ring(p, hole))
}

/// Whether a polygonal geometry contains the position
///
/// Non-polygonal geometries contain nothing.
pub fn geometry_contains(geometry: &Geometry, p: Position) -> bool {
    match geometry {
        Geometry::Polygon(rings) => point_in_polygon(p, rings),
        Geometry::MultiPolygon(polys) => polys.iter().any(|rings| point_in_polygon(p, rings)),
        _ => false,
    }
}

/// Shoelace signed area; positive for counterclockwise rings
pub fn ring_signed_area(ring: &[Position]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        sum += a[0] * b[1] - b[0] * a[1];
    }
    sum / 2.0
}

/// Area-weighted centroid of a ring with its signed area
fn ring_centroid(ring: &[Position]) -> Option<(Position, f64)> {
    let area = ring_signed_area(ring);
    if area == 0.0 {
        return None;
    }
    let mut cx = 0.0;
    let mut cy = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        let cross = a[0] * b[1] - b[0] * a[1];
        cx += (a[0] + b[0]) * cross;
        cy += (a[1] + b[1]) * cross;
    }
    Some(([cx / (6.0 * area), cy / (6.0 * area)], area))
}

/// Center of mass of a set of geometries
///
/// Polygonal members are weighted by area (holes subtract); when nothing has
/// area the mean of all vertices is used instead.
pub fn center_of_mass<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Option<Position> {
    let geometries: Vec<&Geometry> = geometries.into_iter().collect();

    let mut weighted = [0.0, 0.0];
    let mut total_area = 0.0;
    for geometry in &geometries {
        let polys: Vec<&Vec<Vec<Position>>> = match geometry {
            Geometry::Polygon(rings) => vec![rings],
            Geometry::MultiPolygon(polys) => polys.iter().collect(),
            _ => continue,
        };
        for rings in polys {
            for (idx, ring) in rings.iter().enumerate() {
                if let Some((c, area)) = ring_centroid(ring) {
                    // Outer rings add, holes subtract, whatever their winding
                    let weight = if idx == 0 { area.abs() } else { -area.abs() };
                    weighted[0] += c[0] * weight;
                    weighted[1] += c[1] * weight;
                    total_area += weight;
                }
            }
        }
    }
    if total_area.abs() > f64::EPSILON {
        return Some([weighted[0] / total_area, weighted[1] / total_area]);
    }

    let vertices: Vec<Position> = geometries
        .iter()
        .flat_map(|g| g.vertices().into_iter().map(|(_, p)| p))
        .collect();
    if vertices.is_empty() {
        return None;
    }
    let n = vertices.len() as f64;
    let sum = vertices
        .iter()
        .fold([0.0, 0.0], |acc, p| [acc[0] + p[0], acc[1] + p[1]]);
    Some([sum[0] / n, sum[1] / n])
}
