// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Line queries: nearest point, point-to-line distance, splitting.

use super::measure::{self, Units};
use super::projection::{from_mercator, to_mercator};
use crate::error::GeometryError;
use crate::model::Position;
use kurbo::{Line, ParamCurve, ParamCurveNearest, Point};

/// Accuracy passed to kurbo's nearest-point queries (exact for lines)
const NEAREST_ACCURACY: f64 = 1e-9;

/// The projection of a position onto a line
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearestPoint {
    /// Projected position on the line
    pub point: Position,
    /// Index of the segment containing the projection
    pub segment: usize,
    /// Parameter along that segment, `0.0..=1.0`
    pub t: f64,
    /// Distance from the query position, in meters
    pub distance_m: f64,
}

/// Nearest point of a planar segment to `p`, as `(point, t, distance²)`
pub fn nearest_on_segment(a: Point, b: Point, p: Point) -> (Point, f64, f64) {
    if a == b {
        return (a, 0.0, (p - a).hypot2());
    }
    let line = Line::new(a, b);
    let nearest = line.nearest(p, NEAREST_ACCURACY);
    (line.eval(nearest.t), nearest.t, nearest.distance_sq)
}

/// Project `p` onto a polyline
///
/// Segments are compared in Web Mercator, which matches what the map
/// displays. Returns `None` for lines with fewer than two positions.
pub fn nearest_point_on_line(line: &[Position], p: Position) -> Option<NearestPoint> {
    if line.len() < 2 {
        return None;
    }
    let target = to_mercator(p);
    let mut best: Option<(usize, Point, f64, f64)> = None;
    for (segment, pair) in line.windows(2).enumerate() {
        let (pt, t, dist_sq) = nearest_on_segment(to_mercator(pair[0]), to_mercator(pair[1]), target);
        if best.is_none_or(|(_, _, _, best_sq)| dist_sq < best_sq) {
            best = Some((segment, pt, t, dist_sq));
        }
    }
    best.map(|(segment, pt, t, _)| {
        // Snap exact endpoints back to the stored positions
        let point = if t <= 0.0 {
            line[segment]
        } else if t >= 1.0 {
            line[segment + 1]
        } else {
            from_mercator(pt)
        };
        NearestPoint {
            point,
            segment,
            t,
            distance_m: measure::distance(p, point, Units::Meters),
        }
    })
}

/// Distance from a position to the closest point of a polyline
pub fn point_to_line_distance(p: Position, line: &[Position], units: Units) -> Option<f64> {
    nearest_point_on_line(line, p).map(|n| units.from_meters(n.distance_m))
}

/// Split a polyline at the projection of `at`
///
/// Both halves include the split position. Splitting at (or beyond) an
/// endpoint would leave a degenerate half and is rejected.
pub fn split_line(
    line: &[Position],
    at: Position,
) -> Result<(Vec<Position>, Vec<Position>), GeometryError> {
    let nearest =
        nearest_point_on_line(line, at).ok_or(GeometryError::Degenerate("line has fewer than 2 positions"))?;
    let split = nearest.point;

    let mut first: Vec<Position> = line[..=nearest.segment].to_vec();
    if first.last() != Some(&split) {
        first.push(split);
    }

    let mut second = vec![split];
    second.extend(
        line[nearest.segment + 1..]
            .iter()
            .copied()
            .skip_while(|p| *p == split),
    );

    if distinct_count(&first) < 2 || distinct_count(&second) < 2 {
        return Err(GeometryError::Degenerate("split point is a line endpoint"));
    }
    Ok((first, second))
}

fn distinct_count(seq: &[Position]) -> usize {
    let mut count = 0;
    let mut prev: Option<&Position> = None;
    for p in seq {
        if prev != Some(p) {
            count += 1;
        }
        prev = Some(p);
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_point_on_horizontal_line() {
        let line = [[0.0, 0.0], [10.0, 0.0]];
        let n = nearest_point_on_line(&line, [3.0, 1.0]).unwrap();
        assert_eq!(n.segment, 0);
        assert!((n.point[0] - 3.0).abs() < 1e-9);
        assert!(n.point[1].abs() < 1e-9);
        assert!((n.distance_m - 111_195.0).abs() < 50.0);
    }

    #[test]
    fn nearest_point_clamps_to_endpoints() {
        let line = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]];
        let n = nearest_point_on_line(&line, [5.0, 5.0]).unwrap();
        assert_eq!(n.point, [1.0, 1.0]);
    }

    #[test]
    fn point_to_line_distance_in_units() {
        let line = [[0.0, 0.0], [0.0, 10.0]];
        let d = point_to_line_distance([1.0, 5.0], &line, Units::Kilometers).unwrap();
        assert!((d - 110.77).abs() < 0.5, "got {d}");
    }

    #[test]
    fn split_in_the_middle_of_a_segment() {
        let line = [[0.0, 0.0], [2.0, 0.0], [4.0, 0.0]];
        let (a, b) = split_line(&line, [3.0, 0.5]).unwrap();
        assert_eq!(a.len(), 3);
        assert_eq!(b.len(), 2);
        assert_eq!(a.last(), b.first());
        assert_eq!(b.last(), Some(&[4.0, 0.0]));
    }

    #[test]
    fn split_on_a_vertex_does_not_duplicate_it() {
        let line = [[0.0, 0.0], [2.0, 0.0], [4.0, 0.0]];
        let (a, b) = split_line(&line, [2.0, 0.0]).unwrap();
        assert_eq!(a, vec![[0.0, 0.0], [2.0, 0.0]]);
        assert_eq!(b, vec![[2.0, 0.0], [4.0, 0.0]]);
    }

    #[test]
    fn split_at_endpoint_is_rejected() {
        let line = [[0.0, 0.0], [4.0, 0.0]];
        assert!(split_line(&line, [-1.0, 0.0]).is_err());
    }
}
