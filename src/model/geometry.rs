// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry representation for editor features.
//!
//! `Geometry` mirrors the six GeoJSON geometry types and serializes to the
//! same `{"type", "coordinates"}` shape. Polygon rings are stored closed
//! (first position duplicated at the end); the vertex accessors hide the
//! closing duplicate so editing code never has to special-case it.

use serde::{Deserialize, Serialize};

/// A `[lng, lat]` position in map coordinates
pub type Position = [f64; 2];

/// Minimum positions in a LineString
pub const MIN_LINE_POSITIONS: usize = 2;

/// Minimum positions in a closed polygon ring (including the closing duplicate)
pub const MIN_RING_POSITIONS: usize = 4;

/// A feature geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "coordinates")]
pub enum Geometry {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
}

/// Geometry type tag, used for draw restrictions and combine/split checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GeometryType {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
}

impl GeometryType {
    /// Collapse a Multi* type to its single-part base
    pub fn base(self) -> GeometryType {
        match self {
            GeometryType::Point | GeometryType::MultiPoint => GeometryType::Point,
            GeometryType::LineString | GeometryType::MultiLineString => GeometryType::LineString,
            GeometryType::Polygon | GeometryType::MultiPolygon => GeometryType::Polygon,
        }
    }

    pub fn is_multi(self) -> bool {
        matches!(
            self,
            GeometryType::MultiPoint | GeometryType::MultiLineString | GeometryType::MultiPolygon
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            GeometryType::Point => "Point",
            GeometryType::LineString => "LineString",
            GeometryType::Polygon => "Polygon",
            GeometryType::MultiPoint => "MultiPoint",
            GeometryType::MultiLineString => "MultiLineString",
            GeometryType::MultiPolygon => "MultiPolygon",
        }
    }
}

/// Address of a single vertex inside a geometry
///
/// `part` indexes the member of a Multi* geometry, `ring` the ring of a
/// polygon, `index` the position within a line or ring. Components that do
/// not apply to a geometry type are zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CoordPath {
    pub part: usize,
    pub ring: usize,
    pub index: usize,
}

impl CoordPath {
    pub fn new(part: usize, ring: usize, index: usize) -> Self {
        Self { part, ring, index }
    }

    /// The same sequence, a different position within it
    pub fn with_index(self, index: usize) -> Self {
        Self { index, ..self }
    }
}

/// A straight edge between two consecutive vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    /// Path of the segment's start vertex
    pub path: CoordPath,
    pub start: Position,
    pub end: Position,
}

/// Whether a position has finite coordinates
pub fn is_valid_position(p: &Position) -> bool {
    p[0].is_finite() && p[1].is_finite()
}

/// Close a ring by duplicating the first position, if needed
pub fn close_ring(mut ring: Vec<Position>) -> Vec<Position> {
    if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied())
        && first != last
    {
        ring.push(first);
    }
    ring
}

impl Geometry {
    pub fn geometry_type(&self) -> GeometryType {
        match self {
            Geometry::Point(_) => GeometryType::Point,
            Geometry::LineString(_) => GeometryType::LineString,
            Geometry::Polygon(_) => GeometryType::Polygon,
            Geometry::MultiPoint(_) => GeometryType::MultiPoint,
            Geometry::MultiLineString(_) => GeometryType::MultiLineString,
            Geometry::MultiPolygon(_) => GeometryType::MultiPolygon,
        }
    }

    pub fn base_type(&self) -> GeometryType {
        self.geometry_type().base()
    }

    /// Every stored position, including polygon closing duplicates
    pub fn positions(&self) -> Vec<Position> {
        match self {
            Geometry::Point(p) => vec![*p],
            Geometry::LineString(line) | Geometry::MultiPoint(line) => line.clone(),
            Geometry::Polygon(rings) | Geometry::MultiLineString(rings) => {
                rings.iter().flatten().copied().collect()
            }
            Geometry::MultiPolygon(polys) => polys.iter().flatten().flatten().copied().collect(),
        }
    }

    /// Apply `f` to every stored position, producing a new geometry
    pub fn map_positions(&self, mut f: impl FnMut(Position) -> Position) -> Geometry {
        if let Geometry::Point(p) = self {
            return Geometry::Point(f(*p));
        }
        let mut map_seq = |seq: &Vec<Position>| seq.iter().map(|p| f(*p)).collect::<Vec<_>>();
        match self {
            Geometry::Point(p) => Geometry::Point(*p),
            Geometry::LineString(line) => Geometry::LineString(map_seq(line)),
            Geometry::MultiPoint(points) => Geometry::MultiPoint(map_seq(points)),
            Geometry::Polygon(rings) => Geometry::Polygon(rings.iter().map(&mut map_seq).collect()),
            Geometry::MultiLineString(lines) => {
                Geometry::MultiLineString(lines.iter().map(&mut map_seq).collect())
            }
            Geometry::MultiPolygon(polys) => Geometry::MultiPolygon(
                polys
                    .iter()
                    .map(|rings| rings.iter().map(&mut map_seq).collect::<Vec<_>>())
                    .collect(),
            ),
        }
    }

    /// Whether every position is finite
    pub fn is_finite(&self) -> bool {
        self.positions().iter().all(is_valid_position)
    }

    /// Editable vertices with their paths (polygon closing duplicates omitted)
    pub fn vertices(&self) -> Vec<(CoordPath, Position)> {
        let mut out = Vec::new();
        match self {
            Geometry::Point(p) => out.push((CoordPath::default(), *p)),
            Geometry::MultiPoint(points) => {
                for (part, p) in points.iter().enumerate() {
                    out.push((CoordPath::new(part, 0, 0), *p));
                }
            }
            Geometry::LineString(line) => push_sequence(&mut out, line, 0, 0, false),
            Geometry::MultiLineString(lines) => {
                for (part, line) in lines.iter().enumerate() {
                    push_sequence(&mut out, line, part, 0, false);
                }
            }
            Geometry::Polygon(rings) => {
                for (ring_idx, ring) in rings.iter().enumerate() {
                    push_sequence(&mut out, ring, 0, ring_idx, true);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for (part, rings) in polys.iter().enumerate() {
                    for (ring_idx, ring) in rings.iter().enumerate() {
                        push_sequence(&mut out, ring, part, ring_idx, true);
                    }
                }
            }
        }
        out
    }

    /// Straight edges between consecutive vertices, including ring closing edges
    pub fn segments(&self) -> Vec<Segment> {
        let mut out = Vec::new();
        let mut push = |seq: &[Position], part: usize, ring: usize| {
            for (index, pair) in seq.windows(2).enumerate() {
                out.push(Segment {
                    path: CoordPath::new(part, ring, index),
                    start: pair[0],
                    end: pair[1],
                });
            }
        };
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::LineString(line) => push(line, 0, 0),
            Geometry::MultiLineString(lines) => {
                for (part, line) in lines.iter().enumerate() {
                    push(line, part, 0);
                }
            }
            Geometry::Polygon(rings) => {
                for (ring_idx, ring) in rings.iter().enumerate() {
                    push(ring, 0, ring_idx);
                }
            }
            Geometry::MultiPolygon(polys) => {
                for (part, rings) in polys.iter().enumerate() {
                    for (ring_idx, ring) in rings.iter().enumerate() {
                        push(ring, part, ring_idx);
                    }
                }
            }
        }
        out
    }

    /// Positions considered by box selection
    ///
    /// Points and lines contribute every vertex; polygons contribute only
    /// their outer ring.
    pub fn selection_positions(&self) -> Vec<Position> {
        match self {
            Geometry::Point(_)
            | Geometry::MultiPoint(_)
            | Geometry::LineString(_)
            | Geometry::MultiLineString(_) => self.positions(),
            Geometry::Polygon(rings) => rings.first().cloned().unwrap_or_default(),
            Geometry::MultiPolygon(polys) => polys
                .iter()
                .filter_map(|rings| rings.first())
                .flatten()
                .copied()
                .collect(),
        }
    }

    /// Read one vertex
    pub fn vertex(&self, path: CoordPath) -> Option<Position> {
        match self {
            Geometry::Point(p) => Some(*p),
            Geometry::MultiPoint(points) => points.get(path.part).copied(),
            _ => self
                .sequence(path)
                .and_then(|(seq, _)| seq.get(path.index).copied()),
        }
    }

    /// Overwrite one vertex; returns false if the path does not exist
    pub fn set_vertex(&mut self, path: CoordPath, position: Position) -> bool {
        match self {
            Geometry::Point(p) => {
                *p = position;
                true
            }
            Geometry::MultiPoint(points) => match points.get_mut(path.part) {
                Some(p) => {
                    *p = position;
                    true
                }
                None => false,
            },
            _ => {
                let Some((seq, closed)) = self.sequence_mut(path) else {
                    return false;
                };
                let editable = if closed { seq.len().saturating_sub(1) } else { seq.len() };
                if path.index >= editable {
                    return false;
                }
                seq[path.index] = position;
                if closed && path.index == 0 {
                    let last = seq.len() - 1;
                    seq[last] = position;
                }
                true
            }
        }
    }

    /// Insert a vertex so it lands at `path.index`
    ///
    /// For closed rings the insertion index may not exceed the position of
    /// the closing duplicate. Point geometries cannot grow.
    pub fn insert_vertex(&mut self, path: CoordPath, position: Position) -> bool {
        match self {
            Geometry::Point(_) | Geometry::MultiPoint(_) => false,
            _ => {
                let Some((seq, closed)) = self.sequence_mut(path) else {
                    return false;
                };
                let max = if closed { seq.len().saturating_sub(1) } else { seq.len() };
                if path.index > max || (closed && path.index == 0) {
                    return false;
                }
                seq.insert(path.index, position);
                true
            }
        }
    }

    /// Remove a vertex, refusing if the geometry would become invalid
    pub fn remove_vertex(&mut self, path: CoordPath) -> bool {
        match self {
            Geometry::Point(_) => false,
            Geometry::MultiPoint(points) => {
                if points.len() <= 1 || path.part >= points.len() {
                    return false;
                }
                points.remove(path.part);
                true
            }
            _ => {
                let Some((seq, closed)) = self.sequence_mut(path) else {
                    return false;
                };
                if closed {
                    if seq.len() <= MIN_RING_POSITIONS || path.index >= seq.len() - 1 {
                        return false;
                    }
                    seq.remove(path.index);
                    if path.index == 0 {
                        let first = seq[0];
                        let last = seq.len() - 1;
                        seq[last] = first;
                    }
                } else {
                    if seq.len() <= MIN_LINE_POSITIONS || path.index >= seq.len() {
                        return false;
                    }
                    seq.remove(path.index);
                }
                true
            }
        }
    }

    /// Split a geometry into its single-part members
    pub fn parts(&self) -> Vec<Geometry> {
        match self {
            Geometry::MultiPoint(points) => points.iter().map(|p| Geometry::Point(*p)).collect(),
            Geometry::MultiLineString(lines) => {
                lines.iter().cloned().map(Geometry::LineString).collect()
            }
            Geometry::MultiPolygon(polys) => polys.iter().cloned().map(Geometry::Polygon).collect(),
            single => vec![single.clone()],
        }
    }

    /// Merge geometries sharing a base type into one Multi* geometry
    ///
    /// Returns `None` for an empty input or mixed base types.
    pub fn combine<'a>(geometries: impl IntoIterator<Item = &'a Geometry>) -> Option<Geometry> {
        let mut iter = geometries.into_iter().peekable();
        let base = iter.peek()?.base_type();
        let mut points = Vec::new();
        let mut lines = Vec::new();
        let mut polys = Vec::new();
        for geometry in iter {
            if geometry.base_type() != base {
                return None;
            }
            match geometry {
                Geometry::Point(p) => points.push(*p),
                Geometry::MultiPoint(ps) => points.extend(ps.iter().copied()),
                Geometry::LineString(l) => lines.push(l.clone()),
                Geometry::MultiLineString(ls) => lines.extend(ls.iter().cloned()),
                Geometry::Polygon(p) => polys.push(p.clone()),
                Geometry::MultiPolygon(ps) => polys.extend(ps.iter().cloned()),
            }
        }
        Some(match base {
            GeometryType::Point => Geometry::MultiPoint(points),
            GeometryType::LineString => Geometry::MultiLineString(lines),
            _ => Geometry::MultiPolygon(polys),
        })
    }

    fn sequence(&self, path: CoordPath) -> Option<(&Vec<Position>, bool)> {
        match self {
            Geometry::LineString(line) => Some((line, false)),
            Geometry::MultiLineString(lines) => lines.get(path.part).map(|l| (l, false)),
            Geometry::Polygon(rings) => rings.get(path.ring).map(|r| (r, true)),
            Geometry::MultiPolygon(polys) => polys
                .get(path.part)
                .and_then(|rings| rings.get(path.ring))
                .map(|r| (r, true)),
            Geometry::Point(_) | Geometry::MultiPoint(_) => None,
        }
    }

    fn sequence_mut(&mut self, path: CoordPath) -> Option<(&mut Vec<Position>, bool)> {
        match self {
            Geometry::LineString(line) => Some((line, false)),
            Geometry::MultiLineString(lines) => lines.get_mut(path.part).map(|l| (l, false)),
            Geometry::Polygon(rings) => rings.get_mut(path.ring).map(|r| (r, true)),
            Geometry::MultiPolygon(polys) => polys
                .get_mut(path.part)
                .and_then(|rings| rings.get_mut(path.ring))
                .map(|r| (r, true)),
            Geometry::Point(_) | Geometry::MultiPoint(_) => None,
        }
    }
}

fn push_sequence(
    out: &mut Vec<(CoordPath, Position)>,
    seq: &[Position],
    part: usize,
    ring: usize,
    closed: bool,
) {
    let count = if closed { seq.len().saturating_sub(1) } else { seq.len() };
    for (index, p) in seq.iter().take(count).enumerate() {
        out.push((CoordPath::new(part, ring, index), *p));
    }
}
