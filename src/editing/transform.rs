// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Whole-feature transform operators.
//!
//! Every operator takes features by reference and returns fresh copies;
//! nothing here touches the store or history. Operators that can fail
//! return `Option` and log the underlying [`GeometryError`] at warn level.

use crate::error::GeometryError;
use crate::geometry::projection::{apply, rotation_about, scale_about};
use crate::geometry::{self, Units, bearing, destination, distance};
use crate::model::{EditorFeature, FeatureId, Geometry, GeometryType, Position};

/// Rotate about `center` by `angle` degrees, counterclockwise
pub fn rotate(feature: &EditorFeature, center: Position, angle: f64) -> EditorFeature {
    if angle % 360.0 == 0.0 {
        return feature.clone();
    }
    let transform = rotation_about(center, angle);
    with_geometry(feature, feature.geometry.map_positions(|p| apply(transform, p)))
}

/// Scale about `center` by `factor`
pub fn scale(feature: &EditorFeature, center: Position, factor: f64) -> EditorFeature {
    if factor == 1.0 {
        return feature.clone();
    }
    let transform = scale_about(center, factor);
    with_geometry(feature, feature.geometry.map_positions(|p| apply(transform, p)))
}

/// Translate every coordinate by the geodesic offset `from -> to`
pub fn move_feature(feature: &EditorFeature, from: Position, to: Position) -> EditorFeature {
    let dist = distance(from, to, Units::Meters);
    if dist == 0.0 {
        return feature.clone();
    }
    let heading = bearing(from, to);
    with_geometry(
        feature,
        feature
            .geometry
            .map_positions(|p| destination(p, dist, heading, Units::Meters)),
    )
}

/// Split a LineString at the projection of `at`
///
/// The halves get derived ids (`<id>_split_1`, `<id>_split_2`) and keep the
/// original properties.
pub fn split_line(feature: &EditorFeature, at: Position) -> Option<(EditorFeature, EditorFeature)> {
    let result = match &feature.geometry {
        Geometry::LineString(line) => geometry::split_line(line, at),
        other => Err(GeometryError::WrongType {
            expected: "LineString",
            found: other.geometry_type().as_str(),
        }),
    };
    let (first, second) = logged("split_line", result)?;
    let half = |suffix: &str, line: Vec<Position>| {
        let mut part = with_geometry(feature, Geometry::LineString(line));
        part.id = feature.id.derived(suffix);
        part
    };
    Some((half("split_1", first), half("split_2", second)))
}

/// Pairwise union of polygonal features
///
/// The result keeps the first feature's id and properties.
pub fn union(features: &[EditorFeature]) -> Option<EditorFeature> {
    let result = match features {
        [] | [_] => Err(GeometryError::TooFewInputs {
            needed: 2,
            got: features.len(),
        }),
        [first, rest @ ..] => rest
            .iter()
            .try_fold(first.geometry.clone(), |acc, next| {
                geometry::boolean::union(&acc, &next.geometry)
            }),
    };
    let merged = logged("union", result)?;
    Some(with_geometry(&features[0], merged))
}

/// `a` minus `b`; `None` when nothing is left
pub fn difference(a: &EditorFeature, b: &EditorFeature) -> Option<EditorFeature> {
    let remainder = logged(
        "difference",
        geometry::boolean::difference(&a.geometry, &b.geometry),
    )?;
    Some(with_geometry(a, remainder))
}

/// Buffer by `radius` in `units` (negative shrinks polygons)
pub fn buffer(feature: &EditorFeature, radius: f64, units: Units) -> Option<EditorFeature> {
    let buffered = logged(
        "buffer",
        geometry::buffer::buffer(&feature.geometry, radius, units),
    )?;
    Some(with_geometry(feature, buffered))
}

/// Douglas-Peucker simplification with `tolerance` in degrees
pub fn simplify(feature: &EditorFeature, tolerance: f64) -> EditorFeature {
    with_geometry(
        feature,
        geometry::simplify::simplify(&feature.geometry, tolerance),
    )
}

/// Merge features sharing a base type into one Multi* feature
///
/// The result keeps the first feature's id and properties.
pub fn combine(features: &[EditorFeature]) -> Option<EditorFeature> {
    if features.len() < 2 {
        tracing::debug!("[transform] combine needs 2 features, got {}", features.len());
        return None;
    }
    let combined = Geometry::combine(features.iter().map(|f| &f.geometry))?;
    Some(with_geometry(&features[0], combined))
}

/// Decompose a Multi* feature into one feature per part
///
/// The first part keeps the original id; the rest get fresh ids. Single
/// geometries yield an empty list.
pub fn explode(feature: &EditorFeature) -> Vec<EditorFeature> {
    if !feature.geometry.geometry_type().is_multi() {
        return Vec::new();
    }
    feature
        .geometry
        .parts()
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let mut piece = with_geometry(feature, part);
            if i > 0 {
                piece.id = FeatureId::generate();
            }
            piece
        })
        .collect()
}

/// Whether all features share one base type
pub fn same_base_type(features: &[EditorFeature]) -> Option<GeometryType> {
    let base = features.first()?.geometry.base_type();
    features
        .iter()
        .all(|f| f.geometry.base_type() == base)
        .then_some(base)
}

fn with_geometry(feature: &EditorFeature, geometry: Geometry) -> EditorFeature {
    EditorFeature {
        id: feature.id.clone(),
        geometry,
        properties: feature.properties.clone(),
    }
}

fn logged<T>(op: &str, result: Result<T, GeometryError>) -> Option<T> {
    result
        .inspect_err(|e| tracing::warn!("[transform] {op} failed: {e}"))
        .ok()
}
