// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Pushing editor state into the surface's data sinks

use super::Editor;
use crate::geometry::midpoint;
use crate::model::{
    CoordPath, EditorFeature, FeatureCollection, FeatureId, Geometry, Meta, keys,
};
use crate::modes::ModeId;
use crate::surface::{MapSurface, SourceId};
use serde_json::Value;

impl<S: MapSurface> Editor<S> {
    /// Re-render every sink from the current state
    ///
    /// Sinks with nothing to show receive an empty collection.
    pub(crate) fn render(&mut self) {
        if self.destroyed {
            return;
        }
        let selected = self.selection.snapshot();

        let mut features: Vec<EditorFeature> = self
            .store
            .iter()
            .map(|f| f.rendered(selected.contains(&f.id)))
            .collect();
        features.extend(self.mode.preview());

        let highlighted: Vec<EditorFeature> = self
            .store
            .iter()
            .filter(|f| selected.contains(&f.id))
            .map(|f| f.rendered(true))
            .collect();

        let vertices = if self.mode.id() == ModeId::Edit {
            highlighted.iter().flat_map(vertex_markers).collect()
        } else {
            Vec::new()
        };

        let gizmo = match self.gizmo_layout() {
            Some(layout) if self.mode.id() == ModeId::Select => layout.features(&self.surface),
            _ => Vec::new(),
        };

        let selection_box: Vec<EditorFeature> = self.mode.selection_box().into_iter().collect();

        let cursor: Vec<EditorFeature> = self
            .cursor
            .map(|p| EditorFeature::marker(Meta::Cursor, Geometry::Point(p)))
            .into_iter()
            .collect();

        let sinks = [
            (SourceId::Features, features),
            (SourceId::Vertices, vertices),
            (SourceId::Selection, highlighted),
            (SourceId::SelectionBox, selection_box),
            (SourceId::Gizmo, gizmo),
            (SourceId::Cursor, cursor),
            (SourceId::TouchPreview, self.touch_preview.clone()),
        ];
        for (source, data) in sinks {
            if let Err(e) = self.surface.set_source(source, FeatureCollection::new(data)) {
                tracing::debug!("[render] set_source {} failed: {e}", source.as_str());
            }
        }
    }
}

/// Vertex and midpoint markers for one feature
///
/// Vertex markers carry the vertex path; midpoint markers carry the path a
/// new vertex would be inserted at.
fn vertex_markers(feature: &EditorFeature) -> Vec<EditorFeature> {
    let mut markers = Vec::new();
    for (path, position) in feature.geometry.vertices() {
        markers.push(marker(feature, Meta::Vertex, path, Geometry::Point(position)));
    }
    for segment in feature.geometry.segments() {
        let path = segment.path.with_index(segment.path.index + 1);
        let at = midpoint(segment.start, segment.end);
        markers.push(marker(feature, Meta::Midpoint, path, Geometry::Point(at)));
    }
    markers
}

fn marker(owner: &EditorFeature, meta: Meta, path: CoordPath, geometry: Geometry) -> EditorFeature {
    let mut marker = EditorFeature::marker(meta, geometry);
    marker.id = FeatureId::new(format!(
        "{}:{}:{}:{}:{}",
        owner.id,
        meta.as_str(),
        path.part,
        path.ring,
        path.index
    ));
    marker.properties.insert(
        keys::FEATURE_ID.to_string(),
        Value::from(owner.id.as_str()),
    );
    if let Ok(path) = serde_json::to_value(path) {
        marker.properties.insert(keys::PATH.to_string(), path);
    }
    marker
}

/// Coordinate path stored on a vertex or midpoint marker
pub(crate) fn marker_path(marker: &EditorFeature) -> Option<CoordPath> {
    marker
        .properties
        .get(keys::PATH)
        .and_then(|v| serde_json::from_value(v.clone()).ok())
}

/// Feature id stored on a marker
pub(crate) fn marker_owner(marker: &EditorFeature) -> Option<FeatureId> {
    marker
        .properties
        .get(keys::FEATURE_ID)
        .and_then(Value::as_str)
        .map(FeatureId::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn polygon_markers_skip_closing_duplicate() {
        let square = EditorFeature::with_id(
            "sq".into(),
            Geometry::Polygon(vec![vec![
                [0.0, 0.0],
                [1.0, 0.0],
                [1.0, 1.0],
                [0.0, 1.0],
                [0.0, 0.0],
            ]]),
        );
        let markers = vertex_markers(&square);
        let vertices = markers.iter().filter(|m| m.meta() == Some(Meta::Vertex)).count();
        let midpoints = markers.iter().filter(|m| m.meta() == Some(Meta::Midpoint)).count();
        assert_eq!(vertices, 4);
        assert_eq!(midpoints, 4);
    }

    #[test]
    fn markers_point_back_to_their_feature() {
        let line = EditorFeature::with_id(
            "l".into(),
            Geometry::LineString(vec![[0.0, 0.0], [2.0, 0.0]]),
        );
        let markers = vertex_markers(&line);
        let mid = markers
            .iter()
            .find(|m| m.meta() == Some(Meta::Midpoint))
            .unwrap();
        assert_eq!(marker_owner(mid), Some("l".into()));
        assert_eq!(marker_path(mid), Some(CoordPath::new(0, 0, 1)));
    }
}
