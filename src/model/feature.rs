// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor features and the feature collections pushed to rendering sinks.

use super::{FeatureId, Geometry};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Open property mapping carried by every feature
pub type Properties = Map<String, Value>;

/// Reserved property keys
pub mod keys {
    /// Role tag (see [`super::Meta`])
    pub const META: &str = "meta";
    /// Selection highlight flag
    pub const ACTIVE: &str = "active";
    /// Mirror of the feature id for rendering-layer lookups
    pub const FEATURE_ID: &str = "featureId";
    /// Coordinate path of a vertex/midpoint marker
    pub const PATH: &str = "path";
}

/// Role tag stored under the `meta` property
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Meta {
    /// A live, committed feature
    #[serde(rename = "feature")]
    Feature,
    /// An in-progress drawing preview
    #[serde(rename = "feature-temp")]
    FeatureTemp,
    #[serde(rename = "vertex")]
    Vertex,
    #[serde(rename = "midpoint")]
    Midpoint,
    #[serde(rename = "gizmo-center")]
    GizmoCenter,
    #[serde(rename = "gizmo-rotate")]
    GizmoRotate,
    #[serde(rename = "gizmo-move")]
    GizmoMove,
    #[serde(rename = "gizmo-line")]
    GizmoLine,
    #[serde(rename = "selection-box")]
    SelectionBox,
    #[serde(rename = "cursor")]
    Cursor,
    #[serde(rename = "touch-preview")]
    TouchPreview,
}

impl Meta {
    pub fn as_str(self) -> &'static str {
        match self {
            Meta::Feature => "feature",
            Meta::FeatureTemp => "feature-temp",
            Meta::Vertex => "vertex",
            Meta::Midpoint => "midpoint",
            Meta::GizmoCenter => "gizmo-center",
            Meta::GizmoRotate => "gizmo-rotate",
            Meta::GizmoMove => "gizmo-move",
            Meta::GizmoLine => "gizmo-line",
            Meta::SelectionBox => "selection-box",
            Meta::Cursor => "cursor",
            Meta::TouchPreview => "touch-preview",
        }
    }
}

/// A geometry object being edited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorFeature {
    pub id: FeatureId,
    pub geometry: Geometry,
    #[serde(default)]
    pub properties: Properties,
}

impl EditorFeature {
    /// Create a live feature with a fresh id
    pub fn new(geometry: Geometry) -> Self {
        Self::with_id(FeatureId::generate(), geometry)
    }

    /// Create a live feature with a given id
    pub fn with_id(id: FeatureId, geometry: Geometry) -> Self {
        let mut feature = Self {
            id,
            geometry,
            properties: Properties::new(),
        };
        feature.set_meta(Meta::Feature);
        feature
    }

    /// Create a marker/preview feature carrying a role tag
    pub fn marker(meta: Meta, geometry: Geometry) -> Self {
        let mut feature = Self {
            id: FeatureId::generate(),
            geometry,
            properties: Properties::new(),
        };
        feature.set_meta(meta);
        feature
    }

    /// The role tag, if present and recognised
    pub fn meta(&self) -> Option<Meta> {
        self.properties
            .get(keys::META)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn set_meta(&mut self, meta: Meta) {
        self.properties
            .insert(keys::META.to_string(), Value::from(meta.as_str()));
    }

    pub fn is_live(&self) -> bool {
        self.meta() == Some(Meta::Feature)
    }

    pub fn is_active(&self) -> bool {
        self.properties
            .get(keys::ACTIVE)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// Copy with the rendering-only keys (`active`, `featureId`) filled in
    pub fn rendered(&self, active: bool) -> Self {
        let mut copy = self.clone();
        copy.properties
            .insert(keys::ACTIVE.to_string(), Value::Bool(active));
        copy.properties.insert(
            keys::FEATURE_ID.to_string(),
            Value::from(self.id.as_str()),
        );
        copy
    }

    /// Copy with the rendering-only keys removed
    pub fn stripped(&self) -> Self {
        let mut copy = self.clone();
        copy.properties.remove(keys::ACTIVE);
        copy.properties.remove(keys::FEATURE_ID);
        copy
    }

    /// GeoJSON `Feature` object
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "Feature",
            "id": self.id,
            "geometry": self.geometry,
            "properties": self.properties,
        })
    }
}

/// A collection of features pushed wholesale to one rendering sink
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<EditorFeature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<EditorFeature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// GeoJSON `FeatureCollection` object
    pub fn to_geojson(&self) -> Value {
        json!({
            "type": "FeatureCollection",
            "features": self.features.iter().map(EditorFeature::to_geojson).collect::<Vec<_>>(),
        })
    }
}

impl FromIterator<EditorFeature> for FeatureCollection {
    fn from_iter<T: IntoIterator<Item = EditorFeature>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_features_are_live() {
        let feature = EditorFeature::new(Geometry::Point([0.0, 0.0]));
        assert!(feature.is_live());
        assert_eq!(feature.meta(), Some(Meta::Feature));
    }

    #[test]
    fn markers_are_not_live() {
        let marker = EditorFeature::marker(Meta::Vertex, Geometry::Point([0.0, 0.0]));
        assert!(!marker.is_live());
        assert_eq!(marker.properties[keys::META], "vertex");
    }

    #[test]
    fn rendered_copy_mirrors_id_and_active_flag() {
        let feature = EditorFeature::with_id("a".into(), Geometry::Point([0.0, 0.0]));
        let rendered = feature.rendered(true);
        assert!(rendered.is_active());
        assert_eq!(rendered.properties[keys::FEATURE_ID], "a");
        assert_eq!(rendered.stripped(), feature);
        // The source is untouched
        assert!(!feature.is_active());
    }

    #[test]
    fn collection_geojson_shape() {
        let collection: FeatureCollection =
            [EditorFeature::with_id("p".into(), Geometry::Point([1.0, 2.0]))]
                .into_iter()
                .collect();
        let json = collection.to_geojson();
        assert_eq!(json["type"], "FeatureCollection");
        assert_eq!(json["features"][0]["type"], "Feature");
        assert_eq!(json["features"][0]["id"], "p");
        assert_eq!(json["features"][0]["geometry"]["type"], "Point");
    }
}
