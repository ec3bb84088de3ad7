// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Feature data model

pub mod feature;
pub mod feature_id;
pub mod geometry;
pub mod store;

pub use feature::{EditorFeature, FeatureCollection, Meta, Properties, keys};
pub use feature_id::FeatureId;
pub use geometry::{CoordPath, Geometry, GeometryType, Position, Segment};
pub use store::FeatureStore;
