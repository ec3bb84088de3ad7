// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Geometry utilities shared by every editing component

pub mod boolean;
pub mod buffer;
pub mod line;
pub mod measure;
pub mod polygon;
pub mod projection;
pub mod simplify;

pub use line::{NearestPoint, nearest_point_on_line, point_to_line_distance, split_line};
pub use measure::{Units, bearing, destination, distance, midpoint};
pub use polygon::{center_of_mass, geometry_contains, point_in_polygon};
