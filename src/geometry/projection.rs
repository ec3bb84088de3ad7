// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Planar frames for operations that need Euclidean geometry.
//!
//! Rotation and scaling run in spherical Web Mercator, which is conformal,
//! so a rotation there preserves the shapes a user sees on the map. Buffers
//! run in a local equirectangular frame measured in meters around an
//! anchor position.

use crate::model::Position;
use crate::settings;
use kurbo::{Affine, Point, Vec2};

/// Web Mercator sphere radius (meters)
const MERCATOR_RADIUS: f64 = 6_378_137.0;

/// Latitude limit of the Web Mercator square
const MAX_LATITUDE: f64 = 85.051_128_779_806_59;

/// Project a position into Web Mercator meters (y grows northwards)
pub fn to_mercator(p: Position) -> Point {
    let lat = p[1].clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    let x = MERCATOR_RADIUS * p[0].to_radians();
    let y = MERCATOR_RADIUS * (std::f64::consts::FRAC_PI_4 + lat / 2.0).tan().ln();
    Point::new(x, y)
}

/// Inverse of [`to_mercator`]
pub fn from_mercator(pt: Point) -> Position {
    let lng = (pt.x / MERCATOR_RADIUS).to_degrees();
    let lat = (2.0 * (pt.y / MERCATOR_RADIUS).exp().atan() - std::f64::consts::FRAC_PI_2).to_degrees();
    [lng, lat]
}

/// Rotation by `angle` degrees (counterclockwise) about `center`, in Mercator space
pub fn rotation_about(center: Position, angle: f64) -> Affine {
    let c = to_mercator(center).to_vec2();
    Affine::translate(c) * Affine::rotate(angle.to_radians()) * Affine::translate(-c)
}

/// Uniform scale by `factor` about `center`, in Mercator space
pub fn scale_about(center: Position, factor: f64) -> Affine {
    let c = to_mercator(center).to_vec2();
    Affine::translate(c) * Affine::scale(factor) * Affine::translate(-c)
}

/// Apply a Mercator-space transform to a position
pub fn apply(transform: Affine, p: Position) -> Position {
    from_mercator(transform * to_mercator(p))
}

/// A local equirectangular frame in meters, anchored at a position
#[derive(Debug, Clone, Copy)]
pub struct LocalFrame {
    anchor: Position,
    cos_lat: f64,
}

impl LocalFrame {
    pub fn new(anchor: Position) -> Self {
        Self {
            anchor,
            cos_lat: anchor[1].to_radians().cos().max(1e-9),
        }
    }

    pub fn to_local(&self, p: Position) -> Point {
        let r = settings::geo::EARTH_RADIUS_M;
        Point::new(
            (p[0] - self.anchor[0]).to_radians() * self.cos_lat * r,
            (p[1] - self.anchor[1]).to_radians() * r,
        )
    }

    pub fn to_geo(&self, pt: Point) -> Position {
        let r = settings::geo::EARTH_RADIUS_M;
        [
            self.anchor[0] + (pt.x / (r * self.cos_lat)).to_degrees(),
            self.anchor[1] + (pt.y / r).to_degrees(),
        ]
    }
}

/// Unit vector pointing left of the direction `a -> b`, or `None` for a zero-length segment
pub fn left_normal(a: Point, b: Point) -> Option<Vec2> {
    let d = b - a;
    let len = d.hypot();
    if len == 0.0 || !len.is_finite() {
        return None;
    }
    Some(Vec2::new(-d.y / len, d.x / len))
}
