// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Great-circle measurements on a spherical earth.

use crate::model::Position;
use crate::settings;
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Linear units accepted by distance-based operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Units {
    Meters,
    #[default]
    Kilometers,
    Miles,
    Feet,
    #[serde(rename = "nauticalmiles")]
    NauticalMiles,
    /// Degrees of arc
    Degrees,
    /// Radians of arc
    Radians,
}

impl Units {
    /// Meters per one of this unit (arc units measured on the mean sphere)
    pub fn meters(self) -> f64 {
        let r = settings::geo::EARTH_RADIUS_M;
        match self {
            Units::Meters => 1.0,
            Units::Kilometers => 1000.0,
            Units::Miles => 1609.344,
            Units::Feet => 0.3048,
            Units::NauticalMiles => 1852.0,
            Units::Degrees => r * PI / 180.0,
            Units::Radians => r,
        }
    }

    /// Convert a distance in these units to meters
    pub fn to_meters(self, distance: f64) -> f64 {
        distance * self.meters()
    }

    /// Convert a distance in meters to these units
    pub fn from_meters(self, meters: f64) -> f64 {
        meters / self.meters()
    }
}

/// Haversine distance between two positions
pub fn distance(from: Position, to: Position, units: Units) -> f64 {
    let (lng1, lat1) = (from[0].to_radians(), from[1].to_radians());
    let (lng2, lat2) = (to[0].to_radians(), to[1].to_radians());
    let d_lat = lat2 - lat1;
    let d_lng = lng2 - lng1;
    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    let central = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    units.from_meters(central * settings::geo::EARTH_RADIUS_M)
}

/// Initial great-circle bearing in degrees, in `[-180, 180]`, clockwise from north
pub fn bearing(from: Position, to: Position) -> f64 {
    let (lng1, lat1) = (from[0].to_radians(), from[1].to_radians());
    let (lng2, lat2) = (to[0].to_radians(), to[1].to_radians());
    let y = (lng2 - lng1).sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * (lng2 - lng1).cos();
    y.atan2(x).to_degrees()
}

/// The position reached by travelling `distance` along `bearing` from `origin`
pub fn destination(origin: Position, distance: f64, bearing: f64, units: Units) -> Position {
    let lng1 = origin[0].to_radians();
    let lat1 = origin[1].to_radians();
    let bearing = bearing.to_radians();
    let delta = units.to_meters(distance) / settings::geo::EARTH_RADIUS_M;

    let lat2 = (lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos()).asin();
    let lng2 = lng1
        + (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * lat2.sin());

    [lng2.to_degrees(), lat2.to_degrees()]
}

/// The great-circle midpoint of two positions
pub fn midpoint(a: Position, b: Position) -> Position {
    let dist = distance(a, b, Units::Meters);
    if dist == 0.0 {
        return a;
    }
    destination(a, dist / 2.0, bearing(a, b), Units::Meters)
}

/// Smallest signed difference `to - from` between two angles in degrees
pub fn angle_delta(from: f64, to: f64) -> f64 {
    let mut delta = (to - from) % 360.0;
    if delta > 180.0 {
        delta -= 360.0;
    } else if delta < -180.0 {
        delta += 360.0;
    }
    delta
}
