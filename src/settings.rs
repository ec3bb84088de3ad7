// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor defaults and interaction constants.
//!
//! This module holds non-visual settings. Values a host may override live in
//! `config.rs` and take their defaults from here; the rest are fixed
//! interaction tuning.

// ============================================================================
// SNAP SETTINGS
// ============================================================================
/// Whether snapping is enabled by default
const SNAP_ENABLED: bool = true;

/// Snap radius in screen pixels
const SNAP_DISTANCE_PX: f64 = 10.0;

/// Snap to feature vertices
const SNAP_TO_VERTICES: bool = true;

/// Snap to points along feature edges
const SNAP_TO_EDGES: bool = true;

// ============================================================================
// HISTORY SETTINGS
// ============================================================================
/// Maximum number of undoable actions kept
const HISTORY_MAX_SIZE: usize = 100;

// ============================================================================
// POINTER SETTINGS
// ============================================================================
/// Pixel radius for hitting vertex and midpoint markers
const CLICK_TOLERANCE_PX: f64 = 8.0;

/// Pixel radius around the first vertex that closes a polygon
const CLOSE_POLYGON_TOLERANCE_PX: f64 = 10.0;

/// Clicks arriving this soon after a drag or box-select release are ignored
const DRAG_CLICK_COOLDOWN_MS: u64 = 300;

/// Touch commits are lifted this far above the finger (screen pixels)
const TOUCH_POINTER_OFFSET_PX: f64 = 40.0;

// ============================================================================
// GIZMO SETTINGS
// ============================================================================
/// Distance of the rotate handle above the selection center (pixels)
const GIZMO_ROTATE_OFFSET_PX: f64 = 60.0;

/// Distance of the move handle right of the selection center (pixels)
const GIZMO_MOVE_OFFSET_PX: f64 = 60.0;

/// Hit radius of a gizmo handle (pixels)
const GIZMO_HANDLE_RADIUS_PX: f64 = 12.0;

// ============================================================================
// GEOMETRY SETTINGS
// ============================================================================
/// Mean earth radius in meters
const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Segments used to approximate a full circle in buffers
const BUFFER_CIRCLE_STEPS: usize = 64;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Snapping defaults
pub mod snap {
    pub const ENABLED: bool = super::SNAP_ENABLED;
    pub const DISTANCE_PX: f64 = super::SNAP_DISTANCE_PX;
    pub const TO_VERTICES: bool = super::SNAP_TO_VERTICES;
    pub const TO_EDGES: bool = super::SNAP_TO_EDGES;
}

/// Undo history defaults
pub mod history {
    pub const MAX_SIZE: usize = super::HISTORY_MAX_SIZE;
}

/// Pointer and touch interaction tuning
pub mod pointer {
    pub const CLICK_TOLERANCE_PX: f64 = super::CLICK_TOLERANCE_PX;
    pub const CLOSE_POLYGON_TOLERANCE_PX: f64 = super::CLOSE_POLYGON_TOLERANCE_PX;
    pub const DRAG_CLICK_COOLDOWN_MS: u64 = super::DRAG_CLICK_COOLDOWN_MS;
    pub const TOUCH_OFFSET_PX: f64 = super::TOUCH_POINTER_OFFSET_PX;
}

/// Transform gizmo layout
pub mod gizmo {
    pub const ROTATE_OFFSET_PX: f64 = super::GIZMO_ROTATE_OFFSET_PX;
    pub const MOVE_OFFSET_PX: f64 = super::GIZMO_MOVE_OFFSET_PX;
    pub const HANDLE_RADIUS_PX: f64 = super::GIZMO_HANDLE_RADIUS_PX;
}

/// Geodesy constants
pub mod geo {
    pub const EARTH_RADIUS_M: f64 = super::EARTH_RADIUS_M;
    pub const BUFFER_CIRCLE_STEPS: usize = super::BUFFER_CIRCLE_STEPS;
}
