// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Host-facing editor configuration.
//!
//! Every option has a default (mostly taken from `settings.rs`), so an
//! empty TOML document is a valid configuration.

use crate::editing::{Modifiers, SnapOptions};
use crate::error::ConfigError;
use crate::model::GeometryType;
use crate::modes::ModeId;
use crate::settings;
use serde::Deserialize;
use std::path::Path;

/// Platform conventions that change key bindings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// macOS / iOS: Cmd is the command modifier
    Apple,
    /// Everything else: Ctrl is the command modifier
    Other,
}

impl Platform {
    /// The platform this binary was built for
    pub fn detect() -> Self {
        if cfg!(any(target_os = "macos", target_os = "ios")) {
            Platform::Apple
        } else {
            Platform::Other
        }
    }

    pub fn is_apple(self) -> bool {
        self == Platform::Apple
    }

    /// Whether the platform's command modifier is held
    pub fn command_held(self, modifiers: Modifiers) -> bool {
        modifiers.command(self.is_apple())
    }

    /// Label of the multi-select modifier for display
    pub fn modifier_label(self) -> &'static str {
        match self {
            Platform::Apple => "Cmd",
            Platform::Other => "Ctrl",
        }
    }
}

impl Default for Platform {
    fn default() -> Self {
        Self::detect()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    /// Modes the host allows
    pub modes: Vec<ModeId>,
    pub default_mode: ModeId,
    /// Geometry types that may be drawn
    pub features: Vec<GeometryType>,
    pub snapping: bool,
    /// Snap radius in pixels
    pub snap_distance: f64,
    pub snap_to_vertices: bool,
    pub snap_to_edges: bool,
    /// Opaque style overrides handed through to the host renderer
    pub styles: serde_json::Value,
    pub touch_enabled: bool,
    pub box_select: bool,
    /// Pixel radius for vertex and midpoint marker hits
    pub click_tolerance: f64,
    /// Touch commits are lifted this many pixels above the contact
    pub pointer_offset_px: f64,
    pub history_size: usize,
    pub platform: Platform,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            modes: ModeId::ALL.to_vec(),
            default_mode: ModeId::Static,
            features: vec![
                GeometryType::Point,
                GeometryType::LineString,
                GeometryType::Polygon,
            ],
            snapping: settings::snap::ENABLED,
            snap_distance: settings::snap::DISTANCE_PX,
            snap_to_vertices: settings::snap::TO_VERTICES,
            snap_to_edges: settings::snap::TO_EDGES,
            styles: serde_json::Value::Null,
            touch_enabled: true,
            box_select: true,
            click_tolerance: settings::pointer::CLICK_TOLERANCE_PX,
            pointer_offset_px: settings::pointer::TOUCH_OFFSET_PX,
            history_size: settings::history::MAX_SIZE,
            platform: Platform::detect(),
        }
    }
}

impl EditorConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: EditorConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.modes.contains(&self.default_mode) {
            return Err(ConfigError::Invalid(format!(
                "default_mode '{}' is not in modes",
                self.default_mode
            )));
        }
        if !(self.snap_distance.is_finite() && self.snap_distance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "snap_distance must be a non-negative number, got {}",
                self.snap_distance
            )));
        }
        if !(self.click_tolerance.is_finite() && self.click_tolerance >= 0.0) {
            return Err(ConfigError::Invalid(format!(
                "click_tolerance must be a non-negative number, got {}",
                self.click_tolerance
            )));
        }
        if self.history_size == 0 {
            return Err(ConfigError::Invalid("history_size must be at least 1".into()));
        }
        if self.features.iter().any(|t| t.is_multi()) {
            return Err(ConfigError::Invalid(
                "features may only list Point, LineString and Polygon".into(),
            ));
        }
        Ok(())
    }

    pub fn snap_options(&self) -> SnapOptions {
        SnapOptions {
            enabled: self.snapping,
            distance_px: self.snap_distance,
            to_vertices: self.snap_to_vertices,
            to_edges: self.snap_to_edges,
        }
    }

    /// Whether `geometry_type` may be drawn
    pub fn can_draw(&self, geometry_type: GeometryType) -> bool {
        self.features.contains(&geometry_type.base())
    }
}
