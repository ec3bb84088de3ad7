// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! geodraw: interactive drawing and editing of vector geometry on a map
//!
//! The [`Editor`] owns a session's features, selection, undo history and
//! interaction mode. A host forwards pointer, touch and keyboard input to
//! it and supplies a [`MapSurface`] that projects coordinates, answers
//! hit-test queries and displays the feature collections the editor
//! renders. [`MemorySurface`] is a self-contained surface for tests and
//! scripted replays.

pub mod config;
pub mod editing;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod model;
pub mod modes;
pub mod settings;
pub mod surface;

pub use config::{EditorConfig, Platform};
pub use editing::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent, TouchEvent};
pub use editor::{Editor, EditorEvent, EventKind, SubscriptionId};
pub use error::{ConfigError, GeometryError, SurfaceError};
pub use model::{EditorFeature, FeatureCollection, FeatureId, Geometry, GeometryType, Position};
pub use modes::ModeId;
pub use surface::{Layer, MapSurface, MemorySurface, Projection, SourceId};

/// Install a `tracing` subscriber for binaries and examples
///
/// Honors `RUST_LOG`; without it, geodraw logs at info level. Does nothing
/// if a global subscriber is already set.
pub fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("geodraw=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
