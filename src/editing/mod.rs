// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Editing model and interaction

pub mod gizmo;
pub mod history;
pub mod input;
pub mod selection;
pub mod snap;
pub mod transform;

pub use gizmo::{GizmoDrag, GizmoHandle, GizmoLayout};
pub use history::{ActionKind, HistoryAction, HistoryManager};
pub use input::{Key, KeyEvent, Modifiers, PointerButton, PointerEvent, TouchEvent};
pub use selection::{SelectionBounds, SelectionManager};
pub use snap::{SnapEngine, SnapOptions, SnapResult};
