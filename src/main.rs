// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! geodraw: replay a scripted editing session and print the result
//!
//! Usage: `geodraw <script.json> [config.toml]`
//!
//! The script is a JSON array of steps, each tagged by `op`, for example
//! `{"op": "mode", "mode": "draw_polygon"}` or
//! `{"op": "click", "at": [4.0, 0.0]}`. Positions are `[lng, lat]`.

use anyhow::{Context, Result, bail};
use geodraw::editing::transform;
use geodraw::geometry::{Units, center_of_mass};
use geodraw::{
    Editor, EditorConfig, EditorFeature, FeatureCollection, FeatureId, Key, KeyEvent,
    MemorySurface, ModeId, Modifiers, PointerEvent, Position, Projection, TouchEvent,
};
use serde::Deserialize;
use std::path::PathBuf;

/// Milliseconds the replay clock advances per pointer event
const STEP_MS: u64 = 100;

#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum Step {
    Mode {
        mode: ModeId,
    },
    Add {
        features: Vec<EditorFeature>,
    },
    Click {
        at: Position,
        #[serde(default)]
        modifiers: Modifiers,
    },
    DoubleClick {
        at: Position,
    },
    ContextMenu {
        at: Position,
    },
    /// Pointer down at `from`, move to `to`, release
    Drag {
        from: Position,
        to: Position,
        #[serde(default)]
        modifiers: Modifiers,
    },
    /// Touch contact released at `at` (requires `pan_lock`)
    Tap {
        at: Position,
    },
    PanLock {
        locked: bool,
    },
    Key {
        key: Key,
        #[serde(default)]
        modifiers: Modifiers,
    },
    Select {
        ids: Vec<FeatureId>,
    },
    ClearSelection,
    Delete,
    Finish,
    Undo,
    Redo,
    Combine,
    Split,
    /// Rotate the selection about its center, degrees counterclockwise
    Rotate {
        degrees: f64,
    },
    Scale {
        factor: f64,
    },
    Buffer {
        radius: f64,
        #[serde(default)]
        units: Units,
    },
    Simplify {
        tolerance: f64,
    },
}

struct Replay {
    editor: Editor<MemorySurface>,
    clock: u64,
}

impl Replay {
    fn pointer(&mut self, at: Position, modifiers: Modifiers) -> PointerEvent {
        self.clock += STEP_MS;
        PointerEvent::new(at, self.editor.surface().project(at))
            .with_modifiers(modifiers)
            .at_time(self.clock)
    }

    fn run(&mut self, index: usize, step: Step) -> Result<()> {
        tracing::debug!("[replay] step {index}: {step:?}");
        match step {
            Step::Mode { mode } => {
                if !self.editor.set_mode(mode) {
                    bail!("mode {mode} is not enabled");
                }
            }
            Step::Add { features } => {
                let count = features.len();
                let added = self.editor.add_features(features);
                if added.len() != count {
                    tracing::warn!("[replay] {} of {count} features rejected", count - added.len());
                }
            }
            Step::Click { at, modifiers } => {
                let event = self.pointer(at, modifiers);
                self.editor.click(event);
            }
            Step::DoubleClick { at } => {
                let event = self.pointer(at, Modifiers::NONE);
                self.editor.double_click(event);
            }
            Step::ContextMenu { at } => {
                let event = self.pointer(at, Modifiers::NONE);
                self.editor.context_menu(event);
            }
            Step::Drag {
                from,
                to,
                modifiers,
            } => {
                let down = self.pointer(from, modifiers);
                self.editor.pointer_down(down);
                let moved = self.pointer(to, modifiers);
                self.editor.pointer_move(moved);
                let up = self.pointer(to, modifiers);
                self.editor.pointer_up(up);
            }
            Step::Tap { at } => {
                self.clock += STEP_MS;
                let screen = self.editor.surface().project(at);
                let mut touch = TouchEvent::new(at, screen);
                touch.timestamp_ms = self.clock;
                self.editor.touch_start(touch);
                self.editor.touch_end(touch);
            }
            Step::PanLock { locked } => self.editor.set_pan_locked(locked),
            Step::Key { key, modifiers } => {
                self.editor
                    .key_down(KeyEvent::new(key).with_modifiers(modifiers));
            }
            Step::Select { ids } => {
                self.editor.select(&ids);
            }
            Step::ClearSelection => {
                self.editor.clear_selection();
            }
            Step::Delete => {
                self.editor.delete_selected();
            }
            Step::Finish => {
                self.editor.finish_drawing();
            }
            Step::Undo => {
                self.editor.undo();
            }
            Step::Redo => {
                self.editor.redo();
            }
            Step::Combine => {
                if self.editor.combine_selected_features().is_none() {
                    tracing::warn!("[replay] selection cannot be combined");
                }
            }
            Step::Split => {
                self.editor.split_selected_features();
            }
            Step::Rotate { degrees } => {
                let center = self.selection_center()?;
                self.editor
                    .transform_selected(|f| Some(transform::rotate(f, center, degrees)));
            }
            Step::Scale { factor } => {
                let center = self.selection_center()?;
                self.editor
                    .transform_selected(|f| Some(transform::scale(f, center, factor)));
            }
            Step::Buffer { radius, units } => {
                self.editor
                    .transform_selected(|f| transform::buffer(f, radius, units));
            }
            Step::Simplify { tolerance } => {
                self.editor
                    .transform_selected(|f| Some(transform::simplify(f, tolerance)));
            }
        }
        Ok(())
    }

    fn selection_center(&self) -> Result<Position> {
        let selected = self.editor.selected_features();
        center_of_mass(selected.iter().map(|f| &f.geometry)).context("nothing is selected")
    }
}

fn main() -> Result<()> {
    geodraw::init_tracing();

    let mut args = std::env::args().skip(1);
    let Some(script_path) = args.next().map(PathBuf::from) else {
        bail!("usage: geodraw <script.json> [config.toml]");
    };

    let config = match args.next() {
        Some(path) => {
            let config = EditorConfig::load(&path)
                .with_context(|| format!("failed to load config {path}"))?;
            config.validate().context("invalid config")?;
            config
        }
        None => EditorConfig::default(),
    };

    let script = std::fs::read_to_string(&script_path)
        .with_context(|| format!("failed to read {}", script_path.display()))?;
    let steps: Vec<Step> = serde_json::from_str(&script)
        .with_context(|| format!("failed to parse {}", script_path.display()))?;
    tracing::info!("[replay] {} steps from {}", steps.len(), script_path.display());

    let mut replay = Replay {
        editor: Editor::new(MemorySurface::new(), config),
        clock: 0,
    };
    for (index, step) in steps.into_iter().enumerate() {
        replay
            .run(index, step)
            .with_context(|| format!("step {index} failed"))?;
    }

    let collection: FeatureCollection = replay.editor.features().into_iter().collect();
    println!("{}", serde_json::to_string_pretty(&collection.to_geojson())?);
    replay.editor.destroy();
    Ok(())
}
