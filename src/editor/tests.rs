// Copyright 2025 the geodraw Authors
// SPDX-License-Identifier: Apache-2.0

//! Editor scenarios driven through the in-memory surface

use super::*;
use crate::config::Platform;
use crate::editing::{Key, KeyEvent, PointerEvent, TouchEvent};
use crate::model::GeometryType;
use crate::surface::{MemorySurface, Projection};
use std::cell::RefCell;
use std::rc::Rc;

fn config() -> EditorConfig {
    EditorConfig {
        platform: Platform::Other,
        ..EditorConfig::default()
    }
}

fn editor_in(mode: ModeId) -> Editor<MemorySurface> {
    let mut editor = Editor::new(MemorySurface::new(), config());
    assert!(editor.set_mode(mode));
    editor
}

fn at(editor: &Editor<MemorySurface>, position: Position) -> PointerEvent {
    PointerEvent::new(position, editor.surface().project(position))
}

fn click(editor: &mut Editor<MemorySurface>, position: Position) {
    let event = at(editor, position);
    editor.click(event);
}

fn ctrl_click(editor: &mut Editor<MemorySurface>, position: Position) {
    let event = at(editor, position).with_modifiers(Modifiers::ctrl());
    editor.click(event);
}

fn press(editor: &mut Editor<MemorySurface>, key: Key) -> bool {
    editor.key_down(KeyEvent::new(key))
}

fn line(id: &str, positions: &[Position]) -> EditorFeature {
    EditorFeature::with_id(id.into(), Geometry::LineString(positions.to_vec()))
}

fn point(id: &str, p: Position) -> EditorFeature {
    EditorFeature::with_id(id.into(), Geometry::Point(p))
}

fn ids(editor: &Editor<MemorySurface>) -> Vec<FeatureId> {
    editor.features().into_iter().map(|f| f.id).collect()
}

/// Records event names in arrival order
fn record(editor: &mut Editor<MemorySurface>, names: &[&str]) -> Rc<RefCell<Vec<String>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for name in names {
        let log = Rc::clone(&log);
        editor
            .on(name, move |event| {
                log.borrow_mut().push(event.kind().name().to_string())
            })
            .unwrap();
    }
    log
}

// ============================================================================
// DRAWING
// ============================================================================

#[test]
fn polygon_finished_with_enter_is_closed() {
    let mut editor = editor_in(ModeId::DrawPolygon);
    for p in [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]] {
        click(&mut editor, p);
    }
    assert!(editor.can_finish_drawing());
    assert!(press(&mut editor, Key::Enter));

    let features = editor.features();
    assert_eq!(features.len(), 1);
    let Geometry::Polygon(rings) = &features[0].geometry else {
        panic!("expected a polygon");
    };
    assert_eq!(
        rings[0],
        vec![[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0], [0.0, 0.0]]
    );
    assert_eq!(editor.mode(), ModeId::DrawPolygon);
    assert!(!editor.can_finish_drawing());
}

#[test]
fn clicking_first_vertex_closes_polygon() {
    let mut editor = editor_in(ModeId::DrawPolygon);
    for p in [[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.1, 0.1]] {
        click(&mut editor, p);
    }
    let features = editor.features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].geometry.vertices().len(), 3);
}

#[test]
fn double_click_does_not_duplicate_last_vertex() {
    let mut editor = editor_in(ModeId::DrawLineString);
    click(&mut editor, [0.0, 0.0]);
    click(&mut editor, [3.0, 0.0]);
    click(&mut editor, [3.0, 0.0]);
    let event = at(&editor, [3.0, 0.0]);
    editor.double_click(event);

    let features = editor.features();
    assert_eq!(features.len(), 1);
    assert_eq!(
        features[0].geometry,
        Geometry::LineString(vec![[0.0, 0.0], [3.0, 0.0]])
    );
}

#[test]
fn line_needs_two_vertices() {
    let mut editor = editor_in(ModeId::DrawLineString);
    click(&mut editor, [0.0, 0.0]);
    assert!(editor.finish_drawing().is_none());
    assert!(editor.features().is_empty());
}

#[test]
fn backspace_and_escape_edit_the_buffer() {
    let mut editor = editor_in(ModeId::DrawLineString);
    click(&mut editor, [0.0, 0.0]);
    click(&mut editor, [3.0, 0.0]);
    click(&mut editor, [6.0, 0.0]);
    assert!(press(&mut editor, Key::Backspace));
    let finished = editor.finish_drawing().unwrap();
    assert_eq!(
        finished.geometry,
        Geometry::LineString(vec![[0.0, 0.0], [3.0, 0.0]])
    );
    assert!(!finished.properties.contains_key(keys::ACTIVE));
    assert_eq!(editor.features(), vec![finished]);

    click(&mut editor, [0.0, 5.0]);
    click(&mut editor, [3.0, 5.0]);
    assert!(press(&mut editor, Key::Escape));
    assert!(!editor.can_finish_drawing());
    assert_eq!(editor.features().len(), 1);
}

#[test]
fn preview_is_rendered_while_drawing() {
    let mut editor = editor_in(ModeId::DrawLineString);
    click(&mut editor, [0.0, 0.0]);
    let hover = at(&editor, [2.0, 2.0]);
    editor.pointer_move(hover);

    let rendered = editor.surface().source(SourceId::Features).unwrap();
    assert_eq!(rendered.len(), 1);
    assert_eq!(rendered.features[0].meta(), Some(crate::model::Meta::FeatureTemp));
    assert!(editor.features().is_empty());
}

#[test]
fn leaving_a_draw_mode_discards_the_buffer() {
    let mut editor = editor_in(ModeId::DrawPolygon);
    click(&mut editor, [0.0, 0.0]);
    click(&mut editor, [4.0, 0.0]);
    click(&mut editor, [4.0, 4.0]);
    assert!(editor.set_mode(ModeId::Select));
    assert!(editor.features().is_empty());
    assert!(editor.set_mode(ModeId::DrawPolygon));
    assert!(!editor.can_finish_drawing());
}

#[test]
fn draw_point_stays_in_mode_and_snaps() {
    let mut editor = editor_in(ModeId::DrawPoint);
    click(&mut editor, [0.0, 0.0]);
    // 0.5 degrees is 5px away at the default zoom
    click(&mut editor, [0.5, 0.0]);
    let features = editor.features();
    assert_eq!(features.len(), 2);
    assert_eq!(features[1].geometry, Geometry::Point([0.0, 0.0]));
    assert_eq!(editor.mode(), ModeId::DrawPoint);
}

#[test]
fn disabled_geometry_types_are_not_drawn() {
    let config = EditorConfig {
        features: vec![GeometryType::LineString],
        ..config()
    };
    let mut editor = Editor::new(MemorySurface::new(), config);
    editor.set_mode(ModeId::DrawPoint);
    click(&mut editor, [0.0, 0.0]);
    assert!(editor.features().is_empty());
}

// ============================================================================
// HISTORY
// ============================================================================

#[test]
fn undo_redo_creates() {
    let mut editor = editor_in(ModeId::DrawPoint);
    click(&mut editor, [0.0, 0.0]);
    click(&mut editor, [5.0, 5.0]);
    let both = ids(&editor);
    assert_eq!(both.len(), 2);

    assert!(editor.undo());
    assert_eq!(ids(&editor), both[..1].to_vec());
    assert!(editor.redo());
    assert_eq!(ids(&editor), both);

    assert!(editor.undo());
    assert!(editor.undo());
    assert!(editor.features().is_empty());
    assert!(!editor.undo());
}

#[test]
fn new_action_discards_redo() {
    let mut editor = editor_in(ModeId::DrawPoint);
    click(&mut editor, [0.0, 0.0]);
    click(&mut editor, [5.0, 5.0]);
    editor.undo();
    assert!(editor.can_redo());
    click(&mut editor, [9.0, 9.0]);
    assert!(!editor.can_redo());
    assert_eq!(editor.features().len(), 2);
}

#[test]
fn keyboard_undo_and_redo() {
    let mut editor = editor_in(ModeId::DrawPoint);
    click(&mut editor, [0.0, 0.0]);
    let undo = KeyEvent::new(Key::Character('z')).with_modifiers(Modifiers::ctrl());
    assert!(editor.key_down(undo));
    assert!(editor.features().is_empty());

    let redo = KeyEvent::new(Key::Character('y')).with_modifiers(Modifiers::ctrl());
    assert!(editor.key_down(redo));
    assert_eq!(editor.features().len(), 1);
}

#[test]
fn undo_of_delete_restores_feature() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(point("a", [0.0, 0.0]));
    assert!(editor.delete_feature(&"a".into()));
    assert!(editor.features().is_empty());
    editor.undo();
    assert_eq!(ids(&editor), vec![FeatureId::from("a")]);
}

#[test]
fn undo_of_delete_keeps_store_order() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![
        point("a", [0.0, 0.0]),
        point("b", [5.0, 0.0]),
        point("c", [10.0, 0.0]),
        point("d", [15.0, 0.0]),
    ]);
    let before = ids(&editor);

    editor.delete_features(&["c".into(), "a".into()]);
    assert_eq!(ids(&editor), vec![FeatureId::from("b"), FeatureId::from("d")]);
    editor.undo();
    assert_eq!(ids(&editor), before);

    editor.redo();
    editor.undo();
    assert_eq!(ids(&editor), before);
}

#[test]
fn set_features_resets_history() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(point("a", [0.0, 0.0]));
    editor.select(&["a".into()]);
    editor.set_features(vec![point("b", [1.0, 1.0])]);
    assert!(!editor.can_undo());
    assert!(editor.selected_ids().is_empty());
    assert_eq!(ids(&editor), vec![FeatureId::from("b")]);
}

// ============================================================================
// PROGRAMMATIC API
// ============================================================================

#[test]
fn add_rejects_duplicates_and_non_finite() {
    let mut editor = editor_in(ModeId::Select);
    assert!(editor.add_feature(point("a", [0.0, 0.0])).is_some());
    assert!(editor.add_feature(point("a", [1.0, 1.0])).is_none());
    assert!(editor.add_feature(point("b", [f64::NAN, 0.0])).is_none());
    assert_eq!(editor.features().len(), 1);
}

#[test]
fn features_are_copies_without_editor_properties() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(point("a", [0.0, 0.0]));
    let mut copy = editor.features().remove(0);
    assert!(!copy.properties.contains_key(keys::ACTIVE));
    copy.geometry = Geometry::Point([9.0, 9.0]);
    assert_eq!(
        editor.feature(&"a".into()).unwrap().geometry,
        Geometry::Point([0.0, 0.0])
    );
}

#[test]
fn set_mode_rejects_disabled_modes() {
    let config = EditorConfig {
        modes: vec![ModeId::Static, ModeId::Select],
        ..config()
    };
    let mut editor = Editor::new(MemorySurface::new(), config);
    assert!(!editor.set_mode(ModeId::Edit));
    assert!(editor.set_mode(ModeId::Select));
    assert_eq!(editor.mode(), ModeId::Select);
}

#[test]
fn transform_selected_is_all_or_nothing() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![point("a", [0.0, 0.0]), line("l", &[[0.0, 0.0], [1.0, 0.0]])]);
    editor.select(&["a".into(), "l".into()]);

    let changed = editor.transform_selected(|f| {
        matches!(f.geometry, Geometry::Point(_)).then(|| f.clone())
    });
    assert!(!changed);
    assert_eq!(editor.history().len(), 1);

    assert!(editor.transform_selected(|f| {
        Some(crate::editing::transform::move_feature(f, [0.0, 0.0], [0.0, 1.0]))
    }));
    assert_eq!(editor.history().len(), 2);
    editor.undo();
    assert_eq!(
        editor.feature(&"a".into()).unwrap().geometry,
        Geometry::Point([0.0, 0.0])
    );
}

// ============================================================================
// COMBINE / SPLIT
// ============================================================================

#[test]
fn combine_then_split_lines() {
    let mut editor = editor_in(ModeId::Select);
    let first = line("l1", &[[0.0, 0.0], [1.0, 0.0]]);
    let second = line("l2", &[[0.0, 2.0], [1.0, 2.0]]);
    editor.add_features(vec![first.clone(), second.clone()]);
    editor.select(&["l1".into(), "l2".into()]);
    assert!(editor.can_combine());

    let combined = editor.combine_selected_features().unwrap();
    assert_eq!(combined, FeatureId::from("l1"));
    let features = editor.features();
    assert_eq!(features.len(), 1);
    assert_eq!(features[0].geometry.geometry_type(), GeometryType::MultiLineString);
    assert_eq!(editor.selected_ids(), vec![combined]);
    assert!(editor.can_split());

    let parts = editor.split_selected_features();
    assert_eq!(parts.len(), 2);
    let geometries: Vec<Geometry> = editor.features().into_iter().map(|f| f.geometry).collect();
    assert_eq!(geometries, vec![first.geometry, second.geometry]);
}

#[test]
fn combine_undo_restores_originals() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![
        point("p1", [0.0, 0.0]),
        point("p2", [3.0, 3.0]),
    ]);
    editor.select(&["p1".into(), "p2".into()]);
    editor.combine_selected_features().unwrap();
    assert_eq!(editor.features().len(), 1);
    editor.undo();
    assert_eq!(ids(&editor), vec![FeatureId::from("p1"), FeatureId::from("p2")]);
}

#[test]
fn combine_and_split_undo_keep_store_order() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![
        point("p1", [0.0, 0.0]),
        line("l", &[[0.0, 5.0], [1.0, 5.0]]),
        point("p2", [3.0, 3.0]),
        point("p3", [6.0, 6.0]),
    ]);
    let before = ids(&editor);

    editor.select(&["p2".into(), "p1".into()]);
    assert_eq!(editor.combine_selected_features(), Some(FeatureId::from("p1")));
    editor.undo();
    assert_eq!(ids(&editor), before);

    editor.redo();
    editor.split_selected_features();
    editor.undo();
    let combined: Vec<FeatureId> = ["p1", "l", "p3"].map(FeatureId::from).to_vec();
    assert_eq!(ids(&editor), combined);
}

#[test]
fn mixed_types_cannot_combine() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![point("p", [0.0, 0.0]), line("l", &[[0.0, 1.0], [1.0, 1.0]])]);
    editor.select(&["p".into(), "l".into()]);
    assert!(!editor.can_combine());
    assert!(editor.combine_selected_features().is_none());
    assert!(!editor.can_split());
}

// ============================================================================
// SELECTION
// ============================================================================

#[test]
fn click_replaces_and_modifier_toggles() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![point("a", [0.0, 0.0]), point("b", [5.0, 0.0])]);

    click(&mut editor, [0.0, 0.0]);
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("a")]);
    click(&mut editor, [5.0, 0.0]);
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("b")]);
    ctrl_click(&mut editor, [0.0, 0.0]);
    assert_eq!(editor.selected_ids().len(), 2);
    ctrl_click(&mut editor, [0.0, 0.0]);
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("b")]);

    ctrl_click(&mut editor, [2.5, 7.0]);
    assert_eq!(editor.selected_ids().len(), 1);
    click(&mut editor, [2.5, 7.0]);
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn fill_wins_over_points_inside_it() {
    let mut editor = editor_in(ModeId::Select);
    let square = EditorFeature::with_id(
        "sq".into(),
        Geometry::Polygon(vec![vec![
            [0.0, 0.0],
            [4.0, 0.0],
            [4.0, 4.0],
            [0.0, 4.0],
            [0.0, 0.0],
        ]]),
    );
    editor.add_features(vec![point("p", [2.0, 2.0]), square]);
    click(&mut editor, [2.0, 2.0]);
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("sq")]);
}

#[test]
fn box_select_three_of_four() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![
        point("a", [1.0, 1.0]),
        point("b", [2.0, 2.0]),
        point("c", [3.0, 3.0]),
        point("far", [10.0, 10.0]),
    ]);

    let down = at(&editor, [0.5, 0.5])
        .with_modifiers(Modifiers::ctrl())
        .at_time(1_000);
    editor.pointer_down(down);
    assert!(!editor.surface().drag_pan_enabled());

    let corner = at(&editor, [3.5, 3.5])
        .with_modifiers(Modifiers::ctrl())
        .at_time(1_050);
    editor.pointer_move(corner);
    let outline = editor.surface().source(SourceId::SelectionBox).unwrap();
    assert_eq!(outline.len(), 1);
    editor.pointer_up(corner);

    let selected = editor.selected_ids();
    assert_eq!(selected.len(), 3);
    assert!(!selected.contains(&FeatureId::from("far")));
    assert!(editor.surface().drag_pan_enabled());
    assert!(editor.surface().source(SourceId::SelectionBox).unwrap().is_empty());

    // The click synthesized from the same release is ignored
    editor.click(corner.at_time(1_100));
    assert_eq!(editor.selected_ids().len(), 3);

    // Later clicks on empty space behave normally
    let late = at(&editor, [7.0, 0.0]).at_time(2_000);
    editor.click(late);
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn box_select_can_be_disabled() {
    let config = EditorConfig {
        box_select: false,
        ..config()
    };
    let mut editor = Editor::new(MemorySurface::new(), config);
    editor.set_mode(ModeId::Select);
    editor.add_feature(point("a", [1.0, 1.0]));
    let down = at(&editor, [0.0, 0.0]).with_modifiers(Modifiers::ctrl());
    editor.pointer_down(down);
    let up = at(&editor, [2.0, 2.0]).with_modifiers(Modifiers::ctrl());
    editor.pointer_up(up);
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn groups_select_live_members() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![point("a", [0.0, 0.0]), point("b", [5.0, 0.0])]);
    editor.create_group("pair", &["a".into(), "b".into()]);
    editor.delete_feature(&"b".into());
    assert!(editor.select_group("pair"));
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("a")]);
    assert!(editor.remove_group("pair"));
    assert!(!editor.select_group("pair"));
}

#[test]
fn delete_key_removes_selection() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_features(vec![point("a", [0.0, 0.0]), point("b", [5.0, 0.0])]);
    editor.select(&["a".into()]);
    assert!(press(&mut editor, Key::Delete));
    assert_eq!(ids(&editor), vec![FeatureId::from("b")]);
    assert!(editor.selected_ids().is_empty());
    assert!(!press(&mut editor, Key::Delete));
}

#[test]
fn backspace_while_drawing_does_not_delete_selection() {
    let mut editor = editor_in(ModeId::DrawLineString);
    editor.add_feature(point("a", [9.0, 9.0]));
    editor.select(&["a".into()]);
    click(&mut editor, [0.0, 0.0]);
    assert!(press(&mut editor, Key::Backspace));
    assert_eq!(editor.features().len(), 1);
}

// ============================================================================
// GIZMO
// ============================================================================

#[test]
fn gizmo_move_drag_commits_one_update() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(point("a", [0.0, 0.0]));
    click(&mut editor, [0.0, 0.0]);
    let gizmo = editor.surface().source(SourceId::Gizmo).unwrap();
    assert!(!gizmo.is_empty());

    // Move handle sits 60px right of the center
    let handle = editor.surface().unproject(kurbo::Point::new(60.0, 0.0));
    let down = at(&editor, handle);
    editor.pointer_down(down);
    assert!(!editor.surface().drag_pan_enabled());
    let to = at(&editor, [8.0, 2.0]);
    editor.pointer_move(to);
    editor.pointer_up(to);
    editor.click(to);

    let Geometry::Point(moved) = editor.feature(&"a".into()).unwrap().geometry else {
        panic!("expected a point");
    };
    assert!((moved[0] - 2.0).abs() < 0.05);
    assert!((moved[1] - 2.0).abs() < 0.05);
    assert_eq!(editor.history().len(), 2);
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("a")]);
    assert!(editor.surface().drag_pan_enabled());
}

#[test]
fn gizmo_drag_without_trailing_click_keeps_later_clicks() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(point("a", [0.0, 0.0]));
    click(&mut editor, [0.0, 0.0]);

    let handle = editor.surface().unproject(kurbo::Point::new(60.0, 0.0));
    editor.pointer_down(at(&editor, handle).at_time(1_000));
    let to = at(&editor, [8.0, 2.0]).at_time(1_100);
    editor.pointer_move(to);
    editor.pointer_up(to);
    assert_eq!(editor.history().len(), 2);

    // No click follows the release; the next real click still counts
    let empty = at(&editor, [-20.0, -20.0]).at_time(5_000);
    editor.click(empty);
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn escape_aborts_gizmo_drag() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(point("a", [0.0, 0.0]));
    click(&mut editor, [0.0, 0.0]);
    let handle = editor.surface().unproject(kurbo::Point::new(60.0, 0.0));
    let down = at(&editor, handle);
    editor.pointer_down(down);
    let to = at(&editor, [8.0, 2.0]);
    editor.pointer_move(to);
    assert!(press(&mut editor, Key::Escape));

    assert_eq!(
        editor.feature(&"a".into()).unwrap().geometry,
        Geometry::Point([0.0, 0.0])
    );
    assert_eq!(editor.history().len(), 1);
}

// ============================================================================
// EDIT MODE
// ============================================================================

#[test]
fn vertex_drag_commits_and_undoes() {
    let mut editor = editor_in(ModeId::Edit);
    editor.add_feature(line("l", &[[0.0, 0.0], [4.0, 0.0]]));
    click(&mut editor, [1.0, 0.0]);
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("l")]);

    let down = at(&editor, [4.0, 0.0]);
    editor.pointer_down(down);
    let to = at(&editor, [4.0, 3.0]);
    editor.pointer_move(to);
    editor.pointer_up(to);
    editor.click(to);

    assert_eq!(
        editor.feature(&"l".into()).unwrap().geometry,
        Geometry::LineString(vec![[0.0, 0.0], [4.0, 3.0]])
    );
    assert_eq!(editor.selected_ids(), vec![FeatureId::from("l")]);
    editor.undo();
    assert_eq!(
        editor.feature(&"l".into()).unwrap().geometry,
        Geometry::LineString(vec![[0.0, 0.0], [4.0, 0.0]])
    );
}

#[test]
fn midpoint_click_inserts_vertex() {
    let mut editor = editor_in(ModeId::Edit);
    editor.add_feature(line("l", &[[0.0, 0.0], [4.0, 0.0]]));
    editor.select(&["l".into()]);
    click(&mut editor, [2.0, 0.0]);

    // The marker sits on the great-circle midpoint, which carries float noise
    let Geometry::LineString(positions) = editor.feature(&"l".into()).unwrap().geometry else {
        panic!("expected a line");
    };
    assert_eq!(positions.len(), 3);
    assert_eq!(positions[0], [0.0, 0.0]);
    assert!((positions[1][0] - 2.0).abs() < 1e-9);
    assert!(positions[1][1].abs() < 1e-9);
    assert_eq!(positions[2], [4.0, 0.0]);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn context_menu_removes_vertex_within_limits() {
    let mut editor = editor_in(ModeId::Edit);
    editor.add_feature(line("l", &[[0.0, 0.0], [2.0, 0.0], [4.0, 0.0]]));
    editor.select(&["l".into()]);

    let target = at(&editor, [2.0, 0.0]);
    editor.context_menu(target);
    assert_eq!(editor.feature(&"l".into()).unwrap().geometry.vertices().len(), 2);

    let target = at(&editor, [4.0, 0.0]);
    editor.context_menu(target);
    assert_eq!(editor.feature(&"l".into()).unwrap().geometry.vertices().len(), 2);
    assert_eq!(editor.history().len(), 2);
}

#[test]
fn click_tolerance_sets_marker_hit_radius() {
    let shape = line("l", &[[0.0, 0.0], [2.0, 0.0], [4.0, 0.0]]);
    // 4px below the middle vertex
    let near = [2.0, -0.4];

    let mut editor = editor_in(ModeId::Edit);
    editor.add_feature(shape.clone());
    editor.select(&["l".into()]);
    let target = at(&editor, near);
    editor.context_menu(target);
    assert_eq!(editor.feature(&"l".into()).unwrap().geometry.vertices().len(), 2);

    let tight = EditorConfig {
        click_tolerance: 2.0,
        ..config()
    };
    let mut editor = Editor::new(MemorySurface::new(), tight);
    editor.set_mode(ModeId::Edit);
    editor.add_feature(shape);
    editor.select(&["l".into()]);
    let target = at(&editor, near);
    editor.context_menu(target);
    assert_eq!(editor.feature(&"l".into()).unwrap().geometry.vertices().len(), 3);
    assert_eq!(editor.history().len(), 1);
}

#[test]
fn vertex_drag_without_trailing_click_keeps_later_clicks() {
    let mut editor = editor_in(ModeId::Edit);
    editor.add_feature(line("l", &[[0.0, 0.0], [4.0, 0.0]]));
    editor.select(&["l".into()]);

    editor.pointer_down(at(&editor, [4.0, 0.0]).at_time(1_000));
    let to = at(&editor, [4.0, 3.0]).at_time(1_100);
    editor.pointer_move(to);
    editor.pointer_up(to);

    let elsewhere = at(&editor, [20.0, 20.0]).at_time(5_000);
    editor.click(elsewhere);
    assert!(editor.selected_ids().is_empty());
}

#[test]
fn vertex_markers_only_in_edit_mode() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(line("l", &[[0.0, 0.0], [4.0, 0.0]]));
    editor.select(&["l".into()]);
    assert!(editor.surface().source(SourceId::Vertices).unwrap().is_empty());
    editor.set_mode(ModeId::Edit);
    assert_eq!(editor.surface().source(SourceId::Vertices).unwrap().len(), 3);
}

// ============================================================================
// TOUCH
// ============================================================================

#[test]
fn touch_is_ignored_until_pan_locked() {
    let mut editor = editor_in(ModeId::DrawPoint);
    let screen = kurbo::Point::new(50.0, -10.0);
    let touch = TouchEvent::new(editor.surface().unproject(screen), screen);
    editor.touch_end(touch);
    assert!(editor.features().is_empty());

    editor.set_pan_locked(true);
    editor.touch_move(touch);
    assert_eq!(
        editor.surface().source(SourceId::TouchPreview).unwrap().len(),
        2
    );
    editor.touch_end(touch);
    let features = editor.features();
    assert_eq!(features.len(), 1);
    // Lifted 40px above the contact point
    assert_eq!(features[0].geometry, Geometry::Point([5.0, 5.0]));
    assert!(editor.surface().source(SourceId::TouchPreview).unwrap().is_empty());
}

#[test]
fn touch_disabled_ignores_input() {
    let config = EditorConfig {
        touch_enabled: false,
        ..config()
    };
    let mut editor = Editor::new(MemorySurface::new(), config);
    editor.set_mode(ModeId::DrawPoint);
    editor.set_pan_locked(true);
    let screen = kurbo::Point::new(50.0, -10.0);
    editor.touch_end(TouchEvent::new(editor.surface().unproject(screen), screen));
    assert!(editor.features().is_empty());
}

// ============================================================================
// EVENTS AND LIFECYCLE
// ============================================================================

#[test]
fn events_arrive_in_order() {
    let mut editor = editor_in(ModeId::Select);
    let log = record(
        &mut editor,
        &["mode.change", "create", "selection.change", "undo"],
    );
    editor.set_mode(ModeId::DrawPoint);
    click(&mut editor, [0.0, 0.0]);
    let id = ids(&editor).remove(0);
    editor.select(&[id]);
    editor.undo();

    assert_eq!(
        *log.borrow(),
        vec![
            "mode.change",
            "create",
            "selection.change",
            "selection.change",
            "undo"
        ]
    );
}

#[test]
fn unsubscribed_handlers_stop_firing() {
    let mut editor = editor_in(ModeId::DrawPoint);
    let count = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&count);
    let id = editor
        .on("create", move |_| *counter.borrow_mut() += 1)
        .unwrap();
    click(&mut editor, [0.0, 0.0]);
    assert!(editor.off(id));
    click(&mut editor, [5.0, 5.0]);
    assert_eq!(*count.borrow(), 1);
    assert!(editor.on("bogus", |_| {}).is_none());
}

#[test]
fn destroy_after_surface_removed_is_safe() {
    let mut editor = editor_in(ModeId::DrawPoint);
    click(&mut editor, [0.0, 0.0]);
    editor.surface_mut().remove();
    editor.destroy();
    assert!(editor.is_destroyed());

    click(&mut editor, [5.0, 5.0]);
    assert!(!editor.key_down(KeyEvent::new(Key::Enter)));
    assert!(!editor.set_mode(ModeId::Select));
    assert_eq!(editor.features().len(), 1);
    editor.destroy();
}

#[test]
fn destroy_releases_sinks() {
    let mut editor = editor_in(ModeId::Select);
    editor.add_feature(point("a", [0.0, 0.0]));
    assert!(editor.surface().is_attached());
    editor.destroy();
    assert!(!editor.surface().is_attached());
    assert!(editor.surface().source(SourceId::Features).is_none());
    assert!(editor.surface().drag_pan_enabled());
}
