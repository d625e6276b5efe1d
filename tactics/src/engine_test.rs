#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::{AWAY_SEED, BOARD_HEIGHT, BOARD_WIDTH, HOME_SEED, SPAWN_POINT};
use crate::scene::AnnotationKind;

// =============================================================
// Helpers
// =============================================================

const P1: PointerId = 1;
const P2: PointerId = 2;

fn pt(x: f64, y: f64) -> Point {
    Point::new(x, y)
}

fn has_action<F>(actions: &[Action], pred: F) -> bool
where
    F: Fn(&Action) -> bool,
{
    actions.iter().any(pred)
}

fn has_render_needed(actions: &[Action]) -> bool {
    has_action(actions, |a| matches!(a, Action::RenderNeeded))
}

fn finished_annotation(actions: &[Action]) -> Option<&Annotation> {
    actions.iter().find_map(|a| match a {
        Action::AnnotationFinished(ann) => Some(ann),
        _ => None,
    })
}

fn core_with_tool(tool: Tool) -> EngineCore {
    let mut core = EngineCore::new();
    core.set_tool(tool);
    core
}

/// Draw a full gesture through `points`, releasing at the last one.
fn draw(core: &mut EngineCore, points: &[Point]) -> Vec<Action> {
    let (first, rest) = points.split_first().unwrap();
    core.on_pointer_down(*first, Button::Primary, P1);
    for p in rest {
        core.on_pointer_move(*p, P1);
    }
    core.on_pointer_up(*points.last().unwrap(), P1)
}

// =============================================================
// Construction and defaults
// =============================================================

#[test]
fn core_new_is_idle_with_seeded_scene() {
    let core = EngineCore::new();
    assert!(!core.gesture_active());
    assert_eq!(core.scene(), &Scene::seeded());
    assert_eq!(core.tool(), Tool::Move);
    assert_eq!(core.side_to_add(), Side::Home);
}

#[test]
fn core_default_camera_is_identity() {
    let core = EngineCore::new();
    assert_eq!(core.camera(), Camera::default());
}

// =============================================================
// Viewport
// =============================================================

#[test]
fn set_viewport_fits_board() {
    let mut core = EngineCore::new();
    core.set_viewport(BOARD_WIDTH * 2.0, BOARD_HEIGHT * 2.0, 2.0);
    assert_eq!(core.camera().zoom, 2.0);
    assert_eq!(core.dpr, 2.0);
    assert_eq!(core.viewport_width, BOARD_WIDTH * 2.0);
}

#[test]
fn set_viewport_rejects_bad_dpr() {
    let mut core = EngineCore::new();
    core.set_viewport(800.0, 450.0, 0.0);
    assert_eq!(core.dpr, 1.0);
    core.set_viewport(800.0, 450.0, f64::NAN);
    assert_eq!(core.dpr, 1.0);
}

#[test]
fn pointer_coordinates_are_translated_through_camera() {
    let mut core = core_with_tool(Tool::Freehand);
    core.set_viewport(BOARD_WIDTH * 2.0, BOARD_HEIGHT * 2.0, 1.0);
    let actions = draw(&mut core, &[pt(20.0, 40.0), pt(200.0, 100.0)]);
    let ann = finished_annotation(&actions).unwrap();
    assert_eq!(ann.points, vec![10.0, 20.0, 100.0, 50.0]);
}

// =============================================================
// Toolbar
// =============================================================

#[test]
fn set_tool_reports_cursor() {
    let mut core = EngineCore::new();
    assert_eq!(core.set_tool(Tool::Arrow), vec![Action::SetCursor("crosshair")]);
    assert_eq!(core.set_tool(Tool::Move), vec![Action::SetCursor("default")]);
}

#[test]
fn add_token_uses_selected_side() {
    let mut core = EngineCore::new();
    core.set_side(Side::Away);
    let actions = core.add_token();
    let Some(Action::TokenAdded(token)) = actions.first() else {
        panic!("expected TokenAdded, got {actions:?}");
    };
    assert_eq!(token.side, Side::Away);
    assert_eq!(token.label, "2");
    assert_eq!(token.position(), pt(SPAWN_POINT.0, SPAWN_POINT.1));
    assert!(has_render_needed(&actions));
}

#[test]
fn side_selection_is_independent_of_gesture() {
    let mut core = core_with_tool(Tool::Freehand);
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, P1);
    core.set_side(Side::Away);
    assert!(core.gesture_active());
    assert_eq!(core.side_to_add(), Side::Away);
}

#[test]
fn reset_clears_board_and_gesture() {
    let mut core = core_with_tool(Tool::Freehand);
    core.add_token();
    core.on_pointer_down(pt(10.0, 10.0), Button::Primary, P1);
    let actions = core.reset();
    assert_eq!(actions, vec![Action::SceneReset, Action::RenderNeeded]);
    assert!(!core.gesture_active());
    assert_eq!(core.scene(), &Scene::seeded());
    // A stray move from the abandoned gesture does nothing.
    assert!(core.on_pointer_move(pt(50.0, 50.0), P1).is_empty());
}

#[test]
fn load_scene_replaces_and_goes_idle() {
    let mut core = core_with_tool(Tool::Move);
    core.on_pointer_down(pt(HOME_SEED.0, HOME_SEED.1), Button::Primary, P1);
    let scene = Scene::default();
    let actions = core.load_scene(scene.clone());
    assert_eq!(actions, vec![Action::SceneLoaded, Action::RenderNeeded]);
    assert_eq!(core.scene(), &scene);
    assert!(!core.gesture_active());
}

// =============================================================
// Idle -> Dragging -> Idle
// =============================================================

#[test]
fn pointer_down_on_token_with_move_tool_starts_drag() {
    let mut core = EngineCore::new();
    let actions = core.on_pointer_down(pt(HOME_SEED.0, HOME_SEED.1), Button::Primary, P1);
    assert_eq!(actions, vec![Action::SetCursor("grabbing")]);
    assert!(matches!(&core.input, InputState::DraggingToken { id, pointer: P1, .. } if id == "h1"));
}

#[test]
fn pointer_down_on_empty_pitch_with_move_tool_stays_idle() {
    let mut core = EngineCore::new();
    let actions = core.on_pointer_down(pt(10.0, 10.0), Button::Primary, P1);
    assert!(actions.is_empty());
    assert!(!core.gesture_active());
}

#[test]
fn drag_moves_token_and_reports_final_position() {
    let mut core = EngineCore::new();
    let added = core.add_token();
    let Some(Action::TokenAdded(token)) = added.first().cloned() else {
        panic!("expected TokenAdded");
    };
    let before = core.scene().clone();

    core.on_pointer_down(pt(SPAWN_POINT.0, SPAWN_POINT.1), Button::Primary, P1);
    let mid = core.on_pointer_move(pt(300.0, 200.0), P1);
    assert!(has_render_needed(&mid));
    assert_eq!(core.scene().token(&token.id).unwrap().position(), pt(300.0, 200.0));

    let actions = core.on_pointer_up(pt(100.0, 100.0), P1);
    assert!(actions.contains(&Action::TokenMoved { id: token.id.clone(), x: 100.0, y: 100.0 }));
    assert!(actions.contains(&Action::SetCursor("default")));
    assert!(!core.gesture_active());

    // Only the dragged token changed.
    for t in &core.scene().tokens {
        if t.id != token.id {
            assert_eq!(Some(t), before.token(&t.id));
        }
    }
    assert_eq!(core.scene().annotations, before.annotations);
}

#[test]
fn drag_keeps_grab_offset() {
    let mut core = EngineCore::new();
    // Grab the home seed 5 units right of its centre.
    core.on_pointer_down(pt(HOME_SEED.0 + 5.0, HOME_SEED.1), Button::Primary, P1);
    core.on_pointer_move(pt(205.0, 300.0), P1);
    assert_eq!(core.scene().token("h1").unwrap().position(), pt(200.0, 300.0));
}

#[test]
fn drag_is_clamped_to_board() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(AWAY_SEED.0, AWAY_SEED.1), Button::Primary, P1);
    let actions = core.on_pointer_up(pt(-500.0, 5000.0), P1);
    assert!(actions.contains(&Action::TokenMoved { id: "a1".into(), x: 0.0, y: BOARD_HEIGHT }));
}

#[test]
fn drawing_tools_never_drag_tokens() {
    let mut core = core_with_tool(Tool::Arrow);
    core.on_pointer_down(pt(HOME_SEED.0, HOME_SEED.1), Button::Primary, P1);
    core.on_pointer_move(pt(100.0, 100.0), P1);
    core.on_pointer_up(pt(100.0, 100.0), P1);
    assert_eq!(core.scene().token("h1").unwrap().position(), pt(HOME_SEED.0, HOME_SEED.1));
    assert_eq!(core.scene().annotations.len(), 1);
}

// =============================================================
// Idle -> Drawing -> Idle
// =============================================================

#[test]
fn freehand_gesture_records_path() {
    let mut core = core_with_tool(Tool::Freehand);
    let down = core.on_pointer_down(pt(0.0, 0.0), Button::Primary, P1);
    assert!(matches!(down.first(), Some(Action::AnnotationStarted(_))));

    core.on_pointer_move(pt(10.0, 5.0), P1);
    core.on_pointer_move(pt(20.0, 15.0), P1);
    let up = core.on_pointer_up(pt(20.0, 15.0), P1);

    let ann = finished_annotation(&up).unwrap();
    assert_eq!(ann.kind, AnnotationKind::Freehand);
    assert_eq!(ann.points, vec![0.0, 0.0, 10.0, 5.0, 20.0, 15.0]);
    assert_eq!(ann.color, ANNOTATION_COLOR);

    // Moves after the gesture leave the stroke alone.
    assert!(core.on_pointer_move(pt(99.0, 99.0), P1).is_empty());
    assert_eq!(&core.scene().annotations[0], ann);
}

#[test]
fn arrow_gesture_keeps_two_points() {
    let mut core = core_with_tool(Tool::Arrow);
    let actions = draw(&mut core, &[pt(10.0, 10.0), pt(20.0, 20.0), pt(30.0, 25.0), pt(60.0, 40.0)]);
    let ann = finished_annotation(&actions).unwrap();
    assert_eq!(ann.kind, AnnotationKind::Arrow);
    assert_eq!(ann.points, vec![10.0, 10.0, 60.0, 40.0]);
}

#[test]
fn click_without_move_leaves_degenerate_annotation() {
    let mut core = core_with_tool(Tool::Arrow);
    core.on_pointer_down(pt(5.0, 5.0), Button::Primary, P1);
    let actions = core.on_pointer_up(pt(5.0, 5.0), P1);
    assert_eq!(finished_annotation(&actions).unwrap().points, vec![5.0, 5.0, 5.0, 5.0]);
}

#[test]
fn tool_switch_mid_gesture_does_not_change_gesture() {
    let mut core = core_with_tool(Tool::Freehand);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, P1);
    core.set_tool(Tool::Arrow);
    core.on_pointer_move(pt(1.0, 1.0), P1);
    core.on_pointer_move(pt(2.0, 2.0), P1);
    let actions = core.on_pointer_up(pt(2.0, 2.0), P1);
    let ann = finished_annotation(&actions).unwrap();
    assert_eq!(ann.kind, AnnotationKind::Freehand);
    assert_eq!(ann.point_count(), 3);

    // The next gesture uses the new tool.
    let actions = draw(&mut core, &[pt(0.0, 0.0), pt(5.0, 5.0), pt(9.0, 9.0)]);
    assert_eq!(finished_annotation(&actions).unwrap().kind, AnnotationKind::Arrow);
}

// =============================================================
// Single active pointer
// =============================================================

#[test]
fn second_pointer_down_is_ignored_while_drawing() {
    let mut core = core_with_tool(Tool::Freehand);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, P1);
    assert!(core.on_pointer_down(pt(50.0, 50.0), Button::Primary, P2).is_empty());
    assert_eq!(core.scene().annotations.len(), 1);
}

#[test]
fn foreign_pointer_moves_and_ups_are_ignored() {
    let mut core = core_with_tool(Tool::Freehand);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, P1);
    assert!(core.on_pointer_move(pt(9.0, 9.0), P2).is_empty());
    assert!(core.on_pointer_up(pt(9.0, 9.0), P2).is_empty());
    assert!(core.on_pointer_cancel(P2).is_empty());
    assert!(core.gesture_active());
    assert_eq!(core.scene().annotations[0].points, vec![0.0, 0.0]);
}

#[test]
fn non_primary_buttons_do_not_start_gestures() {
    let mut core = core_with_tool(Tool::Freehand);
    assert!(core.on_pointer_down(pt(0.0, 0.0), Button::Secondary, P1).is_empty());
    assert!(core.on_pointer_down(pt(0.0, 0.0), Button::Middle, P1).is_empty());
    assert!(!core.gesture_active());
    assert!(core.scene().annotations.is_empty());
}

#[test]
fn moves_while_idle_do_nothing() {
    let mut core = EngineCore::new();
    let before = core.scene().clone();
    assert!(core.on_pointer_move(pt(1.0, 1.0), P1).is_empty());
    assert!(core.on_pointer_up(pt(1.0, 1.0), P1).is_empty());
    assert_eq!(core.scene(), &before);
}

// =============================================================
// Cancellation
// =============================================================

#[test]
fn cancel_keeps_half_drawn_annotation() {
    let mut core = core_with_tool(Tool::Freehand);
    core.on_pointer_down(pt(0.0, 0.0), Button::Primary, P1);
    core.on_pointer_move(pt(4.0, 4.0), P1);
    let actions = core.on_pointer_cancel(P1);
    assert_eq!(finished_annotation(&actions).unwrap().points, vec![0.0, 0.0, 4.0, 4.0]);
    assert!(!core.gesture_active());
    assert_eq!(core.scene().annotations.len(), 1);
}

#[test]
fn cancel_leaves_dragged_token_where_it_was() {
    let mut core = EngineCore::new();
    core.on_pointer_down(pt(HOME_SEED.0, HOME_SEED.1), Button::Primary, P1);
    core.on_pointer_move(pt(250.0, 250.0), P1);
    let actions = core.on_pointer_cancel(P1);
    assert!(actions.contains(&Action::TokenMoved { id: "h1".into(), x: 250.0, y: 250.0 }));
    assert_eq!(core.scene().token("h1").unwrap().position(), pt(250.0, 250.0));
}
