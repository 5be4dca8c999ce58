//! Integration tests: pointer-driven tool flows through the session.
//!
//! These drive the session the way the browser shell does — screen
//! coordinates in, document state out — covering creation thresholds,
//! selection, lasso, resize clamping, camera transforms, and shortcuts.

use easel_core::LayerId;
use easel_core::model::{
    DEFAULT_HEIGHT, DEFAULT_WIDTH, Document, Layer, LayerKind, LayerPatch, LayerProperties,
    MIN_SIZE, RestackOp, ShapeKind,
};
use easel_editor::shortcuts::ShortcutAction;
use easel_editor::{EditorSession, MAX_ZOOM, MIN_ZOOM, Modifiers, ToolKind};

fn shape_layer(name: &str, x: f32, y: f32, w: f32, h: f32) -> Layer {
    let mut props = LayerProperties::at(x, y, w, h);
    props.shape = Some(ShapeKind::Rectangle);
    Layer::new(LayerId::generate("rect"), name, LayerKind::Shape).with_properties(props)
}

fn session_with(layers: Vec<Layer>) -> EditorSession {
    let mut doc = Document::new();
    for layer in layers {
        doc.add_layer(None, layer);
    }
    EditorSession::new(doc)
}

fn click(session: &mut EditorSession, x: f32, y: f32) {
    session.pointer_down(x, y, Modifiers::NONE);
    session.pointer_up(x, y, Modifiers::NONE);
}

fn drag(session: &mut EditorSession, from: (f32, f32), to: (f32, f32)) {
    session.pointer_down(from.0, from.1, Modifiers::NONE);
    session.pointer_move(to.0, to.1, Modifiers::NONE);
    session.pointer_up(to.0, to.1, Modifiers::NONE);
}

// ─── Creation ───────────────────────────────────────────────────────────

#[test]
fn big_drag_creates_drag_sized_shape() {
    let mut session = session_with(vec![]);
    session.set_tool(ToolKind::Shape(ShapeKind::Circle));
    drag(&mut session, (40.0, 50.0), (160.0, 130.0));

    assert_eq!(session.layer_count(), 1);
    let id = session.selected().expect("new shape becomes selected");
    let (x, y, w, h) = session.bounds_of(id).unwrap();
    assert_eq!((x, y, w, h), (40.0, 50.0, 120.0, 80.0));

    let layer = session.document.get(id).unwrap();
    assert_eq!(layer.properties.as_ref().unwrap().shape, Some(ShapeKind::Circle));
    assert_eq!(layer.name, "Circle 1");
    assert_eq!(
        session.active_tool(),
        ToolKind::Select,
        "creation commits back to select"
    );
}

#[test]
fn tiny_drag_places_default_sized_shape_at_start() {
    let mut session = session_with(vec![]);
    session.set_tool(ToolKind::Shape(ShapeKind::Rectangle));
    drag(&mut session, (300.0, 200.0), (306.0, 207.0));

    let id = session.selected().unwrap();
    let (x, y, w, h) = session.bounds_of(id).unwrap();
    assert_eq!((x, y), (300.0, 200.0), "placed at the drag start");
    assert_eq!((w, h), (DEFAULT_WIDTH, DEFAULT_HEIGHT));
}

#[test]
fn text_and_comment_place_immediately() {
    let mut session = session_with(vec![]);
    session.set_tool(ToolKind::Text);
    session.pointer_down(120.0, 80.0, Modifiers::NONE);

    let text_id = session.selected().unwrap();
    assert_eq!(session.document.get(text_id).unwrap().kind, LayerKind::Text);
    assert_eq!(session.active_tool(), ToolKind::Select);

    session.set_tool(ToolKind::Comment);
    session.pointer_down(400.0, 300.0, Modifiers::NONE);
    let pin_id = session.selected().unwrap();
    let pin = session.document.get(pin_id).unwrap();
    assert_eq!(pin.kind, LayerKind::Comment);
    assert_eq!(session.layer_count(), 2);
}

#[test]
fn pencil_draws_through_camera_transform() {
    let mut session = session_with(vec![]);
    session.camera.set_zoom(2.0);
    session.camera.pan_by(100.0, 60.0);
    session.set_tool(ToolKind::Pencil);

    // Screen (100, 60) maps to canvas (0, 0); (300, 260) to (100, 100).
    session.pointer_down(100.0, 60.0, Modifiers::NONE);
    session.pointer_move(300.0, 260.0, Modifiers::NONE);
    session.pointer_up(300.0, 260.0, Modifiers::NONE);

    let id = session.selected().expect("pencil stroke created");
    let (x, y, w, h) = session.bounds_of(id).unwrap();
    assert!((x - 0.0).abs() < 0.01 && (y - 0.0).abs() < 0.01);
    assert!((w - 100.0).abs() < 0.01 && (h - 100.0).abs() < 0.01);
}

#[test]
fn pen_needs_enter_to_finish() {
    let mut session = session_with(vec![]);
    session.set_tool(ToolKind::Pen);
    click(&mut session, 10.0, 10.0);
    click(&mut session, 110.0, 10.0);
    click(&mut session, 110.0, 90.0);
    assert_eq!(session.layer_count(), 0, "path not committed yet");

    let outcome = session.handle_key("Enter", Modifiers::NONE);
    assert!(outcome.changed);
    assert_eq!(session.layer_count(), 1);

    let id = session.selected().unwrap();
    let path = session
        .document
        .get(id)
        .unwrap()
        .properties
        .as_ref()
        .unwrap()
        .path
        .clone()
        .unwrap();
    assert_eq!(path.points.len(), 3);
    assert!(path.closed, "Enter closes the path");
}

// ─── Selection ──────────────────────────────────────────────────────────

#[test]
fn click_selects_topmost_and_empty_click_clears() {
    let mut session = session_with(vec![
        shape_layer("Below", 0.0, 0.0, 100.0, 100.0),
        shape_layer("Above", 50.0, 50.0, 100.0, 100.0),
    ]);
    let above = session.document.top_level()[1];

    click(&mut session, 75.0, 75.0);
    assert_eq!(session.selected(), Some(above));

    click(&mut session, 500.0, 500.0);
    assert_eq!(session.selected(), None);
}

#[test]
fn lasso_selects_topmost_intersecting() {
    let mut session = session_with(vec![
        shape_layer("A", 0.0, 0.0, 50.0, 50.0),
        shape_layer("B", 30.0, 30.0, 50.0, 50.0),
        shape_layer("Far", 500.0, 500.0, 50.0, 50.0),
    ]);
    let b = session.document.top_level()[1];

    // Lasso over the two overlapping shapes, well clear of "Far".
    drag(&mut session, (150.0, 150.0), (5.0, 5.0));
    assert_eq!(session.selected(), Some(b), "topmost intersecting wins");

    // Empty lasso clears.
    drag(&mut session, (300.0, 5.0), (400.0, 80.0));
    assert_eq!(session.selected(), None);
}

#[test]
fn drag_moves_selected_layer() {
    let mut session = session_with(vec![shape_layer("Box", 100.0, 100.0, 100.0, 80.0)]);
    let id = session.document.top_level()[0];

    drag(&mut session, (150.0, 140.0), (180.0, 120.0));
    assert_eq!(session.selected(), Some(id));
    let (x, y, ..) = session.bounds_of(id).unwrap();
    assert!((x - 130.0).abs() < 0.01);
    assert!((y - 80.0).abs() < 0.01);
}

// ─── Resize ─────────────────────────────────────────────────────────────

#[test]
fn handle_resize_clamps_to_minimum() {
    let mut session = session_with(vec![shape_layer("Box", 100.0, 100.0, 200.0, 150.0)]);
    let id = session.document.top_level()[0];
    session.select(Some(id));

    // Grab the south-east handle and drag far past the opposite corner.
    session.pointer_down(300.0, 250.0, Modifiers::NONE);
    session.pointer_move(110.0, 105.0, Modifiers::NONE);
    session.pointer_up(110.0, 105.0, Modifiers::NONE);

    let (x, y, w, h) = session.bounds_of(id).unwrap();
    assert_eq!((x, y), (100.0, 100.0), "origin anchored");
    assert_eq!((w, h), (MIN_SIZE, MIN_SIZE), "clamped to the 50px minimum");
}

#[test]
fn northwest_resize_moves_origin() {
    let mut session = session_with(vec![shape_layer("Box", 100.0, 100.0, 200.0, 150.0)]);
    let id = session.document.top_level()[0];
    session.select(Some(id));

    session.pointer_down(100.0, 100.0, Modifiers::NONE);
    session.pointer_move(140.0, 130.0, Modifiers::NONE);
    session.pointer_up(140.0, 130.0, Modifiers::NONE);

    let (x, y, w, h) = session.bounds_of(id).unwrap();
    assert_eq!((x, y), (140.0, 130.0));
    assert_eq!((w, h), (160.0, 120.0), "far corner stays anchored");
}

// ─── Duplicate / delete / restack ───────────────────────────────────────

#[test]
fn duplicate_offsets_copy_by_20() {
    let mut session = session_with(vec![shape_layer("Box", 10.0, 20.0, 120.0, 90.0)]);
    let original = session.document.top_level()[0];
    session.select(Some(original));

    let copy = session.duplicate_selected().unwrap();
    assert_ne!(copy, original);
    assert_eq!(session.selected(), Some(copy));

    let (ox, oy, ow, oh) = session.bounds_of(original).unwrap();
    let (cx, cy, cw, ch) = session.bounds_of(copy).unwrap();
    assert_eq!((cx, cy), (ox + 20.0, oy + 20.0));
    assert_eq!((cw, ch), (ow, oh), "size identical");

    let orig_style = &session.document.get(original).unwrap().properties.as_ref().unwrap().style;
    let copy_style = &session.document.get(copy).unwrap().properties.as_ref().unwrap().style;
    assert_eq!(orig_style, copy_style, "style identical");
}

#[test]
fn delete_shortcut_removes_selection() {
    let mut session = session_with(vec![shape_layer("Box", 0.0, 0.0, 100.0, 100.0)]);
    let id = session.document.top_level()[0];
    session.select(Some(id));

    let outcome = session.handle_key("Delete", Modifiers::NONE);
    assert_eq!(outcome.action, Some(ShortcutAction::Delete));
    assert!(outcome.changed);
    assert_eq!(session.layer_count(), 0);
    assert_eq!(session.selected(), None);
}

#[test]
fn restack_shortcut_reorders_selection() {
    let mut session = session_with(vec![
        shape_layer("A", 0.0, 0.0, 50.0, 50.0),
        shape_layer("B", 0.0, 0.0, 50.0, 50.0),
    ]);
    let a = session.document.top_level()[0];
    session.select(Some(a));

    assert!(session.restack_selected(RestackOp::BringToFront));
    assert_eq!(session.document.top_level()[1], a);
}

// ─── Camera & tools ─────────────────────────────────────────────────────

#[test]
fn zoom_shortcuts_stay_clamped() {
    let mut session = session_with(vec![]);
    let cmd = Modifiers {
        meta: true,
        ..Modifiers::NONE
    };
    for _ in 0..30 {
        session.handle_key("=", cmd);
    }
    assert_eq!(session.camera.zoom(), MAX_ZOOM);

    for _ in 0..60 {
        session.handle_key("-", cmd);
    }
    assert_eq!(session.camera.zoom(), MIN_ZOOM);

    session.handle_key("1", cmd);
    assert_eq!(session.camera.zoom(), 1.0);
}

#[test]
fn zoom_to_fit_centers_content() {
    let mut session = session_with(vec![shape_layer("Box", 1000.0, 1000.0, 400.0, 200.0)]);
    assert!(session.zoom_to_fit(800.0, 600.0));

    // The content center should land at the viewport center.
    let (sx, sy) = session.camera.canvas_to_screen(1200.0, 1100.0);
    assert!((sx - 400.0).abs() < 0.5, "centered x, got {sx}");
    assert!((sy - 300.0).abs() < 0.5, "centered y, got {sy}");

    // Empty canvas: no-op.
    let mut empty = session_with(vec![]);
    assert!(!empty.zoom_to_fit(800.0, 600.0));
}

#[test]
fn space_gives_temporary_hand_and_reverts() {
    let mut session = session_with(vec![]);
    session.set_tool(ToolKind::Pen);

    session.handle_key(" ", Modifiers::NONE);
    assert_eq!(session.active_tool(), ToolKind::Hand);

    // Pan while holding space.
    drag(&mut session, (400.0, 300.0), (360.0, 330.0));
    assert_eq!(session.camera.pan_x, -40.0);
    assert_eq!(session.camera.pan_y, 30.0);

    session.handle_key_up(" ");
    assert_eq!(session.active_tool(), ToolKind::Pen, "reverts on release");
}

#[test]
fn tool_shortcuts_switch_tools() {
    let mut session = session_with(vec![]);
    session.handle_key("r", Modifiers::NONE);
    assert_eq!(
        session.active_tool(),
        ToolKind::Shape(ShapeKind::Rectangle)
    );

    session.handle_key("h", Modifiers::NONE);
    assert_eq!(session.active_tool(), ToolKind::Hand);

    session.handle_key("Tab", Modifiers::NONE);
    assert_eq!(
        session.active_tool(),
        ToolKind::Shape(ShapeKind::Rectangle),
        "tab toggles back"
    );
}

// ─── Comments & patches ─────────────────────────────────────────────────

#[test]
fn comment_thread_via_session() {
    let mut session = session_with(vec![shape_layer("Box", 0.0, 0.0, 100.0, 100.0)]);
    let id = session.document.top_level()[0];

    assert!(session.add_comment(id, "You", "Needs more contrast", 1_700_000_000_000.0));
    let comment_id = session.document.get(id).unwrap().comments[0].id.clone();

    assert!(session.remove_comment(id, &comment_id));
    assert!(session.document.get(id).unwrap().comments.is_empty());

    // Both operations are undoable.
    assert!(session.undo());
    assert_eq!(session.document.get(id).unwrap().comments.len(), 1);
}

#[test]
fn update_layer_merges_partial_patch() {
    let mut session = session_with(vec![shape_layer("Box", 0.0, 0.0, 100.0, 100.0)]);
    let id = session.document.top_level()[0];

    assert!(session.update_layer(
        id,
        LayerPatch {
            name: Some("Hero".into()),
            width: Some(300.0),
            ..LayerPatch::default()
        },
    ));

    let layer = session.document.get(id).unwrap();
    assert_eq!(layer.name, "Hero");
    let props = layer.properties.as_ref().unwrap();
    assert_eq!(props.width, 300.0);
    assert_eq!(props.height, 100.0, "unpatched field preserved");
}
