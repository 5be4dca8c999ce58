//! Integration tests: snapshot history through the editor session.
//!
//! Exercises the EditorSession + History interaction across crate
//! boundaries: sequential additions walk back one state at a time, drag
//! gestures collapse to a single step, and stale selections are cleared.

use easel_core::LayerId;
use easel_core::model::{Document, Layer, LayerKind, LayerProperties, ShapeKind};
use easel_editor::session::{Edit, EditorSession};
use easel_editor::{Modifiers, ToolKind};

fn shape_layer(name: &str, x: f32, y: f32) -> Layer {
    let mut props = LayerProperties::at(x, y, 100.0, 80.0);
    props.shape = Some(ShapeKind::Rectangle);
    Layer::new(LayerId::generate("rect"), name, LayerKind::Shape).with_properties(props)
}

fn add(session: &mut EditorSession, name: &str) -> LayerId {
    let layer = shape_layer(name, 0.0, 0.0);
    let id = layer.id;
    session.apply_edit(Edit::Add {
        parent: None,
        layer: Box::new(layer),
    });
    id
}

// ─── Sequential additions ───────────────────────────────────────────────

#[test]
fn undo_after_n_additions_restores_n_minus_1() {
    let mut session = EditorSession::new(Document::new());
    for i in 0..4 {
        add(&mut session, &format!("R{i}"));
    }
    assert_eq!(session.layer_count(), 4);

    assert!(session.undo());
    assert_eq!(session.layer_count(), 3);
    assert!(session.undo());
    assert_eq!(session.layer_count(), 2);

    assert!(session.redo());
    assert_eq!(session.layer_count(), 3);
    assert!(session.redo());
    assert_eq!(session.layer_count(), 4);
    assert!(!session.redo(), "nothing further to redo");
}

#[test]
fn undo_bottoms_out_at_seeded_document() {
    let mut doc = Document::new();
    doc.add_layer(None, shape_layer("Seeded", 10.0, 10.0));
    let mut session = EditorSession::new(doc);

    add(&mut session, "New");
    assert!(session.undo());
    assert_eq!(session.layer_count(), 1, "back to the seeded document");
    assert!(!session.undo(), "seeded state is the floor");
}

#[test]
fn new_action_clears_redo() {
    let mut session = EditorSession::new(Document::new());
    add(&mut session, "A");
    add(&mut session, "B");

    session.undo();
    assert!(session.can_redo());

    add(&mut session, "C");
    assert!(!session.can_redo(), "forward history truncated");
    session.undo();
    assert_eq!(session.layer_count(), 1);
}

// ─── Drag batching ──────────────────────────────────────────────────────

#[test]
fn drag_gesture_is_one_undo_step() {
    let mut doc = Document::new();
    let id = doc.add_layer(None, shape_layer("Box", 100.0, 100.0));
    let mut session = EditorSession::new(doc);

    // Simulate a 5-frame drag across the layer.
    session.pointer_down(150.0, 140.0, Modifiers::NONE);
    for i in 1..=5 {
        session.pointer_move(150.0 + (i as f32) * 10.0, 140.0, Modifiers::NONE);
    }
    session.pointer_up(200.0, 140.0, Modifiers::NONE);

    let moved = session.bounds_of(id).unwrap();
    assert!((moved.0 - 150.0).abs() < 0.01, "x moved by 50, got {}", moved.0);

    // One undo reverses the whole gesture.
    assert!(session.undo());
    let restored = session.bounds_of(id).unwrap();
    assert!((restored.0 - 100.0).abs() < 0.01);
    assert!(!session.can_undo(), "drag produced exactly one step");

    // Redo replays it.
    assert!(session.redo());
    let again = session.bounds_of(id).unwrap();
    assert!((again.0 - 150.0).abs() < 0.01);
}

#[test]
fn click_without_drag_records_nothing() {
    let mut doc = Document::new();
    doc.add_layer(None, shape_layer("Box", 0.0, 0.0));
    let mut session = EditorSession::new(doc);

    session.pointer_down(10.0, 10.0, Modifiers::NONE);
    session.pointer_up(10.0, 10.0, Modifiers::NONE);
    assert!(!session.can_undo(), "selection alone is not an edit");
}

// ─── Deletion and selection invariants ──────────────────────────────────

#[test]
fn undo_restores_deleted_layer() {
    let mut session = EditorSession::new(Document::new());
    let id = add(&mut session, "Victim");

    session.select(Some(id));
    assert!(session.delete_selected());
    assert!(!session.document.contains(id));
    assert_eq!(session.selected(), None, "deletion clears the selection");

    assert!(session.undo());
    assert!(session.document.contains(id));
    let restored = session.document.get(id).unwrap();
    assert_eq!(restored.name, "Victim");
}

#[test]
fn undo_clears_selection_of_vanished_layer() {
    let mut session = EditorSession::new(Document::new());
    let id = add(&mut session, "Ephemeral");
    session.select(Some(id));

    // Undo removes the layer the selection points at.
    assert!(session.undo());
    assert_eq!(session.selected(), None);
}

// ─── Creation tools and history ─────────────────────────────────────────

#[test]
fn drag_created_shape_is_one_step() {
    let mut session = EditorSession::new(Document::new());
    session.set_tool(ToolKind::Shape(ShapeKind::Rectangle));

    session.pointer_down(10.0, 10.0, Modifiers::NONE);
    session.pointer_move(90.0, 70.0, Modifiers::NONE);
    session.pointer_up(90.0, 70.0, Modifiers::NONE);

    assert_eq!(session.layer_count(), 1);
    assert!(session.undo());
    assert_eq!(session.layer_count(), 0);
    assert!(!session.can_undo());
}
