//! Headless walkthrough of an editor session.
//!
//! Seeds the mock editor file, draws and manipulates a few elements the
//! way the browser shell would, and prints the resulting layer list.
//! Run with `RUST_LOG=debug` to watch the session's internal logging.

use easel_core::mock;
use easel_editor::{EditorSession, Modifiers, ToolKind};
use easel_core::model::ShapeKind;

fn main() {
    env_logger::init();

    let file = mock::mock_editor_file();
    let page = file
        .pages
        .iter()
        .find(|p| p.id == "page2")
        .expect("mock file has a scratch page");
    let mut session = EditorSession::new(page.document.clone());

    println!("opened '{}' / {} ({} layers)", file.title, page.name, session.layer_count());

    // Drag out a rectangle.
    session.set_tool(ToolKind::Shape(ShapeKind::Rectangle));
    session.pointer_down(600.0, 120.0, Modifiers::NONE);
    session.pointer_move(760.0, 220.0, Modifiers::NONE);
    session.pointer_up(760.0, 220.0, Modifiers::NONE);

    // Drag it 40px right.
    session.pointer_down(680.0, 170.0, Modifiers::NONE);
    session.pointer_move(720.0, 170.0, Modifiers::NONE);
    session.pointer_up(720.0, 170.0, Modifiers::NONE);

    // Freehand squiggle.
    session.set_tool(ToolKind::Pencil);
    session.pointer_down(100.0, 400.0, Modifiers::NONE);
    for i in 1..=20 {
        let x = 100.0 + (i as f32) * 12.0;
        let y = 400.0 + if i % 2 == 0 { 18.0 } else { -18.0 };
        session.pointer_move(x, y, Modifiers::NONE);
    }
    session.pointer_up(340.0, 400.0, Modifiers::NONE);

    println!("after drawing: {} layers", session.layer_count());

    // One undo drops the squiggle, another reverses the drag.
    session.undo();
    session.undo();
    println!("after two undos: {} layers", session.layer_count());
    session.redo();

    println!("\nlayers (bottom to top):");
    for id in session.document.paint_order() {
        let layer = session.document.get(id).expect("paint order is live");
        match session.bounds_of(id) {
            Some((x, y, w, h)) => {
                println!("  {layer}  @ ({x:.0}, {y:.0})  {w:.0}x{h:.0}");
            }
            None => println!("  {layer}  (structural)"),
        }
    }
}
