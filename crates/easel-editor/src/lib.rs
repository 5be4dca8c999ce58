pub mod history;
pub mod input;
pub mod session;
pub mod shortcuts;
pub mod tools;

pub use history::History;
pub use input::{InputEvent, Modifiers};
pub use session::{Camera, Edit, EditorSession, KeyOutcome, MAX_ZOOM, MIN_ZOOM};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use tools::{Tool, ToolEvent, ToolKind};
