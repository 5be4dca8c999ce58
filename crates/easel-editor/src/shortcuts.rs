//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic [`ShortcutAction`]s. Cmd and
//! Ctrl are treated equivalently so one table serves both platforms.
//! Single letters are the tool mnemonics; Space doubles as the
//! temporary-hand hold, released via key-up.

use crate::input::Modifiers;
use crate::tools::ToolKind;
use easel_core::model::{RestackOp, ShapeKind};

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    SwitchTool(ToolKind),
    /// Toggle between the current and previous tool (Tab).
    ToggleLastTool,
    /// Space held: temporary hand tool until key-up.
    HandHold,

    Undo,
    Redo,
    Delete,
    Duplicate,
    Deselect,

    ZoomIn,
    ZoomOut,
    ZoomReset,
    ZoomToFit,

    Restack(RestackOp),
}

impl ShortcutAction {
    /// Wire name for the shell ("undo", "zoom-in", tool names verbatim).
    pub fn name(&self) -> &'static str {
        match self {
            ShortcutAction::SwitchTool(tool) => tool.name(),
            ShortcutAction::ToggleLastTool => "toggle-tool",
            ShortcutAction::HandHold => "hand-hold",
            ShortcutAction::Undo => "undo",
            ShortcutAction::Redo => "redo",
            ShortcutAction::Delete => "delete",
            ShortcutAction::Duplicate => "duplicate",
            ShortcutAction::Deselect => "deselect",
            ShortcutAction::ZoomIn => "zoom-in",
            ShortcutAction::ZoomOut => "zoom-out",
            ShortcutAction::ZoomReset => "zoom-reset",
            ShortcutAction::ZoomToFit => "zoom-fit",
            ShortcutAction::Restack(RestackOp::BringForward) => "bring-forward",
            ShortcutAction::Restack(RestackOp::SendBackward) => "send-backward",
            ShortcutAction::Restack(RestackOp::BringToFront) => "bring-to-front",
            ShortcutAction::Restack(RestackOp::SendToBack) => "send-to-back",
        }
    }
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"Delete"`).
    /// Returns `None` if the combo has no binding.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let cmd = modifiers.command();

        // ── Modifier combos first (most specific) ──
        if cmd && modifiers.shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                "[" => Some(ShortcutAction::Restack(RestackOp::SendToBack)),
                "]" => Some(ShortcutAction::Restack(RestackOp::BringToFront)),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Duplicate),
                "=" | "+" => Some(ShortcutAction::ZoomIn),
                "-" => Some(ShortcutAction::ZoomOut),
                "0" => Some(ShortcutAction::ZoomToFit),
                "1" => Some(ShortcutAction::ZoomReset),
                "[" => Some(ShortcutAction::Restack(RestackOp::SendBackward)),
                "]" => Some(ShortcutAction::Restack(RestackOp::BringForward)),
                _ => None,
            };
        }

        if modifiers.shift {
            return match key {
                "p" | "P" => Some(ShortcutAction::SwitchTool(ToolKind::Pencil)),
                _ => None,
            };
        }

        // ── Single keys (tool mnemonics) ──
        match key {
            "v" | "V" => Some(ShortcutAction::SwitchTool(ToolKind::Select)),
            "f" | "F" => Some(ShortcutAction::SwitchTool(ToolKind::Frame)),
            "r" | "R" => Some(ShortcutAction::SwitchTool(ToolKind::Shape(
                ShapeKind::Rectangle,
            ))),
            "o" | "O" => Some(ShortcutAction::SwitchTool(ToolKind::Shape(
                ShapeKind::Circle,
            ))),
            "l" | "L" => Some(ShortcutAction::SwitchTool(ToolKind::Shape(ShapeKind::Line))),
            "p" | "P" => Some(ShortcutAction::SwitchTool(ToolKind::Pen)),
            "t" | "T" => Some(ShortcutAction::SwitchTool(ToolKind::Text)),
            "h" | "H" => Some(ShortcutAction::SwitchTool(ToolKind::Hand)),
            "c" | "C" => Some(ShortcutAction::SwitchTool(ToolKind::Comment)),
            "Tab" => Some(ShortcutAction::ToggleLastTool),
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            " " => Some(ShortcutAction::HandHold),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CMD: Modifiers = Modifiers {
        shift: false,
        ctrl: false,
        alt: false,
        meta: true,
    };
    const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };
    const SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };
    const CMD_SHIFT: Modifiers = Modifiers {
        shift: true,
        ctrl: false,
        alt: false,
        meta: true,
    };

    #[test]
    fn resolve_tool_mnemonics() {
        assert_eq!(
            ShortcutMap::resolve("v", Modifiers::NONE),
            Some(ShortcutAction::SwitchTool(ToolKind::Select))
        );
        assert_eq!(
            ShortcutMap::resolve("r", Modifiers::NONE),
            Some(ShortcutAction::SwitchTool(ToolKind::Shape(
                ShapeKind::Rectangle
            )))
        );
        assert_eq!(
            ShortcutMap::resolve("h", Modifiers::NONE),
            Some(ShortcutAction::SwitchTool(ToolKind::Hand))
        );
        assert_eq!(
            ShortcutMap::resolve("p", SHIFT),
            Some(ShortcutAction::SwitchTool(ToolKind::Pencil))
        );
        assert_eq!(
            ShortcutMap::resolve("c", Modifiers::NONE),
            Some(ShortcutAction::SwitchTool(ToolKind::Comment))
        );
    }

    #[test]
    fn resolve_undo_redo_both_platforms() {
        assert_eq!(ShortcutMap::resolve("z", CMD), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutMap::resolve("z", CTRL), Some(ShortcutAction::Undo));
        assert_eq!(
            ShortcutMap::resolve("z", CMD_SHIFT),
            Some(ShortcutAction::Redo)
        );
        assert_eq!(ShortcutMap::resolve("y", CMD), Some(ShortcutAction::Redo));
        // Plain z is nothing.
        assert_eq!(ShortcutMap::resolve("z", Modifiers::NONE), None);
    }

    #[test]
    fn resolve_delete_and_escape() {
        assert_eq!(
            ShortcutMap::resolve("Delete", Modifiers::NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Backspace", Modifiers::NONE),
            Some(ShortcutAction::Delete)
        );
        assert_eq!(
            ShortcutMap::resolve("Escape", Modifiers::NONE),
            Some(ShortcutAction::Deselect)
        );
    }

    #[test]
    fn resolve_zoom() {
        assert_eq!(ShortcutMap::resolve("=", CMD), Some(ShortcutAction::ZoomIn));
        assert_eq!(
            ShortcutMap::resolve("-", CMD),
            Some(ShortcutAction::ZoomOut)
        );
        assert_eq!(
            ShortcutMap::resolve("0", CMD),
            Some(ShortcutAction::ZoomToFit)
        );
        assert_eq!(
            ShortcutMap::resolve("1", CMD),
            Some(ShortcutAction::ZoomReset)
        );
    }

    #[test]
    fn resolve_z_order() {
        assert_eq!(
            ShortcutMap::resolve("]", CMD),
            Some(ShortcutAction::Restack(RestackOp::BringForward))
        );
        assert_eq!(
            ShortcutMap::resolve("[", CMD),
            Some(ShortcutAction::Restack(RestackOp::SendBackward))
        );
        assert_eq!(
            ShortcutMap::resolve("]", CMD_SHIFT),
            Some(ShortcutAction::Restack(RestackOp::BringToFront))
        );
        assert_eq!(
            ShortcutMap::resolve("[", CMD_SHIFT),
            Some(ShortcutAction::Restack(RestackOp::SendToBack))
        );
    }

    #[test]
    fn resolve_space_and_tab() {
        assert_eq!(
            ShortcutMap::resolve(" ", Modifiers::NONE),
            Some(ShortcutAction::HandHold)
        );
        assert_eq!(
            ShortcutMap::resolve("Tab", Modifiers::NONE),
            Some(ShortcutAction::ToggleLastTool)
        );
    }

    #[test]
    fn unknown_keys_resolve_to_nothing() {
        assert_eq!(ShortcutMap::resolve("q", Modifiers::NONE), None);
        assert_eq!(ShortcutMap::resolve("7", Modifiers::NONE), None);
    }
}
