//! Key bindings.
//!
//! Command-qualified combos are matched first, then the editing keys, then
//! the single-letter tool keys. `ctrl+z` therefore means undo and never the
//! zoom tool.

use crate::input::Modifiers;
use crate::tools::ToolKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    Tool(ToolKind),
    Undo,
    Redo,
    Delete,
    SelectAll,
    /// Clear the selection and drop a live pen path.
    Deselect,
    /// Finish the live pen path.
    Commit,
    /// Space pressed: pan until it is released.
    PanStart,
}

pub struct ShortcutMap;

impl ShortcutMap {
    /// `key` is a DOM `KeyboardEvent.key` value. `meta` (⌘) counts as `ctrl`.
    pub fn resolve(key: &str, modifiers: Modifiers) -> Option<ShortcutAction> {
        let letter = single_letter(key);

        if modifiers.command() {
            return match (letter, modifiers.shift) {
                (Some('z'), true) => Some(ShortcutAction::Redo),
                (Some('z'), false) => Some(ShortcutAction::Undo),
                (Some('y'), false) => Some(ShortcutAction::Redo),
                (Some('a'), false) => Some(ShortcutAction::SelectAll),
                _ => None,
            };
        }

        let action = match key {
            "Delete" | "Backspace" => ShortcutAction::Delete,
            "Escape" => ShortcutAction::Deselect,
            "Enter" => ShortcutAction::Commit,
            " " | "Space" => ShortcutAction::PanStart,
            _ => ShortcutAction::Tool(tool_for(letter?)?),
        };
        Some(action)
    }
}

fn single_letter(key: &str) -> Option<char> {
    let mut chars = key.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
        _ => None,
    }
}

fn tool_for(letter: char) -> Option<ToolKind> {
    let tool = match letter {
        'v' => ToolKind::Select,
        'r' => ToolKind::Rectangle,
        'c' => ToolKind::Circle,
        'p' => ToolKind::Path,
        'n' => ToolKind::Pen,
        'b' => ToolKind::Brush,
        't' => ToolKind::Text,
        'i' => ToolKind::Eyedropper,
        'f' => ToolKind::Fill,
        'e' => ToolKind::Eraser,
        'z' => ToolKind::Zoom,
        'h' => ToolKind::Hand,
        _ => return None,
    };
    Some(tool)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CTRL: Modifiers = Modifiers {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    fn plain(key: &str) -> Option<ShortcutAction> {
        ShortcutMap::resolve(key, Modifiers::NONE)
    }

    #[test]
    fn every_tool_has_a_letter() {
        let letters = "vrcpnbtifezh";
        for (letter, kind) in letters.chars().zip(ToolKind::ALL) {
            assert_eq!(
                plain(&letter.to_string()),
                Some(ShortcutAction::Tool(kind)),
                "key {letter}"
            );
        }
        // Caps lock doesn't change the binding.
        assert_eq!(plain("R"), Some(ShortcutAction::Tool(ToolKind::Rectangle)));
    }

    #[test]
    fn command_combos_win_over_tool_letters() {
        assert_eq!(ShortcutMap::resolve("z", CTRL), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutMap::resolve("y", CTRL), Some(ShortcutAction::Redo));
        assert_eq!(ShortcutMap::resolve("a", CTRL), Some(ShortcutAction::SelectAll));
        let ctrl_shift = Modifiers { shift: true, ..CTRL };
        assert_eq!(ShortcutMap::resolve("Z", ctrl_shift), Some(ShortcutAction::Redo));
        let cmd = Modifiers::new(false, false, false, true);
        assert_eq!(ShortcutMap::resolve("z", cmd), Some(ShortcutAction::Undo));
        assert_eq!(ShortcutMap::resolve("v", CTRL), None);
    }

    #[test]
    fn editing_keys() {
        assert_eq!(plain("Delete"), Some(ShortcutAction::Delete));
        assert_eq!(plain("Backspace"), Some(ShortcutAction::Delete));
        assert_eq!(plain("Escape"), Some(ShortcutAction::Deselect));
        assert_eq!(plain("Enter"), Some(ShortcutAction::Commit));
        assert_eq!(plain(" "), Some(ShortcutAction::PanStart));
    }

    #[test]
    fn unbound_keys() {
        assert_eq!(plain("q"), None);
        assert_eq!(plain("Tab"), None);
        assert_eq!(plain("1"), None);
    }
}
