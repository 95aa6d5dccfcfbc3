//! Pointer gesture state machine.
//!
//! At most one gesture is active. Every gesture starts from `Idle` on a press
//! and returns to `Idle` on release (or when the pointer leaves the canvas).

use super::geometry::Point;
use crate::graph::{NodeId, Position};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
    /// Cmd on macOS.
    pub command: bool,
}

impl Modifiers {
    pub fn ctrl_or_command(&self) -> bool {
        self.ctrl || self.command
    }
}

/// Keys the canvas reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Z,
    Y,
    Delete,
    Backspace,
    Escape,
    Other,
}

/// Keyboard shortcut resolved from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    Undo,
    Redo,
    DeleteSelection,
    CancelGesture,
}

impl Shortcut {
    /// Ctrl/Cmd+Z undoes, Ctrl/Cmd+Shift+Z and Ctrl/Cmd+Y redo. Delete keys
    /// only apply when no text field has focus.
    pub fn resolve(key: Key, modifiers: Modifiers, text_focused: bool) -> Option<Self> {
        match key {
            Key::Z if modifiers.ctrl_or_command() && modifiers.shift => Some(Shortcut::Redo),
            Key::Z if modifiers.ctrl_or_command() => Some(Shortcut::Undo),
            Key::Y if modifiers.ctrl_or_command() => Some(Shortcut::Redo),
            Key::Delete | Key::Backspace if !text_focused => Some(Shortcut::DeleteSelection),
            Key::Escape => Some(Shortcut::CancelGesture),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GestureState {
    #[default]
    Idle,
    /// Background drag; `origin` is the pointer minus the translation at press.
    Panning { origin: Point },
    /// Node body drag, in screen coordinates for the pointer.
    DraggingNode {
        node: NodeId,
        pointer_start: Point,
        node_start: Position,
    },
    /// Dragging a guide curve from an output handle; `pointer` is in canvas space.
    Connecting { source: NodeId, pointer: Point },
}

impl GestureState {
    pub fn is_idle(&self) -> bool {
        matches!(self, GestureState::Idle)
    }

    pub fn name(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Panning { .. } => "panning",
            GestureState::DraggingNode { .. } => "dragging",
            GestureState::Connecting { .. } => "connecting",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctrl() -> Modifiers {
        Modifiers {
            ctrl: true,
            ..Modifiers::default()
        }
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(Shortcut::resolve(Key::Z, ctrl(), false), Some(Shortcut::Undo));
        assert_eq!(
            Shortcut::resolve(
                Key::Z,
                Modifiers {
                    command: true,
                    shift: true,
                    ..Modifiers::default()
                },
                false
            ),
            Some(Shortcut::Redo)
        );
        assert_eq!(Shortcut::resolve(Key::Y, ctrl(), false), Some(Shortcut::Redo));
        assert_eq!(Shortcut::resolve(Key::Z, Modifiers::default(), false), None);
    }

    #[test]
    fn test_delete_ignored_while_typing() {
        assert_eq!(
            Shortcut::resolve(Key::Delete, Modifiers::default(), false),
            Some(Shortcut::DeleteSelection)
        );
        assert_eq!(Shortcut::resolve(Key::Backspace, Modifiers::default(), true), None);
    }
}
