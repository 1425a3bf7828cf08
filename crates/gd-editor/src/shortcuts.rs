//! Keyboard shortcut mapping.
//!
//! Maps key + modifier combos to semantic `ShortcutAction`s so the browser
//! host and native hosts share one table. Arrow keys nudge the selection;
//! ⌘ on macOS and Ctrl elsewhere play the same role.

/// Direction of an arrow-key nudge, in zone space (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit step `(dx, dy)`.
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Actions that keyboard shortcuts can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShortcutAction {
    // ── Move ──
    Nudge(Direction),
    /// Shift+arrow: ten steps.
    NudgeFar(Direction),

    // ── Edit ──
    Undo,
    Redo,
    Delete,
    Clone,
    MirrorClone,
    FlipHorizontal,
    FlipVertical,
    Save,

    // ── Z-order ──
    BringToFront,
    SendToBack,

    // ── UI ──
    Deselect,
}

/// What currently has keyboard focus in the host page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    /// Page body or the zone.
    #[default]
    Canvas,
    /// A range slider. Arrow keys still belong to the canvas.
    Slider,
    /// A text or number field: keys are left to the field.
    TextInput,
}

/// Resolves key events into shortcut actions.
pub struct ShortcutMap;

impl ShortcutMap {
    /// Resolve a key event to an action.
    ///
    /// `key` is the `KeyboardEvent.key` value (e.g. `"z"`, `"ArrowUp"`).
    /// Returns `None` if the key combo has no binding.
    pub fn resolve(
        key: &str,
        ctrl: bool,
        shift: bool,
        _alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        let cmd = ctrl || meta;

        // ── Modifier combos first (most specific) ──
        if cmd && shift {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Redo),
                _ => None,
            };
        }

        if cmd {
            return match key {
                "z" | "Z" => Some(ShortcutAction::Undo),
                "y" | "Y" => Some(ShortcutAction::Redo),
                "d" | "D" => Some(ShortcutAction::Clone),
                "m" | "M" => Some(ShortcutAction::MirrorClone),
                "s" | "S" => Some(ShortcutAction::Save),
                "]" => Some(ShortcutAction::BringToFront),
                "[" => Some(ShortcutAction::SendToBack),
                _ => None,
            };
        }

        if let Some(direction) = arrow(key) {
            return Some(if shift {
                ShortcutAction::NudgeFar(direction)
            } else {
                ShortcutAction::Nudge(direction)
            });
        }

        if shift {
            return match key {
                "H" => Some(ShortcutAction::FlipHorizontal),
                "V" => Some(ShortcutAction::FlipVertical),
                _ => None,
            };
        }

        // ── Single keys (no modifiers) ──
        match key {
            "Delete" | "Backspace" => Some(ShortcutAction::Delete),
            "Escape" => Some(ShortcutAction::Deselect),
            _ => None,
        }
    }

    /// `resolve`, but nothing fires while a text field has focus.
    pub fn resolve_focused(
        focus: Focus,
        key: &str,
        ctrl: bool,
        shift: bool,
        alt: bool,
        meta: bool,
    ) -> Option<ShortcutAction> {
        match focus {
            Focus::TextInput => None,
            Focus::Canvas | Focus::Slider => Self::resolve(key, ctrl, shift, alt, meta),
        }
    }
}

fn arrow(key: &str) -> Option<Direction> {
    match key {
        "ArrowUp" => Some(Direction::Up),
        "ArrowDown" => Some(Direction::Down),
        "ArrowLeft" => Some(Direction::Left),
        "ArrowRight" => Some(Direction::Right),
        _ => None,
    }
}
