//! Normalized input events consumed by the dispatcher.
//!
//! The core performs no raw event capture; whatever shell hosts the editor
//! translates its native events into these types.

use crate::geometry::Point;
use serde::{Deserialize, Serialize};

/// Modifier key state carried by every event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub meta: bool,
    pub alt: bool,
    pub shift: bool,
}

impl Modifiers {
    /// Shift held, nothing else implied.
    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::default()
        }
    }
}

/// Pointer button state as a bitmask: bit 0 is the primary button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Buttons(pub u8);

impl Buttons {
    pub const NONE: Buttons = Buttons(0);
    pub const PRIMARY: Buttons = Buttons(1);

    /// Whether the primary button is held.
    pub fn primary(self) -> bool {
        self.0 & 1 != 0
    }
}

/// A normalized input event.
///
/// Key names follow the DOM convention the editor's bindings use:
/// `"Enter"`, `"Escape"`, `"Delete"`, or a single character for hotkeys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputEvent {
    PointerMove {
        pos: Point,
        buttons: Buttons,
        modifiers: Modifiers,
    },
    PointerDown {
        pos: Point,
        modifiers: Modifiers,
    },
    PointerUp {
        pos: Point,
        modifiers: Modifiers,
    },
    KeyDown {
        key: String,
        modifiers: Modifiers,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buttons_primary() {
        assert!(Buttons::PRIMARY.primary());
        assert!(Buttons(3).primary());
        assert!(!Buttons::NONE.primary());
        assert!(!Buttons(2).primary());
    }

    #[test]
    fn test_modifiers_shift() {
        let m = Modifiers::shift();
        assert!(m.shift);
        assert!(!m.meta && !m.alt);
    }
}
