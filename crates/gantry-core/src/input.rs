//! Pointer input types consumed by the drag engine.
//!
//! Hosts are responsible for normalizing platform events (mouse, touch,
//! pen) into this single-pointer stream before feeding it to the engine.

use crate::math::Vec2;

/// Pointer button identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// The primary button (usually left). Only presses with this button
    /// may begin a drag.
    Primary,
    /// The secondary button (usually right).
    Secondary,
    /// The middle button.
    Middle,
}

/// A normalized single-pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    /// The pointer was pressed.
    Down { pos: Vec2, button: PointerButton },
    /// The pointer moved.
    Move { pos: Vec2 },
    /// The pointer was released.
    Up { pos: Vec2 },
}

impl PointerEvent {
    /// A primary-button press at `pos`.
    pub fn down(pos: Vec2) -> Self {
        Self::Down {
            pos,
            button: PointerButton::Primary,
        }
    }

    /// A pointer move to `pos`.
    pub fn moved(pos: Vec2) -> Self {
        Self::Move { pos }
    }

    /// A release at `pos`.
    pub fn up(pos: Vec2) -> Self {
        Self::Up { pos }
    }

    /// The position carried by the event.
    pub fn pos(&self) -> Vec2 {
        match self {
            Self::Down { pos, .. } | Self::Move { pos } | Self::Up { pos } => *pos,
        }
    }
}
