use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;

/// Pointer (mouse or touch) input from the host, in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down(Vec2),
    Move(Vec2),
    Up(Vec2),
    /// The pointer left the play surface without a release.
    Leave,
}

impl PointerEvent {
    /// Position carried by the event, if any.
    pub fn position(&self) -> Option<Vec2> {
        match *self {
            PointerEvent::Down(p) | PointerEvent::Move(p) | PointerEvent::Up(p) => Some(p),
            PointerEvent::Leave => None,
        }
    }
}
