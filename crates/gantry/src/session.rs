//! State of the single in-flight drag.

use gantry_core::math::Vec2;
use gantry_core::tree::ElementId;

/// Everything the engine remembers about the current interaction, from
/// the qualifying press until a terminal transition clears it.
///
/// `dragging == false` is the armed state: a press happened on a
/// draggable item but movement has not yet confirmed a drag.
#[derive(Debug, Clone)]
pub(crate) struct DragSession {
    /// The original item that was grabbed. Never a clone.
    pub item: ElementId,
    /// The clone standing in for the item when copying.
    pub copy: Option<ElementId>,
    /// Container the item was grabbed from.
    pub source: ElementId,
    /// The item's next sibling at grab time, for revert and for
    /// initial-placement detection.
    pub source_sibling: Option<ElementId>,
    /// The reference sibling of the last committed preview position.
    pub current_sibling: Option<ElementId>,
    /// Pointer position at the qualifying press.
    pub grab_origin: Vec2,
    /// Whether movement has confirmed the drag (armed vs dragging).
    pub dragging: bool,
    /// Container the pointer was last over, for enter/leave events.
    pub last_drop_target: Option<ElementId>,
}

impl DragSession {
    pub fn new(
        item: ElementId,
        source: ElementId,
        source_sibling: Option<ElementId>,
        grab_origin: Vec2,
    ) -> Self {
        Self {
            item,
            copy: None,
            source,
            source_sibling,
            current_sibling: source_sibling,
            grab_origin,
            dragging: false,
            last_drop_target: None,
        }
    }

    /// The element actually being moved: the copy when one exists,
    /// otherwise the original.
    pub fn moving(&self) -> ElementId {
        self.copy.unwrap_or(self.item)
    }

    /// Whether the moving object is a clone rather than the original.
    pub fn is_copy(&self) -> bool {
        self.copy.is_some()
    }
}
