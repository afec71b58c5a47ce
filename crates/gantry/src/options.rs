//! Engine configuration: predicates, flags, and defaults.
//!
//! Every decision point is a *predicate*, never a plain flag: defaults are
//! callable even when the caller's intent reads as boolean. Named constant
//! predicates (`always_*` / `never_*`) are provided for defaults and tests.

use std::fmt;
use std::sync::Arc;

use gantry_core::tree::{ElementId, ElementTree};

/// Axis along which container children are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// Children stack top to bottom.
    #[default]
    Vertical,
    /// Children flow left to right.
    Horizontal,
}

impl Direction {
    /// Check if this is the horizontal axis.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::Horizontal)
    }
}

/// May `item` leave `source`? Receives the item's next sibling.
pub type MovesPredicate =
    Arc<dyn Fn(&ElementTree, ElementId, ElementId, Option<ElementId>) -> bool>;

/// May `item` (dragged out of `source`) land in `target` before
/// `reference`?
pub type AcceptsPredicate =
    Arc<dyn Fn(&ElementTree, ElementId, ElementId, ElementId, Option<ElementId>) -> bool>;

/// Is `item` off-limits? The second element is the press handle while
/// arming and the prospective target container while dropping.
pub type InvalidPredicate = Arc<dyn Fn(&ElementTree, ElementId, ElementId) -> bool>;

/// Is the element a drop container, beyond the engine's explicit list?
pub type ContainerPredicate = Arc<dyn Fn(&ElementTree, ElementId) -> bool>;

/// Should dragging `item` out of `source` duplicate it instead of moving
/// it?
pub type CopyPredicate = Arc<dyn Fn(&ElementTree, ElementId, ElementId) -> bool>;

/// Configuration bundle for a [`DragEngine`](crate::DragEngine).
///
/// Immutable after construction; validated fail-fast by
/// [`DragEngine::new`](crate::DragEngine::new).
#[derive(Clone)]
pub struct Options {
    /// Gates drag initiation. Default: always.
    pub moves: MovesPredicate,
    /// Gates landing in a container. Default: always.
    pub accepts: AcceptsPredicate,
    /// Marks elements that must never take part in a drag. Default: never.
    pub invalid: InvalidPredicate,
    /// Extends container membership beyond the explicit list. Default:
    /// never (the engine's `containers` list is the primary gate).
    pub is_container: ContainerPredicate,
    /// Switches a drag into copy mode. Default: never.
    pub copy: CopyPredicate,
    /// When copying, whether the source container may still be reordered
    /// by the drag.
    pub copy_sort_source: bool,
    /// Spilled items return to their source position.
    pub revert_on_spill: bool,
    /// Spilled items are removed from the tree.
    pub remove_on_spill: bool,
    /// Presses on text-input elements are left alone so they keep text
    /// selection. Default: true.
    pub ignore_input_text_selection: bool,
    /// Axis used to resolve insertion points.
    pub direction: Direction,
    /// Host of the floating mirror. `None` means the tree root.
    pub mirror_container: Option<ElementId>,
    /// Distance a press must travel before it becomes a drag.
    pub drag_threshold: f32,
}

impl Options {
    /// `moves` predicate that lets everything move.
    pub fn always_moves() -> MovesPredicate {
        Arc::new(|_, _, _, _| true)
    }

    /// `moves` predicate that pins everything in place.
    pub fn never_moves() -> MovesPredicate {
        Arc::new(|_, _, _, _| false)
    }

    /// `accepts` predicate that lets everything land.
    pub fn always_accepts() -> AcceptsPredicate {
        Arc::new(|_, _, _, _, _| true)
    }

    /// `accepts` predicate that rejects every landing.
    pub fn never_accepts() -> AcceptsPredicate {
        Arc::new(|_, _, _, _, _| false)
    }

    /// `invalid` predicate that blacklists everything.
    pub fn always_invalid() -> InvalidPredicate {
        Arc::new(|_, _, _| true)
    }

    /// `invalid` predicate that blacklists nothing.
    pub fn never_invalid() -> InvalidPredicate {
        Arc::new(|_, _, _| false)
    }

    /// `is_container` predicate that treats every element as a container.
    pub fn always_container() -> ContainerPredicate {
        Arc::new(|_, _| true)
    }

    /// `is_container` predicate that defers entirely to the explicit list.
    pub fn never_container() -> ContainerPredicate {
        Arc::new(|_, _| false)
    }

    /// `copy` predicate that duplicates every drag.
    pub fn always_copy() -> CopyPredicate {
        Arc::new(|_, _, _| true)
    }

    /// `copy` predicate that never duplicates.
    pub fn never_copy() -> CopyPredicate {
        Arc::new(|_, _, _| false)
    }

    /// Validate construction-time constraints.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            return Err(OptionsError::InvalidDragThreshold(self.drag_threshold));
        }
        Ok(())
    }
}

impl Default for Options {
    fn default() -> Self {
        Self {
            moves: Self::always_moves(),
            accepts: Self::always_accepts(),
            invalid: Self::never_invalid(),
            is_container: Self::never_container(),
            copy: Self::never_copy(),
            copy_sort_source: false,
            revert_on_spill: false,
            remove_on_spill: false,
            ignore_input_text_selection: true,
            direction: Direction::Vertical,
            mirror_container: None,
            drag_threshold: 0.0,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("copy_sort_source", &self.copy_sort_source)
            .field("revert_on_spill", &self.revert_on_spill)
            .field("remove_on_spill", &self.remove_on_spill)
            .field(
                "ignore_input_text_selection",
                &self.ignore_input_text_selection,
            )
            .field("direction", &self.direction)
            .field("mirror_container", &self.mirror_container)
            .field("drag_threshold", &self.drag_threshold)
            .finish_non_exhaustive()
    }
}

/// Configuration errors, surfaced synchronously at engine construction.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionsError {
    /// The drag threshold is negative, NaN, or infinite.
    InvalidDragThreshold(f32),
}

impl fmt::Display for OptionsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionsError::InvalidDragThreshold(value) => {
                write!(f, "drag threshold must be finite and non-negative, got {value}")
            }
        }
    }
}

impl std::error::Error for OptionsError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_callable_predicates() {
        let options = Options::default();
        let tree = ElementTree::new();
        let el = tree.root();

        assert!((options.moves)(&tree, el, el, None));
        assert!((options.accepts)(&tree, el, el, el, None));
        assert!(!(options.invalid)(&tree, el, el));
        assert!(!(options.is_container)(&tree, el));
        assert!(!(options.copy)(&tree, el, el));
    }

    #[test]
    fn test_default_flags() {
        let options = Options::default();
        assert!(!options.copy_sort_source);
        assert!(!options.revert_on_spill);
        assert!(!options.remove_on_spill);
        assert!(options.ignore_input_text_selection);
        assert_eq!(options.direction, Direction::Vertical);
        assert_eq!(options.mirror_container, None);
        assert_eq!(options.drag_threshold, 0.0);
    }

    #[test]
    fn test_validate_rejects_bad_threshold() {
        let mut options = Options::default();
        options.drag_threshold = f32::NAN;
        assert!(options.validate().is_err());
        options.drag_threshold = -1.0;
        assert!(matches!(
            options.validate(),
            Err(OptionsError::InvalidDragThreshold(_))
        ));
        options.drag_threshold = 4.0;
        assert!(options.validate().is_ok());
    }
}
