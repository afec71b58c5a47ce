//! Insertion-point resolution from a tree snapshot and a pointer position.
//!
//! Pure functions, safe to call on every pointer-move tick.

use gantry_core::math::Vec2;
use gantry_core::tree::{ElementId, ElementTree};

use crate::options::Direction;

/// Resolve which child of `container` the moving item should be inserted
/// before, or `None` for end-of-list.
///
/// Scans children in document order, skipping the ids in `skip` (the
/// dragged item and the mirror must not be used to compute their own
/// slot). Along the configured axis, the first child whose midpoint lies
/// at or beyond the pointer wins.
pub fn insertion_point(
    tree: &ElementTree,
    container: ElementId,
    point: Vec2,
    direction: Direction,
    skip: &[ElementId],
) -> Option<ElementId> {
    for &child in tree.children(container) {
        if skip.contains(&child) {
            continue;
        }
        let rect = tree.rect(child);
        let (midpoint, coord) = if direction.is_horizontal() {
            (rect.x + rect.width / 2.0, point.x)
        } else {
            (rect.y + rect.height / 2.0, point.y)
        };
        if midpoint >= coord {
            return Some(child);
        }
    }
    None
}

/// Fast path used when the pointer is already over a direct child of the
/// container: before the child's midpoint resolves to the child itself,
/// past it to the child's next sibling.
pub fn reference_from_hit(
    tree: &ElementTree,
    child: ElementId,
    point: Vec2,
    direction: Direction,
) -> Option<ElementId> {
    let rect = tree.rect(child);
    let past_midpoint = if direction.is_horizontal() {
        point.x > rect.x + rect.width / 2.0
    } else {
        point.y > rect.y + rect.height / 2.0
    };
    if past_midpoint {
        tree.next_sibling(child)
    } else {
        Some(child)
    }
}

/// Walk up from `descendant` to the child of `container` on its ancestor
/// path. `None` when `descendant` is not inside `container`.
pub fn immediate_child(
    tree: &ElementTree,
    container: ElementId,
    descendant: ElementId,
) -> Option<ElementId> {
    let mut current = descendant;
    while current != container {
        match tree.parent_of(current) {
            Some(parent) if parent == container => return Some(current),
            Some(parent) => current = parent,
            None => return None,
        }
    }
    None
}
