//! Container policy: the pure predicate checks gating drag start,
//! continuation, and landing.

use gantry_core::tree::{ElementId, ElementTree};

use crate::options::Options;

/// Grab context resolved from a press: the draggable item and the managed
/// container it currently lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GrabContext {
    pub item: ElementId,
    pub source: ElementId,
}

/// Whether `el` is under the engine's management, either through the
/// explicit container list or the `is_container` predicate.
pub fn is_managed_container(
    tree: &ElementTree,
    el: ElementId,
    containers: &[ElementId],
    options: &Options,
) -> bool {
    containers.contains(&el) || (options.is_container)(tree, el)
}

/// Resolve the grab context for a press on `handle`.
///
/// Walks ancestors until the parent is a managed container; the element
/// reached is the drag candidate. The `invalid` predicate can veto the
/// walk at any level, and `moves` has the final say.
pub fn grab_context(
    tree: &ElementTree,
    handle: ElementId,
    containers: &[ElementId],
    options: &Options,
) -> Option<GrabContext> {
    let mut item = handle;
    loop {
        let parent = tree.parent_of(item)?;
        if is_managed_container(tree, parent, containers, options) {
            break;
        }
        if (options.invalid)(tree, item, handle) {
            return None;
        }
        item = parent;
    }

    let source = tree.parent_of(item)?;
    if (options.invalid)(tree, item, handle) {
        return None;
    }
    let sibling = tree.next_sibling(item);
    if !(options.moves)(tree, item, source, sibling) {
        return None;
    }
    Some(GrabContext { item, source })
}

/// Whether `item`, dragged out of `source`, may land in `target` before
/// `reference`. Dropping an element into itself or its own subtree is
/// rejected structurally before any predicate runs.
pub fn can_accept(
    tree: &ElementTree,
    item: ElementId,
    target: ElementId,
    source: ElementId,
    reference: Option<ElementId>,
    containers: &[ElementId],
    options: &Options,
) -> bool {
    if target == item || tree.contains(item, target) {
        return false;
    }
    is_managed_container(tree, target, containers, options)
        && (options.accepts)(tree, item, target, source, reference)
        && !(options.invalid)(tree, item, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Options;
    use gantry_core::tree::Rect;
    use std::sync::Arc;

    fn setup() -> (ElementTree, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let container =
            tree.create_element_with(Rect::new(0.0, 0.0, 100.0, 100.0), Default::default());
        tree.append_child(root, container);
        let item = tree.create_element_with(Rect::new(0.0, 0.0, 100.0, 20.0), Default::default());
        tree.append_child(container, item);
        (tree, container, item)
    }

    #[test]
    fn test_grab_context_walks_up_to_the_container_child() {
        let (mut tree, container, item) = setup();
        let handle = tree.create_element_with(Rect::new(0.0, 0.0, 20.0, 20.0), Default::default());
        tree.append_child(item, handle);

        let options = Options::default();
        let context = grab_context(&tree, handle, &[container], &options).unwrap();
        assert_eq!(context, GrabContext { item, source: container });
    }

    #[test]
    fn test_grab_context_respects_moves_and_invalid() {
        let (tree, container, item) = setup();

        let mut options = Options::default();
        options.moves = Options::never_moves();
        assert!(grab_context(&tree, item, &[container], &options).is_none());

        let mut options = Options::default();
        options.invalid = Options::always_invalid();
        assert!(grab_context(&tree, item, &[container], &options).is_none());
    }

    #[test]
    fn test_grab_context_fails_outside_managed_containers() {
        let (tree, _, item) = setup();
        let options = Options::default();
        // No explicit containers and is_container defaults to never.
        assert!(grab_context(&tree, item, &[], &options).is_none());
    }

    #[test]
    fn test_can_accept_rejects_own_subtree() {
        let (mut tree, container, item) = setup();
        let nested = tree.create_element_with(Rect::new(0.0, 0.0, 10.0, 10.0), Default::default());
        tree.append_child(item, nested);

        let options = Options::default();
        assert!(!can_accept(
            &tree,
            item,
            item,
            container,
            None,
            &[item],
            &options
        ));
        assert!(!can_accept(
            &tree,
            item,
            nested,
            container,
            None,
            &[nested],
            &options
        ));
    }

    #[test]
    fn test_can_accept_consults_predicates() {
        let (mut tree, container, item) = setup();
        let other =
            tree.create_element_with(Rect::new(0.0, 200.0, 100.0, 100.0), Default::default());
        let root = tree.root();
        tree.append_child(root, other);

        let options = Options::default();
        assert!(can_accept(
            &tree,
            item,
            other,
            container,
            None,
            &[container, other],
            &options
        ));

        let mut options = Options::default();
        options.accepts = Options::never_accepts();
        assert!(!can_accept(
            &tree,
            item,
            other,
            container,
            None,
            &[container, other],
            &options
        ));

        // The predicate can extend membership beyond the explicit list.
        let mut options = Options::default();
        options.is_container = Arc::new(move |_, el| el == other);
        assert!(can_accept(
            &tree,
            item,
            other,
            container,
            None,
            &[container],
            &options
        ));
    }
}
