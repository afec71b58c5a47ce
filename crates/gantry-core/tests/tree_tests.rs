//! Tree behavior under drag-shaped mutation sequences.

use gantry_core::math::Vec2;
use gantry_core::tree::{ElementFlags, ElementId, ElementTree, Rect};

fn list(tree: &mut ElementTree, count: usize) -> (ElementId, Vec<ElementId>) {
    let root = tree.root();
    let container = tree.create_element_with(
        Rect::new(0.0, 0.0, 100.0, 20.0 * count as f32),
        ElementFlags::empty(),
    );
    tree.append_child(root, container);
    let items = (0..count)
        .map(|i| {
            let item = tree.create_element_with(
                Rect::new(0.0, 20.0 * i as f32, 100.0, 20.0),
                ElementFlags::empty(),
            );
            tree.append_child(container, item);
            item
        })
        .collect();
    (container, items)
}

#[test]
fn test_reorder_round_trip_restores_document_order() {
    let mut tree = ElementTree::new();
    let (container, items) = list(&mut tree, 3);

    // Shuffle the first item through every slot and back.
    tree.insert_before(container, items[0], Some(items[2]));
    assert_eq!(tree.children(container), &[items[1], items[0], items[2]]);
    tree.insert_before(container, items[0], None);
    assert_eq!(tree.children(container), &[items[1], items[2], items[0]]);
    tree.insert_before(container, items[0], Some(items[1]));
    assert_eq!(tree.children(container), &[items[0], items[1], items[2]]);
    assert_eq!(tree.next_sibling(items[0]), Some(items[1]));
}

#[test]
fn test_detached_element_can_be_reinserted_anywhere() {
    let mut tree = ElementTree::new();
    let (container, items) = list(&mut tree, 2);
    let root = tree.root();
    let other =
        tree.create_element_with(Rect::new(200.0, 0.0, 100.0, 40.0), ElementFlags::empty());
    tree.append_child(root, other);

    tree.detach(items[0]);
    assert!(tree.exists(items[0]));
    assert_eq!(tree.parent_of(items[0]), None);

    tree.insert_before(other, items[0], None);
    assert_eq!(tree.parent_of(items[0]), Some(other));
    assert_eq!(tree.children(container), &[items[1]]);
}

#[test]
fn test_clone_then_remove_leaves_original_untouched() {
    let mut tree = ElementTree::new();
    let (container, items) = list(&mut tree, 2);
    tree.add_class(items[0], "card");

    let clone = tree.clone_subtree(items[0]);
    let root = tree.root();
    tree.append_child(root, clone);
    assert!(tree.subtree_eq(clone, items[0]));

    tree.remove_subtree(clone);
    assert!(!tree.exists(clone));
    assert!(tree.exists(items[0]));
    assert_eq!(tree.parent_of(items[0]), Some(container));
    assert!(tree.has_class(items[0], "card"));
}

#[test]
fn test_hit_test_sees_through_a_skipped_overlay() {
    let mut tree = ElementTree::new();
    let root = tree.root();
    tree.set_rect(root, Rect::new(0.0, 0.0, 500.0, 500.0));
    let (_, items) = list(&mut tree, 2);

    // An overlay floating above the list, like a drag mirror.
    let overlay = tree.clone_subtree(items[0]);
    tree.append_child(root, overlay);
    tree.translate_subtree(overlay, Vec2::new(3.0, 28.0));

    let point = Vec2::new(50.0, 30.0);
    assert_eq!(tree.hit_test(point, None), Some(overlay));
    assert_eq!(tree.hit_test(point, Some(overlay)), Some(items[1]));
}
