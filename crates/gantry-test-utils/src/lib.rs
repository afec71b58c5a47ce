//! Shared helpers for exercising the drag engine in tests: an event
//! recorder and element-tree builders for common list layouts.

use std::cell::RefCell;
use std::rc::Rc;

use gantry::{DragEngine, DragEvent, EventKind};
use gantry_core::math::Vec2;
use gantry_core::tree::{ElementFlags, ElementId, ElementTree, Rect};

/// Records every event an engine emits, in emission order.
#[derive(Clone, Default)]
pub struct EventRecorder {
    events: Rc<RefCell<Vec<DragEvent>>>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe this recorder to every event kind on `engine`.
    pub fn attach(&self, engine: &mut DragEngine) {
        for kind in EventKind::ALL {
            let events = Rc::clone(&self.events);
            engine.on(kind, move |event| events.borrow_mut().push(*event));
        }
    }

    /// Everything recorded so far.
    pub fn events(&self) -> Vec<DragEvent> {
        self.events.borrow().clone()
    }

    /// The kinds recorded so far, in order.
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(|e| e.kind()).collect()
    }

    /// Events of one kind only.
    pub fn of_kind(&self, kind: EventKind) -> Vec<DragEvent> {
        self.events
            .borrow()
            .iter()
            .filter(|e| e.kind() == kind)
            .copied()
            .collect()
    }

    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }
}

/// A fresh tree with a root large enough to hit-test against.
pub fn tree_with_root() -> ElementTree {
    let mut tree = ElementTree::new();
    let root = tree.root();
    tree.set_rect(root, Rect::new(0.0, 0.0, 1000.0, 1000.0));
    tree
}

/// Append a vertical list container at `origin` with `count` stacked
/// items, each 100x20.
pub fn vertical_list(
    tree: &mut ElementTree,
    origin: Vec2,
    count: usize,
) -> (ElementId, Vec<ElementId>) {
    let container = tree.create_element_with(
        Rect::new(origin.x, origin.y, 100.0, 20.0 * count.max(1) as f32),
        ElementFlags::empty(),
    );
    let root = tree.root();
    tree.append_child(root, container);
    let items = (0..count)
        .map(|i| {
            let item = tree.create_element_with(
                Rect::new(origin.x, origin.y + 20.0 * i as f32, 100.0, 20.0),
                ElementFlags::empty(),
            );
            tree.append_child(container, item);
            item
        })
        .collect();
    (container, items)
}

/// Append a horizontal list container at `origin` with `count` items in
/// a row, each 40x100.
pub fn horizontal_list(
    tree: &mut ElementTree,
    origin: Vec2,
    count: usize,
) -> (ElementId, Vec<ElementId>) {
    let container = tree.create_element_with(
        Rect::new(origin.x, origin.y, 40.0 * count.max(1) as f32, 100.0),
        ElementFlags::empty(),
    );
    let root = tree.root();
    tree.append_child(root, container);
    let items = (0..count)
        .map(|i| {
            let item = tree.create_element_with(
                Rect::new(origin.x + 40.0 * i as f32, origin.y, 40.0, 100.0),
                ElementFlags::empty(),
            );
            tree.append_child(container, item);
            item
        })
        .collect();
    (container, items)
}

/// Center point of an element, handy as a pointer position.
pub fn center(tree: &ElementTree, el: ElementId) -> Vec2 {
    tree.rect(el).center()
}
