//! Retained element tree used as the live position model.
//!
//! The tree is the single source of truth for element order: reordering an
//! element during a drag *is* the state change, there is no separate
//! position table. Every relocation goes through [`ElementTree::insert_before`],
//! which detaches and reinserts in one step so observers never see an
//! element with two parents or none at all mid-move.
//!
//! Layout is an external collaborator: each element carries a screen-space
//! [`Rect`] that the host keeps up to date. The tree never computes sizes.

use crate::math::Vec2;
use bitflags::bitflags;
use indexmap::IndexMap;

/// Element identifier in the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementId(pub usize);

/// Screen-space bounds of an element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

bitflags! {
    /// Structural traits of an element that gate pointer handling.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ElementFlags: u8 {
        /// The element is an interactive text input. Presses on it do not
        /// arm a drag unless the engine is configured to hijack them.
        const TEXT_INPUT = 1 << 0;
        /// The element hosts editable content (treated like a text input).
        const EDITABLE = 1 << 1;
    }
}

impl ElementFlags {
    /// Whether a press on this element would interfere with text editing.
    pub fn is_text_selection(&self) -> bool {
        self.intersects(Self::TEXT_INPUT | Self::EDITABLE)
    }
}

/// A node in the element tree.
#[derive(Debug, Clone)]
pub struct Element {
    pub(crate) parent: Option<ElementId>,
    pub(crate) children: Vec<ElementId>,
    /// Screen-space bounds, supplied by the host.
    pub rect: Rect,
    /// Structural flags.
    pub flags: ElementFlags,
    /// Marker classes (e.g. `gu-mirror`, `gu-transit`), ordered.
    classes: Vec<String>,
}

impl Element {
    fn detached(rect: Rect, flags: ElementFlags) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            rect,
            flags,
            classes: Vec::new(),
        }
    }

    /// The element's parent, if attached.
    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    /// The element's children in document order.
    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    /// Marker classes in insertion order.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Whether the element carries a marker class.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Element tree managing hierarchy and screen-space bounds.
///
/// A root element (the "body" analogue) always exists; detached elements
/// live in the arena without a parent until inserted somewhere.
pub struct ElementTree {
    elements: IndexMap<ElementId, Element>,
    root: ElementId,
    next_id: usize,
}

impl ElementTree {
    /// Create a tree with an empty root element.
    pub fn new() -> Self {
        let mut elements = IndexMap::new();
        let root = ElementId(0);
        elements.insert(root, Element::detached(Rect::default(), ElementFlags::empty()));
        Self {
            elements,
            root,
            next_id: 1,
        }
    }

    /// The always-present root element.
    pub fn root(&self) -> ElementId {
        self.root
    }

    /// Number of live elements, root included.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether `el` is still present in the arena.
    pub fn exists(&self, el: ElementId) -> bool {
        self.elements.contains_key(&el)
    }

    /// Create a detached element with zero bounds.
    pub fn create_element(&mut self) -> ElementId {
        self.create_element_with(Rect::default(), ElementFlags::empty())
    }

    /// Create a detached element with the given bounds and flags.
    pub fn create_element_with(&mut self, rect: Rect, flags: ElementFlags) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        self.elements.insert(id, Element::detached(rect, flags));
        id
    }

    /// Get an element by id.
    pub fn get(&self, el: ElementId) -> Option<&Element> {
        self.elements.get(&el)
    }

    /// Get a mutable element by id.
    pub fn get_mut(&mut self, el: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&el)
    }

    /// The element's parent, if any.
    pub fn parent_of(&self, el: ElementId) -> Option<ElementId> {
        self.elements.get(&el).and_then(|e| e.parent)
    }

    /// Children of `el` in document order. Empty for unknown ids.
    pub fn children(&self, el: ElementId) -> &[ElementId] {
        self.elements.get(&el).map(|e| e.children()).unwrap_or(&[])
    }

    /// The sibling immediately after `el`, if any.
    pub fn next_sibling(&self, el: ElementId) -> Option<ElementId> {
        let parent = self.parent_of(el)?;
        let siblings = self.children(parent);
        let index = siblings.iter().position(|&c| c == el)?;
        siblings.get(index + 1).copied()
    }

    /// Whether `el` is `ancestor` or one of its descendants.
    pub fn contains(&self, ancestor: ElementId, el: ElementId) -> bool {
        let mut current = Some(el);
        while let Some(c) = current {
            if c == ancestor {
                return true;
            }
            current = self.parent_of(c);
        }
        false
    }

    /// Screen-space bounds of `el`, or a zero rect for unknown ids.
    pub fn rect(&self, el: ElementId) -> Rect {
        self.elements.get(&el).map(|e| e.rect).unwrap_or_default()
    }

    /// Set the bounds of `el`.
    pub fn set_rect(&mut self, el: ElementId, rect: Rect) {
        if let Some(e) = self.elements.get_mut(&el) {
            e.rect = rect;
        }
    }

    /// Shift `el` and its whole subtree by `delta`.
    pub fn translate_subtree(&mut self, el: ElementId, delta: Vec2) {
        let mut stack = vec![el];
        while let Some(id) = stack.pop() {
            if let Some(e) = self.elements.get_mut(&id) {
                e.rect.x += delta.x;
                e.rect.y += delta.y;
                stack.extend(e.children.iter().copied());
            }
        }
    }

    /// Add a marker class to `el` (no duplicates).
    pub fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(&el) {
            if !e.has_class(class) {
                e.classes.push(class.to_owned());
            }
        }
    }

    /// Remove a marker class from `el`.
    pub fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.elements.get_mut(&el) {
            e.classes.retain(|c| c != class);
        }
    }

    /// Whether `el` carries a marker class.
    pub fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.elements.get(&el).is_some_and(|e| e.has_class(class))
    }

    /// Append `child` as the last child of `parent`.
    pub fn append_child(&mut self, parent: ElementId, child: ElementId) {
        self.insert_before(parent, child, None);
    }

    /// Insert `child` into `parent` before `reference`, detaching it from
    /// its current position first. `None` means insert at the end; an
    /// invalid reference degrades to an append.
    ///
    /// This is the atomic unit of reordering: observers never see the
    /// child half-moved.
    pub fn insert_before(
        &mut self,
        parent: ElementId,
        child: ElementId,
        reference: Option<ElementId>,
    ) {
        if child == parent || !self.exists(parent) || !self.exists(child) {
            return;
        }
        // An element cannot host one of its own ancestors.
        if self.contains(child, parent) {
            return;
        }
        self.detach(child);

        let index = match reference.filter(|&r| r != child) {
            Some(r) => {
                let siblings = self.children(parent);
                siblings
                    .iter()
                    .position(|&c| c == r)
                    .unwrap_or(siblings.len())
            }
            None => self.children(parent).len(),
        };
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.insert(index, child);
        }
        if let Some(c) = self.elements.get_mut(&child) {
            c.parent = Some(parent);
        }
    }

    /// Detach `el` from its parent. The element stays in the arena so ids
    /// held by listeners remain valid.
    pub fn detach(&mut self, el: ElementId) {
        let Some(parent) = self.parent_of(el) else {
            return;
        };
        if let Some(p) = self.elements.get_mut(&parent) {
            p.children.retain(|&c| c != el);
        }
        if let Some(e) = self.elements.get_mut(&el) {
            e.parent = None;
        }
    }

    /// Detach `el` and drop it and all descendants from the arena.
    ///
    /// The root cannot be removed.
    pub fn remove_subtree(&mut self, el: ElementId) {
        if el == self.root {
            return;
        }
        tracing::trace!(?el, "removing subtree");
        self.detach(el);
        let mut stack = vec![el];
        while let Some(id) = stack.pop() {
            if let Some(e) = self.elements.swap_remove(&id) {
                stack.extend(e.children);
            }
        }
    }

    /// Deep-clone `el`'s subtree (bounds, flags, classes). The clone is
    /// detached and gets fresh ids throughout.
    pub fn clone_subtree(&mut self, el: ElementId) -> ElementId {
        let (rect, flags, classes, children) = match self.elements.get(&el) {
            Some(e) => (e.rect, e.flags, e.classes.clone(), e.children.clone()),
            None => return self.create_element(),
        };
        let clone = self.create_element_with(rect, flags);
        if let Some(c) = self.elements.get_mut(&clone) {
            c.classes = classes;
        }
        for child in children {
            let child_clone = self.clone_subtree(child);
            self.append_child(clone, child_clone);
        }
        clone
    }

    /// Structural equality of two subtrees: flags, classes, sizes, and
    /// child shapes match. Positions are ignored so a repositioned clone
    /// still compares equal to its original.
    pub fn subtree_eq(&self, a: ElementId, b: ElementId) -> bool {
        let (Some(ea), Some(eb)) = (self.elements.get(&a), self.elements.get(&b)) else {
            return false;
        };
        if ea.flags != eb.flags
            || ea.classes != eb.classes
            || ea.rect.size() != eb.rect.size()
            || ea.children.len() != eb.children.len()
        {
            return false;
        }
        ea.children
            .iter()
            .zip(eb.children.iter())
            .all(|(&ca, &cb)| self.subtree_eq(ca, cb))
    }

    /// Find the deepest element containing `point`, starting from the
    /// root. Children are tested front-to-back (reverse document order).
    /// The `skip` subtree is excluded, which is how the engine looks
    /// behind the floating mirror.
    pub fn hit_test(&self, point: Vec2, skip: Option<ElementId>) -> Option<ElementId> {
        self.hit_test_node(self.root, point, skip)
    }

    fn hit_test_node(
        &self,
        el: ElementId,
        point: Vec2,
        skip: Option<ElementId>,
    ) -> Option<ElementId> {
        if Some(el) == skip {
            return None;
        }
        let element = self.elements.get(&el)?;
        if !element.rect.contains(point) {
            return None;
        }
        // Front-most children win.
        for &child in element.children.iter().rev() {
            if let Some(hit) = self.hit_test_node(child, point, skip) {
                return Some(hit);
            }
        }
        Some(el)
    }
}

impl Default for ElementTree {
    fn default() -> Self {
        Self::new()
    }
}
