//! The drag engine: pointer interpretation and the session state machine.
//!
//! One engine manages one set of containers and at most one in-flight
//! drag. The lifecycle is `idle -> armed -> dragging -> idle`: a
//! qualifying press arms, movement past the threshold starts the drag,
//! and a release (or one of the explicit `end`/`cancel`/`remove` calls)
//! resolves it. Every transition runs synchronously inside the call that
//! triggered it, including all event emission.

use gantry_core::input::{PointerButton, PointerEvent};
use gantry_core::math::Vec2;
use gantry_core::tree::{ElementId, ElementTree};

use crate::emitter::{CloneKind, DragEvent, EventEmitter, EventKind, ListenerId};
use crate::geometry;
use crate::mirror::{MirrorManager, TRANSIT_CLASS};
use crate::options::{Options, OptionsError};
use crate::policy;
use crate::session::DragSession;

/// Drag-and-drop engine over an [`ElementTree`].
///
/// The tree is owned by the host and passed into every call; the engine
/// owns only the session, the mirror, and the listener registry.
pub struct DragEngine {
    options: Options,
    containers: Vec<ElementId>,
    emitter: EventEmitter,
    mirror: MirrorManager,
    session: Option<DragSession>,
    destroyed: bool,
}

impl DragEngine {
    /// Create an engine managing `containers`. Fails fast on invalid
    /// configuration.
    pub fn new(containers: Vec<ElementId>, options: Options) -> Result<Self, OptionsError> {
        options.validate()?;
        Ok(Self {
            options,
            containers,
            emitter: EventEmitter::new(),
            mirror: MirrorManager::new(),
            session: None,
            destroyed: false,
        })
    }

    /// Create an engine with default options.
    pub fn with_defaults(containers: Vec<ElementId>) -> Self {
        Self {
            options: Options::default(),
            containers,
            emitter: EventEmitter::new(),
            mirror: MirrorManager::new(),
            session: None,
            destroyed: false,
        }
    }

    /// The engine's configuration.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// The managed container list.
    pub fn containers(&self) -> &[ElementId] {
        &self.containers
    }

    /// Mutable access to the container list; membership is dynamic.
    pub fn containers_mut(&mut self) -> &mut Vec<ElementId> {
        &mut self.containers
    }

    /// Whether a drag is in flight (armed presses don't count).
    pub fn dragging(&self) -> bool {
        self.session.as_ref().is_some_and(|s| s.dragging)
    }

    /// Subscribe to a lifecycle event.
    pub fn on<F>(&mut self, kind: EventKind, listener: F) -> ListenerId
    where
        F: FnMut(&DragEvent) + 'static,
    {
        self.emitter.on(kind, listener)
    }

    /// Unsubscribe a listener.
    pub fn off(&mut self, id: ListenerId) -> bool {
        self.emitter.off(id)
    }

    /// Feed one pointer event. All resulting tree mutations and event
    /// emissions complete before this returns.
    pub fn handle_event(&mut self, tree: &mut ElementTree, event: PointerEvent) {
        if self.destroyed {
            return;
        }
        match event {
            PointerEvent::Down { pos, button } => self.grab(tree, pos, button),
            PointerEvent::Move { pos } => self.move_pointer(tree, pos),
            PointerEvent::Up { pos } => self.release(tree, pos),
        }
    }

    /// Force-begin a drag on `item`, bypassing the pointer-down gate and
    /// the movement threshold. No mirror is created until the pointer
    /// actually moves.
    pub fn manual_start(&mut self, tree: &mut ElementTree, item: ElementId) {
        if self.destroyed || self.session.is_some() {
            return;
        }
        let Some(context) = policy::grab_context(tree, item, &self.containers, &self.options)
        else {
            return;
        };
        let sibling = tree.next_sibling(context.item);
        let origin = tree.rect(context.item).position();
        self.session = Some(DragSession::new(
            context.item,
            context.source,
            sibling,
            origin,
        ));
        self.begin_drag(tree);
    }

    /// Gracefully drop the moving item wherever it currently sits.
    pub fn end(&mut self, tree: &mut ElementTree) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.dragging {
            return;
        }
        let moving = session.moving();
        match tree.parent_of(moving) {
            Some(parent) => self.drop_item(tree, moving, parent),
            // A detached copy has no committed position to drop into.
            None => self.cancel_with(tree, false),
        }
    }

    /// Resolve the drag per the configured spill policy (`revert_on_spill`).
    pub fn cancel(&mut self, tree: &mut ElementTree) {
        self.cancel_with(tree, self.options.revert_on_spill);
    }

    /// Resolve the drag, explicitly choosing whether to revert.
    ///
    /// At the initial placement this is a plain cancel. Otherwise
    /// reverting restores the exact source slot (copies are simply
    /// discarded), while not reverting commits the item where it sits,
    /// which is a drop.
    pub fn cancel_with(&mut self, tree: &mut ElementTree, revert: bool) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.dragging {
            return;
        }
        let moving = session.moving();
        let is_copy = session.is_copy();
        let item = session.item;
        let source = session.source;
        let source_sibling = session.source_sibling;
        let sibling = session.current_sibling;

        let parent = tree.parent_of(moving);
        let initial = match parent {
            Some(p) => self.is_initial_placement_current(tree, p),
            None => false,
        };
        if !initial && revert {
            if is_copy {
                if parent.is_some() {
                    tree.detach(moving);
                }
            } else {
                tree.insert_before(source, item, source_sibling);
            }
        }
        if initial || revert {
            self.emitter.emit(&DragEvent::Cancel {
                item: moving,
                container: Some(source),
            });
        } else {
            match parent {
                Some(p) => self.emitter.emit(&DragEvent::Drop {
                    item: moving,
                    target: p,
                    source,
                    sibling,
                }),
                // Nothing holds the item; there is no drop to report.
                None => self.emitter.emit(&DragEvent::Cancel {
                    item: moving,
                    container: Some(source),
                }),
            }
        }
        self.cleanup(tree);
    }

    /// Remove the moving item from the tree. Real items emit `Remove`;
    /// discarding a copy is a cancellation of that copy (it never had a
    /// committed destination, so the container argument is `None`).
    pub fn remove(&mut self, tree: &mut ElementTree) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.dragging {
            return;
        }
        let moving = session.moving();
        let is_copy = session.is_copy();
        let source = session.source;

        if tree.parent_of(moving).is_some() {
            tree.detach(moving);
        }
        if is_copy {
            self.emitter.emit(&DragEvent::Cancel {
                item: moving,
                container: None,
            });
        } else {
            self.emitter.emit(&DragEvent::Remove {
                item: moving,
                container: source,
            });
        }
        self.cleanup(tree);
    }

    /// Hard teardown: abort any in-flight drag without emitting `Drop` or
    /// `Cancel`, destroy the mirror, and release every listener.
    /// Idempotent.
    pub fn destroy(&mut self, tree: &mut ElementTree) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        if let Some(session) = self.session.take() {
            let moving = session.moving();
            self.mirror.destroy(tree);
            tree.remove_class(moving, TRANSIT_CLASS);
            // An uncommitted copy has no owner once the session dies.
            if session.is_copy() && tree.parent_of(moving).is_none() {
                tree.remove_subtree(moving);
            }
        }
        self.emitter.clear();
        tracing::debug!("engine destroyed");
    }

    // --- pointer path ---

    fn grab(&mut self, tree: &ElementTree, pos: Vec2, button: PointerButton) {
        // One session at a time; presses during a drag are no-ops.
        if self.session.is_some() || button != PointerButton::Primary {
            return;
        }
        let Some(hit) = tree.hit_test(pos, None) else {
            return;
        };
        if self.options.ignore_input_text_selection
            && tree.get(hit).is_some_and(|e| e.flags.is_text_selection())
        {
            return;
        }
        let Some(context) = policy::grab_context(tree, hit, &self.containers, &self.options)
        else {
            return;
        };
        let sibling = tree.next_sibling(context.item);
        self.session = Some(DragSession::new(context.item, context.source, sibling, pos));
        tracing::trace!(item = ?context.item, source = ?context.source, "armed");
    }

    fn move_pointer(&mut self, tree: &mut ElementTree, pos: Vec2) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.dragging {
            // At the default threshold of zero any movement counts; a
            // positive threshold must be strictly exceeded.
            let threshold = self.options.drag_threshold;
            if threshold > 0.0 && (pos - session.grab_origin).length() <= threshold {
                return;
            }
            self.begin_drag(tree);
        }
        self.ensure_mirror(tree);
        self.mirror.reposition(tree, pos);
        self.drag_tick(tree, pos);
    }

    fn release(&mut self, tree: &mut ElementTree, pos: Vec2) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.dragging {
            // The press never became a drag; disarm silently.
            self.session = None;
            return;
        }
        let moving = session.moving();
        let is_copy = session.is_copy();
        let source = session.source;

        let behind = tree.hit_test(pos, self.mirror.element());
        let drop_target = behind.and_then(|b| self.find_drop_target(tree, b, pos));
        match drop_target {
            Some(target) if !is_copy || self.options.copy_sort_source || target != source => {
                self.drop_item(tree, moving, target);
            }
            _ => {
                if self.options.remove_on_spill {
                    self.remove(tree);
                } else {
                    self.cancel(tree);
                }
            }
        }
    }

    // --- session transitions ---

    /// Armed -> dragging: clone if copying, then announce the drag. The
    /// `Drag` event always carries the untouched original item.
    fn begin_drag(&mut self, tree: &mut ElementTree) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let item = session.item;
        let source = session.source;
        if (self.options.copy)(tree, item, source) {
            let copy = tree.clone_subtree(item);
            if let Some(s) = self.session.as_mut() {
                s.copy = Some(copy);
            }
            self.emitter.emit(&DragEvent::Cloned {
                clone: copy,
                original: item,
                kind: CloneKind::Copy,
            });
        }
        if let Some(s) = self.session.as_mut() {
            s.dragging = true;
        }
        tracing::debug!(?item, ?source, "drag started");
        self.emitter.emit(&DragEvent::Drag { item, source });
    }

    /// Create the mirror lazily on the first pointer movement of the drag.
    /// The mirror's `Cloned` event therefore always follows `Drag`, and
    /// drags begun through [`DragEngine::manual_start`] stay mirrorless
    /// until the pointer joins in.
    fn ensure_mirror(&mut self, tree: &mut ElementTree) {
        if self.mirror.is_active() {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let item = session.item;
        let moving = session.moving();
        let grab = session.grab_origin;
        let container = self.options.mirror_container.unwrap_or_else(|| tree.root());
        if let Some(mirror) = self.mirror.create(tree, item, container, grab) {
            tree.add_class(moving, TRANSIT_CLASS);
            self.emitter.emit(&DragEvent::Cloned {
                clone: mirror,
                original: item,
                kind: CloneKind::Mirror,
            });
        }
    }

    /// One pointer-move worth of work: container enter/leave, live
    /// reordering, spill shadowing.
    fn drag_tick(&mut self, tree: &mut ElementTree, pos: Vec2) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let source = session.source;
        let source_sibling = session.source_sibling;
        let moving = session.moving();
        let is_copy = session.is_copy();
        let last_target = session.last_drop_target;

        let behind = tree.hit_test(pos, self.mirror.element());
        let drop_target = behind.and_then(|b| self.find_drop_target(tree, b, pos));

        let changed = drop_target.is_some() && drop_target != last_target;
        if changed || drop_target.is_none() {
            if let Some(previous) = last_target {
                self.emitter.emit(&DragEvent::Out {
                    item: moving,
                    container: previous,
                    source,
                });
            }
            if let Some(s) = self.session.as_mut() {
                s.last_drop_target = drop_target;
            }
            if let Some(current) = drop_target {
                self.emitter.emit(&DragEvent::Over {
                    item: moving,
                    container: current,
                    source,
                });
            }
        }

        // A copy never reorders its own source unless configured to.
        if drop_target == Some(source) && is_copy && !self.options.copy_sort_source {
            if tree.parent_of(moving).is_some() {
                tree.detach(moving);
            }
            return;
        }

        let (target, reference) = match drop_target {
            Some(target) => (target, self.resolve_reference(tree, target, behind, pos)),
            None => {
                if self.options.revert_on_spill && !is_copy {
                    // Outside every target the item shadows back home.
                    (source, source_sibling)
                } else {
                    if is_copy && tree.parent_of(moving).is_some() {
                        tree.detach(moving);
                    }
                    return;
                }
            }
        };

        let next = tree.next_sibling(moving);
        let should_move = (reference.is_none() && changed)
            || (reference != Some(moving) && reference != next);
        if should_move {
            if let Some(s) = self.session.as_mut() {
                s.current_sibling = reference;
            }
            tree.insert_before(target, moving, reference);
            self.emitter.emit(&DragEvent::Shadow {
                item: moving,
                container: target,
                source,
            });
        }
    }

    /// Commit the moving item to `target`. A drop into the initial
    /// placement is a cancel, not a drop.
    fn drop_item(&mut self, tree: &mut ElementTree, moving: ElementId, target: ElementId) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let original = session.item;
        let source = session.source;
        let sibling = session.current_sibling;
        if session.is_copy() && self.options.copy_sort_source && target == source {
            // The copy took the original's place in its own container.
            tree.detach(original);
        }
        if self.is_initial_placement_current(tree, target) {
            self.emitter.emit(&DragEvent::Cancel {
                item: moving,
                container: Some(source),
            });
        } else {
            self.emitter.emit(&DragEvent::Drop {
                item: moving,
                target,
                source,
                sibling,
            });
        }
        self.cleanup(tree);
    }

    /// Terminal transition: destroy the mirror, strip the transit marker,
    /// emit `DragEnd`, clear the session.
    fn cleanup(&mut self, tree: &mut ElementTree) {
        let Some(session) = self.session.take() else {
            return;
        };
        let moving = session.moving();
        self.mirror.destroy(tree);
        tree.remove_class(moving, TRANSIT_CLASS);
        tracing::debug!(item = ?session.item, "drag ended");
        self.emitter.emit(&DragEvent::DragEnd { item: moving });
    }

    // --- target resolution ---

    /// Walk up from the element behind the cursor to the first managed
    /// container willing to take the item.
    fn find_drop_target(
        &self,
        tree: &ElementTree,
        behind: ElementId,
        pos: Vec2,
    ) -> Option<ElementId> {
        let mut target = Some(behind);
        while let Some(t) = target {
            if self.accepted(tree, t, behind, pos) {
                return Some(t);
            }
            target = tree.parent_of(t);
        }
        None
    }

    fn accepted(&self, tree: &ElementTree, target: ElementId, behind: ElementId, pos: Vec2) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let moving = session.moving();
        if target == moving || tree.contains(moving, target) {
            return false;
        }
        if !policy::is_managed_container(tree, target, &self.containers, &self.options) {
            return false;
        }
        let reference = self.resolve_reference(tree, target, Some(behind), pos);
        // Dropping the item right back where it came from is always fine.
        if self.is_initial_placement_at(target, reference) {
            return true;
        }
        policy::can_accept(
            tree,
            session.item,
            target,
            session.source,
            reference,
            &self.containers,
            &self.options,
        )
    }

    /// Resolve the reference sibling within `target` for the current
    /// pointer position.
    fn resolve_reference(
        &self,
        tree: &ElementTree,
        target: ElementId,
        behind: Option<ElementId>,
        pos: Vec2,
    ) -> Option<ElementId> {
        let direction = self.options.direction;
        let mut skip = Vec::with_capacity(2);
        if let Some(session) = self.session.as_ref() {
            skip.push(session.moving());
        }
        if let Some(mirror) = self.mirror.element() {
            skip.push(mirror);
        }
        match behind {
            Some(b) if b != target => match geometry::immediate_child(tree, target, b) {
                Some(immediate) => geometry::reference_from_hit(tree, immediate, pos, direction),
                None => geometry::insertion_point(tree, target, pos, direction, &skip),
            },
            _ => geometry::insertion_point(tree, target, pos, direction, &skip),
        }
    }

    fn is_initial_placement_at(&self, target: ElementId, sibling: Option<ElementId>) -> bool {
        self.session
            .as_ref()
            .is_some_and(|s| target == s.source && sibling == s.source_sibling)
    }

    /// Initial-placement check against the live tree: while the mirror is
    /// up the committed preview slot counts, otherwise the item's actual
    /// position does.
    fn is_initial_placement_current(&self, tree: &ElementTree, target: ElementId) -> bool {
        let Some(session) = self.session.as_ref() else {
            return false;
        };
        let sibling = if self.mirror.is_active() {
            session.current_sibling
        } else {
            tree.next_sibling(session.moving())
        };
        target == session.source && sibling == session.source_sibling
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::tree::{ElementFlags, Rect};

    fn setup() -> (ElementTree, ElementId, ElementId) {
        let mut tree = ElementTree::new();
        let root = tree.root();
        tree.set_rect(root, Rect::new(0.0, 0.0, 1000.0, 1000.0));
        let container =
            tree.create_element_with(Rect::new(0.0, 0.0, 100.0, 100.0), ElementFlags::empty());
        tree.append_child(root, container);
        let item =
            tree.create_element_with(Rect::new(0.0, 0.0, 100.0, 20.0), ElementFlags::empty());
        tree.append_child(container, item);
        (tree, container, item)
    }

    #[test]
    fn test_press_arms_without_dragging() {
        let (mut tree, container, _) = setup();
        let mut engine = DragEngine::with_defaults(vec![container]);

        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 10.0)));
        assert!(!engine.dragging());

        engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(52.0, 11.0)));
        assert!(engine.dragging());
    }

    #[test]
    fn test_non_primary_press_is_ignored() {
        let (mut tree, container, _) = setup();
        let mut engine = DragEngine::with_defaults(vec![container]);

        engine.handle_event(
            &mut tree,
            PointerEvent::Down {
                pos: Vec2::new(50.0, 10.0),
                button: PointerButton::Secondary,
            },
        );
        engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(60.0, 10.0)));
        assert!(!engine.dragging());
    }

    #[test]
    fn test_text_input_press_keeps_selection() {
        let (mut tree, container, item) = setup();
        tree.get_mut(item).unwrap().flags = ElementFlags::TEXT_INPUT;
        let mut engine = DragEngine::with_defaults(vec![container]);

        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 10.0)));
        assert!(!engine.dragging());
        engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(60.0, 10.0)));
        assert!(!engine.dragging());
    }

    #[test]
    fn test_text_input_press_can_be_hijacked() {
        let (mut tree, container, item) = setup();
        tree.get_mut(item).unwrap().flags = ElementFlags::TEXT_INPUT;
        let mut options = Options::default();
        options.ignore_input_text_selection = false;
        let mut engine = DragEngine::new(vec![container], options).expect("engine");

        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 10.0)));
        engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(60.0, 10.0)));
        assert!(engine.dragging());
    }

    #[test]
    fn test_zero_threshold_starts_on_any_move() {
        let (mut tree, container, _) = setup();
        let mut engine = DragEngine::with_defaults(vec![container]);

        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 10.0)));
        // Even a move that reports the same position confirms the drag.
        engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(50.0, 10.0)));
        assert!(engine.dragging());
    }

    #[test]
    fn test_threshold_gates_drag_start() {
        let (mut tree, container, _) = setup();
        let mut options = Options::default();
        options.drag_threshold = 5.0;
        let mut engine = DragEngine::new(vec![container], options).expect("engine");

        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 10.0)));
        engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(53.0, 10.0)));
        assert!(!engine.dragging());
        engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(56.0, 10.0)));
        assert!(engine.dragging());
    }

    #[test]
    fn test_release_without_movement_disarms_silently() {
        let (mut tree, container, _) = setup();
        let mut engine = DragEngine::with_defaults(vec![container]);
        let mut seen = Vec::new();
        let events = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
        for kind in EventKind::ALL {
            let events = std::rc::Rc::clone(&events);
            engine.on(kind, move |e| events.borrow_mut().push(*e));
        }

        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 10.0)));
        engine.handle_event(&mut tree, PointerEvent::up(Vec2::new(50.0, 10.0)));
        seen.extend(events.borrow().iter().copied());
        assert!(seen.is_empty());
        assert!(!engine.dragging());
    }

    #[test]
    fn test_second_press_during_drag_is_ignored() {
        let (mut tree, container, item) = setup();
        let other =
            tree.create_element_with(Rect::new(0.0, 20.0, 100.0, 20.0), ElementFlags::empty());
        tree.append_child(container, other);
        let mut engine = DragEngine::with_defaults(vec![container]);

        engine.manual_start(&mut tree, item);
        assert!(engine.dragging());
        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 30.0)));
        // Still the same session on the same item.
        engine.end(&mut tree);
        assert!(!engine.dragging());
    }

    #[test]
    fn test_calls_without_session_are_no_ops() {
        let (mut tree, container, _) = setup();
        let mut engine = DragEngine::with_defaults(vec![container]);
        engine.end(&mut tree);
        engine.cancel(&mut tree);
        engine.remove(&mut tree);
        assert!(!engine.dragging());
    }

    #[test]
    fn test_invalid_options_fail_fast() {
        let mut options = Options::default();
        options.drag_threshold = -2.0;
        assert!(DragEngine::new(Vec::new(), options).is_err());
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let (mut tree, container, item) = setup();
        let mut engine = DragEngine::with_defaults(vec![container]);
        engine.manual_start(&mut tree, item);
        engine.destroy(&mut tree);
        assert!(!engine.dragging());
        engine.destroy(&mut tree);
        // Input after teardown is ignored.
        engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(50.0, 10.0)));
        assert!(!engine.dragging());
    }
}
