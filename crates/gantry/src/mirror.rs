//! The floating mirror that follows the pointer during a drag.
//!
//! The manager is the only component allowed to create or destroy the
//! mirror; the drag session holds the id but delegates lifecycle here.

use gantry_core::math::Vec2;
use gantry_core::tree::{ElementId, ElementTree};

/// Marker class carried by the mirror element.
pub const MIRROR_CLASS: &str = "gu-mirror";

/// Marker class carried by the item while it is in transit.
pub const TRANSIT_CLASS: &str = "gu-transit";

/// Owns the mirror element and the pointer-to-element grab offset.
#[derive(Debug, Default)]
pub struct MirrorManager {
    mirror: Option<ElementId>,
    grab_offset: Vec2,
}

impl MirrorManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// The mirror element, if one is alive.
    pub fn element(&self) -> Option<ElementId> {
        self.mirror
    }

    /// Whether a mirror currently exists.
    pub fn is_active(&self) -> bool {
        self.mirror.is_some()
    }

    /// Deep-clone `source` into `container`, tag it, and position it at
    /// the source's current bounds. The offset between `grab_point` and
    /// the source origin is recorded so repositioning never jitters.
    ///
    /// No-op if a mirror already exists.
    pub fn create(
        &mut self,
        tree: &mut ElementTree,
        source: ElementId,
        container: ElementId,
        grab_point: Vec2,
    ) -> Option<ElementId> {
        if self.mirror.is_some() {
            return self.mirror;
        }
        let rect = tree.get(source)?.rect;
        let mirror = tree.clone_subtree(source);
        tree.add_class(mirror, MIRROR_CLASS);
        tree.append_child(container, mirror);
        self.grab_offset = grab_point - rect.position();
        self.mirror = Some(mirror);
        tracing::trace!(?mirror, ?source, "mirror created");
        Some(mirror)
    }

    /// Move the mirror so the pointer keeps the same relative offset it
    /// had at grab time.
    pub fn reposition(&mut self, tree: &mut ElementTree, point: Vec2) {
        let Some(mirror) = self.mirror else {
            return;
        };
        let target_origin = point - self.grab_offset;
        let delta = target_origin - tree.rect(mirror).position();
        if delta != Vec2::ZERO {
            tree.translate_subtree(mirror, delta);
        }
    }

    /// Remove the mirror from the tree. Idempotent.
    pub fn destroy(&mut self, tree: &mut ElementTree) {
        if let Some(mirror) = self.mirror.take() {
            tree.remove_subtree(mirror);
            self.grab_offset = Vec2::ZERO;
            tracing::trace!(?mirror, "mirror destroyed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::tree::Rect;

    #[test]
    fn test_create_positions_mirror_at_source() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let item =
            tree.create_element_with(Rect::new(40.0, 60.0, 120.0, 30.0), Default::default());
        tree.append_child(root, item);
        tree.add_class(item, "card");

        let mut manager = MirrorManager::new();
        let mirror = manager
            .create(&mut tree, item, root, Vec2::new(50.0, 70.0))
            .unwrap();

        assert_ne!(mirror, item);
        assert_eq!(tree.parent_of(mirror), Some(root));
        assert_eq!(tree.rect(mirror).position(), Vec2::new(40.0, 60.0));
        assert!(tree.has_class(mirror, MIRROR_CLASS));
        assert!(tree.has_class(mirror, "card"));

        // Second create is a no-op returning the live mirror.
        assert_eq!(
            manager.create(&mut tree, item, root, Vec2::ZERO),
            Some(mirror)
        );
    }

    #[test]
    fn test_reposition_preserves_grab_offset() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let item =
            tree.create_element_with(Rect::new(40.0, 60.0, 120.0, 30.0), Default::default());
        tree.append_child(root, item);

        let mut manager = MirrorManager::new();
        let mirror = manager
            .create(&mut tree, item, root, Vec2::new(50.0, 70.0))
            .unwrap();

        manager.reposition(&mut tree, Vec2::new(200.0, 100.0));
        // Grab offset was (10, 10) into the element.
        assert_eq!(tree.rect(mirror).position(), Vec2::new(190.0, 90.0));
    }

    #[test]
    fn test_destroy_is_idempotent() {
        let mut tree = ElementTree::new();
        let root = tree.root();
        let item = tree.create_element_with(Rect::new(0.0, 0.0, 10.0, 10.0), Default::default());
        tree.append_child(root, item);

        let mut manager = MirrorManager::new();
        let mirror = manager.create(&mut tree, item, root, Vec2::ZERO).unwrap();

        manager.destroy(&mut tree);
        assert!(!tree.exists(mirror));
        assert!(!manager.is_active());
        manager.destroy(&mut tree);
        assert!(!manager.is_active());
    }
}
