//! Drag-and-drop for retained element trees.
//!
//! The crate turns raw pointer events into a full drag lifecycle over an
//! [`ElementTree`]: pressing on a draggable item arms a session, movement
//! starts the drag and spawns a floating mirror, and every pointer-move
//! live-previews the insertion slot until release commits, reverts, or
//! removes the item. Hosts observe the lifecycle through typed
//! [`DragEvent`]s.
//!
//! # Example
//!
//! ```no_run
//! use gantry::{DragEngine, EventKind, Options};
//! use gantry_core::{ElementTree, PointerEvent, Rect};
//! use gantry_core::math::Vec2;
//!
//! let mut tree = ElementTree::new();
//! let root = tree.root();
//! tree.set_rect(root, Rect::new(0.0, 0.0, 800.0, 600.0));
//! let list = tree.create_element_with(Rect::new(0.0, 0.0, 200.0, 600.0), Default::default());
//! tree.append_child(root, list);
//!
//! let mut engine = DragEngine::with_defaults(vec![list]);
//! engine.on(EventKind::Drop, |event| println!("{event:?}"));
//!
//! engine.handle_event(&mut tree, PointerEvent::down(Vec2::new(100.0, 10.0)));
//! engine.handle_event(&mut tree, PointerEvent::moved(Vec2::new(100.0, 50.0)));
//! engine.handle_event(&mut tree, PointerEvent::up(Vec2::new(100.0, 50.0)));
//! ```

pub mod emitter;
pub mod engine;
pub mod geometry;
pub mod mirror;
pub mod options;
pub mod policy;

mod session;

pub use emitter::{CloneKind, DragEvent, EventEmitter, EventKind, ListenerId};
pub use engine::DragEngine;
pub use mirror::{MIRROR_CLASS, MirrorManager, TRANSIT_CLASS};
pub use options::{Direction, Options, OptionsError};
pub use policy::GrabContext;

pub use gantry_core::{
    Element, ElementFlags, ElementId, ElementTree, PointerButton, PointerEvent, Rect,
};
pub use gantry_core::math::Vec2;
