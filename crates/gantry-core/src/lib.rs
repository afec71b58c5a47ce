//! Gantry Core
//!
//! This crate contains the element tree and input primitives shared by the
//! Gantry drag-and-drop engine.

pub mod input;
pub mod logging;
pub mod math;
pub mod tree;

pub use input::{PointerButton, PointerEvent};
pub use tree::{Element, ElementFlags, ElementId, ElementTree, Rect};
