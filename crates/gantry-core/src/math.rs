//! Math primitives re-exported from the [`glam`] crate.
//!
//! Gantry only needs 2D screen-space math, so the surface is deliberately
//! small: [`Vec2`] for pointer coordinates and offsets.
//!
//! # Examples
//!
//! ```
//! use gantry_core::math::Vec2;
//!
//! let grab = Vec2::new(120.0, 48.0);
//! let pointer = Vec2::new(130.0, 52.0);
//! let delta = pointer - grab;
//! assert!(delta.length() > 0.0);
//! ```
//!
//! [`glam`]: https://docs.rs/glam

pub use glam::{Vec2, vec2};
