//! # Utilities Module
//!
//! Grid geometry and the jump-physics traversal verifier.

pub mod math;
pub mod pathfinding;

pub use math::*;
pub use self::pathfinding::*;
