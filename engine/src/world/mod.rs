//! World Module
//!
//! Ground-plane grid configuration and snapping utilities.

pub mod grid;

pub use grid::{GridConfig, GroundAxis, axis_lock, dominant_axis, snap_to_corner};
