//! Grid Configuration Module
//!
//! Ground-plane grid used by wall placement.
//!
//! Walls are drawn between grid *corners* (cell intersections), not cell
//! centers, so a wall of N cells spans exactly N cell edges.
//! - 1 unit = 1 meter
//! - Y is the up axis; the ground plane is XZ

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Dominant axis of a ground-plane segment after axis locking.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundAxis {
    /// Segment runs along X (Z is fixed)
    X,
    /// Segment runs along Z (X is fixed)
    Z,
}

/// Grid configuration for corner snapping.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge length in meters
    pub cell_size: f32,
    /// Grid snapping on/off
    pub snap_enabled: bool,
    /// Height of the ground plane that placed points are flattened onto
    pub ground_height: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: 1.0,
            snap_enabled: true,
            ground_height: 0.0,
        }
    }
}

impl GridConfig {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }

    /// Snap a world position to the nearest grid corner.
    ///
    /// X and Z are rounded to the nearest multiple of `cell_size`;
    /// Y is flattened to the ground plane.
    pub fn snap_to_corner(&self, pos: Vec3) -> Vec3 {
        if !self.snap_enabled || self.cell_size <= 0.0 {
            return Vec3::new(pos.x, self.ground_height, pos.z);
        }
        let size = self.cell_size;
        Vec3::new(
            (pos.x / size).round() * size,
            self.ground_height,
            (pos.z / size).round() * size,
        )
    }
}

/// Lock `point` to the dominant axis measured from `anchor`.
///
/// The smaller of |dx| and |dz| is collapsed so the resulting segment
/// is perfectly horizontal or vertical in the ground plane. Ties go to Z,
/// matching a strict `|dx| > |dz|` test for X.
pub fn axis_lock(anchor: Vec3, point: Vec3) -> Vec3 {
    match dominant_axis(anchor, point) {
        GroundAxis::X => Vec3::new(point.x, anchor.y, anchor.z),
        GroundAxis::Z => Vec3::new(anchor.x, anchor.y, point.z),
    }
}

/// Which ground axis dominates the offset from `anchor` to `point`.
pub fn dominant_axis(anchor: Vec3, point: Vec3) -> GroundAxis {
    let dx = (point.x - anchor.x).abs();
    let dz = (point.z - anchor.z).abs();
    if dx > dz { GroundAxis::X } else { GroundAxis::Z }
}

/// Snap a position using the default grid.
pub fn snap_to_corner(pos: Vec3) -> Vec3 {
    GridConfig::default().snap_to_corner(pos)
}
