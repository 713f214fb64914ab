//! Wall Segments
//!
//! A wall run is stored as uniform pieces. Each piece is keyed by its two
//! endpoints, rounded to centimeters and put in canonical order, so
//! drawing the same piece in either direction lands on the same key.

use glam::Vec3;
use std::fmt;

use super::error::{Result, WallError};
use crate::render::EntityId;

/// Key precision: endpoints are rounded to 1/KEY_SCALE meters
pub const KEY_SCALE: f32 = 100.0;

/// Shortest nominal segment length. Pieces are then at least one key
/// step long, so neighbouring pieces never round to the same key
pub const MIN_SEGMENT_LENGTH: f32 = 2.0 / KEY_SCALE;

/// Slack when deciding how many pieces a run needs, so float noise like
/// 4.0000005 / 1.0 does not produce a fifth sliver piece
const PIECE_COUNT_SLACK: f32 = 1.0e-4;

// ============================================================================
// SEGMENT KEY
// ============================================================================

/// Order-independent identity of a segment's endpoint pair (ground plane).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SegmentKey {
    a: (i64, i64),
    b: (i64, i64),
}

impl SegmentKey {
    pub fn new(start: Vec3, end: Vec3) -> Self {
        let s = quantize(start);
        let e = quantize(end);
        if s <= e { Self { a: s, b: e } } else { Self { a: e, b: s } }
    }

    /// Rounded endpoint coordinates as (x, z) in meters, canonical order.
    pub fn endpoints(&self) -> ((f32, f32), (f32, f32)) {
        let unq = |p: (i64, i64)| (p.0 as f32 / KEY_SCALE, p.1 as f32 / KEY_SCALE);
        (unq(self.a), unq(self.b))
    }
}

impl fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ((ax, az), (bx, bz)) = self.endpoints();
        write!(f, "seg_{ax:.2}_{az:.2}_{bx:.2}_{bz:.2}")
    }
}

fn quantize(p: Vec3) -> (i64, i64) {
    ((p.x * KEY_SCALE).round() as i64, (p.z * KEY_SCALE).round() as i64)
}

// ============================================================================
// WALL SEGMENT
// ============================================================================

/// One stored piece of a wall run.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSegment {
    pub key: SegmentKey,
    pub start: Vec3,
    pub end: Vec3,
    /// Catalog id (thickness, height, cost, power draw, material)
    pub wall_type: u32,
    /// Position of this piece within the run it was cut from
    pub segment_index: usize,
    pub total_segments: usize,
    pub length: f32,
    /// Scene entity displaying this piece
    pub entity: EntityId,
}

impl WallSegment {
    pub fn center(&self) -> Vec3 {
        (self.start + self.end) / 2.0
    }

    pub fn direction(&self) -> Vec3 {
        (self.end - self.start).normalize_or_zero()
    }

    /// Runs along X (constant Z)
    pub fn is_horizontal(&self) -> bool {
        (self.end.z - self.start.z).abs() < 0.01
    }

    /// Runs along Z (constant X)
    pub fn is_vertical(&self) -> bool {
        (self.end.x - self.start.x).abs() < 0.01
    }

    /// Closest point on this segment to `point`.
    pub fn project(&self, point: Vec3) -> Vec3 {
        project_onto_segment(point, self.start, self.end)
    }

    pub fn distance_to(&self, point: Vec3) -> f32 {
        point.distance(self.project(point))
    }
}

impl fmt::Display for WallSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Segment {}/{}: {} -> {} (L={:.2}m)",
            self.segment_index, self.total_segments, self.start, self.end, self.length
        )
    }
}

/// Project `point` onto the segment `a..b`, clamped to its extent.
pub fn project_onto_segment(point: Vec3, a: Vec3, b: Vec3) -> Vec3 {
    let line = b - a;
    let length = line.length();
    if length <= f32::EPSILON {
        return a;
    }
    let dir = line / length;
    let t = (point - a).dot(dir).clamp(0.0, length);
    a + dir * t
}

// ============================================================================
// RUN DECOMPOSITION
// ============================================================================

/// One planned piece of a run, before it is built or stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunPiece {
    pub start: Vec3,
    pub end: Vec3,
    pub index: usize,
    pub total: usize,
}

impl RunPiece {
    pub fn key(&self) -> SegmentKey {
        SegmentKey::new(self.start, self.end)
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Number of pieces `ceil(length / segment_length)`, at least one.
pub fn piece_count(length: f32, segment_length: f32) -> usize {
    ((length / segment_length) - PIECE_COUNT_SLACK).ceil().max(1.0) as usize
}

/// Split `start..end` into equal pieces no longer than `segment_length`.
///
/// The real piece length is `total / count`, so there is never a short
/// trailing remainder. Piece boundaries are shared exactly: piece i's end
/// is bit-identical to piece i+1's start, and the last piece ends at `end`.
pub fn split_run(start: Vec3, end: Vec3, segment_length: f32) -> Result<Vec<RunPiece>> {
    if !(segment_length >= MIN_SEGMENT_LENGTH && segment_length.is_finite()) {
        return Err(WallError::InvalidSegmentLength(segment_length));
    }
    let length = start.distance(end);
    if !length.is_finite() || length < super::prism::GEOMETRY_EPSILON {
        return Err(WallError::DegenerateGeometry { length });
    }

    let count = piece_count(length, segment_length);
    let boundary = |i: usize| {
        if i == 0 {
            start
        } else if i == count {
            end
        } else {
            // Weighted sum keeps grid-aligned boundaries exact
            (start * (count - i) as f32 + end * i as f32) / count as f32
        }
    };

    Ok((0..count)
        .map(|i| RunPiece {
            start: boundary(i),
            end: boundary(i + 1),
            index: i,
            total: count,
        })
        .collect())
}
