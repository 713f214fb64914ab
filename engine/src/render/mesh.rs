//! Wall Mesh Payload
//!
//! Renderer-agnostic geometry produced by the wall builder: positions,
//! triangle indices and UVs. The renderer collaborator turns this into GPU
//! buffers; `to_vertices` produces a flat-shaded, `Pod` vertex stream for it.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use std::collections::HashMap;

// ============================================================================
// GPU VERTEX TYPE
// ============================================================================

/// Flat-shaded wall vertex, laid out for direct upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct WallVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

static_assertions::assert_eq_size!(WallVertex, [u8; 32]);

// ============================================================================
// MESH PAYLOAD
// ============================================================================

/// Self-contained geometry payload for one wall prism.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallMesh {
    pub positions: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    /// Triangle list, counter-clockwise seen from outside
    pub indices: Vec<u32>,
}

impl WallMesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a quad as two triangles.
    ///
    /// Corners are bottom-left, bottom-right, top-left, top-right as seen
    /// from outside the solid; `uv_size` scales the texture coordinates so
    /// textures tile per meter.
    pub fn add_quad(&mut self, bl: Vec3, br: Vec3, tl: Vec3, tr: Vec3, uv_size: Vec2) {
        let base = self.positions.len() as u32;
        self.positions.extend_from_slice(&[bl, br, tl, tr]);
        self.uvs.extend_from_slice(&[
            Vec2::ZERO,
            Vec2::new(uv_size.x, 0.0),
            Vec2::new(0.0, uv_size.y),
            uv_size,
        ]);
        self.indices
            .extend_from_slice(&[base, base + 1, base + 2, base + 1, base + 3, base + 2]);
    }

    fn triangle(&self, tri: usize) -> [Vec3; 3] {
        let i = tri * 3;
        [
            self.positions[self.indices[i] as usize],
            self.positions[self.indices[i + 1] as usize],
            self.positions[self.indices[i + 2] as usize],
        ]
    }

    /// Per-triangle unit normals from the winding order.
    pub fn face_normals(&self) -> Vec<Vec3> {
        (0..self.triangle_count())
            .map(|t| {
                let [a, b, c] = self.triangle(t);
                (b - a).cross(c - a).normalize_or_zero()
            })
            .collect()
    }

    /// Average of all vertex positions.
    pub fn centroid(&self) -> Vec3 {
        if self.positions.is_empty() {
            return Vec3::ZERO;
        }
        self.positions.iter().copied().sum::<Vec3>() / self.positions.len() as f32
    }

    /// Signed enclosed volume (divergence theorem).
    ///
    /// Positive when every face winds counter-clockwise from outside.
    pub fn signed_volume(&self) -> f32 {
        (0..self.triangle_count())
            .map(|t| {
                let [a, b, c] = self.triangle(t);
                a.dot(b.cross(c)) / 6.0
            })
            .sum()
    }

    /// True when every edge is shared by exactly two triangles.
    ///
    /// Faces carry their own vertices (for flat normals and per-face UVs),
    /// so edges are matched on quantized positions rather than indices.
    pub fn is_watertight(&self) -> bool {
        if self.indices.is_empty() {
            return false;
        }
        let quantize = |p: Vec3| -> (i64, i64, i64) {
            (
                (p.x * 1.0e4).round() as i64,
                (p.y * 1.0e4).round() as i64,
                (p.z * 1.0e4).round() as i64,
            )
        };

        let mut edges: HashMap<((i64, i64, i64), (i64, i64, i64)), u32> = HashMap::new();
        for t in 0..self.triangle_count() {
            let corners = self.triangle(t).map(quantize);
            for k in 0..3 {
                let (a, b) = (corners[k], corners[(k + 1) % 3]);
                let edge = if a <= b { (a, b) } else { (b, a) };
                *edges.entry(edge).or_insert(0) += 1;
            }
        }
        edges.values().all(|&count| count == 2)
    }

    /// Flat-shaded vertex stream: one vertex per index, normal from its face.
    pub fn to_vertices(&self) -> Vec<WallVertex> {
        let normals = self.face_normals();
        self.indices
            .iter()
            .enumerate()
            .map(|(i, &idx)| {
                let p = self.positions[idx as usize];
                let n = normals[i / 3];
                let uv = self.uvs.get(idx as usize).copied().unwrap_or(Vec2::ZERO);
                WallVertex {
                    position: p.to_array(),
                    normal: n.to_array(),
                    uv: uv.to_array(),
                }
            })
            .collect()
    }
}
