//! Wall Prism Builder
//!
//! Builds the six-faced rectangular prism for one wall segment from a
//! start/end pair. Looking from start towards end, the LEFT side is the
//! outer face and the RIGHT side is the inner face. Every quad is emitted
//! counter-clockwise as seen from outside, so recomputed normals point
//! outward without a flip pass.

use glam::{Vec2, Vec3};

use super::error::{Result, WallError};
use crate::render::WallMesh;

/// Minimum start/end distance for a buildable prism (meters)
pub const GEOMETRY_EPSILON: f32 = 0.01;

/// Build the prism for a wall running from `start` to `end`.
///
/// The base sits at the endpoints' height and the prism extends `height`
/// upward. Fails with `DegenerateGeometry` when the endpoints (nearly)
/// coincide or the run is vertical, and with `InvalidDimensions` for
/// non-positive height/thickness.
pub fn build_wall_prism(start: Vec3, end: Vec3, height: f32, thickness: f32) -> Result<WallMesh> {
    if !(height > 0.0 && height.is_finite() && thickness > 0.0 && thickness.is_finite()) {
        return Err(WallError::InvalidDimensions { height, thickness });
    }

    let length = start.distance(end);
    if !length.is_finite() || length < GEOMETRY_EPSILON {
        return Err(WallError::DegenerateGeometry { length });
    }

    let direction = (end - start) / length;
    let right = Vec3::Y.cross(direction);
    if right.length() < GEOMETRY_EPSILON {
        // Vertical run: no ground-plane direction to extrude thickness along
        return Err(WallError::DegenerateGeometry { length: 0.0 });
    }
    let offset = right.normalize() * (thickness / 2.0);
    let up = Vec3::Y * height;

    let bottom_start_outer = start - offset;
    let bottom_end_outer = end - offset;
    let bottom_start_inner = start + offset;
    let bottom_end_inner = end + offset;

    let top_start_outer = bottom_start_outer + up;
    let top_end_outer = bottom_end_outer + up;
    let top_start_inner = bottom_start_inner + up;
    let top_end_inner = bottom_end_inner + up;

    let mut mesh = WallMesh::new();

    // Outer
    mesh.add_quad(
        bottom_start_outer,
        bottom_end_outer,
        top_start_outer,
        top_end_outer,
        Vec2::new(length, height),
    );
    // Inner
    mesh.add_quad(
        bottom_end_inner,
        bottom_start_inner,
        top_end_inner,
        top_start_inner,
        Vec2::new(length, height),
    );
    // Start cap
    mesh.add_quad(
        bottom_start_inner,
        bottom_start_outer,
        top_start_inner,
        top_start_outer,
        Vec2::new(thickness, height),
    );
    // End cap
    mesh.add_quad(
        bottom_end_outer,
        bottom_end_inner,
        top_end_outer,
        top_end_inner,
        Vec2::new(thickness, height),
    );
    // Top
    mesh.add_quad(
        top_start_outer,
        top_end_outer,
        top_start_inner,
        top_end_inner,
        Vec2::new(length, thickness),
    );
    // Bottom
    mesh.add_quad(
        bottom_start_inner,
        bottom_end_inner,
        bottom_start_outer,
        bottom_end_outer,
        Vec2::new(length, thickness),
    );

    Ok(mesh)
}

/// Push both endpoints outward along the run by `overlap`.
///
/// Used before building so neighbouring segments interpenetrate slightly
/// and no hairline gap shows at their shared end. Coincident endpoints
/// are returned unchanged.
pub fn extend_for_overlap(start: Vec3, end: Vec3, overlap: f32) -> (Vec3, Vec3) {
    let direction = (end - start).normalize_or_zero();
    (start - direction * overlap, end + direction * overlap)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample_runs() -> Vec<(Vec3, Vec3)> {
        vec![
            (Vec3::ZERO, Vec3::new(4.0, 0.0, 0.0)),
            (Vec3::new(4.0, 0.0, 0.0), Vec3::ZERO),
            (Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0)),
            (Vec3::new(1.0, 0.0, 5.0), Vec3::new(1.0, 0.0, -2.0)),
            (Vec3::new(-2.0, 1.5, 0.5), Vec3::new(3.0, 1.5, 7.25)),
            (Vec3::ZERO, Vec3::new(0.02, 0.0, 0.0)),
        ]
    }

    #[test]
    fn test_prism_has_six_quads() {
        let mesh = build_wall_prism(Vec3::ZERO, Vec3::new(2.0, 0.0, 0.0), 2.5, 0.2).unwrap();
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.uvs.len(), 24);
    }

    #[test]
    fn test_prism_is_watertight_for_any_orientation() {
        for (start, end) in sample_runs() {
            let mesh = build_wall_prism(start, end, 2.5, 0.2).unwrap();
            assert!(mesh.is_watertight(), "leaky prism for {start} -> {end}");
        }
    }

    #[test]
    fn test_prism_volume_is_positive() {
        for (start, end) in sample_runs() {
            let mesh = build_wall_prism(start, end, 2.5, 0.2).unwrap();
            let expected = start.distance(end) * 2.5 * 0.2;
            assert_relative_eq!(mesh.signed_volume(), expected, max_relative = 1e-3);
        }
    }

    #[test]
    fn test_face_normals_point_away_from_centroid() {
        for (start, end) in sample_runs() {
            let mesh = build_wall_prism(start, end, 3.0, 0.3).unwrap();
            let centroid = mesh.centroid();
            for (t, normal) in mesh.face_normals().iter().enumerate() {
                let i = t * 3;
                let face_center = (mesh.positions[mesh.indices[i] as usize]
                    + mesh.positions[mesh.indices[i + 1] as usize]
                    + mesh.positions[mesh.indices[i + 2] as usize])
                    / 3.0;
                assert!(
                    normal.dot(face_center - centroid) > 0.0,
                    "triangle {t} faces inward for {start} -> {end}"
                );
            }
        }
    }

    #[test]
    fn test_outer_face_is_left_of_direction() {
        // Walking +X, left is +Z
        let mesh = build_wall_prism(Vec3::ZERO, Vec3::X * 2.0, 2.0, 0.4).unwrap();
        let outer_normal = mesh.face_normals()[0];
        assert_relative_eq!(outer_normal.z, 1.0, epsilon = 1e-6);
        assert_relative_eq!(mesh.positions[0].z, 0.2, epsilon = 1e-6);
    }

    #[test]
    fn test_uvs_scale_with_dimensions() {
        let mesh = build_wall_prism(Vec3::ZERO, Vec3::new(0.0, 0.0, 3.0), 2.5, 0.2).unwrap();
        assert_eq!(mesh.uvs[3], Vec2::new(3.0, 2.5));
        assert_eq!(mesh.uvs[11], Vec2::new(0.2, 2.5));
    }

    #[test]
    fn test_coincident_endpoints_are_degenerate() {
        let err = build_wall_prism(Vec3::ONE, Vec3::ONE, 2.5, 0.2).unwrap_err();
        assert!(matches!(err, WallError::DegenerateGeometry { .. }));

        let err = build_wall_prism(Vec3::ZERO, Vec3::new(0.005, 0.0, 0.0), 2.5, 0.2).unwrap_err();
        assert!(matches!(err, WallError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_vertical_run_is_degenerate() {
        let err = build_wall_prism(Vec3::ZERO, Vec3::Y * 2.0, 2.5, 0.2).unwrap_err();
        assert!(matches!(err, WallError::DegenerateGeometry { .. }));
    }

    #[test]
    fn test_invalid_dimensions_rejected() {
        let end = Vec3::X;
        assert!(matches!(
            build_wall_prism(Vec3::ZERO, end, 0.0, 0.2),
            Err(WallError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            build_wall_prism(Vec3::ZERO, end, 2.0, -0.1),
            Err(WallError::InvalidDimensions { .. })
        ));
        assert!(matches!(
            build_wall_prism(Vec3::ZERO, end, f32::NAN, 0.2),
            Err(WallError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_extend_for_overlap() {
        let (s, e) = extend_for_overlap(Vec3::ZERO, Vec3::new(0.0, 0.0, 2.0), 0.1);
        assert_relative_eq!(s.z, -0.1, epsilon = 1e-6);
        assert_relative_eq!(e.z, 2.1, epsilon = 1e-6);

        let (s, e) = extend_for_overlap(Vec3::ONE, Vec3::ONE, 0.1);
        assert_eq!((s, e), (Vec3::ONE, Vec3::ONE));
    }
}
