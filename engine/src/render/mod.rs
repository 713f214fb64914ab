//! Render Module
//!
//! Geometry payloads and the scene collaborator interface. Actual drawing
//! (materials, GPU buffers, tinting) belongs to the host renderer.

pub mod mesh;
pub mod scene;

pub use mesh::{WallMesh, WallVertex};
pub use scene::{EntityId, HeadlessScene, SceneBackend, SceneObject};
