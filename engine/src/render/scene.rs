//! Scene Collaborator
//!
//! The wall core never draws. It hands finished geometry to a
//! `SceneBackend`, receives an opaque entity id back, and later asks the
//! backend to despawn that entity. `HeadlessScene` is the in-memory backend
//! used by servers, tools and tests.

use std::collections::HashMap;

use super::mesh::WallMesh;

/// Opaque handle to a visible, hit-testable scene entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Renderer/scene collaborator.
pub trait SceneBackend {
    /// Create a visible entity displaying `mesh` with the given material.
    fn spawn_wall(&mut self, mesh: &WallMesh, material: &str) -> EntityId;

    /// Destroy an entity previously returned by `spawn_wall`.
    fn despawn(&mut self, entity: EntityId);
}

/// What the headless scene remembers about a live entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    pub material: String,
    pub vertex_count: usize,
    pub triangle_count: usize,
}

/// In-memory scene that only tracks entity lifetimes.
#[derive(Debug, Default)]
pub struct HeadlessScene {
    objects: HashMap<EntityId, SceneObject>,
    next_id: u64,
    spawned_total: u64,
    despawned_total: u64,
}

impl HeadlessScene {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            ..Self::default()
        }
    }

    /// Number of entities currently alive.
    pub fn live_count(&self) -> usize {
        self.objects.len()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.objects.contains_key(&entity)
    }

    pub fn get(&self, entity: EntityId) -> Option<&SceneObject> {
        self.objects.get(&entity)
    }

    pub fn spawned_total(&self) -> u64 {
        self.spawned_total
    }

    pub fn despawned_total(&self) -> u64 {
        self.despawned_total
    }
}

impl SceneBackend for HeadlessScene {
    fn spawn_wall(&mut self, mesh: &WallMesh, material: &str) -> EntityId {
        // Default-constructed scenes start at 0; keep ids non-zero either way
        self.next_id = self.next_id.max(1);
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.spawned_total += 1;
        self.objects.insert(
            id,
            SceneObject {
                material: material.to_string(),
                vertex_count: mesh.vertex_count(),
                triangle_count: mesh.triangle_count(),
            },
        );
        id
    }

    fn despawn(&mut self, entity: EntityId) {
        if self.objects.remove(&entity).is_some() {
            self.despawned_total += 1;
        } else {
            log::warn!("[Scene] Despawn of unknown entity {:?}", entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_and_despawn_lifecycle() {
        let mut scene = HeadlessScene::new();
        let mesh = WallMesh::new();
        let a = scene.spawn_wall(&mesh, "brick");
        let b = scene.spawn_wall(&mesh, "brick");
        assert_ne!(a, b);
        assert_eq!(scene.live_count(), 2);

        scene.despawn(a);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
        assert_eq!(scene.despawned_total(), 1);
    }

    #[test]
    fn test_double_despawn_is_ignored() {
        let mut scene = HeadlessScene::default();
        let a = scene.spawn_wall(&WallMesh::new(), "plaster");
        assert_eq!(a, EntityId(1));
        scene.despawn(a);
        scene.despawn(a);
        assert_eq!(scene.despawned_total(), 1);
        assert_eq!(scene.spawned_total(), 1);
    }
}
