//! Segment Index
//!
//! Authoritative store of placed wall segments. Wall runs come in whole and
//! are cut into uniform pieces; each piece gets its own prism mesh and
//! scene entity, and can later be removed on its own (single removal, door
//! cut-outs, teardown).
//!
//! Spatial queries go through a bucket grid keyed by segment center, so a
//! range query only looks at the buckets its circle touches.

use glam::{IVec2, Vec3};
use std::collections::HashMap;

use super::catalog::WallType;
use super::error::{Result, WallError};
use super::prism::{build_wall_prism, extend_for_overlap};
use super::segment::{KEY_SCALE, SegmentKey, WallSegment, split_run};
use crate::game::config::WallConfig;
use crate::render::{EntityId, HeadlessScene, SceneBackend, WallMesh};

/// A stored segment plus the geometry handed to the scene.
#[derive(Debug)]
struct StoredSegment {
    segment: WallSegment,
    mesh: WallMesh,
}

pub struct SegmentIndex<S: SceneBackend = HeadlessScene> {
    segments: HashMap<SegmentKey, StoredSegment>,
    /// Segment keys grouped by the bucket containing their center
    buckets: HashMap<IVec2, Vec<SegmentKey>>,
    by_entity: HashMap<EntityId, SegmentKey>,
    bucket_size: f32,
    /// Largest half-length ever stored; widens point queries
    max_half_length: f32,
    seam_overlap: f32,
    scene: S,
}

impl SegmentIndex<HeadlessScene> {
    /// Index backed by an in-memory scene, with default settings.
    pub fn headless() -> Self {
        Self::new(HeadlessScene::new(), &WallConfig::default())
    }
}

impl<S: SceneBackend> SegmentIndex<S> {
    pub fn new(scene: S, config: &WallConfig) -> Self {
        Self {
            segments: HashMap::new(),
            buckets: HashMap::new(),
            by_entity: HashMap::new(),
            bucket_size: config.bucket_size.max(0.1),
            max_half_length: 0.0,
            seam_overlap: config.seam_overlap.max(0.0),
            scene,
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn contains(&self, key: &SegmentKey) -> bool {
        self.segments.contains_key(key)
    }

    pub fn get(&self, key: &SegmentKey) -> Option<&WallSegment> {
        self.segments.get(key).map(|s| &s.segment)
    }

    /// Geometry the scene entity of `key` was built from.
    pub fn mesh(&self, key: &SegmentKey) -> Option<&WallMesh> {
        self.segments.get(key).map(|s| &s.mesh)
    }

    pub fn segment_for_entity(&self, entity: EntityId) -> Option<&WallSegment> {
        self.by_entity.get(&entity).and_then(|key| self.get(key))
    }

    /// All segments, sorted by key.
    pub fn segments(&self) -> Vec<&WallSegment> {
        let mut all: Vec<&WallSegment> = self.segments.values().map(|s| &s.segment).collect();
        all.sort_by_key(|s| s.key);
        all
    }

    // ------------------------------------------------------------------------
    // Insertion
    // ------------------------------------------------------------------------

    /// Cut `start..end` into uniform pieces and store each one.
    ///
    /// Pieces whose key already exists are skipped with a warning; the rest
    /// of the run is still placed. Returns the pieces actually inserted.
    pub fn add_wall(
        &mut self,
        start: Vec3,
        end: Vec3,
        wall_type: &WallType,
        segment_length: f32,
    ) -> Result<Vec<WallSegment>> {
        check_dimensions(wall_type)?;
        let pieces = split_run(start, end, segment_length)?;
        let mut inserted = Vec::with_capacity(pieces.len());

        for piece in pieces {
            let key = piece.key();
            if self.segments.contains_key(&key) {
                log::warn!("[Segment Index] Segment already exists: {key}");
                continue;
            }

            let (mesh_start, mesh_end) = extend_for_overlap(piece.start, piece.end, self.seam_overlap);
            let mesh = build_wall_prism(mesh_start, mesh_end, wall_type.height, wall_type.thickness)?;
            let entity = self.scene.spawn_wall(&mesh, &wall_type.material);

            let segment = WallSegment {
                key,
                start: piece.start,
                end: piece.end,
                wall_type: wall_type.id,
                segment_index: piece.index,
                total_segments: piece.total,
                length: piece.length(),
                entity,
            };
            log::debug!(
                "[Segment Index] Created {key} ({}/{})",
                piece.index + 1,
                piece.total
            );

            self.insert(segment.clone(), mesh);
            inserted.push(segment);
        }

        Ok(inserted)
    }

    fn insert(&mut self, segment: WallSegment, mesh: WallMesh) {
        let key = segment.key;
        self.max_half_length = self.max_half_length.max(segment.length / 2.0);
        self.buckets
            .entry(self.bucket_of(segment.center()))
            .or_default()
            .push(key);
        self.by_entity.insert(segment.entity, key);
        self.segments.insert(key, StoredSegment { segment, mesh });
    }

    /// True when every piece `add_wall` would cut from this run is taken.
    pub fn is_run_occupied(&self, start: Vec3, end: Vec3, segment_length: f32) -> bool {
        match split_run(start, end, segment_length) {
            Ok(pieces) => pieces.iter().all(|p| self.segments.contains_key(&p.key())),
            Err(_) => false,
        }
    }

    /// How many pieces `add_wall` would insert for this run.
    ///
    /// Fails exactly when `add_wall` would, so callers can charge for the
    /// new pieces before building them.
    pub fn count_new_pieces(
        &self,
        start: Vec3,
        end: Vec3,
        wall_type: &WallType,
        segment_length: f32,
    ) -> Result<usize> {
        check_dimensions(wall_type)?;
        let pieces = split_run(start, end, segment_length)?;
        Ok(pieces
            .iter()
            .filter(|p| !self.segments.contains_key(&p.key()))
            .count())
    }

    // ------------------------------------------------------------------------
    // Removal
    // ------------------------------------------------------------------------

    /// Remove every segment whose center is strictly within `radius`.
    ///
    /// A segment centered exactly `radius` away stays. Returns the removed
    /// segments sorted by key; their scene entities are already despawned.
    pub fn remove_in_range(&mut self, center: Vec3, radius: f32) -> Vec<WallSegment> {
        let mut doomed: Vec<SegmentKey> = self
            .candidates_near(center, radius)
            .into_iter()
            .filter(|key| {
                self.segments
                    .get(key)
                    .is_some_and(|s| s.segment.center().distance(center) < radius)
            })
            .collect();
        doomed.sort();

        let removed: Vec<WallSegment> = doomed.iter().filter_map(|key| self.release(key)).collect();
        log::info!(
            "[Segment Index] Removed {} segments within {radius}m of {center}",
            removed.len()
        );
        removed
    }

    /// Remove exactly one segment. Missing keys are a no-op.
    pub fn remove_one(&mut self, key: &SegmentKey) -> Option<WallSegment> {
        self.release(key)
    }

    /// Remove the segment displayed by a hit-tested scene entity.
    pub fn remove_entity(&mut self, entity: EntityId) -> Option<WallSegment> {
        let key = *self.by_entity.get(&entity)?;
        self.release(&key)
    }

    /// Remove everything. Returns how many segments were released.
    pub fn clear(&mut self) -> usize {
        let count = self.segments.len();
        for (_, stored) in self.segments.drain() {
            self.scene.despawn(stored.segment.entity);
        }
        self.buckets.clear();
        self.by_entity.clear();
        self.max_half_length = 0.0;
        count
    }

    fn release(&mut self, key: &SegmentKey) -> Option<WallSegment> {
        let stored = self.segments.remove(key)?;
        let bucket = self.bucket_of(stored.segment.center());
        if let Some(keys) = self.buckets.get_mut(&bucket) {
            keys.retain(|k| k != key);
            if keys.is_empty() {
                self.buckets.remove(&bucket);
            }
        }
        self.by_entity.remove(&stored.segment.entity);
        self.scene.despawn(stored.segment.entity);
        Some(stored.segment)
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Segments with `point` within `tolerance` of an endpoint or of the
    /// segment itself, nearest first.
    pub fn find_near_point(&self, point: Vec3, tolerance: f32) -> Vec<&WallSegment> {
        let mut near: Vec<(f32, &WallSegment)> = self
            .candidates_near(point, tolerance + self.max_half_length)
            .iter()
            .filter_map(|key| self.get(key))
            .filter_map(|segment| {
                let to_line = segment.distance_to(point);
                let near_end = point.distance(segment.start) < tolerance
                    || point.distance(segment.end) < tolerance;
                (near_end || to_line < tolerance).then_some((to_line, segment))
            })
            .collect();

        near.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.key.cmp(&b.1.key)));
        near.into_iter().map(|(_, s)| s).collect()
    }

    /// Nearest segment to `point` within `max_distance`.
    pub fn nearest(&self, point: Vec3, max_distance: f32) -> Option<&WallSegment> {
        self.find_near_point(point, max_distance).into_iter().next()
    }

    /// Extent of the straight stretch of wall containing `key`.
    ///
    /// Follows neighbours that share an endpoint and run parallel, in both
    /// directions. Returns the two far ends, ordered like the segment itself.
    pub fn collinear_run(&self, key: &SegmentKey) -> Option<(Vec3, Vec3)> {
        let origin = self.get(key)?;
        let direction = origin.direction();

        let walk = |from: Vec3, mut current: SegmentKey| -> Vec3 {
            let mut tip = from;
            let mut steps = 0;
            while steps <= self.segments.len() {
                let Some(next) = self.parallel_neighbour(tip, direction, current) else {
                    break;
                };
                tip = if same_point(next.start, tip) { next.end } else { next.start };
                current = next.key;
                steps += 1;
            }
            tip
        };

        Some((walk(origin.start, origin.key), walk(origin.end, origin.key)))
    }

    fn parallel_neighbour(&self, point: Vec3, direction: Vec3, exclude: SegmentKey) -> Option<&WallSegment> {
        self.candidates_near(point, self.max_half_length + 0.01)
            .iter()
            .filter(|k| **k != exclude)
            .filter_map(|k| self.get(k))
            .find(|s| {
                (same_point(s.start, point) || same_point(s.end, point))
                    && s.direction().dot(direction).abs() > 0.99
            })
    }

    /// Points where two or more segments meet at (roughly) a right angle.
    pub fn corners(&self) -> Vec<Vec3> {
        let mut ends: HashMap<(i64, i64), (Vec3, Vec<Vec3>)> = HashMap::new();
        for stored in self.segments.values() {
            let s = &stored.segment;
            for p in [s.start, s.end] {
                ends.entry(quantize_point(p))
                    .or_insert_with(|| (p, Vec::new()))
                    .1
                    .push(s.direction());
            }
        }

        let mut corners: Vec<((i64, i64), Vec3)> = ends
            .into_iter()
            .filter(|(_, (_, dirs))| {
                dirs.len() >= 2
                    && dirs
                        .iter()
                        .enumerate()
                        .any(|(i, a)| dirs[i + 1..].iter().any(|b| a.dot(*b).abs() < 0.1))
            })
            .map(|(q, (p, _))| (q, p))
            .collect();
        corners.sort_by_key(|(q, _)| *q);
        corners.into_iter().map(|(_, p)| p).collect()
    }

    // ------------------------------------------------------------------------
    // Buckets
    // ------------------------------------------------------------------------

    fn bucket_of(&self, p: Vec3) -> IVec2 {
        IVec2::new(
            (p.x / self.bucket_size).floor() as i32,
            (p.z / self.bucket_size).floor() as i32,
        )
    }

    /// Keys whose center could be within `reach` of `point`.
    fn candidates_near(&self, point: Vec3, reach: f32) -> Vec<SegmentKey> {
        let reach = reach.max(0.0);
        if !reach.is_finite() || !point.is_finite() {
            return self.segments.keys().copied().collect();
        }

        let min = self.bucket_of(point - Vec3::new(reach, 0.0, reach));
        let max = self.bucket_of(point + Vec3::new(reach, 0.0, reach));
        let span = (max.x as i64 - min.x as i64 + 1).saturating_mul(max.y as i64 - min.y as i64 + 1);
        if span > self.buckets.len() as i64 {
            return self.segments.keys().copied().collect();
        }

        let mut keys = Vec::new();
        for bx in min.x..=max.x {
            for bz in min.y..=max.y {
                if let Some(bucket) = self.buckets.get(&IVec2::new(bx, bz)) {
                    keys.extend_from_slice(bucket);
                }
            }
        }
        keys
    }
}

impl<S: SceneBackend> Drop for SegmentIndex<S> {
    fn drop(&mut self) {
        self.clear();
    }
}

fn check_dimensions(wall_type: &WallType) -> Result<()> {
    if wall_type.height > 0.0
        && wall_type.thickness > 0.0
        && wall_type.height.is_finite()
        && wall_type.thickness.is_finite()
    {
        Ok(())
    } else {
        Err(WallError::InvalidDimensions {
            height: wall_type.height,
            thickness: wall_type.thickness,
        })
    }
}

fn quantize_point(p: Vec3) -> (i64, i64) {
    ((p.x * KEY_SCALE).round() as i64, (p.z * KEY_SCALE).round() as i64)
}

fn same_point(a: Vec3, b: Vec3) -> bool {
    quantize_point(a) == quantize_point(b)
}
