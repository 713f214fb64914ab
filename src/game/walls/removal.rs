//! Removal Tool
//!
//! Deletes exactly one segment: the one nearest the cursor, or the one
//! shown by a hit-tested scene entity. The segment's power draw is handed
//! back to the grid before it goes.

use glam::Vec3;

use super::catalog::WallCatalog;
use super::segment::{SegmentKey, WallSegment};
use super::segment_index::SegmentIndex;
use crate::game::config::WallConfig;
use crate::game::economy::PowerOracle;
use crate::render::{EntityId, SceneBackend};

#[derive(Debug, Clone, PartialEq)]
pub enum RemovalOutcome {
    Removed(WallSegment),
    /// Nothing within tolerance; no-op
    NothingFound,
}

impl RemovalOutcome {
    pub fn removed(&self) -> Option<&WallSegment> {
        match self {
            Self::Removed(segment) => Some(segment),
            Self::NothingFound => None,
        }
    }
}

pub struct RemovalTool<P: PowerOracle> {
    catalog: WallCatalog,
    power: P,
    /// Cursor must be this close to a segment
    pub tolerance: f32,
}

impl<P: PowerOracle> RemovalTool<P> {
    /// Tool picking segments within `config.removal_tolerance` of the cursor.
    pub fn new(catalog: WallCatalog, power: P, config: &WallConfig) -> Self {
        Self {
            catalog,
            power,
            tolerance: config.removal_tolerance,
        }
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    /// Remove the segment nearest `point`, if one is within tolerance.
    pub fn remove_at<S: SceneBackend>(&mut self, index: &mut SegmentIndex<S>, point: Vec3) -> RemovalOutcome {
        let Some(key) = index.nearest(point, self.tolerance).map(|s| s.key) else {
            log::debug!("[Removal] No wall near {point}");
            return RemovalOutcome::NothingFound;
        };
        self.release_power(index, &key);
        self.finish(index.remove_one(&key))
    }

    /// Remove the segment displayed by `entity`.
    pub fn remove_entity<S: SceneBackend>(&mut self, index: &mut SegmentIndex<S>, entity: EntityId) -> RemovalOutcome {
        let Some(key) = index.segment_for_entity(entity).map(|s| s.key) else {
            log::debug!("[Removal] Entity {entity:?} is not a wall segment");
            return RemovalOutcome::NothingFound;
        };
        self.release_power(index, &key);
        self.finish(index.remove_one(&key))
    }

    fn release_power<S: SceneBackend>(&mut self, index: &SegmentIndex<S>, key: &SegmentKey) {
        let Some(segment) = index.get(key) else {
            return;
        };
        match self.catalog.get(segment.wall_type) {
            Some(wall_type) if wall_type.power_draw > 0 => {
                self.power.unregister_consumer(wall_type.power_draw);
            }
            Some(_) => {}
            None => log::warn!("[Removal] Unknown wall type {} on {}", segment.wall_type, segment.key),
        }
    }

    fn finish(&self, removed: Option<WallSegment>) -> RemovalOutcome {
        match removed {
            Some(segment) => {
                log::info!("[Removal] Removed {}", segment.key);
                RemovalOutcome::Removed(segment)
            }
            None => RemovalOutcome::NothingFound,
        }
    }
}
