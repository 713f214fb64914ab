//! Openings (doors)
//!
//! Placing a door on a wall removes every segment whose center falls
//! within the door's clearance radius, so no wall geometry is left behind
//! the opening. `OpeningPlanner` picks where the door goes: it snaps the
//! cursor onto the nearest wall, steps along it, and keeps the door clear
//! of the ends of that straight stretch.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::segment::{SegmentKey, WallSegment};
use super::segment_index::SegmentIndex;
use crate::game::economy::{EconomyOracle, PowerOracle};
use crate::render::SceneBackend;

/// Physical and economic parameters of an opening.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningSpec {
    pub name: String,
    /// Opening width along the wall (meters)
    pub width: f32,
    /// Extra clearance beyond half the width
    pub margin: f32,
    /// Cursor must be this close to a wall to plan a placement
    pub snap_distance: f32,
    /// Step size when sliding the opening along a wall
    pub along_snap: f32,
    pub cost: i64,
    pub power_draw: i64,
}

impl Default for OpeningSpec {
    fn default() -> Self {
        Self {
            name: "Door".to_string(),
            width: 2.0,
            margin: 0.1,
            snap_distance: 1.5,
            along_snap: 0.5,
            cost: 100,
            power_draw: 0,
        }
    }
}

impl OpeningSpec {
    /// Segments centered closer than this to the opening are removed.
    pub fn clearance_radius(&self) -> f32 {
        self.width / 2.0 + self.margin
    }
}

/// Where an opening would go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningPlan {
    pub position: Vec3,
    /// Rotation about +Y in degrees, in [0, 360)
    pub yaw_degrees: f32,
    /// Segment the cursor snapped to
    pub segment: SegmentKey,
    /// Unit direction of the wall stretch
    pub wall_direction: Vec3,
}

#[derive(Debug, Clone)]
pub enum OpeningOutcome {
    Placed { plan: OpeningPlan, removed: Vec<WallSegment> },
    InsufficientFunds { required: i64 },
}

// ============================================================================
// PLANNER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct OpeningPlanner {
    pub spec: OpeningSpec,
    /// Opening faces the other side of the wall
    flipped: bool,
}

impl OpeningPlanner {
    pub fn new(spec: OpeningSpec) -> Self {
        Self { spec, flipped: false }
    }

    /// Flip the opening to face the other way.
    pub fn rotate(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    /// Plan a placement for the cursor, or `None` if no wall is close.
    pub fn plan<S: SceneBackend>(&self, index: &SegmentIndex<S>, cursor: Vec3) -> Option<OpeningPlan> {
        let segment = index.nearest(cursor, self.spec.snap_distance)?;
        let (run_start, run_end) = index.collinear_run(&segment.key)?;

        let run = run_end - run_start;
        let run_length = run.length();
        let direction = run.normalize_or_zero();
        if direction == Vec3::ZERO {
            return None;
        }

        let mut along = (segment.project(cursor) - run_start).dot(direction);
        if self.spec.along_snap > 0.0 {
            along = (along / self.spec.along_snap).round() * self.spec.along_snap;
        }
        let half = self.spec.width / 2.0;
        along = if run_length <= self.spec.width {
            run_length / 2.0
        } else {
            along.clamp(half, run_length - half)
        };

        let mut yaw = direction.x.atan2(direction.z).to_degrees();
        if self.flipped {
            yaw += 180.0;
        }

        Some(OpeningPlan {
            position: run_start + direction * along,
            yaw_degrees: yaw.rem_euclid(360.0),
            segment: segment.key,
            wall_direction: direction,
        })
    }
}

// ============================================================================
// CUTTER
// ============================================================================

pub struct OpeningCutter<E: EconomyOracle, P: PowerOracle> {
    pub planner: OpeningPlanner,
    economy: E,
    power: P,
}

impl<E: EconomyOracle, P: PowerOracle> OpeningCutter<E, P> {
    pub fn new(spec: OpeningSpec, economy: E, power: P) -> Self {
        Self {
            planner: OpeningPlanner::new(spec),
            economy,
            power,
        }
    }

    pub fn economy(&self) -> &E {
        &self.economy
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    /// Remove every segment centered strictly within `clearance_radius`.
    pub fn cut<S: SceneBackend>(&mut self, index: &mut SegmentIndex<S>, center: Vec3, clearance_radius: f32) -> usize {
        let removed = index.remove_in_range(center, clearance_radius).len();
        log::info!("[Opening] Cleared {removed} segments at {center}");
        removed
    }

    /// Pay for the opening, clear the wall behind it and register its load.
    pub fn place<S: SceneBackend>(&mut self, index: &mut SegmentIndex<S>, plan: OpeningPlan) -> OpeningOutcome {
        let spec = &self.planner.spec;
        let required = spec.cost;
        if !self.economy.spend(required) {
            log::warn!("[Opening] Cannot afford {} ({required})", spec.name);
            return OpeningOutcome::InsufficientFunds { required };
        }

        let removed = index.remove_in_range(plan.position, spec.clearance_radius());
        if spec.power_draw > 0 {
            self.power.register_consumer(spec.power_draw);
        }
        log::info!(
            "[Opening] Placed {} at {} (yaw {:.0}), removed {} segments",
            spec.name,
            plan.position,
            plan.yaw_degrees,
            removed.len()
        );

        OpeningOutcome::Placed { plan, removed }
    }
}
