//! Chain Placement Controller
//!
//! Click-by-click wall drawing. The first click seeds a chain; each later
//! click is snapped to a grid corner, axis-locked against the previous
//! point and validated before it is appended. The chain is committed to
//! the segment index when the user clicks back on the first point (loop
//! closure) or clicks the last point again (finalize).
//!
//! Validation rules, applied both to live previews and again at commit:
//! - runs shorter than the minimum length are rejected
//! - runs whose pieces are all already stored are rejected
//! - runs are rejected while funds are below one segment's cost

use glam::Vec3;

use super::catalog::{WallCatalog, WallType};
use super::chain::WallChain;
use super::error::Result;
use super::prism::{GEOMETRY_EPSILON, build_wall_prism};
use super::segment::{WallSegment, piece_count};
use super::segment_index::SegmentIndex;
use crate::game::config::WallConfig;
use crate::game::economy::{EconomyOracle, PowerOracle};
use crate::render::{SceneBackend, WallMesh};
use crate::world::axis_lock;

/// Preview opacity for runs already accepted into the chain
pub const CONFIRMED_ALPHA: f32 = 0.6;
/// Preview opacity for the segment following the cursor
pub const GHOST_ALPHA: f32 = 0.5;
/// Ghost opacity when the next click would close the loop
pub const CLOSING_ALPHA: f32 = 0.7;
/// Stub opacity before the first click
pub const HOVER_STUB_ALPHA: f32 = 0.3;

/// Why a candidate run was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentRejection {
    /// Shorter than the minimum segment length
    TooShort,
    /// Every piece of the run is already placed
    Occupied,
    /// Not enough money for the run (or, live, for one segment)
    InsufficientFunds,
    /// Geometry could not be built
    Degenerate,
}

/// Controller state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    /// No chain in progress
    Idle,
    /// Chain has at least one point
    Drawing,
}

/// How a preview should be tinted by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewTint {
    Valid,
    Blocked,
    /// Valid, and would close the loop
    Closing,
}

/// A preview segment for the renderer to draw.
#[derive(Debug, Clone)]
pub struct ChainPreview {
    pub start: Vec3,
    pub end: Vec3,
    /// Prism for the run, absent when the run is too short to build
    pub mesh: Option<WallMesh>,
    pub tint: PreviewTint,
    pub alpha: f32,
    /// Set when the preview is blocked
    pub rejection: Option<SegmentRejection>,
}

/// Result of committing a chain.
#[derive(Debug, Clone, Default)]
pub struct ChainCommit {
    /// Pieces stored in the segment index, in drawing order
    pub placed: Vec<WallSegment>,
    /// Runs dropped at commit time, with the reason
    pub skipped_runs: Vec<(Vec3, Vec3, SegmentRejection)>,
    pub spent: i64,
    pub power_registered: i64,
    /// Committed by clicking back on the first point
    pub closed_loop: bool,
}

/// Events emitted by the controller
#[derive(Debug, Clone)]
pub enum ChainEvent {
    /// First point placed
    Started { point: Vec3 },
    /// A run was accepted; draw its preview and a corner marker
    PointAdded { preview: ChainPreview, corner: Vec3 },
    /// The click was refused; chain unchanged
    Rejected {
        start: Vec3,
        end: Vec3,
        reason: SegmentRejection,
    },
    /// Chain committed to the segment index
    Committed(ChainCommit),
    /// Finalize refused because the whole chain is unaffordable
    Aborted { required: i64 },
    /// Chain discarded without committing
    Cancelled,
    /// Nothing to do in the current state
    Ignored,
}

pub struct ChainPlacementController<E: EconomyOracle, P: PowerOracle> {
    /// Wall type used for new runs
    pub wall_type: WallType,
    pub config: WallConfig,
    economy: E,
    power: P,
    chain: Option<WallChain>,
    /// Previews of accepted runs in the current chain
    confirmed: Vec<ChainPreview>,
}

impl<E: EconomyOracle, P: PowerOracle> ChainPlacementController<E, P> {
    pub fn new(wall_type: WallType, config: WallConfig, economy: E, power: P) -> Self {
        Self {
            wall_type,
            config,
            economy,
            power,
            chain: None,
            confirmed: Vec::new(),
        }
    }

    /// Controller drawing the catalog entry `wall_type_id`.
    pub fn from_catalog(
        catalog: &WallCatalog,
        wall_type_id: u32,
        config: WallConfig,
        economy: E,
        power: P,
    ) -> Result<Self> {
        let wall_type = catalog.require(wall_type_id)?.clone();
        Ok(Self::new(wall_type, config, economy, power))
    }

    pub fn state(&self) -> PlacementState {
        if self.chain.is_some() {
            PlacementState::Drawing
        } else {
            PlacementState::Idle
        }
    }

    pub fn chain(&self) -> Option<&WallChain> {
        self.chain.as_ref()
    }

    pub fn confirmed_previews(&self) -> &[ChainPreview] {
        &self.confirmed
    }

    pub fn economy(&self) -> &E {
        &self.economy
    }

    pub fn power(&self) -> &P {
        &self.power
    }

    /// Switch wall type; an in-progress chain is discarded.
    pub fn set_wall_type(&mut self, wall_type: WallType) {
        if self.chain.is_some() {
            log::debug!("[Wall Chain] Wall type changed, discarding chain");
            self.reset();
        }
        self.wall_type = wall_type;
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    /// Handle a click at a ground-plane point.
    pub fn on_action<S: SceneBackend>(&mut self, index: &mut SegmentIndex<S>, point: Vec3) -> ChainEvent {
        let snapped = self.config.grid.snap_to_corner(point);

        let Some(chain) = &self.chain else {
            self.chain = Some(WallChain::start(snapped));
            log::debug!("[Wall Chain] Started at {snapped}");
            return ChainEvent::Started { point: snapped };
        };

        let first = chain.first();
        let last = chain.last();
        let count = chain.len();

        if count >= 3 && snapped.distance(first) < self.config.loop_close_tolerance {
            if let Err(reason) = self.validate(index, last, first) {
                log::debug!("[Wall Chain] Closing run rejected: {reason:?}");
                return ChainEvent::Rejected {
                    start: last,
                    end: first,
                    reason,
                };
            }
            if let Some(chain) = self.chain.as_mut() {
                chain.close_loop();
            }
            log::info!("[Wall Chain] Loop closed");
            return self.finalize(index);
        }

        if snapped.distance(last) < self.config.finalize_tolerance {
            return self.finalize(index);
        }

        let locked = axis_lock(last, snapped);
        match self.validate(index, last, locked) {
            Ok(()) => {
                let preview = self.preview(last, locked, Ok(()), CONFIRMED_ALPHA, false);
                self.confirmed.push(preview.clone());
                if let Some(chain) = self.chain.as_mut() {
                    chain.push(locked);
                }
                log::debug!("[Wall Chain] Point {} at {locked}", count + 1);
                ChainEvent::PointAdded {
                    preview,
                    corner: locked,
                }
            }
            Err(reason) => {
                log::debug!("[Wall Chain] Run {last} -> {locked} rejected: {reason:?}");
                ChainEvent::Rejected {
                    start: last,
                    end: locked,
                    reason,
                }
            }
        }
    }

    /// Live preview for the cursor position. Does not change state.
    pub fn on_hover<S: SceneBackend>(&self, index: &SegmentIndex<S>, point: Vec3) -> Option<ChainPreview> {
        let snapped = self.config.grid.snap_to_corner(point);

        let Some(chain) = &self.chain else {
            let end = snapped + Vec3::X * self.config.hover_stub_length;
            let verdict = if self.economy.can_afford(self.wall_type.cost_per_segment) {
                Ok(())
            } else {
                Err(SegmentRejection::InsufficientFunds)
            };
            return Some(self.preview(snapped, end, verdict, HOVER_STUB_ALPHA, false));
        };

        let last = chain.last();
        if chain.len() >= 3 && snapped.distance(chain.first()) < self.config.near_start_radius {
            let first = chain.first();
            let verdict = self.validate(index, last, first);
            return Some(self.preview(last, first, verdict, CLOSING_ALPHA, true));
        }

        let locked = axis_lock(last, snapped);
        let verdict = self.validate(index, last, locked);
        Some(self.preview(last, locked, verdict, GHOST_ALPHA, false))
    }

    /// Discard the chain.
    pub fn on_cancel(&mut self) -> ChainEvent {
        if self.chain.is_none() {
            return ChainEvent::Ignored;
        }
        self.reset();
        log::debug!("[Wall Chain] Cancelled");
        ChainEvent::Cancelled
    }

    /// Commit the chain without closing the loop.
    pub fn on_finalize<S: SceneBackend>(&mut self, index: &mut SegmentIndex<S>) -> ChainEvent {
        if self.chain.is_none() {
            return ChainEvent::Ignored;
        }
        self.finalize(index)
    }

    /// Walls are always axis-aligned; rotation does nothing.
    pub fn on_rotate(&mut self) -> ChainEvent {
        ChainEvent::Ignored
    }

    // ------------------------------------------------------------------------
    // Validation and commit
    // ------------------------------------------------------------------------

    fn validate<S: SceneBackend>(
        &self,
        index: &SegmentIndex<S>,
        start: Vec3,
        end: Vec3,
    ) -> std::result::Result<(), SegmentRejection> {
        if start.distance(end) < self.config.min_segment_length {
            return Err(SegmentRejection::TooShort);
        }
        if index.is_run_occupied(start, end, self.config.segment_length) {
            return Err(SegmentRejection::Occupied);
        }
        if !self.economy.can_afford(self.wall_type.cost_per_segment) {
            return Err(SegmentRejection::InsufficientFunds);
        }
        Ok(())
    }

    fn preview(
        &self,
        start: Vec3,
        end: Vec3,
        verdict: std::result::Result<(), SegmentRejection>,
        alpha: f32,
        closing: bool,
    ) -> ChainPreview {
        let mesh = build_wall_prism(start, end, self.wall_type.height, self.wall_type.thickness).ok();
        let tint = match verdict {
            Err(_) => PreviewTint::Blocked,
            Ok(()) if closing => PreviewTint::Closing,
            Ok(()) => PreviewTint::Valid,
        };
        ChainPreview {
            start,
            end,
            mesh,
            tint,
            alpha,
            rejection: verdict.err(),
        }
    }

    fn reset(&mut self) {
        self.chain = None;
        self.confirmed.clear();
    }

    fn finalize<S: SceneBackend>(&mut self, index: &mut SegmentIndex<S>) -> ChainEvent {
        let Some(chain) = self.chain.take() else {
            return ChainEvent::Ignored;
        };
        self.confirmed.clear();

        if !chain.is_committable() {
            log::debug!("[Wall Chain] Finalized with a single point, nothing placed");
            return ChainEvent::Cancelled;
        }

        let seg_len = self.config.segment_length;
        let cost = self.wall_type.cost_per_segment;
        let total_pieces: usize = chain
            .runs()
            .filter(|(a, b)| a.distance(*b) >= GEOMETRY_EPSILON)
            .map(|(a, b)| piece_count(a.distance(b), seg_len))
            .sum();
        let required = total_pieces as i64 * cost;
        if !self.economy.can_afford(required) {
            log::warn!("[Wall Chain] Cannot afford chain: {total_pieces} segments cost {required}");
            return ChainEvent::Aborted { required };
        }

        let mut commit = ChainCommit {
            closed_loop: chain.is_closed(),
            ..Default::default()
        };

        // Runs commit in drawing order; each sees the ones before it
        for (start, end) in chain.runs() {
            if let Err(reason) = self.validate(index, start, end) {
                commit.skipped_runs.push((start, end, reason));
                continue;
            }

            let fresh = match index.count_new_pieces(start, end, &self.wall_type, seg_len) {
                Ok(fresh) => fresh,
                Err(e) => {
                    log::warn!("[Wall Chain] Run {start} -> {end} not built: {e}");
                    commit.skipped_runs.push((start, end, SegmentRejection::Degenerate));
                    continue;
                }
            };

            // Pay first; a refused spend places nothing
            let run_cost = fresh as i64 * cost;
            if !self.economy.spend(run_cost) {
                log::debug!("[Wall Chain] Run {start} -> {end} skipped, cannot pay {run_cost}");
                commit
                    .skipped_runs
                    .push((start, end, SegmentRejection::InsufficientFunds));
                continue;
            }
            commit.spent += run_cost;

            let placed = match index.add_wall(start, end, &self.wall_type, seg_len) {
                Ok(placed) => placed,
                Err(e) => {
                    log::warn!("[Wall Chain] Run {start} -> {end} paid but not built: {e}");
                    commit.skipped_runs.push((start, end, SegmentRejection::Degenerate));
                    continue;
                }
            };
            commit.placed.extend(placed);
        }

        let load = commit.placed.len() as i64 * self.wall_type.power_draw;
        if load > 0 {
            self.power.register_consumer(load);
            commit.power_registered = load;
        }

        log::info!(
            "[Wall Chain] Committed {} segments ({} runs skipped), spent {}",
            commit.placed.len(),
            commit.skipped_runs.len(),
            commit.spent
        );
        ChainEvent::Committed(commit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::economy::{NoPower, PowerGrid, Wallet};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn v(x: f32, z: f32) -> Vec3 {
        Vec3::new(x, 0.0, z)
    }

    fn controller(funds: i64) -> ChainPlacementController<Wallet, NoPower> {
        ChainPlacementController::from_catalog(
            &WallCatalog::builtin(),
            1,
            WallConfig::default(),
            Wallet::new(funds),
            NoPower,
        )
        .unwrap()
    }

    fn committed(event: ChainEvent) -> ChainCommit {
        match event {
            ChainEvent::Committed(commit) => commit,
            other => panic!("expected commit, got {other:?}"),
        }
    }

    #[test]
    fn test_first_click_snaps_and_starts() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(500);
        let event = ctl.on_action(&mut index, v(0.4, -0.3));
        assert!(matches!(event, ChainEvent::Started { point } if point == Vec3::ZERO));
        assert_eq!(ctl.state(), PlacementState::Drawing);
    }

    #[test]
    fn test_click_is_axis_locked() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(500);
        ctl.on_action(&mut index, Vec3::ZERO);
        let event = ctl.on_action(&mut index, v(3.2, 0.9));
        match event {
            ChainEvent::PointAdded { corner, preview } => {
                assert_eq!(corner, v(3.0, 0.0));
                assert_eq!(preview.alpha, CONFIRMED_ALPHA);
                assert_eq!(preview.tint, PreviewTint::Valid);
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(ctl.confirmed_previews().len(), 1);
    }

    #[test]
    fn test_finalize_commits_and_spends() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(500);
        ctl.on_action(&mut index, Vec3::ZERO);
        ctl.on_action(&mut index, v(4.0, 0.0));
        let commit = committed(ctl.on_action(&mut index, v(4.0, 0.0)));

        assert_eq!(commit.placed.len(), 4);
        assert_eq!(commit.spent, 200);
        assert!(!commit.closed_loop);
        assert_eq!(ctl.economy().balance(), 300);
        assert_eq!(index.len(), 4);
        assert_eq!(ctl.state(), PlacementState::Idle);
    }

    #[test]
    fn test_finalize_with_single_point_cancels() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(500);
        ctl.on_action(&mut index, v(2.0, 2.0));
        assert!(matches!(ctl.on_action(&mut index, v(2.0, 2.0)), ChainEvent::Cancelled));
        assert!(index.is_empty());
        assert_eq!(ctl.state(), PlacementState::Idle);
    }

    #[test]
    fn test_unaffordable_chain_aborts() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(120);
        ctl.on_action(&mut index, Vec3::ZERO);
        ctl.on_action(&mut index, v(4.0, 0.0));
        let event = ctl.on_finalize(&mut index);
        assert!(matches!(event, ChainEvent::Aborted { required: 200 }));
        assert!(index.is_empty());
        assert_eq!(ctl.economy().balance(), 120);
        assert_eq!(ctl.state(), PlacementState::Idle);
    }

    #[test]
    fn test_rejects_occupied_run() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(1000);
        ctl.on_action(&mut index, Vec3::ZERO);
        ctl.on_action(&mut index, v(2.0, 0.0));
        ctl.on_finalize(&mut index);

        ctl.on_action(&mut index, v(2.0, 0.0));
        let event = ctl.on_action(&mut index, Vec3::ZERO);
        assert!(matches!(
            event,
            ChainEvent::Rejected {
                reason: SegmentRejection::Occupied,
                ..
            }
        ));
        assert_eq!(ctl.chain().map(WallChain::len), Some(1));
    }

    #[test]
    fn test_rejects_when_broke() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(10);
        ctl.on_action(&mut index, Vec3::ZERO);
        let event = ctl.on_action(&mut index, v(3.0, 0.0));
        assert!(matches!(
            event,
            ChainEvent::Rejected {
                reason: SegmentRejection::InsufficientFunds,
                ..
            }
        ));
    }

    #[test]
    fn test_loop_closure() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(1000);
        for p in [v(0.0, 0.0), v(4.0, 0.0), v(4.0, 4.0), v(0.0, 4.0)] {
            ctl.on_action(&mut index, p);
        }
        let commit = committed(ctl.on_action(&mut index, v(0.1, 0.05)));
        assert!(commit.closed_loop);
        assert_eq!(commit.placed.len(), 16);
        assert_eq!(index.corners().len(), 4);
    }

    #[test]
    fn test_hover_ghost_and_closing() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(1000);

        let stub = ctl.on_hover(&index, v(1.2, 1.1)).unwrap();
        assert_eq!(stub.start, v(1.0, 1.0));
        assert_eq!(stub.alpha, HOVER_STUB_ALPHA);

        for p in [v(0.0, 0.0), v(3.0, 0.0), v(3.0, 3.0)] {
            ctl.on_action(&mut index, p);
        }
        let ghost = ctl.on_hover(&index, v(1.0, 2.8)).unwrap();
        assert_eq!(ghost.end, v(1.0, 3.0));
        assert_eq!(ghost.alpha, GHOST_ALPHA);

        let closing = ctl.on_hover(&index, v(0.3, 0.2)).unwrap();
        assert_eq!(closing.end, Vec3::ZERO);
        assert_eq!(closing.tint, PreviewTint::Closing);
        assert_eq!(closing.alpha, CLOSING_ALPHA);

        let blocked = ctl.on_hover(&index, v(3.0, 3.0)).unwrap();
        assert_eq!(blocked.rejection, Some(SegmentRejection::TooShort));
        assert!(blocked.mesh.is_none());
    }

    #[test]
    fn test_cancel_discards_chain() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(1000);
        assert!(matches!(ctl.on_cancel(), ChainEvent::Ignored));
        ctl.on_action(&mut index, Vec3::ZERO);
        ctl.on_action(&mut index, v(2.0, 0.0));
        assert!(matches!(ctl.on_cancel(), ChainEvent::Cancelled));
        assert!(ctl.confirmed_previews().is_empty());
        assert!(index.is_empty());
        assert_eq!(ctl.economy().balance(), 1000);
    }

    /// Approves every check but only pays out what it actually holds.
    struct Allowance {
        balance: i64,
        spends: Vec<i64>,
    }

    impl EconomyOracle for Allowance {
        fn can_afford(&self, _amount: i64) -> bool {
            true
        }

        fn spend(&mut self, amount: i64) -> bool {
            if amount > self.balance {
                return false;
            }
            self.balance -= amount;
            self.spends.push(amount);
            true
        }
    }

    #[test]
    fn test_runs_skipped_once_funds_run_out() {
        let mut index = SegmentIndex::headless();
        let mut ctl = ChainPlacementController::from_catalog(
            &WallCatalog::builtin(),
            1,
            WallConfig::default(),
            Allowance {
                balance: 250,
                spends: Vec::new(),
            },
            NoPower,
        )
        .unwrap();

        ctl.on_action(&mut index, Vec3::ZERO);
        ctl.on_action(&mut index, v(3.0, 0.0));
        ctl.on_action(&mut index, v(3.0, 3.0));
        ctl.on_action(&mut index, v(1.0, 3.0));
        let commit = committed(ctl.on_finalize(&mut index));

        // First run paid (150); second needs 150 with 100 left; third needs 100
        assert_eq!(ctl.economy().spends, vec![150, 100]);
        assert_eq!(ctl.economy().balance, 0);
        assert_eq!(commit.spent, 250);
        assert_eq!(commit.skipped_runs.len(), 1);
        assert_eq!(
            commit.skipped_runs[0],
            (v(3.0, 0.0), v(3.0, 3.0), SegmentRejection::InsufficientFunds)
        );

        // Every stored piece was paid for
        assert_eq!(commit.placed.len(), 5);
        assert_eq!(index.len(), 5);
        assert_eq!(index.len() as i64 * 50, commit.spent);
        assert!(!index.is_run_occupied(v(3.0, 0.0), v(3.0, 3.0), 1.0));
    }

    #[test]
    fn test_duplicate_run_in_chain_is_skipped() {
        let mut index = SegmentIndex::headless();
        let mut ctl = controller(1000);
        // Out and back along the same line
        ctl.on_action(&mut index, Vec3::ZERO);
        ctl.on_action(&mut index, v(3.0, 0.0));
        ctl.on_action(&mut index, Vec3::ZERO);
        let commit = committed(ctl.on_finalize(&mut index));
        assert_eq!(commit.placed.len(), 3);
        assert_eq!(commit.spent, 150);
        assert_eq!(commit.skipped_runs.len(), 1);
        assert_eq!(commit.skipped_runs[0].2, SegmentRejection::Occupied);
    }

    #[test]
    fn test_commit_registers_power() {
        let mut index = SegmentIndex::headless();
        let grid = Rc::new(RefCell::new(PowerGrid::default()));
        let mut ctl = ChainPlacementController::from_catalog(
            &WallCatalog::builtin(),
            4,
            WallConfig::default(),
            Wallet::new(1000),
            Rc::clone(&grid),
        )
        .unwrap();
        ctl.on_action(&mut index, Vec3::ZERO);
        ctl.on_action(&mut index, v(0.0, 3.0));
        let commit = committed(ctl.on_finalize(&mut index));
        assert_eq!(commit.power_registered, 6);
        assert_eq!(grid.borrow().consumption(), 6);
    }

    #[test]
    fn test_unknown_wall_type() {
        let result = ChainPlacementController::from_catalog(
            &WallCatalog::builtin(),
            99,
            WallConfig::default(),
            Wallet::default(),
            NoPower,
        );
        assert!(result.is_err());
    }
}
