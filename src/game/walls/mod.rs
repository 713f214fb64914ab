//! Segmented Walls
//!
//! Walls are drawn as polylines on a grid and stored as uniform,
//! independently removable segments.
//!
//! - `prism`: oriented box mesh for one segment
//! - `segment` / `segment_index`: run decomposition and the segment store
//! - `placement`: the click-by-click drawing state machine
//! - `opening`: door placement that cuts segments out of a wall
//! - `removal`: single-segment deletion

pub mod catalog;
pub mod chain;
pub mod error;
pub mod opening;
pub mod placement;
pub mod prism;
pub mod removal;
pub mod segment;
pub mod segment_index;

pub use catalog::{WallCatalog, WallType};
pub use chain::WallChain;
pub use error::{Result, WallError};
pub use opening::{OpeningCutter, OpeningOutcome, OpeningPlan, OpeningPlanner, OpeningSpec};
pub use placement::{
    ChainCommit, ChainEvent, ChainPlacementController, ChainPreview, PlacementState, PreviewTint,
    SegmentRejection,
};
pub use prism::{GEOMETRY_EPSILON, build_wall_prism, extend_for_overlap};
pub use removal::{RemovalOutcome, RemovalTool};
pub use segment::{MIN_SEGMENT_LENGTH, RunPiece, SegmentKey, WallSegment, piece_count, split_run};
pub use segment_index::SegmentIndex;
