//! Game Module
//!
//! Wall building systems that sit on top of the engine's grid and scene
//! layers.

pub mod config;
pub mod economy;
pub mod walls;

pub use config::WallConfig;
pub use economy::{EconomyOracle, NoPower, PowerGrid, PowerOracle, Wallet};
pub use walls::{
    ChainEvent, ChainPlacementController, OpeningCutter, RemovalTool, SegmentIndex, WallCatalog,
    WallError, WallSegment, WallType,
};
