//! Wallsmith Engine Library
//!
//! Segmented wall construction for grid-based building games. Walls are
//! drawn as polylines, stored as uniform segments, and can be cut for doors
//! or removed piece by piece.
//!
//! # Modules
//!
//! - [`world`] - Ground grid configuration, corner snapping and axis locking
//! - [`render`] - Mesh payloads and the scene collaborator interface
//! - [`game`] - Wall placement, segment index, openings, removal, economy
//!
//! # Example
//!
//! ```
//! use glam::Vec3;
//! use wallsmith_engine::game::walls::{ChainEvent, ChainPlacementController, SegmentIndex, WallCatalog};
//! use wallsmith_engine::game::{NoPower, WallConfig, Wallet};
//!
//! let mut index = SegmentIndex::headless();
//! let mut tool = ChainPlacementController::from_catalog(
//!     &WallCatalog::builtin(),
//!     1,
//!     WallConfig::default(),
//!     Wallet::new(500),
//!     NoPower,
//! )
//! .unwrap();
//!
//! tool.on_action(&mut index, Vec3::new(0.0, 0.0, 0.0));
//! tool.on_action(&mut index, Vec3::new(4.0, 0.0, 0.0));
//! let event = tool.on_action(&mut index, Vec3::new(4.0, 0.0, 0.0));
//!
//! assert!(matches!(event, ChainEvent::Committed(_)));
//! assert_eq!(index.len(), 4);
//! ```

pub mod render;
pub mod world;

// Game-specific modules (located in src/game/ directory)
#[path = "../../src/game/mod.rs"]
pub mod game;

pub use render::{EntityId, HeadlessScene, SceneBackend, WallMesh, WallVertex};
pub use world::{GridConfig, axis_lock, snap_to_corner};
