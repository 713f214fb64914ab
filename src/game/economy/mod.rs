//! Economy Module
//!
//! Money and power collaborators consulted by the building tools.

pub mod oracles;
pub mod power;
pub mod wallet;

pub use oracles::{EconomyOracle, NoPower, PowerOracle};
pub use power::{DEFAULT_CAPACITY, PowerGrid};
pub use wallet::{STARTING_MONEY, Wallet};
