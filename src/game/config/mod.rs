//! Config Module
//!
//! Centralized configuration for wall building.

pub mod wall_config;

pub use wall_config::WallConfig;
