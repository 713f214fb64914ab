//! Wall Building Configuration
//!
//! Centralized tolerances and sizes for wall placement, segmentation and
//! removal. `Default` returns the tuned in-game values; every field can be
//! overridden from JSON and missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::game::walls::{MIN_SEGMENT_LENGTH, Result, WallError};
use crate::world::GridConfig;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallConfig {
    /// Corner-snapping grid
    pub grid: GridConfig,
    /// Nominal length of one stored wall segment (meters)
    pub segment_length: f32,
    /// Click this close to the first point (with 3+ points) closes the loop
    pub loop_close_tolerance: f32,
    /// Click this close to the last point finalizes without closing
    pub finalize_tolerance: f32,
    /// Candidate segments shorter than this are rejected
    pub min_segment_length: f32,
    /// Each segment mesh is extended by this much at both ends
    pub seam_overlap: f32,
    /// Cursor tolerance for single-segment removal
    pub removal_tolerance: f32,
    /// Length of the stub shown while hovering before the first click
    pub hover_stub_length: f32,
    /// Ghost snaps to the first point when hovered this close (3+ points)
    pub near_start_radius: f32,
    /// Cell size of the segment index's spatial buckets
    pub bucket_size: f32,
}

impl Default for WallConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            segment_length: 1.0,
            loop_close_tolerance: 0.2,
            finalize_tolerance: 0.1,
            min_segment_length: 0.1,
            seam_overlap: 0.1,
            removal_tolerance: 0.2,
            hover_stub_length: 0.2,
            near_start_radius: 0.5,
            bucket_size: 4.0,
        }
    }
}

impl WallConfig {
    /// Parse a JSON object; absent fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if !(config.segment_length >= MIN_SEGMENT_LENGTH && config.segment_length.is_finite()) {
            return Err(WallError::InvalidSegmentLength(config.segment_length));
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = WallConfig::from_json(r#"{"segment_length": 0.5, "grid": {"cell_size": 0.5}}"#)
            .unwrap();
        assert_eq!(config.segment_length, 0.5);
        assert_eq!(config.grid.cell_size, 0.5);
        assert!(config.grid.snap_enabled);
        assert_eq!(config.loop_close_tolerance, 0.2);
    }

    #[test]
    fn test_rejects_too_short_segment_length() {
        assert!(matches!(
            WallConfig::from_json(r#"{"segment_length": 0.0}"#),
            Err(WallError::InvalidSegmentLength(_))
        ));
        assert!(matches!(
            WallConfig::from_json(r#"{"segment_length": 0.004}"#),
            Err(WallError::InvalidSegmentLength(_))
        ));
    }
}
