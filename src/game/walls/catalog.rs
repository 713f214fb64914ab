//! Wall Catalog
//!
//! Buildable wall types: physical size, price per segment and power draw.
//! Loaded from JSON, with a small built-in default set.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::error::{Result, WallError};

/// One buildable wall type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WallType {
    pub id: u32,
    pub name: String,
    /// Price of one uniform segment
    pub cost_per_segment: i64,
    /// Power consumed per placed segment (kW)
    #[serde(default)]
    pub power_draw: i64,
    pub thickness: f32,
    pub height: f32,
    /// Material/prefab name handed to the renderer
    #[serde(default = "default_material")]
    pub material: String,
}

fn default_material() -> String {
    "wall_default".to_string()
}

/// All wall types, keyed by id.
#[derive(Clone, Debug, Default)]
pub struct WallCatalog {
    types: HashMap<u32, WallType>,
}

impl WallCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON array of wall types.
    pub fn from_json(json: &str) -> Result<Self> {
        let entries: Vec<WallType> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        for entry in entries {
            catalog.insert(entry);
        }
        Ok(catalog)
    }

    /// Add or replace a wall type.
    pub fn insert(&mut self, wall_type: WallType) {
        if self.types.insert(wall_type.id, wall_type.clone()).is_some() {
            log::warn!("[Catalog] Wall type {} redefined", wall_type.id);
        }
    }

    pub fn get(&self, id: u32) -> Option<&WallType> {
        self.types.get(&id)
    }

    /// Like `get`, but a miss is an error.
    pub fn require(&self, id: u32) -> Result<&WallType> {
        self.get(id).ok_or(WallError::UnknownWallType(id))
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WallType> {
        self.types.values()
    }

    /// Built-in wall types.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        catalog.insert(WallType {
            id: 1,
            name: "Drywall".to_string(),
            cost_per_segment: 50,
            power_draw: 0,
            thickness: 0.2,
            height: 2.5,
            material: "drywall".to_string(),
        });
        catalog.insert(WallType {
            id: 2,
            name: "Brick".to_string(),
            cost_per_segment: 80,
            power_draw: 0,
            thickness: 0.3,
            height: 2.5,
            material: "brick".to_string(),
        });
        catalog.insert(WallType {
            id: 3,
            name: "Glass Partition".to_string(),
            cost_per_segment: 120,
            power_draw: 0,
            thickness: 0.1,
            height: 2.5,
            material: "glass".to_string(),
        });
        catalog.insert(WallType {
            id: 4,
            name: "Heated Wall".to_string(),
            cost_per_segment: 150,
            power_draw: 2,
            thickness: 0.25,
            height: 2.5,
            material: "heated_plaster".to_string(),
        });
        catalog
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_json() {
        let json = r#"[
            {"id": 7, "name": "Fence", "cost_per_segment": 10, "thickness": 0.05, "height": 1.2},
            {"id": 8, "name": "Lit Wall", "cost_per_segment": 90, "power_draw": 3,
             "thickness": 0.2, "height": 3.0, "material": "neon"}
        ]"#;
        let catalog = WallCatalog::from_json(json).unwrap();
        assert_eq!(catalog.len(), 2);
        let fence = catalog.get(7).unwrap();
        assert_eq!(fence.power_draw, 0);
        assert_eq!(fence.material, "wall_default");
        assert_eq!(catalog.get(8).unwrap().power_draw, 3);
    }

    #[test]
    fn test_malformed_json_is_config_error() {
        let err = WallCatalog::from_json("[{\"id\": 1}]").unwrap_err();
        assert!(matches!(err, WallError::Config(_)));
    }

    #[test]
    fn test_require_unknown_type() {
        let catalog = WallCatalog::builtin();
        assert!(catalog.require(1).is_ok());
        assert!(matches!(catalog.require(99), Err(WallError::UnknownWallType(99))));
    }
}
