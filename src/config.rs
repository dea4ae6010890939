use serde::{Deserialize, Serialize};

use crate::error::LevelError;

pub const GRAVITY: f32 = 1500.0;
pub const TILE_SIZE: f32 = 16.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    // World units per second squared.
    pub gravity: f32,
    pub tile_size: f32,
    pub solid_types: Vec<String>,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            tile_size: TILE_SIZE,
            solid_types: vec!["ground".to_string()],
        }
    }
}

impl LevelConfig {
    pub fn from_json(s: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(s)?)
    }
}
