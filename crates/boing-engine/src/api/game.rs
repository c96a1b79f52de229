use serde::{Deserialize, Serialize};

use crate::core::world::World;
use crate::error::EngineError;
use crate::input::queue::InputQueue;

/// Configuration for the engine, provided by the game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Fixed timestep in milliseconds (default: 1000/60).
    pub fixed_dt_ms: f64,
    /// World width in game units.
    pub world_width: f64,
    /// World height in game units.
    pub world_height: f64,
    /// Maximum fixed steps run for a single frame (default: 10).
    pub max_steps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            fixed_dt_ms: 1000.0 / 60.0,
            world_width: 800.0,
            world_height: 600.0,
            max_steps: 10,
        }
    }
}

impl GameConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// The core contract every game must fulfill.
pub trait Game {
    /// Return engine configuration. Called once before init.
    fn config(&self) -> GameConfig {
        GameConfig::default()
    }

    /// Build the initial entity tree.
    fn init(&mut self, world: &mut World) -> Result<(), EngineError>;

    /// Called once per fixed step, before the world ticks. Input holds the
    /// events pushed since the previous frame.
    fn update(&mut self, world: &mut World, input: &InputQueue) -> Result<(), EngineError>;
}
