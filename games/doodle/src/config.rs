use serde::{Deserialize, Serialize};

/// Tuning for the whole game. Distances are in pixels, speeds in pixels per tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DoodleConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,

    pub player_size: f64,
    /// Horizontal speed while a direction key is held.
    pub player_speed: f64,
    pub player_gravity: f64,
    pub player_drag: f64,

    pub platform_width: f64,
    pub platform_height: f64,
    /// Upward speed given to a player landing on a platform.
    pub platform_bounce: f64,
    pub moving_platform_speed: f64,
    /// One spawned platform in this many slides sideways. 0 disables moving platforms.
    pub moving_platform_every: u32,

    /// Fraction of the pending scroll applied each tick.
    pub scroll_smoothing: f64,
    /// Height of the ceiling trigger, as a fraction of the canvas height.
    pub scroll_trigger_ratio: f64,

    /// Inset of the spawn area from both canvas sides.
    pub spawn_padding: f64,
    pub spawn_area_height: f64,
    pub min_platform_distance: f64,
    pub min_platforms: usize,
    pub max_spawn_attempts: u32,

    pub wall_thickness: f64,
    pub teleport_tolerance: f64,

    /// Scroll applied when the player falls out (negative scrolls the view up).
    pub game_over_scroll: f64,
    pub background_scroll: f64,

    pub seed: u64,
}

impl Default for DoodleConfig {
    fn default() -> Self {
        Self {
            canvas_width: 500.0,
            canvas_height: 700.0,
            player_size: 50.0,
            player_speed: 5.0,
            player_gravity: 0.5,
            player_drag: 0.0,
            platform_width: 60.0,
            platform_height: 20.0,
            platform_bounce: 15.0,
            moving_platform_speed: 2.0,
            moving_platform_every: 5,
            scroll_smoothing: 0.1,
            scroll_trigger_ratio: 1.0 / 2.5,
            spawn_padding: 20.0,
            spawn_area_height: 40.0,
            min_platform_distance: 20.0,
            min_platforms: 1,
            max_spawn_attempts: 100,
            wall_thickness: 10.0,
            teleport_tolerance: 2.0,
            game_over_scroll: -600.0,
            background_scroll: 750.0,
            seed: 0x5eed_d00d,
        }
    }
}

impl DoodleConfig {
    /// Parse a config from a JSON string. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn scroll_trigger_height(&self) -> f64 {
        self.canvas_height * self.scroll_trigger_ratio
    }
}
