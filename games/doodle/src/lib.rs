//! Doodle: a vertical platformer on boing-engine.
//!
//! The player bounces off platforms while the view scrolls to follow it.
//! Platforms keep spawning above the screen and are recycled once they drop
//! below it. Falling off the bottom ends the game.

pub mod background;
pub mod config;
pub mod game;
pub mod game_over;
pub mod hud;
pub mod platform;
pub mod player;
pub mod scroll_view;
pub mod spawner;
pub mod wall;

pub use config::DoodleConfig;
pub use game::{Doodle, Handles};
