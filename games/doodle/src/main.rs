//! Headless run: simulated frames with scripted steering, then a summary.
//!
//! Usage: `doodle [seconds] [config.json]`. Set `RUST_LOG=debug` for
//! per-platform detail.

use std::error::Error;

use boing_engine::{GameRunner, InputEvent, Key};
use doodle::{Doodle, DoodleConfig};

const FRAME_MS: f64 = 1000.0 / 60.0;

/// Steering pattern, repeated: (key held, frames).
const SCRIPT: [(Option<Key>, u32); 4] = [
    (Some(Key::D), 40),
    (None, 30),
    (Some(Key::A), 50),
    (None, 20),
];

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seconds: f64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 20.0,
    };
    let config = match args.next() {
        Some(path) => DoodleConfig::from_json(&std::fs::read_to_string(path)?)?,
        None => DoodleConfig::default(),
    };

    let mut runner = GameRunner::new(Doodle::new(config));
    runner.init()?;

    let frames = (seconds * 1000.0 / FRAME_MS).ceil() as u64;
    let mut script = SCRIPT.iter().cycle();
    let (mut held, mut remaining) = (None, 0);
    for frame in 0..frames {
        if remaining == 0 {
            if let Some(key) = held.take() {
                runner.push_input(InputEvent::KeyUp { key });
            }
            if let Some(&(next, count)) = script.next() {
                if let Some(key) = next {
                    runner.push_input(InputEvent::KeyDown { key });
                }
                held = next;
                remaining = count;
            }
        }
        remaining = remaining.saturating_sub(1);

        runner.tick(FRAME_MS)?;
        if runner.game().is_game_over(runner.world()) {
            log::info!("fell out after {:.1}s", frame as f64 * FRAME_MS / 1000.0);
            break;
        }
    }

    let game = runner.game();
    log::info!(
        "score {}, game over: {}, {} draw commands in the last frame",
        game.score(runner.world()),
        game.is_game_over(runner.world()),
        runner.draw_list().len()
    );
    Ok(())
}
