// hud.rs
//
// Screen-space text: score, frame rate, title and controls.

use boing_engine::{Behaviour, Color, ComponentId, EngineError, Entity, EntityId, Label, World};
use glam::DVec2;

use crate::config::DoodleConfig;
use crate::scroll_view::ScrollView;

const FONT: &str = "Consolas";

/// Keeps the label next to it showing the furthest distance scrolled, in tens of pixels.
#[derive(Debug)]
pub struct ScoreCounter {
    scroll_root: EntityId,
    score: u64,
}

impl ScoreCounter {
    pub fn new(scroll_root: EntityId) -> Self {
        Self { scroll_root, score: 0 }
    }

    pub fn score(&self) -> u64 {
        self.score
    }
}

impl Behaviour for ScoreCounter {
    fn update(&mut self, world: &mut World, me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
        let highest = world
            .behaviour::<ScrollView>(self.scroll_root)
            .map(ScrollView::highest)
            .ok_or_else(|| EngineError::MissingDependency(format!("{} has no scroll view", self.scroll_root)))?;
        self.score = (highest / 10.0).floor().max(0.0) as u64;
        set_text(world, me.entity, format!("Score: {}", self.score))
    }

    boing_engine::behaviour_any!();
}

/// Counts ticks and refreshes its label roughly once a second of tick time.
#[derive(Debug, Default)]
pub struct FpsCounter {
    frames: u32,
    elapsed_ms: f64,
    fps: u32,
}

impl FpsCounter {
    pub fn fps(&self) -> u32 {
        self.fps
    }
}

impl Behaviour for FpsCounter {
    fn update(&mut self, world: &mut World, me: ComponentId, dt_ms: f64) -> Result<(), EngineError> {
        self.frames += 1;
        self.elapsed_ms += dt_ms;
        if self.elapsed_ms <= 1000.0 {
            return Ok(());
        }
        self.fps = (f64::from(self.frames) * 1000.0 / self.elapsed_ms).round() as u32;
        self.frames = 0;
        self.elapsed_ms = 0.0;
        set_text(world, me.entity, format!("FPS: {}", self.fps))
    }

    boing_engine::behaviour_any!();
}

fn set_text(world: &mut World, entity: EntityId, text: String) -> Result<(), EngineError> {
    world
        .scene
        .get_component_mut::<Label>(entity)
        .ok_or_else(|| EngineError::MissingDependency(format!("{entity} has no label")))?
        .set_text(text);
    Ok(())
}

fn label(text: &str, size: f64) -> Label {
    Label::new(text).with_font(size, FONT).with_color(Color::BLACK)
}

/// Entity ids of the HUD pieces the game reads back.
#[derive(Debug, Clone, Copy)]
pub struct Hud {
    pub score: EntityId,
    pub fps: EntityId,
}

pub fn spawn_hud(world: &mut World, scroll_root: EntityId, config: &DoodleConfig) -> Result<Hud, EngineError> {
    let (w, h) = (config.canvas_width, config.canvas_height);

    let score = world.next_id();
    world.spawn_root(
        Entity::new(score)
            .with_tag("score")
            .with_position(DVec2::new(20.0, 40.0))
            .with_component(label("Score: 0", 24.0))
            .with_behaviour(ScoreCounter::new(scroll_root)),
    )?;

    let fps = world.next_id();
    world.spawn_root(
        Entity::new(fps)
            .with_tag("fps")
            .with_position(DVec2::new(w - 80.0, h - 20.0))
            .with_component(label("FPS: 0", 16.0))
            .with_behaviour(FpsCounter::default()),
    )?;

    let title = world.next_id();
    world.spawn_root(
        Entity::new(title)
            .with_tag("title")
            .with_position(DVec2::new(w - 160.0, 40.0))
            .with_component(label("Doodle Jump", 24.0)),
    )?;

    let instructions = world.next_id();
    world.spawn_root(
        Entity::new(instructions)
            .with_tag("instructions")
            .with_position(DVec2::new(20.0, h - 20.0))
            .with_component(label("a/d or ← → to move.", 16.0)),
    )?;

    Ok(Hud { score, fps })
}
