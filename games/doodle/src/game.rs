use boing_engine::{EngineError, EntityId, Game, GameConfig, InputQueue, Key, World};
use glam::DVec2;

use crate::background::background_entity;
use crate::config::DoodleConfig;
use crate::game_over::{spawn_game_over_trigger, GameOverTargets, GameOverTrigger};
use crate::hud::{spawn_hud, Hud, ScoreCounter};
use crate::platform::{platform_entity, PlatformKind};
use crate::player::{player_entity, Control, Player};
use crate::scroll_view::spawn_scroll_view;
use crate::spawner::{spawn_platform_spawner, PlatformSpawner};
use crate::wall::spawn_walls;

/// Starting platforms, as offsets from the canvas centre.
const STARTING_PLATFORMS: [(f64, f64); 6] = [
    (-50.0, 190.0),
    (-150.0, 100.0),
    (50.0, 0.0),
    (-100.0, -100.0),
    (100.0, -200.0),
    (50.0, -400.0),
];

/// Ids of the entities the game talks to after init.
#[derive(Debug, Clone, Copy)]
pub struct Handles {
    pub player: EntityId,
    pub scroll_root: EntityId,
    pub view: EntityId,
    pub spawner: EntityId,
    pub game_over: EntityId,
    pub background: EntityId,
    pub hud: Hud,
}

pub struct Doodle {
    config: DoodleConfig,
    handles: Option<Handles>,
    game_over_logged: bool,
}

impl Doodle {
    pub fn new(config: DoodleConfig) -> Self {
        Self {
            config,
            handles: None,
            game_over_logged: false,
        }
    }

    pub fn doodle_config(&self) -> &DoodleConfig {
        &self.config
    }

    /// Available after `init`.
    pub fn handles(&self) -> Option<Handles> {
        self.handles
    }

    pub fn score(&self, world: &World) -> u64 {
        self.handles
            .and_then(|h| world.behaviour::<ScoreCounter>(h.hud.score))
            .map_or(0, ScoreCounter::score)
    }

    pub fn is_game_over(&self, world: &World) -> bool {
        self.handles
            .and_then(|h| world.behaviour::<GameOverTrigger>(h.game_over))
            .is_some_and(GameOverTrigger::is_over)
    }

    fn handles_or_err(&self) -> Result<Handles, EngineError> {
        self.handles
            .ok_or_else(|| EngineError::MissingDependency("doodle updated before init".to_string()))
    }
}

impl Default for Doodle {
    fn default() -> Self {
        Self::new(DoodleConfig::default())
    }
}

impl Game for Doodle {
    fn config(&self) -> GameConfig {
        GameConfig {
            world_width: self.config.canvas_width,
            world_height: self.config.canvas_height,
            ..GameConfig::default()
        }
    }

    fn init(&mut self, world: &mut World) -> Result<(), EngineError> {
        let config = &self.config;

        // spawn order is update order, and collision order within a tick
        let background = world.next_id();
        world.spawn_root(background_entity(background, config))?;

        let (scroll_root, view) = spawn_scroll_view(world, config)?;
        let game_over = spawn_game_over_trigger(world, GameOverTargets { scroll_root, background }, config)?;

        let player = world.next_id();
        world.spawn_child(view, player_entity(player, config))?;

        let centre = DVec2::new(config.canvas_width, config.canvas_height) / 2.0;
        let mut starting = Vec::with_capacity(STARTING_PLATFORMS.len());
        for (dx, dy) in STARTING_PLATFORMS {
            let id = world.next_id();
            let position = centre + DVec2::new(dx, dy);
            world.spawn_child(view, platform_entity(id, position, PlatformKind::Basic, config))?;
            starting.push(id);
        }

        spawn_walls(world, config)?;

        let spawner = spawn_platform_spawner(world, view, config)?;
        world.with_behaviour::<PlatformSpawner, _, _>(spawner, |s, _| {
            for id in starting {
                s.track(id);
            }
        })?;

        let hud = spawn_hud(world, scroll_root, config)?;

        self.handles = Some(Handles {
            player,
            scroll_root,
            view,
            spawner,
            game_over,
            background,
            hud,
        });
        self.game_over_logged = false;
        log::info!("doodle ready: {} entities", world.scene.len());
        Ok(())
    }

    fn update(&mut self, world: &mut World, input: &InputQueue) -> Result<(), EngineError> {
        let handles = self.handles_or_err()?;

        let control = Control {
            left: input.is_held(Key::Left) || input.is_held(Key::A),
            right: input.is_held(Key::Right) || input.is_held(Key::D),
        };
        world.with_behaviour::<Player, _, _>(handles.player, |p, _| p.control = control)?;

        if !self.game_over_logged && self.is_game_over(world) {
            self.game_over_logged = true;
            log::info!("final score {}", self.score(world));
        }
        Ok(())
    }
}
