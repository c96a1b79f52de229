use crate::api::game::{Game, GameConfig};
use crate::core::time::FixedTimestep;
use crate::core::world::World;
use crate::error::EngineError;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::draw::DrawList;

/// Generic game runner that wires a `Game` to a `World` and a tick source.
///
/// The host calls `tick` with the real frame delta; the runner slices it into
/// fixed steps, each one running `Game::update` and then `World::tick`.
/// The first error halts the runner for good.
pub struct GameRunner<G: Game> {
    game: G,
    world: World,
    input: InputQueue,
    timestep: FixedTimestep,
    config: GameConfig,
    initialized: bool,
    halted: bool,
}

impl<G: Game> GameRunner<G> {
    pub fn new(game: G) -> Self {
        let config = game.config();
        let timestep = FixedTimestep::new(config.fixed_dt_ms, config.max_steps);

        Self {
            game,
            world: World::new(),
            input: InputQueue::new(),
            timestep,
            config,
            initialized: false,
            halted: false,
        }
    }

    /// Initialize the game and start the world. Call once after construction.
    pub fn init(&mut self) -> Result<(), EngineError> {
        if self.initialized {
            return Ok(());
        }
        self.config = self.game.config();
        self.timestep = FixedTimestep::new(self.config.fixed_dt_ms, self.config.max_steps);
        if let Err(err) = self.game.init(&mut self.world) {
            return Err(self.halt(err));
        }
        self.world.start();
        self.initialized = true;
        Ok(())
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one frame: as many fixed steps as the accumulated time allows.
    /// Returns the number of steps run.
    pub fn tick(&mut self, frame_ms: f64) -> Result<u32, EngineError> {
        if !self.initialized || self.halted {
            return Ok(0);
        }

        let steps = self.timestep.accumulate(frame_ms);
        let dt_ms = self.timestep.dt_ms();
        for _ in 0..steps {
            let result = self
                .game
                .update(&mut self.world, &self.input)
                .and_then(|()| self.world.tick(dt_ms));
            if let Err(err) = result {
                return Err(self.halt(err));
            }
        }

        // Drain input after update
        self.input.drain();
        Ok(steps)
    }

    fn halt(&mut self, err: EngineError) -> EngineError {
        log::error!("runner halted: {err}");
        self.halted = true;
        self.world.stop();
        err
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    pub fn game(&self) -> &G {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut G {
        &mut self.game
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn draw_list(&self) -> &DrawList {
        self.world.draw_list()
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn world_width(&self) -> f64 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f64 {
        self.config.world_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::entity::Entity;
    use crate::components::rigidbody::Rigidbody;
    use crate::input::queue::Key;

    struct Faller {
        body: Option<EntityId>,
        updates: u32,
        fail_at: Option<u32>,
        saw_space: bool,
    }

    impl Faller {
        fn new() -> Self {
            Self {
                body: None,
                updates: 0,
                fail_at: None,
                saw_space: false,
            }
        }
    }

    impl Game for Faller {
        fn config(&self) -> GameConfig {
            GameConfig {
                fixed_dt_ms: 10.0,
                max_steps: 4,
                ..GameConfig::default()
            }
        }

        fn init(&mut self, world: &mut World) -> Result<(), EngineError> {
            let id = world.next_id();
            world.spawn_root(Entity::new(id).with_component(Rigidbody::new().with_gravity(1.0)))?;
            self.body = Some(id);
            Ok(())
        }

        fn update(&mut self, _world: &mut World, input: &InputQueue) -> Result<(), EngineError> {
            self.updates += 1;
            self.saw_space |= input.is_held(Key::Space);
            if self.fail_at == Some(self.updates) {
                let id = self.body.unwrap_or(EntityId(0));
                return Err(EngineError::EntityNotFound(id));
            }
            Ok(())
        }
    }

    #[test]
    fn ticks_before_init_do_nothing() {
        let mut runner = GameRunner::new(Faller::new());
        assert_eq!(runner.tick(100.0), Ok(0));
        assert_eq!(runner.game().updates, 0);
    }

    #[test]
    fn frames_split_into_fixed_steps() {
        let mut runner = GameRunner::new(Faller::new());
        runner.init().unwrap();
        assert!(runner.world().is_started());

        assert_eq!(runner.tick(25.0), Ok(2));
        assert_eq!(runner.tick(5.0), Ok(1));
        assert_eq!(runner.tick(1000.0), Ok(4));
        assert_eq!(runner.game().updates, 7);
        assert_eq!(runner.world().elapsed_ms(), 70.0);

        let body = runner.game().body.unwrap();
        // gravity 1 per step: 1 + 2 + ... + 7
        assert_eq!(runner.world().scene.world_position(body).unwrap().y, 28.0);
    }

    #[test]
    fn input_is_visible_during_update() {
        let mut runner = GameRunner::new(Faller::new());
        runner.init().unwrap();
        runner.push_input(InputEvent::KeyDown { key: Key::Space });
        runner.tick(10.0).unwrap();
        assert!(runner.game().saw_space);
    }

    #[test]
    fn first_error_halts() {
        let mut game = Faller::new();
        game.fail_at = Some(2);
        let mut runner = GameRunner::new(game);
        runner.init().unwrap();

        assert!(runner.tick(30.0).is_err());
        assert!(runner.is_halted());
        assert!(!runner.world().is_started());
        assert_eq!(runner.tick(30.0), Ok(0));
        assert_eq!(runner.game().updates, 2);
    }
}
