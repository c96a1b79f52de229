use boing_engine::{Behaviour, Color, ComponentId, EngineError, Entity, EntityId, RenderLayer, SpriteRenderer, World};
use glam::DVec2;

use crate::config::DoodleConfig;

/// Full-screen backdrop. Once the game is over it slides up out of view,
/// eased the same way as the scroll view.
#[derive(Debug)]
pub struct Background {
    smoothing: f64,
    game_over_scroll: f64,
    pending: f64,
    game_over: bool,
}

impl Background {
    pub fn new(game_over_scroll: f64, smoothing: f64) -> Self {
        Self {
            smoothing,
            game_over_scroll,
            pending: 0.0,
            game_over: false,
        }
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    pub fn set_game_over(&mut self) {
        if self.game_over {
            return;
        }
        self.game_over = true;
        self.pending = self.game_over_scroll;
    }
}

impl Behaviour for Background {
    fn update(&mut self, world: &mut World, me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
        if self.pending == 0.0 {
            return Ok(());
        }
        let step = self.pending * self.smoothing;
        world
            .scene
            .transform_mut(me.entity)
            .ok_or(EngineError::EntityNotFound(me.entity))?
            .position
            .y -= step;
        self.pending *= 1.0 - self.smoothing;
        Ok(())
    }

    boing_engine::behaviour_any!();
}

pub fn background_entity(id: EntityId, config: &DoodleConfig) -> Entity {
    Entity::new(id)
        .with_tag("background")
        .with_behaviour(Background::new(config.background_scroll, config.scroll_smoothing))
        .with_component(
            SpriteRenderer::new(DVec2::new(config.canvas_width, config.canvas_height))
                .with_layer(RenderLayer::Background)
                .with_color(Color::WHITE),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slides_up_only_after_game_over() {
        let config = DoodleConfig::default();
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(background_entity(id, &config)).unwrap();

        world.tick(16.0).unwrap();
        assert_eq!(world.scene.world_position(id).unwrap().y, 0.0);

        world.with_behaviour::<Background, _, _>(id, |b, _| b.set_game_over()).unwrap();
        world.tick(16.0).unwrap();
        assert!((world.scene.world_position(id).unwrap().y + 75.0).abs() < 1e-9);

        // a second game over does not restart the slide
        world.with_behaviour::<Background, _, _>(id, |b, _| b.set_game_over()).unwrap();
        world.tick(16.0).unwrap();
        assert!((world.scene.world_position(id).unwrap().y + 75.0 + 67.5).abs() < 1e-9);
    }
}
