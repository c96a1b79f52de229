use boing_engine::{
    Behaviour, Collider, ColliderTag, Color, ComponentId, EngineError, Entity, EntityId, RenderLayer,
    Rigidbody, SpriteRenderer, World,
};
use glam::DVec2;

use crate::config::DoodleConfig;

/// Left/right control state, set by the game from held keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Control {
    pub left: bool,
    pub right: bool,
}

impl Control {
    /// -1, 0 or 1.
    pub fn direction(&self) -> f64 {
        match (self.left, self.right) {
            (true, false) => -1.0,
            (false, true) => 1.0,
            _ => 0.0,
        }
    }
}

/// Steers the player's rigidbody from the control state. Gravity and the
/// bounce impulse come from the rigidbody and the platforms.
#[derive(Debug)]
pub struct Player {
    pub control: Control,
    speed: f64,
}

impl Player {
    pub fn new(speed: f64) -> Self {
        Self {
            control: Control::default(),
            speed,
        }
    }
}

impl Behaviour for Player {
    fn update(&mut self, world: &mut World, me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
        let speed = self.speed * self.control.direction();
        let body = world
            .scene
            .get_component_mut::<Rigidbody>(me.entity)
            .ok_or_else(|| EngineError::MissingDependency(format!("{} needs a rigidbody", me.entity)))?;
        body.velocity.x = speed;
        Ok(())
    }

    boing_engine::behaviour_any!();
}

/// Player entity: red square, centred on the canvas, falling.
pub fn player_entity(id: EntityId, config: &DoodleConfig) -> Entity {
    let size = DVec2::splat(config.player_size);
    let start = DVec2::new(config.canvas_width, config.canvas_height) / 2.0 - size / 2.0;
    Entity::new(id)
        .with_tag("player")
        .with_position(start)
        // steering runs before integration each tick
        .with_behaviour(Player::new(config.player_speed))
        .with_component(
            Rigidbody::new()
                .with_gravity(config.player_gravity)
                .with_drag(config.player_drag),
        )
        .with_component(Collider::rectangle(ColliderTag::Player, size))
        .with_component(
            SpriteRenderer::new(size)
                .with_layer(RenderLayer::Layer2)
                .with_color(Color::RED),
        )
}
