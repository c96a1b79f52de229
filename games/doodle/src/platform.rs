use boing_engine::{
    Behaviour, Collider, ColliderTag, CollisionEvent, CollisionPhase, Color, ComponentId, EngineError,
    Entity, EntityId, RenderLayer, Rigidbody, SpriteRenderer, World,
};
use glam::DVec2;

use crate::config::DoodleConfig;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlatformKind {
    Basic,
    /// Slides sideways, bouncing between the walls. Direction is -1 or 1.
    Moving { speed: f64, direction: f64 },
}

/// Sideways motion of a moving platform.
#[derive(Debug)]
pub struct MovingPlatform {
    pub speed: f64,
    pub direction: f64,
}

impl Behaviour for MovingPlatform {
    fn update(&mut self, world: &mut World, me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
        let transform = world
            .scene
            .transform_mut(me.entity)
            .ok_or(EngineError::EntityNotFound(me.entity))?;
        transform.position.x += self.speed * self.direction;
        Ok(())
    }

    boing_engine::behaviour_any!();
}

/// Platform entity, positioned in the scroll view's local space.
pub fn platform_entity(id: EntityId, position: DVec2, kind: PlatformKind, config: &DoodleConfig) -> Entity {
    let size = DVec2::new(config.platform_width, config.platform_height);
    let bounce = config.platform_bounce;
    let mut collider =
        Collider::rectangle(ColliderTag::Platform, size).with_listener(CollisionPhase::Enter, move |w, e| {
            if e.other_tag != ColliderTag::Player {
                return;
            }
            if let Err(err) = bounce_player(w, e, bounce) {
                w.report(err);
            }
        });

    let entity = Entity::new(id).with_tag("platform").with_position(position);
    let entity = match kind {
        PlatformKind::Basic => entity,
        PlatformKind::Moving { speed, direction } => {
            collider = collider.with_listener(CollisionPhase::Enter, move |w, e| {
                if e.other_tag != ColliderTag::Wall {
                    return;
                }
                if let Err(err) = turn_at_wall(w, e) {
                    w.report(err);
                }
            });
            entity.with_behaviour(MovingPlatform { speed, direction })
        }
    };

    entity.with_component(collider).with_component(
        SpriteRenderer::new(size)
            .with_layer(RenderLayer::Layer1)
            .with_color(Color::from_rgb8(60, 160, 60)),
    )
}

/// A falling player lands on top and is launched upward.
fn bounce_player(world: &mut World, event: &CollisionEvent, bounce: f64) -> Result<(), EngineError> {
    let player = event.other.entity;
    let falling = world
        .scene
        .get_component::<Rigidbody>(player)
        .is_some_and(|body| body.velocity.y > 0.0);
    if !falling {
        return Ok(());
    }

    let platform = world
        .scene
        .collider_bounds(event.collider)
        .ok_or(EngineError::ComponentNotFound(event.collider))?;
    let feet = world
        .scene
        .collider_bounds(event.other)
        .ok_or(EngineError::ComponentNotFound(event.other))?;
    let position = world
        .scene
        .world_position(player)
        .ok_or(EngineError::EntityNotFound(player))?;
    let landed = DVec2::new(position.x, position.y + platform.top() - feet.bottom());
    world.scene.set_world_position(player, landed)?;

    if let Some(body) = world.scene.get_component_mut::<Rigidbody>(player) {
        body.velocity.y = -bounce;
    }
    Ok(())
}

fn turn_at_wall(world: &mut World, event: &CollisionEvent) -> Result<(), EngineError> {
    let me = world
        .scene
        .collider_bounds(event.collider)
        .ok_or(EngineError::ComponentNotFound(event.collider))?;
    let wall = world
        .scene
        .collider_bounds(event.other)
        .ok_or(EngineError::ComponentNotFound(event.other))?;
    let direction = if wall.center_x() > me.center_x() { -1.0 } else { 1.0 };
    world.with_behaviour::<MovingPlatform, _, _>(event.collider.entity, |platform, _| {
        platform.direction = direction;
    })
}
