// wall.rs
//
// Screen edges. A player that slips past one wall by more than the
// tolerance reappears just inside the other one. Moving platforms turn
// around on contact (see platform.rs).

use boing_engine::{
    Collider, ColliderTag, CollisionEvent, CollisionPhase, ComponentId, EngineError, Entity, EntityId, Rect,
    World,
};
use glam::DVec2;

use crate::config::DoodleConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Spawn both walls under a common root. Returns the root.
pub fn spawn_walls(world: &mut World, config: &DoodleConfig) -> Result<EntityId, EngineError> {
    let size = DVec2::new(config.wall_thickness, config.canvas_height);
    let root = world.next_id();
    world.spawn_root(Entity::new(root).with_tag("walls"))?;

    let left_id = world.next_id();
    let right_id = world.next_id();
    let left = Entity::new(left_id)
        .with_tag("left_wall")
        .with_position(DVec2::new(-config.wall_thickness, 0.0))
        .with_component(Collider::rectangle(ColliderTag::Wall, size));
    let right = Entity::new(right_id)
        .with_tag("right_wall")
        .with_position(DVec2::new(config.canvas_width, 0.0))
        .with_component(Collider::rectangle(ColliderTag::Wall, size));

    let no_collider = |id: EntityId| EngineError::MissingDependency(format!("{id} has no collider"));
    let left_collider = left.component_id::<Collider>().ok_or_else(|| no_collider(left_id))?;
    let right_collider = right.component_id::<Collider>().ok_or_else(|| no_collider(right_id))?;

    world.spawn_child(root, left)?;
    world.spawn_child(root, right)?;

    let tolerance = config.teleport_tolerance;
    world.on_collision(left_collider, CollisionPhase::Stay, move |w, e| {
        if e.other_tag != ColliderTag::Player {
            return;
        }
        if let Err(err) = wrap_player(w, e, Side::Left, right_collider, tolerance) {
            w.report(err);
        }
    })?;
    world.on_collision(right_collider, CollisionPhase::Stay, move |w, e| {
        if e.other_tag != ColliderTag::Player {
            return;
        }
        if let Err(err) = wrap_player(w, e, Side::Right, left_collider, tolerance) {
            w.report(err);
        }
    })?;
    Ok(root)
}

fn wrap_player(
    world: &mut World,
    event: &CollisionEvent,
    side: Side,
    opposite: ComponentId,
    tolerance: f64,
) -> Result<(), EngineError> {
    let wall = bounds(world, event.collider)?;
    let other_wall = bounds(world, opposite)?;
    let player = bounds(world, event.other)?;

    let new_left = match side {
        Side::Left if wall.right() - player.right() > tolerance => {
            other_wall.left() - player.width - tolerance
        }
        Side::Right if player.left() - wall.left() > tolerance => other_wall.right() + tolerance,
        _ => return Ok(()),
    };

    let entity = event.other.entity;
    let position = world
        .scene
        .world_position(entity)
        .ok_or(EngineError::EntityNotFound(entity))?;
    world
        .scene
        .set_world_position(entity, DVec2::new(position.x + new_left - player.left(), position.y))?;
    log::debug!("player wrapped past the {side:?} wall to x {new_left}");
    Ok(())
}

fn bounds(world: &World, cid: ComponentId) -> Result<Rect, EngineError> {
    world.scene.collider_bounds(cid).ok_or(EngineError::ComponentNotFound(cid))
}
