//! Outlines for colliders marked `debug`.
//!
//! Colliders built with `with_debug(true)` get an outline appended to the draw
//! list after all layers have rendered. Runs automatically at the end of each
//! `World::tick`.

use crate::components::collider::Collider;
use crate::core::geometry::WorldShape;
use crate::core::physics::Physics;
use crate::core::scene::Scene;
use crate::renderer::draw::{Color, DrawCommand, DrawList};

/// Color for colliders currently touching something.
pub const COLLIDING: Color = Color::RED;
/// Color for idle colliders.
pub const IDLE: Color = Color::GREEN;

/// Outline every registered collider that has `debug` set, in registration order.
pub fn debug_draw_colliders(scene: &Scene, physics: &Physics, draw_list: &mut DrawList) {
    for (_, cid) in physics.registry.snapshot() {
        let Some(collider) = scene.collider(cid) else {
            continue;
        };
        if !collider.debug {
            continue;
        }
        let Some(shape) = scene.collider_shape(cid) else {
            continue;
        };
        draw_list.push(collider_outline(collider, &shape));
    }
}

fn collider_outline(collider: &Collider, shape: &WorldShape) -> DrawCommand {
    let color = if collider.colliding_colliders().is_empty() {
        IDLE
    } else {
        COLLIDING
    };
    match *shape {
        WorldShape::Rect(rect) => DrawCommand::Outline { rect, color },
        WorldShape::Circle { center, radius } => DrawCommand::CircleOutline { center, radius, color },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::ComponentId;
    use crate::components::collider::ColliderTag;
    use crate::components::entity::Entity;
    use crate::core::geometry::Rect;
    use crate::core::world::World;
    use glam::DVec2;

    fn spawn_collider(world: &mut World, pos: DVec2, debug: bool) -> ComponentId {
        let id = world.next_id();
        let entity = Entity::new(id)
            .with_position(pos)
            .with_component(Collider::rectangle(ColliderTag::Default, DVec2::splat(10.0)).with_debug(debug));
        let cid = entity.component_id::<Collider>().unwrap();
        world.spawn(entity);
        world.add_root(id).unwrap();
        cid
    }

    #[test]
    fn only_debug_colliders_are_outlined() {
        let mut world = World::new();
        spawn_collider(&mut world, DVec2::new(0.0, 0.0), true);
        spawn_collider(&mut world, DVec2::new(100.0, 0.0), false);

        let mut list = DrawList::new();
        debug_draw_colliders(&world.scene, &world.physics, &mut list);
        assert_eq!(
            list.commands,
            vec![DrawCommand::Outline {
                rect: Rect::new(0.0, 0.0, 10.0, 10.0),
                color: IDLE,
            }]
        );
    }

    #[test]
    fn tick_appends_outlines_after_layers() {
        let mut world = World::new();
        spawn_collider(&mut world, DVec2::new(0.0, 0.0), true);
        spawn_collider(&mut world, DVec2::new(5.0, 5.0), true);
        world.tick(16.0).unwrap();

        let colors: Vec<Color> = world
            .renderer
            .draw_list
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Outline { color, .. } => Some(*color),
                _ => None,
            })
            .collect();
        assert_eq!(colors, vec![COLLIDING, COLLIDING]);
    }
}
