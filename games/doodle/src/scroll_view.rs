// scroll_view.rs
//
// Camera for a vertical climber. The scroll root carries a ceiling trigger
// over the top of the screen; everything playable lives under its `view`
// child. While the player rises inside the trigger, its upward speed is
// banked as pending scroll, and each tick a fraction of the pending scroll
// is applied by moving the view down.

use boing_engine::{
    Behaviour, Collider, ColliderTag, CollisionEvent, CollisionPhase, ComponentId, EngineError, Entity,
    EntityId, Rigidbody, World,
};
use glam::DVec2;

use crate::config::DoodleConfig;

#[derive(Debug)]
pub struct ScrollView {
    view: EntityId,
    smoothing: f64,
    pending: f64,
    highest: f64,
}

impl ScrollView {
    pub fn new(view: EntityId, smoothing: f64) -> Self {
        Self {
            view,
            smoothing,
            pending: 0.0,
            highest: 0.0,
        }
    }

    pub fn view(&self) -> EntityId {
        self.view
    }

    pub fn add_scroll_distance(&mut self, distance: f64) {
        self.pending += distance;
    }

    pub fn set_scroll_distance(&mut self, distance: f64) {
        self.pending = distance;
    }

    pub fn scroll_distance(&self) -> f64 {
        self.pending
    }

    /// Furthest the view has ever been scrolled.
    pub fn highest(&self) -> f64 {
        self.highest
    }

    pub fn smoothing(&self) -> f64 {
        self.smoothing
    }
}

impl Behaviour for ScrollView {
    fn update(&mut self, world: &mut World, _me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
        let step = self.pending * self.smoothing;
        let view = world
            .scene
            .transform_mut(self.view)
            .ok_or(EngineError::EntityNotFound(self.view))?;
        view.position.y += step;
        self.highest = self.highest.max(view.position.y);
        self.pending *= 1.0 - self.smoothing;
        Ok(())
    }

    boing_engine::behaviour_any!();
}

/// Spawn the scroll root and its view child. Returns `(root, view)`.
pub fn spawn_scroll_view(world: &mut World, config: &DoodleConfig) -> Result<(EntityId, EntityId), EngineError> {
    let root = world.next_id();
    let view = world.next_id();

    let trigger = Collider::rectangle(
        ColliderTag::Ceiling,
        DVec2::new(config.canvas_width, config.scroll_trigger_height()),
    )
    .with_listener(CollisionPhase::Stay, move |w, e| {
        if e.other_tag != ColliderTag::Player {
            return;
        }
        if let Err(err) = bank_rise(w, root, e) {
            w.report(err);
        }
    });

    world.spawn_root(
        Entity::new(root)
            .with_tag("scroll_view")
            .with_component(trigger)
            .with_behaviour(ScrollView::new(view, config.scroll_smoothing)),
    )?;
    world.spawn_child(root, Entity::new(view).with_tag("view"))?;
    Ok((root, view))
}

fn bank_rise(world: &mut World, root: EntityId, event: &CollisionEvent) -> Result<(), EngineError> {
    let rising = world
        .scene
        .get_component::<Rigidbody>(event.other.entity)
        .map(|body| body.velocity.y)
        .filter(|vy| *vy < 0.0);
    if let Some(vy) = rising {
        world.with_behaviour::<ScrollView, _, _>(root, |scroll, _| scroll.add_scroll_distance(-vy))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_scroll_drains_with_smoothing() {
        let config = DoodleConfig::default();
        let mut world = World::new();
        let (root, view) = spawn_scroll_view(&mut world, &config).unwrap();
        world.start();
        world
            .with_behaviour::<ScrollView, _, _>(root, |s, _| s.set_scroll_distance(100.0))
            .unwrap();

        world.tick(16.0).unwrap();
        assert!((world.scene.world_position(view).unwrap().y - 10.0).abs() < 1e-9);
        world.tick(16.0).unwrap();
        assert!((world.scene.world_position(view).unwrap().y - 19.0).abs() < 1e-9);

        let scroll = world.behaviour::<ScrollView>(root).unwrap();
        assert!((scroll.scroll_distance() - 81.0).abs() < 1e-9);
        assert!((scroll.highest() - 19.0).abs() < 1e-9);
    }

    #[test]
    fn rising_player_inside_trigger_banks_scroll() {
        let config = DoodleConfig::default();
        let mut world = World::new();
        let (root, view) = spawn_scroll_view(&mut world, &config).unwrap();
        let player = world.next_id();
        world
            .spawn_child(
                view,
                Entity::new(player)
                    .with_position(DVec2::new(200.0, 100.0))
                    .with_component(Rigidbody::new().with_velocity(DVec2::new(0.0, -10.0)))
                    .with_component(Collider::rectangle(ColliderTag::Player, DVec2::splat(50.0))),
            )
            .unwrap();

        // first tick enters, the second stays and banks the rise
        world.tick(16.0).unwrap();
        assert_eq!(world.behaviour::<ScrollView>(root).unwrap().scroll_distance(), 0.0);
        world.tick(16.0).unwrap();
        assert_eq!(world.behaviour::<ScrollView>(root).unwrap().scroll_distance(), 10.0);

        // the view moves down on the next tick, carrying the player
        world.tick(16.0).unwrap();
        assert!((world.scene.world_position(view).unwrap().y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn negative_scroll_moves_view_up_but_keeps_highest() {
        let config = DoodleConfig::default();
        let mut world = World::new();
        let (root, view) = spawn_scroll_view(&mut world, &config).unwrap();
        world
            .with_behaviour::<ScrollView, _, _>(root, |s, _| s.set_scroll_distance(500.0))
            .unwrap();
        world.tick(16.0).unwrap();
        world
            .with_behaviour::<ScrollView, _, _>(root, |s, _| s.set_scroll_distance(-600.0))
            .unwrap();
        world.tick(16.0).unwrap();
        assert!((world.scene.world_position(view).unwrap().y + 10.0).abs() < 1e-9);
        assert!((world.behaviour::<ScrollView>(root).unwrap().highest() - 50.0).abs() < 1e-9);
    }
}
