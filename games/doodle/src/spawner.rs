// spawner.rs
//
// Keeps platforms coming. A spawn area sits just above the screen; when a
// platform scrolls out of it and too few are left inside, new ones are
// placed at random free spots in it. A despawn area below the screen catches
// platforms that scrolled off, deactivates them and pools them for reuse.

use boing_engine::{
    Behaviour, Collider, ColliderTag, CollisionPhase, ComponentId, EngineError, Entity, EntityId, Rect, Rng,
    World,
};
use glam::DVec2;

use crate::config::DoodleConfig;
use crate::platform::{platform_entity, PlatformKind};

#[derive(Debug)]
pub struct PlatformSpawner {
    view: EntityId,
    spawn_area: ComponentId,
    pool: Vec<EntityId>,
    spawned: Vec<EntityId>,
    rng: Rng,
    created: u32,
    config: DoodleConfig,
}

impl PlatformSpawner {
    pub fn new(view: EntityId, spawn_area: ComponentId, config: &DoodleConfig) -> Self {
        Self {
            view,
            spawn_area,
            pool: Vec::new(),
            spawned: Vec::new(),
            rng: Rng::new(config.seed),
            created: 0,
            config: config.clone(),
        }
    }

    /// Platforms currently out in the view.
    pub fn spawned(&self) -> &[EntityId] {
        &self.spawned
    }

    pub fn pooled(&self) -> &[EntityId] {
        &self.pool
    }

    /// Put a platform the game placed itself under recycling.
    pub fn track(&mut self, platform: EntityId) {
        if !self.spawned.contains(&platform) {
            self.spawned.push(platform);
        }
    }

    /// Spawn up to `count` platforms at free spots in the spawn area.
    /// Returns how many were placed.
    pub fn spawn_platforms(&mut self, world: &mut World, count: usize) -> Result<usize, EngineError> {
        let area = world
            .scene
            .collider_bounds(self.spawn_area)
            .ok_or(EngineError::ComponentNotFound(self.spawn_area))?;
        let size = DVec2::new(self.config.platform_width, self.config.platform_height);
        let max_x = (area.right() - size.x).max(area.left());

        let mut placed = 0;
        let mut attempts = 0;
        while placed < count && attempts < self.config.max_spawn_attempts {
            attempts += 1;
            let spot = self
                .rng
                .point_in(DVec2::new(area.left(), area.top()), DVec2::new(max_x, area.bottom()));
            if self.is_crowded(world, spot, size) {
                continue;
            }
            self.place(world, spot)?;
            placed += 1;
        }

        if placed < count {
            log::warn!(
                "placed {placed} of {count} platforms after {} attempts",
                self.config.max_spawn_attempts
            );
        }
        Ok(placed)
    }

    /// Whether a platform at world position `spot` would come closer than the
    /// minimum distance to a spawned platform.
    pub fn is_crowded(&self, world: &World, spot: DVec2, size: DVec2) -> bool {
        let margin = self.config.min_platform_distance;
        let candidate = Rect::from_pos_size(spot - DVec2::splat(margin), size + DVec2::splat(2.0 * margin));
        self.spawned.iter().any(|&platform| {
            world
                .scene
                .get(platform)
                .and_then(|entity| entity.component_id::<Collider>())
                .and_then(|cid| world.scene.collider_bounds(cid))
                .is_some_and(|bounds| bounds.overlaps(&candidate))
        })
    }

    fn place(&mut self, world: &mut World, spot: DVec2) -> Result<EntityId, EngineError> {
        let local = world
            .scene
            .to_local_space(self.view, spot)
            .ok_or(EngineError::EntityNotFound(self.view))?;

        let id = match self.pool.pop() {
            Some(id) => {
                world.scene.entity_mut(id)?.transform.position = local;
                world.add_child(self.view, id)?;
                world.set_active(id, true)?;
                id
            }
            None => {
                let id = world.next_id();
                let kind = self.next_kind();
                world.spawn_child(self.view, platform_entity(id, local, kind, &self.config))?
            }
        };
        self.spawned.push(id);
        log::debug!("platform {id} placed at {spot}");
        Ok(id)
    }

    fn next_kind(&mut self) -> PlatformKind {
        self.created += 1;
        let every = self.config.moving_platform_every;
        if every == 0 || self.created % every != 0 {
            return PlatformKind::Basic;
        }
        let direction = self.rng.sign();
        PlatformKind::Moving {
            speed: self.config.moving_platform_speed,
            direction,
        }
    }

    /// Top the spawn area back up to the minimum platform count.
    fn refill(&mut self, world: &mut World) -> Result<(), EngineError> {
        let inside = world
            .colliding_colliders(self.spawn_area)
            .into_iter()
            .filter(|&cid| world.scene.collider(cid).is_some_and(|c| c.tag == ColliderTag::Platform))
            .count();
        if inside < self.config.min_platforms {
            self.spawn_platforms(world, self.config.min_platforms - inside)?;
        }
        Ok(())
    }

    /// Take a spawned platform out of play and keep it for reuse.
    fn recycle(&mut self, world: &mut World, platform: EntityId) -> Result<(), EngineError> {
        let Some(index) = self.spawned.iter().position(|&p| p == platform) else {
            return Ok(());
        };
        self.spawned.swap_remove(index);
        world.set_active(platform, false)?;
        world.detach(platform)?;
        self.pool.push(platform);
        log::debug!("platform {platform} recycled, pool size {}", self.pool.len());
        Ok(())
    }
}

impl Behaviour for PlatformSpawner {
    fn start(&mut self, world: &mut World, _me: ComponentId) -> Result<(), EngineError> {
        self.spawn_platforms(world, 1).map(|_| ())
    }

    boing_engine::behaviour_any!();
}

/// Spawn the spawner with its two areas. Platforms go under `view`.
pub fn spawn_platform_spawner(world: &mut World, view: EntityId, config: &DoodleConfig) -> Result<EntityId, EngineError> {
    let root = world.next_id();

    let spawn_id = world.next_id();
    let spawn_area = Entity::new(spawn_id)
        .with_tag("spawn_area")
        .with_position(DVec2::new(config.spawn_padding, -config.spawn_area_height))
        .with_component(
            Collider::rectangle(
                ColliderTag::PlatformSpawner,
                DVec2::new(config.canvas_width - 2.0 * config.spawn_padding, config.spawn_area_height),
            )
            .with_listener(CollisionPhase::Exit, move |w, e| {
                if e.other_tag != ColliderTag::Platform {
                    return;
                }
                let result = w
                    .with_behaviour::<PlatformSpawner, _, _>(root, |spawner, w| spawner.refill(w))
                    .and_then(|refilled| refilled);
                if let Err(err) = result {
                    w.report(err);
                }
            }),
        );
    let spawn_collider = spawn_area
        .component_id::<Collider>()
        .ok_or_else(|| EngineError::MissingDependency(format!("{spawn_id} has no collider")))?;

    let despawn_id = world.next_id();
    let despawn_area = Entity::new(despawn_id)
        .with_tag("despawn_area")
        .with_position(DVec2::new(0.0, config.canvas_height + 10.0))
        .with_component(
            Collider::rectangle(
                ColliderTag::Trigger,
                DVec2::new(config.canvas_width, config.canvas_height),
            )
            .with_listener(CollisionPhase::Enter, move |w, e| {
                if e.other_tag != ColliderTag::Platform {
                    return;
                }
                let platform = e.other.entity;
                let result = w
                    .with_behaviour::<PlatformSpawner, _, _>(root, |spawner, w| spawner.recycle(w, platform))
                    .and_then(|recycled| recycled);
                if let Err(err) = result {
                    w.report(err);
                }
            }),
        );

    world.spawn_root(
        Entity::new(root)
            .with_tag("platform_spawner")
            .with_behaviour(PlatformSpawner::new(view, spawn_collider, config)),
    )?;
    world.spawn_child(root, spawn_area)?;
    world.spawn_child(root, despawn_area)?;
    Ok(root)
}
