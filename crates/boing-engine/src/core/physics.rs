// core/physics.rs
//
// Collider registry and the once-per-tick pairwise collision pass.
//
// Registry ids are slot indices with a generation counter. Freed slots are
// reused, but each reuse bumps the generation, so an id held past
// unregistration never resolves to the newer occupant. Iteration follows
// registration order.
//
// The pass is O(n^2) over registered colliders. It walks a snapshot of the
// registration order and re-checks liveness after every emitted event, since
// listeners may deactivate, destroy or spawn colliders mid-pass.

use crate::api::types::{ColliderId, ComponentId};
use crate::components::collider::{ColliderTag, CollisionEvent, CollisionPhase};
use crate::core::world::World;
use crate::error::EngineError;
use crate::events::bus::EventBus;

#[derive(Debug, Clone, Copy)]
struct Slot {
    generation: u32,
    occupant: Option<ComponentId>,
}

#[derive(Debug, Default)]
pub struct ColliderRegistry {
    slots: Vec<Slot>,
    free: Vec<u32>,
    order: Vec<ColliderId>,
}

impl ColliderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, collider: ComponentId) -> ColliderId {
        let id = match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index as usize];
                slot.generation += 1;
                slot.occupant = Some(collider);
                ColliderId::new(index, slot.generation)
            }
            None => {
                let index = self.slots.len() as u32;
                self.slots.push(Slot {
                    generation: 0,
                    occupant: Some(collider),
                });
                ColliderId::new(index, 0)
            }
        };
        self.order.push(id);
        log::debug!("registered {collider} as {id}");
        id
    }

    /// Fails with `InvalidRegistryState` for stale or unknown ids.
    pub fn unregister(&mut self, id: ColliderId) -> Result<ComponentId, EngineError> {
        let occupant = self
            .slot_mut(id)
            .and_then(|slot| slot.occupant.take())
            .ok_or_else(|| EngineError::stale_collider(id))?;
        self.free.push(id.index());
        self.order.retain(|&o| o != id);
        log::debug!("unregistered {occupant} from {id}");
        Ok(occupant)
    }

    /// The collider registered under `id`, if the id is current.
    pub fn resolve(&self, id: ColliderId) -> Option<ComponentId> {
        let slot = self.slots.get(id.index() as usize)?;
        if slot.generation == id.generation() {
            slot.occupant
        } else {
            None
        }
    }

    pub fn contains(&self, id: ColliderId, collider: ComponentId) -> bool {
        self.resolve(id) == Some(collider)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered colliders in registration order.
    pub fn snapshot(&self) -> Vec<(ColliderId, ComponentId)> {
        self.order
            .iter()
            .filter_map(|&id| self.resolve(id).map(|c| (id, c)))
            .collect()
    }

    fn slot_mut(&mut self, id: ColliderId) -> Option<&mut Slot> {
        let slot = self.slots.get_mut(id.index() as usize)?;
        (slot.generation == id.generation()).then_some(slot)
    }
}

/// Collision state owned by a world.
#[derive(Debug, Default)]
pub struct Physics {
    pub registry: ColliderRegistry,
}

impl Physics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered colliders.
    pub fn collider_count(&self) -> usize {
        self.registry.len()
    }
}

/// Run the enter/stay/exit state machine over every ordered pair.
pub(crate) fn collision_pass(world: &mut World) {
    let order = world.physics.registry.snapshot();

    for &(a_id, a) in &order {
        if !is_registered(world, a_id, a) {
            continue;
        }
        sweep_stale_partners(world, a_id, a);

        for &(b_id, b) in &order {
            if b == a {
                continue;
            }
            if !is_registered(world, a_id, a) {
                break;
            }
            let was_colliding = world
                .scene
                .collider(a)
                .is_some_and(|c| c.is_colliding_with(b));

            if !is_registered(world, b_id, b) {
                if was_colliding {
                    end_contact(world, a, b);
                }
                continue;
            }

            let hit = world.scene.colliders_intersect(a, b);
            match (hit, was_colliding) {
                (true, false) => {
                    let other_tag = tag_of(world, b);
                    if let Some(collider) = world.scene.collider_mut(a) {
                        collider.add_overlap(b, other_tag);
                    }
                    emit(world, a, b, other_tag, CollisionPhase::Enter);
                }
                (true, true) => {
                    let other_tag = tag_of(world, b);
                    emit(world, a, b, other_tag, CollisionPhase::Stay);
                }
                (false, true) => end_contact(world, a, b),
                (false, false) => {}
            }
        }
    }
}

fn is_registered(world: &World, id: ColliderId, collider: ComponentId) -> bool {
    world.physics.registry.contains(id, collider)
}

fn tag_of(world: &World, collider: ComponentId) -> ColliderTag {
    world
        .scene
        .collider(collider)
        .map(|c| c.tag)
        .unwrap_or_default()
}

/// Partners that left the registry since the last pass (deactivated or
/// destroyed) get an exit, even though they are no longer in the order.
fn sweep_stale_partners(world: &mut World, a_id: ColliderId, a: ComponentId) {
    let partners = match world.scene.collider(a) {
        Some(c) => c.colliding_colliders(),
        None => return,
    };
    for b in partners {
        if !is_registered(world, a_id, a) {
            return;
        }
        let live = world
            .scene
            .collider(b)
            .and_then(|c| c.collider_id())
            .is_some_and(|id| is_registered(world, id, b));
        if !live {
            end_contact(world, a, b);
        }
    }
}

fn end_contact(world: &mut World, a: ComponentId, b: ComponentId) {
    let removed = world.scene.collider_mut(a).and_then(|c| c.remove_overlap(b));
    if let Some(other_tag) = removed {
        emit(world, a, b, other_tag, CollisionPhase::Exit);
    }
}

fn emit(world: &mut World, a: ComponentId, b: ComponentId, other_tag: ColliderTag, phase: CollisionPhase) {
    let event = CollisionEvent {
        collider: a,
        other: b,
        tag: tag_of(world, a),
        other_tag,
    };
    EventBus::emit(
        world,
        move |w: &mut World| w.scene.collider_mut(a).map(|c| &mut c.events),
        phase,
        &event,
    );
}
