use std::collections::{HashMap, HashSet};

use glam::DVec2;

use crate::api::types::{ComponentId, EntityId};
use crate::components::collider::Collider;
use crate::components::entity::Entity;
use crate::components::transform::{Transform, WorldFrame};
use crate::components::{Component, ComponentData, ComponentType};
use crate::core::geometry::{Rect, WorldShape};
use crate::error::EngineError;

/// Entity storage keyed by id, plus the root list and a record of destroyed ids.
/// Designed for small-to-medium entity counts (hundreds, not millions).
pub struct Scene {
    entities: HashMap<EntityId, Entity>,
    roots: Vec<EntityId>,
    destroyed: HashSet<EntityId>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            entities: HashMap::with_capacity(256),
            roots: Vec::new(),
            destroyed: HashSet::new(),
        }
    }

    /// Add a detached entity to the scene.
    pub(crate) fn spawn(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    /// Remove a destroyed entity and remember its id.
    pub(crate) fn bury(&mut self, id: EntityId) -> Option<Entity> {
        self.destroyed.insert(id);
        self.roots.retain(|&r| r != id);
        self.entities.remove(&id)
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Like `get`, but distinguishes destroyed ids from unknown ones.
    pub fn entity(&self, id: EntityId) -> Result<&Entity, EngineError> {
        match self.entities.get(&id) {
            Some(e) => Ok(e),
            None => Err(self.missing(id)),
        }
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EngineError> {
        if !self.entities.contains_key(&id) {
            return Err(self.missing(id));
        }
        self.entities.get_mut(&id).ok_or(EngineError::EntityNotFound(id))
    }

    fn missing(&self, id: EntityId) -> EngineError {
        if self.destroyed.contains(&id) {
            EngineError::AlreadyDestroyed(id.to_string())
        } else {
            EngineError::EntityNotFound(id)
        }
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    pub fn is_destroyed(&self, id: EntityId) -> bool {
        self.destroyed.contains(&id)
    }

    /// Initialized and active.
    pub fn is_live(&self, id: EntityId) -> bool {
        self.entities
            .get(&id)
            .is_some_and(|e| e.initialized && e.active)
    }

    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    pub(crate) fn push_root(&mut self, id: EntityId) {
        if !self.roots.contains(&id) {
            self.roots.push(id);
        }
    }

    pub(crate) fn remove_root(&mut self, id: EntityId) -> bool {
        let before = self.roots.len();
        self.roots.retain(|&r| r != id);
        before != self.roots.len()
    }

    pub fn is_root(&self, id: EntityId) -> bool {
        self.roots.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&Entity> {
        let mut matches: Vec<&Entity> = self.find_all_by_tag(tag);
        matches.sort_by_key(|e| e.id);
        matches.into_iter().next()
    }

    pub fn find_all_by_tag(&self, tag: &str) -> Vec<&Entity> {
        self.entities.values().filter(|e| e.tag == tag).collect()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // -- Components --

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.entities.get(&id.entity)?.component(id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.entities.get_mut(&id.entity)?.component_mut(id)
    }

    /// Typed payload of a specific component.
    pub fn payload<T: ComponentData>(&self, id: ComponentId) -> Option<&T> {
        self.component(id)?.get::<T>()
    }

    pub fn payload_mut<T: ComponentData>(&mut self, id: ComponentId) -> Option<&mut T> {
        self.component_mut(id)?.get_mut::<T>()
    }

    /// First component of type `T` on an entity.
    pub fn get_component<T: ComponentData>(&self, entity: EntityId) -> Option<&T> {
        self.entities.get(&entity)?.get_component::<T>()
    }

    pub fn get_component_mut<T: ComponentData>(&mut self, entity: EntityId) -> Option<&mut T> {
        self.entities.get_mut(&entity)?.get_component_mut::<T>()
    }

    pub fn collider(&self, id: ComponentId) -> Option<&Collider> {
        self.payload::<Collider>(id)
    }

    pub fn collider_mut(&mut self, id: ComponentId) -> Option<&mut Collider> {
        self.payload_mut::<Collider>(id)
    }

    /// Depth-first search of the subtree: the entity's own components first,
    /// then each child's subtree in child order.
    pub fn components_in_children(&self, id: EntityId, ty: ComponentType) -> Vec<ComponentId> {
        let mut found = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(entity) = self.entities.get(&current) else {
                continue;
            };
            found.extend(entity.get_components(ty));
            stack.extend(entity.children.iter().rev().copied());
        }
        found
    }

    // -- Transform math --

    pub fn transform(&self, id: EntityId) -> Option<&Transform> {
        self.entities.get(&id).map(|e| &e.transform)
    }

    pub fn transform_mut(&mut self, id: EntityId) -> Option<&mut Transform> {
        self.entities.get_mut(&id).map(|e| &mut e.transform)
    }

    /// Resolve the entity's world frame by walking its parent chain.
    /// Recomputed on every call.
    pub fn world_frame(&self, id: EntityId) -> Option<WorldFrame> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let entity = self.entities.get(&current)?;
            chain.push(&entity.transform);
            cursor = entity.parent;
        }
        Some(WorldFrame::resolve(chain.into_iter().rev()))
    }

    /// Frame of the parent, or identity for roots and detached entities.
    fn parent_frame(&self, id: EntityId) -> Option<WorldFrame> {
        let entity = self.entities.get(&id)?;
        match entity.parent {
            Some(parent) => self.world_frame(parent),
            None => Some(WorldFrame::IDENTITY),
        }
    }

    pub fn world_position(&self, id: EntityId) -> Option<DVec2> {
        self.world_frame(id).map(|f| f.position)
    }

    pub fn world_scale(&self, id: EntityId) -> Option<DVec2> {
        self.world_frame(id).map(|f| f.scale)
    }

    /// Store the local position that places the entity at `position` in world space.
    pub fn set_world_position(&mut self, id: EntityId, position: DVec2) -> Result<(), EngineError> {
        let parent = self.parent_frame(id).ok_or_else(|| self.missing(id))?;
        let local = parent.to_local(position);
        self.entity_mut(id)?.transform.position = local;
        Ok(())
    }

    /// Map a point from the entity's local frame into world space.
    pub fn to_world_space(&self, id: EntityId, point: DVec2) -> Option<DVec2> {
        self.world_frame(id).map(|f| f.to_world(point))
    }

    /// Inverse of `to_world_space`.
    pub fn to_local_space(&self, id: EntityId, point: DVec2) -> Option<DVec2> {
        self.world_frame(id).map(|f| f.to_local(point))
    }

    // -- Collider geometry --

    pub fn collider_shape(&self, id: ComponentId) -> Option<WorldShape> {
        let collider = self.collider(id)?;
        let frame = self.world_frame(id.entity)?;
        Some(collider.world_shape(&frame))
    }

    /// World-space bounds of a collider.
    pub fn collider_bounds(&self, id: ComponentId) -> Option<Rect> {
        self.collider_shape(id).map(|s| s.bounds())
    }

    /// Move/resize a collider so its world-space bounds become `bounds`.
    pub fn set_collider_bounds(&mut self, id: ComponentId, bounds: Rect) -> Result<(), EngineError> {
        let frame = self
            .world_frame(id.entity)
            .ok_or_else(|| self.missing(id.entity))?;
        let collider = self
            .collider_mut(id)
            .ok_or(EngineError::ComponentNotFound(id))?;
        collider.set_world_bounds(&frame, bounds);
        Ok(())
    }

    /// Whether two colliders overlap right now. Inactive colliders never do.
    pub fn colliders_intersect(&self, a: ComponentId, b: ComponentId) -> bool {
        let active = |id: ComponentId| self.component(id).is_some_and(|c| c.active);
        if !active(a) || !active(b) {
            return false;
        }
        match (self.collider_shape(a), self.collider_shape(b)) {
            (Some(sa), Some(sb)) => sa.intersects(&sb),
            _ => false,
        }
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}
