use std::collections::HashSet;

use glam::DVec2;

use crate::api::types::{ComponentId, EntityId, ListenerId};
use crate::components::behaviour::Behaviour;
use crate::components::transform::Transform;
use crate::components::{Component, ComponentData, ComponentKind, ComponentType};
use crate::core::world::FrameEvent;

/// A node in the scene tree.
///
/// Owns its components and (through the scene) its children. Built detached
/// with the builder methods, then handed to `World::spawn` and attached with
/// `World::add_root` / `World::add_child`.
#[derive(Debug)]
pub struct Entity {
    /// Unique identifier.
    pub id: EntityId,
    /// String tag for finding entities by name.
    pub tag: String,
    pub(crate) active: bool,
    pub(crate) initialized: bool,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    /// Local transform; component slot 0.
    pub transform: Transform,
    pub(crate) components: Vec<Component>,
    next_slot: u32,
    destroyed_slots: HashSet<u32>,
    /// Frame listeners registered through `World::on_entity`.
    pub(crate) hooks: Vec<(FrameEvent, ListenerId)>,
}

impl Entity {
    /// Create a new entity with the given ID at the origin.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            tag: String::new(),
            active: true,
            initialized: false,
            parent: None,
            children: Vec::new(),
            transform: Transform::default(),
            components: Vec::new(),
            next_slot: ComponentId::TRANSFORM_SLOT + 1,
            destroyed_slots: HashSet::new(),
            hooks: Vec::new(),
        }
    }

    // -- Builder pattern --

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_position(mut self, position: DVec2) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: DVec2) -> Self {
        self.transform.scale = scale;
        self
    }

    /// Replace the default transform.
    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    /// Attach a component. A `Transform` replaces the default one.
    pub fn with_component(mut self, kind: impl Into<ComponentKind>) -> Self {
        match kind.into() {
            ComponentKind::Transform(transform) => self.transform = transform,
            kind => {
                self.attach(kind);
            }
        }
        self
    }

    pub fn with_behaviour<B: Behaviour>(self, behaviour: B) -> Self {
        self.with_component(ComponentKind::behaviour(behaviour))
    }

    /// Start deactivated.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    // -- Queries --

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn transform_id(&self) -> ComponentId {
        ComponentId::new(self.id, ComponentId::TRANSFORM_SLOT)
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        if id.entity != self.id {
            return None;
        }
        self.components.iter().find(|c| c.id() == id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        if id.entity != self.id {
            return None;
        }
        self.components.iter_mut().find(|c| c.id() == id)
    }

    /// First component of type `T`.
    pub fn get_component<T: ComponentData>(&self) -> Option<&T> {
        self.components.iter().find_map(|c| c.get::<T>())
    }

    pub fn get_component_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        self.components.iter_mut().find_map(|c| c.get_mut::<T>())
    }

    /// Id of the first component of type `T`.
    pub fn component_id<T: ComponentData>(&self) -> Option<ComponentId> {
        self.components
            .iter()
            .find(|c| c.get::<T>().is_some())
            .map(Component::id)
    }

    /// Ids of all components of `ty`, in insertion order. The Transform is
    /// reported as slot 0.
    pub fn get_components(&self, ty: ComponentType) -> Vec<ComponentId> {
        if ty == ComponentType::Transform {
            return vec![self.transform_id()];
        }
        self.components
            .iter()
            .filter(|c| c.component_type() == ty)
            .map(Component::id)
            .collect()
    }

    /// Id of the first behaviour of concrete type `B`.
    pub fn behaviour_id<B: Behaviour>(&self) -> Option<ComponentId> {
        self.components
            .iter()
            .find(|c| matches!(&c.kind, ComponentKind::Behaviour(slot) if slot.holds::<B>()))
            .map(Component::id)
    }

    pub fn behaviour<B: Behaviour>(&self) -> Option<&B> {
        self.components.iter().find_map(|c| match &c.kind {
            ComponentKind::Behaviour(slot) => slot.downcast_ref::<B>(),
            _ => None,
        })
    }

    pub fn behaviour_mut<B: Behaviour>(&mut self) -> Option<&mut B> {
        self.components.iter_mut().find_map(|c| match &mut c.kind {
            ComponentKind::Behaviour(slot) => slot.downcast_mut::<B>(),
            _ => None,
        })
    }

    // -- Bookkeeping used by World --

    pub(crate) fn attach(&mut self, kind: ComponentKind) -> ComponentId {
        let id = ComponentId::new(self.id, self.next_slot);
        self.next_slot += 1;
        let mut component = Component::new(id, kind);
        component.active = self.active;
        self.components.push(component);
        id
    }

    pub(crate) fn detach(&mut self, id: ComponentId) -> Option<Component> {
        let index = self.components.iter().position(|c| c.id() == id)?;
        Some(self.components.remove(index))
    }

    pub(crate) fn mark_destroyed(&mut self, id: ComponentId) {
        self.destroyed_slots.insert(id.slot);
    }

    pub(crate) fn was_destroyed(&self, id: ComponentId) -> bool {
        id.entity == self.id && self.destroyed_slots.contains(&id.slot)
    }

    pub(crate) fn component_ids(&self) -> Vec<ComponentId> {
        self.components.iter().map(Component::id).collect()
    }
}
