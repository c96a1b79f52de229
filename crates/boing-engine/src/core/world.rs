// core/world.rs
//
// The game context: entity tree, collider registry, frame events and render
// phase. Every entity/component operation goes through here so that
// activation, registration and listener bookkeeping stay consistent.
//
// Usage:
//   let mut world = World::new();
//   let id = world.next_id();
//   world.spawn(Entity::new(id).with_component(Rigidbody::new().with_gravity(0.5)));
//   world.add_root(id)?;
//   world.start();
//   world.tick(16.0)?;   // update -> collision pass -> render

use std::any::type_name;
use std::cell::Cell;
use std::rc::Rc;

use crate::api::types::{ComponentId, EntityId, ListenerId};
use crate::components::behaviour::Behaviour;
use crate::components::collider::{Collider, CollisionEvent, CollisionPhase};
use crate::components::entity::Entity;
use crate::components::{Component, ComponentKind};
use crate::core::physics::{self, Physics};
use crate::core::scene::Scene;
use crate::error::EngineError;
use crate::events::bus::EventBus;
use crate::events::layered::LayeredEventBus;
use crate::renderer::draw::{DrawCommand, DrawList};
use crate::renderer::{RenderArgs, RenderEvent, Renderer};
use crate::core::geometry::Rect;
use crate::systems::debug::debug_draw_colliders;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameEvent {
    Start,
    Update,
    Stop,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameArgs {
    /// Time covered by this tick.
    pub dt_ms: f64,
    /// Sum of all tick durations so far.
    pub elapsed_ms: f64,
}

pub type FrameBus = EventBus<FrameEvent, FrameArgs, World>;

pub struct World {
    pub scene: Scene,
    pub physics: Physics,
    pub renderer: Renderer,
    pub events: FrameBus,
    next_id: u32,
    started: bool,
    elapsed_ms: f64,
    faults: Vec<EngineError>,
}

impl World {
    pub fn new() -> Self {
        Self {
            scene: Scene::new(),
            physics: Physics::new(),
            renderer: Renderer::new(),
            events: EventBus::new(),
            next_id: 1,
            started: false,
            elapsed_ms: 0.0,
            faults: Vec::new(),
        }
    }

    /// Generate the next unique entity ID.
    pub fn next_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    // -- Frame loop --

    /// Emit `Start` once. Later calls do nothing.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        log::info!("world started with {} entities", self.scene.len());
        let args = self.frame_args(0.0);
        EventBus::emit(self, |w: &mut World| Some(&mut w.events), FrameEvent::Start, &args);
    }

    /// One tick: `Update` listeners, then the collision pass, then the render phase.
    /// Returns the first fault a callback reported during the tick.
    pub fn tick(&mut self, dt_ms: f64) -> Result<(), EngineError> {
        self.elapsed_ms += dt_ms;
        let args = self.frame_args(dt_ms);
        EventBus::emit(self, |w: &mut World| Some(&mut w.events), FrameEvent::Update, &args);
        self.step_physics();
        self.render();
        self.take_fault()
    }

    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        let args = self.frame_args(0.0);
        EventBus::emit(self, |w: &mut World| Some(&mut w.events), FrameEvent::Stop, &args);
        self.started = false;
        log::info!("world stopped after {:.0} ms", self.elapsed_ms);
    }

    /// Run the pairwise collision pass on the current positions.
    pub fn step_physics(&mut self) {
        physics::collision_pass(self);
    }

    /// Rebuild the draw list: every layer back to front, then debug outlines.
    pub fn render(&mut self) {
        self.renderer.draw_list.clear();
        let args = RenderArgs {
            elapsed_ms: self.elapsed_ms,
        };
        LayeredEventBus::emit_all(
            self,
            |w: &mut World| Some(&mut w.renderer.bus),
            RenderEvent::Render,
            &args,
        );
        debug_draw_colliders(&self.scene, &self.physics, &mut self.renderer.draw_list);
    }

    pub fn draw_list(&self) -> &DrawList {
        &self.renderer.draw_list
    }

    /// Record an error raised where there is no caller to return it to.
    pub fn report(&mut self, err: EngineError) {
        log::warn!("callback fault: {err}");
        self.faults.push(err);
    }

    fn take_fault(&mut self) -> Result<(), EngineError> {
        if self.faults.is_empty() {
            return Ok(());
        }
        let mut faults = std::mem::take(&mut self.faults).into_iter();
        let first = faults.next();
        for extra in faults {
            log::error!("additional fault in the same tick: {extra}");
        }
        first.map_or(Ok(()), Err)
    }

    fn frame_args(&self, dt_ms: f64) -> FrameArgs {
        FrameArgs {
            dt_ms,
            elapsed_ms: self.elapsed_ms,
        }
    }

    // -- Entity tree --

    /// Add a detached entity. Ids come from `next_id`.
    pub fn spawn(&mut self, entity: Entity) -> EntityId {
        debug_assert!(!self.scene.contains(entity.id), "{} spawned twice", entity.id);
        self.scene.spawn(entity)
    }

    /// `spawn` followed by `add_root`.
    pub fn spawn_root(&mut self, entity: Entity) -> Result<EntityId, EngineError> {
        let id = self.spawn(entity);
        self.add_root(id)?;
        Ok(id)
    }

    /// `spawn` followed by `add_child`.
    pub fn spawn_child(&mut self, parent: EntityId, entity: Entity) -> Result<EntityId, EngineError> {
        self.scene.entity(parent)?;
        let id = self.spawn(entity);
        self.add_child(parent, id)?;
        Ok(id)
    }

    /// Attach to the world's root list and initialize.
    pub fn add_root(&mut self, id: EntityId) -> Result<(), EngineError> {
        let parent = self.scene.entity(id)?.parent;
        if let Some(parent) = parent {
            self.remove_child(parent, id)?;
        }
        self.scene.push_root(id);
        self.init_entity(id)
    }

    /// Re-parent `child` under `parent`. The child is initialized if the parent is.
    pub fn add_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EngineError> {
        let parent_initialized = self.scene.entity(parent)?.initialized;
        let old_parent = self.scene.entity(child)?.parent;

        let mut cursor = Some(parent);
        while let Some(current) = cursor {
            if current == child {
                return Err(EngineError::HierarchyCycle { parent, child });
            }
            cursor = self.scene.get(current).and_then(|e| e.parent);
        }

        match old_parent {
            Some(old) => self.remove_child(old, child)?,
            None => {
                self.scene.remove_root(child);
            }
        }
        self.scene.entity_mut(parent)?.children.push(child);
        self.scene.entity_mut(child)?.parent = Some(parent);

        if parent_initialized {
            self.init_entity(child)?;
        }
        Ok(())
    }

    /// Detach `child` from `parent`. The child stays in the scene, unparented.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) -> Result<(), EngineError> {
        let entity = self.scene.entity_mut(parent)?;
        let index = entity
            .children
            .iter()
            .position(|&c| c == child)
            .ok_or(EngineError::ChildNotFound { parent, child })?;
        entity.children.remove(index);
        if let Some(c) = self.scene.get_mut(child) {
            c.parent = None;
        }
        Ok(())
    }

    /// Remove from the parent or from the root list, whichever holds it.
    pub fn detach(&mut self, id: EntityId) -> Result<(), EngineError> {
        match self.scene.entity(id)?.parent {
            Some(parent) => self.remove_child(parent, id),
            None => {
                self.scene.remove_root(id);
                Ok(())
            }
        }
    }

    /// Bind to this world: children first, then components in insertion order.
    /// Idempotent for initialized entities.
    pub fn init_entity(&mut self, id: EntityId) -> Result<(), EngineError> {
        let entity = self.scene.entity_mut(id)?;
        if entity.initialized {
            return Ok(());
        }
        entity.initialized = true;
        if !entity.active {
            for component in &mut entity.components {
                component.active = false;
            }
        }
        let children = entity.children.clone();
        let components = entity.component_ids();

        for child in children {
            self.init_entity(child)?;
        }
        for cid in components {
            self.init_component(cid)?;
        }
        Ok(())
    }

    /// Propagate activation to components, then recursively to children.
    pub fn set_active(&mut self, id: EntityId, active: bool) -> Result<(), EngineError> {
        let entity = self.scene.entity_mut(id)?;
        entity.active = active;
        let components = entity.component_ids();
        let children = entity.children.clone();

        for cid in components {
            self.set_component_active(cid, active)?;
        }
        for child in children {
            self.set_active(child, active)?;
        }
        Ok(())
    }

    pub fn is_active(&self, id: EntityId) -> bool {
        self.scene.get(id).is_some_and(Entity::is_active)
    }

    /// Destroy children, then components, then detach. A second call fails
    /// with `AlreadyDestroyed`.
    pub fn destroy_entity(&mut self, id: EntityId) -> Result<(), EngineError> {
        let entity = self.scene.entity(id)?;
        let children = entity.children.clone();
        let components = entity.component_ids();
        let hooks = entity.hooks.clone();

        for child in children {
            self.destroy_entity(child)?;
        }
        for cid in components {
            self.destroy_component(cid)?;
        }
        for (event, listener) in hooks {
            self.events.off(event, listener)?;
        }
        self.detach(id)?;
        self.scene.bury(id);
        log::debug!("destroyed {id}");
        Ok(())
    }

    // -- Components --

    pub fn add_component(
        &mut self,
        id: EntityId,
        kind: impl Into<ComponentKind>,
    ) -> Result<ComponentId, EngineError> {
        let kind = kind.into();
        if matches!(kind, ComponentKind::Transform(_)) {
            self.scene.entity(id)?;
            return Err(EngineError::DuplicateTransform(id));
        }
        let entity = self.scene.entity_mut(id)?;
        let cid = entity.attach(kind);
        if entity.initialized {
            self.init_component(cid)?;
        }
        Ok(cid)
    }

    pub fn add_behaviour<B: Behaviour>(&mut self, id: EntityId, behaviour: B) -> Result<ComponentId, EngineError> {
        self.add_component(id, ComponentKind::behaviour(behaviour))
    }

    /// Detach a component and hand it back, torn down but intact.
    pub fn remove_component(&mut self, cid: ComponentId) -> Result<Component, EngineError> {
        self.component_checked(cid)?;
        self.teardown_component(cid)?;
        self.scene
            .entity_mut(cid.entity)?
            .detach(cid)
            .ok_or(EngineError::ComponentNotFound(cid))
    }

    /// Tear down and drop a component. A second call fails with `AlreadyDestroyed`.
    pub fn destroy_component(&mut self, cid: ComponentId) -> Result<(), EngineError> {
        self.component_checked(cid)?;
        self.teardown_component(cid)?;

        let taken = self.take_behaviour(cid);
        let entity = self.scene.entity_mut(cid.entity)?;
        entity.detach(cid);
        entity.mark_destroyed(cid);

        if let Some(mut behaviour) = taken {
            if let Err(err) = behaviour.destroy(self, cid) {
                self.report(err);
            }
        }
        Ok(())
    }

    pub fn set_component_active(&mut self, cid: ComponentId, active: bool) -> Result<(), EngineError> {
        if cid.is_transform() {
            self.scene.entity(cid.entity)?;
            return Ok(());
        }
        let component = self.component_checked_mut(cid)?;
        if component.active == active {
            return Ok(());
        }
        component.active = active;
        let registers = component.initialized && matches!(component.kind, ComponentKind::Collider(_));

        if registers {
            if active {
                self.register_collider(cid)?;
            } else {
                self.unregister_collider(cid)?;
            }
        }
        Ok(())
    }

    pub fn component(&self, cid: ComponentId) -> Option<&Component> {
        self.scene.component(cid)
    }

    fn component_checked(&self, cid: ComponentId) -> Result<&Component, EngineError> {
        if cid.is_transform() {
            self.scene.entity(cid.entity)?;
            return Err(EngineError::MissingDependency(format!(
                "{} requires its transform",
                cid.entity
            )));
        }
        let entity = self.scene.entity(cid.entity)?;
        if entity.was_destroyed(cid) {
            return Err(EngineError::AlreadyDestroyed(cid.to_string()));
        }
        entity.component(cid).ok_or(EngineError::ComponentNotFound(cid))
    }

    fn component_checked_mut(&mut self, cid: ComponentId) -> Result<&mut Component, EngineError> {
        self.component_checked(cid)?;
        self.scene
            .component_mut(cid)
            .ok_or(EngineError::ComponentNotFound(cid))
    }

    fn init_component(&mut self, cid: ComponentId) -> Result<(), EngineError> {
        let component = self
            .scene
            .component_mut(cid)
            .ok_or(EngineError::ComponentNotFound(cid))?;
        if component.initialized {
            return Ok(());
        }
        component.initialized = true;

        for &event in component.kind.frame_events() {
            let listener = self
                .events
                .on(event, move |w: &mut World, args: &FrameArgs| w.on_component_frame(cid, event, args));
            component.frame_listeners.push((event, listener));
        }
        if let Some(layer) = component.kind.render_layer() {
            let listener = self
                .renderer
                .on(layer, move |w: &mut World, _: &RenderArgs| w.draw_component(cid));
            component.render_listener = Some((layer, listener));
        }

        let registers = component.active && matches!(component.kind, ComponentKind::Collider(_));
        if registers {
            self.register_collider(cid)?;
        }
        Ok(())
    }

    /// Undo `init_component`: leave the registry, drop frame and render listeners.
    fn teardown_component(&mut self, cid: ComponentId) -> Result<(), EngineError> {
        self.unregister_collider(cid)?;

        let component = self
            .scene
            .component_mut(cid)
            .ok_or(EngineError::ComponentNotFound(cid))?;
        component.initialized = false;
        let frame_listeners = std::mem::take(&mut component.frame_listeners);
        let render_listener = component.render_listener.take();

        for (event, listener) in frame_listeners {
            self.events.off(event, listener)?;
        }
        if let Some((layer, listener)) = render_listener {
            self.renderer.off(layer, listener)?;
        }
        Ok(())
    }

    fn register_collider(&mut self, cid: ComponentId) -> Result<(), EngineError> {
        let collider = self
            .scene
            .collider_mut(cid)
            .ok_or(EngineError::ComponentNotFound(cid))?;
        if collider.id.is_none() {
            collider.id = Some(self.physics.registry.register(cid));
        }
        Ok(())
    }

    /// No-op for colliders that are not registered. Own overlaps are dropped
    /// silently; partners see an exit on the next pass.
    fn unregister_collider(&mut self, cid: ComponentId) -> Result<(), EngineError> {
        let Some(collider) = self.scene.collider_mut(cid) else {
            return Ok(());
        };
        let Some(id) = collider.id.take() else {
            return Ok(());
        };
        collider.clear_overlaps();
        let owner = self.physics.registry.unregister(id)?;
        if owner != cid {
            return Err(EngineError::InvalidRegistryState(format!(
                "{id} belonged to {owner}, not {cid}"
            )));
        }
        Ok(())
    }

    fn on_component_frame(&mut self, cid: ComponentId, event: FrameEvent, args: &FrameArgs) {
        let result = match event {
            FrameEvent::Start => self.start_behaviour(cid),
            FrameEvent::Update => self.update_component(cid, args.dt_ms),
            FrameEvent::Stop => Ok(()),
        };
        if let Err(err) = result {
            self.report(err);
        }
    }

    fn update_component(&mut self, cid: ComponentId, dt_ms: f64) -> Result<(), EngineError> {
        let Some(component) = self.scene.component_mut(cid) else {
            return Ok(());
        };
        if !component.active {
            return Ok(());
        }
        match &mut component.kind {
            ComponentKind::Rigidbody(body) => {
                let step = body.integrate();
                let velocity = body.velocity;
                if let Some(entity) = self.scene.get_mut(cid.entity) {
                    entity.transform.position += step;
                    for collider in entity.components.iter_mut().filter_map(|c| c.get_mut::<Collider>()) {
                        collider.velocity = velocity;
                    }
                }
                Ok(())
            }
            ComponentKind::Behaviour(_) => {
                self.start_behaviour(cid)?;
                self.run_behaviour(cid, |b, w| b.update(w, cid, dt_ms))
            }
            _ => Ok(()),
        }
    }

    /// Start a behaviour once, if it is active.
    fn start_behaviour(&mut self, cid: ComponentId) -> Result<(), EngineError> {
        let Some(component) = self.scene.component_mut(cid) else {
            return Ok(());
        };
        let active = component.active;
        let ComponentKind::Behaviour(slot) = &mut component.kind else {
            return Ok(());
        };
        if slot.started || !active {
            return Ok(());
        }
        slot.started = true;
        self.run_behaviour(cid, |b, w| b.start(w, cid))
    }

    fn run_behaviour<F>(&mut self, cid: ComponentId, hook: F) -> Result<(), EngineError>
    where
        F: FnOnce(&mut dyn Behaviour, &mut World) -> Result<(), EngineError>,
    {
        let Some(mut behaviour) = self.take_behaviour(cid) else {
            return Ok(());
        };
        let result = hook(behaviour.as_mut(), self);
        self.restore_behaviour(cid, behaviour);
        result
    }

    fn take_behaviour(&mut self, cid: ComponentId) -> Option<Box<dyn Behaviour>> {
        match &mut self.scene.component_mut(cid)?.kind {
            ComponentKind::Behaviour(slot) => slot.inner.take(),
            _ => None,
        }
    }

    /// Put a behaviour back after a hook. If its component was destroyed
    /// meanwhile, the destroy hook runs now instead.
    fn restore_behaviour(&mut self, cid: ComponentId, mut behaviour: Box<dyn Behaviour>) {
        if let Some(component) = self.scene.component_mut(cid) {
            if let ComponentKind::Behaviour(slot) = &mut component.kind {
                if slot.inner.is_none() {
                    slot.inner = Some(behaviour);
                    return;
                }
            }
        }
        let destroyed = self
            .scene
            .get(cid.entity)
            .map_or(true, |e| e.was_destroyed(cid));
        if destroyed {
            if let Err(err) = behaviour.destroy(self, cid) {
                self.report(err);
            }
        }
    }

    /// Borrow the first behaviour of type `B` on `entity` mutably alongside the world.
    pub fn with_behaviour<B, R, F>(&mut self, entity: EntityId, f: F) -> Result<R, EngineError>
    where
        B: Behaviour,
        F: FnOnce(&mut B, &mut World) -> R,
    {
        let missing = || EngineError::MissingDependency(format!("{entity} has no {}", type_name::<B>()));
        let cid = self.scene.entity(entity)?.behaviour_id::<B>().ok_or_else(missing)?;
        let mut behaviour = self.take_behaviour(cid).ok_or_else(missing)?;
        let out = behaviour.as_any_mut().downcast_mut::<B>().map(|b| f(b, self));
        self.restore_behaviour(cid, behaviour);
        out.ok_or_else(missing)
    }

    pub fn behaviour<B: Behaviour>(&self, entity: EntityId) -> Option<&B> {
        self.scene.get(entity)?.behaviour::<B>()
    }

    fn draw_component(&mut self, cid: ComponentId) {
        let Some(component) = self.scene.component(cid) else {
            return;
        };
        if !component.active {
            return;
        }
        let Some(frame) = self.scene.world_frame(cid.entity) else {
            return;
        };
        let command = match &component.kind {
            ComponentKind::Sprite(sprite) => DrawCommand::Rect {
                layer: sprite.layer,
                rect: Rect::from_pos_size(frame.position, sprite.size * frame.scale),
                rotation: frame.rotation,
                color: sprite.color,
                image: sprite.image.clone(),
            },
            ComponentKind::Label(label) => DrawCommand::Text {
                layer: label.layer,
                position: frame.position,
                text: label.text.clone(),
                font: label.font(),
                color: label.color,
            },
            _ => return,
        };
        self.renderer.draw_list.push(command);
    }

    // -- Frame hooks owned by an entity --

    /// Subscribe a frame listener that runs only while the entity is
    /// initialized and active, and is dropped when the entity is destroyed.
    pub fn on_entity<F>(&mut self, id: EntityId, event: FrameEvent, listener: F) -> Result<ListenerId, EngineError>
    where
        F: Fn(&mut World, &FrameArgs) + 'static,
    {
        self.scene.entity(id)?;
        let listener_id = self.events.on(event, move |w: &mut World, args: &FrameArgs| {
            if w.scene.is_live(id) {
                listener(w, args);
            }
        });
        self.scene.entity_mut(id)?.hooks.push((event, listener_id));
        Ok(listener_id)
    }

    /// Like `on_entity`, removed after the first run.
    pub fn once_entity<F>(&mut self, id: EntityId, event: FrameEvent, listener: F) -> Result<ListenerId, EngineError>
    where
        F: Fn(&mut World, &FrameArgs) + 'static,
    {
        let me: Rc<Cell<Option<ListenerId>>> = Rc::new(Cell::new(None));
        let handle = Rc::clone(&me);
        let listener_id = self.on_entity(id, event, move |w: &mut World, args: &FrameArgs| {
            if let Some(own_id) = handle.take() {
                if let Err(err) = w.off_entity(id, event, own_id) {
                    w.report(err);
                }
                listener(w, args);
            }
        })?;
        me.set(Some(listener_id));
        Ok(listener_id)
    }

    pub fn off_entity(&mut self, id: EntityId, event: FrameEvent, listener: ListenerId) -> Result<(), EngineError> {
        let entity = self.scene.entity_mut(id)?;
        let index = entity
            .hooks
            .iter()
            .position(|&(e, l)| e == event && l == listener)
            .ok_or(EngineError::ListenerNotFound(listener))?;
        entity.hooks.remove(index);
        self.events.off(event, listener)
    }

    // -- Collider consumer API --

    fn collider_checked_mut(&mut self, cid: ComponentId) -> Result<&mut Collider, EngineError> {
        self.component_checked_mut(cid)?
            .get_mut::<Collider>()
            .ok_or(EngineError::ComponentNotFound(cid))
    }

    pub fn on_collision<F>(&mut self, cid: ComponentId, phase: CollisionPhase, listener: F) -> Result<ListenerId, EngineError>
    where
        F: Fn(&mut World, &CollisionEvent) + 'static,
    {
        Ok(self.collider_checked_mut(cid)?.on_collision(phase, listener))
    }

    pub fn once_collision<F>(&mut self, cid: ComponentId, phase: CollisionPhase, listener: F) -> Result<ListenerId, EngineError>
    where
        F: Fn(&mut World, &CollisionEvent) + 'static,
    {
        Ok(self.collider_checked_mut(cid)?.once_collision(phase, listener))
    }

    pub fn off_collision(&mut self, cid: ComponentId, phase: CollisionPhase, listener: ListenerId) -> Result<(), EngineError> {
        self.collider_checked_mut(cid)?.off_collision(phase, listener)
    }

    pub fn is_colliding_with(&self, cid: ComponentId, other: ComponentId) -> bool {
        self.scene
            .collider(cid)
            .is_some_and(|c| c.is_colliding_with(other))
    }

    pub fn colliding_colliders(&self, cid: ComponentId) -> Vec<ComponentId> {
        self.scene
            .collider(cid)
            .map(Collider::colliding_colliders)
            .unwrap_or_default()
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::collider::ColliderTag;
    use crate::components::label::Label;
    use crate::components::layer::RenderLayer;
    use crate::components::rigidbody::Rigidbody;
    use crate::components::sprite::SpriteRenderer;
    use crate::components::transform::Transform;
    use crate::components::ComponentType;
    use glam::DVec2;
    use std::any::Any;
    use std::cell::RefCell;

    type Log = Rc<RefCell<Vec<(CollisionPhase, ColliderTag)>>>;

    fn boxed(world: &mut World, tag: ColliderTag, pos: DVec2, size: DVec2) -> (EntityId, ComponentId) {
        let id = world.next_id();
        let entity = Entity::new(id)
            .with_position(pos)
            .with_component(Collider::rectangle(tag, size));
        let cid = entity.component_id::<Collider>().unwrap();
        world.spawn_root(entity).unwrap();
        (id, cid)
    }

    fn record(world: &mut World, cid: ComponentId) -> Log {
        let log: Log = Rc::default();
        for phase in [CollisionPhase::Enter, CollisionPhase::Stay, CollisionPhase::Exit] {
            let log = Rc::clone(&log);
            world
                .on_collision(cid, phase, move |_: &mut World, e: &CollisionEvent| {
                    log.borrow_mut().push((phase, e.other_tag));
                })
                .unwrap();
        }
        log
    }

    fn phases(log: &Log) -> Vec<CollisionPhase> {
        log.borrow().iter().map(|(p, _)| *p).collect()
    }

    #[test]
    fn enter_stay_stay_exit_per_side() {
        let mut world = World::new();
        let (a, a_col) = boxed(&mut world, ColliderTag::Player, DVec2::new(0.0, 0.0), DVec2::splat(10.0));
        let (_, b_col) = boxed(&mut world, ColliderTag::Wall, DVec2::new(50.0, 0.0), DVec2::splat(10.0));
        let a_log = record(&mut world, a_col);
        let b_log = record(&mut world, b_col);

        world.tick(16.0).unwrap();
        for _ in 0..3 {
            world.scene.transform_mut(a).unwrap().position = DVec2::new(45.0, 0.0);
            world.tick(16.0).unwrap();
        }
        world.scene.transform_mut(a).unwrap().position = DVec2::new(0.0, 0.0);
        world.tick(16.0).unwrap();

        use CollisionPhase::*;
        assert_eq!(phases(&a_log), vec![Enter, Stay, Stay, Exit]);
        assert_eq!(phases(&b_log), vec![Enter, Stay, Stay, Exit]);
        assert!(a_log.borrow().iter().all(|(_, tag)| *tag == ColliderTag::Wall));
        assert!(b_log.borrow().iter().all(|(_, tag)| *tag == ColliderTag::Player));
    }

    #[test]
    fn touching_edges_never_collide() {
        let mut world = World::new();
        let (_, a) = boxed(&mut world, ColliderTag::Default, DVec2::new(0.0, 0.0), DVec2::splat(10.0));
        let (_, b) = boxed(&mut world, ColliderTag::Default, DVec2::new(10.0, 0.0), DVec2::splat(10.0));
        let log = record(&mut world, a);
        world.tick(16.0).unwrap();
        assert!(log.borrow().is_empty());
        assert!(!world.is_colliding_with(a, b));
    }

    #[test]
    fn deactivation_forces_exit_on_partner() {
        let mut world = World::new();
        let (a, a_col) = boxed(&mut world, ColliderTag::Player, DVec2::ZERO, DVec2::splat(10.0));
        let (_, b_col) = boxed(&mut world, ColliderTag::Platform, DVec2::splat(5.0), DVec2::splat(10.0));
        world.tick(16.0).unwrap();
        assert!(world.is_colliding_with(a_col, b_col));
        assert!(world.is_colliding_with(b_col, a_col));

        let a_log = record(&mut world, a_col);
        let b_log = record(&mut world, b_col);
        world.set_active(a, false).unwrap();
        assert_eq!(world.scene.collider(a_col).unwrap().collider_id(), None);
        world.tick(16.0).unwrap();

        assert!(a_log.borrow().is_empty());
        assert_eq!(b_log.borrow().as_slice(), &[(CollisionPhase::Exit, ColliderTag::Player)]);
        assert!(world.colliding_colliders(a_col).is_empty());
        assert!(world.colliding_colliders(b_col).is_empty());
    }

    #[test]
    fn toggling_active_twice_registers_once() {
        let mut world = World::new();
        let (a, a_col) = boxed(&mut world, ColliderTag::Default, DVec2::ZERO, DVec2::ONE);
        assert_eq!(world.physics.collider_count(), 1);

        world.set_active(a, true).unwrap();
        assert_eq!(world.physics.collider_count(), 1);
        world.set_active(a, false).unwrap();
        world.set_active(a, false).unwrap();
        assert_eq!(world.physics.collider_count(), 0);
        world.set_active(a, true).unwrap();
        assert_eq!(world.physics.collider_count(), 1);

        let id = world.scene.collider(a_col).unwrap().collider_id().unwrap();
        assert_eq!(world.physics.registry.resolve(id), Some(a_col));
    }

    #[test]
    fn registry_ids_survive_removal_from_middle() {
        let mut world = World::new();
        let cols: Vec<ComponentId> = (0..3)
            .map(|i| boxed(&mut world, ColliderTag::Default, DVec2::new(i as f64 * 100.0, 0.0), DVec2::ONE).1)
            .collect();
        let ids: Vec<_> = cols
            .iter()
            .map(|&c| world.scene.collider(c).unwrap().collider_id().unwrap())
            .collect();
        assert_eq!(ids.iter().map(|i| i.index()).collect::<Vec<_>>(), vec![0, 1, 2]);

        world.destroy_component(cols[1]).unwrap();
        assert_eq!(world.physics.collider_count(), 2);
        assert_eq!(world.physics.registry.resolve(ids[0]), Some(cols[0]));
        assert_eq!(world.physics.registry.resolve(ids[2]), Some(cols[2]));

        let (_, fresh) = boxed(&mut world, ColliderTag::Default, DVec2::new(500.0, 0.0), DVec2::ONE);
        let fresh_id = world.scene.collider(fresh).unwrap().collider_id().unwrap();
        assert_ne!(fresh_id, ids[1]);
        assert_eq!(world.physics.registry.resolve(ids[1]), None);
        assert_eq!(world.physics.registry.resolve(ids[0]), Some(cols[0]));
    }

    #[test]
    fn destroy_twice_is_already_destroyed() {
        let mut world = World::new();
        let parent = world.next_id();
        let child = world.next_id();
        world.spawn_root(Entity::new(parent)).unwrap();
        world.spawn_child(parent, Entity::new(child)).unwrap();

        world.destroy_entity(parent).unwrap();
        assert!(matches!(world.destroy_entity(parent), Err(EngineError::AlreadyDestroyed(_))));
        assert!(matches!(world.destroy_entity(child), Err(EngineError::AlreadyDestroyed(_))));
        assert!(world.scene.is_empty());
        assert!(world.scene.roots().is_empty());
    }

    #[test]
    fn destroyed_entity_rejects_mutation() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id)).unwrap();
        world.destroy_entity(id).unwrap();
        assert!(matches!(
            world.add_component(id, Rigidbody::new()),
            Err(EngineError::AlreadyDestroyed(_))
        ));
        assert!(matches!(world.set_active(id, true), Err(EngineError::AlreadyDestroyed(_))));
    }

    #[test]
    fn child_bookkeeping_is_symmetric() {
        let mut world = World::new();
        let a = world.next_id();
        let b = world.next_id();
        let c = world.next_id();
        world.spawn_root(Entity::new(a)).unwrap();
        world.spawn_child(a, Entity::new(b)).unwrap();
        world.spawn(Entity::new(c));

        assert_eq!(world.scene.get(b).unwrap().parent(), Some(a));
        assert_eq!(world.scene.get(a).unwrap().children(), &[b]);
        assert!(world.scene.get(b).unwrap().is_initialized());

        assert_eq!(
            world.remove_child(a, c),
            Err(EngineError::ChildNotFound { parent: a, child: c })
        );
        world.remove_child(a, b).unwrap();
        assert_eq!(world.scene.get(b).unwrap().parent(), None);
        assert!(world.scene.get(a).unwrap().children().is_empty());

        // re-parenting moves the child
        world.add_child(a, c).unwrap();
        world.add_child(b, c).unwrap();
        assert!(world.scene.get(a).unwrap().children().is_empty());
        assert_eq!(world.scene.get(b).unwrap().children(), &[c]);
        assert_eq!(
            world.add_child(c, b),
            Err(EngineError::HierarchyCycle { parent: c, child: b })
        );
    }

    #[test]
    fn components_not_owned_cannot_be_removed() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id).with_component(Rigidbody::new())).unwrap();
        let missing = ComponentId::new(id, 42);
        assert_eq!(world.remove_component(missing).err(), Some(EngineError::ComponentNotFound(missing)));

        let body = world.scene.get(id).unwrap().component_id::<Rigidbody>().unwrap();
        let removed = world.remove_component(body).unwrap();
        assert!(removed.get::<Rigidbody>().is_some());
        assert_eq!(world.remove_component(body).err(), Some(EngineError::ComponentNotFound(body)));
    }

    #[test]
    fn destroyed_component_reports_already_destroyed() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id).with_component(Rigidbody::new())).unwrap();
        let body = world.scene.get(id).unwrap().component_id::<Rigidbody>().unwrap();
        world.destroy_component(body).unwrap();
        assert!(matches!(world.destroy_component(body), Err(EngineError::AlreadyDestroyed(_))));
    }

    #[test]
    fn transform_is_unique_and_required() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id)).unwrap();
        assert_eq!(
            world.add_component(id, Transform::new()).err(),
            Some(EngineError::DuplicateTransform(id))
        );
        let transform = world.scene.get(id).unwrap().transform_id();
        assert!(matches!(world.remove_component(transform), Err(EngineError::MissingDependency(_))));
    }

    #[test]
    fn rigidbody_moves_owner_each_tick() {
        let mut world = World::new();
        let id = world.next_id();
        world
            .spawn_root(
                Entity::new(id)
                    .with_component(Rigidbody::new().with_gravity(1.0))
                    .with_component(Collider::rectangle(ColliderTag::Player, DVec2::ONE)),
            )
            .unwrap();
        world.tick(16.0).unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(world.scene.world_position(id), Some(DVec2::new(0.0, 3.0)));
        assert_eq!(
            world.scene.get_component::<Collider>(id).unwrap().velocity,
            DVec2::new(0.0, 2.0)
        );
    }

    #[test]
    fn inactive_rigidbody_does_not_move() {
        let mut world = World::new();
        let id = world.next_id();
        world
            .spawn_root(Entity::new(id).inactive().with_component(Rigidbody::new().with_gravity(1.0)))
            .unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(world.scene.world_position(id), Some(DVec2::ZERO));
        world.set_active(id, true).unwrap();
        world.tick(16.0).unwrap();
        assert_eq!(world.scene.world_position(id), Some(DVec2::new(0.0, 1.0)));
    }

    #[test]
    fn set_active_propagates_to_children() {
        let mut world = World::new();
        let parent = world.next_id();
        let child = world.next_id();
        world.spawn_root(Entity::new(parent)).unwrap();
        let (_, col) = {
            let e = Entity::new(child).with_component(Collider::rectangle(ColliderTag::Default, DVec2::ONE));
            let cid = e.component_id::<Collider>().unwrap();
            world.spawn_child(parent, e).unwrap();
            (child, cid)
        };
        world.set_active(parent, false).unwrap();
        assert!(!world.is_active(child));
        assert!(!world.component(col).unwrap().is_active());
        assert_eq!(world.physics.collider_count(), 0);
    }

    #[derive(Default)]
    struct Probe {
        calls: Vec<&'static str>,
    }

    impl Behaviour for Probe {
        fn start(&mut self, _world: &mut World, _me: ComponentId) -> Result<(), EngineError> {
            self.calls.push("start");
            Ok(())
        }
        fn update(&mut self, _world: &mut World, _me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
            self.calls.push("update");
            Ok(())
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn behaviour_starts_once_then_updates() {
        let mut world = World::new();
        let early = world.next_id();
        world.spawn_root(Entity::new(early).with_behaviour(Probe::default())).unwrap();
        world.start();
        world.tick(16.0).unwrap();

        let late = world.next_id();
        world.spawn_root(Entity::new(late).with_behaviour(Probe::default())).unwrap();
        world.tick(16.0).unwrap();

        assert_eq!(world.behaviour::<Probe>(early).unwrap().calls, vec!["start", "update", "update"]);
        assert_eq!(world.behaviour::<Probe>(late).unwrap().calls, vec!["start", "update"]);
    }

    #[test]
    fn with_behaviour_lends_world_access() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id).with_behaviour(Probe::default())).unwrap();

        let spawned = world
            .with_behaviour::<Probe, _, _>(id, |probe, w| {
                probe.calls.push("lent");
                let other = w.next_id();
                w.spawn_root(Entity::new(other)).map(|_| other)
            })
            .unwrap()
            .unwrap();
        assert!(world.scene.contains(spawned));
        assert_eq!(world.behaviour::<Probe>(id).unwrap().calls, vec!["lent"]);

        let bare = world.next_id();
        world.spawn_root(Entity::new(bare)).unwrap();
        assert!(matches!(
            world.with_behaviour::<Probe, _, _>(bare, |_, _| ()),
            Err(EngineError::MissingDependency(_))
        ));
    }

    struct SelfDestruct;

    impl Behaviour for SelfDestruct {
        fn update(&mut self, world: &mut World, me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
            world.destroy_entity(me.entity)
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn behaviour_may_destroy_its_own_entity() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id).with_behaviour(SelfDestruct)).unwrap();
        world.tick(16.0).unwrap();
        assert!(world.scene.is_destroyed(id));
        world.tick(16.0).unwrap();
    }

    struct Failing;

    impl Behaviour for Failing {
        fn update(&mut self, _world: &mut World, me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
            Err(EngineError::ComponentNotFound(me))
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn callback_faults_surface_from_tick() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id).with_behaviour(Failing)).unwrap();
        assert!(matches!(world.tick(16.0), Err(EngineError::ComponentNotFound(_))));
    }

    #[test]
    fn entity_hooks_follow_activation_and_destroy() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id)).unwrap();
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        world
            .on_entity(id, FrameEvent::Update, move |_: &mut World, _: &FrameArgs| seen.set(seen.get() + 1))
            .unwrap();
        let once = Rc::new(Cell::new(0));
        let seen_once = Rc::clone(&once);
        world
            .once_entity(id, FrameEvent::Update, move |_: &mut World, _: &FrameArgs| {
                seen_once.set(seen_once.get() + 1)
            })
            .unwrap();

        world.tick(16.0).unwrap();
        world.set_active(id, false).unwrap();
        world.tick(16.0).unwrap();
        world.set_active(id, true).unwrap();
        world.tick(16.0).unwrap();
        world.destroy_entity(id).unwrap();
        world.tick(16.0).unwrap();

        assert_eq!(count.get(), 2);
        assert_eq!(once.get(), 1);
        assert_eq!(world.events.listener_count(FrameEvent::Update), 0);
    }

    #[test]
    fn destroy_drops_pending_one_shot_hooks() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id)).unwrap();
        world
            .once_entity(id, FrameEvent::Update, |_: &mut World, _: &FrameArgs| {})
            .unwrap();
        world.on_entity(id, FrameEvent::Stop, |_: &mut World, _: &FrameArgs| {}).unwrap();

        world.destroy_entity(id).unwrap();
        assert_eq!(world.events.listener_count(FrameEvent::Update), 0);
        assert_eq!(world.events.listener_count(FrameEvent::Stop), 0);
    }

    #[test]
    fn destroy_fails_when_a_hook_left_the_frame_bus() {
        let mut world = World::new();
        let id = world.next_id();
        world.spawn_root(Entity::new(id)).unwrap();
        let hook = world
            .on_entity(id, FrameEvent::Update, |_: &mut World, _: &FrameArgs| {})
            .unwrap();
        world.events.off(FrameEvent::Update, hook).unwrap();

        assert_eq!(world.destroy_entity(id), Err(EngineError::ListenerNotFound(hook)));
    }

    #[test]
    fn off_collision_rejects_another_colliders_listener() {
        let mut world = World::new();
        let (_, a) = boxed(&mut world, ColliderTag::Player, DVec2::ZERO, DVec2::splat(10.0));
        let (_, b) = boxed(&mut world, ColliderTag::Platform, DVec2::new(100.0, 0.0), DVec2::splat(10.0));
        let on_a = world
            .on_collision(a, CollisionPhase::Enter, |_: &mut World, _: &CollisionEvent| {})
            .unwrap();
        let on_b = world
            .on_collision(b, CollisionPhase::Enter, |_: &mut World, _: &CollisionEvent| {})
            .unwrap();

        assert_ne!(on_a, on_b);
        assert_eq!(
            world.off_collision(b, CollisionPhase::Enter, on_a),
            Err(EngineError::ListenerNotFound(on_a))
        );
        assert!(world.off_collision(b, CollisionPhase::Enter, on_b).is_ok());
        assert!(world.off_collision(a, CollisionPhase::Enter, on_a).is_ok());
    }

    #[test]
    fn render_phase_draws_layers_back_to_front() {
        let mut world = World::new();
        let parent = world.next_id();
        world
            .spawn_root(
                Entity::new(parent)
                    .with_position(DVec2::new(10.0, 10.0))
                    .with_scale(DVec2::splat(2.0))
                    .with_component(Label::new("hud").with_layer(RenderLayer::Ui)),
            )
            .unwrap();
        let child = world.next_id();
        world
            .spawn_child(
                parent,
                Entity::new(child)
                    .with_position(DVec2::new(5.0, 0.0))
                    .with_component(SpriteRenderer::new(DVec2::new(4.0, 3.0)).with_layer(RenderLayer::Background)),
            )
            .unwrap();
        world.tick(16.0).unwrap();

        let layers: Vec<RenderLayer> = world.draw_list().iter().map(DrawCommand::layer).collect();
        assert_eq!(layers, vec![RenderLayer::Background, RenderLayer::Ui]);
        match &world.draw_list().commands[0] {
            DrawCommand::Rect { rect, .. } => assert_eq!(*rect, Rect::new(20.0, 10.0, 8.0, 6.0)),
            other => panic!("unexpected {other:?}"),
        }

        world.set_active(child, false).unwrap();
        world.render();
        assert_eq!(world.draw_list().texts(), vec!["hud"]);
        assert_eq!(world.draw_list().len(), 1);
    }

    #[test]
    fn listener_may_destroy_collider_mid_pass() {
        let mut world = World::new();
        let (_, a) = boxed(&mut world, ColliderTag::Player, DVec2::ZERO, DVec2::splat(10.0));
        let (b, b_col) = boxed(&mut world, ColliderTag::Platform, DVec2::splat(5.0), DVec2::splat(10.0));
        let (_, c) = boxed(&mut world, ColliderTag::Trigger, DVec2::splat(2.0), DVec2::splat(10.0));
        world
            .on_collision(a, CollisionPhase::Enter, move |w: &mut World, e: &CollisionEvent| {
                if e.other_tag == ColliderTag::Platform {
                    if let Err(err) = w.destroy_entity(b) {
                        w.report(err);
                    }
                }
            })
            .unwrap();
        let c_log = record(&mut world, c);

        world.tick(16.0).unwrap();
        assert!(world.scene.is_destroyed(b));
        // b vanished before c was visited
        assert_eq!(phases(&c_log), vec![CollisionPhase::Enter]);
        assert_eq!(world.colliding_colliders(c), vec![a]);
        assert_eq!(world.colliding_colliders(a), vec![b_col, c]);

        let a_log = record(&mut world, a);
        world.tick(16.0).unwrap();
        assert_eq!(
            a_log.borrow().as_slice(),
            &[(CollisionPhase::Exit, ColliderTag::Platform), (CollisionPhase::Stay, ColliderTag::Trigger)]
        );
        assert_eq!(world.colliding_colliders(a), vec![c]);
    }

    #[test]
    fn components_in_children_finds_nested_colliders() {
        let mut world = World::new();
        let root = world.next_id();
        world.spawn_root(Entity::new(root)).unwrap();
        let kid = world.next_id();
        world
            .spawn_child(root, Entity::new(kid).with_component(Collider::rectangle(ColliderTag::Wall, DVec2::ONE)))
            .unwrap();
        let found = world.scene.components_in_children(root, ComponentType::Collider);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].entity, kid);
    }

    #[test]
    fn end_to_end_player_lands_on_platform() {
        let mut world = World::new();
        let player = world.next_id();
        let player_entity = Entity::new(player)
            .with_position(DVec2::new(100.0, 100.0))
            .with_component(Rigidbody::new().with_velocity(DVec2::new(0.0, 5.0)))
            .with_component(Collider::rectangle(ColliderTag::Player, DVec2::new(50.0, 50.0)));
        world.spawn_root(player_entity).unwrap();

        let platform = world.next_id();
        let platform_entity = Entity::new(platform)
            .with_position(DVec2::new(90.0, 140.0))
            .with_component(Collider::rectangle(ColliderTag::Platform, DVec2::new(60.0, 20.0)));
        let platform_col = platform_entity.component_id::<Collider>().unwrap();
        world.spawn_root(platform_entity).unwrap();

        let enters: Log = Rc::default();
        let seen = Rc::clone(&enters);
        world
            .on_collision(platform_col, CollisionPhase::Enter, move |w: &mut World, e: &CollisionEvent| {
                seen.borrow_mut().push((CollisionPhase::Enter, e.other_tag));
                if e.other_tag == ColliderTag::Player {
                    if let Some(body) = w.scene.get_component_mut::<Rigidbody>(e.other.entity) {
                        body.velocity.y = -5.0;
                    }
                }
            })
            .unwrap();

        world.start();
        for _ in 0..4 {
            world.tick(16.0).unwrap();
        }

        assert_eq!(enters.borrow().as_slice(), &[(CollisionPhase::Enter, ColliderTag::Player)]);
        let body = world.scene.get_component::<Rigidbody>(player).unwrap();
        assert_eq!(body.velocity.y, -5.0);
    }
}
