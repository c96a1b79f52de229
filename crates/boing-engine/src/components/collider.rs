// components/collider.rs
//
// Collidable geometry attached to an entity. The shape is stored relative to
// the owner's transform (offset in the owner's local frame, size scaled by its
// world scale); world geometry is derived on demand.
//
// A collider keeps its own "currently overlapping" list and its own event bus.
// Registration with the physics registry is driven by activation (see World).

use glam::DVec2;

use crate::api::types::{ColliderId, ComponentId, ListenerId};
use crate::components::transform::WorldFrame;
use crate::core::geometry::{Rect, WorldShape};
use crate::core::world::World;
use crate::error::EngineError;
use crate::events::bus::EventBus;

/// Gameplay classification used to filter collision responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColliderTag {
    #[default]
    Default,
    Player,
    Platform,
    Wall,
    Ceiling,
    PlatformSpawner,
    Trigger,
    GameOverTrigger,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ColliderShape {
    /// Axis-aligned box; the offset is its top-left corner.
    Rectangle { size: DVec2 },
    /// The offset is its center.
    Circle { radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollisionPhase {
    Enter,
    Stay,
    Exit,
}

/// Delivered to the bus of `collider`; `other` is the partner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollisionEvent {
    pub collider: ComponentId,
    pub other: ComponentId,
    pub tag: ColliderTag,
    pub other_tag: ColliderTag,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Overlap {
    pub other: ComponentId,
    pub other_tag: ColliderTag,
}

pub type CollisionBus = EventBus<CollisionPhase, CollisionEvent, World>;

#[derive(Debug)]
pub struct Collider {
    pub tag: ColliderTag,
    pub shape: ColliderShape,
    /// Position relative to the owner's transform, in the owner's local frame.
    pub offset: DVec2,
    /// Advisory only. Mirrored from a Rigidbody on the same entity when present.
    pub velocity: DVec2,
    /// Draw an outline on the Ui layer.
    pub debug: bool,
    pub(crate) id: Option<ColliderId>,
    pub(crate) overlaps: Vec<Overlap>,
    pub(crate) events: CollisionBus,
}

impl Collider {
    pub fn new(tag: ColliderTag, shape: ColliderShape) -> Self {
        Self {
            tag,
            shape,
            offset: DVec2::ZERO,
            velocity: DVec2::ZERO,
            debug: false,
            id: None,
            overlaps: Vec::new(),
            events: EventBus::new(),
        }
    }

    pub fn rectangle(tag: ColliderTag, size: DVec2) -> Self {
        Self::new(tag, ColliderShape::Rectangle { size })
    }

    pub fn circle(tag: ColliderTag, radius: f64) -> Self {
        Self::new(tag, ColliderShape::Circle { radius })
    }

    pub fn with_offset(mut self, offset: DVec2) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Registry id; `None` while inactive or not yet registered.
    pub fn collider_id(&self) -> Option<ColliderId> {
        self.id
    }

    pub fn is_registered(&self) -> bool {
        self.id.is_some()
    }

    pub fn is_colliding_with(&self, other: ComponentId) -> bool {
        self.overlaps.iter().any(|o| o.other == other)
    }

    /// Partners currently overlapping, in the order contact began.
    pub fn colliding_colliders(&self) -> Vec<ComponentId> {
        self.overlaps.iter().map(|o| o.other).collect()
    }

    /// Subscribe to one collision phase. Allowed before the collider is attached.
    pub fn on_collision<F>(&mut self, phase: CollisionPhase, listener: F) -> ListenerId
    where
        F: Fn(&mut World, &CollisionEvent) + 'static,
    {
        self.events.on(phase, listener)
    }

    pub fn once_collision<F>(&mut self, phase: CollisionPhase, listener: F) -> ListenerId
    where
        F: Fn(&mut World, &CollisionEvent) + 'static,
    {
        self.events.once(phase, listener)
    }

    pub fn off_collision(&mut self, phase: CollisionPhase, id: ListenerId) -> Result<(), EngineError> {
        self.events.off(phase, id)
    }

    /// Builder form of `on_collision`.
    pub fn with_listener<F>(mut self, phase: CollisionPhase, listener: F) -> Self
    where
        F: Fn(&mut World, &CollisionEvent) + 'static,
    {
        self.events.on(phase, listener);
        self
    }

    /// World-space shape given the owner's frame.
    pub fn world_shape(&self, owner: &WorldFrame) -> WorldShape {
        let origin = owner.to_world(self.offset);
        match self.shape {
            ColliderShape::Rectangle { size } => {
                WorldShape::Rect(Rect::from_pos_size(origin, size * owner.scale))
            }
            ColliderShape::Circle { radius } => WorldShape::Circle {
                center: origin,
                radius: radius * owner.scale.x.abs().max(owner.scale.y.abs()),
            },
        }
    }

    /// Move/resize so that the world-space bounds become `bounds`.
    /// Circles take the bounds' center and half of its smaller side.
    pub fn set_world_bounds(&mut self, owner: &WorldFrame, bounds: Rect) {
        match &mut self.shape {
            ColliderShape::Rectangle { size } => {
                self.offset = owner.to_local(bounds.position());
                *size = bounds.size() / owner.scale;
            }
            ColliderShape::Circle { radius } => {
                let scale = owner.scale.x.abs().max(owner.scale.y.abs());
                self.offset = owner.to_local(bounds.center());
                *radius = bounds.half_width().min(bounds.half_height()) / scale;
            }
        }
    }

    pub(crate) fn add_overlap(&mut self, other: ComponentId, other_tag: ColliderTag) {
        if !self.is_colliding_with(other) {
            self.overlaps.push(Overlap { other, other_tag });
        }
    }

    /// Returns the partner's tag if it was present.
    pub(crate) fn remove_overlap(&mut self, other: ComponentId) -> Option<ColliderTag> {
        let index = self.overlaps.iter().position(|o| o.other == other)?;
        Some(self.overlaps.remove(index).other_tag)
    }

    pub(crate) fn clear_overlaps(&mut self) {
        self.overlaps.clear();
    }
}
