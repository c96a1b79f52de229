use std::fmt;

/// Unique identifier for an entity in a world. Never reused within one world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "entity#{}", self.0)
    }
}

/// Identifies one component: the owning entity plus a per-entity slot.
/// Slots are never reused, so a `ComponentId` is unique for the lifetime of its world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentId {
    pub entity: EntityId,
    pub slot: u32,
}

impl ComponentId {
    /// Slot 0 of every entity is its Transform.
    pub const TRANSFORM_SLOT: u32 = 0;

    pub fn new(entity: EntityId, slot: u32) -> Self {
        Self { entity, slot }
    }

    pub fn is_transform(&self) -> bool {
        self.slot == Self::TRANSFORM_SLOT
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/component#{}", self.entity, self.slot)
    }
}

/// Registry id of an active collider.
///
/// `index` is the registry slot; `generation` increments each time the slot is
/// recycled, so an id held after unregistration never resolves to a newer collider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId {
    index: u32,
    generation: u32,
}

impl ColliderId {
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Numeric slot in the registry.
    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Display for ColliderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "collider#{}v{}", self.index, self.generation)
    }
}

/// Handle returned when subscribing to an event bus; pass it back to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}
