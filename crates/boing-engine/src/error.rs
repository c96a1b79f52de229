//! Engine error taxonomy.
//!
//! Every error here is a programmer error or an internal consistency failure;
//! nothing is transient, so callers propagate instead of retrying.

use thiserror::Error;

use crate::api::types::{ColliderId, ComponentId, EntityId, ListenerId};

/// Errors surfaced by entity, component, event and registry operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Operation on an entity or component after `destroy()`.
    #[error("{0} has already been destroyed")]
    AlreadyDestroyed(String),

    /// Removal of a component the entity does not own.
    #[error("component not found: {0}")]
    ComponentNotFound(ComponentId),

    /// Removal of a child the parent does not own.
    #[error("{child} is not a child of {parent}")]
    ChildNotFound { parent: EntityId, child: EntityId },

    /// Removal of a listener that was never registered for the event.
    #[error("{0} is not registered for this event")]
    ListenerNotFound(ListenerId),

    /// A component needs a sibling component that is absent.
    #[error("missing dependency: {0}")]
    MissingDependency(String),

    /// The collider registry disagrees with a collider's own bookkeeping.
    #[error("invalid collider registry state: {0}")]
    InvalidRegistryState(String),

    /// The id was never spawned in this world.
    #[error("entity not found: {0}")]
    EntityNotFound(EntityId),

    /// An entity holds exactly one Transform.
    #[error("{0} already has a transform")]
    DuplicateTransform(EntityId),

    /// Attaching would make an entity its own ancestor.
    #[error("{child} is an ancestor of {parent}")]
    HierarchyCycle { parent: EntityId, child: EntityId },
}

impl EngineError {
    pub(crate) fn stale_collider(id: ColliderId) -> Self {
        EngineError::InvalidRegistryState(format!("{id} is not registered"))
    }
}
