pub mod api;
pub mod components;
pub mod core;
pub mod error;
pub mod events;
pub mod input;
pub mod renderer;
pub mod runtime;
pub mod systems;

// Re-export key types at crate root for convenience
pub use api::game::{Game, GameConfig};
pub use api::types::{ColliderId, ComponentId, EntityId, ListenerId};
pub use components::behaviour::Behaviour;
pub use components::collider::{Collider, ColliderShape, ColliderTag, CollisionEvent, CollisionPhase};
pub use components::entity::Entity;
pub use components::label::Label;
pub use components::layer::RenderLayer;
pub use components::rigidbody::Rigidbody;
pub use components::sprite::SpriteRenderer;
pub use components::transform::{Transform, WorldFrame};
pub use components::{Component, ComponentKind, ComponentType};
pub use core::geometry::{Rect, WorldShape};
pub use core::physics::{ColliderRegistry, Physics};
pub use core::scene::Scene;
pub use core::time::FixedTimestep;
pub use core::world::{FrameArgs, FrameEvent, World};
pub use error::EngineError;
pub use events::{EventBus, LayeredEventBus};
pub use input::queue::{InputEvent, InputQueue, Key};
pub use renderer::{Color, DrawCommand, DrawList, RenderArgs, Renderer};
pub use runtime::GameRunner;
pub use systems::rng::Rng;
