// components/mod.rs
//
// A component is owned by exactly one entity. Its identity (`ComponentId`) is
// the owner plus a slot that is never reused. The variant payload lives in
// `ComponentKind`; the entity's Transform is stored separately (slot 0).

pub mod behaviour;
pub mod collider;
pub mod entity;
pub mod label;
pub mod layer;
pub mod rigidbody;
pub mod sprite;
pub mod transform;

use crate::api::types::{ComponentId, ListenerId};
use crate::core::world::FrameEvent;

use behaviour::{Behaviour, BehaviourSlot};
use collider::Collider;
use label::Label;
use layer::RenderLayer;
use rigidbody::Rigidbody;
use sprite::SpriteRenderer;
use transform::Transform;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    Transform,
    Collider,
    SpriteRenderer,
    Label,
    Rigidbody,
    Behaviour,
}

#[derive(Debug)]
pub enum ComponentKind {
    /// Replaces the default transform when given to the entity builder.
    /// Never stored: an entity owns exactly one transform, outside its list.
    Transform(Transform),
    Collider(Collider),
    Sprite(SpriteRenderer),
    Label(Label),
    Rigidbody(Rigidbody),
    Behaviour(BehaviourSlot),
}

impl ComponentKind {
    pub fn behaviour<B: Behaviour>(behaviour: B) -> Self {
        ComponentKind::Behaviour(BehaviourSlot::new(behaviour))
    }

    pub fn component_type(&self) -> ComponentType {
        match self {
            ComponentKind::Transform(_) => ComponentType::Transform,
            ComponentKind::Collider(_) => ComponentType::Collider,
            ComponentKind::Sprite(_) => ComponentType::SpriteRenderer,
            ComponentKind::Label(_) => ComponentType::Label,
            ComponentKind::Rigidbody(_) => ComponentType::Rigidbody,
            ComponentKind::Behaviour(_) => ComponentType::Behaviour,
        }
    }

    /// Layer for drawable kinds.
    pub(crate) fn render_layer(&self) -> Option<RenderLayer> {
        match self {
            ComponentKind::Sprite(s) => Some(s.layer),
            ComponentKind::Label(l) => Some(l.layer),
            _ => None,
        }
    }

    /// Whether the kind takes part in frame events.
    pub(crate) fn frame_events(&self) -> &'static [FrameEvent] {
        match self {
            ComponentKind::Rigidbody(_) => &[FrameEvent::Update],
            ComponentKind::Behaviour(_) => &[FrameEvent::Start, FrameEvent::Update],
            _ => &[],
        }
    }
}

impl From<Transform> for ComponentKind {
    fn from(t: Transform) -> Self {
        ComponentKind::Transform(t)
    }
}

impl From<Collider> for ComponentKind {
    fn from(c: Collider) -> Self {
        ComponentKind::Collider(c)
    }
}

impl From<SpriteRenderer> for ComponentKind {
    fn from(s: SpriteRenderer) -> Self {
        ComponentKind::Sprite(s)
    }
}

impl From<Label> for ComponentKind {
    fn from(l: Label) -> Self {
        ComponentKind::Label(l)
    }
}

impl From<Rigidbody> for ComponentKind {
    fn from(r: Rigidbody) -> Self {
        ComponentKind::Rigidbody(r)
    }
}

/// Typed access to a component payload.
pub trait ComponentData: Sized + 'static {
    const TYPE: ComponentType;
    fn from_kind(kind: &ComponentKind) -> Option<&Self>;
    fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self>;
}

macro_rules! component_data {
    ($ty:ty, $variant:ident, $tag:ident) => {
        impl ComponentData for $ty {
            const TYPE: ComponentType = ComponentType::$tag;

            fn from_kind(kind: &ComponentKind) -> Option<&Self> {
                match kind {
                    ComponentKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }

            fn from_kind_mut(kind: &mut ComponentKind) -> Option<&mut Self> {
                match kind {
                    ComponentKind::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

component_data!(Collider, Collider, Collider);
component_data!(SpriteRenderer, Sprite, SpriteRenderer);
component_data!(Label, Label, Label);
component_data!(Rigidbody, Rigidbody, Rigidbody);

/// A component attached to an entity.
#[derive(Debug)]
pub struct Component {
    id: ComponentId,
    pub(crate) active: bool,
    pub(crate) initialized: bool,
    pub kind: ComponentKind,
    pub(crate) frame_listeners: Vec<(FrameEvent, ListenerId)>,
    pub(crate) render_listener: Option<(RenderLayer, ListenerId)>,
}

impl Component {
    pub(crate) fn new(id: ComponentId, kind: ComponentKind) -> Self {
        Self {
            id,
            active: true,
            initialized: false,
            kind,
            frame_listeners: Vec::new(),
            render_listener: None,
        }
    }

    pub fn id(&self) -> ComponentId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn component_type(&self) -> ComponentType {
        self.kind.component_type()
    }

    pub fn get<T: ComponentData>(&self) -> Option<&T> {
        T::from_kind(&self.kind)
    }

    pub fn get_mut<T: ComponentData>(&mut self) -> Option<&mut T> {
        T::from_kind_mut(&mut self.kind)
    }

    /// Unwrap the payload of a component that has been removed from its entity.
    pub fn into_kind(self) -> ComponentKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::components::collider::ColliderTag;
    use glam::DVec2;

    #[test]
    fn typed_access_matches_variant() {
        let id = ComponentId::new(EntityId(1), 1);
        let mut c = Component::new(id, Rigidbody::new().with_gravity(1.0).into());
        assert_eq!(c.component_type(), ComponentType::Rigidbody);
        assert!(c.get::<Collider>().is_none());
        c.get_mut::<Rigidbody>().unwrap().gravity = 2.0;
        assert_eq!(c.get::<Rigidbody>().unwrap().gravity, 2.0);
    }

    #[test]
    fn kinds_report_their_hooks() {
        let collider: ComponentKind = Collider::rectangle(ColliderTag::Wall, DVec2::ONE).into();
        assert!(collider.frame_events().is_empty());
        assert_eq!(collider.render_layer(), None);

        let label: ComponentKind = Label::new("hi").into();
        assert_eq!(label.render_layer(), Some(RenderLayer::Ui));
    }
}
