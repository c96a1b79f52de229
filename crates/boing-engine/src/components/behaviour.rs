// components/behaviour.rs
//
// Gameplay logic as a component. The world drives the hooks:
//   start:   once, at World::start, or on the first tick after a late init
//   update:  every tick while the component is active
//   destroy: when the component or its entity is destroyed
//
// During a hook the behaviour is taken out of its entity, so it is free to
// mutate the rest of the world through `world`.

use std::any::Any;

use crate::api::types::ComponentId;
use crate::core::world::World;
use crate::error::EngineError;

pub trait Behaviour: Any {
    fn start(&mut self, _world: &mut World, _me: ComponentId) -> Result<(), EngineError> {
        Ok(())
    }

    fn update(&mut self, _world: &mut World, _me: ComponentId, _dt_ms: f64) -> Result<(), EngineError> {
        Ok(())
    }

    fn destroy(&mut self, _world: &mut World, _me: ComponentId) -> Result<(), EngineError> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Implements the `Any` accessors of `Behaviour` inside an impl block.
///
/// ```ignore
/// impl Behaviour for Spinner {
///     boing_engine::behaviour_any!();
/// }
/// ```
#[macro_export]
macro_rules! behaviour_any {
    () => {
        fn as_any(&self) -> &dyn ::std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
            self
        }
    };
}

/// Storage for a behaviour; empty while one of its hooks is running.
pub struct BehaviourSlot {
    pub(crate) inner: Option<Box<dyn Behaviour>>,
    pub(crate) started: bool,
}

impl BehaviourSlot {
    pub fn new<B: Behaviour>(behaviour: B) -> Self {
        Self {
            inner: Some(Box::new(behaviour)),
            started: false,
        }
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    pub fn downcast_ref<B: Behaviour>(&self) -> Option<&B> {
        self.inner.as_ref()?.as_any().downcast_ref::<B>()
    }

    pub fn downcast_mut<B: Behaviour>(&mut self) -> Option<&mut B> {
        self.inner.as_mut()?.as_any_mut().downcast_mut::<B>()
    }

    pub(crate) fn holds<B: Behaviour>(&self) -> bool {
        self.downcast_ref::<B>().is_some()
    }
}

impl std::fmt::Debug for BehaviourSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BehaviourSlot")
            .field("present", &self.inner.is_some())
            .field("started", &self.started)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Counter(u32);

    impl Behaviour for Counter {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    struct Other;

    impl Behaviour for Other {
        crate::behaviour_any!();
    }

    #[test]
    fn downcast_matches_concrete_type() {
        let mut slot = BehaviourSlot::new(Counter(3));
        assert!(slot.holds::<Counter>());
        assert!(!slot.holds::<Other>());
        slot.downcast_mut::<Counter>().unwrap().0 += 1;
        assert_eq!(slot.downcast_ref::<Counter>().unwrap().0, 4);
    }

    #[test]
    fn empty_slot_downcasts_to_none() {
        let mut slot = BehaviourSlot::new(Other);
        slot.inner.take();
        assert!(slot.downcast_ref::<Other>().is_none());
    }
}
