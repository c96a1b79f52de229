// events/layered.rs
//
// Layer key -> EventBus. Used by the render phase to fan one event out across
// the ordered layer list; `emit_all` visits layers in their `Ord` order.

use std::collections::BTreeMap;
use std::hash::Hash;

use crate::api::types::ListenerId;
use crate::error::EngineError;
use crate::events::bus::EventBus;

pub struct LayeredEventBus<E, L, A, C: ?Sized> {
    layers: BTreeMap<L, EventBus<E, A, C>>,
}

impl<E, L, A, C> LayeredEventBus<E, L, A, C>
where
    E: Copy + Eq + Hash,
    L: Copy + Ord + 'static,
    C: ?Sized,
{
    pub fn new() -> Self {
        Self {
            layers: BTreeMap::new(),
        }
    }

    pub fn on<F>(&mut self, event: E, layer: L, listener: F) -> ListenerId
    where
        F: Fn(&mut C, &A) + 'static,
    {
        self.layers.entry(layer).or_default().on(event, listener)
    }

    pub fn once<F>(&mut self, event: E, layer: L, listener: F) -> ListenerId
    where
        F: Fn(&mut C, &A) + 'static,
    {
        self.layers.entry(layer).or_default().once(event, listener)
    }

    /// Fails with `ListenerNotFound` unless `id` is registered under `(event, layer)`.
    pub fn off(&mut self, event: E, layer: L, id: ListenerId) -> Result<(), EngineError> {
        match self.layers.get_mut(&layer) {
            Some(bus) => bus.off(event, id),
            None => Err(EngineError::ListenerNotFound(id)),
        }
    }

    pub fn layer(&self, layer: L) -> Option<&EventBus<E, A, C>> {
        self.layers.get(&layer)
    }

    pub fn listener_count(&self, event: E, layer: L) -> usize {
        self.layers.get(&layer).map_or(0, |bus| bus.listener_count(event))
    }

    /// Dispatch to the listeners of one `(event, layer)` pair.
    pub fn emit<F>(ctx: &mut C, locate: F, event: E, layer: L, args: &A) -> usize
    where
        F: Fn(&mut C) -> Option<&mut Self>,
    {
        EventBus::emit(
            ctx,
            |c: &mut C| locate(c).and_then(|layered| layered.layers.get_mut(&layer)),
            event,
            args,
        )
    }

    /// Dispatch to every layer, back to front.
    pub fn emit_all<F>(ctx: &mut C, locate: F, event: E, args: &A) -> usize
    where
        F: Fn(&mut C) -> Option<&mut Self>,
    {
        let layers: Vec<L> = match locate(ctx) {
            Some(layered) => layered.layers.keys().copied().collect(),
            None => return 0,
        };
        layers
            .into_iter()
            .map(|layer| Self::emit(ctx, &locate, event, layer, args))
            .sum()
    }
}

impl<E, L, A, C> Default for LayeredEventBus<E, L, A, C>
where
    E: Copy + Eq + Hash,
    L: Copy + Ord + 'static,
    C: ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<E, L, A, C: ?Sized> std::fmt::Debug for LayeredEventBus<E, L, A, C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredEventBus")
            .field("layers", &self.layers.len())
            .finish()
    }
}
