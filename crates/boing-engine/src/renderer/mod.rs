// renderer/mod.rs
//
// Render phase. Once per tick the world clears the draw list and fans the
// `Render` event out across every layer, back to front. Sprite and label
// components subscribe on init; games can subscribe free-form listeners too.
// Turning the draw list into pixels is left to whatever consumes it.

pub mod draw;

pub use draw::{Color, DrawCommand, DrawList};

use crate::api::types::ListenerId;
use crate::components::layer::RenderLayer;
use crate::core::world::World;
use crate::error::EngineError;
use crate::events::layered::LayeredEventBus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RenderEvent {
    Render,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderArgs {
    pub elapsed_ms: f64,
}

pub type RenderBus = LayeredEventBus<RenderEvent, RenderLayer, RenderArgs, World>;

#[derive(Debug, Default)]
pub struct Renderer {
    pub(crate) bus: RenderBus,
    pub draw_list: DrawList,
}

impl Renderer {
    pub fn new() -> Self {
        Self {
            bus: LayeredEventBus::new(),
            draw_list: DrawList::new(),
        }
    }

    pub fn on<F>(&mut self, layer: RenderLayer, listener: F) -> ListenerId
    where
        F: Fn(&mut World, &RenderArgs) + 'static,
    {
        self.bus.on(RenderEvent::Render, layer, listener)
    }

    pub fn off(&mut self, layer: RenderLayer, id: ListenerId) -> Result<(), EngineError> {
        self.bus.off(RenderEvent::Render, layer, id)
    }

    pub fn listener_count(&self, layer: RenderLayer) -> usize {
        self.bus.listener_count(RenderEvent::Render, layer)
    }
}
