use glam::DVec2;

use crate::components::layer::RenderLayer;
use crate::renderer::draw::Color;

/// Filled rectangle, optionally textured, drawn at the owner.
///
/// Drawn as a rectangle at the owner's world position, `size` scaled by the
/// owner's world scale. `image` is an opaque key for whatever backend consumes
/// the draw list; the engine never loads it.
#[derive(Debug, Clone, PartialEq)]
pub struct SpriteRenderer {
    pub layer: RenderLayer,
    /// Rendered size in the owner's local units.
    pub size: DVec2,
    pub color: Color,
    pub image: Option<String>,
}

impl Default for SpriteRenderer {
    fn default() -> Self {
        Self {
            layer: RenderLayer::default(),
            size: DVec2::ONE,
            color: Color::WHITE,
            image: None,
        }
    }
}

impl SpriteRenderer {
    pub fn new(size: DVec2) -> Self {
        Self {
            size,
            ..Self::default()
        }
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}
