use crate::components::layer::RenderLayer;
use crate::renderer::draw::Color;

/// Text drawn at the owner's world position.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    pub text: String,
    pub font_size: f64,
    pub font_family: String,
    pub color: Color,
    pub layer: RenderLayer,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            text: "Sample Text".to_string(),
            font_size: 12.0,
            font_family: "Arial".to_string(),
            color: Color::BLACK,
            layer: RenderLayer::Ui,
        }
    }
}

impl Label {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn with_font(mut self, size: f64, family: impl Into<String>) -> Self {
        self.font_size = size;
        self.font_family = family.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_layer(mut self, layer: RenderLayer) -> Self {
        self.layer = layer;
        self
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// CSS-style font shorthand, e.g. `24px Arial`.
    pub fn font(&self) -> String {
        format!("{}px {}", self.font_size, self.font_family)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let label = Label::default();
        assert_eq!(label.text, "Sample Text");
        assert_eq!(label.font(), "12px Arial");
        assert_eq!(label.color, Color::BLACK);
    }

    #[test]
    fn builder_overrides() {
        let label = Label::new("Score: 0").with_font(24.0, "Courier").with_layer(RenderLayer::Foreground);
        assert_eq!(label.font(), "24px Courier");
        assert_eq!(label.layer, RenderLayer::Foreground);
    }
}
