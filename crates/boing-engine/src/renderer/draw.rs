use glam::DVec2;

use crate::components::layer::RenderLayer;
use crate::core::geometry::Rect;

/// RGBA color, components in 0..=1.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// From 8-bit channels.
    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One primitive for a drawing backend, in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        layer: RenderLayer,
        rect: Rect,
        rotation: f64,
        color: Color,
        image: Option<String>,
    },
    Text {
        layer: RenderLayer,
        position: DVec2,
        text: String,
        font: String,
        color: Color,
    },
    /// Collider outline, drawn above everything.
    Outline { rect: Rect, color: Color },
    CircleOutline { center: DVec2, radius: f64, color: Color },
}

impl DrawCommand {
    pub fn layer(&self) -> RenderLayer {
        match self {
            DrawCommand::Rect { layer, .. } | DrawCommand::Text { layer, .. } => *layer,
            DrawCommand::Outline { .. } | DrawCommand::CircleOutline { .. } => RenderLayer::Ui,
        }
    }
}

/// Draw commands for the current frame, in submission (back-to-front) order.
#[derive(Debug, Default)]
pub struct DrawList {
    pub commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self {
            commands: Vec::with_capacity(256),
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands.iter()
    }

    /// Every text string drawn this frame, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }
}
