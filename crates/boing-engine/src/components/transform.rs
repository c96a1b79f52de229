// components/transform.rs
//
// Local position/rotation/scale relative to the parent entity, plus the world
// frame obtained by folding a parent chain from the root down.
//
//   world_scale = parent_world_scale * local_scale
//   world_pos   = parent_world_pos + local_pos * parent_world_scale
//
// Rotation is in radians and accumulates additively down the chain; it is
// carried for consumers but does not rotate positions.

use glam::DVec2;

/// Local transform of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Position relative to the parent (or the world for roots).
    pub position: DVec2,
    /// Rotation in radians relative to the parent.
    pub rotation: f64,
    /// Scale multiplier relative to the parent.
    pub scale: DVec2,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: DVec2::ZERO,
            rotation: 0.0,
            scale: DVec2::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: DVec2) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn with_position(mut self, position: DVec2) -> Self {
        self.position = position;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: DVec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn translate(&mut self, delta: DVec2) {
        self.position += delta;
    }
}

/// A resolved world-space frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldFrame {
    pub position: DVec2,
    pub rotation: f64,
    pub scale: DVec2,
}

impl WorldFrame {
    /// The frame of "no parent".
    pub const IDENTITY: WorldFrame = WorldFrame {
        position: DVec2::ZERO,
        rotation: 0.0,
        scale: DVec2::ONE,
    };

    /// Frame of a child whose local transform is `local`.
    pub fn child(&self, local: &Transform) -> WorldFrame {
        WorldFrame {
            position: self.to_world(local.position),
            rotation: self.rotation + local.rotation,
            scale: self.scale * local.scale,
        }
    }

    /// Map a point expressed in this frame into world space.
    pub fn to_world(&self, point: DVec2) -> DVec2 {
        self.position + point * self.scale
    }

    /// Inverse of `to_world`. A zero scale axis yields a non-finite result.
    pub fn to_local(&self, point: DVec2) -> DVec2 {
        (point - self.position) / self.scale
    }

    /// Resolve a chain of local transforms, ordered root first.
    pub fn resolve<'a>(chain: impl IntoIterator<Item = &'a Transform>) -> WorldFrame {
        chain
            .into_iter()
            .fold(WorldFrame::IDENTITY, |frame, local| frame.child(local))
    }
}

impl Default for WorldFrame {
    fn default() -> Self {
        Self::IDENTITY
    }
}
