use glam::DVec2;

/// Simple per-tick integrator. Owns the entity's velocity.
///
/// Each update: `v += a`, `v.y += gravity`, `v.x *= 1 - drag`, then the owner's
/// local position moves by `v`. Units are world units per tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rigidbody {
    pub velocity: DVec2,
    pub acceleration: DVec2,
    pub mass: f64,
    pub gravity: f64,
    pub drag: f64,
}

impl Default for Rigidbody {
    fn default() -> Self {
        Self {
            velocity: DVec2::ZERO,
            acceleration: DVec2::ZERO,
            mass: 1.0,
            gravity: 0.0,
            drag: 0.0,
        }
    }
}

impl Rigidbody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mass(mut self, mass: f64) -> Self {
        self.mass = mass;
        self
    }

    pub fn with_gravity(mut self, gravity: f64) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn with_drag(mut self, drag: f64) -> Self {
        self.drag = drag;
        self
    }

    pub fn with_velocity(mut self, velocity: DVec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Instantaneous change of velocity scaled by mass.
    pub fn add_force(&mut self, force: DVec2) {
        self.velocity += force / self.mass;
    }

    /// Advance one tick and return the displacement to apply.
    pub fn integrate(&mut self) -> DVec2 {
        self.velocity += self.acceleration;
        self.velocity.y += self.gravity;
        self.velocity.x *= 1.0 - self.drag;
        self.velocity
    }
}
