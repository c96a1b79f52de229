//! Seeded splitmix64 generator for procedural placement.
//!
//! The same seed always lays out the same platforms, which keeps headless
//! runs and tests reproducible.

use glam::DVec2;

const GOLDEN_GAMMA: u64 = 0x9e37_79b9_7f4a_7c15;

#[derive(Debug, Clone)]
pub struct Rng {
    state: u64,
}

impl Rng {
    pub fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_add(GOLDEN_GAMMA);
        let mut z = self.state;
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }

    /// Uniform in [0, 1).
    pub fn unit(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Uniform in [min, max). A collapsed range yields `min`.
    pub fn range(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + (max - min) * self.unit()
    }

    /// A point inside the box spanned by `min` and `max`.
    pub fn point_in(&mut self, min: DVec2, max: DVec2) -> DVec2 {
        let x = self.range(min.x, max.x);
        let y = self.range(min.y, max.y);
        DVec2::new(x, y)
    }

    /// -1.0 or 1.0, for picking a travel direction.
    pub fn sign(&mut self) -> f64 {
        if self.next_u64() >> 63 == 0 {
            -1.0
        } else {
            1.0
        }
    }
}
