pub mod debug;
pub mod rng;
