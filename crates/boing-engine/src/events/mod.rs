pub mod bus;
pub mod layered;

pub use bus::{EventBus, Listener};
pub use layered::LayeredEventBus;
