// runtime/mod.rs
//
// Drives a `Game` from an external frame clock. The host (a browser frame
// callback, a headless loop, a test) only has to call `GameRunner::tick`.

pub mod runner;

pub use runner::GameRunner;
