// taillight - lib.rs
//
// Library entry point, exposing all non-terminal modules for integration
// testing and programmatic use.
//
// The CLI rendering lives in `main.rs` and is not part of the library
// surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;

pub use util::error::{Result, TaillightError};
