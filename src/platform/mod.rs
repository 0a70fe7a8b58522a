// taillight - platform/mod.rs
//
// Platform abstraction layer: config directories, filesystem helpers.

pub mod config;
pub mod fs;
