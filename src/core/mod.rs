// taillight - core/mod.rs
//
// Core business logic layer.
// classify and render are pure; discovery reads file metadata only (walkdir
// as an OS abstraction) and never file contents -- content loading is owned
// by the app layer. Must NOT depend on: app, platform, or the terminal.

pub mod classify;
pub mod discovery;
pub mod model;
pub mod render;
