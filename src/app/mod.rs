// taillight - app/mod.rs
//
// Application layer: view state and change watching.
// Dependencies: core layer and the platform fs helpers.

pub mod view;
pub mod watcher;
