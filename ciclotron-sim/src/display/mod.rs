//! Terminal display
//!
//! The simulator acts as its own "dumb terminal": the controller owns all
//! UI logic and the renderer only turns view data into text screens.

pub mod renderer;

pub use renderer::{Renderer, RunStatus};
