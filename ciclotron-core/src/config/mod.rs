//! Configuration types
//!
//! Protocol definitions shared by the model, editor and scheduler.

pub mod types;

pub use types::*;
