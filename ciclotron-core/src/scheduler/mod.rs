//! Run scheduler
//!
//! Simulates a heating run over the protocol's stages.

pub mod executor;

pub use executor::{ExecutionPhase, HeaterCommand, Scheduler, StageState};
