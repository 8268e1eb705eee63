//! Board-agnostic core logic for the Ciclotron thermal cycler simulator
//!
//! This crate contains all protocol logic that does not depend on how the
//! protocol is displayed or loaded:
//!
//! - Protocol configuration types and the default protocol
//! - Stage collection model (single source of truth for the stages)
//! - Stage editor (chart projection, input coercion, proportional rescale)
//! - Heating run scheduler
//! - View state machine

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod config;
pub mod editor;
pub mod model;
pub mod scheduler;
pub mod state;
pub mod time;
