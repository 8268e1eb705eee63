//! Stage collection model
//!
//! Holds the ordered protocol stages and derives their total duration.

pub mod collection;

pub use collection::{total_duration, CollectionView, StageCollection};
