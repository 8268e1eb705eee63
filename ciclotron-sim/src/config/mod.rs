//! Protocol configuration loading and parsing
//!
//! Loads a protocol from a TOML file or the built-in default.

pub mod loader;
pub mod toml;

pub use self::loader::load;
