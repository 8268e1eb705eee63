//! Configuration type definitions
//!
//! These types describe a thermal-cycling protocol. A protocol is loaded
//! from a TOML file on the host, or seeded from the built-in default.

use heapless::{String, Vec};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum label length (bytes)
pub const MAX_LABEL_LEN: usize = 16;

/// Maximum stages per protocol
pub const MAX_STAGES: usize = 32;

/// Stage or protocol label
pub type Label = String<MAX_LABEL_LEN>;

/// Ordered stage sequence
pub type StageList = Vec<Stage, MAX_STAGES>;

/// One temperature/duration step of a protocol
///
/// Stage names are not unique: consecutive stages sharing a name express
/// sub-steps of one logical stage (e.g. denature/anneal/extend in "Stage 2").
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stage {
    /// Display name
    pub name: Label,
    /// Target temperature (°C)
    pub temperature_c: f32,
    /// Hold duration in seconds
    pub duration_s: u32,
}

impl Stage {
    /// Create a stage, truncating the name to `MAX_LABEL_LEN`
    pub fn new(name: &str, temperature_c: f32, duration_s: u32) -> Self {
        Self {
            name: label(name),
            temperature_c,
            duration_s,
        }
    }
}

/// Build a label from `text`, truncated on a char boundary
pub fn label(text: &str) -> Label {
    let mut end = text.len().min(MAX_LABEL_LEN);
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    let mut out = Label::new();
    // Cannot fail: `end` is within capacity
    let _ = out.push_str(&text[..end]);
    out
}

/// Built-in protocol: initial denaturation, three-step cycle, final extension
pub fn default_stages() -> StageList {
    let mut stages = StageList::new();
    for (name, temperature_c, duration_s) in [
        ("Stage 1", 95.0, 120),
        ("Stage 2", 94.0, 30),
        ("Stage 2", 50.7, 30),
        ("Stage 2", 72.0, 60),
        ("Stage 3", 72.0, 600),
        ("Stage 3", 15.0, 15),
    ] {
        let _ = stages.push(Stage::new(name, temperature_c, duration_s));
    }
    stages
}

/// Run simulation settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RunConfig {
    /// Seconds spent on the completion screen before showing results
    pub redirect_delay_s: u16,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            redirect_delay_s: 3,
        }
    }
}

/// Complete protocol definition
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ProtocolConfig {
    /// Display label
    pub label: Label,
    /// Stages in execution order
    pub stages: StageList,
    /// Run simulation settings
    pub run: RunConfig,
}

impl Default for ProtocolConfig {
    fn default() -> Self {
        Self {
            label: label("Standard PCR"),
            stages: default_stages(),
            run: RunConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_stages() {
        let stages = default_stages();
        assert_eq!(stages.len(), 6);
        assert_eq!(stages[0].name.as_str(), "Stage 1");
        assert_eq!(stages[2].temperature_c, 50.7);

        let total: u32 = stages.iter().map(|s| s.duration_s).sum();
        assert_eq!(total, 855);
    }

    #[test]
    fn test_label_truncation() {
        let l = label("A very long stage name indeed");
        assert_eq!(l.len(), MAX_LABEL_LEN);
        assert_eq!(l.as_str(), "A very long stag");
    }

    #[test]
    fn test_label_truncation_char_boundary() {
        // 15 ASCII bytes followed by a 2-byte char straddling the limit
        let l = label("Denature at 195°C");
        assert_eq!(l.as_str(), "Denature at 195");
    }

    #[test]
    fn test_default_run_config() {
        assert_eq!(RunConfig::default().redirect_delay_s, 3);
    }
}
