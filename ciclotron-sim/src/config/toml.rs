//! TOML protocol parser
//!
//! File layout:
//!
//! ```toml
//! [protocol]
//! label = "Standard PCR"
//!
//! [[stages]]
//! name = "Stage 1"
//! temperature_c = 95.0
//! duration_s = 120
//!
//! [run]
//! redirect_delay_s = 3
//! ```
//!
//! `[protocol]` and `[run]` are optional. At least one stage is required.

use serde::Deserialize;

use ciclotron_core::config::{
    label, ProtocolConfig, RunConfig, Stage, StageList, MAX_LABEL_LEN, MAX_STAGES,
};

/// Protocol file errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Not valid TOML, or fields of the wrong type
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// No `[[stages]]` entries
    #[error("protocol has no stages")]
    EmptyProtocol,

    /// More stages than the core can hold
    #[error("protocol has {count} stages, at most {max} are supported")]
    TooManyStages { count: usize, max: usize },

    /// Label or stage name longer than `MAX_LABEL_LEN` bytes
    #[error("label \"{label}\" is longer than {max} bytes")]
    LabelTooLong { label: String, max: usize },

    /// Stage temperature is NaN or infinite
    #[error("stage \"{name}\" has invalid temperature {value}")]
    InvalidTemperature { name: String, value: f32 },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProtocolFile {
    #[serde(default)]
    protocol: ProtocolSection,
    #[serde(default)]
    stages: Vec<StageEntry>,
    #[serde(default)]
    run: RunConfig,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProtocolSection {
    label: String,
}

impl Default for ProtocolSection {
    fn default() -> Self {
        Self {
            label: ProtocolConfig::default().label.as_str().to_owned(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct StageEntry {
    name: String,
    temperature_c: f32,
    duration_s: u32,
}

/// Parse a protocol file
pub fn parse_protocol(input: &str) -> Result<ProtocolConfig, ConfigError> {
    let file: ProtocolFile = toml::from_str(input)?;

    if file.stages.is_empty() {
        return Err(ConfigError::EmptyProtocol);
    }
    if file.stages.len() > MAX_STAGES {
        return Err(ConfigError::TooManyStages {
            count: file.stages.len(),
            max: MAX_STAGES,
        });
    }

    let mut stages = StageList::new();
    for entry in &file.stages {
        check_label(&entry.name)?;
        if !entry.temperature_c.is_finite() {
            return Err(ConfigError::InvalidTemperature {
                name: entry.name.clone(),
                value: entry.temperature_c,
            });
        }
        // Cannot fail: length checked above
        let _ = stages.push(Stage::new(
            &entry.name,
            entry.temperature_c,
            entry.duration_s,
        ));
    }

    check_label(&file.protocol.label)?;

    Ok(ProtocolConfig {
        label: label(&file.protocol.label),
        stages,
        run: file.run,
    })
}

fn check_label(text: &str) -> Result<(), ConfigError> {
    if text.len() > MAX_LABEL_LEN {
        return Err(ConfigError::LabelTooLong {
            label: text.to_owned(),
            max: MAX_LABEL_LEN,
        });
    }
    Ok(())
}
