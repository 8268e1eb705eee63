//! Protocol loading
//!
//! Loads a protocol from a TOML file, or falls back to the built-in
//! default when no file is given.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};

use ciclotron_core::config::ProtocolConfig;
use ciclotron_core::model::total_duration;
use ciclotron_core::time::format_hms;

use super::toml::{parse_protocol, ConfigError};

/// Load the protocol at `path`, or the built-in default for `None`
pub fn load(path: Option<&Path>) -> Result<ProtocolConfig, ConfigError> {
    let Some(path) = path else {
        debug!("No protocol file given, using built-in protocol");
        let config = ProtocolConfig::default();
        log_protocol_summary(&config);
        return Ok(config);
    };

    info!("Loading protocol from {}", path.display());
    let text = fs::read_to_string(path)?;
    debug!("Read {} bytes of TOML", text.len());

    let config = parse_protocol(&text).inspect_err(|e| {
        warn!("Failed to parse {}: {}", path.display(), e);
    })?;

    log_protocol_summary(&config);
    Ok(config)
}

/// Log a summary of the loaded protocol
fn log_protocol_summary(config: &ProtocolConfig) {
    info!("Protocol \"{}\" loaded", config.label);
    debug!("  {} stages", config.stages.len());
    debug!("  total {}", format_hms(total_duration(&config.stages)));
    debug!("  results after {}s", config.run.redirect_delay_s);

    if total_duration(&config.stages) == 0 {
        warn!("All stages have zero duration; total time cannot be rescaled");
    }
}
