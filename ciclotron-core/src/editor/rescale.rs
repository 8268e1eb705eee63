//! Proportional duration rescale
//!
//! Stretches or shrinks every stage so the protocol's total matches a new
//! value, keeping each stage's share of the run. Each duration is rounded
//! independently (half away from zero), so the new sum can differ from the
//! requested total by up to half a second per stage.

use crate::config::{Stage, StageList, MAX_STAGES};
use crate::model::total_duration;

/// Why a rescale was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DiscardReason {
    /// Requested total was zero
    NonPositiveTotal,
    /// Current stages sum to zero, so there is no ratio to apply
    EmptyProtocol,
}

/// Rescale `stages` so their durations sum to roughly `new_total_s`
///
/// Names and temperatures are unchanged. Durations saturate at `u32::MAX`.
pub fn rescale_durations(stages: &[Stage], new_total_s: u64) -> Result<StageList, DiscardReason> {
    if new_total_s == 0 {
        return Err(DiscardReason::NonPositiveTotal);
    }

    let stages = &stages[..stages.len().min(MAX_STAGES)];
    let current_total_s = total_duration(stages);
    if current_total_s == 0 {
        return Err(DiscardReason::EmptyProtocol);
    }

    let mut out = StageList::new();
    for stage in stages {
        let _ = out.push(Stage {
            duration_s: scale_rounded(stage.duration_s, new_total_s, current_total_s),
            ..stage.clone()
        });
    }
    Ok(out)
}

/// `round(duration * new_total / current_total)`, exact, half away from zero
///
/// floor(x + 1/2) with x = d*n/c is floor((2*d*n + c) / (2*c)).
fn scale_rounded(duration_s: u32, new_total_s: u64, current_total_s: u64) -> u32 {
    let numerator = 2 * duration_s as u128 * new_total_s as u128 + current_total_s as u128;
    let scaled = numerator / (2 * current_total_s as u128);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}
