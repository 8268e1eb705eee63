//! Chart projection
//!
//! Derives one chart entry per stage from the current sequence. Each stage
//! is drawn as a trapezoid sloping from its own temperature towards the
//! next stage's, so the chart reads as a temperature profile over time.
//! The projection is a pure function of the stages and is recomputed
//! whenever they change.

use core::fmt::Write;

use heapless::{String, Vec};

use crate::config::{Label, Stage, MAX_STAGES};
use crate::time::{format_hms, HmsString};

/// Stage colors, assigned by index
pub const STAGE_PALETTE: [&str; 6] = [
    "#dc2626", "#ea580c", "#d97706", "#16a34a", "#0891b2", "#7c3aed",
];

/// Headroom below the coldest stage on the temperature axis (°C)
pub const AXIS_FLOOR_MARGIN_C: f32 = 5.0;

/// Headroom above the hottest stage on the temperature axis (°C)
pub const AXIS_CEILING_MARGIN_C: f32 = 10.0;

/// Chart label: stage name plus occurrence, e.g. `"Stage 2 (3)"`
pub type ChartLabel = String<24>;

/// Color for the stage at `index`
pub fn stage_color(index: usize) -> &'static str {
    STAGE_PALETTE[index % STAGE_PALETTE.len()]
}

/// One chart entry
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    /// Position in the stage sequence
    pub index: usize,
    /// Stage name
    pub name: Label,
    /// 1-based count of this name seen so far (including this stage)
    pub occurrence: u16,
    /// Disambiguated label
    pub label: ChartLabel,
    /// Stage temperature (°C)
    pub temperature_c: f32,
    /// Stage duration (seconds)
    pub duration_s: u32,
    /// Duration as `HH:MM:SS`
    pub duration_hms: HmsString,
    /// Fill/stroke color
    pub color: &'static str,
    /// Following stage's temperature, or our own for the last stage
    pub next_temperature_c: f32,
}

/// Full chart derived from a stage sequence
#[derive(Debug, Clone, PartialEq)]
pub struct ChartProjection {
    /// One point per stage, in order
    pub points: Vec<ChartPoint, MAX_STAGES>,
    /// Coldest stage temperature (0 for an empty sequence)
    pub min_temperature_c: f32,
    /// Hottest stage temperature (0 for an empty sequence)
    pub max_temperature_c: f32,
}

impl ChartProjection {
    /// Lower bound of the temperature axis
    pub fn axis_floor_c(&self) -> f32 {
        self.min_temperature_c - AXIS_FLOOR_MARGIN_C
    }

    /// Upper bound of the temperature axis
    pub fn axis_ceiling_c(&self) -> f32 {
        self.max_temperature_c + AXIS_CEILING_MARGIN_C
    }

    /// Height of the trapezoid's right edge relative to its left edge
    ///
    /// Heights are measured from the axis floor. The last stage is drawn as
    /// a rectangle (ratio 1.0).
    pub fn transition_ratio(&self, index: usize) -> Option<f32> {
        let point = self.points.get(index)?;
        if index + 1 == self.points.len() {
            return Some(1.0);
        }

        let floor = self.axis_floor_c();
        let height = point.temperature_c - floor;
        let ratio = (point.next_temperature_c - floor) / height;
        // The floor margin is lost to f32 rounding at large magnitudes
        if height > 0.0 && ratio.is_finite() {
            Some(ratio)
        } else {
            Some(1.0)
        }
    }

    /// Indices where a new stage name begins (excluding the first stage)
    ///
    /// Used to draw separators between stage groups.
    pub fn group_boundaries(&self) -> Vec<usize, MAX_STAGES> {
        let mut out = Vec::new();
        for pair in self.points.windows(2) {
            if pair[0].name != pair[1].name {
                let _ = out.push(pair[1].index);
            }
        }
        out
    }
}

/// Derive the chart for `stages`
pub fn project(stages: &[Stage]) -> ChartProjection {
    let stages = &stages[..stages.len().min(MAX_STAGES)];
    let mut points = Vec::new();

    for (index, stage) in stages.iter().enumerate() {
        let occurrence = 1 + stages[..index]
            .iter()
            .filter(|s| s.name == stage.name)
            .count() as u16;

        let mut label = ChartLabel::new();
        let _ = write!(label, "{} ({})", stage.name, occurrence);

        let next_temperature_c = stages
            .get(index + 1)
            .map(|s| s.temperature_c)
            .unwrap_or(stage.temperature_c);

        let _ = points.push(ChartPoint {
            index,
            name: stage.name.clone(),
            occurrence,
            label,
            temperature_c: stage.temperature_c,
            duration_s: stage.duration_s,
            duration_hms: format_hms(stage.duration_s as u64),
            color: stage_color(index),
            next_temperature_c,
        });
    }

    let (min_temperature_c, max_temperature_c) = if stages.is_empty() {
        (0.0, 0.0)
    } else {
        stages.iter().fold((f32::MAX, f32::MIN), |(lo, hi), s| {
            (lo.min(s.temperature_c), hi.max(s.temperature_c))
        })
    };

    ChartProjection {
        points,
        min_temperature_c,
        max_temperature_c,
    }
}
