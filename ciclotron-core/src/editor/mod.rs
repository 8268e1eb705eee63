//! Stage editor
//!
//! Derives the chart from the stage collection and turns user edits into
//! validated replacement sequences:
//!
//! - `projection`: one chart entry per stage
//! - `input`: lenient free-text number reading
//! - `rescale`: proportional duration rescale
//! - `edit`: single-stage and total-time commits
//! - `session`: the Idle/Editing state machine around them

pub mod edit;
pub mod input;
pub mod projection;
pub mod rescale;
pub mod session;

pub use edit::{apply_stage_edit, apply_total_time, EditError, RescaleOutcome};
pub use input::{parse_count, parse_temperature};
pub use projection::{project, stage_color, ChartPoint, ChartProjection, STAGE_PALETTE};
pub use rescale::{rescale_durations, DiscardReason};
pub use session::{CommitOutcome, EditField, EditPhase, EditSession, EditTarget};
