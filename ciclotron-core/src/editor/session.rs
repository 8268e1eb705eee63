//! Edit session state machine
//!
//! ```text
//!          begin_*            commit / cancel
//!   Idle ----------> Editing ----------------> Idle
//! ```
//!
//! Entering `Editing` snapshots the target's current values into text
//! buffers. Buffers are edited freely, then either committed through the
//! matching algorithm in [`super::edit`] or discarded. Only one target can
//! be edited at a time.

use core::fmt::Write;

use heapless::String;

use super::edit::{apply_stage_edit, apply_total_time, EditError, RescaleOutcome};
use crate::model::StageCollection;
use crate::time::Hms;

/// Capacity of a single edit buffer
pub const EDIT_BUFFER_LEN: usize = 48;

/// Text buffer for one field
pub type EditBuffer = String<EDIT_BUFFER_LEN>;

/// What is being edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditTarget {
    /// A single stage, by index
    Stage(usize),
    /// The aggregate run time
    TotalTime,
}

/// Editable fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditField {
    /// Stage temperature (°C)
    Temperature,
    /// Stage duration (seconds)
    Duration,
    /// Total time, hours part
    Hours,
    /// Total time, minutes part
    Minutes,
    /// Total time, seconds part
    Seconds,
}

/// Edit session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditPhase {
    #[default]
    Idle,
    Editing(EditTarget),
}

/// Result of a successful commit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CommitOutcome {
    /// Stage at this index was updated
    StageUpdated(usize),
    /// Total-time edit applied or discarded
    TotalTime(RescaleOutcome),
}

#[derive(Debug, Clone, Default)]
enum Buffers {
    #[default]
    Empty,
    Stage {
        temperature: EditBuffer,
        duration: EditBuffer,
    },
    TotalTime {
        hours: EditBuffer,
        minutes: EditBuffer,
        seconds: EditBuffer,
    },
}

/// Edit session for the stage editor
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    phase: EditPhase,
    buffers: Buffers,
}

impl EditSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase
    pub fn phase(&self) -> EditPhase {
        self.phase
    }

    /// Check if an edit is in progress
    pub fn is_editing(&self) -> bool {
        matches!(self.phase, EditPhase::Editing(_))
    }

    /// Start editing one stage
    ///
    /// Buffers are seeded with the stage's current temperature and duration.
    pub fn begin_stage(
        &mut self,
        collection: &StageCollection,
        index: usize,
    ) -> Result<(), EditError> {
        if self.is_editing() {
            return Err(EditError::AlreadyEditing);
        }
        let stage = collection
            .stage(index)
            .ok_or(EditError::StageOutOfRange(index))?;

        let mut temperature = EditBuffer::new();
        let mut duration = EditBuffer::new();
        write!(temperature, "{}", stage.temperature_c).map_err(|_| EditError::InputTooLong)?;
        write!(duration, "{}", stage.duration_s).map_err(|_| EditError::InputTooLong)?;

        self.buffers = Buffers::Stage {
            temperature,
            duration,
        };
        self.phase = EditPhase::Editing(EditTarget::Stage(index));
        Ok(())
    }

    /// Start editing the total run time
    ///
    /// Buffers are seeded with the current total split into h/m/s.
    pub fn begin_total_time(&mut self, collection: &StageCollection) -> Result<(), EditError> {
        if self.is_editing() {
            return Err(EditError::AlreadyEditing);
        }
        let hms = Hms::from_seconds(collection.total_duration_s());

        let mut hours = EditBuffer::new();
        let mut minutes = EditBuffer::new();
        let mut seconds = EditBuffer::new();
        write!(hours, "{}", hms.hours).map_err(|_| EditError::InputTooLong)?;
        write!(minutes, "{}", hms.minutes).map_err(|_| EditError::InputTooLong)?;
        write!(seconds, "{}", hms.seconds).map_err(|_| EditError::InputTooLong)?;

        self.buffers = Buffers::TotalTime {
            hours,
            minutes,
            seconds,
        };
        self.phase = EditPhase::Editing(EditTarget::TotalTime);
        Ok(())
    }

    /// Current text of a field, if it belongs to the active target
    pub fn field(&self, field: EditField) -> Option<&str> {
        self.buffer(field).map(|b| b.as_str())
    }

    /// Replace the text of a field
    pub fn set_field(&mut self, field: EditField, text: &str) -> Result<(), EditError> {
        if !self.is_editing() {
            return Err(EditError::NotEditing);
        }
        let buffer = self.buffer_mut(field).ok_or(EditError::WrongField)?;
        let mut next = EditBuffer::new();
        next.push_str(text).map_err(|_| EditError::InputTooLong)?;
        *buffer = next;
        Ok(())
    }

    /// Discard buffers without touching the collection
    pub fn cancel(&mut self) {
        self.phase = EditPhase::Idle;
        self.buffers = Buffers::Empty;
    }

    /// Apply the buffered edit to the collection
    ///
    /// The session returns to `Idle` whatever the outcome.
    pub fn commit(&mut self, collection: &mut StageCollection) -> Result<CommitOutcome, EditError> {
        let phase = self.phase;
        let buffers = core::mem::take(&mut self.buffers);
        self.phase = EditPhase::Idle;

        match (phase, buffers) {
            (
                EditPhase::Editing(EditTarget::Stage(index)),
                Buffers::Stage {
                    temperature,
                    duration,
                },
            ) => {
                apply_stage_edit(collection, index, &temperature, &duration)?;
                Ok(CommitOutcome::StageUpdated(index))
            }
            (
                EditPhase::Editing(EditTarget::TotalTime),
                Buffers::TotalTime {
                    hours,
                    minutes,
                    seconds,
                },
            ) => Ok(CommitOutcome::TotalTime(apply_total_time(
                collection, &hours, &minutes, &seconds,
            ))),
            _ => Err(EditError::NotEditing),
        }
    }

    fn buffer(&self, field: EditField) -> Option<&EditBuffer> {
        match (&self.buffers, field) {
            (Buffers::Stage { temperature, .. }, EditField::Temperature) => Some(temperature),
            (Buffers::Stage { duration, .. }, EditField::Duration) => Some(duration),
            (Buffers::TotalTime { hours, .. }, EditField::Hours) => Some(hours),
            (Buffers::TotalTime { minutes, .. }, EditField::Minutes) => Some(minutes),
            (Buffers::TotalTime { seconds, .. }, EditField::Seconds) => Some(seconds),
            _ => None,
        }
    }

    fn buffer_mut(&mut self, field: EditField) -> Option<&mut EditBuffer> {
        match (&mut self.buffers, field) {
            (Buffers::Stage { temperature, .. }, EditField::Temperature) => Some(temperature),
            (Buffers::Stage { duration, .. }, EditField::Duration) => Some(duration),
            (Buffers::TotalTime { hours, .. }, EditField::Hours) => Some(hours),
            (Buffers::TotalTime { minutes, .. }, EditField::Minutes) => Some(minutes),
            (Buffers::TotalTime { seconds, .. }, EditField::Seconds) => Some(seconds),
            _ => None,
        }
    }
}
