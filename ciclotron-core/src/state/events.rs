//! Events that trigger view transitions

/// Events that can trigger view transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Navigation events
    /// User dismissed the welcome screen
    Continue,
    /// User chose "New Experiment" from the menu
    NewExperiment,
    /// User wants to go back
    Back,

    // Editor events
    /// User selected a stage to edit
    EditStage,
    /// User selected the total time to edit
    EditTotalTime,
    /// User saved the edit
    ConfirmEdit,
    /// User cancelled the edit
    CancelEdit,
    /// User restored the default protocol
    ResetProtocol,

    // Run control events
    /// User started the experiment
    StartRun,
    /// User pressed pause
    Pause,
    /// User pressed resume
    Resume,
    /// User left the run for the setup screen
    BackToSetup,
    /// User started the same run again
    Restart,

    // Scheduler events
    /// Countdown moved on to a later stage
    StageAdvanced,
    /// Last stage finished
    RunFinished,
    /// Completion delay elapsed, or user asked for results
    ShowResults,
}

impl Event {
    /// Check if this event is user-initiated
    pub fn is_user_event(&self) -> bool {
        !self.is_scheduler_event()
    }

    /// Check if this event is from the scheduler
    pub fn is_scheduler_event(&self) -> bool {
        matches!(self, Event::StageAdvanced | Event::RunFinished)
    }

    /// Check if this event ends an edit
    pub fn is_edit_exit(&self) -> bool {
        matches!(self, Event::ConfirmEdit | Event::CancelEdit)
    }
}
