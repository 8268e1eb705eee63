//! View state machine definition
//!
//! What the user sees, and whether the heater runs, is a function of the
//! current view and an event.

use super::events::Event;

/// Application views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum View {
    /// Splash screen
    Welcome,
    /// Main menu
    Menu,
    /// Protocol chart with total time, ready to start
    Setup,
    /// Editing one stage's temperature and duration
    EditStage,
    /// Editing the total run time
    EditTotalTime,
    /// Heating run in progress
    Heating,
    /// Heating run paused by user
    Paused,
    /// All stages finished, waiting to show results
    RunComplete,
    /// Run summary
    Results,
}

impl View {
    /// Check if this view allows heater operation
    pub fn heater_allowed(&self) -> bool {
        matches!(self, View::Heating)
    }

    /// Check if an edit is open
    pub fn is_editing(&self) -> bool {
        matches!(self, View::EditStage | View::EditTotalTime)
    }

    /// Check if a run exists (in progress, paused or just finished)
    pub fn has_run(&self) -> bool {
        matches!(self, View::Heating | View::Paused | View::RunComplete)
    }

    /// Process an event and return the next view
    ///
    /// This is the core transition logic; unknown pairs keep the view.
    pub fn transition(self, event: Event) -> Self {
        use Event::*;

        match (self, event) {
            // Welcome / menu
            (View::Welcome, Continue) => View::Menu,
            (View::Menu, NewExperiment) => View::Setup,
            (View::Menu, Back) => View::Welcome,

            // Setup transitions
            (View::Setup, EditStage) => View::EditStage,
            (View::Setup, EditTotalTime) => View::EditTotalTime,
            (View::Setup, ResetProtocol) => View::Setup,
            (View::Setup, StartRun) => View::Heating,
            (View::Setup, Back) => View::Menu,

            // Edit transitions
            (View::EditStage | View::EditTotalTime, ConfirmEdit | CancelEdit) => View::Setup,

            // Heating transitions
            (View::Heating, StageAdvanced) => View::Heating,
            (View::Heating, Pause) => View::Paused,
            (View::Heating, RunFinished) => View::RunComplete,
            (View::Heating, BackToSetup) => View::Setup,

            // Paused transitions
            (View::Paused, Resume) => View::Heating,
            (View::Paused, BackToSetup) => View::Setup,

            // RunComplete transitions
            (View::RunComplete, ShowResults) => View::Results,
            (View::RunComplete, Restart) => View::Heating,
            (View::RunComplete, BackToSetup) => View::Setup,

            // Results transitions
            (View::Results, NewExperiment) => View::Setup,
            (View::Results, Back) => View::Menu,

            // Default: stay in current view
            _ => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_welcome_to_setup() {
        let view = View::Welcome
            .transition(Event::Continue)
            .transition(Event::NewExperiment);
        assert_eq!(view, View::Setup);
    }

    #[test]
    fn test_edit_round_trip() {
        for (enter, editing) in [
            (Event::EditStage, View::EditStage),
            (Event::EditTotalTime, View::EditTotalTime),
        ] {
            let view = View::Setup.transition(enter);
            assert_eq!(view, editing);
            assert!(view.is_editing());
            assert_eq!(view.transition(Event::ConfirmEdit), View::Setup);
            assert_eq!(view.transition(Event::CancelEdit), View::Setup);
        }
    }

    #[test]
    fn test_cannot_start_while_editing() {
        assert_eq!(View::EditStage.transition(Event::StartRun), View::EditStage);
        assert_eq!(
            View::EditTotalTime.transition(Event::EditStage),
            View::EditTotalTime
        );
    }

    #[test]
    fn test_running_flow() {
        let heating = View::Setup.transition(Event::StartRun);
        assert_eq!(heating, View::Heating);

        let paused = heating.transition(Event::Pause);
        assert_eq!(paused, View::Paused);

        let heating = paused.transition(Event::Resume);
        assert_eq!(heating.transition(Event::StageAdvanced), View::Heating);

        let complete = heating.transition(Event::RunFinished);
        assert_eq!(complete, View::RunComplete);
        assert_eq!(complete.transition(Event::ShowResults), View::Results);
        assert_eq!(complete.transition(Event::Restart), View::Heating);
    }

    #[test]
    fn test_back_to_setup_from_any_run_view() {
        for view in [View::Heating, View::Paused, View::RunComplete] {
            assert!(view.has_run());
            assert_eq!(view.transition(Event::BackToSetup), View::Setup);
        }
    }

    #[test]
    fn test_scheduler_events_ignored_outside_run() {
        for view in [View::Setup, View::Paused, View::Results] {
            assert_eq!(view.transition(Event::RunFinished), view);
        }
    }

    #[test]
    fn test_heater_allowed() {
        assert!(View::Heating.heater_allowed());
        assert!(!View::Paused.heater_allowed());
        assert!(!View::RunComplete.heater_allowed());
        assert!(!View::Setup.heater_allowed());
    }

    #[test]
    fn test_results_navigation() {
        assert_eq!(View::Results.transition(Event::Back), View::Menu);
        assert_eq!(View::Results.transition(Event::NewExperiment), View::Setup);
    }
}
