//! Main controller coordinating view machine, stage editor and scheduler
//!
//! The controller is the central brain that:
//! - Owns the stage collection and lends it to the editor and scheduler
//! - Processes user input
//! - Updates the view state machine
//! - Commands the scheduler and counts down to the results screen

use log::{debug, info, warn};

use ciclotron_core::config::{Label, ProtocolConfig, RunConfig, Stage};
use ciclotron_core::editor::{
    project, ChartProjection, CommitOutcome, EditField, EditPhase, EditSession, EditTarget,
    RescaleOutcome,
};
use ciclotron_core::model::StageCollection;
use ciclotron_core::scheduler::{HeaterCommand, Scheduler};
use ciclotron_core::state::{Event, View};

/// User input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Dismiss the welcome screen
    Continue,
    /// Menu / results: open the setup screen
    NewExperiment,
    /// Go back one screen
    Back,
    /// Open the editor for the stage at this index
    SelectStage(usize),
    /// Open the total-time editor
    EditTotalTime,
    /// Replace the text of an edit field
    SetField(EditField, String),
    /// Commit the open edit
    Save,
    /// Discard the open edit
    Cancel,
    /// Restore the protocol the simulator started with
    ResetProtocol,
    /// Start the heating run
    Start,
    /// Pause a running run, or resume a paused one
    PauseResume,
    /// Leave the run for the setup screen
    BackToSetup,
    /// Run the same stages again
    Restart,
    /// Skip the countdown to the results screen
    ShowResults,
}

/// Controller state for coordinating subsystems
pub struct Controller {
    /// Current view
    view: View,
    /// Protocol label
    label: Label,
    /// Stages being edited and run
    stages: StageCollection,
    /// Stage editor session
    session: EditSession,
    /// Heating run scheduler
    scheduler: Scheduler,
    /// Run settings
    run: RunConfig,
    /// Seconds left before the results screen (RunComplete only)
    redirect_remaining_s: Option<u16>,
    /// Outcome of the last committed edit
    last_commit: Option<CommitOutcome>,
}

impl Controller {
    /// Create a controller for `config`
    ///
    /// The protocol's stages become the sequence `ResetProtocol` restores.
    pub fn new(config: ProtocolConfig) -> Self {
        Self {
            view: View::Welcome,
            label: config.label,
            stages: StageCollection::with_defaults(&config.stages),
            session: EditSession::new(),
            scheduler: Scheduler::new(),
            run: config.run,
            redirect_remaining_s: None,
            last_commit: None,
        }
    }

    /// Get current view
    pub fn view(&self) -> View {
        self.view
    }

    /// Protocol label
    pub fn label(&self) -> &str {
        self.label.as_str()
    }

    /// Stage collection
    pub fn stages(&self) -> &StageCollection {
        &self.stages
    }

    /// Chart for the current stages
    pub fn chart(&self) -> ChartProjection {
        project(self.stages.stages())
    }

    /// Stage editor session
    pub fn session(&self) -> &EditSession {
        &self.session
    }

    /// Stage being edited, with its index
    pub fn editing_stage(&self) -> Option<(usize, &Stage)> {
        match self.session.phase() {
            EditPhase::Editing(EditTarget::Stage(index)) => {
                self.stages.stage(index).map(|s| (index, s))
            }
            _ => None,
        }
    }

    /// Heating run scheduler
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Get current heater command
    pub fn heater_command(&self) -> HeaterCommand {
        if self.view.heater_allowed() {
            self.scheduler.heater_command()
        } else {
            HeaterCommand::off()
        }
    }

    /// Seconds left before the results screen is shown
    pub fn redirect_remaining_s(&self) -> Option<u16> {
        self.redirect_remaining_s
    }

    /// Outcome of the last committed edit
    pub fn last_commit(&self) -> Option<CommitOutcome> {
        self.last_commit
    }

    /// Process a user input
    ///
    /// Returns the event applied to the view machine, or `None` if the input
    /// has no effect in the current view.
    pub fn process_input(&mut self, input: InputEvent) -> Option<Event> {
        match input {
            InputEvent::Continue => self.navigate(&[View::Welcome], Event::Continue),
            InputEvent::NewExperiment => {
                self.navigate(&[View::Menu, View::Results], Event::NewExperiment)
            }
            InputEvent::Back => {
                self.navigate(&[View::Menu, View::Setup, View::Results], Event::Back)
            }
            InputEvent::SelectStage(index) => self.begin_stage_edit(index),
            InputEvent::EditTotalTime => self.begin_total_edit(),
            InputEvent::SetField(field, text) => {
                self.set_field(field, &text);
                None
            }
            InputEvent::Save => self.save_edit(),
            InputEvent::Cancel => self.cancel_edit(),
            InputEvent::ResetProtocol => self.reset_protocol(),
            InputEvent::Start => self.start_run(),
            InputEvent::PauseResume => self.pause_resume(),
            InputEvent::BackToSetup => self.back_to_setup(),
            InputEvent::Restart => self.restart_run(),
            InputEvent::ShowResults => self.show_results(),
        }
    }

    /// Apply a plain navigation event if the current view is one of `from`
    fn navigate(&mut self, from: &[View], event: Event) -> Option<Event> {
        if !from.contains(&self.view) {
            return None;
        }
        self.transition(event);
        Some(event)
    }

    fn begin_stage_edit(&mut self, index: usize) -> Option<Event> {
        if self.view != View::Setup {
            return None;
        }
        match self.session.begin_stage(&self.stages, index) {
            Ok(()) => {
                debug!("Editing stage {}", index);
                self.transition(Event::EditStage);
                Some(Event::EditStage)
            }
            Err(e) => {
                warn!("Cannot edit stage {}: {:?}", index, e);
                None
            }
        }
    }

    fn begin_total_edit(&mut self) -> Option<Event> {
        if self.view != View::Setup {
            return None;
        }
        match self.session.begin_total_time(&self.stages) {
            Ok(()) => {
                debug!("Editing total time");
                self.transition(Event::EditTotalTime);
                Some(Event::EditTotalTime)
            }
            Err(e) => {
                warn!("Cannot edit total time: {:?}", e);
                None
            }
        }
    }

    fn set_field(&mut self, field: EditField, text: &str) {
        if let Err(e) = self.session.set_field(field, text) {
            warn!("Ignoring {:?} = {:?}: {:?}", field, text, e);
        }
    }

    fn save_edit(&mut self) -> Option<Event> {
        if !self.view.is_editing() {
            return None;
        }
        match self.session.commit(&mut self.stages) {
            Ok(outcome) => {
                log_commit(&outcome);
                self.last_commit = Some(outcome);
            }
            Err(e) => warn!("Edit not applied: {:?}", e),
        }
        self.transition(Event::ConfirmEdit);
        Some(Event::ConfirmEdit)
    }

    fn cancel_edit(&mut self) -> Option<Event> {
        if !self.view.is_editing() {
            return None;
        }
        self.session.cancel();
        debug!("Edit cancelled");
        self.transition(Event::CancelEdit);
        Some(Event::CancelEdit)
    }

    fn reset_protocol(&mut self) -> Option<Event> {
        if self.view != View::Setup {
            return None;
        }
        self.stages.reset();
        self.last_commit = None;
        info!("Protocol reset to {} stages", self.stages.len());
        self.transition(Event::ResetProtocol);
        Some(Event::ResetProtocol)
    }

    fn start_run(&mut self) -> Option<Event> {
        if self.view != View::Setup {
            return None;
        }
        if !self.scheduler.start(&self.stages) {
            warn!("Cannot start a run without stages");
            return None;
        }
        info!(
            "Run started: {} stages, {}s",
            self.scheduler.stages().len(),
            self.scheduler.total_duration_s()
        );
        self.transition(Event::StartRun);
        Some(Event::StartRun)
    }

    fn pause_resume(&mut self) -> Option<Event> {
        match self.view {
            View::Heating => {
                self.scheduler.pause();
                info!("Run paused at {}s", self.scheduler.elapsed_s());
                self.transition(Event::Pause);
                Some(Event::Pause)
            }
            View::Paused => {
                self.scheduler.resume();
                info!("Run resumed");
                self.transition(Event::Resume);
                Some(Event::Resume)
            }
            _ => None,
        }
    }

    fn back_to_setup(&mut self) -> Option<Event> {
        if !self.view.has_run() {
            return None;
        }
        self.scheduler.abort();
        self.redirect_remaining_s = None;
        info!("Run left for setup");
        self.transition(Event::BackToSetup);
        Some(Event::BackToSetup)
    }

    fn restart_run(&mut self) -> Option<Event> {
        if self.view != View::RunComplete || !self.scheduler.restart() {
            return None;
        }
        self.redirect_remaining_s = None;
        info!("Run restarted");
        self.transition(Event::Restart);
        Some(Event::Restart)
    }

    fn show_results(&mut self) -> Option<Event> {
        if self.view != View::RunComplete {
            return None;
        }
        self.redirect_remaining_s = None;
        self.transition(Event::ShowResults);
        Some(Event::ShowResults)
    }

    /// Periodic tick update
    ///
    /// Advances the run while heating, and counts down to the results
    /// screen once the run is complete. Returns an event if the view changed.
    pub fn tick(&mut self, elapsed_s: u32) -> Option<Event> {
        match self.view {
            View::Heating => {
                let event = self.scheduler.tick(elapsed_s)?;
                debug_assert!(event.is_scheduler_event(), "{:?}", event);
                match event {
                    Event::StageAdvanced => {
                        if let Some(stage) = self.scheduler.current_stage() {
                            debug!("Stage {}: {:.1}C", stage.name, stage.temperature_c);
                        }
                    }
                    Event::RunFinished => {
                        info!("Run finished");
                        self.redirect_remaining_s = Some(self.run.redirect_delay_s);
                    }
                    _ => {}
                }
                self.transition(event);
                Some(event)
            }
            View::RunComplete => {
                let remaining = self.redirect_remaining_s?;
                if u32::from(remaining) <= elapsed_s {
                    self.show_results()
                } else {
                    self.redirect_remaining_s = Some(remaining - elapsed_s as u16);
                    None
                }
            }
            _ => None,
        }
    }

    /// Perform view transition
    fn transition(&mut self, event: Event) {
        debug_assert!(!event.is_edit_exit() || !self.session.is_editing());
        let next = self.view.transition(event);
        if next != self.view {
            let source = if event.is_user_event() { "user" } else { "scheduler" };
            debug!("{:?} -> {:?} on {:?} ({})", self.view, next, event, source);
        }
        self.view = next;
    }
}

fn log_commit(outcome: &CommitOutcome) {
    match outcome {
        CommitOutcome::StageUpdated(index) => info!("Stage {} updated", index + 1),
        CommitOutcome::TotalTime(RescaleOutcome::Applied { total_duration_s }) => {
            info!("Durations rescaled to {}s", total_duration_s)
        }
        CommitOutcome::TotalTime(RescaleOutcome::Discarded(reason)) => {
            warn!("Total time discarded: {:?}", reason)
        }
    }
}
