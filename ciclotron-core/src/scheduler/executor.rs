//! Heating run scheduler
//!
//! Steps through a copy of the protocol, counting down each stage's hold
//! time. Generates events for view state machine transitions.

use crate::config::{Stage, StageList};
use crate::model::StageCollection;
use crate::state::events::Event;

/// Scheduler execution phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ExecutionPhase {
    /// Not running
    Idle,
    /// Counting down the current stage
    Running,
    /// Paused by user
    Paused,
    /// All stages done
    Complete,
}

/// Current heater command from scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct HeaterCommand {
    /// Target temperature in °C (None = heater off)
    pub target_temp_c: Option<f32>,
}

impl HeaterCommand {
    /// Create an off command
    pub const fn off() -> Self {
        Self {
            target_temp_c: None,
        }
    }

    /// Create a heating command
    pub const fn heating(temp_c: f32) -> Self {
        Self {
            target_temp_c: Some(temp_c),
        }
    }
}

/// Stage execution state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StageState {
    /// Current stage index (0-based)
    pub stage_index: usize,
    /// Total stages in the run
    pub total_stages: usize,
    /// Countdown for the current stage (seconds)
    pub remaining_s: u32,
    /// Sum of durations of finished stages (seconds)
    pub completed_s: u64,
}

/// Heating run scheduler
///
/// Works on a snapshot of the collection taken at `start`, so edits made
/// while a run is in progress do not affect it.
#[derive(Debug, Clone)]
pub struct Scheduler {
    /// Current execution phase
    phase: ExecutionPhase,
    /// Stages being run
    stages: StageList,
    /// Sum of all stage durations (seconds)
    total_duration_s: u64,
    /// Whether the run uses user-edited stages
    configured: bool,
    /// Current stage state
    step: StageState,
    /// Heater command state
    heater_cmd: HeaterCommand,
}

impl Scheduler {
    /// Create an idle scheduler
    pub fn new() -> Self {
        Self {
            phase: ExecutionPhase::Idle,
            stages: StageList::new(),
            total_duration_s: 0,
            configured: false,
            step: StageState::default(),
            heater_cmd: HeaterCommand::off(),
        }
    }

    /// Get current execution phase
    pub fn phase(&self) -> ExecutionPhase {
        self.phase
    }

    /// Get current heater command
    pub fn heater_command(&self) -> HeaterCommand {
        if self.phase == ExecutionPhase::Running {
            self.heater_cmd
        } else {
            HeaterCommand::off()
        }
    }

    /// Get current stage state (if running or paused)
    pub fn stage_state(&self) -> Option<&StageState> {
        if matches!(self.phase, ExecutionPhase::Running | ExecutionPhase::Paused) {
            Some(&self.step)
        } else {
            None
        }
    }

    /// Start a run of the collection's current stages
    ///
    /// Returns false (and stays idle) for an empty protocol.
    pub fn start(&mut self, collection: &StageCollection) -> bool {
        let view = collection.get();
        if view.stages.is_empty() {
            return false;
        }

        self.stages.clear();
        for s in view.stages {
            let _ = self.stages.push(s.clone());
        }
        self.total_duration_s = view.total_duration_s;
        self.configured = view.configured;
        self.start_stage(0);
        true
    }

    /// Run the same stages again from the beginning
    pub fn restart(&mut self) -> bool {
        if self.stages.is_empty() {
            return false;
        }
        self.start_stage(0);
        true
    }

    fn start_stage(&mut self, stage_index: usize) {
        self.step = StageState {
            stage_index,
            total_stages: self.stages.len(),
            remaining_s: self.stages[stage_index].duration_s,
            completed_s: 0,
        };
        self.heater_cmd = HeaterCommand::heating(self.stages[stage_index].temperature_c);
        self.phase = ExecutionPhase::Running;
    }

    /// Get the stage being run (if running or paused)
    pub fn current_stage(&self) -> Option<&Stage> {
        self.stage_state()
            .and_then(|s| self.stages.get(s.stage_index))
    }

    /// Stages of the current (or last) run
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Update scheduler with elapsed time
    ///
    /// Call this periodically (e.g., every second). Time left over when a
    /// stage finishes carries into the next one; zero-length stages pass
    /// without consuming time. Returns an event if a transition occurred.
    pub fn tick(&mut self, elapsed_s: u32) -> Option<Event> {
        if self.phase != ExecutionPhase::Running {
            return None;
        }

        let mut budget = elapsed_s;
        let mut advanced = false;

        while budget >= self.step.remaining_s {
            budget -= self.step.remaining_s;
            self.step.completed_s += self.stages[self.step.stage_index].duration_s as u64;

            let next = self.step.stage_index + 1;
            if next >= self.stages.len() {
                return Some(self.finish_run());
            }

            self.step.stage_index = next;
            self.step.remaining_s = self.stages[next].duration_s;
            self.heater_cmd = HeaterCommand::heating(self.stages[next].temperature_c);
            advanced = true;
        }

        self.step.remaining_s -= budget;
        advanced.then_some(Event::StageAdvanced)
    }

    /// Handle run completion
    fn finish_run(&mut self) -> Event {
        self.step.remaining_s = 0;
        self.heater_cmd = HeaterCommand::off();
        self.phase = ExecutionPhase::Complete;
        Event::RunFinished
    }

    /// Pause execution
    pub fn pause(&mut self) -> bool {
        if self.phase == ExecutionPhase::Running {
            self.phase = ExecutionPhase::Paused;
            true
        } else {
            false
        }
    }

    /// Resume execution
    pub fn resume(&mut self) -> bool {
        if self.phase == ExecutionPhase::Paused {
            self.phase = ExecutionPhase::Running;
            true
        } else {
            false
        }
    }

    /// Abort execution
    pub fn abort(&mut self) {
        self.phase = ExecutionPhase::Idle;
        self.heater_cmd = HeaterCommand::off();
        self.step = StageState::default();
    }

    /// Sum of all stage durations in the run (seconds)
    pub fn total_duration_s(&self) -> u64 {
        self.total_duration_s
    }

    /// Whether the run uses user-edited stages
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Elapsed run time (seconds)
    pub fn elapsed_s(&self) -> u64 {
        match self.phase {
            ExecutionPhase::Idle => 0,
            ExecutionPhase::Complete => self.total_duration_s,
            ExecutionPhase::Running | ExecutionPhase::Paused => {
                let current = self.stages[self.step.stage_index].duration_s;
                self.step.completed_s + (current - self.step.remaining_s) as u64
            }
        }
    }

    /// Remaining time for the current stage (seconds)
    pub fn stage_remaining_s(&self) -> u32 {
        self.stage_state().map(|s| s.remaining_s).unwrap_or(0)
    }

    /// Overall progress, 0-100
    pub fn progress_percent(&self) -> u8 {
        if self.phase == ExecutionPhase::Complete {
            return 100;
        }
        if self.total_duration_s == 0 {
            return 0;
        }
        ((self.elapsed_s() * 100) / self.total_duration_s).min(100) as u8
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn collection(stages: &[(&str, f32, u32)]) -> StageCollection {
        let list: std::vec::Vec<Stage> = stages
            .iter()
            .map(|(n, t, d)| Stage::new(n, *t, *d))
            .collect();
        let mut c = StageCollection::new();
        c.replace_all(&list);
        c
    }

    #[test]
    fn test_scheduler_creation() {
        let sched = Scheduler::new();
        assert_eq!(sched.phase(), ExecutionPhase::Idle);
        assert_eq!(sched.heater_command(), HeaterCommand::off());
        assert!(sched.current_stage().is_none());
    }

    #[test]
    fn test_start() {
        let mut sched = Scheduler::new();
        let c = StageCollection::new();
        assert!(sched.start(&c));

        assert_eq!(sched.phase(), ExecutionPhase::Running);
        assert_eq!(sched.stage_remaining_s(), 120);
        assert_eq!(sched.total_duration_s(), 855);
        assert_eq!(sched.heater_command(), HeaterCommand::heating(95.0));
        assert!(!sched.is_configured());
    }

    #[test]
    fn test_start_empty_refused() {
        let mut sched = Scheduler::new();
        let c = collection(&[]);
        assert!(!sched.start(&c));
        assert_eq!(sched.phase(), ExecutionPhase::Idle);
    }

    #[test]
    fn test_stage_advance() {
        let mut sched = Scheduler::new();
        sched.start(&collection(&[("A", 95.0, 3), ("B", 60.0, 2)]));

        assert_eq!(sched.tick(1), None);
        assert_eq!(sched.tick(1), None);
        assert_eq!(sched.stage_remaining_s(), 1);

        assert_eq!(sched.tick(1), Some(Event::StageAdvanced));
        assert_eq!(sched.current_stage().unwrap().name.as_str(), "B");
        assert_eq!(sched.stage_remaining_s(), 2);
        assert_eq!(sched.heater_command(), HeaterCommand::heating(60.0));
        assert_eq!(sched.elapsed_s(), 3);

        assert_eq!(sched.tick(1), None);
        assert_eq!(sched.tick(1), Some(Event::RunFinished));
        assert_eq!(sched.phase(), ExecutionPhase::Complete);
        assert_eq!(sched.heater_command(), HeaterCommand::off());
        assert_eq!(sched.progress_percent(), 100);
    }

    #[test]
    fn test_large_tick_carries_over() {
        let mut sched = Scheduler::new();
        sched.start(&collection(&[("A", 95.0, 10), ("B", 60.0, 10), ("C", 72.0, 10)]));

        assert_eq!(sched.tick(25), Some(Event::StageAdvanced));
        let state = sched.stage_state().unwrap();
        assert_eq!(state.stage_index, 2);
        assert_eq!(state.remaining_s, 5);
        assert_eq!(sched.elapsed_s(), 25);
    }

    #[test]
    fn test_zero_length_stage_skipped() {
        let mut sched = Scheduler::new();
        sched.start(&collection(&[("A", 95.0, 1), ("B", 60.0, 0), ("C", 72.0, 1)]));

        assert_eq!(sched.tick(1), Some(Event::StageAdvanced));
        assert_eq!(sched.current_stage().unwrap().name.as_str(), "C");
        assert_eq!(sched.tick(1), Some(Event::RunFinished));
    }

    #[test]
    fn test_pause_resume() {
        let mut sched = Scheduler::new();
        sched.start(&collection(&[("A", 95.0, 10)]));
        sched.tick(4);

        assert!(sched.pause());
        assert_eq!(sched.heater_command(), HeaterCommand::off());
        assert_eq!(sched.tick(5), None);
        assert_eq!(sched.stage_remaining_s(), 6);

        assert!(!sched.pause());
        assert!(sched.resume());
        assert_eq!(sched.heater_command(), HeaterCommand::heating(95.0));
        assert!(!sched.resume());
    }

    #[test]
    fn test_progress() {
        let mut sched = Scheduler::new();
        sched.start(&collection(&[("A", 95.0, 50), ("B", 60.0, 150)]));
        assert_eq!(sched.progress_percent(), 0);
        sched.tick(100);
        assert_eq!(sched.progress_percent(), 50);
    }

    #[test]
    fn test_progress_zero_total() {
        let mut sched = Scheduler::new();
        sched.start(&collection(&[("A", 95.0, 0)]));
        assert_eq!(sched.progress_percent(), 0);
        assert_eq!(sched.tick(1), Some(Event::RunFinished));
    }

    #[test]
    fn test_restart_and_abort() {
        let mut sched = Scheduler::new();
        sched.start(&collection(&[("A", 95.0, 2)]));
        sched.tick(2);
        assert_eq!(sched.phase(), ExecutionPhase::Complete);

        assert!(sched.restart());
        assert_eq!(sched.phase(), ExecutionPhase::Running);
        assert_eq!(sched.stage_remaining_s(), 2);
        assert_eq!(sched.elapsed_s(), 0);

        sched.abort();
        assert_eq!(sched.phase(), ExecutionPhase::Idle);
        assert_eq!(sched.elapsed_s(), 0);
    }

    #[test]
    fn test_run_uses_snapshot() {
        let mut c = collection(&[("A", 95.0, 10)]);
        let mut sched = Scheduler::new();
        sched.start(&c);

        c.replace_all(&[Stage::new("Z", 20.0, 99)]);
        assert_eq!(sched.current_stage().unwrap().name.as_str(), "A");
        assert!(sched.is_configured());
    }

    proptest! {
        #[test]
        fn prop_finishes_after_total(durations in prop::collection::vec(0u32..20, 1..10)) {
            let total: u64 = durations.iter().map(|d| *d as u64).sum();
            prop_assume!(total > 0);

            let stages: std::vec::Vec<Stage> = durations
                .iter()
                .map(|d| Stage::new("S", 60.0, *d))
                .collect();
            let mut c = StageCollection::new();
            c.replace_all(&stages);

            let mut sched = Scheduler::new();
            sched.start(&c);

            for _ in 1..total {
                prop_assert_ne!(sched.tick(1), Some(Event::RunFinished));
            }
            prop_assert_eq!(sched.tick(1), Some(Event::RunFinished));
        }
    }
}
