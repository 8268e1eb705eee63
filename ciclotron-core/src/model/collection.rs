//! Stage collection
//!
//! The single source of truth for the protocol being edited and run.

use crate::config::{default_stages, Stage, StageList, MAX_STAGES};

/// Sum of all stage durations (seconds)
pub fn total_duration(stages: &[Stage]) -> u64 {
    stages.iter().map(|s| s.duration_s as u64).sum()
}

/// Read-only view returned by [`StageCollection::get`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollectionView<'a> {
    /// Stages in execution order
    pub stages: &'a [Stage],
    /// Sum of all stage durations (seconds)
    pub total_duration_s: u64,
    /// Whether the stages were supplied or edited by the user
    pub configured: bool,
}

/// Ordered stage sequence with its derived total
///
/// The total duration is always computed from the stored stages, so it can
/// never drift from them. Owned by the controller and lent to every consumer.
#[derive(Debug, Clone)]
pub struct StageCollection {
    /// Current stages
    stages: StageList,
    /// Set by `replace_all`, cleared by `reset`
    configured: bool,
    /// Sequence restored by `reset`
    defaults: StageList,
}

impl StageCollection {
    /// Create a collection seeded with the built-in protocol
    pub fn new() -> Self {
        Self::with_defaults(&default_stages())
    }

    /// Create a collection seeded with `defaults`
    ///
    /// `reset` restores this sequence. Stages beyond `MAX_STAGES` are dropped.
    pub fn with_defaults(defaults: &[Stage]) -> Self {
        let defaults = copy_stages(defaults);
        Self {
            stages: defaults.clone(),
            configured: false,
            defaults,
        }
    }

    /// Current stages, total duration and configured flag
    pub fn get(&self) -> CollectionView<'_> {
        CollectionView {
            stages: &self.stages,
            total_duration_s: self.total_duration_s(),
            configured: self.configured,
        }
    }

    /// Current stages in execution order
    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Stage at `index`
    pub fn stage(&self, index: usize) -> Option<&Stage> {
        self.stages.get(index)
    }

    /// Number of stages
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if there are no stages
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Sum of all stage durations (seconds)
    pub fn total_duration_s(&self) -> u64 {
        total_duration(&self.stages)
    }

    /// Check if the user has supplied or edited the stages
    pub fn is_configured(&self) -> bool {
        self.configured
    }

    /// Replace the whole sequence
    ///
    /// No validation happens here; the editor validates before calling.
    /// The new sequence is built first and swapped in with one assignment.
    /// Stages beyond `MAX_STAGES` are dropped.
    pub fn replace_all(&mut self, stages: &[Stage]) {
        self.stages = copy_stages(stages);
        self.configured = true;
    }

    /// Restore the default sequence and clear the configured flag
    pub fn reset(&mut self) {
        self.stages = self.defaults.clone();
        self.configured = false;
    }
}

impl Default for StageCollection {
    fn default() -> Self {
        Self::new()
    }
}

fn copy_stages(stages: &[Stage]) -> StageList {
    let mut out = StageList::new();
    for s in stages.iter().take(MAX_STAGES) {
        let _ = out.push(s.clone());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn two_stages() -> [Stage; 2] {
        [Stage::new("Stage1", 95.0, 120), Stage::new("Stage2", 94.0, 30)]
    }

    #[test]
    fn test_new_is_default_protocol() {
        let c = StageCollection::new();
        let view = c.get();
        assert_eq!(view.stages.len(), 6);
        assert_eq!(view.total_duration_s, 855);
        assert!(!view.configured);
    }

    #[test]
    fn test_replace_all() {
        let mut c = StageCollection::new();
        c.replace_all(&two_stages());

        assert_eq!(c.len(), 2);
        assert_eq!(c.total_duration_s(), 150);
        assert!(c.is_configured());
        assert_eq!(c.stage(1).map(|s| s.duration_s), Some(30));
    }

    #[test]
    fn test_replace_all_empty_accepted() {
        let mut c = StageCollection::new();
        c.replace_all(&[]);
        assert!(c.is_empty());
        assert_eq!(c.total_duration_s(), 0);
        assert!(c.is_configured());
    }

    #[test]
    fn test_replace_all_truncates() {
        let stages: [Stage; MAX_STAGES + 4] =
            core::array::from_fn(|i| Stage::new("S", 60.0, i as u32));
        let mut c = StageCollection::new();
        c.replace_all(&stages);

        assert_eq!(c.len(), MAX_STAGES);
        assert_eq!(c.total_duration_s(), total_duration(&stages[..MAX_STAGES]));
    }

    #[test]
    fn test_reset() {
        let mut c = StageCollection::new();
        c.replace_all(&two_stages());
        c.reset();

        assert_eq!(c.len(), 6);
        assert_eq!(c.total_duration_s(), 855);
        assert!(!c.is_configured());
    }

    #[test]
    fn test_reset_to_custom_defaults() {
        let mut c = StageCollection::with_defaults(&two_stages());
        assert_eq!(c.total_duration_s(), 150);

        c.replace_all(&[Stage::new("Only", 60.0, 10)]);
        c.reset();
        assert_eq!(c.stages(), &two_stages()[..]);
    }

    fn arb_stage() -> impl Strategy<Value = Stage> {
        ("[A-Za-z0-9 ]{0,12}", -50.0f32..150.0, any::<u32>())
            .prop_map(|(name, t, d)| Stage::new(&name, t, d))
    }

    proptest! {
        #[test]
        fn prop_total_is_sum(stages in prop::collection::vec(arb_stage(), 0..MAX_STAGES)) {
            let mut c = StageCollection::new();
            c.replace_all(&stages);

            let expected: u64 = stages.iter().map(|s| s.duration_s as u64).sum();
            prop_assert_eq!(c.get().total_duration_s, expected);
            prop_assert_eq!(c.len(), stages.len());
            prop_assert!(c.is_configured());
        }
    }
}
