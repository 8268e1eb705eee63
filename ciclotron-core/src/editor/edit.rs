//! Edit commits
//!
//! Validate user input and write the resulting sequence back to the
//! collection. Input is coerced rather than rejected, except for a
//! total-time edit that would leave nothing to scale.

use super::input::{parse_count, parse_temperature};
use super::rescale::{rescale_durations, DiscardReason};
use crate::config::StageList;
use crate::model::StageCollection;
use crate::time::Hms;

/// Edit errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EditError {
    /// Stage index does not exist in the collection
    StageOutOfRange(usize),
    /// Another target is already being edited
    AlreadyEditing,
    /// No edit is in progress
    NotEditing,
    /// Field does not belong to the target being edited
    WrongField,
    /// Text does not fit the field buffer
    InputTooLong,
}

/// Result of a total-time edit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RescaleOutcome {
    /// Durations rescaled; new sum of all stages
    Applied { total_duration_s: u64 },
    /// Input discarded, collection untouched
    Discarded(DiscardReason),
}

/// Replace one stage's temperature and duration from free text
///
/// Unparseable values become zero. The stage's name and every other stage
/// are left untouched.
pub fn apply_stage_edit(
    collection: &mut StageCollection,
    index: usize,
    temperature: &str,
    duration: &str,
) -> Result<(), EditError> {
    if index >= collection.len() {
        return Err(EditError::StageOutOfRange(index));
    }

    let mut stages = StageList::new();
    for s in collection.stages() {
        let _ = stages.push(s.clone());
    }

    let stage = &mut stages[index];
    stage.temperature_c = parse_temperature(temperature);
    stage.duration_s = parse_count(duration);

    collection.replace_all(&stages);
    Ok(())
}

/// Rescale every stage so the protocol runs for `hours:minutes:seconds`
///
/// Fields are read as non-negative whole numbers (garbage reads as zero).
/// A zero total, or a protocol whose stages sum to zero, is discarded
/// without touching the collection.
pub fn apply_total_time(
    collection: &mut StageCollection,
    hours: &str,
    minutes: &str,
    seconds: &str,
) -> RescaleOutcome {
    let new_total_s = Hms {
        hours: parse_count(hours) as u64,
        minutes: parse_count(minutes) as u64,
        seconds: parse_count(seconds) as u64,
    }
    .to_seconds();

    match rescale_durations(collection.stages(), new_total_s) {
        Ok(stages) => {
            collection.replace_all(&stages);
            RescaleOutcome::Applied {
                total_duration_s: collection.total_duration_s(),
            }
        }
        Err(reason) => RescaleOutcome::Discarded(reason),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{default_stages, Stage, MAX_STAGES};
    use proptest::prelude::*;

    fn two_stage_collection() -> StageCollection {
        let mut c = StageCollection::new();
        c.replace_all(&[Stage::new("Stage1", 95.0, 120), Stage::new("Stage2", 94.0, 30)]);
        c
    }

    #[test]
    fn test_stage_edit() {
        let mut c = StageCollection::new();
        apply_stage_edit(&mut c, 2, "55.5", "45").unwrap();

        let s = c.stage(2).unwrap();
        assert_eq!(s.name.as_str(), "Stage 2");
        assert_eq!(s.temperature_c, 55.5);
        assert_eq!(s.duration_s, 45);
        assert_eq!(c.total_duration_s(), 855 - 30 + 45);
        assert!(c.is_configured());
    }

    #[test]
    fn test_stage_edit_coerces_garbage() {
        let mut c = StageCollection::new();
        apply_stage_edit(&mut c, 0, "abc", "45").unwrap();

        let s = c.stage(0).unwrap();
        assert_eq!(s.temperature_c, 0.0);
        assert_eq!(s.duration_s, 45);
    }

    #[test]
    fn test_stage_edit_allows_zero_duration() {
        let mut c = StageCollection::new();
        apply_stage_edit(&mut c, 5, "15", "").unwrap();
        assert_eq!(c.stage(5).unwrap().duration_s, 0);
    }

    #[test]
    fn test_stage_edit_out_of_range() {
        let mut c = StageCollection::new();
        assert_eq!(
            apply_stage_edit(&mut c, 6, "90", "10"),
            Err(EditError::StageOutOfRange(6))
        );
        assert!(!c.is_configured());
    }

    #[test]
    fn test_total_time_doubles() {
        let mut c = two_stage_collection();
        let outcome = apply_total_time(&mut c, "00", "05", "00");

        assert_eq!(outcome, RescaleOutcome::Applied { total_duration_s: 300 });
        assert_eq!(c.stage(0).unwrap().duration_s, 240);
        assert_eq!(c.stage(1).unwrap().duration_s, 60);
        assert_eq!(c.total_duration_s(), 300);
    }

    #[test]
    fn test_total_time_zero_is_discarded() {
        let mut c = two_stage_collection();
        let before = c.stages().to_vec();

        let outcome = apply_total_time(&mut c, "0", "0", "0");

        assert_eq!(outcome, RescaleOutcome::Discarded(DiscardReason::NonPositiveTotal));
        assert_eq!(c.stages(), &before[..]);
        assert_eq!(c.total_duration_s(), 150);
    }

    #[test]
    fn test_total_time_garbage_fields_read_as_zero() {
        let mut c = two_stage_collection();
        let outcome = apply_total_time(&mut c, "", "x", "75");
        assert_eq!(outcome, RescaleOutcome::Applied { total_duration_s: 75 });
        assert_eq!(c.stage(0).unwrap().duration_s, 60);
        assert_eq!(c.stage(1).unwrap().duration_s, 15);
    }

    #[test]
    fn test_total_time_negative_fields_read_as_zero() {
        let mut c = two_stage_collection();
        let outcome = apply_total_time(&mut c, "-1", "0", "0");
        assert_eq!(outcome, RescaleOutcome::Discarded(DiscardReason::NonPositiveTotal));
    }

    #[test]
    fn test_total_time_zero_current_total() {
        let mut c = StageCollection::new();
        c.replace_all(&[Stage::new("A", 60.0, 0)]);
        let outcome = apply_total_time(&mut c, "0", "1", "0");
        assert_eq!(outcome, RescaleOutcome::Discarded(DiscardReason::EmptyProtocol));
        assert_eq!(c.total_duration_s(), 0);
    }

    #[test]
    fn test_default_protocol_rescale_is_approximate() {
        let mut c = StageCollection::new();
        // 855s -> 1000s; independent rounding may miss the target slightly
        match apply_total_time(&mut c, "0", "16", "40") {
            RescaleOutcome::Applied { total_duration_s } => {
                assert!(total_duration_s.abs_diff(1000) <= default_stages().len() as u64 / 2 + 1);
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    proptest! {
        #[test]
        fn prop_stage_edit_isolated(
            durations in prop::collection::vec(0u32..10_000, 1..MAX_STAGES),
            pick in any::<prop::sample::Index>(),
            temp in -50.0f32..150.0,
            dur in 0u32..10_000,
        ) {
            let stages: std::vec::Vec<Stage> = durations
                .iter()
                .enumerate()
                .map(|(i, d)| Stage::new(if i % 2 == 0 { "Even" } else { "Odd" }, i as f32, *d))
                .collect();
            let mut c = StageCollection::new();
            c.replace_all(&stages);

            let index = pick.index(stages.len());
            let temp_text = std::format!("{}", temp);
            let dur_text = std::format!("{}", dur);
            apply_stage_edit(&mut c, index, &temp_text, &dur_text).unwrap();

            prop_assert_eq!(c.len(), stages.len());
            for (j, (before, after)) in stages.iter().zip(c.stages()).enumerate() {
                if j == index {
                    prop_assert_eq!(&before.name, &after.name);
                    prop_assert_eq!(after.temperature_c, temp);
                    prop_assert_eq!(after.duration_s, dur);
                } else {
                    prop_assert_eq!(before, after);
                }
            }
        }
    }
}
