use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use dg_api::{create_sequencer_from_sources, CreateSequencerOptions};
use dg_core::DialogueEvent;
use dg_runtime::{BufferPopupSurface, BufferSurface, DialogueSequencer};

use crate::source::{read_dialogue_sources_from_dir, read_test_case};
use crate::{DgToolError, TestAction, TestCase};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub observed_events: Vec<DialogueEvent>,
    pub story_flags: BTreeMap<String, i32>,
    pub all_scripts_complete: bool,
    pub applied_actions: usize,
}

pub fn run_case(demo_dir: &Path, case: &TestCase) -> Result<RunReport, DgToolError> {
    let sources = read_dialogue_sources_from_dir(demo_dir)?;
    let mut sequencer = create_sequencer_from_sources(
        CreateSequencerOptions {
            sources,
            sequence: case.sequence.clone(),
            ..CreateSequencerOptions::default()
        },
        Box::new(BufferSurface::default()),
        Box::new(BufferPopupSurface::default()),
    )?;

    for (action_index, action) in case.actions.iter().enumerate() {
        if !apply_action(&mut sequencer, action)? {
            return Err(DgToolError::ActionRejected {
                action_index,
                kind: action.kind_name().to_string(),
            });
        }
    }

    Ok(RunReport {
        observed_events: sequencer.drain_event_log(),
        story_flags: sequencer.story_flags().as_map().clone(),
        all_scripts_complete: sequencer.all_scripts_complete(),
        applied_actions: case.actions.len(),
    })
}

/// Returns false when the sequencer refused the input.
fn apply_action(
    sequencer: &mut DialogueSequencer,
    action: &TestAction,
) -> Result<bool, DgToolError> {
    match action {
        TestAction::Continue => sequencer.handle_continue(),
        TestAction::SelectOption { side } => return Ok(sequencer.select_option(*side)),
        TestAction::Tick { ms } => sequencer.tick(Duration::from_millis(*ms)),
        TestAction::Settle => sequencer.settle(),
        TestAction::CompleteTyping => sequencer.complete_typing(),
        TestAction::StartNext => sequencer.start_next()?,
        TestAction::SkipRemaining => sequencer.skip_remaining(),
        TestAction::SkipPopups => sequencer.skip_popups(),
        TestAction::JumpTo { index } => return Ok(sequencer.jump_to(*index)?),
        TestAction::JumpToEntry { target } => return Ok(sequencer.jump_to_entry(*target)),
        TestAction::SetSpecialAction { enabled } => sequencer.set_special_action(*enabled),
        TestAction::SetFlag { name, value } => sequencer.set_story_flag(name.clone(), *value),
    }
    Ok(true)
}

pub fn assert_case(demo_dir: &Path, case_path: &Path) -> Result<(), DgToolError> {
    let case = read_test_case(case_path)?;
    let report = run_case(demo_dir, &case)?;

    if report.observed_events.len() != case.expected_events.len() {
        let observed = serde_json::to_string_pretty(&report.observed_events)
            .map_err(DgToolError::EventSerialize)?;
        return Err(DgToolError::EventCountMismatch {
            expected: case.expected_events.len(),
            actual: report.observed_events.len(),
            observed,
        });
    }

    for (index, (expected, actual)) in case
        .expected_events
        .iter()
        .zip(report.observed_events.iter())
        .enumerate()
    {
        if expected != actual {
            let expected = serde_json::to_string(expected).map_err(DgToolError::EventSerialize)?;
            let actual = serde_json::to_string(actual).map_err(DgToolError::EventSerialize)?;
            return Err(DgToolError::EventMismatch {
                index,
                expected,
                actual,
            });
        }
    }

    if let Some(expected) = &case.expected_flags {
        if expected != &report.story_flags {
            return Err(DgToolError::FlagsMismatch {
                expected: expected.clone(),
                actual: report.story_flags,
            });
        }
    }

    if let Some(expected) = case.expected_all_scripts_complete {
        if expected != report.all_scripts_complete {
            return Err(DgToolError::CompletionMismatch {
                expected,
                actual: report.all_scripts_complete,
            });
        }
    }

    Ok(())
}
