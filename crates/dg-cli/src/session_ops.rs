use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use dg_api::{build_sequencer, compile_project, resolve_sequence};
use dg_core::DialogueError;
use dg_runtime::{BufferPopupSurface, BufferSurface, CallbackPolicy, DialogueSequencer};

use crate::{
    emit_boundary, load_player_state, load_source_by_ref, save_player_state, BoundaryEvent,
    BoundaryResult, DirPortraits, LoadedScenario, PlayerState, RunOverrides, PLAYER_STATE_SCHEMA,
};

/// A sequencer wired to in-memory surfaces the CLI reads back after every step.
pub(crate) struct PlayerSession {
    pub(crate) sequencer: DialogueSequencer,
    pub(crate) surface: Rc<RefCell<BufferSurface>>,
    pub(crate) popup_surface: Rc<RefCell<BufferPopupSurface>>,
    pub(crate) scenario_id: String,
    pub(crate) overrides: RunOverrides,
}

impl PlayerSession {
    /// Between two dialogues of a sequence that does not auto-advance.
    pub(crate) fn is_idle(&self) -> bool {
        !self.sequencer.machine().is_in_dialogue()
            && !self.sequencer.popup().is_active()
            && !self.sequencer.all_scripts_complete()
    }

    pub(crate) fn is_finished(&self) -> bool {
        !self.sequencer.machine().is_in_dialogue()
            && !self.sequencer.popup().is_active()
            && self.sequencer.all_scripts_complete()
    }

    pub(crate) fn continue_or_start_next(&mut self) -> Result<(), DialogueError> {
        if self.is_idle() {
            return self.sequencer.start_next();
        }
        self.sequencer.handle_continue();
        Ok(())
    }

    pub(crate) fn skip(&mut self) {
        if self.sequencer.popup().is_active() {
            self.sequencer.skip_popups();
        } else {
            self.sequencer.skip_remaining();
        }
    }
}

fn build_session(
    scenario: &LoadedScenario,
    sequence: Option<&str>,
    overrides: RunOverrides,
) -> Result<PlayerSession, DialogueError> {
    let project = compile_project(&scenario.sources)?;
    for warning in &project.warnings {
        tracing::warn!(
            code = %warning.code,
            script = %warning.script_name,
            entry = warning.entry_index,
            "{}",
            warning.message
        );
    }
    let manifest = resolve_sequence(&project, sequence)?;

    let surface = Rc::new(RefCell::new(BufferSurface::default()));
    let popup_surface = Rc::new(RefCell::new(BufferPopupSurface::default()));
    let mut sequencer = build_sequencer(
        &project,
        &manifest,
        overrides.to_config_overrides(),
        CallbackPolicy::default(),
        Box::new(Rc::clone(&surface)),
        Box::new(Rc::clone(&popup_surface)),
    )?;
    sequencer.set_portrait_resolver(Box::new(DirPortraits::new(&scenario.root)));

    Ok(PlayerSession {
        sequencer,
        surface,
        popup_surface,
        scenario_id: scenario.id.clone(),
        overrides,
    })
}

pub(crate) fn create_session_for_scenario(
    scenario: &LoadedScenario,
    sequence: Option<&str>,
    overrides: RunOverrides,
) -> Result<PlayerSession, DialogueError> {
    let mut session = build_session(scenario, sequence, overrides)?;
    session.sequencer.start_next()?;
    tracing::info!(scenario = %scenario.id, sequence = %session.sequencer.name(), "session started");
    Ok(session)
}

pub(crate) fn resume_session_for_state(
    scenario: &LoadedScenario,
    state: &PlayerState,
) -> Result<PlayerSession, DialogueError> {
    let mut session = build_session(
        scenario,
        Some(&state.snapshot.sequence_name),
        state.overrides,
    )?;
    session.sequencer.resume(&state.snapshot)?;
    Ok(session)
}

pub(crate) fn save_session_state(path: &Path, session: &PlayerSession) -> Result<(), DialogueError> {
    let snapshot = session.sequencer.snapshot()?;
    let state = PlayerState {
        schema_version: PLAYER_STATE_SCHEMA.to_string(),
        scenario_id: session.scenario_id.clone(),
        overrides: session.overrides,
        snapshot,
    };
    save_player_state(path, &state)
}

pub(crate) fn load_session_from_state_for_ref(
    path: &Path,
) -> Result<(LoadedScenario, PlayerState, PlayerSession), DialogueError> {
    let state = load_player_state(path)?;
    let scenario = load_source_by_ref(&state.scenario_id)?;
    let session = resume_session_for_state(&scenario, &state)?;
    Ok((scenario, state, session))
}

pub(crate) fn load_session_from_state_for_scenario(
    path: &Path,
    scenario: &LoadedScenario,
) -> Result<(PlayerState, PlayerSession), DialogueError> {
    let state = load_player_state(path)?;
    if state.scenario_id != scenario.id {
        return Err(DialogueError::new(
            "TUI_STATE_SCENARIO_MISMATCH",
            format!(
                "State scenario mismatch. expected={} actual={}",
                scenario.id, state.scenario_id
            ),
        ));
    }
    let session = resume_session_for_state(scenario, &state)?;
    Ok((state, session))
}

/// Saves the session unless the sequence has ended, then prints the boundary.
pub(crate) fn emit_boundary_with_saved_state(
    session: &PlayerSession,
    boundary: BoundaryResult,
    state_out: &str,
) -> Result<i32, DialogueError> {
    if boundary.event == BoundaryEvent::End {
        emit_boundary(boundary, None);
        return Ok(0);
    }

    save_session_state(Path::new(state_out), session)?;
    emit_boundary(boundary, Some(state_out.to_string()));
    Ok(0)
}
