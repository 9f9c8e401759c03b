use std::path::Path;

use dg_core::DialogueError;

use crate::{
    create_session_for_scenario, emit_boundary_with_saved_state, load_session_from_state_for_ref,
    load_source_by_scripts_dir, run_to_boundary, AgentArgs, AgentCommand, FlagArgs, JumpArgs,
    PlayerSession, SelectArgs, StartArgs, StateArgs,
};

pub(super) fn run_agent(args: AgentArgs) -> Result<i32, DialogueError> {
    match args.command {
        AgentCommand::Start(args) => run_start(args),
        AgentCommand::Continue(args) => run_continue(args),
        AgentCommand::Select(args) => run_select(args),
        AgentCommand::Skip(args) => run_skip(args),
        AgentCommand::Jump(args) => run_jump(args),
        AgentCommand::Flag(args) => run_flag(args),
    }
}

pub(super) fn run_start(args: StartArgs) -> Result<i32, DialogueError> {
    let scenario = load_source_by_scripts_dir(&args.scripts_dir)?;
    let mut session = create_session_for_scenario(
        &scenario,
        args.sequence.as_deref(),
        args.overrides.to_overrides(),
    )?;

    let boundary = run_to_boundary(&mut session);
    emit_boundary_with_saved_state(&session, boundary, &args.state_out)
}

pub(super) fn run_continue(args: StateArgs) -> Result<i32, DialogueError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        session.continue_or_start_next()
    })
}

pub(super) fn run_select(args: SelectArgs) -> Result<i32, DialogueError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        if session.sequencer.select_option(args.side) {
            return Ok(());
        }
        Err(DialogueError::new(
            "CLI_OPTION_NOT_AVAILABLE",
            format!("No options are shown; cannot select {}.", args.side.as_str()),
        ))
    })
}

pub(super) fn run_skip(args: StateArgs) -> Result<i32, DialogueError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        session.skip();
        Ok(())
    })
}

pub(super) fn run_jump(args: JumpArgs) -> Result<i32, DialogueError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        if session.sequencer.jump_to(args.index)? {
            return Ok(());
        }
        Err(DialogueError::new(
            "CLI_JUMP_OUT_OF_RANGE",
            format!(
                "Dialogue index {} is outside the {} dialogues of \"{}\".",
                args.index,
                session.sequencer.scripts().len(),
                session.sequencer.name()
            ),
        ))
    })
}

pub(super) fn run_flag(args: FlagArgs) -> Result<i32, DialogueError> {
    run_state_transition(&args.state_in, &args.state_out, |session| {
        session.sequencer.set_story_flag(args.name.as_str(), args.value);
        Ok(())
    })
}

fn run_state_transition(
    state_in: &str,
    state_out: &str,
    transition: impl FnOnce(&mut PlayerSession) -> Result<(), DialogueError>,
) -> Result<i32, DialogueError> {
    let (_scenario, _state, mut session) = load_session_from_state_for_ref(Path::new(state_in))?;
    transition(&mut session)?;
    let boundary = run_to_boundary(&mut session);
    emit_boundary_with_saved_state(&session, boundary, state_out)
}
