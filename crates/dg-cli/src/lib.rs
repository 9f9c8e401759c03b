use std::ffi::OsString;

use clap::Parser;
use dg_core::DialogueError;

mod agent;
mod boundary_runner;
mod cli_args;
mod error_map;
mod line_tui;
mod logging;
mod models;
mod portraits;
mod session_ops;
mod source_loader;
mod state_store;
mod tui;
mod tui_actions;
#[cfg(not(coverage))]
mod tui_render;
mod tui_state;

pub use logging::{init_tracing, LOG_ENV};

pub(crate) use boundary_runner::{describe_notification, emit_boundary, run_to_boundary};
pub(crate) use cli_args::{
    AgentArgs, AgentCommand, Cli, FlagArgs, JumpArgs, Mode, OverrideArgs, SelectArgs, StartArgs,
    StateArgs, TuiArgs,
};
pub(crate) use error_map::{
    emit_error, map_cli_source_path, map_cli_source_read, map_cli_source_scan,
    map_cli_state_encode, map_cli_state_invalid, map_cli_state_read, map_cli_state_write,
    map_tui_io,
};
pub(crate) use line_tui::run_tui_line_mode;
pub(crate) use models::{
    BoundaryEvent, BoundaryResult, LoadedScenario, PlayerState, RunOverrides, TuiCommandAction,
    TuiCommandContext, PLAYER_STATE_SCHEMA, SCRIPTS_DIR_REF_PREFIX,
};
pub(crate) use portraits::DirPortraits;
pub(crate) use session_ops::{
    create_session_for_scenario, emit_boundary_with_saved_state, load_session_from_state_for_ref,
    load_session_from_state_for_scenario, save_session_state, PlayerSession,
};
pub(crate) use source_loader::{load_source_by_ref, load_source_by_scripts_dir};
pub(crate) use state_store::{load_player_state, save_player_state};

pub fn run_cli_from_args<I, T>(args: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(error) => {
            let _ = error.print();
            return error.exit_code();
        }
    };
    match run(cli) {
        Ok(code) => code,
        Err(error) => emit_error(error),
    }
}

fn run(cli: Cli) -> Result<i32, DialogueError> {
    match cli.command {
        Mode::Agent(args) => agent::run_agent(args),
        Mode::Tui(args) => run_tui(args),
    }
}

fn run_tui(args: TuiArgs) -> Result<i32, DialogueError> {
    let state_file = args
        .state_file
        .unwrap_or_else(|| ".casefile/save.json".to_string());
    let scenario = load_source_by_scripts_dir(&args.scripts_dir)?;
    let overrides = args.overrides.to_overrides();
    let mut session =
        create_session_for_scenario(&scenario, args.sequence.as_deref(), overrides)?;
    let context = TuiCommandContext {
        state_file: &state_file,
        scenario: &scenario,
        sequence: args.sequence.as_deref(),
        overrides,
    };

    tui::run_tui_ratatui_mode(&context, &mut session)
}

#[cfg(test)]
mod cli_test_support;
#[cfg(test)]
mod tests;
