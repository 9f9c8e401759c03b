use std::io::{self, BufRead, Write};
use std::path::Path;

use dg_core::{DialogueError, OptionSide};

use crate::{
    create_session_for_scenario, describe_notification, load_session_from_state_for_scenario,
    map_tui_io, run_to_boundary, save_session_state, BoundaryEvent, BoundaryResult, PlayerSession,
    TuiCommandAction, TuiCommandContext,
};

pub(crate) const COMMAND_HELP: &str = "commands: :help :save :load :restart :skip :flags :quit";

pub(crate) fn run_tui_line_mode(
    context: &TuiCommandContext<'_>,
    session: &mut PlayerSession,
) -> Result<i32, DialogueError> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stdout();
    run_tui_line_mode_with_io(context, session, &mut reader, &mut writer)
}

pub(crate) fn run_tui_line_mode_with_io(
    context: &TuiCommandContext<'_>,
    session: &mut PlayerSession,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<i32, DialogueError> {
    writeln!(writer, "Casefile dialogue: {}", context.scenario.title).map_err(map_tui_io)?;
    writeln!(writer, "{}", COMMAND_HELP).map_err(map_tui_io)?;

    loop {
        let boundary = run_to_boundary(session);
        write_boundary(writer, &boundary)?;
        if boundary.event == BoundaryEvent::End {
            writeln!(writer).map_err(map_tui_io)?;
            writeln!(writer, "[END]").map_err(map_tui_io)?;
            return Ok(0);
        }

        loop {
            let Some(raw) = prompt_input_from("> ", reader, writer)? else {
                return Ok(0);
            };
            let mut messages = Vec::new();
            let mut emit = |line: String| messages.push(line);
            let action = handle_line_cmd(raw.trim(), context, session, &mut emit)?;
            for message in messages {
                writeln!(writer, "{}", message).map_err(map_tui_io)?;
            }
            match action {
                TuiCommandAction::Continue => continue,
                TuiCommandAction::RefreshBoundary => break,
                TuiCommandAction::Quit => return Ok(0),
                TuiCommandAction::NotHandled => {}
            }

            if boundary.event == BoundaryEvent::Options {
                let side = parse_line_option(raw.trim())?;
                session.sequencer.select_option(side);
            } else {
                session.continue_or_start_next()?;
            }
            break;
        }
    }
}

fn write_boundary(writer: &mut dyn Write, boundary: &BoundaryResult) -> Result<(), DialogueError> {
    for notification in &boundary.notifications {
        writeln!(writer, "  * {}", describe_notification(notification)).map_err(map_tui_io)?;
    }

    match boundary.event {
        BoundaryEvent::Line | BoundaryEvent::Options => {
            writeln!(writer).map_err(map_tui_io)?;
            let speaker = boundary.speaker.as_deref().unwrap_or_default();
            match (&boundary.portrait, speaker.is_empty()) {
                (Some(portrait), false) => {
                    writeln!(writer, "{} [{}]", speaker, portrait).map_err(map_tui_io)?
                }
                (None, false) => writeln!(writer, "{}", speaker).map_err(map_tui_io)?,
                (_, true) => {}
            }
            writeln!(writer, "{}", boundary.text.as_deref().unwrap_or_default())
                .map_err(map_tui_io)?;
            if let Some((top, bottom)) = &boundary.options {
                writeln!(writer, "  [1] {}", top).map_err(map_tui_io)?;
                writeln!(writer, "  [2] {}", bottom).map_err(map_tui_io)?;
            }
        }
        BoundaryEvent::Popup => {
            if let Some(popup) = &boundary.popup {
                writeln!(writer).map_err(map_tui_io)?;
                writeln!(writer, "== {} ==", popup.title).map_err(map_tui_io)?;
                if !popup.body.is_empty() {
                    writeln!(writer, "{}", popup.body).map_err(map_tui_io)?;
                }
            }
        }
        BoundaryEvent::Idle => {
            writeln!(writer).map_err(map_tui_io)?;
            writeln!(writer, "(press enter for the next dialogue)").map_err(map_tui_io)?;
        }
        BoundaryEvent::End => {}
    }
    Ok(())
}

fn parse_line_option(raw: &str) -> Result<OptionSide, DialogueError> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "t" | "top" => Ok(OptionSide::Top),
        "2" | "b" | "bottom" => Ok(OptionSide::Bottom),
        _ => Err(DialogueError::new(
            "TUI_OPTION_PARSE",
            format!("Invalid option: {}", raw),
        )),
    }
}

/// Commands shared by the line mode and the key bindings of the rich mode.
pub(crate) fn handle_tui_command(
    raw: &str,
    context: &TuiCommandContext<'_>,
    session: &mut PlayerSession,
    emit: &mut dyn FnMut(String),
) -> Result<TuiCommandAction, DialogueError> {
    match raw {
        ":help" => {
            emit(COMMAND_HELP.to_string());
            Ok(TuiCommandAction::Continue)
        }
        ":save" => {
            save_session_state(Path::new(context.state_file), session)?;
            emit(format!("saved: {}", context.state_file));
            Ok(TuiCommandAction::Continue)
        }
        ":load" => {
            let (_state, resumed) =
                load_session_from_state_for_scenario(Path::new(context.state_file), context.scenario)?;
            *session = resumed;
            emit(format!("loaded: {}", context.state_file));
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":restart" => {
            let restarted =
                create_session_for_scenario(context.scenario, context.sequence, context.overrides)?;
            *session = restarted;
            emit("restarted".to_string());
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":skip" => {
            session.skip();
            emit("skipped".to_string());
            Ok(TuiCommandAction::RefreshBoundary)
        }
        ":flags" => {
            let flags = session.sequencer.story_flags().as_map();
            if flags.is_empty() {
                emit("(no flags)".to_string());
            }
            for (name, value) in flags {
                emit(format!("{} = {}", name, value));
            }
            Ok(TuiCommandAction::Continue)
        }
        ":quit" => {
            emit("bye".to_string());
            Ok(TuiCommandAction::Quit)
        }
        _ => Ok(TuiCommandAction::NotHandled),
    }
}

pub(crate) fn handle_line_cmd(
    raw: &str,
    context: &TuiCommandContext<'_>,
    session: &mut PlayerSession,
    emit: &mut dyn FnMut(String),
) -> Result<TuiCommandAction, DialogueError> {
    handle_tui_command(raw, context, session, emit)
}

/// `None` once the input is exhausted.
pub(crate) fn prompt_input_from(
    prefix: &str,
    reader: &mut dyn BufRead,
    writer: &mut dyn Write,
) -> Result<Option<String>, DialogueError> {
    write!(writer, "{}", prefix).map_err(map_tui_io)?;
    writer.flush().map_err(map_tui_io)?;
    let mut input = String::new();
    if reader.read_line(&mut input).map_err(map_tui_io)? == 0 {
        return Ok(None);
    }
    Ok(Some(input.trim_end_matches(&['\r', '\n'][..]).to_string()))
}
