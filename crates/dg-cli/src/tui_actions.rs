use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use dg_core::{DialogueError, OptionSide};
use dg_runtime::DialoguePhase;

use crate::line_tui::handle_tui_command;
use crate::tui_state::TuiUiState;
use crate::{PlayerSession, TuiCommandAction, TuiCommandContext};

/// Applies one key press. Returns `true` when the player asked to quit.
pub(crate) fn handle_key(
    key: KeyEvent,
    context: &TuiCommandContext<'_>,
    session: &mut PlayerSession,
    ui: &mut TuiUiState,
) -> Result<bool, DialogueError> {
    if key.code == KeyCode::Esc || matches!(key.code, KeyCode::Char('q')) {
        return Ok(true);
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Ok(true);
    }

    let command = match key.code {
        KeyCode::Char('h') => {
            ui.help_visible = !ui.help_visible;
            return Ok(false);
        }
        KeyCode::Char('s') => Some(":save"),
        KeyCode::Char('l') => Some(":load"),
        KeyCode::Char('r') => Some(":restart"),
        KeyCode::Char('k') => Some(":skip"),
        KeyCode::Char('f') => Some(":flags"),
        _ => None,
    };
    if let Some(command) = command {
        let mut messages = Vec::new();
        let mut emit = |line: String| messages.push(line);
        let action = handle_tui_command(command, context, session, &mut emit)?;
        if action == TuiCommandAction::RefreshBoundary {
            ui.reset_selection();
        }
        for message in messages {
            ui.status = message.clone();
            ui.push_log(message);
        }
        return Ok(false);
    }

    let showing_options = session.sequencer.machine().phase() == DialoguePhase::ShowingOptions;
    match key.code {
        KeyCode::Up | KeyCode::Down => {
            if showing_options {
                ui.toggle_selected();
            } else {
                ui.status = "no options shown".to_string();
            }
        }
        KeyCode::Char('1') => select(session, ui, OptionSide::Top),
        KeyCode::Char('2') => select(session, ui, OptionSide::Bottom),
        KeyCode::Enter | KeyCode::Char(' ') => {
            if showing_options {
                let side = ui.selected;
                select(session, ui, side);
            } else if session.is_finished() {
                ui.status = "case closed; press r to restart".to_string();
            } else {
                session.continue_or_start_next()?;
            }
        }
        _ => {}
    }

    Ok(false)
}

fn select(session: &mut PlayerSession, ui: &mut TuiUiState, side: OptionSide) {
    if session.sequencer.select_option(side) {
        ui.status = format!("chose {}", side.as_str());
        ui.reset_selection();
    } else {
        ui.status = "no options shown".to_string();
    }
}
