#[cfg(coverage)]
pub(super) fn run_tui_ratatui_mode(
    context: &super::TuiCommandContext<'_>,
    session: &mut super::PlayerSession,
) -> Result<i32, dg_core::DialogueError> {
    super::run_tui_line_mode(context, session)
}

#[cfg(not(coverage))]
mod rich {
    use std::io;
    use std::time::{Duration, Instant};

    use crossterm::event::{self, Event, KeyEventKind};
    use crossterm::terminal::{
        disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
    };
    use crossterm::ExecutableCommand;
    use dg_core::DialogueError;
    use ratatui::backend::CrosstermBackend;
    use ratatui::Terminal;

    use crate::tui_actions::handle_key;
    use crate::tui_render::render_tui;
    use crate::tui_state::TuiUiState;
    use crate::{map_tui_io, PlayerSession, TuiCommandContext};

    const FRAME_MS: u64 = 16;

    struct TuiTerminal {
        terminal: Terminal<CrosstermBackend<io::Stdout>>,
    }

    impl TuiTerminal {
        fn new() -> Result<Self, DialogueError> {
            enable_raw_mode().map_err(map_tui_io)?;
            io::stdout()
                .execute(EnterAlternateScreen)
                .map_err(map_tui_io)?;
            let backend = CrosstermBackend::new(io::stdout());
            let terminal = Terminal::new(backend).map_err(map_tui_io)?;
            Ok(Self { terminal })
        }

        fn terminal_mut(&mut self) -> &mut Terminal<CrosstermBackend<io::Stdout>> {
            &mut self.terminal
        }
    }

    impl Drop for TuiTerminal {
        fn drop(&mut self) {
            let _ = disable_raw_mode();
            let _ = io::stdout().execute(LeaveAlternateScreen);
        }
    }

    /// Drives the sequencer in real time: reveals and fades advance with the
    /// wall clock between key presses.
    pub(super) fn run_tui_ratatui_mode(
        context: &TuiCommandContext<'_>,
        session: &mut PlayerSession,
    ) -> Result<i32, DialogueError> {
        let mut terminal = TuiTerminal::new()?;
        let mut ui = TuiUiState::new("ready");
        let frame_time = Duration::from_millis(FRAME_MS);
        let mut last_tick = Instant::now();

        loop {
            let now = Instant::now();
            session.sequencer.tick(now.duration_since(last_tick));
            last_tick = now;
            ui.record_notifications(&session.sequencer.drain_event_log());

            terminal
                .terminal_mut()
                .draw(|frame| render_tui(frame, &ui, &*session, context))
                .map_err(map_tui_io)?;

            if !event::poll(frame_time).map_err(map_tui_io)? {
                continue;
            }

            let evt = event::read().map_err(map_tui_io)?;
            if let Event::Key(key) = evt {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match handle_key(key, context, session, &mut ui) {
                    Ok(true) => break,
                    Ok(false) => {}
                    Err(error) => {
                        tracing::debug!(code = %error.code, "tui action failed");
                        ui.status = error.message;
                    }
                }
            }
        }

        Ok(0)
    }
}

#[cfg(not(coverage))]
pub(super) fn run_tui_ratatui_mode(
    context: &super::TuiCommandContext<'_>,
    session: &mut super::PlayerSession,
) -> Result<i32, dg_core::DialogueError> {
    use std::io::IsTerminal;

    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return super::run_tui_line_mode(context, session);
    }
    rich::run_tui_ratatui_mode(context, session)
}
