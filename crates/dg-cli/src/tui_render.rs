#![cfg(not(coverage))]

use dg_core::OptionSide;
use dg_runtime::DialoguePhase;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui_state::{TuiUiState, LOG_CAPACITY};
use crate::{PlayerSession, TuiCommandContext};

const KEYS_TEXT: &str =
    "keys: enter continue/choose | up/down pick | 1/2 choose | k skip | s save | l load | r restart | f flags | h help | q quit";
const HELP_TEXT: &str =
    "saving works once the text has finished typing and no popup is fading. options show after the line is read.";

pub(crate) fn render_tui(
    frame: &mut Frame<'_>,
    ui: &TuiUiState,
    session: &PlayerSession,
    context: &TuiCommandContext<'_>,
) {
    let footer_rows = if ui.help_visible { 4 } else { 3 };
    let [header, dialogue, options, log, footer] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(5),
        Constraint::Length(4),
        Constraint::Length(LOG_CAPACITY as u16 + 2),
        Constraint::Length(footer_rows),
    ])
    .areas(frame.area());

    render_header(frame, header, session, context);
    render_dialogue(frame, dialogue, session);
    render_options(frame, options, ui, session);
    render_log(frame, log, ui);
    render_footer(frame, footer, ui);
    render_popup(frame, session);
}

fn render_header(
    frame: &mut Frame<'_>,
    area: Rect,
    session: &PlayerSession,
    context: &TuiCommandContext<'_>,
) {
    let lines = vec![
        Line::from(vec![
            Span::styled(
                context.scenario.title.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                " | sequence {} | dialogue {}/{}",
                session.sequencer.name(),
                session.sequencer.cursor(),
                session.sequencer.scripts().len()
            )),
        ]),
        Line::from(Span::styled(
            format!("state: {}", context.state_file),
            Style::default().fg(Color::Gray),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_dialogue(frame: &mut Frame<'_>, area: Rect, session: &PlayerSession) {
    let surface = session.surface.borrow();
    if !surface.panel_visible {
        let idle = if session.is_finished() {
            "[end]"
        } else {
            "press enter for the next dialogue"
        };
        frame.render_widget(
            Paragraph::new(Span::styled(idle, Style::default().fg(Color::Green)))
                .block(Block::bordered()),
            area,
        );
        return;
    }

    let mut lines = Vec::new();
    if let Some(portrait) = &surface.portrait {
        lines.push(Line::from(Span::styled(
            format!("[{}]", portrait.0),
            Style::default().fg(Color::Gray),
        )));
    }
    lines.extend(surface.content.lines().map(|line| Line::from(line.to_string())));

    let block = Block::bordered().title(Span::styled(
        surface.speaker_name.clone(),
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ));
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: false }).block(block),
        area,
    );
}

fn render_options(frame: &mut Frame<'_>, area: Rect, ui: &TuiUiState, session: &PlayerSession) {
    let surface = session.surface.borrow();
    let phase = session.sequencer.machine().phase();
    let lines = match (&surface.options, phase) {
        (Some((top, bottom)), DialoguePhase::ShowingOptions) => vec![
            option_line(1, top, ui.selected == OptionSide::Top),
            option_line(2, bottom, ui.selected == OptionSide::Bottom),
        ],
        (_, DialoguePhase::Typing) => vec![Line::from(Span::styled(
            "...",
            Style::default().fg(Color::Gray),
        ))],
        _ => Vec::new(),
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title("options")),
        area,
    );
}

fn option_line(number: usize, text: &str, selected: bool) -> Line<'static> {
    let prefix = if selected { "> " } else { "  " };
    let style = if selected {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };
    Line::from(Span::styled(format!("{}{}. {}", prefix, number, text), style))
}

fn render_log(frame: &mut Frame<'_>, area: Rect, ui: &TuiUiState) {
    let lines = ui
        .log
        .iter()
        .map(|entry| Line::from(Span::styled(entry.clone(), Style::default().fg(Color::Gray))))
        .collect::<Vec<_>>();
    frame.render_widget(
        Paragraph::new(lines).block(Block::bordered().title("events")),
        area,
    );
}

fn render_footer(frame: &mut Frame<'_>, area: Rect, ui: &TuiUiState) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("status: {}", ui.status),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(KEYS_TEXT, Style::default().fg(Color::Yellow))),
    ];
    if ui.help_visible {
        lines.push(Line::from(Span::styled(
            HELP_TEXT,
            Style::default().fg(Color::Magenta),
        )));
    }
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), area);
}

/// Overlay for the popup on screen; the fade maps onto the text colour.
fn render_popup(frame: &mut Frame<'_>, session: &PlayerSession) {
    let popup_surface = session.popup_surface.borrow();
    let Some(popup) = &popup_surface.current else {
        return;
    };

    let color = match popup_surface.alpha {
        alpha if alpha >= 1.0 => Color::White,
        alpha if alpha >= 0.5 => Color::Gray,
        _ => Color::DarkGray,
    };
    let area = centered_rect(frame.area(), 60, 7);
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(popup.body.clone())
            .style(Style::default().fg(color))
            .wrap(Wrap { trim: true })
            .block(Block::bordered().title(popup.title.clone())),
        area,
    );
}

fn centered_rect(area: Rect, width_percent: u16, height: u16) -> Rect {
    let width = (area.width.saturating_mul(width_percent) / 100).max(1);
    let height = height.min(area.height);
    Rect {
        x: area.x + area.width.saturating_sub(width) / 2,
        y: area.y + area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}
