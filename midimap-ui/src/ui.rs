//! Terminal monitor rendering: header with mode flags and LED, IN/OUT
//! event panels, echo log, command input line.

use ratatui::layout::{Constraint, Layout, Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use midimap_core::session::ResolvedEvent;
use midimap_types::{cc_name, MessageType, MidiEvent};

use crate::runtime::AppRuntime;

pub fn draw(frame: &mut Frame, app: &AppRuntime) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Min(3),
        Constraint::Length(3),
    ])
    .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_panels(frame, app, chunks[1]);
    draw_log(frame, app, chunks[2]);
    draw_input(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &AppRuntime, area: Rect) {
    let mode = app.session.mode;
    let led = if app.led_is_on() {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    } else {
        Span::styled(" ○ ", Style::default().fg(Color::DarkGray))
    };

    let mut spans = vec![
        Span::styled(
            " midimap",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        ),
        led,
        Span::styled("MAP ", Style::default().fg(Color::DarkGray)),
        flag_span(mode.mapping_enabled),
        Span::raw("  "),
        Span::styled("DEMO ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            if mode.demo_enabled { "on" } else { "off" },
            Style::default().fg(if mode.demo_enabled {
                Color::Green
            } else {
                Color::DarkGray
            }),
        ),
    ];
    if let Some(port) = app.midi_input.connected_port_name() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            format!("midi: {}", port),
            Style::default().fg(Color::DarkGray),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Mapping flag: green on, red off.
fn flag_span(on: bool) -> Span<'static> {
    if on {
        Span::styled("on", Style::default().fg(Color::Green))
    } else {
        Span::styled("off", Style::default().fg(Color::Red))
    }
}

fn draw_panels(frame: &mut Frame, app: &AppRuntime, area: Rect) {
    let halves =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).split(area);

    let panel = |title: &'static str| {
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .title_style(Style::default().fg(Color::Green))
            .border_style(Style::default().fg(Color::DarkGray))
    };

    let in_lines = match &app.last_resolved {
        Some(res) => event_lines(&res.input),
        None => vec![dim_line("waiting for events")],
    };
    frame.render_widget(Paragraph::new(in_lines).block(panel(" IN ")), halves[0]);

    let out_lines = match &app.last_resolved {
        Some(res) => output_lines(res),
        None => vec![dim_line("—")],
    };
    frame.render_widget(Paragraph::new(out_lines).block(panel(" OUT ")), halves[1]);
}

fn event_lines(event: &MidiEvent) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        event.name(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];
    if event.kind != MessageType::ProgramChange {
        lines.push(Line::from(Span::styled(
            format!("value {}", event.value),
            Style::default().fg(Color::Yellow),
        )));
    }
    lines.push(dim_line_owned(context_for(event)));
    lines
}

/// The panel shows at most this many outputs; the rest collapse into a
/// "+N more" line (fan-out can produce up to 10).
const MAX_OUTPUT_LINES: usize = 5;

fn output_lines(res: &ResolvedEvent) -> Vec<Line<'static>> {
    if res.outputs.is_empty() {
        return vec![dim_line("(no output)")];
    }
    let mut lines: Vec<Line> = res
        .outputs
        .iter()
        .take(MAX_OUTPUT_LINES)
        .map(|event| {
            let mut spans = vec![Span::styled(
                event.name(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )];
            if event.kind != MessageType::ProgramChange {
                spans.push(Span::styled(
                    format!(":{}", event.value),
                    Style::default().fg(Color::Yellow),
                ));
            }
            Line::from(spans)
        })
        .collect();
    if res.outputs.len() > MAX_OUTPUT_LINES {
        lines.push(dim_line_owned(format!(
            "+{} more",
            res.outputs.len() - MAX_OUTPUT_LINES
        )));
    }
    if !res.mapped {
        lines.push(dim_line("passthrough"));
    }
    lines
}

fn context_for(event: &MidiEvent) -> String {
    match event.kind {
        MessageType::ControlChange => cc_name(event.number).to_string(),
        MessageType::ProgramChange => "program change".to_string(),
        MessageType::Note => "note".to_string(),
    }
}

fn dim_line(text: &'static str) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn dim_line_owned(text: String) -> Line<'static> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

fn draw_log(frame: &mut Frame, app: &AppRuntime, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" log ")
        .border_style(Style::default().fg(Color::DarkGray));
    let visible = area.height.saturating_sub(2) as usize;
    let start = app.log.len().saturating_sub(visible);
    let lines: Vec<Line> = app.log[start..]
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_input(frame: &mut Frame, app: &AppRuntime, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" command ")
        .border_style(Style::default().fg(Color::DarkGray));
    let line = Line::from(vec![
        Span::styled("> ", Style::default().fg(Color::Green)),
        Span::raw(app.input.as_str()),
    ]);
    frame.render_widget(Paragraph::new(line).block(block), area);

    let cursor_x = area.x + 3 + app.input.chars().count() as u16;
    frame.set_cursor_position(Position::new(cursor_x, area.y + 1));
}
