//! Frame drawing for the chat TUI

use super::app::{App, Message};
use super::render;
use ratatui::{prelude::*, widgets::Paragraph};

// Minimal color palette
const USER_COLOR: Color = Color::Rgb(138, 180, 248); // Soft blue
const DIM_COLOR: Color = Color::Rgb(100, 100, 100);
const WARN_COLOR: Color = Color::Rgb(255, 193, 7);

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(3),    // Transcript
            Constraint::Length(1), // Status line
        ])
        .split(area);

    draw_transcript(frame, app, chunks[0]);
    draw_status(frame, app, chunks[1]);
}

fn draw_transcript(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    for message in app.transcript() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        match message {
            Message::User(prompt) => {
                lines.push(Line::from(vec![
                    Span::styled("› ", Style::default().fg(USER_COLOR)),
                    Span::raw(prompt.clone()),
                ]));
            }
            Message::Assistant(result) => {
                lines.extend(render::render_response(result, false, 0));
                if !result.is_complete {
                    lines.push(Line::from(Span::styled(
                        "stream ended before the response completed",
                        Style::default().fg(WARN_COLOR),
                    )));
                }
            }
        }
    }

    if app.is_streaming() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        lines.extend(render::render_response(
            app.current(),
            app.buffer_is_empty(),
            app.tick_count(),
        ));
    }

    // Pin to the bottom while streaming, manual scroll otherwise
    let height = area.height as usize;
    let scroll = if app.is_streaming() {
        lines.len().saturating_sub(height) as u16
    } else {
        app.scroll_offset()
            .min(lines.len().saturating_sub(height) as u16)
    };

    let paragraph = Paragraph::new(lines).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

fn draw_status(frame: &mut Frame, app: &App, area: Rect) {
    let state = if app.is_streaming() {
        "streaming"
    } else {
        "idle"
    };
    let line = Line::from(vec![
        Span::styled(
            format!("sheetchat {}", env!("SHEETCHAT_VERSION")),
            Style::default().fg(DIM_COLOR),
        ),
        Span::styled(
            format!("  {} blocks  {}  ", app.current().blocks.len(), state),
            Style::default().fg(DIM_COLOR),
        ),
        Span::styled("q to quit  ↑/↓ scroll", Style::default().fg(DIM_COLOR).dim()),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}
