//! Rendering of the chat shell

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph, Wrap};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use reqchat_extraction::{group, parse, RequirementGroups};
use reqchat_sessions::{ChatMessage, MessageRole};

use crate::app::{App, InputMode};

pub fn draw(frame: &mut Frame, app: &App) {
    let mut constraints = vec![
        Constraint::Length(1),
        Constraint::Min(3),
    ];
    if app.upload.is_some() {
        constraints.push(Constraint::Length(3));
    }
    constraints.push(Constraint::Length(5));
    constraints.push(Constraint::Length(1));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());

    let mut index = 0;
    draw_header(frame, app, chunks[index]);
    index += 1;
    draw_messages(frame, app, chunks[index]);
    index += 1;
    if app.upload.is_some() {
        draw_upload_gauge(frame, app, chunks[index]);
        index += 1;
    }
    draw_composer(frame, app, chunks[index]);
    index += 1;
    draw_key_bar(frame, app, chunks[index]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let model = app.selected_model_id().unwrap_or("no model");
    let mut spans = vec![
        Span::styled("ReqChat", Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!("  model: {}", model)),
    ];
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {}", status),
            Style::default().fg(Color::Yellow),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_messages(frame: &mut Frame, app: &App, area: Rect) {
    let inner_width = area.width.saturating_sub(2) as usize;
    let mut lines: Vec<Line<'static>> = Vec::new();
    for message in app.store.messages() {
        lines.extend(message_lines(message, inner_width));
        lines.push(Line::raw(""));
    }
    if app.store.is_loading() {
        lines.push(Line::styled(
            "assistant is typing...",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
    }

    // Pin the view to the latest messages.
    let visible = area.height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;

    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Conversation"))
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

/// Render one message as styled lines.
///
/// User messages sit on the right edge; assistant messages sit on the left.
/// Assistant content goes through the extraction parser on every render:
/// structured results come out as grouped sections, anything else is shown
/// verbatim.
fn message_lines(message: &ChatMessage, width: usize) -> Vec<Line<'static>> {
    let timestamp = message.timestamp.format("%H:%M").to_string();
    match message.role {
        MessageRole::User => {
            let mut lines = Vec::new();
            for text in message.content.lines() {
                let pad = width.saturating_sub(text.width());
                lines.push(Line::from(vec![
                    Span::raw(" ".repeat(pad)),
                    Span::styled(text.to_string(), Style::default().fg(Color::Cyan)),
                ]));
            }
            let label = format!("you at {}", timestamp);
            let pad = width.saturating_sub(label.width());
            lines.push(Line::from(vec![
                Span::raw(" ".repeat(pad)),
                Span::styled(label, Style::default().fg(Color::DarkGray)),
            ]));
            lines
        }
        MessageRole::Assistant => {
            let mut lines = match parse(&message.content) {
                Some(requirements) => requirement_lines(&group(requirements)),
                None => message
                    .content
                    .lines()
                    .map(|text| Line::raw(text.to_string()))
                    .collect(),
            };
            lines.push(Line::styled(
                format!("assistant at {}", timestamp),
                Style::default().fg(Color::DarkGray),
            ));
            lines
        }
    }
}

/// Grouped requirement sections; empty buckets are not rendered
fn requirement_lines(groups: &RequirementGroups) -> Vec<Line<'static>> {
    let sections = [
        ("Functional requirements", &groups.functional),
        ("Non-functional requirements", &groups.non_functional),
        ("Other requirements", &groups.other),
    ];
    let mut lines = Vec::new();
    for (heading, bucket) in sections {
        if bucket.is_empty() {
            continue;
        }
        lines.push(Line::styled(
            heading.to_string(),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ));
        for requirement in bucket.iter() {
            lines.push(Line::raw(format!("  * {}", requirement.title)));
            if !requirement.description.is_empty() && requirement.description != requirement.title
            {
                lines.push(Line::styled(
                    format!("    {}", requirement.description),
                    Style::default().fg(Color::Gray),
                ));
            }
        }
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "No requirements found in the document".to_string(),
            Style::default().fg(Color::DarkGray),
        ));
    }
    lines
}

fn draw_upload_gauge(frame: &mut Frame, app: &App, area: Rect) {
    let Some(upload) = &app.upload else {
        return;
    };
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Uploading {}", upload.file_name)),
        )
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(upload.ratio().clamp(0.0, 1.0));
    frame.render_widget(gauge, area);
}

fn draw_composer(frame: &mut Frame, app: &App, area: Rect) {
    match app.mode {
        InputMode::Compose => {
            let mut input = app.input.clone();
            input.set_block(Block::default().borders(Borders::ALL).title("Message"));
            frame.render_widget(&input, area);
        }
        InputMode::PickFile => {
            let mut input = app.file_input.clone();
            input.set_block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Attach file (Esc to cancel)"),
            );
            frame.render_widget(&input, area);
        }
    }
}

fn draw_key_bar(frame: &mut Frame, app: &App, area: Rect) {
    let help = match app.mode {
        InputMode::Compose => {
            "Enter send | Tab model | Ctrl+O attach | Ctrl+L clear | Ctrl+C quit"
        }
        InputMode::PickFile => "Enter upload | Esc cancel",
    };
    frame.render_widget(
        Paragraph::new(Line::styled(help, Style::default().fg(Color::DarkGray))),
        area,
    );
}
