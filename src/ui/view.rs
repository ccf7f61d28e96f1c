use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::task::Task;
use crate::timer::format_clock;

use super::app::{AppState, StatusKind, TimerScreen};
use super::model::{self, SPINNER_FRAMES};

const CHECKBOX_WIDTH: usize = 4;
const TIME_WIDTH: usize = 16;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);
const COLOR_TITLE_BG: Color = Color::Rgb(125, 86, 244);
const COLOR_CLOCK_BG: Color = Color::Rgb(242, 93, 148);

pub fn render(frame: &mut Frame, app: &AppState, now: Instant) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(3)].as_ref())
        .split(area);
    let main = chunks[0];
    let footer = chunks[1];

    if app.is_loading() {
        render_loading(frame, app, main);
    } else if let Some(timer) = app.timer() {
        render_timer(frame, app, timer, main, now);
    } else {
        render_list(frame, app, main);
    }

    render_footer(frame, app, footer, now);
}

fn render_loading(frame: &mut Frame, app: &AppState, area: Rect) {
    let spinner = SPINNER_FRAMES[app.spinner_frame % SPINNER_FRAMES.len()];
    let line = Line::from(vec![
        Span::styled(spinner, Style::default().fg(COLOR_TITLE_BG)),
        Span::raw(" "),
        Span::styled("Loading todos...", Style::default().fg(COLOR_MUTED)),
    ]);
    let widget = Paragraph::new(vec![Line::from(""), line]).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let tasks = app.session.tasks();
    let mut lines = Vec::new();

    if tasks.is_empty() {
        lines.push(Line::from(Span::styled(
            "No tasks. Add `- [ ] something` to the file.",
            Style::default().fg(COLOR_MUTED),
        )));
    } else {
        let list_height = area.height.saturating_sub(2) as usize;
        let (start, end) = model::list_window(tasks.len(), app.selected, list_height);
        for (idx, task) in tasks.iter().enumerate().take(end).skip(start) {
            lines.push(render_list_row(task, app.selected == Some(idx), content_width));
        }
    }

    let title = app
        .session
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "todos".to_string());
    let widget = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {title} "),
                Style::default()
                    .fg(COLOR_TEXT)
                    .bg(COLOR_TITLE_BG)
                    .add_modifier(Modifier::BOLD),
            ))
            .border_style(Style::default().fg(COLOR_BORDER_LIST)),
    );
    frame.render_widget(widget, area);
}

fn render_list_row(task: &Task, selected: bool, width: usize) -> Line<'static> {
    let checkbox = model::checkbox_label(task);
    let time_text = model::time_label(task);
    let title_width = width.saturating_sub(CHECKBOX_WIDTH + TIME_WIDTH + 2);
    let title = model::truncate_text(&task.description, title_width);
    let padding = title_width.saturating_sub(title.chars().count());

    let (checkbox_style, title_style) = if task.is_done() {
        (
            Style::default().fg(COLOR_SUCCESS),
            Style::default()
                .fg(COLOR_MUTED_DARK)
                .add_modifier(Modifier::CROSSED_OUT),
        )
    } else if !task.total_time().is_zero() {
        (
            Style::default()
                .fg(COLOR_WARNING)
                .add_modifier(Modifier::BOLD),
            Style::default().fg(COLOR_TEXT),
        )
    } else {
        (Style::default().fg(COLOR_MUTED), Style::default().fg(COLOR_TEXT))
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(checkbox.to_string(), checkbox_style),
        Span::raw(" "),
        Span::styled(title, title_style),
        Span::raw(" ".repeat(padding + 1)),
        Span::styled(
            format!("{:>width$}", time_text, width = TIME_WIDTH),
            Style::default().fg(COLOR_MUTED),
        ),
    ];

    if selected {
        for span in &mut spans {
            span.style = span.style.fg(COLOR_SUCCESS).add_modifier(Modifier::REVERSED);
        }
    }

    Line::from(spans)
}

fn render_timer(frame: &mut Frame, app: &AppState, timer: &TimerScreen, area: Rect, now: Instant) {
    let Some(task) = app.session.task(timer.index) else {
        return;
    };
    let countdown = &timer.countdown;
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  {}  ", task.description),
            Style::default()
                .fg(COLOR_TEXT)
                .bg(COLOR_TITLE_BG)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(""),
    ];

    if countdown.timed_out(now) {
        lines.push(Line::from(Span::styled(
            "COMPLETE",
            Style::default()
                .fg(COLOR_SUCCESS)
                .add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(
                "Add another {}? (y/n)",
                model::format_minutes(countdown.budget())
            ),
            Style::default().fg(COLOR_MUTED),
        )));
    } else {
        lines.push(clock_line(&format_clock(countdown.remaining(now))));
        lines.push(Line::from(""));
        let status = if countdown.is_running(now) {
            Span::styled("remaining", Style::default().fg(COLOR_MUTED))
        } else {
            Span::styled(
                "PAUSED",
                Style::default()
                    .fg(COLOR_WARNING)
                    .add_modifier(Modifier::BOLD),
            )
        };
        lines.push(Line::from(status));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!(
            "this session {}  total {}",
            model::format_minutes(countdown.total_elapsed(now)),
            model::format_minutes(task.total_time() + countdown.total_elapsed(now))
        ),
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}

fn clock_line(clock: &str) -> Line<'static> {
    let Some((minutes, seconds)) = clock.rsplit_once(':') else {
        return Line::from(Span::styled(
            clock.to_string(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        ));
    };
    Line::from(vec![
        Span::styled(
            format!(" {minutes} "),
            Style::default()
                .fg(COLOR_TEXT)
                .bg(COLOR_CLOCK_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled("  :  ", Style::default().fg(COLOR_MUTED)),
        Span::styled(
            seconds.to_string(),
            Style::default().fg(COLOR_TEXT).add_modifier(Modifier::BOLD),
        ),
    ])
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect, now: Instant) {
    let mut spans = Vec::new();
    if let Some(hint) = app.footer_hint(now) {
        spans.push(Span::styled(hint, Style::default().fg(COLOR_INFO)));
    }
    if let Some((status, kind)) = app.status_line() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        if !spans.is_empty() {
            spans.push(Span::raw("  |  "));
        }
        spans.push(Span::styled(status, status_style));
    }
    let counts_line = Line::from(Span::styled(
        app.task_count_summary(),
        Style::default().fg(COLOR_ACCENT),
    ));
    let widget = Paragraph::new(vec![Line::from(spans), counts_line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}
