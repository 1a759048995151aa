use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::filter::{PriorityFilter, StatusFilter};
use crate::task::{Priority, Task};

use super::app::{AppState, DeleteConfirmState, FormField, FormState, StatusKind};

const CHECK_WIDTH: usize = 3;
const ID_WIDTH: usize = 8;
const PRIORITY_WIDTH: usize = 6;
const DUE_WIDTH: usize = 10;
const COLOR_TEXT: Color = Color::Rgb(234, 236, 239);
const COLOR_MUTED: Color = Color::Rgb(160, 165, 172);
const COLOR_MUTED_DARK: Color = Color::Rgb(118, 124, 130);
const COLOR_BG_MUTED: Color = Color::Rgb(52, 56, 60);
const COLOR_INFO: Color = Color::Rgb(116, 198, 219);
const COLOR_WARNING: Color = Color::Rgb(244, 200, 98);
const COLOR_ERROR: Color = Color::Rgb(255, 107, 107);
const COLOR_SUCCESS: Color = Color::Rgb(126, 210, 146);
const COLOR_ACCENT: Color = Color::Rgb(122, 170, 255);
const COLOR_BORDER_LIST: Color = Color::Rgb(92, 126, 166);

pub fn render(frame: &mut Frame, app: &mut AppState) {
    let area = frame.size();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(3),
            ]
            .as_ref(),
        )
        .split(area);

    render_header(frame, app, chunks[0]);
    render_list(frame, app, chunks[1]);
    render_footer(frame, app, chunks[2]);

    if let Some(state) = app.form.as_ref() {
        render_form_modal(frame, area, state);
    }
    if let Some(state) = app.delete_confirm.as_ref() {
        render_delete_confirm_modal(frame, area, state);
    }
}

fn render_header(frame: &mut Frame, app: &AppState, area: Rect) {
    let done = app
        .list
        .tasks()
        .iter()
        .filter(|task| task.completed)
        .count();
    let spans = vec![
        Span::styled(
            "tsk",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(app.owner.clone(), Style::default().fg(COLOR_INFO)),
        Span::raw("  "),
        Span::styled(
            format!("{done}/{} done", app.list.len()),
            Style::default().fg(COLOR_MUTED),
        ),
    ];
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(COLOR_BG_MUTED)),
    );
    frame.render_widget(widget, area);
}

fn render_list(frame: &mut Frame, app: &AppState, area: Rect) {
    let content_width = area.width.saturating_sub(2) as usize;
    let mut lines = Vec::new();

    let filters_engaged = app.filter_active
        || !app.query.is_empty()
        || app.status_filter != StatusFilter::All
        || app.priority_filter != PriorityFilter::All;
    if filters_engaged {
        let filter_label = if app.filter_active && app.query.is_empty() {
            "filter: _".to_string()
        } else if app.query.is_empty() {
            "filter:".to_string()
        } else {
            format!("filter: {}", app.query)
        };
        lines.push(Line::from(vec![
            Span::styled(filter_label, Style::default().fg(COLOR_INFO)),
            Span::raw("  "),
            Span::styled(
                format!("status: {}", app.status_filter.as_str()),
                Style::default().fg(COLOR_WARNING),
            ),
            Span::raw("  "),
            Span::styled(
                format!("priority: {}", app.priority_filter.as_str()),
                Style::default().fg(COLOR_ACCENT),
            ),
        ]));
        lines.push(Line::from(""));
    }

    if app.visible_ids.is_empty() {
        if filters_engaged {
            lines.push(Line::from("No matches"));
        } else {
            lines.push(Line::from("No tasks"));
        }
    } else {
        let list_height = area
            .height
            .saturating_sub(2)
            .saturating_sub(lines.len() as u16) as usize;
        let (start, end) = list_window(app.visible_ids.len(), app.selected, list_height);
        for pos in start..end {
            if let Some(task) = app.list.get(&app.visible_ids[pos]) {
                lines.push(render_list_row(task, pos == app.selected, content_width));
            }
        }
    }

    let widget = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Tasks")
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        )
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, app: &AppState, area: Rect) {
    let hint = if app.filter_active {
        "type to filter  enter/esc done"
    } else {
        "n new  space toggle  d delete  / filter  s status  p priority  r reload  q quit"
    };
    let hint_span = Span::styled(hint, Style::default().fg(COLOR_INFO));
    let line = if let Some((status, kind)) = app.status_message.as_ref() {
        let status_style = match kind {
            StatusKind::Error => Style::default()
                .fg(COLOR_ERROR)
                .add_modifier(Modifier::BOLD),
            StatusKind::Info => Style::default().fg(COLOR_WARNING),
        };
        Line::from(vec![
            hint_span,
            Span::raw("  |  "),
            Span::styled(status.clone(), status_style),
        ])
    } else {
        Line::from(hint_span)
    };
    let widget = Paragraph::new(vec![line])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::TOP)
                .border_style(Style::default().fg(COLOR_BORDER_LIST)),
        );
    frame.render_widget(widget, area);
}

fn render_form_modal(frame: &mut Frame, area: Rect, state: &FormState) {
    let content_width = area.width.saturating_sub(8).min(56);
    let height = 10u16.min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let value_width = (content_width as usize).saturating_sub(14);
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(form_field_line(
        "Title",
        &state.form.title,
        state.focus == FormField::Title,
        value_width,
    ));
    lines.push(form_field_line(
        "Description",
        &state.form.description,
        state.focus == FormField::Description,
        value_width,
    ));
    lines.push(form_field_line(
        "Due",
        &state.due_text,
        state.focus == FormField::Due,
        value_width,
    ));
    lines.push(form_priority_line(
        state.form.priority,
        state.focus == FormField::Priority,
    ));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "tab next field  enter create  esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("New Task"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn form_field_line(label: &str, value: &str, focused: bool, width: usize) -> Line<'static> {
    let label_text = format!("{label:<12}");
    let value_text = if focused {
        truncate_text(&format!("{value}_"), width)
    } else if value.is_empty() {
        "(optional)".to_string()
    } else {
        truncate_text(value, width)
    };
    let value_style = if value.is_empty() && !focused {
        Style::default().fg(COLOR_MUTED)
    } else {
        Style::default().fg(COLOR_TEXT)
    };
    let mut spans = vec![
        Span::styled(label_text, Style::default().fg(COLOR_TEXT)),
        Span::raw(" "),
        Span::styled(value_text, value_style),
    ];
    if focused {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn form_priority_line(priority: Priority, focused: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(format!("{:<12}", "Priority"), Style::default().fg(COLOR_TEXT)),
        Span::raw(" "),
    ];
    for (idx, candidate) in Priority::ALL.iter().enumerate() {
        if idx > 0 {
            spans.push(Span::raw(" "));
        }
        let style = if *candidate == priority {
            Style::default()
                .fg(priority_color(*candidate))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(COLOR_MUTED_DARK)
        };
        spans.push(Span::styled(candidate.to_string(), style));
    }
    if focused {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn render_delete_confirm_modal(frame: &mut Frame, area: Rect, state: &DeleteConfirmState) {
    let content_width = area.width.saturating_sub(8).min(56);
    let height = 8u16.min(area.height.saturating_sub(4));
    let modal = centered_rect(content_width, height, area);
    frame.render_widget(Clear, modal);

    let title_width = (content_width as usize).saturating_sub(9);
    let mut lines: Vec<Line<'static>> = Vec::new();
    lines.push(Line::from(Span::styled(
        "Delete task?",
        Style::default()
            .fg(COLOR_ERROR)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("ID: ", Style::default().fg(COLOR_MUTED_DARK)),
        Span::styled(state.task_id.clone(), id_style()),
    ]));
    if !state.title.trim().is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Title: ", Style::default().fg(COLOR_MUTED_DARK)),
            Span::styled(
                truncate_text(&state.title, title_width),
                Style::default().fg(COLOR_TEXT),
            ),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "y confirm  n/esc cancel",
        Style::default().fg(COLOR_MUTED_DARK),
    )));

    let widget = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Delete Task"))
        .wrap(Wrap { trim: true });
    frame.render_widget(widget, modal);
}

fn render_list_row(task: &Task, selected: bool, width: usize) -> Line<'static> {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let check_style = if task.completed {
        Style::default().fg(COLOR_SUCCESS)
    } else {
        Style::default().fg(COLOR_MUTED_DARK)
    };
    let id_text = pad_text(&task.id, ID_WIDTH);
    let priority_text = pad_text(&task.priority.to_string(), PRIORITY_WIDTH);
    let due_text = match task.due_date {
        Some(due) => due.format("%Y-%m-%d").to_string(),
        None => " ".repeat(DUE_WIDTH),
    };

    let used = CHECK_WIDTH + ID_WIDTH + PRIORITY_WIDTH + DUE_WIDTH + 5;
    let title_width = width.saturating_sub(used);
    let title = truncate_text(&task.title, title_width);
    let title_style = if task.completed {
        Style::default()
            .fg(COLOR_MUTED_DARK)
            .add_modifier(Modifier::CROSSED_OUT)
    } else {
        Style::default().fg(COLOR_TEXT)
    };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled(check.to_string(), check_style),
        Span::raw(" "),
        Span::styled(id_text, id_style()),
        Span::raw(" "),
        Span::styled(
            priority_text,
            Style::default()
                .fg(priority_color(task.priority))
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
        Span::styled(due_text, Style::default().fg(COLOR_WARNING)),
        Span::raw(" "),
        Span::styled(title, title_style),
    ];
    if selected {
        for span in &mut spans {
            span.style = span.style.add_modifier(Modifier::REVERSED);
        }
    }
    Line::from(spans)
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn list_window(total: usize, selected: usize, height: usize) -> (usize, usize) {
    if total == 0 || height == 0 {
        return (0, 0);
    }
    if total <= height {
        return (0, total);
    }
    let mut start = selected.saturating_sub(height / 2);
    if start + height > total {
        start = total - height;
    }
    (start, start + height)
}

fn id_style() -> Style {
    Style::default().fg(COLOR_MUTED)
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Rgb(255, 107, 107),
        Priority::Medium => COLOR_WARNING,
        Priority::Low => COLOR_MUTED_DARK,
    }
}

fn pad_text(value: &str, width: usize) -> String {
    let mut text = value.to_string();
    if text.chars().count() > width {
        text = truncate_text(&text, width);
    }
    format!("{text:width$}")
}

fn truncate_text(value: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= max {
        return value.to_string();
    }
    if max <= 3 {
        return chars[..max].iter().collect();
    }
    let mut out: String = chars[..(max - 3)].iter().collect();
    out.push_str("...");
    out
}
