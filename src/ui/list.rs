// List rendering for the selectors and the console.
// Provides styled list views with loading and empty states.

use chrono::{DateTime, Utc};
use ratatui::{prelude::*, widgets::*};

use crate::state::{ConsoleLevel, ConsoleState, Selector};

/// Format a timestamp as relative time (e.g., "2h ago").
pub fn format_relative_time(dt: &DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(*dt);

    if duration.num_days() > 0 {
        format!("{}d ago", duration.num_days())
    } else if duration.num_hours() > 0 {
        format!("{}h ago", duration.num_hours())
    } else if duration.num_minutes() > 0 {
        format!("{}m ago", duration.num_minutes())
    } else {
        "just now".to_string()
    }
}

/// Render a loading indicator.
pub fn render_loading(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(format!("⏳ {}...", message))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(text, area);
}

/// Render an error message.
pub fn render_error(frame: &mut Frame, area: Rect, error: &str) {
    let text = Paragraph::new(format!("❌ {}", error))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::Red));
    frame.render_widget(text, area);
}

/// Render an empty state message.
pub fn render_empty(frame: &mut Frame, area: Rect, message: &str) {
    let text = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(text, area);
}

fn highlighted(list: List<'_>) -> List<'_> {
    list.highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ")
}

/// Render a geography selector.
pub fn render_selector(frame: &mut Frame, selector: &mut Selector, title: &str, area: Rect) {
    let title = if selector.filter.is_empty() {
        format!(" {} ({}) ", title, selector.total_len())
    } else {
        format!(
            " {} /{} ({}/{}) ",
            title,
            selector.filter,
            selector.visible_len(),
            selector.total_len()
        )
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if selector.visible_len() == 0 {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "No matches");
        return;
    }

    let items: Vec<ListItem> = selector
        .visible()
        .map(|option| ListItem::new(option.label.clone()))
        .collect();

    let list_widget = highlighted(List::new(items).block(block));
    frame.render_stateful_widget(list_widget, area, &mut selector.list_state);
}

/// Render the console activity log.
pub fn render_console(frame: &mut Frame, console: &mut ConsoleState, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" Console ");

    if console.messages.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "No messages");
        return;
    }

    let items: Vec<ListItem> = console
        .messages
        .iter()
        .map(|msg| {
            let (icon, color) = match msg.level {
                ConsoleLevel::Error => ("❌", Color::Red),
                ConsoleLevel::Warn => ("⚠️", Color::Yellow),
                ConsoleLevel::Info => ("ℹ️", Color::Cyan),
            };

            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", icon)),
                Span::styled(
                    format_relative_time(&msg.timestamp),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(" "),
                Span::styled(msg.message.clone(), Style::default().fg(color)),
            ]))
        })
        .collect();

    let list_widget = highlighted(List::new(items).block(block));
    frame.render_stateful_widget(list_widget, area, &mut console.list_state);
}
