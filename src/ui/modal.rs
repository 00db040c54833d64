// Modal UI components.
// Filter input drawn on top of the selector.

use ratatui::{prelude::*, widgets::*};

use crate::state::Selector;

/// Draw the selector filter modal centered over `area`.
pub fn draw_filter_modal(frame: &mut Frame, selector: &Selector, title: &str, area: Rect) {
    let modal_width = 50.min(area.width);
    let modal_height = 6.min(area.height);
    let modal_x = area.x + (area.width.saturating_sub(modal_width)) / 2;
    let modal_y = area.y + (area.height.saturating_sub(modal_height)) / 2;

    let modal_area = Rect::new(modal_x, modal_y, modal_width, modal_height);

    // Clear the area behind the modal
    frame.render_widget(Clear, modal_area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Match count
            Constraint::Min(1),    // Instructions
        ])
        .split(modal_area);

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" Filter {} ", title));

    let input_line = Line::from(vec![
        Span::styled("/", Style::default().fg(Color::Yellow)),
        Span::raw(selector.filter.as_str()),
        Span::styled("█", Style::default().fg(Color::Yellow)),
    ]);
    frame.render_widget(Paragraph::new(input_line).block(input_block), chunks[0]);

    let matches = selector.visible_len();
    let count_color = if matches == 0 {
        Color::Red
    } else {
        Color::DarkGray
    };
    let count = Paragraph::new(format!("{} of {} match", matches, selector.total_len()))
        .alignment(Alignment::Center)
        .style(Style::default().fg(count_color));
    frame.render_widget(count, chunks[1]);

    let instructions = Line::from(vec![
        Span::styled(" Enter", Style::default().fg(Color::Yellow)),
        Span::styled(" = Keep  ", Style::default().fg(Color::DarkGray)),
        Span::styled("↑↓", Style::default().fg(Color::Yellow)),
        Span::styled(" = Navigate  ", Style::default().fg(Color::DarkGray)),
        Span::styled("Esc", Style::default().fg(Color::Yellow)),
        Span::styled(" = Clear ", Style::default().fg(Color::DarkGray)),
    ]);
    frame.render_widget(
        Paragraph::new(instructions).alignment(Alignment::Center),
        chunks[2],
    );
}
