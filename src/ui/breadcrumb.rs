// Breadcrumb rendering.
// Shows tab, selected geography, and section position, with the data vintage on the right.

use ratatui::{prelude::*, widgets::*};

/// Render the breadcrumb trail with a right-aligned note.
pub fn draw_breadcrumb(frame: &mut Frame, crumbs: &[String], note: &str, area: Rect) {
    let mut spans = Vec::new();

    for (i, crumb) in crumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }

        let style = if i == crumbs.len() - 1 {
            // Current level is highlighted
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        spans.push(Span::styled(crumb.clone(), style));
    }

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    let note = Paragraph::new(Line::from(Span::styled(
        note.to_string(),
        Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(
        note,
        Rect {
            height: 1.min(area.height),
            ..area
        },
    );
}
