// Report table rendering.
// Fixed label column, horizontally scrolled value columns, highlighted cells.

use std::ops::Range;

use ratatui::{prelude::*, widgets::*};

use crate::report::StyledTable;

use super::list::render_empty;

const MAX_LABEL_WIDTH: usize = 48;
const COLUMN_SPACING: u16 = 1;

fn highlight_style() -> Style {
    Style::default().bg(Color::Rgb(230, 255, 230)).fg(Color::Black)
}

/// Columns starting at `offset` that fit in `available` cells. At least one
/// column is shown so a very wide column can still be scrolled to.
pub fn visible_columns(widths: &[usize], offset: usize, available: usize) -> Range<usize> {
    let start = offset.min(widths.len());
    let mut used = 0;
    let mut end = start;
    for width in &widths[start..] {
        let needed = width + COLUMN_SPACING as usize;
        if end > start && used + needed > available {
            break;
        }
        used += needed;
        end += 1;
    }
    start..end
}

/// Draw a styled table scrolled to (`row_offset`, `column_offset`).
pub fn draw_styled_table(
    frame: &mut Frame,
    table: &StyledTable,
    heading: &str,
    row_offset: usize,
    column_offset: usize,
    area: Rect,
) {
    let widths = table.column_widths();
    let label_width = table.label_width().min(MAX_LABEL_WIDTH);
    let inner_width = area.width.saturating_sub(2) as usize;
    let columns = visible_columns(
        &widths,
        column_offset,
        inner_width.saturating_sub(label_width + COLUMN_SPACING as usize),
    );

    let title = if table.is_empty() {
        format!(" {} ", heading)
    } else {
        format!(
            " {} [rows {}/{} · cols {}-{}/{}] ",
            heading,
            row_offset + 1,
            table.rows.len(),
            columns.start + 1,
            columns.end,
            table.columns.len()
        )
    };
    let block = Block::default().borders(Borders::ALL).title(title);

    if table.is_empty() {
        let inner = block.inner(area);
        frame.render_widget(block, area);
        render_empty(frame, inner, "No rows for this selection");
        return;
    }

    let header_style = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD);
    let header = Row::new(
        std::iter::once(Cell::from(table.index_header.clone()))
            .chain(
                table.columns[columns.clone()]
                    .iter()
                    .map(|c| Cell::from(Line::from(c.clone()).alignment(Alignment::Right))),
            )
            .map(|cell| cell.style(header_style)),
    );

    let rows: Vec<Row> = table
        .rows
        .iter()
        .skip(row_offset)
        .map(|row| {
            let label: String = row.label.chars().take(label_width).collect();
            let cells = row
                .cells
                .iter()
                .skip(columns.start)
                .take(columns.len())
                .map(|cell| {
                    let line = Line::from(cell.text.clone()).alignment(Alignment::Right);
                    if cell.highlight {
                        Cell::from(line).style(highlight_style())
                    } else {
                        Cell::from(line)
                    }
                });
            let label = Cell::from(label).style(Style::default().fg(Color::Cyan));
            Row::new(std::iter::once(label).chain(cells))
        })
        .collect();

    let constraints: Vec<Constraint> = std::iter::once(label_width)
        .chain(widths[columns].iter().copied())
        .map(|w| Constraint::Length(w as u16))
        .collect();

    let widget = Table::new(rows, constraints)
        .header(header)
        .column_spacing(COLUMN_SPACING)
        .block(block);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visible_columns_fit_width() {
        let widths = [6, 6, 6, 6];
        // Each column takes its width plus one space.
        assert_eq!(visible_columns(&widths, 0, 14), 0..2);
        assert_eq!(visible_columns(&widths, 1, 100), 1..4);
        assert_eq!(visible_columns(&widths, 3, 14), 3..4);
    }

    #[test]
    fn test_visible_columns_always_shows_one() {
        assert_eq!(visible_columns(&[80, 5], 0, 10), 0..1);
        assert_eq!(visible_columns(&[5], 4, 10), 1..1);
        assert_eq!(visible_columns(&[], 0, 10), 0..0);
    }
}
