// Plain-text output for the print commands.
// Lays reports out as aligned text tables on stdout.

use std::fmt::Write;

use crate::reference::GeoOption;
use crate::report::{Report, SectionBody, StyledTable};

/// Marker appended to highlighted cells.
const HIGHLIGHT_MARK: char = '*';

/// A full report: every section heading followed by its table.
pub fn format_report(report: &Report) -> String {
    let mut out = String::new();
    let mut any_highlight = false;

    for (i, section) in report.sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        let _ = writeln!(out, "## {}", section.heading);
        let _ = writeln!(out);
        match &section.body {
            SectionBody::Table(table) if table.is_empty() => {
                let _ = writeln!(out, "(no rows)");
            }
            SectionBody::Table(table) => {
                any_highlight |= table.rows.iter().flat_map(|r| &r.cells).any(|c| c.highlight);
                out.push_str(&format_table(table));
            }
            SectionBody::Unavailable(message) => {
                let _ = writeln!(out, "(unavailable: {})", message);
            }
        }
    }

    if any_highlight {
        let _ = writeln!(
            out,
            "\n{} speaker share above the highlight threshold",
            HIGHLIGHT_MARK
        );
    }
    out
}

/// Label column left-aligned, values right-aligned, two spaces between columns.
pub fn format_table(table: &StyledTable) -> String {
    let label_width = table.label_width();
    // Leave room for the highlight marker.
    let widths: Vec<usize> = table.column_widths().iter().map(|w| w + 1).collect();

    let mut out = String::new();
    let _ = write!(out, "{:<width$}", table.index_header, width = label_width);
    for (header, width) in table.columns.iter().zip(&widths) {
        let _ = write!(out, "  {:>width$}", header, width = width);
    }
    out.push('\n');

    for row in &table.rows {
        let _ = write!(out, "{:<width$}", row.label, width = label_width);
        for (cell, width) in row.cells.iter().zip(&widths) {
            let text = if cell.highlight {
                format!("{}{}", cell.text, HIGHLIGHT_MARK)
            } else {
                format!("{} ", cell.text)
            };
            let _ = write!(out, "  {:>width$}", text, width = width);
        }
        out.push('\n');
    }
    out
}

/// One option per line: key, then label when it differs.
pub fn format_options(options: &[GeoOption]) -> String {
    let mut out = String::new();
    for option in options {
        if option.key == option.label {
            let _ = writeln!(out, "{}", option.label);
        } else {
            let _ = writeln!(out, "{}  {}", option.key, option.label);
        }
    }
    out
}
