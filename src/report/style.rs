// Table styling.
// Formats frames into display text with per-cell highlighting.

use crate::data::{Frame, WicCell, WicTable};
use crate::error::Result;

/// Text shown for missing values.
pub const MISSING: &str = "-";

/// A formatted cell.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledCell {
    pub text: String,
    pub highlight: bool,
}

impl StyledCell {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            highlight: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledRow {
    pub label: String,
    pub cells: Vec<StyledCell>,
}

/// A table ready for display: the label column stays fixed, the rest scroll.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StyledTable {
    pub index_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<StyledRow>,
}

impl StyledTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Widest text in each column, header included.
    pub fn column_widths(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, header)| {
                self.rows
                    .iter()
                    .filter_map(|row| row.cells.get(i))
                    .map(|cell| cell.text.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    pub fn label_width(&self) -> usize {
        self.rows
            .iter()
            .map(|row| row.label.chars().count())
            .chain(std::iter::once(self.index_header.chars().count()))
            .max()
            .unwrap_or(0)
    }
}

/// Format shares as percentages and totals with thousands separators.
/// Speaker shares above `threshold` are highlighted.
pub fn format_percentage_frame(
    frame: &Frame,
    index_header: &str,
    threshold: f64,
) -> Result<StyledTable> {
    let columns = frame.columns();
    let is_total: Vec<bool> = columns.iter().map(|c| c.contains("total")).collect();
    let is_speaker: Vec<bool> = columns
        .iter()
        .zip(&is_total)
        .map(|(c, total)| !total && c.contains("speaker"))
        .collect();

    let rows = frame
        .keys()?
        .into_iter()
        .zip(frame.rows()?)
        .map(|(key, values)| StyledRow {
            label: key.name,
            cells: values
                .iter()
                .enumerate()
                .map(|(i, value)| match value {
                    None => StyledCell::plain(MISSING),
                    Some(v) if is_total[i] => StyledCell::plain(format_thousands(*v)),
                    Some(v) => StyledCell {
                        text: format_percent(*v, 2),
                        highlight: is_speaker[i] && *v > threshold,
                    },
                })
                .collect(),
        })
        .collect();

    Ok(StyledTable {
        index_header: index_header.to_string(),
        columns,
        rows,
    })
}

/// Format counts ("Number ..." columns) with separators, everything else as whole percentages.
pub fn format_wic_table(table: &WicTable) -> StyledTable {
    let is_count: Vec<bool> = table.columns.iter().map(|c| c.contains("Number")).collect();

    let rows = table
        .rows
        .iter()
        .map(|(state, cells)| StyledRow {
            label: state.clone(),
            cells: cells
                .iter()
                .enumerate()
                .map(|(i, cell)| match cell {
                    WicCell::Number(v) if is_count[i] => StyledCell::plain(format_thousands(*v)),
                    WicCell::Number(v) => StyledCell::plain(format_percent(*v, 0)),
                    WicCell::Text(t) if t.is_empty() => StyledCell::plain(MISSING),
                    WicCell::Text(t) => StyledCell::plain(t.clone()),
                })
                .collect(),
        })
        .collect();

    StyledTable {
        index_header: table.index_header.clone(),
        columns: table.columns.clone(),
        rows,
    }
}

/// 0.1234 -> "12.34%" with two decimals.
pub fn format_percent(value: f64, decimals: usize) -> String {
    format!("{:.*}%", decimals, value * 100.0)
}

/// 1234567.4 -> "1,234,567".
pub fn format_thousands(value: f64) -> String {
    let rounded = value.round();
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    if rounded < 0.0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RowKey;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0.0), "0");
        assert_eq!(format_thousands(999.0), "999");
        assert_eq!(format_thousands(1000.0), "1,000");
        assert_eq!(format_thousands(4876250.0), "4,876,250");
        assert_eq!(format_thousands(1234.6), "1,235");
        assert_eq!(format_thousands(-12345.0), "-12,345");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(0.1234, 2), "12.34%");
        assert_eq!(format_percent(0.005, 2), "0.50%");
        assert_eq!(format_percent(0.71, 0), "71%");
    }

    #[test]
    fn test_format_percentage_frame() {
        let frame = Frame::from_rows(
            vec![
                "total population".to_string(),
                "received public assistance".to_string(),
                "spanish speakers".to_string(),
            ],
            vec![
                (
                    RowKey::new(Some("06"), "California"),
                    vec![Some(39283497.0), Some(0.2), Some(0.285)],
                ),
                (
                    RowKey::new(Some("06"), "Alpine County, California"),
                    vec![Some(1039.0), Some(0.002), Some(0.005)],
                ),
                (
                    RowKey::new(Some("06"), "Sierra County, California"),
                    vec![None, None, None],
                ),
            ],
        )
        .unwrap();

        let styled = format_percentage_frame(&frame, "place name", 0.01).unwrap();
        assert_eq!(styled.index_header, "place name");
        assert_eq!(styled.rows[0].label, "California");

        let ca = &styled.rows[0].cells;
        assert_eq!(ca[0], StyledCell::plain("39,283,497"));
        // Not a speaker column: never highlighted.
        assert_eq!(ca[1], StyledCell::plain("20.00%"));
        assert_eq!(ca[2].text, "28.50%");
        assert!(ca[2].highlight);

        let alpine = &styled.rows[1].cells;
        assert_eq!(alpine[2].text, "0.50%");
        assert!(!alpine[2].highlight);

        assert!(styled.rows[2].cells.iter().all(|c| c.text == MISSING));
    }

    #[test]
    fn test_format_wic_table() {
        let table = WicTable {
            index_header: "State".to_string(),
            columns: vec!["Number Eligible".to_string(), "Coverage Rate".to_string()],
            rows: vec![(
                "Alabama".to_string(),
                vec![WicCell::Number(160410.0), WicCell::Number(0.708)],
            )],
        };
        let styled = format_wic_table(&table);
        assert_eq!(styled.rows[0].cells[0].text, "160,410");
        assert_eq!(styled.rows[0].cells[1].text, "71%");
        assert!(styled.rows[0].cells.iter().all(|c| !c.highlight));
    }

    #[test]
    fn test_column_widths() {
        let table = StyledTable {
            index_header: "place".to_string(),
            columns: vec!["a".to_string(), "long header".to_string()],
            rows: vec![StyledRow {
                label: "Somewhere long".to_string(),
                cells: vec![StyledCell::plain("12.34%"), StyledCell::plain("1")],
            }],
        };
        assert_eq!(table.column_widths(), vec![6, 11]);
        assert_eq!(table.label_width(), 14);
    }
}
