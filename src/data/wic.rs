// WIC coverage rates by state.
// Reads the USDA "Coverage Rate by State" sheet from the published workbook,
// or from a CSV export of it.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};
use tracing::debug;

use crate::error::Result;

/// Worksheet holding the per-state coverage rates.
pub const COVERAGE_SHEET: &str = "Coverage Rate by State";

const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// A cell of the WIC sheet: numeric where it parses, otherwise the raw text.
#[derive(Debug, Clone, PartialEq)]
pub enum WicCell {
    Number(f64),
    Text(String),
}

impl WicCell {
    /// Parse "1,234", "0.85", "85%" or fall back to text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let cleaned: String = trimmed.chars().filter(|c| *c != ',').collect();

        if let Some(percent) = cleaned.strip_suffix('%') {
            if let Ok(value) = percent.trim().parse::<f64>() {
                return WicCell::Number(value / 100.0);
            }
        }
        match cleaned.parse::<f64>() {
            Ok(value) if value.is_finite() => WicCell::Number(value),
            _ => WicCell::Text(trimmed.to_string()),
        }
    }

    fn from_data(cell: &Data) -> Self {
        match cell {
            Data::Float(value) => WicCell::Number(*value),
            Data::Int(value) => WicCell::Number(*value as f64),
            Data::String(text) => WicCell::parse(text),
            Data::Empty => WicCell::Text(String::new()),
            other => WicCell::Text(other.to_string()),
        }
    }
}

fn data_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(text) => text.trim().to_string(),
        other => other.to_string(),
    }
}

fn is_workbook(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            WORKBOOK_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// WIC coverage rows, keyed by state name in the first column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WicTable {
    pub index_header: String,
    pub columns: Vec<String>,
    pub rows: Vec<(String, Vec<WicCell>)>,
}

impl WicTable {
    /// Load the sheet from a workbook, or from CSV for any other extension.
    pub fn load(path: &Path) -> Result<Self> {
        let table = if is_workbook(path) {
            Self::from_workbook(path)?
        } else {
            Self::from_reader(csv::ReaderBuilder::new().flexible(true).from_path(path)?)?
        };
        debug!(path = %path.display(), rows = table.rows.len(), "loaded WIC coverage");
        Ok(table)
    }

    fn from_workbook(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)?;
        let range = workbook.worksheet_range(COVERAGE_SHEET)?;
        let mut rows = range.rows();
        let Some(header) = rows.next() else {
            return Ok(Self::default());
        };

        let index_header = header.first().map(data_text).unwrap_or_default();
        let columns = header.iter().skip(1).map(data_text).collect();
        let records = rows.filter_map(|row| {
            let (state, cells) = row.split_first()?;
            Some((data_text(state), cells.iter().map(WicCell::from_data).collect()))
        });
        Ok(Self::build(index_header, columns, records))
    }

    fn from_reader<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<Self> {
        let headers = reader.headers()?.clone();
        let mut header_iter = headers.iter();
        let index_header = header_iter.next().unwrap_or_default().trim().to_string();
        let columns = header_iter.map(|h| h.trim().to_string()).collect();

        let mut records = Vec::new();
        for record in reader.records() {
            let record = record?;
            let mut fields = record.iter();
            let Some(state) = fields.next() else {
                continue;
            };
            records.push((state.trim().to_string(), fields.map(WicCell::parse).collect()));
        }
        Ok(Self::build(index_header, columns, records))
    }

    /// Drop rows without a state name and pad short rows to the header width.
    fn build(
        index_header: String,
        columns: Vec<String>,
        records: impl IntoIterator<Item = (String, Vec<WicCell>)>,
    ) -> Self {
        let rows = records
            .into_iter()
            .filter(|(state, _)| !state.is_empty())
            .map(|(state, mut cells)| {
                cells.resize(columns.len(), WicCell::Text(String::new()));
                (state, cells)
            })
            .collect();
        Self {
            index_header,
            columns,
            rows,
        }
    }

    /// Rows whose state name matches exactly.
    pub fn for_state(&self, state_name: &str) -> WicTable {
        WicTable {
            index_header: self.index_header.clone(),
            columns: self.columns.clone(),
            rows: self
                .rows
                .iter()
                .filter(|(name, _)| name == state_name)
                .cloned()
                .collect(),
        }
    }
}
