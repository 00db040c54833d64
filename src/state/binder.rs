// Report binder.
// Ties a selector's current key to the report rendered for it.

use crate::report::{Report, Section, SectionBody};

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadingState<T> {
    #[default]
    Idle,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadingState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadingState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            LoadingState::Loaded(data) => Some(data),
            _ => None,
        }
    }
}

/// A render the binder wants started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRequest {
    pub key: String,
    pub generation: u64,
}

/// Tracks the selected key, the latest render, and the viewport into it.
///
/// Every render is stamped with a generation; only the result for the most
/// recent generation is kept, so a slow render for an old selection can never
/// overwrite the current one.
#[derive(Debug, Default)]
pub struct ReportBinder {
    current: Option<String>,
    generation: u64,
    pub report: LoadingState<Report>,
    /// Index of the section in view.
    pub section: usize,
    /// First visible row of the section table.
    pub row_offset: usize,
    /// First visible scrolling column (the label column never scrolls).
    pub column_offset: usize,
}

impl ReportBinder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current_key(&self) -> Option<&str> {
        self.current.as_deref()
    }

    /// Bind a new key. Returns the render to start, or `None` when the key is
    /// already bound.
    pub fn select(&mut self, key: &str) -> Option<RenderRequest> {
        if self.current.as_deref() == Some(key) {
            return None;
        }
        self.current = Some(key.to_string());
        Some(self.start())
    }

    /// Re-render the bound key.
    pub fn refresh(&mut self) -> Option<RenderRequest> {
        self.current.as_ref()?;
        Some(self.start())
    }

    fn start(&mut self) -> RenderRequest {
        self.generation += 1;
        self.report = LoadingState::Loading;
        self.reset_viewport();
        RenderRequest {
            key: self.current.clone().unwrap_or_default(),
            generation: self.generation,
        }
    }

    /// Accept a finished render. Returns false if it was superseded.
    pub fn complete(&mut self, generation: u64, result: Result<Report, String>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.report = match result {
            Ok(report) => LoadingState::Loaded(report),
            Err(e) => LoadingState::Error(e),
        };
        self.reset_viewport();
        true
    }

    pub fn current_section(&self) -> Option<&Section> {
        self.report.data()?.sections.get(self.section)
    }

    pub fn next_section(&mut self) {
        let count = self.section_count();
        if count > 0 {
            self.section = (self.section + 1) % count;
            self.row_offset = 0;
            self.column_offset = 0;
        }
    }

    pub fn prev_section(&mut self) {
        let count = self.section_count();
        if count > 0 {
            self.section = (self.section + count - 1) % count;
            self.row_offset = 0;
            self.column_offset = 0;
        }
    }

    pub fn scroll_rows(&mut self, delta: isize) {
        let (rows, _) = self.table_shape();
        self.row_offset = offset_by(self.row_offset, delta, rows);
    }

    pub fn scroll_rows_to_start(&mut self) {
        self.row_offset = 0;
    }

    pub fn scroll_rows_to_end(&mut self) {
        let (rows, _) = self.table_shape();
        self.row_offset = rows.saturating_sub(1);
    }

    pub fn scroll_columns(&mut self, delta: isize) {
        let (_, columns) = self.table_shape();
        self.column_offset = offset_by(self.column_offset, delta, columns);
    }

    fn section_count(&self) -> usize {
        self.report.data().map_or(0, |r| r.sections.len())
    }

    /// Rows and scrolling columns of the section in view.
    fn table_shape(&self) -> (usize, usize) {
        match self.current_section().map(|s| &s.body) {
            Some(SectionBody::Table(table)) => (table.rows.len(), table.columns.len()),
            _ => (0, 0),
        }
    }

    fn reset_viewport(&mut self) {
        self.section = 0;
        self.row_offset = 0;
        self.column_offset = 0;
    }
}

/// Move `offset` by `delta`, staying within `0..len`.
fn offset_by(offset: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (offset as isize + delta).clamp(0, len as isize - 1) as usize
}
