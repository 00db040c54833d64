// Selector state.
// A filterable list of geographies with keyboard navigation.

use ratatui::widgets::ListState;

use crate::reference::{GeoOption, filter_options};

/// State for a filterable selection list.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    options: Vec<GeoOption>,
    /// Indices into `options` that pass the filter.
    visible: Vec<usize>,
    pub filter: String,
    pub list_state: ListState,
}

impl Selector {
    pub fn new(options: Vec<GeoOption>) -> Self {
        let mut selector = Self {
            visible: (0..options.len()).collect(),
            options,
            filter: String::new(),
            list_state: ListState::default(),
        };
        selector.reset_selection();
        selector
    }

    /// Options currently shown, in order.
    pub fn visible(&self) -> impl Iterator<Item = &GeoOption> {
        self.visible.iter().map(|&i| &self.options[i])
    }

    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    pub fn total_len(&self) -> usize {
        self.options.len()
    }

    pub fn selected_item(&self) -> Option<&GeoOption> {
        let index = self.list_state.selected()?;
        self.visible.get(index).map(|&i| &self.options[i])
    }

    pub fn select_next(&mut self) {
        self.move_by(1);
    }

    pub fn select_prev(&mut self) {
        self.move_by(-1);
    }

    /// Move the selection, clamping at both ends.
    fn move_by(&mut self, delta: isize) {
        if self.visible.is_empty() {
            return;
        }
        let last = self.visible.len() - 1;
        let i = match self.list_state.selected() {
            Some(i) => (i as isize + delta).clamp(0, last as isize) as usize,
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    /// Apply a filter, keeping the current item selected if it is still visible.
    pub fn set_filter(&mut self, filter: &str) {
        let current = self.selected_item().map(|o| o.key.clone());

        self.filter = filter.to_string();
        self.visible = filter_options(&self.options, filter);

        let position = current.and_then(|key| {
            self.visible
                .iter()
                .position(|&i| self.options[i].key == key)
        });
        match position {
            Some(i) => self.list_state.select(Some(i)),
            None => self.reset_selection(),
        }
    }

    pub fn push_filter_char(&mut self, c: char) {
        let mut filter = self.filter.clone();
        filter.push(c);
        self.set_filter(&filter);
    }

    pub fn pop_filter_char(&mut self) {
        let mut filter = self.filter.clone();
        filter.pop();
        self.set_filter(&filter);
    }

    pub fn clear_filter(&mut self) {
        self.set_filter("");
    }

    /// Reset selection to first item.
    pub fn reset_selection(&mut self) {
        if self.visible.is_empty() {
            self.list_state.select(None);
        } else {
            self.list_state.select(Some(0));
        }
    }
}
