// UI module for rendering the TUI.
// Contains widgets for tabs, breadcrumbs, selectors, report tables, and the console.

mod breadcrumb;
mod list;
mod modal;
mod table;
mod tabs;

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, InputMode, Pane, Tab};
use crate::data::CensusSource;
use crate::report::SectionBody;
use crate::state::LoadingState;

/// Width of the selector column.
const SELECTOR_WIDTH: u16 = 38;

/// Main draw function that renders the entire UI.
#[allow(clippy::collapsible_if)]
pub fn draw<S: CensusSource>(frame: &mut Frame, app: &mut App<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Tab bar
            Constraint::Length(2), // Breadcrumb
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    tabs::draw_tabs(frame, app, chunks[0]);

    let vintage = app.reports().dataset().vintage();
    let note = format!("ACS {} ", vintage);
    breadcrumb::draw_breadcrumb(frame, &breadcrumbs(app), &note, chunks[1]);

    let tab = app.active_tab;
    match tab {
        Tab::States => draw_pane(frame, &mut app.states, tab, chunks[2]),
        Tab::TribalAreas => draw_pane(frame, &mut app.tribes, tab, chunks[2]),
        Tab::Console => list::render_console(frame, &mut app.console, chunks[2]),
    }

    draw_status_bar(frame, app, chunks[3]);

    if app.input_mode == InputMode::Filter {
        if let Some(pane) = app.pane() {
            modal::draw_filter_modal(frame, &pane.selector, tab.title(), chunks[2]);
        }
    }

    // Help overlay (rendered last, on top of everything)
    if app.show_help {
        draw_help_overlay(frame);
    }
}

/// Tab, selected geography, and section position.
#[allow(clippy::collapsible_if)]
fn breadcrumbs<S: CensusSource>(app: &App<S>) -> Vec<String> {
    let mut crumbs = vec![app.active_tab.title().to_string()];
    let Some(pane) = app.pane() else {
        return crumbs;
    };

    // With a filter that matches nothing, fall back to the bound key.
    match pane.selector.selected_item() {
        Some(option) => crumbs.push(option.label.clone()),
        None => crumbs.extend(pane.binder.current_key().map(str::to_string)),
    }
    if let Some(report) = pane.binder.report.data() {
        if report.sections.len() > 1 {
            crumbs.push(format!(
                "Section {}/{}",
                pane.binder.section + 1,
                report.sections.len()
            ));
        }
    }
    crumbs
}

/// Draw a selector on the left and its bound report on the right.
fn draw_pane(frame: &mut Frame, pane: &mut Pane, tab: Tab, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(SELECTOR_WIDTH), Constraint::Min(1)])
        .split(area);

    list::render_selector(frame, &mut pane.selector, tab.title(), chunks[0]);
    draw_report(frame, pane, chunks[1]);
}

fn draw_report(frame: &mut Frame, pane: &Pane, area: Rect) {
    let binder = &pane.binder;
    match &binder.report {
        LoadingState::Idle => list::render_empty(frame, area, "Select a geography"),
        LoadingState::Loading => {
            let name = pane
                .selector
                .selected_item()
                .map_or("report", |o| o.label.as_str());
            list::render_loading(frame, area, &format!("Rendering {}", name));
        }
        LoadingState::Error(e) => list::render_error(frame, area, e),
        LoadingState::Loaded(report) => {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(1), Constraint::Min(1)])
                .split(area);

            let titles: Vec<Line> = report
                .sections
                .iter()
                .map(|s| Line::from(s.anchor))
                .collect();
            let sections = Tabs::new(titles)
                .select(binder.section)
                .style(Style::default().fg(Color::DarkGray))
                .highlight_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                );
            frame.render_widget(sections, chunks[0]);

            let Some(section) = binder.current_section() else {
                list::render_empty(frame, chunks[1], "Empty report");
                return;
            };
            match &section.body {
                SectionBody::Table(styled) => table::draw_styled_table(
                    frame,
                    styled,
                    &section.heading,
                    binder.row_offset,
                    binder.column_offset,
                    chunks[1],
                ),
                SectionBody::Unavailable(message) => {
                    let block = Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" {} ", section.heading));
                    let text = Paragraph::new(format!("⚠️ {}", message))
                        .alignment(Alignment::Center)
                        .wrap(Wrap { trim: true })
                        .style(Style::default().fg(Color::Yellow))
                        .block(block);
                    frame.render_widget(text, chunks[1]);
                }
            }
        }
    }
}

/// Draw the status bar with keybinding hints and request count.
fn draw_status_bar<S: CensusSource>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let mut hints = if app.active_tab == Tab::Console {
        vec![
            Span::raw(" ↑↓ "),
            Span::styled("Scroll", Style::default().fg(Color::DarkGray)),
            Span::raw("  Tab "),
            Span::styled("Switch", Style::default().fg(Color::DarkGray)),
            Span::raw("  ? "),
            Span::styled("Help", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ]
    } else {
        vec![
            Span::raw(" ↑↓ "),
            Span::styled("Select", Style::default().fg(Color::DarkGray)),
            Span::raw("  / "),
            Span::styled("Filter", Style::default().fg(Color::DarkGray)),
            Span::raw("  n/N "),
            Span::styled("Section", Style::default().fg(Color::DarkGray)),
            Span::raw("  ←→ "),
            Span::styled("Columns", Style::default().fg(Color::DarkGray)),
            Span::raw("  PgUp/Dn "),
            Span::styled("Rows", Style::default().fg(Color::DarkGray)),
            Span::raw("  Tab "),
            Span::styled("Switch", Style::default().fg(Color::DarkGray)),
            Span::raw("  r "),
            Span::styled("Refresh", Style::default().fg(Color::DarkGray)),
            Span::raw("  ? "),
            Span::styled("Help", Style::default().fg(Color::DarkGray)),
            Span::raw("  q "),
            Span::styled("Quit", Style::default().fg(Color::DarkGray)),
        ]
    };

    if app.pane().is_some_and(|pane| pane.binder.report.is_loading()) {
        hints.push(Span::styled("  ⏳ rendering", Style::default().fg(Color::Yellow)));
    }

    hints.push(Span::styled(
        format!(
            "  API requests: {}",
            app.reports().dataset().source().request_count()
        ),
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(hints)), area);
}

fn help_line(keys: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {:<14}", keys), Style::default().fg(Color::Cyan)),
        Span::raw(action),
    ])
}

/// Draw the help overlay.
fn draw_help_overlay(frame: &mut Frame) {
    let area = frame.area();

    // Create a centered popup
    let popup_width = 56.min(area.width);
    let popup_height = 19.min(area.height);
    let popup_x = (area.width.saturating_sub(popup_width)) / 2;
    let popup_y = (area.height.saturating_sub(popup_height)) / 2;

    let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height);

    // Clear the area behind the popup
    frame.render_widget(Clear, popup_area);

    let help_text = vec![
        Line::from(vec![Span::styled(
            "Keyboard Shortcuts",
            Style::default().add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        help_line("↑/↓ or j/k", "Change selection (re-renders)"),
        help_line("/", "Filter the selector"),
        help_line("Esc", "Clear filter / close help"),
        help_line("Tab/BackTab", "Switch tabs"),
        help_line("n/N", "Next/previous report section"),
        help_line("←/→ or h/l", "Scroll table columns"),
        help_line("PgUp/PgDn", "Scroll table rows"),
        help_line("Home/End", "Jump to first/last row"),
        help_line("r", "Re-render current selection"),
        help_line("?", "Show/hide this help"),
        help_line("q", "Quit"),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                "Highlighted",
                Style::default().bg(Color::Rgb(230, 255, 230)).fg(Color::Black),
            ),
            Span::styled(
                " cells: speaker share above threshold",
                Style::default().fg(Color::DarkGray),
            ),
        ]),
        Line::from(vec![
            Span::styled("Press ", Style::default().fg(Color::DarkGray)),
            Span::styled("Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" or ", Style::default().fg(Color::DarkGray)),
            Span::styled("?", Style::default().fg(Color::Yellow)),
            Span::styled(" to close", Style::default().fg(Color::DarkGray)),
        ]),
    ];

    let help_paragraph = Paragraph::new(help_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help ")
                .title_style(
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
        )
        .alignment(Alignment::Left);

    frame.render_widget(help_paragraph, popup_area);
}
