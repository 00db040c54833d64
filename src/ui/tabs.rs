// Header bar listing the geography panes and the console.
// Each label carries its selector size, a busy mark while a report renders,
// and the console's unread error count.

use ratatui::{prelude::*, widgets::*};

use crate::app::{App, Pane, Tab};

/// How a header label is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tone {
    Plain,
    Busy,
    Alert,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Plain => Style::default().fg(Color::Gray),
            Tone::Busy => Style::default().fg(Color::LightBlue),
            Tone::Alert => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}

/// Label for a pane: "States (52)", or "Tribal Areas 3/695" under a filter.
fn pane_label(tab: Tab, pane: &Pane) -> (String, Tone) {
    let selector = &pane.selector;
    let mut text = if selector.filter.is_empty() {
        format!("{} ({})", tab.title(), selector.total_len())
    } else {
        format!(
            "{} {}/{}",
            tab.title(),
            selector.visible_len(),
            selector.total_len()
        )
    };

    if pane.binder.report.is_loading() {
        text.push_str(" ⏳");
        (text, Tone::Busy)
    } else {
        (text, Tone::Plain)
    }
}

/// Label for the console: "Console", or "Console ● 2" with unread errors.
fn console_label(unread_errors: usize) -> (String, Tone) {
    if unread_errors == 0 {
        (Tab::Console.title().to_string(), Tone::Plain)
    } else {
        (
            format!("{} ● {}", Tab::Console.title(), unread_errors),
            Tone::Alert,
        )
    }
}

fn label<S>(app: &App<S>, tab: Tab) -> (String, Tone) {
    match tab {
        Tab::States => pane_label(tab, &app.states),
        Tab::TribalAreas => pane_label(tab, &app.tribes),
        Tab::Console => console_label(app.console.unread_errors),
    }
}

/// Draw the header bar; the active tab is underlined.
pub fn draw_tabs<S>(frame: &mut Frame, app: &App<S>, area: Rect) {
    let titles: Vec<Line> = Tab::ALL
        .iter()
        .map(|&tab| {
            let (text, tone) = label(app, tab);
            Line::from(Span::styled(format!(" {} ", text), tone.style()))
        })
        .collect();
    let selected = Tab::ALL
        .iter()
        .position(|&tab| tab == app.active_tab)
        .unwrap_or_default();

    let header = Tabs::new(titles)
        .select(selected)
        .highlight_style(
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        )
        .divider(Span::styled("·", Style::default().fg(Color::DarkGray)))
        .block(
            Block::default()
                .borders(Borders::BOTTOM)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(Line::from(vec![
                    Span::styled(" censusview ", Style::default().fg(Color::Cyan).bold()),
                    Span::styled("language access ", Style::default().fg(Color::DarkGray)),
                ])),
        );

    frame.render_widget(header, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::GeoOption;
    use crate::state::{ReportBinder, Selector};

    fn pane(names: &[&str]) -> Pane {
        let options = names
            .iter()
            .enumerate()
            .map(|(i, name)| GeoOption::new(*name, format!("{:02}", i + 1)))
            .collect();
        Pane {
            selector: Selector::new(options),
            binder: ReportBinder::new(),
        }
    }

    #[test]
    fn test_pane_label_counts_options() {
        let states = pane(&["Alabama", "Alaska", "Arizona"]);
        assert_eq!(
            pane_label(Tab::States, &states),
            ("States (3)".to_string(), Tone::Plain)
        );
    }

    #[test]
    fn test_pane_label_under_filter() {
        let mut tribes = pane(&["Acoma Pueblo", "Navajo Nation", "Hopi"]);
        tribes.selector.set_filter("o");
        let (text, _) = pane_label(Tab::TribalAreas, &tribes);
        assert_eq!(text, "Tribal Areas 3/3");

        tribes.selector.set_filter("nav");
        let (text, _) = pane_label(Tab::TribalAreas, &tribes);
        assert_eq!(text, "Tribal Areas 1/3");
    }

    #[test]
    fn test_pane_label_while_rendering() {
        let mut states = pane(&["Alabama"]);
        states.binder.select("01");
        assert!(states.binder.report.is_loading());
        assert_eq!(
            pane_label(Tab::States, &states),
            ("States (1) ⏳".to_string(), Tone::Busy)
        );
    }

    #[test]
    fn test_console_label_badge() {
        assert_eq!(console_label(0), ("Console".to_string(), Tone::Plain));
        assert_eq!(console_label(2), ("Console ● 2".to_string(), Tone::Alert));
    }
}
