//! Draws the current `View` with ratatui.
//!
//! The text matches `View`'s `Display` output line for line; this module
//! only adds color.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::state::Session;
use crate::core::view::{
    self, EMPTY_TEXT, HEADER_TEXT, LOADING_TEXT, QUIT_HINT, Row, View,
};
use crate::tui::component::Component;

pub fn draw_ui(frame: &mut Frame, session: &Session) {
    let area = frame.area();
    SelectorView { session }.render(frame, area);
}

/// Props-only component: everything comes from the session.
pub struct SelectorView<'a> {
    pub session: &'a Session,
}

impl Component for SelectorView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines = match View::of(self.session) {
            View::Loading => status_lines(LOADING_TEXT, Style::default().fg(Color::Yellow)),
            View::Empty => status_lines(EMPTY_TEXT, Style::default().fg(Color::DarkGray)),
            View::Browsing(selection) => {
                let mut lines = vec![
                    Line::from(Span::styled(
                        HEADER_TEXT,
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
                    Line::default(),
                ];
                lines.extend(view::rows(selection).map(|row| row_line(&row)));
                lines.push(Line::default());
                lines.push(hint_line());
                lines
            }
            View::Confirming(count) => vec![Line::from(Span::styled(
                view::confirming_text(count),
                Style::default().fg(Color::Yellow),
            ))],
            View::Closed => Vec::new(),
        };
        frame.render_widget(Paragraph::new(lines), area);
    }
}

fn status_lines(text: &'static str, style: Style) -> Vec<Line<'static>> {
    vec![
        Line::from(Span::styled(text, style)),
        Line::default(),
        Line::default(),
        hint_line(),
    ]
}

fn hint_line() -> Line<'static> {
    Line::from(Span::styled(QUIT_HINT, Style::default().fg(Color::DarkGray)))
}

fn row_line(row: &Row<'_>) -> Line<'static> {
    let style = match (row.under_cursor, row.checked) {
        (true, _) => Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
        (false, true) => Style::default().fg(Color::Green),
        (false, false) => Style::default(),
    };
    Line::from(Span::styled(row.to_string(), style))
}
