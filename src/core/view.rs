//! # View
//!
//! What the operator sees for a given session, independent of how it gets
//! drawn. `Display` gives the plain-text frame; the TUI adapter walks the
//! same rows to add styling.

use std::fmt;

use crate::core::selection::{Candidate, Selection};
use crate::core::state::{Phase, Session};

pub const LOADING_TEXT: &str = "Finding Spot instances...";
pub const EMPTY_TEXT: &str = "There are currently no Spot instances running...";
pub const HEADER_TEXT: &str = "Which Spot instances would you like to interrupt?";
pub const QUIT_HINT: &str = "Press q to quit.";

pub enum View<'a> {
    Loading,
    Empty,
    Browsing(&'a Selection),
    Confirming(usize),
    /// The session is over; nothing left to show.
    Closed,
}

impl<'a> View<'a> {
    pub fn of(session: &'a Session) -> Self {
        match &session.phase {
            Phase::Loading => View::Loading,
            Phase::Browsing if session.selection.is_empty() => View::Empty,
            Phase::Browsing => View::Browsing(&session.selection),
            Phase::Confirming { ids } => View::Confirming(ids.len()),
            Phase::Terminated(_) => View::Closed,
        }
    }
}

/// One list row of the browsing view.
pub struct Row<'a> {
    pub candidate: &'a Candidate,
    pub under_cursor: bool,
    pub checked: bool,
}

pub fn rows(selection: &Selection) -> impl Iterator<Item = Row<'_>> {
    selection
        .candidates()
        .iter()
        .enumerate()
        .map(|(i, candidate)| Row {
            candidate,
            under_cursor: i == selection.cursor(),
            checked: selection.is_selected(i),
        })
}

impl fmt::Display for Row<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cursor = if self.under_cursor { ">" } else { " " };
        let checked = if self.checked { "x" } else { " " };
        write!(
            f,
            "{} [{}] {} ({})",
            cursor, checked, self.candidate.id, self.candidate.label
        )
    }
}

pub fn confirming_text(count: usize) -> String {
    format!("Interrupting {count} Spot instance(s)...")
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Loading => write!(f, "{LOADING_TEXT}\n\n\n{QUIT_HINT}\n"),
            View::Empty => write!(f, "{EMPTY_TEXT}\n\n\n{QUIT_HINT}\n"),
            View::Browsing(selection) => {
                write!(f, "{HEADER_TEXT}\n\n")?;
                for row in rows(selection) {
                    writeln!(f, "{row}")?;
                }
                write!(f, "\n{QUIT_HINT}\n")
            }
            View::Confirming(count) => writeln!(f, "{}", confirming_text(*count)),
            View::Closed => Ok(()),
        }
    }
}
