//! # Session State
//!
//! Everything one run of the selector knows, in one value.
//!
//! ```text
//! Session
//! ├── selection: Selection   // candidates, cursor, checked rows
//! └── phase: Phase           // where the state machine is
//!
//! Loading ──loaded──▶ Browsing ──confirm──▶ Confirming ──finished──▶ Terminated
//!    │                   │
//!    ├──failed───────────┼──────────────────────────────────────────▶ Terminated
//!    └──quit─────────────┴──quit────────────────────────────────────▶ Terminated
//! ```
//!
//! State changes only happen through `update(session, action)` in action.rs,
//! which takes the session by value and hands back its replacement.

use std::collections::HashSet;

use crate::core::error::SessionError;
use crate::core::selection::Selection;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    /// Waiting for the candidate source.
    Loading,
    Browsing,
    /// Waiting for the action invoker. Input is ignored until it answers.
    Confirming { ids: HashSet<String> },
    Terminated(Termination),
}

/// How a session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Termination {
    Quit,
    Interrupted { ids: HashSet<String> },
    Failed(SessionError),
}

/// The successful results of a session, as seen by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Quit,
    Interrupted { ids: HashSet<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub selection: Selection,
    pub phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self {
            selection: Selection::default(),
            phase: Phase::Loading,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self.phase, Phase::Terminated(_))
    }

    /// Collapse a finished session into the loop's return value.
    ///
    /// A session that has not terminated yet reads as a quit; the loop only
    /// calls this after the state machine reached `Terminated`.
    pub fn into_outcome(self) -> Result<Outcome, SessionError> {
        match self.phase {
            Phase::Terminated(Termination::Interrupted { ids }) => Ok(Outcome::Interrupted { ids }),
            Phase::Terminated(Termination::Failed(e)) => Err(e),
            _ => Ok(Outcome::Quit),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}
