//! # Actions
//!
//! Everything that can happen during a session becomes an `Action`.
//! User presses space? That's `Action::Toggle`.
//! The inventory answers? That's `Action::CandidatesLoaded(list)`.
//!
//! The `update()` function takes the current session and an action,
//! then returns the next session plus the side effect the event loop
//! should perform. No I/O here.
//!
//! ```text
//! Session + Action  →  update()  →  (Session, Effect)
//! ```

use log::{debug, info, warn};
use std::collections::HashSet;

use crate::core::error::{ActionError, SessionError, SourceError};
use crate::core::selection::{Candidate, Selection};
use crate::core::state::{Phase, Session, Termination};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // From the background tasks
    CandidatesLoaded(Vec<Candidate>),
    CandidatesFailed(SourceError),
    InterruptFinished(Result<(), ActionError>),

    // From the keyboard
    MoveUp,
    MoveDown,
    Toggle,
    Confirm,
    Quit,

    /// Terminal resized; nothing changes but the frame.
    Redraw,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Dispatch the interruption for these identifiers.
    Interrupt(HashSet<String>),
}

pub fn update(session: Session, action: Action) -> (Session, Effect) {
    let Session { selection, phase } = session;

    match (phase, action) {
        (Phase::Terminated(t), action) => {
            debug!("Ignoring {:?} after termination", action);
            (terminated(selection, t), Effect::None)
        }

        (phase, Action::Redraw) => (Session { selection, phase }, Effect::None),

        // Loading
        (Phase::Loading, Action::CandidatesLoaded(list)) => {
            info!("Loaded {} candidates", list.len());
            browsing(Selection::loaded(list))
        }
        (Phase::Loading, Action::CandidatesFailed(e)) => {
            warn!("Candidate source failed: {}", e);
            (
                terminated(selection, Termination::Failed(SessionError::Source(e))),
                Effect::None,
            )
        }

        // Quit is honoured anywhere before Confirming
        (Phase::Loading | Phase::Browsing, Action::Quit) => {
            info!("User quit");
            (terminated(selection, Termination::Quit), Effect::None)
        }

        // Browsing
        (Phase::Browsing, Action::MoveUp) => browsing(selection.move_up()),
        (Phase::Browsing, Action::MoveDown) => browsing(selection.move_down()),
        (Phase::Browsing, Action::Toggle) => browsing(selection.toggle()),
        (Phase::Browsing, Action::Confirm) => {
            if selection.is_empty() {
                debug!("Confirm with no candidates, ignoring");
                return browsing(selection);
            }
            // An empty selection is still handed to the invoker
            let ids = selection.confirmed();
            info!("Confirmed {} candidates", ids.len());
            (
                Session {
                    selection,
                    phase: Phase::Confirming { ids: ids.clone() },
                },
                Effect::Interrupt(ids),
            )
        }

        // Confirming
        (Phase::Confirming { ids }, Action::InterruptFinished(result)) => {
            let termination = match result {
                Ok(()) => {
                    info!("Interrupted {} candidates", ids.len());
                    Termination::Interrupted { ids }
                }
                Err(e) => {
                    warn!("Interrupt failed: {}", e);
                    Termination::Failed(SessionError::Action(e))
                }
            };
            (terminated(selection, termination), Effect::None)
        }

        (phase, action @ (Action::CandidatesLoaded(_) | Action::CandidatesFailed(_))) => {
            warn!("Unexpected {:?} in {:?}, candidates are loaded once", action, phase);
            (Session { selection, phase }, Effect::None)
        }
        (phase, action) => {
            debug!("Ignoring {:?} in {:?}", action, phase);
            (Session { selection, phase }, Effect::None)
        }
    }
}

fn browsing(selection: Selection) -> (Session, Effect) {
    (
        Session {
            selection,
            phase: Phase::Browsing,
        },
        Effect::None,
    )
}

fn terminated(selection: Selection, termination: Termination) -> Session {
    Session {
        selection,
        phase: Phase::Terminated(termination),
    }
}
