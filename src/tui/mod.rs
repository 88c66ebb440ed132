//! # TUI Adapter
//!
//! The ratatui-specific layer. Owns the terminal, runs the event loop, and
//! dispatches the two collaborator calls as background tasks.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//!  input thread ──keys──┐
//!                       ├──▶ mpsc::Receiver<Action> ──▶ update() ──▶ draw
//!  tokio tasks ──results┘                                  │
//!                                                          └──▶ Effect::Interrupt ──▶ tokio task
//! ```
//!
//! One frame is drawn before every action is received, so the screen always
//! shows the latest session. The loop stops as soon as the session reaches
//! `Terminated`.

mod component;
pub mod event;
pub mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::core::action::{Action, Effect, update};
use crate::core::config::InterruptSettings;
use crate::core::error::{ActionError, SessionError};
use crate::core::state::{Outcome, Session};
use crate::inventory::{ActionInvoker, CandidateSource, Collaborators};

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // The selector has no text input, so the cursor only gets in the way
        execute!(stdout(), Hide)?;
        info!("Terminal cursor hidden");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), Show);
    }
}

/// Run one interactive session on the real terminal.
///
/// Must be called from within a tokio runtime; the collaborator calls are
/// spawned onto it.
pub fn run(
    collaborators: Collaborators,
    settings: InterruptSettings,
) -> Result<Outcome, SessionError> {
    let mut terminal = ratatui::init();
    let terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to hide cursor: {}", e))
        .ok();

    // Channel for actions from the input thread and background tasks
    let (tx, rx) = mpsc::channel();
    let stop = Arc::new(AtomicBool::new(false));
    let input = event::spawn_input_reader(tx.clone(), stop.clone());

    let result = event_loop(&mut terminal, &collaborators, settings, tx, rx);

    stop.store(true, Ordering::Relaxed);
    if input.join().is_err() {
        warn!("Input thread panicked");
    }
    drop(terminal_mode_guard);
    ratatui::restore();
    result
}

/// Drive a session to termination on any ratatui backend.
///
/// `tx`/`rx` are the two ends of the session's action channel; whatever else
/// holds a clone of `tx` (the input thread, tests) feeds the same stream.
pub fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    collaborators: &Collaborators,
    settings: InterruptSettings,
    tx: Sender<Action>,
    rx: Receiver<Action>,
) -> Result<Outcome, SessionError> {
    let runtime = Handle::try_current().map_err(|e| SessionError::Runtime(e.to_string()))?;

    let mut session = Session::new();
    spawn_fetch(&runtime, collaborators.source.clone(), tx.clone());

    loop {
        terminal
            .draw(|f| ui::draw_ui(f, &session))
            .map_err(|e| SessionError::Terminal(e.to_string()))?;

        // The loop holds `tx` itself, so the channel only closes on teardown
        let action = rx
            .recv()
            .map_err(|e| SessionError::Runtime(e.to_string()))?;
        debug!("Event loop received: {:?}", action);

        let (next, effect) = update(session, action);
        session = next;

        match effect {
            Effect::Interrupt(ids) => {
                spawn_interrupt(
                    &runtime,
                    collaborators.invoker.clone(),
                    ids,
                    settings,
                    tx.clone(),
                );
            }
            Effect::None => {}
        }

        if session.is_terminated() {
            break;
        }
    }

    session.into_outcome()
}

fn spawn_fetch(
    runtime: &Handle,
    source: Arc<dyn CandidateSource>,
    tx: Sender<Action>,
) -> JoinHandle<()> {
    info!("Spawning candidate listing");
    runtime.spawn(async move {
        let action = match source.list().await {
            Ok(list) => Action::CandidatesLoaded(list),
            Err(e) => Action::CandidatesFailed(e),
        };
        if tx.send(action).is_err() {
            warn!("Failed to deliver candidates: receiver dropped");
        }
    })
}

fn spawn_interrupt(
    runtime: &Handle,
    invoker: Arc<dyn ActionInvoker>,
    ids: std::collections::HashSet<String>,
    settings: InterruptSettings,
    tx: Sender<Action>,
) -> JoinHandle<()> {
    info!(
        "Spawning interrupt for {} instances (timeout={:?}, force={})",
        ids.len(),
        settings.timeout,
        settings.force
    );
    let deadline = invoker.deadline(settings.timeout);
    runtime.spawn(async move {
        let result = match tokio::time::timeout(
            deadline,
            invoker.interrupt(&ids, settings.timeout, settings.force),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                warn!("Interrupt timed out after {:?}", deadline);
                Err(ActionError::TimedOut(deadline))
            }
        };
        if tx.send(Action::InterruptFinished(result)).is_err() {
            warn!("Failed to deliver interrupt result: receiver dropped");
        }
    })
}
