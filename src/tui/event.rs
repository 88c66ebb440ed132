use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::thread::JoinHandle;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, warn};

use crate::core::action::Action;

/// How long the input thread blocks before re-checking its stop flag.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Map a key press to the action it triggers.
pub fn key_to_action(key: KeyEvent) -> Option<Action> {
    // Release/repeat events show up with the kitty protocol; only presses count
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match (key.modifiers, key.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
        (_, KeyCode::Char('q')) => Some(Action::Quit),
        (_, KeyCode::Up | KeyCode::Char('k')) => Some(Action::MoveUp),
        (_, KeyCode::Down | KeyCode::Char('j')) => Some(Action::MoveDown),
        (_, KeyCode::Char(' ')) => Some(Action::Toggle),
        (_, KeyCode::Enter) => Some(Action::Confirm),
        _ => None,
    }
}

/// Map any terminal event to an action.
pub fn translate(event: Event) -> Option<Action> {
    match event {
        Event::Key(key) => {
            debug!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);
            key_to_action(key)
        }
        Event::Resize(_, _) => Some(Action::Redraw),
        _ => None,
    }
}

/// Forward terminal input onto the session's action channel until `stop` is set
/// or the receiver goes away.
///
/// Keys travel the same channel as the background task results, so the loop
/// sees one ordered stream of actions.
pub fn spawn_input_reader(tx: Sender<Action>, stop: Arc<AtomicBool>) -> JoinHandle<()> {
    std::thread::spawn(move || {
        while !stop.load(Ordering::Relaxed) {
            let ready = match event::poll(POLL_INTERVAL) {
                Ok(ready) => ready,
                Err(e) => {
                    warn!("Terminal input failed: {}", e);
                    let _ = tx.send(Action::Quit);
                    return;
                }
            };
            if !ready {
                continue;
            }
            match event::read() {
                Ok(event) => {
                    if let Some(action) = translate(event)
                        && tx.send(action).is_err()
                    {
                        return;
                    }
                }
                Err(e) => {
                    warn!("Terminal input failed: {}", e);
                    let _ = tx.send(Action::Quit);
                    return;
                }
            }
        }
    })
}
