//! Event handling for the TUI.
//!
//! Processes keyboard and terminal events using crossterm.

use crate::error::{Result, SecureCheckError};
use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use std::time::Duration;

/// Application events.
#[derive(Debug)]
pub enum Event {
    /// A key was pressed.
    Key(KeyEvent),
    /// The terminal was resized.
    Resize(u16, u16),
    /// A periodic tick (nothing happened within the poll window).
    Tick,
}

/// Polls for the next event, waiting at most `timeout`.
///
/// Returns `Event::Tick` when the window elapses with no input. Key release
/// and repeat events are folded into ticks so Windows terminals do not
/// double-trigger actions.
pub fn poll_event(timeout: Duration) -> Result<Event> {
    let ready = event::poll(timeout)
        .map_err(|e| SecureCheckError::internal(format!("Failed to poll events: {e}")))?;

    if !ready {
        return Ok(Event::Tick);
    }

    let event = event::read()
        .map_err(|e| SecureCheckError::internal(format!("Failed to read event: {e}")))?;

    match event {
        CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Ok(Event::Key(key)),
        CrosstermEvent::Resize(width, height) => Ok(Event::Resize(width, height)),
        _ => Ok(Event::Tick),
    }
}
