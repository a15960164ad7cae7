//! Terminal event abstraction.
//!
//! Wraps crossterm events into a simpler enum and runs a background task that
//! forwards them over a channel so the main loop stays non-blocking.  Frame
//! ticks are not events: the main loop keeps its own interval for those.

use std::time::Duration;

use crossterm::event::{self, Event as CtEvent, KeyEvent, MouseEvent};
use tokio::sync::mpsc;

/// High-level input events consumed by the application.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Mouse(MouseEvent),
    Resize(u16, u16),
}

/// Spawns a background task that polls the terminal for input and sends it
/// through the returned channel.  `poll_timeout` bounds how long the task
/// blocks before checking whether the receiver is still alive.
pub fn spawn_event_reader(poll_timeout: Duration) -> mpsc::UnboundedReceiver<AppEvent> {
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::task::spawn_blocking(move || loop {
        if tx.is_closed() {
            break;
        }
        match event::poll(poll_timeout) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(err) => {
                tracing::error!("terminal poll failed: {err}");
                break;
            }
        }
        let app_event = match event::read() {
            Ok(CtEvent::Key(k)) => AppEvent::Key(k),
            Ok(CtEvent::Mouse(m)) => AppEvent::Mouse(m),
            Ok(CtEvent::Resize(w, h)) => AppEvent::Resize(w, h),
            Ok(_) => continue,
            Err(err) => {
                tracing::warn!("terminal read failed: {err}");
                continue;
            }
        };
        if tx.send(app_event).is_err() {
            break; // receiver dropped
        }
    });

    rx
}
