//! Event plumbing for the dashboard.
//!
//! One unbounded channel carries everything the UI loop reacts to:
//! terminal input, ticks, and worker completions. Handing a clone of
//! the sender to background tasks is the only cross-thread boundary.

use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use lima_client::VmRecord;
use tokio::sync::mpsc;

/// Events delivered to the UI loop.
#[derive(Debug)]
pub enum AppEvent {
    /// Terminal key press.
    Key(KeyEvent),
    /// Terminal resize.
    Resize(u16, u16),
    /// Periodic tick while no input is pending.
    Tick,
    /// A background task finished.
    Worker(WorkerEvent),
}

/// Completion of a background limactl invocation.
#[derive(Debug)]
pub enum WorkerEvent {
    /// Result of an inventory reload.
    Loaded(Result<Vec<VmRecord>, String>),
    /// A lifecycle command finished. On success the worker already
    /// waited out the settle delay and re-listed; the fresh snapshot
    /// (or the reload error) rides along.
    CommandDone {
        /// Status bar message describing the outcome.
        message: String,
        /// Post-action snapshot; `None` when the command failed.
        reload: Option<Result<Vec<VmRecord>, String>>,
    },
}

/// Polls the terminal on a background task and forwards events.
pub struct EventHandler {
    rx: mpsc::UnboundedReceiver<AppEvent>,
    tx: mpsc::UnboundedSender<AppEvent>,
}

impl EventHandler {
    /// Start the terminal poll loop. `tick_rate` bounds how long the
    /// UI loop waits between redraws when nothing happens.
    #[must_use]
    pub fn new(tick_rate: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let event_tx = tx.clone();

        tokio::spawn(async move {
            loop {
                if event::poll(tick_rate).unwrap_or(false) {
                    match event::read() {
                        Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                            if event_tx.send(AppEvent::Key(key)).is_err() {
                                break;
                            }
                        }
                        Ok(Event::Resize(w, h)) => {
                            if event_tx.send(AppEvent::Resize(w, h)).is_err() {
                                break;
                            }
                        }
                        _ => {}
                    }
                } else if event_tx.send(AppEvent::Tick).is_err() {
                    break;
                }
            }
        });

        Self { rx, tx }
    }

    /// Next event, or `None` once all senders are gone.
    pub async fn next(&mut self) -> Option<AppEvent> {
        self.rx.recv().await
    }

    /// Sender handed to worker tasks.
    #[must_use]
    pub fn sender(&self) -> mpsc::UnboundedSender<AppEvent> {
        self.tx.clone()
    }
}
