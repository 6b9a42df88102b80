use std::sync::mpsc::{self, Receiver};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

use crate::app::App;

/// Terminal events the TUI loop reacts to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UiEvent {
    Key(KeyEvent),
    Resize,
}

impl UiEvent {
    /// Map a raw crossterm event; `None` for anything the app ignores.
    pub fn from_crossterm(event: CtEvent) -> Option<Self> {
        match event {
            // Windows reports both press and release
            CtEvent::Key(key) if key.kind != KeyEventKind::Release => Some(UiEvent::Key(key)),
            CtEvent::Resize(_, _) => Some(UiEvent::Resize),
            _ => None,
        }
    }
}

/// Production event source reading crossterm events on a background thread.
///
/// Iterating blocks until the next event and ends once the reader thread stops.
pub struct CrosstermEventSource {
    rx: Receiver<UiEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(raw) => {
                    let Some(event) = UiEvent::from_crossterm(raw) else {
                        continue;
                    };
                    if tx.send(event).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    tracing::warn!(error = %err, "terminal event reader stopped");
                    break;
                }
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for CrosstermEventSource {
    type Item = UiEvent;

    fn next(&mut self) -> Option<UiEvent> {
        self.rx.recv().ok()
    }
}

/// Feed `events` to `app` until it quits or the events run out.
///
/// `redraw` runs once before the first event and after every event handled.
pub fn drive<I, F, E>(app: &mut App, events: I, mut redraw: F) -> Result<(), E>
where
    I: IntoIterator<Item = UiEvent>,
    F: FnMut(&mut App) -> Result<(), E>,
{
    redraw(app)?;
    for event in events {
        if let UiEvent::Key(key) = event {
            app.on_key(key);
        }
        redraw(app)?;
        if app.should_quit {
            break;
        }
    }
    Ok(())
}
