use std::{
    thread::{self, JoinHandle},
    time::Duration,
};

use crossbeam_channel::Sender;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::constants::INPUT_POLL_MS;
use crate::shutdown::Shutdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Quit,
    Redraw,
}

pub fn map_event(event: Event) -> Option<Input> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => map_key(key),
        Event::Resize(..) => Some(Input::Redraw),
        _ => None,
    }
}

fn map_key(key: KeyEvent) -> Option<Input> {
    match key.code {
        KeyCode::Char('q') => Some(Input::Quit),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Input::Quit),
        _ => None,
    }
}

// Poll terminal events until shutdown. Raw mode swallows SIGINT, so Ctrl-C
// arrives here as a key event.
pub fn spawn_input_thread(tx: Sender<Input>, shutdown: Shutdown) -> JoinHandle<()> {
    thread::spawn(move || {
        let timeout = Duration::from_millis(INPUT_POLL_MS);
        while !shutdown.is_triggered() {
            let event = match event::poll(timeout) {
                Ok(false) => continue,
                Ok(true) => event::read(),
                Err(err) => Err(err),
            };
            let event = match event {
                Ok(event) => event,
                Err(err) => {
                    tracing::error!(%err, "failed to read terminal events");
                    shutdown.trigger();
                    return;
                }
            };
            if let Some(input) = map_event(event) {
                if tx.send(input).is_err() {
                    return;
                }
            }
        }
    })
}
