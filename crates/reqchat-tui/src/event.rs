//! Terminal event handling

use std::thread;
use std::time::{Duration, Instant};

use crossterm::event as crossterm_event;
use crossterm::event::{KeyEvent, KeyEventKind};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Events delivered to the application loop
#[derive(Debug, Clone)]
pub enum Event {
    /// Keyboard input
    Key(KeyEvent),
    /// Terminal resize
    Resize { width: u16, height: u16 },
    /// Periodic tick for UI updates
    Tick,
}

/// Terminal event source.
///
/// Spawns a thread that polls crossterm with a 10ms timeout and forwards
/// events over an mpsc channel, interleaving a tick every 250ms so the UI
/// can animate spinners and progress while idle.
pub struct EventLoop {
    rx: UnboundedReceiver<Event>,
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        thread::spawn(move || poll_loop(tx));
        Self { rx }
    }

    /// Next terminal event; `None` once the poll thread has exited
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

fn poll_loop(tx: UnboundedSender<Event>) {
    let tick_interval = Duration::from_millis(250);
    let poll_timeout = Duration::from_millis(10);
    let mut last_tick = Instant::now();

    loop {
        if crossterm_event::poll(poll_timeout).unwrap_or(false) {
            if let Ok(event) = crossterm_event::read() {
                let event = match event {
                    // Key releases/repeats would double input on some terminals
                    crossterm_event::Event::Key(key) if key.kind == KeyEventKind::Press => {
                        Some(Event::Key(key))
                    }
                    crossterm_event::Event::Key(_) => None,
                    crossterm_event::Event::Resize(width, height) => {
                        Some(Event::Resize { width, height })
                    }
                    _ => None,
                };
                if let Some(event) = event {
                    if tx.send(event).is_err() {
                        break;
                    }
                }
            }
        }

        if last_tick.elapsed() >= tick_interval {
            if tx.send(Event::Tick).is_err() {
                break;
            }
            last_tick = Instant::now();
        }
    }
}
