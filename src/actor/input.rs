//! Input Actor: Dedicated thread for polling terminal events.
//!
//! This actor runs in its own thread and uses crossterm's event polling
//! to capture key presses and resizes without blocking the session loop.
//! Only key presses are forwarded; repeat and release events are dropped.
//! When the terminal cannot tell repeats apart, a [`Debouncer`] does it.

use super::keymap::Debouncer;
use super::messages::{InputEvent, KeyCode, KeyModifiers};
use crossbeam_channel::{SendTimeoutError, Sender};
use crossterm::event::{self, Event, KeyEventKind};
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Input actor that polls terminal events.
#[derive(Debug)]
pub struct InputActor {
    /// Handle to the input thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl InputActor {
    /// Spawn the input actor thread.
    ///
    /// # Arguments
    ///
    /// * `sender` - Channel to send input events to the session loop.
    /// * `poll_timeout` - How long to wait for events before checking shutdown.
    /// * `debounce` - Window for collapsing auto-repeat, or `None` when the
    ///   terminal reports repeats itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn(
        sender: Sender<InputEvent>,
        poll_timeout: Duration,
        debounce: Option<Duration>,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("lifeline-input".to_string())
            .spawn(move || {
                let debouncer = debounce.map(Debouncer::new);
                Self::run_loop(&sender, &shutdown_clone, poll_timeout, debouncer);
            })?;

        log::debug!("input actor started (debounce: {debounce:?})");
        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the input thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the input thread to finish.
    pub fn join(mut self) {
        self.shutdown();
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main input polling loop.
    fn run_loop(
        sender: &Sender<InputEvent>,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
        mut debouncer: Option<Debouncer>,
    ) {
        loop {
            if shutdown.load(Ordering::Relaxed) {
                // The session may have stopped reading; never block on exit.
                let _ = sender.try_send(InputEvent::Shutdown);
                break;
            }

            match event::poll(poll_timeout) {
                Ok(true) => match event::read() {
                    Ok(event) => {
                        let Some(input_event) = Self::convert_event(event) else {
                            continue;
                        };
                        if let (Some(debouncer), InputEvent::Key { code, .. }) =
                            (debouncer.as_mut(), &input_event)
                        {
                            if !debouncer.accept(*code, Instant::now()) {
                                continue;
                            }
                        }
                        if !Self::forward(sender, shutdown, poll_timeout, input_event) {
                            break;
                        }
                    }
                    Err(e) => Self::report(sender, poll_timeout, &e),
                },
                Ok(false) => {}
                Err(e) => Self::report(sender, poll_timeout, &e),
            }
        }
        log::debug!("input actor stopped");
    }

    /// Send an event, waiting for queue space only while the actor is live.
    ///
    /// Returns `false` when the receiver is gone or shutdown was requested.
    fn forward(
        sender: &Sender<InputEvent>,
        shutdown: &AtomicBool,
        poll_timeout: Duration,
        mut event: InputEvent,
    ) -> bool {
        loop {
            match sender.send_timeout(event, poll_timeout) {
                Ok(()) => return true,
                Err(SendTimeoutError::Disconnected(_)) => return false,
                Err(SendTimeoutError::Timeout(pending)) => {
                    if shutdown.load(Ordering::Relaxed) {
                        return false;
                    }
                    event = pending;
                }
            }
        }
    }

    /// Pass a polling error on if there is room, then back off.
    fn report(sender: &Sender<InputEvent>, poll_timeout: Duration, error: &io::Error) {
        let _ = sender.try_send(InputEvent::Error(error.to_string()));
        thread::sleep(poll_timeout);
    }

    /// Convert a crossterm event to our `InputEvent`.
    fn convert_event(event: Event) -> Option<InputEvent> {
        match event {
            Event::Key(key_event) => {
                // Only process key press events (not release or repeat)
                if key_event.kind != KeyEventKind::Press {
                    return None;
                }

                let code = Self::convert_key_code(key_event.code)?;
                let modifiers = Self::convert_modifiers(key_event.modifiers);

                Some(InputEvent::Key { code, modifiers })
            }

            Event::Resize(width, height) => Some(InputEvent::Resize { width, height }),

            _ => None,
        }
    }

    /// Convert crossterm `KeyCode` to our `KeyCode`.
    fn convert_key_code(code: event::KeyCode) -> Option<KeyCode> {
        Some(match code {
            event::KeyCode::Char(c) => KeyCode::Char(c),
            event::KeyCode::Backspace => KeyCode::Backspace,
            event::KeyCode::Delete => KeyCode::Delete,
            event::KeyCode::Enter => KeyCode::Enter,
            event::KeyCode::Left => KeyCode::Left,
            event::KeyCode::Right => KeyCode::Right,
            event::KeyCode::Up => KeyCode::Up,
            event::KeyCode::Down => KeyCode::Down,
            event::KeyCode::Home => KeyCode::Home,
            event::KeyCode::End => KeyCode::End,
            event::KeyCode::Tab => KeyCode::Tab,
            event::KeyCode::Esc => KeyCode::Esc,
            _ => return None,
        })
    }

    /// Convert crossterm `KeyModifiers` to our `KeyModifiers`.
    fn convert_modifiers(mods: event::KeyModifiers) -> KeyModifiers {
        KeyModifiers {
            shift: mods.contains(event::KeyModifiers::SHIFT),
            control: mods.contains(event::KeyModifiers::CONTROL),
            alt: mods.contains(event::KeyModifiers::ALT),
        }
    }
}

impl Drop for InputActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEvent, KeyEventState};

    fn key(code: event::KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: event::KeyModifiers::NONE,
            kind,
            state: KeyEventState::NONE,
        })
    }

    #[test]
    fn test_only_presses_are_forwarded() {
        let press = InputActor::convert_event(key(event::KeyCode::Char('n'), KeyEventKind::Press));
        assert_eq!(press, Some(InputEvent::key(KeyCode::Char('n'))));

        for kind in [KeyEventKind::Repeat, KeyEventKind::Release] {
            assert_eq!(
                InputActor::convert_event(key(event::KeyCode::Char('n'), kind)),
                None
            );
        }
    }

    #[test]
    fn test_resize_and_unhandled_events() {
        assert_eq!(
            InputActor::convert_event(Event::Resize(100, 40)),
            Some(InputEvent::Resize {
                width: 100,
                height: 40
            })
        );
        assert_eq!(InputActor::convert_event(Event::FocusGained), None);
        assert_eq!(
            InputActor::convert_event(key(event::KeyCode::F(1), KeyEventKind::Press)),
            None
        );
    }

    #[test]
    fn test_modifiers() {
        let mods = InputActor::convert_modifiers(
            event::KeyModifiers::CONTROL | event::KeyModifiers::SHIFT,
        );
        assert!(mods.control && mods.shift && !mods.alt);
    }

    #[test]
    fn test_join_with_full_queue_returns() {
        let (tx, rx) = crossbeam_channel::bounded(2);
        tx.send(InputEvent::key(KeyCode::Char('a'))).unwrap();
        tx.send(InputEvent::key(KeyCode::Char('b'))).unwrap();

        let actor = InputActor::spawn(tx, Duration::from_millis(5), None).unwrap();
        thread::sleep(Duration::from_millis(20));

        let (done_tx, done_rx) = crossbeam_channel::bounded(1);
        thread::spawn(move || {
            actor.join();
            let _ = done_tx.send(());
        });
        assert!(done_rx.recv_timeout(Duration::from_secs(3)).is_ok());
        // The receiver stayed alive and full the whole time.
        assert_eq!(rx.len(), 2);
    }

    #[test]
    fn test_forward_gives_up_on_shutdown() {
        let (tx, _rx) = crossbeam_channel::bounded(1);
        tx.send(InputEvent::Shutdown).unwrap();
        let shutdown = AtomicBool::new(true);
        let sent = InputActor::forward(
            &tx,
            &shutdown,
            Duration::from_millis(1),
            InputEvent::key(KeyCode::Char('q')),
        );
        assert!(!sent);
    }

    #[test]
    fn test_forward_reports_disconnect() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        drop(rx);
        let shutdown = AtomicBool::new(false);
        assert!(!InputActor::forward(
            &tx,
            &shutdown,
            Duration::from_millis(1),
            InputEvent::key(KeyCode::Char('q')),
        ));
    }
}
