//! Session: The interactive host loop around a timeline.
//!
//! A [`Session`] owns the history of generations, a scratch grid for the
//! rule, the play state, and the status line. Its methods are plain state
//! transitions, so everything except [`Session::run`] works without a
//! terminal.

mod prompt;

pub use prompt::{Prompt, PromptKind, PromptOutcome};

use crate::actor::{
    action_for, keymap, Action, Frame, InputActor, InputEvent, KeyCode, KeyModifiers,
    RenderCommand, RendererActor, TickerActor,
};
use crate::format::{self, FormatError};
use crate::grid::{rule, Grid, GridError};
use crate::terminal::TerminalGuard;
use crate::timeline::{Strategy, Timeline, TimelineError};
use crossbeam_channel::{bounded, select, Sender};
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for a [`Session`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of generations kept (0 = unbounded).
    pub history_capacity: usize,
    /// Timeline storage strategy.
    pub strategy: Strategy,
    /// Time between generations in play mode.
    pub step_interval: Duration,
    /// Target frames per second for the renderer.
    pub target_fps: u32,
    /// Input poll timeout.
    pub input_poll_timeout: Duration,
    /// Window for collapsing key auto-repeat on terminals that cannot
    /// report it.
    pub debounce_window: Duration,
    /// Path offered by the save prompt.
    pub save_path: PathBuf,
    /// Whether play mode is on when the session starts.
    pub start_playing: bool,
    /// Whether to use alternate screen buffer.
    pub alternate_screen: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            history_capacity: 512,
            strategy: Strategy::default(),
            step_interval: Duration::from_millis(120),
            target_fps: 60,
            input_poll_timeout: Duration::from_millis(10),
            debounce_window: keymap::DEFAULT_DEBOUNCE,
            save_path: PathBuf::from("output.txt"),
            start_playing: false,
            alternate_screen: true,
        }
    }
}

impl SessionConfig {
    /// Minimum time between two drawn frames.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs(1) / self.target_fps.max(1)
    }
}

/// Errors from session actions.
#[derive(Debug)]
pub enum SessionError {
    /// Scratch or resized grid allocation failed.
    Grid(GridError),
    /// Recording a generation failed.
    Timeline(TimelineError),
    /// Saving failed.
    Format(FormatError),
    /// Prompt input could not be understood.
    InvalidInput(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Grid(e) => write!(f, "{e}"),
            Self::Timeline(e) => write!(f, "{e}"),
            Self::Format(e) => write!(f, "{e}"),
            Self::InvalidInput(msg) => f.write_str(msg),
        }
    }
}

impl std::error::Error for SessionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Timeline(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::InvalidInput(_) => None,
        }
    }
}

impl From<GridError> for SessionError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<TimelineError> for SessionError {
    fn from(e: TimelineError) -> Self {
        Self::Timeline(e)
    }
}

impl From<FormatError> for SessionError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

/// Parse `width height` as two positive integers.
///
/// # Errors
///
/// Returns [`SessionError::InvalidInput`] for anything else.
pub fn parse_dimensions(text: &str) -> Result<(usize, usize), SessionError> {
    let invalid = || SessionError::InvalidInput(format!("expected 'width height', got '{}'", text.trim()));
    let mut fields = text.split_whitespace();
    let (Some(w), Some(h), None) = (fields.next(), fields.next(), fields.next()) else {
        return Err(invalid());
    };
    match (w.parse::<usize>(), h.parse::<usize>()) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Ok((w, h)),
        _ => Err(invalid()),
    }
}

/// Interactive session state.
pub struct Session {
    config: SessionConfig,
    timeline: Box<dyn Timeline>,
    /// Output buffer for the rule, reused across steps.
    scratch: Grid,
    playing: bool,
    running: bool,
    prompt: Option<Prompt>,
    /// Last action outcome, shown on the status line.
    message: Option<String>,
    /// Whether the screen is out of date.
    dirty: bool,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("timeline", &self.timeline)
            .field("playing", &self.playing)
            .field("running", &self.running)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Create a session whose history starts with a copy of `seed`.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeline cannot be created.
    pub fn new(seed: &Grid, config: SessionConfig) -> Result<Self, TimelineError> {
        let timeline = config.strategy.build(seed, config.history_capacity)?;
        log::info!(
            "session started: {}x{} grid, {} timeline, capacity {}",
            seed.width(),
            seed.height(),
            config.strategy,
            timeline.capacity()
        );
        Ok(Self {
            playing: config.start_playing,
            config,
            timeline,
            scratch: Grid::default(),
            running: true,
            prompt: None,
            message: None,
            dirty: true,
        })
    }

    /// The session's configuration.
    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// The history of generations.
    pub fn timeline(&self) -> &dyn Timeline {
        self.timeline.as_ref()
    }

    /// The generation at the cursor.
    pub fn current(&self) -> &Grid {
        self.timeline.current()
    }

    /// Whether play mode is on.
    pub const fn is_playing(&self) -> bool {
        self.playing
    }

    /// Whether the session has not been asked to quit.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// The open prompt, if any.
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// The last status message.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.dirty = true;
    }

    /// Compute the next generation from the current one and record it.
    ///
    /// The scratch grid is reallocated when the current generation has
    /// different dimensions.
    ///
    /// # Errors
    ///
    /// Returns an error if the scratch grid or the snapshot cannot be
    /// allocated; the history is then unchanged.
    pub fn step(&mut self) -> Result<(), SessionError> {
        let current = self.timeline.current();
        if !self.scratch.same_dimensions(current) || !self.scratch.is_allocated() {
            self.scratch = Grid::new(current.width(), current.height())?;
        }
        rule::step(current, &mut self.scratch)?;
        self.timeline.push(&self.scratch)?;
        self.dirty = true;
        Ok(())
    }

    /// Move one generation back. Returns whether the cursor moved.
    pub fn back(&mut self) -> bool {
        let moved = self.timeline.back();
        self.dirty |= moved;
        moved
    }

    /// Move one generation forward. Returns whether the cursor moved.
    pub fn forward(&mut self) -> bool {
        let moved = self.timeline.forward();
        self.dirty |= moved;
        moved
    }

    /// Save the current generation.
    ///
    /// # Errors
    ///
    /// See [`format::save_to_file`].
    pub fn save_to(&self, path: impl Into<PathBuf>) -> Result<PathBuf, SessionError> {
        let path = path.into();
        format::save_to_file(&path, self.timeline.current())?;
        Ok(path)
    }

    /// Restart the history from a copy of the current generation resized to
    /// `width` x `height`.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy, the resize, or the new timeline fails;
    /// the old history is then kept.
    pub fn resize_to(&mut self, width: usize, height: usize) -> Result<(), SessionError> {
        let mut resized = self.timeline.current().try_clone()?;
        resized.resize(width, height)?;
        let timeline = self
            .config
            .strategy
            .build(&resized, self.config.history_capacity)?;
        self.timeline = timeline;
        self.scratch = Grid::default();
        self.dirty = true;
        log::info!("history restarted at {width}x{height}");
        Ok(())
    }

    /// Perform an action.
    pub fn apply(&mut self, action: Action) {
        log::debug!("action: {action:?}");
        if action != Action::TogglePlay && action != Action::Quit {
            self.playing = false;
        }
        match action {
            Action::Quit => self.running = false,
            Action::TogglePlay => {
                self.playing = !self.playing;
                self.message = None;
            }
            Action::Step => match self.step() {
                Ok(()) => self.message = None,
                Err(e) => self.set_message(format!("step failed: {e}")),
            },
            Action::Back => {
                if !self.back() {
                    self.set_message("at the oldest generation");
                }
            }
            Action::Forward => {
                if !self.forward() {
                    self.set_message("at the newest generation");
                }
            }
            Action::Save => {
                let initial = self.config.save_path.display().to_string();
                self.prompt = Some(Prompt::new(PromptKind::SavePath, &initial));
            }
            Action::Resize => {
                let (w, h) = self.current().dimensions();
                self.prompt = Some(Prompt::new(PromptKind::Dimensions, &format!("{w} {h}")));
            }
        }
        self.dirty = true;
    }

    /// Advance play mode by one generation. A failed step stops play.
    pub fn tick(&mut self) {
        if !self.playing || self.prompt.is_some() {
            return;
        }
        if let Err(e) = self.step() {
            log::warn!("play stopped: {e}");
            self.playing = false;
            self.set_message(format!("play stopped: {e}"));
        }
    }

    /// Route a key press to the open prompt or the keymap.
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) {
        let Some(prompt) = self.prompt.as_mut() else {
            if let Some(action) = action_for(code, modifiers) {
                self.apply(action);
            }
            return;
        };

        self.dirty = true;
        match prompt.handle_key(code, modifiers) {
            PromptOutcome::Pending => {}
            PromptOutcome::Cancel => {
                self.prompt = None;
                self.message = None;
            }
            PromptOutcome::Submit(text) => {
                let kind = prompt.kind();
                self.prompt = None;
                self.submit(kind, text.trim());
            }
        }
    }

    fn submit(&mut self, kind: PromptKind, text: &str) {
        match kind {
            PromptKind::SavePath => {
                let path = if text.is_empty() {
                    self.config.save_path.clone()
                } else {
                    PathBuf::from(text)
                };
                match self.save_to(path) {
                    Ok(path) => self.set_message(format!("saved to {}", path.display())),
                    Err(e) => {
                        log::warn!("save failed: {e}");
                        self.set_message(format!("save failed: {e}"));
                    }
                }
            }
            PromptKind::Dimensions => {
                let dims = if text.is_empty() {
                    Ok(self.current().dimensions())
                } else {
                    parse_dimensions(text)
                };
                match dims.and_then(|(w, h)| self.resize_to(w, h)) {
                    Ok(()) => {
                        let (w, h) = self.current().dimensions();
                        self.set_message(format!("resized to {w}x{h}, history restarted"));
                    }
                    Err(e) => {
                        log::warn!("resize failed: {e}");
                        self.set_message(format!("resize failed: {e}"));
                    }
                }
            }
        }
    }

    /// The status line text.
    pub fn status_line(&self) -> String {
        if let Some(prompt) = &self.prompt {
            return prompt.display();
        }

        let timeline = &self.timeline;
        let (w, h) = self.current().dimensions();
        let capacity = match timeline.capacity() {
            0 => "unbounded".to_string(),
            cap => cap.to_string(),
        };
        let state = if self.playing { "playing" } else { "paused" };
        let tail = self.message.as_deref().unwrap_or(keymap::HELP);
        format!(
            " gen {}/{} (cap {capacity}, {}) | {w}x{h} | {state} | {tail}",
            timeline.cursor() + 1,
            timeline.len(),
            timeline.strategy(),
        )
    }

    /// Snapshot of what should be on screen.
    ///
    /// # Errors
    ///
    /// Returns an error if the grid copy cannot be allocated.
    pub fn frame(&self) -> Result<Frame, GridError> {
        Ok(Frame {
            grid: self.current().try_clone()?,
            status: self.status_line(),
        })
    }

    fn request_draw(&mut self, render_tx: &Sender<RenderCommand>) {
        if !self.dirty {
            return;
        }
        match self.frame() {
            Ok(frame) => {
                let _ = render_tx.send(RenderCommand::Draw(Box::new(frame)));
                self.dirty = false;
            }
            Err(e) => log::warn!("frame skipped: {e}"),
        }
    }

    /// Take over the terminal and run until the user quits.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal setup or thread creation fails.
    pub fn run(&mut self) -> io::Result<()> {
        let guard = TerminalGuard::enter(self.config.alternate_screen)?;
        let (width, height) = TerminalGuard::size()?;

        let (input_tx, input_rx) = bounded::<InputEvent>(64);
        let (render_tx, render_rx) = bounded::<RenderCommand>(4);

        let debounce = (!guard.keyboard_enhanced()).then_some(self.config.debounce_window);
        let input = InputActor::spawn(input_tx, self.config.input_poll_timeout, debounce)?;
        let renderer =
            RendererActor::spawn(render_rx, width, height, self.config.frame_interval())?;
        let ticker = TickerActor::spawn(self.config.step_interval)?;

        self.running = true;
        self.dirty = true;
        while self.running {
            self.request_draw(&render_tx);
            select! {
                recv(input_rx) -> event => match event {
                    Ok(InputEvent::Key { code, modifiers }) => self.handle_key(code, modifiers),
                    Ok(InputEvent::Resize { width, height }) => {
                        let _ = render_tx.send(RenderCommand::Resize { width, height });
                    }
                    Ok(InputEvent::Error(e)) => log::warn!("input error: {e}"),
                    Ok(InputEvent::Shutdown) | Err(_) => self.running = false,
                },
                recv(ticker.receiver()) -> _ => self.tick(),
            }
        }

        drop(input_rx);
        input.join();
        ticker.join();
        let _ = render_tx.send(RenderCommand::Shutdown);
        renderer.join();
        drop(guard);
        log::info!(
            "session ended at generation {}/{}",
            self.timeline.cursor() + 1,
            self.timeline.len()
        );
        Ok(())
    }
}
