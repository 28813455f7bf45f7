//! Renderer Actor: Dedicated thread for rendering to the terminal.
//!
//! This actor owns stdout. It receives frames from the session loop,
//! coalesces them to the target frame rate, and draws each one as a single
//! write: the grid scaled into the terminal, then the status line.

use super::messages::{Frame, RenderCommand};
use crate::terminal::{color, OutputBuffer, Viewport};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// How long the render thread waits for commands when idle.
const IDLE_POLL: Duration = Duration::from_millis(50);

/// Renderer actor that handles terminal output.
#[derive(Debug)]
pub struct RendererActor {
    /// Handle to the render thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

/// Render statistics for debugging/profiling.
#[derive(Debug, Clone, Default)]
pub struct RenderStats {
    /// Total frames drawn.
    pub frames: u64,
    /// Frames replaced by a newer one before they were drawn.
    pub coalesced: u64,
    /// Total bytes written to terminal.
    pub bytes_written: u64,
}

/// Internal renderer state.
struct Renderer {
    /// Pre-allocated output buffer.
    output: OutputBuffer,
    /// Terminal stdout handle.
    stdout: Stdout,
    /// Terminal size.
    width: u16,
    height: u16,
    /// Whether the screen must be cleared before the next frame.
    needs_clear: bool,
    /// Render statistics.
    stats: RenderStats,
}

impl Renderer {
    fn new(width: u16, height: u16) -> Self {
        Self {
            output: OutputBuffer::new(),
            stdout: io::stdout(),
            width,
            height,
            needs_clear: true,
            stats: RenderStats::default(),
        }
    }

    /// Draw a frame in a single write.
    fn draw(&mut self, frame: &Frame) -> io::Result<()> {
        self.output.clear();
        if self.needs_clear {
            self.output.reset_attrs();
            self.output.clear_screen();
            self.needs_clear = false;
        }
        compose(frame, self.width, self.height, &mut self.output);
        self.output.flush_to(&mut self.stdout)?;

        self.stats.frames += 1;
        self.stats.bytes_written += self.output.len() as u64;
        Ok(())
    }

    const fn resize(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.needs_clear = true;
    }
}

/// Append the ANSI output for `frame` on a `cols` x `rows` terminal.
///
/// The last row is the status line; the grid is scaled and centered in the
/// rows above it. Every terminal cell is written, so no stale content from
/// a previous, larger grid survives.
pub fn compose(frame: &Frame, cols: u16, rows: u16, out: &mut OutputBuffer) {
    out.cursor_hide();
    if cols == 0 || rows == 0 {
        return;
    }

    let grid = &frame.grid;
    let area_rows = rows - 1;
    let viewport = Viewport::fit(grid.width(), grid.height(), cols, area_rows);
    let cells = grid.cells();

    for row in 0..area_rows {
        out.cursor_move(0, row);
        for col in 0..usize::from(cols) {
            let bg = match viewport.cell_at(col, usize::from(row)) {
                Some((x, y)) if cells[y * grid.width() + x] != 0 => color::ALIVE,
                Some(_) => color::DEAD,
                None => color::MARGIN,
            };
            out.set_bg(bg);
            out.write_spaces(1);
        }
    }

    out.cursor_move(0, area_rows);
    out.set_bg(color::STATUS_BG);
    out.set_fg(color::STATUS_FG);
    let (text, used) = truncate_to_width(&frame.status, usize::from(cols));
    out.write_str(text);
    out.write_spaces(usize::from(cols) - used);
    out.reset_attrs();
}

/// The longest prefix of `text` that fits in `max` columns, and its width.
///
/// Cuts only at grapheme boundaries, so a wide character that would
/// straddle the edge is left out entirely.
pub fn truncate_to_width(text: &str, max: usize) -> (&str, usize) {
    let mut used = 0;
    for (offset, grapheme) in text.grapheme_indices(true) {
        let width = grapheme.width();
        if used + width > max {
            return (&text[..offset], used);
        }
        used += width;
    }
    (text, used)
}

impl RendererActor {
    /// Spawn the renderer actor thread.
    ///
    /// # Arguments
    ///
    /// * `receiver` - Channel to receive render commands from.
    /// * `width` - Initial terminal width.
    /// * `height` - Initial terminal height.
    /// * `frame_interval` - Minimum time between two drawn frames.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS fails to spawn the thread.
    pub fn spawn(
        receiver: Receiver<RenderCommand>,
        width: u16,
        height: u16,
        frame_interval: Duration,
    ) -> io::Result<Self> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("lifeline-render".to_string())
            .spawn(move || {
                match Self::run_loop(&receiver, &shutdown_clone, width, height, frame_interval) {
                    Ok(stats) => log::debug!("render thread stopped: {stats:?}"),
                    Err(e) => log::error!("render thread error: {e}"),
                }
            })?;

        log::debug!("renderer started ({width}x{height}, frame interval {frame_interval:?})");
        Ok(Self {
            handle: Some(handle),
            shutdown,
        })
    }

    /// Signal the render thread to shutdown.
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Wait for the render thread to finish.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }

    /// Main render loop.
    fn run_loop(
        receiver: &Receiver<RenderCommand>,
        shutdown: &AtomicBool,
        width: u16,
        height: u16,
        frame_interval: Duration,
    ) -> io::Result<RenderStats> {
        let mut renderer = Renderer::new(width, height);
        let mut pending: Option<Box<Frame>> = None;
        let mut last: Option<Box<Frame>> = None;
        let mut last_draw: Option<Instant> = None;

        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }

            let since_draw = last_draw.map_or(frame_interval, |at| at.elapsed());
            let timeout = if pending.is_some() {
                frame_interval.saturating_sub(since_draw)
            } else {
                IDLE_POLL
            };

            match receiver.recv_timeout(timeout) {
                Ok(RenderCommand::Draw(frame)) => {
                    if pending.replace(frame).is_some() {
                        renderer.stats.coalesced += 1;
                    }
                }
                Ok(RenderCommand::Resize { width, height }) => {
                    renderer.resize(width, height);
                    if pending.is_none() {
                        pending = last.take();
                    }
                }
                Ok(RenderCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                Err(RecvTimeoutError::Timeout) => {}
            }

            let due = !matches!(last_draw, Some(at) if at.elapsed() < frame_interval);
            if due {
                if let Some(frame) = pending.take() {
                    renderer.draw(&frame)?;
                    last = Some(frame);
                    last_draw = Some(Instant::now());
                }
            }
        }

        Ok(renderer.stats)
    }
}

impl Drop for RendererActor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
