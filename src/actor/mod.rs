//! Actor Model: Message-passing concurrency for the interactive session.
//!
//! This module implements a simple actor system using crossbeam channels:
//! - **Input Actor**: Polls terminal events, forwards key presses
//! - **Ticker Actor**: Paces play mode
//! - **Render Actor**: Receives frames, draws them in one write each
//! - **Session Loop**: Owns the timeline and turns keys into actions
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐     InputEvent      ┌──────────────┐
//! │ Input Thread │ ─────────────────▶  │              │
//! └──────────────┘                     │              │
//! ┌──────────────┐        Tick         │   Session    │
//! │Ticker Thread │ ─────────────────▶  │    Loop      │
//! └──────────────┘                     │              │
//! ┌──────────────┐    RenderCommand    │              │
//! │Render Thread │ ◀─────────────────  │              │
//! └──────────────┘                     └──────────────┘
//! ```

mod input;
pub mod keymap;
mod messages;
pub mod renderer;
mod ticker;

pub use input::InputActor;
pub use keymap::{action_for, Action, Debouncer};
pub use messages::{Frame, InputEvent, KeyCode, KeyModifiers, RenderCommand};
pub use renderer::RendererActor;
pub use ticker::{Tick, TickerActor};
