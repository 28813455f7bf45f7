//! # Lifeline
//!
//! A Game of Life sandbox with a bounded undo/redo timeline.
//!
//! Every generation is recorded as an immutable snapshot, so the simulation
//! can be stepped backward and forward, and stepping from the past discards
//! the old future the way an editor's undo history does.
//!
//! ## Core Concepts
//!
//! - **Grid**: A bounded, row-major buffer of dead/alive cells
//! - **Rule**: Conway's B3/S23, computed into a separate buffer
//! - **Timeline**: Snapshot history with a cursor; two interchangeable
//!   storage strategies (linked chain, ring buffer)
//! - **Session**: Terminal front end driven by input, ticker, and render actors
//!
//! ## Example
//!
//! ```rust
//! use lifeline::{rule, Grid, Strategy};
//!
//! let mut seed = Grid::new(5, 5).unwrap();
//! for x in 1..4 {
//!     seed.set(x, 2, 1);
//! }
//!
//! let mut timeline = Strategy::Ring.build(&seed, 16).unwrap();
//! let mut next = Grid::new(5, 5).unwrap();
//! rule::step(timeline.current(), &mut next).unwrap();
//! timeline.push(&next).unwrap();
//!
//! assert!(timeline.back());
//! assert_eq!(timeline.current(), &seed);
//! ```

pub mod actor;
pub mod format;
pub mod grid;
pub mod session;
pub mod terminal;
pub mod timeline;

// Re-exports for convenience
pub use format::FormatError;
pub use grid::{patterns, rule, Grid, GridError};
pub use session::{Session, SessionConfig, SessionError};
pub use timeline::{ChainTimeline, RingTimeline, Strategy, Timeline, TimelineError};
