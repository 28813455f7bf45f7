//! Grid module: The cell buffer and the rules that evolve it.
//!
//! This module contains:
//! - [`Grid`]: A bounded, row-major buffer of dead/alive cells
//! - [`rule`]: Conway's B3/S23 transition into a separate buffer
//! - [`patterns`]: Named seed patterns and deterministic random fills

#[allow(clippy::module_inception)]
mod grid;
pub mod patterns;
pub mod rule;

pub use grid::{Grid, GridError};
