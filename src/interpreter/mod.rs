//! Grid automaton execution engine
//!
//! This module provides the core execution logic:
//! - [`engine`]: Interpreter stepping one grid and producing an [`engine::Outcome`]
//! - [`state`]: Cursor, direction and tape of a run
//! - [`detector`]: Loop heuristics sampled on a growing-period schedule
//! - [`errors`]: Tape and verdict error types
//! - [`constants`]: Defaults shared by the library and the CLI
//!
//! # Execution Model
//!
//! The cursor starts just left of cell (0, 0) facing right. Each step looks
//! at the cell ahead: a `Branch` turns the cursor in place, an `Operator`
//! is entered and applies a tape operation chosen by the facing direction,
//! and a blank is simply entered. Leaving the grid halts the run.

pub mod constants;
pub mod detector;
pub mod engine;
pub mod errors;
pub mod state;
