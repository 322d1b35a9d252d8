//! # Introduction
//!
//! gridbeaver searches for the longest-running halting program of a small
//! two-dimensional automaton. A program is an N×N grid of blanks, branches
//! and operators; a cursor walks it, steering on branches and editing an
//! integer tape on operators, until it leaves the grid or runs forever.
//!
//! ## Pipeline
//!
//! ```text
//! Enumerator → Grid → Interpreter → Outcome → Search (best so far)
//!                          │
//!                          └→ Snapshots → TUI
//! ```
//!
//! 1. [`grid`]: symbols, positions, the text format and base-3 indexing.
//! 2. [`memory`]: the bounded integer tape with a tracked dirty range.
//! 3. [`interpreter`]: stepping, loop heuristics and the verdict of a run.
//! 4. [`search`]: candidate enumeration with pruning and the search driver.
//! 5. [`snapshot`]: per-step recording with a configurable memory limit.
//! 6. [`ui`]: ratatui-based trace viewer; not part of the stable library API.

pub mod grid;
pub mod interpreter;
pub mod memory;
pub mod search;
pub mod snapshot;
pub mod ui;
