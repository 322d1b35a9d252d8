//! Memory model for the grid interpreter
//!
//! The automaton has a single memory: an integer [`tape::MemoryTape`] addressed
//! by a pointer that `Operator` cells move and modify.
//!
//! # Operator Semantics
//!
//! The tape operation is chosen by the direction the cursor was facing when it
//! entered the `Operator` cell:
//!
//! ```text
//! up    →  pointer - 1
//! right →  *pointer + 1
//! down  →  pointer + 1
//! left  →  *pointer - 1
//! ```
//!
//! # Reset Cost
//!
//! A search resets the tape before every candidate, so
//! [`tape::MemoryTape::clear`] only touches the cells the previous run reached.

pub mod tape;

pub use tape::{MemoryTape, TapePolicy};
