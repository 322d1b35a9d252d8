//! Error types for the grid interpreter
//!
//! None of these are fatal to a search. A [`TapeError`] ends one candidate's
//! run, and together with budget exhaustion it is folded into the single
//! "indeterminate" verdict [`Indeterminate`], which the search driver leaves
//! out of the best-candidate comparison.

use std::fmt;

/// The tape left its configured bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TapeError {
    /// The pointer moved outside `[0, capacity)`
    PointerOutOfBounds { pointer: isize, capacity: usize },

    /// The value under the pointer reached the configured magnitude limit
    ValueSaturated { value: i32, limit: i32 },
}

impl fmt::Display for TapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TapeError::PointerOutOfBounds { pointer, capacity } => {
                write!(
                    f,
                    "Tape pointer {} out of bounds for capacity {}",
                    pointer, capacity
                )
            }
            TapeError::ValueSaturated { value, limit } => {
                write!(f, "Tape value {} reached the limit of {}", value, limit)
            }
        }
    }
}

impl std::error::Error for TapeError {}

/// Why a run ended without a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indeterminate {
    /// The tape overflowed
    Overflow(TapeError),

    /// The step budget ran out before the cursor exited or a loop was found
    BudgetExhausted { max_steps: u64 },
}

impl fmt::Display for Indeterminate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Indeterminate::Overflow(err) => write!(f, "Overflow: {}", err),
            Indeterminate::BudgetExhausted { max_steps } => {
                write!(f, "No verdict within {} steps", max_steps)
            }
        }
    }
}

impl std::error::Error for Indeterminate {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Indeterminate::Overflow(err) => Some(err),
            Indeterminate::BudgetExhausted { .. } => None,
        }
    }
}

impl From<TapeError> for Indeterminate {
    fn from(err: TapeError) -> Self {
        Indeterminate::Overflow(err)
    }
}

/// Recording a trace ran out of its memory allowance
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotLimitExceeded {
    pub current: usize,
    pub limit: usize,
}

impl fmt::Display for SnapshotLimitExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Snapshot memory limit exceeded: {} bytes used, limit is {}",
            self.current, self.limit
        )
    }
}

impl std::error::Error for SnapshotLimitExceeded {}
