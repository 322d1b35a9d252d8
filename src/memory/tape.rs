//! Resettable integer tape
//!
//! The tape is a fixed array of `i32` cells with a pointer that starts in the
//! middle. A search resets it tens of millions of times, so it tracks the
//! dirty range `[low, high]` of cells the pointer has reached since the last
//! [`MemoryTape::clear`] and clears only that range.
//!
//! # Bounds
//!
//! Moving the pointer past either end is allowed; the interpreter calls
//! [`MemoryTape::check`] after every tape operation and stops the run with a
//! [`TapeError`]. While the pointer is outside the array, reads return zero
//! and writes are dropped.

use crate::interpreter::constants::DEFAULT_TAPE_CAPACITY;
use crate::interpreter::errors::TapeError;
use std::ops::RangeInclusive;

/// Capacity and saturation limits of a tape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapePolicy {
    /// Number of cells; the pointer starts at `capacity / 2`
    pub capacity: usize,

    /// Values whose magnitude reaches this limit overflow the tape.
    /// `None` only stops at the `i32` range.
    pub value_limit: Option<i32>,
}

impl Default for TapePolicy {
    fn default() -> Self {
        TapePolicy {
            capacity: DEFAULT_TAPE_CAPACITY,
            value_limit: None,
        }
    }
}

/// Integer tape with a movable pointer and dirty-range reset
#[derive(Debug, Clone)]
pub struct MemoryTape {
    cells: Vec<i32>,
    pointer: isize,
    low: usize,
    high: usize,
    value_limit: i32,
}

impl MemoryTape {
    pub fn new(policy: TapePolicy) -> Self {
        assert!(policy.capacity > 0, "tape capacity must be positive");
        let origin = policy.capacity / 2;
        MemoryTape {
            cells: vec![0; policy.capacity],
            pointer: origin as isize,
            low: origin,
            high: origin,
            value_limit: policy.value_limit.unwrap_or(i32::MAX),
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    /// Pointer position after a reset
    pub fn origin(&self) -> isize {
        (self.cells.len() / 2) as isize
    }

    pub fn pointer(&self) -> isize {
        self.pointer
    }

    fn index(&self, address: isize) -> Option<usize> {
        usize::try_from(address)
            .ok()
            .filter(|&i| i < self.cells.len())
    }

    /// Value under the pointer
    pub fn read(&self) -> i32 {
        self.value_at(self.pointer)
    }

    /// Value of any cell; zero outside the tape
    pub fn value_at(&self, address: isize) -> i32 {
        self.index(address).map_or(0, |i| self.cells[i])
    }

    pub fn increment(&mut self) {
        if let Some(i) = self.index(self.pointer) {
            self.cells[i] = self.cells[i].saturating_add(1);
        }
    }

    pub fn decrement(&mut self) {
        if let Some(i) = self.index(self.pointer) {
            self.cells[i] = self.cells[i].saturating_sub(1);
        }
    }

    /// Move the pointer toward lower addresses
    pub fn move_left(&mut self) {
        self.pointer -= 1;
        if let Some(i) = self.index(self.pointer) {
            self.low = self.low.min(i);
        }
    }

    /// Move the pointer toward higher addresses
    pub fn move_right(&mut self) {
        self.pointer += 1;
        if let Some(i) = self.index(self.pointer) {
            self.high = self.high.max(i);
        }
    }

    /// Whether the pointer or the value under it has left the allowed range
    pub fn check(&self) -> Result<(), TapeError> {
        let Some(i) = self.index(self.pointer) else {
            return Err(TapeError::PointerOutOfBounds {
                pointer: self.pointer,
                capacity: self.cells.len(),
            });
        };
        let value = self.cells[i];
        if value.unsigned_abs() >= self.value_limit.unsigned_abs() {
            return Err(TapeError::ValueSaturated {
                value,
                limit: self.value_limit,
            });
        }
        Ok(())
    }

    pub fn out_of_bounds(&self) -> bool {
        self.check().is_err()
    }

    /// Cells reached since the last clear
    pub fn dirty_range(&self) -> RangeInclusive<usize> {
        self.low..=self.high
    }

    /// Values of the cells in `range`, clipped to the tape
    pub fn values(&self, range: RangeInclusive<isize>) -> Vec<i32> {
        range.map(|address| self.value_at(address)).collect()
    }

    /// Zero the dirty range and return the pointer to the origin
    ///
    /// Returns the number of cells cleared, `high - low + 1`.
    pub fn clear(&mut self) -> usize {
        self.cells[self.low..=self.high].fill(0);
        let cleared = self.high - self.low + 1;
        let origin = self.cells.len() / 2;
        self.pointer = origin as isize;
        self.low = origin;
        self.high = origin;
        cleared
    }
}

impl Default for MemoryTape {
    fn default() -> Self {
        MemoryTape::new(TapePolicy::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(capacity: usize, value_limit: Option<i32>) -> MemoryTape {
        MemoryTape::new(TapePolicy {
            capacity,
            value_limit,
        })
    }

    #[test]
    fn test_moves_track_dirty_range() {
        let mut tape = small(100, None);
        tape.move_left();
        tape.move_left();
        tape.increment();
        tape.move_right();
        tape.move_right();
        tape.move_right();
        tape.decrement();
        assert_eq!(tape.dirty_range(), 48..=51);
        assert_eq!(tape.read(), -1);
        assert_eq!(tape.value_at(48), 1);
        assert_eq!(tape.clear(), 4);
        assert_eq!(tape.value_at(48), 0);
        assert_eq!(tape.value_at(51), 0);
        assert_eq!(tape.pointer(), 50);
    }

    #[test]
    fn test_pointer_escape_is_reported() {
        let mut tape = small(2, None);
        assert_eq!(tape.pointer(), 1);
        tape.move_right();
        assert_eq!(
            tape.check(),
            Err(TapeError::PointerOutOfBounds {
                pointer: 2,
                capacity: 2
            })
        );
        // Writes outside the tape are dropped
        tape.increment();
        assert_eq!(tape.read(), 0);
        assert_eq!(tape.clear(), 1);
        assert!(!tape.out_of_bounds());
    }

    #[test]
    fn test_value_limit() {
        let mut tape = small(10, Some(2));
        tape.decrement();
        assert!(tape.check().is_ok());
        tape.decrement();
        assert_eq!(
            tape.check(),
            Err(TapeError::ValueSaturated { value: -2, limit: 2 })
        );
    }
}
