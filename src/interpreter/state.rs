//! Mutable state of one run: cursor, facing direction and tape

use crate::grid::position::{Direction, Position};
use crate::memory::tape::{MemoryTape, TapePolicy};
use std::fmt;

/// Cursor and memory of the automaton
#[derive(Debug, Clone)]
pub struct ExecutionState {
    pub position: Position,
    pub direction: Direction,
    pub tape: MemoryTape,
}

impl ExecutionState {
    pub fn new(size: usize, policy: TapePolicy) -> Self {
        ExecutionState {
            position: Position::start(size),
            direction: Direction::Right,
            tape: MemoryTape::new(policy),
        }
    }

    /// Back to the start position facing right with a clean tape
    ///
    /// Returns the number of tape cells that had to be cleared.
    pub fn reset(&mut self, size: usize) -> usize {
        self.position = Position::start(size);
        self.direction = Direction::Right;
        self.tape.clear()
    }

    pub fn pointer(&self) -> isize {
        self.tape.pointer()
    }

    /// Turn in front of a `Branch`: clockwise on a non-zero cell, else counter-clockwise
    pub fn turn(&mut self) {
        self.direction = if self.tape.read() != 0 {
            self.direction.clockwise()
        } else {
            self.direction.counter_clockwise()
        };
    }

    /// Tape operation of an `Operator` entered while facing `self.direction`
    pub fn apply_operator(&mut self) {
        match self.direction {
            Direction::Up => self.tape.move_left(),
            Direction::Right => self.tape.increment(),
            Direction::Down => self.tape.move_right(),
            Direction::Left => self.tape.decrement(),
        }
    }

    /// Tape values within `radius` cells of the pointer
    pub fn tape_window(&self, radius: usize) -> Vec<i32> {
        let r = radius as isize;
        let p = self.pointer();
        self.tape.values(p - r..=p + r)
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pos={} facing {} pointer={} value={}",
            self.position,
            self.direction,
            self.pointer(),
            self.tape.read()
        )
    }
}
