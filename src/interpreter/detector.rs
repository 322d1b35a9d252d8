//! Heuristic loop detection
//!
//! The interpreter cannot run a candidate forever to learn that it never
//! halts. Instead it hands every post-step state to a [`LoopDetector`], which
//! compares the live state against a [`Baseline`] saved at the previous
//! checkpoint.
//!
//! # Checkpoint Schedule
//!
//! The first baseline is taken at `start_step`. After each failed check the
//! next checkpoint is placed `period` steps later and `period` grows by one,
//! so a cycle of length `L` is compared against a baseline exactly `L` steps
//! old once `period` reaches `L`. Detection overhead is quadratic in the number
//! of checkpoints rather than linear in the budget. No checkpoints happen past
//! `stop_step`.
//!
//! # Heuristics
//!
//! - [`IdenticalState`]: the state repeated, up to a constant shift of the tape
//! - [`MonotonicGrowth`]: the cursor is back where it was and every tape cell
//!   it used moved away from zero
//!
//! Both are incomplete. Silence proves nothing; the step budget is the backstop.

use crate::grid::position::{Direction, Position};
use crate::interpreter::constants::{DEFAULT_DETECTION_START, DEFAULT_DETECTION_STOP};
use crate::interpreter::state::ExecutionState;
use std::ops::RangeInclusive;

/// When the detector checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectionConfig {
    /// Step of the first baseline
    pub start_step: u64,
    /// Last step at which a checkpoint may happen
    pub stop_step: u64,
}

impl DetectionConfig {
    /// A schedule that never checks; runs end by exit, overflow or budget
    pub fn disabled() -> Self {
        DetectionConfig {
            start_step: u64::MAX,
            stop_step: 0,
        }
    }
}

impl Default for DetectionConfig {
    fn default() -> Self {
        DetectionConfig {
            start_step: DEFAULT_DETECTION_START,
            stop_step: DEFAULT_DETECTION_STOP,
        }
    }
}

/// State saved at a checkpoint
///
/// Besides the cursor and a copy of the tape's dirty range, the baseline
/// tracks the range of addresses the pointer has visited since it was taken.
#[derive(Debug, Clone)]
pub struct Baseline {
    pub position: Position,
    pub direction: Direction,
    pub pointer: isize,
    tape_start: isize,
    values: Vec<i32>,
    low: isize,
    high: isize,
}

impl Baseline {
    pub fn capture(state: &ExecutionState) -> Self {
        let mut baseline = Baseline {
            position: state.position,
            direction: state.direction,
            pointer: state.pointer(),
            tape_start: 0,
            values: Vec::new(),
            low: 0,
            high: 0,
        };
        baseline.recapture(state);
        baseline
    }

    /// Overwrite with `state`, reusing the value buffer
    pub fn recapture(&mut self, state: &ExecutionState) {
        self.position = state.position;
        self.direction = state.direction;
        self.pointer = state.pointer();
        let dirty = state.tape.dirty_range();
        self.tape_start = *dirty.start() as isize;
        self.values.clear();
        self.values
            .extend(dirty.map(|address| state.tape.value_at(address as isize)));
        self.low = self.pointer;
        self.high = self.pointer;
    }

    /// Tape value at the checkpoint; zero outside the copied range
    pub fn value_at(&self, address: isize) -> i32 {
        usize::try_from(address - self.tape_start)
            .ok()
            .and_then(|i| self.values.get(i))
            .copied()
            .unwrap_or(0)
    }

    /// Addresses the pointer has visited since the checkpoint
    pub fn window(&self) -> RangeInclusive<isize> {
        self.low..=self.high
    }

    pub fn widen(&mut self, pointer: isize) {
        self.low = self.low.min(pointer);
        self.high = self.high.max(pointer);
    }
}

/// One way of recognising a non-halting run
pub trait LoopHeuristic {
    fn name(&self) -> &'static str;

    /// A new baseline was taken
    fn start(&mut self, baseline: &Baseline, state: &ExecutionState);

    /// Called with every post-step state between checkpoints
    fn observe(&mut self, state: &ExecutionState);

    /// Whether the run since `baseline` proves the run never halts
    fn detect(&self, baseline: &Baseline, state: &ExecutionState) -> bool;
}

/// Cursor and facing repeat, and the tape the cycle used reappears shifted by
/// the net pointer displacement
#[derive(Debug, Default, Clone, Copy)]
pub struct IdenticalState;

impl LoopHeuristic for IdenticalState {
    fn name(&self) -> &'static str {
        "identical state"
    }

    fn start(&mut self, _baseline: &Baseline, _state: &ExecutionState) {}

    fn observe(&mut self, _state: &ExecutionState) {}

    fn detect(&self, baseline: &Baseline, state: &ExecutionState) -> bool {
        if state.position != baseline.position || state.direction != baseline.direction {
            return false;
        }
        // The next cycle reads window + offset, which must look like the window did.
        let offset = state.pointer() - baseline.pointer;
        baseline
            .window()
            .all(|address| state.tape.value_at(address + offset) == baseline.value_at(address))
    }
}

/// Cursor and pointer repeat, no used cell was ever zero, and every used cell
/// kept its value or grew away from zero
///
/// Branches only test for zero, so the next cycle makes the same turns and
/// pushes the same cells further out.
#[derive(Debug, Default, Clone, Copy)]
pub struct MonotonicGrowth {
    touched_zero: bool,
}

impl LoopHeuristic for MonotonicGrowth {
    fn name(&self) -> &'static str {
        "monotonic growth"
    }

    fn start(&mut self, _baseline: &Baseline, state: &ExecutionState) {
        self.touched_zero = state.tape.read() == 0;
    }

    fn observe(&mut self, state: &ExecutionState) {
        if state.tape.read() == 0 {
            self.touched_zero = true;
        }
    }

    fn detect(&self, baseline: &Baseline, state: &ExecutionState) -> bool {
        if self.touched_zero
            || state.position != baseline.position
            || state.direction != baseline.direction
            || state.pointer() != baseline.pointer
        {
            return false;
        }
        baseline.window().all(|address| {
            let live = state.tape.value_at(address) as i64;
            let delta = live - baseline.value_at(address) as i64;
            delta == 0 || delta.signum() == live.signum()
        })
    }
}

/// Checkpoint scheduler over a set of heuristics, OR-combined
pub struct LoopDetector {
    config: DetectionConfig,
    heuristics: Vec<Box<dyn LoopHeuristic>>,
    baseline: Option<Baseline>,
    armed: bool,
    next_checkpoint: u64,
    period: u64,
}

impl LoopDetector {
    /// Detector running both built-in heuristics
    pub fn new(config: DetectionConfig) -> Self {
        LoopDetector::with_heuristics(
            config,
            vec![
                Box::new(IdenticalState),
                Box::new(MonotonicGrowth::default()),
            ],
        )
    }

    pub fn with_heuristics(
        config: DetectionConfig,
        heuristics: Vec<Box<dyn LoopHeuristic>>,
    ) -> Self {
        LoopDetector {
            config,
            heuristics,
            baseline: None,
            armed: false,
            next_checkpoint: config.start_step,
            period: 0,
        }
    }

    pub fn config(&self) -> DetectionConfig {
        self.config
    }

    /// Restart the schedule; the old baseline is ignored until recaptured
    pub fn reset(&mut self) {
        self.armed = false;
        self.next_checkpoint = self.config.start_step;
        self.period = 0;
    }

    /// Step at which the next comparison happens
    pub fn next_checkpoint(&self) -> u64 {
        self.next_checkpoint
    }

    /// Feed the state after transition `step`
    ///
    /// Returns the name of the heuristic that recognised a loop, if any.
    pub fn observe(&mut self, step: u64, state: &ExecutionState) -> Option<&'static str> {
        if step > self.config.stop_step {
            return None;
        }
        if self.armed {
            if let Some(baseline) = self.baseline.as_mut() {
                baseline.widen(state.pointer());
            }
            for heuristic in &mut self.heuristics {
                heuristic.observe(state);
            }
        }
        if step != self.next_checkpoint {
            return None;
        }

        if self.armed {
            if let Some(baseline) = self.baseline.as_ref() {
                if let Some(heuristic) = self.heuristics.iter().find(|h| h.detect(baseline, state)) {
                    return Some(heuristic.name());
                }
            }
        }

        let baseline = self
            .baseline
            .get_or_insert_with(|| Baseline::capture(state));
        baseline.recapture(state);
        for heuristic in &mut self.heuristics {
            heuristic.start(baseline, state);
        }
        self.armed = true;
        self.period += 1;
        self.next_checkpoint = step + self.period;
        None
    }
}
