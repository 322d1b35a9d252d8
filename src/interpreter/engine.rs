// Execution engine for the grid interpreter

use crate::grid::position::Position;
use crate::grid::{Grid, Symbol};
use crate::interpreter::constants::{DEFAULT_TRACE_DELAY_MS, TAPE_WINDOW_RADIUS};
use crate::interpreter::detector::{DetectionConfig, LoopDetector};
use crate::interpreter::errors::{Indeterminate, TapeError};
use crate::interpreter::state::ExecutionState;
use crate::memory::tape::TapePolicy;
use crate::snapshot::{Snapshot, SnapshotManager};
use std::fmt;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Knobs of a single interpreter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunConfig {
    /// 0 is silent; above 0 every step is logged and followed by `trace_delay`
    pub verbosity: u8,
    pub trace_delay: Duration,
    pub detection: DetectionConfig,
    pub tape: TapePolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            verbosity: 0,
            trace_delay: Duration::from_millis(DEFAULT_TRACE_DELAY_MS),
            detection: DetectionConfig::default(),
            tape: TapePolicy::default(),
        }
    }
}

/// Where the run's state machine currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running,
    /// The cursor left the grid on the transition with this index
    Halted(u64),
    LoopDetected,
    Overflow(TapeError),
}

/// What a single transition did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepEvent {
    /// The cursor entered a cell
    Moved,
    /// The cursor left the grid
    Exited,
    /// The tape left its bounds
    Overflow(TapeError),
    /// Branches on all four sides; the cursor turns forever
    Spin,
}

/// Verdict of one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Halted; the exit happened on transition `steps` (counting from zero)
    Finite(u64),
    /// A loop heuristic fired
    Infinite,
    /// Overflow or budget exhaustion; no verdict
    Error(Indeterminate),
}

impl Outcome {
    pub fn is_finite(&self) -> bool {
        matches!(self, Outcome::Finite(_))
    }

    pub fn steps(&self) -> Option<u64> {
        match self {
            Outcome::Finite(steps) => Some(*steps),
            _ => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Finite(steps) => write!(f, "finite after {} steps", steps),
            Outcome::Infinite => write!(f, "infinite"),
            Outcome::Error(reason) => write!(f, "error ({})", reason),
        }
    }
}

/// Runs one grid at a time
///
/// The interpreter keeps its own copy of the grid, so the caller is free to
/// advance its grid as soon as [`Interpreter::reset`] returns.
pub struct Interpreter {
    config: RunConfig,
    grid: Grid,
    state: ExecutionState,
    detector: LoopDetector,
    run_state: RunState,

    /// Transitions performed since the last reset
    steps: u64,

    /// Distinct cell addresses read, in order of first read
    visited: Vec<usize>,
    visited_mask: Vec<bool>,

    /// Tape cells cleared by the last reset
    last_clear: usize,
}

impl Interpreter {
    /// Interpreter for `size`×`size` grids with both loop heuristics
    pub fn new(size: usize, config: RunConfig) -> Self {
        Interpreter::with_detector(size, config, LoopDetector::new(config.detection))
    }

    /// Interpreter with a custom detector
    pub fn with_detector(size: usize, config: RunConfig, detector: LoopDetector) -> Self {
        let grid = Grid::blank(size);
        Interpreter {
            config,
            state: ExecutionState::new(size, config.tape),
            visited_mask: vec![false; grid.cell_count()],
            grid,
            detector,
            run_state: RunState::Running,
            steps: 0,
            visited: Vec::new(),
            last_clear: 0,
        }
    }

    /// Prepare a fresh run of `grid`
    pub fn reset(&mut self, grid: &Grid) {
        self.grid.clone_from(grid);
        if self.visited_mask.len() != grid.cell_count() {
            self.visited_mask = vec![false; grid.cell_count()];
        } else {
            for &address in &self.visited {
                self.visited_mask[address] = false;
            }
        }
        self.visited.clear();
        self.last_clear = self.state.reset(grid.size());
        self.detector.reset();
        self.run_state = RunState::Running;
        self.steps = 0;
    }

    /// Look up a cell and remember that the run depends on it
    fn read(&mut self, position: Position) -> Symbol {
        let symbol = self.grid.get(position);
        if let Some(address) = position.address() {
            if !self.visited_mask[address] {
                self.visited_mask[address] = true;
                self.visited.push(address);
            }
        }
        symbol
    }

    /// Perform one transition
    ///
    /// Turning in front of branches is part of the same transition. Once the
    /// run has halted or overflowed, further calls repeat that event.
    pub fn step(&mut self) -> StepEvent {
        match self.run_state {
            RunState::Halted(_) => return StepEvent::Exited,
            RunState::Overflow(err) => return StepEvent::Overflow(err),
            RunState::Running | RunState::LoopDetected => {}
        }
        let index = self.steps;
        self.steps += 1;

        let mut turns = 0;
        let (target, symbol) = loop {
            let Some(next) = self.state.position.moved(self.state.direction) else {
                self.run_state = RunState::Halted(index);
                return StepEvent::Exited;
            };
            let symbol = self.read(next);
            if symbol != Symbol::Branch {
                break (next, symbol);
            }
            self.state.turn();
            turns += 1;
            // The tape cannot change while turning, so four turns repeat forever
            if turns == 4 {
                self.run_state = RunState::LoopDetected;
                return StepEvent::Spin;
            }
        };

        self.state.position = target;
        if symbol == Symbol::Operator {
            self.state.apply_operator();
            if let Err(err) = self.state.tape.check() {
                self.run_state = RunState::Overflow(err);
                return StepEvent::Overflow(err);
            }
        }
        StepEvent::Moved
    }

    /// Run until a verdict or `max_steps` transitions
    pub fn execute(&mut self, max_steps: u64) -> Outcome {
        self.drive(max_steps, |_, _| {})
    }

    /// Like [`Interpreter::execute`], recording a snapshot of every state
    ///
    /// A run that has not stepped yet, or a trace of another grid, starts a
    /// fresh recording. Recording stops quietly once the manager's memory
    /// limit is reached.
    pub fn execute_recorded(&mut self, max_steps: u64, trace: &mut SnapshotManager) -> Outcome {
        if self.steps == 0 || trace.is_empty() || trace.grid() != &self.grid {
            trace.reset(&self.grid);
            if let Err(err) = trace.push(Snapshot::capture(self, None)) {
                warn!(%err, "trace truncated");
            }
        }
        let outcome = self.drive(max_steps, |interpreter, event| {
            if trace.is_truncated() {
                return;
            }
            if let Err(err) = trace.push(Snapshot::capture(interpreter, Some(event))) {
                warn!(%err, "trace truncated");
            }
        });
        trace.finish(outcome, &self.visited);
        outcome
    }

    fn drive<F>(&mut self, max_steps: u64, mut on_step: F) -> Outcome
    where
        F: FnMut(&Self, StepEvent),
    {
        for _ in 0..max_steps {
            let step = self.steps;
            let event = self.step();
            on_step(self, event);
            if self.config.verbosity > 0 {
                self.trace_step(step, event);
            }

            match event {
                StepEvent::Moved => {}
                StepEvent::Exited => {
                    let at = match self.run_state {
                        RunState::Halted(at) => at,
                        _ => step,
                    };
                    return Outcome::Finite(at);
                }
                StepEvent::Overflow(err) => {
                    if self.config.verbosity > 0 {
                        debug!(step, %err, "overflow detected");
                    }
                    return Outcome::Error(Indeterminate::Overflow(err));
                }
                StepEvent::Spin => return Outcome::Infinite,
            }

            if let Some(heuristic) = self.detector.observe(step, &self.state) {
                if self.config.verbosity > 0 {
                    debug!(step, heuristic, "loop detected\n{}", self.grid);
                }
                self.run_state = RunState::LoopDetected;
                return Outcome::Infinite;
            }
        }
        Outcome::Error(Indeterminate::BudgetExhausted { max_steps })
    }

    fn trace_step(&self, step: u64, event: StepEvent) {
        debug!(
            step,
            ?event,
            state = %self.state,
            tape = ?self.state.tape_window(TAPE_WINDOW_RADIUS),
            "\n{}",
            self.grid.render_with_cursor(Some(self.state.position))
        );
        thread::sleep(self.config.trace_delay);
    }

    // ========== Getter methods ==========

    /// Distinct grid addresses read by the current run, in order of first read
    pub fn visited_addresses(&self) -> &[usize] {
        &self.visited
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> &ExecutionState {
        &self.state
    }

    pub fn run_state(&self) -> RunState {
        self.run_state
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Transitions performed since the last reset
    pub fn steps_taken(&self) -> u64 {
        self.steps
    }

    /// Tape cells the last reset had to clear
    pub fn last_clear_cost(&self) -> usize {
        self.last_clear
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse::parse_grid;

    fn run(text: &str, max_steps: u64) -> (Outcome, Vec<usize>) {
        let grid = parse_grid(text).unwrap();
        let mut interpreter = Interpreter::new(grid.size(), RunConfig::default());
        interpreter.reset(&grid);
        let outcome = interpreter.execute(max_steps);
        (outcome, interpreter.visited_addresses().to_vec())
    }

    #[test]
    fn test_blank_row_walk() {
        let (outcome, visited) = run("   \n   \n   ", 100);
        assert_eq!(outcome, Outcome::Finite(3));
        assert_eq!(visited, vec![0, 1, 2]);
    }

    #[test]
    fn test_branch_on_zero_turns_left() {
        let (outcome, visited) = run(" + \n   \n   ", 100);
        // Turning up from the top row exits immediately
        assert_eq!(outcome, Outcome::Finite(1));
        assert_eq!(visited, vec![0, 1]);
    }

    #[test]
    fn test_branch_on_nonzero_turns_right() {
        let (outcome, visited) = run("*+ \n   \n   ", 100);
        assert_eq!(outcome, Outcome::Finite(3));
        assert_eq!(visited, vec![0, 1, 3, 6]);
    }

    #[test]
    fn test_operator_directions() {
        let grid = parse_grid("*+ \n*  \n   ").unwrap();
        let mut interpreter = Interpreter::new(3, RunConfig::default());
        interpreter.reset(&grid);
        let origin = interpreter.state().pointer();

        assert_eq!(interpreter.step(), StepEvent::Moved);
        assert_eq!(interpreter.state().tape.read(), 1);

        // Entering (0, 1) facing down moves the pointer right
        assert_eq!(interpreter.step(), StepEvent::Moved);
        assert_eq!(interpreter.state().pointer(), origin + 1);
        assert_eq!(interpreter.state().tape.read(), 0);
    }

    #[test]
    fn test_step_after_halt_repeats_exit() {
        let grid = Grid::blank(1);
        let mut interpreter = Interpreter::new(1, RunConfig::default());
        interpreter.reset(&grid);
        assert_eq!(interpreter.step(), StepEvent::Moved);
        assert_eq!(interpreter.step(), StepEvent::Exited);
        assert_eq!(interpreter.run_state(), RunState::Halted(1));
        assert_eq!(interpreter.step(), StepEvent::Exited);
        assert_eq!(interpreter.steps_taken(), 2);
    }
}
