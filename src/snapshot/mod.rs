// Snapshot recording for step-by-step replay

use crate::grid::position::{Direction, Position};
use crate::grid::Grid;
use crate::interpreter::constants::TAPE_WINDOW_RADIUS;
use crate::interpreter::engine::{Interpreter, Outcome, StepEvent};
use crate::interpreter::errors::SnapshotLimitExceeded;
use rustc_hash::FxHashMap;

/// Snapshot of execution state after one transition
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Transition index; `None` for the state before the first step
    pub step: Option<u64>,
    pub event: Option<StepEvent>,
    pub position: Position,
    pub direction: Direction,
    pub pointer: isize,
    /// Tape cells `pointer - TAPE_WINDOW_RADIUS ..= pointer + TAPE_WINDOW_RADIUS`
    pub tape_window: Vec<i32>,
    /// Length of the run's visited list at this point
    pub visited_count: usize,
}

impl Snapshot {
    pub fn capture(interpreter: &Interpreter, event: Option<StepEvent>) -> Self {
        let state = interpreter.state();
        Snapshot {
            step: event.map(|_| interpreter.steps_taken().saturating_sub(1)),
            event,
            position: state.position,
            direction: state.direction,
            pointer: state.pointer(),
            tape_window: state.tape_window(TAPE_WINDOW_RADIUS),
            visited_count: interpreter.visited_addresses().len(),
        }
    }

    /// Estimate the memory usage of this snapshot in bytes
    pub fn estimated_size(&self) -> usize {
        std::mem::size_of::<Snapshot>() + self.tape_window.len() * std::mem::size_of::<i32>()
    }

    /// Address of the first tape cell in `tape_window`
    pub fn window_start(&self) -> isize {
        self.pointer - TAPE_WINDOW_RADIUS as isize
    }
}

/// Recorded history of one run
#[derive(Debug)]
pub struct SnapshotManager {
    grid: Grid,
    snapshots: Vec<Snapshot>,
    visited: Vec<usize>,
    outcome: Option<Outcome>,
    truncated: bool,
    max_memory: usize,
    current_memory: usize,
}

impl SnapshotManager {
    pub fn new(max_memory: usize) -> Self {
        SnapshotManager {
            grid: Grid::blank(1),
            snapshots: Vec::new(),
            visited: Vec::new(),
            outcome: None,
            truncated: false,
            max_memory,
            current_memory: 0,
        }
    }

    /// Drop all history and start recording a run of `grid`
    pub fn reset(&mut self, grid: &Grid) {
        self.grid.clone_from(grid);
        self.snapshots.clear();
        self.visited.clear();
        self.outcome = None;
        self.truncated = false;
        self.current_memory = 0;
    }

    /// Add a snapshot to history
    pub fn push(&mut self, snapshot: Snapshot) -> Result<(), SnapshotLimitExceeded> {
        let snapshot_size = snapshot.estimated_size();

        if self.current_memory + snapshot_size > self.max_memory {
            self.truncated = true;
            return Err(SnapshotLimitExceeded {
                current: self.current_memory,
                limit: self.max_memory,
            });
        }

        self.current_memory += snapshot_size;
        self.snapshots.push(snapshot);
        Ok(())
    }

    /// Store the run's verdict and visited cells
    pub fn finish(&mut self, outcome: Outcome, visited: &[usize]) {
        self.outcome = Some(outcome);
        self.visited.clear();
        self.visited.extend_from_slice(visited);
    }

    /// Get a snapshot by index
    pub fn get(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Whether the memory limit cut the recording short
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// Grid addresses read by the run, in order of first read
    pub fn visited(&self) -> &[usize] {
        &self.visited
    }

    /// How often the cursor stood on each cell up to snapshot `index`
    pub fn visit_counts(&self, index: usize) -> FxHashMap<usize, u32> {
        let mut tally = VisitTally::default();
        tally.seek(self, index);
        tally.counts
    }

    pub fn memory_usage(&self) -> usize {
        self.current_memory
    }

    pub fn memory_limit(&self) -> usize {
        self.max_memory
    }
}

/// Visit counts that follow a cursor through a recorded history
///
/// Moving the cursor by `d` snapshots costs `O(d)`, so stepping through a long
/// trace does not rescan it on every frame.
#[derive(Debug, Default)]
pub struct VisitTally {
    counts: FxHashMap<usize, u32>,
    /// Number of leading snapshots included in `counts`
    counted: usize,
}

impl VisitTally {
    /// Counts for snapshots `0..=index` of `trace`
    pub fn seek(&mut self, trace: &SnapshotManager, index: usize) -> &FxHashMap<usize, u32> {
        let target = index.saturating_add(1).min(trace.len());
        if self.counted > trace.len() || self.counted.abs_diff(target) > target {
            self.counts.clear();
            self.counted = 0;
        }

        while self.counted < target {
            if let Some(address) = trace.snapshots[self.counted].position.address() {
                *self.counts.entry(address).or_insert(0) += 1;
            }
            self.counted += 1;
        }
        while self.counted > target {
            self.counted -= 1;
            if let Some(address) = trace.snapshots[self.counted].position.address() {
                if let Some(count) = self.counts.get_mut(&address) {
                    *count -= 1;
                    if *count == 0 {
                        self.counts.remove(&address);
                    }
                }
            }
        }
        &self.counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::parse::parse_grid;
    use crate::interpreter::engine::RunConfig;

    fn recorded(text: &str) -> SnapshotManager {
        let grid = parse_grid(text).unwrap();
        let mut interpreter = Interpreter::new(grid.size(), RunConfig::default());
        interpreter.reset(&grid);
        let mut trace = SnapshotManager::new(1 << 20);
        interpreter.execute_recorded(100, &mut trace);
        trace
    }

    #[test]
    fn test_tally_matches_full_count_in_any_order() {
        let trace = recorded("*+.\n*..\n...");
        let mut tally = VisitTally::default();
        for index in [0, 3, 1, 4, 4, 2, 0, 10] {
            assert_eq!(tally.seek(&trace, index), &trace.visit_counts(index));
        }
        // Steps 0 and 1 land on (0,0) and (0,1)
        assert_eq!(trace.visit_counts(2).get(&0), Some(&1));
        assert_eq!(trace.visit_counts(2).get(&3), Some(&1));
        assert_eq!(trace.visit_counts(0).len(), 0);
    }

    #[test]
    fn test_tally_follows_a_new_trace() {
        let long = recorded("*+.\n*..\n...");
        let short = recorded(" ");
        let mut tally = VisitTally::default();
        tally.seek(&long, 4);
        assert_eq!(tally.seek(&short, 4), &short.visit_counts(4));
    }
}
