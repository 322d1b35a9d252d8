// Integration tests for the grid interpreter

use std::path::PathBuf;

use gridbeaver::grid::parse::{parse_grid, read_grid};
use gridbeaver::grid::Grid;
use gridbeaver::interpreter::detector::{
    DetectionConfig, IdenticalState, LoopDetector, MonotonicGrowth,
};
use gridbeaver::interpreter::engine::{Interpreter, Outcome, RunConfig, StepEvent};
use gridbeaver::interpreter::errors::{Indeterminate, TapeError};
use gridbeaver::memory::tape::{MemoryTape, TapePolicy};
use gridbeaver::snapshot::SnapshotManager;

fn sample(name: &str) -> Grid {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("grids")
        .join(name);
    read_grid(&path).expect("sample grid should load")
}

fn execute(grid: &Grid, config: RunConfig, max_steps: u64) -> Outcome {
    let mut interpreter = Interpreter::new(grid.size(), config);
    interpreter.reset(grid);
    interpreter.execute(max_steps)
}

#[test]
fn test_blank_grid_walks_straight_out() {
    let grid = sample("blank4.txt");
    let mut interpreter = Interpreter::new(4, RunConfig::default());
    interpreter.reset(&grid);

    assert_eq!(interpreter.state().position.x, -1);
    assert_eq!(interpreter.state().position.y, 0);
    assert_eq!(interpreter.execute(10_000), Outcome::Finite(4));
    assert_eq!(interpreter.visited_addresses(), &[0, 1, 2, 3]);
}

#[test]
fn test_stationary_loop_is_infinite() {
    let grid = sample("loop4.txt");
    assert_eq!(execute(&grid, RunConfig::default(), 10_000), Outcome::Infinite);

    // Either heuristic recognises a loop that leaves the tape untouched
    let config = RunConfig::default();
    let mut interpreter = Interpreter::with_detector(
        5,
        config,
        LoopDetector::with_heuristics(config.detection, vec![Box::new(IdenticalState)]),
    );
    interpreter.reset(&grid);
    assert_eq!(interpreter.execute(10_000), Outcome::Infinite);
    assert_eq!(interpreter.steps_taken(), 41);
}

#[test]
fn test_growing_counter_needs_monotonic_heuristic() {
    let grid = sample("growth.txt");
    let config = RunConfig::default();

    let mut interpreter = Interpreter::with_detector(
        5,
        config,
        LoopDetector::with_heuristics(config.detection, vec![Box::new(MonotonicGrowth::default())]),
    );
    interpreter.reset(&grid);
    assert_eq!(interpreter.execute(10_000), Outcome::Infinite);
    assert_eq!(interpreter.steps_taken(), 52);

    // The counter never repeats, so exact matching falls through to the budget
    let mut interpreter = Interpreter::with_detector(
        5,
        config,
        LoopDetector::with_heuristics(config.detection, vec![Box::new(IdenticalState)]),
    );
    interpreter.reset(&grid);
    assert_eq!(
        interpreter.execute(6_000),
        Outcome::Error(Indeterminate::BudgetExhausted { max_steps: 6_000 })
    );
}

#[test]
fn test_tape_overflow_is_indeterminate() {
    let grid = sample("overflow.txt");
    assert_eq!(execute(&grid, RunConfig::default(), 100), Outcome::Finite(3));

    let config = RunConfig {
        tape: TapePolicy {
            capacity: 2,
            value_limit: None,
        },
        ..RunConfig::default()
    };
    assert_eq!(
        execute(&grid, config, 100),
        Outcome::Error(Indeterminate::Overflow(TapeError::PointerOutOfBounds {
            pointer: 2,
            capacity: 2
        }))
    );
}

#[test]
fn test_value_saturation_is_indeterminate() {
    let grid = parse_grid("*").unwrap();
    let config = RunConfig {
        tape: TapePolicy {
            value_limit: Some(1),
            ..TapePolicy::default()
        },
        ..RunConfig::default()
    };
    assert_eq!(
        execute(&grid, config, 100),
        Outcome::Error(Indeterminate::Overflow(TapeError::ValueSaturated {
            value: 1,
            limit: 1
        }))
    );
}

#[test]
fn test_budget_exhaustion_without_detection() {
    let grid = sample("loop4.txt");
    let config = RunConfig {
        detection: DetectionConfig::disabled(),
        ..RunConfig::default()
    };
    assert_eq!(
        execute(&grid, config, 500),
        Outcome::Error(Indeterminate::BudgetExhausted { max_steps: 500 })
    );
}

#[test]
fn test_reset_reuses_interpreter() {
    let mut interpreter = Interpreter::new(5, RunConfig::default());

    interpreter.reset(&sample("loop4.txt"));
    assert_eq!(interpreter.execute(10_000), Outcome::Infinite);

    // Nothing of the looping run leaks into the next one
    interpreter.reset(&Grid::blank(5));
    assert_eq!(interpreter.execute(100), Outcome::Finite(5));
    assert_eq!(interpreter.visited_addresses(), &[0, 1, 2, 3, 4]);
    assert_eq!(interpreter.state().tape.read(), 0);
}

#[test]
fn test_clear_cost_follows_footprint() {
    let policy = TapePolicy {
        capacity: 65_536,
        value_limit: None,
    };

    let mut small = MemoryTape::new(policy);
    small.increment();
    small.move_right();
    small.increment();
    assert_eq!(small.clear(), 2);

    let mut wide = MemoryTape::new(policy);
    for _ in 0..19_999 {
        wide.increment();
        wide.move_right();
    }
    assert_eq!(wide.clear(), 20_000);
    assert_eq!(wide.value_at(wide.origin() + 5), 0);

    // The interpreter reports the cost of clearing the previous run
    let grid = sample("overflow.txt");
    let mut interpreter = Interpreter::new(3, RunConfig::default());
    interpreter.reset(&grid);
    interpreter.execute(100);
    interpreter.reset(&grid);
    assert_eq!(interpreter.last_clear_cost(), 2);
}

#[test]
fn test_recorded_trace_matches_run() {
    let grid = sample("overflow.txt");
    let mut interpreter = Interpreter::new(3, RunConfig::default());
    interpreter.reset(&grid);
    let mut trace = SnapshotManager::new(1 << 20);
    let outcome = interpreter.execute_recorded(100, &mut trace);

    assert_eq!(outcome, Outcome::Finite(3));
    assert_eq!(trace.outcome(), Some(outcome));
    assert_eq!(trace.len(), 5);
    assert_eq!(trace.visited(), &[0, 1, 3, 6]);
    assert_eq!(trace.get(0).and_then(|s| s.step), None);
    assert_eq!(trace.get(4).and_then(|s| s.event), Some(StepEvent::Exited));

    // After step 0 the pointer cell holds 1
    let first = trace.get(1).unwrap();
    assert_eq!(first.tape_window[first.tape_window.len() / 2], 1);
    assert_eq!(trace.visit_counts(4).get(&0), Some(&1));
}

#[test]
fn test_trace_truncates_at_memory_limit() {
    let grid = sample("loop4.txt");
    let mut interpreter = Interpreter::new(5, RunConfig::default());
    interpreter.reset(&grid);
    let mut trace = SnapshotManager::new(1_000);
    let outcome = interpreter.execute_recorded(10_000, &mut trace);

    assert_eq!(outcome, Outcome::Infinite);
    assert!(trace.is_truncated());
    assert!(trace.memory_usage() <= trace.memory_limit());
    assert!(trace.len() < 42);
}

#[test]
fn test_reused_trace_records_only_the_latest_run() {
    let first = sample("overflow.txt");
    let second = Grid::blank(3);
    let mut interpreter = Interpreter::new(3, RunConfig::default());
    let mut trace = SnapshotManager::new(1 << 20);

    interpreter.reset(&first);
    interpreter.execute_recorded(100, &mut trace);
    assert_eq!(trace.len(), 5);

    interpreter.reset(&second);
    let outcome = interpreter.execute_recorded(100, &mut trace);
    assert_eq!(outcome, Outcome::Finite(3));
    assert_eq!(trace.grid(), &second);
    assert_eq!(trace.len(), 5);
    assert_eq!(trace.get(0).and_then(|s| s.step), None);
    assert_eq!(trace.visited(), &[0, 1, 2]);
    assert_eq!(trace.outcome(), Some(outcome));
}
