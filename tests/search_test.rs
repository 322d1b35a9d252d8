// Integration tests for enumeration and the search driver

use std::collections::HashSet;

use gridbeaver::grid::{space_size, Grid};
use gridbeaver::interpreter::detector::DetectionConfig;
use gridbeaver::interpreter::engine::{Interpreter, Outcome, RunConfig};
use gridbeaver::search::{Enumerator, Policy, Search, SearchConfig};

fn search(size: usize, policy: Policy, max_steps: u64) -> gridbeaver::search::SearchReport {
    Search::new(SearchConfig {
        size,
        max_steps,
        policy,
        ..SearchConfig::default()
    })
    .run()
}

#[test]
fn test_full_odometer_visits_every_grid_once() {
    let enumerator = Enumerator::new(3, Policy::Full);
    let mut grid = enumerator.first_candidate();
    let mut seen = HashSet::new();

    loop {
        assert!(seen.insert(grid.clone()), "grid repeated:\n{}", grid);
        enumerator.advance(&mut grid, &[]);
        if enumerator.is_initial(&grid) {
            break;
        }
    }
    assert_eq!(seen.len(), 19_683);
    assert_eq!(Some(seen.len() as u128), space_size(3));
}

#[test]
fn test_full_order_matches_index() {
    let enumerator = Enumerator::new(2, Policy::Full);
    let mut grid = enumerator.first_candidate();
    for expected in 0..81u128 {
        assert_eq!(grid.index(), Some(expected));
        assert_eq!(Grid::from_index(2, expected), grid);
        enumerator.advance(&mut grid, &[]);
    }
    assert!(enumerator.is_initial(&grid));
}

#[test]
fn test_coverage_sums_to_space_under_every_policy() {
    for size in 1..=3 {
        for policy in [Policy::Full, Policy::Visited, Policy::Prefix] {
            let report = search(size, policy, 500);
            assert!(report.completed, "{:?} did not finish for size {}", policy, size);
            assert_eq!(
                Some(report.stats.covered),
                space_size(size),
                "{:?} coverage for size {}",
                policy,
                size
            );
        }
    }
}

#[test]
fn test_pruned_search_finds_full_best() {
    let full = search(3, Policy::Full, 500);
    let visited = search(3, Policy::Visited, 500);
    let prefix = search(3, Policy::Prefix, 500);

    let best = full.best.as_ref().map(|b| b.steps);
    assert!(best.is_some());
    assert_eq!(visited.best.as_ref().map(|b| b.steps), best);
    assert_eq!(prefix.best.as_ref().map(|b| b.steps), best);

    // Pruning evaluates far fewer grids for the same answer
    assert_eq!(full.stats.candidates, 19_683);
    assert!(visited.stats.candidates <= prefix.stats.candidates);
    assert!(prefix.stats.candidates < full.stats.candidates);
}

#[test]
fn test_best_grid_replays_to_its_step_count() {
    let report = search(3, Policy::Visited, 500);
    let best = report.best.expect("some 3×3 grid halts");

    let mut interpreter = Interpreter::new(3, RunConfig::default());
    interpreter.reset(&best.grid);
    assert_eq!(interpreter.execute(500), Outcome::Finite(best.steps));
}

#[test]
fn test_infinite_verdicts_never_halt() {
    let enumerator = Enumerator::new(3, Policy::Full);
    let mut grid = enumerator.first_candidate();
    let mut detecting = Interpreter::new(3, RunConfig::default());
    let mut plain = Interpreter::new(
        3,
        RunConfig {
            detection: DetectionConfig::disabled(),
            ..RunConfig::default()
        },
    );

    let mut infinite = 0;
    loop {
        detecting.reset(&grid);
        if detecting.execute(2_000) == Outcome::Infinite {
            infinite += 1;
            plain.reset(&grid);
            let outcome = plain.execute(2_000);
            assert!(!outcome.is_finite(), "detected loop halts:\n{}", grid);
        }
        enumerator.advance(&mut grid, &[]);
        if enumerator.is_initial(&grid) {
            break;
        }
    }
    assert!(infinite > 0);
}

#[test]
fn test_resume_from_index() {
    let start = space_size(2).unwrap() - 5;
    let report = Search::new(SearchConfig {
        size: 2,
        max_steps: 100,
        policy: Policy::Full,
        start: Some(start),
        ..SearchConfig::default()
    })
    .run();

    assert!(report.completed);
    assert_eq!(report.stats.candidates, 5);
    assert_eq!(report.stats.covered, 5);
}
