//! Exhaustive search for the longest-running halting grid
//!
//! [`Search`] walks the candidates produced by an [`Enumerator`], runs each
//! one on a single reused [`Interpreter`], and keeps the grid with the most
//! steps among the finite outcomes.

pub mod enumerate;

pub use enumerate::{Enumerator, Policy};

use crate::grid::{space_size, Grid};
use crate::interpreter::constants::DEFAULT_MAX_STEPS;
use crate::interpreter::engine::{Interpreter, Outcome, RunConfig};
use crate::interpreter::errors::Indeterminate;
use tracing::{debug, info};

/// Parameters of one search
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub size: usize,
    /// Step budget of each run
    pub max_steps: u64,
    pub policy: Policy,
    /// Base-3 index of the first candidate; `None` starts at the blank grid
    pub start: Option<u128>,
    /// Stop after this many candidates
    pub limit: Option<u64>,
    /// Log progress every this many candidates; 0 disables progress logs
    pub progress_every: u64,
    pub run: RunConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            size: 4,
            max_steps: DEFAULT_MAX_STEPS,
            policy: Policy::default(),
            start: None,
            limit: None,
            progress_every: 0,
            run: RunConfig::default(),
        }
    }
}

/// Longest halting grid found so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Best {
    pub grid: Grid,
    pub steps: u64,
    /// How many candidates had been evaluated before this one
    pub candidate: u64,
}

/// Verdict counts of a search
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub candidates: u64,
    pub finite: u64,
    pub infinite: u64,
    pub overflow: u64,
    pub exhausted: u64,
    /// Grids of the full space accounted for by the evaluated candidates
    pub covered: u128,
}

impl SearchStats {
    fn record(&mut self, outcome: Outcome) {
        self.candidates += 1;
        match outcome {
            Outcome::Finite(_) => self.finite += 1,
            Outcome::Infinite => self.infinite += 1,
            Outcome::Error(Indeterminate::Overflow(_)) => self.overflow += 1,
            Outcome::Error(Indeterminate::BudgetExhausted { .. }) => self.exhausted += 1,
        }
    }

    /// Candidates without a verdict
    pub fn errors(&self) -> u64 {
        self.overflow + self.exhausted
    }
}

/// Result of [`Search::run`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReport {
    pub stats: SearchStats,
    pub best: Option<Best>,
    /// The enumeration wrapped back to its initial grid
    pub completed: bool,
}

impl SearchReport {
    /// Share of the 3^(N²) grids covered, as a fraction
    pub fn coverage(&self, size: usize) -> f64 {
        match space_size(size) {
            Some(total) => self.stats.covered as f64 / total as f64,
            None => 0.0,
        }
    }
}

/// Search driver
pub struct Search {
    config: SearchConfig,
    enumerator: Enumerator,
    interpreter: Interpreter,
}

impl Search {
    pub fn new(config: SearchConfig) -> Self {
        Search {
            enumerator: Enumerator::new(config.size, config.policy),
            interpreter: Interpreter::new(config.size, config.run),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn run(&mut self) -> SearchReport {
        self.run_with(|_| {})
    }

    /// Run the search, calling `on_best` whenever the best grid improves
    pub fn run_with<F>(&mut self, mut on_best: F) -> SearchReport
    where
        F: FnMut(&Best),
    {
        let size = self.config.size;
        let mut grid = match self.config.start {
            Some(index) => Grid::from_index(size, index),
            None => self.enumerator.first_candidate(),
        };
        let mut stats = SearchStats::default();
        let mut best: Option<Best> = None;
        let mut completed = false;

        info!(size, policy = ?self.config.policy, max_steps = self.config.max_steps, "search started");

        loop {
            self.interpreter.reset(&grid);
            let outcome = self.interpreter.execute(self.config.max_steps);
            let candidate = stats.candidates;
            stats.record(outcome);

            if let Outcome::Finite(steps) = outcome {
                if best.as_ref().map_or(true, |b| steps > b.steps) {
                    debug!(steps, candidate, "new best\n{}", grid);
                    let found = Best {
                        grid: grid.clone(),
                        steps,
                        candidate,
                    };
                    on_best(&found);
                    best = Some(found);
                }
            }

            let covered = self
                .enumerator
                .advance(&mut grid, self.interpreter.visited_addresses());
            stats.covered = stats.covered.saturating_add(covered);

            if self.config.progress_every > 0 && stats.candidates % self.config.progress_every == 0 {
                info!(
                    candidates = stats.candidates,
                    best = best.as_ref().map(|b| b.steps),
                    "{:.6}% covered",
                    percent(stats.covered, size)
                );
            }

            if self.enumerator.is_initial(&grid) {
                completed = true;
                break;
            }
            if self.config.limit.is_some_and(|limit| stats.candidates >= limit) {
                break;
            }
        }

        info!(
            candidates = stats.candidates,
            finite = stats.finite,
            infinite = stats.infinite,
            errors = stats.errors(),
            completed,
            "search finished"
        );

        SearchReport {
            stats,
            best,
            completed,
        }
    }
}

fn percent(covered: u128, size: usize) -> f64 {
    match space_size(size) {
        Some(total) => covered as f64 * 100.0 / total as f64,
        None => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(size: usize, policy: Policy) -> SearchConfig {
        SearchConfig {
            size,
            max_steps: 500,
            policy,
            ..SearchConfig::default()
        }
    }

    #[test]
    fn test_one_by_one_space() {
        let report = Search::new(config(1, Policy::Full)).run();
        assert!(report.completed);
        assert_eq!(report.stats.candidates, 3);
        assert_eq!(report.stats.covered, 3);
        // Blank and Operator both exit on step 1; a Branch turns up at once
        assert_eq!(report.best.map(|b| b.steps), Some(1));
    }

    #[test]
    fn test_limit_stops_early() {
        let mut cfg = config(3, Policy::Full);
        cfg.limit = Some(10);
        let report = Search::new(cfg).run();
        assert!(!report.completed);
        assert_eq!(report.stats.candidates, 10);
    }

    #[test]
    fn test_best_callback_sees_increasing_steps() {
        let mut seen = Vec::new();
        let report = Search::new(config(2, Policy::Visited)).run_with(|best| seen.push(best.steps));
        assert!(report.completed);
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(seen.last().copied(), report.best.map(|b| b.steps));
    }
}
