//! Candidate enumeration
//!
//! Grids are enumerated as base-3 numbers: address 0 is the most significant
//! digit and each digit cycles through [`Symbol::ORDER`]. The enumeration
//! starts at the all-blank grid and ends when an advance wraps back to it.
//!
//! # Pruning
//!
//! A run only depends on the cells it read. Every grid that agrees with the
//! candidate on those cells has the same verdict, so the enumerator can skip
//! all of them at once:
//!
//! - [`Policy::Full`] advances every cell; 3^(N²) runs.
//! - [`Policy::Visited`] advances only the cells the run read, last read
//!   first. The read order is a path through a decision tree, and this is a
//!   depth-first walk of that tree in which every cell off the current path is
//!   blank.
//! - [`Policy::Prefix`] advances every cell up to the highest address the run
//!   read and clears the cells after it, the ordinary odometer jumping over
//!   the untouched suffix.
//!
//! [`Enumerator::advance`] reports how many grids of the full space the
//! evaluated candidate stood for. Over a complete enumeration these counts sum
//! to 3^(N²) under every policy.

use crate::grid::{Grid, Symbol};

/// Which cells an advance may change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    Full,
    #[default]
    Visited,
    Prefix,
}

/// Deterministic walk over all N×N grids
#[derive(Debug, Clone)]
pub struct Enumerator {
    size: usize,
    policy: Policy,
}

impl Enumerator {
    pub fn new(size: usize, policy: Policy) -> Self {
        assert!(size > 0, "grid size must be positive");
        Enumerator { size, policy }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn policy(&self) -> Policy {
        self.policy
    }

    pub fn first_candidate(&self) -> Grid {
        Grid::blank(self.size)
    }

    /// Whether `grid` is the configuration the enumeration starts and ends at
    pub fn is_initial(&self, grid: &Grid) -> bool {
        grid.size() == self.size && grid.is_blank()
    }

    /// Move `grid` to the next candidate
    ///
    /// `visited` is the ordered visited list of the run that just evaluated
    /// `grid`. Returns the number of grids that run accounted for.
    pub fn advance(&self, grid: &mut Grid, visited: &[usize]) -> u128 {
        let cells = grid.cell_count();
        match self.policy {
            Policy::Full => {
                grid.advance((0..cells).rev());
                1
            }
            Policy::Visited => {
                let wrapped = grid.advance(visited.iter().rev().copied());
                if wrapped && !self.is_initial(grid) {
                    // Only reachable from a start grid with marks off the
                    // path; fall back to the odometer over the other cells.
                    let mut on_path = vec![false; cells];
                    for &address in visited {
                        on_path[address] = true;
                    }
                    grid.advance((0..cells).rev().filter(|&a| !on_path[a]));
                }
                pow3(cells - visited.len())
            }
            Policy::Prefix => {
                let last = visited.iter().copied().max().unwrap_or(cells - 1);
                for address in last + 1..cells {
                    grid.set_at(address, Symbol::Blank);
                }
                grid.advance((0..=last).rev());
                pow3(cells - 1 - last)
            }
        }
    }
}

/// `3^exponent`, saturating at `u128::MAX`
pub fn pow3(exponent: usize) -> u128 {
    u32::try_from(exponent).map_or(u128::MAX, |e| 3u128.saturating_pow(e))
}
