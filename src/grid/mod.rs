//! Grid programs
//!
//! A program is an N×N grid of [`Symbol`]s stored row-major, so the cell at
//! `(x, y)` lives at serialized address `y * N + x`. That flat address is
//! also the digit position used by the odometer in [`Grid::advance`]:
//! address 0 is the most significant digit, address `N² - 1` the least.
//!
//! - [`position`]: cursor coordinates and facing directions
//! - [`parse`]: the plain-text grid format
//!
//! # Symbol Order
//!
//! Advancing a cell cycles `Blank → Branch → Operator → Blank`. Any fixed
//! order enumerates the same space; this one decides which candidate a
//! search visits first, so it is part of the reproducible search order.

pub mod parse;
pub mod position;

use position::Position;
use std::fmt;

/// One cell of a grid program
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Symbol {
    #[default]
    Blank,
    /// Turns the cursor instead of being entered
    Branch,
    /// Performs a tape operation chosen by the entry direction
    Operator,
}

impl Symbol {
    /// Canonical advancement order
    pub const ORDER: [Symbol; 3] = [Symbol::Blank, Symbol::Branch, Symbol::Operator];

    /// The next symbol in [`Symbol::ORDER`], or `None` when the digit wraps
    pub fn next(self) -> Option<Symbol> {
        match self {
            Symbol::Blank => Some(Symbol::Branch),
            Symbol::Branch => Some(Symbol::Operator),
            Symbol::Operator => None,
        }
    }

    /// Digit value of this symbol in base 3
    pub fn digit(self) -> u8 {
        match self {
            Symbol::Blank => 0,
            Symbol::Branch => 1,
            Symbol::Operator => 2,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Symbol::Blank => ' ',
            Symbol::Branch => '+',
            Symbol::Operator => '*',
        }
    }

    pub fn from_char(c: char) -> Option<Symbol> {
        match c {
            ' ' | '.' => Some(Symbol::Blank),
            '+' => Some(Symbol::Branch),
            '*' => Some(Symbol::Operator),
            _ => None,
        }
    }
}

/// Number of distinct N×N grids, `3^(N²)`, if it fits in a `u128`
pub fn space_size(size: usize) -> Option<u128> {
    let cells = u32::try_from(size * size).ok()?;
    3u128.checked_pow(cells)
}

/// An N×N grid program
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Grid {
    size: usize,
    cells: Vec<Symbol>,
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        Grid {
            size: self.size,
            cells: self.cells.clone(),
        }
    }

    // The interpreter copies a grid before every run; reuse its buffer.
    fn clone_from(&mut self, source: &Self) {
        self.size = source.size;
        self.cells.clone_from(&source.cells);
    }
}

impl Grid {
    /// All-blank grid, the first candidate of every search
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    pub fn blank(size: usize) -> Self {
        assert!(size > 0, "grid size must be positive");
        Grid {
            size,
            cells: vec![Symbol::Blank; size * size],
        }
    }

    /// Blank grid with `marker` at address 0, the cell the cursor enters first
    pub fn seeded(size: usize, marker: Symbol) -> Self {
        let mut grid = Grid::blank(size);
        grid.cells[0] = marker;
        grid
    }

    /// Decode a candidate number of the full odometer order
    ///
    /// Address `N² - 1` is the least significant base-3 digit. Indices past
    /// `3^(N²)` wrap around.
    pub fn from_index(size: usize, mut index: u128) -> Self {
        let mut grid = Grid::blank(size);
        for address in (0..grid.cells.len()).rev() {
            if index == 0 {
                break;
            }
            grid.cells[address] = Symbol::ORDER[(index % 3) as usize];
            index /= 3;
        }
        grid
    }

    /// Inverse of [`Grid::from_index`], `None` if the space overflows `u128`
    pub fn index(&self) -> Option<u128> {
        space_size(self.size)?;
        Some(
            self.cells
                .iter()
                .fold(0u128, |acc, s| acc * 3 + s.digit() as u128),
        )
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[Symbol] {
        &self.cells
    }

    /// Symbol under `position`
    ///
    /// # Panics
    ///
    /// Panics if `position` lies outside the grid; the interpreter only looks
    /// up positions returned by [`Position::moved`].
    pub fn get(&self, position: Position) -> Symbol {
        let address = position
            .address()
            .unwrap_or_else(|| panic!("position {} is outside the grid", position));
        self.cells[address]
    }

    pub fn at(&self, address: usize) -> Symbol {
        self.cells[address]
    }

    pub fn set(&mut self, x: usize, y: usize, symbol: Symbol) {
        assert!(x < self.size && y < self.size, "({}, {}) is outside the grid", x, y);
        self.cells[y * self.size + x] = symbol;
    }

    pub fn set_at(&mut self, address: usize, symbol: Symbol) {
        self.cells[address] = symbol;
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|&s| s == Symbol::Blank)
    }

    /// One odometer step over `addresses`, least significant digit first
    ///
    /// Each listed cell is advanced in [`Symbol::ORDER`]; a cell that wraps
    /// back to `Blank` carries into the next listed cell. Returns `true` if
    /// every listed cell wrapped.
    pub fn advance<I>(&mut self, addresses: I) -> bool
    where
        I: IntoIterator<Item = usize>,
    {
        for address in addresses {
            match self.cells[address].next() {
                Some(symbol) => {
                    self.cells[address] = symbol;
                    return false;
                }
                None => self.cells[address] = Symbol::Blank,
            }
        }
        true
    }

    /// Render with a border, marking `cursor` with `@` when it is inside
    pub fn render_with_cursor(&self, cursor: Option<Position>) -> String {
        let n = self.size as i32;
        let mut out = String::with_capacity((self.size + 3) * (self.size + 2));
        for y in -1..=n {
            for x in -1..=n {
                let c = if y == -1 || y == n {
                    '-'
                } else if x == -1 || x == n {
                    '|'
                } else if cursor.is_some_and(|p| p.x == x && p.y == y) {
                    '@'
                } else {
                    self.cells[(y * n + x) as usize].as_char()
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }

    /// The grid in the plain-text file format, one row per line
    pub fn to_text(&self) -> String {
        self.cells
            .chunks(self.size)
            .map(|row| row.iter().map(|s| s.as_char()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_with_cursor(None))
    }
}
