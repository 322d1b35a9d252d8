//! Plain-text grid format
//!
//! One line per row, one character per cell: space or `.` is `Blank`, `+` is
//! `Branch`, `*` is `Operator`. Editors like to strip trailing spaces, so short
//! lines are padded with blanks and an empty line is a blank row. The grid size
//! is the number of rows.

use super::{Grid, Symbol};
use std::fmt;
use std::fs;
use std::path::Path;

/// Errors produced while reading a grid file
#[derive(Debug)]
pub enum GridError {
    /// No rows at all
    Empty,

    /// A row holds more cells than the grid has rows
    NotSquare { line: usize, width: usize, size: usize },

    /// A character outside the grid alphabet
    UnknownSymbol { symbol: char, line: usize, column: usize },

    /// The file could not be read
    Io(std::io::Error),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "Grid is empty"),
            GridError::NotSquare { line, width, size } => {
                write!(
                    f,
                    "Line {} has {} cells, but the grid has only {} rows",
                    line, width, size
                )
            }
            GridError::UnknownSymbol {
                symbol,
                line,
                column,
            } => {
                write!(
                    f,
                    "Unknown symbol {:?} at line {}, column {}",
                    symbol, line, column
                )
            }
            GridError::Io(err) => write!(f, "Failed to read grid: {}", err),
        }
    }
}

impl std::error::Error for GridError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GridError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GridError {
    fn from(err: std::io::Error) -> Self {
        GridError::Io(err)
    }
}

/// Parse a grid from its text form
pub fn parse_grid(text: &str) -> Result<Grid, GridError> {
    let rows: Vec<&str> = text
        .lines()
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect();
    if rows.is_empty() {
        return Err(GridError::Empty);
    }

    let size = rows.len();
    let mut grid = Grid::blank(size);
    for (y, row) in rows.iter().enumerate() {
        let width = row.chars().count();
        if width > size {
            return Err(GridError::NotSquare {
                line: y + 1,
                width,
                size,
            });
        }
        for (x, c) in row.chars().enumerate() {
            let symbol = Symbol::from_char(c).ok_or(GridError::UnknownSymbol {
                symbol: c,
                line: y + 1,
                column: x + 1,
            })?;
            grid.set(x, y, symbol);
        }
    }
    Ok(grid)
}

/// Read and parse a grid file
pub fn read_grid(path: impl AsRef<Path>) -> Result<Grid, GridError> {
    let text = fs::read_to_string(path)?;
    parse_grid(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_pads_short_lines() {
        let grid = parse_grid("*\n +\n").unwrap();
        assert_eq!(grid.size(), 2);
        assert_eq!(grid.at(0), Symbol::Operator);
        assert_eq!(grid.at(1), Symbol::Blank);
        assert_eq!(grid.at(3), Symbol::Branch);

        // Stripped blank rows still count
        let grid = parse_grid("*\n\n\n").unwrap();
        assert_eq!(grid.size(), 3);
        assert_eq!(grid.to_text(), "*  \n   \n   ");
        assert!(parse_grid("\n\n\n").unwrap().is_blank());
    }

    #[test]
    fn test_parse_crlf() {
        let grid = parse_grid("+ \r\n *\r\n").unwrap();
        assert_eq!(grid.to_text(), "+ \n *");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse_grid(""), Err(GridError::Empty)));
        assert!(matches!(
            parse_grid("   \n"),
            Err(GridError::NotSquare { line: 1, width: 3, size: 1 })
        ));
        assert!(matches!(
            parse_grid("  \n x"),
            Err(GridError::UnknownSymbol {
                symbol: 'x',
                line: 2,
                column: 2
            })
        ));
    }
}
