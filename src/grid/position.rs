//! Cursor coordinates and facing directions
//!
//! A [`Position`] may sit one cell outside the grid (the start position is
//! `(-1, 0)`), so coordinates are signed. Moving never wraps: a move that
//! would leave the grid returns `None` and the caller treats it as an exit.

use std::cmp::Ordering;
use std::fmt;

/// Facing direction of the cursor, in clockwise order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Right,
    Down,
    Left,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// Rotate 90° clockwise
    pub fn clockwise(self) -> Self {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    /// Rotate 90° counter-clockwise
    pub fn counter_clockwise(self) -> Self {
        match self {
            Direction::Up => Direction::Left,
            Direction::Right => Direction::Up,
            Direction::Down => Direction::Right,
            Direction::Left => Direction::Down,
        }
    }

    /// Unit offset as (dx, dy); y grows downward
    pub fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
        }
    }

    /// Arrow glyph used when drawing the cursor
    pub fn arrow(self) -> char {
        match self {
            Direction::Up => '↑',
            Direction::Right => '→',
            Direction::Down => '↓',
            Direction::Left => '←',
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::Up => "up",
            Direction::Right => "right",
            Direction::Down => "down",
            Direction::Left => "left",
        };
        f.write_str(name)
    }
}

/// A cursor location on (or just outside) an N×N grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
    size: usize,
}

impl Position {
    pub fn new(x: i32, y: i32, size: usize) -> Self {
        Position { x, y, size }
    }

    /// The fixed start position: one cell left of the top-left corner
    pub fn start(size: usize) -> Self {
        Position::new(-1, 0, size)
    }

    /// Position of a serialized address
    pub fn from_address(address: usize, size: usize) -> Self {
        Position::new((address % size) as i32, (address / size) as i32, size)
    }

    pub fn is_inside(&self) -> bool {
        let n = self.size as i32;
        (0..n).contains(&self.x) && (0..n).contains(&self.y)
    }

    /// Serialized row-major address `y * N + x`, or `None` outside the grid
    pub fn address(&self) -> Option<usize> {
        if self.is_inside() {
            Some(self.y as usize * self.size + self.x as usize)
        } else {
            None
        }
    }

    /// The neighbouring cell in `direction`, or `None` if it lies outside the grid
    pub fn moved(&self, direction: Direction) -> Option<Position> {
        let (dx, dy) = direction.delta();
        let next = Position::new(self.x + dx, self.y + dy, self.size);
        next.is_inside().then_some(next)
    }

    /// Signed address, valid for the start position as well
    fn serial(&self) -> i64 {
        self.y as i64 * self.size as i64 + self.x as i64
    }
}

impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Position {
    /// Scan order: row-major, top to bottom
    fn cmp(&self, other: &Self) -> Ordering {
        self.serial().cmp(&other.serial())
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rotation_round_trip() {
        for d in Direction::ALL {
            assert_eq!(d.clockwise().counter_clockwise(), d);
            assert_eq!(d.clockwise().clockwise().clockwise().clockwise(), d);
        }
    }

    #[test]
    fn test_moves_stop_at_edges() {
        let corner = Position::new(0, 0, 3);
        assert_eq!(corner.moved(Direction::Up), None);
        assert_eq!(corner.moved(Direction::Left), None);
        assert_eq!(corner.moved(Direction::Right), Some(Position::new(1, 0, 3)));

        let start = Position::start(3);
        assert_eq!(start.address(), None);
        assert_eq!(start.moved(Direction::Right).and_then(|p| p.address()), Some(0));
        // Sliding down the outside edge is still outside
        assert_eq!(start.moved(Direction::Down), None);
    }

    #[test]
    fn test_scan_order() {
        let a = Position::new(2, 0, 3);
        let b = Position::new(0, 1, 3);
        assert!(a < b);
        assert!(Position::start(3) < Position::new(0, 0, 3));
        assert_eq!(Position::from_address(5, 3), Position::new(2, 1, 3));
    }
}
