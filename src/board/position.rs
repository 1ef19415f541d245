//! Flat addressing for the 37 board and bench positions.
//!
//! Indices `0..28` are the hex board in row-major order (4 rows of 7),
//! indices `28..37` are the bench slots. The same index is used by the
//! action encoding, so a `Position` is all an action needs to carry.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::ActionError;

pub const BOARD_ROWS: usize = 4;
pub const BOARD_COLS: usize = 7;
pub const BOARD_CELLS: usize = BOARD_ROWS * BOARD_COLS;
pub const BENCH_SLOTS: usize = 9;
pub const POSITION_COUNT: usize = BOARD_CELLS + BENCH_SLOTS;

/// A board cell or bench slot.
///
/// ```
/// use rust_autobattler::board::Position;
///
/// let cell = Position::board(1, 3).unwrap();
/// assert_eq!(cell.index(), 10);
/// assert_eq!(cell.row_col(), Some((1, 3)));
///
/// let slot = Position::bench(0).unwrap();
/// assert!(slot.is_bench());
/// assert_eq!(slot.index(), 28);
///
/// assert!(Position::board(4, 0).is_none());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Position(u8);

impl Position {
    /// Position from a flat index.
    #[must_use]
    pub fn new(index: usize) -> Option<Self> {
        (index < POSITION_COUNT).then(|| Self(index as u8))
    }

    /// Board cell at `(row, col)`.
    #[must_use]
    pub fn board(row: usize, col: usize) -> Option<Self> {
        (row < BOARD_ROWS && col < BOARD_COLS).then(|| Self((row * BOARD_COLS + col) as u8))
    }

    /// Bench slot `slot`.
    #[must_use]
    pub fn bench(slot: usize) -> Option<Self> {
        (slot < BENCH_SLOTS).then(|| Self((BOARD_CELLS + slot) as u8))
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[must_use]
    pub const fn is_board(self) -> bool {
        (self.0 as usize) < BOARD_CELLS
    }

    #[must_use]
    pub const fn is_bench(self) -> bool {
        !self.is_board()
    }

    /// `(row, col)` for board cells, `None` for bench slots.
    #[must_use]
    pub fn row_col(self) -> Option<(usize, usize)> {
        self.is_board()
            .then(|| (self.index() / BOARD_COLS, self.index() % BOARD_COLS))
    }

    /// Bench slot number for bench positions.
    #[must_use]
    pub fn bench_slot(self) -> Option<usize> {
        self.is_bench().then(|| self.index() - BOARD_CELLS)
    }

    /// Every position in index order.
    pub fn all() -> impl Iterator<Item = Position> {
        (0..POSITION_COUNT as u8).map(Position)
    }

    /// Every board cell in index order.
    pub fn board_cells() -> impl Iterator<Item = Position> {
        (0..BOARD_CELLS as u8).map(Position)
    }

    /// Every bench slot in order.
    pub fn bench_slots() -> impl Iterator<Item = Position> {
        (BOARD_CELLS as u8..POSITION_COUNT as u8).map(Position)
    }

    /// Adjacent board cells on the offset hex grid.
    ///
    /// Even rows lean left, odd rows lean right. Cells outside the 4x7
    /// bounds are dropped, and bench slots have no neighbours.
    ///
    /// ```
    /// use rust_autobattler::board::Position;
    ///
    /// let corner = Position::board(0, 0).unwrap();
    /// assert_eq!(corner.hex_neighbors().len(), 2);
    ///
    /// let inner = Position::board(1, 3).unwrap();
    /// assert_eq!(inner.hex_neighbors().len(), 6);
    /// ```
    #[must_use]
    pub fn hex_neighbors(self) -> SmallVec<[Position; 6]> {
        let Some((row, col)) = self.row_col() else {
            return SmallVec::new();
        };
        let (row, col) = (row as isize, col as isize);

        let offsets: [(isize, isize); 6] = if row % 2 == 0 {
            [(0, -1), (0, 1), (-1, -1), (-1, 0), (1, -1), (1, 0)]
        } else {
            [(0, -1), (0, 1), (-1, 0), (-1, 1), (1, 0), (1, 1)]
        };

        offsets
            .iter()
            .filter_map(|(dr, dc)| {
                let (r, c) = (row + dr, col + dc);
                if r < 0 || c < 0 {
                    return None;
                }
                Position::board(r as usize, c as usize)
            })
            .collect()
    }

    /// Whether `other` is a hex neighbour of this cell.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self.hex_neighbors().contains(&other)
    }
}

impl TryFrom<u8> for Position {
    type Error = ActionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Position::new(usize::from(value)).ok_or(ActionError::InvalidPosition(usize::from(value)))
    }
}

impl From<Position> for u8 {
    fn from(position: Position) -> u8 {
        position.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.row_col(), self.bench_slot()) {
            (Some((row, col)), _) => write!(f, "board({row},{col})"),
            (None, Some(slot)) => write!(f, "bench({slot})"),
            (None, None) => write!(f, "position({})", self.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: usize, col: usize) -> Position {
        Position::board(row, col).unwrap()
    }

    #[test]
    fn test_layout_constants() {
        assert_eq!(BOARD_CELLS, 28);
        assert_eq!(POSITION_COUNT, 37);
        assert_eq!(Position::all().count(), 37);
        assert_eq!(Position::board_cells().count(), 28);
        assert_eq!(Position::bench_slots().count(), 9);
    }

    #[test]
    fn test_out_of_range() {
        assert!(Position::new(37).is_none());
        assert!(Position::board(0, 7).is_none());
        assert!(Position::bench(9).is_none());
        assert_eq!(Position::try_from(40u8), Err(ActionError::InvalidPosition(40)));
    }

    #[test]
    fn test_even_row_neighbors() {
        let mut neighbors = cell(2, 3).hex_neighbors().to_vec();
        neighbors.sort();

        let mut expected = vec![
            cell(2, 2),
            cell(2, 4),
            cell(1, 2),
            cell(1, 3),
            cell(3, 2),
            cell(3, 3),
        ];
        expected.sort();
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn test_odd_row_neighbors() {
        let mut neighbors = cell(1, 3).hex_neighbors().to_vec();
        neighbors.sort();

        let mut expected = vec![
            cell(1, 2),
            cell(1, 4),
            cell(0, 3),
            cell(0, 4),
            cell(2, 3),
            cell(2, 4),
        ];
        expected.sort();
        assert_eq!(neighbors, expected);
    }

    #[test]
    fn test_neighbors_are_clipped() {
        // Odd row, right edge.
        let edge = cell(3, 6).hex_neighbors();
        assert_eq!(edge.len(), 2);
        assert!(edge.contains(&cell(3, 5)));
        assert!(edge.contains(&cell(2, 6)));

        assert!(Position::bench(2).unwrap().hex_neighbors().is_empty());
    }

    #[test]
    fn test_adjacency_is_symmetric() {
        for a in Position::board_cells() {
            for b in a.hex_neighbors() {
                assert!(b.is_adjacent(a), "{a} -> {b}");
            }
        }
    }

    #[test]
    fn test_serde_rejects_out_of_range() {
        let json = serde_json::to_string(&cell(0, 1)).unwrap();
        assert_eq!(json, "1");
        assert!(serde_json::from_str::<Position>("99").is_err());
    }
}
