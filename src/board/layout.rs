//! Per-player positional storage.
//!
//! A `Board` maps each of the 37 positions to at most one unit id. Units
//! themselves live in the game's unit arena; the board only holds ids, so
//! moving a unit never touches the unit record except for its position.

use serde::{Deserialize, Serialize};

use super::position::{Position, POSITION_COUNT};
use crate::core::ActionError;
use crate::units::UnitId;

/// Hex board plus bench for one player.
///
/// ```
/// use rust_autobattler::board::{Board, Position};
/// use rust_autobattler::units::UnitId;
///
/// let mut board = Board::new();
/// let slot = Position::bench(0).unwrap();
/// let cell = Position::board(0, 0).unwrap();
///
/// board.place(UnitId(1), slot, 1).unwrap();
/// board.move_unit(slot, cell, 1).unwrap();
///
/// assert_eq!(board.get(cell), Some(UnitId(1)));
/// assert_eq!(board.board_count(), 1);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: Vec<Option<UnitId>>,
    on_board: usize,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board and bench.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cells: vec![None; POSITION_COUNT],
            on_board: 0,
        }
    }

    /// Unit at a position.
    #[must_use]
    pub fn get(&self, position: Position) -> Option<UnitId> {
        self.cells[position.index()]
    }

    #[must_use]
    pub fn is_occupied(&self, position: Position) -> bool {
        self.get(position).is_some()
    }

    /// Number of units on hex cells.
    #[must_use]
    pub fn board_count(&self) -> usize {
        self.on_board
    }

    /// Number of units on the bench.
    #[must_use]
    pub fn bench_count(&self) -> usize {
        Position::bench_slots().filter(|p| self.is_occupied(*p)).count()
    }

    /// Lowest free bench slot.
    #[must_use]
    pub fn first_free_bench(&self) -> Option<Position> {
        Position::bench_slots().find(|p| !self.is_occupied(*p))
    }

    #[must_use]
    pub fn is_bench_full(&self) -> bool {
        self.first_free_bench().is_none()
    }

    /// Occupied positions with their units, board first then bench.
    pub fn occupied(&self) -> impl Iterator<Item = (Position, UnitId)> + '_ {
        Position::all().filter_map(move |p| self.get(p).map(|unit| (p, unit)))
    }

    /// Units on hex cells, in cell order.
    pub fn board_units(&self) -> impl Iterator<Item = (Position, UnitId)> + '_ {
        self.occupied().filter(|(p, _)| p.is_board())
    }

    /// Position holding `unit`.
    #[must_use]
    pub fn position_of(&self, unit: UnitId) -> Option<Position> {
        self.occupied().find(|(_, u)| *u == unit).map(|(p, _)| p)
    }

    /// Check that `unit` could be placed at `position` under a board cap.
    pub fn check_place(&self, position: Position, cap: usize) -> Result<(), ActionError> {
        if self.is_occupied(position) {
            return Err(ActionError::PositionOccupied(position));
        }
        if position.is_board() && self.board_count() >= cap {
            return Err(ActionError::CapacityExceeded { cap });
        }
        Ok(())
    }

    /// Put a unit on an empty position. Never overwrites.
    pub fn place(&mut self, unit: UnitId, position: Position, cap: usize) -> Result<(), ActionError> {
        self.check_place(position, cap)?;
        self.cells[position.index()] = Some(unit);
        if position.is_board() {
            self.on_board += 1;
        }
        Ok(())
    }

    /// Take the unit off a position.
    pub fn remove(&mut self, position: Position) -> Result<UnitId, ActionError> {
        let unit = self.cells[position.index()]
            .take()
            .ok_or(ActionError::PositionEmpty(position))?;
        if position.is_board() {
            self.on_board -= 1;
        }
        Ok(unit)
    }

    /// Check a move without applying it.
    ///
    /// A move into an occupied position is a swap and never changes the
    /// board count. A relocation from the bench onto an empty cell must fit
    /// under `cap`.
    pub fn check_move(&self, from: Position, to: Position, cap: usize) -> Result<(), ActionError> {
        if from == to {
            return Err(ActionError::SamePosition(from));
        }
        if !self.is_occupied(from) {
            return Err(ActionError::PositionEmpty(from));
        }
        let relocation = !self.is_occupied(to);
        if relocation && from.is_bench() && to.is_board() && self.board_count() >= cap {
            return Err(ActionError::CapacityExceeded { cap });
        }
        Ok(())
    }

    /// Relocate or swap. Either both positions change or neither does.
    pub fn move_unit(&mut self, from: Position, to: Position, cap: usize) -> Result<(), ActionError> {
        self.check_move(from, to, cap)?;
        if !self.is_occupied(to) && from.is_board() != to.is_board() {
            if to.is_board() {
                self.on_board += 1;
            } else {
                self.on_board -= 1;
            }
        }
        self.cells.swap(from.index(), to.index());
        Ok(())
    }

    /// Remove every unit, returning them in position order.
    pub fn clear(&mut self) -> Vec<UnitId> {
        self.on_board = 0;
        self.cells.iter_mut().filter_map(Option::take).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(row: usize, col: usize) -> Position {
        Position::board(row, col).unwrap()
    }

    fn slot(n: usize) -> Position {
        Position::bench(n).unwrap()
    }

    #[test]
    fn test_place_never_overwrites() {
        let mut board = Board::new();
        board.place(UnitId(1), slot(0), 3).unwrap();

        let err = board.place(UnitId(2), slot(0), 3).unwrap_err();
        assert_eq!(err, ActionError::PositionOccupied(slot(0)));
        assert_eq!(board.get(slot(0)), Some(UnitId(1)));
    }

    #[test]
    fn test_place_respects_cap() {
        let mut board = Board::new();
        for col in 0..5 {
            board.place(UnitId(col as u32), cell(0, col), 5).unwrap();
        }

        let before = board.clone();
        let err = board.place(UnitId(9), cell(1, 0), 5).unwrap_err();
        assert_eq!(err, ActionError::CapacityExceeded { cap: 5 });
        assert_eq!(board, before);

        // The bench is not capped by level.
        board.place(UnitId(9), slot(0), 5).unwrap();
    }

    #[test]
    fn test_move_relocates_and_swaps() {
        let mut board = Board::new();
        board.place(UnitId(1), slot(0), 2).unwrap();
        board.place(UnitId(2), cell(0, 0), 2).unwrap();

        board.move_unit(slot(0), cell(0, 1), 2).unwrap();
        assert_eq!(board.get(cell(0, 1)), Some(UnitId(1)));
        assert!(!board.is_occupied(slot(0)));

        board.move_unit(cell(0, 0), cell(0, 1), 2).unwrap();
        assert_eq!(board.get(cell(0, 0)), Some(UnitId(1)));
        assert_eq!(board.get(cell(0, 1)), Some(UnitId(2)));
        assert_eq!(board.board_count(), 2);

        board.move_unit(cell(0, 0), slot(5), 2).unwrap();
        assert_eq!(board.board_count(), 1);
        board.remove(cell(0, 1)).unwrap();
        assert_eq!(board.board_count(), 0);
    }

    #[test]
    fn test_swap_at_cap_is_allowed() {
        let mut board = Board::new();
        board.place(UnitId(1), cell(0, 0), 1).unwrap();
        board.place(UnitId(2), slot(3), 1).unwrap();

        assert_eq!(
            board.check_move(slot(3), cell(0, 1), 1),
            Err(ActionError::CapacityExceeded { cap: 1 })
        );
        board.move_unit(slot(3), cell(0, 0), 1).unwrap();
        assert_eq!(board.get(cell(0, 0)), Some(UnitId(2)));
        assert_eq!(board.get(slot(3)), Some(UnitId(1)));
    }

    #[test]
    fn test_move_rejections_leave_board_unchanged() {
        let mut board = Board::new();
        board.place(UnitId(1), slot(0), 1).unwrap();
        let before = board.clone();

        assert_eq!(
            board.move_unit(slot(0), slot(0), 1),
            Err(ActionError::SamePosition(slot(0)))
        );
        assert_eq!(
            board.move_unit(slot(1), slot(2), 1),
            Err(ActionError::PositionEmpty(slot(1)))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_bench_fill() {
        let mut board = Board::new();
        for n in 0..9 {
            let free = board.first_free_bench().unwrap();
            assert_eq!(free, slot(n));
            board.place(UnitId(n as u32), free, 0).unwrap();
        }
        assert!(board.is_bench_full());
        assert_eq!(board.bench_count(), 9);
        assert_eq!(board.position_of(UnitId(4)), Some(slot(4)));
        assert_eq!(board.clear().len(), 9);
    }
}
