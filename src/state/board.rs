//! Board grid.
//!
//! An N×N matrix of cells. The side length is fixed when the board is
//! anchored and every coordinate access is bounds-checked against it.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Stone colors. Black always moves first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stone {
    Black,
    White,
}

impl Stone {
    /// The color that moves after this one.
    pub fn other(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "Black"),
            Self::White => write!(f, "White"),
        }
    }
}

/// Occupancy of a single grid position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The stone on this cell, if any.
    pub fn stone(&self) -> Option<Stone> {
        match self {
            Self::Empty => None,
            Self::Black => Some(Stone::Black),
            Self::White => Some(Stone::White),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Black => "black",
            Self::White => "white",
        }
    }
}

impl From<Stone> for Cell {
    fn from(stone: Stone) -> Self {
        match stone {
            Stone::Black => Self::Black,
            Stone::White => Self::White,
        }
    }
}

/// Logical board coordinate.
///
/// Signed so that coordinates derived from world-space points just outside
/// the board (row -1, col -1) are representable and can be rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub row: i32,
    pub col: i32,
}

impl Position {
    pub fn new(row: i32, col: i32) -> Self {
        Self { row, col }
    }

    /// Step `distance` cells along `(d_row, d_col)`.
    pub fn offset(&self, d_row: i32, d_col: i32, distance: i32) -> Self {
        Self {
            row: self.row.saturating_add(d_row.saturating_mul(distance)),
            col: self.col.saturating_add(d_col.saturating_mul(distance)),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({"row": self.row, "col": self.col})
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A single accepted placement: the delta the presentation layer renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellChange {
    pub position: Position,
    pub stone: Stone,
}

impl CellChange {
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "row": self.position.row,
            "col": self.position.col,
            "stone": self.stone.as_str()
        })
    }
}

/// Why a placement was not applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PlacementRejected {
    #[error("board has not been anchored")]
    NotInitialized,
    #[error("position {0} is outside the board")]
    OutOfBounds(Position),
    #[error("position {0} is already occupied")]
    Occupied(Position),
}

/// Square game grid.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    size: usize,
    cells: Vec<Cell>,
    initialized: bool,
}

impl Board {
    /// Create an uninitialized board (size 0, not ready).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a board that is already initialized to `size`×`size`.
    pub fn with_size(size: usize) -> Self {
        let mut board = Self::new();
        board.initialize(size);
        board
    }

    /// Allocate a `size`×`size` grid of empty cells.
    ///
    /// Any previous contents are discarded. Whether a second anchor is allowed
    /// to reach this is decided by the session's re-anchor policy.
    pub fn initialize(&mut self, size: usize) {
        self.size = size;
        self.cells = vec![Cell::Empty; size * size];
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Check if a position is within `[0, N)` on both axes.
    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    fn index(&self, pos: Position) -> Option<usize> {
        let row = usize::try_from(pos.row).ok()?;
        let col = usize::try_from(pos.col).ok()?;
        if row < self.size && col < self.size {
            Some(row * self.size + col)
        } else {
            None
        }
    }

    /// Bounds-checked read.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        self.index(pos).map(|i| self.cells[i])
    }

    /// Write `stone` into an empty, in-bounds cell.
    pub fn try_place(&mut self, pos: Position, stone: Stone) -> Result<CellChange, PlacementRejected> {
        if !self.initialized {
            return Err(PlacementRejected::NotInitialized);
        }
        let index = self
            .index(pos)
            .ok_or(PlacementRejected::OutOfBounds(pos))?;
        if !self.cells[index].is_empty() {
            return Err(PlacementRejected::Occupied(pos));
        }

        self.cells[index] = stone.into();
        Ok(CellChange {
            position: pos,
            stone,
        })
    }

    /// Like [`Board::try_place`], but an invalid placement is a silent no-op.
    pub fn place(&mut self, pos: Position, stone: Stone) -> Option<CellChange> {
        self.try_place(pos, stone).ok()
    }

    /// Rows in order, each a slice of N cells.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        // chunks() rejects a zero chunk size
        self.cells.chunks(self.size.max(1))
    }

    /// Occupied cells in row-major order.
    pub fn stones(&self) -> impl Iterator<Item = (Position, Stone)> + '_ {
        let size = self.size.max(1);
        self.cells.iter().enumerate().filter_map(move |(i, cell)| {
            let stone = cell.stone()?;
            let pos = Position::new((i / size) as i32, (i % size) as i32);
            Some((pos, stone))
        })
    }

    pub fn stone_count(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    pub fn is_full(&self) -> bool {
        self.initialized && self.cells.iter().all(|c| !c.is_empty())
    }

    /// Convert grid to JSON (rows of cell names).
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .rows()
            .map(|row| {
                let cells: Vec<serde_json::Value> =
                    row.iter().map(|c| serde_json::json!(c.as_str())).collect();
                serde_json::Value::Array(cells)
            })
            .collect();
        serde_json::Value::Array(rows)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            for cell in row {
                let c = match cell {
                    Cell::Empty => '.',
                    Cell::Black => 'X',
                    Cell::White => 'O',
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_board_new_is_not_ready() {
        let board = Board::new();
        assert!(!board.is_initialized());
        assert_eq!(board.size(), 0);
        assert_eq!(board.get(Position::new(0, 0)), None);
    }

    #[test]
    fn test_initialize_all_empty() {
        for size in [1, 3, 5, 9, 15] {
            let board = Board::with_size(size);
            assert_eq!(board.size(), size);
            assert_eq!(board.stone_count(), 0);
            for row in 0..size as i32 {
                for col in 0..size as i32 {
                    assert_eq!(board.get(Position::new(row, col)), Some(Cell::Empty));
                }
            }
        }
    }

    #[test]
    fn test_place_sets_only_target() {
        let mut board = Board::with_size(5);
        let change = board.place(Position::new(2, 3), Stone::Black).unwrap();
        assert_eq!(change.position, Position::new(2, 3));
        assert_eq!(change.stone, Stone::Black);

        let stones: Vec<_> = board.stones().collect();
        assert_eq!(stones, vec![(Position::new(2, 3), Stone::Black)]);
    }

    #[test]
    fn test_place_occupied_is_noop() {
        let mut board = Board::with_size(5);
        board.place(Position::new(1, 1), Stone::Black).unwrap();
        let before = board.clone();

        assert_eq!(
            board.try_place(Position::new(1, 1), Stone::White),
            Err(PlacementRejected::Occupied(Position::new(1, 1)))
        );
        assert!(board.place(Position::new(1, 1), Stone::White).is_none());
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_boundaries() {
        let mut board = Board::with_size(5);
        assert!(board.place(Position::new(0, 0), Stone::Black).is_some());
        assert!(board.place(Position::new(4, 4), Stone::White).is_some());

        let before = board.clone();
        assert_eq!(
            board.try_place(Position::new(5, 0), Stone::Black),
            Err(PlacementRejected::OutOfBounds(Position::new(5, 0)))
        );
        assert_eq!(
            board.try_place(Position::new(0, -1), Stone::Black),
            Err(PlacementRejected::OutOfBounds(Position::new(0, -1)))
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_place_before_initialize() {
        let mut board = Board::new();
        assert_eq!(
            board.try_place(Position::new(0, 0), Stone::Black),
            Err(PlacementRejected::NotInitialized)
        );
    }

    #[test]
    fn test_initialize_discards_stones() {
        let mut board = Board::with_size(3);
        board.place(Position::new(0, 0), Stone::Black);
        board.initialize(4);
        assert_eq!(board.size(), 4);
        assert_eq!(board.stone_count(), 0);
    }

    #[test]
    fn test_grid_json_and_display() {
        let mut board = Board::with_size(2);
        board.place(Position::new(0, 1), Stone::Black);
        board.place(Position::new(1, 0), Stone::White);

        assert_eq!(
            board.to_json(),
            serde_json::json!([["empty", "black"], ["white", "empty"]])
        );
        assert_eq!(board.to_string(), ".X\nO.\n");
    }

    #[test]
    fn test_stone_other() {
        assert_eq!(Stone::Black.other(), Stone::White);
        assert_eq!(Stone::White.other(), Stone::Black);
        assert_eq!(Cell::from(Stone::White).stone(), Some(Stone::White));
    }
}
