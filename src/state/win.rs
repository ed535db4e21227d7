//! Win detection.
//!
//! Every occupied cell is treated as the possible start of a run and scanned
//! in four directions. The other four directions are never needed: any line
//! is found from whichever of its two endpoints the scan reaches first.

use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use super::board::{Board, Position, Stone};

/// Stones in a row needed to win ("three in a row").
pub const DEFAULT_WIN_LENGTH: usize = 3;

/// Scan directions, in the order they are tried from each cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Down,
    Right,
    DownRight,
    DownLeft,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Down,
        Direction::Right,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    /// `(d_row, d_col)` step.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Self::Down => (1, 0),
            Self::Right => (0, 1),
            Self::DownRight => (1, 1),
            Self::DownLeft => (1, -1),
        }
    }
}

/// A qualifying run found on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WinningRun {
    pub stone: Stone,
    pub start: Position,
    pub direction: Direction,
    pub length: usize,
}

impl WinningRun {
    /// Positions covered by the run, starting from `start`.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        let (d_row, d_col) = self.direction.delta();
        (0..self.length as i32).map(move |i| self.start.offset(d_row, d_col, i))
    }

    pub fn to_json(&self) -> serde_json::Value {
        let cells: Vec<serde_json::Value> = self.positions().map(|p| p.to_json()).collect();
        serde_json::json!({
            "stone": self.stone.as_str(),
            "cells": cells
        })
    }
}

/// Count consecutive `stone` cells from `start` along `direction`, stopping at
/// the first mismatch, the board edge, or `limit`.
pub fn run_length(
    board: &Board,
    start: Position,
    direction: Direction,
    stone: Stone,
    limit: usize,
) -> usize {
    let (d_row, d_col) = direction.delta();
    (0..limit)
        .take_while(|&i| {
            let pos = start.offset(d_row, d_col, i as i32);
            board.get(pos).and_then(|c| c.stone()) == Some(stone)
        })
        .count()
}

/// Full-board scan for the first run of exactly `win_length` stones.
///
/// Cells are visited in row-major order and directions in [`Direction::ALL`]
/// order; the first hit is returned. If both colors somehow had a qualifying
/// run, this order decides which one is reported.
#[instrument(level = "trace", skip(board), fields(size = board.size()))]
pub fn find_winning_run(board: &Board, win_length: usize) -> Option<WinningRun> {
    if win_length == 0 {
        return None;
    }

    for (start, stone) in board.stones() {
        for direction in Direction::ALL {
            if run_length(board, start, direction, stone, win_length) == win_length {
                trace!(%start, ?direction, %stone, "winning run found");
                return Some(WinningRun {
                    stone,
                    start,
                    direction,
                    length: win_length,
                });
            }
        }
    }

    None
}

/// Checks if there is a winner on the board.
///
/// Returns `Some(stone)` if that color has `win_length` in a row,
/// `None` otherwise.
pub fn check_winner(board: &Board, win_length: usize) -> Option<Stone> {
    find_winning_run(board, win_length).map(|run| run.stone)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const K: usize = DEFAULT_WIN_LENGTH;

    fn board_with(size: usize, stones: &[(i32, i32, Stone)]) -> Board {
        let mut board = Board::with_size(size);
        for &(row, col, stone) in stones {
            board.place(Position::new(row, col), stone).unwrap();
        }
        board
    }

    #[test]
    fn test_no_winner_empty_board() {
        assert_eq!(check_winner(&Board::with_size(5), K), None);
        assert_eq!(check_winner(&Board::new(), K), None);
    }

    #[test]
    fn test_winner_horizontal() {
        let board = board_with(
            5,
            &[(3, 1, Stone::Black), (3, 2, Stone::Black), (3, 3, Stone::Black)],
        );
        let run = find_winning_run(&board, K).unwrap();
        assert_eq!(run.stone, Stone::Black);
        assert_eq!(run.start, Position::new(3, 1));
        assert_eq!(run.direction, Direction::Right);
    }

    #[test]
    fn test_winner_vertical() {
        let board = board_with(
            5,
            &[(2, 4, Stone::White), (3, 4, Stone::White), (4, 4, Stone::White)],
        );
        let run = find_winning_run(&board, K).unwrap();
        assert_eq!(run.stone, Stone::White);
        assert_eq!(run.direction, Direction::Down);
    }

    #[test]
    fn test_winner_diagonal_down_right() {
        let board = board_with(
            5,
            &[(0, 0, Stone::Black), (1, 1, Stone::Black), (2, 2, Stone::Black)],
        );
        let run = find_winning_run(&board, K).unwrap();
        assert_eq!(run.direction, Direction::DownRight);
        assert_eq!(
            run.positions().collect::<Vec<_>>(),
            vec![Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)]
        );
    }

    #[test]
    fn test_winner_diagonal_down_left() {
        let board = board_with(
            5,
            &[(2, 4, Stone::White), (3, 3, Stone::White), (4, 2, Stone::White)],
        );
        let run = find_winning_run(&board, K).unwrap();
        assert_eq!(run.stone, Stone::White);
        assert_eq!(run.start, Position::new(2, 4));
        assert_eq!(run.direction, Direction::DownLeft);
    }

    #[test]
    fn test_run_of_k_minus_one_does_not_win() {
        let board = board_with(5, &[(0, 0, Stone::Black), (0, 1, Stone::Black)]);
        assert_eq!(check_winner(&board, K), None);
    }

    #[test]
    fn test_broken_run_does_not_win() {
        let board = board_with(
            5,
            &[(1, 0, Stone::Black), (1, 1, Stone::White), (1, 2, Stone::Black)],
        );
        assert_eq!(check_winner(&board, K), None);
    }

    #[test]
    fn test_run_clipped_by_edge() {
        let board = board_with(3, &[(0, 1, Stone::Black), (1, 0, Stone::Black)]);
        assert_eq!(
            run_length(&board, Position::new(0, 1), Direction::DownLeft, Stone::Black, K),
            2
        );
        assert_eq!(check_winner(&board, K), None);
    }

    #[test]
    fn test_longer_run_still_wins() {
        let board = board_with(
            5,
            &[
                (4, 0, Stone::White),
                (4, 1, Stone::White),
                (4, 2, Stone::White),
                (4, 3, Stone::White),
            ],
        );
        assert_eq!(check_winner(&board, K), Some(Stone::White));
    }

    #[test]
    fn test_custom_win_length() {
        let board = board_with(
            7,
            &[
                (0, 0, Stone::Black),
                (0, 1, Stone::Black),
                (0, 2, Stone::Black),
                (0, 3, Stone::Black),
            ],
        );
        assert_eq!(check_winner(&board, 5), None);
        assert_eq!(check_winner(&board, 4), Some(Stone::Black));
        assert_eq!(check_winner(&board, 0), None);
    }

    #[test]
    fn test_scan_order_tie_break() {
        // White's run starts earlier in row-major order
        let board = board_with(
            5,
            &[
                (0, 0, Stone::White),
                (0, 1, Stone::White),
                (0, 2, Stone::White),
                (2, 0, Stone::Black),
                (2, 1, Stone::Black),
                (2, 2, Stone::Black),
            ],
        );
        assert_eq!(check_winner(&board, K), Some(Stone::White));
    }

    #[test]
    fn test_detection_is_idempotent() {
        let board = board_with(
            5,
            &[(1, 1, Stone::Black), (2, 2, Stone::Black), (3, 3, Stone::Black)],
        );
        let first = find_winning_run(&board, K);
        let second = find_winning_run(&board, K);
        assert_eq!(first, second);
    }
}
