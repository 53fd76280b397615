//! Win and draw evaluation.

use super::types::{Board, Cell, GameStatus, SIZE};

/// The eight winning lines: rows first, then columns, then diagonals.
///
/// Scan order is fixed so that a board with two simultaneous lines (not
/// reachable through [`Board::place`] under legal play) still yields a
/// deterministic answer: the first line found wins.
const LINES: [[(usize, usize); 3]; 8] = [
    // Rows
    [(0, 0), (0, 1), (0, 2)],
    [(1, 0), (1, 1), (1, 2)],
    [(2, 0), (2, 1), (2, 2)],
    // Columns
    [(0, 0), (1, 0), (2, 0)],
    [(0, 1), (1, 1), (2, 1)],
    [(0, 2), (1, 2), (2, 2)],
    // Diagonals
    [(0, 0), (1, 1), (2, 2)],
    [(0, 2), (1, 1), (2, 0)],
];

/// Evaluates the board: a winning line, a full-board draw, or in progress.
pub fn evaluate(board: &Board) -> GameStatus {
    for [a, b, c] in LINES {
        if let Some(Cell::Occupied(mark)) = board.get(a.0, a.1) {
            if board.get(b.0, b.1) == Some(Cell::Occupied(mark))
                && board.get(c.0, c.1) == Some(Cell::Occupied(mark))
            {
                return GameStatus::Won(mark);
            }
        }
    }

    if board.is_full() {
        GameStatus::Draw
    } else {
        GameStatus::InProgress
    }
}

/// Collects the coordinates of all empty cells, row-major.
pub fn open_cells(board: &Board) -> Vec<(usize, usize)> {
    (0..SIZE)
        .flat_map(|row| (0..SIZE).map(move |col| (row, col)))
        .filter(|&(row, col)| board.is_empty(row, col))
        .collect()
}
