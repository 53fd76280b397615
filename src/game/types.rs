//! Core domain types for the tic-tac-toe board.

use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Board side length.
pub const SIZE: usize = 3;

/// A mark placed on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Mark {
    /// The X mark (goes first).
    X,
    /// The O mark (goes second).
    O,
}

impl Mark {
    /// Returns the opposing mark.
    pub fn opponent(self) -> Self {
        match self {
            Mark::X => Mark::O,
            Mark::O => Mark::X,
        }
    }
}

/// Which side acts: the human at the keyboard or the computer opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Seat {
    /// The human player.
    Human,
    /// The computer opponent.
    Computer,
}

impl Seat {
    /// Returns the other seat.
    pub fn opponent(self) -> Self {
        match self {
            Seat::Human => Seat::Computer,
            Seat::Computer => Seat::Human,
        }
    }

    /// Label used in event descriptions and prompts.
    pub fn label(self) -> &'static str {
        match self {
            Seat::Human => "Player",
            Seat::Computer => "Computer",
        }
    }
}

/// A cell on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty cell.
    Empty,
    /// Cell occupied by a mark.
    Occupied(Mark),
}

/// 3x3 tic-tac-toe board, row-major.
///
/// Cells are immutable once set: [`Board::place`] refuses to overwrite, so
/// the only way back to an empty cell is a fresh board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// Cells in row-major order (0-8).
    cells: [Cell; 9],
}

/// An illegal placement, rejected with no change to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
pub enum IllegalMove {
    /// Coordinates outside the 3x3 grid.
    #[display("cell ({row}, {col}) is outside the board")]
    OutOfBounds {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
    /// Target cell already holds a mark.
    #[display("cell ({row}, {col}) is already occupied")]
    CellOccupied {
        /// Requested row.
        row: usize,
        /// Requested column.
        col: usize,
    },
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; 9],
        }
    }

    /// Gets the cell at the given coordinates, or `None` if out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        if row >= SIZE || col >= SIZE {
            return None;
        }
        Some(self.cells[row * SIZE + col])
    }

    /// Checks whether the cell at the given coordinates is empty.
    ///
    /// Out-of-bounds coordinates are not empty.
    pub fn is_empty(&self, row: usize, col: usize) -> bool {
        matches!(self.get(row, col), Some(Cell::Empty))
    }

    /// Places a mark at the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`IllegalMove`] if the coordinates are out of bounds or the
    /// cell is occupied; the board is unchanged on error.
    pub fn place(&mut self, row: usize, col: usize, mark: Mark) -> Result<(), IllegalMove> {
        if row >= SIZE || col >= SIZE {
            return Err(IllegalMove::OutOfBounds { row, col });
        }
        let idx = row * SIZE + col;
        if self.cells[idx] != Cell::Empty {
            return Err(IllegalMove::CellOccupied { row, col });
        }
        self.cells[idx] = Cell::Occupied(mark);
        Ok(())
    }

    /// Checks if every cell holds a mark.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| *c != Cell::Empty)
    }

    /// Returns all cells as a slice, row-major.
    pub fn cells(&self) -> &[Cell; 9] {
        &self.cells
    }

    /// Returns the board as a 3x3 grid of optional marks, for snapshots.
    pub fn rows(&self) -> [[Option<Mark>; SIZE]; SIZE] {
        let mut rows = [[None; SIZE]; SIZE];
        for (idx, cell) in self.cells.iter().enumerate() {
            if let Cell::Occupied(mark) = cell {
                rows[idx / SIZE][idx % SIZE] = Some(*mark);
            }
        }
        rows
    }

    /// Formats the board as a human-readable string.
    pub fn display(&self) -> String {
        let mut result = String::new();
        for row in 0..SIZE {
            for col in 0..SIZE {
                let symbol = match self.cells[row * SIZE + col] {
                    Cell::Empty => '.',
                    Cell::Occupied(Mark::X) => 'X',
                    Cell::Occupied(Mark::O) => 'O',
                };
                result.push(symbol);
                if col < SIZE - 1 {
                    result.push('|');
                }
            }
            if row < SIZE - 1 {
                result.push_str("\n-+-+-\n");
            }
        }
        result
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Current status of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    /// Round is ongoing.
    InProgress,
    /// Round ended with a winning mark.
    Won(Mark),
    /// Round ended with a full board and no winner.
    Draw,
}

impl GameStatus {
    /// Checks whether the round has ended.
    ///
    /// Terminal states are sticky: no move is accepted until a reset.
    pub fn is_terminal(self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }
}
