//! Pure tic-tac-toe game logic: board, rules, turn sequencing, and the
//! computer's move policy.

mod controller;
mod rules;
mod strategy;
mod types;

pub use controller::{MoveOutcome, TurnController, TurnError};
pub use rules::{evaluate, open_cells};
pub use strategy::{NoMovesAvailable, select_move};
pub use types::{Board, Cell, GameStatus, IllegalMove, Mark, SIZE, Seat};
