//! Computer move selection.
//!
//! The policy is uniform-random over open cells. That is a design choice:
//! the opponent is meant to be beatable, the entertainment lives in the
//! chat panel.

use super::rules;
use super::types::Board;
use derive_more::{Display, Error};
use rand::seq::SliceRandom;
use tracing::debug;

/// The strategy was invoked on a full board.
///
/// This is an internal invariant violation: the turn controller never hands
/// the computer a turn on a terminal board, so a correct caller cannot see
/// this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error)]
#[display("no moves available: the board is full")]
pub struct NoMovesAvailable;

/// Picks a uniformly random open cell.
///
/// # Errors
///
/// Returns [`NoMovesAvailable`] if the board has no empty cell.
pub fn select_move(board: &Board) -> Result<(usize, usize), NoMovesAvailable> {
    let open = rules::open_cells(board);
    let pick = open
        .choose(&mut rand::thread_rng())
        .copied()
        .ok_or(NoMovesAvailable)?;
    debug!(row = pick.0, col = pick.1, open = open.len(), "selected computer move");
    Ok(pick)
}
