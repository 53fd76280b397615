//! Turn sequencing state machine.
//!
//! The controller is purely synchronous: it owns the board, the turn owner,
//! and the round status, and nothing else. Input gating on pending
//! commentary, the computer's thinking delay, and score bookkeeping are the
//! arena session's business.

use super::rules;
use super::types::{Board, GameStatus, IllegalMove, Mark, Seat};
use derive_more::{Display, Error, From};
use tracing::{debug, instrument, warn};

/// A move rejected by the turn controller or the arena session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Error, From)]
pub enum TurnError {
    /// The placement itself was illegal (occupied or out of bounds).
    #[display("{_0}")]
    #[from]
    Illegal(IllegalMove),
    /// A side tried to move out of turn.
    #[display("not this side's turn")]
    NotPlayerTurn,
    /// The round has already ended; reset to play again.
    #[display("the round is over")]
    GameOver,
    /// Input is locked while a commentary request is in flight.
    #[display("waiting for commentary to finish")]
    InputLocked,
}

/// A successful move: who moved, where, and what the board looks like now.
///
/// This is the event fed to the commentary orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    /// Who made the move.
    pub seat: Seat,
    /// The mark that was placed.
    pub mark: Mark,
    /// Row of the placed mark.
    pub row: usize,
    /// Column of the placed mark.
    pub col: usize,
    /// The board after the move.
    pub board: Board,
    /// The round status after the move.
    pub status: GameStatus,
}

/// Alternates human and computer turns over a single board.
///
/// The human always opens with X, the computer replies with O. Exactly one
/// cell changes per accepted move and the turn flips exactly once, except
/// on a terminal move, where the turn freezes until [`TurnController::reset`].
#[derive(Debug, Clone)]
pub struct TurnController {
    board: Board,
    turn: Seat,
    status: GameStatus,
}

impl TurnController {
    /// Creates a controller with an empty board, human to move.
    pub fn new() -> Self {
        Self {
            board: Board::new(),
            turn: Seat::Human,
            status: GameStatus::InProgress,
        }
    }

    /// Returns the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Returns whose turn it is. Frozen while the round is over.
    pub fn turn(&self) -> Seat {
        self.turn
    }

    /// Returns the round status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Returns the mark a seat plays with.
    pub fn mark_of(&self, seat: Seat) -> Mark {
        match seat {
            Seat::Human => Mark::X,
            Seat::Computer => Mark::O,
        }
    }

    /// Applies a human move.
    ///
    /// # Errors
    ///
    /// Rejects with [`TurnError::GameOver`] once the round has ended, with
    /// [`TurnError::NotPlayerTurn`] while the computer is to move, and with
    /// [`TurnError::Illegal`] for an occupied or out-of-bounds cell. The
    /// state is unchanged on every error path.
    #[instrument(skip(self))]
    pub fn submit_player_move(&mut self, row: usize, col: usize) -> Result<MoveOutcome, TurnError> {
        self.apply(Seat::Human, row, col)
    }

    /// Applies a computer move at the coordinates chosen by the strategy.
    ///
    /// # Errors
    ///
    /// Same contract as [`TurnController::submit_player_move`], from the
    /// computer's side.
    #[instrument(skip(self))]
    pub fn apply_computer_move(&mut self, row: usize, col: usize) -> Result<MoveOutcome, TurnError> {
        self.apply(Seat::Computer, row, col)
    }

    fn apply(&mut self, seat: Seat, row: usize, col: usize) -> Result<MoveOutcome, TurnError> {
        if self.status.is_terminal() {
            warn!(?seat, row, col, "move rejected: round is over");
            return Err(TurnError::GameOver);
        }
        if self.turn != seat {
            warn!(?seat, current = ?self.turn, "move rejected: out of turn");
            return Err(TurnError::NotPlayerTurn);
        }

        let mark = self.mark_of(seat);
        self.board.place(row, col, mark)?;
        self.status = rules::evaluate(&self.board);
        if !self.status.is_terminal() {
            self.turn = seat.opponent();
        }

        debug!(?seat, row, col, status = ?self.status, "move applied");
        Ok(MoveOutcome {
            seat,
            mark,
            row,
            col,
            board: self.board.clone(),
            status: self.status,
        })
    }

    /// Starts a fresh round: empty board, human to move. Legal from any state.
    #[instrument(skip(self))]
    pub fn reset(&mut self) {
        debug!("resetting round");
        self.board = Board::new();
        self.turn = Seat::Human;
        self.status = GameStatus::InProgress;
    }
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}
