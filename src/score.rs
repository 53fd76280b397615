//! Running win/draw tallies across rounds.

use crate::game::{GameStatus, Mark};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Win/draw tallies. Counters only ever go up; a round reset does not
/// touch them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Rounds won by the human.
    pub player_wins: u32,
    /// Rounds won by the computer.
    pub computer_wins: u32,
    /// Drawn rounds.
    pub draws: u32,
}

/// Sole writer of the [`Score`], fed terminal transitions by the arena.
#[derive(Debug, Clone, Default)]
pub struct Scoreboard {
    score: Score,
}

impl Scoreboard {
    /// Creates a scoreboard with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a terminal transition, incrementing exactly one counter.
    ///
    /// A non-terminal status is logged and ignored; the controller only
    /// reports terminal transitions here.
    pub fn record(&mut self, status: GameStatus, human_mark: Mark) {
        match status {
            GameStatus::Won(mark) if mark == human_mark => self.score.player_wins += 1,
            GameStatus::Won(_) => self.score.computer_wins += 1,
            GameStatus::Draw => self.score.draws += 1,
            GameStatus::InProgress => {
                warn!("asked to record a non-terminal status; ignoring");
                return;
            }
        }
        info!(score = ?self.score, "recorded round result");
    }

    /// Returns the current tallies.
    pub fn current(&self) -> Score {
        self.score
    }
}
