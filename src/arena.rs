//! Arena session: the single state container behind the UI.
//!
//! The session wraps the pure turn controller in the async shell the UI
//! needs: input gating while commentary is pending, the computer's
//! randomized thinking delay, score bookkeeping on terminal transitions, and
//! the hand-off of every event to the commentary orchestrator.

use crate::commentary::{CommentaryOrchestrator, CommentaryProvider, GameEvent, GameSnapshot};
use crate::game::{
    Board, GameStatus, MoveOutcome, Seat, TurnController, TurnError, select_move,
};
use crate::score::{Score, Scoreboard};
use crate::transcript::{ChatMessage, Transcript};
use rand::Rng;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, error, info, instrument};

/// Opening line seeded into the transcript of every new session.
pub const GREETING: &str = "Ready to get schooled at Tic Tac Toe?";

/// Bounds of the computer's simulated thinking delay. Pure pacing; the
/// round epoch, not the delay, is what keeps ordering correct.
const THINKING_DELAY_MIN_MS: u64 = 700;
const THINKING_DELAY_MAX_MS: u64 = 1300;

struct Core {
    controller: TurnController,
    scoreboard: Scoreboard,
}

struct Shared {
    core: Mutex<Core>,
    transcript: Arc<Mutex<Transcript>>,
    commentary: CommentaryOrchestrator,
    style: Mutex<Option<String>>,
    /// Bumped on every reset; scheduled computer moves from an earlier
    /// round compare against it and fire harmlessly.
    epoch: AtomicU64,
}

/// A complete game session: board, turns, score, chat, and commentary.
///
/// All game-state mutation happens synchronously under one lock; the only
/// suspending operations are the thinking delay and the commentary request,
/// both running on spawned tasks. Cloning the session yields another handle
/// to the same state. Construct inside a tokio runtime.
#[derive(Clone)]
pub struct ArenaSession {
    shared: Arc<Shared>,
}

impl ArenaSession {
    /// Creates a session, spawns the commentary worker, and seeds the
    /// greeting line.
    pub fn new(provider: Arc<dyn CommentaryProvider>) -> Self {
        info!("Creating arena session");
        let transcript = Arc::new(Mutex::new(Transcript::new()));
        let commentary = CommentaryOrchestrator::spawn(provider, Arc::clone(&transcript));
        commentary.announce(GREETING);
        Self {
            shared: Arc::new(Shared {
                core: Mutex::new(Core {
                    controller: TurnController::new(),
                    scoreboard: Scoreboard::new(),
                }),
                transcript,
                commentary,
                style: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    /// Handles a cell click from the human.
    ///
    /// On success the move is applied, a terminal result is recorded on the
    /// scoreboard, a computer reply is scheduled when the round continues,
    /// and the commentary orchestrator is notified.
    ///
    /// # Errors
    ///
    /// [`TurnError::InputLocked`] while commentary is pending, otherwise
    /// the controller's own rejections. No state changes on error.
    #[instrument(skip(self))]
    pub fn submit_player_move(&self, row: usize, col: usize) -> Result<MoveOutcome, TurnError> {
        let shared = &self.shared;
        if shared.commentary.is_typing() {
            debug!("move rejected: commentary pending");
            return Err(TurnError::InputLocked);
        }

        let (outcome, snapshot) = {
            let mut core = shared.core.lock().unwrap();
            let outcome = core.controller.submit_player_move(row, col)?;
            if outcome.status.is_terminal() {
                let human = core.controller.mark_of(Seat::Human);
                core.scoreboard.record(outcome.status, human);
            }
            (outcome, snapshot_of(&core.controller))
        };

        if outcome.status == GameStatus::InProgress {
            self.schedule_computer_move();
        }
        shared.notify_move(&outcome, snapshot);
        Ok(outcome)
    }

    /// Handles a chat submission from the human.
    ///
    /// The message lands in the transcript followed by the commentator's
    /// reply. Blank input is ignored.
    ///
    /// # Errors
    ///
    /// [`TurnError::InputLocked`] while commentary is pending.
    #[instrument(skip_all)]
    pub fn submit_chat(&self, text: impl Into<String>) -> Result<(), TurnError> {
        let shared = &self.shared;
        if shared.commentary.is_typing() {
            debug!("chat rejected: commentary pending");
            return Err(TurnError::InputLocked);
        }
        let text = text.into();
        if text.trim().is_empty() {
            return Ok(());
        }

        let snapshot = {
            let core = shared.core.lock().unwrap();
            snapshot_of(&core.controller)
        };
        shared
            .commentary
            .notify(GameEvent::Chat { text }, snapshot, shared.style());
        Ok(())
    }

    /// Starts a fresh round. The score and the transcript survive; a
    /// commentary request already in flight still lands, tagged with the
    /// state it was dispatched under.
    #[instrument(skip(self))]
    pub fn reset(&self) {
        self.shared.epoch.fetch_add(1, Ordering::SeqCst);
        self.shared.core.lock().unwrap().controller.reset();
        info!("round reset");
    }

    /// Sets the style override for commentary prompts. Blank text clears it.
    pub fn set_style(&self, style: impl Into<String>) {
        let style = style.into();
        let mut slot = self.shared.style.lock().unwrap();
        *slot = if style.trim().is_empty() {
            None
        } else {
            Some(style)
        };
    }

    /// Returns the current board.
    pub fn board(&self) -> Board {
        self.shared.core.lock().unwrap().controller.board().clone()
    }

    /// Returns the round status.
    pub fn status(&self) -> GameStatus {
        self.shared.core.lock().unwrap().controller.status()
    }

    /// Returns whose turn it is.
    pub fn turn(&self) -> Seat {
        self.shared.core.lock().unwrap().controller.turn()
    }

    /// Returns the running tallies.
    pub fn score(&self) -> Score {
        self.shared.core.lock().unwrap().scoreboard.current()
    }

    /// Returns a copy of the chat transcript in insertion order.
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.shared.transcript.lock().unwrap().all().to_vec()
    }

    /// Checks whether the commentator is "typing" (a request is pending).
    pub fn is_typing(&self) -> bool {
        self.shared.commentary.is_typing()
    }

    /// Schedules the computer's reply after a randomized delay.
    fn schedule_computer_move(&self) {
        let shared = Arc::clone(&self.shared);
        let epoch = shared.epoch.load(Ordering::SeqCst);
        let delay = Duration::from_millis(
            rand::thread_rng().gen_range(THINKING_DELAY_MIN_MS..=THINKING_DELAY_MAX_MS),
        );
        debug!(?delay, "scheduling computer move");
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            shared.apply_computer_move(epoch);
        });
    }
}

impl Shared {
    /// Fires when the thinking delay elapses. A stale epoch or a round that
    /// is no longer waiting on the computer makes this a no-op.
    fn apply_computer_move(&self, epoch: u64) {
        let (outcome, snapshot) = {
            let mut core = self.core.lock().unwrap();
            if self.epoch.load(Ordering::SeqCst) != epoch {
                debug!("stale computer-move timer, round was reset");
                return;
            }
            if core.controller.status().is_terminal() || core.controller.turn() != Seat::Computer {
                debug!("computer-move timer fired with nothing to do");
                return;
            }

            let (row, col) = match select_move(core.controller.board()) {
                Ok(cell) => cell,
                Err(err) => {
                    // Unreachable under controller sequencing: a full board
                    // is terminal before the computer's turn comes up.
                    error!(error = %err, "move strategy invariant violated");
                    return;
                }
            };
            let outcome = match core.controller.apply_computer_move(row, col) {
                Ok(outcome) => outcome,
                Err(err) => {
                    error!(error = %err, "computer move rejected");
                    return;
                }
            };
            if outcome.status.is_terminal() {
                let human = core.controller.mark_of(Seat::Human);
                core.scoreboard.record(outcome.status, human);
            }
            (outcome, snapshot_of(&core.controller))
        };

        self.notify_move(&outcome, snapshot);
    }

    fn notify_move(&self, outcome: &MoveOutcome, snapshot: GameSnapshot) {
        self.commentary.notify(
            GameEvent::Move {
                seat: outcome.seat,
                mark: outcome.mark,
                row: outcome.row,
                col: outcome.col,
                status: outcome.status,
            },
            snapshot,
            self.style(),
        );
    }

    fn style(&self) -> Option<String> {
        self.style.lock().unwrap().clone()
    }
}

/// Builds the snapshot sent to the commentary provider. The `turn` field
/// reflects the side to move after the triggering event.
fn snapshot_of(controller: &TurnController) -> GameSnapshot {
    GameSnapshot {
        board: controller.board().rows(),
        human_mark: controller.mark_of(Seat::Human),
        computer_mark: controller.mark_of(Seat::Computer),
        turn: controller.turn(),
    }
}
