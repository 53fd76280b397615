//! Event-driven commentary orchestration.
//!
//! Every game event (a move or a human chat line) becomes a job for a
//! single worker task, which calls the commentary provider and appends the
//! result to the transcript. One worker means requests are serialized:
//! transcript order always matches event order, and responses can never
//! interleave.

use crate::game::{GameStatus, Mark, Seat};
use crate::transcript::{Sender, Transcript};
use async_trait::async_trait;
use derive_more::{Display, Error};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, error, instrument, warn};

/// Serializable description of the game state sent to the commentary
/// provider.
///
/// `turn` is the side to move *after* the triggering event; on a terminal
/// move it stays on the mover, since nobody is to move.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameSnapshot {
    /// 3x3 grid of marks, row-major; `None` for empty cells.
    pub board: [[Option<Mark>; 3]; 3],
    /// The mark the human plays with.
    pub human_mark: Mark,
    /// The mark the computer plays with.
    pub computer_mark: Mark,
    /// Side nominally to move.
    pub turn: Seat,
}

/// A game event worth commenting on.
#[derive(Debug, Clone)]
pub enum GameEvent {
    /// A mark was placed.
    Move {
        /// Who moved.
        seat: Seat,
        /// The mark placed.
        mark: Mark,
        /// Row of the placed mark.
        row: usize,
        /// Column of the placed mark.
        col: usize,
        /// Round status after the move.
        status: GameStatus,
    },
    /// The human typed a chat message.
    Chat {
        /// The literal message text.
        text: String,
    },
}

impl GameEvent {
    /// Short natural-language description of the event, for the prompt.
    ///
    /// Coordinates are 1-based here; the rest of the crate is 0-based.
    pub fn description(&self) -> String {
        match self {
            GameEvent::Move {
                seat,
                mark,
                row,
                col,
                status,
            } => {
                let at = format!("{} played {} at ({}, {})", seat.label(), mark, row + 1, col + 1);
                match status {
                    GameStatus::Won(winner) => format!("{at} and won the round with {winner}"),
                    GameStatus::Draw => format!("{at}, filling the board for a draw"),
                    GameStatus::InProgress => at,
                }
            }
            GameEvent::Chat { text } => format!("Player says: \"{text}\""),
        }
    }
}

/// Failure modes of the external commentary service.
#[derive(Debug, Clone, Display, Error)]
pub enum CommentaryError {
    /// No API key was configured for the provider.
    #[display("{env_var} not set. Add it to the environment or a .env file")]
    MissingCredential {
        /// Environment variable that was expected to hold the key.
        env_var: &'static str,
    },
    /// The service answered with an error of its own.
    #[display("API returned error{}: {body}", status.map(|s| format!(" {s}")).unwrap_or_default())]
    Api {
        /// HTTP status code, when the client surface exposes one.
        status: Option<u16>,
        /// Response body or error message text.
        body: String,
    },
    /// The request never got a response.
    #[display("request failed: {message}")]
    Transport {
        /// Underlying transport error.
        message: String,
    },
    /// The request could not be built or serialized.
    #[display("failed to build request: {message}")]
    InvalidRequest {
        /// Underlying builder error.
        message: String,
    },
}

/// External text-generation collaborator.
///
/// Implementations must surface failures as [`CommentaryError`]; a
/// syntactically valid but textless response is not a failure, and should
/// come back as a fallback line instead.
#[async_trait]
pub trait CommentaryProvider: Send + Sync {
    /// Generates one trash-talk line for the given snapshot and event.
    ///
    /// `style`, when present, fully replaces the default persona framing;
    /// the snapshot and event data are appended either way.
    async fn generate(
        &self,
        snapshot: &GameSnapshot,
        event_description: &str,
        style: Option<&str>,
    ) -> Result<String, CommentaryError>;
}

struct CommentaryJob {
    snapshot: GameSnapshot,
    description: String,
    style: Option<String>,
}

/// Pairs game events with asynchronous commentary requests.
///
/// The orchestrator is the sole appender to the transcript. It owns the
/// pending flag: the flag goes up when a job is queued and comes down after
/// the reply (or the synthesized error line) lands in the transcript, on
/// every exit path.
pub struct CommentaryOrchestrator {
    job_tx: mpsc::UnboundedSender<CommentaryJob>,
    pending: Arc<AtomicUsize>,
    transcript: Arc<Mutex<Transcript>>,
}

impl CommentaryOrchestrator {
    /// Spawns the worker task and returns the orchestrator handle.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(
        provider: Arc<dyn CommentaryProvider>,
        transcript: Arc<Mutex<Transcript>>,
    ) -> Self {
        let (job_tx, mut job_rx) = mpsc::unbounded_channel::<CommentaryJob>();
        let pending = Arc::new(AtomicUsize::new(0));

        let worker_pending = Arc::clone(&pending);
        let worker_transcript = Arc::clone(&transcript);
        tokio::spawn(async move {
            while let Some(job) = job_rx.recv().await {
                let reply = match provider
                    .generate(&job.snapshot, &job.description, job.style.as_deref())
                    .await
                {
                    Ok(text) => text,
                    Err(err) => {
                        // Failures become chat content, never a propagated error.
                        warn!(error = %err, "commentary request failed");
                        format!("AI error: {err}")
                    }
                };
                worker_transcript
                    .lock()
                    .unwrap()
                    .append(Sender::Computer, reply);
                worker_pending.fetch_sub(1, Ordering::SeqCst);
            }
            debug!("commentary channel closed, worker exiting");
        });

        Self {
            job_tx,
            pending,
            transcript,
        }
    }

    /// Appends a canned line of the computer's own, such as the session
    /// greeting. No provider call, no pending flag.
    pub fn announce(&self, text: impl Into<String>) {
        self.transcript.lock().unwrap().append(Sender::Computer, text);
    }

    /// Hands a game event to the commentary pipeline. Fire-and-forget.
    ///
    /// A [`GameEvent::Chat`] first appends the human's own message, then
    /// queues the commentary request; the reply always lands after it.
    #[instrument(skip_all)]
    pub fn notify(&self, event: GameEvent, snapshot: GameSnapshot, style: Option<String>) {
        if let GameEvent::Chat { text } = &event {
            self.transcript
                .lock()
                .unwrap()
                .append(Sender::Human, text.clone());
        }

        let description = event.description();
        debug!(%description, "queueing commentary request");

        self.pending.fetch_add(1, Ordering::SeqCst);
        let job = CommentaryJob {
            snapshot,
            description,
            style,
        };
        if self.job_tx.send(job).is_err() {
            // Worker is gone (runtime shutting down). Release the flag so
            // input does not stay locked forever.
            self.pending.fetch_sub(1, Ordering::SeqCst);
            error!("commentary worker unavailable, dropping event");
        }
    }

    /// Checks whether a commentary request is queued or in flight.
    ///
    /// Drives the "typing..." indicator and gates new input.
    pub fn is_typing(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }
}
