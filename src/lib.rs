//! Trash-talk tic-tac-toe arena.
//!
//! A tic-tac-toe engine wired to an LLM commentator: every move and every
//! chat line from the human triggers an asynchronous request for a line of
//! playful banter, appended to a shared chat transcript.
//!
//! # Architecture
//!
//! - **Game**: pure board, rules, and turn-sequencing logic
//! - **Arena**: the state container the UI talks to; gates input, paces the
//!   computer opponent, tallies scores
//! - **Commentary**: serialized pipeline from game events to the external
//!   text-generation provider
//! - **LLM client**: OpenAI/Anthropic-backed provider implementation
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use tictactoe_arena::{ArenaSession, LlmClient, LlmConfig, LlmProvider};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let provider = Arc::new(LlmClient::new(LlmConfig::from_env(LlmProvider::OpenAI)));
//! let arena = ArenaSession::new(provider);
//!
//! arena.submit_player_move(0, 0)?;
//! arena.submit_chat("good luck, toaster")?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod arena;
mod commentary;
mod game;
mod llm_client;
mod score;
mod transcript;

// Crate-level exports - Arena session
pub use arena::{ArenaSession, GREETING};

// Crate-level exports - Commentary pipeline
pub use commentary::{
    CommentaryError, CommentaryOrchestrator, CommentaryProvider, GameEvent, GameSnapshot,
};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmProvider};

// Crate-level exports - Score
pub use score::{Score, Scoreboard};

// Crate-level exports - Chat transcript
pub use transcript::{ChatMessage, Sender, Transcript};

// Crate-level exports - Game types
pub use game::{
    Board, Cell, GameStatus, IllegalMove, Mark, MoveOutcome, NoMovesAvailable, SIZE, Seat,
    TurnController, TurnError, evaluate, open_cells, select_move,
};
