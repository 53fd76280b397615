//! Tests for the commentary orchestrator: transcript ordering, error
//! recovery, and the pending flag.

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tictactoe_arena::{
    CommentaryError, CommentaryOrchestrator, CommentaryProvider, GameEvent, GameSnapshot,
    GameStatus, Mark, Seat, Sender, Transcript,
};

/// Provider that replays scripted results and records what it was asked.
struct ScriptedProvider {
    replies: Mutex<VecDeque<Result<String, CommentaryError>>>,
    descriptions: Mutex<Vec<String>>,
    styles: Mutex<Vec<Option<String>>>,
}

impl ScriptedProvider {
    fn new(replies: Vec<Result<String, CommentaryError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            descriptions: Mutex::new(Vec::new()),
            styles: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl CommentaryProvider for ScriptedProvider {
    async fn generate(
        &self,
        _snapshot: &GameSnapshot,
        event_description: &str,
        style: Option<&str>,
    ) -> Result<String, CommentaryError> {
        self.descriptions
            .lock()
            .unwrap()
            .push(event_description.to_string());
        self.styles.lock().unwrap().push(style.map(str::to_string));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("default quip".to_string()))
    }
}

fn empty_snapshot() -> GameSnapshot {
    GameSnapshot {
        board: [[None; 3]; 3],
        human_mark: Mark::X,
        computer_mark: Mark::O,
        turn: Seat::Human,
    }
}

async fn wait_idle(orchestrator: &CommentaryOrchestrator) {
    for _ in 0..1000 {
        if !orchestrator.is_typing() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(2)).await;
    }
    panic!("commentary never settled");
}

#[tokio::test]
async fn announce_appends_directly_without_engaging_the_provider() {
    let provider = ScriptedProvider::new(vec![]);
    let transcript = Arc::new(Mutex::new(Transcript::new()));
    let orchestrator = CommentaryOrchestrator::spawn(provider.clone(), Arc::clone(&transcript));

    orchestrator.announce("Ready when you are.");

    assert!(!orchestrator.is_typing(), "canned lines never raise the flag");
    let transcript = transcript.lock().unwrap();
    assert_eq!(transcript.len(), 1);
    assert_eq!(transcript.all()[0].sender, Sender::Computer);
    assert_eq!(transcript.all()[0].text, "Ready when you are.");
    assert!(provider.descriptions.lock().unwrap().is_empty());
}

#[tokio::test]
async fn move_event_appends_one_computer_message() {
    let provider = ScriptedProvider::new(vec![Ok("nice opener, I guess".to_string())]);
    let transcript = Arc::new(Mutex::new(Transcript::new()));
    let orchestrator = CommentaryOrchestrator::spawn(provider, Arc::clone(&transcript));

    assert!(!orchestrator.is_typing(), "flag must start clear");

    orchestrator.notify(
        GameEvent::Move {
            seat: Seat::Human,
            mark: Mark::X,
            row: 0,
            col: 0,
            status: GameStatus::InProgress,
        },
        empty_snapshot(),
        None,
    );
    assert!(orchestrator.is_typing(), "flag raised while in flight");
    wait_idle(&orchestrator).await;

    let transcript = transcript.lock().unwrap();
    assert_eq!(transcript.len(), 1);
    let message = &transcript.all()[0];
    assert_eq!(message.sender, Sender::Computer);
    assert_eq!(message.text, "nice opener, I guess");
}

#[tokio::test]
async fn provider_failure_becomes_an_ai_error_chat_line() {
    // The collaborator rejects with a network error.
    let provider = ScriptedProvider::new(vec![Err(CommentaryError::Transport {
        message: "connection refused".to_string(),
    })]);
    let transcript = Arc::new(Mutex::new(Transcript::new()));
    let orchestrator = CommentaryOrchestrator::spawn(provider, Arc::clone(&transcript));

    orchestrator.notify(
        GameEvent::Chat {
            text: "you there?".to_string(),
        },
        empty_snapshot(),
        None,
    );
    wait_idle(&orchestrator).await;

    let transcript = transcript.lock().unwrap();
    // The human's line plus exactly one synthesized error line.
    assert_eq!(transcript.len(), 2);
    let reply = &transcript.all()[1];
    assert_eq!(reply.sender, Sender::Computer);
    assert!(reply.text.starts_with("AI error: "), "got: {}", reply.text);
    assert!(reply.text.contains("connection refused"));
    assert!(!orchestrator.is_typing(), "flag cleared after failure");
}

#[tokio::test]
async fn chat_event_appends_human_message_before_the_reply() {
    let provider = ScriptedProvider::new(vec![Ok("bold words".to_string())]);
    let transcript = Arc::new(Mutex::new(Transcript::new()));
    let orchestrator = CommentaryOrchestrator::spawn(provider.clone(), Arc::clone(&transcript));

    orchestrator.notify(
        GameEvent::Chat {
            text: "prepare to lose".to_string(),
        },
        empty_snapshot(),
        None,
    );
    wait_idle(&orchestrator).await;

    let transcript = transcript.lock().unwrap();
    let messages = transcript.all();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].sender, Sender::Human);
    assert_eq!(messages[0].text, "prepare to lose");
    assert_eq!(messages[1].sender, Sender::Computer);
    assert!(messages[0].id < messages[1].id);

    // The provider saw the literal quoted chat line as the event.
    let descriptions = provider.descriptions.lock().unwrap();
    assert_eq!(descriptions.as_slice(), ["Player says: \"prepare to lose\""]);
}

#[tokio::test]
async fn queued_requests_resolve_in_submission_order() {
    let provider = ScriptedProvider::new(vec![
        Ok("first reply".to_string()),
        Ok("second reply".to_string()),
    ]);
    let transcript = Arc::new(Mutex::new(Transcript::new()));
    let orchestrator = CommentaryOrchestrator::spawn(provider.clone(), Arc::clone(&transcript));

    orchestrator.notify(
        GameEvent::Move {
            seat: Seat::Human,
            mark: Mark::X,
            row: 0,
            col: 0,
            status: GameStatus::InProgress,
        },
        empty_snapshot(),
        None,
    );
    orchestrator.notify(
        GameEvent::Move {
            seat: Seat::Computer,
            mark: Mark::O,
            row: 1,
            col: 1,
            status: GameStatus::InProgress,
        },
        empty_snapshot(),
        None,
    );
    wait_idle(&orchestrator).await;

    let transcript = transcript.lock().unwrap();
    let texts: Vec<&str> = transcript.all().iter().map(|m| m.text.as_str()).collect();
    assert_eq!(texts, ["first reply", "second reply"]);

    let descriptions = provider.descriptions.lock().unwrap();
    assert_eq!(
        descriptions.as_slice(),
        [
            "Player played X at (1, 1)",
            "Computer played O at (2, 2)",
        ]
    );
}

#[tokio::test]
async fn style_override_reaches_the_provider() {
    let provider = ScriptedProvider::new(vec![Ok("arr".to_string())]);
    let transcript = Arc::new(Mutex::new(Transcript::new()));
    let orchestrator = CommentaryOrchestrator::spawn(provider.clone(), Arc::clone(&transcript));

    orchestrator.notify(
        GameEvent::Chat {
            text: "talk like a pirate".to_string(),
        },
        empty_snapshot(),
        Some("Be a pirate.".to_string()),
    );
    wait_idle(&orchestrator).await;

    let styles = provider.styles.lock().unwrap();
    assert_eq!(styles.as_slice(), [Some("Be a pirate.".to_string())]);
}

#[test]
fn event_descriptions_read_naturally() {
    let won = GameEvent::Move {
        seat: Seat::Human,
        mark: Mark::X,
        row: 0,
        col: 2,
        status: GameStatus::Won(Mark::X),
    };
    assert_eq!(
        won.description(),
        "Player played X at (1, 3) and won the round with X"
    );

    let draw = GameEvent::Move {
        seat: Seat::Computer,
        mark: Mark::O,
        row: 2,
        col: 2,
        status: GameStatus::Draw,
    };
    assert_eq!(
        draw.description(),
        "Computer played O at (3, 3), filling the board for a draw"
    );
}
