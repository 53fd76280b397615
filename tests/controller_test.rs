//! Tests for turn sequencing and score bookkeeping.

use tictactoe_arena::{
    Cell, GameStatus, IllegalMove, Mark, Scoreboard, Seat, TurnController, TurnError,
};

#[test]
fn opening_move_passes_turn_to_computer() {
    // Empty board, player places at (0,0).
    let mut controller = TurnController::new();
    let outcome = controller.submit_player_move(0, 0).expect("legal move");

    assert_eq!(outcome.seat, Seat::Human);
    assert_eq!(outcome.mark, Mark::X);
    assert_eq!(outcome.status, GameStatus::InProgress);
    assert_eq!(outcome.board.get(0, 0), Some(Cell::Occupied(Mark::X)));
    assert_eq!(controller.turn(), Seat::Computer);
}

#[test]
fn human_cannot_move_twice_in_a_row() {
    let mut controller = TurnController::new();
    controller.submit_player_move(0, 0).expect("legal move");
    assert_eq!(
        controller.submit_player_move(0, 1),
        Err(TurnError::NotPlayerTurn)
    );
}

#[test]
fn computer_cannot_open_the_round() {
    let mut controller = TurnController::new();
    assert_eq!(
        controller.apply_computer_move(1, 1),
        Err(TurnError::NotPlayerTurn)
    );
}

#[test]
fn occupied_cell_is_rejected_without_state_change() {
    let mut controller = TurnController::new();
    controller.submit_player_move(0, 0).expect("legal move");

    let err = controller.apply_computer_move(0, 0).expect_err("occupied");
    assert_eq!(
        err,
        TurnError::Illegal(IllegalMove::CellOccupied { row: 0, col: 0 })
    );
    // Still the computer's turn, board untouched beyond the first mark.
    assert_eq!(controller.turn(), Seat::Computer);
    assert_eq!(controller.status(), GameStatus::InProgress);
}

#[test]
fn winning_move_goes_terminal_and_freezes_the_turn() {
    // From [[X,X,_],[O,O,_],[_,_,_]], the player completes the top row.
    let mut controller = TurnController::new();
    controller.submit_player_move(0, 0).expect("X");
    controller.apply_computer_move(1, 0).expect("O");
    controller.submit_player_move(0, 1).expect("X");
    controller.apply_computer_move(1, 1).expect("O");

    let outcome = controller.submit_player_move(0, 2).expect("winning X");
    assert_eq!(outcome.status, GameStatus::Won(Mark::X));
    assert_eq!(controller.status(), GameStatus::Won(Mark::X));
    // Turn owner is frozen while terminal.
    assert_eq!(controller.turn(), Seat::Human);

    // Terminal state is sticky: nobody may move until a reset.
    assert_eq!(controller.submit_player_move(2, 2), Err(TurnError::GameOver));
    assert_eq!(controller.apply_computer_move(2, 2), Err(TurnError::GameOver));
}

#[test]
fn reset_restores_a_fresh_round() {
    let mut controller = TurnController::new();
    controller.submit_player_move(0, 0).expect("X");
    controller.apply_computer_move(1, 0).expect("O");
    controller.reset();

    assert_eq!(controller.status(), GameStatus::InProgress);
    assert_eq!(controller.turn(), Seat::Human);
    assert!(controller.board().cells().iter().all(|c| *c == Cell::Empty));
    // The board is playable again from the top.
    controller.submit_player_move(0, 0).expect("fresh round");
}

#[test]
fn scoreboard_increments_exactly_one_counter_per_result() {
    let mut scoreboard = Scoreboard::new();

    scoreboard.record(GameStatus::Won(Mark::X), Mark::X);
    let score = scoreboard.current();
    assert_eq!(
        (score.player_wins, score.computer_wins, score.draws),
        (1, 0, 0)
    );

    scoreboard.record(GameStatus::Won(Mark::O), Mark::X);
    let score = scoreboard.current();
    assert_eq!(
        (score.player_wins, score.computer_wins, score.draws),
        (1, 1, 0)
    );

    scoreboard.record(GameStatus::Draw, Mark::X);
    let score = scoreboard.current();
    assert_eq!(
        (score.player_wins, score.computer_wins, score.draws),
        (1, 1, 1)
    );
}

#[test]
fn scoreboard_ignores_non_terminal_status() {
    let mut scoreboard = Scoreboard::new();
    scoreboard.record(GameStatus::InProgress, Mark::X);
    assert_eq!(scoreboard.current(), Default::default());
}

#[test]
fn drawn_round_reaches_terminal_state() {
    // X O X / X O O / O X X, played out in alternating turn order.
    let mut controller = TurnController::new();
    controller.submit_player_move(0, 0).expect("X (0,0)");
    controller.apply_computer_move(0, 1).expect("O (0,1)");
    controller.submit_player_move(0, 2).expect("X (0,2)");
    controller.apply_computer_move(1, 1).expect("O (1,1)");
    controller.submit_player_move(1, 0).expect("X (1,0)");
    controller.apply_computer_move(1, 2).expect("O (1,2)");
    controller.submit_player_move(2, 1).expect("X (2,1)");
    controller.apply_computer_move(2, 0).expect("O (2,0)");
    let outcome = controller.submit_player_move(2, 2).expect("X (2,2)");

    assert_eq!(outcome.status, GameStatus::Draw);
    assert_eq!(controller.status(), GameStatus::Draw);
}
