//! Engine round-orchestration tests

use canoga::board::Seat;
use canoga::save::SavedGame;
use canoga::GameEngine;
use tempfile::NamedTempFile;

use crate::mocks::RecordingView;

fn saved(
    computer_squares: Vec<u8>,
    human_squares: Vec<u8>,
    first: Seat,
    next: Seat,
) -> NamedTempFile {
    let record = SavedGame {
        computer_squares,
        computer_score: 0,
        human_squares,
        human_score: 0,
        first_turn: first,
        next_turn: next,
    };
    let file = NamedTempFile::new().unwrap();
    record.write_to(file.path()).unwrap();
    file
}

#[test]
fn first_round_establishes_a_coherent_turn_order() {
    let mut engine = GameEngine::with_seed(9, 99);
    let mut view = RecordingView::new();
    engine.start_round(1, &mut view);

    let human = engine.player(Seat::Human);
    let computer = engine.player(Seat::Computer);
    assert_ne!(human.is_first(), computer.is_first());
    assert_ne!(human.is_next(), computer.is_next());
    assert_eq!(human.is_first(), human.is_next());
    assert!(view.contains("goes first."));
    assert_eq!(engine.board().turn(), 0);
}

#[test]
fn digit_sum_wraps_past_the_board_size() {
    let engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    assert_eq!(engine.sum_of_two_digits(23, &mut view), 5);
    assert_eq!(engine.sum_of_two_digits(58, &mut view), 4);
    assert!(view.contains("wrap the advantage square"));
}

#[test]
fn handicap_covers_the_digit_sum_square_for_the_second_mover() {
    // Both players start flagged first; the engine reads the human as the
    // previous first mover, so the computer's board takes the advantage.
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.determine_handicap(23, &mut view);

    assert_eq!(engine.board().squares(Seat::Computer)[4], 0);
    assert!(engine.board().all_squares_uncovered(Seat::Human));
    // The marker sits on the previous first mover, who is the one barred
    // from uncovering the square early.
    assert_eq!(engine.player(Seat::Human).handicap_square(), 5);
    assert_eq!(engine.player(Seat::Computer).handicap_square(), 0);
    assert!(view.contains("Advantage given to computer player! The square 5 has been covered!"));
}

#[test]
fn zero_previous_score_gives_no_advantage() {
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.determine_handicap(0, &mut view);
    assert!(engine.board().all_squares_uncovered(Seat::Computer));
    assert!(view.contains("No advantage given!"));
}

#[test]
fn alternating_hands_first_move_to_the_other_seat() {
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.alternate_first_player(&mut view);
    assert!(engine.player(Seat::Computer).is_first());
    assert!(engine.player(Seat::Computer).is_next());
    assert!(!engine.player(Seat::Human).is_first());
}

#[test]
fn early_uncover_of_the_handicap_square_is_blocked() {
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.determine_handicap(23, &mut view);

    // Turn counter still at 0, so the uncover request flips to cover.
    assert!(engine.check_move_type(false, 5, &mut view));
    assert!(view.contains("You cannot remove the handicap square yet!"));
}

#[test]
fn move_type_flips_when_the_chosen_direction_is_empty() {
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    // Fresh board, no computer squares covered, so uncovering is empty.
    assert!(engine.check_move_type(false, 5, &mut view));
    assert!(view.contains("Switching to cover"));
}

#[test]
fn exhausted_roll_passes_the_turn() {
    // Human can only cover 4..9 and uncover computer 9; a roll of 2 reaches
    // neither.
    let file = saved(
        vec![1, 2, 3, 4, 5, 6, 7, 8, 0],
        vec![0, 0, 0, 4, 5, 6, 7, 8, 9],
        Seat::Human,
        Seat::Human,
    );
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.load_game(file.path(), &mut view).unwrap();

    assert!(!engine.check_move_available(2, Seat::Human, &mut view));
    assert_eq!(engine.next_seat(), Seat::Computer);
    assert!(view.contains("Turn ended"));

    assert!(engine.check_move_available(9, Seat::Computer, &mut view));
}

#[test]
fn human_move_through_the_engine_covers_its_own_row() {
    let file = saved(
        (1..=9).collect(),
        (1..=9).collect(),
        Seat::Human,
        Seat::Human,
    );
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.load_game(file.path(), &mut view).unwrap();

    let selection = [3, 4].into_iter().collect();
    assert!(engine.human_move(7, true, &selection, &mut view));
    assert_eq!(
        engine.board().squares(Seat::Human),
        &[1, 2, 0, 0, 5, 6, 7, 8, 9]
    );
}

#[test]
fn computer_turn_with_manual_rolls_consumes_the_queue() {
    // Give the computer one covered human square so the opening win
    // predicates stay unsatisfied, then feed two dead rolls.
    let file = saved(
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
        vec![0, 2, 3, 4, 5, 6, 7, 8, 9],
        Seat::Computer,
        Seat::Computer,
    );
    let mut engine = GameEngine::with_seed(9, 5);
    let mut view = RecordingView::new();
    engine.load_game(file.path(), &mut view).unwrap();

    // Sum 7 always has a cover move on a fresh row, so the computer plays
    // it, and a follow-up queue entry keeps the turn going until it runs
    // dry and the random loop takes over.
    let mut manual = [7u8, 5].into_iter().collect();
    let human_next = engine.computer_move(&mut manual, &mut view);
    assert!(manual.is_empty());
    if human_next {
        assert_eq!(engine.next_seat(), Seat::Human);
    }
}

#[test]
fn round_end_scores_a_cover_win_from_the_final_board() {
    let file = saved(
        vec![0, 0, 3, 4, 5, 6, 7, 8, 9],
        vec![0; 9],
        Seat::Human,
        Seat::Human,
    );
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.load_game(file.path(), &mut view).unwrap();

    assert!(engine.check_winner(Seat::Human));
    engine.round_end(Some(Seat::Human), 1, &mut view);

    // Opponent retained 3 + 4 + ... + 9 = 42.
    assert_eq!(engine.winner_score(), 42);
    let human = engine.player(Seat::Human);
    assert_eq!(human.round_score(), 42);
    assert_eq!(human.tournament_score(), 42);
    assert!(human.won_by_cover());
    assert!(human.won_previous());
    assert!(!engine.player(Seat::Computer).won_previous());
    assert!(view.contains("Human wins round 1 and earns 42 points!"));
    assert!(view.contains("Updated Tournament Score"));

    // Board resets for the next round.
    assert!(engine.board().all_squares_uncovered(Seat::Human));
    assert_eq!(engine.board().turn(), 0);
}

#[test]
fn round_end_scores_an_uncover_win() {
    // Computer row fully uncovered, human keeps 8 and 9 uncovered, so the
    // human won by uncovering: 45 - 17 = 28.
    let file = saved(
        (1..=9).collect(),
        vec![0, 0, 0, 0, 0, 0, 0, 8, 9],
        Seat::Human,
        Seat::Human,
    );
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.load_game(file.path(), &mut view).unwrap();

    assert!(engine.check_winner(Seat::Human));
    engine.round_end(Some(Seat::Human), 2, &mut view);
    assert_eq!(engine.winner_score(), 28);
    assert!(!engine.player(Seat::Human).won_by_cover());
}

#[test]
fn abandoned_round_records_no_score_but_still_resets() {
    let file = saved(
        vec![0, 2, 3, 4, 5, 6, 7, 8, 9],
        vec![1, 2, 3, 4, 5, 6, 7, 8, 9],
        Seat::Human,
        Seat::Human,
    );
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.load_game(file.path(), &mut view).unwrap();

    engine.round_end(None, 3, &mut view);
    assert_eq!(engine.winner_score(), 0);
    assert_eq!(engine.player(Seat::Human).tournament_score(), 0);
    assert!(view.contains("No winner this round"));
    assert!(engine.board().all_squares_uncovered(Seat::Computer));
}

#[test]
fn later_round_applies_handicap_then_alternates() {
    let file = saved(
        vec![0; 9],
        (1..=9).collect(),
        Seat::Computer,
        Seat::Human,
    );
    let mut engine = GameEngine::with_seed(9, 1);
    let mut view = RecordingView::new();
    engine.load_game(file.path(), &mut view).unwrap();

    // Computer won by covering everything; human retained 45.
    assert!(engine.check_winner(Seat::Computer));
    engine.round_end(Some(Seat::Computer), 1, &mut view);
    assert_eq!(engine.winner_score(), 45);

    engine.start_round(2, &mut view);
    // Digit sum of 45 is 9; the human was the second mover last round, so
    // the square lands on the human board.
    assert_eq!(engine.board().squares(Seat::Human)[8], 0);
    assert_eq!(engine.player(Seat::Computer).handicap_square(), 9);
    // Opening move alternates away from the computer.
    assert!(engine.player(Seat::Human).is_first());
    assert!(engine.player(Seat::Human).is_next());
}
