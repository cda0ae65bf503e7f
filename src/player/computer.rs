//! Computer opponent: roll rationale and the full move-decision pipeline

use rand::Rng;
use tracing::debug;

use crate::board::{Board, Seat};
use crate::moves;
use crate::view::Log;

use super::{roll_total, PlayerState};

/// Roll dice for the computer, logging why this many dice were chosen.
pub fn roll_dice<R: Rng>(board: &Board, rng: &mut R, num_dice: u8, log: &mut dyn Log) -> u8 {
    if !board.check_upper_squares(Seat::Computer) {
        log.record(&format!(
            "\nThe computer must roll 2 dice (since at least one square from 7 to {} is uncovered).",
            board.size()
        ));
    } else if num_dice == 1 {
        log.record(&format!(
            "\nThe computer chooses to roll 1 dice.\nSquares 7 through {} are covered, and the sum of their remaining squares to cover is 6 or less",
            board.size()
        ));
    } else {
        log.record(&format!(
            "\nThe computer chooses to roll 2 dice.\nSquares 7 through {} are covered, and the sum of their remaining squares to cover is greater than 6",
            board.size()
        ));
    }
    let total = roll_total(rng, num_dice);
    log.record(&format!(
        "\nComputer rolled a total of {total} using {num_dice} dice."
    ));
    total
}

/// Play one computer sub-turn for `dice_sum`.
///
/// Checks for a dead roll, then an instant win, then falls back to the
/// cover/uncover heuristic (forced to cover while the turn counter is at
/// most 1) and applies the best generated move. Returns whether the
/// computer's multi-roll turn should continue; the engine's roll loop, not
/// this function, ends the turn.
pub fn make_move(
    board: &mut Board,
    state: &mut PlayerState,
    dice_sum: u8,
    log: &mut dyn Log,
) -> bool {
    log.record(&format!("\nComputer's move. Dice sum: {dice_sum}"));
    log.record(&board.render());

    if super::check_no_moves_available(board, Seat::Computer, dice_sum) {
        log.record(&format!(
            "\n\nNo available squares to cover or uncover that add up to {dice_sum}. Turn ended.\n"
        ));
        return false;
    }

    if let Some(win) = super::instant_win_move(board, Seat::Computer, dice_sum) {
        state.set_won_by_cover(win.by_cover);
        log.record(&format!(
            "Computer found a winning move by {} the following square(s): {}",
            if win.by_cover { "covering" } else { "uncovering" },
            moves::format_move(&win.squares)
        ));
        for &sq in &win.squares {
            if win.by_cover {
                board.cover_square(Seat::Computer, sq);
            } else {
                board.uncover_square(Seat::Human, sq);
            }
        }
        return false;
    }

    let mut cover_own = super::should_cover_own_squares(board, Seat::Computer, dice_sum);
    if !cover_own && board.turn() <= 1 {
        cover_own = true;
    }
    debug!(dice_sum, cover_own, turn = board.turn(), "computer decision");

    let available = if cover_own {
        board.available_squares(Seat::Computer, true)
    } else {
        board.available_squares(Seat::Human, false)
    };

    let valid_moves = moves::all_valid_moves(&available, dice_sum);
    if valid_moves.is_empty() {
        log.record(&format!(
            "No available squares to {}. Turn skipped.",
            if cover_own { "cover" } else { "uncover" }
        ));
        return false;
    }

    log.record(&format!(
        "Computer chooses to {}.",
        if cover_own {
            "cover its own squares"
        } else {
            "uncover opponent's squares"
        }
    ));
    log.record(&format!(
        "There are more {} moves that will lead the computer to victory, so it's the best option.",
        if cover_own { "covering" } else { "uncovering" }
    ));
    moves::display_valid_moves(&valid_moves, log);

    // choose_best_move returns Some here; the empty case bailed above.
    let chosen = moves::choose_best_move(&valid_moves, cover_own)
        .cloned()
        .unwrap_or_default();

    let mut applied = String::from("Computer ");
    applied.push_str(if cover_own { "covered" } else { "uncovered" });
    applied.push_str(" squares: ");
    for &sq in &chosen {
        if cover_own {
            board.cover_square(Seat::Computer, sq);
        } else {
            board.uncover_square(Seat::Human, sq);
        }
        applied.push_str(&format!("{sq} "));
    }
    log.record(&applied);
    if cover_own {
        log.record("This move covers the square with the highest individual value possible");
    } else {
        log.record("This move uncovers as many opponent squares as possible");
    }
    log.record(&board.render());

    !super::check_win(board, Seat::Computer)
}
