//! Human player: dice rolling and validated move execution

use std::collections::BTreeSet;

use rand::Rng;

use crate::board::{Board, Seat};
use crate::view::Log;

use super::roll_total;

/// Roll `num_dice` dice for the human and log the total.
pub fn roll_dice<R: Rng>(rng: &mut R, num_dice: u8, log: &mut dyn Log) -> u8 {
    let total = roll_total(rng, num_dice);
    log.record(&format!(
        "\nYou rolled a total of {total} using {num_dice} dice."
    ));
    total
}

/// Apply the human's selected squares as one cover or uncover move.
///
/// The selection must hold 1 to 4 squares, its running sum may never exceed
/// `dice_sum`, and the final sum must match it exactly. Any violation logs a
/// descriptive message and leaves the board untouched. Covering targets the
/// human's own row; uncovering targets the computer's.
pub fn make_move(
    board: &mut Board,
    selection: &BTreeSet<u8>,
    dice_sum: u8,
    is_cover: bool,
    log: &mut dyn Log,
) -> bool {
    if selection.is_empty() || selection.len() > 4 {
        log.record(&format!(
            "\nYou must select between 1 and 4 squares that add exactly to {dice_sum}."
        ));
        return false;
    }

    let mut total = 0u16;
    for &sq in selection {
        if total + sq as u16 > dice_sum as u16 {
            log.record(&format!(
                "\nSum: {total} + {sq} = {}, Adding {sq} would exceed {dice_sum}. Try a different move.",
                total + sq as u16
            ));
            return false;
        }
        total += sq as u16;
    }

    if total != dice_sum as u16 {
        log.record(&format!(
            "\nSum: {total} != {dice_sum}. Try a different move."
        ));
        return false;
    }

    let mut result = String::from("\nYou ");
    result.push_str(if is_cover { "covered" } else { "uncovered" });
    result.push_str(" squares: ");
    for &sq in selection {
        if is_cover {
            board.cover_square(Seat::Human, sq);
        } else {
            board.uncover_square(Seat::Computer, sq);
        }
        result.push_str(&format!("{sq} "));
    }
    log.record(&result);
    log.record(&board.render());
    true
}
