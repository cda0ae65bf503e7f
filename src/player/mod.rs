//! Player state and the decision helpers shared by both seats
//!
//! The two player variants share one data shape ([`PlayerState`]) and a set
//! of free functions over the board; only dice rolling and move execution
//! differ, and those live in [`human`] and [`computer`].

pub mod computer;
pub mod human;

use rand::Rng;

use crate::board::{Board, Seat};
use crate::moves::{self, Move};
use crate::view::Log;

/// Per-player flags and scores, owned by the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerState {
    round_score: u32,
    tournament_score: u32,
    handicap_square: u8,
    is_first: bool,
    is_next: bool,
    won_by_cover: bool,
    won_previous: bool,
}

impl Default for PlayerState {
    fn default() -> Self {
        PlayerState {
            round_score: 0,
            tournament_score: 0,
            handicap_square: 0,
            is_first: true,
            is_next: false,
            won_by_cover: true,
            won_previous: false,
        }
    }
}

impl PlayerState {
    pub fn round_score(&self) -> u32 {
        self.round_score
    }

    pub fn tournament_score(&self) -> u32 {
        self.tournament_score
    }

    /// Handicap square assigned for the next round, 0 when none.
    pub fn handicap_square(&self) -> u8 {
        self.handicap_square
    }

    pub fn is_first(&self) -> bool {
        self.is_first
    }

    pub fn is_next(&self) -> bool {
        self.is_next
    }

    pub fn won_by_cover(&self) -> bool {
        self.won_by_cover
    }

    pub fn won_previous(&self) -> bool {
        self.won_previous
    }

    pub fn set_round_score(&mut self, score: u32) {
        self.round_score = score;
    }

    pub fn set_tournament_score(&mut self, score: u32) {
        self.tournament_score = score;
    }

    /// Accumulate a round score, rejecting anything above the board's
    /// computed maximum.
    pub fn add_tournament_score(&mut self, score: u32, max_score: u32) -> bool {
        if score <= max_score {
            self.tournament_score += score;
            return true;
        }
        false
    }

    /// Record the handicap square; must be 0 (none) or within the board.
    pub fn set_handicap_square(&mut self, square: u8, board_size: usize) -> bool {
        if square as usize <= board_size {
            self.handicap_square = square;
            return true;
        }
        false
    }

    pub fn set_is_first(&mut self, first: bool) {
        self.is_first = first;
    }

    pub fn set_is_next(&mut self, next: bool) {
        self.is_next = next;
    }

    pub fn set_won_by_cover(&mut self, cover: bool) {
        self.won_by_cover = cover;
    }

    pub fn set_won_previous(&mut self, won: bool) {
        self.won_previous = won;
    }
}

/// Sum of `num_dice` independent uniform 1..6 draws.
pub fn roll_total<R: Rng>(rng: &mut R, num_dice: u8) -> u8 {
    (0..num_dice).map(|_| rng.random_range(1..=6u8)).sum()
}

/// 1 or 2 dice, driven by the upper-square rule: two dice are mandatory
/// until squares 7..size are covered, after which one die suffices when the
/// remaining coverable squares sum to 6 or less.
pub fn choose_num_dice(board: &Board, seat: Seat) -> u8 {
    if !board.check_upper_squares(seat) {
        return 2;
    }
    let sum: u32 = board
        .available_squares(seat, true)
        .iter()
        .map(|&s| s as u32)
        .sum();
    if sum <= 6 {
        1
    } else {
        2
    }
}

/// True when neither a cover nor an uncover move exists for `dice_sum`,
/// which is the sole condition that ends a turn with no action. Uncover
/// moves are off the table until the turn counter passes 1.
pub fn check_no_moves_available(board: &Board, seat: Seat, dice_sum: u8) -> bool {
    let cover_moves = moves::all_valid_moves(&board.available_squares(seat, true), dice_sum);
    let uncover_moves = if board.turn() <= 1 {
        Vec::new()
    } else {
        moves::all_valid_moves(
            &board.available_squares(seat.opponent(), false),
            dice_sum,
        )
    };
    cover_moves.is_empty() && uncover_moves.is_empty()
}

/// A single move that wins the round outright.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstantWin {
    pub squares: Move,
    /// Whether the win comes from covering the last own square rather than
    /// uncovering the opponent's last covered one.
    pub by_cover: bool,
}

/// Search for a move that alone satisfies a winning predicate for `seat`:
/// own row fully covered, or opponent row fully uncovered.
///
/// Every candidate is applied to a cloned board, never the live one. Cover
/// moves are tried before uncover moves and the first winner is returned.
/// Disabled while the turn counter is at most 1 or a win predicate already
/// holds.
pub fn instant_win_move(board: &Board, seat: Seat, dice_sum: u8) -> Option<InstantWin> {
    if board.turn() <= 1
        || board.all_squares_covered(seat)
        || board.all_squares_uncovered(seat.opponent())
    {
        return None;
    }

    let cover_moves = moves::all_valid_moves(&board.available_squares(seat, true), dice_sum);
    for mv in cover_moves {
        let mut trial = board.clone();
        for &sq in &mv {
            trial.cover_square(seat, sq);
        }
        if trial.all_squares_covered(seat) {
            return Some(InstantWin { squares: mv, by_cover: true });
        }
        if trial.all_squares_uncovered(seat.opponent()) {
            return Some(InstantWin { squares: mv, by_cover: false });
        }
    }

    let uncover_moves =
        moves::all_valid_moves(&board.available_squares(seat.opponent(), false), dice_sum);
    for mv in uncover_moves {
        let mut trial = board.clone();
        for &sq in &mv {
            trial.uncover_square(seat.opponent(), sq);
        }
        if trial.all_squares_covered(seat) {
            return Some(InstantWin { squares: mv, by_cover: true });
        }
        if trial.all_squares_uncovered(seat.opponent()) {
            return Some(InstantWin { squares: mv, by_cover: false });
        }
    }

    None
}

/// Heuristic preference between covering own squares and uncovering the
/// opponent's. Forced one way when only one kind of move exists; otherwise
/// compares the available square counts against half the board size.
pub fn should_cover_own_squares(board: &Board, seat: Seat, dice_sum: u8) -> bool {
    let available_cover = board.available_squares(seat, true);
    let available_uncover = board.available_squares(seat.opponent(), false);

    let cover_moves = moves::all_valid_moves(&available_cover, dice_sum);
    let uncover_moves = moves::all_valid_moves(&available_uncover, dice_sum);

    if !cover_moves.is_empty() && uncover_moves.is_empty() {
        return true;
    }
    if cover_moves.is_empty() && !uncover_moves.is_empty() {
        return false;
    }

    let ratio = board.size() / 2;
    if available_cover.len() <= ratio {
        return true;
    }
    if available_uncover.len() < ratio {
        return false;
    }
    true
}

/// A seat has won once its row is fully covered or the opponent's is fully
/// uncovered, but only after the turn counter has passed 1.
pub fn check_win(board: &Board, seat: Seat) -> bool {
    (board.all_squares_covered(seat) || board.all_squares_uncovered(seat.opponent()))
        && board.turn() > 1
}

/// Round score for the winner: by-cover wins score the opponent's remaining
/// squares, by-uncover wins score the board maximum minus the winner's own
/// remaining squares.
pub fn calculate_round_score(board: &Board, winner: Seat, won_by_cover: bool) -> u32 {
    if won_by_cover {
        board
            .squares(winner.opponent())
            .iter()
            .map(|&s| s as u32)
            .sum()
    } else {
        let own: u32 = board.squares(winner).iter().map(|&s| s as u32).sum();
        board.max_score() - own
    }
}

/// Advise the human on the strongest move among `moves`.
pub fn help_pick_best(moves: &[Move], for_cover: bool, log: &mut dyn Log) {
    let Some(best) = moves::choose_best_move(moves, for_cover) else {
        return;
    };
    let rendered = moves::format_move(best);
    if for_cover {
        log.record(&format!(
            "\nHelp: The best move is {rendered}.\nIdeally, you want to cover the highest value possible, since those values are harder to roll.\nThis move does exactly that!"
        ));
    } else {
        log.record(&format!(
            "\nHelp: The best move is {rendered}.\nIdeally, you want to uncover as many opponent squares as possible to maximize your score.\nThis move does exactly that!"
        ));
    }
}
