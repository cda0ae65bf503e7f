//! Round orchestration: turn order, handicap, win detection, scoring,
//! persistence

use std::collections::{BTreeSet, VecDeque};
use std::path::Path;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info};

use crate::board::{Board, Seat};
use crate::error::GameResult;
use crate::moves;
use crate::player::{self, computer, human, PlayerState};
use crate::save::SavedGame;
use crate::view::Log;

/// The game engine: owns the board, both players and the dice RNG.
///
/// All operations run synchronously on the caller's thread; the engine is
/// exclusively owned by whatever drives it (normally a
/// [`TurnStateMachine`](crate::machine::TurnStateMachine)).
#[derive(Debug)]
pub struct GameEngine {
    board: Board,
    human: PlayerState,
    computer: PlayerState,
    rng: StdRng,
    winner_score: u32,
}

impl GameEngine {
    /// New engine with OS-seeded dice.
    pub fn new(board_size: usize) -> Self {
        Self::with_rng(board_size, StdRng::from_os_rng())
    }

    /// New engine with a fixed seed, for reproducible games and tests.
    pub fn with_seed(board_size: usize, seed: u64) -> Self {
        Self::with_rng(board_size, StdRng::seed_from_u64(seed))
    }

    fn with_rng(board_size: usize, rng: StdRng) -> Self {
        GameEngine {
            board: Board::new(board_size),
            human: PlayerState::default(),
            computer: PlayerState::default(),
            rng,
            winner_score: 0,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self, seat: Seat) -> &PlayerState {
        match seat {
            Seat::Human => &self.human,
            Seat::Computer => &self.computer,
        }
    }

    fn player_mut(&mut self, seat: Seat) -> &mut PlayerState {
        match seat {
            Seat::Human => &mut self.human,
            Seat::Computer => &mut self.computer,
        }
    }

    /// Seat that moves next.
    pub fn next_seat(&self) -> Seat {
        if self.human.is_next() {
            Seat::Human
        } else {
            Seat::Computer
        }
    }

    /// Winning score of the most recently completed round.
    pub fn winner_score(&self) -> u32 {
        self.winner_score
    }

    pub fn increment_turn(&mut self) {
        self.board.increment_turn();
    }

    /// Rebuild the board at a new size; everything round-local resets.
    pub fn set_board_size(&mut self, size: usize) {
        self.board.set_size(size);
    }

    /// Roll two dice per side until the totals differ; the higher roll is
    /// first and next. Ties re-roll, so this terminates almost surely.
    pub fn determine_first_player(&mut self, log: &mut dyn Log) {
        log.record("\nDetermining first player...");
        let (human_roll, computer_roll) = loop {
            let human_roll = player::roll_total(&mut self.rng, 2);
            let computer_roll = player::roll_total(&mut self.rng, 2);
            log.record(&format!("Human rolled: {human_roll}"));
            log.record(&format!("Computer rolled: {computer_roll}"));
            if human_roll != computer_roll {
                break (human_roll, computer_roll);
            }
            log.record("\nTie in the roll! Time to roll again!\n");
        };

        let first = if human_roll > computer_roll {
            Seat::Human
        } else {
            Seat::Computer
        };
        log.record(&format!("{first} goes first."));
        info!(%first, human_roll, computer_roll, "first player determined");
        self.set_turn_order(first);
    }

    /// Hand the opening move to whoever did not have it last round.
    pub fn alternate_first_player(&mut self, log: &mut dyn Log) {
        let previous = if self.human.is_first() {
            Seat::Human
        } else {
            Seat::Computer
        };
        let next_first = previous.opponent();
        log.record(&format!(
            "\nLast round, the {} player got first move. This round, the {} player gets first move!",
            previous.name().to_lowercase(),
            next_first.name().to_lowercase()
        ));
        self.set_turn_order(next_first);
    }

    fn set_turn_order(&mut self, first: Seat) {
        self.player_mut(first).set_is_first(true);
        self.player_mut(first).set_is_next(true);
        self.player_mut(first.opponent()).set_is_first(false);
        self.player_mut(first.opponent()).set_is_next(false);
    }

    /// Sum of the tens and ones digits of `num`, wrapped modulo the board
    /// size when it exceeds it.
    pub fn sum_of_two_digits(&self, num: u32, log: &mut dyn Log) -> u8 {
        let tens = num / 10;
        let ones = num % 10;
        let mut sum = tens + ones;
        log.record(&format!(
            "\n\nScore was {num} last round. The tens is {tens}, the ones is {ones}. The total of the digits is {sum}."
        ));
        if sum > self.board.size() as u32 {
            sum %= self.board.size() as u32;
            log.record(&format!(
                "\nSince this sum is greater than the size of the board, we will wrap the advantage square! New value: {sum}"
            ));
        }
        sum as u8
    }

    /// Cover the handicap square derived from last round's winning score on
    /// the board of whichever side did not go first last round.
    ///
    /// Must run before the first-player flags are updated for the new
    /// round: it reads the previous round's turn order.
    pub fn determine_handicap(&mut self, previous_score: u32, log: &mut dyn Log) {
        let previous_first = if self.human.is_first() {
            Seat::Human
        } else {
            Seat::Computer
        };
        let square = self.sum_of_two_digits(previous_score, log);
        if square == 0 {
            log.record("\nScore was not increased last round. No advantage given!");
            return;
        }

        let advantaged = previous_first.opponent();
        self.board.cover_square(advantaged, square);
        log.record(&format!(
            "\nAdvantage given to {} player! The square {square} has been covered!",
            advantaged.name().to_lowercase()
        ));
        // The square sits on the advantaged side's board; the opponent is
        // the one barred from uncovering it early, so the marker lives on
        // the opponent's state.
        let size = self.board.size();
        self.player_mut(previous_first).set_handicap_square(square, size);
        self.player_mut(advantaged).set_handicap_square(0, size);
        debug!(%advantaged, square, "handicap applied");
    }

    /// Reset the board and establish turn order for a round. Round 1 rolls
    /// for first move; later rounds apply the handicap from the previous
    /// winning score and then alternate the opening move.
    pub fn start_round(&mut self, round_num: u32, log: &mut dyn Log) {
        self.board.reset();
        if round_num == 1 {
            self.determine_first_player(log);
        } else {
            let previous_score = self.winner_score;
            self.determine_handicap(previous_score, log);
            self.alternate_first_player(log);
        }
    }

    /// Roll dice for the human with the engine's RNG.
    pub fn human_roll(&mut self, num_dice: u8, log: &mut dyn Log) -> u8 {
        human::roll_dice(&mut self.rng, num_dice, log)
    }

    /// Apply one human move; false leaves the board untouched.
    pub fn human_move(
        &mut self,
        dice_sum: u8,
        is_cover: bool,
        selection: &BTreeSet<u8>,
        log: &mut dyn Log,
    ) -> bool {
        human::make_move(&mut self.board, selection, dice_sum, is_cover, log)
    }

    /// Run the computer's full turn: consume any queued manual rolls first,
    /// then keep rolling until a sub-turn reports the turn is over. Returns
    /// whether the human goes next; false means the computer won the round.
    pub fn computer_move(&mut self, manual_rolls: &mut VecDeque<u8>, log: &mut dyn Log) -> bool {
        let mut turn_active = true;

        if !manual_rolls.is_empty() {
            for roll in manual_rolls.iter() {
                log.record(&roll.to_string());
            }
            while turn_active {
                let Some(dice_sum) = manual_rolls.pop_front() else {
                    break;
                };
                turn_active =
                    computer::make_move(&mut self.board, &mut self.computer, dice_sum, log);
            }
        }

        while turn_active {
            let num_dice = player::choose_num_dice(&self.board, Seat::Computer);
            let dice_sum = computer::roll_dice(&self.board, &mut self.rng, num_dice, log);
            turn_active = computer::make_move(&mut self.board, &mut self.computer, dice_sum, log);
        }

        self.human.set_is_next(true);
        self.computer.set_is_next(false);
        if player::check_win(&self.board, Seat::Computer) {
            return false;
        }

        self.board.increment_turn();
        log.record("\nHuman's turn!");
        true
    }

    /// Check the seat can act on this roll; on exhaustion the turn passes
    /// to the opponent and false is returned.
    pub fn check_move_available(&mut self, dice_sum: u8, seat: Seat, log: &mut dyn Log) -> bool {
        if player::check_no_moves_available(&self.board, seat, dice_sum) {
            log.record(&format!(
                "\n\nNo available squares to cover or uncover that add up to {dice_sum}. Turn ended.\n"
            ));
            self.player_mut(seat).set_is_next(false);
            self.player_mut(seat.opponent()).set_is_next(true);
            return false;
        }
        true
    }

    /// Validate the human's cover/uncover choice, flipping it when the
    /// chosen direction has no legal move or would strip the handicap
    /// square before uncovering becomes legal.
    pub fn check_move_type(&mut self, is_cover: bool, dice_sum: u8, log: &mut dyn Log) -> bool {
        if self.board.turn() <= 1 && self.human.handicap_square() != 0 && !is_cover {
            log.record("\nYou cannot remove the handicap square yet! Switching to cover...");
            return true;
        }

        let available = if is_cover {
            self.board.available_squares(Seat::Human, true)
        } else {
            self.board.available_squares(Seat::Computer, false)
        };
        if available.is_empty() {
            log.record(&format!(
                "\nThat's not a great choice... there are no moves to {}! Switching to {}...",
                if is_cover { "cover" } else { "uncover" },
                if is_cover { "uncover" } else { "cover" }
            ));
            return !is_cover;
        }

        if moves::all_valid_moves(&available, dice_sum).is_empty() {
            log.record(&format!(
                "No possible {} moves that add up to {dice_sum}! Switching to {}...",
                if is_cover { "cover" } else { "uncover" },
                if is_cover { "uncover" } else { "cover" }
            ));
            return !is_cover;
        }

        is_cover
    }

    /// Advise the human on rolling one die or two.
    pub fn num_dice_help(&self, log: &mut dyn Log) {
        if player::choose_num_dice(&self.board, Seat::Human) == 1 {
            log.record("\nHelp: It is best to roll one dice since the sum of your squares is 6 or lower.");
        } else {
            log.record("\nHelp: In your situation, since the sum of your remaining squares is over 6, rolling 2 dice is better.");
        }
    }

    /// Advise the human on covering versus uncovering for this roll.
    pub fn move_type_help(&self, dice_sum: u8, log: &mut dyn Log) {
        let win_move = player::instant_win_move(&self.board, Seat::Human, dice_sum);
        let mut cover_help = player::should_cover_own_squares(&self.board, Seat::Human, dice_sum);
        if self.board.turn() <= 1 {
            cover_help = true;
        }

        if let Some(win) = win_move.filter(|_| self.board.turn() > 1) {
            log.record(&format!(
                "\nHelp: You should definitely {}! You have a winning move!",
                if win.by_cover { "cover" } else { "uncover" }
            ));
        } else if cover_help {
            log.record("\nHelp: It is best to cover, as you have more cover moves that lead to victory.");
        } else {
            log.record("\nHelp: It is best to uncover, as you have more uncover moves that lead to victory.");
        }
    }

    /// Show the human every legal selection for this roll, flagging a
    /// winning move when one exists.
    pub fn move_selection_help(&self, dice_sum: u8, is_cover: bool, log: &mut dyn Log) {
        let available = if is_cover {
            self.board.available_squares(Seat::Human, true)
        } else {
            self.board.available_squares(Seat::Computer, false)
        };
        let possible = moves::all_valid_moves(&available, dice_sum);
        if possible.is_empty() {
            log.record(&format!(
                "No available squares to {}.",
                if is_cover { "cover" } else { "uncover" }
            ));
            return;
        }

        moves::display_valid_moves(&possible, log);
        if let Some(win) = player::instant_win_move(&self.board, Seat::Human, dice_sum) {
            log.record(&format!(
                "\nHelp: You can win with the following move: {}",
                moves::format_move(&win.squares)
            ));
        } else {
            player::help_pick_best(&possible, is_cover, log);
        }
    }

    /// Check the seat for a round win; on a win the turn passes to the
    /// opponent for the next round's bookkeeping.
    pub fn check_winner(&mut self, seat: Seat) -> bool {
        if player::check_win(&self.board, seat) {
            self.player_mut(seat).set_is_next(false);
            self.player_mut(seat.opponent()).set_is_next(true);
            return true;
        }
        false
    }

    /// Score the round for `winner`, log the updated tournament totals and
    /// reset the board. `None` records no score (tournament abort) but the
    /// board still resets.
    pub fn round_end(&mut self, winner: Option<Seat>, round_num: u32, log: &mut dyn Log) {
        match winner {
            Some(seat) => {
                // Derive the win mode from the final board rather than the
                // last lookahead write; covering takes precedence when both
                // predicates hold.
                let by_cover = self.board.all_squares_covered(seat);
                let score = player::calculate_round_score(&self.board, seat, by_cover);
                self.winner_score = score;
                let max_score = self.board.max_score();
                let state = self.player_mut(seat);
                state.set_won_by_cover(by_cover);
                state.set_round_score(score);
                state.add_tournament_score(score, max_score);
                state.set_won_previous(true);
                self.player_mut(seat.opponent()).set_won_previous(false);
                log.record(&format!(
                    "{seat} wins round {round_num} and earns {score} points!"
                ));
                info!(winner = %seat, round_num, score, by_cover, "round complete");

                log.record("\n\n******** Updated Tournament Score ********");
                log.record(&format!("Rounds Played: {round_num}"));
                log.record(&format!(
                    "Computer score: {}",
                    self.computer.tournament_score()
                ));
                log.record(&format!("Human score: {}", self.human.tournament_score()));
                log.record("******************************************\n");
            }
            None => {
                log.record("\n\nNo winner this round... Ending Tournament.");
                self.winner_score = 0;
            }
        }
        self.board.reset();
    }

    /// Persist the current game to `path` in the flat text format.
    pub fn save_game<P: AsRef<Path>>(&self, path: P, log: &mut dyn Log) -> GameResult<()> {
        let record = SavedGame {
            computer_squares: self.board.squares(Seat::Computer).to_vec(),
            computer_score: self.computer.tournament_score(),
            human_squares: self.board.squares(Seat::Human).to_vec(),
            human_score: self.human.tournament_score(),
            first_turn: if self.human.is_first() {
                Seat::Human
            } else {
                Seat::Computer
            },
            next_turn: if self.human.is_next() {
                Seat::Human
            } else {
                Seat::Computer
            },
        };
        match record.write_to(&path) {
            Ok(()) => {
                log.record(&format!(
                    "\nGame saved successfully to {}.",
                    path.as_ref().display()
                ));
                Ok(())
            }
            Err(err) => {
                log.record("\nError: Unable to open file for saving.");
                Err(err)
            }
        }
    }

    /// Restore a game from `path`. Board size is derived from the computer
    /// squares count and the turn counter is set to 2 so win detection is
    /// immediately eligible. Any failure leaves the board reset.
    pub fn load_game<P: AsRef<Path>>(&mut self, path: P, log: &mut dyn Log) -> GameResult<()> {
        log.record("\nLoading... ");
        let record = match SavedGame::read_from(path) {
            Ok(record) => record,
            Err(err) => {
                log.record(&format!("\nError: {err}"));
                self.board.reset();
                return Err(err);
            }
        };

        self.board.set_size(record.computer_squares.len());
        if let Err(err) = self
            .board
            .set_squares(Seat::Computer, record.computer_squares)
        {
            log.record("\nError: Invalid board data entry for Computer Player.");
            return Err(err);
        }
        if let Err(err) = self.board.set_squares(Seat::Human, record.human_squares) {
            log.record("\nError: Invalid board data entry for Human Player.");
            return Err(err);
        }

        self.computer.set_tournament_score(record.computer_score);
        self.human.set_tournament_score(record.human_score);
        self.human.set_is_first(record.first_turn == Seat::Human);
        self.computer.set_is_first(record.first_turn == Seat::Computer);
        self.human.set_is_next(record.next_turn == Seat::Human);
        self.computer.set_is_next(record.next_turn == Seat::Computer);
        self.board.increment_turn();
        self.board.increment_turn();

        log.record("\nGame loaded successfully!");
        info!(size = self.board.size(), "game loaded");
        Ok(())
    }
}
