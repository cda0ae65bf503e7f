//! Turn state machine driving a round from dice-count selection to
//! resolution
//!
//! External events arrive as one of three abstract actions (the UI's
//! numbered buttons), square taps, or manual-roll input. Every entry point
//! runs synchronously to completion before the next event is accepted, so
//! transitions are atomic with respect to external triggers.

use std::collections::{BTreeSet, VecDeque};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Seat;
use crate::engine::GameEngine;
use crate::error::GameResult;
use crate::view::GameView;

/// The states a turn sequence moves through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameState {
    StartGame,
    BeginTurn,
    NumDice,
    RollType,
    WaitForInput,
    MoveType,
    MoveSelection,
    RoundEnd,
    NewBoardSize,
}

/// One of the three abstract per-state actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnAction {
    One,
    Two,
    Three,
}

impl TurnAction {
    /// Map a 1-based button number onto an action.
    pub fn from_button(n: u8) -> Option<TurnAction> {
        match n {
            1 => Some(TurnAction::One),
            2 => Some(TurnAction::Two),
            3 => Some(TurnAction::Three),
            _ => None,
        }
    }
}

/// Drives one human or computer turn to completion, consuming engine
/// operations and emitting notifications to the attached view.
pub struct TurnStateMachine<V: GameView> {
    engine: GameEngine,
    view: V,
    state: GameState,
    round_num: u32,
    user_num_dice: u8,
    user_dice_sum: u8,
    user_cover_choice: bool,
    /// Queued manual dice sums, consumed one per sub-turn; empty falls back
    /// to an engine-driven random roll.
    manual_rolls: VecDeque<u8>,
    /// Manual rolls still expected from the collaborator.
    pending_manual_rolls: usize,
    waiting_for_input: bool,
    selected_human: BTreeSet<u8>,
    selected_computer: BTreeSet<u8>,
    winner: Option<Seat>,
}

impl<V: GameView> TurnStateMachine<V> {
    pub fn new(engine: GameEngine, view: V) -> Self {
        TurnStateMachine {
            engine,
            view,
            state: GameState::StartGame,
            round_num: 1,
            user_num_dice: 0,
            user_dice_sum: 0,
            user_cover_choice: true,
            manual_rolls: VecDeque::new(),
            pending_manual_rolls: 0,
            waiting_for_input: false,
            selected_human: BTreeSet::new(),
            selected_computer: BTreeSet::new(),
            winner: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn round_num(&self) -> u32 {
        self.round_num
    }

    pub fn engine(&self) -> &GameEngine {
        &self.engine
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn user_dice_sum(&self) -> u8 {
        self.user_dice_sum
    }

    pub fn user_cover_choice(&self) -> bool {
        self.user_cover_choice
    }

    pub fn winner(&self) -> Option<Seat> {
        self.winner
    }

    /// Square taps only register while selecting a move.
    pub fn can_select(&self) -> bool {
        self.state == GameState::MoveSelection
    }

    /// Handle one abstract action and run the transition to completion.
    pub fn dispatch(&mut self, action: TurnAction) {
        debug!(state = ?self.state, ?action, "dispatch");
        match self.state {
            GameState::StartGame => {
                self.engine.start_round(self.round_num, &mut self.view);
                self.view.refresh_board(self.engine.board());
                self.view
                    .record(&format!("\n=======Round {}=======\n", self.round_num));
                self.state = GameState::BeginTurn;
            }

            GameState::BeginTurn => {
                self.manual_rolls.clear();
                self.pending_manual_rolls = 0;
                self.clear_selections();
                self.view.refresh_board(self.engine.board());
                if self.engine.next_seat() == Seat::Human {
                    if self.engine.board().check_upper_squares(Seat::Human) {
                        self.view.record(&format!(
                            "\nTime to roll! Since squares 7 through {} are covered, you may choose to roll 1 or 2 dice.\n",
                            self.engine.board().size()
                        ));
                        self.state = GameState::NumDice;
                    } else {
                        self.view.record(&format!(
                            "\nTime to roll! You must roll 2 dice (since at least one square from 7 to {} is uncovered). \n\nWould you like to roll randomly or manually?",
                            self.engine.board().size()
                        ));
                        self.user_num_dice = 2;
                        self.state = GameState::RollType;
                    }
                } else {
                    self.engine.increment_turn();
                    self.view.record(
                        "\n===Computer's turn=== \nPlease select how you would like the Computer to roll",
                    );
                    self.state = GameState::RollType;
                }
            }

            GameState::NumDice => match action {
                TurnAction::One => {
                    self.user_num_dice = 1;
                    self.view
                        .record("\n\nWould you like to roll randomly or manually?");
                    self.state = GameState::RollType;
                }
                TurnAction::Two => {
                    self.user_num_dice = 2;
                    self.view
                        .record("\nWould you like to roll randomly or manually?");
                    self.state = GameState::RollType;
                }
                TurnAction::Three => self.engine.num_dice_help(&mut self.view),
            },

            GameState::RollType => {
                if self.engine.next_seat() == Seat::Human {
                    if action == TurnAction::One {
                        self.user_dice_sum =
                            self.engine.human_roll(self.user_num_dice, &mut self.view);
                        if self.engine.check_move_available(
                            self.user_dice_sum,
                            Seat::Human,
                            &mut self.view,
                        ) {
                            self.view.record("\nWould you like to cover or uncover?");
                            self.state = GameState::MoveType;
                        } else {
                            self.state = GameState::BeginTurn;
                        }
                    } else {
                        self.begin_manual_input();
                    }
                } else if action == TurnAction::One {
                    self.run_computer_turn();
                } else {
                    self.begin_manual_input();
                }
            }

            GameState::WaitForInput => {
                // Suspended until the collaborator supplies the manual
                // rolls; actions are ignored meanwhile.
            }

            GameState::MoveType => {
                match action {
                    TurnAction::One => {
                        self.user_cover_choice =
                            self.engine
                                .check_move_type(true, self.user_dice_sum, &mut self.view);
                        self.view.record(&format!(
                            "\nSelect the squares that sum up to {}.",
                            self.user_dice_sum
                        ));
                        self.state = GameState::MoveSelection;
                    }
                    TurnAction::Two => {
                        self.user_cover_choice =
                            self.engine
                                .check_move_type(false, self.user_dice_sum, &mut self.view);
                        self.view.record(&format!(
                            "\nSelect the squares that sum up to {}.",
                            self.user_dice_sum
                        ));
                        self.state = GameState::MoveSelection;
                    }
                    TurnAction::Three => {
                        self.engine.move_type_help(self.user_dice_sum, &mut self.view)
                    }
                }
                self.view.refresh_board(self.engine.board());
            }

            GameState::MoveSelection => match action {
                TurnAction::One => {
                    self.view.record("Selection reset.");
                    self.clear_selections();
                    self.view.refresh_board(self.engine.board());
                }
                TurnAction::Two => self.submit_selection(),
                TurnAction::Three => self.engine.move_selection_help(
                    self.user_dice_sum,
                    self.user_cover_choice,
                    &mut self.view,
                ),
            },

            GameState::RoundEnd => {
                if action == TurnAction::One {
                    self.view.record("\nStarting new round!");
                    self.clear_selections();
                    self.view.refresh_board(self.engine.board());
                    self.round_num += 1;
                    self.view.record("\nEnter new Board size (9,10,11)\n");
                    self.state = GameState::NewBoardSize;
                } else {
                    self.view.show_tournament_results(
                        self.engine.player(Seat::Human).tournament_score(),
                        self.engine.player(Seat::Computer).tournament_score(),
                    );
                }
            }

            GameState::NewBoardSize => {
                let size = match action {
                    TurnAction::One => 9,
                    TurnAction::Two => 10,
                    TurnAction::Three => 11,
                };
                self.apply_board_size(size);
                self.state = GameState::StartGame;
            }
        }
        self.view.refresh_controls(self.state);
    }

    /// Toggle a square in the current selection. Taps only land on the
    /// human row while covering and on the computer row while uncovering.
    pub fn tap_square(&mut self, seat: Seat, square: u8) -> bool {
        if !self.can_select() {
            return false;
        }
        let selected = match seat {
            Seat::Human if self.user_cover_choice => toggle(&mut self.selected_human, square),
            Seat::Computer if !self.user_cover_choice => {
                toggle(&mut self.selected_computer, square)
            }
            _ => return false,
        };
        self.view.refresh_board(self.engine.board());
        selected
    }

    /// The collaborator's answer to `request_manual_roll_count`.
    pub fn supply_manual_roll_count(&mut self, count: usize) {
        if !self.waiting_for_input {
            return;
        }
        self.pending_manual_rolls = count;
        self.manual_rolls.clear();
        if count == 0 {
            self.finish_manual_input();
        } else {
            self.view.request_manual_die_values(1, count);
        }
    }

    /// The collaborator's answer to `request_manual_die_values`: one roll's
    /// two die faces.
    pub fn supply_manual_die_pair(&mut self, first: u8, second: u8) {
        if !self.waiting_for_input || self.pending_manual_rolls == 0 {
            return;
        }
        if !(1..=6).contains(&first) || !(1..=6).contains(&second) {
            self.view
                .record(&format!("\nDie values must be 1 through 6, got {first} and {second}."));
            self.view
                .request_manual_die_values(self.manual_rolls.len() + 1, self.pending_manual_rolls);
            return;
        }
        self.manual_rolls.push_back(first + second);
        if self.manual_rolls.len() < self.pending_manual_rolls {
            self.view
                .request_manual_die_values(self.manual_rolls.len() + 1, self.pending_manual_rolls);
        } else {
            self.finish_manual_input();
        }
    }

    /// Persist the game at its current point.
    pub fn request_save<P: AsRef<Path>>(&mut self, path: P) -> GameResult<()> {
        self.engine.save_game(path, &mut self.view)
    }

    /// Resume a saved game; on success play continues at BEGIN_TURN and the
    /// loaded board size is returned.
    pub fn request_load<P: AsRef<Path>>(&mut self, path: P) -> GameResult<usize> {
        self.engine.load_game(path, &mut self.view)?;
        let first = if self.engine.player(Seat::Human).is_first() {
            Seat::Human
        } else {
            Seat::Computer
        };
        self.view.record(&format!(
            "\nResuming Game! \nPrevious first player: {first}\nNext Player: {}",
            self.engine.next_seat()
        ));
        self.state = GameState::BeginTurn;
        self.view.refresh_board(self.engine.board());
        self.view.refresh_controls(self.state);
        Ok(self.engine.board().size())
    }

    /// Pick the board size for the next round (9, 10 or 11 squares).
    pub fn request_new_board_size(&mut self, size: usize) -> bool {
        if !matches!(size, 9 | 10 | 11) {
            self.view
                .record(&format!("\nBoard size {size} is not supported; choose 9, 10 or 11."));
            return false;
        }
        self.apply_board_size(size);
        if self.state == GameState::NewBoardSize {
            self.state = GameState::StartGame;
            self.view.refresh_controls(self.state);
        }
        true
    }

    fn apply_board_size(&mut self, size: usize) {
        self.engine.set_board_size(size);
        self.view.board_size_changed(size);
    }

    fn begin_manual_input(&mut self) {
        self.view.request_manual_roll_count();
        self.waiting_for_input = true;
        self.state = GameState::WaitForInput;
    }

    /// All manual values are in; resume exactly as the random path would.
    fn finish_manual_input(&mut self) {
        self.waiting_for_input = false;
        self.pending_manual_rolls = 0;
        if self.engine.next_seat() == Seat::Human {
            self.pop_manual_roll_or_random();
        } else {
            self.run_computer_turn();
        }
        self.view.refresh_controls(self.state);
    }

    /// Consume the next queued manual roll, or roll randomly when the queue
    /// is dry, then branch on move availability.
    fn pop_manual_roll_or_random(&mut self) {
        if let Some(sum) = self.manual_rolls.pop_front() {
            self.user_dice_sum = sum;
            self.view
                .record(&format!("\nRolled manually! Sum: {sum}"));
        } else {
            self.user_dice_sum = self.engine.human_roll(2, &mut self.view);
            self.view
                .record(&format!("\nRolled randomly! Sum: {}", self.user_dice_sum));
        }

        if self
            .engine
            .check_move_available(self.user_dice_sum, Seat::Human, &mut self.view)
        {
            self.view.record("\nWould you like to cover or uncover?");
            self.state = GameState::MoveType;
        } else {
            self.state = GameState::BeginTurn;
        }
    }

    /// Run the computer's whole turn, draining any queued manual rolls.
    fn run_computer_turn(&mut self) {
        if self.engine.computer_move(&mut self.manual_rolls, &mut self.view) {
            self.view.refresh_board(self.engine.board());
            self.view.record("\n===Human's turn===");
            self.state = GameState::BeginTurn;
        } else {
            self.finish_round(Seat::Computer);
        }
    }

    /// Submit the combined tapped selection as the human's move.
    fn submit_selection(&mut self) {
        let mut combined: BTreeSet<u8> = self.selected_human.clone();
        combined.extend(&self.selected_computer);
        let valid = self.engine.human_move(
            self.user_dice_sum,
            self.user_cover_choice,
            &combined,
            &mut self.view,
        );
        if !valid {
            self.clear_selections();
            self.view.refresh_board(self.engine.board());
            return;
        }

        if self.engine.check_winner(Seat::Human) {
            self.finish_round(Seat::Human);
            return;
        }

        self.clear_selections();
        self.view.refresh_board(self.engine.board());
        self.view.record("\nHuman's turn continues.");
        if self.manual_rolls.is_empty() {
            self.state = GameState::BeginTurn;
        } else {
            self.pop_manual_roll_or_random();
        }
    }

    fn finish_round(&mut self, winner: Seat) {
        self.winner = Some(winner);
        self.view.refresh_board(self.engine.board());
        self.engine
            .round_end(Some(winner), self.round_num, &mut self.view);
        self.view.round_complete(
            self.round_num,
            self.engine.player(Seat::Human).tournament_score(),
            self.engine.player(Seat::Computer).tournament_score(),
        );
        self.state = GameState::RoundEnd;
    }

    fn clear_selections(&mut self) {
        self.selected_human.clear();
        self.selected_computer.clear();
    }
}

fn toggle(set: &mut BTreeSet<u8>, square: u8) -> bool {
    if set.remove(&square) {
        false
    } else {
        set.insert(square);
        true
    }
}
