//! Capability traits connecting the engine to the presentation layer
//!
//! The engine contains no rendering or input-collection logic. Anything it
//! wants the user to read goes through the [`Log`] sink; anything the state
//! machine wants the surrounding UI to do goes through [`GameView`]. The
//! collaborator behind these traits is expected to answer
//! `request_manual_roll_count` by calling back into
//! `TurnStateMachine::supply_manual_roll_count`, and to answer each
//! `request_manual_die_values` with one `supply_manual_die_pair` call.

use crate::board::Board;
use crate::machine::GameState;

/// Sink for game-transcript messages.
///
/// Injected into every operation that talks to the user, rather than
/// inherited.
pub trait Log {
    /// Append one message to the game log.
    fn record(&mut self, message: &str);
}

/// Notifications the excluded presentation layer must handle.
pub trait GameView: Log {
    /// The board contents changed; redraw both rows.
    fn refresh_board(&mut self, board: &Board);

    /// The state machine moved; reconfigure controls for the new state.
    fn refresh_controls(&mut self, state: GameState);

    /// Ask the user how many manual rolls they want to enter.
    fn request_manual_roll_count(&mut self);

    /// Ask the user for the two die values of manual roll `roll_index`
    /// (1-based) out of `total` pending rolls.
    fn request_manual_die_values(&mut self, roll_index: usize, total: usize);

    /// The board was rebuilt with a new size.
    fn board_size_changed(&mut self, size: usize);

    /// A round finished; scores are the updated tournament totals.
    fn round_complete(&mut self, round: u32, human_score: u32, computer_score: u32);

    /// The tournament is over; hand control to the results surface.
    fn show_tournament_results(&mut self, human_score: u32, computer_score: u32);
}
