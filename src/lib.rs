//! Canoga - a two-player tally-and-covering dice board game engine
//!
//! Canoga provides the complete rule set behind the classic shut-the-box
//! variant played on rows of 9 to 11 squares:
//! - Board state for both players with cover and uncover mechanics
//! - Exhaustive move generation for any dice total
//! - Computer strategy with instant-win lookahead and move heuristics
//! - A turn state machine driving rounds through a pluggable view
//! - Flat-text save files for suspending and resuming a tournament

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod machine;
pub mod moves;
pub mod player;
pub mod save;
pub mod view;

// Re-export commonly used types for convenience
pub use error::{CanogaError, GameResult};

// Re-export core game types
pub use board::{Board, Seat};
pub use engine::GameEngine;
pub use machine::{GameState, TurnAction, TurnStateMachine};
pub use moves::{all_valid_moves, choose_best_move, Move};
pub use player::{InstantWin, PlayerState};
pub use save::SavedGame;

// Re-export view traits
pub use view::{GameView, Log};

// Re-export configuration interfaces
pub use config::{CanogaConfig, GameConfig, PersistenceConfig};
