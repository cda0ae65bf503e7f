//! Board state for a Canoga round
//!
//! Two rows of squares, one per seat. An uncovered slot holds its own
//! 1-based position value; a covered slot holds 0. The board also carries
//! the turn counter that gates uncover moves and win detection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CanogaError, GameResult};

/// Which side of the board a player owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Seat {
    Human,
    Computer,
}

impl Seat {
    /// The other seat.
    pub fn opponent(self) -> Seat {
        match self {
            Seat::Human => Seat::Computer,
            Seat::Computer => Seat::Human,
        }
    }

    /// Name used in the transcript and the save format.
    pub fn name(self) -> &'static str {
        match self {
            Seat::Human => "Human",
            Seat::Computer => "Computer",
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Seat {
    type Err = CanogaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Human" => Ok(Seat::Human),
            "Computer" => Ok(Seat::Computer),
            other => Err(CanogaError::validation(
                format!("unknown seat: {other}"),
                "seat",
            )),
        }
    }
}

/// The shared board: one row of squares per seat plus the turn counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    size: usize,
    human_squares: Vec<u8>,
    computer_squares: Vec<u8>,
    turn: u32,
}

impl Default for Board {
    fn default() -> Self {
        Board::new(9)
    }
}

impl Board {
    /// Create a board of `size` squares per row, all uncovered.
    pub fn new(size: usize) -> Self {
        let mut board = Board {
            size,
            human_squares: Vec::with_capacity(size),
            computer_squares: Vec::with_capacity(size),
            turn: 0,
        };
        board.reset();
        board
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn increment_turn(&mut self) {
        self.turn += 1;
    }

    /// Highest score a round can award: 1 + 2 + ... + size.
    pub fn max_score(&self) -> u32 {
        (1..=self.size as u32).sum()
    }

    /// Both rows back to [1..size], turn counter back to 0.
    pub fn reset(&mut self) {
        self.turn = 0;
        self.human_squares.clear();
        self.computer_squares.clear();
        for i in 1..=self.size {
            self.human_squares.push(i as u8);
            self.computer_squares.push(i as u8);
        }
    }

    /// Rebuild the board with a new row length. Resets everything.
    pub fn set_size(&mut self, size: usize) {
        self.size = size;
        self.reset();
    }

    /// One seat's row, covered slots as 0.
    pub fn squares(&self, seat: Seat) -> &[u8] {
        match seat {
            Seat::Human => &self.human_squares,
            Seat::Computer => &self.computer_squares,
        }
    }

    fn row_mut(&mut self, seat: Seat) -> &mut Vec<u8> {
        match seat {
            Seat::Human => &mut self.human_squares,
            Seat::Computer => &mut self.computer_squares,
        }
    }

    /// Replace one seat's row wholesale, as when restoring a saved game.
    ///
    /// The list must have exactly `size` elements, each in `0..=size`. Any
    /// violation resets the whole board and reports failure; callers must
    /// treat that as fatal to the restore path.
    pub fn set_squares(&mut self, seat: Seat, squares: Vec<u8>) -> GameResult<()> {
        if squares.len() != self.size {
            self.reset();
            return Err(CanogaError::validation(
                format!(
                    "{} square list has {} entries, expected {}",
                    seat,
                    squares.len(),
                    self.size
                ),
                "squares",
            ));
        }
        if let Some(bad) = squares.iter().find(|&&s| s as usize > self.size) {
            self.reset();
            return Err(CanogaError::validation(
                format!("{seat} square value {bad} out of range"),
                "squares",
            ));
        }
        *self.row_mut(seat) = squares;
        Ok(())
    }

    /// True when the seat may consider rolling one die: either the board is
    /// too small to have upper squares, or squares 7..size are all covered.
    pub fn check_upper_squares(&self, seat: Seat) -> bool {
        if self.size < 7 {
            return true;
        }
        self.squares(seat)[6..].iter().all(|&s| s == 0)
    }

    /// 1-based positions that are currently coverable (`for_cover`) or
    /// uncoverable (`!for_cover`), in board order.
    pub fn available_squares(&self, seat: Seat, for_cover: bool) -> Vec<u8> {
        self.squares(seat)
            .iter()
            .enumerate()
            .filter(|&(_, &s)| if for_cover { s != 0 } else { s == 0 })
            .map(|(i, _)| (i + 1) as u8)
            .collect()
    }

    /// Cover (zero) the given square if it is currently uncovered.
    ///
    /// Stale or repeated requests are no-ops rather than errors.
    pub fn cover_square(&mut self, seat: Seat, square: u8) {
        let Some(idx) = self.index_of(square) else {
            return;
        };
        let row = self.row_mut(seat);
        if row[idx] == square {
            row[idx] = 0;
        }
    }

    /// Uncover (restore) the given square if it is currently covered.
    pub fn uncover_square(&mut self, seat: Seat, square: u8) {
        let Some(idx) = self.index_of(square) else {
            return;
        };
        let row = self.row_mut(seat);
        if row[idx] == 0 {
            row[idx] = square;
        }
    }

    pub fn all_squares_covered(&self, seat: Seat) -> bool {
        self.squares(seat).iter().all(|&s| s == 0)
    }

    pub fn all_squares_uncovered(&self, seat: Seat) -> bool {
        self.squares(seat).iter().all(|&s| s != 0)
    }

    /// Transcript snapshot of both rows.
    pub fn render(&self) -> String {
        let mut out = String::from("\n====== Current Board ======\n");
        out.push_str("Computer: ");
        for s in &self.computer_squares {
            out.push_str(&format!("{s} "));
        }
        out.push_str("\nHuman: ");
        for s in &self.human_squares {
            out.push_str(&format!("{s} "));
        }
        out.push_str("\n============================\n");
        out
    }

    fn index_of(&self, square: u8) -> Option<usize> {
        let idx = square.checked_sub(1)? as usize;
        (idx < self.size).then_some(idx)
    }
}
