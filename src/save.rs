//! Flat-text saved-game format
//!
//! Line-oriented and whitespace-tokenized:
//!
//! ```text
//! Computer:
//!   Squares: 1 2 0 4 5 6 7 8 9
//!   Score: 12
//! Human:
//!   Squares: 1 0 3 4 5 6 7 8 9
//!   Score: 30
//! First Turn: Human
//! Next Turn: Computer
//! ```
//!
//! Board size is not stored; it is derived from the length of the computer
//! squares list when the record is applied to an engine.

use std::fs;
use std::path::Path;

use crate::board::Seat;
use crate::error::{CanogaError, GameResult};

/// Everything persisted between sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedGame {
    pub computer_squares: Vec<u8>,
    pub computer_score: u32,
    pub human_squares: Vec<u8>,
    pub human_score: u32,
    pub first_turn: Seat,
    pub next_turn: Seat,
}

impl SavedGame {
    /// Render the record in the save format.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str("Computer:\n");
        out.push_str(&squares_line(&self.computer_squares));
        out.push_str(&format!("  Score: {}\n", self.computer_score));
        out.push_str("Human:\n");
        out.push_str(&squares_line(&self.human_squares));
        out.push_str(&format!("  Score: {}\n", self.human_score));
        out.push_str(&format!("First Turn: {}\n", self.first_turn));
        out.push_str(&format!("Next Turn: {}\n", self.next_turn));
        out
    }

    /// Parse a save-format record, validating every field it reads.
    pub fn parse(text: &str) -> GameResult<SavedGame> {
        let mut computer_squares = None;
        let mut computer_score = None;
        let mut human_squares = None;
        let mut human_score = None;
        let mut first_turn = None;
        let mut next_turn = None;

        let mut lines = text.lines();
        while let Some(line) = lines.next() {
            let mut tokens = line.split_whitespace();
            let Some(key) = tokens.next() else {
                continue;
            };
            match key {
                "Computer:" => {
                    computer_squares = Some(parse_squares(lines.next(), "Computer")?);
                    computer_score = Some(parse_score(lines.next(), "Computer")?);
                }
                "Human:" => {
                    human_squares = Some(parse_squares(lines.next(), "Human")?);
                    human_score = Some(parse_score(lines.next(), "Human")?);
                }
                "First" => first_turn = Some(parse_turn_owner(line, tokens, "First Turn")?),
                "Next" => next_turn = Some(parse_turn_owner(line, tokens, "Next Turn")?),
                _ => {}
            }
        }

        let missing = |field: &str| CanogaError::Validation {
            message: format!("save record is missing {field}"),
            field: Some(field.to_string()),
        };
        Ok(SavedGame {
            computer_squares: computer_squares.ok_or_else(|| missing("Computer squares"))?,
            computer_score: computer_score.ok_or_else(|| missing("Computer score"))?,
            human_squares: human_squares.ok_or_else(|| missing("Human squares"))?,
            human_score: human_score.ok_or_else(|| missing("Human score"))?,
            first_turn: first_turn.ok_or_else(|| missing("First Turn"))?,
            next_turn: next_turn.ok_or_else(|| missing("Next Turn"))?,
        })
    }

    /// Write the record to a file.
    pub fn write_to<P: AsRef<Path>>(&self, path: P) -> GameResult<()> {
        fs::write(path, self.render())?;
        Ok(())
    }

    /// Read and parse a record from a file.
    pub fn read_from<P: AsRef<Path>>(path: P) -> GameResult<SavedGame> {
        let text = fs::read_to_string(path)?;
        SavedGame::parse(&text)
    }
}

fn squares_line(squares: &[u8]) -> String {
    let mut out = String::from("  Squares: ");
    for sq in squares {
        out.push_str(&format!("{sq} "));
    }
    out.push('\n');
    out
}

fn parse_squares(line: Option<&str>, owner: &str) -> GameResult<Vec<u8>> {
    let line = line.ok_or_else(|| {
        CanogaError::save_format(format!("expected 'Squares:' after '{owner}:'"), "")
    })?;
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("Squares:") {
        return Err(CanogaError::save_format(
            format!("expected 'Squares:' after '{owner}:'"),
            line,
        ));
    }
    tokens
        .map(|t| {
            t.parse::<u8>().map_err(|_| {
                CanogaError::save_format(format!("invalid {owner} square value '{t}'"), line)
            })
        })
        .collect()
}

fn parse_score(line: Option<&str>, owner: &str) -> GameResult<u32> {
    let line = line.ok_or_else(|| {
        CanogaError::save_format(format!("expected 'Score:' after {owner} squares"), "")
    })?;
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("Score:") {
        return Err(CanogaError::save_format(
            format!("expected 'Score:' after {owner} squares"),
            line,
        ));
    }
    let value = tokens.next().ok_or_else(|| {
        CanogaError::save_format(format!("invalid {owner} score format"), line)
    })?;
    value.parse::<u32>().map_err(|_| {
        CanogaError::save_format(format!("invalid {owner} score '{value}'"), line)
    })
}

fn parse_turn_owner<'a>(
    line: &str,
    mut tokens: impl Iterator<Item = &'a str>,
    field: &str,
) -> GameResult<Seat> {
    if tokens.next() != Some("Turn:") {
        return Err(CanogaError::save_format(
            format!("incorrect format for {field}"),
            line,
        ));
    }
    let owner = tokens.next().ok_or_else(|| {
        CanogaError::save_format(format!("incorrect format for {field}"), line)
    })?;
    owner.parse::<Seat>().map_err(|_| {
        CanogaError::save_format(format!("invalid value for {field}: '{owner}'"), line)
    })
}
