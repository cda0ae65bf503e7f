//! Saved-game format tests

use canoga::board::Seat;
use canoga::save::SavedGame;
use tempfile::NamedTempFile;

fn sample() -> SavedGame {
    SavedGame {
        computer_squares: vec![1, 2, 0, 4, 5, 6, 7, 8, 9],
        computer_score: 12,
        human_squares: vec![1, 0, 3, 4, 5, 6, 7, 8, 9],
        human_score: 30,
        first_turn: Seat::Human,
        next_turn: Seat::Computer,
    }
}

#[test]
fn render_produces_the_flat_format() {
    let rendered = sample().render();
    let expected = "Computer:\n  Squares: 1 2 0 4 5 6 7 8 9 \n  Score: 12\nHuman:\n  Squares: 1 0 3 4 5 6 7 8 9 \n  Score: 30\nFirst Turn: Human\nNext Turn: Computer\n";
    assert_eq!(rendered, expected);
}

#[test]
fn parse_round_trips_render() {
    let record = sample();
    let parsed = SavedGame::parse(&record.render()).unwrap();
    assert_eq!(parsed, record);
}

#[test]
fn parse_survives_blank_lines_and_extra_whitespace() {
    let text = "\nComputer:\n  Squares:  1 2 3 \n  Score:  7\n\nHuman:\n  Squares: 0 2 3 \n  Score: 0\nFirst Turn:   Computer\nNext Turn: Human\n";
    let parsed = SavedGame::parse(text).unwrap();
    assert_eq!(parsed.computer_squares, vec![1, 2, 3]);
    assert_eq!(parsed.first_turn, Seat::Computer);
    assert_eq!(parsed.next_turn, Seat::Human);
}

#[test]
fn parse_rejects_missing_sections() {
    let mut record = sample().render();
    record = record.replace("Human:\n  Squares: 1 0 3 4 5 6 7 8 9 \n  Score: 30\n", "");
    assert!(SavedGame::parse(&record).is_err());
}

#[test]
fn parse_rejects_non_numeric_scores() {
    let record = sample().render().replace("Score: 12", "Score: twelve");
    assert!(SavedGame::parse(&record).is_err());
}

#[test]
fn parse_rejects_negative_scores() {
    let record = sample().render().replace("Score: 12", "Score: -3");
    assert!(SavedGame::parse(&record).is_err());
}

#[test]
fn parse_rejects_unknown_turn_owner() {
    let record = sample().render().replace("Next Turn: Computer", "Next Turn: Dealer");
    assert!(SavedGame::parse(&record).is_err());
}

#[test]
fn parse_rejects_truncated_records() {
    assert!(SavedGame::parse("Computer:\n  Squares: 1 2 3\n").is_err());
    assert!(SavedGame::parse("").is_err());
}

#[test]
fn file_round_trip() {
    let record = sample();
    let file = NamedTempFile::new().unwrap();
    record.write_to(file.path()).unwrap();
    let loaded = SavedGame::read_from(file.path()).unwrap();
    assert_eq!(loaded, record);
}

#[test]
fn read_from_missing_file_is_an_io_error() {
    let result = SavedGame::read_from("/nonexistent/canoga-save.txt");
    assert!(matches!(result, Err(canoga::CanogaError::Io { .. })));
}
