//! Board state tests

use canoga::{Board, Seat};

#[test]
fn new_board_exposes_one_based_values() {
    for size in [9usize, 10, 11] {
        let board = Board::new(size);
        for seat in [Seat::Human, Seat::Computer] {
            let row = board.squares(seat);
            assert_eq!(row.len(), size);
            for (i, &value) in row.iter().enumerate() {
                assert_eq!(value as usize, i + 1);
            }
        }
    }
}

#[test]
fn cover_then_uncover_restores_the_value() {
    let mut board = Board::new(10);
    board.cover_square(Seat::Computer, 7);
    assert_eq!(board.squares(Seat::Computer)[6], 0);
    board.uncover_square(Seat::Computer, 7);
    assert_eq!(board.squares(Seat::Computer)[6], 7);
}

#[test]
fn uncover_of_an_open_square_is_a_no_op() {
    let mut board = Board::new(9);
    let before = board.clone();
    board.uncover_square(Seat::Human, 5);
    assert_eq!(board, before);
}

#[test]
fn rows_are_independent() {
    let mut board = Board::new(9);
    board.cover_square(Seat::Human, 3);
    assert_eq!(board.squares(Seat::Human)[2], 0);
    assert_eq!(board.squares(Seat::Computer)[2], 3);
}

#[test]
fn available_squares_partitions_the_row() {
    let mut board = Board::new(9);
    for sq in [2, 5, 9] {
        board.cover_square(Seat::Human, sq);
    }
    assert_eq!(
        board.available_squares(Seat::Human, true),
        vec![1, 3, 4, 6, 7, 8]
    );
    assert_eq!(board.available_squares(Seat::Human, false), vec![2, 5, 9]);
}

#[test]
fn set_size_rebuilds_both_rows() {
    let mut board = Board::new(9);
    board.cover_square(Seat::Human, 1);
    board.increment_turn();
    board.set_size(11);
    assert_eq!(board, Board::new(11));
}

#[test]
fn render_shows_both_rows_with_header() {
    let mut board = Board::new(9);
    board.cover_square(Seat::Human, 2);
    let rendered = board.render();
    assert!(rendered.contains("====== Current Board ======"));
    assert!(rendered.contains("Computer: 1 2 3 4 5 6 7 8 9"));
    assert!(rendered.contains("Human: 1 0 3 4 5 6 7 8 9"));
}

#[test]
fn set_squares_rejects_out_of_range_values() {
    let mut board = Board::new(9);
    let result = board.set_squares(Seat::Computer, vec![1, 2, 3, 4, 5, 6, 7, 8, 10]);
    assert!(result.is_err());
    assert_eq!(board, Board::new(9));
}

#[test]
fn seat_round_trips_through_its_name() {
    for seat in [Seat::Human, Seat::Computer] {
        let parsed: Seat = seat.name().parse().unwrap();
        assert_eq!(parsed, seat);
    }
    assert!("Dealer".parse::<Seat>().is_err());
}

#[test]
fn upper_square_gate_is_open_for_small_boards() {
    // Fewer than 7 squares means there is no upper region to cover.
    let board = Board::new(6);
    assert!(board.check_upper_squares(Seat::Human));
}
