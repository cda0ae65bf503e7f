//! Unit tests

pub mod board_tests;
pub mod save_tests;
