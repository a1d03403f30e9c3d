//! A bounded game tree player for the board game 'Connect 4'
//!
//! This agent searches the game tree to a fixed depth using minimax with
//! alpha-beta pruning, scoring the leaves with a pluggable heuristic, and
//! returns the column it would play.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_gametree::{board::Board, search::GameTreePlayer};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! // player two (the agent) has three in a row on the bottom rank
//! let board = Board::from_moves("1213147")?;
//! let mut player = GameTreePlayer::new(5);
//!
//! assert_eq!(player.find_best_action(&board), Some(4));
//!# Ok(())
//!# }
//! ```

use static_assertions::*;

pub mod error;

pub mod board;

pub mod streak;

pub mod evaluator;

pub mod search;


pub use board::{Board, Cell, GameState, Player};
pub use error::GameError;
pub use evaluator::{Evaluator, PieceCountEvaluator, PositionalEvaluator, StreakEvaluator};
pub use search::{GameTreePlayer, SearchResult};

/// The number of columns on the game board
pub const COLUMNS: usize = 7;

/// The number of rows on the game board
pub const ROWS: usize = 6;

// a four must fit in every direction, and moves are parsed as single digits
const_assert!(COLUMNS >= 4 && ROWS >= 4);
const_assert!(COLUMNS <= 9);
