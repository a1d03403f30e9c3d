//! Heuristic scoring of non-terminal positions
//!
//! Evaluators are injected into the search as a type parameter so that the
//! strategy can be swapped without touching the search itself. Every
//! evaluator scores a board from the agent's point of view: swapping the two
//! colors on the board negates the score.

use crate::{
    board::{Board, Player},
    streak::{count_streaks, run_length},
    COLUMNS, ROWS,
};

/// A static evaluation function for positions
pub trait Evaluator {
    /// Scores `board` for `agent`, larger values favour the agent
    fn evaluate(&self, board: &Board, agent: Player) -> i32;
}

pub const FOUR_WEIGHT: i32 = 10;
pub const THREE_WEIGHT: i32 = 5;
pub const TWO_WEIGHT: i32 = 2;

/// Weighted count of twos, threes and fours for each side, the default heuristic
#[derive(Copy, Clone, Debug, Default)]
pub struct StreakEvaluator;

impl StreakEvaluator {
    fn side_score(board: &Board, color: Player) -> i32 {
        count_streaks(board, color, 4) as i32 * FOUR_WEIGHT
            + count_streaks(board, color, 3) as i32 * THREE_WEIGHT
            + count_streaks(board, color, 2) as i32 * TWO_WEIGHT
    }
}

impl Evaluator for StreakEvaluator {
    fn evaluate(&self, board: &Board, agent: Player) -> i32 {
        Self::side_score(board, agent) - Self::side_score(board, agent.opponent())
    }
}

/// Bonus per piece in the center column
pub const CENTER_BONUS: i32 = 2;

/// Rewards center column occupancy and long horizontal or vertical runs
///
/// Each piece earns [`CENTER_BONUS`] in the center column, plus twice the
/// length of the run starting at it to the right and downwards when that run
/// is at least three long.
#[derive(Copy, Clone, Debug, Default)]
pub struct PositionalEvaluator;

impl PositionalEvaluator {
    fn position_score(board: &Board, row: usize, column: usize) -> i32 {
        let mut score = 0;
        if column == COLUMNS / 2 {
            score += CENTER_BONUS;
        }
        for &(row_step, column_step) in [(0, 1), (1, 0)].iter() {
            let run = run_length(board, row, column, row_step, column_step);
            if run >= 3 {
                score += run as i32 * 2;
            }
        }
        score
    }
}

impl Evaluator for PositionalEvaluator {
    fn evaluate(&self, board: &Board, agent: Player) -> i32 {
        let mut own = 0;
        let mut opponent = 0;
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                match board.get(row, column).player() {
                    Some(player) if player == agent => {
                        own += Self::position_score(board, row, column)
                    }
                    Some(_) => opponent += Self::position_score(board, row, column),
                    None => {}
                }
            }
        }
        own - opponent
    }
}

/// Material only: the agent's piece count minus the opponent's
#[derive(Copy, Clone, Debug, Default)]
pub struct PieceCountEvaluator;

impl Evaluator for PieceCountEvaluator {
    fn evaluate(&self, board: &Board, agent: Player) -> i32 {
        board.count(agent) as i32 - board.count(agent.opponent()) as i32
    }
}
