//! A depth-limited game tree player for Connect 4

use log::{debug, warn};
use rayon::prelude::*;

use crate::{
    board::{Board, Player},
    error::GameError,
    evaluator::{Evaluator, StreakEvaluator},
};

use std::cmp::Reverse;

/// Stands in for negative infinity as the initial alpha bound
pub const MIN_SCORE: i32 = i32::MIN;
/// Stands in for positive infinity as the initial beta bound
pub const MAX_SCORE: i32 = i32::MAX;

/// The search depth used when none is configured
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// The outcome of searching a single node
///
/// `best_move` is `None` for leaves: depth exhausted, terminal positions and
/// boards without legal moves.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct SearchResult {
    pub score: i32,
    pub best_move: Option<usize>,
}

impl SearchResult {
    fn leaf(score: i32) -> Self {
        Self {
            score,
            best_move: None,
        }
    }
}

/// An agent choosing Connect 4 moves by bounded minimax with alpha-beta pruning
///
/// # Notes
/// The agent is always the maximizing side of its own search and the
/// opponent the minimizing side. Leaves are scored by the evaluator `E`
/// from the agent's point of view, so there is no notion of a proven win:
/// a four in a row is simply a terminal position with a (usually) high score.
///
/// Search never mutates the board it is given. Each explored move produces
/// a fresh copy of the board.
#[derive(Clone, Debug)]
pub struct GameTreePlayer<E = StreakEvaluator> {
    max_depth: usize,
    agent: Player,
    move_ordering: bool,
    evaluator: E,

    /// The number of nodes searched by this player so far (for diagnostics only)
    pub node_count: usize,
}

impl GameTreePlayer<StreakEvaluator> {
    /// Creates a new player for `Player::Two` using the streak heuristic
    pub fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            agent: Player::Two,
            move_ordering: false,
            evaluator: StreakEvaluator,
            node_count: 0,
        }
    }
}

impl Default for GameTreePlayer<StreakEvaluator> {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl<E: Evaluator> GameTreePlayer<E> {
    /// Replaces the evaluation heuristic
    pub fn with_evaluator<F: Evaluator>(self, evaluator: F) -> GameTreePlayer<F> {
        GameTreePlayer {
            max_depth: self.max_depth,
            agent: self.agent,
            move_ordering: self.move_ordering,
            evaluator,
            node_count: self.node_count,
        }
    }

    /// Sets the color the agent plays
    pub fn with_agent(mut self, agent: Player) -> Self {
        self.agent = agent;
        self
    }

    /// Enables sorting of the root moves by a one-ply evaluation
    pub fn with_move_ordering(mut self, move_ordering: bool) -> Self {
        self.move_ordering = move_ordering;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn agent(&self) -> Player {
        self.agent
    }

    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }

    /// Static evaluation of `board` for the agent
    pub fn evaluate(&self, board: &Board) -> i32 {
        self.evaluator.evaluate(board, self.agent)
    }

    fn side_to_move(&self, maximizing: bool) -> Player {
        if maximizing {
            self.agent
        } else {
            self.agent.opponent()
        }
    }

    /// Performs depth-limited minimax search with alpha-beta pruning
    ///
    /// Legal moves are tried in ascending column order and a move only
    /// replaces the current best on strict improvement, so ties go to the
    /// lowest column.
    pub fn minimax(
        &mut self,
        board: &Board,
        depth: usize,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        self.node_count += 1;

        if depth == 0 || board.is_terminal() {
            return SearchResult::leaf(self.evaluate(board));
        }

        let moves = board.legal_moves();
        self.expand(board, &moves, depth, alpha, beta, maximizing)
    }

    /// Identical to [`minimax`](Self::minimax) but sorts this node's moves by
    /// the evaluation of the board after the agent plays each one
    ///
    /// The sort is descending for the maximizer and ascending for the
    /// minimizer. It is stable, so equally scored moves keep column order.
    /// Children are searched with the plain, unordered minimax.
    pub fn minimax_with_move_ordering(
        &mut self,
        board: &Board,
        depth: usize,
        alpha: i32,
        beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        self.node_count += 1;

        if depth == 0 || board.is_terminal() {
            return SearchResult::leaf(self.evaluate(board));
        }

        let moves = self.ordered_moves(board, maximizing);
        self.expand(board, &moves, depth, alpha, beta, maximizing)
    }

    /// The legal moves sorted by the evaluation of the board after the agent
    /// plays each one, best first for the maximizer and worst first otherwise
    pub(crate) fn ordered_moves(&self, board: &Board, maximizing: bool) -> Vec<usize> {
        let mut moves: Vec<(usize, i32)> = board
            .legal_moves()
            .into_iter()
            .filter_map(|column| {
                board
                    .apply(column, self.agent)
                    .ok()
                    .map(|next| (column, self.evaluate(&next)))
            })
            .collect();
        if maximizing {
            moves.sort_by_key(|&(_, score)| Reverse(score));
        } else {
            moves.sort_by_key(|&(_, score)| score);
        }
        moves.into_iter().map(|(column, _)| column).collect()
    }

    /// Searches the children of an internal node in the given order
    fn expand(
        &mut self,
        board: &Board,
        moves: &[usize],
        depth: usize,
        mut alpha: i32,
        mut beta: i32,
        maximizing: bool,
    ) -> SearchResult {
        let player = self.side_to_move(maximizing);
        let mut best = SearchResult {
            score: if maximizing { MIN_SCORE } else { MAX_SCORE },
            best_move: None,
        };

        for &column in moves {
            let next = match board.apply(column, player) {
                Ok(next) => next,
                Err(_) => continue,
            };
            let score = self
                .minimax(&next, depth - 1, alpha, beta, !maximizing)
                .score;

            if maximizing {
                if score > best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(column),
                    };
                }
                alpha = alpha.max(best.score);
            } else {
                if score < best.score {
                    best = SearchResult {
                        score,
                        best_move: Some(column),
                    };
                }
                beta = beta.min(best.score);
            }

            // the opponent will never allow this line, stop exploring siblings
            if alpha >= beta {
                break;
            }
        }
        best
    }

    /// Performs a top-level search from the agent's perspective
    ///
    /// Returns the score of the position and the calculated best move, or
    /// [`GameError::NoLegalMoves`] if the board is full. A maximum depth of
    /// zero yields the static evaluation without a move.
    pub fn search(&mut self, board: &Board) -> Result<SearchResult, GameError> {
        if board.legal_moves().is_empty() {
            warn!("search requested on a board without legal moves");
            return Err(GameError::NoLegalMoves);
        }

        let start_nodes = self.node_count;
        let result = if self.move_ordering {
            self.minimax_with_move_ordering(board, self.max_depth, MIN_SCORE, MAX_SCORE, true)
        } else {
            self.minimax(board, self.max_depth, MIN_SCORE, MAX_SCORE, true)
        };

        debug!(
            "depth {} search (move ordering: {}) chose {:?} with score {} after {} nodes",
            self.max_depth,
            self.move_ordering,
            result.best_move,
            result.score,
            self.node_count - start_nodes
        );
        Ok(result)
    }

    /// Calculates the column the agent should play, if any
    pub fn find_best_action(&mut self, board: &Board) -> Option<usize> {
        self.search(board).ok().and_then(|result| result.best_move)
    }
}

impl<E: Evaluator + Clone + Send + Sync> GameTreePlayer<E> {
    /// Performs a top-level search with the root's children explored in parallel
    ///
    /// Every child is searched with a full window by its own clone of this
    /// player, then the results are folded in the same order the sequential
    /// search visits them, so the returned score and move match
    /// [`search`](Self::search).
    pub fn search_parallel(&mut self, board: &Board) -> Result<SearchResult, GameError> {
        if board.legal_moves().is_empty() {
            warn!("search requested on a board without legal moves");
            return Err(GameError::NoLegalMoves);
        }
        if self.max_depth == 0 || board.is_terminal() {
            self.node_count += 1;
            return Ok(SearchResult::leaf(self.evaluate(board)));
        }

        let moves = if self.move_ordering {
            self.ordered_moves(board, true)
        } else {
            board.legal_moves()
        };
        let agent = self.agent;
        let depth = self.max_depth;
        let template = &*self;
        let children: Vec<(usize, i32, usize)> = moves
            .par_iter()
            .filter_map(|&column| {
                let next_board = board.apply(column, agent).ok()?;
                let mut next = template.clone();
                next.node_count = 0;
                let score = next
                    .minimax(&next_board, depth - 1, MIN_SCORE, MAX_SCORE, false)
                    .score;
                Some((column, score, next.node_count))
            })
            .collect();

        let start_nodes = self.node_count;
        self.node_count += 1;
        let mut best = SearchResult::leaf(MIN_SCORE);
        for (column, score, nodes) in children {
            self.node_count += nodes;
            if score > best.score {
                best = SearchResult {
                    score,
                    best_move: Some(column),
                };
            }
        }

        debug!(
            "parallel depth {} search (move ordering: {}) chose {:?} with score {} after {} nodes",
            depth,
            self.move_ordering,
            best.best_move,
            best.score,
            self.node_count - start_nodes
        );
        Ok(best)
    }

    /// Parallel counterpart of [`find_best_action`](Self::find_best_action)
    pub fn find_best_action_parallel(&mut self, board: &Board) -> Option<usize> {
        self.search_parallel(board)
            .ok()
            .and_then(|result| result.best_move)
    }
}
