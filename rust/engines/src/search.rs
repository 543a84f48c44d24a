//! Fixed-depth minimax over [`Board`] scored by the [`evaluator`](crate::evaluator).
//!
//! The search is full width and unpruned. Frontier boards are always scored
//! from one fixed perspective player; the max/min flag of a level only decides
//! whether the highest or the lowest score is kept. Ties go to the candidate
//! enumerated last (`>=` on max levels, `<=` on min levels). Among root moves
//! the engine can instead keep the first, see [`TieBreak`].
//!
//! Two entry points share the recursion:
//! - [`search`] / [`search_scored`]: the sequential search, scoring every level
//!   from the root player's perspective.
//! - [`SearchEngine`]: the root fan-out. Each legal first move becomes one unit
//!   of work that searches the remaining plies from the opponent's perspective
//!   on a minimizing level, and its frontier is then scored for the root
//!   player. Units run on the rayon pool when `parallel` is set.

use log::{debug, info};
use othello_rust::{Board, Game, GameError, Player};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::evaluator::Evaluation;
use crate::SearchConfig;

/// A root move together with the score of the frontier it leads to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoredMove {
    pub x: usize,
    pub y: usize,
    pub score: i32,
}

/// Which root move wins when several share the best score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// The move enumerated last
    #[default]
    Last,
    /// The move enumerated first
    First,
}

/// Sequential search returning the board reached after the chosen root move.
///
/// Fails with `InvalidArgument` if the game is over or `ply < 1`; a `ply`
/// beyond the free tile count is clamped.
pub fn search(board: &Board, ply: usize, player: Player) -> Result<Board, GameError> {
    let best = search_scored(board, ply, player)?;
    let mut next = *board;
    if !next.place(best.x, best.y)? {
        return Err(illegal_choice(best));
    }
    Ok(next)
}

/// Sequential search returning the chosen root move and its frontier score
pub fn search_scored(board: &Board, ply: usize, player: Player) -> Result<ScoredMove, GameError> {
    let ply = clamp_ply(board, ply)?;

    let mut best: Option<ScoredMove> = None;
    for (x, y) in board.legal_moves() {
        let mut child = *board;
        if !matches!(child.place(x, y), Ok(true)) {
            continue;
        }
        let frontier = minimax(child, ply, player, false, 1, Evaluation::Positional);
        let candidate = ScoredMove {
            x,
            y,
            score: Evaluation::Positional.score(&frontier, player),
        };
        best = keep_best(best, candidate, TieBreak::Last);
    }

    best.ok_or_else(|| GameError::InvalidArgument("no legal move to search".to_string()))
}

/// Root fan-out search parameterised by [`SearchConfig`]
#[derive(Debug, Clone, Default)]
pub struct SearchEngine {
    cfg: SearchConfig,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::with_config(SearchConfig::default())
    }

    pub fn with_config(cfg: SearchConfig) -> Self {
        Self { cfg }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.cfg
    }

    /// Score every legal root move, in enumeration order.
    ///
    /// Every unit owns its copy of the board; the caller's board is never
    /// touched. All units run to completion before this returns.
    pub fn root_evals(&self, board: &Board) -> Result<Vec<ScoredMove>, GameError> {
        let ply = clamp_ply(board, self.cfg.depth)?;
        let root = board.current_player();
        let moves = board.legal_moves();

        let evals: Vec<Option<ScoredMove>> = if self.cfg.parallel {
            moves
                .par_iter()
                .map(|&(x, y)| evaluate_root_move(board, x, y, ply, root, self.cfg.evaluation))
                .collect()
        } else {
            moves
                .iter()
                .map(|&(x, y)| evaluate_root_move(board, x, y, ply, root, self.cfg.evaluation))
                .collect()
        };

        let evals: Vec<ScoredMove> = evals.into_iter().flatten().collect();
        for eval in &evals {
            debug!("root ({}, {}) scored {}", eval.x, eval.y, eval.score);
        }
        Ok(evals)
    }

    /// Pick the best root move without playing it
    pub fn best_move(&self, board: &Board) -> Result<ScoredMove, GameError> {
        self.root_evals(board)?
            .into_iter()
            .fold(None, |best, candidate| keep_best(best, candidate, self.cfg.ties))
            .ok_or_else(|| GameError::InvalidArgument("no legal move to search".to_string()))
    }

    /// Choose a move for the current player and play it once on the live game,
    /// recording it in the game's history.
    pub fn play(&self, game: &mut Game) -> Result<ScoredMove, GameError> {
        let mover = game.current_player();
        let best = self.best_move(game.board())?;
        if !game.place(best.x, best.y)? {
            return Err(illegal_choice(best));
        }
        info!(
            "{:?} plays ({}, {}) with score {} at depth {}",
            mover,
            best.x,
            best.y,
            best.score,
            self.cfg.depth
        );
        Ok(best)
    }

    /// Choose a move and return a new board with it applied
    pub fn move_board(&self, board: &Board) -> Result<Board, GameError> {
        let best = self.best_move(board)?;
        let mut next = *board;
        if !next.place(best.x, best.y)? {
            return Err(illegal_choice(best));
        }
        Ok(next)
    }
}

/// Validate the search arguments and clamp `ply` to the free tile count
fn clamp_ply(board: &Board, ply: usize) -> Result<usize, GameError> {
    if board.is_game_over() {
        return Err(GameError::InvalidArgument("game is already over".to_string()));
    }
    if ply < 1 {
        return Err(GameError::InvalidArgument("ply has to be 1 or higher".to_string()));
    }
    Ok(ply.min(board.free_tile_count()))
}

/// One unit of the root fan-out: play (x, y), search the rest from the
/// opponent's side, score the frontier for the root player
fn evaluate_root_move(
    board: &Board,
    x: usize,
    y: usize,
    ply: usize,
    root: Player,
    eval: Evaluation,
) -> Option<ScoredMove> {
    let mut child = *board;
    if !matches!(child.place(x, y), Ok(true)) {
        return None;
    }
    let frontier = minimax(child, ply, root.opponent(), false, 1, eval);
    Some(ScoredMove {
        x,
        y,
        score: eval.score(&frontier, root),
    })
}

/// Explore down to `ply` and return the frontier board of the chosen line.
///
/// A node without a legal move passes its own board through as the frontier.
fn minimax(
    board: Board,
    ply: usize,
    perspective: Player,
    maximizing: bool,
    current_ply: usize,
    eval: Evaluation,
) -> Board {
    if current_ply >= ply {
        return board;
    }

    let mut best: Option<(Board, i32)> = None;
    for (x, y) in board.legal_moves() {
        let mut child = board;
        if !matches!(child.place(x, y), Ok(true)) {
            continue;
        }
        let frontier = minimax(child, ply, perspective, !maximizing, current_ply + 1, eval);
        let score = eval.score(&frontier, perspective);
        let better = match best {
            None => true,
            Some((_, best_score)) if maximizing => score >= best_score,
            Some((_, best_score)) => score <= best_score,
        };
        if better {
            best = Some((frontier, score));
        }
    }

    best.map_or(board, |(frontier, _)| frontier)
}

/// Highest score wins; `ties` decides between equal scores
fn keep_best(best: Option<ScoredMove>, candidate: ScoredMove, ties: TieBreak) -> Option<ScoredMove> {
    match (best, ties) {
        (Some(current), TieBreak::Last) if candidate.score < current.score => Some(current),
        (Some(current), TieBreak::First) if candidate.score <= current.score => Some(current),
        _ => Some(candidate),
    }
}

fn illegal_choice(best: ScoredMove) -> GameError {
    GameError::InvalidArgument(format!(
        "search chose an illegal move ({}, {})",
        best.x, best.y
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::{self, LOSS, WIN};
    use othello_rust::Tile;

    fn engine(depth: usize, parallel: bool) -> SearchEngine {
        SearchEngine::with_config(SearchConfig::new(depth).with_parallel(parallel))
    }

    fn finished_board() -> Board {
        Board::from_rows(
            &[
                "XXXX....", "........", "........", "........", "........", "........",
                "........", "........",
            ],
            Player::Dark,
        )
        .unwrap()
    }

    /// Position after a few opening moves, Dark to move
    fn midgame() -> Board {
        let mut board = Board::new();
        for (x, y) in [(2, 3), (2, 2), (2, 1), (1, 3)] {
            assert_eq!(board.place(x, y), Ok(true));
        }
        board
    }

    #[test]
    fn test_invalid_arguments() {
        let board = Board::new();
        assert!(matches!(
            search(&board, 0, Player::Dark),
            Err(GameError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine(0, true).best_move(&board),
            Err(GameError::InvalidArgument(_))
        ));

        let over = finished_board();
        assert!(matches!(
            search(&over, 2, Player::Dark),
            Err(GameError::InvalidArgument(_))
        ));
        assert!(matches!(
            engine(2, false).move_board(&over),
            Err(GameError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_ply_is_clamped_to_free_tiles() {
        // Two free tiles left, a depth of 10 is clamped to 2
        let board = Board::from_rows(
            &[
                "XXXXXXXX", "XXXXXXXX", "XXXXXXXX", "XXXXXXXX", "XXXXXXXX", "XXXXXXOO",
                "XXXXXXO.", "XXXXXXX.",
            ],
            Player::Dark,
        )
        .unwrap();
        assert_eq!(board.free_tile_count(), 2);

        let deep = engine(10, false).best_move(&board).unwrap();
        let clamped = engine(2, false).best_move(&board).unwrap();
        assert_eq!(deep, clamped);
    }

    #[test]
    fn test_depth_one_picks_highest_positional_score() {
        let board = midgame();
        let best = engine(1, false).best_move(&board).unwrap();

        let mut expected: Option<ScoredMove> = None;
        for (x, y) in board.legal_moves() {
            let mut child = board;
            child.place(x, y).unwrap();
            let score = evaluator::score(&child, Player::Dark);
            if expected.map_or(true, |e| score >= e.score) {
                expected = Some(ScoredMove { x, y, score });
            }
        }
        assert_eq!(Some(best), expected);
    }

    #[test]
    fn test_ties_go_to_the_last_enumerated_move() {
        // All four opening moves are symmetric and score the same
        let board = Board::new();
        let best = engine(1, true).best_move(&board).unwrap();
        assert_eq!((best.x, best.y), (5, 4));

        let sequential = search_scored(&board, 1, Player::Dark).unwrap();
        assert_eq!((sequential.x, sequential.y), (5, 4));
    }

    #[test]
    fn test_sequential_two_ply_matches_hand_minimax() {
        let board = midgame();
        let root = board.current_player();

        // max over root moves of (min over replies of score for root)
        let mut expected: Option<ScoredMove> = None;
        for (x, y) in board.legal_moves() {
            let mut child = board;
            child.place(x, y).unwrap();
            let mut reply_best: Option<i32> = None;
            for (rx, ry) in child.legal_moves() {
                let mut grandchild = child;
                grandchild.place(rx, ry).unwrap();
                let score = evaluator::score(&grandchild, root);
                if reply_best.map_or(true, |b| score <= b) {
                    reply_best = Some(score);
                }
            }
            let score = reply_best.unwrap_or_else(|| evaluator::score(&child, root));
            if expected.map_or(true, |e| score >= e.score) {
                expected = Some(ScoredMove { x, y, score });
            }
        }

        assert_eq!(search_scored(&board, 2, root).ok(), expected);
    }

    #[test]
    fn test_fan_out_scores_replies_from_opponent_side() {
        // The reply is the one minimizing the opponent's own score, and that
        // frontier is then scored for the root player
        let board = midgame();
        let root = board.current_player();

        let mut expected: Option<ScoredMove> = None;
        for (x, y) in board.legal_moves() {
            let mut child = board;
            child.place(x, y).unwrap();
            let mut chosen: Option<(Board, i32)> = None;
            for (rx, ry) in child.legal_moves() {
                let mut grandchild = child;
                grandchild.place(rx, ry).unwrap();
                let score = evaluator::score(&grandchild, root.opponent());
                if chosen.map_or(true, |(_, b)| score <= b) {
                    chosen = Some((grandchild, score));
                }
            }
            let frontier = chosen.map_or(child, |(b, _)| b);
            let score = evaluator::score(&frontier, root);
            if expected.map_or(true, |e| score >= e.score) {
                expected = Some(ScoredMove { x, y, score });
            }
        }

        assert_eq!(engine(2, true).best_move(&board).ok(), expected);
        assert_eq!(engine(2, false).best_move(&board).ok(), expected);
    }

    #[test]
    fn test_greedy_opening_takes_first_of_equal_moves() {
        // Every opening flips one tile, 4 against 1, so all four tie at 3
        let greedy = SearchEngine::with_config(SearchConfig::greedy());
        let best = greedy.best_move(&Board::new()).unwrap();
        assert_eq!((best.x, best.y, best.score), (2, 3, 3));

        let last = SearchEngine::with_config(SearchConfig::greedy().with_ties(TieBreak::Last));
        let best = last.best_move(&Board::new()).unwrap();
        assert_eq!((best.x, best.y, best.score), (5, 4, 3));
    }

    #[test]
    fn test_greedy_maximises_tile_difference() {
        let board = midgame();
        let root = board.current_player();

        let mut expected: Option<ScoredMove> = None;
        for (x, y) in board.legal_moves() {
            let mut child = board;
            child.place(x, y).unwrap();
            let score = evaluator::disc_difference(&child, root);
            if expected.map_or(true, |e| score > e.score) {
                expected = Some(ScoredMove { x, y, score });
            }
        }

        for parallel in [false, true] {
            let cfg = SearchConfig::greedy().with_parallel(parallel);
            let best = SearchEngine::with_config(cfg).best_move(&board).ok();
            assert_eq!(best, expected);
        }
    }

    #[test]
    fn test_parallel_and_sequential_engines_agree() {
        let board = midgame();
        for depth in 1..=3 {
            let par = engine(depth, true).root_evals(&board).unwrap();
            let seq = engine(depth, false).root_evals(&board).unwrap();
            assert_eq!(par, seq);
            assert_eq!(par.len(), board.legal_moves().len());
        }
    }

    #[test]
    fn test_play_commits_once_and_records_history() {
        let mut game = Game::new();
        let before = *game.board();
        let best = engine(3, true).play(&mut game).unwrap();

        assert!(before.is_legal(best.x, best.y));
        assert_eq!(game.tile(best.x, best.y).unwrap(), Tile::Dark);
        assert_eq!(game.free_tile_count(), before.free_tile_count() - 1);
        assert_eq!(game.current_player(), Player::Light);
        assert!(game.undo());
        assert_eq!(*game.board(), before);
    }

    #[test]
    fn test_search_returns_board_after_root_move() {
        let board = Board::new();
        let best = search_scored(&board, 3, Player::Dark).unwrap();
        let next = search(&board, 3, Player::Dark).unwrap();

        let mut expected = board;
        expected.place(best.x, best.y).unwrap();
        assert_eq!(next, expected);
    }

    #[test]
    fn test_search_prefers_winning_move() {
        // Taking (7, 7) ends the game with Dark ahead
        let board = Board::from_rows(
            &[
                "XXXXXXXX", "XXXXXXXX", "XXXXXXXX", "XXXXXXXX", "XXXXXXXX", "XXXXXXXX",
                "XXXXXXXO", "XXXXXXO.",
            ],
            Player::Dark,
        )
        .unwrap();
        let best = engine(4, true).best_move(&board).unwrap();
        assert_eq!((best.x, best.y, best.score), (7, 7, WIN));

        let after = engine(1, false).move_board(&board).unwrap();
        assert!(after.is_game_over());
        assert_eq!(evaluator::score(&after, Player::Light), LOSS);
    }

    #[test]
    fn test_minimax_passes_through_finished_board() {
        let over = finished_board();
        assert_eq!(minimax(over, 3, Player::Dark, true, 0, Evaluation::Positional), over);
    }
}
