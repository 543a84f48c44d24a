//! Othello Search Engines
//!
//! This crate contains the move-search side of the game:
//! - `evaluator`: static positional weights plus win/loss scoring of finished games
//! - `search`: fixed-depth minimax, both the sequential search and the root
//!   fan-out [`SearchEngine`] that evaluates first moves on the rayon pool
//!
//! The Python bindings live behind the `python` feature.
//!
//! ```
//! use othello_engines::{SearchConfig, SearchEngine};
//! use othello_rust::Game;
//!
//! let engine = SearchEngine::with_config(SearchConfig::new(2));
//! let mut game = Game::new();
//! let chosen = engine.play(&mut game).unwrap();
//! assert!(game.has_undo());
//! assert!(chosen.x < 8 && chosen.y < 8);
//! ```

use serde::{Deserialize, Serialize};

pub mod evaluator;
pub mod search;

#[cfg(feature = "python")]
pub mod bindings;

pub use evaluator::Evaluation;
pub use search::{search, search_scored, ScoredMove, SearchEngine, TieBreak};

/// Knobs for [`SearchEngine`].
///
/// - `depth`: number of plies to look ahead, at least 1. Clamped to the free
///   tile count at search time.
/// - `parallel`: evaluate root moves on the rayon pool. Results are identical
///   either way.
/// - `evaluation`: how frontier boards are scored.
/// - `ties`: which of several equally scored root moves is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    pub depth: usize,
    pub parallel: bool,
    pub evaluation: Evaluation,
    pub ties: TieBreak,
}

impl SearchConfig {
    pub fn new(depth: usize) -> Self {
        Self {
            depth,
            ..Self::default()
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_evaluation(mut self, evaluation: Evaluation) -> Self {
        self.evaluation = evaluation;
        self
    }

    pub fn with_ties(mut self, ties: TieBreak) -> Self {
        self.ties = ties;
        self
    }

    /// One ply, tile count difference, first of equal moves wins
    pub fn greedy() -> Self {
        Self::new(1)
            .with_evaluation(Evaluation::DiscCount)
            .with_ties(TieBreak::First)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            parallel: true,
            evaluation: Evaluation::default(),
            ties: TieBreak::default(),
        }
    }
}
