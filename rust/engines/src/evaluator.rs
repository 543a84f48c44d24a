//! Static positional evaluation
//!
//! A non-terminal board is scored as the sum of positional weights under the
//! player's tiles minus the sum under the opponent's tiles. Corners carry the
//! most weight; the squares next to a corner are negative because taking them
//! tends to hand the corner to the opponent.
//!
//! [`disc_difference`] is the plain alternative: own tiles minus opponent
//! tiles, as the greedy player counts them.
//!
//! A finished board scores [`WIN`] if the player has strictly more tiles than
//! the opponent and [`LOSS`] otherwise, so a draw counts as a loss. Both
//! evaluations share this rule.

use othello_rust::{Board, GameError, Player, DIM};
use serde::{Deserialize, Serialize};

/// Score of a finished game the player has won
pub const WIN: i32 = i32::MAX;

/// Score of a finished game the player has lost or drawn
pub const LOSS: i32 = i32::MIN;

// Symmetric about both midlines, so [x][y] and [y][x] read the same
const WEIGHTS: [[i32; DIM]; DIM] = [
    [10000, -2000, 500, 200, 200, 500, -2000, 10000],
    [-2000, -2500, 50, 150, 150, 50, -2500, -2000],
    [500, 50, 250, 100, 100, 250, 50, 500],
    [200, 150, 100, 50, 50, 100, 150, 200],
    [200, 150, 100, 50, 50, 100, 150, 200],
    [500, 50, 250, 100, 100, 250, 50, 500],
    [-2000, -2500, 50, 150, 150, 50, -2500, -2000],
    [10000, -2000, 500, 200, 200, 500, -2000, 10000],
];

/// Which static evaluation scores the frontier boards of a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Evaluation {
    /// Weighted squares, see [`score`]
    #[default]
    Positional,
    /// Tile count difference, see [`disc_difference`]
    DiscCount,
}

impl Evaluation {
    pub fn score(self, board: &Board, player: Player) -> i32 {
        match self {
            Evaluation::Positional => score(board, player),
            Evaluation::DiscCount => disc_difference(board, player),
        }
    }
}

/// Positional weight of (x, y)
pub fn weight(x: usize, y: usize) -> Result<i32, GameError> {
    if x >= DIM || y >= DIM {
        return Err(GameError::OutOfRange { x, y });
    }
    Ok(WEIGHTS[x][y])
}

fn terminal_score(board: &Board, player: Player) -> i32 {
    if board.score(player) > board.score(player.opponent()) {
        WIN
    } else {
        LOSS
    }
}

/// Score `board` from `player`'s point of view with the weight table
pub fn score(board: &Board, player: Player) -> i32 {
    if board.is_game_over() {
        return terminal_score(board, player);
    }

    board
        .tiles()
        .map(|(x, y, tile)| match tile.player() {
            Some(owner) if owner == player => WEIGHTS[x][y],
            Some(_) => -WEIGHTS[x][y],
            None => 0,
        })
        .sum()
}

/// Score `board` as `player`'s tiles minus the opponent's tiles
pub fn disc_difference(board: &Board, player: Player) -> i32 {
    if board.is_game_over() {
        return terminal_score(board, player);
    }
    board.score(player) as i32 - board.score(player.opponent()) as i32
}
