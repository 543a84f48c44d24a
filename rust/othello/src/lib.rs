//! Core types and game logic for Othello (Reversi)
//!
//! Coordinates are `(x, y)` with `x` the column and `y` the row, both in
//! `0..DIM`.

pub mod board;
pub mod error;
pub mod game;

pub use board::{Board, DIM};
pub use error::GameError;
pub use game::Game;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Player {
    Dark,
    Light,
}

impl Player {
    /// Get the opponent player
    pub fn opponent(&self) -> Player {
        match self {
            Player::Dark => Player::Light,
            Player::Light => Player::Dark,
        }
    }

    /// Convert player to tile representation
    pub fn tile(&self) -> Tile {
        match self {
            Player::Dark => Tile::Dark,
            Player::Light => Tile::Light,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Tile {
    Empty,
    Dark,
    Light,
}

impl Tile {
    /// The player owning this tile, `None` for an empty tile
    pub fn player(&self) -> Option<Player> {
        match self {
            Tile::Dark => Some(Player::Dark),
            Tile::Light => Some(Player::Light),
            Tile::Empty => None,
        }
    }

    /// Single-character symbol used by the text rendering
    pub fn symbol(&self) -> char {
        match self {
            Tile::Dark => 'X',
            Tile::Light => 'O',
            Tile::Empty => ' ',
        }
    }
}

impl From<Player> for Tile {
    fn from(player: Player) -> Self {
        player.tile()
    }
}
