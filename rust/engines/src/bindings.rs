//! PyO3 bindings exposing [`Game`] and [`SearchEngine`] to Python

use crate::{SearchConfig, SearchEngine};
use ndarray::Array2;
use numpy::{PyArray1, PyArray2};
use othello_rust::{Game, GameError, Player, Tile, DIM};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

fn to_py_err(err: GameError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

/// Python wrapper for an Othello game session
///
/// Coordinates are (x, y): x is the column, y the row, both in [0, 7].
#[pyclass]
pub struct OthelloGame {
    game: Game,
}

#[pymethods]
impl OthelloGame {
    /// Create a new Othello game with the standard initial setup
    ///
    /// Returns:
    ///     OthelloGame: A new game instance with 4 pieces in the center
    #[new]
    pub fn new() -> Self {
        Self { game: Game::new() }
    }

    /// Reset the game to initial state and forget the history
    pub fn reset(&mut self) {
        self.game.reset();
    }

    /// Place a piece for the current player
    ///
    /// Returns:
    ///     bool: Whether the move was legal and applied
    ///
    /// Raises:
    ///     ValueError: If x or y is out of range [0, 7]
    pub fn place(&mut self, x: usize, y: usize) -> PyResult<bool> {
        self.game.place(x, y).map_err(to_py_err)
    }

    /// Undo the last move, returns False if there is nothing to undo
    pub fn undo(&mut self) -> bool {
        self.game.undo()
    }

    /// Redo the last undone move, returns False if there is nothing to redo
    pub fn redo(&mut self) -> bool {
        self.game.redo()
    }

    pub fn has_undo(&self) -> bool {
        self.game.has_undo()
    }

    pub fn has_redo(&self) -> bool {
        self.game.has_redo()
    }

    /// Get the current board state as a 2D numpy array
    ///
    /// Returns:
    ///     np.ndarray: Shape (8, 8) with dtype uint8, indexed [y][x]
    ///         - 0 = Empty cell
    ///         - 1 = Dark piece
    ///         - 2 = Light piece
    pub fn get_board<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray2<u8>> {
        let mut array = Array2::<u8>::zeros((DIM, DIM));
        for (x, y, tile) in self.game.tiles() {
            array[[y, x]] = match tile {
                Tile::Empty => 0,
                Tile::Dark => 1,
                Tile::Light => 2,
            };
        }

        Ok(PyArray2::from_owned_array(py, array))
    }

    /// Get legal moves for the current player
    ///
    /// Returns:
    ///     np.ndarray: Shape (64,) with dtype bool, index y * 8 + x
    pub fn get_legal_moves<'py>(&self, py: Python<'py>) -> PyResult<&'py PyArray1<bool>> {
        let mut moves = [false; DIM * DIM];
        for (x, y) in self.game.legal_moves() {
            moves[y * DIM + x] = true;
        }
        Ok(PyArray1::from_slice(py, &moves))
    }

    /// Get the current player
    ///
    /// Returns:
    ///     int: 0 for Dark, 1 for Light
    pub fn get_current_player(&self) -> u8 {
        match self.game.current_player() {
            Player::Dark => 0,
            Player::Light => 1,
        }
    }

    /// Get piece counts for both players
    ///
    /// Returns:
    ///     tuple: (dark_count, light_count)
    pub fn get_piece_counts(&self) -> (usize, usize) {
        self.game.piece_counts()
    }

    pub fn is_game_over(&self) -> bool {
        self.game.is_game_over()
    }

    /// Get the winner of the game
    ///
    /// Returns:
    ///     int:
    ///         - 0 = Dark wins
    ///         - 1 = Light wins
    ///         - 2 = Draw
    ///         - 3 = Game not finished
    pub fn get_winner(&self) -> u8 {
        if !self.game.is_game_over() {
            return 3;
        }

        match self.game.winner() {
            Some(Player::Dark) => 0,
            Some(Player::Light) => 1,
            None => 2,
        }
    }

    /// Let the search engine play one move for the current player
    ///
    /// Args:
    ///     depth (int): Plies to look ahead, at least 1
    ///     parallel (bool): Evaluate first moves concurrently
    ///
    /// Returns:
    ///     tuple: (x, y, score) of the move played
    ///
    /// Raises:
    ///     ValueError: If the game is over or depth is 0
    #[pyo3(signature = (depth, parallel = true))]
    pub fn ai_move(&mut self, py: Python<'_>, depth: usize, parallel: bool) -> PyResult<(usize, usize, i32)> {
        let engine = SearchEngine::with_config(SearchConfig::new(depth).with_parallel(parallel));
        let game = &mut self.game;
        let chosen = py.allow_threads(|| engine.play(game)).map_err(to_py_err)?;
        Ok((chosen.x, chosen.y, chosen.score))
    }

    fn __str__(&self) -> String {
        self.game.to_string()
    }
}

/// Python module definition
///
/// This module can be imported in Python as `othello_engines`
#[pymodule]
fn othello_engines(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<OthelloGame>()?;
    Ok(())
}
