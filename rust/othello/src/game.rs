use std::ops::Deref;

use log::debug;

use crate::{Board, GameError};

/// A live game session: the current board plus its undo/redo history.
///
/// History is an arena of board snapshots with a cursor pointing at the
/// current position. Snapshots before the cursor form the undo chain, the ones
/// after it the redo chain. Every read accessor of [`Board`] is available
/// through `Deref`.
#[derive(Clone, Debug)]
pub struct Game {
    history: Vec<Board>,
    cursor: usize,
}

impl Game {
    pub fn new() -> Self {
        Self::from_board(Board::new())
    }

    /// Start a session from an arbitrary position, with empty history
    pub fn from_board(board: Board) -> Self {
        Game {
            history: vec![board],
            cursor: 0,
        }
    }

    /// The current position
    pub fn board(&self) -> &Board {
        &self.history[self.cursor]
    }

    /// Place a tile for the current player, see [`Board::place`].
    ///
    /// A successful move drops the redo chain and records the new position.
    pub fn place(&mut self, x: usize, y: usize) -> Result<bool, GameError> {
        let mut next = *self.board();
        if !next.place(x, y)? {
            return Ok(false);
        }

        if self.has_redo() {
            debug!(
                "discarding {} redo position(s)",
                self.history.len() - self.cursor - 1
            );
        }
        self.history.truncate(self.cursor + 1);
        self.history.push(next);
        self.cursor += 1;
        Ok(true)
    }

    /// Step back to the position before the last move
    pub fn undo(&mut self) -> bool {
        if !self.has_undo() {
            return false;
        }
        self.cursor -= 1;
        debug!("undo to position {}", self.cursor);
        true
    }

    /// Replay the last undone move
    pub fn redo(&mut self) -> bool {
        if !self.has_redo() {
            return false;
        }
        self.cursor += 1;
        debug!("redo to position {}", self.cursor);
        true
    }

    pub fn has_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn has_redo(&self) -> bool {
        self.cursor + 1 < self.history.len()
    }

    /// Forget every position except the current one
    pub fn clear_history(&mut self) {
        let current = *self.board();
        self.history = vec![current];
        self.cursor = 0;
    }

    /// Start over from the initial position
    pub fn reset(&mut self) {
        *self = Game::new();
    }
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for Game {
    type Target = Board;

    fn deref(&self) -> &Board {
        self.board()
    }
}

impl From<Board> for Game {
    fn from(board: Board) -> Self {
        Game::from_board(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Player, Tile};

    #[test]
    fn test_new_game_has_no_history() {
        let game = Game::new();
        assert!(!game.has_undo());
        assert!(!game.has_redo());
        assert_eq!(*game.board(), Board::new());
    }

    #[test]
    fn test_undo_restores_pre_move_board() {
        let mut game = Game::new();
        let before = *game.board();

        assert_eq!(game.place(2, 3), Ok(true));
        let after = *game.board();
        assert!(game.has_undo());

        assert!(game.undo());
        assert_eq!(*game.board(), before);
        assert_eq!(game.current_player(), Player::Dark);
        assert!(game.has_redo());

        assert!(game.redo());
        assert_eq!(*game.board(), after);
        assert_eq!(game.current_player(), Player::Light);
        assert!(!game.has_redo());
    }

    #[test]
    fn test_undo_redo_without_history() {
        let mut game = Game::new();
        assert!(!game.undo());
        assert!(!game.redo());
        assert_eq!(*game.board(), Board::new());
    }

    #[test]
    fn test_rejected_move_keeps_history() {
        let mut game = Game::new();
        game.place(2, 3).unwrap();
        game.undo();

        assert_eq!(game.place(0, 0), Ok(false));
        assert!(game.has_redo());
        assert!(!game.has_undo());
    }

    #[test]
    fn test_new_move_discards_redo_chain() {
        let mut game = Game::new();
        game.place(2, 3).unwrap();
        game.place(2, 2).unwrap();
        assert!(game.undo());
        assert!(game.undo());
        assert!(game.has_redo());

        assert_eq!(game.place(3, 2), Ok(true));
        assert!(!game.has_redo());
        assert!(!game.redo());
        assert!(game.undo());
        assert_eq!(*game.board(), Board::new());
        assert!(!game.has_undo());
    }

    #[test]
    fn test_multi_level_walk() {
        let mut game = Game::new();
        let mut positions = vec![*game.board()];
        for _ in 0..10 {
            let Some(&(x, y)) = game.legal_moves().first() else {
                break;
            };
            assert_eq!(game.place(x, y), Ok(true));
            positions.push(*game.board());
        }

        for expected in positions.iter().rev().skip(1) {
            assert!(game.undo());
            assert_eq!(game.board(), expected);
        }
        assert!(!game.undo());

        for expected in positions.iter().skip(1) {
            assert!(game.redo());
            assert_eq!(game.board(), expected);
        }
        assert!(!game.redo());
    }

    #[test]
    fn test_copies_do_not_share_history() {
        let mut game = Game::new();
        game.place(2, 3).unwrap();

        let mut copy = *game.board();
        copy.place(2, 2).unwrap();

        assert_eq!(game.tile(2, 2).unwrap(), Tile::Empty);
        assert!(game.undo());
        assert_eq!(copy.tile(2, 2).unwrap(), Tile::Light);
    }

    #[test]
    fn test_clear_history_and_reset() {
        let mut game = Game::new();
        game.place(2, 3).unwrap();
        game.place(2, 2).unwrap();
        game.undo();

        let current = *game.board();
        game.clear_history();
        assert_eq!(*game.board(), current);
        assert!(!game.has_undo());
        assert!(!game.has_redo());

        game.reset();
        assert_eq!(*game.board(), Board::new());
    }

    #[test]
    fn test_out_of_range_propagates() {
        let mut game = Game::new();
        assert_eq!(game.place(9, 0), Err(GameError::OutOfRange { x: 9, y: 0 }));
        assert!(!game.has_undo());
    }
}
