use std::fmt;
use std::str::FromStr;

use log::{debug, trace};

use crate::{GameError, Player, Tile};

/// Dimension of an Othello board
pub const DIM: usize = 8;

/// The player who moves first
pub const START_PLAYER: Player = Player::Dark;

/// The 8 compass directions as (dx, dy)
const DIRECTIONS: [(i8, i8); 8] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // E
    (1, 1),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // W
    (-1, -1), // NW
];

/// A plain Othello position: the grid, the player to move and the game-over flag.
///
/// `Board` is `Copy` and carries no history, so copies never share undo/redo
/// state. Use [`crate::Game`] for a session with history.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Board {
    /// Indexed as `cells[y][x]`
    cells: [[Tile; DIM]; DIM],
    current_player: Player,
    game_over: bool,
}

impl Board {
    /// Create a new board with initial Othello setup
    /// Initial setup has 4 pieces in the center:
    /// - (3,3) and (4,4) are Light
    /// - (3,4) and (4,3) are Dark
    pub fn new() -> Self {
        let mut cells = [[Tile::Empty; DIM]; DIM];

        cells[3][3] = Tile::Light;
        cells[4][3] = Tile::Dark;
        cells[4][4] = Tile::Light;
        cells[3][4] = Tile::Dark;

        Board {
            cells,
            current_player: START_PLAYER,
            game_over: false,
        }
    }

    /// Build a position from 8 row strings (top row first).
    ///
    /// `X` is Dark, `O` is Light, `.`, `-` and space are empty. The turn is
    /// normalised the same way a move would leave it: if `to_move` has no
    /// legal move the opponent moves, and if neither can move the game is over.
    pub fn from_rows<S: AsRef<str>>(rows: &[S], to_move: Player) -> Result<Self, GameError> {
        if rows.len() != DIM {
            return Err(GameError::Parse(format!(
                "expected {} rows, got {}",
                DIM,
                rows.len()
            )));
        }

        let mut cells = [[Tile::Empty; DIM]; DIM];
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let symbols: Vec<char> = row.chars().collect();
            if symbols.len() != DIM {
                return Err(GameError::Parse(format!(
                    "row {} has {} cells, expected {}: '{}'",
                    y,
                    symbols.len(),
                    DIM,
                    row
                )));
            }
            for (x, symbol) in symbols.into_iter().enumerate() {
                cells[y][x] = match symbol {
                    'X' | 'x' => Tile::Dark,
                    'O' | 'o' => Tile::Light,
                    '.' | '-' | ' ' => Tile::Empty,
                    other => {
                        return Err(GameError::Parse(format!(
                            "invalid character '{}' at ({}, {})",
                            other, x, y
                        )))
                    }
                };
            }
        }

        let mut board = Board {
            cells,
            current_player: to_move,
            game_over: false,
        };
        if !board.has_legal_move(to_move) {
            if board.has_legal_move(to_move.opponent()) {
                board.current_player = to_move.opponent();
            } else {
                board.game_over = true;
            }
        }
        Ok(board)
    }

    /// Place a tile for the current player at (x, y).
    ///
    /// Returns `Ok(true)` if the move was legal and applied, `Ok(false)` if
    /// the tile is occupied, the game is over, or no ray captures. A rejected
    /// move leaves the board untouched.
    pub fn place(&mut self, x: usize, y: usize) -> Result<bool, GameError> {
        check_bounds(x, y)?;

        if self.game_over || self.cells[y][x] != Tile::Empty {
            trace!("rejected ({}, {}): tile occupied or game over", x, y);
            return Ok(false);
        }

        let player = self.current_player;
        let mut capturing = [false; 8];
        for (i, &(dx, dy)) in DIRECTIONS.iter().enumerate() {
            capturing[i] = self.would_flip_in_direction(x, y, dx, dy, player);
        }
        if !capturing.iter().any(|&c| c) {
            trace!("rejected ({}, {}): no capturing ray for {:?}", x, y, player);
            return Ok(false);
        }

        self.cells[y][x] = player.tile();
        let mut flipped = 0;
        for (i, &(dx, dy)) in DIRECTIONS.iter().enumerate() {
            if capturing[i] {
                flipped += self.flip_in_direction(x, y, dx, dy, player);
            }
        }
        debug!("{:?} placed at ({}, {}), flipped {}", player, x, y, flipped);

        self.advance_turn();
        Ok(true)
    }

    /// Hand the turn to the opponent if it can move; otherwise the mover
    /// keeps it, or the game ends when neither side can move.
    fn advance_turn(&mut self) {
        let mover = self.current_player;
        let opponent = mover.opponent();

        if self.has_legal_move(opponent) {
            self.current_player = opponent;
        } else if !self.has_legal_move(mover) {
            self.game_over = true;
            debug!(
                "game over: dark {} light {}",
                self.score(Player::Dark),
                self.score(Player::Light)
            );
        } else {
            debug!("{:?} has no legal move, {:?} moves again", opponent, mover);
        }
    }

    /// Check if placing for `player` at (x, y) would flip tiles in direction (dx, dy).
    /// True if at least one opponent tile is followed by one of `player`'s tiles.
    fn would_flip_in_direction(&self, x: usize, y: usize, dx: i8, dy: i8, player: Player) -> bool {
        let own = player.tile();
        let opponent = player.opponent().tile();

        let mut cx = x as i8 + dx;
        let mut cy = y as i8 + dy;
        let mut found_opponent = false;

        while in_bounds(cx, cy) {
            match self.cells[cy as usize][cx as usize] {
                Tile::Empty => return false,
                tile if tile == opponent => {
                    found_opponent = true;
                    cx += dx;
                    cy += dy;
                }
                tile if tile == own => return found_opponent,
                _ => return false,
            }
        }

        false
    }

    /// Flip the opponent run starting next to (x, y) in direction (dx, dy).
    /// The caller has already checked that the ray captures.
    fn flip_in_direction(&mut self, x: usize, y: usize, dx: i8, dy: i8, player: Player) -> usize {
        let opponent = player.opponent().tile();
        let mut flipped = 0;

        let mut cx = x as i8 + dx;
        let mut cy = y as i8 + dy;

        while in_bounds(cx, cy) && self.cells[cy as usize][cx as usize] == opponent {
            self.cells[cy as usize][cx as usize] = player.tile();
            flipped += 1;
            cx += dx;
            cy += dy;
        }

        flipped
    }

    fn is_legal_for(&self, x: usize, y: usize, player: Player) -> bool {
        self.cells[y][x] == Tile::Empty
            && DIRECTIONS
                .iter()
                .any(|&(dx, dy)| self.would_flip_in_direction(x, y, dx, dy, player))
    }

    /// Check if the current player may place at (x, y).
    /// Out-of-range coordinates and finished games are never legal.
    pub fn is_legal(&self, x: usize, y: usize) -> bool {
        x < DIM && y < DIM && !self.game_over && self.is_legal_for(x, y, self.current_player)
    }

    /// Legal placements for `player`, enumerated with `x` outer and `y` inner
    pub fn legal_moves_for(&self, player: Player) -> Vec<(usize, usize)> {
        let mut moves = Vec::new();
        for x in 0..DIM {
            for y in 0..DIM {
                if self.is_legal_for(x, y, player) {
                    moves.push((x, y));
                }
            }
        }
        moves
    }

    /// Legal placements for the current player; empty once the game is over
    pub fn legal_moves(&self) -> Vec<(usize, usize)> {
        if self.game_over {
            return Vec::new();
        }
        self.legal_moves_for(self.current_player)
    }

    pub fn has_legal_move(&self, player: Player) -> bool {
        (0..DIM).any(|x| (0..DIM).any(|y| self.is_legal_for(x, y, player)))
    }

    pub fn tile(&self, x: usize, y: usize) -> Result<Tile, GameError> {
        check_bounds(x, y)?;
        Ok(self.cells[y][x])
    }

    /// Every tile with its coordinate, `x` outer and `y` inner
    pub fn tiles(&self) -> impl Iterator<Item = (usize, usize, Tile)> + '_ {
        (0..DIM).flat_map(move |x| (0..DIM).map(move |y| (x, y, self.cells[y][x])))
    }

    /// Number of tiles equal to `tile`; `Tile::Empty` counts the free tiles
    pub fn score(&self, tile: impl Into<Tile>) -> usize {
        let tile = tile.into();
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&t| t == tile)
            .count()
    }

    pub fn free_tile_count(&self) -> usize {
        self.score(Tile::Empty)
    }

    /// Piece counts as (dark, light)
    pub fn piece_counts(&self) -> (usize, usize) {
        (self.score(Player::Dark), self.score(Player::Light))
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.game_over
    }

    /// Get the winner of the game
    /// Returns None while the game runs or on a draw
    pub fn winner(&self) -> Option<Player> {
        if !self.game_over {
            return None;
        }

        let (dark, light) = self.piece_counts();
        if dark > light {
            Some(Player::Dark)
        } else if light > dark {
            Some(Player::Light)
        } else {
            None
        }
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses 8 whitespace-separated rows, optionally followed by `X` or `O`
/// naming the player to move (Dark by default). Use `.` for empty tiles.
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let (rows, to_move) = match tokens.len() {
            n if n == DIM => (&tokens[..], START_PLAYER),
            n if n == DIM + 1 => {
                let to_move = match tokens[DIM] {
                    "X" | "x" => Player::Dark,
                    "O" | "o" => Player::Light,
                    other => {
                        return Err(GameError::Parse(format!(
                            "invalid player to move '{}'",
                            other
                        )))
                    }
                };
                (&tokens[..DIM], to_move)
            }
            n => {
                return Err(GameError::Parse(format!(
                    "expected {} rows and an optional player, got {} tokens",
                    DIM, n
                )))
            }
        };
        Board::from_rows(rows, to_move)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const SEPARATOR: &str = "+---+---+---+---+---+---+---+---+";

        writeln!(f, "  a   b   c   d   e   f   g   h")?;
        writeln!(f, "{}", SEPARATOR)?;
        for y in 0..DIM {
            for x in 0..DIM {
                write!(f, "| {} ", self.cells[y][x].symbol())?;
            }
            writeln!(f, "| {}", y + 1)?;
            writeln!(f, "{}", SEPARATOR)?;
        }
        writeln!(f, "currentPlayer = {}", self.current_player.tile().symbol())?;
        writeln!(f, "gameOver = {}", self.game_over)?;
        writeln!(f, "score(X) = {}", self.score(Player::Dark))?;
        writeln!(f, "score(O) = {}", self.score(Player::Light))
    }
}

fn in_bounds(x: i8, y: i8) -> bool {
    x >= 0 && x < DIM as i8 && y >= 0 && y < DIM as i8
}

fn check_bounds(x: usize, y: usize) -> Result<(), GameError> {
    if x >= DIM || y >= DIM {
        return Err(GameError::OutOfRange { x, y });
    }
    Ok(())
}
