use thiserror::Error;

/// Errors raised by board accessors and the search engine.
///
/// An illegal but in-range placement is not an error; `place` reports it as
/// `Ok(false)`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("coordinate ({x}, {y}) is out of range: x and y have to be in [0, 7]")]
    OutOfRange { x: usize, y: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("cannot parse board: {0}")]
    Parse(String),
}
