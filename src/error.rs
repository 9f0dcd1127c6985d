//! Error types shared by the board, game and parsing layers.
//!
//! Search termination without a solution is *not* an error: see
//! [`crate::solver::Outcome`].

use crate::engine::Action;

/// Why a tile sequence was rejected as a board.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardDefect {
    #[error("expected {expected} tiles, got {found}")]
    WrongLength { expected: usize, found: usize },

    #[error("tile {0} is outside the tile set")]
    TileOutOfRange(u8),

    #[error("tile {0} appears more than once")]
    DuplicateTile(u8),

    #[error("no blank (0) tile present")]
    MissingBlank,
}

/// Errors surfaced by the puzzle core.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PuzzleError {
    /// The input is not a permutation of `0..CELLS` with exactly one blank.
    #[error("invalid board: {0}")]
    InvalidBoard(#[from] BoardDefect),

    /// The blank cannot move in the requested direction.
    #[error("illegal move: blank cannot move {0}")]
    IllegalMove(Action),

    /// Text input could not be turned into tiles.
    #[error("parse error: {0}")]
    Parse(String),
}
