//! Errors raised by position construction and move application.

use chess_core::{Color, FenError, Move};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error(transparent)]
    InvalidFen(#[from] FenError),

    /// Every position holds exactly one king per color.
    #[error("invalid position: {color} has {kings} kings, expected exactly one")]
    InvalidPosition { color: Color, kings: u32 },

    /// The side that just moved may not be left in check.
    #[error("invalid position: {0} is in check but not to move")]
    OpponentInCheck(Color),

    #[error("illegal move: {0}")]
    IllegalMove(Move),

    #[error("malformed move text: '{0}'")]
    InvalidMoveText(String),
}
