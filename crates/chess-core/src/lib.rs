//! Core types for chess.
//!
//! This crate provides the value types shared by the position, search and
//! driver crates:
//! - [`Piece`], [`PieceKind`] and [`Color`] for piece representation
//! - [`Square`] for board coordinates
//! - [`Move`] and [`MoveFlag`] for move descriptions
//! - FEN parsing and serialization

mod color;
mod fen;
mod mov;
mod piece;
mod square;

pub use color::Color;
pub use fen::{FenError, FenParser};
pub use mov::{Move, MoveFlag};
pub use piece::{Piece, PieceKind};
pub use square::Square;
