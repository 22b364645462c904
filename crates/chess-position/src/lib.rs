//! Board state and rules of chess.
//!
//! - [`Position`]: bitboard position with validated construction
//! - [`movegen`]: pseudo-legal and legal move generation, move application
//!   and attack detection
//! - [`classify`]: check, checkmate and stalemate detection
//! - Zobrist hashing for transposition lookups

mod bitboard;
mod error;
pub mod movegen;
mod position;
mod state;
pub mod zobrist;

pub use bitboard::Bitboard;
pub use error::PositionError;
pub use movegen::{
    apply_move, attacked_squares, find_legal_move, is_square_attacked, legal_moves, make_move,
    make_move_in_place, parse_legal_move, pseudo_legal_moves, unmake_move, MoveList, MoveUndo,
};
pub use position::{CastlingRights, Position};
pub use state::{classify, GameState};
