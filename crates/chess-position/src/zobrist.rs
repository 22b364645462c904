//! Zobrist hashing for position identification.
//!
//! The hash XORs one key per (piece, square), a side-to-move key, one key per
//! castling right and one per en-passant file. Clocks are not hashed.

use chess_core::{Color, PieceKind, Square};

use crate::position::CastlingRights;
use crate::Position;

/// Zobrist hash keys, generated at compile time from a fixed seed.
pub struct ZobristKeys {
    /// Keys for pieces: [kind][color][square]
    pub pieces: [[[u64; 64]; 2]; 6],
    pub black_to_move: u64,
    /// One key per castling flag bit.
    pub castling: [u64; 4],
    pub en_passant: [u64; 8],
}

impl ZobristKeys {
    const SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    const fn xorshift(mut x: u64) -> u64 {
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        x
    }

    pub const fn new() -> Self {
        let mut state = Self::SEED;
        let mut pieces = [[[0u64; 64]; 2]; 6];
        let mut castling = [0u64; 4];
        let mut en_passant = [0u64; 8];

        let mut kind = 0;
        while kind < 6 {
            let mut color = 0;
            while color < 2 {
                let mut sq = 0;
                while sq < 64 {
                    state = Self::xorshift(state);
                    pieces[kind][color][sq] = state;
                    sq += 1;
                }
                color += 1;
            }
            kind += 1;
        }

        state = Self::xorshift(state);
        let black_to_move = state;

        let mut i = 0;
        while i < 4 {
            state = Self::xorshift(state);
            castling[i] = state;
            i += 1;
        }

        let mut file = 0;
        while file < 8 {
            state = Self::xorshift(state);
            en_passant[file] = state;
            file += 1;
        }

        ZobristKeys {
            pieces,
            black_to_move,
            castling,
            en_passant,
        }
    }

    #[inline]
    pub const fn piece(&self, kind: PieceKind, color: Color, sq: Square) -> u64 {
        self.pieces[kind.index()][color.index()][sq.index() as usize]
    }

    /// XOR of the keys for every right present in `rights`.
    pub const fn castling_rights(&self, rights: CastlingRights) -> u64 {
        let raw = rights.raw();
        let mut hash = 0;
        let mut bit = 0;
        while bit < 4 {
            if raw & (1 << bit) != 0 {
                hash ^= self.castling[bit];
            }
            bit += 1;
        }
        hash
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

pub static ZOBRIST: ZobristKeys = ZobristKeys::new();

/// Computes the hash of a position from scratch.
pub fn hash(position: &Position) -> u64 {
    let mut hash = 0u64;
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            for sq in position.pieces_of(kind, color) {
                hash ^= ZOBRIST.piece(kind, color, sq);
            }
        }
    }
    if position.side_to_move() == Color::Black {
        hash ^= ZOBRIST.black_to_move;
    }
    hash ^= ZOBRIST.castling_rights(position.castling());
    if let Some(ep) = position.en_passant() {
        hash ^= ZOBRIST.en_passant[ep.file() as usize];
    }
    hash
}
