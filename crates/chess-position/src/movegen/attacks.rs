//! Attack patterns for every piece kind.
//!
//! Leapers (knight, king, pawn) use tables built at compile time. Sliders
//! walk their rays until the first occupied square, which is included.

use crate::Bitboard;
use chess_core::{Color, PieceKind, Square};

const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

const KNIGHT_ATTACKS: [Bitboard; 64] = compute_leaper_table(&KNIGHT_DELTAS);
const KING_ATTACKS: [Bitboard; 64] = compute_leaper_table(&KING_DELTAS);

/// Pawn capture patterns, indexed [color][square].
const PAWN_ATTACKS: [[Bitboard; 64]; 2] = [
    compute_leaper_table(&[(-1, 1), (1, 1)]),
    compute_leaper_table(&[(-1, -1), (1, -1)]),
];

#[inline]
pub fn knight_attacks(sq: Square) -> Bitboard {
    KNIGHT_ATTACKS[sq.index() as usize]
}

#[inline]
pub fn king_attacks(sq: Square) -> Bitboard {
    KING_ATTACKS[sq.index() as usize]
}

/// Squares a pawn of `color` on `sq` attacks.
#[inline]
pub fn pawn_attacks(sq: Square, color: Color) -> Bitboard {
    PAWN_ATTACKS[color.index()][sq.index() as usize]
}

pub fn bishop_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &BISHOP_DIRECTIONS)
}

pub fn rook_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    ray_attacks(sq, occupied, &ROOK_DIRECTIONS)
}

pub fn queen_attacks(sq: Square, occupied: Bitboard) -> Bitboard {
    bishop_attacks(sq, occupied) | rook_attacks(sq, occupied)
}

/// Attack pattern of a piece standing on `sq`, whatever occupies the
/// target squares.
pub fn piece_attacks(kind: PieceKind, color: Color, sq: Square, occupied: Bitboard) -> Bitboard {
    match kind {
        PieceKind::Pawn => pawn_attacks(sq, color),
        PieceKind::Knight => knight_attacks(sq),
        PieceKind::Bishop => bishop_attacks(sq, occupied),
        PieceKind::Rook => rook_attacks(sq, occupied),
        PieceKind::Queen => queen_attacks(sq, occupied),
        PieceKind::King => king_attacks(sq),
    }
}

fn ray_attacks(sq: Square, occupied: Bitboard, directions: &[(i8, i8)]) -> Bitboard {
    let mut attacks = Bitboard::EMPTY;
    for &(file_delta, rank_delta) in directions {
        let mut current = sq;
        while let Some(next) = current.offset(file_delta, rank_delta) {
            attacks.set(next);
            if occupied.contains(next) {
                break;
            }
            current = next;
        }
    }
    attacks
}

const fn compute_leaper_table<const N: usize>(deltas: &[(i8, i8); N]) -> [Bitboard; 64] {
    let mut table = [Bitboard::EMPTY; 64];
    let mut index = 0u8;
    while index < 64 {
        if let Some(sq) = Square::from_index(index) {
            let mut bb = Bitboard::EMPTY;
            let mut i = 0;
            while i < N {
                if let Some(target) = sq.offset(deltas[i].0, deltas[i].1) {
                    bb = bb.with(target);
                }
                i += 1;
            }
            table[index as usize] = bb;
        }
        index += 1;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        Square::from_algebraic(s).unwrap()
    }

    #[test]
    fn knight_attacks_center_and_corner() {
        assert_eq!(knight_attacks(sq("e4")).count(), 8);
        let corner = knight_attacks(Square::A1);
        assert_eq!(corner.count(), 2);
        assert!(corner.contains(sq("b3")));
        assert!(corner.contains(sq("c2")));
    }

    #[test]
    fn king_attacks_center_and_edge() {
        assert_eq!(king_attacks(sq("e4")).count(), 8);
        assert_eq!(king_attacks(Square::H8).count(), 3);
        assert_eq!(king_attacks(sq("a4")).count(), 5);
    }

    #[test]
    fn pawn_attacks_by_color() {
        let white = pawn_attacks(sq("e4"), Color::White);
        assert!(white.contains(sq("d5")) && white.contains(sq("f5")));
        let black = pawn_attacks(sq("e4"), Color::Black);
        assert!(black.contains(sq("d3")) && black.contains(sq("f3")));
        assert_eq!(pawn_attacks(sq("a2"), Color::White).count(), 1);
        assert!(pawn_attacks(sq("e8"), Color::White).is_empty());
    }

    #[test]
    fn rook_rays_stop_at_blockers() {
        let occupied = Bitboard::from_square(sq("a4")) | Bitboard::from_square(sq("d1"));
        let attacks = rook_attacks(Square::A1, occupied);
        assert!(attacks.contains(sq("a4")));
        assert!(!attacks.contains(sq("a5")));
        assert!(attacks.contains(sq("d1")));
        assert!(!attacks.contains(sq("e1")));
        assert_eq!(attacks.count(), 6);
    }

    #[test]
    fn bishop_on_empty_board() {
        assert_eq!(bishop_attacks(sq("d4"), Bitboard::EMPTY).count(), 13);
        assert_eq!(queen_attacks(sq("d4"), Bitboard::EMPTY).count(), 27);
    }
}
