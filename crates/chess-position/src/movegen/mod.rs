//! Move generation and move application.
//!
//! Moves are generated pseudo-legally, piece kind by piece kind, and then
//! filtered by playing each one on a scratch board and testing whether the
//! mover's king is attacked. Generation order is fixed, so the same position
//! always yields the same sequence.

mod attacks;
pub mod perft;

use crate::{Bitboard, Position, PositionError};
use chess_core::{Color, Move, MoveFlag, Piece, PieceKind, Square};

pub use attacks::{
    bishop_attacks, king_attacks, knight_attacks, pawn_attacks, piece_attacks, queen_attacks,
    rook_attacks,
};

/// A list of moves with a fixed maximum capacity.
///
/// Chess positions have at most 218 legal moves, so a fixed-size array
/// avoids heap allocations during move generation.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; Self::MAX_MOVES],
    len: usize,
}

impl MoveList {
    pub const MAX_MOVES: usize = 256;

    const FILLER: Move = Move::normal(Square::A1, Square::A1);

    #[inline]
    pub const fn new() -> Self {
        MoveList {
            moves: [Self::FILLER; Self::MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, m: Move) {
        debug_assert!(self.len < Self::MAX_MOVES);
        self.moves[self.len] = m;
        self.len += 1;
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    /// Mutable view, used by the search to reorder moves in place.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [Move] {
        &mut self.moves[..self.len]
    }

    #[inline]
    pub fn contains(&self, m: &Move) -> bool {
        self.as_slice().contains(m)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    /// Retains only moves for which the predicate returns true, keeping order.
    pub fn retain<F>(&mut self, mut f: F)
    where
        F: FnMut(&Move) -> bool,
    {
        let mut write = 0;
        for read in 0..self.len {
            if f(&self.moves[read]) {
                self.moves[write] = self.moves[read];
                write += 1;
            }
        }
        self.len = write;
    }
}

impl Default for MoveList {
    fn default() -> Self {
        Self::new()
    }
}

impl std::ops::Index<usize> for MoveList {
    type Output = Move;

    #[inline]
    fn index(&self, index: usize) -> &Self::Output {
        &self.as_slice()[index]
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl std::fmt::Debug for MoveList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.as_slice()).finish()
    }
}

/// State that a move destroys and [`unmake_move`] needs back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveUndo {
    pub captured: Option<Piece>,
    pub castling: crate::CastlingRights,
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

/// Generates every move obeying piece movement rules for the side to move,
/// without checking whether the mover's king is left attacked.
///
/// Castling is the exception: it is only produced when the king does not
/// start on, pass through or land on an attacked square.
pub fn pseudo_legal_moves(position: &Position) -> MoveList {
    let mut moves = MoveList::new();

    generate_pawn_moves(position, &mut moves);
    for kind in [
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ] {
        generate_piece_moves(position, kind, &mut moves);
    }
    generate_castling_moves(position, &mut moves);

    moves
}

/// Generates all legal moves for the side to move.
pub fn legal_moves(position: &Position) -> MoveList {
    let mut moves = pseudo_legal_moves(position);
    let us = position.side_to_move;
    let mut scratch = position.clone();

    moves.retain(|m| {
        let undo = make_move_in_place(&mut scratch, *m);
        let safe = !scratch.is_in_check(us);
        unmake_move(&mut scratch, *m, &undo);
        safe
    });

    moves
}

/// Returns true if the side to move has at least one legal move.
pub fn has_legal_move(position: &Position) -> bool {
    let us = position.side_to_move;
    let mut scratch = position.clone();
    pseudo_legal_moves(position).iter().any(|m| {
        let undo = make_move_in_place(&mut scratch, *m);
        let safe = !scratch.is_in_check(us);
        unmake_move(&mut scratch, *m, &undo);
        safe
    })
}

/// Finds the legal move whose UCI text is `uci` (e.g. `e2e4`, `e7e8n`).
pub fn find_legal_move(position: &Position, uci: &str) -> Option<Move> {
    let uci = uci.trim().to_ascii_lowercase();
    legal_moves(position)
        .iter()
        .copied()
        .find(|m| m.to_uci() == uci)
}

/// Resolves UCI text against the legal moves of `position`.
///
/// Text that names no square pair is `InvalidMoveText`; a well-formed move
/// that is not legal here is `IllegalMove`.
pub fn parse_legal_move(position: &Position, uci: &str) -> Result<Move, PositionError> {
    let wanted =
        Move::from_uci(uci).ok_or_else(|| PositionError::InvalidMoveText(uci.to_string()))?;
    legal_moves(position)
        .iter()
        .copied()
        .find(|m| m.same_squares(wanted))
        .ok_or(PositionError::IllegalMove(wanted))
}

fn generate_pawn_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let theirs = position.occupied_by(them);
    let occupied = position.occupied();
    let dir = us.pawn_direction();
    let (start_rank, promo_rank) = match us {
        Color::White => (1, 7),
        Color::Black => (6, 0),
    };

    for from in position.pieces_of(PieceKind::Pawn, us) {
        if let Some(to) = from.offset(0, dir).filter(|to| !occupied.contains(*to)) {
            if to.rank() == promo_rank {
                push_promotions(moves, from, to, MoveFlag::Normal);
            } else {
                moves.push(Move::normal(from, to));
                if from.rank() == start_rank {
                    if let Some(double) = to.offset(0, dir).filter(|sq| !occupied.contains(*sq)) {
                        moves.push(Move::new(from, double, MoveFlag::DoublePush));
                    }
                }
            }
        }

        for to in pawn_attacks(from, us) & theirs {
            if to.rank() == promo_rank {
                push_promotions(moves, from, to, MoveFlag::Capture);
            } else {
                moves.push(Move::capture(from, to));
            }
        }

        if let Some(ep) = position.en_passant {
            let victim = ep.offset(0, -dir);
            let capturable = !occupied.contains(ep)
                && victim.and_then(|sq| position.piece_at(sq))
                    == Some(Piece::new(PieceKind::Pawn, them));
            if capturable && pawn_attacks(from, us).contains(ep) {
                moves.push(Move::new(from, ep, MoveFlag::EnPassant));
            }
        }
    }
}

fn push_promotions(moves: &mut MoveList, from: Square, to: Square, flag: MoveFlag) {
    for kind in PieceKind::PROMOTIONS {
        moves.push(Move::promotion(from, to, flag, kind));
    }
}

/// Knight, bishop, rook, queen and plain king moves.
fn generate_piece_moves(position: &Position, kind: PieceKind, moves: &mut MoveList) {
    let us = position.side_to_move;
    let ours = position.occupied_by(us);
    let theirs = position.occupied_by(us.opposite());
    let occupied = position.occupied();

    for from in position.pieces_of(kind, us) {
        for to in piece_attacks(kind, us, from, occupied) & !ours {
            if theirs.contains(to) {
                moves.push(Move::capture(from, to));
            } else {
                moves.push(Move::normal(from, to));
            }
        }
    }
}

fn generate_castling_moves(position: &Position, moves: &mut MoveList) {
    let us = position.side_to_move;
    let them = us.opposite();
    let rights = position.castling;
    if !rights.can_castle_kingside(us) && !rights.can_castle_queenside(us) {
        return;
    }

    let rank = us.back_rank();
    let king_start = Square::E1.with_rank(rank);
    if position.piece_at(king_start) != Some(Piece::new(PieceKind::King, us))
        || is_square_attacked(position, king_start, them)
    {
        return;
    }

    let occupied = position.occupied();
    let rook = Some(Piece::new(PieceKind::Rook, us));
    let empty = |files: &[Square]| files.iter().all(|sq| !occupied.contains(*sq));
    let safe = |files: &[Square]| {
        files
            .iter()
            .all(|sq| !is_square_attacked(position, *sq, them))
    };

    if rights.can_castle_kingside(us) && position.piece_at(Square::H1.with_rank(rank)) == rook {
        let path = [Square::F1.with_rank(rank), Square::G1.with_rank(rank)];
        if empty(&path[..]) && safe(&path[..]) {
            moves.push(Move::new(king_start, path[1], MoveFlag::CastleKingside));
        }
    }

    if rights.can_castle_queenside(us) && position.piece_at(Square::A1.with_rank(rank)) == rook {
        let between = [
            Square::B1.with_rank(rank),
            Square::C1.with_rank(rank),
            Square::D1.with_rank(rank),
        ];
        let king_path = [between[1], between[2]];
        if empty(&between[..]) && safe(&king_path[..]) {
            moves.push(Move::new(king_start, between[1], MoveFlag::CastleQueenside));
        }
    }
}

/// Returns true if any piece of `by_color` attacks `sq`.
///
/// Works from attack patterns alone, never from legal moves, so legality
/// checking can call it without recursing.
pub fn is_square_attacked(position: &Position, sq: Square, by_color: Color) -> bool {
    let occupied = position.occupied();
    let attackers = |kind| position.pieces_of(kind, by_color);

    (pawn_attacks(sq, by_color.opposite()) & attackers(PieceKind::Pawn)).is_not_empty()
        || (knight_attacks(sq) & attackers(PieceKind::Knight)).is_not_empty()
        || (king_attacks(sq) & attackers(PieceKind::King)).is_not_empty()
        || (bishop_attacks(sq, occupied) & (attackers(PieceKind::Bishop) | attackers(PieceKind::Queen)))
            .is_not_empty()
        || (rook_attacks(sq, occupied) & (attackers(PieceKind::Rook) | attackers(PieceKind::Queen)))
            .is_not_empty()
}

/// Union of every square attacked by `color`.
pub fn attacked_squares(position: &Position, color: Color) -> Bitboard {
    let occupied = position.occupied();
    let mut attacked = Bitboard::EMPTY;
    for kind in PieceKind::ALL {
        for sq in position.pieces_of(kind, color) {
            attacked |= piece_attacks(kind, color, sq, occupied);
        }
    }
    attacked
}

/// Applies a pseudo-legal move to `position` and returns what
/// [`unmake_move`] needs to restore it exactly.
///
/// # Panics
///
/// Panics if `m.from` is empty, which no generated move can cause.
pub fn make_move_in_place(position: &mut Position, m: Move) -> MoveUndo {
    let undo = MoveUndo {
        captured: None,
        castling: position.castling,
        en_passant: position.en_passant,
        halfmove_clock: position.halfmove_clock,
        fullmove_number: position.fullmove_number,
    };
    let us = position.side_to_move;
    let dir = us.pawn_direction();

    let moving = position
        .remove_piece(m.from)
        .expect("move origin holds a piece");

    let captured = if m.flag == MoveFlag::EnPassant {
        m.to.offset(0, -dir).and_then(|sq| position.remove_piece(sq))
    } else {
        position.remove_piece(m.to)
    };

    let placed = match m.promotion {
        Some(kind) => Piece::new(kind, us),
        None => moving,
    };
    position.put_piece(m.to, placed);

    if let Some((rook_from, rook_to)) = castling_rook_squares(m.flag, us) {
        if let Some(rook) = position.remove_piece(rook_from) {
            position.put_piece(rook_to, rook);
        }
    }

    if moving.kind == PieceKind::King {
        position.castling.remove_color(us);
    }
    position.castling.remove_for_square(m.from);
    position.castling.remove_for_square(m.to);

    position.en_passant = if m.flag == MoveFlag::DoublePush {
        m.from.offset(0, dir)
    } else {
        None
    };

    if moving.kind == PieceKind::Pawn || captured.is_some() {
        position.halfmove_clock = 0;
    } else {
        position.halfmove_clock += 1;
    }
    if us == Color::Black {
        position.fullmove_number += 1;
    }
    position.side_to_move = us.opposite();

    debug_assert!(position.has_both_kings(), "{} removed a king", m);

    MoveUndo { captured, ..undo }
}

/// Reverses [`make_move_in_place`]; `m` and `undo` must be the pair it was
/// given and returned.
pub fn unmake_move(position: &mut Position, m: Move, undo: &MoveUndo) {
    let us = position.side_to_move.opposite();
    position.side_to_move = us;

    if let Some(placed) = position.remove_piece(m.to) {
        let original = if m.promotion.is_some() {
            Piece::new(PieceKind::Pawn, us)
        } else {
            placed
        };
        position.put_piece(m.from, original);
    }

    if let Some((rook_from, rook_to)) = castling_rook_squares(m.flag, us) {
        if let Some(rook) = position.remove_piece(rook_to) {
            position.put_piece(rook_from, rook);
        }
    }

    if let Some(captured) = undo.captured {
        let square = if m.flag == MoveFlag::EnPassant {
            m.to.offset(0, -us.pawn_direction())
        } else {
            Some(m.to)
        };
        if let Some(square) = square {
            position.put_piece(square, captured);
        }
    }

    position.castling = undo.castling;
    position.en_passant = undo.en_passant;
    position.halfmove_clock = undo.halfmove_clock;
    position.fullmove_number = undo.fullmove_number;
}

fn castling_rook_squares(flag: MoveFlag, color: Color) -> Option<(Square, Square)> {
    let rank = color.back_rank();
    match flag {
        MoveFlag::CastleKingside => Some((Square::H1.with_rank(rank), Square::F1.with_rank(rank))),
        MoveFlag::CastleQueenside => Some((Square::A1.with_rank(rank), Square::D1.with_rank(rank))),
        _ => None,
    }
}

/// Returns the position after a pseudo-legal move, leaving `position` as is.
pub fn make_move(position: &Position, m: Move) -> Position {
    let mut next = position.clone();
    make_move_in_place(&mut next, m);
    next
}

/// Applies `m` if it is legal in `position`.
pub fn apply_move(position: &Position, m: Move) -> Result<Position, PositionError> {
    if legal_moves(position).contains(&m) {
        Ok(make_move(position, m))
    } else {
        Err(PositionError::IllegalMove(m))
    }
}
