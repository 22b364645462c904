//! Chess position representation.

use chess_core::{Color, FenParser, Piece, PieceKind, Square};

use crate::movegen::is_square_attacked;
use crate::{zobrist, Bitboard, PositionError};

/// Castling rights flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: CastlingRights = CastlingRights(0);
    pub const WHITE_KINGSIDE: u8 = 0b0001;
    pub const WHITE_QUEENSIDE: u8 = 0b0010;
    pub const BLACK_KINGSIDE: u8 = 0b0100;
    pub const BLACK_QUEENSIDE: u8 = 0b1000;
    pub const ALL: CastlingRights = CastlingRights(0b1111);

    /// Builds rights from `WHITE_KINGSIDE`-style flags; unknown bits are ignored.
    #[inline]
    pub const fn new(flags: u8) -> Self {
        CastlingRights(flags & 0b1111)
    }

    const fn kingside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_KINGSIDE,
            Color::Black => Self::BLACK_KINGSIDE,
        }
    }

    const fn queenside_flag(color: Color) -> u8 {
        match color {
            Color::White => Self::WHITE_QUEENSIDE,
            Color::Black => Self::BLACK_QUEENSIDE,
        }
    }

    /// Returns true if `color` may still castle kingside.
    #[inline]
    pub const fn can_castle_kingside(self, color: Color) -> bool {
        self.0 & Self::kingside_flag(color) != 0
    }

    /// Returns true if `color` may still castle queenside.
    #[inline]
    pub const fn can_castle_queenside(self, color: Color) -> bool {
        self.0 & Self::queenside_flag(color) != 0
    }

    /// Removes both rights of a color.
    #[inline]
    pub fn remove_color(&mut self, color: Color) {
        self.0 &= !(Self::kingside_flag(color) | Self::queenside_flag(color));
    }

    /// Removes the kingside right of a color.
    #[inline]
    pub fn remove_kingside(&mut self, color: Color) {
        self.0 &= !Self::kingside_flag(color);
    }

    /// Removes the queenside right of a color.
    #[inline]
    pub fn remove_queenside(&mut self, color: Color) {
        self.0 &= !Self::queenside_flag(color);
    }

    /// Removes the right tied to a rook's home corner, if `sq` is one.
    /// Called for both the origin and destination of every move.
    pub fn remove_for_square(&mut self, sq: Square) {
        match sq {
            Square::H1 => self.remove_kingside(Color::White),
            Square::A1 => self.remove_queenside(Color::White),
            Square::H8 => self.remove_kingside(Color::Black),
            Square::A8 => self.remove_queenside(Color::Black),
            _ => {}
        }
    }

    /// Returns the raw flag bits.
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Rights in FEN `KQkq` order.
    pub const fn to_array(self) -> [bool; 4] {
        [
            self.0 & Self::WHITE_KINGSIDE != 0,
            self.0 & Self::WHITE_QUEENSIDE != 0,
            self.0 & Self::BLACK_KINGSIDE != 0,
            self.0 & Self::BLACK_QUEENSIDE != 0,
        ]
    }

    /// Inverse of [`Self::to_array`].
    pub const fn from_array(rights: [bool; 4]) -> Self {
        let mut flags = 0;
        let mut i = 0;
        while i < 4 {
            if rights[i] {
                flags |= 1 << i;
            }
            i += 1;
        }
        CastlingRights(flags)
    }
}

/// Complete chess position state.
///
/// Positions built through [`Position::from_fen`] hold exactly one king per
/// color and never leave the side that just moved in check; move application
/// preserves both properties.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Position {
    /// Bitboards per piece kind, indexed by [`PieceKind::index`].
    pub(crate) pieces: [Bitboard; 6],
    /// Bitboards per color.
    pub(crate) colors: [Bitboard; 2],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
}

impl Position {
    fn empty() -> Self {
        Position {
            pieces: [Bitboard::EMPTY; 6],
            colors: [Bitboard::EMPTY; 2],
            side_to_move: Color::White,
            castling: CastlingRights::NONE,
            en_passant: None,
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    /// The standard starting position.
    pub fn startpos() -> Self {
        Self::from_record(&FenParser::default())
    }

    /// Parses and validates a FEN string.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let parsed = FenParser::parse(fen)?;
        Self::from_parsed(&parsed)
    }

    /// Builds a position from a decoded FEN record, rejecting anything that
    /// breaks the king invariants.
    ///
    /// Castling rights whose king or rook is off its home square are dropped.
    pub fn from_parsed(parsed: &FenParser) -> Result<Self, PositionError> {
        let position = Self::from_record(parsed);

        for color in Color::ALL {
            let kings = position.pieces_of(PieceKind::King, color).count();
            if kings != 1 {
                return Err(PositionError::InvalidPosition { color, kings });
            }
        }

        let waiting = position.side_to_move.opposite();
        if position.is_in_check(waiting) {
            return Err(PositionError::OpponentInCheck(waiting));
        }

        Ok(position)
    }

    fn from_record(parsed: &FenParser) -> Self {
        let mut position = Position::empty();
        for sq in Square::all() {
            if let Some(piece) = parsed.board[sq.index() as usize] {
                position.put_piece(sq, piece);
            }
        }
        position.side_to_move = parsed.side_to_move;
        position.en_passant = parsed
            .en_passant
            .filter(|&target| position.is_en_passant_target(target));
        position.halfmove_clock = parsed.halfmove_clock;
        position.fullmove_number = parsed.fullmove_number;

        let mut castling = CastlingRights::from_array(parsed.castling);
        for color in Color::ALL {
            let rank = color.back_rank();
            let king_home = Square::E1.with_rank(rank);
            if position.piece_at(king_home) != Some(Piece::new(PieceKind::King, color)) {
                castling.remove_color(color);
            }
            let rook = Some(Piece::new(PieceKind::Rook, color));
            if position.piece_at(Square::H1.with_rank(rank)) != rook {
                castling.remove_kingside(color);
            }
            if position.piece_at(Square::A1.with_rank(rank)) != rook {
                castling.remove_queenside(color);
            }
        }
        position.castling = castling;
        position
    }

    /// True if `target` could follow a double push by the side that just
    /// moved: it lies on that side's skipped rank, is empty, and their pawn
    /// stands just past it.
    fn is_en_passant_target(&self, target: Square) -> bool {
        let us = self.side_to_move;
        let them = us.opposite();
        let skipped_rank = match us {
            Color::White => 5,
            Color::Black => 2,
        };
        let pawn = Some(Piece::new(PieceKind::Pawn, them));
        target.rank() == skipped_rank
            && self.piece_at(target).is_none()
            && target
                .offset(0, -us.pawn_direction())
                .is_some_and(|pushed| self.piece_at(pushed) == pawn)
    }

    /// Serializes the position to FEN.
    pub fn to_fen(&self) -> String {
        let mut board = [None; 64];
        for sq in Square::all() {
            board[sq.index() as usize] = self.piece_at(sq);
        }
        FenParser {
            board,
            side_to_move: self.side_to_move,
            castling: self.castling.to_array(),
            en_passant: self.en_passant,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
        }
        .to_fen()
    }

    /// Returns the side to move.
    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the current castling rights.
    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Returns the square a pawn may capture onto en passant, if any.
    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    /// Returns the halfmove clock (plies since the last capture or pawn move).
    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Returns the fullmove number, starting at 1.
    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Returns the piece on a square, if any.
    pub fn piece_at(&self, sq: Square) -> Option<Piece> {
        let color = if self.colors[Color::White.index()].contains(sq) {
            Color::White
        } else if self.colors[Color::Black.index()].contains(sq) {
            Color::Black
        } else {
            return None;
        };
        PieceKind::ALL
            .into_iter()
            .find(|kind| self.pieces[kind.index()].contains(sq))
            .map(|kind| Piece::new(kind, color))
    }

    /// Squares holding pieces of the given kind and color.
    #[inline]
    pub fn pieces_of(&self, kind: PieceKind, color: Color) -> Bitboard {
        self.pieces[kind.index()] & self.colors[color.index()]
    }

    /// Squares holding any piece of the given color.
    #[inline]
    pub fn occupied_by(&self, color: Color) -> Bitboard {
        self.colors[color.index()]
    }

    /// Squares holding any piece.
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.colors[0] | self.colors[1]
    }

    /// Square of the given color's king.
    ///
    /// `None` never happens for a validated position.
    #[inline]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of(PieceKind::King, color).first()
    }

    /// Returns true if the king of `color` is attacked.
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| is_square_attacked(self, king, color.opposite()))
    }

    /// 64-bit Zobrist hash of the position (clocks excluded).
    pub fn zobrist_hash(&self) -> u64 {
        zobrist::hash(self)
    }

    /// Places a piece on an empty square.
    #[inline]
    pub(crate) fn put_piece(&mut self, sq: Square, piece: Piece) {
        self.pieces[piece.kind.index()].set(sq);
        self.colors[piece.color.index()].set(sq);
    }

    /// Removes and returns whatever stands on `sq`.
    #[inline]
    pub(crate) fn remove_piece(&mut self, sq: Square) -> Option<Piece> {
        let piece = self.piece_at(sq)?;
        self.pieces[piece.kind.index()].clear(sq);
        self.colors[piece.color.index()].clear(sq);
        Some(piece)
    }

    /// Checks the one-king-per-color invariant.
    pub(crate) fn has_both_kings(&self) -> bool {
        Color::ALL
            .iter()
            .all(|&color| self.pieces_of(PieceKind::King, color).count() == 1)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::startpos()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startpos_layout() {
        let pos = Position::startpos();
        assert_eq!(pos.side_to_move(), Color::White);
        assert_eq!(pos.castling(), CastlingRights::ALL);
        assert_eq!(pos.occupied().count(), 32);
        assert_eq!(pos.pieces_of(PieceKind::Pawn, Color::Black).count(), 8);
        assert_eq!(pos.king_square(Color::White), Some(Square::E1));
        assert_eq!(pos.king_square(Color::Black), Some(Square::E8));
        assert_eq!(pos.to_fen(), FenParser::STARTPOS);
    }

    #[test]
    fn piece_at_reads_grid() {
        let pos = Position::startpos();
        assert_eq!(
            pos.piece_at(Square::D8),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
        assert_eq!(pos.piece_at(Square::from_algebraic("e4").unwrap()), None);
    }

    #[test]
    fn fen_round_trip() {
        let fen = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
        assert_eq!(Position::from_fen(fen).unwrap().to_fen(), fen);
    }

    #[test]
    fn missing_king_is_rejected() {
        assert_eq!(
            Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::InvalidPosition {
                color: Color::Black,
                kings: 0
            })
        );
    }

    #[test]
    fn two_kings_are_rejected() {
        assert_eq!(
            Position::from_fen("4k3/8/8/8/8/8/8/K3K3 w - - 0 1"),
            Err(PositionError::InvalidPosition {
                color: Color::White,
                kings: 2
            })
        );
    }

    #[test]
    fn waiting_side_in_check_is_rejected() {
        assert_eq!(
            Position::from_fen("4k3/4R3/8/8/8/8/8/4K3 w - - 0 1"),
            Err(PositionError::OpponentInCheck(Color::Black))
        );
    }

    #[test]
    fn bad_fen_is_reported() {
        assert!(matches!(
            Position::from_fen("not a fen"),
            Err(PositionError::InvalidFen(_))
        ));
    }

    #[test]
    fn unbacked_castling_rights_are_dropped() {
        let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K2R w KQkq - 0 1").unwrap();
        assert!(pos.castling().can_castle_kingside(Color::White));
        assert!(!pos.castling().can_castle_queenside(Color::White));
        assert!(!pos.castling().can_castle_kingside(Color::Black));
    }

    #[test]
    fn en_passant_target_survives_when_capturable() {
        let pos = Position::from_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 2").unwrap();
        assert_eq!(pos.en_passant(), Square::from_algebraic("d6"));
        let black = Position::from_fen("4k3/8/8/8/4Pp2/8/8/4K3 b - e3 0 1").unwrap();
        assert_eq!(black.en_passant(), Square::from_algebraic("e3"));
    }

    #[test]
    fn impossible_en_passant_target_is_dropped() {
        // e6 lies on White's skipped rank, but Black is to move.
        let wrong_side = Position::from_fen("4k3/3pP3/8/8/8/8/8/4K3 b - e6 0 1").unwrap();
        assert_eq!(wrong_side.en_passant(), None);
        assert!(crate::legal_moves(&wrong_side)
            .iter()
            .all(|m| m.flag != chess_core::MoveFlag::EnPassant));

        // No black pawn behind d6.
        let no_pawn = Position::from_fen("4k3/8/8/4P3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(no_pawn.en_passant(), None);

        // Target square occupied.
        let occupied = Position::from_fen("4k3/8/3n4/3pP3/8/8/8/4K3 w - d6 0 1").unwrap();
        assert_eq!(occupied.en_passant(), None);
    }

    #[test]
    fn castling_rights_flags() {
        let mut rights = CastlingRights::ALL;
        rights.remove_for_square(Square::H8);
        assert!(!rights.can_castle_kingside(Color::Black));
        assert!(rights.can_castle_queenside(Color::Black));
        rights.remove_color(Color::White);
        assert_eq!(rights.to_array(), [false, false, false, true]);
        assert_eq!(CastlingRights::from_array(rights.to_array()), rights);
    }
}
