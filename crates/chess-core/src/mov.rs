//! Move representation.

use crate::{PieceKind, Square};
use std::fmt;

/// What kind of move this is, beyond its source and destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveFlag {
    /// Quiet move (including quiet promotions).
    Normal = 0,
    /// Captures the piece standing on the destination square.
    Capture = 1,
    /// Pawn double push from its starting rank.
    DoublePush = 2,
    /// Kingside castling (O-O).
    CastleKingside = 3,
    /// Queenside castling (O-O-O).
    CastleQueenside = 4,
    /// En passant capture.
    EnPassant = 5,
}

impl MoveFlag {
    /// Returns true if the move removes an enemy piece.
    #[inline]
    pub const fn is_capture(self) -> bool {
        matches!(self, MoveFlag::Capture | MoveFlag::EnPassant)
    }

    #[inline]
    pub const fn is_castling(self) -> bool {
        matches!(self, MoveFlag::CastleKingside | MoveFlag::CastleQueenside)
    }
}

/// A chess move.
///
/// A move is a pure description; applying it to a position is the job of the
/// move generator, which only ever produces moves with consistent flags.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub flag: MoveFlag,
    pub promotion: Option<PieceKind>,
}

impl Move {
    #[inline]
    pub const fn new(from: Square, to: Square, flag: MoveFlag) -> Self {
        Move {
            from,
            to,
            flag,
            promotion: None,
        }
    }

    /// Creates a quiet move.
    #[inline]
    pub const fn normal(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Normal)
    }

    /// Creates a capture of the piece on `to`.
    #[inline]
    pub const fn capture(from: Square, to: Square) -> Self {
        Self::new(from, to, MoveFlag::Capture)
    }

    /// Creates a promotion; `flag` is `Normal` or `Capture`.
    #[inline]
    pub const fn promotion(from: Square, to: Square, flag: MoveFlag, kind: PieceKind) -> Self {
        Move {
            from,
            to,
            flag,
            promotion: Some(kind),
        }
    }

    #[inline]
    pub const fn is_capture(self) -> bool {
        self.flag.is_capture()
    }

    #[inline]
    pub const fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Returns the UCI notation for this move (e.g., "e2e4", "e7e8q").
    pub fn to_uci(self) -> String {
        self.to_string()
    }

    /// Parses UCI text into squares and promotion only. The flag is left
    /// `Normal`; the move generator knows the real one.
    pub fn from_uci(text: &str) -> Option<Self> {
        let text = text.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return None;
        }
        let from = Square::from_algebraic(&text[0..2])?;
        let to = Square::from_algebraic(&text[2..4])?;
        match text[4..].chars().next() {
            None => Some(Move::normal(from, to)),
            Some(c) => {
                let kind = PieceKind::from_char(c)?;
                PieceKind::PROMOTIONS
                    .contains(&kind)
                    .then(|| Move::promotion(from, to, MoveFlag::Normal, kind))
            }
        }
    }

    /// True if both moves name the same squares and promotion.
    #[inline]
    pub fn same_squares(self, other: Move) -> bool {
        self.from == other.from && self.to == other.to && self.promotion == other.promotion
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({}, {:?})", self, self.flag)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}
