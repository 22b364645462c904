//! FEN (Forsyth-Edwards Notation) parsing and serialization.

use crate::{Color, Piece, Square};
use thiserror::Error;

/// Errors that can occur when parsing FEN strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FenError {
    #[error("invalid FEN: expected 6 parts, got {0}")]
    InvalidPartCount(usize),

    #[error("invalid piece placement: {0}")]
    InvalidPiecePlacement(String),

    #[error("invalid active color: expected 'w' or 'b', got '{0}'")]
    InvalidActiveColor(String),

    #[error("invalid castling rights: {0}")]
    InvalidCastlingRights(String),

    #[error("invalid en passant square: {0}")]
    InvalidEnPassantSquare(String),

    #[error("invalid halfmove clock: {0}")]
    InvalidHalfmoveClock(String),

    #[error("invalid fullmove number: {0}")]
    InvalidFullmoveNumber(String),
}

/// The six fields of a FEN record, decoded but not yet checked for chess
/// legality (king counts and the like are the position's concern).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenParser {
    /// Board contents indexed by square (a1 = 0).
    pub board: [Option<Piece>; 64],
    pub side_to_move: Color,
    /// Castling availability in `K`, `Q`, `k`, `q` order.
    pub castling: [bool; 4],
    pub en_passant: Option<Square>,
    pub halfmove_clock: u32,
    pub fullmove_number: u32,
}

impl FenParser {
    /// The standard starting position FEN.
    pub const STARTPOS: &'static str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

    const CASTLING_CHARS: [char; 4] = ['K', 'Q', 'k', 'q'];

    /// Parses a FEN string.
    pub fn parse(fen: &str) -> Result<Self, FenError> {
        let parts: Vec<&str> = fen.split_whitespace().collect();
        if parts.len() != 6 {
            return Err(FenError::InvalidPartCount(parts.len()));
        }

        let board = Self::parse_placement(parts[0])?;

        let side_to_move = match parts[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(FenError::InvalidActiveColor(other.to_string())),
        };

        let castling = Self::parse_castling(parts[2])?;
        let en_passant = Self::parse_en_passant(parts[3])?;

        let halfmove_clock = parts[4]
            .parse::<u32>()
            .map_err(|_| FenError::InvalidHalfmoveClock(parts[4].to_string()))?;

        let fullmove_number = parts[5]
            .parse::<u32>()
            .ok()
            .filter(|n| *n >= 1)
            .ok_or_else(|| FenError::InvalidFullmoveNumber(parts[5].to_string()))?;

        Ok(FenParser {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
        })
    }

    fn parse_placement(placement: &str) -> Result<[Option<Piece>; 64], FenError> {
        let ranks: Vec<&str> = placement.split('/').collect();
        if ranks.len() != 8 {
            return Err(FenError::InvalidPiecePlacement(format!(
                "expected 8 ranks, got {}",
                ranks.len()
            )));
        }

        let mut board = [None; 64];
        // FEN lists rank 8 first.
        for (i, rank_text) in ranks.iter().enumerate() {
            let rank = 7 - i as u8;
            let mut file = 0u32;
            for c in rank_text.chars() {
                if let Some(skip) = c.to_digit(10).filter(|d| (1..=8).contains(d)) {
                    file += skip;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    if let Some(sq) = Square::new(file as u8, rank) {
                        board[sq.index() as usize] = Some(piece);
                    }
                    file += 1;
                } else {
                    return Err(FenError::InvalidPiecePlacement(format!(
                        "invalid character '{}' in rank {}",
                        c,
                        rank + 1
                    )));
                }
                if file > 8 {
                    break;
                }
            }
            if file != 8 {
                return Err(FenError::InvalidPiecePlacement(format!(
                    "rank {} has {} squares, expected 8",
                    rank + 1,
                    file
                )));
            }
        }
        Ok(board)
    }

    fn parse_castling(text: &str) -> Result<[bool; 4], FenError> {
        let mut castling = [false; 4];
        if text == "-" {
            return Ok(castling);
        }
        for c in text.chars() {
            match Self::CASTLING_CHARS.iter().position(|&k| k == c) {
                Some(i) if !castling[i] => castling[i] = true,
                Some(_) => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "duplicate character '{}'",
                        c
                    )))
                }
                None => {
                    return Err(FenError::InvalidCastlingRights(format!(
                        "invalid character '{}'",
                        c
                    )))
                }
            }
        }
        Ok(castling)
    }

    fn parse_en_passant(text: &str) -> Result<Option<Square>, FenError> {
        if text == "-" {
            return Ok(None);
        }
        match Square::from_algebraic(text) {
            Some(sq) if sq.rank() == 2 || sq.rank() == 5 => Ok(Some(sq)),
            _ => Err(FenError::InvalidEnPassantSquare(text.to_string())),
        }
    }

    /// Serializes the record back to FEN text.
    pub fn to_fen(&self) -> String {
        let mut fen = String::new();

        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                let piece = Square::new(file, rank).and_then(|sq| self.board[sq.index() as usize]);
                match piece {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push_str(&empty.to_string());
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push_str(&empty.to_string());
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(self.side_to_move.to_fen_char());

        fen.push(' ');
        if self.castling.iter().any(|&c| c) {
            for (allowed, c) in self.castling.iter().zip(Self::CASTLING_CHARS) {
                if *allowed {
                    fen.push(c);
                }
            }
        } else {
            fen.push('-');
        }

        fen.push(' ');
        match self.en_passant {
            Some(sq) => fen.push_str(&sq.to_algebraic()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }
}

impl Default for FenParser {
    fn default() -> Self {
        Self::parse(Self::STARTPOS).expect("STARTPOS is valid")
    }
}
