//! Static evaluation.
//!
//! Scores are in centipawns from white's point of view: positive favors
//! white, negative favors black, at every node of the search.

use chess_core::{Color, PieceKind};
use chess_position::{is_square_attacked, Position};
use serde::{Deserialize, Serialize};

use crate::SearchError;

/// Heuristic switches, fixed for one top-level search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluationConfig {
    /// Reward the side to move for every enemy piece it attacks.
    pub threat: bool,
    /// Reward the side to move for every one of its pieces that is defended.
    pub defense: bool,
    /// Threat and defense add `value / fraction_divisor` per piece.
    pub fraction_divisor: i32,
}

impl EvaluationConfig {
    pub const DEFAULT_FRACTION_DIVISOR: i32 = 10;

    pub fn new(threat: bool, defense: bool) -> Self {
        EvaluationConfig {
            threat,
            defense,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), SearchError> {
        if self.fraction_divisor < 1 {
            return Err(SearchError::InvalidConfiguration(format!(
                "fraction divisor must be at least 1, got {}",
                self.fraction_divisor
            )));
        }
        Ok(())
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        EvaluationConfig {
            threat: false,
            defense: false,
            fraction_divisor: Self::DEFAULT_FRACTION_DIVISOR,
        }
    }
}

/// Material value of a piece kind. The king carries none; losing it is
/// scored as checkmate by the search.
pub const fn piece_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 300,
        PieceKind::Bishop => 300,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 0,
    }
}

/// Signed material balance.
pub fn material(position: &Position) -> i32 {
    let mut score = 0;
    for color in Color::ALL {
        for kind in PieceKind::ALL {
            let count = position.pieces_of(kind, color).count() as i32;
            score += color.sign() * piece_value(kind) * count;
        }
    }
    score
}

/// Evaluates a non-terminal position.
///
/// Threat and defense terms only look at attack patterns, so a piece counts
/// as attacked even when taking it would be illegal.
pub fn evaluate(position: &Position, config: &EvaluationConfig) -> i32 {
    let mut score = material(position);
    let us = position.side_to_move();
    let them = us.opposite();
    let divisor = config.fraction_divisor.max(1);

    if config.threat {
        score += us.sign() * fraction_of_covered(position, them, us, divisor);
    }
    if config.defense {
        score += us.sign() * fraction_of_covered(position, us, us, divisor);
    }

    score
}

/// Sums `value / divisor` over the non-king pieces of `owner` that `by`
/// attacks.
fn fraction_of_covered(position: &Position, owner: Color, by: Color, divisor: i32) -> i32 {
    let mut total = 0;
    for kind in PieceKind::ALL {
        if kind == PieceKind::King {
            continue;
        }
        for sq in position.pieces_of(kind, owner) {
            if is_square_attacked(position, sq, by) {
                total += piece_value(kind) / divisor;
            }
        }
    }
    total
}
