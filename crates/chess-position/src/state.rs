//! Game-state classification.

use chess_core::Color;
use std::fmt;

use crate::movegen::has_legal_move;
use crate::Position;

/// Verdict on a position from the point of view of the side to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameState {
    Normal,
    Check,
    Checkmate,
    Stalemate,
}

impl GameState {
    /// Checkmate and stalemate end the game.
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameState::Checkmate | GameState::Stalemate)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            GameState::Normal => "normal",
            GameState::Check => "check",
            GameState::Checkmate => "checkmate",
            GameState::Stalemate => "stalemate",
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifies `position` for its side to move.
pub fn classify(position: &Position) -> GameState {
    let us: Color = position.side_to_move();
    let in_check = position.is_in_check(us);
    let has_moves = has_legal_move(position);

    match (in_check, has_moves) {
        (true, false) => GameState::Checkmate,
        (false, false) => GameState::Stalemate,
        (true, true) => GameState::Check,
        (false, true) => GameState::Normal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movegen::{find_legal_move, make_move};

    fn play(position: &Position, moves: &[&str]) -> Position {
        moves.iter().fold(position.clone(), |pos, text| {
            let m = find_legal_move(&pos, text).unwrap();
            make_move(&pos, m)
        })
    }

    #[test]
    fn start_is_normal() {
        assert_eq!(classify(&Position::startpos()), GameState::Normal);
    }

    #[test]
    fn fools_mate_is_checkmate() {
        let mated = play(&Position::startpos(), &["f2f3", "e7e5", "g2g4", "d8h4"]);
        assert_eq!(mated.side_to_move(), Color::White);
        assert_eq!(classify(&mated), GameState::Checkmate);
        assert!(classify(&mated).is_terminal());
    }

    #[test]
    fn check_with_escape() {
        let pos = play(&Position::startpos(), &["e2e4", "f7f6", "d1h5"]);
        assert_eq!(classify(&pos), GameState::Check);
    }

    #[test]
    fn cornered_king_is_stalemated() {
        let pos = Position::from_fen("8/8/8/8/8/kq6/8/K7 w - - 0 1").unwrap();
        assert_eq!(classify(&pos), GameState::Stalemate);
        assert!(!pos.is_in_check(Color::White));
    }

    #[test]
    fn display_is_lowercase() {
        assert_eq!(GameState::Checkmate.to_string(), "checkmate");
    }
}
