//! Engine-versus-engine play from a starting position.

use chess_core::Color;
use chess_position::{make_move, GameState, Position};
use chess_search::{evaluate, SearchEngine, SearchError};
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    White,
    Black,
    Draw,
}

impl Outcome {
    /// Winner decided by the sign of a white-relative score.
    pub fn from_score(score: i32) -> Self {
        match score.signum() {
            1 => Outcome::White,
            -1 => Outcome::Black,
            _ => Outcome::Draw,
        }
    }
}

/// Why the game stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Termination {
    Checkmate,
    Stalemate,
    PlyLimit,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlyRecord {
    pub ply: u32,
    pub uci: String,
    pub score: i32,
    pub nodes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub start_fen: String,
    pub final_fen: String,
    pub moves: Vec<PlyRecord>,
    pub termination: Termination,
    pub outcome: Outcome,
    /// Static evaluation of the final position.
    pub final_score: i32,
}

/// Lets the engine play both sides until the game ends or `max_plies`
/// moves have been made.
///
/// A game cut off by the ply limit goes to whoever the final evaluation
/// favors.
pub fn self_play(
    engine: &SearchEngine,
    start: &Position,
    depth: u32,
    max_plies: u32,
) -> Result<GameRecord, SearchError> {
    let mut position = start.clone();
    let mut moves = Vec::new();

    let termination = loop {
        if moves.len() as u32 >= max_plies {
            break Termination::PlyLimit;
        }

        let result = engine.search(&position, depth)?;
        let Some(best) = result.best_move else {
            break match result.state {
                GameState::Checkmate => Termination::Checkmate,
                _ => Termination::Stalemate,
            };
        };

        let ply = moves.len() as u32 + 1;
        info!(
            ply,
            side = %position.side_to_move(),
            uci = %best,
            score = result.score,
            nodes = result.nodes,
            "move played"
        );
        moves.push(PlyRecord {
            ply,
            uci: best.to_uci(),
            score: result.score,
            nodes: result.nodes,
        });
        position = make_move(&position, best);
    };

    let final_score = evaluate(&position, engine.config());
    let outcome = match termination {
        Termination::Checkmate => match position.side_to_move() {
            Color::White => Outcome::Black,
            Color::Black => Outcome::White,
        },
        Termination::Stalemate => Outcome::Draw,
        Termination::PlyLimit => Outcome::from_score(final_score),
    };
    info!(?termination, ?outcome, plies = moves.len(), "game over");

    Ok(GameRecord {
        start_fen: start.to_fen(),
        final_fen: position.to_fen(),
        moves,
        termination,
        outcome,
        final_score,
    })
}
