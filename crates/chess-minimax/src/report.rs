//! Text and JSON rendering of search and game results.

use chess_position::Position;
use chess_search::{CacheStats, SearchResult};
use serde::Serialize;

use crate::game::GameRecord;

/// One analysed position, as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub fen: String,
    pub depth: u32,
    pub best_move: Option<String>,
    pub score: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mate_in: Option<u32>,
    pub state: &'static str,
    pub nodes: u64,
    pub cache: CacheStats,
}

impl AnalysisReport {
    pub fn new(position: &Position, result: &SearchResult) -> Self {
        AnalysisReport {
            fen: position.to_fen(),
            depth: result.depth,
            best_move: result.best_move.map(|m| m.to_uci()),
            score: result.score,
            mate_in: result.mate_in(),
            state: result.state.as_str(),
            nodes: result.nodes,
            cache: result.cache,
        }
    }

    pub fn to_text(&self) -> String {
        let best_move = self.best_move.as_deref().unwrap_or("(none)");
        let score = match self.mate_in {
            Some(plies) => format!("{} (mate in {})", self.score, plies),
            None => self.score.to_string(),
        };
        [
            format!("position:  {}", self.fen),
            format!("state:     {}", self.state),
            format!("bestmove:  {}", best_move),
            format!("score:     {}", score),
            format!("depth:     {}", self.depth),
            format!(
                "nodes:     {} (cache {}/{} hits)",
                self.nodes, self.cache.hits, self.cache.probes
            ),
        ]
        .join("\n")
    }
}

pub fn game_to_text(game: &GameRecord) -> String {
    let mut lines: Vec<String> = game
        .moves
        .iter()
        .map(|ply| {
            format!(
                "{:>4}. {:<6} {:>8}  ({} nodes)",
                ply.ply, ply.uci, ply.score, ply.nodes
            )
        })
        .collect();
    lines.push(format!("final:     {}", game.final_fen));
    lines.push(format!(
        "result:    {:?} after {} plies ({:?}, score {})",
        game.outcome,
        game.moves.len(),
        game.termination,
        game.final_score
    ));
    lines.join("\n")
}
