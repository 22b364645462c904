//! Minimax search with alpha-beta pruning and a transposition cache.
//!
//! White maximizes and black minimizes the same white-relative score; no
//! node ever negates a child's value. Terminal positions are scored before
//! the depth test, so a mate found at the horizon still counts as mate.

use std::cmp::Reverse;

use chess_core::{Color, Move, PieceKind};
use chess_position::{
    classify, legal_moves, make_move_in_place, unmake_move, GameState, MoveList, Position,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::eval::{evaluate, piece_value, EvaluationConfig};
use crate::tt::{Bound, CacheStats, TranspositionCache, TranspositionEntry};
use crate::SearchError;

/// Score of being mated at the root. Mates further away score closer to zero.
pub const MATE_VALUE: i32 = 1_000_000;

/// Strictly outside every reachable score.
pub const INFINITY: i32 = MATE_VALUE + 1;

/// Scores at least this far from zero announce a forced mate.
pub const MATE_THRESHOLD: i32 = MATE_VALUE - 1_000;

/// Switches that change how the tree is searched, never what it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    pub pruning: bool,
    pub use_cache: bool,
    /// Cache entries, rounded up to a power of two.
    pub cache_capacity: usize,
}

impl SearchOptions {
    pub const DEFAULT_CACHE_CAPACITY: usize = 1 << 16;

    /// Plain minimax: no pruning, no cache.
    pub fn exhaustive() -> Self {
        SearchOptions {
            pruning: false,
            use_cache: false,
            ..Self::default()
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        SearchOptions {
            pruning: true,
            use_cache: true,
            cache_capacity: Self::DEFAULT_CACHE_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the root is checkmate or stalemate.
    pub best_move: Option<Move>,
    pub score: i32,
    /// Classification of the root position.
    pub state: GameState,
    pub depth: u32,
    pub nodes: u64,
    pub cache: CacheStats,
}

impl SearchResult {
    /// Plies to mate if the score announces one.
    pub fn mate_in(&self) -> Option<u32> {
        if self.score.abs() >= MATE_THRESHOLD {
            Some((MATE_VALUE - self.score.abs()) as u32)
        } else {
            None
        }
    }
}

/// Score for the side to move being checkmated `ply` plies from the root.
#[inline]
pub const fn mated_score(side: Color, ply: u32) -> i32 {
    let magnitude = MATE_VALUE - ply as i32;
    match side {
        Color::White => -magnitude,
        Color::Black => magnitude,
    }
}

/// Searches positions with one evaluation configuration.
#[derive(Debug, Clone)]
pub struct SearchEngine {
    config: EvaluationConfig,
    options: SearchOptions,
}

impl SearchEngine {
    pub fn new(config: EvaluationConfig) -> Result<Self, SearchError> {
        Self::with_options(config, SearchOptions::default())
    }

    pub fn with_options(
        config: EvaluationConfig,
        options: SearchOptions,
    ) -> Result<Self, SearchError> {
        config.validate()?;
        if options.use_cache && options.cache_capacity == 0 {
            return Err(SearchError::InvalidConfiguration(
                "cache capacity must be positive".to_string(),
            ));
        }
        Ok(SearchEngine { config, options })
    }

    pub fn config(&self) -> &EvaluationConfig {
        &self.config
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Finds the best move for the side to move, looking `depth` plies ahead.
    ///
    /// The returned move is the first legal move, in generation order, that
    /// reaches the minimax value.
    pub fn search(&self, position: &Position, depth: u32) -> Result<SearchResult, SearchError> {
        if depth == 0 {
            return Err(SearchError::InvalidConfiguration(
                "search depth must be at least 1".to_string(),
            ));
        }

        debug!(
            fen = %position.to_fen(),
            depth,
            threat = self.config.threat,
            defense = self.config.defense,
            pruning = self.options.pruning,
            cache = self.options.use_cache,
            "search started"
        );

        let mut searcher = Searcher {
            config: &self.config,
            pruning: self.options.pruning,
            cache: self
                .options
                .use_cache
                .then(|| TranspositionCache::new(self.options.cache_capacity)),
            nodes: 0,
        };
        let mut board = position.clone();
        let result = searcher.root(&mut board, depth);

        debug!(
            best_move = ?result.best_move.map(|m| m.to_uci()),
            score = result.score,
            nodes = result.nodes,
            cache_hits = result.cache.hits,
            cache_probes = result.cache.probes,
            "search finished"
        );
        Ok(result)
    }
}

/// Searches `position` with default options.
pub fn search(
    position: &Position,
    depth: u32,
    config: &EvaluationConfig,
) -> Result<SearchResult, SearchError> {
    SearchEngine::new(*config)?.search(position, depth)
}

/// Recursion state of one top-level search.
struct Searcher<'a> {
    config: &'a EvaluationConfig,
    pruning: bool,
    cache: Option<TranspositionCache>,
    nodes: u64,
}

impl Searcher<'_> {
    fn root(&mut self, position: &mut Position, depth: u32) -> SearchResult {
        self.nodes += 1;
        let side = position.side_to_move();
        let state = classify(position);

        let (best_move, score) = match state {
            GameState::Checkmate => (None, mated_score(side, 0)),
            GameState::Stalemate => (None, 0),
            GameState::Normal | GameState::Check => {
                let moves = legal_moves(position);
                let (mut alpha, mut beta) = (-INFINITY, INFINITY);
                let mut best: Option<(Move, i32)> = None;

                for &m in &moves {
                    let undo = make_move_in_place(position, m);
                    let score = self.minimax(position, depth - 1, 1, alpha, beta);
                    unmake_move(position, m, &undo);

                    let improves = match (best, side) {
                        (None, _) => true,
                        (Some((_, s)), Color::White) => score > s,
                        (Some((_, s)), Color::Black) => score < s,
                    };
                    if improves {
                        best = Some((m, score));
                    }
                    if self.pruning {
                        match side {
                            Color::White => alpha = alpha.max(score),
                            Color::Black => beta = beta.min(score),
                        }
                    }
                }

                match best {
                    Some((m, s)) => (Some(m), s),
                    None => (None, 0),
                }
            }
        };

        SearchResult {
            best_move,
            score,
            state,
            depth,
            nodes: self.nodes,
            cache: self.cache.as_ref().map(|c| c.stats()).unwrap_or_default(),
        }
    }

    fn minimax(
        &mut self,
        position: &mut Position,
        depth: u32,
        ply: u32,
        mut alpha: i32,
        mut beta: i32,
    ) -> i32 {
        self.nodes += 1;
        let side = position.side_to_move();

        let mut moves = legal_moves(position);
        if moves.is_empty() {
            return if position.is_in_check(side) {
                mated_score(side, ply)
            } else {
                0
            };
        }

        if depth == 0 {
            return evaluate(position, self.config);
        }

        let key = position.zobrist_hash();
        let mut cached_move = None;
        if let Some(cache) = self.cache.as_mut() {
            if let Some(entry) = cache.probe(key, depth) {
                if let Some(score) = entry.cutoff(alpha, beta) {
                    return score;
                }
                cached_move = entry.best_move;
            }
        }

        order_moves(position, &mut moves, cached_move);

        let (alpha_start, beta_start) = (alpha, beta);
        let maximizing = side == Color::White;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };
        let mut best_move = None;

        for &m in &moves {
            let undo = make_move_in_place(position, m);
            let score = self.minimax(position, depth - 1, ply + 1, alpha, beta);
            unmake_move(position, m, &undo);

            if maximizing {
                if score > best_score {
                    best_score = score;
                    best_move = Some(m);
                }
                if self.pruning {
                    alpha = alpha.max(score);
                }
            } else {
                if score < best_score {
                    best_score = score;
                    best_move = Some(m);
                }
                if self.pruning {
                    beta = beta.min(score);
                }
            }

            if self.pruning && alpha >= beta {
                break;
            }
        }

        if let Some(cache) = self.cache.as_mut() {
            let bound = if !self.pruning {
                Bound::Exact
            } else if best_score <= alpha_start {
                Bound::Upper
            } else if best_score >= beta_start {
                Bound::Lower
            } else {
                Bound::Exact
            };
            cache.store(TranspositionEntry {
                key,
                depth,
                score: best_score,
                bound,
                best_move,
            });
        }

        best_score
    }
}

/// Puts the cached move first, then captures by most valuable victim and
/// least valuable attacker. The sort is stable, so quiet moves keep
/// generation order.
fn order_moves(position: &Position, moves: &mut MoveList, cached: Option<Move>) {
    let rank = |m: &Move| -> i32 {
        if Some(*m) == cached {
            return i32::MAX;
        }
        if !m.is_capture() {
            return 0;
        }
        // En passant leaves the destination empty; the victim is a pawn.
        let victim = position
            .piece_at(m.to)
            .map_or(piece_value(PieceKind::Pawn), |p| piece_value(p.kind));
        let attacker = position.piece_at(m.from).map_or(0, |p| piece_value(p.kind));
        1 + victim * 10 - attacker / 10
    };
    moves.as_mut_slice().sort_by_key(|m| Reverse(rank(m)));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chess_position::find_legal_move;

    fn pos(fen: &str) -> Position {
        Position::from_fen(fen).unwrap()
    }

    #[test]
    fn depth_zero_is_rejected() {
        let err = search(&Position::startpos(), 0, &EvaluationConfig::default()).unwrap_err();
        assert!(matches!(err, SearchError::InvalidConfiguration(_)));
    }

    #[test]
    fn zero_cache_capacity_is_rejected() {
        let options = SearchOptions {
            cache_capacity: 0,
            ..SearchOptions::default()
        };
        assert!(SearchEngine::with_options(EvaluationConfig::default(), options).is_err());
        let without_cache = SearchOptions {
            use_cache: false,
            ..options
        };
        assert!(SearchEngine::with_options(EvaluationConfig::default(), without_cache).is_ok());
    }

    #[test]
    fn mated_score_prefers_short_mates() {
        assert_eq!(mated_score(Color::White, 1), -(MATE_VALUE - 1));
        assert_eq!(mated_score(Color::Black, 3), MATE_VALUE - 3);
        assert!(mated_score(Color::Black, 1) > mated_score(Color::Black, 3));
    }

    #[test]
    fn grabs_queen_at_the_horizon() {
        // One ply deep, the king's recapture on d8 is beyond the horizon.
        let position = pos("3qk3/8/8/8/8/8/8/3RK3 w - - 0 1");
        let result = search(&position, 1, &EvaluationConfig::default()).unwrap();
        assert_eq!(result.best_move, find_legal_move(&position, "d1d8"));
        assert_eq!(result.score, 500);
    }

    #[test]
    fn black_minimizes() {
        let position = pos("3qk3/8/8/8/8/8/8/3RK3 b - - 0 1");
        let result = search(&position, 1, &EvaluationConfig::default()).unwrap();
        assert_eq!(result.best_move, find_legal_move(&position, "d8d1"));
        assert_eq!(result.score, -900);
    }

    #[test]
    fn finds_back_rank_mate() {
        let position = pos("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let result = search(&position, 3, &EvaluationConfig::default()).unwrap();
        assert_eq!(result.best_move, find_legal_move(&position, "a1a8"));
        assert_eq!(result.score, MATE_VALUE - 1);
        assert_eq!(result.mate_in(), Some(1));
    }

    #[test]
    fn terminal_root_has_no_move() {
        let stalemate = pos("8/8/8/8/8/kq6/8/K7 w - - 0 1");
        let result = search(&stalemate, 4, &EvaluationConfig::default()).unwrap();
        assert_eq!(result.best_move, None);
        assert_eq!(result.score, 0);
        assert_eq!(result.state, GameState::Stalemate);
        assert_eq!(result.nodes, 1);
    }

    #[test]
    fn cached_move_is_ordered_first() {
        let position = Position::startpos();
        let mut moves = legal_moves(&position);
        let knight = find_legal_move(&position, "g1f3");
        order_moves(&position, &mut moves, knight);
        assert_eq!(Some(moves[0]), knight);
        assert_eq!(moves.len(), 20);
    }

    #[test]
    fn captures_are_ordered_by_victim() {
        // The pawn on e4 can take a queen on d5 or a knight on f5.
        let position = pos("4k3/8/8/3q1n2/4P3/8/8/4K3 w - - 0 1");
        let mut moves = legal_moves(&position);
        order_moves(&position, &mut moves, None);
        assert_eq!(moves[0].to_uci(), "e4d5");
        assert_eq!(moves[1].to_uci(), "e4f5");
    }

    #[test]
    fn nodes_are_counted() {
        let engine =
            SearchEngine::with_options(EvaluationConfig::default(), SearchOptions::exhaustive())
                .unwrap();
        let result = engine.search(&Position::startpos(), 2).unwrap();
        // Root, 20 replies, 400 leaves.
        assert_eq!(result.nodes, 421);
        assert_eq!(result.cache, CacheStats::default());
    }
}
