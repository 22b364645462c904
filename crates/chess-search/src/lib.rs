//! Position scoring and game-tree search.
//!
//! [`evaluate`] scores a quiet position from white's point of view and
//! [`SearchEngine`] runs a true minimax over it: white maximizes, black
//! minimizes. Alpha-beta pruning and the [`TranspositionCache`] only change
//! how much of the tree is visited, never the result.
//!
//! ```
//! use chess_position::Position;
//! use chess_search::{search, EvaluationConfig};
//!
//! let result = search(&Position::startpos(), 2, &EvaluationConfig::default()).unwrap();
//! assert!(result.best_move.is_some());
//! ```

mod error;
pub mod eval;
pub mod search;
pub mod tt;

pub use error::SearchError;
pub use eval::{evaluate, material, piece_value, EvaluationConfig};
pub use search::{
    mated_score, search, SearchEngine, SearchOptions, SearchResult, INFINITY, MATE_THRESHOLD,
    MATE_VALUE,
};
pub use tt::{Bound, CacheStats, TranspositionCache, TranspositionEntry};
