//! Bounded transposition cache.
//!
//! Entries are keyed by Zobrist hash and remaining depth. The table is an
//! array of two-slot buckets: slot 0 keeps the deepest entry seen for the
//! bucket, slot 1 always takes the newest one.

use chess_core::Move;
use serde::Serialize;
use tracing::trace;

/// How a stored score relates to the true minimax value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Exact,
    /// The true value is at least the stored score.
    Lower,
    /// The true value is at most the stored score.
    Upper,
}

/// Result of one completed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranspositionEntry {
    pub key: u64,
    pub depth: u32,
    pub score: i32,
    pub bound: Bound,
    pub best_move: Option<Move>,
}

impl TranspositionEntry {
    /// Returns the stored score if it settles a node searched with the
    /// window `(alpha, beta)`.
    pub fn cutoff(&self, alpha: i32, beta: i32) -> Option<i32> {
        match self.bound {
            Bound::Exact => Some(self.score),
            Bound::Lower if self.score >= beta => Some(self.score),
            Bound::Upper if self.score <= alpha => Some(self.score),
            _ => None,
        }
    }

    fn same_node(&self, key: u64, depth: u32) -> bool {
        self.key == key && self.depth == depth
    }
}

/// Counters for one search's cache traffic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub probes: u64,
    pub hits: u64,
    pub stores: u64,
    pub overwrites: u64,
}

type Bucket = [Option<TranspositionEntry>; 2];

/// Fixed-size table of searched nodes, owned by one search.
pub struct TranspositionCache {
    buckets: Vec<Bucket>,
    stats: CacheStats,
}

impl TranspositionCache {
    /// Creates a cache holding at least `capacity` entries, rounded up to a
    /// power of two.
    pub fn new(capacity: usize) -> Self {
        let entries = capacity.max(2).next_power_of_two();
        TranspositionCache {
            buckets: vec![[None, None]; entries / 2],
            stats: CacheStats::default(),
        }
    }

    /// Total number of slots.
    pub fn capacity(&self) -> usize {
        self.buckets.len() * 2
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.buckets.iter().flatten().filter(|slot| slot.is_some()).count()
    }

    /// Returns true if nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Counters since creation or the last [`Self::clear`].
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Empties every slot and resets the counters.
    pub fn clear(&mut self) {
        self.buckets.fill([None, None]);
        self.stats = CacheStats::default();
    }

    #[inline]
    fn bucket_index(&self, key: u64) -> usize {
        (key as usize) & (self.buckets.len() - 1)
    }

    /// Looks up the entry stored for `key` at exactly `depth` plies.
    pub fn probe(&mut self, key: u64, depth: u32) -> Option<TranspositionEntry> {
        self.stats.probes += 1;
        let bucket = &self.buckets[self.bucket_index(key)];
        let found = bucket
            .iter()
            .flatten()
            .find(|entry| entry.same_node(key, depth))
            .copied();
        if found.is_some() {
            self.stats.hits += 1;
        }
        found
    }

    /// Stores an entry, replacing the same node if present, otherwise the
    /// slot chosen by the replacement scheme.
    pub fn store(&mut self, entry: TranspositionEntry) {
        self.stats.stores += 1;
        let index = self.bucket_index(entry.key);
        let bucket = &mut self.buckets[index];

        let slot = if let Some(i) = bucket
            .iter()
            .position(|slot| slot.is_some_and(|old| old.same_node(entry.key, entry.depth)))
        {
            i
        } else {
            match bucket[0] {
                Some(old) if old.depth > entry.depth => 1,
                _ => 0,
            }
        };

        if let Some(old) = bucket[slot] {
            if !old.same_node(entry.key, entry.depth) {
                self.stats.overwrites += 1;
                trace!(
                    old_key = old.key,
                    new_key = entry.key,
                    slot,
                    "transposition slot overwritten"
                );
            }
        }
        bucket[slot] = Some(entry);
    }
}
