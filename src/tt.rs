//! Transposition table for caching search results.
//!
//! A fixed array of slots indexed by `fingerprint % capacity`, owned by one
//! engine and persisting across searches. Each slot holds at most one entry;
//! collisions are settled by a depth-preferred policy that also evicts entries
//! left over from earlier searches.

use std::mem;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::Move;

/// Default table size in entries
pub const DEFAULT_TT_ENTRIES: usize = 1 << 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum BoundType {
    Exact,      // Score is the exact value
    LowerBound, // Score is at least this value (failed high - score >= beta)
    UpperBound, // Score is at most this value (failed low - score <= alpha)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TTEntry {
    pub fingerprint: u64,
    pub value: i32,
    pub depth: u8,
    pub bound: BoundType,
    pub best_move: Option<Move>,
    /// Search counter at the time of the store
    pub generation: u8,
}

impl TTEntry {
    /// Can this entry settle a node searched to `depth` inside `(alpha, beta)`?
    ///
    /// Returns the value to return from the node: the exact value, or the
    /// bound that was crossed.
    #[must_use]
    pub fn cutoff(&self, depth: u32, alpha: i32, beta: i32) -> Option<i32> {
        if u32::from(self.depth) < depth {
            return None;
        }
        match self.bound {
            BoundType::Exact => Some(self.value),
            BoundType::LowerBound if self.value >= beta => Some(beta),
            BoundType::UpperBound if self.value <= alpha => Some(alpha),
            _ => None,
        }
    }
}

pub struct TranspositionTable {
    table: Vec<Option<TTEntry>>,
    occupied: usize,
    generation: u8,
}

impl TranspositionTable {
    /// Create a table with room for `capacity` entries (at least one)
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            table: vec![None; capacity.max(1)],
            occupied: 0,
            generation: 0,
        }
    }

    /// Create a table occupying roughly `size_mb` megabytes
    #[must_use]
    pub fn with_megabytes(size_mb: usize) -> Self {
        let entry_size = mem::size_of::<Option<TTEntry>>();
        Self::new((size_mb * 1024 * 1024) / entry_size)
    }

    fn index(&self, fingerprint: u64) -> usize {
        (fingerprint % self.table.len() as u64) as usize
    }

    /// Entry stored under exactly this fingerprint.
    ///
    /// The caller checks whether the stored depth is sufficient.
    #[must_use]
    pub fn lookup(&self, fingerprint: u64) -> Option<&TTEntry> {
        self.table[self.index(fingerprint)]
            .as_ref()
            .filter(|entry| entry.fingerprint == fingerprint)
    }

    /// Store a search result.
    ///
    /// Replacement policy:
    /// 1. an empty slot is always written
    /// 2. an entry for the same fingerprint is always overwritten; its move is
    ///    kept when the new result has none
    /// 3. an entry for another fingerprint is replaced when it comes from an
    ///    earlier search or `depth` is at least its depth, else the new result
    ///    is dropped
    pub fn store(
        &mut self,
        fingerprint: u64,
        value: i32,
        depth: u32,
        bound: BoundType,
        best_move: Option<Move>,
    ) {
        let index = self.index(fingerprint);
        let depth = depth.min(u32::from(u8::MAX)) as u8;
        let generation = self.generation;

        let best_move = match &self.table[index] {
            None => {
                self.occupied += 1;
                best_move
            }
            Some(existing) if existing.fingerprint == fingerprint => {
                best_move.or(existing.best_move)
            }
            Some(existing) => {
                if existing.generation == generation && depth < existing.depth {
                    return;
                }
                best_move
            }
        };

        self.table[index] = Some(TTEntry {
            fingerprint,
            value,
            depth,
            bound,
            best_move,
            generation,
        });
    }

    /// Mark the start of a new search; older entries become replaceable
    pub fn new_search(&mut self) {
        self.generation = self.generation.wrapping_add(1);
    }

    /// Clear all entries from the table.
    pub fn clear(&mut self) {
        self.table.iter_mut().for_each(|slot| *slot = None);
        self.occupied = 0;
        self.generation = 0;
    }

    /// Number of occupied slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.occupied
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.table.len()
    }

    /// Returns hash table fullness in per mille (0-1000).
    #[must_use]
    pub fn hashfull(&self) -> u32 {
        // Sample the first 1000 slots
        let sample_size = self.table.len().min(1000);
        let occupied = self
            .table
            .iter()
            .take(sample_size)
            .filter(|slot| slot.is_some())
            .count();
        ((occupied as u64 * 1000) / sample_size as u64) as u32
    }
}

impl Default for TranspositionTable {
    fn default() -> Self {
        Self::new(DEFAULT_TT_ENTRIES)
    }
}

impl std::fmt::Debug for TranspositionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranspositionTable")
            .field("capacity", &self.capacity())
            .field("occupied", &self.occupied)
            .field("generation", &self.generation)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Square;

    fn mv(from: &str, to: &str) -> Move {
        let from: Square = from.parse().expect("square");
        let to: Square = to.parse().expect("square");
        Move::quiet(from, to)
    }

    #[test]
    fn test_store_and_lookup() {
        let mut tt = TranspositionTable::new(64);
        let hash = 0x1234_5678_9ABC_DEF0;

        tt.store(hash, 500, 10, BoundType::Exact, Some(mv("e2", "e4")));

        let entry = tt.lookup(hash).expect("should find entry");
        assert_eq!(entry.depth, 10);
        assert_eq!(entry.value, 500);
        assert_eq!(entry.bound, BoundType::Exact);
        assert_eq!(entry.best_move, Some(mv("e2", "e4")));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_no_false_positives() {
        let mut tt = TranspositionTable::new(64);
        tt.store(3, 500, 10, BoundType::Exact, None);

        // Same slot, different fingerprint
        assert!(tt.lookup(3 + 64).is_none());
        assert!(tt.lookup(4).is_none());
    }

    #[test]
    fn test_same_position_always_overwrites() {
        let mut tt = TranspositionTable::new(16);
        tt.store(5, 100, 8, BoundType::LowerBound, Some(mv("d2", "d4")));
        tt.store(5, -20, 2, BoundType::UpperBound, None);

        let entry = tt.lookup(5).expect("entry");
        assert_eq!(entry.depth, 2);
        assert_eq!(entry.value, -20);
        assert_eq!(entry.bound, BoundType::UpperBound);
        // Move from the earlier store survives
        assert_eq!(entry.best_move, Some(mv("d2", "d4")));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_collision_prefers_depth_within_search() {
        let mut tt = TranspositionTable::new(16);
        tt.store(1, 10, 6, BoundType::Exact, None);

        tt.store(17, 20, 3, BoundType::Exact, None);
        assert!(tt.lookup(17).is_none());
        assert!(tt.lookup(1).is_some());

        tt.store(33, 30, 6, BoundType::Exact, None);
        assert!(tt.lookup(33).is_some());
        assert!(tt.lookup(1).is_none());
    }

    #[test]
    fn test_collision_replaces_stale_entries() {
        let mut tt = TranspositionTable::new(16);
        tt.store(1, 10, 12, BoundType::Exact, None);
        tt.new_search();

        tt.store(17, 20, 1, BoundType::Exact, None);
        assert!(tt.lookup(1).is_none());
        let entry = tt.lookup(17).expect("entry");
        assert_eq!(entry.generation, 1);
    }

    #[test]
    fn test_cutoff_respects_bound_and_depth() {
        let entry = TTEntry {
            fingerprint: 1,
            value: 50,
            depth: 4,
            bound: BoundType::LowerBound,
            best_move: None,
            generation: 0,
        };
        assert_eq!(entry.cutoff(4, 0, 40), Some(40));
        assert_eq!(entry.cutoff(4, 0, 60), None);
        assert_eq!(entry.cutoff(5, 0, 40), None);

        let upper = TTEntry {
            bound: BoundType::UpperBound,
            ..entry
        };
        assert_eq!(upper.cutoff(3, 60, 100), Some(60));
        assert_eq!(upper.cutoff(3, 40, 100), None);

        let exact = TTEntry {
            bound: BoundType::Exact,
            ..entry
        };
        assert_eq!(exact.cutoff(2, -500, 500), Some(50));
    }

    #[test]
    fn test_clear_and_hashfull() {
        let mut tt = TranspositionTable::new(10);
        for fp in 0..5 {
            tt.store(fp, 0, 1, BoundType::Exact, None);
        }
        assert_eq!(tt.hashfull(), 500);
        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(tt.hashfull(), 0);
        assert_eq!(tt.capacity(), 10);
    }
}
