//! Killer and history tables.

use crate::types::{Move, Piece, Square};

/// Plies tracked by the killer table
pub const KILLER_PLIES: usize = 32;

/// Two quiet moves per ply that recently caused a beta cutoff.
#[derive(Clone, Debug)]
pub struct KillerTable {
    slots: [[Move; 2]; KILLER_PLIES],
}

impl Default for KillerTable {
    fn default() -> Self {
        Self::new()
    }
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        KillerTable {
            slots: [[Move::NULL; 2]; KILLER_PLIES],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NULL, |row| row[0])
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots.get(ply).map_or(Move::NULL, |row| row[1])
    }

    /// Record a cutoff move. Plies past the table are ignored.
    pub fn update(&mut self, ply: usize, mv: Move) {
        let Some(row) = self.slots.get_mut(ply) else {
            return;
        };
        if row[0] != mv {
            row[1] = row[0];
            row[0] = mv;
        }
    }

    pub fn reset(&mut self) {
        for killers in &mut self.slots {
            *killers = [Move::NULL; 2];
        }
    }
}

/// Cutoff counts indexed by (piece kind, destination square).
#[derive(Clone, Debug)]
pub struct HistoryTable {
    entries: [[i32; Square::COUNT]; 6],
}

impl Default for HistoryTable {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryTable {
    #[must_use]
    pub fn new() -> Self {
        HistoryTable {
            entries: [[0; Square::COUNT]; 6],
        }
    }

    #[must_use]
    pub fn score(&self, piece: Piece, to: Square) -> i32 {
        self.entries[piece.index()][to.index()]
    }

    /// Reward a quiet move that caused a beta cutoff at `depth`
    pub fn update(&mut self, piece: Piece, to: Square, depth: u32) {
        let bonus = depth.saturating_mul(depth).min(i32::MAX as u32) as i32;
        let entry = &mut self.entries[piece.index()][to.index()];
        *entry = entry.saturating_add(bonus);
    }

    /// Halve every entry
    pub fn age(&mut self) {
        for entry in self.entries.iter_mut().flatten() {
            *entry >>= 1;
        }
    }

    pub fn reset(&mut self) {
        self.entries = [[0; Square::COUNT]; 6];
    }
}
