//! Move ordering.
//!
//! Moves are scored into disjoint bands (see the ordering constants) and
//! sorted highest first. The sort is stable, so moves with equal scores keep
//! the order the position generated them in.

use super::constants::{
    CAPTURE_SCORE, CHECK_SCORE, HISTORY_CAP, HISTORY_SCORE, KILLER_SCORE, PROMOTION_SCORE,
    TT_MOVE_SCORE,
};
use super::heuristics::{HistoryTable, KillerTable};
use crate::position::Position;
use crate::types::{Move, MoveList, Piece, ScoredMoveList};

/// MVV-LVA: prefer valuable victims, then cheap attackers
#[inline]
#[must_use]
pub fn mvv_lva(victim: Piece, attacker: Piece) -> i32 {
    victim.value() * 10 - attacker.value()
}

/// Orders moves using the hash move, MVV-LVA, killers and history.
#[derive(Clone, Debug, Default)]
pub struct MoveOrderer {
    pub killers: KillerTable,
    pub history: HistoryTable,
}

impl MoveOrderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Score and sort `moves` for a node at `ply`
    pub fn order<P: Position>(
        &self,
        position: &mut P,
        moves: &MoveList,
        tt_move: Option<Move>,
        ply: usize,
    ) -> ScoredMoveList {
        let mut scored = ScoredMoveList::new();
        for &mv in moves {
            let score = self.score_move(position, mv, tt_move, ply);
            scored.push(mv, score);
        }
        scored.sort_by_score_desc();
        scored
    }

    /// Captures and queen promotions only, most valuable victim first
    pub fn order_tactical<P: Position>(&self, position: &P, moves: &MoveList) -> ScoredMoveList {
        let mut scored = ScoredMoveList::new();
        for &mv in moves {
            let promotion = mv.promotion().map_or(0, Piece::value);
            if let Some(victim) = position.captured_piece(mv) {
                let attacker = position.moving_piece(mv).unwrap_or(Piece::Pawn);
                scored.push(mv, mvv_lva(victim, attacker) + promotion);
            } else if mv.promotion() == Some(Piece::Queen) {
                scored.push(mv, promotion);
            }
        }
        scored.sort_by_score_desc();
        scored
    }

    fn score_move<P: Position>(
        &self,
        position: &mut P,
        mv: Move,
        tt_move: Option<Move>,
        ply: usize,
    ) -> i32 {
        if tt_move == Some(mv) {
            return TT_MOVE_SCORE;
        }

        if let Some(victim) = position.captured_piece(mv) {
            let attacker = position.moving_piece(mv).unwrap_or(Piece::Pawn);
            let promotion = mv.promotion().map_or(0, Piece::value);
            return CAPTURE_SCORE + mvv_lva(victim, attacker) + promotion;
        }

        if let Some(promotion) = mv.promotion() {
            return PROMOTION_SCORE + promotion.value();
        }

        if mv == self.killers.primary(ply) {
            return KILLER_SCORE + 1;
        }
        if mv == self.killers.secondary(ply) {
            return KILLER_SCORE;
        }

        if let Some(piece) = position.moving_piece(mv) {
            let history = self.history.score(piece, mv.to());
            if history > 0 {
                return HISTORY_SCORE + history.min(HISTORY_CAP);
            }
        }

        if position.gives_check(mv) {
            return CHECK_SCORE;
        }

        0
    }

    /// Record a quiet move that caused a beta cutoff
    pub fn record_cutoff<P: Position>(&mut self, position: &P, mv: Move, ply: usize, depth: u32) {
        self.killers.update(ply, mv);
        if let Some(piece) = position.moving_piece(mv) {
            self.history.update(piece, mv.to(), depth);
        }
    }

    /// Prepare for a new search: killers are cleared, history optionally halved
    pub fn new_search(&mut self, age_history: bool) {
        self.killers.reset();
        if age_history {
            self.history.age();
        }
    }

    pub fn clear(&mut self) {
        self.killers.reset();
        self.history.reset();
    }
}
