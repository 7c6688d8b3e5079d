//! Core negamax search.
//!
//! Every node returns its value from the point of view of the side to move
//! there. Transposition table and null-move cutoffs return the crossed bound
//! (fail-hard); the move loop returns the best value it saw.

use std::sync::atomic::Ordering;

use super::constants::{DRAW_SCORE, INF_SCORE, MATE_SCORE, MATE_THRESHOLD, TIME_CHECK_INTERVAL};
use super::{SearchInfo, SearchLimits, SearchState};
use crate::eval::Evaluator;
use crate::position::{Position, TerminalReason};
use crate::tt::{BoundType, TTEntry};
use crate::types::{Move, Piece, Square, MAX_PLY};

/// Search context for a single search
pub(crate) struct SearchContext<'a, P, E> {
    pub(super) position: &'a mut P,
    pub(super) evaluator: &'a E,
    pub(super) state: &'a mut SearchState,
    pub(super) limits: SearchLimits,
    pub(super) info: SearchInfo,
    /// Set once a limit is hit; every node then unwinds without storing
    pub(super) aborted: bool,
    /// Limits are ignored while false so the first iteration always completes
    pub(super) can_abort: bool,
    /// Best root move of the iteration in progress
    pub(super) root_best: Option<Move>,
}

/// Score of a finished game at `ply`
pub(super) fn terminal_score(reason: TerminalReason, ply: usize) -> i32 {
    match reason {
        TerminalReason::Checkmate => -MATE_SCORE + ply as i32,
        _ => DRAW_SCORE,
    }
}

/// Make a mate score relative to the node before caching it
pub(super) fn score_to_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score + ply as i32
    } else if score <= -MATE_THRESHOLD {
        score - ply as i32
    } else {
        score
    }
}

/// Inverse of [`score_to_tt`] for a node at `ply`
pub(super) fn score_from_tt(score: i32, ply: usize) -> i32 {
    if score >= MATE_THRESHOLD {
        score - ply as i32
    } else if score <= -MATE_THRESHOLD {
        score + ply as i32
    } else {
        score
    }
}

impl<'a, P: Position, E: Evaluator> SearchContext<'a, P, E> {
    pub(super) fn new(
        position: &'a mut P,
        evaluator: &'a E,
        state: &'a mut SearchState,
        limits: SearchLimits,
    ) -> Self {
        SearchContext {
            position,
            evaluator,
            state,
            limits,
            info: SearchInfo::default(),
            aborted: false,
            can_abort: false,
            root_best: None,
        }
    }

    /// Hand back the statistics with the elapsed time filled in
    pub(super) fn finish(self) -> SearchInfo {
        let mut info = self.info;
        info.elapsed = self.limits.start.elapsed();
        info
    }

    /// Has a time, node or stop-flag limit been hit?
    pub(super) fn should_stop(&mut self) -> bool {
        if self.aborted {
            return true;
        }
        if !self.can_abort {
            return false;
        }

        let stopped = self
            .limits
            .stop
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed));
        let out_of_nodes = self
            .limits
            .node_limit
            .is_some_and(|limit| self.info.nodes >= limit);
        let out_of_time = self.info.nodes % TIME_CHECK_INTERVAL == 0 && self.time_exceeded();

        if stopped || out_of_nodes || out_of_time {
            log::debug!(
                "search aborted after {} nodes (stop flag: {stopped}, node limit: {out_of_nodes}, time limit: {out_of_time})",
                self.info.nodes
            );
            self.aborted = true;
        }
        self.aborted
    }

    pub(super) fn time_exceeded(&self) -> bool {
        self.limits
            .time_limit
            .is_some_and(|limit| self.limits.start.elapsed() >= limit)
    }

    /// Evaluate position from side-to-move's perspective
    #[inline]
    pub(super) fn evaluate(&mut self) -> i32 {
        self.info.evaluations += 1;
        self.evaluator.evaluate(&*self.position) * self.position.side_to_move().sign()
    }

    pub(super) fn note_ply(&mut self, ply: usize) {
        self.info.seldepth = self.info.seldepth.max(ply as u32);
    }

    /// Does the side to move have anything besides king and pawns?
    fn has_non_pawn_material(&self) -> bool {
        let us = self.position.side_to_move();
        Square::all().any(|sq| {
            matches!(
                self.position.piece_at(sq),
                Some((color, piece)) if color == us && !matches!(piece, Piece::Pawn | Piece::King)
            )
        })
    }

    /// Probe the TT. Returns the stored move and, away from the root, a
    /// cutoff value when the entry settles this node.
    fn probe_tt(
        &mut self,
        hash: u64,
        depth: u32,
        alpha: i32,
        beta: i32,
        ply: usize,
    ) -> (Option<Move>, Option<i32>) {
        let Some(entry) = self.state.tt.lookup(hash) else {
            return (None, None);
        };
        let entry = TTEntry {
            value: score_from_tt(entry.value, ply),
            ..*entry
        };
        let cutoff = if ply > 0 {
            entry.cutoff(depth, alpha, beta)
        } else {
            None
        };
        if cutoff.is_some() {
            self.info.tt_cutoffs += 1;
        }
        (entry.best_move, cutoff)
    }

    /// Try null move pruning
    fn try_null_move(&mut self, depth: u32, beta: i32, ply: usize) -> Option<i32> {
        let reduction = self.state.params.null_reduction_for(depth);
        let reduced_depth = depth.saturating_sub(1 + reduction);

        self.position.push_null();
        let value = -self.negamax(reduced_depth, -beta, -beta + 1, ply + 1, true);
        self.position.pop();

        if self.aborted {
            return None;
        }
        (value >= beta).then_some(beta)
    }

    /// Alpha-beta search of the current position to `depth` plies
    pub(super) fn negamax(
        &mut self,
        depth: u32,
        mut alpha: i32,
        beta: i32,
        ply: usize,
        after_null: bool,
    ) -> i32 {
        self.info.nodes += 1;
        self.note_ply(ply);
        if self.should_stop() {
            return 0;
        }

        let is_root = ply == 0;
        if is_root {
            self.root_best = None;
        } else if let Some(reason) = self.position.terminal_state() {
            return terminal_score(reason, ply);
        }

        if ply >= MAX_PLY - 1 {
            return self.evaluate();
        }

        let hash = self.state.zobrist.hash(&*self.position);
        let (tt_move, tt_cutoff) = self.probe_tt(hash, depth, alpha, beta, ply);
        if let Some(value) = tt_cutoff {
            return value;
        }

        if depth == 0 {
            return if self.state.params.quiescence {
                self.quiescence(alpha, beta, ply)
            } else {
                self.evaluate()
            };
        }

        let in_check = self.position.is_check();

        if self.state.params.null_move
            && depth > self.state.params.null_min_depth
            && !is_root
            && !in_check
            && !after_null
            && self.has_non_pawn_material()
        {
            if let Some(value) = self.try_null_move(depth, beta, ply) {
                return value;
            }
            if self.aborted {
                return 0;
            }
        }

        let moves = self.position.legal_moves();
        if moves.is_empty() {
            return if in_check {
                -MATE_SCORE + ply as i32
            } else {
                DRAW_SCORE
            };
        }

        let ordered = self
            .state
            .orderer
            .order(&mut *self.position, &moves, tt_move, ply);

        let alpha_orig = alpha;
        let mut best_value = -INF_SCORE;
        let mut best_move = None;

        for (index, mv) in ordered.moves().enumerate() {
            let quiet = !self.position.is_capture(mv) && !mv.is_promotion();

            self.position.push(mv);
            let gives_check = self.position.is_check();
            let params = &self.state.params;
            let reduce = params.lmr
                && !is_root
                && quiet
                && !gives_check
                && index >= params.lmr_min_move
                && depth >= params.lmr_min_depth;

            let mut value = if reduce {
                -self.negamax(depth.saturating_sub(2), -beta, -alpha, ply + 1, false)
            } else {
                -self.negamax(depth - 1, -beta, -alpha, ply + 1, false)
            };
            if reduce && value > alpha && !self.aborted {
                value = -self.negamax(depth - 1, -beta, -alpha, ply + 1, false);
            }
            self.position.pop();

            if self.aborted {
                return 0;
            }

            if value > best_value {
                best_value = value;
                best_move = Some(mv);
                if is_root {
                    self.root_best = Some(mv);
                }
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                if quiet {
                    self.state
                        .orderer
                        .record_cutoff(&*self.position, mv, ply, depth);
                }
                break;
            }
        }

        let bound = if best_value >= beta {
            BoundType::LowerBound
        } else if best_value > alpha_orig {
            BoundType::Exact
        } else {
            BoundType::UpperBound
        };
        self.state
            .tt
            .store(hash, score_to_tt(best_value, ply), depth, bound, best_move);

        best_value
    }
}
