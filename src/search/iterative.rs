use super::constants::{DRAW_SCORE, INF_SCORE, MATE_SCORE, MATE_THRESHOLD};
use super::negamax::SearchContext;
use super::{mate_in, IterationReport, SearchInfoCallback};
use crate::eval::Evaluator;
use crate::position::Position;
use crate::types::Move;

/// Format PV moves as a space-separated string of UCI moves
fn format_pv(pv: &[Move]) -> String {
    pv.iter()
        .map(std::string::ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

impl<P: Position, E: Evaluator> SearchContext<'_, P, E> {
    /// Iterative deepening with aspiration windows.
    ///
    /// Returns the best move and score of the last completed iteration.
    /// Depth 1 always completes; a deeper iteration cut short by a limit is
    /// discarded.
    pub(crate) fn iterative_deepening(
        &mut self,
        max_depth: u32,
        info_callback: Option<&SearchInfoCallback>,
    ) -> (Option<Move>, i32) {
        if self.position.legal_moves().is_empty() {
            let score = if self.position.is_check() {
                -MATE_SCORE
            } else {
                DRAW_SCORE
            };
            return (None, score);
        }

        // A drawn root still needs a move to play, but nothing it leads to
        // changes the result
        if let Some(reason) = self.position.terminal_state().filter(|r| r.is_draw()) {
            log::debug!("root is drawn by {reason:?}, searching depth 1 for a move");
            self.can_abort = false;
            self.negamax(1, -INF_SCORE, INF_SCORE, 0, false);
            let best_move = self.root_best;
            self.info.depth = 1;
            self.info.pv = best_move.into_iter().collect();
            self.publish(1, DRAW_SCORE, info_callback);
            return (best_move, DRAW_SCORE);
        }

        // Reductions can hide a shorter mate, so a pruned search only trusts
        // a mate once every ply of it could have been reduced
        let pruned = self.state.params.null_move || self.state.params.lmr;
        let mut best_move = None;
        let mut score = 0;

        for depth in 1..=max_depth {
            self.can_abort = depth > 1;

            let value = self.aspiration_search(depth, score);
            if self.aborted {
                break;
            }

            score = value;
            best_move = self.root_best.or(best_move);
            self.info.depth = depth;
            self.info.pv = self.extract_pv(best_move, depth as usize);

            self.publish(depth, score, info_callback);

            if score.abs() >= MATE_THRESHOLD {
                let distance = MATE_SCORE - score.abs();
                let horizon = if pruned { depth as i32 / 2 } else { depth as i32 };
                if distance <= horizon {
                    break;
                }
            }
            if self.time_exceeded() {
                break;
            }
        }

        (best_move, score)
    }

    /// Log a finished iteration and hand it to the callback
    fn publish(&self, depth: u32, score: i32, info_callback: Option<&SearchInfoCallback>) {
        let report = IterationReport {
            depth,
            seldepth: self.info.seldepth,
            score,
            mate_in: mate_in(score),
            nodes: self.info.nodes,
            elapsed: self.limits.start.elapsed(),
            hashfull: self.state.tt.hashfull(),
            pv: self.info.pv.clone(),
        };
        log::debug!(
            "depth {} seldepth {} score {} nodes {} time {:?} pv {}",
            report.depth,
            report.seldepth,
            report.score,
            report.nodes,
            report.elapsed,
            format_pv(&report.pv)
        );
        if let Some(callback) = info_callback {
            callback(&report);
        }
    }

    /// Search the root at `depth` inside an aspiration window around
    /// `previous`, falling back to a full window when the result lands
    /// outside it.
    fn aspiration_search(&mut self, depth: u32, previous: i32) -> i32 {
        if depth == 1 || previous.abs() >= MATE_THRESHOLD {
            return self.negamax(depth, -INF_SCORE, INF_SCORE, 0, false);
        }

        let delta = self.state.params.aspiration_window(previous);
        let alpha = previous - delta;
        let beta = previous + delta;
        let value = self.negamax(depth, alpha, beta, 0, false);
        if self.aborted || (alpha < value && value < beta) {
            return value;
        }

        log::trace!(
            "aspiration miss at depth {depth}: {value} outside ({alpha}, {beta}), re-searching"
        );
        self.negamax(depth, -INF_SCORE, INF_SCORE, 0, false)
    }

    /// Principal variation: `best_move` followed by the hash moves stored
    /// along the line, stopping at an illegal or repeated position
    fn extract_pv(&mut self, best_move: Option<Move>, max_len: usize) -> Vec<Move> {
        let mut pv = Vec::with_capacity(max_len);
        let Some(first) = best_move else {
            return pv;
        };

        let mut seen = Vec::with_capacity(max_len);
        let mut next = Some(first);
        while let Some(mv) = next {
            if pv.len() >= max_len || !self.position.legal_moves().contains(mv) {
                break;
            }
            seen.push(self.state.zobrist.hash(&*self.position));
            pv.push(mv);
            self.position.push(mv);

            let hash = self.state.zobrist.hash(&*self.position);
            next = if seen.contains(&hash) {
                None
            } else {
                self.state.tt.lookup(hash).and_then(|entry| entry.best_move)
            };
        }

        for _ in 0..pv.len() {
            self.position.pop();
        }
        pv
    }
}
