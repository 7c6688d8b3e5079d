use super::constants::{DRAW_SCORE, MATE_SCORE};
use super::negamax::SearchContext;
use crate::eval::Evaluator;
use crate::position::Position;
use crate::types::MAX_PLY;

impl<P: Position, E: Evaluator> SearchContext<'_, P, E> {
    /// Entry point for a standalone quiescence search
    pub(super) fn quiescence_root(&mut self, alpha: i32, beta: i32) -> i32 {
        self.info.nodes += 1;
        self.quiescence(alpha, beta, 0)
    }

    /// Quiescence search: stand pat, then captures and queen promotions only.
    ///
    /// Fail-hard: the result is clamped to `[alpha, beta]`. Terminates because
    /// every move searched removes material or a pawn.
    pub(super) fn quiescence(&mut self, mut alpha: i32, beta: i32, ply: usize) -> i32 {
        self.note_ply(ply);
        if self.should_stop() {
            return 0;
        }

        let moves = self.position.legal_moves();
        if moves.is_empty() {
            return if self.position.is_check() {
                -MATE_SCORE + ply as i32
            } else {
                DRAW_SCORE
            };
        }

        let stand_pat = self.evaluate();
        if stand_pat >= beta {
            return beta;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        if ply >= MAX_PLY - 1 {
            return alpha;
        }

        let tactical = self.state.orderer.order_tactical(&*self.position, &moves);
        for mv in tactical.moves() {
            self.info.nodes += 1;
            self.position.push(mv);
            let value = -self.quiescence(-beta, -alpha, ply + 1);
            self.position.pop();

            if self.aborted {
                return 0;
            }
            if value >= beta {
                return beta;
            }
            if value > alpha {
                alpha = value;
            }
        }

        alpha
    }
}
