//! Static evaluation.

mod material;
mod pst;

pub use material::MaterialEvaluator;

use crate::position::Position;

/// Scores a position without searching it.
///
/// Scores are centipawns from White's point of view. A checkmated side must
/// score `∓MATE_SCORE` (negative when White is mated) and drawn positions
/// must score 0; the search negates for Black to move.
pub trait Evaluator {
    fn evaluate<P: Position>(&self, position: &P) -> i32;
}
