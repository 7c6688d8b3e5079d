//! Material and piece-square evaluation.

use super::pst::{game_phase, square_bonus};
use super::Evaluator;
use crate::position::{Position, TerminalReason};
use crate::search::{DRAW_SCORE, MATE_SCORE};
use crate::types::{Color, Piece, Square};

/// Bonus for holding both bishops
pub const BISHOP_PAIR_BONUS: i32 = 50;

/// Material, square tables with a tapered king and pawn term, and a bishop
/// pair bonus.
#[derive(Clone, Copy, Debug, Default)]
pub struct MaterialEvaluator;

impl MaterialEvaluator {
    #[must_use]
    pub fn new() -> Self {
        MaterialEvaluator
    }
}

impl Evaluator for MaterialEvaluator {
    fn evaluate<P: Position>(&self, position: &P) -> i32 {
        match position.terminal_state() {
            Some(TerminalReason::Checkmate) => {
                return -MATE_SCORE * position.side_to_move().sign();
            }
            Some(_) => return DRAW_SCORE,
            None => {}
        }

        let pieces: Vec<(Square, Color, Piece)> = Square::all()
            .filter_map(|sq| position.piece_at(sq).map(|(color, piece)| (sq, color, piece)))
            .collect();

        let phase = game_phase(pieces.iter().map(|&(_, _, piece)| piece));
        let mut bishops = [0u32; 2];
        let mut score = 0;

        for &(sq, color, piece) in &pieces {
            if piece == Piece::Bishop {
                bishops[color.index()] += 1;
            }
            let value = if piece == Piece::King { 0 } else { piece.value() };
            score += color.sign() * (value + square_bonus(piece, color, sq, phase));
        }

        for color in Color::BOTH {
            if bishops[color.index()] >= 2 {
                score += color.sign() * BISHOP_PAIR_BONUS;
            }
        }

        score
    }
}
