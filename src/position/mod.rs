//! The game-rules boundary.
//!
//! The search never generates moves or applies rules itself. Everything it
//! needs from the game goes through [`Position`], which a rules backend
//! implements. [`ChessPosition`] is the bundled backend.

mod chess_board;

pub use chess_board::ChessPosition;

use crate::types::{CastlingRights, Color, Move, MoveList, Piece, Square};

/// Why a position has no game continuation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TerminalReason {
    Checkmate,
    Stalemate,
    InsufficientMaterial,
    Repetition,
    FiftyMoves,
}

impl TerminalReason {
    /// Every reason except checkmate ends the game drawn
    #[inline]
    #[must_use]
    pub const fn is_draw(self) -> bool {
        !matches!(self, TerminalReason::Checkmate)
    }
}

/// A mutable game position the search walks with push/pop.
///
/// `push` and `pop` must be exact inverses: after any balanced sequence the
/// position compares equal (same pieces, side, rights, counters and
/// repetition history) to where it started.
pub trait Position {
    /// All legal moves for the side to move
    fn legal_moves(&self) -> MoveList;

    /// Play a move taken from [`legal_moves`](Position::legal_moves)
    fn push(&mut self, mv: Move);

    /// Pass the turn. Must not be called while in check.
    fn push_null(&mut self);

    /// Undo the most recent `push` or `push_null`
    fn pop(&mut self);

    fn side_to_move(&self) -> Color;

    /// Is the side to move in check?
    fn is_check(&self) -> bool;

    /// Does `mv` capture a piece (including en passant)?
    fn is_capture(&self, mv: Move) -> bool;

    fn piece_at(&self, square: Square) -> Option<(Color, Piece)>;

    fn castling_rights(&self) -> CastlingRights;

    /// File (0-7) of the en passant target, if one is available
    fn en_passant_file(&self) -> Option<u8>;

    /// `Some` when the game is over in this position
    fn terminal_state(&self) -> Option<TerminalReason>;

    fn to_fen(&self) -> String;

    /// Does `mv` put the opponent in check?
    fn gives_check(&mut self, mv: Move) -> bool {
        self.push(mv);
        let check = self.is_check();
        self.pop();
        check
    }

    /// Kind of piece moving with `mv`
    fn moving_piece(&self, mv: Move) -> Option<Piece> {
        self.piece_at(mv.from()).map(|(_, piece)| piece)
    }

    /// Kind of piece `mv` captures. An en passant capture lands on an empty
    /// square and reports a pawn.
    fn captured_piece(&self, mv: Move) -> Option<Piece> {
        if !self.is_capture(mv) {
            return None;
        }
        Some(
            self.piece_at(mv.to())
                .map_or(Piece::Pawn, |(_, piece)| piece),
        )
    }
}
