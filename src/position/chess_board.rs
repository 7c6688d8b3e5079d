//! [`Position`] backed by the `chess` crate's move generator.
//!
//! `chess::Board` is an immutable value type, so push keeps the previous board
//! on an undo stack and pop restores it. On top of it this adapter tracks the
//! game rules the board value does not know about: the halfmove clock, the
//! fullmove number and the hash history used for repetition detection.

use std::fmt;
use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, MoveGen, ALL_SQUARES, EMPTY};

use super::{Position, TerminalReason};
use crate::error::PositionError;
use crate::types::{CastlingRights, Color, Move, MoveList, Piece, Square};

/// Halfmove clock value at which the fifty-move rule draws
const FIFTY_MOVE_PLIES: u32 = 100;

pub(crate) const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

#[derive(Clone, Copy)]
struct Undo {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    repetition_floor: usize,
}

/// A chess game position with full rule tracking.
#[derive(Clone)]
pub struct ChessPosition {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    undo_stack: Vec<Undo>,
    /// Board hashes of every position reached, current position last
    hash_history: Vec<u64>,
    /// Index into `hash_history` before which no repetition can match,
    /// moved forward by null moves
    repetition_floor: usize,
}

impl ChessPosition {
    /// The standard starting position
    #[must_use]
    pub fn startpos() -> Self {
        Self::from_board(Board::default(), 0, 1)
    }

    /// Parse a position from FEN.
    ///
    /// The halfmove clock and fullmove number are optional and default to
    /// `0` and `1`.
    pub fn from_fen(fen: &str) -> Result<Self, PositionError> {
        let invalid = |reason: String| PositionError::InvalidFen {
            fen: fen.to_string(),
            reason,
        };

        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(invalid(format!(
                "expected at least 4 fields, found {}",
                fields.len()
            )));
        }

        let board = Board::from_str(&fields[..4].join(" ")).map_err(|e| invalid(e.to_string()))?;

        let halfmove_clock = match fields.get(4) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| invalid(format!("invalid halfmove clock '{field}'")))?,
            None => 0,
        };
        let fullmove_number = match fields.get(5) {
            Some(field) => field
                .parse::<u32>()
                .map_err(|_| invalid(format!("invalid fullmove number '{field}'")))?,
            None => 1,
        };

        Ok(Self::from_board(board, halfmove_clock, fullmove_number.max(1)))
    }

    fn from_board(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        ChessPosition {
            board,
            halfmove_clock,
            fullmove_number,
            undo_stack: Vec::with_capacity(256),
            hash_history: vec![board.get_hash()],
            repetition_floor: 0,
        }
    }

    /// Play a move given in UCI notation, checking legality
    pub fn play_uci(&mut self, uci: &str) -> Result<(), PositionError> {
        let mv: Move = uci.parse()?;
        if !self.legal_moves().contains(mv) {
            return Err(PositionError::IllegalMove {
                notation: uci.to_string(),
            });
        }
        self.push(mv);
        Ok(())
    }

    /// Play a sequence of UCI moves, stopping at the first illegal one
    pub fn play_uci_moves<'a, I>(&mut self, moves: I) -> Result<(), PositionError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        moves.into_iter().try_for_each(|uci| self.play_uci(uci))
    }

    #[must_use]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[must_use]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// The underlying board value
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    fn save_undo(&mut self) {
        self.undo_stack.push(Undo {
            board: self.board,
            halfmove_clock: self.halfmove_clock,
            fullmove_number: self.fullmove_number,
            repetition_floor: self.repetition_floor,
        });
    }

    fn advance_fullmove(&mut self) {
        if self.board.side_to_move() == chess::Color::Black {
            self.fullmove_number += 1;
        }
    }

    fn is_repetition(&self) -> bool {
        let Some((&current, earlier)) = self.hash_history.split_last() else {
            return false;
        };
        // Only positions since the last irreversible move can repeat
        let reversible = self.halfmove_clock as usize;
        let start = earlier
            .len()
            .saturating_sub(reversible)
            .max(self.repetition_floor);
        let earlier_matches = earlier[start.min(earlier.len())..]
            .iter()
            .rev()
            .skip(1)
            .step_by(2)
            .filter(|&&hash| hash == current)
            .count();
        earlier_matches >= 2
    }

    fn is_insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = *board.pieces(chess::Piece::Pawn)
            | *board.pieces(chess::Piece::Rook)
            | *board.pieces(chess::Piece::Queen);
        if heavy != EMPTY {
            return false;
        }
        let knights = *board.pieces(chess::Piece::Knight);
        let bishops = *board.pieces(chess::Piece::Bishop);
        if (knights | bishops).popcnt() <= 1 {
            return true;
        }
        if knights != EMPTY {
            return false;
        }
        let light = bishops
            .filter(|&sq| Square::from_bits(sq.to_index() as u16).is_light())
            .count() as u32;
        light == 0 || light == bishops.popcnt()
    }
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::startpos()
    }
}

impl FromStr for ChessPosition {
    type Err = PositionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl PartialEq for ChessPosition {
    fn eq(&self, other: &Self) -> bool {
        self.board == other.board
            && self.halfmove_clock == other.halfmove_clock
            && self.fullmove_number == other.fullmove_number
            && self.hash_history == other.hash_history
            && self.repetition_floor == other.repetition_floor
    }
}

impl fmt::Debug for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ChessPosition").field(&self.to_fen()).finish()
    }
}

impl fmt::Display for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl Position for ChessPosition {
    fn legal_moves(&self) -> MoveList {
        MoveGen::new_legal(&self.board).map(from_chess_move).collect()
    }

    fn push(&mut self, mv: Move) {
        let chess_move = to_chess_move(mv);
        let resets_clock = self.board.piece_on(chess_move.get_source()) == Some(chess::Piece::Pawn)
            || self.is_capture(mv);

        self.save_undo();
        self.advance_fullmove();
        self.halfmove_clock = if resets_clock {
            0
        } else {
            self.halfmove_clock + 1
        };
        self.board = self.board.make_move_new(chess_move);
        self.hash_history.push(self.board.get_hash());
    }

    fn push_null(&mut self) {
        self.save_undo();
        self.advance_fullmove();
        if let Some(passed) = self.board.null_move() {
            self.board = passed;
        } else {
            log::warn!("null move requested in check: {}", self.to_fen());
        }
        self.hash_history.push(self.board.get_hash());
        // A pass is not a legal game move, so nothing before it can repeat
        self.repetition_floor = self.hash_history.len() - 1;
    }

    fn pop(&mut self) {
        if let Some(undo) = self.undo_stack.pop() {
            self.board = undo.board;
            self.halfmove_clock = undo.halfmove_clock;
            self.fullmove_number = undo.fullmove_number;
            self.repetition_floor = undo.repetition_floor;
            self.hash_history.pop();
        }
    }

    fn side_to_move(&self) -> Color {
        from_chess_color(self.board.side_to_move())
    }

    fn is_check(&self) -> bool {
        *self.board.checkers() != EMPTY
    }

    fn is_capture(&self, mv: Move) -> bool {
        let dest = ALL_SQUARES[mv.to().index()];
        if self.board.piece_on(dest).is_some() {
            return true;
        }
        // En passant: a pawn changing file onto an empty square
        self.board.piece_on(ALL_SQUARES[mv.from().index()]) == Some(chess::Piece::Pawn)
            && mv.from().file() != mv.to().file()
    }

    fn piece_at(&self, square: Square) -> Option<(Color, Piece)> {
        let sq = ALL_SQUARES[square.index()];
        let piece = self.board.piece_on(sq)?;
        let color = self.board.color_on(sq)?;
        Some((from_chess_color(color), from_chess_piece(piece)))
    }

    fn castling_rights(&self) -> CastlingRights {
        let mut rights = CastlingRights::none();
        for color in Color::BOTH {
            let castle = self.board.castle_rights(to_chess_color(color));
            if castle.has_kingside() {
                rights.set(color, true);
            }
            if castle.has_queenside() {
                rights.set(color, false);
            }
        }
        rights
    }

    fn en_passant_file(&self) -> Option<u8> {
        self.board
            .en_passant()
            .map(|sq| sq.get_file().to_index() as u8)
    }

    fn terminal_state(&self) -> Option<TerminalReason> {
        match self.board.status() {
            BoardStatus::Checkmate => return Some(TerminalReason::Checkmate),
            BoardStatus::Stalemate => return Some(TerminalReason::Stalemate),
            BoardStatus::Ongoing => {}
        }
        if self.is_insufficient_material() {
            Some(TerminalReason::InsufficientMaterial)
        } else if self.halfmove_clock >= FIFTY_MOVE_PLIES {
            Some(TerminalReason::FiftyMoves)
        } else if self.is_repetition() {
            Some(TerminalReason::Repetition)
        } else {
            None
        }
    }

    fn to_fen(&self) -> String {
        // The board value prints placeholder counters; substitute ours
        let board_fen = self.board.to_string();
        let fields: Vec<&str> = board_fen.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            fields.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    fn gives_check(&mut self, mv: Move) -> bool {
        *self.board.make_move_new(to_chess_move(mv)).checkers() != EMPTY
    }
}

fn to_chess_move(mv: Move) -> ChessMove {
    ChessMove::new(
        ALL_SQUARES[mv.from().index()],
        ALL_SQUARES[mv.to().index()],
        mv.promotion().map(to_chess_piece),
    )
}

fn from_chess_move(mv: ChessMove) -> Move {
    Move::new(
        Square::from_bits(mv.get_source().to_index() as u16),
        Square::from_bits(mv.get_dest().to_index() as u16),
        mv.get_promotion().map(from_chess_piece),
    )
}

fn to_chess_piece(piece: Piece) -> chess::Piece {
    match piece {
        Piece::Pawn => chess::Piece::Pawn,
        Piece::Knight => chess::Piece::Knight,
        Piece::Bishop => chess::Piece::Bishop,
        Piece::Rook => chess::Piece::Rook,
        Piece::Queen => chess::Piece::Queen,
        Piece::King => chess::Piece::King,
    }
}

fn from_chess_piece(piece: chess::Piece) -> Piece {
    match piece {
        chess::Piece::Pawn => Piece::Pawn,
        chess::Piece::Knight => Piece::Knight,
        chess::Piece::Bishop => Piece::Bishop,
        chess::Piece::Rook => Piece::Rook,
        chess::Piece::Queen => Piece::Queen,
        chess::Piece::King => Piece::King,
    }
}

fn to_chess_color(color: Color) -> chess::Color {
    match color {
        Color::White => chess::Color::White,
        Color::Black => chess::Color::Black,
    }
}

fn from_chess_color(color: chess::Color) -> Color {
    match color {
        chess::Color::White => Color::White,
        chess::Color::Black => Color::Black,
    }
}
