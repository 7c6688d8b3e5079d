//! Move types and move lists.

use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::piece::Piece;
use super::square::Square;
use crate::error::PositionError;

/// Compact 16-bit move representation.
///
/// Encoding:
/// - bits 0-5:   from square (0-63)
/// - bits 6-11:  to square (0-63)
/// - bits 12-14: promotion piece (0 = none, 1 = N, 2 = B, 3 = R, 4 = Q)
///
/// Capture, castling and en passant are properties of the position the move
/// is played in; ask the [`Position`](crate::Position) adapter for them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Move(u16);

impl Move {
    /// The reserved null move (a1a1). Never produced by move generation.
    pub const NULL: Move = Move(0);

    /// Create a move, optionally promoting to `promotion`
    #[inline]
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Piece>) -> Self {
        let promo = match promotion {
            Some(piece) => piece.promotion_code(),
            None => 0,
        };
        Move(from.index() as u16 | ((to.index() as u16) << 6) | (promo << 12))
    }

    /// Create a non-promoting move
    #[inline]
    #[must_use]
    pub const fn quiet(from: Square, to: Square) -> Self {
        Move::new(from, to, None)
    }

    /// Get the source square
    #[inline]
    #[must_use]
    pub const fn from(self) -> Square {
        Square::from_bits(self.0)
    }

    /// Get the destination square
    #[inline]
    #[must_use]
    pub const fn to(self) -> Square {
        Square::from_bits(self.0 >> 6)
    }

    /// Get the promotion piece, if this is a promotion move
    #[inline]
    #[must_use]
    pub const fn promotion(self) -> Option<Piece> {
        Piece::from_promotion_code((self.0 >> 12) & 0x7)
    }

    #[inline]
    #[must_use]
    pub const fn is_promotion(self) -> bool {
        (self.0 >> 12) & 0x7 != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == Move::NULL.0
    }
}

impl Default for Move {
    fn default() -> Self {
        Move::NULL
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Move({self})")
    }
}

/// UCI long algebraic notation (`e2e4`, `e7e8q`); the null move prints as `0000`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            return f.write_str("0000");
        }
        write!(f, "{}{}", self.from(), self.to())?;
        if let Some(promo) = self.promotion() {
            write!(f, "{}", promo.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = PositionError;

    /// Parse UCI notation. The result is syntactically valid only; legality
    /// is checked by the position adapter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PositionError::InvalidMove {
            notation: s.to_string(),
        };
        if !(4..=5).contains(&s.len()) || !s.is_ascii() {
            return Err(invalid());
        }
        let from: Square = s[0..2].parse().map_err(|_| invalid())?;
        let to: Square = s[2..4].parse().map_err(|_| invalid())?;
        let promotion = match s[4..].chars().next() {
            None => None,
            Some(c) => match Piece::from_char(c) {
                Some(piece) if Piece::PROMOTIONS.contains(&piece) => Some(piece),
                _ => return Err(invalid()),
            },
        };
        Ok(Move::new(from, to, promotion))
    }
}

pub(crate) const MAX_MOVES: usize = 256;

/// Maximum search ply tracked by ply-indexed tables
pub const MAX_PLY: usize = 128;

/// List of moves with fixed-size backing array.
#[derive(Clone)]
pub struct MoveList {
    moves: [Move; MAX_MOVES],
    len: usize,
}

impl MoveList {
    #[must_use]
    pub fn new() -> Self {
        MoveList {
            moves: [Move::NULL; MAX_MOVES],
            len: 0,
        }
    }

    /// Append a move. Moves past the 256-entry capacity are dropped; no legal
    /// chess position comes close to that bound.
    pub fn push(&mut self, mv: Move) {
        if self.len < MAX_MOVES {
            self.moves[self.len] = mv;
            self.len += 1;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Move] {
        &self.moves[..self.len]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.as_slice().iter()
    }

    #[must_use]
    pub fn contains(&self, mv: Move) -> bool {
        self.as_slice().contains(&mv)
    }
}

impl Default for MoveList {
    fn default() -> Self {
        MoveList::new()
    }
}

impl fmt::Debug for MoveList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.as_slice().iter()
    }
}

impl FromIterator<Move> for MoveList {
    fn from_iter<I: IntoIterator<Item = Move>>(iter: I) -> Self {
        let mut list = MoveList::new();
        for mv in iter {
            list.push(mv);
        }
        list
    }
}

/// A scored move for move ordering.
#[derive(Clone, Copy, Debug)]
pub struct ScoredMove {
    pub mv: Move,
    pub score: i32,
}

/// Fixed-size list of scored moves to avoid heap allocation.
#[derive(Clone, Debug)]
pub struct ScoredMoveList {
    moves: [ScoredMove; MAX_MOVES],
    len: usize,
}

impl ScoredMoveList {
    #[must_use]
    pub fn new() -> Self {
        ScoredMoveList {
            moves: [ScoredMove {
                mv: Move::NULL,
                score: 0,
            }; MAX_MOVES],
            len: 0,
        }
    }

    #[inline]
    pub fn push(&mut self, mv: Move, score: i32) {
        if self.len < MAX_MOVES {
            self.moves[self.len] = ScoredMove { mv, score };
            self.len += 1;
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn as_slice(&self) -> &[ScoredMove] {
        &self.moves[..self.len]
    }

    /// Sort moves by score in descending order. The sort is stable, so equal
    /// scores keep their generation order.
    pub fn sort_by_score_desc(&mut self) {
        self.moves[..self.len].sort_by(|a, b| b.score.cmp(&a.score));
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ScoredMove> {
        self.as_slice().iter()
    }

    /// The moves in their current order
    pub fn moves(&self) -> impl Iterator<Item = Move> + '_ {
        self.iter().map(|scored| scored.mv)
    }
}

impl Default for ScoredMoveList {
    fn default() -> Self {
        ScoredMoveList::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> Square {
        s.parse().expect("valid square")
    }

    #[test]
    fn test_move_fields() {
        let mv = Move::new(sq("e7"), sq("e8"), Some(Piece::Queen));
        assert_eq!(mv.from(), sq("e7"));
        assert_eq!(mv.to(), sq("e8"));
        assert_eq!(mv.promotion(), Some(Piece::Queen));
        assert_eq!(mv.to_string(), "e7e8q");
    }

    #[test]
    fn test_null_move_is_distinct() {
        let mv = Move::quiet(sq("a1"), sq("a2"));
        assert!(Move::NULL.is_null());
        assert!(!mv.is_null());
        assert_eq!(Move::NULL.to_string(), "0000");
    }

    #[test]
    fn test_parse_uci() {
        let mv: Move = "g1f3".parse().expect("valid move");
        assert_eq!(mv, Move::quiet(sq("g1"), sq("f3")));
        assert!("g1f3k".parse::<Move>().is_err());
        assert!("g1".parse::<Move>().is_err());
        assert!("z1f3".parse::<Move>().is_err());
    }

    #[test]
    fn test_sort_is_stable() {
        let a = Move::quiet(sq("a2"), sq("a3"));
        let b = Move::quiet(sq("b2"), sq("b3"));
        let c = Move::quiet(sq("c2"), sq("c3"));
        let mut list = ScoredMoveList::new();
        list.push(a, 5);
        list.push(b, 10);
        list.push(c, 5);
        list.sort_by_score_desc();
        let order: Vec<Move> = list.moves().collect();
        assert_eq!(order, vec![b, a, c]);
    }
}
