//! Core value types shared by the search and the position adapters:
//! - `Piece` and `Color`
//! - `Square` - compact board square (u8 index)
//! - `Move`, `MoveList`, `ScoredMoveList` - move representation and lists
//! - `CastlingRights` - castling state

mod castling;
mod moves;
mod piece;
mod square;

pub use castling::CastlingRights;
pub use moves::{Move, MoveList, ScoredMove, ScoredMoveList, MAX_PLY};
pub use piece::{Color, Piece};
pub use square::Square;
