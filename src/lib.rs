//! Alpha-beta game-tree search for chess.
//!
//! The search core is game-rules agnostic: it talks to the game through the
//! [`Position`] trait and scores leaves with an [`Evaluator`]. A rules backend
//! built on the `chess` crate ([`ChessPosition`]) and a material plus
//! piece-square evaluator ([`MaterialEvaluator`]) are bundled.
//!
//! ```no_run
//! use chess_search::{ChessPosition, Engine, SearchConfig};
//!
//! let mut position = ChessPosition::startpos();
//! let mut engine = Engine::new();
//! let outcome = engine.search(&mut position, SearchConfig::depth(6));
//! println!("{:?} {}", outcome.best_move, outcome.score);
//! ```

pub mod error;
pub mod eval;
pub mod position;
pub mod search;
pub mod tt;
pub mod types;
pub mod zobrist;

pub use error::{PositionError, SquareError};
pub use eval::{Evaluator, MaterialEvaluator};
pub use position::{ChessPosition, Position, TerminalReason};
pub use search::{
    Engine, IterationReport, SearchConfig, SearchInfo, SearchInfoCallback, SearchOutcome,
    SearchParams, DRAW_SCORE, INF_SCORE, MATE_SCORE,
};
pub use tt::{BoundType, TTEntry, TranspositionTable};
pub use types::{CastlingRights, Color, Move, MoveList, Piece, Square, MAX_PLY};
pub use zobrist::ZobristKeys;
