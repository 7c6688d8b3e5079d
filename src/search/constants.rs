//! Search constants.
//!
//! Scores and the move ordering priorities used by the alpha-beta search.

use crate::types::MAX_PLY;

// ============================================================================
// SCORES
// ============================================================================

/// Score of being checkmated at the root; a mate `n` plies away scores
/// `MATE_SCORE - n` for the winning side
pub const MATE_SCORE: i32 = 30000;

/// Bound wider than any reachable score
pub const INF_SCORE: i32 = 32000;

/// Scores with absolute value >= this are considered checkmate scores
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

pub const DRAW_SCORE: i32 = 0;

// ============================================================================
// SEARCH LIMITS
// ============================================================================

/// Depth used when a search config names none
pub const DEFAULT_MAX_DEPTH: u32 = 64;

/// The clock is read once per this many nodes (power of two)
pub(crate) const TIME_CHECK_INTERVAL: u64 = 1024;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores = tried earlier. Ordered: TT > captures > promotions >
// killers > history > checks > quiet

/// Hash move (from transposition table) - highest priority
pub const TT_MOVE_SCORE: i32 = 2_000_000;

/// Base for captures; MVV-LVA is added on top
pub const CAPTURE_SCORE: i32 = 1_000_000;

/// Base for quiet promotions; the promoted piece value is added on top
pub const PROMOTION_SCORE: i32 = 800_000;

/// Killer moves; the most recent killer gets one extra point
pub const KILLER_SCORE: i32 = 700_000;

/// Base for quiet moves with a history score
pub const HISTORY_SCORE: i32 = 600_000;

/// History contribution is capped below the next band
pub const HISTORY_CAP: i32 = 99_999;

/// Quiet moves that give check
pub const CHECK_SCORE: i32 = 500_000;
