//! Search module implementing alpha-beta with iterative deepening.
//!
//! Features:
//! - Iterative deepening with aspiration windows
//! - Negamax alpha-beta with null move pruning and LMR
//! - Quiescence search with stand-pat
//! - Move ordering (TT move, MVV-LVA, killers, history, checks)
//! - Transposition table for move ordering and cutoffs
//!
//! Everything the search learns between calls (TT, killers, history) lives on
//! one [`Engine`]; engines never share state.

mod constants;
mod heuristics;
mod iterative;
mod move_order;
mod negamax;
mod params;
mod quiescence;

#[cfg(test)]
mod tests;

use std::fmt;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::eval::{Evaluator, MaterialEvaluator};
use crate::position::Position;
use crate::tt::{TranspositionTable, DEFAULT_TT_ENTRIES};
use crate::types::Move;
use crate::zobrist::ZobristKeys;

pub use constants::{
    DEFAULT_MAX_DEPTH, DRAW_SCORE, INF_SCORE, MATE_SCORE, MATE_THRESHOLD,
};
pub use heuristics::{HistoryTable, KillerTable, KILLER_PLIES};
pub use move_order::{mvv_lva, MoveOrderer};
pub use params::SearchParams;

use negamax::SearchContext;

/// Statistics for one top-level search.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchInfo {
    /// Nodes visited, quiescence nodes included
    pub nodes: u64,
    /// Static evaluations performed
    pub evaluations: u64,
    /// Last fully completed iteration
    pub depth: u32,
    /// Deepest ply reached, quiescence included
    pub seldepth: u32,
    pub elapsed: Duration,
    /// Nodes settled by a transposition table entry
    pub tt_cutoffs: u64,
    /// Principal variation of the last completed iteration
    pub pv: Vec<Move>,
}

/// Result of [`Engine::search`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchOutcome {
    /// `None` only when the side to move has no legal moves
    pub best_move: Option<Move>,
    /// Score from the side to move's point of view
    pub score: i32,
    pub info: SearchInfo,
}

impl SearchOutcome {
    /// Moves to mate (positive when the side to move mates), if the score is
    /// a mate score
    #[must_use]
    pub fn mate_in(&self) -> Option<i32> {
        mate_in(self.score)
    }
}

pub(crate) fn mate_in(score: i32) -> Option<i32> {
    if score.abs() < MATE_THRESHOLD {
        None
    } else if score > 0 {
        Some((MATE_SCORE - score + 1) / 2)
    } else {
        Some(-(MATE_SCORE + score + 1) / 2)
    }
}

/// Information about a completed search iteration.
#[derive(Debug, Clone)]
pub struct IterationReport {
    pub depth: u32,
    pub seldepth: u32,
    pub score: i32,
    pub mate_in: Option<i32>,
    pub nodes: u64,
    pub elapsed: Duration,
    /// Transposition table fullness in per mille
    pub hashfull: u32,
    pub pv: Vec<Move>,
}

/// Callback type for iteration info.
pub type SearchInfoCallback = Arc<dyn Fn(&IterationReport) + Send + Sync>;

/// Configuration for a search operation.
///
/// ```ignore
/// let config = SearchConfig::depth(6).with_time_limit(Duration::from_millis(200));
/// let outcome = engine.search(&mut position, config);
/// ```
#[derive(Clone, Default)]
pub struct SearchConfig {
    /// Maximum depth to search (None = `DEFAULT_MAX_DEPTH`)
    pub max_depth: Option<u32>,
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
    /// Set from another thread to stop the search early
    pub stop: Option<Arc<AtomicBool>>,
    /// Optional callback for iteration info
    pub info_callback: Option<SearchInfoCallback>,
}

impl SearchConfig {
    /// Create a depth-limited search config
    #[must_use]
    pub fn depth(max_depth: u32) -> Self {
        SearchConfig {
            max_depth: Some(max_depth),
            ..Default::default()
        }
    }

    /// Create a time-limited search config
    #[must_use]
    pub fn time(limit: Duration) -> Self {
        Self::default().with_time_limit(limit)
    }

    #[must_use]
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = Some(limit);
        self
    }

    /// Set node limit
    #[must_use]
    pub fn with_node_limit(mut self, node_limit: u64) -> Self {
        self.node_limit = Some(node_limit);
        self
    }

    #[must_use]
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    /// Attach a callback for iteration info reporting.
    #[must_use]
    pub fn with_info_callback(mut self, callback: SearchInfoCallback) -> Self {
        self.info_callback = Some(callback);
        self
    }
}

impl fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchConfig")
            .field("max_depth", &self.max_depth)
            .field("time_limit", &self.time_limit)
            .field("node_limit", &self.node_limit)
            .field("stop", &self.stop.is_some())
            .field("info_callback", &self.info_callback.is_some())
            .finish()
    }
}

/// Limits checked while searching
pub(crate) struct SearchLimits {
    pub start: Instant,
    pub time_limit: Option<Duration>,
    pub node_limit: Option<u64>,
    pub stop: Option<Arc<AtomicBool>>,
}

/// Search state persisted across searches
#[derive(Debug)]
pub struct SearchState {
    pub(crate) zobrist: ZobristKeys,
    pub(crate) tt: TranspositionTable,
    pub(crate) orderer: MoveOrderer,
    pub(crate) params: SearchParams,
}

impl SearchState {
    #[must_use]
    pub fn new(tt_entries: usize) -> Self {
        SearchState {
            zobrist: ZobristKeys::new(),
            tt: TranspositionTable::new(tt_entries),
            orderer: MoveOrderer::new(),
            params: SearchParams::default(),
        }
    }

    pub fn new_search(&mut self) {
        self.tt.new_search();
        self.orderer.new_search(self.params.age_history);
    }
}

impl Default for SearchState {
    fn default() -> Self {
        SearchState::new(DEFAULT_TT_ENTRIES)
    }
}

/// A search engine: evaluator plus the tables it keeps between searches.
pub struct Engine<E = MaterialEvaluator> {
    evaluator: E,
    state: SearchState,
}

impl Engine<MaterialEvaluator> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_evaluator(MaterialEvaluator)
    }
}

impl Default for Engine<MaterialEvaluator> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Evaluator> Engine<E> {
    #[must_use]
    pub fn with_evaluator(evaluator: E) -> Self {
        Engine {
            evaluator,
            state: SearchState::default(),
        }
    }

    /// Replace the transposition table with one of `entries` slots
    #[must_use]
    pub fn with_tt_capacity(mut self, entries: usize) -> Self {
        self.state.tt = TranspositionTable::new(entries);
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: SearchParams) -> Self {
        self.state.params = params;
        self
    }

    /// Search `position` and return the best move with its score.
    ///
    /// The position is restored before returning. A position without legal
    /// moves yields no move and its terminal score.
    pub fn search<P: Position>(&mut self, position: &mut P, config: SearchConfig) -> SearchOutcome {
        self.state.new_search();
        let max_depth = config.max_depth.unwrap_or(DEFAULT_MAX_DEPTH).max(1);
        let limits = SearchLimits {
            start: Instant::now(),
            time_limit: config.time_limit,
            node_limit: config.node_limit,
            stop: config.stop,
        };

        let mut ctx = SearchContext::new(position, &self.evaluator, &mut self.state, limits);
        let (best_move, score) = ctx.iterative_deepening(max_depth, config.info_callback.as_ref());

        SearchOutcome {
            best_move,
            score,
            info: ctx.finish(),
        }
    }

    /// Quiescence search of `position` inside `(alpha, beta)`, from the side
    /// to move's point of view
    pub fn quiescence<P: Position>(
        &mut self,
        position: &mut P,
        alpha: i32,
        beta: i32,
    ) -> (i32, SearchInfo) {
        let limits = SearchLimits {
            start: Instant::now(),
            time_limit: None,
            node_limit: None,
            stop: None,
        };
        let mut ctx = SearchContext::new(position, &self.evaluator, &mut self.state, limits);
        let score = ctx.quiescence_root(alpha, beta);
        (score, ctx.finish())
    }

    /// Static evaluation from the side to move's point of view
    pub fn evaluate_relative<P: Position>(&self, position: &P) -> i32 {
        self.evaluator.evaluate(position) * position.side_to_move().sign()
    }

    /// Zobrist fingerprint of `position`
    pub fn hash<P: Position>(&self, position: &P) -> u64 {
        self.state.zobrist.hash(position)
    }

    /// Forget everything learned: TT, killers and history
    pub fn new_game(&mut self) {
        self.state.tt.clear();
        self.state.orderer.clear();
    }

    #[must_use]
    pub fn tt(&self) -> &TranspositionTable {
        &self.state.tt
    }

    #[must_use]
    pub fn orderer(&self) -> &MoveOrderer {
        &self.state.orderer
    }

    #[must_use]
    pub fn params(&self) -> &SearchParams {
        &self.state.params
    }

    pub fn params_mut(&mut self) -> &mut SearchParams {
        &mut self.state.params
    }

    #[must_use]
    pub fn evaluator(&self) -> &E {
        &self.evaluator
    }
}

impl<E> fmt::Debug for Engine<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
