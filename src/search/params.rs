#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tunable search parameters.
///
/// Persist across searches on the engine; change them with
/// [`Engine::params_mut`](crate::Engine::params_mut).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SearchParams {
    /// Base half-width of the aspiration window
    pub aspiration_delta: i32,
    /// The window widens by `|previous score| / aspiration_scale`
    pub aspiration_scale: i32,
    pub null_move: bool,
    /// Null move is tried only when depth is strictly greater than this
    pub null_min_depth: u32,
    pub null_reduction: u32,
    /// Reduction used above `null_deep_threshold`
    pub null_reduction_deep: u32,
    pub null_deep_threshold: u32,
    pub lmr: bool,
    pub lmr_min_depth: u32,
    /// Number of ordered moves searched at full depth before reducing
    pub lmr_min_move: usize,
    /// Resolve captures at the horizon; when off, leaves use static eval
    pub quiescence: bool,
    /// Halve history scores at the start of each search
    pub age_history: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        SearchParams {
            aspiration_delta: 30,
            aspiration_scale: 8,
            null_move: true,
            null_min_depth: 2,
            null_reduction: 2,
            null_reduction_deep: 3,
            null_deep_threshold: 6,
            lmr: true,
            lmr_min_depth: 3,
            lmr_min_move: 3,
            quiescence: true,
            age_history: true,
        }
    }
}

impl SearchParams {
    /// Plain alpha-beta: no null move, no reductions
    #[must_use]
    pub fn unpruned() -> Self {
        SearchParams {
            null_move: false,
            lmr: false,
            ..Self::default()
        }
    }

    /// Null-move reduction for a node at `depth`
    #[must_use]
    pub fn null_reduction_for(&self, depth: u32) -> u32 {
        if depth > self.null_deep_threshold {
            self.null_reduction_deep
        } else {
            self.null_reduction
        }
    }

    /// Aspiration half-width around `previous`
    #[must_use]
    pub fn aspiration_window(&self, previous: i32) -> i32 {
        self.aspiration_delta + previous.abs() / self.aspiration_scale.max(1)
    }
}
