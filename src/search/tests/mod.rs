//! Search module tests.
//!
//! Tests are organized into separate files by category:
//! - `search_tables.rs` - Killer, history and move ordering
//! - `negamax.rs` - Alpha-beta against plain minimax, quiescence
//! - `proptest.rs` - Property-based tests

mod proptest;
