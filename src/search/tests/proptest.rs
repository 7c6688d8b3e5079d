//! Property-based tests using proptest.

use std::cell::RefCell;

use crate::position::{ChessPosition, Position, TerminalReason};
use crate::search::{mate_in, Engine, KillerTable, SearchConfig, SearchParams, MATE_SCORE};
use crate::tt::{BoundType, TranspositionTable};
use crate::types::{CastlingRights, Color, Move, MoveList, Piece, Square};
use crate::zobrist::ZobristKeys;
use proptest::prelude::*;
use rand::prelude::*;

const POSITIONS: [&str; 4] = [
    "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
    "r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 3 3",
    "4k3/8/8/3q4/2P5/8/8/3QK3 w - - 0 1",
    "8/8/8/4k3/8/8/3R4/3K4 w - - 0 1",
];

/// A position that hands out its legal moves in a random order
struct ShuffledPosition {
    inner: ChessPosition,
    rng: RefCell<StdRng>,
}

impl ShuffledPosition {
    fn new(fen: &str, seed: u64) -> Self {
        ShuffledPosition {
            inner: ChessPosition::from_fen(fen).expect("valid FEN"),
            rng: RefCell::new(StdRng::seed_from_u64(seed)),
        }
    }
}

impl Position for ShuffledPosition {
    fn legal_moves(&self) -> MoveList {
        let mut moves: Vec<Move> = self.inner.legal_moves().iter().copied().collect();
        moves.shuffle(&mut *self.rng.borrow_mut());
        moves.into_iter().collect()
    }

    fn push(&mut self, mv: Move) {
        self.inner.push(mv);
    }

    fn push_null(&mut self) {
        self.inner.push_null();
    }

    fn pop(&mut self) {
        self.inner.pop();
    }

    fn side_to_move(&self) -> Color {
        self.inner.side_to_move()
    }

    fn is_check(&self) -> bool {
        self.inner.is_check()
    }

    fn is_capture(&self, mv: Move) -> bool {
        self.inner.is_capture(mv)
    }

    fn piece_at(&self, square: Square) -> Option<(Color, Piece)> {
        self.inner.piece_at(square)
    }

    fn castling_rights(&self) -> CastlingRights {
        self.inner.castling_rights()
    }

    fn en_passant_file(&self) -> Option<u8> {
        self.inner.en_passant_file()
    }

    fn terminal_state(&self) -> Option<TerminalReason> {
        self.inner.terminal_state()
    }

    fn to_fen(&self) -> String {
        self.inner.to_fen()
    }
}

fn bound_strategy() -> impl Strategy<Value = BoundType> {
    prop_oneof![
        Just(BoundType::Exact),
        Just(BoundType::LowerBound),
        Just(BoundType::UpperBound),
    ]
}

/// Play up to `plies` random legal moves, returning how many were played
fn random_playout(pos: &mut ChessPosition, rng: &mut StdRng, plies: usize) -> usize {
    let mut played = 0;
    for _ in 0..plies {
        let moves = pos.legal_moves();
        let Some(&mv) = moves.as_slice().choose(rng) else {
            break;
        };
        pos.push(mv);
        played += 1;
    }
    played
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Property: without pruning, the root score does not depend on move order
    #[test]
    fn prop_score_independent_of_move_order(seed in any::<u64>(), index in 0..POSITIONS.len()) {
        let fen = POSITIONS[index];
        let mut plain = ChessPosition::from_fen(fen).expect("valid FEN");
        let mut shuffled = ShuffledPosition::new(fen, seed);

        let expected = Engine::new()
            .with_tt_capacity(1 << 14)
            .with_params(SearchParams::unpruned())
            .search(&mut plain, SearchConfig::depth(2));
        let outcome = Engine::new()
            .with_tt_capacity(1 << 14)
            .with_params(SearchParams::unpruned())
            .search(&mut shuffled, SearchConfig::depth(2));

        prop_assert_eq!(outcome.score, expected.score);
        prop_assert_eq!(shuffled.inner, plain);
    }

    /// Property: push followed by pop restores the position and its hash
    #[test]
    fn prop_push_pop_restores_state(seed in any::<u64>(), plies in 1..=40usize) {
        let keys = ZobristKeys::new();
        let mut pos = ChessPosition::startpos();
        let mut rng = StdRng::seed_from_u64(seed);
        let initial = pos.clone();
        let initial_hash = keys.hash(&pos);

        let played = random_playout(&mut pos, &mut rng, plies);
        for _ in 0..played {
            pos.pop();
        }

        prop_assert_eq!(keys.hash(&pos), initial_hash);
        prop_assert_eq!(pos.to_fen(), initial.to_fen());
        prop_assert_eq!(pos, initial);
    }

    /// Property: a null move only flips the side key
    #[test]
    fn prop_null_move_flips_side_key(seed in any::<u64>(), plies in 0..=20usize) {
        let keys = ZobristKeys::new();
        let mut pos = ChessPosition::startpos();
        let mut rng = StdRng::seed_from_u64(seed);
        random_playout(&mut pos, &mut rng, plies);
        prop_assume!(!pos.is_check() && pos.en_passant_file().is_none());

        let before = keys.hash(&pos);
        let side = pos.side_to_move();
        pos.push_null();
        let after = keys.hash(&pos);
        pos.pop();

        prop_assert_eq!(
            after,
            before ^ keys.side_key(side) ^ keys.side_key(side.opponent())
        );
        prop_assert_eq!(keys.hash(&pos), before);
    }

    /// Property: a stored entry reads back unchanged from a fresh table
    #[test]
    fn prop_tt_store_lookup(
        fingerprint in any::<u64>(),
        value in -MATE_SCORE..=MATE_SCORE,
        depth in 0u32..64,
        bound in bound_strategy(),
        move_index in 0usize..20,
    ) {
        let moves = ChessPosition::startpos().legal_moves();
        let best_move = moves.as_slice().get(move_index).copied();

        let mut tt = TranspositionTable::new(1 << 10);
        tt.store(fingerprint, value, depth, bound, best_move);

        let entry = tt.lookup(fingerprint).expect("entry stored");
        prop_assert_eq!(entry.value, value);
        prop_assert_eq!(u32::from(entry.depth), depth);
        prop_assert_eq!(entry.bound, bound);
        prop_assert_eq!(entry.best_move, best_move);
        prop_assert!(tt.lookup(fingerprint ^ 1).is_none());
    }

    /// Property: the newest killer is always primary, and the two differ
    #[test]
    fn prop_killer_slots(updates in prop::collection::vec((0usize..4, 0usize..20), 1..50)) {
        let moves = ChessPosition::startpos().legal_moves();
        let mut killers = KillerTable::new();
        let mut last = [Move::NULL; 4];

        for (ply, index) in updates {
            let mv = moves.as_slice()[index];
            killers.update(ply, mv);
            last[ply] = mv;
        }

        for (ply, &mv) in last.iter().enumerate() {
            prop_assert_eq!(killers.primary(ply), mv);
            if !killers.secondary(ply).is_null() {
                prop_assert_ne!(killers.primary(ply), killers.secondary(ply));
            }
        }
    }

    /// Property: mate distance is recovered from a ply-adjusted mate score
    #[test]
    fn prop_mate_in_from_ply(ply in 1i32..100) {
        prop_assert_eq!(mate_in(MATE_SCORE - ply), Some((ply + 1) / 2));
        prop_assert_eq!(mate_in(-MATE_SCORE + ply), Some(-((ply + 1) / 2)));
        prop_assert_eq!(mate_in(ply), None);
    }
}
