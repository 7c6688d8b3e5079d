//! Zobrist hashing for positions.
//!
//! Keys are generated once per engine from a fixed seed, so fingerprints are
//! reproducible across runs. The hash covers piece placement, side to move,
//! castling rights and en passant file; move counters are not part of it.

use rand::prelude::*;

use crate::position::Position;
use crate::types::{CastlingRights, Color, Piece, Square};

/// Seed for the default key set
pub const DEFAULT_SEED: u64 = 1234567890;

#[derive(Clone)]
pub struct ZobristKeys {
    // piece_keys[color][piece_type][square_index]
    piece_keys: [[[u64; Square::COUNT]; 6]; 2],
    // side_keys[color]: XORed for the side to move
    side_keys: [u64; 2],
    // one key per castling-rights combination
    castling_keys: [u64; CastlingRights::COMBINATIONS],
    // en_passant_keys[file_index] (only file matters for EP target)
    en_passant_keys: [u64; 8],
}

impl ZobristKeys {
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }

    /// Generate an independent key set from `seed`
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut piece_keys = [[[0; Square::COUNT]; 6]; 2];
        let mut side_keys = [0; 2];
        let mut castling_keys = [0; CastlingRights::COMBINATIONS];
        let mut en_passant_keys = [0; 8];

        for color in &mut piece_keys {
            for piece in color.iter_mut() {
                for key in piece.iter_mut() {
                    *key = rng.gen();
                }
            }
        }

        for key in &mut side_keys {
            *key = rng.gen();
        }

        for key in &mut castling_keys {
            *key = rng.gen();
        }

        for key in &mut en_passant_keys {
            *key = rng.gen();
        }

        ZobristKeys {
            piece_keys,
            side_keys,
            castling_keys,
            en_passant_keys,
        }
    }

    /// Full fingerprint of `position`
    pub fn hash<P: Position>(&self, position: &P) -> u64 {
        let mut hash = Square::all()
            .filter_map(|sq| {
                position
                    .piece_at(sq)
                    .map(|(color, piece)| self.piece_key(color, piece, sq))
            })
            .fold(0, |acc, key| acc ^ key);

        hash ^= self.side_key(position.side_to_move());
        hash ^= self.castling_key(position.castling_rights());
        if let Some(file) = position.en_passant_file() {
            hash ^= self.en_passant_key(file);
        }
        hash
    }

    #[inline]
    #[must_use]
    pub fn piece_key(&self, color: Color, piece: Piece, square: Square) -> u64 {
        self.piece_keys[color.index()][piece.index()][square.index()]
    }

    #[inline]
    #[must_use]
    pub fn side_key(&self, color: Color) -> u64 {
        self.side_keys[color.index()]
    }

    #[inline]
    #[must_use]
    pub fn castling_key(&self, rights: CastlingRights) -> u64 {
        self.castling_keys[rights.index()]
    }

    /// Key for an en passant target on `file` (0-7); out-of-range files wrap
    #[inline]
    #[must_use]
    pub fn en_passant_key(&self, file: u8) -> u64 {
        self.en_passant_keys[usize::from(file) % 8]
    }
}

impl Default for ZobristKeys {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ZobristKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZobristKeys").finish_non_exhaustive()
    }
}
