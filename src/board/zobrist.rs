/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use super::{CastlingRights, Color, Piece, Position, Square};

/// Stores Zobrist hash keys, for hashing [`Position`]s.
///
/// Computed at compile time from a fixed seed, so keys are identical between runs and builds.
const ZOBRIST_TABLE: ZobristHashTable = ZobristHashTable::new();

/// Seed for the key generator.
const SEED: u64 = 0x2545_F491_4F6C_DD1D;

/// A 64-bit fingerprint of a [`Position`], built by XOR-ing one key per feature of the position.
///
/// Because XOR is its own inverse, a key can be updated incrementally as moves are made and undone.
#[derive(Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct ZobristKey(u64);

impl ZobristKey {
    /// Generates a new [`ZobristKey`] from scratch for the supplied [`Position`].
    ///
    /// # Example
    /// ```
    /// # use herring::*;
    /// let pos = Position::default();
    /// let key = ZobristKey::new(&pos);
    /// assert_ne!(key.inner(), 0);
    /// assert_eq!(key, pos.key());
    /// ```
    #[inline(always)]
    pub fn new(position: &Position) -> Self {
        Self::from_parts(
            position.squares(),
            position.ep_square(),
            position.castling_rights(),
            position.side_to_move(),
        )
    }

    /// Generates a [`ZobristKey`] from the provided components of a [`Position`].
    pub fn from_parts(
        squares: &[Option<Piece>; Square::COUNT],
        ep_square: Option<Square>,
        castling_rights: CastlingRights,
        color: Color,
    ) -> Self {
        let mut key = Self::default();

        for square in Square::iter() {
            if let Some(piece) = squares[square] {
                key.hash_piece(square, piece);
            }
        }

        if let Some(ep_square) = ep_square {
            key.hash_ep_square(ep_square);
        }

        key.hash_castling_rights(castling_rights);
        key.hash_side_to_move(color);

        key
    }

    /// Return the inner `u64` of this key.
    #[inline(always)]
    pub const fn inner(&self) -> u64 {
        self.0
    }

    /// Adds/removes `hash_key` to this [`ZobristKey`].
    ///
    /// # Example
    /// ```
    /// # use herring::*;
    /// let mut key = ZobristKey::default();
    /// key.hash(42);
    /// assert_ne!(key.inner(), 0);
    ///
    /// // Calling again un-hashes it
    /// key.hash(42);
    /// assert_eq!(key.inner(), 0);
    /// ```
    #[inline(always)]
    pub fn hash(&mut self, hash_key: u64) {
        self.0 ^= hash_key;
    }

    /// Adds/removes the hash for `piece` standing on `square`.
    #[inline(always)]
    pub fn hash_piece(&mut self, square: Square, piece: Piece) {
        self.hash(ZOBRIST_TABLE.piece_keys[square][piece]);
    }

    /// Adds/removes the hash for an en passant target on `ep_square`.
    #[inline(always)]
    pub fn hash_ep_square(&mut self, ep_square: Square) {
        self.hash(ZOBRIST_TABLE.ep_keys[ep_square]);
    }

    /// Adds/removes the hash for the provided `castling_rights`.
    ///
    /// Every one of the 16 combinations has its own key, so rights must be un-hashed before they change.
    #[inline(always)]
    pub fn hash_castling_rights(&mut self, castling_rights: CastlingRights) {
        self.hash(ZOBRIST_TABLE.castling_keys[castling_rights.index()]);
    }

    /// Adds/removes the hash for `color` being the side to move.
    ///
    /// White's key is 0, so only Black to move changes the key.
    ///
    /// # Example
    /// ```
    /// # use herring::*;
    /// let mut white = ZobristKey::default();
    /// white.hash_side_to_move(Color::White);
    /// assert_eq!(white, ZobristKey::default());
    ///
    /// let mut black = ZobristKey::default();
    /// black.hash_side_to_move(Color::Black);
    /// assert_ne!(black, ZobristKey::default());
    /// ```
    #[inline(always)]
    pub fn hash_side_to_move(&mut self, color: Color) {
        self.hash(ZOBRIST_TABLE.color_key[color]);
    }
}

impl fmt::Display for ZobristKey {
    #[inline(always)]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// All keys used for Zobrist hashing.
struct ZobristHashTable {
    /// One key for every piece on every square.
    piece_keys: [[u64; Piece::COUNT]; Square::COUNT],

    /// One key for every square that can be an en passant target.
    ep_keys: [u64; Square::COUNT],

    /// One key for every combination of castling rights.
    castling_keys: [u64; CastlingRights::COUNT],

    /// One key per side to move (White's is 0).
    color_key: [u64; Color::COUNT],
}

impl ZobristHashTable {
    /// Fills the table from a [SplitMix64](https://prng.di.unimi.it/splitmix64.c) sequence.
    const fn new() -> Self {
        let mut piece_keys = [[0; Piece::COUNT]; Square::COUNT];
        let mut ep_keys = [0; Square::COUNT];
        let mut castling_keys = [0; CastlingRights::COUNT];
        let mut color_key = [0; Color::COUNT];

        let mut state = SEED;

        let mut i = 0;
        while i < Square::COUNT {
            let mut j = 0;
            while j < Piece::COUNT {
                let key;
                (key, state) = splitmix64(state);
                piece_keys[i][j] = key;
                j += 1;
            }

            // En passant targets only ever sit on the third and sixth ranks
            let rank = i / 8;
            if rank == 2 || rank == 5 {
                let key;
                (key, state) = splitmix64(state);
                ep_keys[i] = key;
            }

            i += 1;
        }

        i = 0;
        while i < CastlingRights::COUNT {
            let key;
            (key, state) = splitmix64(state);
            castling_keys[i] = key;
            i += 1;
        }

        let (key, _) = splitmix64(state);
        color_key[Color::Black.index()] = key;

        Self {
            piece_keys,
            ep_keys,
            castling_keys,
            color_key,
        }
    }
}

/// Returns the next pseudo-random number and the advanced state.
const fn splitmix64(state: u64) -> (u64, u64) {
    let state = state.wrapping_add(0x9E37_79B9_7F4A_7C15);
    let mut z = state;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    (z ^ (z >> 31), state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_keys_are_distinct() {
        let mut keys = Vec::new();
        for square in Square::iter() {
            for piece in Piece::all() {
                let mut key = ZobristKey::default();
                key.hash_piece(square, piece);
                keys.push(key);
            }
        }
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
    }

    #[test]
    fn test_only_ep_ranks_have_keys() {
        for square in Square::iter() {
            let mut key = ZobristKey::default();
            key.hash_ep_square(square);
            let expected_nonzero = square.y() == 2 || square.y() == 5;
            assert_eq!(key.inner() != 0, expected_nonzero, "{square}");
        }
    }
}
