/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Check and attack detection.
mod attacks;

/// Pseudo-legal and legal move generation.
mod movegen;

/// Moves and move lists.
mod moves;

/// Perft, for validating move generation.
mod perft;

/// Pieces, piece kinds, and colors.
mod piece;

/// The array-based board and everything needed to play moves on it.
mod position;

/// Squares and coordinates.
mod square;

/// Well-known FEN strings.
mod utils;

/// Zobrist hashing of positions.
mod zobrist;

pub(crate) use attacks::*;
pub use moves::*;
pub use perft::*;
pub use piece::*;
pub use position::*;
pub use square::*;
pub use utils::*;
pub use zobrist::*;
