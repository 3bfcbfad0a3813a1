/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{value_of, Color, Piece, PieceKind, Square};

/// Piece-Square tables copied from the [Simplified Evaluation Function](https://www.chessprogramming.org/Simplified_Evaluation_Function)
#[rustfmt::skip]
const PAWN: Psqt = Psqt::new(PieceKind::Pawn, [
     0,  0,   0,   0,   0,   0,  0,  0,
    50, 50,  50,  50,  50,  50, 50, 50,
    10, 10,  20,  30,  30,  20, 10, 10,
     5,  5,  10,  25,  25,  10,  5,  5,
     0,  0,   0,  20,  20,   0,  0,  0,
     5, -5, -10,   0,   0, -10, -5,  5,
     5, 10,  10, -20, -20,  10, 10,  5,
     0,  0,   0,   0,   0,   0,  0,  0,
]);

#[rustfmt::skip]
const KNIGHT: Psqt = Psqt::new(PieceKind::Knight, [
    -50, -40, -30, -30, -30, -30, -40, -50,
    -40, -20,   0,   0,   0,   0, -20, -40,
    -30,   0,  10,  15,  15,  10,   0, -30,
    -30,   5,  15,  20,  20,  15,   5, -30,
    -30,   0,  15,  20,  20,  15,   0, -30,
    -30,   5,  10,  15,  15,  10,   5, -30,
    -40, -20,   0,   5,   5,   0, -20, -40,
    -50, -40, -30, -30, -30, -30, -40, -50,
]);

#[rustfmt::skip]
const BISHOP: Psqt = Psqt::new(PieceKind::Bishop, [
    -20, -10, -10, -10, -10, -10, -10, -20,
    -10,   0,   0,   0,   0,   0,   0, -10,
    -10,   0,   5,  10,  10,   5,   0, -10,
    -10,   5,   5,  10,  10,   5,   5, -10,
    -10,   0,  10,  10,  10,  10,   0, -10,
    -10,  10,  10,  10,  10,  10,  10, -10,
    -10,   5,   0,   0,   0,   0,   5, -10,
    -20, -10, -10, -10, -10, -10, -10, -20,
]);

#[rustfmt::skip]
const ROOK: Psqt = Psqt::new(PieceKind::Rook, [
     0,  0,  0,  0,  0,  0,  0,  0,
     5, 10, 10, 10, 10, 10, 10,  5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
    -5,  0,  0,  0,  0,  0,  0, -5,
     0,  0,  0,  5,  5,  0,  0,  0,
]);

#[rustfmt::skip]
const QUEEN: Psqt = Psqt::new(PieceKind::Queen, [
    -20, -10, -10, -5, -5, -10, -10, -20,
    -10,   0,   0,  0,  0,   0,   0, -10,
    -10,   0,   5,  5,  5,   5,   0, -10,
     -5,   0,   5,  5,  5,   5,   0,  -5,
      0,   0,   5,  5,  5,   5,   0,  -5,
    -10,   5,   5,  5,  5,   5,   0, -10,
    -10,   0,   5,  0,  0,   0,   0, -10,
    -20, -10, -10, -5, -5, -10, -10, -20,
]);

#[rustfmt::skip]
const KING: Psqt = Psqt::new(PieceKind::King, [
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -30, -40, -40, -50, -50, -40, -40, -30,
    -20, -30, -30, -40, -40, -30, -30, -20,
    -10, -20, -20, -20, -20, -20, -20, -10,
     20,  20,   0,   0,   0,   0,  20,  20,
     20,  30,  10,   0,   0,  10,  30,  20,
]);

/// A [Piece-Square Table](https://www.chessprogramming.org/Piece-Square_Tables) for use in evaluation.
///
/// Each entry already includes the material value of the piece.
#[derive(Debug)]
pub struct Psqt([i32; Square::COUNT]);

impl Psqt {
    /// Fetch the Piece-Square Table value for `piece` at `square`, including its material.
    ///
    /// Black pieces read the table at the vertically mirrored square.
    ///
    /// # Example
    /// ```
    /// # use herring::{Piece, Psqt, Square};
    /// // A pawn on e4 is worth its material plus a central bonus
    /// assert_eq!(Psqt::eval(Piece::WHITE_PAWN, "e4".parse().unwrap()), 120);
    /// assert_eq!(Psqt::eval(Piece::BLACK_PAWN, "e5".parse().unwrap()), 120);
    /// ```
    #[inline(always)]
    pub fn eval(piece: Piece, square: Square) -> i32 {
        let square = match piece.color() {
            Color::White => square,
            Color::Black => square.flipped_rank(),
        };
        Self::get_table_for(piece.kind()).get(square)
    }

    /// Fetch the Piece-Square Table for the provided [`PieceKind`].
    #[inline(always)]
    pub fn get_table_for<'a>(kind: PieceKind) -> &'a Self {
        match kind {
            PieceKind::Pawn => &PAWN,
            PieceKind::Knight => &KNIGHT,
            PieceKind::Bishop => &BISHOP,
            PieceKind::Rook => &ROOK,
            PieceKind::Queen => &QUEEN,
            PieceKind::King => &KING,
        }
    }

    /// Creates a new [`Psqt`] for the provided [`PieceKind`] and array of values.
    ///
    /// `psqt` is written the way a board is drawn, with rank 8 first.
    const fn new(kind: PieceKind, psqt: [i32; Square::COUNT]) -> Self {
        let mut flipped = psqt;

        let mut i = 0;
        while i < psqt.len() {
            // Flip the rank, not the file, so it can be used from White's perspective without modification
            // Also add in the value of this piece
            flipped[i] = psqt[i ^ 56] + value_of(kind);
            i += 1;
        }

        Self(flipped)
    }

    /// Get the value of this PSQT at the provided square, from White's perspective.
    #[inline(always)]
    pub const fn get(&self, square: Square) -> i32 {
        self.0[square.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eval_is_correct_for_colors() {
        for square in Square::iter() {
            for kind in PieceKind::all() {
                // White's PSQT eval must equal Black's on the mirrored square
                let white = Psqt::eval(Piece::new(Color::White, kind), square);
                let black = Psqt::eval(Piece::new(Color::Black, kind), square.flipped_rank());

                assert_eq!(
                    white,
                    black,
                    "{} on {square}: {white} (white) != {black} (black)",
                    kind.name()
                );
            }
        }
    }

    #[test]
    fn test_tables_are_oriented_for_white() {
        // Castled kings are rewarded, wandering kings are not
        assert_eq!(Psqt::eval(Piece::WHITE_KING, Square::G1), 20_030);
        assert_eq!(Psqt::eval(Piece::BLACK_KING, Square::G8), 20_030);
        // Pawns about to promote are worth more
        assert_eq!(Psqt::eval(Piece::WHITE_PAWN, "a7".parse().unwrap()), 150);
    }
}
