/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{Color, PieceKind, Position, Square};

/// Deltas for the movement of the Queen, which are also the single steps of the King.
pub(crate) const QUEEN_DELTAS: [(i8, i8); 8] = [
    /* Rook */
    (1, 0),
    (0, -1),
    (-1, 0),
    (0, 1),
    /* Bishop */
    (1, 1),
    (1, -1),
    (-1, -1),
    (-1, 1),
];

/// Deltas for the movement of the Rook.
pub(crate) const ROOK_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[0],
    QUEEN_DELTAS[1],
    QUEEN_DELTAS[2],
    QUEEN_DELTAS[3],
];

/// Deltas for the movement of the Bishop.
pub(crate) const BISHOP_DELTAS: [(i8, i8); 4] = [
    QUEEN_DELTAS[4],
    QUEEN_DELTAS[5],
    QUEEN_DELTAS[6],
    QUEEN_DELTAS[7],
];

/// Deltas for the movement of the Knight.
pub(crate) const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (1, -2),
    (2, 1),
    (2, -1),
    (-1, 2),
    (-1, -2),
    (-2, 1),
    (-2, -1),
];

impl Position {
    /// Returns `true` if any piece of color `by` attacks `square`.
    ///
    /// Whatever stands on `square` itself is irrelevant. Pieces of `by` that are pinned still attack.
    ///
    /// # Example
    /// ```
    /// # use herring::{Color, Position, Square};
    /// let pos = Position::default();
    /// assert!(pos.is_square_attacked("f3".parse().unwrap(), Color::White));
    /// assert!(!pos.is_square_attacked("e4".parse().unwrap(), Color::White));
    /// assert!(pos.is_square_attacked("c6".parse().unwrap(), Color::Black));
    /// ```
    pub fn is_square_attacked(&self, square: Square, by: Color) -> bool {
        let attacker_at = |dx: i8, dy: i8, kind: PieceKind| {
            square
                .offset(dx, dy)
                .and_then(|from| self.piece_at(from))
                .is_some_and(|piece| piece.is(by, kind))
        };

        // Pawns of `by` attack diagonally forward, so look for them diagonally backward
        let behind = -by.forward();
        if attacker_at(-1, behind, PieceKind::Pawn) || attacker_at(1, behind, PieceKind::Pawn) {
            return true;
        }

        if KNIGHT_DELTAS
            .iter()
            .any(|&(dx, dy)| attacker_at(dx, dy, PieceKind::Knight))
        {
            return true;
        }

        if QUEEN_DELTAS
            .iter()
            .any(|&(dx, dy)| attacker_at(dx, dy, PieceKind::King))
        {
            return true;
        }

        self.slider_attacks(square, by, &ROOK_DELTAS, PieceKind::Rook)
            || self.slider_attacks(square, by, &BISHOP_DELTAS, PieceKind::Bishop)
    }

    /// Walks outward from `square` along each of `deltas`.
    /// The first piece found on a ray attacks `square` if it is a `kind` or a Queen of color `by`.
    fn slider_attacks(
        &self,
        square: Square,
        by: Color,
        deltas: &[(i8, i8)],
        kind: PieceKind,
    ) -> bool {
        deltas.iter().any(|&(dx, dy)| {
            let mut current = square;
            while let Some(next) = current.offset(dx, dy) {
                if let Some(piece) = self.piece_at(next) {
                    return piece.color() == by
                        && (piece.kind() == kind || piece.kind() == PieceKind::Queen);
                }
                current = next;
            }
            false
        })
    }

    /// Returns `true` if the King of `color` is attacked.
    ///
    /// A side without a King is never in check.
    ///
    /// # Example
    /// ```
    /// # use herring::{Color, Position};
    /// let pos = Position::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").unwrap();
    /// assert!(pos.is_in_check(Color::Black));
    /// assert!(!pos.is_in_check(Color::White));
    ///
    /// let kingless = Position::from_fen("8/8/8/8/8/8/8/4R3 b - - 0 1").unwrap();
    /// assert!(!kingless.is_in_check(Color::Black));
    /// ```
    #[inline(always)]
    pub fn is_in_check(&self, color: Color) -> bool {
        self.king_square(color)
            .is_some_and(|king| self.is_square_attacked(king, color.opponent()))
    }
}
