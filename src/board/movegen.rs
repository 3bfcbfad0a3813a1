/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::{
    CastlingRights, Color, Move, MoveList, PieceKind, Position, Square, BISHOP_DELTAS,
    KNIGHT_DELTAS, QUEEN_DELTAS, ROOK_DELTAS,
};

impl Position {
    /// Generates all pseudo-legal moves of the piece on `square`.
    ///
    /// Pseudo-legal moves follow the movement rules of each piece, but may leave the mover's King in check.
    /// An empty square yields no moves.
    pub fn pseudo_legal_moves_from(&self, square: Square) -> MoveList {
        let mut moves = MoveList::new();
        self.push_moves_from(square, &mut moves);
        moves
    }

    /// Generates all pseudo-legal moves of `color`, in square order from a1 to h8.
    pub fn pseudo_legal_moves_for(&self, color: Color) -> MoveList {
        let mut moves = MoveList::new();
        for (square, piece) in self.pieces() {
            if piece.color() == color {
                self.push_moves_from(square, &mut moves);
            }
        }
        moves
    }

    /// Generates all legal moves of `color`, in square order from a1 to h8.
    ///
    /// Each pseudo-legal move is made and undone on this position to see whether it leaves the King in check.
    /// The list is empty exactly when `color` is checkmated or stalemated.
    ///
    /// # Example
    /// ```
    /// # use herring::{Color, Position};
    /// let mut pos = Position::default();
    /// assert_eq!(pos.get_all_moves(Color::White).len(), 20);
    /// ```
    pub fn get_all_moves(&mut self, color: Color) -> MoveList {
        let mut moves = self.pseudo_legal_moves_for(color);
        moves.retain(|mv| self.is_legal_by_make_undo(*mv, color));
        moves
    }

    /// Generates all legal moves of `color` without modifying this position.
    ///
    /// Each pseudo-legal move is tried on a scratch copy of the position.
    /// The result is identical to [`Position::get_all_moves`].
    ///
    /// # Example
    /// ```
    /// # use herring::{Color, Position, FEN_KIWIPETE};
    /// let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(pos.get_all_moves_copied(Color::White), pos.get_all_moves(Color::White));
    /// ```
    pub fn get_all_moves_copied(&self, color: Color) -> MoveList {
        let mut moves = self.pseudo_legal_moves_for(color);
        moves.retain(|mv| !self.with_move_made(*mv).is_in_check(color));
        moves
    }

    /// Generates all legal moves for the side to move.
    #[inline(always)]
    pub fn legal_moves(&mut self) -> MoveList {
        self.get_all_moves(self.side_to_move())
    }

    /// Returns `true` if the side to move has at least one legal move.
    pub fn has_legal_moves(&mut self) -> bool {
        let color = self.side_to_move();
        self.pseudo_legal_moves_for(color)
            .into_iter()
            .any(|mv| self.is_legal_by_make_undo(mv, color))
    }

    /// Returns `true` if making the pseudo-legal `mv` does not leave the King of `color` in check.
    #[inline(always)]
    fn is_legal_by_make_undo(&mut self, mv: Move, color: Color) -> bool {
        let undo = self.make_move(mv);
        let legal = !self.is_in_check(color);
        self.undo_move(mv, undo);
        legal
    }

    /// Dispatches to the generator for whatever stands on `square`.
    fn push_moves_from(&self, square: Square, moves: &mut MoveList) {
        let Some(piece) = self.piece_at(square) else {
            return;
        };
        match piece.kind() {
            PieceKind::Pawn => self.pawn_moves(square, moves),
            PieceKind::Knight => self.knight_moves(square, moves),
            PieceKind::Bishop => self.bishop_moves(square, moves),
            PieceKind::Rook => self.rook_moves(square, moves),
            PieceKind::Queen => self.queen_moves(square, moves),
            PieceKind::King => self.king_moves(square, moves),
        }
    }

    /// Pushes, double pushes, captures, and en passant for the Pawn on `square`.
    ///
    /// Moves onto the last rank are expanded into one move per promotion.
    pub fn pawn_moves(&self, square: Square, moves: &mut MoveList) {
        let Some(color) = self.color_at(square) else {
            return;
        };
        let forward = color.forward();

        if let Some(single) = square.offset(0, forward).filter(|&to| self.is_empty(to)) {
            push_pawn_move(square, single, color, moves);

            if square.y() == color.pawn_rank() {
                if let Some(double) = single.offset(0, forward).filter(|&to| self.is_empty(to)) {
                    moves.push(Move::new(square, double));
                }
            }
        }

        for dx in [-1, 1] {
            let Some(target) = square.offset(dx, forward) else {
                continue;
            };

            let is_capture = self
                .color_at(target)
                .is_some_and(|victim| victim != color);
            let is_en_passant =
                color == self.side_to_move() && Some(target) == self.ep_square();

            if is_capture || is_en_passant {
                push_pawn_move(square, target, color, moves);
            }
        }
    }

    /// Single jumps of the Knight on `square`.
    #[inline(always)]
    pub fn knight_moves(&self, square: Square, moves: &mut MoveList) {
        self.leaper_moves(square, &KNIGHT_DELTAS, moves);
    }

    /// Diagonal rays of the Bishop on `square`.
    #[inline(always)]
    pub fn bishop_moves(&self, square: Square, moves: &mut MoveList) {
        self.rider_moves(square, &BISHOP_DELTAS, moves);
    }

    /// Orthogonal rays of the Rook on `square`.
    #[inline(always)]
    pub fn rook_moves(&self, square: Square, moves: &mut MoveList) {
        self.rider_moves(square, &ROOK_DELTAS, moves);
    }

    /// Orthogonal and diagonal rays of the Queen on `square`.
    #[inline(always)]
    pub fn queen_moves(&self, square: Square, moves: &mut MoveList) {
        self.rider_moves(square, &QUEEN_DELTAS, moves);
    }

    /// Single steps of the King on `square`, plus castling.
    pub fn king_moves(&self, square: Square, moves: &mut MoveList) {
        self.leaper_moves(square, &QUEEN_DELTAS, moves);

        let Some(color) = self.color_at(square) else {
            return;
        };
        let rank = color.back_rank();
        if square != Square::from_coords_unchecked(4, rank) {
            return;
        }

        let enemy = color.opponent();
        let rights = self.castling_rights();
        let can_castle = |right: CastlingRights, rook_x: u8, empty: &[u8], safe: &[u8]| {
            let rook = Square::from_coords_unchecked(rook_x, rank);
            rights.has(right)
                && self
                    .piece_at(rook)
                    .is_some_and(|piece| piece.is(color, PieceKind::Rook))
                && empty
                    .iter()
                    .all(|&x| self.is_empty(Square::from_coords_unchecked(x, rank)))
                && safe.iter().all(|&x| {
                    !self.is_square_attacked(Square::from_coords_unchecked(x, rank), enemy)
                })
        };

        // The King may not castle out of, through, or into check
        if can_castle(CastlingRights::short(color), 7, &[5, 6], &[4, 5, 6]) {
            moves.push(Move::new(square, Square::from_coords_unchecked(6, rank)));
        }
        if can_castle(CastlingRights::long(color), 0, &[1, 2, 3], &[4, 3, 2]) {
            moves.push(Move::new(square, Square::from_coords_unchecked(2, rank)));
        }
    }

    /// Moves to each square one of `deltas` away that is not occupied by a friendly piece.
    fn leaper_moves(&self, square: Square, deltas: &[(i8, i8)], moves: &mut MoveList) {
        let Some(color) = self.color_at(square) else {
            return;
        };
        for &(dx, dy) in deltas {
            if let Some(to) = square.offset(dx, dy) {
                if self.color_at(to) != Some(color) {
                    moves.push(Move::new(square, to));
                }
            }
        }
    }

    /// Moves along each of `deltas` until the edge of the board or an occupied square.
    ///
    /// An enemy piece ends the ray as a capture, and a friendly piece ends it before its square.
    fn rider_moves(&self, square: Square, deltas: &[(i8, i8)], moves: &mut MoveList) {
        let Some(color) = self.color_at(square) else {
            return;
        };
        for &(dx, dy) in deltas {
            let mut current = square;
            while let Some(to) = current.offset(dx, dy) {
                match self.color_at(to) {
                    None => moves.push(Move::new(square, to)),
                    Some(other) => {
                        if other != color {
                            moves.push(Move::new(square, to));
                        }
                        break;
                    }
                }
                current = to;
            }
        }
    }
}

/// Pushes a pawn move, expanding it into every promotion if it reaches the last rank.
#[inline(always)]
fn push_pawn_move(from: Square, to: Square, color: Color, moves: &mut MoveList) {
    if to.y() == color.promotion_rank() {
        for kind in PieceKind::promotions() {
            moves.push(Move::new_promotion(from, to, kind));
        }
    } else {
        moves.push(Move::new(from, to));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_KIWIPETE;

    fn moves_from(fen: &str, square: &str) -> Vec<String> {
        let pos = Position::from_fen(fen).unwrap();
        let mut moves = pos
            .pseudo_legal_moves_from(square.parse().unwrap())
            .iter()
            .map(|mv| mv.to_string())
            .collect::<Vec<_>>();
        moves.sort();
        moves
    }

    #[test]
    fn test_pawn_moves() {
        let fen = "4k3/8/8/8/8/2p5/1P6/4K3 w - - 0 1";
        assert_eq!(moves_from(fen, "b2"), ["b2b3", "b2b4", "b2c3"]);

        // Blocked double push
        let fen = "4k3/8/8/8/1p6/8/1P6/4K3 w - - 0 1";
        assert_eq!(moves_from(fen, "b2"), ["b2b3"]);

        // Black pawns move down the board
        let fen = "4k3/3p4/4P3/8/8/8/8/4K3 b - - 0 1";
        assert_eq!(moves_from(fen, "d7"), ["d7d5", "d7d6", "d7e6"]);
    }

    #[test]
    fn test_promotions_are_ordered() {
        let pos = Position::from_fen("4k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let moves = pos.pseudo_legal_moves_from("a7".parse().unwrap());
        assert_eq!(moves.as_slice(), ["a7a8q", "a7a8r", "a7a8b", "a7a8n"]);
    }

    #[test]
    fn test_en_passant() {
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1";
        assert_eq!(moves_from(fen, "e5"), ["e5d6", "e5e6"]);

        // Without the target square there is no capture
        let fen = "4k3/8/8/3pP3/8/8/8/4K3 w - - 0 1";
        assert_eq!(moves_from(fen, "e5"), ["e5e6"]);
    }

    #[test]
    fn test_sliders_stop_at_pieces() {
        let fen = "4k3/8/8/8/1p6/8/1R1P4/4K3 w - - 0 1";
        assert_eq!(
            moves_from(fen, "b2"),
            ["b2a2", "b2b1", "b2b3", "b2b4", "b2c2"]
        );
    }

    #[test]
    fn test_castling() {
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let moves = pos.get_all_moves(Color::White);
        assert!(moves.contains(&"e1g1".parse().unwrap()));
        assert!(moves.contains(&"e1c1".parse().unwrap()));

        // f1 is attacked, so short castling would pass through check
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/5r2/R3K2R w KQkq - 0 1").unwrap();
        let moves = pos.get_all_moves(Color::White);
        assert!(!moves.contains(&"e1g1".parse().unwrap()));
        assert!(moves.contains(&"e1c1".parse().unwrap()));

        // b1 may be attacked when castling long
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/1r6/R3K2R w KQ - 0 1").unwrap();
        let moves = pos.get_all_moves(Color::White);
        assert!(moves.contains(&"e1c1".parse().unwrap()));

        // No castling out of check
        let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/4r3/R3K2R w KQ - 0 1").unwrap();
        let moves = pos.get_all_moves(Color::White);
        assert!(!moves.contains(&"e1g1".parse().unwrap()));
        assert!(!moves.contains(&"e1c1".parse().unwrap()));
    }

    #[test]
    fn test_pinned_piece_cannot_move() {
        let mut pos = Position::from_fen("4k3/4r3/8/8/8/8/4N3/4K3 w - - 0 1").unwrap();
        let moves = pos.get_all_moves(Color::White);
        assert!(moves.iter().all(|mv| mv.from() != "e2".parse::<Square>().unwrap()));
    }

    #[test]
    fn test_no_moves_on_mate_and_stalemate() {
        let mut mated = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(mated.get_all_moves(Color::Black).is_empty());
        assert!(mated.is_in_check(Color::Black));

        let mut stalemate = Position::from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(stalemate.get_all_moves(Color::Black).is_empty());
        assert!(!stalemate.is_in_check(Color::Black));
    }

    #[test]
    fn test_copy_make_agrees_with_make_undo() {
        let fens = [
            crate::FEN_STARTPOS,
            FEN_KIWIPETE,
            "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1",
            "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1",
            "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1",
        ];

        for fen in fens {
            let mut pos = Position::from_fen(fen).unwrap();
            let original = pos.clone();
            for color in Color::all() {
                assert_eq!(
                    pos.get_all_moves_copied(color),
                    pos.get_all_moves(color),
                    "{fen}"
                );
            }
            assert_eq!(pos, original);
        }
    }
}
