/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::cmp::Reverse;

use arrayvec::ArrayVec;

use crate::{HistoryTable, KillerTable, Move, MoveList, PieceKind, Position, MAX_NUM_MOVES};

/// Priority of the best move found by the previous, shallower iteration.
pub const PV_PRIORITY: i32 = 1000;

/// Priority of a killer move.
pub const KILLER_PRIORITY: i32 = 900;

/// Base priority of a promotion, before adding the value of the promoted piece.
pub const PROMOTION_PRIORITY: i32 = 800;

/// Base priority of a capture, before adding the [MVV-LVA](https://www.chessprogramming.org/MVV-LVA) difference.
pub const CAPTURE_PRIORITY: i32 = 700;

/// Priority of a move that gives check.
pub const CHECK_PRIORITY: i32 = 600;

/// Base priority of a quiet move with a history bonus.
pub const HISTORY_PRIORITY: i32 = 500;

/// Largest history bonus that counts towards a move's priority, keeping history moves below checks.
const MAX_HISTORY_PRIORITY: i32 = 99;

/// Returns the value of `kind` in pawns, as used for move ordering.
///
/// The King is worth nothing here. A King can only capture undefended pieces,
/// so its captures outrank even trades of the same victim.
#[inline(always)]
pub const fn ordering_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 1,
        PieceKind::Knight => 3,
        PieceKind::Bishop => 3,
        PieceKind::Rook => 5,
        PieceKind::Queen => 9,
        PieceKind::King => 0,
    }
}

/// Assigns each move a priority, so that likely-good moves are searched first.
#[derive(Debug, Clone, Copy)]
pub struct MoveOrderer<'a> {
    killers: &'a KillerTable,
    history: &'a HistoryTable,
    pv_move: Option<Move>,
}

impl<'a> MoveOrderer<'a> {
    /// Creates a new [`MoveOrderer`] drawing on the provided heuristics.
    ///
    /// `pv_move` should only be supplied at the root.
    #[inline(always)]
    pub fn new(killers: &'a KillerTable, history: &'a HistoryTable, pv_move: Option<Move>) -> Self {
        Self {
            killers,
            history,
            pv_move,
        }
    }

    /// Computes the priority of `mv` in `position`, found `ply` plies from the root.
    ///
    /// Bands, from highest to lowest:
    /// 1. The PV move.
    /// 2. Killers of this ply.
    /// 3. Promotions, by the value of the promoted piece.
    /// 4. Captures, by the value of the victim minus the value of the attacker.
    /// 5. Checks.
    /// 6. Quiets with a history bonus.
    ///
    /// Everything else has priority 0.
    ///
    /// `position` is only modified temporarily, to see whether `mv` gives check.
    pub fn priority(&self, position: &mut Position, mv: Move, ply: usize) -> i32 {
        if self.pv_move == Some(mv) {
            return PV_PRIORITY;
        }

        if self.killers.contains(mv, ply) {
            return KILLER_PRIORITY;
        }

        if let Some(promotion) = mv.promotion() {
            return PROMOTION_PRIORITY + ordering_value(promotion);
        }

        let Some(attacker) = position.piece_at(mv.from()) else {
            return 0;
        };

        let victim = match position.piece_at(mv.to()) {
            Some(victim) if victim.color() != attacker.color() => Some(victim.kind()),
            _ if attacker.kind() == PieceKind::Pawn && Some(mv.to()) == position.ep_square() => {
                Some(PieceKind::Pawn)
            }
            _ => None,
        };
        if let Some(victim) = victim {
            return CAPTURE_PRIORITY + ordering_value(victim) - ordering_value(attacker.kind());
        }

        let undo = position.make_move(mv);
        let gives_check = position.is_in_check(attacker.color().opponent());
        position.undo_move(mv, undo);
        if gives_check {
            return CHECK_PRIORITY;
        }

        let history = self.history.get(attacker, mv.to());
        if history > 0 {
            return HISTORY_PRIORITY + history.min(MAX_HISTORY_PRIORITY);
        }

        0
    }
}

/// Yields moves in descending order of priority.
///
/// Moves of equal priority keep the order they were generated in.
pub struct MovePicker {
    moves: ArrayVec<(Move, i32), MAX_NUM_MOVES>,
    current: usize,
}

impl MovePicker {
    /// Scores every move with `score_fn` and sorts them, highest score first.
    pub fn new(moves: MoveList, mut score_fn: impl FnMut(&Move) -> i32) -> Self {
        let mut moves = moves
            .into_iter()
            .map(|mv| {
                let score = score_fn(&mv);
                (mv, score)
            })
            .collect::<ArrayVec<_, MAX_NUM_MOVES>>();

        // Stable, so ties keep generator order
        moves.sort_by_key(|&(_, score)| Reverse(score));

        Self { moves, current: 0 }
    }

    /// Orders `moves` in `position` using the heuristics of `orderer`.
    #[inline(always)]
    pub fn with_orderer(
        moves: MoveList,
        position: &mut Position,
        orderer: &MoveOrderer,
        ply: usize,
    ) -> Self {
        Self::new(moves, |mv| orderer.priority(position, *mv, ply))
    }
}

impl Iterator for MovePicker {
    type Item = (Move, i32);

    fn next(&mut self) -> Option<Self::Item> {
        let next = self.moves.get(self.current).copied();
        self.current += 1;
        next
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.moves.len().saturating_sub(self.current);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for MovePicker {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Piece, Square, FEN_KIWIPETE};

    fn priority_of(fen: &str, mv: &str) -> i32 {
        let mut pos = Position::from_fen(fen).unwrap();
        let killers = KillerTable::default();
        let history = HistoryTable::default();
        MoveOrderer::new(&killers, &history, None).priority(&mut pos, mv.parse().unwrap(), 0)
    }

    #[test]
    fn test_bands() {
        // Promotions rank by the promoted piece
        let fen = "n1n5/PPPk4/8/8/8/8/4Kppp/5N1N b - - 0 1";
        assert_eq!(priority_of(fen, "g2g1q"), 809);
        assert_eq!(priority_of(fen, "g2g1n"), 803);

        // MVV-LVA: bishop takes bishop, queen takes knight, pawn takes pawn
        assert_eq!(priority_of(FEN_KIWIPETE, "e2a6"), 700);
        assert_eq!(priority_of(FEN_KIWIPETE, "f3f6"), 694);
        assert_eq!(priority_of(FEN_KIWIPETE, "g2h3"), 700);

        // King captures rank above pawn-for-pawn trades
        assert_eq!(priority_of("4k3/8/8/8/8/8/3p4/4K3 w - - 0 1", "e1d2"), 701);

        // En passant counts as a pawn capture
        assert_eq!(priority_of("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 1", "e5d6"), 700);

        // Quiet check
        assert_eq!(priority_of("4k3/8/8/8/8/8/8/R3K3 w - - 0 1", "a1a8"), 600);

        // Plain quiet
        assert_eq!(priority_of(FEN_KIWIPETE, "a2a3"), 0);
    }

    #[test]
    fn test_heuristic_bands() {
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        let mut killers = KillerTable::default();
        let mut history = HistoryTable::default();

        let killer: Move = "a2a3".parse().unwrap();
        killers.add(killer, 3);
        history.update(Piece::WHITE_PAWN, Square::from_coords_unchecked(1, 2), 5);
        history.update(Piece::WHITE_KING, Square::F1, 20);
        let pv: Move = "a1b1".parse().unwrap();

        let orderer = MoveOrderer::new(&killers, &history, Some(pv));
        assert_eq!(orderer.priority(&mut pos, pv, 0), 1000);
        assert_eq!(orderer.priority(&mut pos, killer, 3), 900);
        assert_eq!(orderer.priority(&mut pos, killer, 2), 0);
        assert_eq!(orderer.priority(&mut pos, "b2b3".parse().unwrap(), 0), 525);
        assert_eq!(orderer.priority(&mut pos, "e1f1".parse().unwrap(), 0), 599);
    }

    #[test]
    fn test_picker_is_stable() {
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        let moves = pos.legal_moves();
        let killers = KillerTable::default();
        let history = HistoryTable::default();
        let orderer = MoveOrderer::new(&killers, &history, None);

        let ordered = MovePicker::with_orderer(moves.clone(), &mut pos, &orderer, 0)
            .collect::<Vec<_>>();
        assert_eq!(ordered.len(), moves.len());

        // Scores never increase
        assert!(ordered.windows(2).all(|w| w[0].1 >= w[1].1));

        // The first captures are the equal-valued trades, in generator order
        let first = ordered.iter().map(|(mv, _)| mv.to_string()).take(3).collect::<Vec<_>>();
        assert_eq!(first, ["e2a6", "g2h3", "d5e6"]);

        // Quiet moves keep generator order
        let quiets = ordered
            .iter()
            .filter(|(_, score)| *score == 0)
            .map(|(mv, _)| *mv)
            .collect::<Vec<_>>();
        let generated = moves
            .iter()
            .copied()
            .filter(|mv| quiets.contains(mv))
            .collect::<Vec<_>>();
        assert_eq!(quiets, generated);
    }
}
