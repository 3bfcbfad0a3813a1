/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use crate::{Move, Piece, Square, MAX_DEPTH};

/// Largest bonus a single history entry may accumulate.
const MAX_HISTORY: i32 = i16::MAX as i32;

/// Stores bonuses for moving a piece to a square.
///
/// Used to keep track of quiet moves that caused cutoffs during search.
/// See [History Heuristic](https://www.chessprogramming.org/History_Heuristic).
#[derive(Debug)]
pub struct HistoryTable([[i32; Square::COUNT]; Piece::COUNT]);

impl HistoryTable {
    /// Clear the history table, removing all scores.
    #[inline(always)]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Fetches the accumulated bonus for moving `piece` to `to`.
    #[inline(always)]
    pub fn get(&self, piece: Piece, to: Square) -> i32 {
        self.0[piece][to]
    }

    /// Rewards `piece` moving to `to` after a cutoff `depth` plies from the horizon.
    ///
    /// Cutoffs closer to the root are rewarded quadratically more.
    ///
    /// # Example
    /// ```
    /// # use herring::{HistoryTable, Piece, Square};
    /// let mut history = HistoryTable::default();
    /// history.update(Piece::WHITE_KNIGHT, Square::F1, 3);
    /// history.update(Piece::WHITE_KNIGHT, Square::F1, 2);
    /// assert_eq!(history.get(Piece::WHITE_KNIGHT, Square::F1), 13);
    /// assert_eq!(history.get(Piece::BLACK_KNIGHT, Square::F1), 0);
    /// ```
    #[inline(always)]
    pub fn update(&mut self, piece: Piece, to: Square, depth: usize) {
        let bonus = (depth * depth) as i32;
        let entry = &mut self.0[piece][to];
        *entry = (*entry + bonus).min(MAX_HISTORY);
    }
}

impl Default for HistoryTable {
    #[inline(always)]
    fn default() -> Self {
        Self([[0; Square::COUNT]; Piece::COUNT])
    }
}

/// Provides an implementation of the killer heuristic used as a dynamic move
/// ordering technique for quiet moves that caused a beta cutoff.
///
/// Each ply keeps the two most recent distinct killers, most recent first.
/// See [Killer Heuristic](https://www.chessprogramming.org/Killer_Heuristic).
#[derive(Debug)]
pub struct KillerTable([[Option<Move>; 2]; MAX_DEPTH]);

impl KillerTable {
    /// Clear the killer table, removing all moves.
    #[inline(always)]
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Prepends `mv` to the killers at `ply`, evicting the older one.
    ///
    /// Does nothing if `mv` is already a killer at `ply`, or if `ply` is out of range.
    ///
    /// # Example
    /// ```
    /// # use herring::{KillerTable, Move};
    /// let mut killers = KillerTable::default();
    /// let (a, b, c) = ("g1f3".parse().unwrap(), "b1c3".parse().unwrap(), "e2e4".parse().unwrap());
    ///
    /// killers.add(a, 2);
    /// killers.add(b, 2);
    /// killers.add(b, 2);
    /// assert_eq!(killers.get(2), [Some(b), Some(a)]);
    ///
    /// killers.add(c, 2);
    /// assert_eq!(killers.get(2), [Some(c), Some(b)]);
    /// assert!(!killers.contains(a, 2));
    /// ```
    #[inline(always)]
    pub fn add(&mut self, mv: Move, ply: usize) {
        let Some(killers) = self.0.get_mut(ply) else {
            return;
        };
        if killers.contains(&Some(mv)) {
            return;
        }
        killers[1] = killers[0];
        killers[0] = Some(mv);
    }

    /// Returns `true` if `mv` is one of the killers at `ply`.
    #[inline(always)]
    pub fn contains(&self, mv: Move, ply: usize) -> bool {
        self.0
            .get(ply)
            .is_some_and(|killers| killers.contains(&Some(mv)))
    }

    /// Returns the killers at `ply`, most recent first.
    #[inline(always)]
    pub fn get(&self, ply: usize) -> [Option<Move>; 2] {
        self.0.get(ply).copied().unwrap_or_default()
    }
}

impl Default for KillerTable {
    #[inline(always)]
    fn default() -> Self {
        Self([[None; 2]; MAX_DEPTH])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_promotions_are_distinct_killers() {
        let mut killers = KillerTable::default();
        let queen: Move = "e7e8q".parse().unwrap();
        let knight: Move = "e7e8n".parse().unwrap();

        killers.add(queen, 0);
        killers.add(knight, 0);
        assert_eq!(killers.get(0), [Some(knight), Some(queen)]);
    }

    #[test]
    fn test_killers_are_per_ply() {
        let mut killers = KillerTable::default();
        let mv: Move = "g1f3".parse().unwrap();
        killers.add(mv, 1);
        assert!(killers.contains(mv, 1));
        assert!(!killers.contains(mv, 0));
        assert!(!killers.contains(mv, 2));

        // Out of range plies are ignored
        killers.add(mv, MAX_DEPTH);
        assert!(!killers.contains(mv, MAX_DEPTH));
        assert_eq!(killers.get(MAX_DEPTH), [None, None]);
    }

    #[test]
    fn test_history_saturates() {
        let mut history = HistoryTable::default();
        for _ in 0..100 {
            history.update(Piece::BLACK_QUEEN, Square::D1, 60);
        }
        assert_eq!(history.get(Piece::BLACK_QUEEN, Square::D1), MAX_HISTORY);

        history.clear();
        assert_eq!(history.get(Piece::BLACK_QUEEN, Square::D1), 0);
    }
}
