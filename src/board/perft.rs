/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use super::Position;

/// Perform a perft at the specified depth, collecting only data about the number of possible positions (nodes).
///
/// This performs bulk counting, meaning that, at depth 1, it returns the number of available moves,
/// rather than making them, recursing again, and returning 1 for each terminal case.
///
/// # Example
/// ```
/// # use herring::{perft, Position};
/// let mut pos = Position::default();
/// assert_eq!(perft(&mut pos, 3), 8_902);
/// ```
#[inline(always)]
pub fn perft(position: &mut Position, depth: usize) -> u64 {
    perft_generic::<true, false>(position, depth)
}

/// Perform a splitperft at the specified depth, printing the number of nodes reachable after each root move.
#[inline(always)]
pub fn splitperft(position: &mut Position, depth: usize) -> u64 {
    perft_generic::<true, true>(position, depth)
}

/// Generic version of `perft` that allows you to specify whether to perform bulk counting and splitperft.
///
/// If `BULK` is set to `true`, this will perform bulk counting.
/// If `SPLIT` is set to `true`, this will perform a splitperft.
///
/// Moves are made and undone on `position`, which is left as it was found.
pub fn perft_generic<const BULK: bool, const SPLIT: bool>(
    position: &mut Position,
    depth: usize,
) -> u64 {
    // Recursion limit; return 1, since we're fathoming this node.
    if depth == 0 {
        return 1;
    }

    let moves = position.legal_moves();

    // Bulk counting; no need to recurse again just to apply a singular move and return 1.
    if BULK && !SPLIT && depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        let undo = position.make_move(mv);
        let new_nodes = perft_generic::<BULK, false>(position, depth - 1);
        position.undo_move(mv, undo);

        if SPLIT {
            println!("{mv}\t{new_nodes}");
        }

        nodes + new_nodes
    })
}

/// Perft through [`Position::get_all_moves_copied`] and [`Position::with_move_made`], never modifying a position.
///
/// Slower than [`perft`], but reaches the same counts.
pub fn perft_copied(position: &Position, depth: usize) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = position.get_all_moves_copied(position.side_to_move());
    if depth == 1 {
        return moves.len() as u64;
    }

    moves.into_iter().fold(0, |nodes, mv| {
        nodes + perft_copied(&position.with_move_made(mv), depth - 1)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FEN_KIWIPETE;

    #[test]
    fn test_bulk_counting_matches_full_counting() {
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        assert_eq!(
            perft_generic::<true, false>(&mut pos, 3),
            perft_generic::<false, false>(&mut pos, 3)
        );
    }

    #[test]
    fn test_perft_leaves_position_untouched() {
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        let original = pos.clone();
        perft(&mut pos, 3);
        assert_eq!(pos, original);
    }

    #[test]
    fn test_copy_make_perft_agrees() {
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        assert_eq!(perft_copied(&pos, 2), perft(&mut pos, 2));
        assert_eq!(perft_copied(&pos, 2), 2_039);
    }
}
