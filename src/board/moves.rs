/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{bail, Context, Result};

use super::{PieceKind, Square};

/// Maximum possible number of moves in a given chess position.
///
/// Found [here](<https://www.chessprogramming.org/Chess_Position#cite_note-4>)
pub const MAX_NUM_MOVES: usize = 218;

/// An alias for an [`arrayvec::ArrayVec`] containing at most [`MAX_NUM_MOVES`] moves.
pub type MoveList = arrayvec::ArrayVec<Move, MAX_NUM_MOVES>;

/// A move on a chess board: an origin, a destination, and an optional promotion.
///
/// A [`Move`] carries no information about the position it is played in.
/// Whether it captures, castles, or takes en passant is decided by the
/// [`crate::Position`] it is applied to.
///
/// Two moves are equal only if their promotions are equal as well, so `e7e8q` and `e7e8n` are different moves.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
}

impl Move {
    /// Creates a new, non-promoting [`Move`].
    #[inline(always)]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    /// Creates a new [`Move`] that promotes a pawn to `promotion`.
    #[inline(always)]
    pub const fn new_promotion(from: Square, to: Square, promotion: PieceKind) -> Self {
        Self {
            from,
            to,
            promotion: Some(promotion),
        }
    }

    /// The square the moving piece starts on.
    #[inline(always)]
    pub const fn from(&self) -> Square {
        self.from
    }

    /// The square the moving piece lands on.
    #[inline(always)]
    pub const fn to(&self) -> Square {
        self.to
    }

    /// The kind this move promotes to, if it is a promotion.
    #[inline(always)]
    pub const fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    /// Parses a move in coordinate notation: origin and destination squares,
    /// followed by an optional promotion letter (`q`, `r`, `b` or `n`).
    ///
    /// # Example
    /// ```
    /// # use herring::{Move, PieceKind, Square};
    /// let mv = Move::from_uci("e7e8q").unwrap();
    /// assert_eq!(mv.to(), Square::E8);
    /// assert_eq!(mv.promotion(), Some(PieceKind::Queen));
    ///
    /// assert!(Move::from_uci("e7").is_err());
    /// assert!(Move::from_uci("e7e9").is_err());
    /// assert!(Move::from_uci("e7e8k").is_err());
    /// ```
    pub fn from_uci(uci: &str) -> Result<Self> {
        let uci = uci.trim();
        if !uci.is_ascii() || !(4..=5).contains(&uci.len()) {
            bail!("Move notation must be 4 or 5 ASCII characters. Got {uci:?}");
        }

        let from = uci[0..2]
            .parse()
            .with_context(|| format!("Invalid origin square in move {uci:?}"))?;
        let to = uci[2..4]
            .parse()
            .with_context(|| format!("Invalid destination square in move {uci:?}"))?;

        let Some(promotion) = uci[4..].chars().next() else {
            return Ok(Self::new(from, to));
        };

        let kind = PieceKind::from_uci(promotion)?;
        if !PieceKind::promotions().contains(&kind) {
            bail!("Cannot promote to a {} in move {uci:?}", kind.name());
        }

        Ok(Self::new_promotion(from, to, kind))
    }

    /// Converts this move to coordinate notation, such as `e2e4` or `b7b8n`.
    #[inline(always)]
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl FromStr for Move {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_uci(s)
    }
}

impl PartialEq<&str> for Move {
    #[inline(always)]
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_move_parsing() {
        let mv = Move::from_uci("e2e4").unwrap();
        assert_eq!(mv.from(), "e2".parse::<Square>().unwrap());
        assert_eq!(mv.to(), "e4".parse::<Square>().unwrap());
        assert_eq!(mv.promotion(), None);
        assert_eq!(mv.to_string(), "e2e4");

        let mv = Move::from_uci("a2a1n").unwrap();
        assert_eq!(mv.promotion(), Some(PieceKind::Knight));
        assert_eq!(mv.to_string(), "a2a1n");
    }

    #[test]
    fn test_malformed_moves_are_rejected() {
        for bad in ["", "e2", "e2e", "e2e4qq", "z2e4", "e0e4", "e2e9", "e7e8p", "é2e4"] {
            assert!(Move::from_uci(bad).is_err(), "{bad:?} should not parse");
        }
    }

    #[test]
    fn test_promotion_is_part_of_equality() {
        let queen = Move::from_uci("e7e8q").unwrap();
        let knight = Move::from_uci("e7e8n").unwrap();
        assert_ne!(queen, knight);
        assert_eq!(queen, Move::from_uci("e7e8q").unwrap());
    }
}
