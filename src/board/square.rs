/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut},
    str::FromStr,
};

use anyhow::{bail, Result};

/// Returns `true` if `(x, y)` lies on the board, meaning `0 <= x, y <= 7`.
///
/// # Example
/// ```
/// # use herring::in_bounds;
/// assert!(in_bounds(0, 7));
/// assert!(!in_bounds(8, 0));
/// assert!(!in_bounds(3, -1));
/// ```
#[inline(always)]
pub const fn in_bounds(x: i8, y: i8) -> bool {
    0 <= x && x <= 7 && 0 <= y && y <= 7
}

/// A single square on an `8x8` chess board.
///
/// Squares use least-significant file mapping, so `index = x + y * 8`,
/// where `x` is the file (`a = 0`) and `y` is the rank (`1 = 0`):
/// ```text
/// 8| 56 57 58 59 60 61 62 63
/// 7| 48 49 50 51 52 53 54 55
/// 6| 40 41 42 43 44 45 46 47
/// 5| 32 33 34 35 36 37 38 39
/// 4| 24 25 26 27 28 29 30 31
/// 3| 16 17 18 19 20 21 22 23
/// 2|  8  9 10 11 12 13 14 15
/// 1|  0  1  2  3  4  5  6  7
///  +------------------------
///    a  b  c  d  e  f  g  h
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    pub const A1: Self = Self(0);
    pub const B1: Self = Self(1);
    pub const C1: Self = Self(2);
    pub const D1: Self = Self(3);
    pub const E1: Self = Self(4);
    pub const F1: Self = Self(5);
    pub const G1: Self = Self(6);
    pub const H1: Self = Self(7);

    pub const A8: Self = Self(56);
    pub const B8: Self = Self(57);
    pub const C8: Self = Self(58);
    pub const D8: Self = Self(59);
    pub const E8: Self = Self(60);
    pub const F8: Self = Self(61);
    pub const G8: Self = Self(62);
    pub const H8: Self = Self(63);

    pub const COUNT: usize = 64;

    /// Returns an iterator over all squares, from a1 to h8 rank by rank.
    ///
    /// # Example
    /// ```
    /// # use herring::Square;
    /// let mut iter = Square::iter();
    /// assert_eq!(iter.len(), 64);
    /// assert_eq!(iter.next().unwrap(), Square::A1);
    /// assert_eq!(iter.last().unwrap(), Square::H8);
    /// ```
    #[inline(always)]
    pub fn iter() -> impl ExactSizeIterator<Item = Self> + DoubleEndedIterator<Item = Self> {
        (0..Self::COUNT as u8).map(Self)
    }

    /// Creates a new [`Square`] from `x` (file) and `y` (rank) coordinates.
    ///
    /// Returns `None` if the coordinates are off the board.
    ///
    /// # Example
    /// ```
    /// # use herring::Square;
    /// assert_eq!(Square::new(4, 0), Some(Square::E1));
    /// assert_eq!(Square::new(8, 0), None);
    /// ```
    #[inline(always)]
    pub const fn new(x: i8, y: i8) -> Option<Self> {
        if in_bounds(x, y) {
            Some(Self((x + y * 8) as u8))
        } else {
            None
        }
    }

    /// Creates a new [`Square`] from coordinates known to be on the board.
    #[inline(always)]
    pub const fn from_coords_unchecked(x: u8, y: u8) -> Self {
        debug_assert!(x < 8 && y < 8, "Coordinates must be between [0,7]");
        Self(x + y * 8)
    }

    /// The `x` coordinate (file) of this square, in `[0, 7]`.
    #[inline(always)]
    pub const fn x(&self) -> u8 {
        self.0 & 7
    }

    /// The `y` coordinate (rank) of this square, in `[0, 7]`.
    #[inline(always)]
    pub const fn y(&self) -> u8 {
        self.0 >> 3
    }

    /// Returns this square as an index into a 64-element list.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Returns the square `dx` files and `dy` ranks away, if it is on the board.
    ///
    /// # Example
    /// ```
    /// # use herring::Square;
    /// assert_eq!(Square::E1.offset(2, 0), Some(Square::G1));
    /// assert_eq!(Square::H1.offset(1, 0), None);
    /// ```
    #[inline(always)]
    pub const fn offset(&self, dx: i8, dy: i8) -> Option<Self> {
        Self::new(self.x() as i8 + dx, self.y() as i8 + dy)
    }

    /// Mirrors this square vertically, so that a1 becomes a8.
    ///
    /// # Example
    /// ```
    /// # use herring::Square;
    /// assert_eq!(Square::A1.flipped_rank(), Square::A8);
    /// assert_eq!(Square::G8.flipped_rank(), Square::G1);
    /// ```
    #[inline(always)]
    pub const fn flipped_rank(self) -> Self {
        Self(self.0 ^ 56)
    }

    /// Parses a square from its file letter and rank digit.
    #[inline(always)]
    pub fn from_chars(file: char, rank: char) -> Result<Self> {
        if !('a'..='h').contains(&file) {
            bail!("Invalid file {file:?}: must be between 'a' and 'h'");
        }
        if !('1'..='8').contains(&rank) {
            bail!("Invalid rank {rank:?}: must be between '1' and '8'");
        }
        Ok(Self::from_coords_unchecked(
            file as u8 - b'a',
            rank as u8 - b'1',
        ))
    }

    /// The file letter of this square.
    #[inline(always)]
    pub const fn file_char(&self) -> char {
        (b'a' + self.x()) as char
    }

    /// The rank digit of this square.
    #[inline(always)]
    pub const fn rank_char(&self) -> char {
        (b'1' + self.y()) as char
    }
}

impl FromStr for Square {
    type Err = anyhow::Error;
    /// Parses a square in coordinate notation, such as `"e4"`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => Self::from_chars(file, rank),
            _ => bail!("Invalid str for Square: Must be 2 characters. Got {s:?}"),
        }
    }
}

impl<T> Index<Square> for [T; Square::COUNT] {
    type Output = T;
    #[inline(always)]
    fn index(&self, index: Square) -> &Self::Output {
        &self[index.index()]
    }
}

impl<T> IndexMut<Square> for [T; Square::COUNT] {
    #[inline(always)]
    fn index_mut(&mut self, index: Square) -> &mut Self::Output {
        &mut self[index.index()]
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl fmt::Debug for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self} ({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_parsing() {
        assert_eq!("a1".parse::<Square>().unwrap(), Square::A1);
        assert_eq!("h8".parse::<Square>().unwrap(), Square::H8);
        assert_eq!("e4".parse::<Square>().unwrap(), Square::new(4, 3).unwrap());

        assert!("i1".parse::<Square>().is_err());
        assert!("a9".parse::<Square>().is_err());
        assert!("a".parse::<Square>().is_err());
        assert!("a1b".parse::<Square>().is_err());
    }

    #[test]
    fn test_square_display_roundtrip() {
        for square in Square::iter() {
            assert_eq!(square.to_string().parse::<Square>().unwrap(), square);
        }
    }

    #[test]
    fn test_offsets_respect_bounds() {
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::A1.offset(0, -1), None);
        assert_eq!(Square::H8.offset(0, 1), None);
        assert_eq!(Square::A1.offset(7, 7), Some(Square::H8));
    }
}
