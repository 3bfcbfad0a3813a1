/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{
    fmt,
    ops::{Index, IndexMut, Not},
    str::FromStr,
};

use anyhow::{bail, Result};

/// The color of a player or a piece.
///
/// White moves first, and therefore [`Color`] defaults to [`Color::White`].
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Color {
    #[default]
    White,
    Black,
}

impl Color {
    /// Number of color variants.
    pub const COUNT: usize = 2;

    /// An array of both colors, starting with White.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        [Self::White, Self::Black]
    }

    /// Creates a new [`Color`] from a `bool`, where `false = White`.
    ///
    /// # Example
    /// ```
    /// # use herring::Color;
    /// assert_eq!(Color::from_bool(false), Color::White);
    /// assert_eq!(Color::from_bool(true), Color::Black);
    /// ```
    #[inline(always)]
    pub const fn from_bool(color: bool) -> Self {
        if color {
            Self::Black
        } else {
            Self::White
        }
    }

    /// Returns `true` if this [`Color`] is White.
    #[inline(always)]
    pub const fn is_white(&self) -> bool {
        matches!(self, Self::White)
    }

    /// Returns `true` if this [`Color`] is Black.
    #[inline(always)]
    pub const fn is_black(&self) -> bool {
        matches!(self, Self::Black)
    }

    /// Returns a multiplier for negating numbers relative to this color.
    ///
    /// # Example
    /// ```
    /// # use herring::Color;
    /// assert_eq!(Color::White.negation_multiplier(), 1);
    /// assert_eq!(Color::Black.negation_multiplier(), -1);
    /// ```
    #[inline(always)]
    pub const fn negation_multiplier(&self) -> i32 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Returns this [`Color`]'s opponent.
    ///
    /// # Example
    /// ```
    /// # use herring::Color;
    /// assert_eq!(Color::White.opponent(), Color::Black);
    /// assert_eq!(Color::Black.opponent(), Color::White);
    /// ```
    #[inline(always)]
    pub const fn opponent(&self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Returns this [`Color`] as a `usize`: `0` for White, `1` for Black.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// The rank (`y` coordinate) that this color's pawns start on.
    #[inline(always)]
    pub const fn pawn_rank(&self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => 6,
        }
    }

    /// The rank (`y` coordinate) that this color's pawns promote on.
    #[inline(always)]
    pub const fn promotion_rank(&self) -> u8 {
        match self {
            Self::White => 7,
            Self::Black => 0,
        }
    }

    /// The rank (`y` coordinate) that this color's King and Rooks start on.
    #[inline(always)]
    pub const fn back_rank(&self) -> u8 {
        match self {
            Self::White => 0,
            Self::Black => 7,
        }
    }

    /// Direction a pawn of this color advances along the `y` axis.
    #[inline(always)]
    pub const fn forward(&self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// Creates a [`Color`] from a FEN side-to-move character.
    #[inline(always)]
    pub fn from_uci(color: char) -> Result<Self> {
        match color {
            'w' | 'W' => Ok(Self::White),
            'b' | 'B' => Ok(Self::Black),
            _ => bail!("Color must be either 'w' or 'b' (case-insensitive). Found {color:?}"),
        }
    }

    /// Converts this [`Color`] to its FEN side-to-move character.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::White => 'w',
            Self::Black => 'b',
        }
    }

    /// Fetches a human-readable name for this [`Color`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::White => "white",
            Self::Black => "black",
        }
    }
}

impl Not for Color {
    type Output = Self;
    /// `!White` is `Black` and vice versa.
    #[inline(always)]
    fn not(self) -> Self::Output {
        self.opponent()
    }
}

/// The kind (or "role") that a chess piece can be.
///
/// These have no [`Color`] associated with them. See [`Piece`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Number of piece variants.
    pub const COUNT: usize = 6;

    /// An array of all 6 [`PieceKind`]s.
    #[inline(always)]
    pub const fn all() -> [Self; Self::COUNT] {
        use PieceKind::*;
        [Pawn, Knight, Bishop, Rook, Queen, King]
    }

    /// Kinds a pawn can promote to, in the order promotions are generated.
    #[inline(always)]
    pub const fn promotions() -> [Self; 4] {
        use PieceKind::*;
        [Queen, Rook, Bishop, Knight]
    }

    /// Returns this [`PieceKind`] as a `usize`, in `[0,5]`.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        *self as usize
    }

    /// Creates a new [`PieceKind`] from a character, case-insensitively.
    ///
    /// # Example
    /// ```
    /// # use herring::PieceKind;
    /// assert_eq!(PieceKind::from_uci('Q').unwrap(), PieceKind::Queen);
    /// assert!(PieceKind::from_uci('x').is_err());
    /// ```
    #[inline(always)]
    pub fn from_uci(kind: char) -> Result<Self> {
        match kind {
            'P' | 'p' => Ok(Self::Pawn),
            'N' | 'n' => Ok(Self::Knight),
            'B' | 'b' => Ok(Self::Bishop),
            'R' | 'r' => Ok(Self::Rook),
            'Q' | 'q' => Ok(Self::Queen),
            'K' | 'k' => Ok(Self::King),
            _ => bail!("Invalid char for PieceKind: Got {kind:?}."),
        }
    }

    /// Converts this [`PieceKind`] to a lowercase character.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        match self {
            Self::Pawn => 'p',
            Self::Knight => 'n',
            Self::Bishop => 'b',
            Self::Rook => 'r',
            Self::Queen => 'q',
            Self::King => 'k',
        }
    }

    /// Fetches a human-readable name for this [`PieceKind`].
    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Pawn => "pawn",
            Self::Knight => "knight",
            Self::Bishop => "bishop",
            Self::Rook => "rook",
            Self::Queen => "queen",
            Self::King => "king",
        }
    }
}

/// A chess piece on the board: a [`Color`] and a [`PieceKind`].
///
/// Internally, this is a `u8` with the following bit pattern:
///
/// ```text
///     0000 0 000
///      |   |  |
///      |   |  +- Represents the PieceKind.
///      |   +- Represents the Color.
///      +- Unused.
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct Piece(u8);

impl Piece {
    /// Number of distinct colored pieces.
    pub const COUNT: usize = 12;

    const COLOR_BIT: u8 = 0b1000;
    const KIND_MASK: u8 = 0b0111;

    pub const WHITE_PAWN: Self = Self::new(Color::White, PieceKind::Pawn);
    pub const WHITE_KNIGHT: Self = Self::new(Color::White, PieceKind::Knight);
    pub const WHITE_BISHOP: Self = Self::new(Color::White, PieceKind::Bishop);
    pub const WHITE_ROOK: Self = Self::new(Color::White, PieceKind::Rook);
    pub const WHITE_QUEEN: Self = Self::new(Color::White, PieceKind::Queen);
    pub const WHITE_KING: Self = Self::new(Color::White, PieceKind::King);

    pub const BLACK_PAWN: Self = Self::new(Color::Black, PieceKind::Pawn);
    pub const BLACK_KNIGHT: Self = Self::new(Color::Black, PieceKind::Knight);
    pub const BLACK_BISHOP: Self = Self::new(Color::Black, PieceKind::Bishop);
    pub const BLACK_ROOK: Self = Self::new(Color::Black, PieceKind::Rook);
    pub const BLACK_QUEEN: Self = Self::new(Color::Black, PieceKind::Queen);
    pub const BLACK_KING: Self = Self::new(Color::Black, PieceKind::King);

    /// Creates a new [`Piece`] from the given [`Color`] and [`PieceKind`].
    ///
    /// # Example
    /// ```
    /// # use herring::{Color, Piece, PieceKind};
    /// let queen = Piece::new(Color::Black, PieceKind::Queen);
    /// assert_eq!(queen.color(), Color::Black);
    /// assert_eq!(queen.kind(), PieceKind::Queen);
    /// ```
    #[inline(always)]
    pub const fn new(color: Color, kind: PieceKind) -> Self {
        Self((color as u8) << 3 | kind as u8)
    }

    /// Returns an iterator over all 12 pieces, White first.
    #[inline(always)]
    pub fn all() -> impl Iterator<Item = Self> {
        Color::all()
            .into_iter()
            .flat_map(|color| PieceKind::all().map(|kind| Self::new(color, kind)))
    }

    /// Fetches the [`Color`] of this [`Piece`].
    #[inline(always)]
    pub const fn color(&self) -> Color {
        Color::from_bool(self.0 & Self::COLOR_BIT != 0)
    }

    /// Fetches the [`PieceKind`] of this [`Piece`].
    #[inline(always)]
    pub const fn kind(&self) -> PieceKind {
        match self.0 & Self::KIND_MASK {
            0 => PieceKind::Pawn,
            1 => PieceKind::Knight,
            2 => PieceKind::Bishop,
            3 => PieceKind::Rook,
            4 => PieceKind::Queen,
            _ => PieceKind::King,
        }
    }

    /// Returns this piece as an index in `[0, 12)`, White's pieces first.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.color().index() * PieceKind::COUNT + self.kind().index()
    }

    /// Returns `true` if this piece has the given color and kind.
    #[inline(always)]
    pub fn is(&self, color: Color, kind: PieceKind) -> bool {
        *self == Self::new(color, kind)
    }

    /// Returns a copy of this piece with its kind replaced by `kind`.
    #[inline(always)]
    pub const fn promoted(self, kind: PieceKind) -> Self {
        Self::new(self.color(), kind)
    }

    /// Returns a copy of this piece with its color swapped.
    #[inline(always)]
    pub const fn inverted(self) -> Self {
        Self::new(self.color().opponent(), self.kind())
    }

    /// Creates a [`Piece`] from a FEN character: uppercase is White, lowercase is Black.
    ///
    /// # Example
    /// ```
    /// # use herring::Piece;
    /// assert_eq!(Piece::from_uci('n').unwrap(), Piece::BLACK_KNIGHT);
    /// assert_eq!(Piece::from_uci('K').unwrap(), Piece::WHITE_KING);
    /// ```
    #[inline(always)]
    pub fn from_uci(piece: char) -> Result<Self> {
        let kind = PieceKind::from_uci(piece)?;
        let color = Color::from_bool(piece.is_ascii_lowercase());
        Ok(Self::new(color, kind))
    }

    /// Converts this [`Piece`] to its FEN character.
    #[inline(always)]
    pub const fn to_uci(&self) -> char {
        let c = self.kind().to_uci();
        if self.color().is_white() {
            c.to_ascii_uppercase()
        } else {
            c
        }
    }

    /// Human-readable name, such as `"white knight"`.
    #[inline(always)]
    pub fn name(&self) -> String {
        format!("{} {}", self.color().name(), self.kind().name())
    }
}

macro_rules! impl_common_traits {
    ($type:ty) => {
        impl<T> Index<$type> for [T; <$type>::COUNT] {
            type Output = T;
            #[inline(always)]
            fn index(&self, index: $type) -> &Self::Output {
                &self[index.index()]
            }
        }

        impl<T> IndexMut<$type> for [T; <$type>::COUNT] {
            #[inline(always)]
            fn index_mut(&mut self, index: $type) -> &mut Self::Output {
                &mut self[index.index()]
            }
        }

        impl FromStr for $type {
            type Err = anyhow::Error;
            /// Does the same as [`Self::from_uci`], but only if `s` is one character in length.
            #[inline(always)]
            fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
                let mut chars = s.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Self::from_uci(c),
                    _ => bail!(
                        "Invalid str for {}: Must be a str of len 1. Got {s:?}",
                        stringify!($type)
                    ),
                }
            }
        }

        impl fmt::Display for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.to_uci())
            }
        }

        impl fmt::Debug for $type {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "\"{}\" ({})", self.name(), self.index())
            }
        }
    };
}

impl_common_traits!(Piece);
impl_common_traits!(PieceKind);
impl_common_traits!(Color);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_parts_roundtrip() {
        for color in Color::all() {
            for kind in PieceKind::all() {
                let piece = Piece::new(color, kind);
                assert_eq!(piece.color(), color);
                assert_eq!(piece.kind(), kind);
                assert_eq!(Piece::from_uci(piece.to_uci()).unwrap(), piece);
            }
        }
    }

    #[test]
    fn test_piece_indices_are_unique() {
        let mut seen = [false; Piece::COUNT];
        for piece in Piece::all() {
            assert!(!seen[piece.index()], "{piece:?} shares an index");
            seen[piece.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }

    #[test]
    fn test_promoted_keeps_color() {
        let queen = Piece::BLACK_PAWN.promoted(PieceKind::Queen);
        assert_eq!(queen, Piece::BLACK_QUEEN);
        assert_eq!(Piece::WHITE_ROOK.inverted(), Piece::BLACK_ROOK);
    }
}
