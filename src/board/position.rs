/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, str::FromStr};

use anyhow::{anyhow, bail, Context, Result};

use super::{Color, Move, Piece, PieceKind, Square, ZobristKey};

/// The castling rights of both players, stored as four flags.
///
/// ```text
/// 0b0001 -> White short (K)
/// 0b0010 -> White long  (Q)
/// 0b0100 -> Black short (k)
/// 0b1000 -> Black long  (q)
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CastlingRights(u8);

impl CastlingRights {
    pub const NONE: Self = Self(0);
    pub const WHITE_SHORT: Self = Self(0b0001);
    pub const WHITE_LONG: Self = Self(0b0010);
    pub const BLACK_SHORT: Self = Self(0b0100);
    pub const BLACK_LONG: Self = Self(0b1000);
    pub const ALL: Self = Self(0b1111);

    /// Number of possible combinations of castling rights.
    pub const COUNT: usize = 16;

    /// The kingside right of `color`.
    #[inline(always)]
    pub const fn short(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_SHORT,
            Color::Black => Self::BLACK_SHORT,
        }
    }

    /// The queenside right of `color`.
    #[inline(always)]
    pub const fn long(color: Color) -> Self {
        match color {
            Color::White => Self::WHITE_LONG,
            Color::Black => Self::BLACK_LONG,
        }
    }

    /// Returns `true` if every right in `rights` is held.
    #[inline(always)]
    pub const fn has(&self, rights: Self) -> bool {
        self.0 & rights.0 == rights.0
    }

    /// Returns `true` if no rights are held.
    #[inline(always)]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Adds `rights` to the held rights.
    #[inline(always)]
    pub fn insert(&mut self, rights: Self) {
        self.0 |= rights.0;
    }

    /// Removes `rights` from the held rights.
    #[inline(always)]
    pub fn remove(&mut self, rights: Self) {
        self.0 &= !rights.0;
    }

    /// Creates a `usize` for indexing into lists of [`CastlingRights::COUNT`] elements.
    #[inline(always)]
    pub const fn index(&self) -> usize {
        self.0 as usize
    }

    /// Swaps White's rights with Black's.
    #[inline(always)]
    pub const fn mirrored(self) -> Self {
        Self((self.0 & 0b0011) << 2 | (self.0 & 0b1100) >> 2)
    }

    /// The rights lost when a piece moves from, or is captured on, `square`.
    ///
    /// # Example
    /// ```
    /// # use herring::{CastlingRights, Square};
    /// assert_eq!(CastlingRights::lost_on(Square::H1), CastlingRights::WHITE_SHORT);
    /// assert_eq!(CastlingRights::lost_on(Square::E8).to_string(), "kq");
    /// assert!(CastlingRights::lost_on("d4".parse::<Square>().unwrap()).is_empty());
    /// ```
    #[inline(always)]
    pub const fn lost_on(square: Square) -> Self {
        match square.index() {
            0 => Self::WHITE_LONG,
            4 => Self(Self::WHITE_SHORT.0 | Self::WHITE_LONG.0),
            7 => Self::WHITE_SHORT,
            56 => Self::BLACK_LONG,
            60 => Self(Self::BLACK_SHORT.0 | Self::BLACK_LONG.0),
            63 => Self::BLACK_SHORT,
            _ => Self::NONE,
        }
    }

    /// Parses the castling field of a FEN string, such as `KQkq` or `-`.
    pub fn from_uci(castling: &str) -> Result<Self> {
        let mut rights = Self::NONE;
        if castling == "-" {
            return Ok(rights);
        }

        for c in castling.chars() {
            let right = match c {
                'K' => Self::WHITE_SHORT,
                'Q' => Self::WHITE_LONG,
                'k' => Self::BLACK_SHORT,
                'q' => Self::BLACK_LONG,
                _ => bail!("Invalid castling rights {castling:?}: unexpected {c:?}"),
            };
            rights.insert(right);
        }

        Ok(rights)
    }
}

impl fmt::Display for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "-");
        }

        for (right, c) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.has(right) {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CastlingRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Anything a move does beyond moving one piece and capturing on its destination.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum SideEffect {
    None,

    /// A pawn was captured en passant on this square.
    EnPassant(Square),

    /// The rook moved between these squares while castling.
    Castle { rook_from: Square, rook_to: Square },
}

/// Everything [`Position::make_move`] overwrites, so that [`Position::undo_move`] can put it back.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Undo {
    captured: Option<Piece>,
    moved: Piece,
    side_effect: SideEffect,
    castling_rights: CastlingRights,
    ep_square: Option<Square>,
    halfmove: usize,
    fullmove: usize,
    key: ZobristKey,
}

impl Undo {
    /// The piece removed from the board by the move, if any.
    ///
    /// For en passant, this is the captured pawn.
    #[inline(always)]
    pub const fn captured(&self) -> Option<Piece> {
        self.captured
    }

    /// The piece that stood on the origin square before the move.
    #[inline(always)]
    pub const fn moved(&self) -> Piece {
        self.moved
    }
}

/// Why a game ended in a draw.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DrawReason {
    InsufficientMaterial,
    FiftyMoves,
    Repetition,
}

/// The result of a finished game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
    Draw(DrawReason),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => write!(f, "checkmate, {} wins", winner.name()),
            Self::Stalemate => write!(f, "stalemate"),
            Self::Draw(DrawReason::InsufficientMaterial) => {
                write!(f, "draw by insufficient material")
            }
            Self::Draw(DrawReason::FiftyMoves) => write!(f, "draw by the fifty-move rule"),
            Self::Draw(DrawReason::Repetition) => write!(f, "draw by threefold repetition"),
        }
    }
}

/// A chess position: the contents of all 64 squares, plus everything else needed to continue the game.
///
/// The board is a flat array indexed by [`Square`], where every square holds at most one [`Piece`].
/// Alongside the current [`ZobristKey`], the position keeps the keys of every earlier position
/// reached through [`Position::make_move`], which is what repetition detection runs on.
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    /// What stands on each square.
    squares: [Option<Piece>; Square::COUNT],

    /// The [`Color`] of the current player.
    side_to_move: Color,

    /// Castling rights for both players.
    castling_rights: CastlingRights,

    /// Square a pawn may move to when capturing en passant.
    ep_square: Option<Square>,

    /// Used to enforce the fifty-move rule.
    ///
    /// - Incremented after each move.
    /// - Reset after a capture or a pawn moves.
    halfmove: usize,

    /// Number of moves since the beginning of the game.
    ///
    /// A fullmove is a complete turn by white and then by black.
    fullmove: usize,

    /// Zobrist hash key of this position.
    key: ZobristKey,

    /// Keys of all previous positions, oldest first.
    history: Vec<ZobristKey>,
}

impl Position {
    /// Creates a new, empty [`Position`] with the following properties:
    /// * No pieces on the board
    /// * White moves first
    /// * No castling rights
    /// * No en passant square available
    /// * Halfmove counter set to 0
    /// * Fullmove counter set to 1
    ///
    /// # Example
    /// ```
    /// # use herring::Position;
    /// let pos = Position::new();
    /// assert_eq!(pos.to_fen(), "8/8/8/8/8/8/8/8 w - - 0 1");
    /// ```
    pub fn new() -> Self {
        let mut pos = Self {
            squares: [None; Square::COUNT],
            side_to_move: Color::White,
            castling_rights: CastlingRights::NONE,
            ep_square: None,
            halfmove: 0,
            fullmove: 1,
            key: ZobristKey::default(),
            history: Vec::new(),
        };
        pos.key = ZobristKey::new(&pos);
        pos
    }

    /// Creates the standard starting position.
    ///
    /// # Example
    /// ```
    /// # use herring::{Position, FEN_STARTPOS};
    /// assert_eq!(Position::startpos().to_fen(), FEN_STARTPOS);
    /// ```
    pub fn startpos() -> Self {
        use PieceKind::*;
        const BACK_RANK: [PieceKind; 8] = [Rook, Knight, Bishop, Queen, King, Bishop, Knight, Rook];

        let mut pos = Self::new();
        for color in Color::all() {
            for (x, kind) in BACK_RANK.into_iter().enumerate() {
                let x = x as u8;
                pos.squares[Square::from_coords_unchecked(x, color.back_rank())] =
                    Some(Piece::new(color, kind));
                pos.squares[Square::from_coords_unchecked(x, color.pawn_rank())] =
                    Some(Piece::new(color, Pawn));
            }
        }
        pos.castling_rights = CastlingRights::ALL;
        pos.key = ZobristKey::new(&pos);
        pos
    }

    /// Creates a new [`Position`] from the provided FEN string.
    ///
    /// Missing trailing fields default to `w - - 0 1`.
    ///
    /// # Example
    /// ```
    /// # use herring::{Color, Position};
    /// let pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b").unwrap();
    /// assert_eq!(pos.side_to_move(), Color::Black);
    /// assert_eq!(pos.to_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 0 1");
    ///
    /// assert!(Position::from_fen("4k3/8/8/8/8/8/8/4K4 w - - 0 1").is_err());
    /// ```
    pub fn from_fen(fen: &str) -> Result<Self> {
        let mut pos = Self::new();
        let mut split = fen.split_whitespace();

        let placements = split
            .next()
            .ok_or(anyhow!("FEN string must have piece placements."))?;
        pos.squares = Self::placements_from_fen(placements)?;

        let active_color = split.next().unwrap_or("w");
        pos.side_to_move = match active_color {
            "w" => Color::White,
            "b" => Color::Black,
            _ => bail!("Invalid active color {active_color:?}: must be 'w' or 'b'"),
        };

        let castling = split.next().unwrap_or("-");
        pos.castling_rights = CastlingRights::from_uci(castling)?;

        let en_passant_target = split.next().unwrap_or("-");
        pos.ep_square = match en_passant_target {
            "-" => None,
            square => {
                let square = Square::from_str(square)
                    .with_context(|| format!("Invalid en passant square in FEN {fen:?}"))?;
                // The pawn that just double-pushed sits directly past the target square
                let (start_rank, ep_rank, pawn_rank, pusher) = match pos.side_to_move {
                    Color::White => (6, 5, 4, Piece::BLACK_PAWN),
                    Color::Black => (1, 2, 3, Piece::WHITE_PAWN),
                };
                if square.y() != ep_rank {
                    bail!(
                        "En passant square {square} must be on rank {} when {} is to move",
                        ep_rank + 1,
                        pos.side_to_move.name()
                    );
                }
                let pushed_from = Square::from_coords_unchecked(square.x(), start_rank);
                let pushed_to = Square::from_coords_unchecked(square.x(), pawn_rank);
                if pos.squares[pushed_from].is_some()
                    || pos.squares[square].is_some()
                    || pos.squares[pushed_to] != Some(pusher)
                {
                    bail!("En passant square {square} does not follow a double pawn push");
                }
                Some(square)
            }
        };

        let halfmove = split.next().unwrap_or("0");
        pos.halfmove = halfmove.parse().or(Err(anyhow!(
            "FEN string must have valid halfmove counter. Got {halfmove:?}"
        )))?;

        let fullmove = split.next().unwrap_or("1");
        pos.fullmove = fullmove.parse().or(Err(anyhow!(
            "FEN string must have valid fullmove counter. Got {fullmove:?}"
        )))?;

        pos.key = ZobristKey::new(&pos);
        Ok(pos)
    }

    /// Parses the piece placement field of a FEN string, listed from rank 8 down to rank 1.
    fn placements_from_fen(placements: &str) -> Result<[Option<Piece>; Square::COUNT]> {
        let mut squares = [None; Square::COUNT];

        let ranks = placements.split('/').collect::<Vec<_>>();
        if ranks.len() != 8 {
            bail!(
                "FEN must have piece placements for all 8 ranks. Got {}",
                ranks.len()
            );
        }

        for (i, rank) in ranks.into_iter().enumerate() {
            let y = 7 - i as u8;
            let mut x = 0;

            for c in rank.chars() {
                if let Some(empty) = c.to_digit(10) {
                    if empty == 0 || x as u32 + empty > 8 {
                        bail!("Invalid empty square count {c:?} on rank {} of FEN", y + 1);
                    }
                    x += empty as u8;
                } else {
                    if x >= 8 {
                        bail!("Too many squares on rank {} of FEN", y + 1);
                    }
                    let piece = Piece::from_uci(c)?;
                    squares[Square::from_coords_unchecked(x, y)] = Some(piece);
                    x += 1;
                }
            }

            if x != 8 {
                bail!("Rank {} of FEN must cover 8 squares. Got {x}", y + 1);
            }
        }

        Ok(squares)
    }

    /// Generates a FEN string from this [`Position`].
    ///
    /// # Example
    /// ```
    /// # use herring::{Position, FEN_KIWIPETE};
    /// let pos = Position::from_fen(FEN_KIWIPETE).unwrap();
    /// assert_eq!(pos.to_fen(), FEN_KIWIPETE);
    /// ```
    #[inline(always)]
    pub fn to_fen(&self) -> String {
        self.to_string()
    }

    /// Returns the contents of all squares.
    #[inline(always)]
    pub const fn squares(&self) -> &[Option<Piece>; Square::COUNT] {
        &self.squares
    }

    /// Returns the piece on `square`, if there is one.
    #[inline(always)]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// Returns `true` if nothing stands on `square`.
    #[inline(always)]
    pub const fn is_empty(&self, square: Square) -> bool {
        self.squares[square.index()].is_none()
    }

    /// Returns the color of the piece on `square`, if there is one.
    #[inline(always)]
    pub fn color_at(&self, square: Square) -> Option<Color> {
        self.piece_at(square).map(|piece| piece.color())
    }

    /// Finds the king of `color`, scanning from a1 to h8.
    #[inline(always)]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        let king = Piece::new(color, PieceKind::King);
        Square::iter().find(|&square| self.squares[square] == Some(king))
    }

    /// Returns an iterator over every occupied square and its piece, from a1 to h8.
    #[inline(always)]
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(|square| self.squares[square].map(|piece| (square, piece)))
    }

    /// Returns the current player as a [`Color`].
    #[inline(always)]
    pub const fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    /// Returns the en passant target square, if one exists.
    #[inline(always)]
    pub const fn ep_square(&self) -> Option<Square> {
        self.ep_square
    }

    /// Returns the castling rights of both players.
    #[inline(always)]
    pub const fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    /// Returns the half-move counter of the current position.
    #[inline(always)]
    pub const fn halfmove(&self) -> usize {
        self.halfmove
    }

    /// Returns the full-move counter of the current position.
    #[inline(always)]
    pub const fn fullmove(&self) -> usize {
        self.fullmove
    }

    /// Returns the Zobrist hash key of the current position.
    #[inline(always)]
    pub const fn key(&self) -> ZobristKey {
        self.key
    }

    /// Returns the keys of all positions that came before this one, oldest first.
    #[inline(always)]
    pub fn history(&self) -> &[ZobristKey] {
        &self.history
    }

    /// Returns `true` if the half-move counter is 100 or greater.
    ///
    /// Since "half-move" increments with each player's move, this checks for 50 *full* moves.
    #[inline(always)]
    pub const fn can_draw_by_fifty(&self) -> bool {
        self.halfmove >= 100
    }

    /// Returns `true` if neither side has enough material to deliver checkmate.
    ///
    /// That is the case with kings only, or with a single knight or bishop beside the kings.
    ///
    /// # Example
    /// ```
    /// # use herring::Position;
    /// let kings = Position::from_fen("8/8/4k3/8/8/2K5/8/8 w - - 0 1").unwrap();
    /// assert!(kings.can_draw_by_insufficient_material());
    ///
    /// let minor = Position::from_fen("8/8/4k3/8/8/2K2N2/8/8 w - - 0 1").unwrap();
    /// assert!(minor.can_draw_by_insufficient_material());
    ///
    /// let rook = Position::from_fen("8/8/4k3/8/8/2K2R2/8/8 w - - 0 1").unwrap();
    /// assert!(!rook.can_draw_by_insufficient_material());
    /// ```
    pub fn can_draw_by_insufficient_material(&self) -> bool {
        let mut minors = 0;
        for (_, piece) in self.pieces() {
            match piece.kind() {
                PieceKind::King => {}
                PieceKind::Knight | PieceKind::Bishop => minors += 1,
                _ => return false,
            }
        }
        minors <= 1
    }

    /// Returns `true` if the current position occurred before, since the last capture or pawn move.
    ///
    /// # Example
    /// ```
    /// # use herring::Position;
    /// let mut pos = Position::default();
    /// for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
    ///     pos.make_move(mv.parse().unwrap());
    /// }
    /// assert!(pos.is_repetition());
    /// assert!(!pos.is_threefold_repetition());
    /// ```
    #[inline(always)]
    pub fn is_repetition(&self) -> bool {
        self.repetitions() > 0
    }

    /// Returns `true` if the current position occurred twice before, since the last capture or pawn move.
    #[inline(always)]
    pub fn is_threefold_repetition(&self) -> bool {
        self.repetitions() >= 2
    }

    /// Counts earlier occurrences of the current position.
    ///
    /// Positions before the last irreversible move can never recur, so only the last `halfmove` keys are checked.
    fn repetitions(&self) -> usize {
        self.history
            .iter()
            .rev()
            .take(self.halfmove)
            .filter(|&&key| key == self.key)
            .count()
    }

    /// Returns the [`Outcome`] of the game, or `None` if it is still going.
    ///
    /// # Example
    /// ```
    /// # use herring::{Color, Outcome, Position};
    /// let mated = Position::from_fen("7k/6Q1/6K1/8/8/8/8/8 b - - 0 1").unwrap();
    /// assert_eq!(mated.outcome(), Some(Outcome::Checkmate { winner: Color::White }));
    ///
    /// assert_eq!(Position::default().outcome(), None);
    /// ```
    pub fn outcome(&self) -> Option<Outcome> {
        let mut pos = self.clone();
        if !pos.has_legal_moves() {
            return Some(if pos.is_in_check(pos.side_to_move) {
                Outcome::Checkmate {
                    winner: pos.side_to_move.opponent(),
                }
            } else {
                Outcome::Stalemate
            });
        }

        if self.can_draw_by_insufficient_material() {
            Some(Outcome::Draw(DrawReason::InsufficientMaterial))
        } else if self.can_draw_by_fifty() {
            Some(Outcome::Draw(DrawReason::FiftyMoves))
        } else if self.is_threefold_repetition() {
            Some(Outcome::Draw(DrawReason::Repetition))
        } else {
            None
        }
    }

    /// Returns the same position with colors swapped and the board flipped vertically.
    ///
    /// The history is not carried over.
    ///
    /// # Example
    /// ```
    /// # use herring::Position;
    /// let pos = Position::from_fen("4k3/8/8/8/4P3/8/8/R3K3 b Q e3 0 1").unwrap();
    /// assert_eq!(pos.mirrored().to_fen(), "r3k3/8/8/4p3/8/8/8/4K3 w q e6 0 1");
    /// ```
    pub fn mirrored(&self) -> Self {
        let mut pos = Self::new();
        for (square, piece) in self.pieces() {
            pos.squares[square.flipped_rank()] = Some(piece.inverted());
        }
        pos.side_to_move = self.side_to_move.opponent();
        pos.castling_rights = self.castling_rights.mirrored();
        pos.ep_square = self.ep_square.map(Square::flipped_rank);
        pos.halfmove = self.halfmove;
        pos.fullmove = self.fullmove;
        pos.key = ZobristKey::new(&pos);
        pos
    }

    /// Copy-make: returns a copy of this position with `mv` applied, leaving `self` untouched.
    ///
    /// # Example
    /// ```
    /// # use herring::Position;
    /// let pos = Position::default();
    /// let after = pos.with_move_made("e2e4".parse().unwrap());
    /// assert_eq!(after.to_fen(), "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1");
    /// assert_eq!(pos, Position::default());
    /// ```
    #[inline(always)]
    pub fn with_move_made(&self, mv: Move) -> Self {
        let mut copied = self.clone();
        copied.make_move(mv);
        copied
    }

    /// Applies `mv` to the position and returns the record needed to take it back.
    ///
    /// The move is not checked for legality. Castling is recognized as a king moving two files,
    /// and en passant as a pawn moving onto the en passant square.
    ///
    /// # Panics
    /// If there is no piece on the origin square of `mv`.
    ///
    /// # Example
    /// ```
    /// # use herring::Position;
    /// let mut pos = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
    /// let mv = "e1g1".parse().unwrap();
    /// let undo = pos.make_move(mv);
    /// assert_eq!(pos.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    ///
    /// pos.undo_move(mv, undo);
    /// assert_eq!(pos.to_fen(), "r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
    /// ```
    pub fn make_move(&mut self, mv: Move) -> Undo {
        let (from, to) = (mv.from(), mv.to());
        let Some(moved) = self.squares[from] else {
            panic!("No piece on {from} to make {mv} in {}", self.to_fen());
        };
        let color = moved.color();

        let mut undo = Undo {
            captured: None,
            moved,
            side_effect: SideEffect::None,
            castling_rights: self.castling_rights,
            ep_square: self.ep_square,
            halfmove: self.halfmove,
            fullmove: self.fullmove,
            key: self.key,
        };
        self.history.push(self.key);

        // Irreversible state is re-hashed in full once the pieces are in place
        if let Some(ep_square) = self.ep_square {
            self.key.hash_ep_square(ep_square);
        }
        self.key.hash_castling_rights(self.castling_rights);

        self.take(from);
        undo.captured = self.take(to);

        if moved.kind() == PieceKind::Pawn && from.x() != to.x() && Some(to) == self.ep_square {
            let victim = Square::from_coords_unchecked(to.x(), from.y());
            undo.captured = self.take(victim);
            undo.side_effect = SideEffect::EnPassant(victim);
        } else if moved.kind() == PieceKind::King && from.x().abs_diff(to.x()) == 2 {
            let (rook_x, rook_to_x) = if to.x() > from.x() { (7, 5) } else { (0, 3) };
            let rook_from = Square::from_coords_unchecked(rook_x, from.y());
            let rook_to = Square::from_coords_unchecked(rook_to_x, from.y());
            if let Some(rook) = self.take(rook_from) {
                self.place(rook, rook_to);
            }
            undo.side_effect = SideEffect::Castle { rook_from, rook_to };
        }

        let placed = mv.promotion().map_or(moved, |kind| moved.promoted(kind));
        self.place(placed, to);

        self.ep_square = None;
        if moved.kind() == PieceKind::Pawn && from.y().abs_diff(to.y()) == 2 {
            let ep_square = Square::from_coords_unchecked(from.x(), (from.y() + to.y()) / 2);
            self.ep_square = Some(ep_square);
            self.key.hash_ep_square(ep_square);
        }

        self.castling_rights.remove(CastlingRights::lost_on(from));
        self.castling_rights.remove(CastlingRights::lost_on(to));
        self.key.hash_castling_rights(self.castling_rights);

        if moved.kind() == PieceKind::Pawn || undo.captured.is_some() {
            self.halfmove = 0;
        } else {
            self.halfmove += 1;
        }

        if color.is_black() {
            self.fullmove += 1;
        }

        // White's key is 0, so hashing Black's key always toggles the side to move
        self.side_to_move = self.side_to_move.opponent();
        self.key.hash_side_to_move(Color::Black);

        undo
    }

    /// Reverts `mv`, which must be the last move made, using the [`Undo`] returned when it was made.
    pub fn undo_move(&mut self, mv: Move, undo: Undo) {
        let (from, to) = (mv.from(), mv.to());

        self.squares[to] = None;
        self.squares[from] = Some(undo.moved);

        match undo.side_effect {
            SideEffect::None => self.squares[to] = undo.captured,
            SideEffect::EnPassant(victim) => self.squares[victim] = undo.captured,
            SideEffect::Castle { rook_from, rook_to } => {
                self.squares[rook_from] = self.squares[rook_to].take();
            }
        }

        self.side_to_move = self.side_to_move.opponent();
        self.castling_rights = undo.castling_rights;
        self.ep_square = undo.ep_square;
        self.halfmove = undo.halfmove;
        self.fullmove = undo.fullmove;
        self.key = undo.key;
        self.history.pop();
    }

    /// Parses `uci` and plays it, if it is a legal move in this position.
    ///
    /// # Example
    /// ```
    /// # use herring::Position;
    /// let mut pos = Position::default();
    /// assert!(pos.play_uci("e2e4").is_ok());
    /// assert!(pos.play_uci("e2e4").is_err());
    /// ```
    pub fn play_uci(&mut self, uci: &str) -> Result<Undo> {
        let mv = Move::from_uci(uci)?;
        let legal = self.get_all_moves(self.side_to_move);
        if !legal.contains(&mv) {
            bail!("Illegal move {mv} in position {}", self.to_fen());
        }
        Ok(self.make_move(mv))
    }

    /// Places `piece` on the empty `square`, updating the key.
    #[inline(always)]
    fn place(&mut self, piece: Piece, square: Square) {
        self.squares[square] = Some(piece);
        self.key.hash_piece(square, piece);
    }

    /// Removes and returns whatever stands on `square`, updating the key.
    #[inline(always)]
    fn take(&mut self, square: Square) -> Option<Piece> {
        let piece = self.squares[square].take();
        if let Some(piece) = piece {
            self.key.hash_piece(square, piece);
        }
        piece
    }
}

impl FromStr for Position {
    type Err = anyhow::Error;
    #[inline(always)]
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_fen(s)
    }
}

impl Default for Position {
    #[inline(always)]
    fn default() -> Self {
        Self::startpos()
    }
}

impl fmt::Display for Position {
    /// Display this position's FEN string.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..8).rev() {
            let mut empty = 0;
            for x in 0..8 {
                match self.squares[Square::from_coords_unchecked(x, y)] {
                    Some(piece) => {
                        if empty > 0 {
                            write!(f, "{empty}")?;
                            empty = 0;
                        }
                        write!(f, "{piece}")?;
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                write!(f, "{empty}")?;
            }
            if y > 0 {
                write!(f, "/")?;
            }
        }

        let ep = self
            .ep_square
            .map(|square| square.to_string())
            .unwrap_or(String::from("-"));

        write!(
            f,
            " {} {} {ep} {} {}",
            self.side_to_move, self.castling_rights, self.halfmove, self.fullmove
        )
    }
}

impl fmt::Debug for Position {
    /// Pretty-prints the board, with the rest of the position state beside it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for y in (0..8).rev() {
            write!(f, "{}|", y + 1)?;
            for x in 0..8 {
                let piece = self.squares[Square::from_coords_unchecked(x, y)];
                let piece_char = piece.map(|p| p.to_uci()).unwrap_or('.');
                write!(f, " {piece_char}")?;
            }

            match y {
                6 => write!(f, "           FEN: {self}")?,
                5 => write!(f, "          Side: {}", self.side_to_move.name())?,
                4 => write!(f, "      Castling: {}", self.castling_rights)?,
                3 => {
                    let ep = self
                        .ep_square
                        .map(|square| square.to_string())
                        .unwrap_or(String::from("-"));
                    write!(f, "            EP: {ep}")?
                }
                2 => write!(f, "     Half-move: {}", self.halfmove)?,
                1 => write!(f, "     Full-move: {}", self.fullmove)?,
                0 => write!(f, "           Key: {}", self.key)?,
                _ => {}
            }
            writeln!(f)?;
        }

        write!(f, " +----------------\n   a b c d e f g h")
    }
}
