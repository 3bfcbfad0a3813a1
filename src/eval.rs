/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::fmt;

use crate::{Color, PieceKind, Position, Psqt, Score, Square};

/// Evaluates `position` from White's perspective.
///
/// A positive score favors White, a negative score favors Black.
///
/// # Example
/// ```
/// # use herring::{evaluate, Position, Score};
/// assert_eq!(evaluate(&Position::default()), Score::DRAW);
///
/// // White is up a queen
/// let pos = Position::from_fen("4k3/8/8/8/8/8/8/3QK3 w - - 0 1").unwrap();
/// assert!(evaluate(&pos) > Score(800));
/// ```
#[inline(always)]
pub fn evaluate(position: &Position) -> Score {
    Evaluator::new(position).eval_for(Color::White)
}

/// Encapsulates the logic of scoring a chess position.
///
/// Generally, a high score is good for White, and a low score is good for Black.
/// However, during a negamax search, positions must be evaluated from the side-to-move's perspective.
/// That is, if it is Black's turn, a "good" evaluation for Black will be a positive number.
#[derive(Debug, Clone)]
pub struct Evaluator<'a> {
    /// The position to evaluate.
    position: &'a Position,
}

impl<'a> Evaluator<'a> {
    /// Construct a new [`Evaluator`].
    #[inline(always)]
    pub fn new(position: &'a Position) -> Self {
        Self { position }
    }

    /// Evaluate this position from the side-to-move's perspective.
    ///
    /// A positive/high number is good for the side-to-move, while a negative number is better for the opponent.
    /// A score of 0 is considered equal.
    #[inline(always)]
    pub fn eval(&self) -> Score {
        self.eval_for(self.position.side_to_move())
    }

    /// Evaluate this position from `color`'s perspective.
    ///
    /// Sums material and piece-square bonuses over every occupied square.
    /// Two bare kings are always equal, wherever they stand.
    pub fn eval_for(&self, color: Color) -> Score {
        if self
            .position
            .pieces()
            .all(|(_, piece)| piece.kind() == PieceKind::King)
        {
            return Score::DRAW;
        }

        let mut score = Score::DRAW;
        for (square, piece) in self.position.pieces() {
            let psqt_score = Psqt::eval(piece, square);

            // Flip scores appropriately to evaluate from `color`'s perspective
            if color == piece.color() {
                score += psqt_score;
            } else {
                score -= psqt_score;
            }
        }

        score
    }

    /// Fetches the value for the piece on the specified square, if one exists, from White's perspective.
    ///
    /// Only used when printing the evaluator
    #[inline(always)]
    fn value_at(&self, square: Square) -> Option<Score> {
        self.position.piece_at(square).map(|piece| {
            Score(Psqt::eval(piece, square) * piece.color().negation_multiplier())
        })
    }
}

impl fmt::Display for Evaluator<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let border = "  +-----+-----+-----+-----+-----+-----+-----+-----+";

        writeln!(f, "{border}")?;
        for y in (0..8).rev() {
            write!(f, "{} |", y + 1)?;

            // Step 1: Write the piece char
            for x in 0..8 {
                let square = Square::from_coords_unchecked(x, y);
                let piece = self.position.piece_at(square);
                let piece_char = piece.map(|p| p.to_uci()).unwrap_or(' ');
                write!(f, "  {piece_char}  |")?;
            }
            writeln!(f)?;
            write!(f, "  |")?;

            // Step 2: Write the contribution of that piece, leaving out the King's material
            for x in 0..8 {
                let square = Square::from_coords_unchecked(x, y);
                let score = match self.position.piece_at(square).zip(self.value_at(square)) {
                    Some((piece, val)) => {
                        let val = if piece.kind() == PieceKind::King {
                            val - value_of(PieceKind::King) * piece.color().negation_multiplier()
                        } else {
                            val
                        };
                        let s = if val > Score::DRAW {
                            format!("+{}", val.normalize())
                        } else {
                            format!("{}", val.normalize())
                        };
                        format!("{s:^5}")
                    }
                    None => String::from("     "),
                };
                write!(f, "{score}|")?;
            }

            writeln!(f)?;
            writeln!(f, "{border}")?;
        }
        for file in 'a'..='h' {
            write!(f, "     {file}")?;
        }

        let score = self.eval_for(Color::White);

        let winning_side = if score > Score::DRAW {
            Some(Color::White)
        } else if score < Score::DRAW {
            Some(Color::Black)
        } else {
            None
        };

        writeln!(f)?;
        writeln!(f)?;
        writeln!(
            f,
            "Winning side: {}",
            winning_side.map(|c| c.name()).unwrap_or("N/A")
        )?;
        writeln!(f, "Score: {score}")?;

        Ok(())
    }
}

/// Returns the material value of the provided `PieceKind`, in centipawns.
///
/// Values are obtained from here: <https://www.chessprogramming.org/Simplified_Evaluation_Function>
#[inline(always)]
pub const fn value_of(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::Pawn => 100,
        PieceKind::Knight => 320,
        PieceKind::Bishop => 330,
        PieceKind::Rook => 500,
        PieceKind::Queen => 900,
        PieceKind::King => 20_000,
    }
}
