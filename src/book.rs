/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Opening lines, one per line, as space-separated moves in coordinate notation.
///
/// Earlier lines take precedence when several share a prefix.
const OPENINGS: &str = "\
e2e4 e7e5 g1f3 b8c6 f1b5 a7a6 b5a4 g8f6 e1g1 f8e7 f1e1 b7b5 a4b3 d7d6
e2e4 e7e5 g1f3 b8c6 f1c4 f8c5 c2c3 g8f6 d2d4 e5d4 c3d4 c5b4
e2e4 e7e5 g1f3 b8c6 d2d4 e5d4 f3d4 g8f6 d4c6 b7c6
e2e4 e7e5 g1f3 g8f6 f3e5 d7d6 e5f3 f6e4 d2d4 d6d5
e2e4 e7e5 b1c3 g8f6 f2f4 d7d5 f4e5 f6e4
e2e4 c7c5 g1f3 d7d6 d2d4 c5d4 f3d4 g8f6 b1c3 a7a6 c1e3 e7e5
e2e4 c7c5 g1f3 b8c6 d2d4 c5d4 f3d4 g8f6 b1c3 e7e5
e2e4 c7c5 b1c3 b8c6 g2g3 g7g6 f1g2 f8g7
e2e4 e7e6 d2d4 d7d5 b1c3 g8f6 c1g5 f8e7 e4e5 f6d7
e2e4 c7c6 d2d4 d7d5 b1c3 d5e4 c3e4 c8f5 e4g3 f5g6
e2e4 d7d5 e4d5 d8d5 b1c3 d5a5 d2d4 g8f6
d2d4 d7d5 c2c4 e7e6 b1c3 g8f6 c1g5 f8e7 e2e3 e8g8
d2d4 d7d5 c2c4 c7c6 g1f3 g8f6 b1c3 d5c4 a2a4 c8f5
d2d4 d7d5 c2c4 d5c4 g1f3 g8f6 e2e3 e7e6 f1c4 c7c5
d2d4 g8f6 c2c4 g7g6 b1c3 f8g7 e2e4 d7d6 g1f3 e8g8 f1e2 e7e5
d2d4 g8f6 c2c4 e7e6 b1c3 f8b4 e2e3 e8g8 f1d3 d7d5
d2d4 g8f6 c2c4 e7e6 g1f3 b7b6 g2g3 c8b7 f1g2 f8e7
d2d4 f7f5 g2g3 g8f6 f1g2 g7g6 g1f3 f8g7
c2c4 e7e5 b1c3 g8f6 g1f3 b8c6 g2g3 d7d5
c2c4 g8f6 b1c3 e7e6 e2e4 c7c5 e4e5 f6g8
g1f3 d7d5 g2g3 g8f6 f1g2 c7c6 e1g1 c8g4
g1f3 g8f6 c2c4 g7g6 b1c3 f8g7 e2e4 d7d6
";

/// Returns the next move after `history` in the first opening line that continues it, if any.
///
/// Moves are compared as whole tokens, so a history of `["e2e4"]` never matches a line starting with `e2e4e`.
/// An empty history matches the first line.
///
/// Lines are not checked for legality.
///
/// # Example
/// ```
/// # use herring::book_move;
/// assert_eq!(book_move::<&str>(&[]).as_deref(), Some("e2e4"));
/// assert_eq!(book_move(&["e2e4", "c7c5"]).as_deref(), Some("g1f3"));
/// assert_eq!(book_move(&["a2a3"]), None);
/// ```
pub fn book_move<S: AsRef<str>>(history: &[S]) -> Option<String> {
    let prefix = history
        .iter()
        .map(|mv| mv.as_ref().trim())
        .collect::<Vec<_>>()
        .join(" ");

    OPENINGS.lines().find_map(|line| {
        let rest = if prefix.is_empty() {
            line
        } else {
            line.strip_prefix(&prefix)?.strip_prefix(' ')?
        };

        rest.split_ascii_whitespace().next().map(String::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Position;

    #[test]
    fn test_first_matching_line_wins() {
        assert_eq!(book_move(&["e2e4", "e7e5", "g1f3"]).as_deref(), Some("b8c6"));
        assert_eq!(book_move(&["e2e4", "e7e5", "g1f3", "b8c6"]).as_deref(), Some("f1b5"));
        assert_eq!(book_move(&["e2e4", "e7e5", "g1f3", "g8f6"]).as_deref(), Some("f3e5"));
        assert_eq!(book_move(&["d2d4", "f7f5"]).as_deref(), Some("g2g3"));
    }

    #[test]
    fn test_no_book_move() {
        // Out of book
        assert_eq!(book_move(&["h2h4"]), None);

        // End of a line
        let line = OPENINGS.lines().next().unwrap();
        let history = line.split_ascii_whitespace().collect::<Vec<_>>();
        assert_eq!(book_move(&history), None);

        // Partial tokens never match
        assert_eq!(book_move(&["e2e"]), None);
    }

    #[test]
    fn test_every_line_is_legal() {
        for line in OPENINGS.lines() {
            let mut pos = Position::default();
            for mv in line.split_ascii_whitespace() {
                assert!(pos.play_uci(mv).is_ok(), "{mv} is illegal in {line:?}");
            }
        }
    }
}
