/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fs, path::Path, time::Instant};

use anyhow::{Context, Result};

use crate::{
    book_move, perft, splitperft, EngineCommand, Evaluator, Move, Position, Search, SearchConfig,
};

impl EngineCommand {
    /// Executes this command, printing its results to stdout.
    pub fn execute(self) -> Result<()> {
        match self {
            Self::Play {
                history,
                output,
                depth,
                no_book,
            } => play(&history, &output, depth, !no_book),

            Self::Bestmove {
                mut fen,
                depth,
                no_repetitions,
            } => {
                let config = SearchConfig {
                    max_depth: depth,
                    repetition_draws: !no_repetitions,
                    print_info: true,
                };
                Search::new(&mut fen, config).start()?;
                Ok(())
            }

            Self::Display { fen } => {
                println!("{fen:?}");
                Ok(())
            }

            Self::Eval { fen, pretty } => {
                eval(&fen, pretty);
                Ok(())
            }

            Self::Moves { mut fen, sort } => {
                let mut moves = fen
                    .legal_moves()
                    .into_iter()
                    .map(|mv| mv.to_string())
                    .collect::<Vec<_>>();

                if sort {
                    moves.sort();
                }

                // If there are none, print "(none)"
                if moves.is_empty() {
                    println!("(none)");
                } else {
                    println!("{}", moves.join(", "));
                }
                Ok(())
            }

            Self::Perft { depth, mut fen } => {
                print_perft(&mut fen, depth, false);
                Ok(())
            }

            Self::Splitperft { depth, mut fen } => {
                print_perft(&mut fen, depth, true);
                Ok(())
            }
        }
    }
}

/// Executes the `play` command.
///
/// Replays the game in `history_path`, picks a reply from the book or by searching to `depth`,
/// and writes it to `output_path`.
fn play(history_path: &Path, output_path: &Path, depth: usize, use_book: bool) -> Result<()> {
    let history = read_history(history_path)?;
    let mut position = replay_history(&history)
        .with_context(|| format!("Failed to replay {}", history_path.display()))?;

    let book = use_book
        .then(|| book_move(&history))
        .flatten()
        .and_then(|mv| legal_move(&mut position, &mv));

    let mv = match book {
        Some(mv) => {
            println!("info string Book move {mv}");
            mv
        }
        None => {
            let config = SearchConfig {
                max_depth: depth,
                print_info: true,
                ..Default::default()
            };
            let res = Search::new(&mut position, config).start()?;
            res.bestmove
                .context("Search finished without a best move")?
        }
    };

    write_move(output_path, mv)
}

/// Executes the `eval` command, printing an evaluation of `position`.
fn eval(position: &Position, pretty: bool) {
    let evaluator = Evaluator::new(position);
    if pretty {
        print!("{evaluator}\n\nScore: ");
    }

    println!("{}", evaluator.eval());
}

/// Runs a perft and prints the node count along with how long it took.
fn print_perft(position: &mut Position, depth: usize, split: bool) {
    let now = Instant::now();
    let nodes = if split {
        splitperft(position, depth)
    } else {
        perft(position, depth)
    };
    let elapsed = now.elapsed();

    let nps = nodes as f64 / elapsed.as_secs_f64();
    let mnps = nps / 1_000_000.0;
    if split {
        println!();
    }
    println!("Nodes:\t{nodes}");
    println!("Time:\t{elapsed:.1?}");
    println!("NPS:\t{nps:.0} ({mnps:.2} Mnps)");
}

/// Parses `mv` and returns it if it is legal in `position`.
fn legal_move(position: &mut Position, mv: &str) -> Option<Move> {
    let mv: Move = mv.parse().ok()?;
    position.legal_moves().contains(&mv).then_some(mv)
}

/// Reads a move history from `path`, one move per line.
///
/// Surrounding whitespace is trimmed and blank lines are skipped.
pub fn read_history(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read move history from {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Plays every move of `history` from the standard starting position.
///
/// # Errors
/// If any move is malformed or illegal in the position it is played from.
///
/// # Example
/// ```
/// # use herring::{replay_history, Position};
/// let pos = replay_history(&["e2e4", "e7e5"]).unwrap();
/// assert_eq!(pos.to_fen(), "rnbqkbnr/pppp1ppp/8/4p3/4P3/8/PPPP1PPP/RNBQKBNR w KQkq e6 0 2");
///
/// assert!(replay_history(&["e2e4", "e2e4"]).is_err());
/// ```
pub fn replay_history<S: AsRef<str>>(history: &[S]) -> Result<Position> {
    let mut position = Position::default();
    for (i, mv) in history.iter().enumerate() {
        let mv = mv.as_ref();
        position
            .play_uci(mv)
            .with_context(|| format!("Move {} ({mv:?}) could not be played", i + 1))?;
    }
    Ok(position)
}

/// Writes `mv` to `path` in coordinate notation, replacing its contents.
pub fn write_move(path: impl AsRef<Path>, mv: Move) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, format!("{mv}\n"))
        .with_context(|| format!("Failed to write move to {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    /// A file in the temp directory, removed when dropped.
    struct TempFile(std::path::PathBuf);

    impl TempFile {
        fn new(name: &str, contents: &str) -> Self {
            let path = env::temp_dir().join(format!("herring-{}-{name}", std::process::id()));
            fs::write(&path, contents).unwrap();
            Self(path)
        }
    }

    impl Drop for TempFile {
        fn drop(&mut self) {
            let _ = fs::remove_file(&self.0);
        }
    }

    #[test]
    fn test_read_history_skips_blank_lines() {
        let file = TempFile::new("blank.txt", "e2e4\n\n  e7e5 \n\ng1f3\n");
        assert_eq!(read_history(&file.0).unwrap(), ["e2e4", "e7e5", "g1f3"]);

        assert!(read_history(file.0.with_extension("missing")).is_err());
    }

    #[test]
    fn test_replay_tracks_history() {
        let pos = replay_history(&["g1f3", "g8f6", "f3g1", "f6g8"]).unwrap();
        assert_eq!(pos.squares(), Position::default().squares());
        assert_eq!(pos.history().len(), 4);
        assert!(pos.is_repetition());

        let err = replay_history(&["e2e4", "e7e5", "e1e3"]).unwrap_err();
        assert!(format!("{err:#}").contains("Move 3"), "{err:#}");
    }

    #[test]
    fn test_play_uses_book_then_search() {
        let history = TempFile::new("play-history.txt", "e2e4\ne7e5\n");
        let output = TempFile::new("play-output.txt", "");

        play(&history.0, &output.0, 1, true).unwrap();
        assert_eq!(fs::read_to_string(&output.0).unwrap(), "g1f3\n");

        // Without the book, a legal move is still written
        play(&history.0, &output.0, 1, false).unwrap();
        let written = fs::read_to_string(&output.0).unwrap();
        let mv: Move = written.trim().parse().unwrap();
        let mut pos = replay_history(&["e2e4", "e7e5"]).unwrap();
        assert!(pos.legal_moves().contains(&mv));
    }

    #[test]
    fn test_play_with_no_legal_moves_fails() {
        // Fool's mate
        let history = TempFile::new("mated.txt", "f2f3\ne7e5\ng2g4\nd8h4\n");
        let output = TempFile::new("mated-output.txt", "");
        let err = play(&history.0, &output.0, 2, true).unwrap_err();
        assert!(err.to_string().contains("checkmate"), "{err}");
    }
}
