/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::{Position, DEFAULT_DEPTH};

/// Command-line interface of the engine.
#[derive(Debug, Clone, Parser)]
#[command(version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: EngineCommand,
}

/// A command to be sent to the engine.
///
/// Every command that inspects a position accepts `--fen`, and uses the standard starting position without it.
#[derive(Debug, Clone, Subcommand)]
pub enum EngineCommand {
    /// Replay a game from a history file, then write the best reply to an output file.
    ///
    /// Book moves are played while the game is still in the opening book.
    Play {
        /// File containing the moves played so far, one per line.
        #[arg(short = 'H', long)]
        history: PathBuf,

        /// File the chosen move is written to.
        #[arg(short = 'm', long = "move")]
        output: PathBuf,

        /// Depth to search to, in plies.
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        /// If set, the opening book will not be consulted.
        #[arg(long, default_value = "false")]
        no_book: bool,
    },

    /// Search a position and print the best move, with search info along the way.
    #[command(aliases = ["go", "search"])]
    Bestmove {
        #[arg(short, long, default_value_t = Position::default())]
        fen: Position,

        /// Depth to search to, in plies.
        #[arg(short, long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,

        /// If set, repeated positions will not be scored as draws.
        #[arg(long, default_value = "false")]
        no_repetitions: bool,
    },

    /// Print a visual representation of a position.
    #[command(alias = "d")]
    Display {
        #[arg(short, long, default_value_t = Position::default())]
        fen: Position,
    },

    /// Print an evaluation of a position.
    Eval {
        #[arg(short, long, default_value_t = Position::default())]
        fen: Position,

        /// If set, the contribution of every piece will be printed as well.
        #[arg(short, long, default_value = "false")]
        pretty: bool,
    },

    /// Shows all legal moves in a position.
    Moves {
        #[arg(short, long, default_value_t = Position::default())]
        fen: Position,

        /// If set, moves will be sorted in alphabetical order.
        ///
        /// By default, moves are printed in the order they were generated.
        #[arg(short, long, default_value = "false")]
        sort: bool,
    },

    /// Performs a perft on a position at the supplied depth, printing total node count.
    Perft {
        depth: usize,

        #[arg(short, long, default_value_t = Position::default())]
        fen: Position,
    },

    /// Performs a split perft on a position at the supplied depth.
    #[command(alias = "sperft")]
    Splitperft {
        depth: usize,

        #[arg(short, long, default_value_t = Position::default())]
        fen: Position,
    },
}
