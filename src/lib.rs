/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Board representation, move generation, and hashing.
mod board;

/// Opening book lookups.
mod book;

/// Command-line argument parsing.
mod cli;

/// Code related to the engine's functionality, such as reading game files and executing commands.
mod engine;

/// Evaluation of chess positions.
mod eval;

/// Killer and history tables, used for move ordering.
mod history;

/// Move ordering heuristics.
mod movepicker;

/// Piece-Square tables.
mod psqt;

/// Scores returned by evaluation and search.
mod score;

/// Main engine logic; all search related code.
mod search;

/// Misc utility functions, constants, and types.
mod utils;

pub use board::*;
pub use book::*;
pub use cli::*;
pub use engine::*;
pub use eval::*;
pub use history::*;
pub use movepicker::*;
pub use psqt::*;
pub use score::*;
pub use search::*;
pub use utils::*;
