/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use std::{fmt, time::Instant};

use anyhow::{bail, Result};

use crate::{
    Color, Evaluator, HistoryTable, KillerTable, Move, MoveOrderer, MovePicker, Outcome, Position,
    Score, DEFAULT_DEPTH, MAX_DEPTH,
};

/// The result of a search, containing the best move found, score, and total nodes searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SearchResult {
    /// Number of nodes searched.
    pub nodes: u64,

    /// Depth of the last completed iteration.
    pub depth: usize,

    /// Best move found during the search.
    pub bestmove: Option<Move>,

    /// Evaluation of the position after `bestmove` is made, from the side-to-move's perspective.
    pub score: Score,
}

impl Default for SearchResult {
    /// A default search result should initialize to a *very bad* value,
    /// since there isn't a move to play.
    #[inline(always)]
    fn default() -> Self {
        Self {
            nodes: 0,
            depth: 0,
            bestmove: None,
            score: -Score::INF,
        }
    }
}

/// Configuration variables for executing a [`Search`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Maximum depth to execute the search.
    pub max_depth: usize,

    /// Whether a position repeated below the root is scored as a draw.
    pub repetition_draws: bool,

    /// Whether to print `info` and `bestmove` lines to stdout while searching.
    pub print_info: bool,
}

impl Default for SearchConfig {
    #[inline(always)]
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            repetition_draws: true,
            print_info: false,
        }
    }
}

/// State that lives for the duration of one top-level search.
///
/// Holds the killer and history tables, which are shared by every node of the search,
/// and counts the nodes visited.
#[derive(Debug)]
pub struct SearchContext {
    /// Quiet moves that caused cutoffs, per ply.
    pub killers: KillerTable,

    /// Quiet moves that caused cutoffs, per piece and destination.
    pub history: HistoryTable,

    /// Number of nodes searched so far.
    pub nodes: u64,

    /// Whether a position repeated below the root is scored as a draw.
    repetition_draws: bool,
}

impl SearchContext {
    /// Creates a fresh context with empty heuristic tables.
    pub fn new(repetition_draws: bool) -> Self {
        Self {
            killers: KillerTable::default(),
            history: HistoryTable::default(),
            nodes: 0,
            repetition_draws,
        }
    }

    /// Searches every root move of `position` to `depth` and returns the best one with its score.
    ///
    /// `pv_move`, if legal, is searched first.
    /// Every root move gets the full `[-INF, INF]` window, and only a strictly better score replaces the best move,
    /// so ties go to the move that was ordered first.
    ///
    /// # Errors
    /// If `depth` is 0 or greater than [`MAX_DEPTH`], or if the side to move has no legal moves.
    pub fn search_root(
        &mut self,
        position: &mut Position,
        depth: usize,
        pv_move: Option<Move>,
    ) -> Result<(Move, Score)> {
        if depth == 0 {
            bail!("Cannot search to a depth of 0");
        }
        if depth > MAX_DEPTH {
            bail!("Cannot search deeper than {MAX_DEPTH} plies. Got {depth}");
        }

        let moves = position.legal_moves();
        if moves.is_empty() {
            let outcome = if position.is_in_check(position.side_to_move()) {
                Outcome::Checkmate {
                    winner: position.side_to_move().opponent(),
                }
            } else {
                Outcome::Stalemate
            };
            bail!("No legal moves in {}: {outcome}", position.to_fen());
        }

        self.nodes += 1;

        let orderer = MoveOrderer::new(&self.killers, &self.history, pv_move);
        let picker = MovePicker::with_orderer(moves, position, &orderer, 0);

        let mut best: Option<(Move, Score)> = None;
        for (mv, _) in picker {
            let undo = position.make_move(mv);
            let score = -self.negamax(position, depth - 1, 1, -Score::INF, Score::INF);
            position.undo_move(mv, undo);

            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((mv, score)),
            }
        }

        let Some(best) = best else {
            bail!("Root search of {} produced no move", position.to_fen());
        };
        Ok(best)
    }

    /// Primary location of search logic.
    ///
    /// Uses the [negamax](https://www.chessprogramming.org/Negamax) algorithm with [alpha-beta pruning](https://www.chessprogramming.org/Alpha-Beta).
    /// Scores are relative to the side to move in `position`.
    pub fn negamax(
        &mut self,
        position: &mut Position,
        depth: usize,
        ply: usize,
        mut alpha: Score,
        beta: Score,
    ) -> Score {
        self.nodes += 1;

        if ply > 0 {
            if self.is_draw(position) {
                return Score::DRAW;
            }

            // Checkmate on the move that reaches the fifty-move limit still wins
            if position.can_draw_by_fifty() {
                return if !position.has_legal_moves()
                    && position.is_in_check(position.side_to_move())
                {
                    Score::mated_in(ply)
                } else {
                    Score::DRAW
                };
            }
        }

        // If we've reached a terminal node, evaluate the position
        if depth == 0 {
            return Evaluator::new(position).eval();
        }

        let moves = position.legal_moves();

        // If there are no legal moves, it's either mate or a draw.
        if moves.is_empty() {
            return if position.is_in_check(position.side_to_move()) {
                // Prefer earlier mates
                Score::mated_in(ply)
            } else {
                // Drawing is better than losing
                Score::DRAW
            };
        }

        let orderer = MoveOrderer::new(&self.killers, &self.history, None);
        let picker = MovePicker::with_orderer(moves, position, &orderer, ply);

        // Start with a *really bad* initial score
        let mut best = -Score::INF;

        for (mv, _) in picker {
            let undo = position.make_move(mv);
            let score = -self.negamax(position, depth - 1, ply + 1, -beta, -alpha);
            position.undo_move(mv, undo);

            best = best.max(score);
            alpha = alpha.max(score);

            if alpha >= beta {
                // Quiet moves that refute a line are likely to refute its siblings too
                if undo.captured().is_none() {
                    self.killers.add(mv, ply);
                    self.history.update(undo.moved(), mv.to(), depth);
                }
                break;
            }
        }

        best
    }

    /// Returns `true` if `position` is drawn by repetition or by insufficient material.
    #[inline(always)]
    fn is_draw(&self, position: &Position) -> bool {
        (self.repetition_draws && position.is_repetition())
            || position.can_draw_by_insufficient_material()
    }
}

impl Default for SearchContext {
    #[inline(always)]
    fn default() -> Self {
        Self::new(SearchConfig::default().repetition_draws)
    }
}

/// Finds the best move for `color` in `position`, searching `depth` plies.
///
/// `position` is modified during the search, but is restored before this returns.
///
/// # Errors
/// If it is not `color`'s turn, if `depth` is out of range, or if `color` has no legal moves.
///
/// # Example
/// ```
/// # use herring::{get_best_move, Color, Position, Square};
/// // Mate in one
/// let mut pos = Position::from_fen("k7/8/KQ6/8/8/8/8/8 w - - 0 1").unwrap();
/// let (mv, score) = get_best_move(&mut pos, 2, Color::White).unwrap();
/// assert_eq!(mv.from(), "b6".parse::<Square>().unwrap());
/// assert_eq!(score.moves_to_mate(), 1);
///
/// // Stalemate
/// let mut pos = Position::from_fen("k7/8/KQ6/8/8/8/8/8 b - - 0 1").unwrap();
/// assert!(get_best_move(&mut pos, 2, Color::Black).is_err());
/// ```
pub fn get_best_move(position: &mut Position, depth: usize, color: Color) -> Result<(Move, Score)> {
    if color != position.side_to_move() {
        bail!(
            "Cannot search for {} when it is {}'s turn",
            color.name(),
            position.side_to_move().name()
        );
    }

    SearchContext::default().search_root(position, depth, None)
}

/// Executes an iteratively deepening search on the provided position.
pub struct Search<'a> {
    /// The position to search on.
    ///
    /// Moves are made and undone on it, so it is left unchanged once the search ends.
    position: &'a mut Position,

    /// Killers, history, and node counts shared by all iterations.
    context: SearchContext,

    /// Configuration variables for this instance of the search.
    config: SearchConfig,

    /// When this search began.
    starttime: Instant,
}

impl<'a> Search<'a> {
    /// Construct a new [`Search`] instance to execute on the provided [`Position`].
    #[inline(always)]
    pub fn new(position: &'a mut Position, config: SearchConfig) -> Self {
        Self {
            position,
            context: SearchContext::new(config.repetition_draws),
            config,
            starttime: Instant::now(),
        }
    }

    /// Start the search, returning its results if the search was successful.
    ///
    /// This is the entrypoint of the search, and prints info before calling [`Self::iterative_deepening`],
    /// and concluding by sending the `bestmove` message.
    pub fn start(mut self) -> Result<SearchResult> {
        self.send_info(format_args!(
            "string Starting search on {:?} to depth {}",
            self.position.to_fen(),
            self.config.max_depth
        ));

        let res = self.iterative_deepening()?;

        if self.config.print_info {
            if let Some(bestmove) = res.bestmove {
                println!("bestmove {bestmove}");
            }
        }

        Ok(res)
    }

    /// Performs [iterative deepening](https://www.chessprogramming.org/Iterative_Deepening) (ID) on the Search's position.
    ///
    /// Runs a full search at each depth from 1 to the maximum.
    /// The best move of each iteration is searched first in the next one.
    fn iterative_deepening(&mut self) -> Result<SearchResult> {
        let mut res = SearchResult::default();

        // Start at depth 1 because a search at depth 0 makes no sense
        for depth in 1..=self.config.max_depth {
            let (bestmove, score) =
                self.context
                    .search_root(self.position, depth, res.bestmove)?;

            res = SearchResult {
                nodes: self.context.nodes,
                depth,
                bestmove: Some(bestmove),
                score,
            };

            // Send search info to the GUI
            let elapsed = self.starttime.elapsed().as_millis();
            let nps = res.nodes as u128 * 1000 / elapsed.max(1);
            self.send_info(format_args!(
                "depth {depth} score {} nodes {} nps {nps} time {elapsed} pv {bestmove}",
                score.to_uci(),
                res.nodes,
            ));
        }

        if res.bestmove.is_none() {
            bail!("Search depth must be at least 1");
        }

        Ok(res)
    }

    /// Prints an `info` line, if enabled.
    #[inline(always)]
    fn send_info(&self, info: fmt::Arguments) {
        if self.config.print_info {
            println!("info {info}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FEN_KIWIPETE, FEN_POSITION_3};

    /// Plain negamax with no pruning and no move ordering, sharing the draw rules of the real search.
    fn negamax_unpruned(position: &mut Position, depth: usize, ply: usize) -> Score {
        if ply > 0 && (position.is_repetition() || position.can_draw_by_insufficient_material()) {
            return Score::DRAW;
        }

        let moves = position.legal_moves();
        let mated = moves.is_empty() && position.is_in_check(position.side_to_move());
        if ply > 0 && position.can_draw_by_fifty() {
            return if mated { Score::mated_in(ply) } else { Score::DRAW };
        }

        if depth == 0 {
            return Evaluator::new(position).eval();
        }

        if moves.is_empty() {
            return if position.is_in_check(position.side_to_move()) {
                Score::mated_in(ply)
            } else {
                Score::DRAW
            };
        }

        let mut best = -Score::INF;
        for mv in moves {
            let undo = position.make_move(mv);
            best = best.max(-negamax_unpruned(position, depth - 1, ply + 1));
            position.undo_move(mv, undo);
        }
        best
    }

    fn search(fen: &str, max_depth: usize) -> Result<SearchResult> {
        let mut pos = Position::from_fen(fen).unwrap();
        let config = SearchConfig {
            max_depth,
            ..Default::default()
        };
        Search::new(&mut pos, config).start()
    }

    fn ensure_is_mate_in(fen: &str, max_depth: usize, moves: i32) {
        let res = search(fen, max_depth).unwrap();
        assert!(
            res.score.is_mate(),
            "Search on {fen:?} produced result that is not mate.\nResult: {res:#?}"
        );
        assert_eq!(
            res.score.moves_to_mate(),
            moves,
            "Search on {fen:?} produced result not mate in {moves}.\nResult: {res:#?}"
        );
    }

    #[test]
    fn test_white_mate_in_1() {
        ensure_is_mate_in("k7/8/KQ6/8/8/8/8/8 w - - 0 1", 2, 1);
    }

    #[test]
    fn test_black_mated_in_1() {
        ensure_is_mate_in("1k6/8/KQ6/2Q5/8/8/8/8 b - - 0 1", 3, -1);
    }

    #[test]
    fn test_back_rank_mate() {
        let mut pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1").unwrap();
        let (mv, score) = get_best_move(&mut pos, 3, Color::White).unwrap();
        assert_eq!(mv, "a1a8");
        assert_eq!(score, Score::MATE - 1);
    }

    #[test]
    fn test_mate_beats_fifty_move_draw() {
        // Ra8 is mate and also the hundredth half-move without a capture or pawn move
        let mut pos = Position::from_fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 99 60").unwrap();
        let (mv, score) = get_best_move(&mut pos, 1, Color::White).unwrap();
        assert_eq!(mv, "a1a8");
        assert_eq!(score, Score::MATE - 1);

        // Any other quiet move reaches the limit and is a draw
        let mut context = SearchContext::default();
        let quiet: Move = "g1f1".parse().unwrap();
        let undo = pos.make_move(quiet);
        assert_eq!(context.negamax(&mut pos, 2, 1, -Score::INF, Score::INF), Score::DRAW);
        pos.undo_move(quiet, undo);
    }

    #[test]
    fn test_stalemate_and_checkmate_are_errors() {
        let err = search("k7/8/KQ6/8/8/8/8/8 b - - 0 1", 3).unwrap_err();
        assert!(err.to_string().contains("stalemate"), "{err}");

        let err = search("k7/1Q6/K7/8/8/8/8/8 b - - 0 1", 3).unwrap_err();
        assert!(err.to_string().contains("checkmate"), "{err}");
    }

    #[test]
    fn test_invalid_depths_are_errors() {
        let mut pos = Position::default();
        assert!(get_best_move(&mut pos, 0, Color::White).is_err());
        assert!(get_best_move(&mut pos, MAX_DEPTH + 1, Color::White).is_err());
        assert!(get_best_move(&mut pos, 1, Color::Black).is_err());
    }

    #[test]
    fn test_startpos_depth_1() {
        let mut pos = Position::default();
        let legal = pos.get_all_moves(Color::White);
        let (mv, _) = get_best_move(&mut pos, 1, Color::White).unwrap();
        assert!(legal.contains(&mv));
        assert_eq!(pos, Position::default());
    }

    #[test]
    fn test_lone_kings_are_drawn() {
        let mut pos = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        assert_eq!(Evaluator::new(&pos).eval(), Score::DRAW);
        assert_eq!(
            pos.outcome(),
            Some(Outcome::Draw(crate::DrawReason::InsufficientMaterial))
        );

        for depth in 1..=4 {
            let (_, score) = get_best_move(&mut pos, depth, Color::White).unwrap();
            assert_eq!(score, Score::DRAW);
        }
    }

    #[test]
    fn test_alpha_beta_matches_unpruned() {
        let cases = [
            (crate::FEN_STARTPOS, 3),
            (FEN_KIWIPETE, 2),
            (FEN_POSITION_3, 4),
            ("r1bqkbnr/pppp1ppp/2n5/4p2Q/2B1P3/8/PPPP1PPP/RNB1K1NR w KQkq - 2 3", 3),
            ("1k6/8/KQ6/2Q5/8/8/8/8 b - - 0 1", 3),
        ];

        for (fen, depth) in cases {
            let mut pos = Position::from_fen(fen).unwrap();
            let color = pos.side_to_move();
            let (_, score) = get_best_move(&mut pos, depth, color).unwrap();
            let expected = negamax_unpruned(&mut pos, depth, 0);
            assert_eq!(score, expected, "{fen} at depth {depth}");
        }
    }

    #[test]
    fn test_repetition_draws_below_root() {
        let mut pos = Position::from_fen("7k/8/8/8/8/8/8/K1Q5 w - - 0 1").unwrap();
        for mv in ["c1c2", "h8g8", "c2c1", "g8h8"] {
            pos.play_uci(mv).unwrap();
        }
        let mut context = SearchContext::new(true);
        let repeat: Move = "c1c2".parse().unwrap();
        let undo = pos.make_move(repeat);
        let undo_black = pos.make_move("h8g8".parse().unwrap());
        assert_eq!(context.negamax(&mut pos, 1, 2, -Score::INF, Score::INF), Score::DRAW);

        let mut context = SearchContext::new(false);
        assert_ne!(context.negamax(&mut pos, 1, 2, -Score::INF, Score::INF), Score::DRAW);

        pos.undo_move("h8g8".parse().unwrap(), undo_black);
        pos.undo_move(repeat, undo);
    }

    #[test]
    fn test_cutoffs_record_killers() {
        let mut pos = Position::from_fen(FEN_KIWIPETE).unwrap();
        let mut context = SearchContext::default();
        context.search_root(&mut pos, 3, None).unwrap();

        assert!(context.nodes > 0);
        assert!((1..3).any(|ply| context.killers.get(ply)[0].is_some()));
    }

    #[test]
    fn test_iterative_deepening_reports_last_depth() {
        let res = search(crate::FEN_STARTPOS, 3).unwrap();
        assert_eq!(res.depth, 3);
        assert!(res.bestmove.is_some());
        assert!(res.nodes > 20);
    }
}
