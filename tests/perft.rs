/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

use herring::{perft, perft_generic, Position};

fn test_perft_fen_nodes(depth: usize, fen: &str, expected: u64) {
    let mut position = Position::from_fen(fen).unwrap();
    let res = perft(&mut position, depth);
    assert_eq!(res, expected, "PERFT({depth}) failed on {fen}");
    assert_eq!(position.to_fen(), Position::from_fen(fen).unwrap().to_fen());
}

#[cfg(test)]
mod startpos_perft {
    use super::*;
    use herring::FEN_STARTPOS;

    #[test]
    fn test_startpos_perft_shallow() {
        for (depth, nodes) in [1, 20, 400, 8902].into_iter().enumerate() {
            test_perft_fen_nodes(depth, FEN_STARTPOS, nodes);
        }
    }

    #[test]
    fn test_startpos_perft_4() {
        test_perft_fen_nodes(4, FEN_STARTPOS, 197281);
    }

    #[test]
    fn test_startpos_perft_5() {
        test_perft_fen_nodes(5, FEN_STARTPOS, 4865609);
    }

    #[test]
    fn test_full_counting_agrees() {
        let mut position = Position::default();
        assert_eq!(perft_generic::<false, false>(&mut position, 3), 8902);
    }
}

#[cfg(test)]
mod kiwipete_perft {
    use super::*;
    use herring::FEN_KIWIPETE;

    #[test]
    fn test_kiwipete_perft_1() {
        test_perft_fen_nodes(1, FEN_KIWIPETE, 48);
    }
    #[test]
    fn test_kiwipete_perft_2() {
        test_perft_fen_nodes(2, FEN_KIWIPETE, 2039);
    }
    #[test]
    fn test_kiwipete_perft_3() {
        test_perft_fen_nodes(3, FEN_KIWIPETE, 97862);
    }
    #[test]
    fn test_kiwipete_perft_4() {
        test_perft_fen_nodes(4, FEN_KIWIPETE, 4085603);
    }
}

#[cfg(test)]
mod position_3_perft {
    use super::*;

    // Trailing FEN fields are left off on purpose
    const FEN: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - -";

    #[test]
    fn test_position_3_perft_1() {
        test_perft_fen_nodes(1, FEN, 14);
    }
    #[test]
    fn test_position_3_perft_2() {
        test_perft_fen_nodes(2, FEN, 191);
    }
    #[test]
    fn test_position_3_perft_3() {
        test_perft_fen_nodes(3, FEN, 2812);
    }
    #[test]
    fn test_position_3_perft_4() {
        test_perft_fen_nodes(4, FEN, 43238);
    }
    #[test]
    fn test_position_3_perft_5() {
        test_perft_fen_nodes(5, FEN, 674624);
    }
}

#[cfg(test)]
mod promotion_perft {
    use crate::test_perft_fen_nodes;
    use herring::FEN_PROMOTIONS;

    #[test]
    fn test_promotion_perft_1() {
        test_perft_fen_nodes(1, FEN_PROMOTIONS, 24);
    }
    #[test]
    fn test_promotion_perft_2() {
        test_perft_fen_nodes(2, FEN_PROMOTIONS, 496);
    }
    #[test]
    fn test_promotion_perft_3() {
        test_perft_fen_nodes(3, FEN_PROMOTIONS, 9483);
    }
    #[test]
    fn test_promotion_perft_4() {
        test_perft_fen_nodes(4, FEN_PROMOTIONS, 182838);
    }
    #[test]
    fn test_promotion_perft_5() {
        test_perft_fen_nodes(5, FEN_PROMOTIONS, 3605103);
    }
}

/// https://www.chessprogramming.net/perfect-perft/
#[cfg(test)]
mod special_perfts {
    use super::*;

    #[test]
    fn test_special_perft_illegal_ep_move_1() {
        test_perft_fen_nodes(6, "3k4/3p4/8/K1P4r/8/8/8/8 b - - 0 1", 1134888);
    }

    #[test]
    fn test_special_perft_illegal_ep_move_2() {
        test_perft_fen_nodes(6, "8/8/4k3/8/2p5/8/B2P2K1/8 w - - 0 1", 1015133);
    }

    #[test]
    fn test_special_perft_ep_capture_checks_opponent() {
        test_perft_fen_nodes(6, "8/8/1k6/2b5/2pP4/8/5K2/8 b - d3 0 1", 1440467);
    }

    #[test]
    fn test_special_perft_short_castling_gives_check() {
        test_perft_fen_nodes(6, "5k2/8/8/8/8/8/8/4K2R w K - 0 1", 661072);
    }

    #[test]
    fn test_special_perft_long_castling_gives_check() {
        test_perft_fen_nodes(6, "3k4/8/8/8/8/8/8/R3K3 w Q - 0 1", 803711);
    }

    #[test]
    fn test_special_perft_castling_rights() {
        test_perft_fen_nodes(4, "r3k2r/1b4bq/8/8/8/8/7B/R3K2R w KQkq - 0 1", 1274206);
    }

    #[test]
    fn test_special_perft_castling_prevented() {
        test_perft_fen_nodes(4, "r3k2r/8/3Q4/8/8/5q2/8/R3K2R b KQkq - 0 1", 1720476);
    }

    #[test]
    fn test_special_perft_promote_out_of_check() {
        test_perft_fen_nodes(6, "2K2r2/4P3/8/8/8/8/8/3k4 w - - 0 1", 3821001);
    }

    #[test]
    fn test_special_perft_discovered_check() {
        test_perft_fen_nodes(5, "8/8/1P2K3/8/2n5/1q6/8/5k2 b - - 0 1", 1004658);
    }

    #[test]
    fn test_special_perft_promote_to_give_check() {
        test_perft_fen_nodes(6, "4k3/1P6/8/8/8/8/K7/8 w - - 0 1", 217342);
    }

    #[test]
    fn test_special_perft_under_promote_to_give_check() {
        test_perft_fen_nodes(6, "8/P1k5/K7/8/8/8/8/8 w - - 0 1", 92683);
    }

    #[test]
    fn test_special_perft_self_stalemate() {
        test_perft_fen_nodes(6, "K1k5/8/P7/8/8/8/8/8 w - - 0 1", 2217);
    }

    #[test]
    fn test_special_perft_stalemate_and_checkmate_1() {
        test_perft_fen_nodes(7, "8/k1P5/8/1K6/8/8/8/8 w - - 0 1", 567584);
    }

    #[test]
    fn test_special_perft_stalemate_and_checkmate_2() {
        test_perft_fen_nodes(4, "8/8/2k5/5q2/5n2/8/5K2/8 b - - 0 1", 23527);
    }
}
