// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use pecker::{perft, Position};

macro_rules! perft_test {
    ($name:ident, $fen:expr, $depth:expr, $nodes:expr) => {
        #[test]
        fn $name() {
            let pos = Position::from_fen($fen).unwrap();
            assert_eq!($nodes, perft(&pos, $depth));
        }
    };
}

const START: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";
const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";
const POSITION_3: &str = "8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1";
const POSITION_4: &str = "r3k2r/Pppp1ppp/1b3nbN/nP6/BBP1P3/q4N2/Pp1P2PP/R2Q1RK1 w kq - 0 1";
const POSITION_5: &str = "rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8";

perft_test!(start_1, START, 1, 20);
perft_test!(start_2, START, 2, 400);
perft_test!(start_3, START, 3, 8902);
perft_test!(kiwipete_1, KIWIPETE, 1, 48);
perft_test!(kiwipete_2, KIWIPETE, 2, 2039);
perft_test!(position_3_1, POSITION_3, 1, 14);
perft_test!(position_3_2, POSITION_3, 2, 191);
perft_test!(position_3_3, POSITION_3, 3, 2812);
perft_test!(position_4_1, POSITION_4, 1, 6);
perft_test!(position_4_2, POSITION_4, 2, 264);
perft_test!(position_5_1, POSITION_5, 1, 44);
perft_test!(position_5_2, POSITION_5, 2, 1486);
