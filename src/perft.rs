// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use rayon::prelude::*;

use crate::movegen::{MoveGenerator, PromotionPolicy};
use crate::position::Position;

/// Counts the leaf nodes of the legal move tree rooted at `pos`, `depth` plies deep. Root moves
/// are searched in parallel; each worker walks its subtree with make/unmake on its own copy.
pub fn perft(pos: &Position, depth: u32) -> u64 {
    if depth == 0 {
        return 1;
    }

    let movegen = MoveGenerator::new();
    let moves = movegen.legal_moves(pos, pos.side_to_move(), PromotionPolicy::All);
    if depth == 1 {
        return moves.len() as u64;
    }

    moves
        .as_slice()
        .par_iter()
        .map(|&mov| {
            let mut new_pos = pos.clone();
            new_pos.make_move(mov);
            perft_serial(&mut new_pos, depth - 1)
        })
        .sum()
}

fn perft_serial(pos: &mut Position, depth: u32) -> u64 {
    let movegen = MoveGenerator::new();
    let moves = movegen.legal_moves(pos, pos.side_to_move(), PromotionPolicy::All);
    if depth == 1 {
        return moves.len() as u64;
    }

    let mut nodes = 0;
    for &mov in moves.iter() {
        let undo = pos.make_move(mov);
        nodes += perft_serial(pos, depth - 1);
        pos.unmake_move(undo);
    }

    nodes
}
