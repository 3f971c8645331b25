// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

#[macro_use]
extern crate criterion;

use criterion::black_box;
use criterion::Criterion;
use pecker::notation;
use pecker::{perft, Color, Move, MoveGenerator, Position, PromotionPolicy, Square};

const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq -";

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("position clone", |b| {
        let pos = Position::from_start_position();
        b.iter(|| black_box(&pos).clone())
    });

    c.bench_function("legal moves start", |b| {
        let pos = Position::from_start_position();
        let gen = MoveGenerator::new();
        b.iter(|| gen.legal_moves(black_box(&pos), Color::White, PromotionPolicy::All))
    });

    c.bench_function("legal moves kiwipete", |b| {
        let pos = Position::from_fen(KIWIPETE).unwrap();
        let gen = MoveGenerator::new();
        b.iter(|| gen.legal_moves(black_box(&pos), Color::White, PromotionPolicy::All))
    });

    c.bench_function("is_valid_move e2e4", |b| {
        let pos = Position::from_start_position();
        let mv = Move::new(Square::E2, Square::E4, Color::White);
        b.iter(|| black_box(&pos).is_valid_move(black_box(mv)))
    });

    c.bench_function("perft 2 start", |b| {
        let pos = Position::from_start_position();
        b.iter(|| perft(black_box(&pos), 2))
    });

    c.bench_function("parse short-form line", |b| {
        let pos = Position::from_start_position();
        let tokens = ["e4", "e5", "Nf3", "Nc6", "Bb5", "a6", "Ba4", "Nf6", "0-0", "Be7"];
        b.iter(|| notation::parse_line(black_box(&pos), &tokens))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
