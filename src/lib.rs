// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! A chess rules engine for replaying and checking tactical puzzle lines.
//!
//! `Position` holds the game and decides which moves are legal, `MoveGenerator` lists them,
//! `notation` reads and writes the terse move text found in puzzle databases, and `puzzle`
//! walks a solver through a recorded line.

#[macro_use]
extern crate num_derive;
#[macro_use]
extern crate bitflags;
#[macro_use]
extern crate lazy_static;
#[macro_use]
extern crate log;
#[macro_use]
extern crate serde_derive;

pub mod analysis;
mod bitboard;
mod board;
pub mod error;
mod movegen;
mod moves;
pub mod notation;
mod perft;
mod pieces;
mod position;
pub mod puzzle;
mod types;

pub use analysis::GameState;
pub use bitboard::{Bitboard, BitboardIterator};
pub use board::Board;
pub use error::{FenParseError, MoveError, NotationError, PuzzleError};
pub use movegen::{MoveGenerator, MoveVec, PromotionPolicy};
pub use moves::Move;
pub use notation::Language;
pub use perft::perft;
pub use position::{Position, Undo, START_POSITION};
pub use puzzle::{LichessRecord, PuzzleLine, PuzzleSession, RecordKind};
pub use types::{CastleStatus, Color, File, Piece, PieceKind, PromotionKind, Rank, Square};
