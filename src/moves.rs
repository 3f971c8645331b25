// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The `moves` module contains the definition of a `Move`.
//!
//! A move is just its four fields: where a piece comes from, where it goes, who is moving it,
//! and what it becomes if it's a pawn reaching the last rank. Whether a move is a capture,
//! a castle or an en-passant capture depends on the position it is played in, so those
//! questions are answered by `Position`, not here.
use std::fmt;

use crate::types::{Color, PromotionKind, Square};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    source: Square,
    destination: Square,
    player: Color,
    promotion: Option<PromotionKind>,
}

impl Move {
    /// Constructs a move that doesn't promote.
    pub fn new(source: Square, destination: Square, player: Color) -> Move {
        Move {
            source,
            destination,
            player,
            promotion: None,
        }
    }

    /// Constructs a pawn move onto the last rank that promotes to `kind`.
    pub fn promoting(
        source: Square,
        destination: Square,
        player: Color,
        kind: PromotionKind,
    ) -> Move {
        Move {
            source,
            destination,
            player,
            promotion: Some(kind),
        }
    }

    pub fn source(self) -> Square {
        self.source
    }

    pub fn destination(self) -> Square {
        self.destination
    }

    pub fn player(self) -> Color {
        self.player
    }

    pub fn promotion(self) -> Option<PromotionKind> {
        self.promotion
    }

    pub fn is_promotion(self) -> bool {
        self.promotion.is_some()
    }

    /// Returns this move with its promotion piece replaced.
    pub fn with_promotion(self, promotion: Option<PromotionKind>) -> Move {
        Move { promotion, ..self }
    }

    /// Signed file distance travelled.
    pub fn file_delta(self) -> i32 {
        self.source.file_delta(self.destination)
    }

    /// Signed rank distance travelled, positive towards rank 8.
    pub fn rank_delta(self) -> i32 {
        self.source.rank_delta(self.destination)
    }
}

// Long algebraic form, as spoken by UCI: "e2e4", "e7e8q".
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.source, self.destination)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind)?;
        }

        Ok(())
    }
}
