// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Legal move enumeration.
//!
//! Every enumeration pairs candidate source squares with every square the mover doesn't
//! occupy and keeps what `Position::is_valid_move` accepts, so the generator can never
//! disagree with the validator.
use arrayvec::ArrayVec;

use crate::bitboard::Bitboard;
use crate::moves::Move;
use crate::position::Position;
use crate::types::{Color, PieceKind, PromotionKind, Square, PROMOTION_KINDS};

/// Upper bound on the number of legal moves in any position, with room to spare.
pub type MoveVec = ArrayVec<Move, 256>;

/// Which promotion pieces to list for a pawn reaching its last rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PromotionPolicy {
    /// One move per destination, promoting to a queen. Enough when only the destination
    /// matters, as when highlighting squares.
    QueenOnly,
    /// One move per promotion piece.
    All,
}

#[derive(Copy, Clone, Debug, Default)]
pub struct MoveGenerator;

impl MoveGenerator {
    pub fn new() -> MoveGenerator {
        MoveGenerator
    }

    /// All legal moves for `side`. Empty unless `side` is the side to move.
    pub fn legal_moves(&self, pos: &Position, side: Color, policy: PromotionPolicy) -> MoveVec {
        let mut moves = MoveVec::new();
        if side != pos.side_to_move() {
            return moves;
        }

        for source in pos.pieces(side) {
            self.generate_from(pos, source, policy, &mut moves);
        }

        moves
    }

    /// Legal moves of the piece on `source`. Empty if that piece doesn't belong to the side
    /// to move.
    pub fn legal_moves_from(
        &self,
        pos: &Position,
        source: Square,
        policy: PromotionPolicy,
    ) -> MoveVec {
        let mut moves = MoveVec::new();
        match pos.piece_at(source) {
            Some(piece) if piece.color == pos.side_to_move() => {
                self.generate_from(pos, source, policy, &mut moves)
            }
            _ => {}
        }

        moves
    }

    /// Legal moves of the side to move that bring a piece of `kind` to `destination`.
    pub fn legal_moves_to(
        &self,
        pos: &Position,
        destination: Square,
        kind: PieceKind,
        policy: PromotionPolicy,
    ) -> MoveVec {
        let mut moves = MoveVec::new();
        let side = pos.side_to_move();
        for source in pos.pieces_of_kind(side, kind) {
            self.push_candidates(pos, source, destination, policy, &mut moves);
        }

        moves
    }

    /// The squares the piece on `source` can legally move to.
    pub fn legal_destinations(&self, pos: &Position, source: Square) -> Bitboard {
        self.legal_moves_from(pos, source, PromotionPolicy::QueenOnly)
            .iter()
            .map(|mv| mv.destination())
            .collect()
    }

    /// Whether the side to move has any legal move at all.
    pub fn has_legal_move(&self, pos: &Position) -> bool {
        let side = pos.side_to_move();
        let targets = !pos.pieces(side);
        pos.pieces(side).iter().any(|source| {
            targets
                .iter()
                .any(|destination| pos.is_valid_move(candidate(pos, source, destination, None)))
        })
    }

    fn generate_from(
        &self,
        pos: &Position,
        source: Square,
        policy: PromotionPolicy,
        moves: &mut MoveVec,
    ) {
        let targets = !pos.pieces(pos.side_to_move());
        for destination in targets {
            self.push_candidates(pos, source, destination, policy, moves);
        }
    }

    fn push_candidates(
        &self,
        pos: &Position,
        source: Square,
        destination: Square,
        policy: PromotionPolicy,
        moves: &mut MoveVec,
    ) {
        let kinds = match policy {
            PromotionPolicy::QueenOnly => &PROMOTION_KINDS[..1],
            PromotionPolicy::All => &PROMOTION_KINDS[..],
        };

        for &kind in kinds {
            let mv = candidate(pos, source, destination, Some(kind));
            if !pos.is_valid_move(mv) {
                break;
            }

            moves.push(mv);
            if !mv.is_promotion() {
                break;
            }
        }
    }
}

// Builds the move of the side to move from `source` to `destination`, carrying a promotion
// piece exactly when a pawn lands on its last rank.
fn candidate(
    pos: &Position,
    source: Square,
    destination: Square,
    promotion: Option<PromotionKind>,
) -> Move {
    let side = pos.side_to_move();
    let promotes = pos.piece_at(source).map(|p| p.kind) == Some(PieceKind::Pawn)
        && destination.rank() == side.promotion_rank();
    let promotion = if promotes {
        promotion.or(Some(PROMOTION_KINDS[0]))
    } else {
        None
    };

    Move::new(source, destination, side).with_promotion(promotion)
}
