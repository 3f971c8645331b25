// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pure geometric move rules, one per piece kind.
//!
//! Nothing in this module looks at a board. Blocking pieces, captures, castling rights
//! and king safety are layered on top by `Position::is_valid_move`.
use crate::moves::Move;
use crate::types::{File, PieceKind, Square};

/// The shapes a pawn move can take.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PawnMove {
    /// One square straight ahead.
    OneStep,
    /// Two squares straight ahead from the pawn's starting rank.
    TwoSteps,
    /// One square diagonally ahead, onto an enemy piece or en-passant.
    Capture,
    Invalid,
}

/// Classifies a move as a pawn move of its player, going by deltas alone.
pub fn classify_pawn_move(mv: Move) -> PawnMove {
    let direction = mv.player().pawn_direction();
    let dx = mv.file_delta().abs();
    let dy = mv.rank_delta();

    if dx == 0 && dy == direction {
        PawnMove::OneStep
    } else if dx == 0 && dy == 2 * direction && mv.source().rank() == mv.player().pawn_rank() {
        PawnMove::TwoSteps
    } else if dx == 1 && dy == direction {
        PawnMove::Capture
    } else {
        PawnMove::Invalid
    }
}

pub fn is_knight_move(from: Square, to: Square) -> bool {
    let dx = from.file_delta(to).abs();
    let dy = from.rank_delta(to).abs();
    (dx == 1 && dy == 2) || (dx == 2 && dy == 1)
}

/// Whether a sliding piece of `kind` could travel from `from` to `to` on an empty board.
pub fn is_slide(kind: PieceKind, from: Square, to: Square) -> bool {
    let dx = from.file_delta(to).abs();
    let dy = from.rank_delta(to).abs();
    let diagonal = dx == dy && dx != 0;
    let straight = (dx == 0) != (dy == 0);
    match kind {
        PieceKind::Bishop => diagonal,
        PieceKind::Rook => straight,
        PieceKind::Queen => diagonal || straight,
        _ => false,
    }
}

/// Whether `mv` is a king step to an adjacent square.
pub fn is_king_step(mv: Move) -> bool {
    let dx = mv.file_delta().abs();
    let dy = mv.rank_delta().abs();
    dx <= 1 && dy <= 1 && (dx, dy) != (0, 0)
}

/// Whether `mv` has the shape of a castle: two files sideways from the king's home square.
pub fn is_castle_shape(mv: Move) -> bool {
    let home = Square::of(mv.player().back_rank(), File::E);
    mv.source() == home && mv.rank_delta() == 0 && mv.file_delta().abs() == 2
}

/// The geometric rule for a piece of the given kind owned by the move's player.
pub fn is_geometric_move(kind: PieceKind, mv: Move) -> bool {
    match kind {
        PieceKind::Pawn => classify_pawn_move(mv) != PawnMove::Invalid,
        PieceKind::Knight => is_knight_move(mv.source(), mv.destination()),
        PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
            is_slide(kind, mv.source(), mv.destination())
        }
        PieceKind::King => is_king_step(mv) || is_castle_shape(mv),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    fn white(from: Square, to: Square) -> Move {
        Move::new(from, to, Color::White)
    }

    fn black(from: Square, to: Square) -> Move {
        Move::new(from, to, Color::Black)
    }

    #[test]
    fn pawn_shapes_depend_on_owner() {
        assert_eq!(PawnMove::OneStep, classify_pawn_move(white(Square::E2, Square::E3)));
        assert_eq!(PawnMove::TwoSteps, classify_pawn_move(white(Square::E2, Square::E4)));
        assert_eq!(PawnMove::Capture, classify_pawn_move(white(Square::E4, Square::D5)));
        assert_eq!(PawnMove::Invalid, classify_pawn_move(white(Square::E3, Square::E2)));
        assert_eq!(PawnMove::Invalid, classify_pawn_move(white(Square::E3, Square::E5)));

        assert_eq!(PawnMove::OneStep, classify_pawn_move(black(Square::E7, Square::E6)));
        assert_eq!(PawnMove::TwoSteps, classify_pawn_move(black(Square::E7, Square::E5)));
        assert_eq!(PawnMove::Capture, classify_pawn_move(black(Square::E5, Square::F4)));
        assert_eq!(PawnMove::Invalid, classify_pawn_move(black(Square::E2, Square::E4)));
    }

    #[test]
    fn knight() {
        assert!(is_geometric_move(PieceKind::Knight, white(Square::G1, Square::F3)));
        assert!(is_geometric_move(PieceKind::Knight, white(Square::G1, Square::E2)));
        assert!(!is_geometric_move(PieceKind::Knight, white(Square::G1, Square::G3)));
    }

    #[test]
    fn sliders() {
        assert!(is_geometric_move(PieceKind::Bishop, white(Square::C1, Square::H6)));
        assert!(!is_geometric_move(PieceKind::Bishop, white(Square::C1, Square::C4)));
        assert!(is_geometric_move(PieceKind::Rook, white(Square::A1, Square::A7)));
        assert!(!is_geometric_move(PieceKind::Rook, white(Square::A1, Square::B2)));
        assert!(is_geometric_move(PieceKind::Queen, white(Square::D1, Square::H5)));
        assert!(is_geometric_move(PieceKind::Queen, white(Square::D1, Square::D8)));
        assert!(!is_geometric_move(PieceKind::Queen, white(Square::D1, Square::E3)));
    }

    #[test]
    fn king() {
        assert!(is_geometric_move(PieceKind::King, white(Square::E1, Square::F2)));
        assert!(is_geometric_move(PieceKind::King, white(Square::E1, Square::G1)));
        assert!(is_geometric_move(PieceKind::King, black(Square::E8, Square::C8)));
        assert!(!is_geometric_move(PieceKind::King, white(Square::E2, Square::G2)));
        assert!(!is_geometric_move(PieceKind::King, black(Square::E1, Square::G1)));
        assert!(!is_geometric_move(PieceKind::King, white(Square::E1, Square::E3)));
    }
}
