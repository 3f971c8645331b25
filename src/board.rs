// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The square-centric board: one optional piece per square, plus per-color occupancy sets.
//!
//! `Board` is a plain `Copy` value, so speculative moves made while probing king safety
//! work on a stack copy and never touch the position they were made from.
use std::fmt;

use crate::bitboard::Bitboard;
use crate::pieces;
use crate::types::TableIndex;
use crate::types::{Color, Piece, PieceKind, Square, FILES, RANKS};

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Board {
    squares: [Option<Piece>; 64],
    occupancy: [Bitboard; 2],
}

impl Board {
    /// Constructs an empty board.
    pub const fn new() -> Board {
        Board {
            squares: [None; 64],
            occupancy: [Bitboard::none(); 2],
        }
    }

    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square.as_index()]
    }

    /// Places a piece on an empty square. Fails if the square is occupied.
    pub fn add_piece(&mut self, square: Square, piece: Piece) -> Result<(), ()> {
        if self.piece_at(square).is_some() {
            return Err(());
        }

        self.squares[square.as_index()] = Some(piece);
        self.occupancy[piece.color.as_index()].set(square);
        Ok(())
    }

    /// Lifts the piece off a square and returns it. Fails if the square is empty.
    pub fn remove_piece(&mut self, square: Square) -> Result<Piece, ()> {
        let piece = self.squares[square.as_index()].take().ok_or(())?;
        self.occupancy[piece.color.as_index()].unset(square);
        Ok(piece)
    }

    pub fn pieces(&self, color: Color) -> Bitboard {
        self.occupancy[color.as_index()]
    }

    pub fn pieces_of_kind(&self, color: Color, kind: PieceKind) -> Bitboard {
        self.pieces(color)
            .iter()
            .filter(|&sq| self.piece_at(sq).map(|p| p.kind) == Some(kind))
            .collect()
    }

    /// The square of the given color's king. Positions only ever hold one king per color, so
    /// this is the first one found.
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.pieces_of_kind(color, PieceKind::King).first()
    }

    /// Returns true if no square strictly between `from` and `to` is occupied.
    ///
    /// # Panics
    ///
    /// Panics if the two squares don't share a rank, file or diagonal. Only sliding moves and
    /// castling paths ask this question, and both are aligned by construction.
    pub fn is_path_clear(&self, from: Square, to: Square) -> bool {
        assert!(
            from.is_aligned_with(to),
            "path from {} to {} is not a straight line",
            from,
            to
        );

        let step_file = from.file_delta(to).signum();
        let step_rank = from.rank_delta(to).signum();
        let mut cursor = from;
        loop {
            cursor = match cursor.offset(step_file, step_rank) {
                Some(next) => next,
                None => unreachable!("walked off the board between aligned squares"),
            };

            if cursor == to {
                return true;
            }

            if self.piece_at(cursor).is_some() {
                return false;
            }
        }
    }

    /// Whether the piece on `from` attacks `to`. Pawns attack diagonally forward only, and
    /// castling never attacks anything.
    pub fn attacks(&self, from: Square, to: Square) -> bool {
        let piece = match self.piece_at(from) {
            Some(piece) => piece,
            None => return false,
        };

        if from == to {
            return false;
        }

        match piece.kind {
            PieceKind::Pawn => {
                from.rank_delta(to) == piece.color.pawn_direction() && from.file_delta(to).abs() == 1
            }
            PieceKind::King => from.file_delta(to).abs() <= 1 && from.rank_delta(to).abs() <= 1,
            PieceKind::Knight => pieces::is_knight_move(from, to),
            PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen => {
                pieces::is_slide(piece.kind, from, to) && self.is_path_clear(from, to)
            }
        }
    }

    /// The set of squares holding pieces of color `by` that attack `target`.
    pub fn squares_attacking(&self, by: Color, target: Square) -> Bitboard {
        self.pieces(by)
            .iter()
            .filter(|&sq| self.attacks(sq, target))
            .collect()
    }

    pub fn is_attacked(&self, target: Square, by: Color) -> bool {
        self.pieces(by).iter().any(|sq| self.attacks(sq, target))
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                let sq = Square::of(rank, file);
                if let Some(piece) = self.piece_at(sq) {
                    write!(f, " {} ", piece)?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for &file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(pieces: &[(Square, PieceKind, Color)]) -> Board {
        let mut board = Board::new();
        for &(sq, kind, color) in pieces {
            board.add_piece(sq, Piece::new(kind, color)).unwrap();
        }
        board
    }

    #[test]
    fn add_and_remove() {
        let mut board = Board::new();
        let knight = Piece::new(PieceKind::Knight, Color::White);
        board.add_piece(Square::G1, knight).unwrap();
        assert!(board.add_piece(Square::G1, knight).is_err());
        assert!(board.pieces(Color::White).test(Square::G1));

        assert_eq!(Ok(knight), board.remove_piece(Square::G1));
        assert!(board.remove_piece(Square::G1).is_err());
        assert!(board.pieces(Color::White).empty());
    }

    #[test]
    fn copies_are_independent() {
        let board = board_with(&[(Square::E1, PieceKind::King, Color::White)]);
        let mut copy = board;
        copy.remove_piece(Square::E1).unwrap();
        assert!(board.piece_at(Square::E1).is_some());
        assert!(copy.piece_at(Square::E1).is_none());
    }

    #[test]
    fn path_clear() {
        let board = board_with(&[
            (Square::A1, PieceKind::Rook, Color::White),
            (Square::D1, PieceKind::Knight, Color::White),
        ]);

        assert!(!board.is_path_clear(Square::A1, Square::H1));
        assert!(board.is_path_clear(Square::A1, Square::D1));
        assert!(board.is_path_clear(Square::A1, Square::A8));
        assert!(board.is_path_clear(Square::A1, Square::H8));
        assert!(board.is_path_clear(Square::A1, Square::B2));
    }

    #[test]
    #[should_panic]
    fn path_clear_rejects_unaligned_squares() {
        Board::new().is_path_clear(Square::B1, Square::C3);
    }

    #[test]
    fn pawn_attacks_diagonally_forward() {
        let board = board_with(&[
            (Square::E4, PieceKind::Pawn, Color::White),
            (Square::D5, PieceKind::Pawn, Color::Black),
        ]);

        assert!(board.attacks(Square::E4, Square::D5));
        assert!(board.attacks(Square::E4, Square::F5));
        assert!(!board.attacks(Square::E4, Square::E5));
        assert!(!board.attacks(Square::E4, Square::D3));
        assert!(board.attacks(Square::D5, Square::E4));
        assert!(board.attacks(Square::D5, Square::C4));
    }

    #[test]
    fn sliders_are_blocked() {
        let board = board_with(&[
            (Square::D1, PieceKind::Queen, Color::White),
            (Square::D4, PieceKind::Pawn, Color::White),
            (Square::H5, PieceKind::King, Color::Black),
        ]);

        assert!(board.attacks(Square::D1, Square::D4));
        assert!(!board.attacks(Square::D1, Square::D8));
        assert!(board.attacks(Square::D1, Square::H5));
        assert!(board.is_attacked(Square::H5, Color::White));
        assert_eq!(1, board.squares_attacking(Color::White, Square::H5).count());
    }

    #[test]
    fn king_square() {
        let board = board_with(&[
            (Square::E1, PieceKind::King, Color::White),
            (Square::E8, PieceKind::King, Color::Black),
        ]);

        assert_eq!(Some(Square::E1), board.king_square(Color::White));
        assert_eq!(Some(Square::E8), board.king_square(Color::Black));
        assert_eq!(None, Board::new().king_square(Color::White));
    }
}
