// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Definitions of the `Bitboard` type, a set of squares on the chess board.
//!
//! The board itself is stored square-by-square (see `board`); bitboards are the
//! answer type for set-shaped questions about it: which squares a side occupies,
//! which pieces attack a square, where a piece may legally go.
use num_traits::FromPrimitive;
use std::fmt;
use std::iter::{FromIterator, Iterator};
use std::ops;

use crate::types::{Square, FILES, RANKS};

/// A Bitboard is a 64-bit integer in which one bit represents one square of the board.
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct Bitboard {
    bits: u64,
}

impl Bitboard {
    /// Constructs a new bitboard from the given bits.
    pub const fn from_bits(bits: u64) -> Bitboard {
        Bitboard { bits }
    }

    /// Constructs a new, empty bitboard.
    pub const fn none() -> Bitboard {
        Bitboard::from_bits(0)
    }

    /// Tests whether or not a square is a member of this bitboard.
    pub const fn test(self, square: Square) -> bool {
        (self.bits & (1u64 << (square as u8))) != 0
    }

    /// Sets a square to be a member of this bitboard.
    pub fn set(&mut self, square: Square) {
        self.bits |= 1u64 << (square as u8);
    }

    /// Removes a square from this bitboard.
    pub fn unset(&mut self, square: Square) {
        self.bits &= !(1u64 << square as u8);
    }

    pub const fn and(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits & other.bits)
    }

    pub const fn or(self, other: Bitboard) -> Bitboard {
        Bitboard::from_bits(self.bits | other.bits)
    }

    /// The complement of this set.
    pub const fn not(self) -> Bitboard {
        Bitboard::from_bits(!self.bits)
    }

    /// Produces an iterator over the squares contained in this bitboard, in ascending square
    /// order (a1, b1, ..., h8).
    pub fn iter(self) -> BitboardIterator {
        BitboardIterator { bits: self.bits }
    }

    /// Retrieves the number of squares contained in this bitboard.
    pub const fn count(self) -> u32 {
        self.bits.count_ones()
    }

    pub const fn empty(self) -> bool {
        self.bits == 0
    }

    /// Retrieves the lowest square in this set, if there is one.
    pub fn first(self) -> Option<Square> {
        self.iter().next()
    }
}

impl fmt::Debug for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("Bitboard").field(&self.bits).finish()
    }
}

impl fmt::Display for Bitboard {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &rank in RANKS.iter().rev() {
            for &file in &FILES {
                if self.test(Square::of(rank, file)) {
                    write!(f, " 1 ")?
                } else {
                    write!(f, " . ")?
                }
            }

            writeln!(f, "| {}", rank)?;
        }

        for _ in &FILES {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in &FILES {
            write!(f, " {} ", file)?;
        }

        writeln!(f)
    }
}

impl ops::BitAnd for Bitboard {
    type Output = Bitboard;

    fn bitand(self, rhs: Bitboard) -> Bitboard {
        self.and(rhs)
    }
}

impl ops::BitOr for Bitboard {
    type Output = Bitboard;

    fn bitor(self, rhs: Bitboard) -> Bitboard {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for Bitboard {
    fn bitor_assign(&mut self, rhs: Bitboard) {
        *self = self.or(rhs);
    }
}

impl ops::Not for Bitboard {
    type Output = Bitboard;

    fn not(self) -> Bitboard {
        Bitboard::not(self)
    }
}

/// BitboardIterator is an iterator over squares that are set in a given bitboard.
pub struct BitboardIterator {
    bits: u64,
}

impl Iterator for BitboardIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Square> {
        if self.bits == 0 {
            return None;
        }

        let next = self.bits.trailing_zeros();
        self.bits &= self.bits - 1;
        FromPrimitive::from_u32(next)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let count = self.bits.count_ones() as usize;
        (count, Some(count))
    }
}

impl IntoIterator for Bitboard {
    type Item = Square;
    type IntoIter = BitboardIterator;

    fn into_iter(self) -> BitboardIterator {
        self.iter()
    }
}

impl FromIterator<Square> for Bitboard {
    fn from_iter<I: IntoIterator<Item = Square>>(iter: I) -> Bitboard {
        let mut board = Bitboard::none();
        for square in iter {
            board.set(square);
        }

        board
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn smoke_test() {
        let mut board = Bitboard::default();
        assert!(!board.test(Square::A1));

        board.set(Square::A1);
        assert!(board.test(Square::A1));
    }

    #[test]
    fn union_and_intersection() {
        let one: Bitboard = vec![Square::A2, Square::B2].into_iter().collect();
        let two: Bitboard = vec![Square::A2, Square::C2].into_iter().collect();

        let both = one & two;
        assert!(both.test(Square::A2));
        assert!(!both.test(Square::B2));
        assert_eq!(1, both.count());

        let either = one | two;
        assert_eq!(3, either.count());
    }

    #[test]
    fn enumerating() {
        let mut one = Bitboard::default();
        one.set(Square::B2);
        one.set(Square::A2);

        let squares: Vec<_> = one.iter().collect();
        assert_eq!(vec![Square::A2, Square::B2], squares);
        assert_eq!(Some(Square::A2), one.first());
        assert!(Bitboard::none().first().is_none());
    }

    #[test]
    fn complement() {
        let mut board = Bitboard::none();
        board.set(Square::H2);
        let rest = !board;
        assert_eq!(63, rest.count());
        assert!(!rest.test(Square::H2));
    }
}
