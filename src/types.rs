// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use num_traits::{FromPrimitive, ToPrimitive};
use std::convert::TryFrom;
use std::fmt::{self, Display, Write};

// TableIndex is a trait for all types that can serve as an index into a table.
// Squares, ranks and files are all used this way, so anything implementing To and
// FromPrimitive can be converted to and from a plain index.
pub trait TableIndex {
    fn as_index(self) -> usize;
    fn from_index(idx: usize) -> Self;
}

impl<T> TableIndex for T
where
    T: FromPrimitive + ToPrimitive,
{
    fn as_index(self) -> usize {
        self.to_u32().unwrap() as usize
    }

    fn from_index(idx: usize) -> T {
        <T as FromPrimitive>::from_u64(idx as u64).unwrap()
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Square {
    A1,
    B1,
    C1,
    D1,
    E1,
    F1,
    G1,
    H1,
    A2,
    B2,
    C2,
    D2,
    E2,
    F2,
    G2,
    H2,
    A3,
    B3,
    C3,
    D3,
    E3,
    F3,
    G3,
    H3,
    A4,
    B4,
    C4,
    D4,
    E4,
    F4,
    G4,
    H4,
    A5,
    B5,
    C5,
    D5,
    E5,
    F5,
    G5,
    H5,
    A6,
    B6,
    C6,
    D6,
    E6,
    F6,
    G6,
    H6,
    A7,
    B7,
    C7,
    D7,
    E7,
    F7,
    G7,
    H7,
    A8,
    B8,
    C8,
    D8,
    E8,
    F8,
    G8,
    H8,
}

impl Square {
    pub fn of(rank: Rank, file: File) -> Square {
        Square::from_index(rank.as_index() * 8 + file.as_index())
    }

    /// Returns the square at the given zero-based file and rank coordinates, or `None` if the
    /// coordinates fall off the board.
    pub fn from_coords(file: i32, rank: i32) -> Option<Square> {
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_index((rank * 8 + file) as usize))
        } else {
            None
        }
    }

    pub fn rank(self) -> Rank {
        Rank::from_index(self.as_index() >> 3)
    }

    pub fn file(self) -> File {
        File::from_index(self.as_index() & 7)
    }

    /// Moves this square by the given number of files and ranks.
    pub fn offset(self, file_delta: i32, rank_delta: i32) -> Option<Square> {
        Square::from_coords(
            self.file() as i32 + file_delta,
            self.rank() as i32 + rank_delta,
        )
    }

    /// Signed number of files from this square to `other`.
    pub fn file_delta(self, other: Square) -> i32 {
        other.file() as i32 - self.file() as i32
    }

    /// Signed number of ranks from this square to `other`.
    pub fn rank_delta(self, other: Square) -> i32 {
        other.rank() as i32 - self.rank() as i32
    }

    /// Whether or not this square and `other` share a rank, file or diagonal. A square is not
    /// aligned with itself.
    pub fn is_aligned_with(self, other: Square) -> bool {
        let dx = self.file_delta(other);
        let dy = self.rank_delta(other);
        (dx != 0 || dy != 0) && (dx == 0 || dy == 0 || dx.abs() == dy.abs())
    }

    /// Light squares are the ones where file and rank indices differ in parity; a1 is dark.
    pub fn is_light(self) -> bool {
        (self.file().as_index() + self.rank().as_index()) % 2 == 1
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64).map(Square::from_index)
    }
}

impl Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

impl TryFrom<&str> for Square {
    type Error = ();

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let mut chars = value.chars();
        let file = chars.next().ok_or(())?;
        let rank = chars.next().ok_or(())?;
        if chars.next().is_some() {
            return Err(());
        }

        Ok(Square::of(Rank::try_from(rank)?, File::try_from(file)?))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Rank {
    One,
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
}

impl Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'1' + *self as u8) as char)
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value {
            '1'..='8' => Ok(Rank::from_index(value as usize - '1' as usize)),
            _ => Err(()),
        }
    }
}

pub static RANKS: [Rank; 8] = [
    Rank::One,
    Rank::Two,
    Rank::Three,
    Rank::Four,
    Rank::Five,
    Rank::Six,
    Rank::Seven,
    Rank::Eight,
];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum File {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Display for File {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

// Square text is case-insensitive, so both 'e' and 'E' name the e-file.
impl TryFrom<char> for File {
    type Error = ();

    fn try_from(value: char) -> Result<Self, Self::Error> {
        match value.to_ascii_lowercase() {
            c @ 'a'..='h' => Ok(File::from_index(c as usize - 'a' as usize)),
            _ => Err(()),
        }
    }
}

pub static FILES: [File; 8] = [
    File::A,
    File::B,
    File::C,
    File::D,
    File::E,
    File::F,
    File::G,
    File::H,
];

/// The two players. Every piece and every move is owned by one of them.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum Color {
    White,
    Black,
}

impl Color {
    pub fn opponent(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// The rank this color's king and rooks start on.
    pub fn back_rank(self) -> Rank {
        match self {
            Color::White => Rank::One,
            Color::Black => Rank::Eight,
        }
    }

    /// The rank this color's pawns promote on.
    pub fn promotion_rank(self) -> Rank {
        self.opponent().back_rank()
    }

    /// The rank this color's pawns start on, and may advance two squares from.
    pub fn pawn_rank(self) -> Rank {
        match self {
            Color::White => Rank::Two,
            Color::Black => Rank::Seven,
        }
    }

    /// Rank delta of a single pawn step for this color.
    pub fn pawn_direction(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            Color::White => 'w',
            Color::Black => 'b',
        };
        f.write_char(chr)
    }
}

pub static COLORS: [Color; 2] = [Color::White, Color::Black];

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, FromPrimitive, ToPrimitive)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    /// Conventional material value, used by `analysis::material_count`.
    pub fn value(self) -> u32 {
        match self {
            PieceKind::Pawn => 1,
            PieceKind::Knight | PieceKind::Bishop => 3,
            PieceKind::Rook => 5,
            PieceKind::Queen => 9,
            PieceKind::King => 0,
        }
    }
}

impl Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };
        f.write_char(chr)
    }
}

/// The pieces a pawn may become upon reaching its promotion rank.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PromotionKind {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PromotionKind {
    pub fn kind(self) -> PieceKind {
        match self {
            PromotionKind::Knight => PieceKind::Knight,
            PromotionKind::Bishop => PieceKind::Bishop,
            PromotionKind::Rook => PieceKind::Rook,
            PromotionKind::Queen => PieceKind::Queen,
        }
    }
}

impl Display for PromotionKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        Display::fmt(&self.kind(), f)
    }
}

impl TryFrom<char> for PromotionKind {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let res = match c.to_ascii_lowercase() {
            'n' => PromotionKind::Knight,
            'b' => PromotionKind::Bishop,
            'r' => PromotionKind::Rook,
            'q' => PromotionKind::Queen,
            _ => return Err(()),
        };
        Ok(res)
    }
}

pub static PROMOTION_KINDS: [PromotionKind; 4] = [
    PromotionKind::Queen,
    PromotionKind::Rook,
    PromotionKind::Bishop,
    PromotionKind::Knight,
];

bitflags! {
    pub struct CastleStatus: u8 {
        const NONE = 0;
        const WHITE_KINGSIDE = 0b0000_0001;
        const WHITE_QUEENSIDE = 0b0000_0010;
        const WHITE = Self::WHITE_KINGSIDE.bits | Self::WHITE_QUEENSIDE.bits;
        const BLACK_KINGSIDE = 0b0000_0100;
        const BLACK_QUEENSIDE = 0b0000_1000;
        const BLACK = Self::BLACK_KINGSIDE.bits | Self::BLACK_QUEENSIDE.bits;
    }
}

impl CastleStatus {
    pub fn kingside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_KINGSIDE,
            Color::Black => CastleStatus::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE_QUEENSIDE,
            Color::Black => CastleStatus::BLACK_QUEENSIDE,
        }
    }

    pub fn both(color: Color) -> CastleStatus {
        match color {
            Color::White => CastleStatus::WHITE,
            Color::Black => CastleStatus::BLACK,
        }
    }
}

/// A piece is a kind plus an owner. Pieces are plain values; promotion replaces the pawn with a
/// freshly constructed piece rather than changing it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    pub fn new(kind: PieceKind, color: Color) -> Piece {
        Piece { kind, color }
    }
}

impl TryFrom<char> for Piece {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };

        let kind = match c.to_ascii_lowercase() {
            'p' => PieceKind::Pawn,
            'n' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'r' => PieceKind::Rook,
            'q' => PieceKind::Queen,
            'k' => PieceKind::King,
            _ => return Err(()),
        };

        Ok(Piece::new(kind, color))
    }
}

// FEN letters: uppercase for White, lowercase for Black.
impl Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let chr = match self.kind {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        };

        match self.color {
            Color::White => f.write_char(chr.to_ascii_uppercase()),
            Color::Black => f.write_char(chr),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::convert::TryFrom;

    use super::*;

    #[test]
    fn square_of_rank_and_file() {
        assert_eq!(Square::E4, Square::of(Rank::Four, File::E));
        assert_eq!(Rank::Four, Square::E4.rank());
        assert_eq!(File::E, Square::E4.file());
    }

    #[test]
    fn square_text_is_case_insensitive() {
        assert_eq!(Ok(Square::D2), Square::try_from("d2"));
        assert_eq!(Ok(Square::D2), Square::try_from("D2"));
        assert!(Square::try_from("i2").is_err());
        assert!(Square::try_from("d9").is_err());
        assert!(Square::try_from("d").is_err());
        assert!(Square::try_from("d22").is_err());
        assert_eq!("h8", Square::H8.to_string());
    }

    #[test]
    fn square_deltas() {
        assert_eq!(2, Square::E1.file_delta(Square::G1));
        assert_eq!(-2, Square::E1.file_delta(Square::C1));
        assert_eq!(-1, Square::E7.rank_delta(Square::E6));
        assert_eq!(Some(Square::F3), Square::G1.offset(-1, 2));
        assert_eq!(None, Square::H1.offset(1, 0));
    }

    #[test]
    fn alignment() {
        assert!(Square::A1.is_aligned_with(Square::H8));
        assert!(Square::A1.is_aligned_with(Square::A8));
        assert!(Square::C4.is_aligned_with(Square::H4));
        assert!(!Square::B1.is_aligned_with(Square::C3));
        assert!(!Square::D4.is_aligned_with(Square::D4));
    }

    #[test]
    fn square_colors() {
        assert!(!Square::A1.is_light());
        assert!(Square::H1.is_light());
        assert!(Square::D1.is_light());
        assert!(!Square::C1.is_light());
        assert!(!Square::H8.is_light());
    }

    #[test]
    fn opponent_is_involutive() {
        for &color in &COLORS {
            assert_eq!(color, color.opponent().opponent());
            assert_ne!(color, color.opponent());
        }
    }

    #[test]
    fn piece_chars() {
        let piece = Piece::try_from('N').unwrap();
        assert_eq!(Piece::new(PieceKind::Knight, Color::White), piece);
        assert_eq!("N", piece.to_string());

        let piece = Piece::try_from('q').unwrap();
        assert_eq!(Piece::new(PieceKind::Queen, Color::Black), piece);
        assert_eq!("q", piece.to_string());

        assert!(Piece::try_from('x').is_err());
    }

    #[test]
    fn promotion_chars() {
        assert_eq!(Ok(PromotionKind::Queen), PromotionKind::try_from('Q'));
        assert_eq!(Ok(PromotionKind::Knight), PromotionKind::try_from('n'));
        assert!(PromotionKind::try_from('k').is_err());
        assert!(PromotionKind::try_from('p').is_err());
    }
}
