// Copyright 2017-2019 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Classification of a position into ongoing, check, checkmate, stalemate or a dead draw.
use crate::movegen::MoveGenerator;
use crate::position::Position;
use crate::types::{Color, PieceKind, Square, COLORS};

/// The state of the game, from the point of view of the side to move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum GameState {
    NotCompleted,
    WhiteInCheck,
    BlackInCheck,
    /// Neither side has enough material left to deliver mate.
    Draw,
    Stalemate,
    WhiteWinner,
    BlackWinner,
}

impl GameState {
    pub fn is_over(self) -> bool {
        match self {
            GameState::Draw
            | GameState::Stalemate
            | GameState::WhiteWinner
            | GameState::BlackWinner => true,
            GameState::NotCompleted | GameState::WhiteInCheck | GameState::BlackInCheck => false,
        }
    }

    pub fn winner(self) -> Option<Color> {
        match self {
            GameState::WhiteWinner => Some(Color::White),
            GameState::BlackWinner => Some(Color::Black),
            _ => None,
        }
    }

    /// The side that is in check, if the game isn't over.
    pub fn in_check(self) -> Option<Color> {
        match self {
            GameState::WhiteInCheck => Some(Color::White),
            GameState::BlackInCheck => Some(Color::Black),
            _ => None,
        }
    }

    fn winner_is(color: Color) -> GameState {
        match color {
            Color::White => GameState::WhiteWinner,
            Color::Black => GameState::BlackWinner,
        }
    }

    fn check_on(color: Color) -> GameState {
        match color {
            Color::White => GameState::WhiteInCheck,
            Color::Black => GameState::BlackInCheck,
        }
    }
}

/// Classifies the position for the side to move. Checkmate wins for the side that just moved;
/// then stalemate; then check; then a draw by insufficient material.
pub fn classify(pos: &Position) -> GameState {
    let to_move = pos.side_to_move();
    let in_check = pos.is_check(to_move);
    let has_moves = MoveGenerator::new().has_legal_move(pos);

    match (in_check, has_moves) {
        (true, false) => GameState::winner_is(to_move.opponent()),
        (false, false) => GameState::Stalemate,
        (true, true) => GameState::check_on(to_move),
        (false, true) if is_insufficient_material(pos) => GameState::Draw,
        (false, true) => GameState::NotCompleted,
    }
}

/// King against king, king against king and a minor piece, or king and bishop against king
/// and bishop with both bishops on the same square color.
pub fn is_insufficient_material(pos: &Position) -> bool {
    let white = pieces_of(pos, Color::White);
    let black = pieces_of(pos, Color::Black);
    let is_minor = |&(kind, _): &(PieceKind, Square)| {
        kind == PieceKind::Bishop || kind == PieceKind::Knight
    };
    let bishop_square = |pieces: &[(PieceKind, Square)]| {
        pieces
            .iter()
            .find(|&&(kind, _)| kind == PieceKind::Bishop)
            .map(|&(_, square)| square)
    };

    match (white.len(), black.len()) {
        (1, 1) => true,
        (1, 2) => black.iter().any(is_minor),
        (2, 1) => white.iter().any(is_minor),
        (2, 2) => match (bishop_square(&white), bishop_square(&black)) {
            (Some(w), Some(b)) => w.is_light() == b.is_light(),
            _ => false,
        },
        _ => false,
    }
}

/// Total material on the board for both sides: queen 9, rook 5, bishop and knight 3, pawn 1.
pub fn material_count(pos: &Position) -> u32 {
    COLORS
        .iter()
        .flat_map(|&color| pieces_of(pos, color))
        .map(|(kind, _)| kind.value())
        .sum()
}

fn pieces_of(pos: &Position, color: Color) -> Vec<(PieceKind, Square)> {
    pos.pieces(color)
        .iter()
        .filter_map(|sq| pos.piece_at(sq).map(|piece| (piece.kind, sq)))
        .collect()
}
